use crate::ast::*;
use crate::error::{CondError, CondResult};
use crate::transpiler::conditions::ParamContext;
use crate::transpiler::traits::SqlGenerator;
use crate::transpiler::{CompiledQuery, TABLE_SLOT};

/// Validate an INSERT payload: a non-empty AND whose children are all EQ.
pub fn insert_payload(data: Option<&ConditionNode>) -> CondResult<&[ConditionNode]> {
    let data = data.ok_or_else(|| CondError::insert("insert data is missing"))?;
    if data.op != CondOp::And {
        return Err(CondError::insert(format!(
            "insert data must be an AND node, got {}",
            data.op
        )));
    }
    if data.children.is_empty() {
        return Err(CondError::insert("insert data has no fields"));
    }
    if let Some(bad) = data.children.iter().find(|c| c.op != CondOp::Eq) {
        return Err(CondError::insert(format!(
            "insert only supports EQ fields, got {} on '{}'",
            bad.op, bad.field
        )));
    }
    Ok(&data.children)
}

/// Generate INSERT SQL.
pub fn build_insert(
    data: Option<&ConditionNode>,
    generator: &dyn SqlGenerator,
) -> CondResult<CompiledQuery> {
    let fields = insert_payload(data)?;
    let mut params = ParamContext::new();

    let cols: Vec<String> = fields
        .iter()
        .map(|f| generator.quote_identifier(&f.field))
        .collect();
    let placeholders: Vec<String> = fields
        .iter()
        .map(|f| params.add_param(f.value.clone(), generator))
        .collect();

    let sql = format!(
        "INSERT INTO {} ({}) VALUES ({})",
        TABLE_SLOT,
        cols.join(","),
        placeholders.join(",")
    );
    Ok(CompiledQuery::new(sql, params.params))
}
