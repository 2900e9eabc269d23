use crate::ast::*;
use crate::error::{CondError, CondResult};
use crate::transpiler::conditions::ParamContext;
use crate::transpiler::traits::SqlGenerator;
use crate::transpiler::{CompiledQuery, TABLE_SLOT};

use super::select::push_where;

/// Validate an UPDATE payload: one EQ node, or a non-empty AND of EQ nodes.
pub fn update_payload(set: Option<&ConditionNode>) -> CondResult<&[ConditionNode]> {
    let set = set.ok_or_else(|| CondError::update("update data cannot be empty"))?;
    match set.op {
        CondOp::Eq if !set.field.is_empty() => Ok(std::slice::from_ref(set)),
        CondOp::And if set.is_assignment_list() => Ok(&set.children),
        CondOp::And if set.children.is_empty() => Err(CondError::update("update data has no fields")),
        CondOp::And => Err(CondError::update("update only supports EQ fields")),
        CondOp::Eq => Err(CondError::update("update field name is empty")),
        op => Err(CondError::update(format!(
            "update data must be EQ or AND of EQ, got {}",
            op
        ))),
    }
}

/// Generate UPDATE SQL.
///
/// SET placeholders are numbered before WHERE placeholders, so payload
/// values precede filter values in the argument list.
pub fn build_update(
    filter: Option<&ConditionNode>,
    set: Option<&ConditionNode>,
    generator: &dyn SqlGenerator,
) -> CondResult<CompiledQuery> {
    let fields = update_payload(set)?;
    let mut params = ParamContext::new();

    let assignments: Vec<String> = fields
        .iter()
        .map(|f| {
            let col = generator.quote_identifier(&f.field);
            let placeholder = params.add_param(f.value.clone(), generator);
            format!("{}={}", col, placeholder)
        })
        .collect();

    let mut sql = format!("UPDATE {} SET {}", TABLE_SLOT, assignments.join(","));
    push_where(&mut sql, filter, generator, &mut params);
    Ok(CompiledQuery::new(sql, params.params))
}
