use crate::ast::*;
use crate::error::CondResult;
use crate::transpiler::conditions::{build_filter, ParamContext};
use crate::transpiler::traits::SqlGenerator;
use crate::transpiler::{CompiledQuery, TABLE_SLOT};

/// Generate SELECT SQL.
pub fn build_select(
    filter: Option<&ConditionNode>,
    generator: &dyn SqlGenerator,
) -> CondResult<CompiledQuery> {
    let mut sql = format!("SELECT * FROM {}", TABLE_SLOT);
    let mut params = ParamContext::new();
    push_where(&mut sql, filter, generator, &mut params);
    Ok(CompiledQuery::new(sql, params.params))
}

/// Append ` WHERE <filter>` when the filter produces any text.
pub fn push_where(
    sql: &mut String,
    filter: Option<&ConditionNode>,
    generator: &dyn SqlGenerator,
    params: &mut ParamContext,
) {
    let Some(filter) = filter else {
        return;
    };
    let clause = build_filter(filter, generator, params);
    if !clause.is_empty() {
        sql.push_str(" WHERE ");
        sql.push_str(&clause);
    }
}
