use crate::ast::*;
use crate::error::CondResult;
use crate::transpiler::conditions::ParamContext;
use crate::transpiler::traits::SqlGenerator;
use crate::transpiler::{CompiledQuery, TABLE_SLOT};

use super::select::push_where;

/// Generate DELETE SQL. A missing filter deletes every row, as the caller asked.
pub fn build_delete(
    filter: Option<&ConditionNode>,
    generator: &dyn SqlGenerator,
) -> CondResult<CompiledQuery> {
    let mut sql = format!("DELETE FROM {}", TABLE_SLOT);
    let mut params = ParamContext::new();
    push_where(&mut sql, filter, generator, &mut params);
    Ok(CompiledQuery::new(sql, params.params))
}
