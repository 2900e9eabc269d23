//! DML statement builders.

pub mod delete;
pub mod insert;
pub mod select;
pub mod update;

use crate::ast::*;
use crate::error::{CondError, CondResult};

use super::CompiledQuery;

/// EXEC: pass a RAW node's text through untouched, with its values as arguments.
pub fn build_exec(raw: Option<&ConditionNode>) -> CondResult<CompiledQuery> {
    let raw = raw.ok_or_else(|| CondError::exec("exec requires a RAW node"))?;
    if raw.op != CondOp::Raw {
        return Err(CondError::exec(format!(
            "exec only supports RAW nodes, got {}",
            raw.op
        )));
    }
    let sql = raw
        .value
        .as_str()
        .ok_or_else(|| CondError::exec("exec RAW value must be a string"))?;
    Ok(CompiledQuery::new(sql.to_string(), raw.values.clone()))
}
