//! Transpiler traits.

use crate::ast::{ConditionNode, OpKind};
use crate::error::CondResult;

use super::CompiledQuery;

/// Dialect-specific SQL generation strategy.
pub trait SqlGenerator: Send + Sync {
    /// Quote an identifier (table or column name).
    fn quote_identifier(&self, name: &str) -> String;
    /// Generate the parameter placeholder (e.g., $1, ?, @p1) for a 1-based index.
    fn placeholder(&self, index: usize) -> String;
}

/// Compiles condition trees for one backend.
///
/// Implementations are pure: the same inputs always yield the same output,
/// so results may be memoized per [`dialect_id`](Compiler::dialect_id).
pub trait Compiler: Send + Sync {
    /// Stable identifier used to partition the compile cache.
    fn dialect_id(&self) -> u8;

    /// Compile `op` with its filter tree and, for UPDATE, its payload tree.
    fn compile(
        &self,
        op: OpKind,
        filter: Option<&ConditionNode>,
        set: Option<&ConditionNode>,
    ) -> CondResult<CompiledQuery>;
}

/// Quote with `quote` on both sides, doubling any embedded `quote`.
pub fn wrap_identifier(name: &str, quote: char) -> String {
    let mut out = String::with_capacity(name.len() + 2);
    out.push(quote);
    for c in name.chars() {
        if c == quote {
            out.push(quote);
        }
        out.push(c);
    }
    out.push(quote);
    out
}
