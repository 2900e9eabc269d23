//! Condition tree transpilers.
//!
//! Turns a [`ConditionNode`] tree plus an [`OpKind`] into a parameterized
//! SQL template (with a `%s` table slot) and its ordered arguments, or into a
//! JSON document for document stores.

pub mod conditions;
pub mod dialect;
pub mod dml;
pub mod nosql;
pub mod sql;
pub mod traits;

#[cfg(test)]
mod tests;

use crate::ast::*;
use crate::error::CondResult;

pub use conditions::ParamContext;
pub use dialect::Dialect;
pub use nosql::document::DocumentCompiler;
pub use traits::{Compiler, SqlGenerator};

/// Table-name slot left in SQL templates for the connection layer.
pub const TABLE_SLOT: &str = "%s";

/// A compiled statement: template text plus positional arguments.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledQuery {
    pub template: String,
    pub args: Vec<Value>,
}

impl CompiledQuery {
    pub fn new(template: String, args: Vec<Value>) -> Self {
        Self { template, args }
    }

    /// Substitute an already-quoted table name into the table slot.
    ///
    /// Only the first slot is replaced: it always precedes any RAW text that
    /// might itself contain `%s`.
    pub fn render(&self, table: &str) -> String {
        self.template.replacen(TABLE_SLOT, table, 1)
    }
}

/// SQL compiler driven by a pluggable [`SqlGenerator`].
pub struct SqlCompiler {
    dialect_id: u8,
    generator: Box<dyn SqlGenerator>,
}

impl SqlCompiler {
    /// Compiler for a built-in SQL dialect.
    pub fn new(dialect: Dialect) -> Self {
        Self {
            dialect_id: dialect.id(),
            generator: dialect.generator(),
        }
    }

    /// Compiler for a caller-supplied generator. `dialect_id` must not clash
    /// with another compiler sharing the same cache.
    pub fn with_generator(dialect_id: u8, generator: Box<dyn SqlGenerator>) -> Self {
        Self {
            dialect_id,
            generator,
        }
    }

    pub fn generator(&self) -> &dyn SqlGenerator {
        self.generator.as_ref()
    }
}

impl Compiler for SqlCompiler {
    fn dialect_id(&self) -> u8 {
        self.dialect_id
    }

    fn compile(
        &self,
        op: OpKind,
        filter: Option<&ConditionNode>,
        set: Option<&ConditionNode>,
    ) -> CondResult<CompiledQuery> {
        tracing::trace!(dialect = self.dialect_id, %op, "compiling sql");
        let generator = self.generator.as_ref();
        match op {
            OpKind::Insert => dml::insert::build_insert(filter, generator),
            OpKind::Query => dml::select::build_select(filter, generator),
            OpKind::Update => dml::update::build_update(filter, set, generator),
            OpKind::Delete => dml::delete::build_delete(filter, generator),
            OpKind::Exec => dml::build_exec(filter),
        }
    }
}
