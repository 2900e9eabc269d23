use std::str::FromStr;

use crate::error::CondError;
use crate::transpiler::nosql::document::DocumentCompiler;
use crate::transpiler::sql::mysql::MysqlGenerator;
use crate::transpiler::sql::postgres::PostgresGenerator;
use crate::transpiler::sql::sqlite::SqliteGenerator;
use crate::transpiler::traits::{Compiler, SqlGenerator};
use crate::transpiler::SqlCompiler;

/// Supported dialects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Dialect {
    SQLite,
    #[default]
    MySQL,
    Postgres,
    /// JSON documents for document stores.
    Document,
}

impl Dialect {
    pub const ALL: [Dialect; 4] = [
        Dialect::SQLite,
        Dialect::MySQL,
        Dialect::Postgres,
        Dialect::Document,
    ];

    /// Cache partition id.
    pub fn id(&self) -> u8 {
        match self {
            Dialect::SQLite => 0,
            Dialect::MySQL => 1,
            Dialect::Postgres => 2,
            Dialect::Document => 3,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Dialect::SQLite => "sqlite",
            Dialect::MySQL => "mysql",
            Dialect::Postgres => "postgres",
            Dialect::Document => "document",
        }
    }

    pub fn is_sql(&self) -> bool {
        !matches!(self, Dialect::Document)
    }

    /// SQL generator for this dialect. The document dialect has no SQL
    /// syntax and falls back to MySQL quoting, which only matters for
    /// callers quoting table names by hand.
    pub fn generator(&self) -> Box<dyn SqlGenerator> {
        match self {
            Dialect::SQLite => Box::new(SqliteGenerator),
            Dialect::MySQL | Dialect::Document => Box::new(MysqlGenerator),
            Dialect::Postgres => Box::new(PostgresGenerator),
        }
    }

    /// Compiler for this dialect.
    pub fn compiler(&self) -> Box<dyn Compiler> {
        match self {
            Dialect::Document => Box::new(DocumentCompiler::new()),
            sql => Box::new(SqlCompiler::new(*sql)),
        }
    }
}

impl std::fmt::Display for Dialect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Dialect {
    type Err = CondError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sqlite" | "sqlite3" => Ok(Dialect::SQLite),
            "mysql" => Ok(Dialect::MySQL),
            "postgres" | "postgresql" | "pg" => Ok(Dialect::Postgres),
            "document" | "json" | "mongo" => Ok(Dialect::Document),
            _ => Err(CondError::UnknownDialect(s.to_string())),
        }
    }
}
