//! # condsql
//!
//! Compile backend-neutral condition trees into parameterized SQL templates
//! or JSON documents, and memoize the results.
//!
//! ## Quick Example
//!
//! ```
//! use condsql::prelude::*;
//!
//! let filter = cond().eq("name", "Tom").gt("age", 18).build();
//! let compiler = SqlCompiler::new(Dialect::MySQL);
//! let query = compiler.compile(OpKind::Query, filter.as_ref(), None).unwrap();
//!
//! assert_eq!(query.template, "SELECT * FROM %s WHERE (`name` = ?) AND (`age` > ?)");
//! assert_eq!(query.args, vec![Value::from("Tom"), Value::Int(18)]);
//! assert_eq!(query.render("`users`"), "SELECT * FROM `users` WHERE (`name` = ?) AND (`age` > ?)");
//! ```
//!
//! ## Operations
//!
//! | OpKind   | filter              | set            | Output                          |
//! |----------|---------------------|----------------|---------------------------------|
//! | `Insert` | AND of EQ (payload) | unused         | `INSERT INTO %s (..) VALUES (..)` |
//! | `Query`  | predicate           | unused         | `SELECT * FROM %s WHERE ..`     |
//! | `Update` | predicate           | EQ / AND of EQ | `UPDATE %s SET .. WHERE ..`     |
//! | `Delete` | predicate           | unused         | `DELETE FROM %s WHERE ..`       |
//! | `Exec`   | RAW                 | unused         | the RAW text                    |
//!
//! Repeated compilations go through [`engine::CachedCompiler`], which keys a
//! shared [`cache::CompileCache`] on the structure of the trees.

pub mod ast;
pub mod cache;
pub mod config;
pub mod engine;
pub mod error;
pub mod transpiler;

pub mod prelude {
    pub use crate::ast::*;
    pub use crate::cache::{CacheConfig, CacheStats, CompileCache, SweepReport, SweeperHandle};
    pub use crate::config::Config;
    pub use crate::engine::CachedCompiler;
    pub use crate::error::*;
    pub use crate::transpiler::{
        CompiledQuery, Compiler, Dialect, DocumentCompiler, SqlCompiler, SqlGenerator,
    };
}
