//! Condition tree AST.

pub mod builder;
pub mod node;
pub mod operators;
pub mod values;

pub use builder::{cond, CondBuilder};
pub use node::ConditionNode;
pub use operators::{CondOp, OpKind};
pub use values::Value;
