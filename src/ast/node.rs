use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::{CondOp, Value};

/// One node of a condition tree.
///
/// The same shape encodes filter predicates and mutation payloads: an
/// INSERT/UPDATE payload is an AND node whose children are EQ nodes, one per
/// assigned field. Trees are never mutated once handed to a compiler.
#[derive(Debug, Clone, PartialEq, Hash, Serialize, Deserialize)]
pub struct ConditionNode {
    pub op: CondOp,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub field: String,
    /// Comparison value, or the passthrough text/map of a RAW node.
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub value: Value,
    /// IN members, or the positional arguments of a RAW node.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub values: Vec<Value>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<ConditionNode>,
}

impl ConditionNode {
    fn leaf(op: CondOp, field: &str, value: Value) -> Self {
        Self {
            op,
            field: field.to_string(),
            value,
            values: Vec::new(),
            children: Vec::new(),
        }
    }

    fn combinator(op: CondOp, children: Vec<ConditionNode>) -> Self {
        Self {
            op,
            field: String::new(),
            value: Value::Null,
            values: Vec::new(),
            children,
        }
    }

    pub fn eq(field: &str, value: impl Into<Value>) -> Self {
        Self::leaf(CondOp::Eq, field, value.into())
    }

    pub fn ne(field: &str, value: impl Into<Value>) -> Self {
        Self::leaf(CondOp::Ne, field, value.into())
    }

    pub fn gt(field: &str, value: impl Into<Value>) -> Self {
        Self::leaf(CondOp::Gt, field, value.into())
    }

    pub fn gte(field: &str, value: impl Into<Value>) -> Self {
        Self::leaf(CondOp::Gte, field, value.into())
    }

    pub fn lt(field: &str, value: impl Into<Value>) -> Self {
        Self::leaf(CondOp::Lt, field, value.into())
    }

    pub fn lte(field: &str, value: impl Into<Value>) -> Self {
        Self::leaf(CondOp::Lte, field, value.into())
    }

    pub fn like(field: &str, pattern: &str) -> Self {
        Self::leaf(CondOp::Like, field, Value::String(pattern.to_string()))
    }

    pub fn is_in<V: Into<Value>>(field: &str, values: impl IntoIterator<Item = V>) -> Self {
        Self {
            values: values.into_iter().map(Into::into).collect(),
            ..Self::leaf(CondOp::In, field, Value::Null)
        }
    }

    pub fn and(children: impl IntoIterator<Item = ConditionNode>) -> Self {
        Self::combinator(CondOp::And, children.into_iter().collect())
    }

    pub fn or(children: impl IntoIterator<Item = ConditionNode>) -> Self {
        Self::combinator(CondOp::Or, children.into_iter().collect())
    }

    /// Raw SQL fragment, emitted verbatim. The caller is responsible for its safety.
    pub fn raw(sql: &str) -> Self {
        Self::leaf(CondOp::Raw, "", Value::String(sql.to_string()))
    }

    /// Raw SQL fragment with positional arguments for its own placeholders.
    pub fn raw_with_args<V: Into<Value>>(sql: &str, args: impl IntoIterator<Item = V>) -> Self {
        Self {
            values: args.into_iter().map(Into::into).collect(),
            ..Self::raw(sql)
        }
    }

    /// Raw document fragment for the document dialect.
    pub fn raw_document(doc: BTreeMap<String, Value>) -> Self {
        Self::leaf(CondOp::Raw, "", Value::Map(doc))
    }

    /// True for an AND node whose children are all EQ nodes (insert/update payload shape).
    pub fn is_assignment_list(&self) -> bool {
        self.op == CondOp::And
            && !self.children.is_empty()
            && self.children.iter().all(|c| c.op == CondOp::Eq)
    }

    /// Number of nodes in this tree, including itself.
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(ConditionNode::node_count).sum::<usize>()
    }
}
