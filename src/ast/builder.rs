//! Fluent builder for condition trees.
//!
//! Each comparison appends a leaf to an implicit top-level list; `and`/`or`
//! flatten other builders' lists into one combinator node; `build` collapses
//! the list into a single tree.

use std::collections::BTreeMap;

use super::{ConditionNode, Value};

#[derive(Debug, Clone, Default)]
pub struct CondBuilder {
    nodes: Vec<ConditionNode>,
}

impl CondBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(mut self, node: ConditionNode) -> Self {
        self.nodes.push(node);
        self
    }

    pub fn eq(self, field: &str, value: impl Into<Value>) -> Self {
        self.push(ConditionNode::eq(field, value))
    }

    pub fn ne(self, field: &str, value: impl Into<Value>) -> Self {
        self.push(ConditionNode::ne(field, value))
    }

    pub fn gt(self, field: &str, value: impl Into<Value>) -> Self {
        self.push(ConditionNode::gt(field, value))
    }

    pub fn gte(self, field: &str, value: impl Into<Value>) -> Self {
        self.push(ConditionNode::gte(field, value))
    }

    pub fn lt(self, field: &str, value: impl Into<Value>) -> Self {
        self.push(ConditionNode::lt(field, value))
    }

    pub fn lte(self, field: &str, value: impl Into<Value>) -> Self {
        self.push(ConditionNode::lte(field, value))
    }

    pub fn like(self, field: &str, pattern: &str) -> Self {
        self.push(ConditionNode::like(field, pattern))
    }

    pub fn is_in<V: Into<Value>>(self, field: &str, values: impl IntoIterator<Item = V>) -> Self {
        self.push(ConditionNode::is_in(field, values))
    }

    /// Append an AND over the top-level nodes of every given builder.
    pub fn and(self, conds: impl IntoIterator<Item = CondBuilder>) -> Self {
        let children = conds.into_iter().flat_map(|c| c.nodes);
        self.push(ConditionNode::and(children))
    }

    /// Append an OR over the top-level nodes of every given builder.
    pub fn or(self, conds: impl IntoIterator<Item = CondBuilder>) -> Self {
        let children = conds.into_iter().flat_map(|c| c.nodes);
        self.push(ConditionNode::or(children))
    }

    pub fn raw(self, sql: &str) -> Self {
        self.push(ConditionNode::raw(sql))
    }

    pub fn raw_with_args<V: Into<Value>>(self, sql: &str, args: impl IntoIterator<Item = V>) -> Self {
        self.push(ConditionNode::raw_with_args(sql, args))
    }

    pub fn raw_document(self, doc: BTreeMap<String, Value>) -> Self {
        self.push(ConditionNode::raw_document(doc))
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Collapse into a tree: nothing yields `None`, one node is returned as is,
    /// several are wrapped in an implicit AND.
    pub fn build(mut self) -> Option<ConditionNode> {
        match self.nodes.len() {
            0 => None,
            1 => self.nodes.pop(),
            _ => Some(ConditionNode::and(self.nodes)),
        }
    }
}

/// Start a new condition builder.
pub fn cond() -> CondBuilder {
    CondBuilder::new()
}
