//! JSON document compiler for document-style backends.
//!
//! Emits one self-contained document per operation, e.g.
//! `{"filter":{"age":{"$gt":18}},"op":"query"}`. Arguments are embedded in
//! the document, so the argument list of the result is always empty.

use serde_json::{json, Map, Value as Json};

use crate::ast::*;
use crate::error::{CondError, CondResult};
use crate::transpiler::dml::insert::insert_payload;
use crate::transpiler::dml::update::update_payload;
use crate::transpiler::traits::Compiler;
use crate::transpiler::{CompiledQuery, Dialect};

#[derive(Debug, Clone, Copy)]
pub struct DocumentCompiler {
    dialect_id: u8,
}

impl Default for DocumentCompiler {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentCompiler {
    pub fn new() -> Self {
        Self {
            dialect_id: Dialect::Document.id(),
        }
    }

    /// Build the operation document without serializing it.
    pub fn build_document(
        &self,
        op: OpKind,
        filter: Option<&ConditionNode>,
        set: Option<&ConditionNode>,
    ) -> CondResult<Json> {
        let mut doc = Map::new();
        doc.insert("op".to_string(), Json::String(op.name().to_string()));

        match op {
            OpKind::Insert => {
                let fields = insert_payload(filter)?;
                doc.insert("data".to_string(), Json::Object(assignments(fields)));
            }
            OpKind::Query | OpKind::Delete | OpKind::Update => {
                // Payload first: a malformed update fails before any filter work.
                if op == OpKind::Update {
                    let fields = update_payload(set)?;
                    doc.insert("update".to_string(), json!({ "$set": assignments(fields) }));
                }
                if let Some(f) = filter.and_then(build_filter) {
                    doc.insert("filter".to_string(), f);
                }
            }
            OpKind::Exec => {
                let raw = filter.ok_or_else(|| CondError::exec("exec requires a RAW node"))?;
                if raw.op != CondOp::Raw {
                    return Err(CondError::exec(format!(
                        "exec only supports RAW nodes, got {}",
                        raw.op
                    )));
                }
                if raw.value.as_map().is_none() {
                    return Err(CondError::exec("exec RAW value must be a map"));
                }
                doc.insert("raw".to_string(), Json::from(&raw.value));
            }
        }

        Ok(Json::Object(doc))
    }
}

impl Compiler for DocumentCompiler {
    fn dialect_id(&self) -> u8 {
        self.dialect_id
    }

    fn compile(
        &self,
        op: OpKind,
        filter: Option<&ConditionNode>,
        set: Option<&ConditionNode>,
    ) -> CondResult<CompiledQuery> {
        tracing::trace!(%op, "compiling document");
        let doc = self.build_document(op, filter, set)?;
        Ok(CompiledQuery::new(serde_json::to_string(&doc)?, Vec::new()))
    }
}

fn assignments(fields: &[ConditionNode]) -> Map<String, Json> {
    fields
        .iter()
        .map(|f| (f.field.clone(), Json::from(&f.value)))
        .collect()
}

/// Convert a filter tree into a query document. Returns `None` for nodes
/// that contribute nothing (empty combinators, non-map RAW).
pub fn build_filter(node: &ConditionNode) -> Option<Json> {
    match node.op {
        CondOp::And | CondOp::Or => {
            let parts: Vec<Json> = node.children.iter().filter_map(build_filter).collect();
            if parts.is_empty() {
                return None;
            }
            let key = node.op.document_key()?;
            Some(json!({ key: parts }))
        }
        CondOp::Eq => Some(json!({ node.field.as_str(): Json::from(&node.value) })),
        CondOp::In => {
            let members: Vec<Json> = node.values.iter().map(Json::from).collect();
            Some(json!({ node.field.as_str(): { "$in": members } }))
        }
        CondOp::Ne | CondOp::Gt | CondOp::Gte | CondOp::Lt | CondOp::Lte | CondOp::Like => {
            let key = node.op.document_key()?;
            Some(json!({ node.field.as_str(): { key: Json::from(&node.value) } }))
        }
        CondOp::Raw => node.value.as_map().map(|_| Json::from(&node.value)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_operators() {
        let f = build_filter(&ConditionNode::gte("age", 18)).unwrap();
        assert_eq!(f, json!({ "age": { "$gte": 18 } }));
        let f = build_filter(&ConditionNode::eq("name", "Tom")).unwrap();
        assert_eq!(f, json!({ "name": "Tom" }));
    }

    #[test]
    fn test_empty_combinator_has_no_filter() {
        assert!(build_filter(&ConditionNode::or(Vec::<ConditionNode>::new())).is_none());
    }
}
