//! Document dialect tests.

use pretty_assertions::assert_eq;
use serde_json::json;
use std::collections::BTreeMap;

use crate::ast::*;
use crate::error::CondError;
use crate::transpiler::{Compiler, DocumentCompiler};

fn compile_json(
    op: OpKind,
    filter: Option<&ConditionNode>,
    set: Option<&ConditionNode>,
) -> serde_json::Value {
    let q = DocumentCompiler::new().compile(op, filter, set).unwrap();
    assert!(q.args.is_empty());
    serde_json::from_str(&q.template).unwrap()
}

#[test]
fn test_query_document() {
    let tree = cond().eq("name", "Tom").gt("age", 18).build();
    let q = DocumentCompiler::new()
        .compile(OpKind::Query, tree.as_ref(), None)
        .unwrap();
    assert_eq!(
        q.template,
        r#"{"filter":{"$and":[{"name":"Tom"},{"age":{"$gt":18}}]},"op":"query"}"#
    );
}

#[test]
fn test_query_without_filter() {
    assert_eq!(compile_json(OpKind::Query, None, None), json!({ "op": "query" }));
}

#[test]
fn test_insert_document() {
    let data = cond().eq("name", "Tom").eq("age", 20).build();
    assert_eq!(
        compile_json(OpKind::Insert, data.as_ref(), None),
        json!({ "op": "insert", "data": { "name": "Tom", "age": 20 } })
    );
}

#[test]
fn test_update_document() {
    let filter = ConditionNode::ne("status", "banned");
    let set = cond().eq("age", 21).eq("vip", true).build();
    assert_eq!(
        compile_json(OpKind::Update, Some(&filter), set.as_ref()),
        json!({
            "op": "update",
            "filter": { "status": { "$ne": "banned" } },
            "update": { "$set": { "age": 21, "vip": true } }
        })
    );
}

#[test]
fn test_update_requires_payload() {
    let err = DocumentCompiler::new()
        .compile(OpKind::Update, Some(&ConditionNode::eq("a", 1)), None)
        .unwrap_err();
    assert!(matches!(err, CondError::MalformedUpdatePayload(_)));
}

#[test]
fn test_delete_with_or_and_in() {
    let tree = ConditionNode::or([
        ConditionNode::is_in("role", ["admin", "user"]),
        ConditionNode::like("email", "%@x.com"),
        ConditionNode::and(Vec::<ConditionNode>::new()),
    ]);
    assert_eq!(
        compile_json(OpKind::Delete, Some(&tree), None),
        json!({
            "op": "delete",
            "filter": { "$or": [
                { "role": { "$in": ["admin", "user"] } },
                { "email": { "$like": "%@x.com" } }
            ] }
        })
    );
}

#[test]
fn test_empty_in_is_kept() {
    let tree = ConditionNode::is_in("id", Vec::<i64>::new());
    assert_eq!(
        compile_json(OpKind::Query, Some(&tree), None),
        json!({ "op": "query", "filter": { "id": { "$in": [] } } })
    );
}

#[test]
fn test_exec_raw_map() {
    let mut cmd = BTreeMap::new();
    cmd.insert("drop".to_string(), Value::from("users"));
    let raw = ConditionNode::raw_document(cmd);
    assert_eq!(
        compile_json(OpKind::Exec, Some(&raw), None),
        json!({ "op": "exec", "raw": { "drop": "users" } })
    );
}

#[test]
fn test_exec_rejects_string_raw() {
    let err = DocumentCompiler::new()
        .compile(OpKind::Exec, Some(&ConditionNode::raw("DROP TABLE t")), None)
        .unwrap_err();
    assert!(matches!(err, CondError::MalformedExecPayload(_)));
}

#[test]
fn test_raw_filter_fragment() {
    let mut frag = BTreeMap::new();
    frag.insert("$where".to_string(), Value::from("this.a > 1"));
    let tree = cond().eq("x", 1).raw_document(frag).raw("ignored").build();
    assert_eq!(
        compile_json(OpKind::Query, tree.as_ref(), None),
        json!({
            "op": "query",
            "filter": { "$and": [ { "x": 1 }, { "$where": "this.a > 1" } ] }
        })
    );
}
