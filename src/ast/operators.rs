use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::CondError;

/// Condition operator of a [`ConditionNode`](super::ConditionNode).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CondOp {
    Eq,
    Ne,
    Gt,
    Gte,
    Lt,
    Lte,
    Like,
    In,
    And,
    Or,
    Raw,
}

impl CondOp {
    /// SQL symbol for binary comparison operators.
    pub fn sql_symbol(&self) -> Option<&'static str> {
        match self {
            CondOp::Eq => Some("="),
            CondOp::Ne => Some("<>"),
            CondOp::Gt => Some(">"),
            CondOp::Gte => Some(">="),
            CondOp::Lt => Some("<"),
            CondOp::Lte => Some("<="),
            CondOp::Like => Some("LIKE"),
            _ => None,
        }
    }

    /// Document-store comparison key. EQ has none: it maps to `{field: value}`.
    pub fn document_key(&self) -> Option<&'static str> {
        match self {
            CondOp::Ne => Some("$ne"),
            CondOp::Gt => Some("$gt"),
            CondOp::Gte => Some("$gte"),
            CondOp::Lt => Some("$lt"),
            CondOp::Lte => Some("$lte"),
            CondOp::Like => Some("$like"),
            CondOp::In => Some("$in"),
            CondOp::And => Some("$and"),
            CondOp::Or => Some("$or"),
            _ => None,
        }
    }

    pub fn is_combinator(&self) -> bool {
        matches!(self, CondOp::And | CondOp::Or)
    }
}

impl std::fmt::Display for CondOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            CondOp::Eq => "EQ",
            CondOp::Ne => "NE",
            CondOp::Gt => "GT",
            CondOp::Gte => "GTE",
            CondOp::Lt => "LT",
            CondOp::Lte => "LTE",
            CondOp::Like => "LIKE",
            CondOp::In => "IN",
            CondOp::And => "AND",
            CondOp::Or => "OR",
            CondOp::Raw => "RAW",
        };
        write!(f, "{}", s)
    }
}

/// The operation a tree is compiled for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OpKind {
    Insert,
    Query,
    Update,
    Delete,
    Exec,
}

impl OpKind {
    pub const ALL: [OpKind; 5] = [
        OpKind::Insert,
        OpKind::Query,
        OpKind::Update,
        OpKind::Delete,
        OpKind::Exec,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            OpKind::Insert => "insert",
            OpKind::Query => "query",
            OpKind::Update => "update",
            OpKind::Delete => "delete",
            OpKind::Exec => "exec",
        }
    }
}

impl std::fmt::Display for OpKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            OpKind::Insert => "Insert",
            OpKind::Query => "Query",
            OpKind::Update => "Update",
            OpKind::Delete => "Delete",
            OpKind::Exec => "Exec",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for OpKind {
    type Err = CondError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        OpKind::ALL
            .into_iter()
            .find(|op| op.name() == lower)
            .ok_or_else(|| CondError::UnsupportedOperation(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_op_kind_parse() {
        assert_eq!("Query".parse::<OpKind>().unwrap(), OpKind::Query);
        assert_eq!(" exec ".parse::<OpKind>().unwrap(), OpKind::Exec);
        let err = "merge".parse::<OpKind>().unwrap_err();
        assert!(matches!(err, CondError::UnsupportedOperation(ref s) if s == "merge"));
    }

    #[test]
    fn test_cond_op_serde_names() {
        assert_eq!(serde_json::to_string(&CondOp::Gte).unwrap(), "\"GTE\"");
        let op: CondOp = serde_json::from_str("\"LIKE\"").unwrap();
        assert_eq!(op, CondOp::Like);
    }

    #[test]
    fn test_symbols() {
        assert_eq!(CondOp::Ne.sql_symbol(), Some("<>"));
        assert_eq!(CondOp::In.sql_symbol(), None);
        assert_eq!(CondOp::Eq.document_key(), None);
        assert_eq!(CondOp::Or.document_key(), Some("$or"));
    }
}
