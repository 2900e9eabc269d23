use crate::ast::*;
use super::traits::SqlGenerator;

/// Context for parameterized query building.
#[derive(Debug, Default)]
pub struct ParamContext {
    /// Current parameter index (1-based for Postgres $1, $2, etc.)
    pub index: usize,
    /// Collected parameter values in order
    pub params: Vec<Value>,
}

impl ParamContext {
    pub fn new() -> Self {
        Self { index: 0, params: Vec::new() }
    }

    /// Add a value and return the placeholder for it.
    pub fn add_param(&mut self, value: Value, generator: &dyn SqlGenerator) -> String {
        self.index += 1;
        self.params.push(value);
        generator.placeholder(self.index)
    }

    /// Record values bound by placeholders the caller wrote itself (RAW fragments).
    pub fn add_opaque(&mut self, values: &[Value]) {
        self.index += values.len();
        self.params.extend_from_slice(values);
    }
}

/// Build the WHERE body for a filter tree, or an empty string if it has no content.
///
/// A combinator root is emitted as-is; any other root is treated as a
/// one-element conjunction, so every top-level term ends up parenthesized.
pub fn build_filter(
    node: &ConditionNode,
    generator: &dyn SqlGenerator,
    params: &mut ParamContext,
) -> String {
    if node.op.is_combinator() {
        build_where(node, generator, params)
    } else {
        join_children(std::slice::from_ref(node), " AND ", generator, params)
    }
}

/// Recursively convert a condition node to SQL, pushing its values into `params`
/// in emission order.
pub fn build_where(
    node: &ConditionNode,
    generator: &dyn SqlGenerator,
    params: &mut ParamContext,
) -> String {
    match node.op {
        CondOp::And => join_children(&node.children, " AND ", generator, params),
        CondOp::Or => join_children(&node.children, " OR ", generator, params),
        CondOp::Eq | CondOp::Ne | CondOp::Gt | CondOp::Gte | CondOp::Lt | CondOp::Lte | CondOp::Like => {
            let symbol = node.op.sql_symbol().unwrap_or("=");
            let col = generator.quote_identifier(&node.field);
            let placeholder = params.add_param(node.value.clone(), generator);
            format!("{} {} {}", col, symbol, placeholder)
        }
        CondOp::In => {
            if node.values.is_empty() {
                return "1=0".to_string();
            }
            let placeholders: Vec<String> = node
                .values
                .iter()
                .map(|v| params.add_param(v.clone(), generator))
                .collect();
            format!(
                "{} IN ({})",
                generator.quote_identifier(&node.field),
                placeholders.join(",")
            )
        }
        CondOp::Raw => match node.value.as_str() {
            Some(sql) if !sql.is_empty() => {
                params.add_opaque(&node.values);
                sql.to_string()
            }
            // Nothing emitted, so nothing may be bound.
            _ => String::new(),
        },
    }
}

fn join_children(
    children: &[ConditionNode],
    sep: &str,
    generator: &dyn SqlGenerator,
    params: &mut ParamContext,
) -> String {
    let mut sql = String::new();
    for child in children {
        let part = build_where(child, generator, params);
        if part.is_empty() {
            continue;
        }
        if !sql.is_empty() {
            sql.push_str(sep);
        }
        sql.push('(');
        sql.push_str(&part);
        sql.push(')');
    }
    sql
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transpiler::sql::mysql::MysqlGenerator;
    use crate::transpiler::sql::postgres::PostgresGenerator;

    fn where_of(node: &ConditionNode, generator: &dyn SqlGenerator) -> (String, Vec<Value>) {
        let mut params = ParamContext::new();
        let sql = build_filter(node, generator, &mut params);
        (sql, params.params)
    }

    #[test]
    fn test_nested_or_inside_and() {
        let tree = ConditionNode::and([
            ConditionNode::eq("a", 1),
            ConditionNode::or([ConditionNode::lt("b", 2), ConditionNode::like("c", "%x")]),
        ]);
        let (sql, args) = where_of(&tree, &MysqlGenerator);
        assert_eq!(sql, "(`a` = ?) AND ((`b` < ?) OR (`c` LIKE ?))");
        assert_eq!(args, vec![Value::Int(1), Value::Int(2), Value::from("%x")]);
    }

    #[test]
    fn test_empty_in_is_false_without_args() {
        let tree = ConditionNode::is_in("id", Vec::<i64>::new());
        let (sql, args) = where_of(&tree, &PostgresGenerator);
        assert_eq!(sql, "(1=0)");
        assert!(args.is_empty());
    }

    #[test]
    fn test_empty_combinators_vanish() {
        let tree = ConditionNode::and([
            ConditionNode::or(Vec::<ConditionNode>::new()),
            ConditionNode::and([ConditionNode::and(Vec::<ConditionNode>::new())]),
        ]);
        let (sql, args) = where_of(&tree, &MysqlGenerator);
        assert_eq!(sql, "");
        assert!(args.is_empty());
    }

    #[test]
    fn test_raw_args_shift_numbering() {
        let tree = ConditionNode::and([
            ConditionNode::raw_with_args("age BETWEEN $1 AND $2", [18, 30]),
            ConditionNode::ne("name", "x"),
        ]);
        let (sql, args) = where_of(&tree, &PostgresGenerator);
        assert_eq!(sql, "(age BETWEEN $1 AND $2) AND (\"name\" <> $3)");
        assert_eq!(args.len(), 3);
    }

    #[test]
    fn test_non_string_raw_is_skipped() {
        let tree = ConditionNode::and([
            ConditionNode::raw_document(Default::default()),
            ConditionNode::gte("n", 1),
        ]);
        let (sql, args) = where_of(&tree, &MysqlGenerator);
        assert_eq!(sql, "(`n` >= ?)");
        assert_eq!(args, vec![Value::Int(1)]);
    }
}
