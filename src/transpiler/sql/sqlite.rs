use super::super::traits::{wrap_identifier, SqlGenerator};

/// SQLite accepts MySQL-style backtick quoting, which keeps templates
/// identical between the two `?` dialects.
pub struct SqliteGenerator;

impl SqlGenerator for SqliteGenerator {
    fn quote_identifier(&self, id: &str) -> String {
        wrap_identifier(id, '`')
    }

    fn placeholder(&self, _index: usize) -> String {
        "?".to_string()
    }
}
