use crate::transpiler::traits::{wrap_identifier, SqlGenerator};

pub struct MysqlGenerator;

impl SqlGenerator for MysqlGenerator {
    fn quote_identifier(&self, name: &str) -> String {
        wrap_identifier(name, '`')
    }

    fn placeholder(&self, _index: usize) -> String {
        "?".to_string()
    }
}
