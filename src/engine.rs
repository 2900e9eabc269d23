//! Cached compilation front-end.
//!
//! [`CachedCompiler`] pairs one [`Compiler`] with a shared [`CompileCache`].
//! Several compilers may share a cache; entries are partitioned by dialect id.

use std::sync::Arc;

use crate::ast::{ConditionNode, OpKind};
use crate::cache::CompileCache;
use crate::config::Config;
use crate::error::CondResult;
use crate::transpiler::{CompiledQuery, Compiler, Dialect};

pub struct CachedCompiler {
    compiler: Box<dyn Compiler>,
    cache: Arc<CompileCache>,
}

impl CachedCompiler {
    pub fn new(compiler: Box<dyn Compiler>, cache: Arc<CompileCache>) -> Self {
        Self { compiler, cache }
    }

    /// Built-in compiler for `dialect` with a shared cache.
    pub fn for_dialect(dialect: Dialect, cache: Arc<CompileCache>) -> Self {
        Self::new(dialect.compiler(), cache)
    }

    /// Compiler for the configured dialect with a fresh cache.
    pub fn from_config(config: &Config) -> CondResult<Self> {
        let cache = Arc::new(CompileCache::new(config.cache_config()));
        Ok(Self::for_dialect(config.dialect()?, cache))
    }

    pub fn dialect_id(&self) -> u8 {
        self.compiler.dialect_id()
    }

    pub fn cache(&self) -> &Arc<CompileCache> {
        &self.cache
    }

    /// Compile without touching the cache.
    pub fn compile(
        &self,
        op: OpKind,
        filter: Option<&ConditionNode>,
        set: Option<&ConditionNode>,
    ) -> CondResult<CompiledQuery> {
        self.compiler.compile(op, filter, set)
    }

    /// Return the cached statement, compiling and storing it on a miss.
    ///
    /// Errors are returned as-is and never cached. Two callers missing at
    /// the same time may both compile; both results are identical.
    pub fn compile_cached(
        &self,
        op: OpKind,
        filter: Option<&ConditionNode>,
        set: Option<&ConditionNode>,
    ) -> CondResult<Arc<CompiledQuery>> {
        let dialect_id = self.dialect_id();
        if let Some(hit) = self.cache.lookup(dialect_id, op, filter, set) {
            return Ok(hit);
        }

        let compiled = Arc::new(self.compiler.compile(op, filter, set)?);
        self.cache
            .store(dialect_id, op, filter, set, Arc::clone(&compiled));
        Ok(compiled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{cond, Value};
    use crate::cache::CacheConfig;
    use crate::error::CondError;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingCompiler {
        inner: Box<dyn Compiler>,
        calls: Arc<AtomicUsize>,
    }

    impl Compiler for CountingCompiler {
        fn dialect_id(&self) -> u8 {
            self.inner.dialect_id()
        }

        fn compile(
            &self,
            op: OpKind,
            filter: Option<&ConditionNode>,
            set: Option<&ConditionNode>,
        ) -> CondResult<CompiledQuery> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.inner.compile(op, filter, set)
        }
    }

    fn counting(dialect: Dialect, cache: Arc<CompileCache>) -> (CachedCompiler, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let compiler = CountingCompiler {
            inner: dialect.compiler(),
            calls: Arc::clone(&calls),
        };
        (CachedCompiler::new(Box::new(compiler), cache), calls)
    }

    #[test]
    fn test_compile_cached_compiles_once() {
        let (compiler, calls) = counting(Dialect::MySQL, Arc::new(CompileCache::default()));
        let tree = cond().eq("name", "Tom").gt("age", 18).build();

        let first = compiler
            .compile_cached(OpKind::Query, tree.as_ref(), None)
            .unwrap();
        let second = compiler
            .compile_cached(OpKind::Query, tree.as_ref(), None)
            .unwrap();

        assert_eq!(first, second);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(
            second.template,
            "SELECT * FROM %s WHERE (`name` = ?) AND (`age` > ?)"
        );
    }

    #[test]
    fn test_errors_are_not_cached() {
        let (compiler, calls) = counting(Dialect::MySQL, Arc::new(CompileCache::default()));
        let filter = cond().eq("id", 1).build();

        for _ in 0..2 {
            let err = compiler
                .compile_cached(OpKind::Update, filter.as_ref(), None)
                .unwrap_err();
            assert!(matches!(err, CondError::MalformedUpdatePayload(_)));
        }
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert!(compiler.cache().is_empty());
    }

    #[test]
    fn test_shared_cache_partitions_by_dialect() {
        let cache = Arc::new(CompileCache::default());
        let mysql = CachedCompiler::for_dialect(Dialect::MySQL, Arc::clone(&cache));
        let pg = CachedCompiler::for_dialect(Dialect::Postgres, Arc::clone(&cache));
        let tree = cond().eq("a", 1).build();

        let m = mysql.compile_cached(OpKind::Delete, tree.as_ref(), None).unwrap();
        let p = pg.compile_cached(OpKind::Delete, tree.as_ref(), None).unwrap();
        assert_eq!(m.template, "DELETE FROM %s WHERE (`a` = ?)");
        assert_eq!(p.template, "DELETE FROM %s WHERE (\"a\" = $1)");
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_update_payload_is_part_of_key() {
        let compiler = CachedCompiler::for_dialect(Dialect::MySQL, Arc::new(CompileCache::default()));
        let filter = cond().eq("name", "Tom").build();
        let age = cond().eq("age", 21).build();
        let email = cond().eq("email", "t@x.com").build();

        let a = compiler
            .compile_cached(OpKind::Update, filter.as_ref(), age.as_ref())
            .unwrap();
        let b = compiler
            .compile_cached(OpKind::Update, filter.as_ref(), email.as_ref())
            .unwrap();
        assert_eq!(a.template, "UPDATE %s SET `age`=? WHERE (`name` = ?)");
        assert_eq!(b.template, "UPDATE %s SET `email`=? WHERE (`name` = ?)");
        assert_eq!(b.args, vec![Value::from("t@x.com"), Value::from("Tom")]);
    }

    #[test]
    fn test_disabled_cache_still_compiles() {
        let cache = Arc::new(CompileCache::new(CacheConfig {
            enabled: false,
            ..CacheConfig::default()
        }));
        let (compiler, calls) = counting(Dialect::SQLite, cache);
        for _ in 0..3 {
            compiler.compile_cached(OpKind::Query, None, None).unwrap();
        }
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn test_from_config() {
        let config = Config {
            dialect: "document".to_string(),
            ..Config::default()
        };
        let compiler = CachedCompiler::from_config(&config).unwrap();
        assert_eq!(compiler.dialect_id(), Dialect::Document.id());
        let q = compiler.compile_cached(OpKind::Query, None, None).unwrap();
        assert_eq!(q.template, r#"{"op":"query"}"#);
    }

    #[test]
    fn test_concurrent_callers_agree() {
        let compiler = Arc::new(CachedCompiler::for_dialect(
            Dialect::Postgres,
            Arc::new(CompileCache::default()),
        ));
        let tree = Arc::new(cond().eq("a", 1).is_in("b", [1, 2]).build());

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let compiler = Arc::clone(&compiler);
                let tree = Arc::clone(&tree);
                std::thread::spawn(move || {
                    compiler
                        .compile_cached(OpKind::Query, (*tree).as_ref(), None)
                        .unwrap()
                })
            })
            .collect();

        let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        for r in &results {
            assert_eq!(
                r.template,
                "SELECT * FROM %s WHERE (\"a\" = $1) AND (\"b\" IN ($2,$3))"
            );
        }
        assert_eq!(compiler.cache().len(), 1);
    }
}
