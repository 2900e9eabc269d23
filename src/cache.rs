//! Compilation Cache Module
//!
//! Concurrent memoization of compiled statements, keyed by a structural
//! fingerprint of (dialect id, operation, filter tree, payload tree).
//! Entries keep their own copies of the keyed trees, so a fingerprint
//! collision is detected on lookup and reported as a miss.

use dashmap::DashMap;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};
use std::time::{Duration, Instant};
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

use crate::ast::{ConditionNode, OpKind};
use crate::transpiler::CompiledQuery;

/// Smallest period the background sweeper will tick at.
const MIN_SWEEP_INTERVAL: Duration = Duration::from_millis(10);

/// Cache configuration
#[derive(Debug, Clone, PartialEq)]
pub struct CacheConfig {
    pub enabled: bool,
    /// Entry lifetime. `None` keeps entries until evicted for being cold.
    pub ttl: Option<Duration>,
    pub sweep_interval: Duration,
    /// Size above which a sweep starts evicting cold entries.
    pub max_entries: usize,
    /// Entries with fewer hits than this are eviction candidates.
    pub min_hits: u64,
    /// Upper bound on cold entries removed per sweep.
    pub evict_batch: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            ttl: Some(Duration::from_secs(600)),
            sweep_interval: Duration::from_secs(60),
            max_entries: 10_000,
            min_hits: 2,
            evict_batch: 256,
        }
    }
}

#[derive(Debug)]
struct CacheEntry {
    dialect_id: u8,
    op: OpKind,
    filter: Option<ConditionNode>,
    set: Option<ConditionNode>,
    query: Arc<CompiledQuery>,
    expires_at: Option<Instant>,
    hits: AtomicU64,
}

impl CacheEntry {
    fn is_expired(&self, now: Instant) -> bool {
        self.expires_at.is_some_and(|at| now >= at)
    }

    fn matches(
        &self,
        dialect_id: u8,
        op: OpKind,
        filter: Option<&ConditionNode>,
        set: Option<&ConditionNode>,
    ) -> bool {
        self.dialect_id == dialect_id
            && self.op == op
            && self.filter.as_ref() == filter
            && self.set.as_ref() == set
    }
}

/// Thread-safe compilation cache with TTL and frequency-based eviction.
pub struct CompileCache {
    entries: DashMap<u64, CacheEntry>,
    config: CacheConfig,
    hits: AtomicU64,
    misses: AtomicU64,
    stores: AtomicU64,
}

impl Default for CompileCache {
    fn default() -> Self {
        Self::new(CacheConfig::default())
    }
}

impl CompileCache {
    pub fn new(config: CacheConfig) -> Self {
        Self {
            entries: DashMap::new(),
            config,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            stores: AtomicU64::new(0),
        }
    }

    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    pub fn is_enabled(&self) -> bool {
        self.config.enabled
    }

    fn fingerprint(
        dialect_id: u8,
        op: OpKind,
        filter: Option<&ConditionNode>,
        set: Option<&ConditionNode>,
    ) -> u64 {
        let mut hasher = DefaultHasher::new();
        dialect_id.hash(&mut hasher);
        op.hash(&mut hasher);
        filter.hash(&mut hasher);
        set.hash(&mut hasher);
        hasher.finish()
    }

    /// Fetch a previously compiled statement. Expired entries are dropped and
    /// reported as misses.
    pub fn lookup(
        &self,
        dialect_id: u8,
        op: OpKind,
        filter: Option<&ConditionNode>,
        set: Option<&ConditionNode>,
    ) -> Option<Arc<CompiledQuery>> {
        if !self.config.enabled {
            return None;
        }

        let key = Self::fingerprint(dialect_id, op, filter, set);
        let mut expired = false;

        if let Some(entry) = self.entries.get(&key) {
            if entry.is_expired(Instant::now()) {
                expired = true;
            } else if entry.matches(dialect_id, op, filter, set) {
                entry.hits.fetch_add(1, Ordering::Relaxed);
                self.hits.fetch_add(1, Ordering::Relaxed);
                tracing::debug!(key, dialect = dialect_id, %op, "compile cache hit");
                return Some(Arc::clone(&entry.query));
            }
        }

        if expired {
            // Re-check under the write lock: a racing store may have refreshed it.
            self.entries
                .remove_if(&key, |_, entry| entry.is_expired(Instant::now()));
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(key, dialect = dialect_id, %op, expired, "compile cache miss");
        None
    }

    /// Record a compiled statement. Racing stores for the same key: last write wins.
    pub fn store(
        &self,
        dialect_id: u8,
        op: OpKind,
        filter: Option<&ConditionNode>,
        set: Option<&ConditionNode>,
        query: Arc<CompiledQuery>,
    ) {
        if !self.config.enabled {
            return;
        }

        let key = Self::fingerprint(dialect_id, op, filter, set);
        let entry = CacheEntry {
            dialect_id,
            op,
            filter: filter.cloned(),
            set: set.cloned(),
            query,
            expires_at: self.config.ttl.map(|ttl| Instant::now() + ttl),
            hits: AtomicU64::new(0),
        };

        self.entries.insert(key, entry);
        self.stores.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(key, dialect = dialect_id, %op, "compile cache store");
    }

    /// Drop expired entries, then, if still over `max_entries`, drop up to
    /// `evict_batch` entries with fewer than `min_hits` hits.
    pub fn sweep(&self) -> SweepReport {
        let now = Instant::now();
        let mut expired = 0;
        self.entries.retain(|_, entry| {
            let keep = !entry.is_expired(now);
            if !keep {
                expired += 1;
            }
            keep
        });

        let mut evicted = 0;
        if self.entries.len() > self.config.max_entries {
            let victims: Vec<u64> = self
                .entries
                .iter()
                .filter(|entry| entry.hits.load(Ordering::Relaxed) < self.config.min_hits)
                .map(|entry| *entry.key())
                .take(self.config.evict_batch)
                .collect();

            for key in victims {
                if self.entries.remove(&key).is_some() {
                    evicted += 1;
                }
            }
        }

        let report = SweepReport {
            expired,
            evicted,
            remaining: self.entries.len(),
        };
        tracing::debug!(
            expired = report.expired,
            evicted = report.evicted,
            remaining = report.remaining,
            "compile cache sweep"
        );
        report
    }

    /// Start a background task that sweeps every `sweep_interval`.
    ///
    /// The task only holds a weak reference and exits once the cache is
    /// dropped or the returned handle is stopped or dropped.
    pub fn spawn_sweeper(self: &Arc<Self>) -> SweeperHandle {
        let cache: Weak<Self> = Arc::downgrade(self);
        let period = self.config.sweep_interval.max(MIN_SWEEP_INTERVAL);
        let (stop_tx, mut stop_rx) = oneshot::channel::<()>();

        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            // First tick completes immediately.
            ticker.tick().await;
            loop {
                tokio::select! {
                    _ = &mut stop_rx => break,
                    _ = ticker.tick() => {
                        let Some(cache) = cache.upgrade() else { break };
                        cache.sweep();
                    }
                }
            }
            tracing::debug!("compile cache sweeper stopped");
        });

        SweeperHandle {
            stop: stop_tx,
            task,
        }
    }

    pub fn clear(&self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            entries: self.entries.len(),
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            stores: self.stores.load(Ordering::Relaxed),
        }
    }
}

/// Outcome of one [`CompileCache::sweep`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SweepReport {
    pub expired: usize,
    pub evicted: usize,
    pub remaining: usize,
}

/// Handle to a running sweeper. Dropping it stops the task.
#[derive(Debug)]
pub struct SweeperHandle {
    stop: oneshot::Sender<()>,
    task: JoinHandle<()>,
}

impl SweeperHandle {
    /// Signal the sweeper and wait for it to exit.
    pub async fn stop(self) {
        let _ = self.stop.send(());
        let _ = self.task.await;
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

#[derive(Debug, Clone)]
pub struct CacheStats {
    pub entries: usize,
    pub hits: u64,
    pub misses: u64,
    pub stores: u64,
}

impl CacheStats {
    /// Hit rate as a percentage
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            (self.hits as f64 / total as f64) * 100.0
        }
    }
}
