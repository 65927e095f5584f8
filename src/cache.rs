//! Per-member Cache (`spec.md §4.K`).
//!
//! Keyed by `(document_path, member_id)`, backed by `dashmap` for lock-free
//! reads of already-computed entries and per-shard exclusion between
//! concurrent writers to distinct keys — `spec.md §5`'s concurrency
//! requirement without hand-rolled sharding. A `CacheEntry` is only ever
//! constructed once and swapped in whole, so no partial entry is ever
//! observable to a reader.

use crate::analysis::CacheEntry;
use dashmap::DashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

#[derive(Clone, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct MemberId(Arc<str>);

impl MemberId {
    pub fn new(id: impl Into<Arc<str>>) -> Self {
        MemberId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for MemberId {
    fn from(value: &str) -> Self {
        MemberId::new(value)
    }
}

type MemberKey = (PathBuf, MemberId);

#[derive(Clone, Copy, Debug, Default)]
pub struct CacheStatistics {
    pub entry_count: usize,
    pub hits: u64,
    pub misses: u64,
}

#[derive(Default)]
pub struct PerMemberCache {
    entries: DashMap<MemberKey, Arc<CacheEntry>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl PerMemberCache {
    pub fn new() -> Self {
        PerMemberCache::default()
    }

    /// Infallible: a miss is a value (`None`), never an error (`spec.md §7`).
    pub fn try_get(&self, document: &Path, member: &MemberId) -> Option<Arc<CacheEntry>> {
        let key: MemberKey = (document.to_path_buf(), member.clone());
        match self.entries.get(&key) {
            Some(entry) => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                crate::slice_log!("cache hit for {:?}:{}", document, member.as_str());
                Some(Arc::clone(&entry))
            }
            None => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                crate::slice_log!("cache miss for {:?}:{}", document, member.as_str());
                None
            }
        }
    }

    pub fn store(&self, document: PathBuf, member: MemberId, entry: CacheEntry) -> Arc<CacheEntry> {
        let entry = Arc::new(entry);
        self.entries.insert((document, member), Arc::clone(&entry));
        entry
    }

    pub fn invalidate_document(&self, document: &Path) {
        self.entries.retain(|(doc, _), _| doc != document);
        crate::slice_log!("invalidated cache entries for {:?}", document);
    }

    pub fn statistics(&self) -> CacheStatistics {
        CacheStatistics {
            entry_count: self.entries.len(),
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }
}
