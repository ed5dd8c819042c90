//! In-memory media repository for deterministic testing.
//!
//! Orders, filters and intersects exactly like [`PgMediaRepository`], records
//! every call so tests can assert which round trips happened, and can be
//! told to fail specific operations.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use galleria_db::memory::{InMemoryMediaRepository, RepoOp};
//!
//! let repo = InMemoryMediaRepository::new()
//!     .with_item(row)
//!     .with_tag("m1", "place", "beach");
//! assert_eq!(repo.call_count(RepoOp::FetchPage), 0);
//! ```
//!
//! [`PgMediaRepository`]: crate::PgMediaRepository

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::{Arc, Mutex, RwLock};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tracing::trace;

use galleria_core::{
    Error, MediaKind, MediaRepository, MediaRow, PageQuery, Result, TagAssignment, TagCount,
};

/// Repository operations, for call accounting and failure injection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RepoOp {
    ResolveIdsForTags,
    FetchPage,
    FetchTags,
    GetItem,
    ListTagCounts,
}

#[derive(Default)]
struct MemoryState {
    media: Vec<MediaRow>,
    tags: Vec<TagAssignment>,
}

/// Vector-backed [`MediaRepository`].
#[derive(Clone, Default)]
pub struct InMemoryMediaRepository {
    state: Arc<RwLock<MemoryState>>,
    calls: Arc<Mutex<Vec<RepoOp>>>,
    failing: Arc<Mutex<HashSet<RepoOp>>>,
}

impl InMemoryMediaRepository {
    /// Create an empty repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an item.
    pub fn with_item(self, row: MediaRow) -> Self {
        self.insert(row);
        self
    }

    /// Add a tag assignment.
    pub fn with_tag(self, media_id: &str, category: &str, value: &str) -> Self {
        self.tag(media_id, category, value);
        self
    }

    /// Make every call of `op` fail with a database error.
    pub fn failing_on(self, op: RepoOp) -> Self {
        self.set_failing(op, true);
        self
    }

    /// Insert or replace an item.
    pub fn insert(&self, row: MediaRow) {
        let mut state = self.state.write().unwrap_or_else(|e| e.into_inner());
        state.media.retain(|m| m.id != row.id);
        state.media.push(row);
    }

    /// Add a simple item of `kind` created at `created_at`.
    pub fn insert_simple(&self, id: &str, created_at: DateTime<Utc>, kind: MediaKind) {
        self.insert(MediaRow {
            id: id.to_string(),
            created_at,
            kind: kind.as_str().to_string(),
            src: format!("https://media.example/{}", id),
            thumbnail: Some(format!("https://media.example/{}/thumb", id)),
        });
    }

    /// Attach a tag; duplicate `(item, category, value)` triples are ignored.
    pub fn tag(&self, media_id: &str, category: &str, value: &str) {
        let assignment = TagAssignment {
            media_id: media_id.to_string(),
            category: category.to_string(),
            value: value.to_string(),
        };
        let mut state = self.state.write().unwrap_or_else(|e| e.into_inner());
        if !state.tags.contains(&assignment) {
            state.tags.push(assignment);
        }
    }

    /// Toggle failure injection for `op`.
    pub fn set_failing(&self, op: RepoOp, failing: bool) {
        let mut set = self.failing.lock().unwrap_or_else(|e| e.into_inner());
        if failing {
            set.insert(op);
        } else {
            set.remove(&op);
        }
    }

    /// Number of times `op` was invoked.
    pub fn call_count(&self, op: RepoOp) -> usize {
        self.calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .iter()
            .filter(|c| **c == op)
            .count()
    }

    /// Every call made so far, in order.
    pub fn calls(&self) -> Vec<RepoOp> {
        self.calls.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    fn record(&self, op: RepoOp) -> Result<()> {
        self.calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(op);
        let failing = self.failing.lock().unwrap_or_else(|e| e.into_inner());
        if failing.contains(&op) {
            return Err(Error::Database(sqlx::Error::PoolTimedOut));
        }
        Ok(())
    }
}

#[async_trait]
impl MediaRepository for InMemoryMediaRepository {
    async fn resolve_ids_for_tags(&self, values: &[String]) -> Result<Vec<String>> {
        self.record(RepoOp::ResolveIdsForTags)?;
        let wanted: HashSet<&str> = values.iter().map(String::as_str).collect();

        let state = self.state.read().unwrap_or_else(|e| e.into_inner());
        let mut present: HashMap<&str, HashSet<&str>> = HashMap::new();
        for t in &state.tags {
            if wanted.contains(t.value.as_str()) {
                present
                    .entry(t.media_id.as_str())
                    .or_default()
                    .insert(t.value.as_str());
            }
        }

        Ok(present
            .into_iter()
            .filter(|(_, found)| found.len() == wanted.len())
            .map(|(id, _)| id.to_string())
            .collect())
    }

    async fn fetch_page(&self, query: &PageQuery) -> Result<Vec<MediaRow>> {
        self.record(RepoOp::FetchPage)?;
        let allowed: Option<HashSet<&str>> = query
            .allowed_ids
            .as_ref()
            .map(|ids| ids.iter().map(String::as_str).collect());

        let state = self.state.read().unwrap_or_else(|e| e.into_inner());
        let mut rows: Vec<MediaRow> = state
            .media
            .iter()
            .filter(|m| allowed.as_ref().map_or(true, |a| a.contains(m.id.as_str())))
            .filter(|m| query.kind.map_or(true, |k| m.kind == k.as_str()))
            .filter(|m| query.is_after_cursor(m))
            .cloned()
            .collect();

        rows.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.as_bytes().cmp(a.id.as_bytes()))
        });
        rows.truncate(query.fetch_limit.max(0) as usize);

        trace!(
            subsystem = "db",
            component = "memory_repo",
            op = "fetch_page",
            result_count = rows.len(),
            "Fetched page"
        );
        Ok(rows)
    }

    async fn fetch_tags(&self, media_ids: &[String]) -> Result<Vec<TagAssignment>> {
        self.record(RepoOp::FetchTags)?;
        let ids: HashSet<&str> = media_ids.iter().map(String::as_str).collect();
        let state = self.state.read().unwrap_or_else(|e| e.into_inner());
        Ok(state
            .tags
            .iter()
            .filter(|t| ids.contains(t.media_id.as_str()))
            .cloned()
            .collect())
    }

    async fn get_item(&self, id: &str) -> Result<Option<MediaRow>> {
        self.record(RepoOp::GetItem)?;
        let state = self.state.read().unwrap_or_else(|e| e.into_inner());
        Ok(state.media.iter().find(|m| m.id == id).cloned())
    }

    async fn list_tag_counts(&self) -> Result<Vec<TagCount>> {
        self.record(RepoOp::ListTagCounts)?;
        let state = self.state.read().unwrap_or_else(|e| e.into_inner());
        let mut counts: BTreeMap<(String, String), HashSet<&str>> = BTreeMap::new();
        for t in &state.tags {
            counts
                .entry((t.category.clone(), t.value.clone()))
                .or_default()
                .insert(t.media_id.as_str());
        }
        Ok(counts
            .into_iter()
            .map(|((category, value), items)| TagCount {
                category,
                value,
                media_count: items.len() as i64,
            })
            .collect())
    }
}
