//! Service for resolving tag-value filters to media ids.
//!
//! ## Resolution
//!
//! 1. Normalised values arrive from the query layer (trimmed, deduplicated)
//! 2. No values: the filter was not requested and the store is not queried
//! 3. Otherwise the store intersects: an item matches when every value is
//!    attached to it, in any category
//!
//! ## Error Handling
//!
//! A failed lookup is an error, never an empty match set. Reporting
//! "nothing matched" for a failed query would hand clients a wrong
//! `totalMatches` and end their pagination.

use std::sync::Arc;
use std::time::Instant;

use galleria_core::{MediaRepository, Result, TagFilter};
use tracing::{debug, error};

/// Resolves AND-combined tag values to a [`TagFilter`].
#[derive(Clone)]
pub struct TagResolver {
    repo: Arc<dyn MediaRepository>,
}

impl TagResolver {
    pub fn new(repo: Arc<dyn MediaRepository>) -> Self {
        Self { repo }
    }

    /// Resolve normalised tag values.
    pub async fn resolve(&self, values: &[String]) -> Result<TagFilter> {
        if values.is_empty() {
            return Ok(TagFilter::NotRequested);
        }

        let start = Instant::now();
        let ids = self.repo.resolve_ids_for_tags(values).await.map_err(|e| {
            error!(
                subsystem = "api",
                component = "tag_resolver",
                op = "resolve",
                tag_count = values.len(),
                error = %e,
                "Tag resolution failed"
            );
            e
        })?;

        let filter = TagFilter::from_ids(ids);
        debug!(
            subsystem = "api",
            component = "tag_resolver",
            op = "resolve",
            tag_count = values.len(),
            match_count = filter.total_matches().unwrap_or(0),
            duration_ms = start.elapsed().as_millis() as u64,
            "Resolved tag filter"
        );
        Ok(filter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use galleria_core::{Error, MediaKind};
    use galleria_db::{InMemoryMediaRepository, RepoOp};

    fn repo() -> InMemoryMediaRepository {
        let repo = InMemoryMediaRepository::new();
        let t = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        repo.insert_simple("m1", t, MediaKind::Image);
        repo.insert_simple("m2", t, MediaKind::Image);
        repo.tag("m1", "place", "beach");
        repo.tag("m1", "hair", "blonde");
        repo.tag("m2", "place", "beach");
        repo
    }

    #[tokio::test]
    async fn test_empty_values_skip_the_store() {
        let repo = repo();
        let resolver = TagResolver::new(Arc::new(repo.clone()));
        assert_eq!(resolver.resolve(&[]).await.unwrap(), TagFilter::NotRequested);
        assert_eq!(repo.call_count(RepoOp::ResolveIdsForTags), 0);
    }

    #[tokio::test]
    async fn test_matches_and_no_matches_are_distinct() {
        let resolver = TagResolver::new(Arc::new(repo()));

        let filter = resolver
            .resolve(&["beach".to_string(), "blonde".to_string()])
            .await
            .unwrap();
        assert_eq!(filter.total_matches(), Some(1));

        let filter = resolver.resolve(&["volcano".to_string()]).await.unwrap();
        assert_eq!(filter, TagFilter::NoMatches);
    }

    #[tokio::test]
    async fn test_store_failure_is_not_an_empty_match() {
        let repo = repo().failing_on(RepoOp::ResolveIdsForTags);
        let resolver = TagResolver::new(Arc::new(repo));
        let err = resolver.resolve(&["beach".to_string()]).await.unwrap_err();
        assert!(matches!(err, Error::Database(_)));
    }
}
