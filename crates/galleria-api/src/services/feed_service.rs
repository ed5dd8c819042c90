//! Paginated feed and tag search.
//!
//! Both endpoints run the same pipeline: resolve the tag filter (if any),
//! fetch `limit + 1` rows after the cursor, trim to `limit` and derive the
//! next cursor from the last row kept. An empty tag intersection returns
//! an empty page without fetching.

use std::sync::Arc;
use std::time::Instant;

use galleria_core::{
    assemble_page, group_tags, AssembledPage, Error, FeedResponse, MediaItem, MediaKind,
    MediaRepository, PageCursor, PageLimit, PageQuery, Result, TagFilter,
};
use tracing::{debug, error};

use super::tag_resolver::TagResolver;

/// Which endpoint a request came through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedVariant {
    /// Plain listing; never reports `totalMatches`.
    Feed,
    /// Tag search; tags are required and `totalMatches` is always reported.
    Search,
}

/// Normalised request parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeedRequest {
    pub cursor: Option<PageCursor>,
    pub limit: PageLimit,
    pub kind: Option<MediaKind>,
    /// Trimmed, deduplicated, non-empty tag values.
    pub tags: Vec<String>,
}

#[derive(Clone)]
pub struct FeedService {
    repo: Arc<dyn MediaRepository>,
    resolver: TagResolver,
}

impl FeedService {
    pub fn new(repo: Arc<dyn MediaRepository>) -> Self {
        Self {
            resolver: TagResolver::new(repo.clone()),
            repo,
        }
    }

    /// Newest-first listing, optionally narrowed by kind and tags.
    pub async fn feed(&self, req: FeedRequest) -> Result<FeedResponse> {
        self.run(req, FeedVariant::Feed).await
    }

    /// Listing restricted to items carrying every requested tag.
    pub async fn search(&self, req: FeedRequest) -> Result<FeedResponse> {
        if req.tags.is_empty() {
            return Err(Error::InvalidInput(
                "tags parameter is required".to_string(),
            ));
        }
        self.run(req, FeedVariant::Search).await
    }

    /// One item with its tags grouped by category.
    pub async fn get_item(&self, id: &str) -> Result<MediaItem> {
        let row = self
            .repo
            .get_item(id)
            .await?
            .ok_or_else(|| Error::NotFound(format!("Media {} not found", id)))?;
        let mut item = MediaItem::try_from(row)?;

        let mut grouped = group_tags(self.repo.fetch_tags(&[item.id.clone()]).await?);
        item.tags = Some(grouped.remove(&item.id).unwrap_or_default());
        Ok(item)
    }

    async fn run(&self, req: FeedRequest, variant: FeedVariant) -> Result<FeedResponse> {
        let start = Instant::now();
        let filter = self.resolver.resolve(&req.tags).await?;
        let total_matches = match variant {
            FeedVariant::Search => Some(filter.total_matches().unwrap_or(0)),
            FeedVariant::Feed => None,
        };

        if filter == TagFilter::NoMatches {
            debug!(
                subsystem = "feed",
                component = "feed_service",
                op = "short_circuit",
                tag_count = req.tags.len(),
                "Tag filter matched nothing; skipping page fetch"
            );
            return Ok(FeedResponse::from_page(AssembledPage::empty(), total_matches));
        }

        let query = PageQuery {
            allowed_ids: filter.allowed_ids(),
            kind: req.kind,
            cursor: req.cursor,
            fetch_limit: req.limit.fetch_limit(),
        };

        let rows = self.repo.fetch_page(&query).await.map_err(|e| {
            error!(
                subsystem = "feed",
                component = "feed_service",
                op = "fetch_page",
                error = %e,
                "Page fetch failed"
            );
            e
        })?;
        let mut page = assemble_page(rows, req.limit)?;

        if variant == FeedVariant::Search && !page.items.is_empty() {
            self.attach_tags(&mut page.items).await?;
        }

        debug!(
            subsystem = "feed",
            component = "feed_service",
            op = "page",
            variant = ?variant,
            page_limit = req.limit.get(),
            result_count = page.items.len(),
            has_next_page = page.has_next_page,
            duration_ms = start.elapsed().as_millis() as u64,
            "Served page"
        );
        Ok(FeedResponse::from_page(page, total_matches))
    }

    async fn attach_tags(&self, items: &mut [MediaItem]) -> Result<()> {
        let ids: Vec<String> = items.iter().map(|i| i.id.clone()).collect();
        let mut grouped = group_tags(self.repo.fetch_tags(&ids).await?);
        for item in items.iter_mut() {
            item.tags = Some(grouped.remove(&item.id).unwrap_or_default());
        }
        Ok(())
    }
}
