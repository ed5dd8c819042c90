//! Media repository implementation.

use std::time::Instant;

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{Pool, Postgres, Row};
use tracing::{debug, error};

use galleria_core::{
    Error, MediaRepository, MediaRow, PageQuery, Result, TagAssignment, TagCount,
};

const MEDIA_COLUMNS: &str = "m.id, m.created_at, m.kind, m.src, m.thumbnail";

/// PostgreSQL implementation of MediaRepository.
#[derive(Clone)]
pub struct PgMediaRepository {
    pool: Pool<Postgres>,
}

impl PgMediaRepository {
    /// Create a new PgMediaRepository with the given connection pool.
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

/// Build the page query for `query`.
///
/// Placeholders are numbered in the order [`fetch_page`] binds them:
/// allowed ids, kind, cursor timestamp, cursor id, limit.
///
/// [`fetch_page`]: MediaRepository::fetch_page
pub(crate) fn build_page_sql(query: &PageQuery) -> String {
    let mut sql = format!("SELECT {} FROM media m WHERE TRUE ", MEDIA_COLUMNS);
    let mut param_idx = 1;

    if query.allowed_ids.is_some() {
        sql.push_str(&format!("AND m.id = ANY(${}) ", param_idx));
        param_idx += 1;
    }
    if query.kind.is_some() {
        sql.push_str(&format!("AND m.kind = ${} ", param_idx));
        param_idx += 1;
    }
    if let Some(cursor) = &query.cursor {
        if cursor.id.is_some() {
            sql.push_str(&format!(
                "AND (m.created_at < ${ts} OR (m.created_at = ${ts} AND m.id COLLATE \"C\" < ${id})) ",
                ts = param_idx,
                id = param_idx + 1
            ));
            param_idx += 2;
        } else {
            sql.push_str(&format!("AND m.created_at < ${} ", param_idx));
            param_idx += 1;
        }
    }

    sql.push_str(&format!(
        "ORDER BY m.created_at DESC, m.id COLLATE \"C\" DESC LIMIT ${}",
        param_idx
    ));
    sql
}

fn map_row_to_media(row: PgRow) -> Result<MediaRow> {
    Ok(MediaRow {
        id: row.try_get("id")?,
        created_at: row.try_get("created_at")?,
        kind: row.try_get("kind")?,
        src: row.try_get("src")?,
        thumbnail: row.try_get("thumbnail")?,
    })
}

#[async_trait]
impl MediaRepository for PgMediaRepository {
    async fn resolve_ids_for_tags(&self, values: &[String]) -> Result<Vec<String>> {
        let start = Instant::now();

        // An item matches when it carries every requested value in any category.
        let ids: Vec<String> = sqlx::query_scalar(
            r#"
            SELECT media_id
            FROM media_tag
            WHERE value = ANY($1)
            GROUP BY media_id
            HAVING COUNT(DISTINCT value) = $2
            "#,
        )
        .bind(values)
        .bind(values.len() as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            error!(
                subsystem = "db",
                component = "media_repo",
                op = "resolve_ids_for_tags",
                error = %e,
                "Tag intersection query failed"
            );
            Error::Database(e)
        })?;

        debug!(
            subsystem = "db",
            component = "media_repo",
            op = "resolve_ids_for_tags",
            tag_count = values.len(),
            result_count = ids.len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Resolved tag intersection"
        );
        Ok(ids)
    }

    async fn fetch_page(&self, query: &PageQuery) -> Result<Vec<MediaRow>> {
        let start = Instant::now();
        let sql = build_page_sql(query);

        let mut q = sqlx::query(&sql);
        if let Some(ids) = &query.allowed_ids {
            q = q.bind(ids);
        }
        if let Some(kind) = query.kind {
            q = q.bind(kind.as_str());
        }
        if let Some(cursor) = &query.cursor {
            q = q.bind(cursor.created_at);
            if let Some(id) = &cursor.id {
                q = q.bind(id);
            }
        }
        q = q.bind(query.fetch_limit);

        let rows = q.fetch_all(&self.pool).await.map_err(|e| {
            error!(
                subsystem = "db",
                component = "media_repo",
                op = "fetch_page",
                error = %e,
                "Page query failed"
            );
            Error::Database(e)
        })?;

        let media = rows
            .into_iter()
            .map(map_row_to_media)
            .collect::<Result<Vec<_>>>()?;

        debug!(
            subsystem = "db",
            component = "media_repo",
            op = "fetch_page",
            fetch_limit = query.fetch_limit,
            result_count = media.len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Fetched page"
        );
        Ok(media)
    }

    async fn fetch_tags(&self, media_ids: &[String]) -> Result<Vec<TagAssignment>> {
        if media_ids.is_empty() {
            return Ok(Vec::new());
        }

        let rows = sqlx::query(
            r#"
            SELECT media_id, category, value
            FROM media_tag
            WHERE media_id = ANY($1)
            ORDER BY media_id, category, value
            "#,
        )
        .bind(media_ids)
        .fetch_all(&self.pool)
        .await
        .map_err(Error::Database)?;

        rows.into_iter()
            .map(|row| -> Result<TagAssignment> {
                Ok(TagAssignment {
                    media_id: row.try_get("media_id")?,
                    category: row.try_get("category")?,
                    value: row.try_get("value")?,
                })
            })
            .collect()
    }

    async fn get_item(&self, id: &str) -> Result<Option<MediaRow>> {
        let sql = format!("SELECT {} FROM media m WHERE m.id = $1", MEDIA_COLUMNS);
        let row = sqlx::query(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(Error::Database)?;

        row.map(map_row_to_media).transpose()
    }

    async fn list_tag_counts(&self) -> Result<Vec<TagCount>> {
        let rows = sqlx::query(
            r#"
            SELECT category, value, COUNT(DISTINCT media_id) AS media_count
            FROM media_tag
            GROUP BY category, value
            ORDER BY category, value
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(Error::Database)?;

        rows.into_iter()
            .map(|row| -> Result<TagCount> {
                Ok(TagCount {
                    category: row.try_get("category")?,
                    value: row.try_get("value")?,
                    media_count: row.try_get("media_count")?,
                })
            })
            .collect()
    }
}
