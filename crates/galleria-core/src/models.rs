//! Core data models for galleria.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::defaults::MAX_MEDIA_ID_LEN;
use crate::error::Error;

// =============================================================================
// MEDIA TYPES
// =============================================================================

/// Kind of a media item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Image,
    Video,
}

impl MediaKind {
    /// Wire/database representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaKind::Image => "image",
            MediaKind::Video => "video",
        }
    }

    /// Strict parse, used when validating rows from the backing store.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "image" => Some(MediaKind::Image),
            "video" => Some(MediaKind::Video),
            _ => None,
        }
    }

    /// Lenient parse of the `type` query parameter.
    ///
    /// Unknown values mean "no filter" so that newer clients sending kinds
    /// this server does not know about still get a listing.
    pub fn parse_filter(raw: Option<&str>) -> Option<Self> {
        let raw = raw?.trim().to_ascii_lowercase();
        Self::parse(&raw)
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Tags of one media item grouped by category, values sorted.
pub type GroupedTags = BTreeMap<String, Vec<String>>;

/// A media item as served to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaItem {
    pub id: String,
    pub created_at: DateTime<Utc>,
    /// Serialized as `type`, matching the filter parameter.
    #[serde(rename = "type")]
    pub kind: MediaKind,
    /// Display/source reference handed out by the media pipeline.
    pub src: String,
    pub thumbnail: Option<String>,
    /// Present only when tag data was fetched for this response.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub tags: Option<GroupedTags>,
}

/// Untyped row as returned by a backing store.
///
/// Rows are validated into [`MediaItem`] before they reach page assembly;
/// a row that fails validation is a backing-store failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaRow {
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub kind: String,
    pub src: String,
    pub thumbnail: Option<String>,
}

impl TryFrom<MediaRow> for MediaItem {
    type Error = Error;

    fn try_from(row: MediaRow) -> Result<Self, Self::Error> {
        if row.id.trim().is_empty() {
            return Err(Error::InvalidRow("media row has an empty id".to_string()));
        }
        if row.id.len() > MAX_MEDIA_ID_LEN {
            return Err(Error::InvalidRow(format!(
                "media id is {} bytes, longer than {}",
                row.id.len(),
                MAX_MEDIA_ID_LEN
            )));
        }
        let kind = MediaKind::parse(&row.kind).ok_or_else(|| {
            Error::InvalidRow(format!(
                "media {} has unknown kind '{}'",
                row.id, row.kind
            ))
        })?;
        if row.src.trim().is_empty() {
            return Err(Error::InvalidRow(format!(
                "media {} has an empty source reference",
                row.id
            )));
        }

        Ok(MediaItem {
            id: row.id,
            created_at: row.created_at,
            kind,
            src: row.src,
            thumbnail: row.thumbnail.filter(|t| !t.trim().is_empty()),
            tags: None,
        })
    }
}

// =============================================================================
// TAG TYPES
// =============================================================================

/// One tag attached to one media item. `(media_id, category, value)` is unique.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TagAssignment {
    pub media_id: String,
    pub category: String,
    pub value: String,
}

/// Usage count of one tag value within a category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TagCount {
    pub category: String,
    pub value: String,
    pub media_count: i64,
}

/// A value entry within a catalog category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagValueCount {
    pub value: String,
    pub count: i64,
}

/// All values of one tag category, as listed by the tag catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagCategory {
    pub category: String,
    pub values: Vec<TagValueCount>,
}

/// Group flat tag counts into categories, sorted by category then value.
pub fn build_tag_catalog(counts: Vec<TagCount>) -> Vec<TagCategory> {
    let mut grouped: BTreeMap<String, Vec<TagValueCount>> = BTreeMap::new();
    for c in counts {
        grouped.entry(c.category).or_default().push(TagValueCount {
            value: c.value,
            count: c.media_count,
        });
    }
    grouped
        .into_iter()
        .map(|(category, mut values)| {
            values.sort_by(|a, b| a.value.cmp(&b.value));
            TagCategory { category, values }
        })
        .collect()
}
