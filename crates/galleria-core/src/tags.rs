//! Tag list parsing and tag-filter state.

use std::collections::{BTreeSet, HashMap, HashSet};

use crate::models::{GroupedTags, TagAssignment};

/// Parse a comma-separated tag list.
///
/// Values are trimmed, empty entries dropped and duplicates removed while
/// keeping the first occurrence's position. Matching is exact, so `Beach`
/// and `beach` are distinct values.
pub fn normalize_tags(raw: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .filter(|s| seen.insert(*s))
        .map(String::from)
        .collect()
}

/// Outcome of tag-filter resolution for one request.
///
/// "No filter" and "filter matched nothing" are separate states: the first
/// lists everything, the second returns an empty page without touching
/// the backing store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagFilter {
    /// The client did not ask for a tag filter.
    NotRequested,
    /// The filter matched these item ids (never empty).
    Matched(BTreeSet<String>),
    /// The filter was requested and matched no item.
    NoMatches,
}

impl TagFilter {
    /// Build from resolver output, deduplicating ids.
    pub fn from_ids<I>(ids: I) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        let set: BTreeSet<String> = ids.into_iter().collect();
        if set.is_empty() {
            TagFilter::NoMatches
        } else {
            TagFilter::Matched(set)
        }
    }

    /// Identifier allowlist to apply, if any.
    pub fn allowed_ids(&self) -> Option<Vec<String>> {
        match self {
            TagFilter::Matched(ids) => Some(ids.iter().cloned().collect()),
            TagFilter::NotRequested | TagFilter::NoMatches => None,
        }
    }

    /// Cardinality of the full match set; `None` when no filter was requested.
    pub fn total_matches(&self) -> Option<usize> {
        match self {
            TagFilter::NotRequested => None,
            TagFilter::Matched(ids) => Some(ids.len()),
            TagFilter::NoMatches => Some(0),
        }
    }

    pub fn is_requested(&self) -> bool {
        !matches!(self, TagFilter::NotRequested)
    }
}

/// Group tag assignments by media id, then by category. Values are sorted
/// and deduplicated within each category.
pub fn group_tags(assignments: Vec<TagAssignment>) -> HashMap<String, GroupedTags> {
    let mut by_item: HashMap<String, GroupedTags> = HashMap::new();
    for a in assignments {
        by_item
            .entry(a.media_id)
            .or_default()
            .entry(a.category)
            .or_default()
            .push(a.value);
    }
    for grouped in by_item.values_mut() {
        for values in grouped.values_mut() {
            values.sort();
            values.dedup();
        }
    }
    by_item
}
