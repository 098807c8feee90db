//! Request and response models for the HTTP API

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::filter::{FilterCriteria, PageItem};
use crate::filter::sync::{CommitToken, HistoryEntry};
use crate::listing::{Category, Listing};

/// Page selection, read alongside the filter keys of a search query
///
/// # Example
/// Query string: `?city=lisbon&propertyType=room&page=2`
#[derive(Deserialize, Debug, Default)]
pub struct PageParams {
    /// Page number, starts from 1; a missing or non-numeric value means 1
    #[serde(default, deserialize_with = "lenient_page")]
    pub page: Option<usize>,
}

fn lenient_page<'de, D>(deserializer: D) -> Result<Option<usize>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.and_then(|page| page.trim().parse().ok()))
}

/// Body for moving a session to another page
#[derive(Deserialize, Debug)]
pub struct PageRequest {
    pub page: usize,
}

/// One page of filtered listings
///
/// # Example
/// ```json
/// {
///   "page": 1,
///   "pageSize": 21,
///   "total": 25,
///   "totalPages": 2,
///   "activeFilters": 1,
///   "query": "city=lisbon",
///   "window": [{ "kind": "previous", "disabled": true }, ...],
///   "data": [...]
/// }
/// ```
#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse<'a> {
    pub page: usize,
    pub page_size: usize,
    pub total: usize,
    pub total_pages: usize,
    pub active_filters: usize,
    /// Canonical query string for the decoded criteria
    pub query: String,
    pub criteria: &'a FilterCriteria,
    pub window: Vec<PageItem>,
    pub data: Vec<&'a Listing>,
}

/// Snapshot of a live filter session
#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct SessionView<'a> {
    pub id: &'a str,
    pub created_at: DateTime<Utc>,
    /// Location the browser would show right now
    pub location: Option<String>,
    pub history_length: usize,
    pub navigations: Vec<HistoryEntry>,
    pub pending_commit: Option<CommitToken>,
    pub categories: &'a [Category],
    #[serde(flatten)]
    pub results: SearchResponse<'a>,
}

/// Outcome of a bulk import
#[derive(Serialize, Debug)]
pub struct ImportResponse {
    pub imported: usize,
}
