//! One filter session
//!
//! A `FilterSession` owns everything a single visit to the listings page
//! needs: the listing snapshot, the criteria, the current page and the URL
//! scheduler. Every setter re-runs the evaluator synchronously, resets the
//! page and hands the new query string to the scheduler.

use serde::Deserialize;
use tracing::debug;

use crate::filter::codec;
use crate::filter::criteria::{FilterCriteria, ScalarKey, SelectionKey, DEFAULT_PRICE_MIN};
use crate::filter::pagination::{self, PageWindow};
use crate::filter::predicate;
use crate::filter::sync::{CommitToken, SyncScheduler};
use crate::listing::{Amenity, Category, Listing};

/// A user action on the filter sidebar
///
/// # Example
/// ```json
/// { "action": "toggleMember", "key": "propertyType", "value": "house" }
/// ```
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum Mutation {
    SetScalar { key: ScalarKey, value: String },
    SetPriceMin { value: f64 },
    SetPriceMax { value: f64 },
    ToggleMember { key: SelectionKey, value: String },
    ToggleAmenity { key: Amenity },
    Reset,
    Apply,
}

pub struct FilterSession {
    listings: Vec<Listing>,
    categories: Vec<Category>,
    criteria: FilterCriteria,
    current_page: usize,
    filtered: Vec<usize>,
    scheduler: SyncScheduler,
}

impl FilterSession {
    /// Opens a session, decoding `query` once
    ///
    /// The URL is never consulted again for the lifetime of the session.
    pub fn new(
        listings: Vec<Listing>,
        categories: Vec<Category>,
        query: &str,
        scheduler: SyncScheduler,
    ) -> Self {
        let criteria = codec::decode(query);
        let filtered = predicate::filter_indices(&listings, &criteria);
        Self {
            listings,
            categories,
            criteria,
            current_page: 1,
            filtered,
            scheduler,
        }
    }

    pub fn set_scalar(&mut self, key: ScalarKey, value: impl Into<String>) {
        self.criteria.set_scalar(key, value);
        self.mutated();
    }

    /// Sets the lower price bound; a non-finite value is treated as 0
    pub fn set_price_min(&mut self, value: f64) {
        self.criteria.price_min = finite_or_zero(value);
        self.mutated();
    }

    /// Sets the upper price bound; a non-finite value is treated as 0
    ///
    /// The range is not reordered: a maximum below the minimum matches nothing.
    pub fn set_price_max(&mut self, value: f64) {
        self.criteria.price_max = finite_or_zero(value);
        self.mutated();
    }

    pub fn toggle_member(&mut self, key: SelectionKey, value: &str) -> bool {
        let selected = self.criteria.toggle_member(key, value);
        self.mutated();
        selected
    }

    pub fn toggle_amenity(&mut self, amenity: Amenity) -> bool {
        let enabled = self.criteria.amenities.toggle(amenity);
        self.mutated();
        enabled
    }

    /// Restores the default criteria and page 1
    ///
    /// The bare path is pushed immediately; the usual debounced commit then
    /// follows like for any other change.
    pub fn reset(&mut self) {
        self.criteria = FilterCriteria::default();
        self.scheduler.commit_now("");
        self.mutated();
    }

    /// Pushes the current criteria to the URL without waiting for the debounce
    pub fn apply(&mut self) {
        let query = self.query();
        self.scheduler.commit_now(&query);
    }

    pub fn apply_mutation(&mut self, mutation: Mutation) {
        match mutation {
            Mutation::SetScalar { key, value } => self.set_scalar(key, value),
            Mutation::SetPriceMin { value } => self.set_price_min(value),
            Mutation::SetPriceMax { value } => self.set_price_max(value),
            Mutation::ToggleMember { key, value } => {
                self.toggle_member(key, &value);
            }
            Mutation::ToggleAmenity { key } => {
                self.toggle_amenity(key);
            }
            Mutation::Reset => self.reset(),
            Mutation::Apply => self.apply(),
        }
    }

    /// Moves to a page without touching the criteria or the URL
    ///
    /// Page 0 is raised to 1; pages past the end are kept and show an empty slice.
    pub fn go_to_page(&mut self, page: usize) {
        self.current_page = page.max(1);
    }

    pub fn next_page(&mut self) {
        if self.current_page < self.total_pages() {
            self.current_page += 1;
        }
    }

    pub fn previous_page(&mut self) {
        if self.current_page > 1 {
            self.current_page -= 1;
        }
    }

    /// Swaps in a fresh listing snapshot, e.g. once the initial fetch completes
    pub fn replace_listings(&mut self, listings: Vec<Listing>) {
        self.listings = listings;
        self.recompute();
    }

    pub fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn listings(&self) -> &[Listing] {
        &self.listings
    }

    pub fn filtered_listings(&self) -> Vec<&Listing> {
        self.filtered.iter().map(|index| &self.listings[*index]).collect()
    }

    pub fn filtered_count(&self) -> usize {
        self.filtered.len()
    }

    /// Listings on the current page
    pub fn page_slice(&self) -> Vec<&Listing> {
        pagination::page_slice(&self.filtered, self.current_page)
            .iter()
            .map(|index| &self.listings[*index])
            .collect()
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn total_pages(&self) -> usize {
        pagination::total_pages(self.filtered.len())
    }

    pub fn page_window(&self) -> PageWindow {
        PageWindow::new(self.current_page, self.total_pages())
    }

    pub fn active_filter_count(&self) -> usize {
        self.criteria.active_count()
    }

    /// Canonical query string for the current criteria
    pub fn query(&self) -> String {
        codec::encode(&self.criteria)
    }

    pub fn pending_commit(&self) -> Option<CommitToken> {
        self.scheduler.pending()
    }

    fn mutated(&mut self) {
        self.current_page = 1;
        self.recompute();
        let query = self.query();
        let token = self.scheduler.schedule(query);
        debug!(
            token = token.0,
            matches = self.filtered.len(),
            active = self.active_filter_count(),
            "filter criteria changed"
        );
    }

    fn recompute(&mut self) {
        self.filtered = predicate::filter_indices(&self.listings, &self.criteria);
    }
}

impl std::fmt::Debug for FilterSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FilterSession")
            .field("criteria", &self.criteria)
            .field("current_page", &self.current_page)
            .field("matches", &self.filtered.len())
            .field("scheduler", &self.scheduler)
            .finish()
    }
}

fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        DEFAULT_PRICE_MIN
    }
}
