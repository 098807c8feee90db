//! Faceted property filter & search engine
//!
//! - [`criteria`] — the filter selection and its defaults
//! - [`codec`] — criteria ⇄ query string
//! - [`predicate`] — listing inclusion test and set-level filter
//! - [`pagination`] — page slicing and the page-number window
//! - [`sync`] — debounced URL commits
//! - [`session`] — the pipeline tying the above together for one visit

pub mod codec;
pub mod criteria;
pub mod pagination;
pub mod predicate;
pub mod session;
pub mod sync;

pub use criteria::{FilterCriteria, ScalarKey, SelectionKey};
pub use pagination::{PageItem, PageWindow, PAGE_SIZE};
pub use session::{FilterSession, Mutation};
pub use sync::{HistoryNavigator, Navigation, Navigator, SyncScheduler, DEBOUNCE};
