//! Listing store and shared application state
//!
//! The embedded redb database plays the role of the listing and category
//! sources: it is read whole on every search and every new session, and
//! filled through the import endpoints.

use redb::{Database, ReadableDatabase, ReadableTable, TableDefinition};
use std::sync::Arc;
use tracing::{info, warn};

use crate::config::Config;
use crate::error::StoreError;
use crate::listing::{Category, Listing};
use crate::sessions::SessionStore;

/// Listings keyed by listing id
///
/// Value: JSON-serialized [`Listing`]
pub const TABLE_LISTINGS: TableDefinition<&str, &str> = TableDefinition::new("listings_v1");

/// Categories keyed by category id
///
/// Value: JSON-serialized [`Category`]
pub const TABLE_CATEGORIES: TableDefinition<&str, &str> = TableDefinition::new("categories_v1");

/// Application state shared across all request handlers
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<Database>,
    pub sessions: SessionStore,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(db: Database, config: Config) -> Self {
        Self {
            db: Arc::new(db),
            sessions: SessionStore::new(config.session_ttl),
            config: Arc::new(config),
        }
    }
}

/// Creates or opens the database file and makes sure both tables exist
///
/// ```no_run
/// # use flatmate_search::database::init_db;
/// let db = init_db("data.db").expect("Failed to initialize database");
/// ```
pub fn init_db(db_path: &str) -> Result<Database, redb::Error> {
    let db = Database::create(db_path)?;

    let write_txn = db.begin_write()?;
    {
        write_txn.open_table(TABLE_LISTINGS)?;
        write_txn.open_table(TABLE_CATEGORIES)?;
    }
    write_txn.commit()?;

    Ok(db)
}

/// Every stored listing, in key order
///
/// Records that no longer deserialize are skipped with a warning.
pub fn fetch_listings(db: &Database) -> Result<Vec<Listing>, StoreError> {
    let read_txn = db.begin_read()?;
    let table = read_txn.open_table(TABLE_LISTINGS)?;

    let mut listings = Vec::new();
    for entry in table.iter()? {
        let (key, value) = entry?;
        match serde_json::from_str::<Listing>(value.value()) {
            Ok(listing) => listings.push(listing),
            Err(err) => warn!(key = key.value(), error = %err, "skipping unreadable listing record"),
        }
    }
    Ok(listings)
}

/// Every stored category, in key order; unreadable records are skipped
pub fn fetch_categories(db: &Database) -> Result<Vec<Category>, StoreError> {
    let read_txn = db.begin_read()?;
    let table = read_txn.open_table(TABLE_CATEGORIES)?;

    let mut categories = Vec::new();
    for entry in table.iter()? {
        let (key, value) = entry?;
        match serde_json::from_str::<Category>(value.value()) {
            Ok(category) => categories.push(category),
            Err(err) => warn!(key = key.value(), error = %err, "skipping unreadable category record"),
        }
    }
    Ok(categories)
}

/// Inserts or overwrites listings in a single transaction
pub fn insert_listings(db: &Database, listings: &[Listing]) -> Result<usize, StoreError> {
    let write_txn = db.begin_write()?;
    {
        let mut table = write_txn.open_table(TABLE_LISTINGS)?;
        for listing in listings {
            let json = serde_json::to_string(listing)?;
            table.insert(listing.id.as_str(), json.as_str())?;
        }
    }
    write_txn.commit()?;

    info!(count = listings.len(), "imported listings");
    Ok(listings.len())
}

/// Inserts or overwrites categories in a single transaction
pub fn insert_categories(db: &Database, categories: &[Category]) -> Result<usize, StoreError> {
    let write_txn = db.begin_write()?;
    {
        let mut table = write_txn.open_table(TABLE_CATEGORIES)?;
        for category in categories {
            let json = serde_json::to_string(category)?;
            table.insert(category.id.as_str(), json.as_str())?;
        }
    }
    write_txn.commit()?;

    info!(count = categories.len(), "imported categories");
    Ok(categories.len())
}
