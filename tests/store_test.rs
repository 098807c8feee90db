//! Session store and listing store tests
//!
//! Expiry tests run on a paused tokio clock.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tempfile::NamedTempFile;

use flatmate_search::database::{
    fetch_categories, fetch_listings, init_db, insert_listings, TABLE_CATEGORIES, TABLE_LISTINGS,
};
use flatmate_search::filter::codec::location;
use flatmate_search::filter::{FilterSession, HistoryNavigator, ScalarKey, SyncScheduler};
use flatmate_search::listing::Listing;
use flatmate_search::sessions::{SessionEntry, SessionStore};

const PATH: &str = "/properties";
const TTL: Duration = Duration::from_secs(60);

fn entry(listings: Vec<Listing>) -> SessionEntry {
    let history = Arc::new(HistoryNavigator::new(location(PATH, "")));
    let scheduler = SyncScheduler::new(history.clone(), PATH);
    SessionEntry {
        session: FilterSession::new(listings, Vec::new(), "", scheduler),
        history,
        created_at: Utc::now(),
    }
}

async fn advance(duration: Duration) {
    tokio::time::sleep(duration).await;
}

#[tokio::test(start_paused = true)]
async fn test_idle_session_expires_after_ttl() {
    let store = SessionStore::new(TTL);
    let id = store.insert(entry(Vec::new()));

    advance(TTL - Duration::from_secs(1)).await;
    assert_eq!(store.with(&id, |_| ()), Some(()));

    // The lookup above restarted the idle timer
    advance(TTL - Duration::from_secs(1)).await;
    assert_eq!(store.with(&id, |_| ()), Some(()));

    advance(TTL).await;
    assert_eq!(store.with(&id, |_| ()), None);
    assert!(store.is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_insert_prunes_expired_sessions() {
    let store = SessionStore::new(TTL);
    store.insert(entry(Vec::new()));
    store.insert(entry(Vec::new()));
    assert_eq!(store.len(), 2);

    advance(TTL).await;
    let fresh = store.insert(entry(Vec::new()));

    assert_eq!(store.len(), 1);
    assert!(store.with(&fresh, |_| ()).is_some());
}

#[tokio::test(start_paused = true)]
async fn test_sweeper_prunes_without_traffic() {
    let store = SessionStore::new(TTL);
    store.insert(entry(Vec::new()));
    let sweeper = store.spawn_sweeper(Duration::from_secs(10));

    advance(TTL + Duration::from_secs(11)).await;
    assert!(store.is_empty());

    sweeper.abort();
}

#[tokio::test(start_paused = true)]
async fn test_pruned_session_drops_its_pending_commit() {
    let store = SessionStore::new(Duration::from_millis(100));
    let id = store.insert(entry(Vec::new()));
    let history = store
        .with(&id, |entry| {
            entry.session.set_scalar(ScalarKey::Search, "loft");
            entry.history.clone()
        })
        .unwrap();

    // Expires before the 500ms debounce window closes
    advance(Duration::from_millis(200)).await;
    assert_eq!(store.prune(), 1);
    advance(Duration::from_secs(1)).await;

    assert!(history.log().is_empty());
    assert_eq!(history.current().as_deref(), Some(PATH));
}

#[tokio::test]
async fn test_sessions_do_not_block_each_other() {
    let store = SessionStore::new(TTL);
    let first = store.insert(entry(vec![Listing::new("a", "Loft")]));
    let second = store.insert(entry(vec![Listing::new("b", "Studio")]));

    // Reaching another session while one is locked must not deadlock
    let counts = store
        .with(&first, |outer| {
            let inner = store.with(&second, |inner| inner.session.filtered_count());
            (outer.session.filtered_count(), inner)
        })
        .unwrap();

    assert_eq!(counts, (1, Some(1)));
}

#[test]
fn test_unreadable_records_are_skipped() {
    let temp_db = NamedTempFile::new().unwrap();
    let db = init_db(temp_db.path().to_str().unwrap()).unwrap();
    insert_listings(&db, &[Listing::new("good", "Readable Room")]).unwrap();

    let write_txn = db.begin_write().unwrap();
    {
        let mut listings = write_txn.open_table(TABLE_LISTINGS).unwrap();
        listings.insert("bad", "{ not json").unwrap();
        let mut categories = write_txn.open_table(TABLE_CATEGORIES).unwrap();
        categories.insert("broken", "[]").unwrap();
    }
    write_txn.commit().unwrap();

    let listings = fetch_listings(&db).unwrap();
    assert_eq!(listings.len(), 1);
    assert_eq!(listings[0].id, "good");
    assert!(fetch_categories(&db).unwrap().is_empty());
}
