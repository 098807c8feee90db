//! Benchmark tests for the filter pipeline
//!
//! Run with: cargo test --release -- --nocapture bench

use std::sync::Arc;
use std::time::Instant;
use tempfile::NamedTempFile;

use flatmate_search::config::Config;
use flatmate_search::database::{init_db, insert_listings, AppState};
use flatmate_search::filter::codec::{decode, encode};
use flatmate_search::filter::predicate::filter_listings;
use flatmate_search::filter::{FilterSession, HistoryNavigator, ScalarKey, SelectionKey, SyncScheduler};
use flatmate_search::handler::search_listings;
use flatmate_search::listing::{Amenity, BillingPeriod, Listing, PropertyType, RoomType};
use flatmate_search::model::PageParams;

use axum::extract::{Query, RawQuery, State};

/// Benchmark helper to measure execution time
fn benchmark<F>(name: &str, iterations: usize, mut f: F)
where
    F: FnMut(),
{
    let start = Instant::now();

    for _ in 0..iterations {
        f();
    }

    let duration = start.elapsed();
    let avg_ms = duration.as_millis() as f64 / iterations as f64;
    let ops_per_sec = (iterations as f64 / duration.as_secs_f64()) as u64;

    println!("  {} ({} iterations)", name, iterations);
    println!("    Total time: {:?}", duration);
    println!("    Avg time: {:.3}ms", avg_ms);
    println!("    Throughput: {} ops/sec\n", ops_per_sec);
}

fn synthetic_listings(count: usize) -> Vec<Listing> {
    let cities = ["Lisbon", "Porto", "Faro", "Braga", "Coimbra"];
    (0..count)
        .map(|i| {
            let mut listing = Listing::new(format!("bench-{:06}", i), format!("Listing {}", i));
            listing.city = cities[i % cities.len()].to_string();
            listing.price = Some(((i * 37) % 5_000).to_string());
            listing.property_type = Some(if i % 3 == 0 { PropertyType::House } else { PropertyType::Room });
            listing.room_type = Some(if i % 2 == 0 { RoomType::Single } else { RoomType::Mixed });
            listing.rent_time = Some(BillingPeriod::Monthly);
            listing.total_rooms = Some((1 + i % 5).to_string());
            for (n, amenity) in Amenity::ALL.iter().enumerate() {
                listing.amenities.set(*amenity, (i + n) % 4 == 0);
            }
            listing
        })
        .collect()
}

#[test]
#[ignore] // Run explicitly with: cargo test bench --release -- --ignored --nocapture
fn bench_filter_pass() {
    println!("\n=== Benchmark: Full filter pass ===\n");

    let listings = synthetic_listings(10_000);
    let criteria = decode("search=listing&city=o&priceMin=100&priceMax=4000&propertyType=room&internet=true");

    benchmark("Filter 10k listings", 200, || {
        let _ = filter_listings(&listings, &criteria);
    });

    benchmark("Encode + decode criteria", 10_000, || {
        let _ = decode(&encode(&criteria));
    });
}

#[tokio::test]
#[ignore]
async fn bench_session_mutations() {
    println!("\n=== Benchmark: Session mutations ===\n");

    let history = Arc::new(HistoryNavigator::new("/properties"));
    let scheduler = SyncScheduler::new(history.clone(), "/properties");
    let mut session = FilterSession::new(synthetic_listings(5_000), Vec::new(), "", scheduler);

    benchmark("Keystroke (set search)", 1_000, || {
        session.set_scalar(ScalarKey::Search, "listing 1");
    });

    benchmark("Toggle selection", 1_000, || {
        session.toggle_member(SelectionKey::TotalRooms, "3");
    });
}

#[tokio::test]
#[ignore]
async fn bench_search_endpoint() {
    println!("\n=== Benchmark: Search endpoint ===\n");

    let temp_db = NamedTempFile::new().unwrap();
    let db = init_db(temp_db.path().to_str().unwrap()).unwrap();
    insert_listings(&db, &synthetic_listings(5_000)).unwrap();
    let state = AppState::new(db, Config::default());

    let start = Instant::now();
    let iterations = 50;
    for _ in 0..iterations {
        let _ = search_listings(
            State(state.clone()),
            Query(PageParams { page: Some(2) }),
            RawQuery(Some("city=porto&propertyType=room&page=2".to_string())),
        )
        .await;
    }
    let duration = start.elapsed();
    println!("  Search 5k stored listings ({} iterations)", iterations);
    println!("    Total time: {:?}", duration);
    println!("    Avg time: {:.3}ms\n", duration.as_millis() as f64 / iterations as f64);
}

#[test]
fn bench_summary() {
    println!("\n{}", "=".repeat(60));
    println!("Benchmark Test Suite");
    println!("{}", "=".repeat(60));
    println!("\nTo run benchmarks, use:");
    println!("  cargo test --release bench -- --ignored --nocapture");
    println!("\nAvailable benchmarks:");
    println!("  • bench_filter_pass        - Predicate pass and codec");
    println!("  • bench_session_mutations  - Recompute + reschedule per mutation");
    println!("  • bench_search_endpoint    - Store read + filter + paginate");
    println!("\n{}\n", "=".repeat(60));
}
