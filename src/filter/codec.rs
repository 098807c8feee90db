//! Query-string codec for filter criteria
//!
//! The encoding is lossy on purpose: defaults are omitted, and an amenity
//! flag is only ever written as `key=true`, so an absent key and an explicit
//! `key=false` decode the same way.

use tracing::debug;
use url::form_urlencoded;

use crate::filter::criteria::{
    FilterCriteria, ScalarKey, SelectionKey, DEFAULT_PRICE_MAX, DEFAULT_PRICE_MIN,
};
use crate::listing::Amenity;

pub const PRICE_MIN_KEY: &str = "priceMin";
pub const PRICE_MAX_KEY: &str = "priceMax";

/// Encodes every non-default field as `application/x-www-form-urlencoded` pairs
///
/// Returns an empty string for the default criteria.
pub fn encode(criteria: &FilterCriteria) -> String {
    let mut query = form_urlencoded::Serializer::new(String::new());

    for key in ScalarKey::ALL {
        let value = criteria.scalar(key);
        if !value.is_empty() {
            query.append_pair(key.key(), value);
        }
    }

    if criteria.price_min != DEFAULT_PRICE_MIN {
        query.append_pair(PRICE_MIN_KEY, &criteria.price_min.to_string());
    }
    if criteria.price_max != DEFAULT_PRICE_MAX {
        query.append_pair(PRICE_MAX_KEY, &criteria.price_max.to_string());
    }

    for key in SelectionKey::ALL {
        for member in criteria.selection(key) {
            query.append_pair(key.key(), member);
        }
    }

    for amenity in criteria.amenities.enabled() {
        query.append_pair(amenity.key(), "true");
    }

    query.finish()
}

/// Decodes a query string, with or without its leading `?`
///
/// Never fails: unknown keys are skipped, a malformed price falls back to
/// `0`, and selection values are taken verbatim even when they name no known
/// option.
pub fn decode(query: &str) -> FilterCriteria {
    let query = query.strip_prefix('?').unwrap_or(query);
    let mut criteria = FilterCriteria::default();
    let mut seen_scalars = Vec::new();
    let mut seen_prices = Vec::new();

    for (key, value) in form_urlencoded::parse(query.as_bytes()) {
        if let Some(scalar) = ScalarKey::ALL.into_iter().find(|k| k.key() == key) {
            // First occurrence wins for single-valued keys
            if !seen_scalars.contains(&scalar) {
                seen_scalars.push(scalar);
                criteria.set_scalar(scalar, value.into_owned());
            }
        } else if key == PRICE_MIN_KEY || key == PRICE_MAX_KEY {
            if seen_prices.iter().any(|seen| *seen == key) {
                continue;
            }
            let price = parse_price(&key, &value);
            if key == PRICE_MIN_KEY {
                criteria.price_min = price;
            } else {
                criteria.price_max = price;
            }
            seen_prices.push(key);
        } else if let Some(selection) = SelectionKey::ALL.into_iter().find(|k| k.key() == key) {
            criteria.selection_mut(selection).push(value.into_owned());
        } else if let Some(amenity) = Amenity::from_key(&key) {
            if value == "true" {
                criteria.amenities.set(amenity, true);
            }
        }
    }

    criteria
}

/// Joins a page path with an encoded query; an empty query yields the bare path
pub fn location(path: &str, query: &str) -> String {
    if query.is_empty() {
        path.to_string()
    } else {
        format!("{}?{}", path, query)
    }
}

fn parse_price(key: &str, value: &str) -> f64 {
    match value.trim().parse::<f64>() {
        Ok(price) if price.is_finite() => price,
        _ => {
            debug!(key, value, "malformed price bound in query string, using 0");
            0.0
        }
    }
}
