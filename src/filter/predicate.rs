//! Predicate evaluator
//!
//! A listing is included only when it satisfies every active field. Fields
//! are evaluated independently of each other, so the order of the checks
//! below has no effect on the result.

use crate::filter::criteria::{FilterCriteria, SelectionKey, DEFAULT_PRICE_MAX, DEFAULT_PRICE_MIN};
use crate::listing::{Amenity, Listing};

/// Whether `listing` passes every active field of `criteria`
pub fn matches(listing: &Listing, criteria: &FilterCriteria) -> bool {
    matches_search(listing, &criteria.search)
        && contains_ignore_case(&listing.city, &criteria.city)
        && contains_ignore_case(&listing.country, &criteria.country)
        && (criteria.category_id.is_empty() || listing.category_id == criteria.category_id)
        && (criteria.gender_required.is_empty()
            || listing.gender_required.map(|g| g.as_str()) == Some(criteria.gender_required.as_str()))
        && matches_price(listing, criteria)
        && SelectionKey::ALL
            .iter()
            .all(|key| matches_selection(criteria.selection(*key), selection_value(listing, *key)))
        && Amenity::ALL
            .iter()
            .all(|amenity| !criteria.requires(*amenity) || listing.amenities.get(*amenity))
}

/// Narrows `listings`, keeping their original order
pub fn filter_listings<'a>(listings: &'a [Listing], criteria: &FilterCriteria) -> Vec<&'a Listing> {
    listings
        .iter()
        .filter(|listing| matches(listing, criteria))
        .collect()
}

/// Positions of the listings that pass, in their original order
pub fn filter_indices(listings: &[Listing], criteria: &FilterCriteria) -> Vec<usize> {
    listings
        .iter()
        .enumerate()
        .filter(|(_, listing)| matches(listing, criteria))
        .map(|(index, _)| index)
        .collect()
}

/// Reads a listing's price text; a missing price counts as `0`
///
/// Only the leading number is read and anything after it is ignored, so
/// `"1500 EGP"` is 1500 and `"1,200"` is 1. Text that does not start with a
/// number has no price.
pub fn listing_price(listing: &Listing) -> Option<f64> {
    parse_leading_number(listing.price.as_deref().unwrap_or("0"))
}

fn parse_leading_number(text: &str) -> Option<f64> {
    let text = text.trim_start();
    let bytes = text.as_bytes();

    let mut end = usize::from(matches!(bytes.first(), Some(b'+' | b'-')));
    if text[end..].starts_with("Infinity") {
        return Some(if bytes[0] == b'-' { f64::NEG_INFINITY } else { f64::INFINITY });
    }

    let int_digits = count_digits(&bytes[end..]);
    end += int_digits;

    if bytes.get(end) == Some(&b'.') {
        let frac_digits = count_digits(&bytes[end + 1..]);
        if int_digits + frac_digits == 0 {
            return None;
        }
        end += 1 + frac_digits;
    } else if int_digits == 0 {
        return None;
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exponent = end + 1;
        if matches!(bytes.get(exponent), Some(b'+' | b'-')) {
            exponent += 1;
        }
        let exp_digits = count_digits(&bytes[exponent..]);
        if exp_digits > 0 {
            end = exponent + exp_digits;
        }
    }

    text[..end].parse().ok()
}

fn count_digits(bytes: &[u8]) -> usize {
    bytes.iter().take_while(|b| b.is_ascii_digit()).count()
}

fn matches_search(listing: &Listing, search: &str) -> bool {
    if search.is_empty() {
        return true;
    }
    let needle = search.to_lowercase();
    [
        &listing.title,
        &listing.description,
        &listing.city,
        &listing.address,
    ]
    .iter()
    .any(|field| field.to_lowercase().contains(&needle))
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    needle.is_empty() || haystack.to_lowercase().contains(&needle.to_lowercase())
}

// A bound left at its default is open: 0 means no minimum, 10000 means "10000+".
fn matches_price(listing: &Listing, criteria: &FilterCriteria) -> bool {
    let lower_active = criteria.price_min != DEFAULT_PRICE_MIN;
    let upper_active = criteria.price_max != DEFAULT_PRICE_MAX;
    if !lower_active && !upper_active {
        return true;
    }

    let Some(price) = listing_price(listing) else {
        return false;
    };

    (!lower_active || criteria.price_min <= price) && (!upper_active || price <= criteria.price_max)
}

fn matches_selection(selected: &[String], value: Option<&str>) -> bool {
    if selected.is_empty() {
        return true;
    }
    match value {
        Some(value) => selected.iter().any(|member| member == value),
        None => false,
    }
}

fn selection_value(listing: &Listing, key: SelectionKey) -> Option<&str> {
    match key {
        SelectionKey::PropertyType => listing.property_type.map(|v| v.as_str()),
        SelectionKey::RoomType => listing.room_type.map(|v| v.as_str()),
        SelectionKey::TotalRooms => listing.total_rooms.as_deref(),
        SelectionKey::Bathrooms => listing.bathrooms.as_deref(),
        SelectionKey::PaymentTime => listing.payment_time.map(|v| v.as_str()),
        SelectionKey::RentTime => listing.rent_time.map(|v| v.as_str()),
    }
}
