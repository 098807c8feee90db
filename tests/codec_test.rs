//! Query-string codec tests

use flatmate_search::filter::codec::{decode, encode, location};
use flatmate_search::filter::{FilterCriteria, ScalarKey, SelectionKey};
use flatmate_search::listing::Amenity;

#[test]
fn test_default_criteria_encodes_to_empty_query() {
    assert_eq!(encode(&FilterCriteria::default()), "");
    assert_eq!(decode(""), FilterCriteria::default());
}

#[test]
fn test_encode_writes_only_non_default_fields() {
    let mut criteria = FilterCriteria::default();
    criteria.set_scalar(ScalarKey::Search, "sunny loft");
    criteria.price_max = 1500.0;
    criteria.toggle_member(SelectionKey::PropertyType, "house");
    criteria.toggle_member(SelectionKey::PropertyType, "room");
    criteria.amenities.toggle(Amenity::Internet);

    assert_eq!(
        encode(&criteria),
        "search=sunny+loft&priceMax=1500&propertyType=house&propertyType=room&internet=true"
    );
}

#[test]
fn test_decode_reads_known_keys_and_ignores_the_rest() {
    let criteria = decode("?city=Lisbon&page=3&utm_source=mail&roomType=single&parking=true");

    assert_eq!(criteria.city, "Lisbon");
    assert_eq!(criteria.room_type, vec!["single"]);
    assert!(criteria.amenities.parking);
    assert_eq!(criteria.active_count(), 3);
}

#[test]
fn test_malformed_price_falls_back_to_zero() {
    let criteria = decode("priceMin=cheap&priceMax=NaN");
    assert_eq!(criteria.price_min, 0.0);
    assert_eq!(criteria.price_max, 0.0);

    let criteria = decode("priceMin=250.5");
    assert_eq!(criteria.price_min, 250.5);
    assert_eq!(criteria.price_max, 10_000.0);
}

#[test]
fn test_explicit_false_and_absent_flag_decode_the_same() {
    assert_eq!(decode("elevator=false"), decode(""));
    assert_eq!(decode("elevator=yes"), decode(""));
    assert!(decode("elevator=true").amenities.elevator);
}

#[test]
fn test_out_of_enum_and_duplicate_values_are_kept_verbatim() {
    let criteria = decode("propertyType=castle&propertyType=castle&rentTime=weekly");

    assert_eq!(criteria.property_type, vec!["castle", "castle"]);
    assert_eq!(criteria.rent_time, vec!["weekly"]);
}

#[test]
fn test_first_scalar_value_wins() {
    let criteria = decode("search=loft&search=flat&priceMin=10&priceMin=20");
    assert_eq!(criteria.search, "loft");
    assert_eq!(criteria.price_min, 10.0);
}

#[test]
fn test_round_trip_for_canonical_criteria() {
    let mut criteria = FilterCriteria::default();
    criteria.set_scalar(ScalarKey::Search, "près de la gare & métro");
    criteria.set_scalar(ScalarKey::City, "Porto");
    criteria.set_scalar(ScalarKey::Country, "Portugal");
    criteria.set_scalar(ScalarKey::CategoryId, "cat-7");
    criteria.set_scalar(ScalarKey::GenderRequired, "female");
    criteria.price_min = 99.99;
    criteria.price_max = 2500.0;
    for (key, value) in [
        (SelectionKey::PropertyType, "room"),
        (SelectionKey::RoomType, "mixed"),
        (SelectionKey::TotalRooms, "4+"),
        (SelectionKey::Bathrooms, "2"),
        (SelectionKey::PaymentTime, "monthly"),
        (SelectionKey::RentTime, "halfYearly"),
        (SelectionKey::RentTime, "yearly"),
    ] {
        criteria.toggle_member(key, value);
    }
    for amenity in Amenity::ALL {
        criteria.amenities.toggle(amenity);
    }

    assert_eq!(decode(&encode(&criteria)), criteria);
}

#[test]
fn test_round_trip_after_toggling_off() {
    let mut criteria = FilterCriteria::default();
    criteria.toggle_member(SelectionKey::Bathrooms, "1");
    criteria.toggle_member(SelectionKey::Bathrooms, "2");
    criteria.toggle_member(SelectionKey::Bathrooms, "1");
    criteria.amenities.toggle(Amenity::Balcony);
    criteria.amenities.toggle(Amenity::Balcony);

    assert_eq!(encode(&criteria), "bathrooms=2");
    assert_eq!(decode(&encode(&criteria)), criteria);
}

#[test]
fn test_location_omits_empty_query() {
    assert_eq!(location("/properties", ""), "/properties");
    assert_eq!(location("/properties", "city=Faro"), "/properties?city=Faro");
}
