//! Listing and category records
//!
//! These are the read-only snapshots the filter engine narrows. They are
//! supplied whole by the listing store and never mutated by the engine.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Kind of property being offered
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum PropertyType {
    House,
    Room,
}

impl PropertyType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PropertyType::House => "house",
            PropertyType::Room => "room",
        }
    }
}

/// Whether a room is private or shared
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum RoomType {
    Single,
    Mixed,
}

impl RoomType {
    pub fn as_str(&self) -> &'static str {
        match self {
            RoomType::Single => "single",
            RoomType::Mixed => "mixed",
        }
    }
}

/// Tenant gender the landlord accepts
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum Gender {
    Male,
    Female,
    Any,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
            Gender::Any => "any",
        }
    }
}

/// Billing period used for both `paymentTime` and `rentTime`
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum BillingPeriod {
    Daily,
    Weekly,
    Monthly,
    Quarterly,
    HalfYearly,
    Yearly,
}

impl BillingPeriod {
    pub fn as_str(&self) -> &'static str {
        match self {
            BillingPeriod::Daily => "daily",
            BillingPeriod::Weekly => "weekly",
            BillingPeriod::Monthly => "monthly",
            BillingPeriod::Quarterly => "quarterly",
            BillingPeriod::HalfYearly => "halfYearly",
            BillingPeriod::Yearly => "yearly",
        }
    }
}

/// Amenity and household-preference flags a listing may advertise
///
/// The same names are used as boolean filter keys in the query string.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "camelCase")]
pub enum Amenity {
    AirConditioning,
    Internet,
    Parking,
    NearToMetro,
    GoodForForeigners,
    Furnished,
    WashingMachine,
    Heating,
    Balcony,
    Elevator,
    PetsAllowed,
    SmokingAllowed,
    NearToUniversity,
}

impl Amenity {
    /// Every flag, in query-string order
    pub const ALL: [Amenity; 13] = [
        Amenity::AirConditioning,
        Amenity::Internet,
        Amenity::Parking,
        Amenity::NearToMetro,
        Amenity::GoodForForeigners,
        Amenity::Furnished,
        Amenity::WashingMachine,
        Amenity::Heating,
        Amenity::Balcony,
        Amenity::Elevator,
        Amenity::PetsAllowed,
        Amenity::SmokingAllowed,
        Amenity::NearToUniversity,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            Amenity::AirConditioning => "airConditioning",
            Amenity::Internet => "internet",
            Amenity::Parking => "parking",
            Amenity::NearToMetro => "nearToMetro",
            Amenity::GoodForForeigners => "goodForForeigners",
            Amenity::Furnished => "furnished",
            Amenity::WashingMachine => "washingMachine",
            Amenity::Heating => "heating",
            Amenity::Balcony => "balcony",
            Amenity::Elevator => "elevator",
            Amenity::PetsAllowed => "petsAllowed",
            Amenity::SmokingAllowed => "smokingAllowed",
            Amenity::NearToUniversity => "nearToUniversity",
        }
    }

    pub fn from_key(key: &str) -> Option<Amenity> {
        Amenity::ALL.into_iter().find(|amenity| amenity.key() == key)
    }
}

/// One boolean per [`Amenity`]
///
/// Listings use it to advertise what they offer; filter criteria use it to
/// state what is required.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct Amenities {
    pub air_conditioning: bool,
    pub internet: bool,
    pub parking: bool,
    pub near_to_metro: bool,
    pub good_for_foreigners: bool,
    pub furnished: bool,
    pub washing_machine: bool,
    pub heating: bool,
    pub balcony: bool,
    pub elevator: bool,
    pub pets_allowed: bool,
    pub smoking_allowed: bool,
    pub near_to_university: bool,
}

impl Amenities {
    pub fn get(&self, amenity: Amenity) -> bool {
        *self.slot(amenity)
    }

    pub fn set(&mut self, amenity: Amenity, value: bool) {
        *self.slot_mut(amenity) = value;
    }

    /// Flips a flag and returns its new value
    pub fn toggle(&mut self, amenity: Amenity) -> bool {
        let slot = self.slot_mut(amenity);
        *slot = !*slot;
        *slot
    }

    /// Flags currently set, in query-string order
    pub fn enabled(&self) -> impl Iterator<Item = Amenity> + '_ {
        Amenity::ALL.into_iter().filter(|amenity| self.get(*amenity))
    }

    fn slot(&self, amenity: Amenity) -> &bool {
        match amenity {
            Amenity::AirConditioning => &self.air_conditioning,
            Amenity::Internet => &self.internet,
            Amenity::Parking => &self.parking,
            Amenity::NearToMetro => &self.near_to_metro,
            Amenity::GoodForForeigners => &self.good_for_foreigners,
            Amenity::Furnished => &self.furnished,
            Amenity::WashingMachine => &self.washing_machine,
            Amenity::Heating => &self.heating,
            Amenity::Balcony => &self.balcony,
            Amenity::Elevator => &self.elevator,
            Amenity::PetsAllowed => &self.pets_allowed,
            Amenity::SmokingAllowed => &self.smoking_allowed,
            Amenity::NearToUniversity => &self.near_to_university,
        }
    }

    fn slot_mut(&mut self, amenity: Amenity) -> &mut bool {
        match amenity {
            Amenity::AirConditioning => &mut self.air_conditioning,
            Amenity::Internet => &mut self.internet,
            Amenity::Parking => &mut self.parking,
            Amenity::NearToMetro => &mut self.near_to_metro,
            Amenity::GoodForForeigners => &mut self.good_for_foreigners,
            Amenity::Furnished => &mut self.furnished,
            Amenity::WashingMachine => &mut self.washing_machine,
            Amenity::Heating => &mut self.heating,
            Amenity::Balcony => &mut self.balcony,
            Amenity::Elevator => &mut self.elevator,
            Amenity::PetsAllowed => &mut self.pets_allowed,
            Amenity::SmokingAllowed => &mut self.smoking_allowed,
            Amenity::NearToUniversity => &mut self.near_to_university,
        }
    }
}

/// A property record as stored in the listing table
///
/// # Example
/// ```json
/// {
///   "id": "lst-001",
///   "title": "Sunny Loft",
///   "city": "Lisbon",
///   "categoryId": "apartments",
///   "price": "850",
///   "propertyType": "room",
///   "roomType": "single",
///   "totalRooms": "3",
///   "internet": true
/// }
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Listing {
    /// Unique identifier, also the storage key
    pub id: String,

    #[serde(default)]
    pub title: String,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub city: String,

    #[serde(default)]
    pub country: String,

    #[serde(default)]
    pub address: String,

    #[serde(default)]
    pub category_id: String,

    /// Monthly price as entered by the owner; parsed only when filtering
    #[serde(default)]
    pub price: Option<String>,

    #[serde(default)]
    pub property_type: Option<PropertyType>,

    #[serde(default)]
    pub room_type: Option<RoomType>,

    #[serde(default)]
    pub gender_required: Option<Gender>,

    #[serde(default)]
    pub payment_time: Option<BillingPeriod>,

    #[serde(default)]
    pub rent_time: Option<BillingPeriod>,

    /// Room count as text, e.g. "2" or "5+"
    #[serde(default)]
    pub total_rooms: Option<String>,

    #[serde(default)]
    pub bathrooms: Option<String>,

    #[serde(flatten)]
    pub amenities: Amenities,

    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

impl Listing {
    /// An otherwise empty listing, handy as a starting point for imports and tests
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: String::new(),
            city: String::new(),
            country: String::new(),
            address: String::new(),
            category_id: String::new(),
            price: None,
            property_type: None,
            room_type: None,
            gender_required: None,
            payment_time: None,
            rent_time: None,
            total_rooms: None,
            bathrooms: None,
            amenities: Amenities::default(),
            created_at: Utc::now(),
        }
    }
}

/// A listing category as shown in the filter sidebar
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Category {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub icon: Option<String>,
}
