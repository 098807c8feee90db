//! Filter criteria model
//!
//! `FilterCriteria` is the canonical, serializable shape of one filter
//! session's selection. Every field defaults to "unconstrained", so
//! `FilterCriteria::default()` lets every listing through.

use serde::{Deserialize, Serialize};

use crate::listing::{Amenities, Amenity};

/// Lower bound of the price slider
pub const DEFAULT_PRICE_MIN: f64 = 0.0;

/// Upper bound of the price slider
pub const DEFAULT_PRICE_MAX: f64 = 10_000.0;

/// Free-text and single-choice fields
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum ScalarKey {
    Search,
    City,
    Country,
    CategoryId,
    GenderRequired,
}

impl ScalarKey {
    pub const ALL: [ScalarKey; 5] = [
        ScalarKey::Search,
        ScalarKey::City,
        ScalarKey::Country,
        ScalarKey::CategoryId,
        ScalarKey::GenderRequired,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            ScalarKey::Search => "search",
            ScalarKey::City => "city",
            ScalarKey::Country => "country",
            ScalarKey::CategoryId => "categoryId",
            ScalarKey::GenderRequired => "genderRequired",
        }
    }
}

/// Multi-choice fields; a listing matches when its value is one of the selected members
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum SelectionKey {
    PropertyType,
    RoomType,
    TotalRooms,
    Bathrooms,
    PaymentTime,
    RentTime,
}

impl SelectionKey {
    pub const ALL: [SelectionKey; 6] = [
        SelectionKey::PropertyType,
        SelectionKey::RoomType,
        SelectionKey::TotalRooms,
        SelectionKey::Bathrooms,
        SelectionKey::PaymentTime,
        SelectionKey::RentTime,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            SelectionKey::PropertyType => "propertyType",
            SelectionKey::RoomType => "roomType",
            SelectionKey::TotalRooms => "totalRooms",
            SelectionKey::Bathrooms => "bathrooms",
            SelectionKey::PaymentTime => "paymentTime",
            SelectionKey::RentTime => "rentTime",
        }
    }
}

/// The user's current filter selection
///
/// Selections are kept as plain lists: membership is all that matters to the
/// evaluator, and values decoded from a hand-written query string are kept
/// verbatim.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct FilterCriteria {
    pub search: String,
    pub city: String,
    pub country: String,
    pub category_id: String,
    pub gender_required: String,

    pub price_min: f64,
    pub price_max: f64,

    pub property_type: Vec<String>,
    pub room_type: Vec<String>,
    pub total_rooms: Vec<String>,
    pub bathrooms: Vec<String>,
    pub payment_time: Vec<String>,
    pub rent_time: Vec<String>,

    #[serde(flatten)]
    pub amenities: Amenities,
}

impl Default for FilterCriteria {
    fn default() -> Self {
        Self {
            search: String::new(),
            city: String::new(),
            country: String::new(),
            category_id: String::new(),
            gender_required: String::new(),
            price_min: DEFAULT_PRICE_MIN,
            price_max: DEFAULT_PRICE_MAX,
            property_type: Vec::new(),
            room_type: Vec::new(),
            total_rooms: Vec::new(),
            bathrooms: Vec::new(),
            payment_time: Vec::new(),
            rent_time: Vec::new(),
            amenities: Amenities::default(),
        }
    }
}

impl FilterCriteria {
    pub fn scalar(&self, key: ScalarKey) -> &str {
        match key {
            ScalarKey::Search => &self.search,
            ScalarKey::City => &self.city,
            ScalarKey::Country => &self.country,
            ScalarKey::CategoryId => &self.category_id,
            ScalarKey::GenderRequired => &self.gender_required,
        }
    }

    pub fn set_scalar(&mut self, key: ScalarKey, value: impl Into<String>) {
        let slot = match key {
            ScalarKey::Search => &mut self.search,
            ScalarKey::City => &mut self.city,
            ScalarKey::Country => &mut self.country,
            ScalarKey::CategoryId => &mut self.category_id,
            ScalarKey::GenderRequired => &mut self.gender_required,
        };
        *slot = value.into();
    }

    pub fn selection(&self, key: SelectionKey) -> &[String] {
        match key {
            SelectionKey::PropertyType => &self.property_type,
            SelectionKey::RoomType => &self.room_type,
            SelectionKey::TotalRooms => &self.total_rooms,
            SelectionKey::Bathrooms => &self.bathrooms,
            SelectionKey::PaymentTime => &self.payment_time,
            SelectionKey::RentTime => &self.rent_time,
        }
    }

    pub fn selection_mut(&mut self, key: SelectionKey) -> &mut Vec<String> {
        match key {
            SelectionKey::PropertyType => &mut self.property_type,
            SelectionKey::RoomType => &mut self.room_type,
            SelectionKey::TotalRooms => &mut self.total_rooms,
            SelectionKey::Bathrooms => &mut self.bathrooms,
            SelectionKey::PaymentTime => &mut self.payment_time,
            SelectionKey::RentTime => &mut self.rent_time,
        }
    }

    /// Adds `value` to the selection, or removes every copy of it if already present
    ///
    /// Returns whether the value is selected afterwards.
    pub fn toggle_member(&mut self, key: SelectionKey, value: &str) -> bool {
        let members = self.selection_mut(key);
        if members.iter().any(|member| member == value) {
            members.retain(|member| member != value);
            false
        } else {
            members.push(value.to_string());
            true
        }
    }

    /// Whether either price bound was moved off its default
    pub fn price_is_constrained(&self) -> bool {
        self.price_min != DEFAULT_PRICE_MIN || self.price_max != DEFAULT_PRICE_MAX
    }

    /// Number of fields that differ from their default
    ///
    /// The price range counts once no matter which bound moved.
    pub fn active_count(&self) -> usize {
        let scalars = ScalarKey::ALL
            .iter()
            .filter(|key| !self.scalar(**key).is_empty())
            .count();
        let selections = SelectionKey::ALL
            .iter()
            .filter(|key| !self.selection(**key).is_empty())
            .count();
        let price = usize::from(self.price_is_constrained());

        scalars + price + selections + self.amenities.enabled().count()
    }

    pub fn is_default(&self) -> bool {
        self.active_count() == 0
    }

    pub fn requires(&self, amenity: Amenity) -> bool {
        self.amenities.get(amenity)
    }
}
