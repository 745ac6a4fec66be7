use super::super::domain::{CanonicalListing, ListingCategory};
use super::super::mapping::{
    cached_regex, code_matches, contains_any, normalize_phrase, APARTMENT_KEYWORDS,
    APARTMENT_TYPE_CODES, COMMERCIAL_KEYWORDS, COMMERCIAL_TYPE_CODES, ESTATE_KEYWORDS,
    ESTATE_TYPE_CODES,
};
use regex::Regex;
use std::sync::OnceLock;

/// Weak signals read from one listing.
pub(crate) struct ClassificationSignals {
    pub type_code: Option<String>,
    /// Every language of the type label, normalized and joined.
    pub type_text: String,
    pub rent: Option<f64>,
    pub living_area: Option<f64>,
    pub business_area: Option<f64>,
    pub plot_area: Option<f64>,
    /// Primary street address with entrance letter, lowercased.
    pub address: String,
    pub has_apartment_unit: bool,
}

impl ClassificationSignals {
    pub(crate) fn from_listing(listing: &CanonicalListing) -> Self {
        let type_text = listing
            .classification
            .type_label
            .values()
            .map(normalize_phrase)
            .collect::<Vec<_>>()
            .join(" | ");

        Self {
            type_code: listing.classification.type_code.clone(),
            type_text,
            rent: listing.rent,
            living_area: listing.dimensions.living_area,
            business_area: listing.dimensions.business_area,
            plot_area: listing.dimensions.plot_area,
            address: normalize_phrase(&listing.location.primary_address()),
            has_apartment_unit: listing.location.apartment_number.is_some(),
        }
    }
}

/// A named, pure predicate mapping to one category.
pub(crate) struct ClassificationRule {
    pub name: &'static str,
    pub category: ListingCategory,
    pub matches: fn(&ClassificationSignals) -> bool,
}

/// Evaluated top to bottom; first match wins. Every apartment cue, the
/// room-count label included, precedes the estate codes. Explicit codes and
/// keywords precede the address heuristics.
pub(crate) const RULES: &[ClassificationRule] = &[
    ClassificationRule {
        name: "positive_rent",
        category: ListingCategory::Rental,
        matches: positive_rent,
    },
    ClassificationRule {
        name: "commercial_type_code",
        category: ListingCategory::Commercial,
        matches: commercial_type_code,
    },
    ClassificationRule {
        name: "commercial_keyword",
        category: ListingCategory::Commercial,
        matches: commercial_keyword,
    },
    ClassificationRule {
        name: "business_area_without_living_area",
        category: ListingCategory::Commercial,
        matches: business_area_only,
    },
    ClassificationRule {
        name: "apartment_type_code",
        category: ListingCategory::Apartment,
        matches: apartment_type_code,
    },
    ClassificationRule {
        name: "apartment_keyword",
        category: ListingCategory::Apartment,
        matches: apartment_keyword,
    },
    ClassificationRule {
        name: "room_count_label",
        category: ListingCategory::Apartment,
        matches: room_count_label,
    },
    ClassificationRule {
        name: "estate_type_code",
        category: ListingCategory::Estate,
        matches: estate_type_code,
    },
    ClassificationRule {
        name: "estate_keyword",
        category: ListingCategory::Estate,
        matches: estate_keyword,
    },
    ClassificationRule {
        name: "land_parcel",
        category: ListingCategory::Estate,
        matches: land_parcel,
    },
    ClassificationRule {
        name: "street_style_address",
        category: ListingCategory::Apartment,
        matches: street_style_address,
    },
    ClassificationRule {
        name: "road_style_address",
        category: ListingCategory::Estate,
        matches: road_style_address,
    },
];

fn positive_rent(signals: &ClassificationSignals) -> bool {
    signals.rent.is_some_and(|rent| rent > 0.0)
}

fn commercial_type_code(signals: &ClassificationSignals) -> bool {
    code_matches(signals.type_code.as_deref(), COMMERCIAL_TYPE_CODES)
}

fn commercial_keyword(signals: &ClassificationSignals) -> bool {
    contains_any(&signals.type_text, COMMERCIAL_KEYWORDS)
}

fn business_area_only(signals: &ClassificationSignals) -> bool {
    signals.business_area.is_some_and(|area| area > 0.0) && signals.living_area.is_none()
}

fn apartment_type_code(signals: &ClassificationSignals) -> bool {
    code_matches(signals.type_code.as_deref(), APARTMENT_TYPE_CODES)
}

fn apartment_keyword(signals: &ClassificationSignals) -> bool {
    contains_any(&signals.type_text, APARTMENT_KEYWORDS)
}

fn estate_type_code(signals: &ClassificationSignals) -> bool {
    code_matches(signals.type_code.as_deref(), ESTATE_TYPE_CODES)
}

fn estate_keyword(signals: &ClassificationSignals) -> bool {
    contains_any(&signals.type_text, ESTATE_KEYWORDS)
}

pub(crate) const ROOM_COUNT_PATTERN: &str =
    r"(?i)\b\d+\s*(?:h|r|rh|mh|rok|rum)\b(?:\s*\+\s*\w+)*";
pub(crate) const STAIRCASE_PATTERN: &str = r"\d+\s*[a-zåäö]\s+\d+$";
pub(crate) const STREET_PATTERN: &str = r"(?:katu|gatan|gata|street|bulevardi|esplanadi)\s+\d+";
pub(crate) const ROAD_PATTERN: &str =
    r"(?:tie|polku|kuja|rinne|mäki|ranta|väg|vägen|stig|stigen|gränd|road|lane|way)\s+\d+[a-z]?$";

fn room_count_label(signals: &ClassificationSignals) -> bool {
    static ROOMS: OnceLock<Option<Regex>> = OnceLock::new();
    cached_regex(&ROOMS, ROOM_COUNT_PATTERN)
        .is_some_and(|rooms| rooms.is_match(&signals.type_text))
}

fn land_parcel(signals: &ClassificationSignals) -> bool {
    signals.plot_area.is_some_and(|area| area > 0.0)
}

fn street_style_address(signals: &ClassificationSignals) -> bool {
    static STAIRCASE: OnceLock<Option<Regex>> = OnceLock::new();
    static STREET: OnceLock<Option<Regex>> = OnceLock::new();
    let matches = |cell: &'static OnceLock<Option<Regex>>, pattern: &str| {
        cached_regex(cell, pattern).is_some_and(|regex| regex.is_match(&signals.address))
    };

    signals.has_apartment_unit
        || matches(&STAIRCASE, STAIRCASE_PATTERN)
        || matches(&STREET, STREET_PATTERN)
}

fn road_style_address(signals: &ClassificationSignals) -> bool {
    static ROAD: OnceLock<Option<Regex>> = OnceLock::new();
    cached_regex(&ROAD, ROAD_PATTERN).is_some_and(|road| road.is_match(&signals.address))
}

#[cfg(test)]
pub(crate) fn signals_for_tests() -> ClassificationSignals {
    ClassificationSignals {
        type_code: None,
        type_text: String::new(),
        rent: None,
        living_area: None,
        business_area: None,
        plot_area: None,
        address: String::new(),
        has_apartment_unit: false,
    }
}

#[cfg(test)]
pub(crate) fn rule(name: &str) -> &'static ClassificationRule {
    RULES
        .iter()
        .find(|rule| rule.name == name)
        .unwrap_or_else(|| panic!("unknown rule {name}"))
}
