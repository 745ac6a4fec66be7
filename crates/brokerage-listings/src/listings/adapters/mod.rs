//! Upstream input adapters.
//!
//! Each upstream has its own payload shape; both adapters reduce a raw JSON
//! record to the same [`ListingRecord`] so the converter never sees upstream
//! shape drift. Adapters only relocate data: numbers stay unparsed and
//! languages unresolved until conversion.

pub mod cms;
pub mod provider;

use super::domain::SourceKind;
use super::locale::LocalizedText;
use serde_json::Value;

/// Strongly typed intermediate record shared by both upstream adapters.
#[derive(Debug, Clone, PartialEq)]
pub struct ListingRecord {
    pub source: SourceKind,
    pub id: String,
    pub identifier: Option<String>,
    pub address: LocalizedText,
    pub gate: LocalizedText,
    pub apartment_number: LocalizedText,
    pub postal_code: LocalizedText,
    pub city: LocalizedText,
    pub district: LocalizedText,
    pub ask_price: LocalizedText,
    pub debt_free_price: LocalizedText,
    pub debt_portion: LocalizedText,
    pub property_tax: LocalizedText,
    pub living_area: LocalizedText,
    pub total_area: LocalizedText,
    pub business_area: LocalizedText,
    pub other_area: LocalizedText,
    pub plot_area: LocalizedText,
    pub plot_area_unit: LocalizedText,
    pub balcony_area: LocalizedText,
    pub terrace_area: LocalizedText,
    pub room_count: LocalizedText,
    pub bedroom_count: LocalizedText,
    pub bathroom_count: LocalizedText,
    pub maintenance_fee: LocalizedText,
    pub financing_fee: LocalizedText,
    pub water_fee: LocalizedText,
    pub heating_fee: LocalizedText,
    pub electricity_fee: LocalizedText,
    pub parking_fee: LocalizedText,
    pub sauna_fee: LocalizedText,
    pub rent: LocalizedText,
    pub rent_deposit: LocalizedText,
    pub rent_contract_type: LocalizedText,
    pub notice_period: LocalizedText,
    pub type_code: LocalizedText,
    pub type_label: LocalizedText,
    pub room_layout: LocalizedText,
    pub description: LocalizedText,
    pub energy_certificate: LocalizedText,
    pub energy_class: LocalizedText,
    pub year_built: LocalizedText,
    pub latitude: LocalizedText,
    pub longitude: LocalizedText,
    pub images: Vec<RawImage>,
    pub agent: Option<RawAgent>,
}

impl ListingRecord {
    pub fn empty(source: SourceKind) -> Self {
        Self {
            source,
            id: String::new(),
            identifier: None,
            address: LocalizedText::new(),
            gate: LocalizedText::new(),
            apartment_number: LocalizedText::new(),
            postal_code: LocalizedText::new(),
            city: LocalizedText::new(),
            district: LocalizedText::new(),
            ask_price: LocalizedText::new(),
            debt_free_price: LocalizedText::new(),
            debt_portion: LocalizedText::new(),
            property_tax: LocalizedText::new(),
            living_area: LocalizedText::new(),
            total_area: LocalizedText::new(),
            business_area: LocalizedText::new(),
            other_area: LocalizedText::new(),
            plot_area: LocalizedText::new(),
            plot_area_unit: LocalizedText::new(),
            balcony_area: LocalizedText::new(),
            terrace_area: LocalizedText::new(),
            room_count: LocalizedText::new(),
            bedroom_count: LocalizedText::new(),
            bathroom_count: LocalizedText::new(),
            maintenance_fee: LocalizedText::new(),
            financing_fee: LocalizedText::new(),
            water_fee: LocalizedText::new(),
            heating_fee: LocalizedText::new(),
            electricity_fee: LocalizedText::new(),
            parking_fee: LocalizedText::new(),
            sauna_fee: LocalizedText::new(),
            rent: LocalizedText::new(),
            rent_deposit: LocalizedText::new(),
            rent_contract_type: LocalizedText::new(),
            notice_period: LocalizedText::new(),
            type_code: LocalizedText::new(),
            type_label: LocalizedText::new(),
            room_layout: LocalizedText::new(),
            description: LocalizedText::new(),
            energy_certificate: LocalizedText::new(),
            energy_class: LocalizedText::new(),
            year_built: LocalizedText::new(),
            latitude: LocalizedText::new(),
            longitude: LocalizedText::new(),
            images: Vec::new(),
            agent: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawImage {
    pub url: String,
    pub description: Option<String>,
    /// Upstream type tag, e.g. `floor_plan`.
    pub kind: Option<String>,
    pub floor_plan_flag: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawAgent {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub photo: Option<String>,
}

/// Render a JSON scalar as text; objects, arrays and null yield `None`.
pub(crate) fn scalar_text(value: &Value) -> Option<String> {
    let text = match value {
        Value::String(text) => text.trim().to_string(),
        Value::Number(number) => number.to_string(),
        Value::Bool(flag) => flag.to_string(),
        _ => return None,
    };
    (!text.is_empty()).then_some(text)
}

pub(crate) fn text_at(object: &Value, key: &str) -> Option<String> {
    object.get(key).and_then(scalar_text)
}

pub(crate) fn flag_at(object: &Value, key: &str) -> bool {
    match object.get(key) {
        Some(Value::Bool(flag)) => *flag,
        Some(Value::String(text)) => matches!(text.trim(), "true" | "1" | "yes"),
        Some(Value::Number(number)) => number.as_i64() == Some(1),
        _ => false,
    }
}

pub(crate) fn parse_images(value: Option<&Value>) -> Vec<RawImage> {
    let Some(Value::Array(items)) = value else {
        return Vec::new();
    };

    items
        .iter()
        .filter_map(|item| match item {
            Value::String(url) => Some(RawImage {
                url: url.trim().to_string(),
                description: None,
                kind: None,
                floor_plan_flag: false,
            }),
            Value::Object(_) => Some(RawImage {
                url: text_at(item, "url")
                    .or_else(|| text_at(item, "src"))
                    .unwrap_or_default(),
                description: text_at(item, "description").or_else(|| text_at(item, "alt")),
                kind: text_at(item, "type"),
                floor_plan_flag: flag_at(item, "isFloorPlan") || flag_at(item, "floor_plan"),
            }),
            _ => None,
        })
        .filter(|image| !image.url.is_empty())
        .collect()
}
