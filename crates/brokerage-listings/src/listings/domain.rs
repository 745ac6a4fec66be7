use super::locale::{Language, LocalizedText};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Provider-assigned listing identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ListingId(pub String);

impl ListingId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ListingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Upstream a listing was ingested from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    Provider,
    ContentManagement,
}

impl SourceKind {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Provider => "provider",
            Self::ContentManagement => "content_management",
        }
    }
}

/// Presentation category; exactly one per listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ListingCategory {
    Apartment,
    Estate,
    Rental,
    Commercial,
}

impl ListingCategory {
    pub const fn ordered() -> [Self; 4] {
        [Self::Apartment, Self::Estate, Self::Rental, Self::Commercial]
    }

    pub const fn key(self) -> &'static str {
        match self {
            Self::Apartment => "apartment",
            Self::Estate => "estate",
            Self::Rental => "rental",
            Self::Commercial => "commercial",
        }
    }

    pub fn from_key(value: &str) -> Option<Self> {
        Self::ordered()
            .into_iter()
            .find(|category| category.key().eq_ignore_ascii_case(value.trim()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Location {
    /// Street address without entrance letter or apartment unit.
    pub address: LocalizedText,
    pub city: LocalizedText,
    pub district: LocalizedText,
    pub postal_code: Option<String>,
    /// Building entrance letter; part of display addresses.
    pub gate: Option<String>,
    /// Apartment unit; never shown in display addresses.
    pub apartment_number: Option<String>,
    pub coordinates: Option<Coordinates>,
}

impl Location {
    /// Street address plus entrance letter, e.g. `Mannerheimintie 12 A`.
    pub fn display_address(&self, language: Language) -> String {
        let street = self.address.resolve_fallback(language).value;
        match self.gate.as_deref() {
            Some(gate) if !street.is_empty() => format!("{street} {gate}"),
            _ => street,
        }
    }

    /// Street address plus entrance letter in the first language that has a
    /// street, base language first.
    pub fn primary_address(&self) -> String {
        match self.address.first_available() {
            Some((language, _)) => self.display_address(language),
            None => String::new(),
        }
    }

    /// Text the slug is derived from.
    pub fn slug_source(&self) -> String {
        self.primary_address()
    }
}

/// Sales figures. `debt_portion` is never negative.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Pricing {
    pub sales_price: Option<f64>,
    pub debt_free_price: Option<f64>,
    pub debt_portion: Option<f64>,
    /// Annual property tax; only meaningful for estates.
    pub property_tax: Option<f64>,
}

impl Pricing {
    /// Reconcile the three price fields; clamps the debt portion at zero.
    pub fn reconcile(
        sales_price: Option<f64>,
        debt_free_price: Option<f64>,
        supplied_debt_portion: Option<f64>,
        property_tax: Option<f64>,
    ) -> Self {
        let supplied_debt_portion = supplied_debt_portion.map(|value| value.max(0.0));
        let debt_free_price = debt_free_price.or(match (sales_price, supplied_debt_portion) {
            (Some(sales), Some(debt)) if debt > 0.0 => Some(sales + debt),
            _ => None,
        });
        let debt_portion = match supplied_debt_portion {
            Some(debt) if debt > 0.0 => Some(debt),
            _ => match (sales_price, debt_free_price) {
                (Some(sales), Some(debt_free)) => Some(debt_portion(sales, debt_free)),
                _ => supplied_debt_portion,
            },
        };

        Self {
            sales_price,
            debt_free_price,
            debt_portion,
            property_tax,
        }
    }

    /// Price shown on cards: debt-free price, then sales price.
    pub fn headline_price(&self) -> Option<f64> {
        self.debt_free_price.or(self.sales_price)
    }
}

/// `max(0, debt_free_price - sales_price)`.
pub fn debt_portion(sales_price: f64, debt_free_price: f64) -> f64 {
    (debt_free_price - sales_price).max(0.0)
}

/// Areas in square meters, all non-negative.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dimensions {
    pub living_area: Option<f64>,
    pub total_area: Option<f64>,
    pub business_area: Option<f64>,
    pub plot_area: Option<f64>,
    pub balcony_area: Option<f64>,
    pub terrace_area: Option<f64>,
    pub room_count: Option<u32>,
    pub bedroom_count: Option<u32>,
    pub bathroom_count: Option<u32>,
}

impl Dimensions {
    /// Business area, or total area when the component is absent.
    pub fn commercial_display_area(&self) -> Option<f64> {
        self.business_area.or(self.total_area)
    }

    pub fn has_plot(&self) -> bool {
        self.plot_area.is_some_and(|area| area > 0.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeeKind {
    Maintenance,
    Financing,
    Water,
    Heating,
    Electricity,
    Parking,
    Sauna,
}

impl FeeKind {
    pub const fn ordered() -> [Self; 7] {
        [
            Self::Maintenance,
            Self::Financing,
            Self::Water,
            Self::Heating,
            Self::Electricity,
            Self::Parking,
            Self::Sauna,
        ]
    }

    pub const fn key(self) -> &'static str {
        match self {
            Self::Maintenance => "maintenance",
            Self::Financing => "financing",
            Self::Water => "water",
            Self::Heating => "heating",
            Self::Electricity => "electricity",
            Self::Parking => "parking",
            Self::Sauna => "sauna",
        }
    }
}

/// Monthly charges.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Fees {
    pub maintenance: Option<f64>,
    pub financing: Option<f64>,
    pub water: Option<f64>,
    pub heating: Option<f64>,
    pub electricity: Option<f64>,
    pub parking: Option<f64>,
    pub sauna: Option<f64>,
}

impl Fees {
    pub fn get(&self, kind: FeeKind) -> Option<f64> {
        match kind {
            FeeKind::Maintenance => self.maintenance,
            FeeKind::Financing => self.financing,
            FeeKind::Water => self.water,
            FeeKind::Heating => self.heating,
            FeeKind::Electricity => self.electricity,
            FeeKind::Parking => self.parking,
            FeeKind::Sauna => self.sauna,
        }
    }

    /// Fixed charges only: maintenance + financing. Consumption-based
    /// charges are excluded.
    pub fn total(&self) -> Option<f64> {
        match (self.maintenance, self.financing) {
            (None, None) => None,
            (maintenance, financing) => Some(maintenance.unwrap_or(0.0) + financing.unwrap_or(0.0)),
        }
    }

    pub fn present(&self) -> impl Iterator<Item = (FeeKind, f64)> + '_ {
        FeeKind::ordered()
            .into_iter()
            .filter_map(|kind| self.get(kind).map(|value| (kind, value)))
    }
}

/// Raw signals the classifier reads.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClassificationInputs {
    pub type_code: Option<String>,
    pub type_label: LocalizedText,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnergyCertificateStatus {
    HasCertificate,
    NotRequired,
    Exempt,
    #[default]
    Unknown,
}

impl EnergyCertificateStatus {
    pub const fn key(self) -> &'static str {
        match self {
            Self::HasCertificate => "has_certificate",
            Self::NotRequired => "not_required",
            Self::Exempt => "exempt",
            Self::Unknown => "unknown",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnergyCertificate {
    pub status: EnergyCertificateStatus,
    /// Class letter with optional year suffix, e.g. `C2018`.
    pub class: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImageKind {
    Gallery,
    FloorPlan,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingImage {
    pub url: String,
    pub description: Option<String>,
    pub kind: ImageKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentContact {
    pub name: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub photo_url: Option<String>,
}

/// Present only on rentals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RentalTerms {
    pub monthly_rent: f64,
    pub deposit: LocalizedText,
    pub contract_type: LocalizedText,
    pub notice_period: LocalizedText,
}

/// Normalized, language-neutral listing. Built only by the converter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalListing {
    pub id: ListingId,
    /// Running listing number, when the provider supplies one.
    pub identifier: Option<String>,
    pub slug: String,
    pub source: SourceKind,
    pub location: Location,
    pub pricing: Pricing,
    pub dimensions: Dimensions,
    pub fees: Fees,
    pub classification: ClassificationInputs,
    /// Monthly rent as supplied; `Some` with a positive value marks a rental.
    pub rent: Option<f64>,
    pub rental: Option<RentalTerms>,
    pub room_layout: LocalizedText,
    pub description: LocalizedText,
    pub energy: EnergyCertificate,
    pub year_built: Option<u16>,
    pub media: Vec<ListingImage>,
    pub agent: Option<AgentContact>,
}

impl CanonicalListing {
    pub fn is_rental(&self) -> bool {
        self.rent.is_some_and(|rent| rent > 0.0)
    }

    pub fn gallery(&self) -> impl Iterator<Item = &ListingImage> {
        self.media
            .iter()
            .filter(|image| image.kind == ImageKind::Gallery)
    }

    pub fn floor_plans(&self) -> impl Iterator<Item = &ListingImage> {
        self.media
            .iter()
            .filter(|image| image.kind == ImageKind::FloorPlan)
    }
}
