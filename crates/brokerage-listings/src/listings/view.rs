//! Locale-specific view models. Nothing here carries a [`LocalizedText`];
//! every value is resolved and formatted for exactly one language.

use super::catalog::TranslationCatalog;
use super::classify::classify;
use super::domain::{
    AgentContact, CanonicalListing, Coordinates, EnergyCertificateStatus, FeeKind,
    ListingCategory,
};
use super::format::{
    format_area, format_currency, format_fee, format_price_per_square_meter,
};
use super::locale::{Language, LocalizedText, ResolutionSource};
use super::numeric::parse_number;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PropertyCardViewModel {
    pub id: String,
    pub slug: String,
    pub category: ListingCategory,
    pub category_label: String,
    /// Street and entrance letter; the apartment unit is never shown.
    pub address: String,
    pub city: String,
    pub district: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub living_area: Option<String>,
    pub room_layout: String,
    pub room_layout_missing: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,
    /// Set when a field is shown in the base language instead of the
    /// requested one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub translation_note: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PriceView {
    pub sales_price: Option<String>,
    pub debt_free_price: Option<String>,
    pub debt_portion: Option<String>,
    pub price_per_square_meter: Option<String>,
    /// Estates only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub property_tax: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AreaView {
    pub living: Option<String>,
    pub total: Option<String>,
    /// Commercial listings only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub commercial: Option<String>,
    pub plot: Option<String>,
    pub balcony: Option<String>,
    pub terrace: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CountView {
    pub rooms: Option<u32>,
    pub bedrooms: Option<u32>,
    pub bathrooms: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FeeLine {
    pub kind: FeeKind,
    pub label: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnergyView {
    pub status: EnergyCertificateStatus,
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RentalView {
    pub rent: String,
    pub deposit: Option<String>,
    pub contract_type: Option<String>,
    pub notice_period: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PropertyDetailViewModel {
    #[serde(flatten)]
    pub card: PropertyCardViewModel,
    pub identifier: Option<String>,
    pub postal_code: Option<String>,
    pub description: String,
    pub description_missing: bool,
    pub prices: PriceView,
    pub areas: AreaView,
    pub counts: CountView,
    pub fees: Vec<FeeLine>,
    pub total_fee: Option<String>,
    pub energy: EnergyView,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rental: Option<RentalView>,
    pub gallery: Vec<String>,
    pub floor_plans: Vec<String>,
    pub agent: Option<AgentContact>,
    pub coordinates: Option<Coordinates>,
    pub year_built: Option<u16>,
}

/// Builds view models for one language.
#[derive(Debug, Clone, Copy)]
pub struct PropertyViewBuilder<'a> {
    catalog: &'a TranslationCatalog,
    language: Language,
}

impl<'a> PropertyViewBuilder<'a> {
    pub fn new(catalog: &'a TranslationCatalog, language: Language) -> Self {
        Self { catalog, language }
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn card(&self, listing: &CanonicalListing) -> PropertyCardViewModel {
        self.card_with(listing, classify(listing), &mut FallbackTracker::default())
    }

    fn card_with(
        &self,
        listing: &CanonicalListing,
        category: ListingCategory,
        tracker: &mut FallbackTracker,
    ) -> PropertyCardViewModel {
        let language = self.language;
        let location = &listing.location;

        let street = tracker.resolve(&location.address, language);
        let address = match location.gate.as_deref() {
            Some(gate) if !street.is_empty() => format!("{street} {gate}"),
            _ => street,
        };
        let city = tracker.resolve(&location.city, language);
        let district = tracker.resolve(&location.district, language);

        let price = if listing.is_rental() {
            listing.rent.map(|rent| format_fee(rent, language))
        } else {
            listing
                .pricing
                .headline_price()
                .map(|price| format_currency(price, language))
        };
        let room_layout = listing.room_layout.resolve_strict(language);

        PropertyCardViewModel {
            id: listing.id.to_string(),
            slug: listing.slug.clone(),
            category,
            category_label: self
                .catalog
                .translate(language, &format!("category.{}", category.key())),
            address,
            city,
            district,
            price,
            living_area: listing
                .dimensions
                .living_area
                .map(|area| format_area(area, language)),
            room_layout: room_layout.value,
            room_layout_missing: room_layout.is_missing,
            thumbnail_url: listing.gallery().next().map(|image| image.url.clone()),
            translation_note: self.translation_note(tracker),
        }
    }

    pub fn detail(&self, listing: &CanonicalListing) -> PropertyDetailViewModel {
        let language = self.language;
        let category = classify(listing);
        let mut tracker = FallbackTracker::default();

        let rental = listing.rental.as_ref().map(|terms| RentalView {
            rent: format_fee(terms.monthly_rent, language),
            deposit: non_empty(tracker.resolve(&terms.deposit, language)).map(|deposit| {
                if is_plain_amount(&deposit) {
                    format_currency(parse_number(&deposit), language)
                } else {
                    deposit
                }
            }),
            contract_type: non_empty(tracker.resolve(&terms.contract_type, language)),
            notice_period: non_empty(tracker.resolve(&terms.notice_period, language)),
        });
        let card = self.card_with(listing, category, &mut tracker);

        let description = listing.description.resolve_strict(language);
        let pricing = &listing.pricing;
        let dimensions = &listing.dimensions;
        let per_area_basis = if category == ListingCategory::Commercial {
            dimensions.commercial_display_area()
        } else {
            dimensions.living_area
        };
        let currency = |value: Option<f64>| value.map(|value| format_currency(value, language));
        let area = |value: Option<f64>| value.map(|value| format_area(value, language));

        PropertyDetailViewModel {
            identifier: listing.identifier.clone(),
            postal_code: listing.location.postal_code.clone(),
            description: description.value,
            description_missing: description.is_missing,
            prices: PriceView {
                sales_price: currency(pricing.sales_price),
                debt_free_price: currency(pricing.debt_free_price),
                debt_portion: currency(pricing.debt_portion),
                price_per_square_meter: format_price_per_square_meter(
                    pricing.headline_price(),
                    per_area_basis,
                    language,
                ),
                property_tax: currency(pricing.property_tax)
                    .filter(|_| category == ListingCategory::Estate),
            },
            areas: AreaView {
                living: area(dimensions.living_area),
                total: area(dimensions.total_area),
                commercial: area(dimensions.commercial_display_area())
                    .filter(|_| category == ListingCategory::Commercial),
                plot: area(dimensions.plot_area),
                balcony: area(dimensions.balcony_area),
                terrace: area(dimensions.terrace_area),
            },
            counts: CountView {
                rooms: dimensions.room_count,
                bedrooms: dimensions.bedroom_count,
                bathrooms: dimensions.bathroom_count,
            },
            fees: listing
                .fees
                .present()
                .map(|(kind, value)| FeeLine {
                    kind,
                    label: self
                        .catalog
                        .translate(language, &format!("fee.{}", kind.key())),
                    value: format_fee(value, language),
                })
                .collect(),
            total_fee: listing
                .fees
                .total()
                .map(|total| format_fee(total, language)),
            energy: self.energy(listing),
            rental,
            gallery: listing.gallery().map(|image| image.url.clone()).collect(),
            floor_plans: listing
                .floor_plans()
                .map(|image| image.url.clone())
                .collect(),
            agent: listing.agent.clone(),
            coordinates: listing.location.coordinates,
            year_built: listing.year_built,
            card,
        }
    }

    fn energy(&self, listing: &CanonicalListing) -> EnergyView {
        let status = listing.energy.status;
        let class = listing.energy.class.clone();
        let label = match &class {
            Some(class) => self.catalog.translate_with(
                self.language,
                "energy.with_class",
                &[("class", class.as_str())],
            ),
            None => self
                .catalog
                .translate(self.language, &format!("energy.{}", status.key())),
        };
        EnergyView {
            status,
            label,
            class,
        }
    }

    fn translation_note(&self, tracker: &FallbackTracker) -> Option<String> {
        tracker.served_in.map(|served| {
            let name = self
                .catalog
                .translate(self.language, &format!("language.{}", served.code()));
            self.catalog.translate_with(
                self.language,
                "listing.translation_note",
                &[("language", name.as_str())],
            )
        })
    }
}

/// Records the first language a fallback-policy field was served in when
/// the requested one was missing. A field with neither the requested nor
/// the base language is served in whatever language the record has.
#[derive(Debug, Default)]
struct FallbackTracker {
    served_in: Option<Language>,
}

impl FallbackTracker {
    fn resolve(&mut self, text: &LocalizedText, language: Language) -> String {
        let indicated = text.resolve_fallback_indicated(language);
        match indicated.source {
            ResolutionSource::Requested => indicated.value,
            ResolutionSource::BaseFallback => {
                self.note(Language::BASE);
                indicated.value
            }
            ResolutionSource::Placeholder | ResolutionSource::Empty => {
                match text.first_available() {
                    Some((served, value)) => {
                        self.note(served);
                        value.to_string()
                    }
                    None => String::new(),
                }
            }
        }
    }

    fn note(&mut self, served: Language) {
        self.served_in.get_or_insert(served);
    }
}

fn non_empty(value: String) -> Option<String> {
    (!value.is_empty()).then_some(value)
}

fn is_plain_amount(value: &str) -> bool {
    value.chars().any(|c| c.is_ascii_digit())
        && value
            .chars()
            .all(|c| c.is_ascii_digit() || c.is_whitespace() || matches!(c, ',' | '.' | '€'))
}
