use super::adapters::{cms, provider, ListingRecord, RawAgent, RawImage};
use super::domain::{
    AgentContact, CanonicalListing, ClassificationInputs, Coordinates, Dimensions,
    EnergyCertificate, EnergyCertificateStatus, Fees, ImageKind, ListingId, ListingImage,
    Location, Pricing, RentalTerms, SourceKind,
};
use super::locale::LocalizedText;
use super::mapping;
use super::numeric::{parse_optional, to_square_meters, AreaUnit};
use super::slug::derive_slug;
use serde_json::Value;
use tracing::debug;

/// Convert a raw brokerage-provider record.
pub fn convert_provider(raw: &Value) -> CanonicalListing {
    convert(&provider::adapt(raw))
}

/// Convert a raw content-management post.
pub fn convert_cms(raw: &Value) -> CanonicalListing {
    convert(&cms::adapt(raw))
}

/// Convert a whole upstream payload, skipping entries that are not objects.
pub fn convert_payload(source: SourceKind, records: &[Value]) -> Vec<CanonicalListing> {
    records
        .iter()
        .enumerate()
        .filter_map(|(index, raw)| {
            if !raw.is_object() {
                debug!(index, source = source.label(), "skipping non-object record");
                return None;
            }
            Some(match source {
                SourceKind::Provider => convert_provider(raw),
                SourceKind::ContentManagement => convert_cms(raw),
            })
        })
        .collect()
}

/// Build the canonical listing. Total: missing or malformed fields degrade
/// to `None`.
pub fn convert(record: &ListingRecord) -> CanonicalListing {
    let location = Location {
        address: record.address.clone(),
        city: record.city.clone(),
        district: record.district.clone(),
        postal_code: plain(&record.postal_code),
        gate: plain(&record.gate),
        apartment_number: plain(&record.apartment_number),
        coordinates: coordinates(&record.latitude, &record.longitude),
    };

    let pricing = Pricing::reconcile(
        positive(&record.ask_price),
        positive(&record.debt_free_price),
        number(&record.debt_portion),
        positive(&record.property_tax),
    );

    let living_area = area(&record.living_area);
    let business_area = area(&record.business_area);
    let other_area = area(&record.other_area);
    let total_area = area(&record.total_area).or_else(|| {
        if business_area.is_none() && other_area.is_none() {
            return None;
        }
        Some(living_area.unwrap_or(0.0) + business_area.unwrap_or(0.0) + other_area.unwrap_or(0.0))
    });
    let plot_unit = AreaUnit::parse(record.plot_area_unit.base_value());
    let plot_area = area(&record.plot_area).map(|value| to_square_meters(value, plot_unit));

    let dimensions = Dimensions {
        living_area,
        total_area,
        business_area,
        plot_area,
        balcony_area: area(&record.balcony_area),
        terrace_area: area(&record.terrace_area),
        room_count: count(&record.room_count),
        bedroom_count: count(&record.bedroom_count),
        bathroom_count: count(&record.bathroom_count),
    };

    let fees = Fees {
        maintenance: non_negative(&record.maintenance_fee),
        financing: non_negative(&record.financing_fee),
        water: non_negative(&record.water_fee),
        heating: non_negative(&record.heating_fee),
        electricity: non_negative(&record.electricity_fee),
        parking: non_negative(&record.parking_fee),
        sauna: non_negative(&record.sauna_fee),
    };

    let rent = positive(&record.rent);
    let rental = rent.map(|monthly_rent| RentalTerms {
        monthly_rent,
        deposit: record.rent_deposit.clone(),
        contract_type: record.rent_contract_type.clone(),
        notice_period: record.notice_period.clone(),
    });

    let identifier = record.identifier.clone().filter(|value| !value.trim().is_empty());
    let slug = derive_slug(&location.slug_source(), &record.id, identifier.as_deref());

    let listing = CanonicalListing {
        id: ListingId(record.id.clone()),
        identifier,
        slug,
        source: record.source,
        location,
        pricing,
        dimensions,
        fees,
        classification: ClassificationInputs {
            type_code: plain(&record.type_code),
            type_label: record.type_label.clone(),
        },
        rent,
        rental,
        room_layout: record.room_layout.clone(),
        description: record.description.clone(),
        energy: EnergyCertificate {
            status: energy_status(&record.energy_certificate),
            class: mapping::energy_class(record.energy_class.base_value()),
        },
        year_built: year(&record.year_built),
        media: record.images.iter().map(image).collect(),
        agent: record.agent.as_ref().map(agent),
    };

    debug!(id = %listing.id, slug = %listing.slug, "converted listing record");
    listing
}

fn plain(text: &LocalizedText) -> Option<String> {
    text.base_value().map(str::to_string)
}

fn number(text: &LocalizedText) -> Option<f64> {
    text.base_value().map(|raw| parse_optional(Some(raw)))
}

fn positive(text: &LocalizedText) -> Option<f64> {
    number(text).filter(|value| *value > 0.0)
}

fn non_negative(text: &LocalizedText) -> Option<f64> {
    number(text).filter(|value| *value >= 0.0)
}

fn area(text: &LocalizedText) -> Option<f64> {
    positive(text)
}

fn count(text: &LocalizedText) -> Option<u32> {
    positive(text)
        .map(f64::round)
        .filter(|value| *value <= f64::from(u32::MAX))
        .map(|value| value as u32)
        .filter(|value| *value > 0)
}

fn year(text: &LocalizedText) -> Option<u16> {
    positive(text)
        .map(|value| value.trunc())
        .filter(|value| (1700.0..=2100.0).contains(value))
        .map(|value| value as u16)
}

fn coordinates(latitude: &LocalizedText, longitude: &LocalizedText) -> Option<Coordinates> {
    let latitude = number(latitude)?;
    let longitude = number(longitude)?;
    let valid = (-90.0..=90.0).contains(&latitude)
        && (-180.0..=180.0).contains(&longitude)
        && !(latitude == 0.0 && longitude == 0.0);
    valid.then_some(Coordinates {
        latitude,
        longitude,
    })
}

fn energy_status(text: &LocalizedText) -> EnergyCertificateStatus {
    text.base_value()
        .into_iter()
        .chain(text.values())
        .map(|value| mapping::energy_certificate_status(Some(value)))
        .find(|status| *status != EnergyCertificateStatus::Unknown)
        .unwrap_or_default()
}

fn image(raw: &RawImage) -> ListingImage {
    let floor_plan =
        raw.floor_plan_flag || mapping::is_floor_plan(raw.kind.as_deref(), raw.description.as_deref());
    ListingImage {
        url: raw.url.clone(),
        description: raw.description.clone(),
        kind: if floor_plan {
            ImageKind::FloorPlan
        } else {
            ImageKind::Gallery
        },
    }
}

fn agent(raw: &RawAgent) -> AgentContact {
    AgentContact {
        name: raw.name.clone().unwrap_or_default(),
        phone: raw.phone.clone(),
        email: raw.email.clone(),
        photo_url: raw.photo.clone(),
    }
}
