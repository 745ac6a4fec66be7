use super::{parse_images, scalar_text, text_at, ListingRecord, RawAgent};
use crate::listings::domain::SourceKind;
use crate::listings::locale::{Language, LocalizedText};
use serde_json::Value;

/// Reduce one brokerage-provider record to a [`ListingRecord`].
///
/// Total: unknown shapes and missing keys produce empty fields.
pub fn adapt(raw: &Value) -> ListingRecord {
    let mut record = ListingRecord::empty(SourceKind::Provider);
    let field = |key: &str| localized(raw.get(key));

    record.id = field("id").base_value().unwrap_or_default().to_string();
    record.identifier = field("identifier").base_value().map(str::to_string);
    record.address = field("address");
    record.gate = field("gate");
    record.apartment_number = field("apartmentNumber");
    record.postal_code = field("postalCode");
    record.city = field("city");
    record.district = field("district");
    record.ask_price = field("askPrice");
    record.debt_free_price = field("debtFreePrice");
    record.debt_portion = first_present(&[field("debtPortion"), field("debtShare")]);
    record.property_tax = field("propertyTax");
    record.living_area = field("livingArea");
    record.total_area = field("totalArea");
    record.business_area = field("businessArea");
    record.other_area = field("otherArea");
    record.plot_area = field("plotArea");
    record.plot_area_unit = field("plotAreaUnit");
    record.balcony_area = field("balconyArea");
    record.terrace_area = field("terraceArea");
    record.room_count = field("roomCount");
    record.bedroom_count = field("bedroomCount");
    record.bathroom_count = field("bathroomCount");
    record.maintenance_fee = field("maintenanceFee");
    record.financing_fee = field("financingFee");
    record.water_fee = field("waterFee");
    record.heating_fee = field("heatingFee");
    record.electricity_fee = field("electricityFee");
    record.parking_fee = field("parkingFee");
    record.sauna_fee = field("saunaFee");
    record.rent = field("rent");
    record.rent_deposit = field("rentDeposit");
    record.rent_contract_type = field("rentContractType");
    record.notice_period = field("noticePeriod");
    record.type_code = field("listingType");
    record.type_label = field("typeOfApartment");
    record.room_layout = field("roomLayout");
    record.description = field("description");
    record.energy_certificate = field("energyCertificate");
    record.energy_class = field("energyClass");
    record.year_built = field("yearBuilt");
    record.latitude = field("latitude");
    record.longitude = field("longitude");
    record.images = parse_images(raw.get("images"));
    record.agent = raw.get("agent").and_then(agent);

    record
}

/// Read a provider value in any of its shapes:
/// `"x"`, `12`, `{"fi": "x"}`, `{"fi": {"value": "x"}}` or
/// `[{"language": "fi", "value": "x"}]`.
pub(crate) fn localized(value: Option<&Value>) -> LocalizedText {
    let Some(value) = value else {
        return LocalizedText::new();
    };

    match value {
        Value::Object(map) => map
            .iter()
            .filter_map(|(key, entry)| {
                let language = Language::from_tag(key)?;
                let text = scalar_text(entry).or_else(|| text_at(entry, "value"))?;
                Some((language, text))
            })
            .collect(),
        Value::Array(entries) => entries
            .iter()
            .filter_map(|entry| {
                let language = text_at(entry, "language")
                    .or_else(|| text_at(entry, "lang"))
                    .and_then(|tag| Language::from_tag(&tag))?;
                Some((language, text_at(entry, "value")?))
            })
            .collect(),
        scalar => scalar_text(scalar)
            .map(|text| LocalizedText::single(Language::BASE, text))
            .unwrap_or_default(),
    }
}

fn first_present(candidates: &[LocalizedText]) -> LocalizedText {
    candidates
        .iter()
        .find(|text| !text.is_empty())
        .cloned()
        .unwrap_or_default()
}

fn agent(value: &Value) -> Option<RawAgent> {
    if !value.is_object() {
        return None;
    }
    let pick = |keys: &[&str]| {
        keys.iter()
            .find_map(|key| localized(value.get(*key)).base_value().map(str::to_string))
    };

    let agent = RawAgent {
        name: pick(&["name"]),
        phone: pick(&["phone", "phoneNumber"]),
        email: pick(&["email"]),
        photo: pick(&["avatar", "photo", "image"]),
    };
    (agent.name.is_some() || agent.phone.is_some() || agent.email.is_some()).then_some(agent)
}
