use super::{parse_images, text_at, ListingRecord, RawAgent};
use crate::listings::domain::SourceKind;
use crate::listings::locale::{Language, LocalizedText};
use serde_json::Value;

/// Reduce one content-management post to a [`ListingRecord`].
///
/// Posts are single-language; the post's `lang` (base language when absent)
/// keys every text value.
pub fn adapt(raw: &Value) -> ListingRecord {
    let mut record = ListingRecord::empty(SourceKind::ContentManagement);
    let language = text_at(raw, "lang")
        .and_then(|tag| Language::from_tag(&tag))
        .unwrap_or(Language::BASE);
    let empty = Value::Null;
    let acf = raw.get("acf").filter(|acf| acf.is_object()).unwrap_or(&empty);
    let field = |key: &str| text_at(acf, key).map(|text| LocalizedText::single(language, text));
    let text = |key: &str| field(key).unwrap_or_default();

    record.id = text_at(raw, "id").unwrap_or_default();
    record.identifier = text_at(acf, "identifier");
    record.address = field("address")
        .or_else(|| title(raw).map(|title| LocalizedText::single(language, title)))
        .unwrap_or_default();
    record.gate = text("gate");
    record.apartment_number = text("apartment_number");
    record.postal_code = text("postal_code");
    record.city = text("city");
    record.district = text("district");
    record.ask_price = text("price");
    record.debt_free_price = text("debt_free_price");
    record.debt_portion = text("debt_portion");
    record.property_tax = text("property_tax");
    record.living_area = text("living_area");
    record.total_area = text("total_area");
    record.business_area = text("business_area");
    record.plot_area = text("plot_area");
    record.plot_area_unit = text("plot_area_unit");
    record.balcony_area = text("balcony_area");
    record.room_count = text("rooms");
    record.bathroom_count = text("bathrooms");
    record.maintenance_fee = text("maintenance_fee");
    record.financing_fee = text("financing_fee");
    record.water_fee = text("water_fee");
    record.rent = text("rent");
    record.rent_deposit = text("deposit");
    record.type_code = text("type_code");
    record.type_label = text("type");
    record.room_layout = text("room_layout");
    record.description = text("description");
    record.energy_certificate = text("energy_certificate");
    record.energy_class = text("energy_class");
    record.year_built = text("year_built");
    record.latitude = text("latitude");
    record.longitude = text("longitude");
    record.images = parse_images(acf.get("images"));

    let agent = RawAgent {
        name: text_at(acf, "agent_name"),
        phone: text_at(acf, "agent_phone"),
        email: text_at(acf, "agent_email"),
        photo: text_at(acf, "agent_photo"),
    };
    if agent.name.is_some() || agent.phone.is_some() || agent.email.is_some() {
        record.agent = Some(agent);
    }

    record
}

fn title(raw: &Value) -> Option<String> {
    raw.get("title")
        .and_then(|title| text_at(title, "rendered").or_else(|| super::scalar_text(title)))
}
