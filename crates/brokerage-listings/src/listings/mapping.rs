use super::domain::EnergyCertificateStatus;
use regex::Regex;
use std::sync::OnceLock;
use tracing::warn;

// Checked in order. "not required" phrases must precede "has" phrases:
// "ei edellytä energiatodistusta" also contains "energiatodistus".
const EXEMPT_PHRASES: &[&str] = &[
    "exempt",
    "vapautettu",
    "vapaa energiatodistus",
    "undantag",
    "undantagen",
    "ei koske",
    "gäller inte",
];

const NOT_REQUIRED_PHRASES: &[&str] = &[
    "not required",
    "does not require",
    "no certificate",
    "ei edellytä",
    "ei vaadi",
    "ei tarvita",
    "ei tarvitse",
    "ei ole pakollinen",
    "kräver inte",
    "krävs inte",
    "behövs inte",
];

// Statements of absence. Checked before the "has" phrases since "finns inte"
// contains "finns".
const ABSENT_PHRASES: &[&str] = &[
    "finns inte",
    "finns ej",
    "saknas",
    "saknar energicertifikat",
    "har inte energicertifikat",
    "har ej energicertifikat",
    "ei ole energiatodistusta",
    "ei energiatodistusta",
    "energiatodistusta ei ole",
    "no energy certificate",
    "without an energy certificate",
    "without energy certificate",
    "certificate not available",
];

const HAS_CERTIFICATE_PHRASES: &[&str] = &[
    "has a certificate",
    "has an energy certificate",
    "certificate available",
    "on energiatodistus",
    "energiatodistus on",
    "kohteella on",
    "finns",
    "har energicertifikat",
    "yes",
    "kyllä",
    "ja",
];

pub(crate) fn energy_certificate_status(raw: Option<&str>) -> EnergyCertificateStatus {
    let Some(text) = raw.map(normalize_phrase).filter(|text| !text.is_empty()) else {
        return EnergyCertificateStatus::Unknown;
    };

    if contains_any(&text, EXEMPT_PHRASES) {
        EnergyCertificateStatus::Exempt
    } else if contains_any(&text, NOT_REQUIRED_PHRASES) {
        EnergyCertificateStatus::NotRequired
    } else if contains_any(&text, ABSENT_PHRASES) {
        EnergyCertificateStatus::Unknown
    } else if contains_any(&text, HAS_CERTIFICATE_PHRASES) {
        EnergyCertificateStatus::HasCertificate
    } else {
        EnergyCertificateStatus::Unknown
    }
}

pub(crate) const ENERGY_CLASS_PATTERN: &str =
    r"(?i)\b([A-G])(?:\s*[,(/-]?\s*(20\d{2}|19\d{2}))?\b";

/// Compile `pattern` once into `cell`. An invalid pattern is logged and
/// never matches.
pub(crate) fn cached_regex(
    cell: &'static OnceLock<Option<Regex>>,
    pattern: &str,
) -> Option<&'static Regex> {
    cell.get_or_init(|| match Regex::new(pattern) {
        Ok(regex) => Some(regex),
        Err(err) => {
            warn!(error = %err, pattern, "invalid classification pattern");
            None
        }
    })
    .as_ref()
}

pub(crate) fn energy_class(raw: Option<&str>) -> Option<String> {
    static CLASS: OnceLock<Option<Regex>> = OnceLock::new();
    let pattern = cached_regex(&CLASS, ENERGY_CLASS_PATTERN)?;

    let captures = pattern.captures(raw?.trim())?;
    let letter = captures.get(1)?.as_str().to_ascii_uppercase();
    Some(match captures.get(2) {
        Some(year) => format!("{letter}{}", year.as_str()),
        None => letter,
    })
}

const FLOOR_PLAN_PHRASES: &[&str] = &[
    "pohjakuva",
    "pohjapiirros",
    "planritning",
    "planlösning",
    "floor plan",
    "floorplan",
    "floor_plan",
];

pub(crate) fn is_floor_plan(kind: Option<&str>, description: Option<&str>) -> bool {
    [kind, description]
        .into_iter()
        .flatten()
        .map(normalize_phrase)
        .any(|text| contains_any(&text, FLOOR_PLAN_PHRASES))
}

/// Provider type codes for multi-unit residential buildings.
pub(crate) const APARTMENT_TYPE_CODES: &[&str] = &[
    "APARTMENT",
    "APARTMENT_HOUSE",
    "BLOCK_OF_FLATS",
    "FLAT",
    "KT",
    "LUHTITALO",
    "GALLERY_ACCESS_BLOCK",
];

/// Provider type codes for detached, terraced, semi-detached, cottage,
/// farm and plot listings.
pub(crate) const ESTATE_TYPE_CODES: &[&str] = &[
    "DETACHED_HOUSE",
    "OK",
    "ROW_HOUSE",
    "TERRACED_HOUSE",
    "RT",
    "SEMI_DETACHED_HOUSE",
    "PT",
    "PARITALO",
    "COTTAGE",
    "VACATION_HOME",
    "MO",
    "FARM",
    "MAATILA",
    "PLOT",
    "TONTTI",
    "LAND",
];

pub(crate) const COMMERCIAL_TYPE_CODES: &[&str] = &[
    "BUSINESS_PREMISES",
    "COMMERCIAL",
    "OFFICE",
    "RETAIL",
    "WAREHOUSE",
    "LIIKETILA",
    "TOIMISTO",
];

pub(crate) const COMMERCIAL_KEYWORDS: &[&str] = &[
    "office",
    "retail",
    "business premises",
    "commercial",
    "toimisto",
    "liiketila",
    "liikehuoneisto",
    "myymälä",
    "kontor",
    "affärslokal",
    "butikslokal",
];

pub(crate) const APARTMENT_KEYWORDS: &[&str] = &[
    "kerrostalo",
    "kerrostaloasunto",
    "yksiö",
    "kaksio",
    "kolmio",
    "höghus",
    "lägenhet",
    "apartment",
    "flat",
    "studio",
];

pub(crate) const ESTATE_KEYWORDS: &[&str] = &[
    "omakotitalo",
    "rivitalo",
    "paritalo",
    "mökki",
    "kesämökki",
    "huvila",
    "maatila",
    "tontti",
    "egnahemshus",
    "radhus",
    "parhus",
    "stuga",
    "villa",
    "detached house",
    "terraced house",
    "row house",
    "semi-detached",
    "cottage",
    "farm",
    "plot",
];

pub(crate) fn code_matches(code: Option<&str>, set: &[&str]) -> bool {
    let Some(code) = code else {
        return false;
    };
    let normalized = code.trim().to_ascii_uppercase().replace([' ', '-'], "_");
    set.iter().any(|candidate| *candidate == normalized)
}

pub(crate) fn normalize_phrase(value: &str) -> String {
    let cleaned = value.replace(['\u{feff}', '\u{200b}'], "");
    let collapsed = cleaned.split_whitespace().collect::<Vec<_>>().join(" ");
    collapsed.to_lowercase()
}

/// Whole-word (or whole-phrase) containment.
pub(crate) fn contains_any(haystack: &str, phrases: &[&str]) -> bool {
    phrases.iter().any(|phrase| contains_phrase(haystack, phrase))
}

fn contains_phrase(haystack: &str, phrase: &str) -> bool {
    haystack.match_indices(phrase).any(|(start, matched)| {
        let before = haystack[..start].chars().next_back();
        let after = haystack[start + matched.len()..].chars().next();
        !before.is_some_and(char::is_alphanumeric) && !after.is_some_and(char::is_alphanumeric)
    })
}
