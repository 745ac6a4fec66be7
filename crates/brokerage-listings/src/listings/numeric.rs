use serde::{Deserialize, Serialize};
use serde_json::Value;

const SQUARE_METERS_PER_HECTARE: f64 = 10_000.0;

/// Parse a locale-ambiguous numeric string into a canonical number.
///
/// Never fails: anything that does not reduce to a number yields `0.0`.
/// When both `,` and `.` appear, dots are thousands separators and the comma
/// is the decimal mark (`"142.951.999,45 €"` → `142951999.45`). A single
/// comma is a decimal mark; a single dot is already canonical. Unit
/// suffixes (`m2`, `m²`, `m3`, `m³`, `ha`) are dropped before their digits
/// can leak into the value.
pub fn parse_number(raw: &str) -> f64 {
    let cleaned: String = strip_unit_suffixes(raw)
        .chars()
        .filter(|c| c.is_ascii_digit() || matches!(c, ',' | '.' | '-'))
        .collect();

    if !cleaned.chars().any(|c| c.is_ascii_digit()) {
        return 0.0;
    }

    let commas = cleaned.matches(',').count();
    let dots = cleaned.matches('.').count();

    let canonical = match (commas, dots) {
        (0, 0) | (0, 1) => cleaned,
        (0, _) => cleaned.replace('.', ""),
        (1, 0) => cleaned.replace(',', "."),
        (_, 0) => cleaned.replace(',', ""),
        _ => cleaned.replace('.', "").replace(',', "."),
    };

    match canonical.parse::<f64>() {
        Ok(value) if value.is_finite() => value,
        _ => 0.0,
    }
}

fn strip_unit_suffixes(raw: &str) -> String {
    let mut stripped = String::with_capacity(raw.len());
    let mut chars = raw.chars().peekable();
    while let Some(c) = chars.next() {
        if matches!(c, 'm' | 'M') && matches!(chars.peek(), Some('2' | '3' | '²' | '³')) {
            chars.next();
            stripped.push(' ');
            continue;
        }
        stripped.push(c);
    }
    stripped
}

/// Same as [`parse_number`] for optional input; `None` yields `0.0`.
pub fn parse_optional(raw: Option<&str>) -> f64 {
    raw.map(parse_number).unwrap_or(0.0)
}

/// Parse a loosely typed JSON scalar (string, number or null).
pub fn parse_value(raw: &Value) -> f64 {
    match raw {
        Value::Number(number) => number.as_f64().filter(|v| v.is_finite()).unwrap_or(0.0),
        Value::String(text) => parse_number(text),
        _ => 0.0,
    }
}

/// Unit an area figure was supplied in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AreaUnit {
    #[default]
    SquareMeters,
    Hectares,
}

impl AreaUnit {
    /// Anything unrecognized, including a missing unit, means square meters.
    pub fn parse(raw: Option<&str>) -> Self {
        let Some(raw) = raw else {
            return Self::SquareMeters;
        };
        match raw.trim().trim_end_matches('.').to_lowercase().as_str() {
            "ha" | "hehtaari" | "hehtaaria" | "hectare" | "hectares" | "hektar" => Self::Hectares,
            _ => Self::SquareMeters,
        }
    }
}

/// Convert an area in `unit` to square meters. Call exactly once, at ingestion.
pub fn to_square_meters(value: f64, unit: AreaUnit) -> f64 {
    match unit {
        AreaUnit::SquareMeters => value,
        AreaUnit::Hectares => value * SQUARE_METERS_PER_HECTARE,
    }
}

pub(crate) fn hectares_from_square_meters(value: f64) -> f64 {
    value / SQUARE_METERS_PER_HECTARE
}
