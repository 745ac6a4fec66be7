//! Locale-specific display strings for prices, areas and fees.
//!
//! All functions are pure and never emit `NaN` or infinities; non-finite
//! input is treated as zero.

use super::locale::Language;
use super::numeric::hectares_from_square_meters;
use num_format::{Locale, ToFormattedString};

/// Plots above this many square meters are shown in hectares.
pub const HECTARE_DISPLAY_THRESHOLD: f64 = 10_000.0;

fn number_locale(language: Language) -> Locale {
    match language {
        Language::Fi => Locale::fi,
        Language::Sv => Locale::sv,
        Language::En => Locale::en,
    }
}

fn decimal_mark(language: Language) -> char {
    match language {
        Language::Fi | Language::Sv => ',',
        Language::En => '.',
    }
}

fn finite(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

/// Grouped number with at most `max_decimals` decimals, trailing zeros
/// trimmed.
pub fn format_number(value: f64, max_decimals: usize, language: Language) -> String {
    let value = finite(value);
    let rendered = format!("{:.*}", max_decimals, value.abs());
    let (whole, fraction) = rendered.split_once('.').unwrap_or((rendered.as_str(), ""));
    let whole = whole
        .parse::<u64>()
        .unwrap_or(0)
        .to_formatted_string(&number_locale(language));
    let fraction = fraction.trim_end_matches('0');

    let negative = value < 0.0 && (whole != "0" || !fraction.is_empty());
    let mut out = String::with_capacity(whole.len() + fraction.len() + 2);
    if negative {
        out.push('-');
    }
    out.push_str(&whole);
    if !fraction.is_empty() {
        out.push(decimal_mark(language));
        out.push_str(fraction);
    }
    out
}

/// Whole euros: fi/sv `500 000 €`, en `€500,000`.
pub fn format_currency(value: f64, language: Language) -> String {
    let amount = format_number(finite(value).round(), 0, language);
    euro(amount, language)
}

fn euro(amount: String, language: Language) -> String {
    match language {
        Language::Fi | Language::Sv => format!("{amount}\u{a0}€"),
        Language::En => match amount.strip_prefix('-') {
            Some(rest) => format!("-€{rest}"),
            None => format!("€{amount}"),
        },
    }
}

/// Square meters, or hectares once above [`HECTARE_DISPLAY_THRESHOLD`].
pub fn format_area(square_meters: f64, language: Language) -> String {
    let square_meters = finite(square_meters);
    if square_meters > HECTARE_DISPLAY_THRESHOLD {
        let hectares = hectares_from_square_meters(square_meters);
        format!("{}\u{a0}ha", format_number(hectares, 2, language))
    } else {
        format!("{}\u{a0}m²", format_number(square_meters, 1, language))
    }
}

pub const fn monthly_suffix(language: Language) -> &'static str {
    match language {
        Language::Fi => "/kk",
        Language::Sv => "/mån",
        Language::En => "/month",
    }
}

/// Monthly charge; cents are kept when present (`245,50 €/kk`).
pub fn format_fee(value: f64, language: Language) -> String {
    let amount = format_number(finite(value), 2, language);
    let amount = match amount.split_once(decimal_mark(language)) {
        Some((whole, cents)) if cents.len() == 1 => {
            format!("{whole}{}{cents}0", decimal_mark(language))
        }
        _ => amount,
    };
    format!("{}{}", euro(amount, language), monthly_suffix(language))
}

/// `price / area` when both are positive and the quotient is finite.
pub fn price_per_square_meter(price: Option<f64>, area: Option<f64>) -> Option<f64> {
    let price = price.filter(|value| value.is_finite() && *value > 0.0)?;
    let area = area.filter(|value| value.is_finite() && *value > 0.0)?;
    Some(price / area).filter(|value| value.is_finite())
}

pub fn format_price_per_square_meter(
    price: Option<f64>,
    area: Option<f64>,
    language: Language,
) -> Option<String> {
    price_per_square_meter(price, area)
        .map(|value| format!("{}/m²", format_currency(value, language)))
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Normalize locale grouping spaces for readable assertions.
    fn spaced(value: String) -> String {
        value
            .chars()
            .map(|c| if c.is_whitespace() { ' ' } else { c })
            .collect()
    }

    #[test]
    fn currency_per_locale() {
        assert_eq!(spaced(format_currency(500_000.0, Language::Fi)), "500 000 €");
        assert_eq!(spaced(format_currency(500_000.4, Language::Sv)), "500 000 €");
        assert_eq!(format_currency(500_000.0, Language::En), "€500,000");
        assert_eq!(spaced(format_currency(999.5, Language::Fi)), "1 000 €");
    }

    #[test]
    fn non_finite_values_render_as_zero() {
        assert_eq!(spaced(format_currency(f64::NAN, Language::Fi)), "0 €");
        assert_eq!(format_currency(f64::INFINITY, Language::En), "€0");
        assert_eq!(spaced(format_area(f64::NAN, Language::Fi)), "0 m²");
    }

    #[test]
    fn areas_use_decimal_comma_and_hectare_threshold() {
        assert_eq!(spaced(format_area(85.5, Language::Fi)), "85,5 m²");
        assert_eq!(spaced(format_area(85.0, Language::En)), "85 m²");
        assert_eq!(spaced(format_area(10_000.0, Language::Fi)), "10 000 m²");
        assert_eq!(spaced(format_area(15_000.0, Language::Fi)), "1,5 ha");
        assert_eq!(spaced(format_area(25_000.0, Language::En)), "2.5 ha");
    }

    #[test]
    fn fees_carry_monthly_suffix() {
        assert_eq!(spaced(format_fee(245.5, Language::Fi)), "245,50 €/kk");
        assert_eq!(spaced(format_fee(300.0, Language::Sv)), "300 €/mån");
        assert_eq!(format_fee(1_200.25, Language::En), "€1,200.25/month");
    }

    #[test]
    fn price_per_square_meter_guards_division() {
        assert_eq!(price_per_square_meter(Some(300_000.0), Some(60.0)), Some(5_000.0));
        assert_eq!(price_per_square_meter(Some(300_000.0), Some(0.0)), None);
        assert_eq!(price_per_square_meter(Some(300_000.0), None), None);
        assert_eq!(price_per_square_meter(Some(0.0), Some(60.0)), None);
        assert_eq!(price_per_square_meter(Some(f64::INFINITY), Some(60.0)), None);
        assert_eq!(
            format_price_per_square_meter(Some(300_000.0), Some(60.0), Language::En),
            Some("€5,000/m²".to_string())
        );
        assert_eq!(
            format_price_per_square_meter(Some(300_000.0), Some(0.0), Language::Fi),
            None
        );
    }

    #[test]
    fn negative_amounts_keep_sign() {
        assert_eq!(format_currency(-1_500.0, Language::En), "-€1,500");
        assert_eq!(spaced(format_number(-0.001, 1, Language::Fi)), "0");
    }
}
