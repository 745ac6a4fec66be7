//! Multi-language value bags and the two resolution policies applied to them.
//!
//! Call sites choose a policy explicitly:
//!
//! * [`LocalizedText::resolve_strict`] for informational fields where a
//!   wrong-language string would mislead; a miss yields a per-language
//!   placeholder.
//! * [`LocalizedText::resolve_fallback`] for technical fields (addresses,
//!   codes, provider-authored text) where the base language is acceptable.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Languages the site is published in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Fi,
    Sv,
    En,
}

impl Language {
    /// Primary language of the provider data.
    pub const BASE: Language = Language::Fi;

    pub const fn all() -> [Self; 3] {
        [Self::Fi, Self::Sv, Self::En]
    }

    pub const fn code(self) -> &'static str {
        match self {
            Self::Fi => "fi",
            Self::Sv => "sv",
            Self::En => "en",
        }
    }

    /// Accepts BCP 47-ish tags such as `fi-FI`, `sv_SE` or `EN`.
    pub fn from_tag(tag: &str) -> Option<Self> {
        let primary = tag
            .trim()
            .split(['-', '_'])
            .next()
            .unwrap_or_default()
            .to_ascii_lowercase();
        match primary.as_str() {
            "fi" => Some(Self::Fi),
            "sv" => Some(Self::Sv),
            "en" => Some(Self::En),
            _ => None,
        }
    }

    pub const fn missing_placeholder(self) -> &'static str {
        match self {
            Self::Fi => "Tietoa ei saatavilla",
            Self::Sv => "Information inte tillgänglig",
            Self::En => "Information not available",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Outcome of resolving a [`LocalizedText`] for one language.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Resolved {
    pub value: String,
    /// `true` when the requested language had no usable value.
    pub is_missing: bool,
}

/// Where a resolved value came from; the "indicator" variant of resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionSource {
    Requested,
    BaseFallback,
    Placeholder,
    Empty,
}

impl ResolutionSource {
    /// Whether the caller should render a note such as "auto-translated".
    pub const fn is_fallback(self) -> bool {
        !matches!(self, Self::Requested)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IndicatedValue {
    pub value: String,
    pub source: ResolutionSource,
}

/// A value keyed by language. Blank entries are never stored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LocalizedText(BTreeMap<Language, String>);

impl LocalizedText {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn single(language: Language, value: impl Into<String>) -> Self {
        let mut text = Self::new();
        text.insert(language, value);
        text
    }

    pub fn insert(&mut self, language: Language, value: impl Into<String>) {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            self.0.remove(&language);
        } else {
            self.0.insert(language, trimmed.to_string());
        }
    }

    pub fn get(&self, language: Language) -> Option<&str> {
        self.0.get(&language).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn languages(&self) -> impl Iterator<Item = Language> + '_ {
        self.0.keys().copied()
    }

    pub fn values(&self) -> impl Iterator<Item = &str> {
        self.0.values().map(String::as_str)
    }

    /// Strict policy: requested language or a placeholder flagged as missing.
    pub fn resolve_strict(&self, language: Language) -> Resolved {
        let indicated = self.resolve_strict_indicated(language);
        Resolved {
            is_missing: indicated.source.is_fallback(),
            value: indicated.value,
        }
    }

    pub fn resolve_strict_indicated(&self, language: Language) -> IndicatedValue {
        match self.get(language) {
            Some(value) => IndicatedValue {
                value: value.to_string(),
                source: ResolutionSource::Requested,
            },
            None => IndicatedValue {
                value: language.missing_placeholder().to_string(),
                source: ResolutionSource::Placeholder,
            },
        }
    }

    /// Fallback policy: requested language, then the base language, then `""`.
    pub fn resolve_fallback(&self, language: Language) -> Resolved {
        let indicated = self.resolve_fallback_indicated(language);
        Resolved {
            is_missing: indicated.source.is_fallback(),
            value: indicated.value,
        }
    }

    pub fn resolve_fallback_indicated(&self, language: Language) -> IndicatedValue {
        if let Some(value) = self.get(language) {
            return IndicatedValue {
                value: value.to_string(),
                source: ResolutionSource::Requested,
            };
        }

        match self.get(Language::BASE) {
            Some(value) => IndicatedValue {
                value: value.to_string(),
                source: ResolutionSource::BaseFallback,
            },
            None => IndicatedValue {
                value: String::new(),
                source: ResolutionSource::Empty,
            },
        }
    }

    /// Base-language value via the fallback policy; used by ingestion.
    pub fn base_value(&self) -> Option<&str> {
        self.first_available().map(|(_, value)| value)
    }

    /// First language holding a value, base language first.
    pub fn first_available(&self) -> Option<(Language, &str)> {
        std::iter::once(Language::BASE)
            .chain(Language::all())
            .find_map(|language| self.get(language).map(|value| (language, value)))
    }
}

impl FromIterator<(Language, String)> for LocalizedText {
    fn from_iter<T: IntoIterator<Item = (Language, String)>>(iter: T) -> Self {
        let mut text = Self::new();
        for (language, value) in iter {
            text.insert(language, value);
        }
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn finnish_only() -> LocalizedText {
        LocalizedText::single(Language::Fi, "Suomi")
    }

    #[test]
    fn parses_language_tags() {
        assert_eq!(Language::from_tag("fi-FI"), Some(Language::Fi));
        assert_eq!(Language::from_tag("SV_se"), Some(Language::Sv));
        assert_eq!(Language::from_tag(" en "), Some(Language::En));
        assert_eq!(Language::from_tag("de"), None);
        assert_eq!(Language::from_tag(""), None);
    }

    #[test]
    fn strict_miss_yields_language_placeholder() {
        let resolved = finnish_only().resolve_strict(Language::Sv);
        assert_eq!(resolved.value, "Information inte tillgänglig");
        assert!(resolved.is_missing);

        let resolved = finnish_only().resolve_strict(Language::En);
        assert_eq!(resolved.value, "Information not available");
    }

    #[test]
    fn fallback_miss_uses_base_language() {
        let resolved = finnish_only().resolve_fallback(Language::Sv);
        assert_eq!(resolved.value, "Suomi");
        assert!(resolved.is_missing);
    }

    #[test]
    fn hits_are_not_flagged() {
        let text = finnish_only();
        assert_eq!(
            text.resolve_strict(Language::Fi),
            Resolved {
                value: "Suomi".to_string(),
                is_missing: false
            }
        );
        assert!(!text.resolve_fallback(Language::Fi).is_missing);
    }

    #[test]
    fn blank_values_count_as_missing() {
        let mut text = LocalizedText::new();
        text.insert(Language::Sv, "   ");
        assert!(text.is_empty());
        assert!(text.resolve_strict(Language::Sv).is_missing);
    }

    #[test]
    fn fallback_without_base_is_empty() {
        let text = LocalizedText::single(Language::En, "English");
        let indicated = text.resolve_fallback_indicated(Language::Sv);
        assert_eq!(indicated.value, "");
        assert_eq!(indicated.source, ResolutionSource::Empty);
        assert_eq!(text.base_value(), Some("English"));
        assert_eq!(text.first_available(), Some((Language::En, "English")));
    }

    #[test]
    fn indicator_reports_source() {
        let text = finnish_only();
        assert_eq!(
            text.resolve_fallback_indicated(Language::Fi).source,
            ResolutionSource::Requested
        );
        assert_eq!(
            text.resolve_fallback_indicated(Language::En).source,
            ResolutionSource::BaseFallback
        );
        assert_eq!(
            text.resolve_strict_indicated(Language::En).source,
            ResolutionSource::Placeholder
        );
    }
}
