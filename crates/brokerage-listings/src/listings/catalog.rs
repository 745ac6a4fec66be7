//! Key-path translation strings for labels the listing data does not carry.

use super::locale::Language;
use serde_json::Value;
use std::collections::HashMap;

const BUILTIN: [(Language, &str); 3] = [
    (Language::Fi, include_str!("../../locales/fi.json")),
    (Language::Sv, include_str!("../../locales/sv.json")),
    (Language::En, include_str!("../../locales/en.json")),
];

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("catalog for `{language}` is not valid JSON: {source}")]
    Parse {
        language: Language,
        #[source]
        source: serde_json::Error,
    },
    #[error("catalog for `{0}` must be a JSON object")]
    NotAnObject(Language),
}

/// Nested JSON catalogs per language, addressed by dotted keys such as
/// `fee.maintenance`. Lookups never fail: a key missing in the requested
/// language falls back to the base language and then to the key itself.
#[derive(Debug, Clone, Default)]
pub struct TranslationCatalog {
    entries: HashMap<Language, Value>,
}

impl TranslationCatalog {
    pub fn builtin() -> Result<Self, CatalogError> {
        let mut catalog = Self::default();
        for (language, source) in BUILTIN {
            catalog.load_json(language, source)?;
        }
        Ok(catalog)
    }

    /// Add or replace one language's catalog.
    pub fn load_json(&mut self, language: Language, source: &str) -> Result<(), CatalogError> {
        let value: Value = serde_json::from_str(source)
            .map_err(|source| CatalogError::Parse { language, source })?;
        if !value.is_object() {
            return Err(CatalogError::NotAnObject(language));
        }
        self.entries.insert(language, value);
        Ok(())
    }

    fn lookup(&self, language: Language, key: &str) -> Option<&str> {
        key.split('.')
            .try_fold(self.entries.get(&language)?, |node, segment| node.get(segment))?
            .as_str()
    }

    pub fn has_key(&self, language: Language, key: &str) -> bool {
        self.lookup(language, key).is_some()
    }

    pub fn translate(&self, language: Language, key: &str) -> String {
        self.translate_with(language, key, &[])
    }

    /// Translate and substitute `{name}` placeholders.
    pub fn translate_with(&self, language: Language, key: &str, params: &[(&str, &str)]) -> String {
        let Some(template) = self
            .lookup(language, key)
            .or_else(|| self.lookup(Language::BASE, key))
        else {
            return key.to_string();
        };

        params
            .iter()
            .fold(template.to_string(), |text, (name, value)| {
                text.replace(&format!("{{{name}}}"), value)
            })
    }
}
