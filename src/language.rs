use nutype::nutype;
use serde_json::Value;

use crate::WikidataError;

/// Language code used when the requested language has no label.
pub const MUL_LANGUAGE: &str = "mul";

/// Last-resort language for labels and descriptions.
pub const FALLBACK_LANGUAGE: &str = "en";

#[nutype(
    sanitize(trim, lowercase),
    validate(regex = "^[a-z]{2,3}(-[a-z0-9]+)*$"),
    derive(Debug, Display, Clone, PartialEq, AsRef)
)]
pub struct Language(String);

impl Language {
    /// Parses a language code, mapping the validation error into the crate error.
    pub fn parse<S: Into<String>>(code: S) -> Result<Self, WikidataError> {
        let code = code.into();
        Self::try_new(code.clone()).map_err(|_| WikidataError::InvalidLanguage(code))
    }

    /// The chain of languages tried for a label: requested, `mul`, `en`.
    pub fn fallback_chain(&self) -> Vec<&str> {
        let mut chain = vec![AsRef::<str>::as_ref(self)];
        for lang in [MUL_LANGUAGE, FALLBACK_LANGUAGE] {
            if !chain.contains(&lang) {
                chain.push(lang);
            }
        }
        chain
    }

    /// The `languages` parameter for `wbgetentities`, covering the fallback chain.
    pub fn request_languages(&self) -> String {
        self.fallback_chain().join("|")
    }

    /// Picks the first non-empty value along the fallback chain from a
    /// `{"en": {"language": "en", "value": "..."}}` map, or an empty string.
    pub fn pick(&self, language_map: &Value) -> String {
        self.fallback_chain()
            .into_iter()
            .find_map(|lang| {
                language_map.get(lang)?["value"]
                    .as_str()
                    .filter(|value| !value.is_empty())
            })
            .unwrap_or_default()
            .to_string()
    }
}
