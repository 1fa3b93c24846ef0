//! Language fallback for multilingual labels.

use serde::Deserialize;
use std::collections::HashMap;

/// `{ "value": ... }` entry of a Wikibase label/description map.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LangValue {
    #[serde(default)]
    pub value: String,
}

/// Wikibase term map: language code to `{ value }`.
pub type TermMap = HashMap<String, LangValue>;

/// Ordered list of language codes to try.
///
/// `de-CH` yields `["de-ch", "de", "en"]`; duplicates are dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageChain {
    codes: Vec<String>,
}

impl LanguageChain {
    pub fn new(preferred: &str) -> Self {
        let preferred = preferred.trim().to_ascii_lowercase().replace('_', "-");
        let mut codes = Vec::with_capacity(3);
        if !preferred.is_empty() {
            codes.push(preferred.clone());
            if let Some((base, _)) = preferred.split_once('-') {
                codes.push(base.to_string());
            }
        }
        codes.push("en".to_string());
        let mut seen = Vec::with_capacity(codes.len());
        codes.retain(|c| {
            if seen.contains(c) {
                false
            } else {
                seen.push(c.clone());
                true
            }
        });
        Self { codes }
    }

    pub fn codes(&self) -> &[String] {
        &self.codes
    }

    /// First non-empty value in chain order, or `None`.
    pub fn pick(&self, terms: &TermMap) -> Option<String> {
        self.codes
            .iter()
            .filter_map(|code| terms.get(code))
            .map(|term| term.value.as_str())
            .find(|value| !value.is_empty())
            .map(str::to_string)
    }

    /// Like [`pick`](Self::pick) but empty when nothing matches.
    pub fn resolve(&self, terms: &TermMap) -> String {
        self.pick(terms).unwrap_or_default()
    }
}
