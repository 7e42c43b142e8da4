//! Canonical geo records and provider error definitions.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A country as presented to the checkout form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Country {
    /// ISO 3166-1 alpha-2 code, uppercase. Unique across tiers.
    pub code: String,
    /// Display name.
    pub name: String,
    /// ISO 4217 currency code (may be empty when unknown).
    pub currency: String,
    /// International calling code including the leading `+`.
    pub calling_code: String,
    /// Flag emoji.
    pub flag: String,
}

impl Country {
    /// Build a country, deriving the flag glyph from the code.
    pub fn new(
        code: &str,
        name: impl Into<String>,
        currency: impl Into<String>,
        calling_code: impl Into<String>,
    ) -> Self {
        let code = normalize_code(code);
        let flag = flag_for(&code);
        Self {
            code,
            name: name.into(),
            currency: currency.into(),
            calling_code: calling_code.into(),
            flag,
        }
    }
}

/// A city suggestion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct City {
    pub name: String,
    /// First-level administrative region (state, région, Land...).
    pub region: Option<String>,
    pub country_code: String,
    pub population: Option<u64>,
    pub coordinates: Option<Coordinates>,
    /// Known postal codes, possibly empty.
    pub postal_codes: Vec<String>,
}

impl City {
    /// A city known only by name.
    pub fn named(country_code: &str, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            region: None,
            country_code: normalize_code(country_code),
            population: None,
            coordinates: None,
            postal_codes: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

/// Extended details for a single country.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountryInfo {
    pub country: Country,
    pub capital: Option<String>,
    pub region: Option<String>,
    pub population: Option<u64>,
}

/// One provider in the fallback chain, ordered by preference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    /// Remote source with regions, population and postal codes.
    Rich,
    /// Remote source with names and flags only.
    Simple,
    /// Embedded dataset; never fails.
    Static,
    /// Pattern-generated postal codes.
    Synthesized,
}

impl Tier {
    pub fn as_str(&self) -> &'static str {
        match self {
            Tier::Rich => "rich",
            Tier::Simple => "simple",
            Tier::Static => "static",
            Tier::Synthesized => "synthesized",
        }
    }
}

impl std::fmt::Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single tier failed to produce an answer.
///
/// Always recovered inside the resolver by falling to the next tier.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// Transport-level failure.
    #[error("provider request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-success HTTP status.
    #[error("provider returned status {0}")]
    Status(u16),

    /// Response body did not match the expected shape.
    #[error("provider response could not be decoded: {0}")]
    Decode(String),

    /// Call exceeded the tier deadline.
    #[error("provider timed out after {0} ms")]
    Timeout(u64),

    /// This tier does not offer the requested lookup.
    #[error("provider does not support {0}")]
    Unsupported(&'static str),

    /// Tier skipped while its circuit breaker is open.
    #[error("provider circuit is open")]
    CircuitOpen,

    /// Tier disabled or misconfigured.
    #[error("provider is disabled")]
    Disabled,
}

/// Result type for a single tier.
pub type ProviderResult<T> = Result<T, ProviderError>;

/// Uppercase, trimmed country code.
pub fn normalize_code(code: &str) -> String {
    code.trim().to_ascii_uppercase()
}

/// Flag emoji for a two-letter code (regional indicator symbols).
///
/// Returns an empty string for anything that is not two ASCII letters.
pub fn flag_for(code: &str) -> String {
    let code = code.trim();
    if code.len() != 2 || !code.chars().all(|c| c.is_ascii_alphabetic()) {
        return String::new();
    }
    code.to_ascii_uppercase()
        .chars()
        .filter_map(|c| char::from_u32(0x1F1E6 + (c as u32 - 'A' as u32)))
        .collect()
}

/// Accent- and case-insensitive folding used for name matching.
pub fn fold_key(s: &str) -> String {
    deunicode::deunicode(s.trim()).to_lowercase()
}

/// First `n` characters of `s`, folded. Used for city cache keys.
pub fn prefix_key(s: &str, n: usize) -> String {
    fold_key(s).chars().take(n).collect()
}
