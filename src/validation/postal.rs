//! Per-country postal code formats.
//!
//! Unmapped countries fall back to a permissive generic pattern (3-10
//! letters, digits, spaces or hyphens) instead of rejecting input, so checkout
//! keeps working for every country a provider can return.

use regex::Regex;
use std::collections::HashMap;
use std::sync::LazyLock;

/// One row of the postal table.
pub struct PostalFormat {
    pub country: &'static str,
    pub pattern: &'static str,
    /// A real code in this format; shown in messages and used as the
    /// synthesis template.
    pub example: &'static str,
}

macro_rules! fmt {
    ($c:literal, $p:literal, $e:literal) => {
        PostalFormat {
            country: $c,
            pattern: $p,
            example: $e,
        }
    };
}

pub static POSTAL_FORMATS: &[PostalFormat] = &[
    fmt!("AR", r"^[A-Z]?\d{4}(?:[A-Z]{3})?$", "C1425DKA"),
    fmt!("AT", r"^\d{4}$", "1010"),
    fmt!("AU", r"^\d{4}$", "2000"),
    fmt!("BE", r"^\d{4}$", "1000"),
    fmt!("BR", r"^\d{5}-?\d{3}$", "01310-100"),
    fmt!("CA", r"^[A-Z]\d[A-Z] ?\d[A-Z]\d$", "K1A 0B1"),
    fmt!("CH", r"^\d{4}$", "8001"),
    fmt!("CN", r"^\d{6}$", "100000"),
    fmt!("DE", r"^\d{5}$", "10115"),
    fmt!("DK", r"^\d{4}$", "1050"),
    fmt!("ES", r"^\d{5}$", "28001"),
    fmt!("FR", r"^\d{5}$", "75001"),
    fmt!("GB", r"^[A-Z]{1,2}\d[A-Z\d]? ?\d[A-Z]{2}$", "SW1A 1AA"),
    fmt!("IE", r"^[A-Z]\d[\dW] ?[A-Z\d]{4}$", "D02 X285"),
    fmt!("IN", r"^\d{6}$", "110001"),
    fmt!("IT", r"^\d{5}$", "00118"),
    fmt!("JP", r"^\d{3}-?\d{4}$", "100-0001"),
    fmt!("LU", r"^(?:L-)?\d{4}$", "1009"),
    fmt!("MA", r"^\d{5}$", "20000"),
    fmt!("MX", r"^\d{5}$", "06000"),
    fmt!("NL", r"^\d{4} ?[A-Z]{2}$", "1011 AB"),
    fmt!("NO", r"^\d{4}$", "0150"),
    fmt!("PL", r"^\d{2}-\d{3}$", "00-001"),
    fmt!("PT", r"^\d{4}-\d{3}$", "1100-148"),
    fmt!("SE", r"^\d{3} ?\d{2}$", "111 20"),
    fmt!("SN", r"^\d{5}$", "10000"),
    fmt!("US", r"^\d{5}(?:-\d{4})?$", "90210"),
];

/// Accepted for any country missing from the table.
pub const GENERIC_PATTERN: &str = r"^[A-Z0-9 \-]{3,10}$";

/// Template used to synthesize codes for unmapped countries.
pub const GENERIC_EXAMPLE: &str = "10000";

pub const GENERIC_MESSAGE: &str =
    "Postal code must be 3 to 10 letters, digits, spaces or hyphens.";

static COMPILED: LazyLock<HashMap<&'static str, (Regex, &'static str)>> = LazyLock::new(|| {
    POSTAL_FORMATS
        .iter()
        .map(|f| {
            let re = Regex::new(f.pattern).expect("postal pattern is a valid regex");
            (f.country, (re, f.example))
        })
        .collect()
});

static GENERIC: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(GENERIC_PATTERN).expect("generic postal pattern is a valid regex"));

/// Example code for a country, if mapped.
pub fn example_for(country: &str) -> Option<&'static str> {
    COMPILED.get(country.trim().to_ascii_uppercase().as_str()).map(|(_, e)| *e)
}

/// Whether `country` has a specific format.
pub fn is_mapped(country: &str) -> bool {
    example_for(country).is_some()
}

/// Check a postal code against the country's format.
///
/// Input is trimmed and uppercased first. Returns the failure message.
pub fn check_postal_code(value: &str, country: &str) -> Result<(), String> {
    let value = value.trim().to_ascii_uppercase();
    let country = country.trim().to_ascii_uppercase();
    match COMPILED.get(country.as_str()) {
        Some((re, example)) => {
            if re.is_match(&value) {
                Ok(())
            } else {
                Err(format!(
                    "Invalid postal code for {}. Expected a format like {}.",
                    country, example
                ))
            }
        }
        None => {
            if GENERIC.is_match(&value) {
                Ok(())
            } else {
                Err(GENERIC_MESSAGE.to_string())
            }
        }
    }
}
