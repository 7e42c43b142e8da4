//! The static rule table.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::sync::LazyLock;

use crate::validation::card::{check_card_number, check_cvc};
use crate::validation::expiry::check_expiry;
use crate::validation::postal::check_postal_code;
use crate::validation::FormSnapshot;

/// Shown for any required field left empty, regardless of its rule.
pub const REQUIRED_MESSAGE: &str = "This field is required.";

/// Checkout form fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldId {
    FullName,
    Email,
    Phone,
    Address,
    Country,
    City,
    PostalCode,
    CardName,
    CardNumber,
    CardCvc,
    CardExpiry,
}

impl FieldId {
    pub const ALL: [FieldId; 11] = [
        FieldId::FullName,
        FieldId::Email,
        FieldId::Phone,
        FieldId::Address,
        FieldId::Country,
        FieldId::City,
        FieldId::PostalCode,
        FieldId::CardName,
        FieldId::CardNumber,
        FieldId::CardCvc,
        FieldId::CardExpiry,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FieldId::FullName => "full_name",
            FieldId::Email => "email",
            FieldId::Phone => "phone",
            FieldId::Address => "address",
            FieldId::Country => "country",
            FieldId::City => "city",
            FieldId::PostalCode => "postal_code",
            FieldId::CardName => "card_name",
            FieldId::CardNumber => "card_number",
            FieldId::CardCvc => "card_cvc",
            FieldId::CardExpiry => "card_expiry",
        }
    }
}

impl std::fmt::Display for FieldId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FieldId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FieldId::ALL
            .into_iter()
            .find(|f| f.as_str() == s.trim())
            .ok_or_else(|| format!("unknown field '{}'", s))
    }
}

/// How a field's value is checked.
pub enum Matcher {
    /// Any non-empty value.
    Present,
    /// Country-independent regular expression.
    Pattern(Regex),
    /// Pattern chosen by the sibling country field.
    CountryPattern { country_field: FieldId },
    /// Numeric checksum predicate.
    Checksum(fn(&str) -> Result<(), String>),
    /// Rule parameterized by a named sibling value.
    CrossField {
        sibling: FieldId,
        check: fn(&str, &str) -> Result<(), String>,
    },
    /// Month/year that must lie in the future.
    Expiry,
}

impl std::fmt::Debug for Matcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Matcher::Present => f.write_str("Present"),
            Matcher::Pattern(re) => f.debug_tuple("Pattern").field(&re.as_str()).finish(),
            Matcher::CountryPattern { country_field } => f
                .debug_struct("CountryPattern")
                .field("country_field", country_field)
                .finish(),
            Matcher::Checksum(_) => f.write_str("Checksum"),
            Matcher::CrossField { sibling, .. } => {
                f.debug_struct("CrossField").field("sibling", sibling).finish()
            }
            Matcher::Expiry => f.write_str("Expiry"),
        }
    }
}

/// One row of the rule table.
#[derive(Debug)]
pub struct ValidationRule {
    pub field: FieldId,
    pub matcher: Matcher,
    /// Message for pattern failures. Other matchers supply their own.
    pub message: &'static str,
    pub required: bool,
}

impl ValidationRule {
    /// Check a non-empty value. Returns the failure message.
    pub fn check(
        &self,
        value: &str,
        form: &FormSnapshot,
        today: chrono::NaiveDate,
    ) -> Result<(), String> {
        match &self.matcher {
            Matcher::Present => Ok(()),
            Matcher::Pattern(re) => {
                if re.is_match(value.trim()) {
                    Ok(())
                } else {
                    Err(self.message.to_string())
                }
            }
            Matcher::CountryPattern { country_field } => {
                check_postal_code(value, form.get(*country_field))
            }
            Matcher::Checksum(check) => check(value),
            Matcher::CrossField { sibling, check } => check(value, form.get(*sibling)),
            Matcher::Expiry => check_expiry(value, today).map_err(str::to_string),
        }
    }
}

fn pattern(re: &str) -> Matcher {
    Matcher::Pattern(Regex::new(re).expect("rule pattern is a valid regex"))
}

fn card_checksum(value: &str) -> Result<(), String> {
    check_card_number(value).map(|_| ()).map_err(str::to_string)
}

fn rule(field: FieldId, matcher: Matcher, message: &'static str, required: bool) -> ValidationRule {
    ValidationRule {
        field,
        matcher,
        message,
        required,
    }
}

/// The rule table, built once.
pub static RULES: LazyLock<Vec<ValidationRule>> = LazyLock::new(|| {
    vec![
        rule(
            FieldId::FullName,
            pattern(r"^\p{L}[\p{L}' .\-]+$"),
            "Please enter your full name.",
            true,
        ),
        rule(
            FieldId::Email,
            pattern(r"^[^\s@]+@[^\s@]+\.[^\s@]+$"),
            "Please enter a valid email address.",
            true,
        ),
        rule(
            FieldId::Phone,
            pattern(r"^\+?[0-9][0-9 ().\-]{6,19}$"),
            "Please enter a valid phone number.",
            false,
        ),
        rule(
            FieldId::Address,
            pattern(r"^.{5,}$"),
            "Please enter a complete street address.",
            true,
        ),
        rule(
            FieldId::Country,
            pattern(r"^[A-Za-z]{2}$"),
            "Please select a country.",
            true,
        ),
        rule(FieldId::City, Matcher::Present, "", true),
        rule(
            FieldId::PostalCode,
            Matcher::CountryPattern {
                country_field: FieldId::Country,
            },
            "",
            true,
        ),
        rule(
            FieldId::CardName,
            pattern(r"^\p{L}[\p{L}' .\-]+$"),
            "Please enter the name shown on the card.",
            true,
        ),
        rule(FieldId::CardNumber, Matcher::Checksum(card_checksum), "", true),
        rule(
            FieldId::CardCvc,
            Matcher::CrossField {
                sibling: FieldId::CardNumber,
                check: check_cvc,
            },
            "",
            true,
        ),
        rule(FieldId::CardExpiry, Matcher::Expiry, "", true),
    ]
});

/// Rule for a field.
pub fn rule_for(field: FieldId) -> Option<&'static ValidationRule> {
    RULES.iter().find(|r| r.field == field)
}
