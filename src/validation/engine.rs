//! Field and form validation over the static rule table.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::validation::expiry::Clock;
use crate::validation::rules::{rule_for, FieldId, RULES, REQUIRED_MESSAGE};

/// Current values of the checkout form.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FormSnapshot {
    #[serde(default)]
    values: BTreeMap<FieldId, String>,
    /// Fields not shown to the user (e.g. card fields for another payment method).
    #[serde(default)]
    hidden: BTreeSet<FieldId>,
}

impl FormSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style setter.
    pub fn with(mut self, field: FieldId, value: impl Into<String>) -> Self {
        self.set(field, value);
        self
    }

    pub fn set(&mut self, field: FieldId, value: impl Into<String>) {
        self.values.insert(field, value.into());
    }

    /// Value of a field, empty when unset.
    pub fn get(&self, field: FieldId) -> &str {
        self.values.get(&field).map(String::as_str).unwrap_or("")
    }

    pub fn clear(&mut self, field: FieldId) {
        self.values.remove(&field);
    }

    pub fn hide(&mut self, field: FieldId) {
        self.hidden.insert(field);
    }

    pub fn show(&mut self, field: FieldId) {
        self.hidden.remove(&field);
    }

    pub fn is_visible(&self, field: FieldId) -> bool {
        !self.hidden.contains(&field)
    }
}

/// Outcome of validating one field. Invalid snapshots always carry a message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldSnapshot {
    pub field: FieldId,
    pub value: String,
    pub valid: bool,
    pub message: Option<String>,
}

impl FieldSnapshot {
    fn valid(field: FieldId, value: &str) -> Self {
        Self {
            field,
            value: value.to_string(),
            valid: true,
            message: None,
        }
    }

    fn invalid(field: FieldId, value: &str, message: String) -> Self {
        Self {
            field,
            value: value.to_string(),
            valid: false,
            message: Some(message),
        }
    }
}

/// Stateless validator. Never touches network or cache state.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidationEngine {
    clock: Clock,
}

impl ValidationEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a specific clock for date-dependent rules.
    pub fn with_clock(clock: Clock) -> Self {
        Self { clock }
    }

    /// Validate one field. Cross-field rules read siblings from `form`.
    pub fn validate_field(&self, field: FieldId, value: &str, form: &FormSnapshot) -> FieldSnapshot {
        let Some(rule) = rule_for(field) else {
            return FieldSnapshot::valid(field, value);
        };

        if value.trim().is_empty() {
            return if rule.required {
                FieldSnapshot::invalid(field, value, REQUIRED_MESSAGE.to_string())
            } else {
                FieldSnapshot::valid(field, value)
            };
        }

        match rule.check(value, form, self.clock.today()) {
            Ok(()) => FieldSnapshot::valid(field, value),
            Err(message) => FieldSnapshot::invalid(field, value, message),
        }
    }

    /// Validate every visible field in the form.
    pub fn validate_all(&self, form: &FormSnapshot) -> Vec<FieldSnapshot> {
        RULES
            .iter()
            .filter(|r| form.is_visible(r.field))
            .map(|r| self.validate_field(r.field, form.get(r.field), form))
            .collect()
    }

    /// The form is valid when every visible field is.
    pub fn validate_form(&self, form: &FormSnapshot) -> bool {
        self.validate_all(form).iter().all(|s| s.valid)
    }
}
