//! Checkout form validation through a session.

use chrono::NaiveDate;

use checkout_geo::config::CheckoutConfig;
use checkout_geo::validation::card::luhn_valid;
use checkout_geo::validation::{Clock, FieldId, FormSnapshot, REQUIRED_MESSAGE};
use checkout_geo::CheckoutSession;

fn session() -> CheckoutSession {
    let mut config = CheckoutConfig::default();
    config.providers.rich.enabled = false;
    config.providers.simple.enabled = false;
    CheckoutSession::new(config)
        .unwrap()
        .with_clock(Clock::Fixed(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()))
}

fn filled_form() -> FormSnapshot {
    FormSnapshot::new()
        .with(FieldId::FullName, "Marie Curie")
        .with(FieldId::Email, "marie@example.fr")
        .with(FieldId::Phone, "+33 6 12 34 56 78")
        .with(FieldId::Address, "11 rue Pierre et Marie Curie")
        .with(FieldId::Country, "FR")
        .with(FieldId::City, "Paris")
        .with(FieldId::PostalCode, "75005")
        .with(FieldId::CardName, "Marie Curie")
        .with(FieldId::CardNumber, "4111111111111111")
        .with(FieldId::CardCvc, "737")
        .with(FieldId::CardExpiry, "12/27")
}

#[test]
fn test_french_postal_codes() {
    let s = session();
    let form = filled_form();

    let ok = s.validate_field(FieldId::PostalCode, "75001", &form);
    assert!(ok.valid);
    assert!(ok.message.is_none());

    let bad = s.validate_field(FieldId::PostalCode, "750011", &form);
    assert!(!bad.valid);
    let message = bad.message.unwrap();
    assert!(message.contains("FR"), "{}", message);
}

#[test]
fn test_card_numbers() {
    let s = session();
    let form = filled_form();
    assert!(s.validate_field(FieldId::CardNumber, "4111111111111111", &form).valid);
    assert!(s.validate_field(FieldId::CardNumber, "4111 1111 1111 1111", &form).valid);

    let bad = s.validate_field(FieldId::CardNumber, "4111111111111112", &form);
    assert!(!bad.valid);
    assert!(bad.message.is_some());
}

#[test]
fn test_expiry_against_fixed_date() {
    let s = session();
    let form = filled_form();
    assert!(!s.validate_field(FieldId::CardExpiry, "01/20", &form).valid);
    assert!(s.validate_field(FieldId::CardExpiry, "01/30", &form).valid);
}

#[test]
fn test_single_digit_mutations_fail_luhn() {
    for valid in ["4111111111111111", "5555555555554444", "378282246310005"] {
        assert!(luhn_valid(valid));
        for (pos, original) in valid.char_indices() {
            for d in '0'..='9' {
                if d == original {
                    continue;
                }
                let mut mutated = valid.to_string();
                mutated.replace_range(pos..pos + 1, &d.to_string());
                assert!(!luhn_valid(&mutated), "{} slipped through", mutated);
            }
        }
    }
}

#[test]
fn test_whole_form() {
    let s = session();
    let form = filled_form();
    assert!(s.validate_form(&form));

    let mut missing_email = form.clone();
    missing_email.clear(FieldId::Email);
    assert!(!s.validate_form(&missing_email));
    let email = s
        .validate_all(&missing_email)
        .into_iter()
        .find(|f| f.field == FieldId::Email)
        .unwrap();
    assert_eq!(email.message.as_deref(), Some(REQUIRED_MESSAGE));

    let mut no_phone = form;
    no_phone.clear(FieldId::Phone);
    assert!(s.validate_form(&no_phone));
}

#[test]
fn test_amex_needs_four_digit_code() {
    let s = session();
    let form = filled_form().with(FieldId::CardNumber, "3782 822463 10005");
    assert!(!s.validate_field(FieldId::CardCvc, "737", &form).valid);
    assert!(s.validate_field(FieldId::CardCvc, "7373", &form).valid);
}

#[test]
fn test_unmapped_country_accepts_generic_codes() {
    let s = session();
    let form = filled_form().with(FieldId::Country, "KE");
    assert!(s.validate_field(FieldId::PostalCode, "00100", &form).valid);
    assert!(!s.validate_field(FieldId::PostalCode, "!", &form).valid);
}

#[test]
fn test_every_failure_carries_a_message() {
    let s = session();
    let form = FormSnapshot::new()
        .with(FieldId::Email, "not-an-email")
        .with(FieldId::CardNumber, "1234")
        .with(FieldId::CardExpiry, "13/99");
    for field in s.validate_all(&form) {
        assert_eq!(field.valid, field.message.is_none(), "{:?}", field);
    }
}
