//! Payment card checks: issuer-dependent length, Luhn checksum, and the
//! security code length that depends on the card number.
//!
//! The Luhn sum catches every single-digit substitution. Adjacent
//! transpositions of `09`/`90` keep the sum unchanged and go undetected.

use serde::Serialize;
use std::ops::RangeInclusive;

/// Issuer families that constrain the digit count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CardBrand {
    Visa,
    Mastercard,
    Amex,
    Other,
}

impl CardBrand {
    /// Infer the brand from the leading digits.
    pub fn detect(digits: &str) -> Self {
        let prefix = |n: usize| digits.get(..n).and_then(|p| p.parse::<u32>().ok());
        if digits.starts_with('4') {
            CardBrand::Visa
        } else if matches!(prefix(2), Some(34 | 37)) {
            CardBrand::Amex
        } else if matches!(prefix(2), Some(51..=55)) || matches!(prefix(4), Some(2221..=2720)) {
            CardBrand::Mastercard
        } else {
            CardBrand::Other
        }
    }

    pub fn accepts_length(&self, len: usize) -> bool {
        match self {
            CardBrand::Visa => matches!(len, 13 | 16 | 19),
            CardBrand::Mastercard => len == 16,
            CardBrand::Amex => len == 15,
            CardBrand::Other => OTHER_LENGTHS.contains(&len),
        }
    }

    /// Digits required in the security code.
    pub fn cvc_length(&self) -> usize {
        match self {
            CardBrand::Amex => 4,
            _ => 3,
        }
    }
}

const OTHER_LENGTHS: RangeInclusive<usize> = 13..=19;

/// Remove all whitespace.
pub fn normalize_card_number(raw: &str) -> String {
    raw.chars().filter(|c| !c.is_whitespace()).collect()
}

/// Luhn mod-10 checksum over an all-digit string.
pub fn luhn_valid(digits: &str) -> bool {
    if digits.is_empty() {
        return false;
    }
    let mut sum = 0u32;
    for (i, c) in digits.chars().rev().enumerate() {
        let Some(mut d) = c.to_digit(10) else {
            return false;
        };
        if i % 2 == 1 {
            d *= 2;
            if d > 9 {
                d -= 9;
            }
        }
        sum += d;
    }
    sum % 10 == 0
}

/// Validate a card number. Returns the failure message.
pub fn check_card_number(raw: &str) -> Result<CardBrand, &'static str> {
    let digits = normalize_card_number(raw);
    if !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err("Card number must contain only digits.");
    }
    let brand = CardBrand::detect(&digits);
    if !brand.accepts_length(digits.len()) {
        return Err("Card number has the wrong length for this card type.");
    }
    if !luhn_valid(&digits) {
        return Err("Card number is invalid.");
    }
    Ok(brand)
}

/// Validate a security code against the sibling card number.
pub fn check_cvc(value: &str, card_number: &str) -> Result<(), String> {
    let value = value.trim();
    let expected = CardBrand::detect(&normalize_card_number(card_number)).cvc_length();
    if value.len() == expected && value.chars().all(|c| c.is_ascii_digit()) {
        Ok(())
    } else {
        Err(format!("Security code must be {} digits.", expected))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_numbers() {
        assert_eq!(check_card_number("4111111111111111"), Ok(CardBrand::Visa));
        assert_eq!(check_card_number("4111 1111 1111 1111"), Ok(CardBrand::Visa));
        assert_eq!(check_card_number("4111111111111112"), Err("Card number is invalid."));
        assert_eq!(check_card_number("5555555555554444"), Ok(CardBrand::Mastercard));
        assert_eq!(check_card_number("2223003122003222"), Ok(CardBrand::Mastercard));
        assert_eq!(check_card_number("378282246310005"), Ok(CardBrand::Amex));
        assert_eq!(check_card_number("6011111111111117"), Ok(CardBrand::Other));
    }

    #[test]
    fn test_brand_detection_boundaries() {
        assert_eq!(CardBrand::detect("2221000000000009"), CardBrand::Mastercard);
        assert_eq!(CardBrand::detect("2720990000000000"), CardBrand::Mastercard);
        assert_eq!(CardBrand::detect("2220990000000000"), CardBrand::Other);
        assert_eq!(CardBrand::detect("2721000000000000"), CardBrand::Other);
        assert_eq!(CardBrand::detect("5000000000000000"), CardBrand::Other);
        assert_eq!(CardBrand::detect("5600000000000000"), CardBrand::Other);
        assert_eq!(CardBrand::detect(""), CardBrand::Other);
    }

    #[test]
    fn test_length_rules() {
        // Luhn-valid 15-digit number with a Visa prefix
        assert_eq!(
            check_card_number("411111111111116"),
            Err("Card number has the wrong length for this card type.")
        );
        // Amex prefix with 16 digits
        assert_eq!(
            check_card_number("3782822463100005"),
            Err("Card number has the wrong length for this card type.")
        );
        assert_eq!(check_card_number("4222222222222"), Ok(CardBrand::Visa));
        assert!(check_card_number("123456789012").is_err());
    }

    #[test]
    fn test_non_digits_rejected() {
        assert_eq!(
            check_card_number("4111-1111-1111-1111"),
            Err("Card number must contain only digits.")
        );
    }

    #[test]
    fn test_every_single_digit_substitution_is_detected() {
        let valid = "4111111111111111";
        assert!(luhn_valid(valid));
        for pos in 0..valid.len() {
            for d in b'0'..=b'9' {
                let mut bytes = valid.as_bytes().to_vec();
                if bytes[pos] == d {
                    continue;
                }
                bytes[pos] = d;
                let mutated = String::from_utf8(bytes).unwrap();
                assert!(!luhn_valid(&mutated), "{} passed Luhn", mutated);
            }
        }
    }

    #[test]
    fn test_transposition_blind_spot() {
        // 09 <-> 90 swaps preserve the Luhn sum.
        assert!(luhn_valid("4000000000000903"));
        assert!(luhn_valid("4000000000009003"));
    }

    #[test]
    fn test_cvc_depends_on_card_number() {
        assert!(check_cvc("123", "4111111111111111").is_ok());
        assert_eq!(
            check_cvc("1234", "4111111111111111").unwrap_err(),
            "Security code must be 3 digits."
        );
        assert!(check_cvc("1234", "3782 822463 10005").is_ok());
        assert!(check_cvc("123", "378282246310005").is_err());
        assert!(check_cvc("12a", "").is_err());
    }
}
