//! Pattern-based postal code synthesis.
//!
//! Used when no tier knows any postal code for a city. The country's example
//! code becomes a template (`#` for a digit, `@` for a letter, anything else
//! literal) and a generator seeded from the country and city fills it in, so
//! the same city always yields the same codes and every code passes the
//! country's validation pattern.

use crate::geo::types::{fold_key, normalize_code};
use crate::validation::postal::{example_for, GENERIC_EXAMPLE};

const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

/// Attempts per requested code before giving up on finding distinct ones.
const ATTEMPTS_PER_CODE: usize = 8;

/// Template for a country's codes.
pub fn template_for(country: &str) -> String {
    example_for(country)
        .unwrap_or(GENERIC_EXAMPLE)
        .chars()
        .map(|c| {
            if c.is_ascii_digit() {
                '#'
            } else if c.is_ascii_alphabetic() {
                '@'
            } else {
                c
            }
        })
        .collect()
}

fn fnv1a(bytes: &[u8]) -> u64 {
    bytes.iter().fold(FNV_OFFSET, |hash, b| {
        (hash ^ u64::from(*b)).wrapping_mul(FNV_PRIME)
    })
}

struct Xorshift64(u64);

impl Xorshift64 {
    fn new(seed: u64) -> Self {
        // Zero is a fixed point of xorshift.
        Self(seed | 1)
    }

    fn next(&mut self) -> u64 {
        let mut x = self.0;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.0 = x;
        x
    }

    fn below(&mut self, n: u64) -> u64 {
        self.next() % n
    }
}

fn fill(template: &str, rng: &mut Xorshift64) -> String {
    template
        .chars()
        .map(|c| match c {
            '#' => char::from(b'0' + rng.below(10) as u8),
            '@' => char::from(b'A' + rng.below(26) as u8),
            other => other,
        })
        .collect()
}

/// Up to `count` distinct, sorted codes for a city.
pub fn synthesize_postal_codes(country: &str, city: &str, count: usize) -> Vec<String> {
    let country = normalize_code(country);
    let template = template_for(&country);
    let seed = fnv1a(format!("{}:{}", country, fold_key(city)).as_bytes());
    let mut rng = Xorshift64::new(seed);

    let mut codes: Vec<String> = Vec::with_capacity(count);
    for _ in 0..count.saturating_mul(ATTEMPTS_PER_CODE) {
        if codes.len() == count {
            break;
        }
        let code = fill(&template, &mut rng);
        if !codes.contains(&code) {
            codes.push(code);
        }
    }
    codes.sort();
    codes
}
