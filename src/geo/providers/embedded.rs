//! Static tier backed by the compiled-in dataset.

use crate::geo::providers::dataset::{self, StaticCity, StaticCountry, CITIES, COUNTRIES};
use crate::geo::providers::TotalProvider;
use crate::geo::types::{fold_key, normalize_code, City, Coordinates, Country, CountryInfo};

/// The backstop tier. Defined for every input.
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticProvider;

impl StaticProvider {
    pub fn new() -> Self {
        Self
    }
}

fn to_country(c: &StaticCountry) -> Country {
    Country::new(c.code, c.name, c.currency, c.calling_code)
}

fn to_city(c: &StaticCity) -> City {
    City {
        name: c.name.to_string(),
        region: Some(c.region.to_string()),
        country_code: c.country.to_string(),
        population: Some(c.population),
        coordinates: Some(Coordinates { lat: c.lat, lng: c.lng }),
        postal_codes: c.postal_codes.iter().map(|p| p.to_string()).collect(),
    }
}

impl TotalProvider for StaticProvider {
    fn list_countries(&self) -> Vec<Country> {
        let mut out: Vec<Country> = COUNTRIES.iter().map(to_country).collect();
        out.sort_by(|a, b| a.name.cmp(&b.name));
        out
    }

    fn search_cities(&self, country_code: &str, prefix: &str, limit: usize) -> Vec<City> {
        let code = normalize_code(country_code);
        let needle = fold_key(prefix);
        let mut hits: Vec<&StaticCity> = CITIES
            .iter()
            .filter(|c| c.country == code && fold_key(c.name).starts_with(&needle))
            .collect();
        hits.sort_by(|a, b| b.population.cmp(&a.population));
        hits.into_iter().take(limit).map(to_city).collect()
    }

    fn postal_codes_for_city(&self, country_code: &str, city_name: &str) -> Vec<String> {
        let code = normalize_code(country_code);
        let name = fold_key(city_name);
        CITIES
            .iter()
            .find(|c| c.country == code && fold_key(c.name) == name)
            .map(|c| c.postal_codes.iter().map(|p| p.to_string()).collect())
            .unwrap_or_default()
    }

    fn country_info(&self, country_code: &str) -> CountryInfo {
        match dataset::country(country_code) {
            Some(c) => CountryInfo {
                country: to_country(c),
                capital: Some(c.capital.to_string()),
                region: Some(c.region.to_string()),
                population: None,
            },
            None => {
                let code = normalize_code(country_code);
                CountryInfo {
                    country: Country::new(&code, code.clone(), "", ""),
                    capital: None,
                    region: None,
                    population: None,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_countries_non_empty_and_sorted() {
        let list = StaticProvider.list_countries();
        assert!(list.len() >= 20);
        assert!(list.windows(2).all(|w| w[0].name <= w[1].name));
        let fr = list.iter().find(|c| c.code == "FR").unwrap();
        assert_eq!(fr.currency, "EUR");
        assert_eq!(fr.flag, "🇫🇷");
    }

    #[test]
    fn test_search_is_accent_insensitive() {
        let hits = StaticProvider.search_cities("de", "mun", 10);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].name, "München");
    }

    #[test]
    fn test_search_orders_by_population_and_limits() {
        let hits = StaticProvider.search_cities("FR", "pa", 10);
        let names: Vec<_> = hits.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Paris", "Pau"]);

        let hits = StaticProvider.search_cities("FR", "", 2);
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].name, "Paris");
    }

    #[test]
    fn test_unknown_inputs_are_defined() {
        assert!(StaticProvider.search_cities("ZZ", "abc", 10).is_empty());
        assert!(StaticProvider.postal_codes_for_city("FR", "Atlantis").is_empty());

        let info = StaticProvider.country_info("zz");
        assert_eq!(info.country.code, "ZZ");
        assert_eq!(info.country.name, "ZZ");
        assert!(info.capital.is_none());
    }

    #[test]
    fn test_postal_codes_for_known_city() {
        let codes = StaticProvider.postal_codes_for_city("fr", "PARIS");
        assert!(codes.contains(&"75001".to_string()));
    }
}
