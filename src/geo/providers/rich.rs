//! Rich remote tier: a GeoNames-style JSON web service.
//!
//! # Endpoints
//! - `countryInfoJSON` → countries, currency, capital, population
//! - `searchJSON` → populated places with region, population, coordinates
//! - `postalCodeSearchJSON` → postal codes by place name
//!
//! GeoNames reports application errors as `{"status": {...}}` with HTTP 200,
//! so every response is checked for that envelope before decoding.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use url::Url;

use crate::config::RichProviderConfig;
use crate::geo::providers::{dataset, dedupe_countries, GeoProvider};
use crate::geo::types::{
    fold_key, normalize_code, City, Coordinates, Country, CountryInfo, ProviderError,
    ProviderResult, Tier,
};

/// Client for the rich tier.
#[derive(Clone)]
pub struct RichRemoteProvider {
    client: reqwest::Client,
    base_url: Url,
    username: String,
}

#[derive(Debug, Deserialize)]
struct GeonamesList<T> {
    #[serde(default = "Vec::new")]
    geonames: Vec<T>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawCountryInfo {
    country_code: String,
    country_name: String,
    #[serde(default)]
    currency_code: String,
    #[serde(default)]
    capital: Option<String>,
    #[serde(default)]
    continent_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_u64")]
    population: Option<u64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawPlace {
    name: String,
    #[serde(default)]
    admin_name1: Option<String>,
    #[serde(default)]
    country_code: Option<String>,
    #[serde(default, deserialize_with = "lenient_u64")]
    population: Option<u64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    lat: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    lng: Option<f64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawPostalCodes {
    #[serde(default)]
    postal_codes: Vec<RawPostalCode>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawPostalCode {
    postal_code: String,
}

/// GeoNames mixes numbers and numeric strings; accept both.
#[derive(Deserialize)]
#[serde(untagged)]
enum NumOrStr {
    Num(serde_json::Number),
    Str(String),
}

fn lenient_u64<'de, D: Deserializer<'de>>(d: D) -> Result<Option<u64>, D::Error> {
    Ok(match Option::<NumOrStr>::deserialize(d)? {
        Some(NumOrStr::Num(n)) => n.as_u64(),
        Some(NumOrStr::Str(s)) => s.trim().parse().ok(),
        None => None,
    })
}

fn lenient_f64<'de, D: Deserializer<'de>>(d: D) -> Result<Option<f64>, D::Error> {
    Ok(match Option::<NumOrStr>::deserialize(d)? {
        Some(NumOrStr::Num(n)) => n.as_f64(),
        Some(NumOrStr::Str(s)) => s.trim().parse().ok(),
        None => None,
    })
}

impl RawCountryInfo {
    fn into_info(self) -> CountryInfo {
        let code = normalize_code(&self.country_code);
        let calling = dataset::calling_code(&code).unwrap_or_default();
        CountryInfo {
            country: Country::new(&code, self.country_name, self.currency_code, calling),
            capital: self.capital.filter(|c| !c.is_empty()),
            region: self.continent_name,
            population: self.population,
        }
    }
}

impl RawPlace {
    fn into_city(self, fallback_country: &str) -> City {
        let coordinates = match (self.lat, self.lng) {
            (Some(lat), Some(lng)) => Some(Coordinates { lat, lng }),
            _ => None,
        };
        City {
            name: self.name,
            region: self.admin_name1.filter(|r| !r.is_empty()),
            country_code: normalize_code(self.country_code.as_deref().unwrap_or(fallback_country)),
            population: self.population,
            coordinates,
            postal_codes: Vec::new(),
        }
    }
}

impl RichRemoteProvider {
    /// Create a provider from configuration.
    pub fn new(config: &RichProviderConfig) -> Result<Self, url::ParseError> {
        let mut base_url: Url = config.base_url.parse()?;
        // `join` drops the last segment unless the path ends with a slash
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        Ok(Self {
            client: reqwest::Client::new(),
            base_url,
            username: config.username.clone(),
        })
    }

    async fn get<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        query: &[(&str, String)],
    ) -> ProviderResult<T> {
        let url = self
            .base_url
            .join(endpoint)
            .map_err(|e| ProviderError::Decode(format!("bad endpoint {}: {}", endpoint, e)))?;

        let response = self
            .client
            .get(url)
            .query(query)
            .query(&[("username", self.username.as_str())])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProviderError::Status(status.as_u16()));
        }

        let body: serde_json::Value = response.json().await?;
        if let Some(status) = body.get("status") {
            let message = status
                .get("message")
                .and_then(|m| m.as_str())
                .unwrap_or("unknown service error");
            return Err(ProviderError::Decode(message.to_string()));
        }
        serde_json::from_value(body).map_err(|e| ProviderError::Decode(e.to_string()))
    }
}

#[async_trait]
impl GeoProvider for RichRemoteProvider {
    fn tier(&self) -> Tier {
        Tier::Rich
    }

    async fn list_countries(&self) -> ProviderResult<Vec<Country>> {
        let raw: GeonamesList<RawCountryInfo> = self.get("countryInfoJSON", &[]).await?;
        if raw.geonames.is_empty() {
            return Err(ProviderError::Decode("empty country list".to_string()));
        }
        let countries = raw.geonames.into_iter().map(|c| c.into_info().country).collect();
        Ok(dedupe_countries(countries))
    }

    async fn search_cities(
        &self,
        country_code: &str,
        prefix: &str,
        limit: usize,
    ) -> ProviderResult<Vec<City>> {
        let code = normalize_code(country_code);
        let raw: GeonamesList<RawPlace> = self
            .get(
                "searchJSON",
                &[
                    ("country", code.clone()),
                    ("name_startsWith", prefix.to_string()),
                    ("featureClass", "P".to_string()),
                    ("orderby", "population".to_string()),
                    ("maxRows", limit.to_string()),
                ],
            )
            .await?;

        let needle = fold_key(prefix);
        let mut seen = std::collections::HashSet::new();
        Ok(raw
            .geonames
            .into_iter()
            .map(|p| p.into_city(&code))
            .filter(|c| fold_key(&c.name).starts_with(&needle))
            .filter(|c| seen.insert(fold_key(&c.name)))
            .take(limit)
            .collect())
    }

    async fn postal_codes_for_city(
        &self,
        country_code: &str,
        city_name: &str,
    ) -> ProviderResult<Vec<String>> {
        let raw: RawPostalCodes = self
            .get(
                "postalCodeSearchJSON",
                &[
                    ("country", normalize_code(country_code)),
                    ("placename", city_name.to_string()),
                    ("maxRows", "50".to_string()),
                ],
            )
            .await?;

        let mut codes: Vec<String> = raw.postal_codes.into_iter().map(|p| p.postal_code).collect();
        codes.sort();
        codes.dedup();
        Ok(codes)
    }

    async fn country_info(&self, country_code: &str) -> ProviderResult<CountryInfo> {
        let raw: GeonamesList<RawCountryInfo> = self
            .get("countryInfoJSON", &[("country", normalize_code(country_code))])
            .await?;
        raw.geonames
            .into_iter()
            .next()
            .map(RawCountryInfo::into_info)
            .ok_or_else(|| ProviderError::Decode(format!("unknown country {}", country_code)))
    }
}

impl std::fmt::Debug for RichRemoteProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RichRemoteProvider")
            .field("base_url", &self.base_url.as_str())
            .finish()
    }
}
