//! Simple remote tier: REST Countries for country metadata and a
//! CountriesNow-style service for city names.
//!
//! Neither service knows regions, population or postal codes, so cities come
//! back as bare names and postal lookups are `Unsupported`.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use url::Url;

use crate::config::SimpleProviderConfig;
use crate::geo::providers::{dataset, dedupe_countries, GeoProvider};
use crate::geo::types::{
    fold_key, normalize_code, City, Country, CountryInfo, ProviderError, ProviderResult, Tier,
};

const COUNTRY_FIELDS: &str = "cca2,name,flag,currencies,idd,capital,region,population";

/// Client for the simple tier.
#[derive(Clone)]
pub struct SimpleRemoteProvider {
    client: reqwest::Client,
    countries_url: Url,
    cities_url: Url,
}

#[derive(Debug, Deserialize)]
struct RawCountry {
    cca2: String,
    name: RawName,
    #[serde(default)]
    flag: Option<String>,
    #[serde(default)]
    currencies: BTreeMap<String, serde_json::Value>,
    #[serde(default)]
    idd: RawIdd,
    #[serde(default)]
    capital: Vec<String>,
    #[serde(default)]
    region: Option<String>,
    #[serde(default)]
    population: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct RawName {
    common: String,
}

#[derive(Debug, Default, Deserialize)]
struct RawIdd {
    #[serde(default)]
    root: Option<String>,
    #[serde(default)]
    suffixes: Vec<String>,
}

/// `/alpha/{code}` answers with an object or a one-element array depending on
/// the API version.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    One(Box<RawCountry>),
    Many(Vec<RawCountry>),
}

#[derive(Debug, Serialize)]
struct CitiesRequest<'a> {
    country: &'a str,
}

#[derive(Debug, Deserialize)]
struct CitiesResponse {
    #[serde(default)]
    error: bool,
    #[serde(default)]
    msg: Option<String>,
    #[serde(default)]
    data: Vec<String>,
}

impl RawIdd {
    /// Single-suffix roots concatenate ("+3" + "3"); shared roots such as the
    /// North American "+1" stand alone.
    fn calling_code(&self) -> Option<String> {
        let root = self.root.as_deref().filter(|r| !r.is_empty())?;
        match self.suffixes.as_slice() {
            [only] => Some(format!("{}{}", root, only)),
            _ => Some(root.to_string()),
        }
    }
}

impl RawCountry {
    fn into_info(self) -> CountryInfo {
        let code = normalize_code(&self.cca2);
        let currency = self.currencies.keys().next().cloned().unwrap_or_default();
        let calling = self
            .idd
            .calling_code()
            .or_else(|| dataset::calling_code(&code).map(str::to_string))
            .unwrap_or_default();
        let mut country = Country::new(&code, self.name.common, currency, calling);
        if let Some(flag) = self.flag.filter(|f| !f.is_empty()) {
            country.flag = flag;
        }
        CountryInfo {
            country,
            capital: self.capital.into_iter().next(),
            region: self.region,
            population: self.population,
        }
    }
}

fn with_trailing_slash(raw: &str) -> Result<Url, url::ParseError> {
    let mut url: Url = raw.parse()?;
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

impl SimpleRemoteProvider {
    /// Create a provider from configuration.
    pub fn new(config: &SimpleProviderConfig) -> Result<Self, url::ParseError> {
        Ok(Self {
            client: reqwest::Client::new(),
            countries_url: with_trailing_slash(&config.countries_url)?,
            cities_url: with_trailing_slash(&config.cities_url)?,
        })
    }

    fn endpoint(base: &Url, path: &str) -> ProviderResult<Url> {
        base.join(path)
            .map_err(|e| ProviderError::Decode(format!("bad endpoint {}: {}", path, e)))
    }

    async fn check(response: reqwest::Response) -> ProviderResult<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            Ok(response)
        } else {
            Err(ProviderError::Status(status.as_u16()))
        }
    }

    /// The cities service is keyed by English country name.
    async fn country_name(&self, country_code: &str) -> ProviderResult<String> {
        match dataset::country(country_code) {
            Some(c) => Ok(c.name.to_string()),
            None => Ok(self.country_info(country_code).await?.country.name),
        }
    }
}

#[async_trait]
impl GeoProvider for SimpleRemoteProvider {
    fn tier(&self) -> Tier {
        Tier::Simple
    }

    async fn list_countries(&self) -> ProviderResult<Vec<Country>> {
        let url = Self::endpoint(&self.countries_url, "all")?;
        let response = self
            .client
            .get(url)
            .query(&[("fields", COUNTRY_FIELDS)])
            .send()
            .await?;
        let raw: Vec<RawCountry> = Self::check(response)
            .await?
            .json()
            .await
            .map_err(|e| ProviderError::Decode(e.to_string()))?;
        if raw.is_empty() {
            return Err(ProviderError::Decode("empty country list".to_string()));
        }
        let countries = raw.into_iter().map(|c| c.into_info().country).collect();
        Ok(dedupe_countries(countries))
    }

    async fn search_cities(
        &self,
        country_code: &str,
        prefix: &str,
        limit: usize,
    ) -> ProviderResult<Vec<City>> {
        let code = normalize_code(country_code);
        let name = self.country_name(&code).await?;
        let url = Self::endpoint(&self.cities_url, "countries/cities")?;
        let response = self
            .client
            .post(url)
            .json(&CitiesRequest { country: &name })
            .send()
            .await?;
        let body: CitiesResponse = Self::check(response)
            .await?
            .json()
            .await
            .map_err(|e| ProviderError::Decode(e.to_string()))?;
        if body.error {
            return Err(ProviderError::Decode(
                body.msg.unwrap_or_else(|| "cities service error".to_string()),
            ));
        }

        let needle = fold_key(prefix);
        let mut names: Vec<String> = body
            .data
            .into_iter()
            .filter(|n| fold_key(n).starts_with(&needle))
            .collect();
        names.sort();
        names.dedup();
        Ok(names
            .into_iter()
            .take(limit)
            .map(|n| City::named(&code, n))
            .collect())
    }

    async fn postal_codes_for_city(
        &self,
        _country_code: &str,
        _city_name: &str,
    ) -> ProviderResult<Vec<String>> {
        Err(ProviderError::Unsupported("postal codes"))
    }

    async fn country_info(&self, country_code: &str) -> ProviderResult<CountryInfo> {
        let code = normalize_code(country_code);
        let url = Self::endpoint(&self.countries_url, &format!("alpha/{}", code))?;
        let response = self
            .client
            .get(url)
            .query(&[("fields", COUNTRY_FIELDS)])
            .send()
            .await?;
        let raw: OneOrMany = Self::check(response)
            .await?
            .json()
            .await
            .map_err(|e| ProviderError::Decode(e.to_string()))?;
        let first = match raw {
            OneOrMany::One(c) => Some(*c),
            OneOrMany::Many(list) => list.into_iter().next(),
        };
        first
            .map(RawCountry::into_info)
            .ok_or_else(|| ProviderError::Decode(format!("unknown country {}", code)))
    }
}

impl std::fmt::Debug for SimpleRemoteProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SimpleRemoteProvider")
            .field("countries_url", &self.countries_url.as_str())
            .field("cities_url", &self.cities_url.as_str())
            .finish()
    }
}
