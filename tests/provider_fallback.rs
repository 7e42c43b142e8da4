//! Tier fallback against mock HTTP backends.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use checkout_geo::config::{CheckoutConfig, RichProviderConfig, SimpleProviderConfig};
use checkout_geo::geo::{
    CacheKey, GeoProvider, RichRemoteProvider, SimpleRemoteProvider, StaticProvider, Tier,
};
use checkout_geo::validation::postal::check_postal_code;
use checkout_geo::CheckoutSession;

mod common;

fn rich(addr: SocketAddr) -> Arc<dyn GeoProvider> {
    Arc::new(
        RichRemoteProvider::new(&RichProviderConfig {
            base_url: format!("http://{}", addr),
            username: "test".to_string(),
            ..Default::default()
        })
        .unwrap(),
    )
}

fn simple(addr: SocketAddr) -> Arc<dyn GeoProvider> {
    Arc::new(
        SimpleRemoteProvider::new(&SimpleProviderConfig {
            countries_url: format!("http://{}/v3.1", addr),
            cities_url: format!("http://{}/api", addr),
            ..Default::default()
        })
        .unwrap(),
    )
}

fn session(tiers: Vec<(Arc<dyn GeoProvider>, u64)>) -> CheckoutSession {
    CheckoutSession::with_providers(CheckoutConfig::default(), tiers, Arc::new(StaticProvider::new()))
}

const RICH_COUNTRIES: &str = r#"{"geonames":[
    {"countryCode":"FR","countryName":"France","currencyCode":"EUR","capital":"Paris","continentName":"Europe","population":"67000000"},
    {"countryCode":"BE","countryName":"Belgium","currencyCode":"EUR","capital":"Brussels","continentName":"Europe","population":11500000}
]}"#;

#[tokio::test]
async fn test_all_remote_tiers_down_serves_static_countries() {
    let (rich_addr, rich_hits) = common::start_fixed_backend(503, "{}").await;
    let (simple_addr, simple_hits) = common::start_fixed_backend(503, "{}").await;
    let session = session(vec![(rich(rich_addr), 1_000), (simple(simple_addr), 1_000)]);

    let countries = session.resolve_countries().await;

    assert!(countries.len() >= 20);
    assert!(countries.iter().any(|c| c.code == "FR" && c.flag == "🇫🇷"));
    assert_eq!(rich_hits.load(Ordering::SeqCst), 1);
    assert_eq!(simple_hits.load(Ordering::SeqCst), 1);
    let entry = session.cache().countries().get(&CacheKey::Countries).unwrap();
    assert_eq!(entry.tier, Tier::Static);
}

#[tokio::test]
async fn test_countries_resolved_once_per_session() {
    let (rich_addr, rich_hits) = common::start_fixed_backend(200, RICH_COUNTRIES).await;
    let (simple_addr, simple_hits) = common::start_fixed_backend(503, "{}").await;
    let session = session(vec![(rich(rich_addr), 1_000), (simple(simple_addr), 1_000)]);

    let first = session.resolve_countries().await;
    let second = session.resolve_countries().await;

    assert_eq!(first, second);
    let codes: Vec<_> = first.iter().map(|c| c.code.as_str()).collect();
    assert_eq!(codes, vec!["BE", "FR"]);
    assert_eq!(first[1].calling_code, "+33");
    assert_eq!(rich_hits.load(Ordering::SeqCst), 1);
    assert_eq!(simple_hits.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_rich_service_error_falls_to_simple() {
    let (rich_addr, _) = common::start_fixed_backend(
        200,
        r#"{"status":{"message":"user account not enabled","value":10}}"#,
    )
    .await;
    let simple_addr = common::start_json_backend(|req| async move {
        assert_eq!(req.path, "/v3.1/all");
        (
            200,
            r#"[{"cca2":"DE","name":{"common":"Germany"},"flag":"🇩🇪","currencies":{"EUR":{"name":"Euro"}},"idd":{"root":"+4","suffixes":["9"]}}]"#
                .to_string(),
        )
    })
    .await;
    let session = session(vec![(rich(rich_addr), 1_000), (simple(simple_addr), 1_000)]);

    let countries = session.resolve_countries().await;

    assert_eq!(countries.len(), 1);
    assert_eq!(countries[0].code, "DE");
    assert_eq!(countries[0].calling_code, "+49");
    assert_eq!(countries[0].currency, "EUR");
    let entry = session.cache().countries().get(&CacheKey::Countries).unwrap();
    assert_eq!(entry.tier, Tier::Simple);
}

#[tokio::test]
async fn test_short_query_issues_no_request() {
    let (rich_addr, rich_hits) = common::start_fixed_backend(200, r#"{"geonames":[]}"#).await;
    let session = session(vec![(rich(rich_addr), 1_000)]);

    assert!(session.resolve_cities("FR", "P").await.is_empty());
    assert!(session.resolve_cities("FR", "").await.is_empty());
    assert_eq!(rich_hits.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_city_search_uses_prefix_and_filters_locally() {
    let searches = Arc::new(AtomicUsize::new(0));
    let counter = searches.clone();
    let rich_addr = common::start_json_backend(move |req| {
        let counter = counter.clone();
        async move {
            match req.path.as_str() {
                "/searchJSON" => {
                    counter.fetch_add(1, Ordering::SeqCst);
                    assert_eq!(req.param("name_startsWith"), Some("par"));
                    assert_eq!(req.param("country"), Some("FR"));
                    (
                        200,
                        r#"{"geonames":[
                            {"name":"Paris","adminName1":"Île-de-France","countryCode":"FR","population":2138551,"lat":"48.85341","lng":"2.3488"},
                            {"name":"Parthenay","adminName1":"Nouvelle-Aquitaine","countryCode":"FR","population":10000,"lat":"46.64","lng":"-0.24"}
                        ]}"#
                        .to_string(),
                    )
                }
                _ => (404, "{}".to_string()),
            }
        }
    })
    .await;
    let session = session(vec![(rich(rich_addr), 1_000)]);

    let par = session.resolve_cities("FR", "Par").await;
    let pari = session.resolve_cities("FR", "Pari").await;

    assert_eq!(par.len(), 2);
    assert_eq!(pari.len(), 1);
    assert_eq!(pari[0].name, "Paris");
    assert_eq!(pari[0].region.as_deref(), Some("Île-de-France"));
    assert_eq!(pari[0].population, Some(2138551));
    assert!(pari[0].coordinates.is_some());
    assert_eq!(searches.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_postal_codes_degrade_to_static_then_synthesized() {
    let rich_addr = common::start_json_backend(|req| async move {
        match req.path.as_str() {
            "/postalCodeSearchJSON" => (200, r#"{"postalCodes":[]}"#.to_string()),
            _ => (404, "{}".to_string()),
        }
    })
    .await;
    let (simple_addr, simple_hits) = common::start_fixed_backend(200, "[]").await;
    let session = session(vec![(rich(rich_addr), 1_000), (simple(simple_addr), 1_000)]);

    let paris = session.resolve_postal_codes("FR", "Paris").await;
    assert!(paris.contains(&"75001".to_string()));

    let made_up = session.resolve_postal_codes("FR", "Villeneuve-Inconnue").await;
    assert_eq!(made_up.len(), 5);
    for code in &made_up {
        assert!(check_postal_code(code, "FR").is_ok(), "{} is not a French code", code);
    }
    assert_eq!(made_up, session.resolve_postal_codes("fr", "villeneuve-inconnue").await);

    // The simple tier has no postal lookup and is never asked over HTTP.
    assert_eq!(simple_hits.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_rich_postal_codes_preferred() {
    let rich_addr = common::start_json_backend(|req| async move {
        assert_eq!(req.param("placename"), Some("Lyon"));
        (
            200,
            r#"{"postalCodes":[{"postalCode":"69002"},{"postalCode":"69001"},{"postalCode":"69001"}]}"#
                .to_string(),
        )
    })
    .await;
    let session = session(vec![(rich(rich_addr), 1_000)]);

    assert_eq!(
        session.resolve_postal_codes("FR", "Lyon").await,
        vec!["69001".to_string(), "69002".to_string()]
    );
}

#[tokio::test]
async fn test_slow_tier_is_abandoned_at_deadline() {
    let rich_addr = common::start_json_backend(|_| async move {
        tokio::time::sleep(Duration::from_secs(5)).await;
        (200, RICH_COUNTRIES.to_string())
    })
    .await;
    let session = session(vec![(rich(rich_addr), 200)]);

    let started = Instant::now();
    let countries = session.resolve_countries().await;

    assert!(started.elapsed() < Duration::from_secs(3));
    assert!(countries.len() >= 20);
}

#[tokio::test]
async fn test_breaker_stops_calling_failing_tier() {
    let (rich_addr, rich_hits) = common::start_fixed_backend(500, "{}").await;
    let session = session(vec![(rich(rich_addr), 1_000)]);

    for code in ["FR", "DE", "ES", "IT", "PT"] {
        let info = session.country_info(code).await;
        assert_eq!(info.country.code, code);
    }

    let threshold = CheckoutConfig::default().resilience.failure_threshold as usize;
    assert_eq!(rich_hits.load(Ordering::SeqCst), threshold);
}
