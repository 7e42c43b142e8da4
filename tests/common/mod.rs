//! Shared utilities for integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::HashMap;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

use checkout_geo::geo::types::fold_key;
use checkout_geo::geo::{City, Country, CountryInfo, GeoProvider, ProviderError, ProviderResult, Tier};

/// A request as seen by the mock backend.
#[derive(Debug, Clone)]
pub struct MockRequest {
    pub method: String,
    /// Path without the query string.
    pub path: String,
    pub query: String,
    pub body: String,
}

impl MockRequest {
    /// Value of a query parameter, undecoded.
    pub fn param(&self, name: &str) -> Option<&str> {
        self.query
            .split('&')
            .filter_map(|pair| pair.split_once('='))
            .find(|(k, _)| *k == name)
            .map(|(_, v)| v)
    }
}

async fn read_request(socket: &mut TcpStream) -> Option<MockRequest> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];
    let head_end = loop {
        let n = socket.read(&mut chunk).await.ok()?;
        if n == 0 {
            return None;
        }
        buf.extend_from_slice(&chunk[..n]);
        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos + 4;
        }
    };

    let head = String::from_utf8_lossy(&buf[..head_end]).to_string();
    let mut lines = head.lines();
    let mut request_line = lines.next()?.split_whitespace();
    let method = request_line.next()?.to_string();
    let target = request_line.next()?.to_string();
    let content_length = lines
        .filter_map(|l| l.split_once(':'))
        .find(|(k, _)| k.trim().eq_ignore_ascii_case("content-length"))
        .and_then(|(_, v)| v.trim().parse::<usize>().ok())
        .unwrap_or(0);

    while buf.len() < head_end + content_length {
        let n = socket.read(&mut chunk).await.ok()?;
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
    }
    let body = String::from_utf8_lossy(&buf[head_end..]).to_string();

    let (path, query) = match target.split_once('?') {
        Some((p, q)) => (p.to_string(), q.to_string()),
        None => (target, String::new()),
    };
    Some(MockRequest {
        method,
        path,
        query,
        body,
    })
}

fn status_text(status: u16) -> &'static str {
    match status {
        200 => "200 OK",
        404 => "404 Not Found",
        429 => "429 Too Many Requests",
        500 => "500 Internal Server Error",
        502 => "502 Bad Gateway",
        503 => "503 Service Unavailable",
        _ => "200 OK",
    }
}

/// Start a programmable JSON backend on an ephemeral port.
///
/// The handler sees each request and returns `(status, body)`; it may sleep
/// to simulate latency.
pub async fn start_json_backend<F, Fut>(handler: F) -> SocketAddr
where
    F: Fn(MockRequest) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = (u16, String)> + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let handler = Arc::new(handler);

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    let handler = handler.clone();
                    tokio::spawn(async move {
                        let Some(request) = read_request(&mut socket).await else {
                            return;
                        };
                        let (status, body) = handler(request).await;
                        let response = format!(
                            "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                            status_text(status),
                            body.len(),
                            body
                        );
                        let _ = socket.write_all(response.as_bytes()).await;
                        let _ = socket.shutdown().await;
                    });
                }
                Err(_) => break,
            }
        }
    });
    addr
}

/// A backend that always answers with the same status and counts hits.
pub async fn start_fixed_backend(status: u16, body: &'static str) -> (SocketAddr, Arc<AtomicUsize>) {
    let hits = Arc::new(AtomicUsize::new(0));
    let counter = hits.clone();
    let addr = start_json_backend(move |_| {
        counter.fetch_add(1, Ordering::SeqCst);
        async move { (status, body.to_string()) }
    })
    .await;
    (addr, hits)
}

/// In-process provider with canned data and per-prefix latency.
pub struct ScriptedProvider {
    pub tier: Tier,
    pub fail: bool,
    pub countries: Vec<Country>,
    pub cities: Vec<City>,
    pub postal_codes: HashMap<String, Vec<String>>,
    /// Latency by folded prefix; 10 ms otherwise.
    pub delays: HashMap<String, u64>,
    pub calls: AtomicUsize,
    pub seen_prefixes: Mutex<Vec<String>>,
}

impl ScriptedProvider {
    pub fn new(tier: Tier) -> Self {
        Self {
            tier,
            fail: false,
            countries: Vec::new(),
            cities: Vec::new(),
            postal_codes: HashMap::new(),
            delays: HashMap::new(),
            calls: AtomicUsize::new(0),
            seen_prefixes: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(tier: Tier) -> Self {
        Self {
            fail: true,
            ..Self::new(tier)
        }
    }

    pub fn with_cities(mut self, country: &str, names: &[&str]) -> Self {
        self.cities
            .extend(names.iter().map(|n| City::named(country, *n)));
        self
    }

    pub fn with_delay(mut self, prefix: &str, ms: u64) -> Self {
        self.delays.insert(prefix.to_string(), ms);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    async fn enter(&self, prefix: &str) -> ProviderResult<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let delay = self.delays.get(prefix).copied().unwrap_or(10);
        tokio::time::sleep(Duration::from_millis(delay)).await;
        if self.fail {
            Err(ProviderError::Status(503))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl GeoProvider for ScriptedProvider {
    fn tier(&self) -> Tier {
        self.tier
    }

    async fn list_countries(&self) -> ProviderResult<Vec<Country>> {
        self.enter("").await?;
        Ok(self.countries.clone())
    }

    async fn search_cities(
        &self,
        country_code: &str,
        prefix: &str,
        limit: usize,
    ) -> ProviderResult<Vec<City>> {
        self.seen_prefixes.lock().unwrap().push(prefix.to_string());
        self.enter(prefix).await?;
        let needle = fold_key(prefix);
        Ok(self
            .cities
            .iter()
            .filter(|c| c.country_code == country_code && fold_key(&c.name).starts_with(&needle))
            .take(limit)
            .cloned()
            .collect())
    }

    async fn postal_codes_for_city(
        &self,
        _country_code: &str,
        city_name: &str,
    ) -> ProviderResult<Vec<String>> {
        self.enter("").await?;
        Ok(self
            .postal_codes
            .get(&fold_key(city_name))
            .cloned()
            .unwrap_or_default())
    }

    async fn country_info(&self, country_code: &str) -> ProviderResult<CountryInfo> {
        self.enter("").await?;
        Err(ProviderError::Decode(format!("no info for {}", country_code)))
    }
}
