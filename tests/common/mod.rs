//! Shared test fixtures for the Command Tower integration tests.
//!
//! Provides in-memory collaborators that record every call, plus
//! `setup_tower()` which wires them into a `CommandTower` session. Each fake
//! is `Clone` and clones share state, so a test can keep a handle to inspect
//! calls after moving one copy into the session.
//!
//! `TestServer` is a minimal HTTP/1.1 responder on a loopback port for
//! exercising the real Scryfall, EDHREC and image clients without network.

#![allow(dead_code)]

use std::collections::{HashMap, HashSet, VecDeque};
use std::io::{BufRead, BufReader, Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use command_tower::models::{CardPrice, ColorFilter, Commander, ImageHandle};
use command_tower::sources::{CommanderCatalog, DecklistSource, ImageResolver, PriceSource};
use command_tower::{CommandTower, Config, Result, TowerError};

// ---------------------------------------------------------------------------
// FakeCatalog
// ---------------------------------------------------------------------------

#[derive(Default)]
struct CatalogState {
    queue: VecDeque<String>,
    requests: Vec<(ColorFilter, String)>,
    fail_next: usize,
}

/// Hands out the configured commander names in order, then reports NotFound.
#[derive(Clone, Default)]
pub struct FakeCatalog {
    state: Arc<Mutex<CatalogState>>,
}

impl FakeCatalog {
    pub fn new(names: &[&str]) -> Self {
        let catalog = Self::default();
        catalog.state.lock().unwrap().queue = names.iter().map(|n| n.to_string()).collect();
        catalog
    }

    /// Make the next `n` lookups fail with a transport-style error.
    pub fn fail_next(&self, n: usize) {
        self.state.lock().unwrap().fail_next = n;
    }

    pub fn calls(&self) -> usize {
        self.state.lock().unwrap().requests.len()
    }

    pub fn requests(&self) -> Vec<(ColorFilter, String)> {
        self.state.lock().unwrap().requests.clone()
    }
}

impl CommanderCatalog for FakeCatalog {
    fn find_commander(&self, filter: &ColorFilter, query: &str) -> Result<Commander> {
        let mut state = self.state.lock().unwrap();
        state.requests.push((filter.clone(), query.to_string()));
        if state.fail_next > 0 {
            state.fail_next -= 1;
            return Err(TowerError::Malformed("catalog unavailable".to_string()));
        }
        match state.queue.pop_front() {
            Some(name) => Ok(Commander {
                image_uri: image_uri_for(&name),
                name,
            }),
            None => Err(TowerError::NotFound("catalog exhausted".to_string())),
        }
    }
}

pub fn image_uri_for(name: &str) -> String {
    format!("https://img.test/{}.jpg", name.replace(' ', "_"))
}

// ---------------------------------------------------------------------------
// FakeDecklists
// ---------------------------------------------------------------------------

#[derive(Default)]
struct DecklistState {
    decks: HashMap<String, String>,
    requests: Vec<String>,
    fail_next: usize,
}

#[derive(Clone, Default)]
pub struct FakeDecklists {
    state: Arc<Mutex<DecklistState>>,
}

impl FakeDecklists {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_deck(self, commander: &str, decklist: &str) -> Self {
        self.state
            .lock()
            .unwrap()
            .decks
            .insert(commander.to_string(), decklist.to_string());
        self
    }

    pub fn fail_next(&self, n: usize) {
        self.state.lock().unwrap().fail_next = n;
    }

    pub fn calls(&self) -> usize {
        self.state.lock().unwrap().requests.len()
    }

    pub fn requests(&self) -> Vec<String> {
        self.state.lock().unwrap().requests.clone()
    }
}

impl DecklistSource for FakeDecklists {
    fn fetch_average_decklist(&self, commander: &str) -> Result<String> {
        let mut state = self.state.lock().unwrap();
        state.requests.push(commander.to_string());
        if state.fail_next > 0 {
            state.fail_next -= 1;
            return Err(TowerError::Malformed("decklist service down".to_string()));
        }
        state
            .decks
            .get(commander)
            .cloned()
            .ok_or_else(|| TowerError::NotFound(format!("no deck for {}", commander)))
    }
}

// ---------------------------------------------------------------------------
// FakePrices
// ---------------------------------------------------------------------------

#[derive(Default)]
struct PriceState {
    prices: HashMap<String, f64>,
    default_price: Option<f64>,
    failing: HashSet<String>,
    batches: Vec<Vec<String>>,
}

/// Prices cards from a table; batches containing a failing card error out.
#[derive(Clone, Default)]
pub struct FakePrices {
    state: Arc<Mutex<PriceState>>,
}

impl FakePrices {
    /// Every card costs `price` unless overridden with `with_price`.
    pub fn flat(price: f64) -> Self {
        let prices = Self::default();
        prices.state.lock().unwrap().default_price = Some(price);
        prices
    }

    /// Only cards given via `with_price` have a quote.
    pub fn unpriced() -> Self {
        Self::default()
    }

    pub fn with_price(self, name: &str, price: f64) -> Self {
        self.state
            .lock()
            .unwrap()
            .prices
            .insert(name.to_string(), price);
        self
    }

    pub fn failing_on(self, name: &str) -> Self {
        self.state.lock().unwrap().failing.insert(name.to_string());
        self
    }

    pub fn calls(&self) -> usize {
        self.state.lock().unwrap().batches.len()
    }

    /// Batches received so far, sorted by their first card for stable comparison.
    pub fn batches(&self) -> Vec<Vec<String>> {
        let mut batches = self.state.lock().unwrap().batches.clone();
        batches.sort();
        batches
    }
}

impl PriceSource for FakePrices {
    fn fetch_prices(&self, names: &[String]) -> Result<Vec<CardPrice>> {
        let mut state = self.state.lock().unwrap();
        state.batches.push(names.to_vec());
        if names.iter().any(|n| state.failing.contains(n)) {
            return Err(TowerError::Malformed("price service error".to_string()));
        }
        Ok(names
            .iter()
            .map(|n| {
                let price = state.prices.get(n).copied().or(state.default_price);
                CardPrice::new(n.clone(), price)
            })
            .collect())
    }
}

// ---------------------------------------------------------------------------
// FakeImages
// ---------------------------------------------------------------------------

pub const PLACEHOLDER_URI: &str = "https://img.test/card-back.jpg";

#[derive(Clone, Default)]
pub struct FakeImages {
    resolved: Arc<Mutex<Vec<String>>>,
}

impl FakeImages {
    pub fn resolved(&self) -> Vec<String> {
        self.resolved.lock().unwrap().clone()
    }
}

impl ImageResolver for FakeImages {
    fn resolve(&self, uri: &str) -> ImageHandle {
        self.resolved.lock().unwrap().push(uri.to_string());
        if uri.is_empty() {
            ImageHandle::placeholder(PLACEHOLDER_URI, b"back".to_vec())
        } else {
            ImageHandle::new(uri, uri.as_bytes().to_vec())
        }
    }
}

// ---------------------------------------------------------------------------
// Session setup
// ---------------------------------------------------------------------------

pub struct Fakes {
    pub catalog: FakeCatalog,
    pub decklists: FakeDecklists,
    pub prices: FakePrices,
    pub images: FakeImages,
}

/// Build a session on top of the given fakes, keeping handles for inspection.
pub fn setup_tower(fakes: &Fakes, concurrency: usize) -> CommandTower {
    CommandTower::builder()
        .concurrency(concurrency)
        .catalog(fakes.catalog.clone())
        .decklists(fakes.decklists.clone())
        .prices(fakes.prices.clone())
        .images(fakes.images.clone())
        .build()
        .unwrap()
}

/// `n` decklist lines of the form `1 Card NN`.
pub fn deck_lines(n: usize) -> Vec<String> {
    (0..n).map(|i| format!("1 Card {:02}", i)).collect()
}

pub fn deck_text(n: usize) -> String {
    deck_lines(n).join("\n")
}

pub fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {}, got {}",
        expected,
        actual
    );
}

// ---------------------------------------------------------------------------
// TestServer
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    /// Path including the query string.
    pub path: String,
    pub body: String,
}

/// Loopback HTTP server answering every request through `handler`.
///
/// Each response closes its connection. Requests are recorded before the
/// response is written, so a client that got its answer will see its
/// request in `requests()`.
pub struct TestServer {
    url: String,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl TestServer {
    pub fn start<F>(handler: F) -> Self
    where
        F: Fn(&RecordedRequest) -> (u16, String) + Send + 'static,
    {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let url = format!("http://{}", listener.local_addr().unwrap());
        let requests = Arc::new(Mutex::new(Vec::new()));
        let log = Arc::clone(&requests);
        thread::spawn(move || {
            for stream in listener.incoming() {
                let Ok(stream) = stream else { continue };
                let Some(request) = read_request(&stream) else { continue };
                let (status, body) = handler(&request);
                log.lock().unwrap().push(request);
                let _ = write_response(stream, status, &body);
            }
        });
        Self { url, requests }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn paths(&self) -> Vec<String> {
        self.requests().into_iter().map(|r| r.path).collect()
    }
}

fn read_request(stream: &TcpStream) -> Option<RecordedRequest> {
    let mut reader = BufReader::new(stream);
    let mut line = String::new();
    reader.read_line(&mut line).ok()?;
    let mut parts = line.split_whitespace();
    let method = parts.next()?.to_string();
    let path = parts.next()?.to_string();

    let mut content_length = 0;
    loop {
        let mut header = String::new();
        reader.read_line(&mut header).ok()?;
        let header = header.trim_end();
        if header.is_empty() {
            break;
        }
        if let Some((key, value)) = header.split_once(':') {
            if key.eq_ignore_ascii_case("content-length") {
                content_length = value.trim().parse().unwrap_or(0);
            }
        }
    }

    let mut body = vec![0; content_length];
    reader.read_exact(&mut body).ok()?;
    Some(RecordedRequest {
        method,
        path,
        body: String::from_utf8_lossy(&body).into_owned(),
    })
}

fn write_response(mut stream: TcpStream, status: u16, body: &str) -> std::io::Result<()> {
    let reason = match status {
        200 => "OK",
        404 => "Not Found",
        500 => "Internal Server Error",
        _ => "Status",
    };
    write!(
        stream,
        "HTTP/1.1 {} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        status,
        reason,
        body.len(),
        body
    )?;
    stream.flush()
}

/// Config pointing every endpoint at `url`.
pub fn local_config(url: &str) -> Config {
    Config {
        scryfall_api: url.to_string(),
        edhrec_base: url.to_string(),
        placeholder_image: format!("{}/card-back.jpg", url),
        ..Config::default()
    }
}

/// HTTP client that ignores proxy settings from the environment.
pub fn local_client() -> reqwest::blocking::Client {
    reqwest::blocking::Client::builder()
        .no_proxy()
        .timeout(Duration::from_secs(10))
        .build()
        .unwrap()
}
