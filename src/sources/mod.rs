//! External collaborators consulted by the history and the price aggregator.
//!
//! Each concern is a trait so the core can be driven by the HTTP clients in
//! the submodules or by in-memory fakes. All traits are `Send + Sync`: price
//! lookups are issued from several worker threads at once, and the async
//! wrapper moves the whole session onto Tokio's blocking pool.

pub mod edhrec;
pub mod image;
pub mod scryfall;

pub use edhrec::EdhrecClient;
pub use image::HttpImageResolver;
pub use scryfall::ScryfallClient;

use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};

use crate::config;
use crate::error::Result;
use crate::models::{CardPrice, ColorFilter, Commander, ImageHandle};

/// Picks a random commander matching a color filter and free-text query.
pub trait CommanderCatalog: Send + Sync {
    fn find_commander(&self, filter: &ColorFilter, query: &str) -> Result<Commander>;
}

/// Looks up the average decklist for a commander, one `"<qty> <name>"` per line.
pub trait DecklistSource: Send + Sync {
    fn fetch_average_decklist(&self, commander: &str) -> Result<String>;
}

/// Prices a batch of card names in one request.
pub trait PriceSource: Send + Sync {
    fn fetch_prices(&self, names: &[String]) -> Result<Vec<CardPrice>>;
}

/// Turns an image reference into a displayable image.
///
/// Never fails: implementations fall back to a placeholder image, and an
/// empty `uri` resolves straight to that placeholder.
pub trait ImageResolver: Send + Sync {
    fn resolve(&self, uri: &str) -> ImageHandle;
}

/// Blocking HTTP client shared by the concrete collaborators.
pub(crate) fn http_client(timeout: Duration) -> Result<Client> {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static("application/json;q=0.9,*/*;q=0.8"));
    let client = Client::builder()
        .timeout(timeout)
        .user_agent(config::USER_AGENT)
        .default_headers(headers)
        .redirect(reqwest::redirect::Policy::limited(10))
        .build()?;
    Ok(client)
}
