//! Scryfall REST client: random commander lookup and batch card pricing.

use reqwest::blocking::Client;
use reqwest::StatusCode;
use serde_json::json;
use tracing::{debug, info};

use crate::config::{self, Config, Currency};
use crate::error::{Result, TowerError};
use crate::models::{CardPrice, CollectionResponse, ColorFilter, Commander, ScryfallCard};
use crate::sources::{http_client, CommanderCatalog, PriceSource};

/// Search terms every commander query starts with.
pub const COMMANDER_BASE_QUERY: &str =
    "is:Commander (game:paper) legal:commander (type:creature OR type:planeswalker)";

// ---------------------------------------------------------------------------
// ScryfallClient
// ---------------------------------------------------------------------------

pub struct ScryfallClient {
    client: Client,
    api_base: String,
    currency: Currency,
}

impl ScryfallClient {
    pub fn new(config: &Config) -> Result<Self> {
        Ok(Self::with_client(http_client(config.timeout)?, config))
    }

    /// Build on top of an existing HTTP client.
    pub fn with_client(client: Client, config: &Config) -> Self {
        Self {
            client,
            api_base: config.scryfall_api.trim_end_matches('/').to_string(),
            currency: config.currency,
        }
    }

    fn fetch_collection(&self, names: &[String]) -> Result<CollectionResponse> {
        let identifiers: Vec<_> = names.iter().map(|n| json!({ "name": n })).collect();
        let url = format!("{}/cards/collection", self.api_base);
        debug!(cards = names.len(), "requesting {}", url);
        let resp = self
            .client
            .post(&url)
            .json(&json!({ "identifiers": identifiers }))
            .send()?
            .error_for_status()?;
        Ok(resp.json()?)
    }
}

impl CommanderCatalog for ScryfallClient {
    fn find_commander(&self, filter: &ColorFilter, query: &str) -> Result<Commander> {
        let q = commander_query(filter, query);
        let url = format!("{}/cards/random", self.api_base);
        debug!(query = %q, "requesting {}", url);

        let resp = self.client.get(&url).query(&[("q", q.as_str())]).send()?;
        if resp.status() == StatusCode::NOT_FOUND {
            return Err(TowerError::NotFound(format!(
                "No commander matches query: {}",
                q
            )));
        }
        let body = resp.error_for_status()?.text()?;
        let commander = parse_commander(&body)?;
        info!(name = %commander.name, "retrieved commander");
        Ok(commander)
    }
}

impl PriceSource for ScryfallClient {
    fn fetch_prices(&self, names: &[String]) -> Result<Vec<CardPrice>> {
        let mut prices = Vec::with_capacity(names.len());
        for batch in names.chunks(config::COLLECTION_BATCH_LIMIT) {
            let collection = self.fetch_collection(batch)?;
            if !collection.not_found.is_empty() {
                debug!(
                    missing = collection.not_found.len(),
                    "scryfall could not identify some cards"
                );
            }
            prices.extend(
                collection
                    .data
                    .iter()
                    .map(|card| CardPrice::new(card.name.clone(), card.price(self.currency))),
            );
        }
        Ok(prices)
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Build the full-text search for a random commander.
///
/// ```rust
/// use command_tower::models::{Color, ColorFilter};
/// use command_tower::sources::scryfall::commander_query;
///
/// let filter = ColorFilter::new([Color::White, Color::Blue], false);
/// assert!(commander_query(&filter, "").ends_with(" color<=WU"));
/// ```
pub fn commander_query(filter: &ColorFilter, free_text: &str) -> String {
    let mut parts = vec![COMMANDER_BASE_QUERY.to_string()];
    let free_text = free_text.trim();
    if !free_text.is_empty() {
        parts.push(free_text.to_string());
    }
    if let Some(clause) = filter.search_clause() {
        parts.push(clause);
    }
    parts.join(" ")
}

/// Parse a Scryfall card object into a [`Commander`].
///
/// A card without any image yields an empty `image_uri`; the image resolver
/// substitutes the placeholder for it.
pub fn parse_commander(body: &str) -> Result<Commander> {
    let card: ScryfallCard = serde_json::from_str(body)?;
    if card.name.trim().is_empty() {
        return Err(TowerError::Malformed(
            "Scryfall card without a name".to_string(),
        ));
    }
    let image_uri = card.image_uri().unwrap_or_default().to_string();
    Ok(Commander {
        name: card.name,
        image_uri,
    })
}
