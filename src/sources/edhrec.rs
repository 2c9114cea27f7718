//! EDHREC client for average commander decklists.
//!
//! EDHREC serves its pages through Next.js, so deck data lives under a
//! `/_next/data/{buildId}/...` route. The build id is scraped from the home
//! page and reused for every later lookup once a scrape succeeds.

use std::sync::{LazyLock, OnceLock};

use regex::Regex;
use reqwest::blocking::Client;
use reqwest::StatusCode;
use serde_json::Value;
use tracing::{debug, info, warn};
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

use crate::config::Config;
use crate::error::{Result, TowerError};
use crate::sources::{http_client, DecklistSource};

static NEXT_DATA: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?s)<script id="__NEXT_DATA__" type="application/json">(.*?)</script>"#)
        .expect("Failed to compile __NEXT_DATA__ regex")
});

// ---------------------------------------------------------------------------
// EdhrecClient
// ---------------------------------------------------------------------------

pub struct EdhrecClient {
    client: Client,
    base: String,
    fallback_build_id: String,
    build_id: OnceLock<String>,
}

impl EdhrecClient {
    pub fn new(config: &Config) -> Result<Self> {
        Ok(Self::with_client(http_client(config.timeout)?, config))
    }

    pub fn with_client(client: Client, config: &Config) -> Self {
        Self {
            client,
            base: config.edhrec_base.trim_end_matches('/').to_string(),
            fallback_build_id: config.fallback_build_id.clone(),
            build_id: OnceLock::new(),
        }
    }

    /// Next.js build id.
    ///
    /// Only a scraped id is cached. When scraping fails the fallback serves
    /// this one request and the next call scrapes again.
    fn build_id(&self) -> String {
        if let Some(id) = self.build_id.get() {
            return id.clone();
        }
        match self.scrape_build_id() {
            Ok(id) => self.build_id.get_or_init(|| id).clone(),
            Err(e) => {
                warn!("Failed to scrape EDHREC build id, using fallback: {}", e);
                self.fallback_build_id.clone()
            }
        }
    }

    fn scrape_build_id(&self) -> Result<String> {
        debug!("requesting {}", self.base);
        let html = self.client.get(&self.base).send()?.error_for_status()?.text()?;
        let id = extract_build_id(&html)
            .ok_or_else(|| TowerError::Malformed("No buildId in EDHREC page".to_string()))?;
        debug!(build_id = %id, "scraped EDHREC build id");
        Ok(id)
    }
}

impl DecklistSource for EdhrecClient {
    fn fetch_average_decklist(&self, commander: &str) -> Result<String> {
        let slug = slugify(commander);
        if slug.is_empty() {
            return Err(TowerError::NotFound(format!(
                "No EDHREC page for commander '{}'",
                commander
            )));
        }
        let url = format!(
            "{}/_next/data/{}/average-decks/{}.json",
            self.base,
            self.build_id(),
            slug
        );
        debug!("requesting {}", url);

        let resp = self
            .client
            .get(&url)
            .query(&[("commanderName", slug.as_str())])
            .send()?;
        if resp.status() == StatusCode::NOT_FOUND {
            return Err(TowerError::NotFound(format!(
                "No average deck for commander '{}'",
                commander
            )));
        }
        let body = resp.error_for_status()?.text()?;
        let deck = parse_average_deck(&body, commander)?;
        info!(commander, cards = deck.lines().count(), "retrieved average deck");
        Ok(deck)
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Pull `buildId` out of the `__NEXT_DATA__` script block of an EDHREC page.
pub fn extract_build_id(html: &str) -> Option<String> {
    let payload = NEXT_DATA.captures(html)?.get(1)?.as_str();
    let data: Value = serde_json::from_str(payload).ok()?;
    data.get("buildId")
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Turn an average-deck page into decklist text, one card per line.
///
/// EDHREC answers with a `num_decks` field instead of a deck when it has no
/// data for the commander.
pub fn parse_average_deck(body: &str, commander: &str) -> Result<String> {
    let page: Value = serde_json::from_str(body)?;
    let data = page
        .pointer("/pageProps/data")
        .ok_or_else(|| TowerError::Malformed("Missing pageProps.data".to_string()))?;

    if data.get("num_decks").is_some_and(|v| !v.is_null()) {
        return Err(TowerError::NotFound(format!(
            "No decks found for commander: {}",
            commander
        )));
    }

    let deck = data
        .get("deck")
        .and_then(Value::as_array)
        .ok_or_else(|| TowerError::Malformed("Missing pageProps.data.deck".to_string()))?;

    let lines: Vec<&str> = deck
        .iter()
        .filter_map(Value::as_str)
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();
    if lines.is_empty() {
        return Err(TowerError::NotFound(format!(
            "The deck for {} was empty",
            commander
        )));
    }
    Ok(lines.join("\n"))
}

/// EDHREC URL slug for a card name.
///
/// ```rust
/// use command_tower::sources::edhrec::slugify;
///
/// assert_eq!(slugify("Atraxa, Grand Unifier"), "atraxa-grand-unifier");
/// assert_eq!(slugify("Fire // Ice"), "fire");
/// ```
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    for ch in name.trim().nfd().filter(|c| !is_combining_mark(*c)) {
        match ch {
            ' ' => slug.push('-'),
            ',' | '\'' | '&' | '.' => {}
            c => slug.extend(c.to_lowercase()),
        }
    }
    // double-faced cards: keep the front face only
    if let Some(idx) = slug.find("-//") {
        slug.truncate(idx);
    }
    slug
}
