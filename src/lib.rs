//! Command Tower: random commanders, average decklists and deck prices.
//!
//! A [`CommandTower`] session keeps a navigable [`History`] of commanders
//! fetched from Scryfall. Each visit lazily fetches its EDHREC average
//! decklist and its Scryfall deck price the first time they are asked for,
//! so stepping back and forth through the history never refetches.
//!
//! # Quick start
//!
//! ```no_run
//! use command_tower::CommandTower;
//! use command_tower::models::ColorFilter;
//!
//! let mut tower = CommandTower::builder().build().unwrap();
//!
//! let filter = ColorFilter::from_tokens(&["w", "u"]).unwrap();
//! let name = tower.advance(&filter, "").name().to_string();
//! let decklist = tower.decklist();
//! let price = tower.price();
//! println!("{name}: {} cards, {price:.2}", decklist.lines().count());
//! ```

#[cfg(feature = "async")]
pub mod async_client;
pub mod config;
pub mod controller;
pub mod error;
pub mod history;
pub mod models;
pub mod pricing;
pub mod sources;

#[cfg(feature = "async")]
pub use async_client::AsyncCommandTower;
pub use config::{Config, Currency};
pub use error::{ErrorKind, Result, TowerError};
pub use history::History;
pub use models::{ColorFilter, ImageHandle, Visit};

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use reqwest::blocking::Client;

use sources::{
    CommanderCatalog, DecklistSource, EdhrecClient, HttpImageResolver, ImageResolver,
    PriceSource, ScryfallClient,
};

// ---------------------------------------------------------------------------
// CommandTowerBuilder
// ---------------------------------------------------------------------------

/// Builder for configuring and constructing a [`CommandTower`] session.
///
/// Any collaborator left unset is created from the [`Config`]: Scryfall for
/// the catalog and prices, EDHREC for decklists and a plain HTTP download for
/// images.
pub struct CommandTowerBuilder {
    config: Config,
    catalog: Option<Arc<dyn CommanderCatalog>>,
    decklists: Option<Arc<dyn DecklistSource>>,
    prices: Option<Arc<dyn PriceSource>>,
    images: Option<Arc<dyn ImageResolver>>,
}

impl Default for CommandTowerBuilder {
    fn default() -> Self {
        Self {
            config: Config::default(),
            catalog: None,
            decklists: None,
            prices: None,
            images: None,
        }
    }
}

impl CommandTowerBuilder {
    /// Replace the whole configuration.
    pub fn config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    /// Number of concurrent pricing partitions. Defaults to 2.
    pub fn concurrency(mut self, concurrency: usize) -> Self {
        self.config.concurrency = concurrency;
        self
    }

    /// Currency used for deck prices. Defaults to EUR.
    pub fn currency(mut self, currency: Currency) -> Self {
        self.config.currency = currency;
        self
    }

    /// HTTP request timeout for the built-in clients. Defaults to 30 seconds.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    pub fn catalog<C: CommanderCatalog + 'static>(mut self, catalog: C) -> Self {
        self.catalog = Some(Arc::new(catalog));
        self
    }

    pub fn decklists<D: DecklistSource + 'static>(mut self, decklists: D) -> Self {
        self.decklists = Some(Arc::new(decklists));
        self
    }

    pub fn prices<P: PriceSource + 'static>(mut self, prices: P) -> Self {
        self.prices = Some(Arc::new(prices));
        self
    }

    pub fn images<I: ImageResolver + 'static>(mut self, images: I) -> Self {
        self.images = Some(Arc::new(images));
        self
    }

    /// Build the session.
    ///
    /// No network request is made here; an HTTP client is only created when
    /// at least one collaborator was left to the defaults.
    pub fn build(self) -> Result<CommandTower> {
        if self.config.concurrency == 0 {
            return Err(TowerError::InvalidArgument(
                "concurrency must be at least 1".to_string(),
            ));
        }

        let mut http = LazyHttp::new(self.config.timeout);
        let mut scryfall: Option<Arc<ScryfallClient>> = None;

        let catalog: Arc<dyn CommanderCatalog> = match self.catalog {
            Some(c) => c,
            None => {
                let client = Arc::new(ScryfallClient::with_client(http.get()?, &self.config));
                scryfall = Some(client.clone());
                client
            }
        };
        let prices: Arc<dyn PriceSource> = match (self.prices, scryfall) {
            (Some(p), _) => p,
            (None, Some(shared)) => shared,
            (None, None) => Arc::new(ScryfallClient::with_client(http.get()?, &self.config)),
        };
        let decklists: Arc<dyn DecklistSource> = match self.decklists {
            Some(d) => d,
            None => Arc::new(EdhrecClient::with_client(http.get()?, &self.config)),
        };
        let images: Arc<dyn ImageResolver> = match self.images {
            Some(i) => i,
            None => Arc::new(HttpImageResolver::with_client(http.get()?, &self.config)),
        };

        Ok(CommandTower {
            history: History::new(),
            catalog,
            decklists,
            prices,
            images,
            config: self.config,
        })
    }
}

/// HTTP client built on first demand and shared by the built-in collaborators.
struct LazyHttp {
    timeout: Duration,
    client: Option<Client>,
}

impl LazyHttp {
    fn new(timeout: Duration) -> Self {
        Self {
            timeout,
            client: None,
        }
    }

    fn get(&mut self) -> Result<Client> {
        if let Some(client) = &self.client {
            return Ok(client.clone());
        }
        let client = sources::http_client(self.timeout)?;
        self.client = Some(client.clone());
        Ok(client)
    }
}

// ---------------------------------------------------------------------------
// CommandTower
// ---------------------------------------------------------------------------

/// One browsing session: the history plus the collaborators that fill it.
///
/// All methods take `&mut self`; a session is driven by a single caller.
pub struct CommandTower {
    history: History,
    catalog: Arc<dyn CommanderCatalog>,
    decklists: Arc<dyn DecklistSource>,
    prices: Arc<dyn PriceSource>,
    images: Arc<dyn ImageResolver>,
    config: Config,
}

impl CommandTower {
    pub fn builder() -> CommandTowerBuilder {
        CommandTowerBuilder::default()
    }

    // -- Navigation ---------------------------------------------------------

    /// Go forward.
    ///
    /// On the newest visit this fetches a new commander matching `filter`
    /// and `query` and appends it; anywhere else it replays the next visit
    /// from the history without any network access.
    pub fn advance(&mut self, filter: &ColorFilter, query: &str) -> &Visit {
        let catalog = self.catalog.as_ref();
        let images = self.images.as_ref();
        self.history
            .advance(|| history::fetch_visit(catalog, images, filter, query))
    }

    /// Go back one visit; `None` when already on the oldest one.
    pub fn step_back(&mut self) -> Option<&Visit> {
        self.history.step_back()
    }

    pub fn current(&self) -> Option<&Visit> {
        self.history.current()
    }

    // -- Lazy data ------------------------------------------------------------

    /// Decklist of the current visit, fetched on first request.
    ///
    /// Empty when there is no current visit or the lookup failed.
    pub fn decklist(&mut self) -> String {
        match self.history.current_mut() {
            Some(visit) => history::lazy_decklist(visit, self.decklists.as_ref()),
            None => String::new(),
        }
    }

    /// Deck price of the current visit, computed on first request.
    pub fn price(&mut self) -> f64 {
        match self.history.current_mut() {
            Some(visit) => history::lazy_price(
                visit,
                self.decklists.as_ref(),
                self.prices.as_ref(),
                self.config.concurrency,
            ),
            None => 0.0,
        }
    }

    // -- Accessors ------------------------------------------------------------

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn concurrency(&self) -> usize {
        self.config.concurrency
    }

    pub fn currency(&self) -> Currency {
        self.config.currency
    }
}

// ---------------------------------------------------------------------------
// Display
// ---------------------------------------------------------------------------

impl fmt::Display for CommandTower {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "CommandTower(visits={}, back_steps={}, concurrency={}, currency={})",
            self.history.len(),
            self.history.back_steps(),
            self.config.concurrency,
            self.config.currency
        )
    }
}
