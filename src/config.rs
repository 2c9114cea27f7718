use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::error::TowerError;

pub const SCRYFALL_API: &str = "https://api.scryfall.com";
pub const EDHREC_BASE: &str = "https://edhrec.com";
pub const PLACEHOLDER_IMAGE: &str = "https://static.wikia.nocookie.net/mtgsalvation_gamepedia/images/f/f8/Magic_card_back.jpg/revision/latest?cb=20140813141013";

/// Used when the EDHREC home page can't be scraped for a fresh build id.
pub const FALLBACK_BUILD_ID: &str = "7-TtnLfoAX_AgebfCokAf";

/// Maximum identifiers Scryfall accepts in one `/cards/collection` request.
pub const COLLECTION_BATCH_LIMIT: usize = 75;

pub const DEFAULT_CONCURRENCY: usize = 2;

pub const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Price field read from Scryfall's `prices` object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Currency {
    #[default]
    Eur,
    Usd,
    Tix,
}

impl Currency {
    /// Key of this currency inside a Scryfall `prices` object.
    pub fn price_key(&self) -> &'static str {
        match self {
            Currency::Eur => "eur",
            Currency::Usd => "usd",
            Currency::Tix => "tix",
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Currency::Eur => "EUR",
            Currency::Usd => "USD",
            Currency::Tix => "TIX",
        }
    }
}

impl FromStr for Currency {
    type Err = TowerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "eur" => Ok(Currency::Eur),
            "usd" => Ok(Currency::Usd),
            "tix" => Ok(Currency::Tix),
            other => Err(TowerError::InvalidArgument(format!(
                "Unknown currency: {}",
                other
            ))),
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Endpoints and tuning knobs handed to the HTTP collaborators at construction.
#[derive(Debug, Clone)]
pub struct Config {
    pub scryfall_api: String,
    pub edhrec_base: String,
    pub placeholder_image: String,
    pub fallback_build_id: String,
    /// Per-request HTTP timeout.
    pub timeout: Duration,
    /// Number of concurrent pricing partitions.
    pub concurrency: usize,
    pub currency: Currency,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            scryfall_api: SCRYFALL_API.to_string(),
            edhrec_base: EDHREC_BASE.to_string(),
            placeholder_image: PLACEHOLDER_IMAGE.to_string(),
            fallback_build_id: FALLBACK_BUILD_ID.to_string(),
            timeout: Duration::from_secs(30),
            concurrency: DEFAULT_CONCURRENCY,
            currency: Currency::default(),
        }
    }
}

pub fn default_log_dir() -> PathBuf {
    if let Some(cache) = dirs::cache_dir() {
        cache.join("command-tower").join("logs")
    } else {
        PathBuf::from(".command-tower-logs")
    }
}
