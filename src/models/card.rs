use serde::{Deserialize, Serialize};

use crate::config::Currency;

// ---------------------------------------------------------------------------
// ScryfallCard — The subset of a Scryfall card object we read
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScryfallCard {
    pub name: String,
    pub image_uris: Option<ImageUris>,
    #[serde(default)]
    pub card_faces: Vec<CardFace>,
    pub prices: Option<Prices>,
}

impl ScryfallCard {
    /// Image to show for this card.
    ///
    /// Prefers the top-level border crop; double-faced cards carry their
    /// images per face, in which case the front face is used.
    pub fn image_uri(&self) -> Option<&str> {
        if let Some(uri) = self.image_uris.as_ref().and_then(ImageUris::preferred) {
            return Some(uri);
        }
        self.card_faces
            .first()
            .and_then(|face| face.image_uris.as_ref())
            .and_then(ImageUris::preferred)
    }

    /// Parsed price for `currency`, `None` when Scryfall has no quote.
    pub fn price(&self, currency: Currency) -> Option<f64> {
        self.prices.as_ref().and_then(|p| p.get(currency))
    }
}

// ---------------------------------------------------------------------------
// ImageUris
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ImageUris {
    pub small: Option<String>,
    pub normal: Option<String>,
    pub large: Option<String>,
    pub border_crop: Option<String>,
}

impl ImageUris {
    fn preferred(&self) -> Option<&str> {
        [&self.border_crop, &self.normal]
            .into_iter()
            .flatten()
            .map(String::as_str)
            .find(|s| !s.is_empty())
    }
}

// ---------------------------------------------------------------------------
// CardFace
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CardFace {
    pub name: Option<String>,
    pub image_uris: Option<ImageUris>,
}

// ---------------------------------------------------------------------------
// Prices — Scryfall reports prices as decimal strings or null
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Prices {
    pub eur: Option<String>,
    pub usd: Option<String>,
    pub tix: Option<String>,
}

impl Prices {
    pub fn get(&self, currency: Currency) -> Option<f64> {
        let raw = match currency {
            Currency::Eur => self.eur.as_deref(),
            Currency::Usd => self.usd.as_deref(),
            Currency::Tix => self.tix.as_deref(),
        };
        raw.and_then(|s| s.trim().parse::<f64>().ok())
    }
}

// ---------------------------------------------------------------------------
// CollectionResponse — Body of POST /cards/collection
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectionResponse {
    #[serde(default)]
    pub data: Vec<ScryfallCard>,
    #[serde(default)]
    pub not_found: Vec<serde_json::Value>,
}
