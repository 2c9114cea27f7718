use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// CardPrice — One item returned by a batch price lookup
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardPrice {
    pub name: String,
    /// `None` when the source has no quote for this card.
    pub price: Option<f64>,
}

impl CardPrice {
    pub fn new(name: impl Into<String>, price: Option<f64>) -> Self {
        Self {
            name: name.into(),
            price,
        }
    }
}

/// Sum of all quoted prices; unquoted cards count as zero.
pub fn sum_prices(prices: &[CardPrice]) -> f64 {
    prices.iter().filter_map(|p| p.price).sum()
}
