use std::fmt;
use std::sync::Arc;

// ---------------------------------------------------------------------------
// ImageHandle — Downloaded image bytes plus where they came from
// ---------------------------------------------------------------------------

/// Opaque, cheaply clonable handle to a resolved commander image.
#[derive(Clone, PartialEq, Eq)]
pub struct ImageHandle {
    source: String,
    bytes: Arc<[u8]>,
    placeholder: bool,
}

impl ImageHandle {
    pub fn new(source: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            source: source.into(),
            bytes: bytes.into(),
            placeholder: false,
        }
    }

    /// Handle for the fallback card-back image.
    ///
    /// `bytes` may be empty when even the placeholder could not be downloaded.
    pub fn placeholder(source: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            source: source.into(),
            bytes: bytes.into(),
            placeholder: true,
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn is_placeholder(&self) -> bool {
        self.placeholder
    }
}

impl fmt::Debug for ImageHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageHandle")
            .field("source", &self.source)
            .field("bytes", &self.bytes.len())
            .field("placeholder", &self.placeholder)
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Visit — One entry of the navigation history
// ---------------------------------------------------------------------------

/// A fetched commander together with its lazily filled decklist and price.
///
/// `decklist` and `price` are write-once: once set they are never replaced.
#[derive(Debug, Clone, PartialEq)]
pub struct Visit {
    name: String,
    image: ImageHandle,
    placeholder: bool,
    decklist: Option<String>,
    price: Option<f64>,
}

impl Visit {
    pub fn new(name: impl Into<String>, image: ImageHandle) -> Self {
        Self {
            name: name.into(),
            image,
            placeholder: false,
            decklist: None,
            price: None,
        }
    }

    /// Visit recorded when the catalog lookup failed.
    pub fn placeholder(image: ImageHandle) -> Self {
        Self {
            name: String::new(),
            image,
            placeholder: true,
            decklist: None,
            price: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn image(&self) -> &ImageHandle {
        &self.image
    }

    pub fn is_placeholder(&self) -> bool {
        self.placeholder
    }

    pub fn decklist(&self) -> Option<&str> {
        self.decklist.as_deref()
    }

    pub fn price(&self) -> Option<f64> {
        self.price
    }

    /// Store the decklist unless one is already set. Returns the stored text.
    pub(crate) fn fill_decklist(&mut self, decklist: String) -> &str {
        self.decklist.get_or_insert(decklist)
    }

    /// Store the price unless one is already set. Returns the stored amount.
    pub(crate) fn fill_price(&mut self, price: f64) -> f64 {
        *self.price.get_or_insert(price)
    }
}
