use reqwest::blocking::Client;
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::Result;
use crate::models::ImageHandle;
use crate::sources::{http_client, ImageResolver};

/// Downloads commander images, substituting the card back on failure.
pub struct HttpImageResolver {
    client: Client,
    placeholder_uri: String,
}

impl HttpImageResolver {
    pub fn new(config: &Config) -> Result<Self> {
        Ok(Self::with_client(http_client(config.timeout)?, config))
    }

    pub fn with_client(client: Client, config: &Config) -> Self {
        Self {
            client,
            placeholder_uri: config.placeholder_image.clone(),
        }
    }

    fn download(&self, uri: &str) -> Result<Vec<u8>> {
        debug!("requesting {}", uri);
        let resp = self.client.get(uri).send()?.error_for_status()?;
        Ok(resp.bytes()?.to_vec())
    }

    /// The card-back image; empty bytes if even that can't be fetched.
    pub fn placeholder(&self) -> ImageHandle {
        match self.download(&self.placeholder_uri) {
            Ok(bytes) => ImageHandle::placeholder(self.placeholder_uri.clone(), bytes),
            Err(e) => {
                warn!("Failed to load placeholder image: {}", e);
                ImageHandle::placeholder(self.placeholder_uri.clone(), Vec::new())
            }
        }
    }
}

impl ImageResolver for HttpImageResolver {
    fn resolve(&self, uri: &str) -> ImageHandle {
        if uri.is_empty() {
            return self.placeholder();
        }
        match self.download(uri) {
            Ok(bytes) => ImageHandle::new(uri, bytes),
            Err(e) => {
                warn!("Failed to load image {}: {}", uri, e);
                self.placeholder()
            }
        }
    }
}
