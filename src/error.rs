#[derive(Debug, thiserror::Error)]
pub enum TowerError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Malformed response: {0}")]
    Malformed(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

/// Coarse classification of a [`TowerError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The collaborator had nothing matching (no commander, no decks).
    NotFound,
    /// Network or transport failure; retrying may succeed.
    Transient,
    /// The response did not have the expected shape.
    Malformed,
    /// The caller passed something unusable.
    Invalid,
}

impl TowerError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            TowerError::Http(e) if e.is_decode() => ErrorKind::Malformed,
            TowerError::Http(e) if e.status() == Some(reqwest::StatusCode::NOT_FOUND) => {
                ErrorKind::NotFound
            }
            TowerError::Http(_) | TowerError::Io(_) => ErrorKind::Transient,
            TowerError::Json(_) | TowerError::Malformed(_) => ErrorKind::Malformed,
            TowerError::NotFound(_) => ErrorKind::NotFound,
            TowerError::InvalidArgument(_) => ErrorKind::Invalid,
        }
    }
}

pub type Result<T> = std::result::Result<T, TowerError>;
