//! Errors at the scene exchange boundary

use thiserror::Error;

/// Reasons a scene document is rejected; the scene is left untouched
#[derive(Debug, Error)]
pub enum ExchangeError {
    #[error("invalid scene document: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("unsupported scene document version {0}")]
    UnsupportedVersion(u32),

    #[error("surface '{name}' has {points} points, at least 3 are required")]
    DegeneratePolygon { name: String, points: usize },
}
