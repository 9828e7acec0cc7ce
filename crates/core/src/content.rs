//! Portfolio content loading.

use folio_protocol::Portfolio;
use thiserror::Error;

const BUILTIN: &str = include_str!("../assets/portfolio.json");

#[derive(Debug, Error)]
pub enum ContentError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Parse portfolio content from JSON. The content is passed through to the
/// views as is; only its shape is checked.
pub fn parse_portfolio(data: &[u8]) -> Result<Portfolio, ContentError> {
    Ok(serde_json::from_slice(data)?)
}

/// The content shipped with the crate.
pub fn builtin() -> Result<Portfolio, ContentError> {
    parse_portfolio(BUILTIN.as_bytes())
}
