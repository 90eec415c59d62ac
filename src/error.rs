/// Error type shared by the options page, popup and relay
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("storage error: {0}")]
    Storage(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to convert value: {0}")]
    Conversion(#[from] serde_wasm_bindgen::Error),

    #[error("random source unavailable: {0}")]
    Random(String),

    // Network and Http render bare so the relay can report them verbatim
    #[error("{0}")]
    Network(String),

    #[error("{0}")]
    Http(String),

    #[error("Invalid relay message: {0}")]
    InvalidMessage(String),
}

pub type Result<T> = std::result::Result<T, Error>;
