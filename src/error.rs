use thiserror::Error;

#[derive(Error, Debug)]
pub enum KeyGhostError {
    #[error("IO Error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON Parsing Error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration Error: {0}")]
    Config(String),

    #[error("Key Dispatch Error: {0}")]
    Dispatch(String),

    #[error("Word Supply Error: {0}")]
    WordSupply(String),
}

pub type KgResult<T> = Result<T, KeyGhostError>;
