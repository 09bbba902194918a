use thiserror::Error;

#[derive(Error, Debug)]
pub enum PenboardError {
    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Invalid surface path: {0:?}")]
    InvalidPath(String),

    #[error("Surface already registered at {0}")]
    DuplicateSurface(String),

    #[error("Config file not found: {0}")]
    ConfigNotFound(String),

    #[error("Config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("Config validation error: {0}")]
    ConfigInvalid(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Image error: {0}")]
    ImageError(#[from] image::ImageError),
}

pub type Result<T> = std::result::Result<T, PenboardError>;
