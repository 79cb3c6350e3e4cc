use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Unknown image key: {0:?}")]
    UnknownImageKey(String),

    #[error("Duplicate image key: {0:?}")]
    DuplicateImageKey(String),

    #[error("Source image {key:?} too wide [{width} >= {max}]")]
    ImageTooWide { key: String, width: i32, max: i32 },

    #[error("Atlas overflow while placing {0:?}")]
    AtlasOverflow(String),

    #[error("Invalid level: {0}")]
    InvalidLevel(String),

    #[error("Duplicate trigger name: {0:?}")]
    DuplicateTrigger(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("Config parse error: {0}")]
    Toml(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, EngineError>;
