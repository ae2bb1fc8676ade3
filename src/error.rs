use std::io;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error(transparent)]
    IO(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Status(#[from] StatusError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Server error: {0}")]
    Server(#[from] ServerError),
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum StatusError {
    #[error("Invalid status. Must be ON or OFF")]
    Invalid(Option<String>),
}

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("Configuration parsing error: {0}")]
    Parse(#[from] config::ConfigError),

    #[error("Invalid configuration value: {0}")]
    InvalidValue(String),
}

#[derive(thiserror::Error, Debug)]
pub enum StorageError {
    #[error("Failed to open sheet {path}: {source}")]
    FileOpen { path: String, source: io::Error },

    #[error("Failed to read sheet: {0}")]
    FileRead(io::Error),

    #[error("Failed to write sheet: {0}")]
    FileWrite(io::Error),

    #[error("Failed to replace sheet file: {0}")]
    Persist(String),

    #[error("Failed to encode row: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("Corrupt row at line {line}: {reason}")]
    CorruptRow { line: usize, reason: String },
}

#[derive(thiserror::Error, Debug)]
pub enum ServerError {
    #[error("Server initialization error: {0}")]
    Init(String),
}

impl From<config::ConfigError> for Error {
    fn from(err: config::ConfigError) -> Self {
        Error::Config(ConfigError::Parse(err))
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Storage(StorageError::Encode(err))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
