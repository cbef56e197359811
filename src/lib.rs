use thiserror::Error;

pub type Result<T> = std::result::Result<T, PortalError>;

#[derive(Error, Debug)]
pub enum PortalError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Payload error: {0}")]
    Payload(String),

    #[error("Linker error: {0}")]
    Linker(String),

    #[error("Submission error: {0}")]
    Submission(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Other error: {0}")]
    Other(#[from] anyhow::Error),
}

pub mod commands;
pub mod config;
pub mod format;
pub mod geo;
pub mod knowledge;
pub mod links;
pub mod news;
pub mod timeline;
