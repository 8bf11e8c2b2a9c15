use thiserror::Error;

// Re-export for convenience elsewhere
pub use config::ConfigError;

// --- Classification Error ---
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ClassifyError {
    #[error("Malformed request URL: {0}")]
    MalformedUrl(String),
}

// --- Core Error (Top-level Internal) ---
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Spec file error: {0}")]
    SpecFile(String), // Reading or parsing an extra parameter-spec table

    #[error("Logging setup error: {0}")]
    LoggingSetup(String),

    #[error("Ingestion error: {0}")]
    Ingest(String), // Generic mailbox/dispatch issues at the panel boundary

    #[error("Internal error: {0}")]
    Internal(String),
}
