use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    /// A required bridge capability was not provided at configuration time.
    #[error("Missing capability `{capability}`: {message}")]
    CapabilityMissing {
        capability: String,
        message: String,
    },

    /// A configuration value failed validation.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// The tracing subscriber could not be installed.
    #[error("Logging initialization failed: {0}")]
    LoggingInit(String),
}

pub type Result<T> = std::result::Result<T, CoreError>;
