//! # Core Runtime
//!
//! Ambient services shared by the playback core: configuration with
//! fail-fast validation, logging bootstrap, and common error types.

pub mod config;
pub mod error;
pub mod logging;

pub use config::{PlayerConfig, PlayerConfigBuilder};
pub use error::{CoreError, Result};
pub use logging::{init_logging, LogFormat, LoggingConfig};
