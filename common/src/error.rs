use thiserror::Error;

/// Errors raised while building a transect.  These are fatal and happen before any
/// network activity.
///
#[derive(Debug, Error, PartialEq)]
pub enum TransectError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

/// Errors related to the configuration file.
///
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Bad file version {0}, expected {1}")]
    BadFileVersion(usize, usize),
    #[error("Unknown config file {0} and no default in {1}")]
    MissingConfig(String, String),
}
