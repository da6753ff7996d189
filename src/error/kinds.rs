use std::{fmt, io};

/// Crate-wide `Result` type using [`TypeaheadError`] as the error.
///
/// This alias is re-exported by the parent `error` module and is intended
/// to be used throughout the crate for fallible operations.
pub type Result<T> = std::result::Result<T, TypeaheadError>;

/// Error type produced by caller-supplied fetchers.
///
/// Fetch failures are passed through the controller untouched, so the
/// caller picks whatever concrete error it likes.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Top-level error type for typeahead operations.
#[derive(Debug)]
pub enum TypeaheadError {
    /// Configuration errors.
    Config(ConfigError),

    /// Item serialization errors.
    Serialization(serde_json::Error),

    /// I/O errors.
    Io(io::Error),

    /// Generic error with a free-form message.
    Generic(String),
}

/// Configuration-specific errors.
#[derive(Debug)]
pub enum ConfigError {
    /// A suggestion fetch was requested before a fetcher was installed.
    FetcherNotInstalled,

    /// Config file not found.
    FileNotFound(String),

    /// Invalid config format.
    InvalidFormat(String),
}

impl TypeaheadError {
    /// Whether this error means the caller forgot to install a fetcher.
    pub fn is_missing_fetcher(&self) -> bool {
        matches!(self, TypeaheadError::Config(ConfigError::FetcherNotInstalled))
    }
}

/* ========================= Display & Error impls ========================= */

impl fmt::Display for TypeaheadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeaheadError::Config(e) => write!(f, "Configuration error: {e}"),
            TypeaheadError::Serialization(e) => write!(f, "Serialization error: {e}"),
            TypeaheadError::Io(e) => write!(f, "I/O error: {e}"),
            TypeaheadError::Generic(msg) => write!(f, "{msg}"),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::FetcherNotInstalled => write!(f, "Fetcher is not installed"),
            ConfigError::FileNotFound(path) => write!(f, "Config file not found: {path}"),
            ConfigError::InvalidFormat(msg) => write!(f, "Invalid config format: {msg}"),
        }
    }
}

impl std::error::Error for TypeaheadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TypeaheadError::Config(e) => Some(e),
            TypeaheadError::Serialization(e) => Some(e),
            TypeaheadError::Io(e) => Some(e),
            TypeaheadError::Generic(_) => None,
        }
    }
}

impl std::error::Error for ConfigError {}

/* ========================= Conversions to TypeaheadError ========================= */

impl From<io::Error> for TypeaheadError {
    fn from(err: io::Error) -> Self {
        TypeaheadError::Io(err)
    }
}

impl From<serde_json::Error> for TypeaheadError {
    fn from(err: serde_json::Error) -> Self {
        TypeaheadError::Serialization(err)
    }
}

impl From<ConfigError> for TypeaheadError {
    fn from(err: ConfigError) -> Self {
        TypeaheadError::Config(err)
    }
}

impl From<String> for TypeaheadError {
    fn from(msg: String) -> Self {
        TypeaheadError::Generic(msg)
    }
}

impl From<&str> for TypeaheadError {
    fn from(msg: &str) -> Self {
        TypeaheadError::Generic(msg.to_owned())
    }
}
