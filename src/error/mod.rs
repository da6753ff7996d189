//! Error handling for the typeahead controller.
//!
//! Two failure modes are distinguished:
//! - Configuration errors, most notably a fetch requested before any fetcher
//!   was installed. These surface synchronously at the point of use.
//! - Upstream fetch failures, which belong to the caller and are carried as
//!   [`BoxError`] without being wrapped.
//!
//! # Example
//!
//! ```rust
//! use typeahead::error::{ConfigError, Result, TypeaheadError};
//!
//! fn require_fetcher(installed: bool) -> Result<()> {
//!     if !installed {
//!         return Err(ConfigError::FetcherNotInstalled.into());
//!     }
//!     Ok(())
//! }
//!
//! assert!(matches!(
//!     require_fetcher(false),
//!     Err(TypeaheadError::Config(ConfigError::FetcherNotInstalled))
//! ));
//! ```

pub mod kinds;

// Re-export commonly used types
pub use kinds::{BoxError, ConfigError, Result, TypeaheadError};
