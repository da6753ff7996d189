//! Typeahead Controller Library
//!
//! Attaches typeahead behavior to a single text input field. The controller
//! sits between a caller-supplied asynchronous item source, caller-supplied
//! render and select hooks, and an external suggestion engine, and keeps the
//! field text consistent with the item the user last picked.
//!
//! # Modules
//!
//! - `cli`: Interactive terminal demo
//! - `config`: Configuration management
//! - `controller`: The [`Autocompleter`] and its selection state machine
//! - `engine`: Suggestion engine interface and a scripted reference engine
//! - `error`: Error types and handling
//! - `field`: Input field abstraction
//! - `render`: Suggestion elements
//! - `source`: Item sources
//!
//! # Example
//!
//! ```
//! use typeahead::{Autocompleter, InputField, MemoryField, PrefixSource, ScriptedEngine};
//!
//! # tokio_test::block_on(async {
//! let field = MemoryField::new();
//! let languages = Autocompleter::new(field.clone(), |name: &String| name.clone());
//! languages.set_debounce_wait_ms(None).set_fetcher(PrefixSource::new(
//!     vec!["Rust".to_string(), "Ruby".to_string(), "Go".to_string()],
//!     |name| name.clone(),
//! ));
//!
//! let session = languages.create(&ScriptedEngine::new());
//! field.type_text("ru");
//! session.on_input().await.unwrap();
//! assert_eq!(session.items().len(), 2);
//!
//! session.pick(0);
//! assert_eq!(field.value(), "Rust");
//!
//! // Editing away from the selection and leaving the field wipes it.
//! field.type_text("Rus");
//! field.blur();
//! assert_eq!(field.value(), "");
//! assert_eq!(languages.selected_item(), None);
//! # });
//! ```

pub mod cli;
pub mod config;
pub mod controller;
pub mod engine;
pub mod error;
pub mod field;
pub mod render;
pub mod source;

// Re-export commonly used types
pub use config::{AutocompleteConfig, Config};
pub use controller::{Autocompleter, Reconciliation, SelectionState};
pub use engine::{EngineOptions, ScriptedEngine, SuggestionBridge, SuggestionEngine};
pub use error::{Result, TypeaheadError};
pub use field::{InputField, MemoryField};
pub use render::Element;
pub use source::{ItemSource, PrefixSource};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get library version string
pub fn version() -> &'static str {
    VERSION
}
