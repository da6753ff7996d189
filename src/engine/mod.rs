//! Interface to the external suggestion engine.
//!
//! The engine owns the popup, keyboard navigation and positioning. The
//! controller only configures it and hands over a [`SuggestionBridge`]
//! with three capabilities:
//!
//! - **fetch**: turn query text into items, reporting them through an
//!   update callback once the caller's fetcher settles
//! - **select**: commit an item the user picked
//! - **render**: build the visual container for one item
//!
//! Any type implementing [`SuggestionEngine`] can be plugged in.
//! [`ScriptedEngine`] is a small reference engine used by the demo binary
//! and by tests.

mod scripted;

pub use scripted::{QueryOutcome, ScriptedEngine, ScriptedSession};

use std::sync::Arc;
use std::time::Duration;

use futures::future::BoxFuture;

use crate::error::{BoxError, Result};
use crate::field::InputField;
use crate::render::Element;

/// Receives the items of one settled fetch.
pub type UpdateCallback<T> = Box<dyn FnOnce(Vec<T>) + Send>;

/// Deferred part of a fetch. Resolves once the caller's fetcher settles.
/// A fetcher failure comes back as-is.
pub type FetchFuture = BoxFuture<'static, std::result::Result<(), BoxError>>;

/// Adapter functions the controller exposes to the engine.
pub trait SuggestionBridge<T>: Send + Sync {
    /// Start a fetch for `text`.
    ///
    /// Fails synchronously when no fetcher is installed; nothing is
    /// scheduled in that case.
    ///
    /// The fetcher captured here runs when the returned future is first
    /// polled. The engine must drive it to completion; dropping it unpolled
    /// means the fetcher is never called and `update` never fires.
    fn fetch(&self, text: &str, update: UpdateCallback<T>) -> Result<FetchFuture>;

    /// Commit the item the user picked.
    fn select(&self, item: T);

    /// Build the element displayed for `item` while the input reads
    /// `current_value`.
    fn render(&self, item: &T, current_value: &str) -> Element;
}

/// Configuration record an engine session is created with.
#[derive(Debug, Clone)]
pub struct EngineOptions<F> {
    /// Bound input field
    pub field: F,
    /// Message shown when a fetch yields no items
    pub empty_msg: String,
    /// Minimum input length before fetching
    pub min_length: usize,
    /// Class name of the suggestion container
    pub class_name: String,
    /// Delay applied before fetching, None for immediate
    pub debounce_wait: Option<Duration>,
    /// Swallow form submission when an item is picked with Enter
    pub prevent_submit: bool,
    /// Do not pre-select the first suggestion
    pub disable_auto_select: bool,
}

/// An engine able to open a suggestion session over a field.
pub trait SuggestionEngine<T, F: InputField> {
    /// Handle to the created session
    type Session;

    /// Open a session. Teardown of the returned session, if any, is the
    /// caller's business.
    fn create(
        &self,
        options: EngineOptions<F>,
        bridge: Arc<dyn SuggestionBridge<T>>,
    ) -> Self::Session;
}
