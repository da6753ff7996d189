//! Reference engine driven by explicit calls instead of UI events.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::{debug, warn};

use super::{EngineOptions, SuggestionBridge, SuggestionEngine};
use crate::error::BoxError;
use crate::field::InputField;
use crate::render::Element;

/// Engine whose sessions are driven by [`ScriptedSession::query`] and
/// [`ScriptedSession::pick`].
///
/// It honours `min_length` and the debounce interval but implements no
/// navigation or positioning. Overlapping queries are not superseded:
/// whichever fetch settles last owns the list.
#[derive(Debug, Default, Clone, Copy)]
pub struct ScriptedEngine;

impl ScriptedEngine {
    pub fn new() -> Self {
        Self
    }
}

impl<T, F> SuggestionEngine<T, F> for ScriptedEngine
where
    T: Clone + Send + 'static,
    F: InputField,
{
    type Session = ScriptedSession<T, F>;

    fn create(
        &self,
        options: EngineOptions<F>,
        bridge: Arc<dyn SuggestionBridge<T>>,
    ) -> Self::Session {
        ScriptedSession {
            options,
            bridge,
            list: Arc::new(Mutex::new(SuggestionList::default())),
        }
    }
}

/// Result of a single query
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryOutcome {
    /// Input shorter than `min_length`; nothing fetched
    TooShort,
    /// Fetch settled with no items; carries the empty message
    Empty(String),
    /// Fetch settled and this many items were rendered
    Rendered(usize),
}

struct SuggestionList<T> {
    items: Vec<T>,
    rendered: Vec<Element>,
}

impl<T> Default for SuggestionList<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            rendered: Vec::new(),
        }
    }
}

impl<T> SuggestionList<T> {
    fn clear(&mut self) {
        self.items.clear();
        self.rendered.clear();
    }
}

/// Session opened by [`ScriptedEngine`]
pub struct ScriptedSession<T, F> {
    options: EngineOptions<F>,
    bridge: Arc<dyn SuggestionBridge<T>>,
    list: Arc<Mutex<SuggestionList<T>>>,
}

impl<T, F> ScriptedSession<T, F>
where
    T: Clone + Send + 'static,
    F: InputField,
{
    fn list(&self) -> MutexGuard<'_, SuggestionList<T>> {
        self.list.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Options the session was created with
    pub fn options(&self) -> &EngineOptions<F> {
        &self.options
    }

    /// Query with the field's current text, as an input event would
    pub async fn on_input(&self) -> Result<QueryOutcome, BoxError> {
        let text = self.options.field.value();
        self.query(&text).await
    }

    /// Run one suggestion round for `text`.
    ///
    /// # Returns
    /// * `Ok(QueryOutcome)` - What the popup now shows
    /// * `Err(BoxError)` - Missing fetcher or the fetcher's own failure
    pub async fn query(&self, text: &str) -> Result<QueryOutcome, BoxError> {
        if text.chars().count() < self.options.min_length {
            debug!(
                "Query '{}' below minimum length {}",
                text, self.options.min_length
            );
            self.list().clear();
            return Ok(QueryOutcome::TooShort);
        }

        if let Some(wait) = self.options.debounce_wait {
            tokio::time::sleep(wait).await;
        }

        let list = Arc::clone(&self.list);
        let bridge = Arc::clone(&self.bridge);
        let current_value = text.to_string();
        let update = Box::new(move |items: Vec<T>| {
            let rendered = items
                .iter()
                .map(|item| bridge.render(item, &current_value))
                .collect();
            let mut list = list.lock().unwrap_or_else(PoisonError::into_inner);
            list.items = items;
            list.rendered = rendered;
        });

        let pending = self.bridge.fetch(text, update)?;
        if let Err(e) = pending.await {
            warn!("Fetch for '{}' failed: {}", text, e);
            return Err(e);
        }

        let count = self.list().items.len();
        if count == 0 {
            Ok(QueryOutcome::Empty(self.options.empty_msg.clone()))
        } else {
            Ok(QueryOutcome::Rendered(count))
        }
    }

    /// Pick the suggestion at `index` and close the list.
    ///
    /// # Returns
    /// * `bool` - False if no suggestion exists at `index`
    pub fn pick(&self, index: usize) -> bool {
        let item = {
            let mut list = self.list();
            match list.items.get(index).cloned() {
                Some(item) => {
                    list.clear();
                    item
                }
                None => return false,
            }
        };

        self.bridge.select(item);
        true
    }

    /// Items of the currently shown list
    pub fn items(&self) -> Vec<T> {
        self.list().items.clone()
    }

    /// Elements of the currently shown list
    pub fn rendered(&self) -> Vec<Element> {
        self.list().rendered.clone()
    }
}
