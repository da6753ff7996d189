//! Typeahead controller
//!
//! [`Autocompleter`] binds one input field to an asynchronous item source
//! and keeps track of the item the user last picked. Configuration is
//! accumulated through chained setters, then [`Autocompleter::create`]
//! opens a session on a [`SuggestionEngine`].
//!
//! When the field reports a change, the controller compares its text with
//! the selected item's canonical text. Under strict-value mode a mismatch
//! wipes both the selection and the field.
//!
//! # Example
//!
//! ```
//! use typeahead::{Autocompleter, InputField, MemoryField, ScriptedEngine};
//! use typeahead::error::BoxError;
//!
//! # tokio_test::block_on(async {
//! let field = MemoryField::new();
//! let cities = Autocompleter::new(field.clone(), |city: &String| city.clone());
//! cities
//!     .set_min_length(1)
//!     .set_debounce_wait_ms(None)
//!     .set_fetcher(|text: String| async move {
//!         Ok::<_, BoxError>(vec![format!("{text}ville")])
//!     });
//!
//! let session = cities.create(&ScriptedEngine::new());
//! session.query("Nash").await.unwrap();
//! session.pick(0);
//!
//! assert_eq!(field.value(), "Nashville");
//! assert_eq!(cities.selected_item().as_deref(), Some("Nashville"));
//! # });
//! ```

mod bridge;
mod state;

#[cfg(test)]
mod tests;

pub use state::{Reconciliation, SelectionState};

use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use serde::Serialize;
use tracing::{debug, info};

use crate::config::AutocompleteConfig;
use crate::engine::{EngineOptions, SuggestionEngine};
use crate::field::{ITEM_DATA_ATTR, InputField, NATIVE_AUTOCOMPLETE_ATTR};
use crate::render::Element;
use crate::source::ItemSource;

use bridge::SessionBridge;

/// Maps an item to its canonical display text
pub type ValueExtractor<T> = Arc<dyn Fn(&T) -> String + Send + Sync>;

/// Transforms the element rendered for an item; receives the previous
/// hook's output, the item and the current query text
pub type RenderHook<T> = Arc<dyn Fn(Element, &T, &str) -> Element + Send + Sync>;

/// Observes a committed selection
pub type SelectHook<T> = Arc<dyn Fn(&T) + Send + Sync>;

struct Inner<T> {
    settings: AutocompleteConfig,
    fetcher: Option<Arc<dyn ItemSource<T>>>,
    extractor: ValueExtractor<T>,
    render_hooks: Vec<RenderHook<T>>,
    select_hooks: Vec<SelectHook<T>>,
    selected: Option<T>,
}

struct Shared<T, F> {
    field: F,
    inner: Mutex<Inner<T>>,
}

impl<T, F> Shared<T, F> {
    fn lock(&self) -> MutexGuard<'_, Inner<T>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Typeahead controller for a single input field.
///
/// Cloning yields another handle to the same controller.
pub struct Autocompleter<T, F> {
    shared: Arc<Shared<T, F>>,
}

impl<T, F> Clone for Autocompleter<T, F> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<T, F> Autocompleter<T, F>
where
    T: Clone + Serialize + Send + 'static,
    F: InputField,
{
    /// Bind a controller to `field` with default settings.
    ///
    /// # Arguments
    /// * `field` - Input field to decorate
    /// * `extractor` - Canonical display text of an item
    pub fn new<E>(field: F, extractor: E) -> Self
    where
        E: Fn(&T) -> String + Send + Sync + 'static,
    {
        Self::with_config(field, extractor, &AutocompleteConfig::default())
    }

    /// Bind a controller to `field`, seeding its settings from `config`.
    ///
    /// Native suggestions are switched off on the field and the change
    /// handler is registered with it.
    pub fn with_config<E>(field: F, extractor: E, config: &AutocompleteConfig) -> Self
    where
        E: Fn(&T) -> String + Send + Sync + 'static,
    {
        let shared = Arc::new(Shared {
            field: field.clone(),
            inner: Mutex::new(Inner {
                settings: config.clone(),
                fetcher: None,
                extractor: Arc::new(extractor),
                render_hooks: Vec::new(),
                select_hooks: Vec::new(),
                selected: None,
            }),
        });

        field.set_attribute(NATIVE_AUTOCOMPLETE_ATTR, "off");

        // Weak, otherwise field -> listener -> controller -> field is a cycle.
        let weak: Weak<Shared<T, F>> = Arc::downgrade(&shared);
        field.add_change_listener(Arc::new(move || {
            if let Some(shared) = weak.upgrade() {
                Autocompleter { shared }.handle_change();
            }
        }));

        Self { shared }
    }

    pub fn set_class_name(&self, class_name: impl Into<String>) -> &Self {
        self.shared.lock().settings.class_name = class_name.into();
        self
    }

    pub fn set_min_length(&self, min_length: usize) -> &Self {
        self.shared.lock().settings.min_length = min_length;
        self
    }

    pub fn set_empty_msg(&self, empty_msg: impl Into<String>) -> &Self {
        self.shared.lock().settings.empty_msg = empty_msg.into();
        self
    }

    /// Set the engine's debounce interval; `None` disables debouncing
    pub fn set_debounce_wait_ms(&self, debounce_wait_ms: Option<u64>) -> &Self {
        self.shared.lock().settings.debounce_wait_ms = debounce_wait_ms;
        self
    }

    /// Toggle strict-value enforcement
    pub fn set_strict_value(&self, strict_value: bool) -> &Self {
        self.shared.lock().settings.strict_value = strict_value;
        self
    }

    /// Install the item source, replacing any previous one
    pub fn set_fetcher<S>(&self, fetcher: S) -> &Self
    where
        S: ItemSource<T> + 'static,
    {
        self.shared.lock().fetcher = Some(Arc::new(fetcher));
        self
    }

    /// Replace the value extractor
    pub fn set_value_extractor<E>(&self, extractor: E) -> &Self
    where
        E: Fn(&T) -> String + Send + Sync + 'static,
    {
        self.shared.lock().extractor = Arc::new(extractor);
        self
    }

    /// Append a render hook. Hooks run in registration order.
    pub fn on_render<H>(&self, hook: H) -> &Self
    where
        H: Fn(Element, &T, &str) -> Element + Send + Sync + 'static,
    {
        self.shared.lock().render_hooks.push(Arc::new(hook));
        self
    }

    /// Append a select hook. Hooks run in registration order, after the
    /// selection is committed.
    pub fn on_select<H>(&self, hook: H) -> &Self
    where
        H: Fn(&T) + Send + Sync + 'static,
    {
        self.shared.lock().select_hooks.push(Arc::new(hook));
        self
    }

    /// Snapshot of the current settings
    pub fn config(&self) -> AutocompleteConfig {
        self.shared.lock().settings.clone()
    }

    /// The bound field
    pub fn field(&self) -> &F {
        &self.shared.field
    }

    /// The last item the user picked, if any
    pub fn selected_item(&self) -> Option<T> {
        self.shared.lock().selected.clone()
    }

    /// Where the controller stands relative to the field text right now
    pub fn selection_state(&self) -> SelectionState {
        let expected = self.expected_value();
        let actual = self.shared.field.value();
        SelectionState::classify(expected.as_deref(), &actual)
    }

    /// Clear the selection, the field text and the item attribute
    pub fn reset(&self) {
        self.shared.lock().selected = None;

        let field = &self.shared.field;
        field.set_value("");
        field.remove_attribute(ITEM_DATA_ATTR);

        debug!("Selection reset");
    }

    /// Change-notification handler.
    ///
    /// Registered on the field at construction; exposed for hosts that
    /// dispatch field events themselves.
    pub fn handle_change(&self) -> Reconciliation {
        let expected = self.expected_value().unwrap_or_default();
        let strict_value = self.shared.lock().settings.strict_value;
        let actual = self.shared.field.value();

        let decision = Reconciliation::decide(&expected, &actual, strict_value);
        match decision {
            Reconciliation::Consistent => {}
            Reconciliation::Reset => {
                debug!("Field text '{}' diverged from '{}', resetting", actual, expected);
                self.reset();
            }
            Reconciliation::Tolerated => {
                debug!(
                    "Field text '{}' diverged from '{}', strict mode off",
                    actual, expected
                );
            }
        }
        decision
    }

    /// Open a suggestion session on `engine` with the current settings.
    ///
    /// Meant to be called once; a second call opens a second, independent
    /// session on the same field.
    pub fn create<E>(&self, engine: &E) -> E::Session
    where
        E: SuggestionEngine<T, F>,
    {
        let settings = self.config();
        let options = EngineOptions {
            field: self.shared.field.clone(),
            empty_msg: settings.empty_msg.clone(),
            min_length: settings.min_length,
            class_name: settings.class_name.clone(),
            debounce_wait: settings.debounce_wait(),
            prevent_submit: true,
            disable_auto_select: true,
        };

        info!(
            "Creating suggestion session (min_length={}, debounce={:?})",
            options.min_length, options.debounce_wait
        );

        let bridge = Arc::new(SessionBridge {
            shared: Arc::clone(&self.shared),
        });
        engine.create(options, bridge)
    }

    /// Canonical text of the selected item. The extractor runs with no lock
    /// held.
    fn expected_value(&self) -> Option<String> {
        let (selected, extractor) = {
            let inner = self.shared.lock();
            (inner.selected.clone(), inner.extractor.clone())
        };
        selected.map(|item| extractor(&item))
    }
}
