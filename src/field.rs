//! Bound input field abstraction.
//!
//! The controller never owns the text widget it decorates. It talks to it
//! through [`InputField`], a cheap cloneable handle in the style of a DOM
//! element reference: every method takes `&self` and mutation happens
//! behind the handle.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Attribute that toggles the platform's native suggestions.
pub const NATIVE_AUTOCOMPLETE_ATTR: &str = "autocomplete";

/// Attribute carrying the JSON form of the committed item.
pub const ITEM_DATA_ATTR: &str = "data-autocomplete-item";

/// Callback registered for the field's change notification.
pub type ChangeListener = Arc<dyn Fn() + Send + Sync>;

/// A single-line text input the controller can be bound to.
pub trait InputField: Clone + Send + Sync + 'static {
    /// Current raw text.
    fn value(&self) -> String;

    /// Replace the text. Must not emit a change notification.
    fn set_value(&self, value: &str);

    /// Read an auxiliary attribute.
    fn attribute(&self, name: &str) -> Option<String>;

    /// Set an auxiliary attribute.
    fn set_attribute(&self, name: &str, value: &str);

    /// Remove an auxiliary attribute, if present.
    fn remove_attribute(&self, name: &str);

    /// Register a listener for the change notification, which fires when
    /// the field loses focus after its text was modified.
    fn add_change_listener(&self, listener: ChangeListener);
}

#[derive(Default)]
struct FieldState {
    value: String,
    attributes: BTreeMap<String, String>,
    listeners: Vec<ChangeListener>,
    /// Modified since the last change notification
    dirty: bool,
}

/// Headless in-memory input field.
///
/// Useful for terminal hosts and tests. `type_text` models user edits and
/// `blur` models focus loss.
#[derive(Clone, Default)]
pub struct MemoryField {
    state: Arc<Mutex<FieldState>>,
}

impl MemoryField {
    /// Create an empty field
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, FieldState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Replace the text the way a user edit would.
    ///
    /// No notification is sent until the field is blurred.
    pub fn type_text(&self, text: &str) {
        let mut state = self.lock();
        if state.value != text {
            state.value = text.to_string();
            state.dirty = true;
        }
    }

    /// Lose focus. Fires the change listeners if the text was edited since
    /// the previous notification.
    ///
    /// # Returns
    /// * `bool` - True if a change notification was dispatched
    pub fn blur(&self) -> bool {
        let listeners = {
            let mut state = self.lock();
            if !state.dirty {
                return false;
            }
            state.dirty = false;
            state.listeners.clone()
        };

        for listener in listeners {
            listener();
        }
        true
    }

    /// Number of registered change listeners
    pub fn listener_count(&self) -> usize {
        self.lock().listeners.len()
    }
}

impl InputField for MemoryField {
    fn value(&self) -> String {
        self.lock().value.clone()
    }

    fn set_value(&self, value: &str) {
        self.lock().value = value.to_string();
    }

    fn attribute(&self, name: &str) -> Option<String> {
        self.lock().attributes.get(name).cloned()
    }

    fn set_attribute(&self, name: &str, value: &str) {
        self.lock()
            .attributes
            .insert(name.to_string(), value.to_string());
    }

    fn remove_attribute(&self, name: &str) {
        self.lock().attributes.remove(name);
    }

    fn add_change_listener(&self, listener: ChangeListener) {
        self.lock().listeners.push(listener);
    }
}

impl std::fmt::Debug for MemoryField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.lock();
        f.debug_struct("MemoryField")
            .field("value", &state.value)
            .field("attributes", &state.attributes)
            .field("listeners", &state.listeners.len())
            .finish()
    }
}
