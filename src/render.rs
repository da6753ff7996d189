//! Visual container produced for each suggestion.

use std::collections::BTreeMap;

/// Class attached to every default suggestion container.
pub const DEFAULT_ITEM_CLASS: &str = "ac-item";

/// A minimal element tree node handed to the suggestion engine for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    /// Tag name, `div` for default containers
    pub tag: String,
    /// Text content
    pub text: String,
    /// Class list in insertion order, without duplicates
    pub classes: Vec<String>,
    /// Extra attributes
    pub attributes: BTreeMap<String, String>,
}

impl Element {
    /// Create an empty element with the given tag
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            text: String::new(),
            classes: Vec::new(),
            attributes: BTreeMap::new(),
        }
    }

    /// Default container for a suggestion: a `div` showing `text`, tagged
    /// with [`DEFAULT_ITEM_CLASS`].
    pub fn item(text: impl Into<String>) -> Self {
        let mut element = Self::new("div");
        element.text = text.into();
        element.add_class(DEFAULT_ITEM_CLASS);
        element
    }

    /// Add a class unless already present
    pub fn add_class(&mut self, class: &str) {
        if !self.has_class(class) {
            self.classes.push(class.to_string());
        }
    }

    /// Check for a class
    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    pub fn set_attribute(&mut self, name: &str, value: &str) {
        self.attributes.insert(name.to_string(), value.to_string());
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }
}
