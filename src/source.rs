//! Caller-supplied suggestion sources.

use std::future::Future;

use async_trait::async_trait;

use crate::error::BoxError;

/// Asynchronous producer of suggestion items for a query.
///
/// Any `Fn(String) -> impl Future<Output = Result<Vec<T>, BoxError>>`
/// closure is a source, so most callers never implement this by hand.
#[async_trait]
pub trait ItemSource<T>: Send + Sync {
    /// Fetch the items matching `text`
    async fn fetch(&self, text: String) -> Result<Vec<T>, BoxError>;
}

#[async_trait]
impl<T, F, Fut> ItemSource<T> for F
where
    T: Send + 'static,
    F: Fn(String) -> Fut + Send + Sync,
    Fut: Future<Output = Result<Vec<T>, BoxError>> + Send + 'static,
{
    async fn fetch(&self, text: String) -> Result<Vec<T>, BoxError> {
        self(text).await
    }
}

/// Source backed by a fixed list, matching on a case-insensitive prefix of
/// each entry's display text.
pub struct PrefixSource<T> {
    entries: Vec<T>,
    key: fn(&T) -> String,
}

impl<T> PrefixSource<T> {
    /// Create a source over `entries`, matched by the text `key` returns
    pub fn new(entries: Vec<T>, key: fn(&T) -> String) -> Self {
        Self { entries, key }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[async_trait]
impl<T> ItemSource<T> for PrefixSource<T>
where
    T: Clone + Send + Sync + 'static,
{
    async fn fetch(&self, text: String) -> Result<Vec<T>, BoxError> {
        let needle = text.to_lowercase();
        Ok(self
            .entries
            .iter()
            .filter(|entry| (self.key)(entry).to_lowercase().starts_with(&needle))
            .cloned()
            .collect())
    }
}
