//! Adapters handed to the suggestion engine.

use std::sync::Arc;

use futures::FutureExt;
use serde::Serialize;
use tracing::{debug, warn};

use super::Shared;
use crate::engine::{FetchFuture, SuggestionBridge, UpdateCallback};
use crate::error::{BoxError, ConfigError, Result};
use crate::field::{ITEM_DATA_ATTR, InputField};
use crate::render::Element;

/// Bridge between one engine session and the controller state
pub(super) struct SessionBridge<T, F> {
    pub(super) shared: Arc<Shared<T, F>>,
}

impl<T, F> SuggestionBridge<T> for SessionBridge<T, F>
where
    T: Clone + Serialize + Send + 'static,
    F: InputField,
{
    fn fetch(&self, text: &str, update: UpdateCallback<T>) -> Result<FetchFuture> {
        // Captured now; a later set_fetcher only affects later fetches.
        let source = self
            .shared
            .lock()
            .fetcher
            .clone()
            .ok_or(ConfigError::FetcherNotInstalled)?;

        debug!("Fetching suggestions for '{}'", text);
        let text = text.to_string();

        Ok(async move {
            let items = source.fetch(text).await?;
            update(items);
            Ok::<(), BoxError>(())
        }
        .boxed())
    }

    fn select(&self, item: T) {
        let (extractor, hooks) = {
            let mut inner = self.shared.lock();
            inner.selected = Some(item.clone());
            (inner.extractor.clone(), inner.select_hooks.clone())
        };

        let value = extractor(&item);
        let field = &self.shared.field;
        field.set_value(&value);

        match serde_json::to_string(&item) {
            Ok(json) => field.set_attribute(ITEM_DATA_ATTR, &json),
            Err(e) => {
                warn!("Failed to serialize selected item '{}': {}", value, e);
                field.remove_attribute(ITEM_DATA_ATTR);
            }
        }

        debug!("Committed selection '{}'", value);

        for hook in &hooks {
            hook(&item);
        }
    }

    fn render(&self, item: &T, current_value: &str) -> Element {
        let (extractor, hooks) = {
            let inner = self.shared.lock();
            (inner.extractor.clone(), inner.render_hooks.clone())
        };

        hooks
            .iter()
            .fold(Element::item(extractor(item)), |element, hook| {
                hook(element, item, current_value)
            })
    }
}
