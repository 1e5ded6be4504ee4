//! Typed view over a live query

use super::{LiveQuery, QueryRequest, Subscription};
use crate::database::models::Model;

/// Current value of a live query, decoded into model `T`.
#[derive(Debug)]
pub struct DataBinding<T> {
    value: Vec<T>,
    loaded: bool,
    error: Option<String>,
    subscription: Subscription,
}

impl<T: Model> DataBinding<T> {
    pub fn new(live: &dyn LiveQuery, request: QueryRequest) -> Self {
        let value = T::from_rows(&request.initial);
        Self {
            value,
            loaded: false,
            error: None,
            subscription: live.subscribe(request),
        }
    }

    /// Applies every pending result set. Returns whether anything changed.
    pub fn poll(&mut self) -> bool {
        let mut changed = false;
        while let Some(update) = self.subscription.try_next() {
            changed = true;
            match update {
                Ok(rows) => {
                    self.value = T::from_rows(&rows);
                    self.loaded = true;
                    self.error = None;
                }
                Err(e) => {
                    log::warn!("Live query on {} failed: {}", T::TABLE, e);
                    self.error = Some(e.to_string());
                }
            }
        }
        changed
    }

    pub fn value(&self) -> &[T] {
        &self.value
    }

    pub fn is_loading(&self) -> bool {
        !self.loaded && self.error.is_none()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}
