//! Per-tag callbacks fired as elements complete.
use crate::Value;
use std::collections::HashMap;

/// What a listener wants the parser to do next.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Flow {
    /// Keep parsing
    #[default]
    Continue,

    /// Stop parsing. The value that triggered the listener is still assigned.
    Stop,
}
impl Flow {
    /// True for [`Flow::Stop`].
    #[must_use]
    pub fn is_stop(self) -> bool {
        self == Self::Stop
    }
}

type Callback<'l> = Box<dyn FnMut(&str, &Value) -> Flow + 'l>;

/// Tag name to callback; at most one callback per name.
#[derive(Default)]
pub(crate) struct Listeners<'l> {
    callbacks: HashMap<String, Callback<'l>>,
}
impl<'l> Listeners<'l> {
    /// Register `callback` for `tag`, replacing any earlier one.
    pub fn register<F>(&mut self, tag: impl Into<String>, callback: F)
    where
        F: FnMut(&str, &Value) -> Flow + 'l,
    {
        self.callbacks.insert(tag.into(), Box::new(callback));
    }

    /// Fire the callback for `tag`, if any. Without one, parsing continues.
    pub fn notify(&mut self, tag: &str, value: &Value) -> Flow {
        match self.callbacks.get_mut(tag) {
            Some(callback) => callback(tag, value),
            None => Flow::Continue,
        }
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.callbacks.len()
    }
}
impl std::fmt::Debug for Listeners<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_set().entries(self.callbacks.keys()).finish()
    }
}
