//! The capability set the page layer needs from its environment.
//!
//! SYSTEM CONTEXT
//! ==============
//! In a browser the host is backed by `window`/`document`/`localStorage`
//! (see `browser`, behind the `browser` feature). Tests use
//! [`MemoryHost`](crate::memory::MemoryHost), which keeps an in-memory tree
//! and a virtual clock. The page layer only ever talks to this trait.

#[cfg(test)]
#[path = "host_test.rs"]
mod host_test;

use std::time::Duration;

use crate::error::PageError;
use crate::events::{Listener, Task, TaskHandle};
use crate::markup::{ElementSpec, NodeId, Parent, Patch};

pub trait Host {
    // --- Platform reads ---

    /// Current wall-clock hour, `0..24`.
    fn current_hour(&self) -> u32;

    /// Viewport width in CSS pixels.
    fn viewport_width(&self) -> f64;

    /// Vertical scroll offset in CSS pixels.
    fn scroll_y(&self) -> f64;

    /// Resolved value of a custom property on the document element.
    fn custom_property(&self, name: &str) -> Option<String>;

    /// Whether the document has already finished parsing.
    fn content_loaded(&self) -> bool;

    // --- Element lookup ---

    /// The page root (`<body>`).
    ///
    /// # Errors
    ///
    /// Returns [`PageError::MissingElement`] if the document has no body.
    fn root(&mut self) -> Result<NodeId, PageError>;

    /// First element matching `selector`.
    fn query(&mut self, selector: &str) -> Option<NodeId>;

    /// All elements matching `selector`, in document order.
    fn query_all(&mut self, selector: &str) -> Vec<NodeId>;

    /// First descendant of `scope` matching `selector`.
    fn query_within(&mut self, scope: NodeId, selector: &str) -> Option<NodeId>;

    fn text(&self, node: NodeId) -> Option<String>;

    fn attribute(&self, node: NodeId, name: &str) -> Option<String>;

    // --- Mutation ---

    /// Create an element from `spec` and attach it under `parent`.
    ///
    /// # Errors
    ///
    /// Returns an error if the parent is unknown or the DOM rejects the element.
    fn create(&mut self, parent: Parent, spec: &ElementSpec) -> Result<NodeId, PageError>;

    /// Apply a patch to an existing element.
    ///
    /// # Errors
    ///
    /// Returns [`PageError::UnknownNode`] for stale handles, or
    /// [`PageError::Dom`] if the DOM rejects the change.
    fn apply(&mut self, patch: Patch) -> Result<(), PageError>;

    // --- Events / time ---

    /// Register a listener; the host delivers `listener.event` when it fires.
    ///
    /// # Errors
    ///
    /// Returns an error if the target cannot accept listeners.
    fn subscribe(&mut self, listener: Listener) -> Result<(), PageError>;

    /// Run `task` once after `delay`.
    fn schedule(&mut self, delay: Duration, task: Task) -> TaskHandle;

    /// Cancel a pending task. Returns `false` if it already ran or never existed.
    fn cancel(&mut self, handle: TaskHandle) -> bool;

    /// Request a smooth animated scroll to the top of the page.
    fn scroll_to_top(&mut self);

    // --- Persistent store ---

    /// # Errors
    ///
    /// Returns [`PageError::Storage`] if the store is unavailable.
    fn storage_get(&self, key: &str) -> Result<Option<String>, PageError>;

    /// # Errors
    ///
    /// Returns [`PageError::Storage`] if the store is unavailable or full.
    fn storage_set(&mut self, key: &str, value: &str) -> Result<(), PageError>;
}

/// Interpret a DOM `document.readyState` string. Parsing is finished once
/// the document leaves `"loading"` (`"interactive"` or `"complete"`).
#[must_use]
pub fn document_parsed(ready_state: &str) -> bool {
    ready_state != "loading"
}
