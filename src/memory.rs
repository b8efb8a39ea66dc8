//! In-memory [`Host`] with a virtual clock.
//!
//! Holds a small element tree (`<html>` → `<head>`, `<body>`), a key-value
//! store, recorded listeners and pending timers. Nothing happens on its own:
//! clicks, scrolls, document load and the passage of time are driven
//! explicitly, which makes the page layer's timing exactly assertable.
//!
//! Selector support covers what page markup typically needs: tag, `.class`,
//! `#id`, compounds of those (`a.nav-link`) and the descendant combinator
//! (`.content h1`).

#[cfg(test)]
#[path = "memory_test.rs"]
mod memory_test;

use std::collections::BTreeMap;
use std::time::Duration;

use crate::error::PageError;
use crate::events::{EventKind, EventTarget, Listener, PageEvent, Task, TaskHandle};
use crate::host::Host;
use crate::markup::{ElementSpec, NodeId, Parent, Patch};
use crate::session::Session;

#[derive(Debug, Clone, Default)]
struct MemNode {
    tag: String,
    classes: Vec<String>,
    attributes: BTreeMap<String, String>,
    text: String,
    style: BTreeMap<String, String>,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

#[derive(Debug, Clone, Copy)]
struct Timer {
    handle: TaskHandle,
    due: Duration,
    task: Task,
}

#[derive(Debug, Default)]
struct Compound {
    tag: Option<String>,
    id: Option<String>,
    classes: Vec<String>,
}

pub struct MemoryHost {
    nodes: Vec<Option<MemNode>>,
    document_element: NodeId,
    head: NodeId,
    body: NodeId,
    hour: u32,
    viewport_width: f64,
    scroll_y: f64,
    custom_properties: BTreeMap<String, String>,
    content_loaded: bool,
    storage: BTreeMap<String, String>,
    storage_writable: bool,
    listeners: Vec<Listener>,
    now: Duration,
    next_handle: u64,
    timers: Vec<Timer>,
    smooth_scroll_requests: usize,
    prevented_defaults: usize,
}

impl Default for MemoryHost {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryHost {
    /// Empty document at 09:00 on a 1024px-wide viewport, still loading.
    #[must_use]
    pub fn new() -> Self {
        let mut host = Self {
            nodes: Vec::new(),
            document_element: NodeId(0),
            head: NodeId(0),
            body: NodeId(0),
            hour: 9,
            viewport_width: 1024.0,
            scroll_y: 0.0,
            custom_properties: BTreeMap::new(),
            content_loaded: false,
            storage: BTreeMap::new(),
            storage_writable: true,
            listeners: Vec::new(),
            now: Duration::ZERO,
            next_handle: 1,
            timers: Vec::new(),
            smooth_scroll_requests: 0,
            prevented_defaults: 0,
        };
        host.document_element = host.alloc(MemNode { tag: "html".to_owned(), ..MemNode::default() });
        host.head = host.append(host.document_element, "head", &[]);
        host.body = host.append(host.document_element, "body", &[]);
        host
    }

    // --- Fixture building ---

    #[must_use]
    pub fn with_hour(mut self, hour: u32) -> Self {
        self.hour = hour;
        self
    }

    #[must_use]
    pub fn with_viewport_width(mut self, width: f64) -> Self {
        self.viewport_width = width;
        self
    }

    #[must_use]
    pub fn with_custom_property(mut self, name: &str, value: &str) -> Self {
        self.custom_properties.insert(name.to_owned(), value.to_owned());
        self
    }

    #[must_use]
    pub fn with_stored(mut self, key: &str, value: &str) -> Self {
        self.storage.insert(key.to_owned(), value.to_owned());
        self
    }

    /// Mark the document as already parsed before setup runs.
    #[must_use]
    pub fn already_loaded(mut self) -> Self {
        self.content_loaded = true;
        self
    }

    /// Make every subsequent storage write fail.
    pub fn set_storage_writable(&mut self, writable: bool) {
        self.storage_writable = writable;
    }

    /// Append a bare element under `parent` with the given classes.
    pub fn append(&mut self, parent: NodeId, tag: &str, classes: &[&str]) -> NodeId {
        let node = MemNode {
            tag: tag.to_owned(),
            classes: classes.iter().map(|c| (*c).to_owned()).collect(),
            parent: Some(parent),
            ..MemNode::default()
        };
        let id = self.alloc(node);
        if let Some(p) = self.node_mut(parent) {
            p.children.push(id);
        }
        id
    }

    /// Append an element carrying text.
    pub fn append_text(&mut self, parent: NodeId, tag: &str, classes: &[&str], text: &str) -> NodeId {
        let id = self.append(parent, tag, classes);
        if let Some(node) = self.node_mut(id) {
            node.text = text.to_owned();
        }
        id
    }

    /// Replace an element's own text, keeping its children.
    pub fn set_text(&mut self, node: NodeId, text: &str) {
        if let Some(n) = self.node_mut(node) {
            n.text = text.to_owned();
        }
    }

    #[must_use]
    pub fn body(&self) -> NodeId {
        self.body
    }

    #[must_use]
    pub fn head(&self) -> NodeId {
        self.head
    }

    // --- Driving ---

    /// Click `node`; listeners on the node and its ancestors fire in bubbling order.
    pub fn click(&mut self, node: NodeId) -> Vec<PageEvent> {
        let mut path = vec![node];
        let mut cursor = self.parent_of(node);
        while let Some(ancestor) = cursor {
            path.push(ancestor);
            cursor = self.parent_of(ancestor);
        }
        path.into_iter().flat_map(|n| self.fire(EventTarget::Node(n), EventKind::Click)).collect()
    }

    /// Move the viewport to `offset` and fire the window scroll listeners.
    pub fn scroll(&mut self, offset: f64) -> Vec<PageEvent> {
        self.scroll_y = offset;
        self.fire(EventTarget::Window, EventKind::Scroll)
    }

    /// Finish parsing and fire the document's content-loaded listeners.
    pub fn finish_loading(&mut self) -> Vec<PageEvent> {
        self.content_loaded = true;
        self.fire(EventTarget::Document, EventKind::ContentLoaded)
    }

    /// Fire `kind` on exactly `target`, without bubbling.
    pub fn fire(&mut self, target: EventTarget, kind: EventKind) -> Vec<PageEvent> {
        let matching: Vec<Listener> =
            self.listeners.iter().filter(|l| l.target == target && l.kind == kind).copied().collect();
        self.prevented_defaults += matching.iter().filter(|l| l.prevent_default).count();
        matching.into_iter().map(|l| l.event).collect()
    }

    /// Advance the virtual clock; returns the tasks that came due, earliest first.
    pub fn advance(&mut self, by: Duration) -> Vec<PageEvent> {
        self.now += by;
        let now = self.now;
        let mut due: Vec<Timer> = self.timers.iter().filter(|t| t.due <= now).copied().collect();
        self.timers.retain(|t| t.due > now);
        due.sort_by_key(|t| (t.due, t.handle));
        due.into_iter().map(|t| PageEvent::TaskDue(t.task)).collect()
    }

    // --- Inspection ---

    #[must_use]
    pub fn now(&self) -> Duration {
        self.now
    }

    #[must_use]
    pub fn pending_tasks(&self) -> usize {
        self.timers.len()
    }

    #[must_use]
    pub fn listeners(&self) -> &[Listener] {
        &self.listeners
    }

    #[must_use]
    pub fn smooth_scroll_requests(&self) -> usize {
        self.smooth_scroll_requests
    }

    #[must_use]
    pub fn prevented_defaults(&self) -> usize {
        self.prevented_defaults
    }

    #[must_use]
    pub fn stored(&self, key: &str) -> Option<&str> {
        self.storage.get(key).map(String::as_str)
    }

    #[must_use]
    pub fn exists(&self, node: NodeId) -> bool {
        self.node(node).is_some()
    }

    #[must_use]
    pub fn tag(&self, node: NodeId) -> Option<&str> {
        self.node(node).map(|n| n.tag.as_str())
    }

    #[must_use]
    pub fn has_class(&self, node: NodeId, class: &str) -> bool {
        self.node(node).is_some_and(|n| n.classes.iter().any(|c| c == class))
    }

    #[must_use]
    pub fn style(&self, node: NodeId, property: &str) -> Option<&str> {
        self.node(node).and_then(|n| n.style.get(property)).map(String::as_str)
    }

    #[must_use]
    pub fn children(&self, node: NodeId) -> Vec<NodeId> {
        self.node(node).map(|n| n.children.clone()).unwrap_or_default()
    }

    /// First attached element matching `selector`.
    #[must_use]
    pub fn select(&self, selector: &str) -> Option<NodeId> {
        self.select_all(selector).into_iter().next()
    }

    /// All attached elements matching `selector`, in document order.
    #[must_use]
    pub fn select_all(&self, selector: &str) -> Vec<NodeId> {
        self.select_within(self.document_element, selector)
    }

    fn select_within(&self, scope: NodeId, selector: &str) -> Vec<NodeId> {
        let parts = parse_selector(selector);
        if parts.is_empty() {
            return Vec::new();
        }
        self.descendants(scope).into_iter().filter(|id| self.matches(*id, &parts)).collect()
    }

    // --- Internals ---

    fn alloc(&mut self, node: MemNode) -> NodeId {
        let id = NodeId(u32::try_from(self.nodes.len()).unwrap_or(u32::MAX));
        self.nodes.push(Some(node));
        id
    }

    fn node(&self, id: NodeId) -> Option<&MemNode> {
        self.nodes.get(id.0 as usize).and_then(Option::as_ref)
    }

    fn node_mut(&mut self, id: NodeId) -> Option<&mut MemNode> {
        self.nodes.get_mut(id.0 as usize).and_then(Option::as_mut)
    }

    fn require(&mut self, id: NodeId) -> Result<&mut MemNode, PageError> {
        self.node_mut(id).ok_or(PageError::UnknownNode(id))
    }

    fn parent_of(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).and_then(|n| n.parent)
    }

    /// Strict descendants of `scope` in document order.
    fn descendants(&self, scope: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.children(scope).into_iter().rev().collect();
        while let Some(id) = stack.pop() {
            out.push(id);
            stack.extend(self.children(id).into_iter().rev());
        }
        out
    }

    fn text_of(&self, id: NodeId) -> String {
        let Some(node) = self.node(id) else {
            return String::new();
        };
        let mut text = node.text.clone();
        for child in &node.children {
            text.push_str(&self.text_of(*child));
        }
        text
    }

    fn matches(&self, id: NodeId, parts: &[Compound]) -> bool {
        let Some((last, rest)) = parts.split_last() else {
            return false;
        };
        if !self.matches_compound(id, last) {
            return false;
        }
        let mut remaining = rest;
        let mut cursor = self.parent_of(id);
        while let Some((want, earlier)) = remaining.split_last() {
            loop {
                let Some(ancestor) = cursor else {
                    return false;
                };
                cursor = self.parent_of(ancestor);
                if self.matches_compound(ancestor, want) {
                    break;
                }
            }
            remaining = earlier;
        }
        true
    }

    fn matches_compound(&self, id: NodeId, compound: &Compound) -> bool {
        let Some(node) = self.node(id) else {
            return false;
        };
        if compound.tag.as_ref().is_some_and(|t| !t.eq_ignore_ascii_case(&node.tag)) {
            return false;
        }
        if compound.id.as_ref().is_some_and(|want| node.attributes.get("id") != Some(want)) {
            return false;
        }
        compound.classes.iter().all(|c| node.classes.contains(c))
    }

    fn detach(&mut self, id: NodeId) {
        if let Some(parent) = self.parent_of(id) {
            if let Some(p) = self.node_mut(parent) {
                p.children.retain(|c| *c != id);
            }
        }
        for child in self.descendants(id) {
            if let Some(slot) = self.nodes.get_mut(child.0 as usize) {
                *slot = None;
            }
        }
        if let Some(slot) = self.nodes.get_mut(id.0 as usize) {
            *slot = None;
        }
    }
}

fn parse_selector(selector: &str) -> Vec<Compound> {
    selector.split_whitespace().map(parse_compound).collect()
}

fn parse_compound(raw: &str) -> Compound {
    fn flush(compound: &mut Compound, kind: char, buf: &mut String) {
        if buf.is_empty() {
            return;
        }
        let value = std::mem::take(buf);
        match kind {
            '.' => compound.classes.push(value),
            '#' => compound.id = Some(value),
            _ => compound.tag = Some(value),
        }
    }

    let mut compound = Compound::default();
    let mut kind = ' ';
    let mut buf = String::new();
    for ch in raw.chars() {
        if ch == '.' || ch == '#' {
            flush(&mut compound, kind, &mut buf);
            kind = ch;
        } else {
            buf.push(ch);
        }
    }
    flush(&mut compound, kind, &mut buf);
    compound
}

impl Host for MemoryHost {
    fn current_hour(&self) -> u32 {
        self.hour
    }

    fn viewport_width(&self) -> f64 {
        self.viewport_width
    }

    fn scroll_y(&self) -> f64 {
        self.scroll_y
    }

    fn custom_property(&self, name: &str) -> Option<String> {
        self.custom_properties.get(name).cloned()
    }

    fn content_loaded(&self) -> bool {
        self.content_loaded
    }

    fn root(&mut self) -> Result<NodeId, PageError> {
        Ok(self.body)
    }

    fn query(&mut self, selector: &str) -> Option<NodeId> {
        self.select(selector)
    }

    fn query_all(&mut self, selector: &str) -> Vec<NodeId> {
        self.select_all(selector)
    }

    fn query_within(&mut self, scope: NodeId, selector: &str) -> Option<NodeId> {
        self.select_within(scope, selector).into_iter().next()
    }

    fn text(&self, node: NodeId) -> Option<String> {
        self.node(node).map(|_| self.text_of(node))
    }

    fn attribute(&self, node: NodeId, name: &str) -> Option<String> {
        self.node(node).and_then(|n| n.attributes.get(name)).cloned()
    }

    fn create(&mut self, parent: Parent, spec: &ElementSpec) -> Result<NodeId, PageError> {
        let parent = match parent {
            Parent::Root => self.body,
            Parent::Head => self.head,
            Parent::Node(id) => id,
        };
        self.require(parent)?;
        let id = self.append(parent, spec.tag, &spec.class.into_iter().collect::<Vec<_>>());
        let node = self.require(id)?;
        if let Some(text) = &spec.text {
            node.text.clone_from(text);
        }
        for (name, value) in &spec.attributes {
            node.attributes.insert((*name).to_owned(), value.clone());
        }
        for (property, value) in spec.style.iter() {
            node.style.insert(property.to_owned(), value.to_owned());
        }
        Ok(id)
    }

    fn apply(&mut self, patch: Patch) -> Result<(), PageError> {
        if let Patch::Remove { node } = patch {
            self.require(node)?;
            self.detach(node);
            return Ok(());
        }
        if let Patch::SetText { node, text } = patch {
            let children = self.children(node);
            self.require(node)?.text = text;
            for child in children {
                self.detach(child);
            }
            return Ok(());
        }
        let node = self.require(patch.node())?;
        match patch {
            Patch::AddClass { class, .. } => {
                if !node.classes.iter().any(|c| c == class) {
                    node.classes.push(class.to_owned());
                }
            }
            Patch::RemoveClass { class, .. } => node.classes.retain(|c| c != class),
            Patch::ToggleClass { class, .. } => {
                if node.classes.iter().any(|c| c == class) {
                    node.classes.retain(|c| c != class);
                } else {
                    node.classes.push(class.to_owned());
                }
            }
            Patch::SetAttribute { name, value, .. } => {
                node.attributes.insert(name.to_owned(), value);
            }
            Patch::RemoveAttribute { name, .. } => {
                node.attributes.remove(name);
            }
            Patch::SetStyle { style, .. } => {
                for (property, value) in style.iter() {
                    node.style.insert(property.to_owned(), value.to_owned());
                }
            }
            Patch::ClearStyle { properties, .. } => {
                for property in properties {
                    node.style.remove(*property);
                }
            }
            Patch::SetText { .. } | Patch::Remove { .. } => {}
        }
        Ok(())
    }

    fn subscribe(&mut self, listener: Listener) -> Result<(), PageError> {
        if let EventTarget::Node(id) = listener.target {
            self.require(id)?;
        }
        self.listeners.push(listener);
        Ok(())
    }

    fn schedule(&mut self, delay: Duration, task: Task) -> TaskHandle {
        let handle = TaskHandle(self.next_handle);
        self.next_handle += 1;
        self.timers.push(Timer { handle, due: self.now + delay, task });
        handle
    }

    fn cancel(&mut self, handle: TaskHandle) -> bool {
        let before = self.timers.len();
        self.timers.retain(|t| t.handle != handle);
        self.timers.len() != before
    }

    fn scroll_to_top(&mut self) {
        self.smooth_scroll_requests += 1;
        self.scroll_y = 0.0;
    }

    fn storage_get(&self, key: &str) -> Result<Option<String>, PageError> {
        Ok(self.storage.get(key).cloned())
    }

    fn storage_set(&mut self, key: &str, value: &str) -> Result<(), PageError> {
        if !self.storage_writable {
            return Err(PageError::Storage(format!("write to {key} rejected")));
        }
        self.storage.insert(key.to_owned(), value.to_owned());
        Ok(())
    }
}

/// Drive a session end to end: platform events are raised on the host and
/// every resulting [`PageEvent`] is dispatched to the page.
impl Session<MemoryHost> {
    /// # Errors
    ///
    /// Returns the first dispatch failure.
    pub fn click(&mut self, node: NodeId) -> Result<(), PageError> {
        let events = self.host_mut().click(node);
        self.dispatch_all(events)
    }

    /// # Errors
    ///
    /// Returns the first dispatch failure.
    pub fn scroll(&mut self, offset: f64) -> Result<(), PageError> {
        let events = self.host_mut().scroll(offset);
        self.dispatch_all(events)
    }

    /// # Errors
    ///
    /// Returns the first dispatch failure.
    pub fn finish_loading(&mut self) -> Result<(), PageError> {
        let events = self.host_mut().finish_loading();
        self.dispatch_all(events)
    }

    /// # Errors
    ///
    /// Returns the first dispatch failure.
    pub fn advance(&mut self, by: Duration) -> Result<(), PageError> {
        let events = self.host_mut().advance(by);
        self.dispatch_all(events)
    }
}
