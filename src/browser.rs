//! Browser [`Host`] backed by `web-sys`, plus the WASM entry point.
//!
//! Element handles come from an [`Arena`] of `web_sys::Element`s; the same
//! live DOM node always maps to the same [`NodeId`], and removed elements are
//! released. DOM callbacks and timers hold only a weak reference to the
//! running session, and a callback that arrives while the session is already
//! borrowed is logged and dropped.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::{Rc, Weak};
use std::time::Duration;

use gloo_timers::callback::Timeout;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Element, HtmlElement, ScrollBehavior, ScrollToOptions, Storage, Window};

use crate::arena::Arena;
use crate::config::PageConfig;
use crate::error::PageError;
use crate::events::{EventTarget, Listener, PageEvent, Task, TaskHandle};
use crate::host::{self, Host};
use crate::markup::{ElementSpec, InlineStyle, NodeId, Parent, Patch};
use crate::session::Session;

/// Id of the optional `<script type="application/json">` config override.
const CONFIG_ELEMENT_ID: &str = "page-config";

type EventSink = Rc<dyn Fn(PageEvent)>;
type SharedSession = Rc<RefCell<Session<BrowserHost>>>;

thread_local! {
    static MOUNTED: RefCell<Option<SharedSession>> = const { RefCell::new(None) };
}

pub struct BrowserHost {
    window: Window,
    document: Document,
    elements: Arena<Element>,
    sink: EventSink,
    listeners: Vec<Closure<dyn FnMut(web_sys::Event)>>,
    timers: HashMap<TaskHandle, Timeout>,
    finished: Rc<RefCell<Vec<TaskHandle>>>,
    next_handle: u64,
}

impl BrowserHost {
    fn new(window: Window, document: Document, sink: EventSink) -> Self {
        Self {
            window,
            document,
            elements: Arena::new(),
            sink,
            listeners: Vec::new(),
            timers: HashMap::new(),
            finished: Rc::new(RefCell::new(Vec::new())),
            next_handle: 1,
        }
    }

    fn register(&mut self, element: Element) -> NodeId {
        self.elements.intern(element, |known, new| known.is_same_node(Some(new)))
    }

    fn element(&self, id: NodeId) -> Result<&Element, PageError> {
        self.elements.get(id).ok_or(PageError::UnknownNode(id))
    }

    fn html_element(&self, id: NodeId) -> Result<&HtmlElement, PageError> {
        self.element(id)?.dyn_ref::<HtmlElement>().ok_or_else(|| PageError::Dom(format!("{id} is not an HTML element")))
    }

    fn storage(&self) -> Result<Storage, PageError> {
        match self.window.local_storage() {
            Ok(Some(storage)) => Ok(storage),
            Ok(None) => Err(PageError::Storage("localStorage is not available".to_owned())),
            Err(err) => Err(PageError::Storage(format!("{err:?}"))),
        }
    }

    /// Drop timers whose callbacks already ran.
    fn sweep_finished(&mut self) {
        let finished: Vec<TaskHandle> = self.finished.borrow_mut().drain(..).collect();
        for handle in finished {
            self.timers.remove(&handle);
        }
    }

    fn set_style(&self, id: NodeId, style: &InlineStyle) -> Result<(), PageError> {
        let decl = self.html_element(id)?.style();
        for (property, value) in style.iter() {
            decl.set_property(property, value).map_err(js_error)?;
        }
        Ok(())
    }
}

fn js_error(err: JsValue) -> PageError {
    PageError::Dom(format!("{err:?}"))
}

impl Host for BrowserHost {
    fn current_hour(&self) -> u32 {
        js_sys::Date::new_0().get_hours()
    }

    fn viewport_width(&self) -> f64 {
        match self.window.inner_width() {
            Ok(width) => width.as_f64().unwrap_or(f64::INFINITY),
            Err(_) => f64::INFINITY,
        }
    }

    fn scroll_y(&self) -> f64 {
        self.window.scroll_y().unwrap_or(0.0)
    }

    fn custom_property(&self, name: &str) -> Option<String> {
        let root = self.document.document_element()?;
        let Ok(Some(decl)) = self.window.get_computed_style(&root) else {
            return None;
        };
        match decl.get_property_value(name) {
            Ok(value) if !value.is_empty() => Some(value),
            _ => None,
        }
    }

    fn content_loaded(&self) -> bool {
        host::document_parsed(&self.document.ready_state())
    }

    fn root(&mut self) -> Result<NodeId, PageError> {
        let body = self.document.body().ok_or_else(|| PageError::missing("body"))?;
        Ok(self.register(body.into()))
    }

    fn query(&mut self, selector: &str) -> Option<NodeId> {
        match self.document.query_selector(selector) {
            Ok(found) => found.map(|e| self.register(e)),
            Err(err) => {
                log::warn!("invalid selector {selector}: {err:?}");
                None
            }
        }
    }

    fn query_all(&mut self, selector: &str) -> Vec<NodeId> {
        let list = match self.document.query_selector_all(selector) {
            Ok(list) => list,
            Err(err) => {
                log::warn!("invalid selector {selector}: {err:?}");
                return Vec::new();
            }
        };
        (0..list.length())
            .filter_map(|i| list.item(i))
            .filter_map(|node| node.dyn_ref::<Element>().cloned())
            .map(|e| self.register(e))
            .collect()
    }

    fn query_within(&mut self, scope: NodeId, selector: &str) -> Option<NodeId> {
        let found = match self.element(scope) {
            Ok(element) => element.query_selector(selector),
            Err(_) => return None,
        };
        match found {
            Ok(found) => found.map(|e| self.register(e)),
            Err(err) => {
                log::warn!("invalid selector {selector}: {err:?}");
                None
            }
        }
    }

    fn text(&self, node: NodeId) -> Option<String> {
        match self.element(node) {
            Ok(element) => element.text_content(),
            Err(_) => None,
        }
    }

    fn attribute(&self, node: NodeId, name: &str) -> Option<String> {
        match self.element(node) {
            Ok(element) => element.get_attribute(name),
            Err(_) => None,
        }
    }

    fn create(&mut self, parent: Parent, spec: &ElementSpec) -> Result<NodeId, PageError> {
        let element = self.document.create_element(spec.tag).map_err(js_error)?;
        if let Some(class) = spec.class {
            element.set_class_name(class);
        }
        if let Some(text) = &spec.text {
            element.set_text_content(Some(text));
        }
        for (name, value) in &spec.attributes {
            element.set_attribute(name, value).map_err(js_error)?;
        }
        match parent {
            Parent::Root => {
                let body = self.document.body().ok_or_else(|| PageError::missing("body"))?;
                body.append_child(&element).map_err(js_error)?;
            }
            Parent::Head => {
                let head = self.document.head().ok_or_else(|| PageError::missing("head"))?;
                head.append_child(&element).map_err(js_error)?;
            }
            Parent::Node(id) => {
                self.element(id)?.append_child(&element).map_err(js_error)?;
            }
        }
        let id = self.register(element);
        if !spec.style.is_empty() {
            self.set_style(id, &spec.style)?;
        }
        Ok(id)
    }

    fn apply(&mut self, patch: Patch) -> Result<(), PageError> {
        let id = patch.node();
        match patch {
            Patch::AddClass { class, .. } => self.element(id)?.class_list().add_1(class).map_err(js_error),
            Patch::RemoveClass { class, .. } => self.element(id)?.class_list().remove_1(class).map_err(js_error),
            Patch::ToggleClass { class, .. } => {
                self.element(id)?.class_list().toggle(class).map(|_| ()).map_err(js_error)
            }
            Patch::SetAttribute { name, value, .. } => self.element(id)?.set_attribute(name, &value).map_err(js_error),
            Patch::RemoveAttribute { name, .. } => self.element(id)?.remove_attribute(name).map_err(js_error),
            Patch::SetText { text, .. } => {
                self.element(id)?.set_text_content(Some(&text));
                Ok(())
            }
            Patch::SetStyle { style, .. } => self.set_style(id, &style),
            Patch::ClearStyle { properties, .. } => {
                let decl = self.html_element(id)?.style();
                for property in properties {
                    decl.remove_property(property).map_err(js_error)?;
                }
                Ok(())
            }
            Patch::Remove { .. } => {
                self.element(id)?.remove();
                self.elements.release(id);
                Ok(())
            }
        }
    }

    fn subscribe(&mut self, listener: Listener) -> Result<(), PageError> {
        let sink = Rc::clone(&self.sink);
        let Listener { target, kind, event, prevent_default } = listener;
        let callback = Closure::<dyn FnMut(web_sys::Event)>::new(move |dom_event: web_sys::Event| {
            if prevent_default {
                dom_event.prevent_default();
            }
            sink(event);
        });
        let target: &web_sys::EventTarget = match target {
            EventTarget::Window => self.window.as_ref(),
            EventTarget::Document => self.document.as_ref(),
            EventTarget::Node(id) => self.element(id)?.as_ref(),
        };
        target.add_event_listener_with_callback(kind.as_str(), callback.as_ref().unchecked_ref()).map_err(js_error)?;
        self.listeners.push(callback);
        Ok(())
    }

    fn schedule(&mut self, delay: Duration, task: Task) -> TaskHandle {
        self.sweep_finished();
        let handle = TaskHandle(self.next_handle);
        self.next_handle += 1;
        let sink = Rc::clone(&self.sink);
        let finished = Rc::clone(&self.finished);
        let millis = u32::try_from(delay.as_millis()).unwrap_or(u32::MAX);
        let timeout = Timeout::new(millis, move || {
            finished.borrow_mut().push(handle);
            sink(PageEvent::TaskDue(task));
        });
        self.timers.insert(handle, timeout);
        handle
    }

    fn cancel(&mut self, handle: TaskHandle) -> bool {
        if self.finished.borrow().contains(&handle) {
            return false;
        }
        // Dropping a gloo `Timeout` clears it.
        self.timers.remove(&handle).is_some()
    }

    fn scroll_to_top(&mut self) {
        let options = ScrollToOptions::new();
        options.set_top(0.0);
        options.set_behavior(ScrollBehavior::Smooth);
        self.window.scroll_to_with_scroll_to_options(&options);
    }

    fn storage_get(&self, key: &str) -> Result<Option<String>, PageError> {
        self.storage()?.get_item(key).map_err(|err| PageError::Storage(format!("{err:?}")))
    }

    fn storage_set(&mut self, key: &str, value: &str) -> Result<(), PageError> {
        self.storage()?.set_item(key, value).map_err(|err| PageError::Storage(format!("{err:?}")))
    }
}

/// WASM entry point: install logging, read config, mount the page.
#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    if let Err(err) = console_log::init_with_level(log::Level::Info) {
        log::warn!("console logger not installed: {err}");
    }
    match attach() {
        Ok(session) => MOUNTED.with(|slot| *slot.borrow_mut() = Some(session)),
        Err(err) => log::error!("page setup stopped: {err}"),
    }
}

/// Build a browser session and mount it. The session is returned even when
/// mounting fails part-way so the steps that succeeded keep working.
fn attach() -> Result<SharedSession, PageError> {
    let window = web_sys::window().ok_or_else(|| PageError::missing("window"))?;
    let document = window.document().ok_or_else(|| PageError::missing("document"))?;
    let config = load_config(&document);
    let session: SharedSession = Rc::new_cyclic(|weak| {
        let sink = event_sink(weak.clone());
        RefCell::new(Session::new(config, BrowserHost::new(window, document, sink)))
    });
    if let Err(err) = session.borrow_mut().mount() {
        log::error!("page setup stopped: {err}");
    }
    Ok(session)
}

fn load_config(document: &Document) -> PageConfig {
    let Some(raw) = document.get_element_by_id(CONFIG_ELEMENT_ID).and_then(|e| e.text_content()) else {
        return PageConfig::default();
    };
    PageConfig::from_json(&raw).unwrap_or_else(|err| {
        log::warn!("ignoring #{CONFIG_ELEMENT_ID}: {err}");
        PageConfig::default()
    })
}

fn event_sink(session: Weak<RefCell<Session<BrowserHost>>>) -> EventSink {
    Rc::new(move |event: PageEvent| {
        let Some(shared) = session.upgrade() else {
            return;
        };
        let Ok(mut running) = shared.try_borrow_mut() else {
            log::warn!("dropped {event:?}: page is busy handling another event");
            return;
        };
        if let Err(err) = running.dispatch(event) {
            log::error!("failed to handle {event:?}: {err}");
        }
    })
}
