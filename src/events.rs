//! Event, listener and scheduled-task types exchanged with the host.
//!
//! The page layer subscribes by handing the host a [`Listener`]: "when
//! `kind` fires on `target`, deliver `event` back to me". Hosts translate
//! platform callbacks into [`PageEvent`]s and feed them to
//! [`Session::dispatch`](crate::session::Session::dispatch).

use crate::markup::NodeId;

/// Where a listener is attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventTarget {
    Window,
    Document,
    Node(NodeId),
}

/// Platform event kinds the layer listens for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    Click,
    Scroll,
    ContentLoaded,
}

impl EventKind {
    /// DOM event name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Click => "click",
            Self::Scroll => "scroll",
            Self::ContentLoaded => "DOMContentLoaded",
        }
    }
}

/// Which scroll-driven effect a scroll listener recomputes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollEffect {
    Header,
    BackToTop,
}

/// Work deferred through [`Host::schedule`](crate::host::Host::schedule).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Task {
    RemoveNotification(NodeId),
}

/// Cancel handle returned by the host for a scheduled task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TaskHandle(pub u64);

/// Events delivered back to the page layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageEvent {
    /// Index into the nav links captured at setup.
    NavLinkClicked(usize),
    /// Index into the product cards captured at setup.
    CardClicked(usize),
    ThemeToggleClicked,
    BackToTopClicked,
    MobileMenuClicked,
    Scrolled(ScrollEffect),
    ContentLoaded,
    TaskDue(Task),
}

/// A subscription request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Listener {
    pub target: EventTarget,
    pub kind: EventKind,
    pub event: PageEvent,
    /// Suppress the platform default action (e.g. link navigation).
    pub prevent_default: bool,
}

impl Listener {
    #[must_use]
    pub fn new(target: EventTarget, kind: EventKind, event: PageEvent) -> Self {
        Self { target, kind, event, prevent_default: false }
    }

    #[must_use]
    pub fn click(node: NodeId, event: PageEvent) -> Self {
        Self::new(EventTarget::Node(node), EventKind::Click, event)
    }

    #[must_use]
    pub fn prevent_default(mut self) -> Self {
        self.prevent_default = true;
        self
    }
}
