//! The page interaction layer: one-shot setup plus event handlers.
//!
//! [`Page::mount`] runs the setup steps in a fixed order against a [`Host`].
//! Each step either mutates the page once or registers listeners whose
//! events come back through [`Page::dispatch`].
//!
//! Nav links and product cards are captured once during mount. Elements the
//! host page adds later are not picked up.
//!
//! PRECONDITIONS
//! =============
//! The header and the mobile-menu button must exist. Both are resolved
//! before anything is changed, so a missing one fails mount with
//! [`PageError::MissingElement`] and leaves the page untouched. The nav
//! container is looked up on each menu click; without one the click does
//! nothing.

#[cfg(test)]
#[path = "page_test.rs"]
mod page_test;

use std::collections::BTreeMap;
use std::time::Duration;

use crate::config::PageConfig;
use crate::consts::{
    ACTIVE_CLASS, DESKTOP_VIEW_CLASS, EXPANDED_CLASS, HEADER_SCROLLED_BACKGROUND, HEADER_SHADOW, MOBILE_VIEW_CLASS,
    PRODUCT_ID_ATTRIBUTE,
};
use crate::controls;
use crate::error::PageError;
use crate::events::{EventKind, EventTarget, Listener, PageEvent, ScrollEffect, Task, TaskHandle};
use crate::greeting::Greeting;
use crate::host::Host;
use crate::markup::{InlineStyle, NodeId, Parent, Patch};
use crate::theme::{self, Theme};

const HEADER_EMPHASIS_PROPERTIES: &[&str] = &["box-shadow", "background-color"];

pub struct Page {
    config: PageConfig,
    root: Option<NodeId>,
    accent: Option<String>,
    nav_links: Vec<NodeId>,
    cards: Vec<NodeId>,
    theme_toggle: Option<NodeId>,
    header: Option<NodeId>,
    back_to_top: Option<NodeId>,
    notifications: BTreeMap<TaskHandle, NodeId>,
}

impl Page {
    #[must_use]
    pub fn new(config: PageConfig) -> Self {
        Self {
            config,
            root: None,
            accent: None,
            nav_links: Vec::new(),
            cards: Vec::new(),
            theme_toggle: None,
            header: None,
            back_to_top: None,
            notifications: BTreeMap::new(),
        }
    }

    // --- Setup ---

    /// Run every setup step once.
    ///
    /// # Errors
    ///
    /// Returns [`PageError::MissingElement`] when a required element is
    /// absent, before any change is made. A later host failure leaves the
    /// steps before it in effect.
    pub fn mount(&mut self, host: &mut impl Host) -> Result<(), PageError> {
        let root = host.root()?;
        let header = require(host, &self.config.selectors.header)?;
        let menu_button = require(host, &self.config.selectors.mobile_menu_button)?;
        self.root = Some(root);
        self.header = Some(header);
        self.accent = host
            .custom_property(&self.config.primary_color_property)
            .map(|v| v.trim().to_owned())
            .filter(|v| !v.is_empty());
        self.cards = host.query_all(&self.config.selectors.cards);
        self.nav_links = host.query_all(&self.config.selectors.nav_links);

        self.greet(host)?;
        self.mark_device(host, root)?;
        self.wire_nav_links(host)?;
        self.enhance_cards(host)?;
        self.inject_theme_toggle(host)?;
        host.subscribe(Listener::new(EventTarget::Window, EventKind::Scroll, PageEvent::Scrolled(ScrollEffect::Header)))?;
        self.inject_back_to_top(host)?;
        self.wire_theme_restore(host, root)?;
        host.create(Parent::Head, &controls::dark_stylesheet())?;
        host.subscribe(Listener::click(menu_button, PageEvent::MobileMenuClicked))?;

        log::info!("page mounted: {} nav links, {} product cards", self.nav_links.len(), self.cards.len());
        Ok(())
    }

    fn greet(&self, host: &mut impl Host) -> Result<(), PageError> {
        let Some(heading) = host.query(&self.config.selectors.heading) else {
            log::debug!("no heading matches {}; greeting skipped", self.config.selectors.heading);
            return Ok(());
        };
        let greeting = Greeting::for_hour(host.current_hour());
        host.apply(Patch::SetText { node: heading, text: greeting.heading(&self.config.welcome_phrase) })
    }

    fn mark_device(&self, host: &mut impl Host, root: NodeId) -> Result<(), PageError> {
        let class = if host.viewport_width() < self.config.mobile_breakpoint_px {
            MOBILE_VIEW_CLASS
        } else {
            DESKTOP_VIEW_CLASS
        };
        host.apply(Patch::AddClass { node: root, class })
    }

    fn wire_nav_links(&self, host: &mut impl Host) -> Result<(), PageError> {
        let step = u64::from(self.config.nav_stagger_step_ms);
        for (index, link) in self.nav_links.iter().enumerate() {
            let delay_ms = step * index as u64;
            host.apply(Patch::SetStyle {
                node: *link,
                style: InlineStyle::new().with("transition-delay", format!("{delay_ms}ms")),
            })?;
            host.subscribe(Listener::click(*link, PageEvent::NavLinkClicked(index)).prevent_default())?;
        }
        Ok(())
    }

    fn enhance_cards(&self, host: &mut impl Host) -> Result<(), PageError> {
        for (index, card) in self.cards.iter().enumerate() {
            let position = index + 1;
            host.apply(Patch::SetAttribute { node: *card, name: PRODUCT_ID_ATTRIBUTE, value: position.to_string() })?;
            host.apply(Patch::SetStyle { node: *card, style: controls::card_style() })?;
            host.create(Parent::Node(*card), &controls::badge(position, self.accent.as_deref()))?;
            host.subscribe(Listener::click(*card, PageEvent::CardClicked(index)))?;
        }
        Ok(())
    }

    fn inject_theme_toggle(&mut self, host: &mut impl Host) -> Result<(), PageError> {
        let button = host.create(Parent::Root, &controls::theme_toggle(self.accent.as_deref()))?;
        host.subscribe(Listener::click(button, PageEvent::ThemeToggleClicked))?;
        self.theme_toggle = Some(button);
        Ok(())
    }

    fn inject_back_to_top(&mut self, host: &mut impl Host) -> Result<(), PageError> {
        let button = host.create(Parent::Root, &controls::back_to_top(self.accent.as_deref()))?;
        self.back_to_top = Some(button);
        host.subscribe(Listener::new(
            EventTarget::Window,
            EventKind::Scroll,
            PageEvent::Scrolled(ScrollEffect::BackToTop),
        ))?;
        host.subscribe(Listener::click(button, PageEvent::BackToTopClicked))
    }

    /// Restore the stored theme once the document is parsed. When setup runs
    /// after parsing has finished there is no event left to wait for.
    fn wire_theme_restore(&self, host: &mut impl Host, root: NodeId) -> Result<(), PageError> {
        if host.content_loaded() {
            theme::restore(host, root, &self.config.theme_storage_key)?;
            return Ok(());
        }
        host.subscribe(Listener::new(EventTarget::Document, EventKind::ContentLoaded, PageEvent::ContentLoaded))
    }

    // --- Events ---

    /// Handle one event delivered by the host.
    ///
    /// # Errors
    ///
    /// Propagates host and storage failures.
    pub fn dispatch(&mut self, host: &mut impl Host, event: PageEvent) -> Result<(), PageError> {
        match event {
            PageEvent::NavLinkClicked(index) => self.activate_nav_link(host, index),
            PageEvent::CardClicked(index) => self.open_card(host, index),
            PageEvent::ThemeToggleClicked => {
                let Some(root) = self.root else {
                    return Ok(());
                };
                let next = theme::toggle(host, root, &self.config.theme_storage_key)?;
                log::debug!("theme switched to {}", next.as_str());
                Ok(())
            }
            PageEvent::BackToTopClicked => {
                host.scroll_to_top();
                Ok(())
            }
            PageEvent::MobileMenuClicked => self.toggle_nav(host),
            PageEvent::Scrolled(ScrollEffect::Header) => self.update_header(host),
            PageEvent::Scrolled(ScrollEffect::BackToTop) => self.update_back_to_top(host),
            PageEvent::ContentLoaded => match self.root {
                Some(root) => theme::restore(host, root, &self.config.theme_storage_key).map(|_| ()),
                None => Ok(()),
            },
            PageEvent::TaskDue(Task::RemoveNotification(node)) => self.expire_notification(host, node),
        }
    }

    fn activate_nav_link(&self, host: &mut impl Host, index: usize) -> Result<(), PageError> {
        let Some(clicked) = self.nav_links.get(index).copied() else {
            log::warn!("nav link {index} was not captured at setup");
            return Ok(());
        };
        log::debug!("Navigation link clicked: {}", host.text(clicked).unwrap_or_default());
        for link in &self.nav_links {
            host.apply(Patch::RemoveClass { node: *link, class: ACTIVE_CLASS })?;
        }
        host.apply(Patch::AddClass { node: clicked, class: ACTIVE_CLASS })
    }

    fn toggle_nav(&self, host: &mut impl Host) -> Result<(), PageError> {
        let Some(nav) = host.query(&self.config.selectors.nav) else {
            log::debug!("no element matches {}; menu toggle skipped", self.config.selectors.nav);
            return Ok(());
        };
        host.apply(Patch::ToggleClass { node: nav, class: ACTIVE_CLASS })
    }

    fn open_card(&mut self, host: &mut impl Host, index: usize) -> Result<(), PageError> {
        let Some(card) = self.cards.get(index).copied() else {
            log::warn!("product card {index} was not captured at setup");
            return Ok(());
        };
        host.apply(Patch::ToggleClass { node: card, class: EXPANDED_CLASS })?;

        let title = host.query_within(card, &self.config.selectors.card_title).and_then(|t| host.text(t));
        let Some(title) = title else {
            log::debug!("card {} has no title; notification skipped", index + 1);
            return Ok(());
        };
        let notice = host.create(Parent::Root, &controls::notification(&title, self.accent.as_deref()))?;
        let lifetime = Duration::from_millis(self.config.notification_lifetime_ms);
        let handle = host.schedule(lifetime, Task::RemoveNotification(notice));
        self.notifications.insert(handle, notice);
        Ok(())
    }

    fn update_header(&self, host: &mut impl Host) -> Result<(), PageError> {
        let Some(header) = self.header else {
            return Ok(());
        };
        if host.scroll_y() > self.config.header_scroll_threshold_px {
            host.apply(Patch::SetStyle {
                node: header,
                style: InlineStyle::new()
                    .with("box-shadow", HEADER_SHADOW)
                    .with("background-color", HEADER_SCROLLED_BACKGROUND),
            })
        } else {
            host.apply(Patch::ClearStyle { node: header, properties: HEADER_EMPHASIS_PROPERTIES })
        }
    }

    fn update_back_to_top(&self, host: &mut impl Host) -> Result<(), PageError> {
        let Some(button) = self.back_to_top else {
            return Ok(());
        };
        let display = if host.scroll_y() > self.config.back_to_top_threshold_px { "block" } else { "none" };
        host.apply(Patch::SetStyle { node: button, style: InlineStyle::new().with("display", display) })
    }

    fn expire_notification(&mut self, host: &mut impl Host, node: NodeId) -> Result<(), PageError> {
        self.notifications.retain(|_, n| *n != node);
        match host.apply(Patch::Remove { node }) {
            // Already detached by someone else; removal is idempotent.
            Err(PageError::UnknownNode(_)) => Ok(()),
            other => other,
        }
    }

    // --- Queries ---

    #[must_use]
    pub fn nav_links(&self) -> &[NodeId] {
        &self.nav_links
    }

    #[must_use]
    pub fn cards(&self) -> &[NodeId] {
        &self.cards
    }

    #[must_use]
    pub fn theme_toggle(&self) -> Option<NodeId> {
        self.theme_toggle
    }

    #[must_use]
    pub fn back_to_top(&self) -> Option<NodeId> {
        self.back_to_top
    }

    /// Notifications on screen, each with the handle of its removal task.
    pub fn notifications(&self) -> impl Iterator<Item = (TaskHandle, NodeId)> + '_ {
        self.notifications.iter().map(|(h, n)| (*h, *n))
    }

    /// Theme currently applied to the page root.
    #[must_use]
    pub fn theme(&self, host: &impl Host) -> Theme {
        self.root.map_or(Theme::Light, |root| theme::current(host, root))
    }
}

fn require(host: &mut impl Host, selector: &str) -> Result<NodeId, PageError> {
    host.query(selector).ok_or_else(|| PageError::missing(selector))
}
