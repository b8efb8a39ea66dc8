//! Tunables and selectors for the page layer.
//!
//! Every field has a default matching the stock marketing page, so an empty
//! override document (`{}`) yields [`PageConfig::default`].

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use serde::Deserialize;

use crate::consts::{
    BACK_TO_TOP_THRESHOLD_PX, HEADER_SCROLL_THRESHOLD_PX, MOBILE_BREAKPOINT_PX, NAV_STAGGER_STEP_MS,
    NOTIFICATION_LIFETIME_MS, PRIMARY_COLOR_PROPERTY, THEME_STORAGE_KEY, WELCOME_PHRASE,
};
use crate::error::PageError;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct PageConfig {
    pub mobile_breakpoint_px: f64,
    pub header_scroll_threshold_px: f64,
    pub back_to_top_threshold_px: f64,
    pub nav_stagger_step_ms: u32,
    pub notification_lifetime_ms: u64,
    pub theme_storage_key: String,
    pub primary_color_property: String,
    pub welcome_phrase: String,
    pub selectors: Selectors,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            mobile_breakpoint_px: MOBILE_BREAKPOINT_PX,
            header_scroll_threshold_px: HEADER_SCROLL_THRESHOLD_PX,
            back_to_top_threshold_px: BACK_TO_TOP_THRESHOLD_PX,
            nav_stagger_step_ms: NAV_STAGGER_STEP_MS,
            notification_lifetime_ms: NOTIFICATION_LIFETIME_MS,
            theme_storage_key: THEME_STORAGE_KEY.to_owned(),
            primary_color_property: PRIMARY_COLOR_PROPERTY.to_owned(),
            welcome_phrase: WELCOME_PHRASE.to_owned(),
            selectors: Selectors::default(),
        }
    }
}

impl PageConfig {
    /// Parse a JSON override document; missing fields keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`PageError::Config`] for malformed JSON or mistyped fields.
    pub fn from_json(raw: &str) -> Result<Self, PageError> {
        Ok(serde_json::from_str(raw)?)
    }
}

/// Selectors locating the host page's elements.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Selectors {
    pub heading: String,
    pub nav_links: String,
    pub cards: String,
    /// Looked up inside each card.
    pub card_title: String,
    pub header: String,
    pub mobile_menu_button: String,
    pub nav: String,
}

impl Default for Selectors {
    fn default() -> Self {
        Self {
            heading: ".content h1".to_owned(),
            nav_links: ".nav-link".to_owned(),
            cards: ".card".to_owned(),
            card_title: "h2".to_owned(),
            header: ".header".to_owned(),
            mobile_menu_button: ".mobile-menu-btn".to_owned(),
            nav: ".nav".to_owned(),
        }
    }
}
