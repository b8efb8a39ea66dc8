//! Element specs for everything the layer adds to the page.
//!
//! `accent` is the page's primary color as read from the styling context.
//! When the page defines none, the background declaration is left out and
//! the element falls back to its stylesheet.

#[cfg(test)]
#[path = "controls_test.rs"]
mod controls_test;

use crate::consts::{
    BACK_TO_TOP_CLASS, BACK_TO_TOP_LABEL, BADGE_CLASS, CONTROL_TEXT_COLOR, NOTIFICATION_CLASS, NOTIFICATION_PREFIX,
    OVERLAY_Z_INDEX, THEME_TOGGLE_CLASS, THEME_TOGGLE_LABEL,
};
use crate::markup::{ElementSpec, InlineStyle};
use crate::theme::DARK_STYLESHEET;

/// Badge labelled `#<position>` pinned to the top-right of a card.
#[must_use]
pub fn badge(position: usize, accent: Option<&str>) -> ElementSpec {
    ElementSpec::new("span").class(BADGE_CLASS).text(format!("#{position}")).style(
        InlineStyle::new()
            .with("position", "absolute")
            .with("top", "10px")
            .with("right", "10px")
            .with_opt("background-color", accent)
            .with("color", CONTROL_TEXT_COLOR)
            .with("padding", "5px 10px")
            .with("border-radius", "15px")
            .with("font-size", "0.8rem"),
    )
}

/// Inline style a card needs so its badge can be positioned inside it.
#[must_use]
pub fn card_style() -> InlineStyle {
    InlineStyle::new().with("position", "relative")
}

/// Transient "You viewed" notification, bottom-right.
#[must_use]
pub fn notification(title: &str, accent: Option<&str>) -> ElementSpec {
    ElementSpec::new("div").class(NOTIFICATION_CLASS).text(format!("{NOTIFICATION_PREFIX}{title}")).style(
        InlineStyle::new()
            .with("position", "fixed")
            .with("bottom", "20px")
            .with("right", "20px")
            .with("padding", "10px 20px")
            .with_opt("background-color", accent)
            .with("color", CONTROL_TEXT_COLOR)
            .with("border-radius", "5px")
            .with("z-index", OVERLAY_Z_INDEX),
    )
}

/// Fixed "Toggle Theme" button, bottom-left.
#[must_use]
pub fn theme_toggle(accent: Option<&str>) -> ElementSpec {
    ElementSpec::new("button").class(THEME_TOGGLE_CLASS).text(THEME_TOGGLE_LABEL).style(
        InlineStyle::new()
            .with("position", "fixed")
            .with("bottom", "20px")
            .with("left", "20px")
            .with("padding", "10px 20px")
            .with_opt("background-color", accent)
            .with("color", CONTROL_TEXT_COLOR)
            .with("border", "none")
            .with("border-radius", "5px")
            .with("cursor", "pointer")
            .with("z-index", OVERLAY_Z_INDEX),
    )
}

/// Round back-to-top button, bottom-center, hidden until scrolled.
#[must_use]
pub fn back_to_top(accent: Option<&str>) -> ElementSpec {
    ElementSpec::new("button").class(BACK_TO_TOP_CLASS).text(BACK_TO_TOP_LABEL).style(
        InlineStyle::new()
            .with("position", "fixed")
            .with("bottom", "20px")
            .with("left", "50%")
            .with("transform", "translateX(-50%)")
            .with("padding", "10px 15px")
            .with_opt("background-color", accent)
            .with("color", CONTROL_TEXT_COLOR)
            .with("border", "none")
            .with("border-radius", "50%")
            .with("font-size", "1.2rem")
            .with("cursor", "pointer")
            .with("display", "none")
            .with("z-index", OVERLAY_Z_INDEX),
    )
}

/// `<style>` element carrying the dark theme rules.
#[must_use]
pub fn dark_stylesheet() -> ElementSpec {
    ElementSpec::new("style").text(DARK_STYLESHEET)
}
