//! Light/dark theme toggle and persistence.
//!
//! The active theme lives in the `data-theme` attribute of the page root:
//! `dark` when dark, absent when light. The preference is mirrored into the
//! host's persistent store so the next page load can restore it.

#[cfg(test)]
#[path = "theme_test.rs"]
mod theme_test;

use crate::consts::THEME_ATTRIBUTE;
use crate::error::PageError;
use crate::host::Host;
use crate::markup::{NodeId, Patch};

/// Dark-variant rules injected into the document head at setup.
pub const DARK_STYLESHEET: &str = r#"
    [data-theme="dark"] {
        --primary-color: #27ae60;
        --secondary-color: #1a252f;
        --light-color: #34495e;
        --text-color: #ecf0f1;
        background-color: #121212;
        color: #ecf0f1;
    }

    [data-theme="dark"] .card,
    [data-theme="dark"] .sidebar-widget {
        background-color: #2c3e50;
        color: #ecf0f1;
    }

    [data-theme="dark"] .footer {
        background-color: #1a252f;
    }

    [data-theme="dark"] .nav {
        background-color: #1a252f;
    }
"#;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }

    /// Interpret an attribute or stored value. Only `"dark"` means dark.
    #[must_use]
    pub fn from_value(value: Option<&str>) -> Self {
        match value {
            Some("dark") => Self::Dark,
            _ => Self::Light,
        }
    }

    #[must_use]
    pub fn flipped(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }
}

/// Theme currently shown on `root`.
#[must_use]
pub fn current(host: &impl Host, root: NodeId) -> Theme {
    Theme::from_value(host.attribute(root, THEME_ATTRIBUTE).as_deref())
}

/// Set the root attribute for `theme`.
///
/// # Errors
///
/// Propagates host patch failures.
pub fn apply(host: &mut impl Host, root: NodeId, theme: Theme) -> Result<(), PageError> {
    let patch = match theme {
        Theme::Dark => Patch::SetAttribute { node: root, name: THEME_ATTRIBUTE, value: Theme::Dark.as_str().to_owned() },
        Theme::Light => Patch::RemoveAttribute { node: root, name: THEME_ATTRIBUTE },
    };
    host.apply(patch)
}

/// Flip the theme on `root` and persist the new value under `key`.
///
/// # Errors
///
/// Propagates host patch and storage failures. The attribute is flipped
/// before the store is written.
pub fn toggle(host: &mut impl Host, root: NodeId, key: &str) -> Result<Theme, PageError> {
    let next = current(&*host, root).flipped();
    apply(host, root, next)?;
    host.storage_set(key, next.as_str())?;
    Ok(next)
}

/// Re-apply a stored dark preference. A stored light value, or none, leaves
/// the page untouched.
///
/// # Errors
///
/// Propagates host patch and storage failures.
pub fn restore(host: &mut impl Host, root: NodeId, key: &str) -> Result<Theme, PageError> {
    let stored = Theme::from_value(host.storage_get(key)?.as_deref());
    if stored == Theme::Dark {
        apply(host, root, Theme::Dark)?;
    }
    Ok(stored)
}
