//! Shared constants for the page interaction layer.

// ── Thresholds ──────────────────────────────────────────────────

/// Viewport widths strictly below this count as mobile.
pub const MOBILE_BREAKPOINT_PX: f64 = 768.0;

/// Scroll offset above which the header is emphasized.
pub const HEADER_SCROLL_THRESHOLD_PX: f64 = 50.0;

/// Scroll offset above which the back-to-top button is shown.
pub const BACK_TO_TOP_THRESHOLD_PX: f64 = 300.0;

/// Per-link transition delay step for the staggered nav animation.
pub const NAV_STAGGER_STEP_MS: u32 = 100;

/// How long a product notification stays on the page.
pub const NOTIFICATION_LIFETIME_MS: u64 = 3000;

// ── Storage / styling context ───────────────────────────────────

/// Persistent store key holding `"light"` or `"dark"`.
pub const THEME_STORAGE_KEY: &str = "theme";

/// Custom property on the document element used to tint generated controls.
pub const PRIMARY_COLOR_PROPERTY: &str = "--primary-color";

/// Root attribute carrying the active theme.
pub const THEME_ATTRIBUTE: &str = "data-theme";

/// Card attribute carrying the 1-based product id.
pub const PRODUCT_ID_ATTRIBUTE: &str = "data-product-id";

// ── Marker classes ──────────────────────────────────────────────

pub const MOBILE_VIEW_CLASS: &str = "mobile-view";
pub const DESKTOP_VIEW_CLASS: &str = "desktop-view";
pub const ACTIVE_CLASS: &str = "active";
pub const EXPANDED_CLASS: &str = "expanded";
pub const BADGE_CLASS: &str = "product-badge";
pub const NOTIFICATION_CLASS: &str = "notification";
pub const THEME_TOGGLE_CLASS: &str = "theme-toggle";
pub const BACK_TO_TOP_CLASS: &str = "back-to-top";

// ── Text ────────────────────────────────────────────────────────

pub const WELCOME_PHRASE: &str = "Welcome to Target Integrated Solution PLC";
pub const THEME_TOGGLE_LABEL: &str = "Toggle Theme";
pub const BACK_TO_TOP_LABEL: &str = "\u{2191}";
pub const NOTIFICATION_PREFIX: &str = "You viewed: ";

// ── Header emphasis ─────────────────────────────────────────────

pub const HEADER_SHADOW: &str = "0 4px 10px rgba(0,0,0,0.2)";
pub const HEADER_SCROLLED_BACKGROUND: &str = "#1a252f";

/// Foreground for every control tinted with the primary color.
pub const CONTROL_TEXT_COLOR: &str = "white";

/// Stacking order for fixed-position controls and notifications.
pub const OVERLAY_Z_INDEX: &str = "1000";
