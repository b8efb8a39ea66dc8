use std::time::Duration;

use super::*;
use crate::memory::MemoryHost;
use crate::session::Session;

// =============================================================
// Fixture
// =============================================================

struct Fixture {
    session: Session<MemoryHost>,
    heading: NodeId,
    links: Vec<NodeId>,
    cards: Vec<NodeId>,
    titles: Vec<NodeId>,
    header: NodeId,
    menu_button: NodeId,
    nav: NodeId,
}

/// Header with nav + menu button, a content heading, and three product cards.
fn marketing_page(mut host: MemoryHost) -> Fixture {
    let body = host.body();
    let header = host.append(body, "header", &["header"]);
    let menu_button = host.append_text(header, "button", &["mobile-menu-btn"], "Menu");
    let nav = host.append(header, "nav", &["nav"]);
    let links = ["Home", "Products", "Contact"]
        .iter()
        .map(|label| host.append_text(nav, "a", &["nav-link"], label))
        .collect();
    let content = host.append(body, "main", &["content"]);
    let heading = host.append_text(content, "h1", &[], "Welcome");
    let mut cards = Vec::new();
    let mut titles = Vec::new();
    for name in ["Cloud Hosting", "Managed Backup", "Network Audit"] {
        let card = host.append(content, "div", &["card"]);
        titles.push(host.append_text(card, "h2", &[], name));
        host.append_text(card, "p", &[], "Details");
        cards.push(card);
    }
    Fixture {
        session: Session::new(PageConfig::default(), host),
        heading,
        links,
        cards,
        titles,
        header,
        menu_button,
        nav,
    }
}

fn mounted(host: MemoryHost) -> Fixture {
    let mut fx = marketing_page(host);
    assert!(fx.session.mount().is_ok());
    fx
}

fn notifications(fx: &Fixture) -> Vec<NodeId> {
    fx.session.host().select_all(".notification")
}

// =============================================================
// Greeting / device class
// =============================================================

#[test]
fn morning_greeting_replaces_heading() {
    let fx = mounted(MemoryHost::new().with_hour(8));
    assert_eq!(
        fx.session.host().text(fx.heading).as_deref(),
        Some("Good morning! Welcome to Target Integrated Solution PLC")
    );
}

#[test]
fn evening_greeting_at_eighteen() {
    let fx = mounted(MemoryHost::new().with_hour(18));
    assert_eq!(
        fx.session.host().text(fx.heading).as_deref(),
        Some("Good evening! Welcome to Target Integrated Solution PLC")
    );
}

#[test]
fn missing_heading_is_skipped() {
    let mut host = MemoryHost::new();
    let body = host.body();
    let header = host.append(body, "header", &["header"]);
    host.append(header, "button", &["mobile-menu-btn"]);
    host.append(header, "nav", &["nav"]);
    let mut session = Session::new(PageConfig::default(), host);
    assert!(session.mount().is_ok());
    assert!(session.host().select("h1").is_none());
}

#[test]
fn narrow_viewport_is_mobile() {
    let fx = mounted(MemoryHost::new().with_viewport_width(767.0));
    let body = fx.session.host().body();
    assert!(fx.session.host().has_class(body, "mobile-view"));
    assert!(!fx.session.host().has_class(body, "desktop-view"));
}

#[test]
fn breakpoint_width_is_desktop() {
    let fx = mounted(MemoryHost::new().with_viewport_width(768.0));
    let body = fx.session.host().body();
    assert!(fx.session.host().has_class(body, "desktop-view"));
    assert!(!fx.session.host().has_class(body, "mobile-view"));
}

// =============================================================
// Navigation
// =============================================================

#[test]
fn nav_links_get_staggered_delays() {
    let fx = mounted(MemoryHost::new());
    let delays: Vec<Option<&str>> =
        fx.links.iter().map(|l| fx.session.host().style(*l, "transition-delay")).collect();
    assert_eq!(delays, vec![Some("0ms"), Some("100ms"), Some("200ms")]);
}

#[test]
fn clicking_a_link_marks_only_that_link() {
    let mut fx = mounted(MemoryHost::new());
    for clicked in [1, 2, 0, 0] {
        assert!(fx.session.click(fx.links[clicked]).is_ok());
        let active: Vec<usize> =
            (0..fx.links.len()).filter(|i| fx.session.host().has_class(fx.links[*i], "active")).collect();
        assert_eq!(active, vec![clicked]);
    }
}

#[test]
fn nav_clicks_suppress_navigation() {
    let mut fx = mounted(MemoryHost::new());
    assert!(fx.session.click(fx.links[0]).is_ok());
    assert!(fx.session.click(fx.links[2]).is_ok());
    assert_eq!(fx.session.host().prevented_defaults(), 2);
}

#[test]
fn links_added_after_mount_are_not_wired() {
    let mut fx = mounted(MemoryHost::new());
    let late = fx.session.host_mut().append_text(fx.nav, "a", &["nav-link"], "Late");
    assert!(fx.session.click(late).is_ok());
    assert!(!fx.session.host().has_class(late, "active"));
    assert_eq!(fx.session.page().nav_links().len(), 3);
}

#[test]
fn unknown_nav_index_is_ignored() {
    let mut fx = mounted(MemoryHost::new());
    assert!(fx.session.dispatch(PageEvent::NavLinkClicked(42)).is_ok());
}

// =============================================================
// Product cards
// =============================================================

#[test]
fn cards_get_sequential_ids_and_badges() {
    let fx = mounted(MemoryHost::new());
    let host = fx.session.host();
    for (index, card) in fx.cards.iter().enumerate() {
        let position = (index + 1).to_string();
        assert_eq!(host.attribute(*card, "data-product-id"), Some(position.clone()));
        assert_eq!(host.style(*card, "position"), Some("relative"));
        let badge = host.children(*card).last().copied();
        let Some(badge) = badge else {
            panic!("card {index} has no children");
        };
        assert!(host.has_class(badge, "product-badge"));
        assert_eq!(host.text(badge), Some(format!("#{position}")));
    }
}

#[test]
fn card_click_toggles_expanded() {
    let mut fx = mounted(MemoryHost::new());
    let card = fx.cards[1];
    assert!(fx.session.click(card).is_ok());
    assert!(fx.session.host().has_class(card, "expanded"));
    assert!(fx.session.click(card).is_ok());
    assert!(!fx.session.host().has_class(card, "expanded"));
}

#[test]
fn click_on_card_child_bubbles_to_card() {
    let mut fx = mounted(MemoryHost::new());
    assert!(fx.session.click(fx.titles[0]).is_ok());
    assert!(fx.session.host().has_class(fx.cards[0], "expanded"));
}

#[test]
fn notification_expires_after_three_seconds() {
    let mut fx = mounted(MemoryHost::new());
    assert!(fx.session.click(fx.cards[0]).is_ok());
    let shown = notifications(&fx);
    assert_eq!(shown.len(), 1);
    assert_eq!(fx.session.host().text(shown[0]).as_deref(), Some("You viewed: Cloud Hosting"));

    assert!(fx.session.advance(Duration::from_millis(2999)).is_ok());
    assert_eq!(notifications(&fx).len(), 1);
    assert!(fx.session.advance(Duration::from_millis(1)).is_ok());
    assert!(notifications(&fx).is_empty());
    assert_eq!(fx.session.page().notifications().count(), 0);
}

#[test]
fn overlapping_notifications_expire_independently() {
    let mut fx = mounted(MemoryHost::new());
    assert!(fx.session.click(fx.cards[0]).is_ok());
    assert!(fx.session.advance(Duration::from_millis(1000)).is_ok());
    assert!(fx.session.click(fx.cards[0]).is_ok());
    assert!(fx.session.click(fx.cards[2]).is_ok());
    assert_eq!(notifications(&fx).len(), 3);
    assert_eq!(fx.session.host().pending_tasks(), 3);

    assert!(fx.session.advance(Duration::from_millis(2000)).is_ok());
    let left = notifications(&fx);
    assert_eq!(left.len(), 2);
    assert_eq!(fx.session.host().text(left[1]).as_deref(), Some("You viewed: Network Audit"));

    assert!(fx.session.advance(Duration::from_millis(1000)).is_ok());
    assert!(notifications(&fx).is_empty());
}

#[test]
fn notification_reads_title_at_click_time() {
    let mut fx = mounted(MemoryHost::new());
    fx.session.host_mut().set_text(fx.titles[1], "Backup Pro");
    assert!(fx.session.click(fx.cards[1]).is_ok());
    let shown = notifications(&fx);
    assert_eq!(fx.session.host().text(shown[0]).as_deref(), Some("You viewed: Backup Pro"));
}

#[test]
fn card_without_title_still_expands() {
    let mut host = MemoryHost::new();
    let body = host.body();
    let card = host.append(body, "div", &["card"]);
    let header = host.append(body, "header", &["header"]);
    host.append(header, "button", &["mobile-menu-btn"]);
    host.append(header, "nav", &["nav"]);
    let mut session = Session::new(PageConfig::default(), host);
    assert!(session.mount().is_ok());
    assert!(session.click(card).is_ok());
    assert!(session.host().has_class(card, "expanded"));
    assert!(session.host().select(".notification").is_none());
    assert_eq!(session.host().pending_tasks(), 0);
}

#[test]
fn notification_removed_early_expires_quietly() {
    let mut fx = mounted(MemoryHost::new());
    assert!(fx.session.click(fx.cards[0]).is_ok());
    let shown = notifications(&fx);
    assert!(fx.session.host_mut().apply(Patch::Remove { node: shown[0] }).is_ok());
    assert!(fx.session.advance(Duration::from_millis(3000)).is_ok());
}

#[test]
fn accent_color_is_trimmed_and_applied() {
    let fx = mounted(MemoryHost::new().with_custom_property("--primary-color", "  #3498db "));
    let host = fx.session.host();
    let badge = host.select(".product-badge");
    assert!(badge.is_some_and(|b| host.style(b, "background-color") == Some("#3498db")));
}

// =============================================================
// Theme
// =============================================================

#[test]
fn exactly_one_theme_toggle_is_injected() {
    let fx = mounted(MemoryHost::new());
    let buttons = fx.session.host().select_all(".theme-toggle");
    assert_eq!(buttons.len(), 1);
    assert_eq!(fx.session.page().theme_toggle(), buttons.first().copied());
}

#[test]
fn theme_toggle_is_an_involution() {
    let mut fx = mounted(MemoryHost::new());
    let Some(button) = fx.session.page().theme_toggle() else {
        panic!("theme toggle missing");
    };
    let body = fx.session.host().body();

    assert!(fx.session.click(button).is_ok());
    assert_eq!(fx.session.host().attribute(body, "data-theme").as_deref(), Some("dark"));
    assert_eq!(fx.session.host().stored("theme"), Some("dark"));
    assert_eq!(fx.session.page().theme(fx.session.host()), Theme::Dark);

    assert!(fx.session.click(button).is_ok());
    assert_eq!(fx.session.host().attribute(body, "data-theme"), None);
    assert_eq!(fx.session.host().stored("theme"), Some("light"));
}

#[test]
fn stored_dark_theme_applies_on_content_loaded() {
    let mut fx = mounted(MemoryHost::new().with_stored("theme", "dark"));
    let body = fx.session.host().body();
    assert_eq!(fx.session.host().attribute(body, "data-theme"), None);
    assert!(fx.session.finish_loading().is_ok());
    assert_eq!(fx.session.host().attribute(body, "data-theme").as_deref(), Some("dark"));
}

#[test]
fn stored_dark_theme_applies_immediately_when_already_loaded() {
    let fx = mounted(MemoryHost::new().with_stored("theme", "dark").already_loaded());
    let body = fx.session.host().body();
    assert_eq!(fx.session.host().attribute(body, "data-theme").as_deref(), Some("dark"));
    assert!(fx.session.host().listeners().iter().all(|l| l.event != PageEvent::ContentLoaded));
}

#[test]
fn stored_light_theme_leaves_page_alone() {
    let mut fx = mounted(MemoryHost::new().with_stored("theme", "light"));
    assert!(fx.session.finish_loading().is_ok());
    let body = fx.session.host().body();
    assert_eq!(fx.session.host().attribute(body, "data-theme"), None);
}

#[test]
fn failed_preference_write_surfaces_storage_error() {
    let mut fx = mounted(MemoryHost::new());
    fx.session.host_mut().set_storage_writable(false);
    let result = fx.session.dispatch(PageEvent::ThemeToggleClicked);
    assert!(matches!(result, Err(PageError::Storage(_))));
    let body = fx.session.host().body();
    assert_eq!(fx.session.host().attribute(body, "data-theme").as_deref(), Some("dark"));
}

#[test]
fn dark_stylesheet_is_injected_into_head_once() {
    let fx = mounted(MemoryHost::new());
    let host = fx.session.host();
    let styles = host.select_all("head style");
    assert_eq!(styles.len(), 1);
    assert!(host.text(styles[0]).is_some_and(|css| css.contains("--primary-color: #27ae60")));
}

// =============================================================
// Scrolling
// =============================================================

#[test]
fn header_emphasis_tracks_offset() {
    let mut fx = mounted(MemoryHost::new());
    assert!(fx.session.scroll(49.0).is_ok());
    assert_eq!(fx.session.host().style(fx.header, "box-shadow"), None);

    assert!(fx.session.scroll(51.0).is_ok());
    assert_eq!(fx.session.host().style(fx.header, "box-shadow"), Some("0 4px 10px rgba(0,0,0,0.2)"));
    assert_eq!(fx.session.host().style(fx.header, "background-color"), Some("#1a252f"));

    assert!(fx.session.scroll(50.0).is_ok());
    assert_eq!(fx.session.host().style(fx.header, "box-shadow"), None);
    assert_eq!(fx.session.host().style(fx.header, "background-color"), None);
}

#[test]
fn back_to_top_visibility_follows_offset() {
    let mut fx = mounted(MemoryHost::new());
    let Some(button) = fx.session.page().back_to_top() else {
        panic!("back-to-top missing");
    };
    assert_eq!(fx.session.host().style(button, "display"), Some("none"));

    assert!(fx.session.scroll(301.0).is_ok());
    assert_eq!(fx.session.host().style(button, "display"), Some("block"));
    assert!(fx.session.scroll(300.0).is_ok());
    assert_eq!(fx.session.host().style(button, "display"), Some("none"));
}

#[test]
fn back_to_top_click_requests_one_smooth_scroll() {
    let mut fx = mounted(MemoryHost::new());
    let Some(button) = fx.session.page().back_to_top() else {
        panic!("back-to-top missing");
    };
    assert!(fx.session.scroll(900.0).is_ok());
    assert!(fx.session.click(button).is_ok());
    assert_eq!(fx.session.host().smooth_scroll_requests(), 1);
    assert!(fx.session.host().scroll_y().abs() < f64::EPSILON);
}

// =============================================================
// Mobile menu / preconditions
// =============================================================

#[test]
fn mobile_menu_toggles_nav() {
    let mut fx = mounted(MemoryHost::new());
    assert!(fx.session.click(fx.menu_button).is_ok());
    assert!(fx.session.host().has_class(fx.nav, "active"));
    assert!(fx.session.click(fx.menu_button).is_ok());
    assert!(!fx.session.host().has_class(fx.nav, "active"));
}

#[test]
fn missing_header_leaves_page_untouched() {
    let mut host = MemoryHost::new().with_stored("theme", "dark").already_loaded();
    let body = host.body();
    host.append(body, "button", &["mobile-menu-btn"]);
    let link = host.append(body, "a", &["nav-link"]);
    let card = host.append(body, "div", &["card"]);
    let mut session = Session::new(PageConfig::default(), host);
    let result = session.mount();
    assert!(matches!(result, Err(PageError::MissingElement { ref selector }) if selector == ".header"));
    let host = session.host();
    assert!(host.listeners().is_empty());
    assert!(!host.has_class(body, "desktop-view"));
    assert_eq!(host.style(link, "transition-delay"), None);
    assert_eq!(host.attribute(card, "data-product-id"), None);
    assert_eq!(host.attribute(body, "data-theme"), None);
    assert!(host.select(".theme-toggle").is_none());
    assert!(host.select(".back-to-top").is_none());
    assert!(host.select("head style").is_none());
}

#[test]
fn missing_mobile_menu_button_is_reported_before_any_change() {
    let mut host = MemoryHost::new();
    let body = host.body();
    host.append(body, "header", &["header"]);
    host.append(body, "nav", &["nav"]);
    let mut session = Session::new(PageConfig::default(), host);
    let result = session.mount();
    assert!(matches!(result, Err(PageError::MissingElement { ref selector }) if selector == ".mobile-menu-btn"));
    assert!(session.page().theme_toggle().is_none());
    assert!(session.host().select("head style").is_none());
}

#[test]
fn missing_nav_container_only_disables_menu_toggle() {
    let mut host = MemoryHost::new();
    let body = host.body();
    let header = host.append(body, "header", &["header"]);
    let button = host.append(header, "button", &["mobile-menu-btn"]);
    let mut session = Session::new(PageConfig::default(), host);
    assert!(session.mount().is_ok());
    assert!(session.host().select("head style").is_some());
    assert!(session.click(button).is_ok());

    let nav = session.host_mut().append(header, "nav", &["nav"]);
    assert!(session.click(button).is_ok());
    assert!(session.host().has_class(nav, "active"));
}
