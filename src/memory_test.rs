use super::*;
use crate::markup::InlineStyle;

// =============================================================
// Selectors
// =============================================================

fn sample() -> (MemoryHost, NodeId, NodeId, NodeId) {
    let mut host = MemoryHost::new();
    let body = host.body();
    let content = host.append(body, "div", &["content", "wide"]);
    let heading = host.append_text(content, "h1", &[], "Hello");
    let aside = host.append(body, "aside", &[]);
    let other = host.append_text(aside, "h1", &[], "Elsewhere");
    (host, content, heading, other)
}

#[test]
fn selects_by_tag_and_class() {
    let (host, content, heading, other) = sample();
    assert_eq!(host.select_all("h1"), vec![heading, other]);
    assert_eq!(host.select(".content"), Some(content));
    assert_eq!(host.select("div.content.wide"), Some(content));
    assert_eq!(host.select("span.content"), None);
}

#[test]
fn descendant_combinator_requires_ancestor() {
    let (host, _, heading, _) = sample();
    assert_eq!(host.select_all(".content h1"), vec![heading]);
    assert_eq!(host.select_all("body .content h1"), vec![heading]);
    assert!(host.select_all("aside .content h1").is_empty());
}

#[test]
fn selects_by_id() {
    let (mut host, content, _, _) = sample();
    let set = host.apply(Patch::SetAttribute { node: content, name: "id", value: "main".to_owned() });
    assert!(set.is_ok());
    assert_eq!(host.select("#main"), Some(content));
    assert_eq!(host.select("div#main"), Some(content));
}

#[test]
fn text_includes_descendants() {
    let (mut host, content, _, _) = sample();
    host.append_text(content, "p", &[], " world");
    assert_eq!(host.text(content).as_deref(), Some("Hello world"));
}

// =============================================================
// Mutation
// =============================================================

#[test]
fn create_attaches_under_parent() {
    let mut host = MemoryHost::new();
    let spec = ElementSpec::new("style").text("p {}");
    let Ok(style) = host.create(Parent::Head, &spec) else {
        panic!("create failed");
    };
    assert_eq!(host.children(host.head()), vec![style]);
    assert_eq!(host.tag(style), Some("style"));
}

#[test]
fn create_under_unknown_parent_fails() {
    let mut host = MemoryHost::new();
    let result = host.create(Parent::Node(NodeId(999)), &ElementSpec::new("div"));
    assert!(matches!(result, Err(PageError::UnknownNode(NodeId(999)))));
}

#[test]
fn toggle_class_flips() {
    let (mut host, content, _, _) = sample();
    assert!(host.apply(Patch::ToggleClass { node: content, class: "open" }).is_ok());
    assert!(host.has_class(content, "open"));
    assert!(host.apply(Patch::ToggleClass { node: content, class: "open" }).is_ok());
    assert!(!host.has_class(content, "open"));
}

#[test]
fn set_text_replaces_children() {
    let (mut host, content, heading, _) = sample();
    assert!(host.apply(Patch::SetText { node: content, text: "Flat".to_owned() }).is_ok());
    assert!(!host.exists(heading));
    assert_eq!(host.text(content).as_deref(), Some("Flat"));
}

#[test]
fn clear_style_unsets_properties() {
    let (mut host, content, _, _) = sample();
    let style = InlineStyle::new().with("box-shadow", "none").with("color", "red");
    assert!(host.apply(Patch::SetStyle { node: content, style }).is_ok());
    assert!(host.apply(Patch::ClearStyle { node: content, properties: &["box-shadow"] }).is_ok());
    assert_eq!(host.style(content, "box-shadow"), None);
    assert_eq!(host.style(content, "color"), Some("red"));
}

#[test]
fn removed_node_is_unknown() {
    let (mut host, content, heading, _) = sample();
    assert!(host.apply(Patch::Remove { node: content }).is_ok());
    assert!(!host.exists(heading));
    assert!(host.select(".content").is_none());
    assert!(matches!(host.apply(Patch::Remove { node: content }), Err(PageError::UnknownNode(_))));
}

// =============================================================
// Events and clock
// =============================================================

#[test]
fn click_bubbles_to_ancestor_listeners() {
    let (mut host, content, heading, _) = sample();
    assert!(host.subscribe(Listener::click(content, PageEvent::CardClicked(0))).is_ok());
    assert_eq!(host.click(heading), vec![PageEvent::CardClicked(0)]);
}

#[test]
fn advance_releases_due_tasks_in_order() {
    let mut host = MemoryHost::new();
    host.schedule(Duration::from_millis(200), Task::RemoveNotification(NodeId(2)));
    host.schedule(Duration::from_millis(100), Task::RemoveNotification(NodeId(1)));
    assert!(host.advance(Duration::from_millis(99)).is_empty());
    assert_eq!(
        host.advance(Duration::from_millis(150)),
        vec![
            PageEvent::TaskDue(Task::RemoveNotification(NodeId(1))),
            PageEvent::TaskDue(Task::RemoveNotification(NodeId(2))),
        ]
    );
    assert_eq!(host.now(), Duration::from_millis(249));
}

#[test]
fn cancelled_task_never_fires() {
    let mut host = MemoryHost::new();
    let handle = host.schedule(Duration::from_millis(10), Task::RemoveNotification(NodeId(1)));
    assert!(host.cancel(handle));
    assert!(!host.cancel(handle));
    assert!(host.advance(Duration::from_secs(1)).is_empty());
}

#[test]
fn storage_round_trip_and_failure() {
    let mut host = MemoryHost::new();
    assert!(host.storage_set("theme", "dark").is_ok());
    assert!(matches!(host.storage_get("theme"), Ok(Some(ref v)) if v == "dark"));
    host.set_storage_writable(false);
    assert!(matches!(host.storage_set("theme", "light"), Err(PageError::Storage(_))));
    assert_eq!(host.stored("theme"), Some("dark"));
}
