//! End-to-end tests for registration driving element renders.

mod common;

use common::{Fixture, FLAG, FLAG_RED};
use rivet_stickers::{ElementOptions, ElementState, RenderKey, StickerElement};

#[test]
fn test_registered_before_attach_renders_after_one_boundary() {
    let fx = Fixture::new();
    fx.registry.register("flag", FLAG).unwrap();

    let element = fx.attached("flag");
    assert!(element.output().is_none());

    assert_eq!(fx.clock.advance(), 1);

    let output = element.output().unwrap();
    let stored = fx.registry.get("flag").unwrap();
    assert_eq!(output.content, *stored.content());
    assert_eq!(output.name, "flag");
    assert_eq!(element.rendered_name().as_deref(), Some("flag"));
    assert_eq!(element.state(), ElementState::AttachedIdle);
}

#[test]
fn test_unregistered_name_renders_once_registered() {
    let fx = Fixture::new();
    let element = fx.attached("unregistered");

    fx.clock.advance();
    assert!(element.output().is_none());
    assert_eq!(element.rendered_name(), None);
    assert_eq!(element.update_count(), 1);

    fx.registry.register("unregistered", FLAG).unwrap();
    assert_eq!(element.state(), ElementState::UpdatePending);
    fx.clock.advance();

    assert_eq!(element.rendered_name().as_deref(), Some("unregistered"));
    assert_eq!(element.render_count(), 1);
}

#[test]
fn test_reregistering_rendered_name_keeps_render() {
    let fx = Fixture::new();
    fx.registry.register("flag", FLAG).unwrap();
    let element = fx.attached("flag");
    fx.clock.advance();
    let first = element.output().unwrap();

    fx.registry.register("flag", FLAG_RED).unwrap();
    fx.clock.advance();

    // The update ran but the name was already rendered.
    assert_eq!(element.update_count(), 2);
    assert_eq!(element.render_count(), 1);
    assert_eq!(element.output().unwrap(), first);
    assert_eq!(first.content.attribute("fill"), Some("currentColor"));
}

#[test]
fn test_revision_key_rerenders_replaced_content() {
    let fx = Fixture::new();
    fx.registry.register("flag", FLAG).unwrap();
    let element = fx.element(ElementOptions::default().with_render_key(RenderKey::Revision));
    element.set_attribute("name", "flag");
    element.attach();
    fx.clock.advance();
    assert_eq!(element.rendered_revision(), Some(1));

    fx.registry.register("flag", FLAG_RED).unwrap();
    fx.clock.advance();

    assert_eq!(element.render_count(), 2);
    assert_eq!(element.rendered_revision(), Some(2));
    assert_eq!(element.output().unwrap().content.attribute("fill"), Some("red"));

    // Unrelated registrations do not re-render.
    fx.registry.register("heart", FLAG).unwrap();
    fx.clock.advance();
    assert_eq!(element.render_count(), 2);
}

#[test]
fn test_name_change_switches_render() {
    let fx = Fixture::new();
    fx.registry.register("flag", FLAG).unwrap();
    fx.registry.register("heart", FLAG_RED).unwrap();
    let element = fx.attached("flag");
    fx.clock.advance();

    element.set_attribute("name", "heart");
    fx.clock.advance();

    assert_eq!(element.rendered_name().as_deref(), Some("heart"));
    assert_eq!(element.render_count(), 2);
}

#[test]
fn test_triggers_in_one_window_coalesce() {
    let fx = Fixture::new();
    let element = fx.attached("c");

    element.set_attribute("name", "a");
    fx.registry.register("a", FLAG).unwrap();
    element.set_attribute("name", "b");
    fx.registry.register("b", FLAG).unwrap();
    element.set_attribute("name", "c");
    fx.registry.register("c", FLAG).unwrap();

    assert_eq!(fx.clock.pending_count(), 1);
    fx.clock.advance();

    // One update, reading the state at the boundary.
    assert_eq!(element.update_count(), 1);
    assert_eq!(element.render_count(), 1);
    assert_eq!(element.rendered_name().as_deref(), Some("c"));
}

#[test]
fn test_many_elements_share_one_registry() {
    let fx = Fixture::new();
    let elements: Vec<StickerElement> = ["a", "b", "a"].iter().map(|n| fx.attached(n)).collect();
    fx.clock.advance();

    fx.registry.register("a", FLAG).unwrap();
    fx.clock.advance();

    let rendered: Vec<_> = elements.iter().map(|e| e.rendered_name()).collect();
    assert_eq!(rendered, vec![Some("a".to_string()), None, Some("a".to_string())]);
    assert_eq!(fx.registry.subscriber_count(), 3);
}

#[test]
fn test_detach_with_pending_update_is_safe() {
    let fx = Fixture::new();
    fx.registry.register("flag", FLAG).unwrap();
    let element = fx.attached("flag");

    element.detach();
    assert_eq!(element.state(), ElementState::Detached);
    assert_eq!(fx.clock.pending_count(), 1);

    fx.clock.advance();
    assert!(element.output().is_none());
    assert_eq!(element.render_count(), 0);

    // Notifications after detach reach nothing.
    fx.registry.register("flag", FLAG_RED).unwrap();
    assert!(!fx.clock.has_pending());
}

#[test]
fn test_detach_freezes_output() {
    let fx = Fixture::new();
    fx.registry.register("flag", FLAG).unwrap();
    fx.registry.register("heart", FLAG).unwrap();
    let element = fx.attached("flag");
    fx.clock.advance();
    let before = element.output();

    element.detach();
    element.set_attribute("name", "heart");
    fx.clock.run_until_idle(4);

    assert_eq!(element.output(), before);
    assert_eq!(element.requested_name().as_deref(), Some("heart"));
}

#[test]
fn test_dropped_element_with_pending_update() {
    let fx = Fixture::new();
    fx.registry.register("flag", FLAG).unwrap();
    let element = fx.attached("flag");
    drop(element);

    assert_eq!(fx.registry.subscriber_count(), 0);
    assert_eq!(fx.clock.advance(), 1);
}

#[test]
fn test_reattach_renders_pending_name() {
    let fx = Fixture::new();
    let element = fx.attached("flag");
    fx.clock.advance();
    element.detach();

    fx.registry.register("flag", FLAG).unwrap();
    assert!(!fx.clock.has_pending());

    element.attach();
    fx.clock.advance();
    assert_eq!(element.rendered_name().as_deref(), Some("flag"));
}

#[test]
fn test_element_on_another_thread() {
    let fx = Fixture::new();
    let element = fx.attached("flag");

    let registry = fx.registry.clone();
    std::thread::spawn(move || registry.register("flag", FLAG).unwrap())
        .join()
        .unwrap();

    fx.clock.advance();
    assert_eq!(element.rendered_name().as_deref(), Some("flag"));
}
