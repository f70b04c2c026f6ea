//! Registry and validator properties.

mod common;

use std::sync::Arc;

use common::{init_tracing, FLAG};
use parking_lot::Mutex;
use rivet_stickers::markup::parse_fragment;
use rivet_stickers::{
    SizingMode, StickerConfig, StickerError, StickerRegistry, SvgNode, Validator,
};

const VALID: &[&str] = &[
    r#"<svg><path d="M0 0"/></svg>"#,
    r#"<svg viewBox="0 0 24 24" fill="none"><circle r="3"/></svg>"#,
    r#"<svg aria-hidden="false" width="12" height="12"/>"#,
    "<?xml version=\"1.0\"?>\n<svg xmlns=\"http://www.w3.org/2000/svg\"><g/></svg>\n",
];

#[test]
fn test_defaults_fill_only_absent_attributes() {
    init_tracing();
    let registry = StickerRegistry::default();
    let defaults = registry.validator().defaults().clone();

    for (i, markup) in VALID.iter().enumerate() {
        let name = format!("icon-{i}");
        registry.register(&name, markup).unwrap();
        let stored = registry.get(&name).unwrap();

        let nodes = parse_fragment(markup).unwrap();
        let original = nodes.iter().find_map(SvgNode::as_element).unwrap();

        for (key, value) in original.attributes() {
            assert_eq!(stored.content().attribute(key), Some(value), "{name}: {key}");
        }
        for (key, value) in defaults.iter() {
            if !original.has_attribute(key) {
                assert_eq!(stored.content().attribute(key), Some(value), "{name}: {key}");
            }
        }
        assert_eq!(stored.content().children(), original.children());
    }
}

#[test]
fn test_invalid_input_leaves_registry_unchanged() {
    init_tracing();
    let registry = StickerRegistry::default();
    registry.register("flag", FLAG).unwrap();
    registry.register("heart", FLAG).unwrap();

    let notifications = Arc::new(Mutex::new(0));
    let notifications_clone = notifications.clone();
    let _sub = registry.subscribe(move |_| *notifications_clone.lock() += 1);

    let snapshot = |registry: &StickerRegistry| {
        registry
            .names()
            .into_iter()
            .map(|n| {
                let markup = registry.get(&n).map(|s| s.to_markup());
                (n, markup)
            })
            .collect::<Vec<_>>()
    };
    let before = snapshot(&registry);

    let cases: &[(&str, &str, fn(&StickerError) -> bool)] = &[
        ("", FLAG, |e| matches!(e, StickerError::InvalidName)),
        ("flag", "", |e| matches!(e, StickerError::MalformedContent { .. })),
        ("flag", "<svg/><svg/>", |e| matches!(e, StickerError::MalformedContent { .. })),
        ("flag", "<svg><g></svg>", |e| matches!(e, StickerError::MalformedContent { .. })),
        ("new", "<div><svg/></div>", |e| matches!(e, StickerError::WrongRootType { .. })),
        ("heart", "<path/>", |e| matches!(e, StickerError::WrongRootType { .. })),
    ];

    for (name, markup, is_expected) in cases {
        let err = registry.register(name, markup).unwrap_err();
        assert!(is_expected(&err), "{name:?} / {markup:?} gave {err:?}");
        assert_eq!(snapshot(&registry), before);
    }

    assert!(!registry.contains("new"));
    assert_eq!(registry.revision(), 2);
    assert_eq!(*notifications.lock(), 0);
}

#[test]
fn test_normalization_is_idempotent() {
    for mode in [SizingMode::Fill, SizingMode::Fixed] {
        let validator = Validator::from_config(&StickerConfig::default().with_sizing_mode(mode));
        for markup in VALID {
            let once = validator.validate("icon", markup).unwrap();
            let twice = validator.validate("icon", &once.to_markup()).unwrap();
            assert_eq!(once, twice);
        }
    }
}

#[test]
fn test_error_messages_name_the_sticker() {
    let registry = StickerRegistry::default();
    let err = registry.register("flag", "<div/>").unwrap_err();
    assert_eq!(
        err.to_string(),
        "Rivet Stickers (flag): Content must be a SVG element, found <div>."
    );
    assert_eq!(
        StickerError::InvalidName.to_string(),
        "Rivet Stickers: Name must be a non-empty string."
    );
}

#[test]
fn test_subscriber_added_during_broadcast_waits_for_next() {
    let registry = Arc::new(StickerRegistry::default());
    let late_calls = Arc::new(Mutex::new(0));
    let late_subs = Arc::new(Mutex::new(Vec::new()));

    let weak = Arc::downgrade(&registry);
    let late_calls_clone = late_calls.clone();
    let late_subs_clone = late_subs.clone();
    let _first = registry.subscribe(move |_| {
        let Some(registry) = weak.upgrade() else { return };
        let calls = late_calls_clone.clone();
        let sub = registry.subscribe(move |_| *calls.lock() += 1);
        late_subs_clone.lock().push(sub);
    });

    registry.register("a", FLAG).unwrap();
    assert_eq!(*late_calls.lock(), 0);

    registry.register("b", FLAG).unwrap();
    assert_eq!(*late_calls.lock(), 1);
}

#[test]
fn test_names_follow_registration_order() {
    let registry = StickerRegistry::default();
    for name in ["zeta", "alpha", "mid", "alpha"] {
        registry.register(name, FLAG).unwrap();
    }
    assert_eq!(registry.names(), vec!["zeta", "alpha", "mid"]);
    assert_eq!(registry.manifest().to_json().unwrap(), r#"["zeta","alpha","mid"]"#);
    assert_eq!(
        registry.manifest().sorted().names(),
        ["alpha", "mid", "zeta"]
    );
}
