// Shortcut resolution and call-style tests

use std::sync::Arc;
use std::thread;

use transform_url::descriptor::options;
use transform_url::shortcuts::{ArgKind, Defaults, ShortcutError};
use transform_url::{
    Attributes, Descriptor, DescriptorArgs, DescriptorRegistry, Matcher, SharedRegistry,
    ShortcutArg, Value,
};

fn configured_defaults() -> Defaults {
    Defaults {
        processing_method: Some("resize".to_string()),
        processing_options: options([("scale", "0.5")]),
        format: Some("png".to_string()),
        encoding: options([("bit_rate", 24)]),
        default: Some("default_image.png".to_string()),
    }
}

#[test]
fn test_named_shortcut_merged_over_defaults() {
    let mut registry = DescriptorRegistry::new();
    registry.set_defaults(configured_defaults());
    let stored = Attributes::new()
        .with("processing_method", "thumb")
        .with("processing_options", Value::map([("geometry", "100x100#")]));
    registry.register_named("thumb", stored.clone());

    let descriptor = registry
        .resolve_with_defaults(&[ShortcutArg::symbol("thumb")])
        .unwrap();

    let expected = Descriptor::new(stored.merged_over(configured_defaults().to_attributes())).unwrap();
    assert_eq!(descriptor, expected);
    assert_eq!(descriptor.processing_method.as_deref(), Some("thumb"));
    assert_eq!(descriptor.format.as_deref(), Some("png"));
    assert_eq!(descriptor.encoding["bit_rate"], Value::from("24"));
}

#[test]
fn test_named_shortcut_returns_a_copy() {
    let mut registry = DescriptorRegistry::new();
    registry.register_named("thumb", Attributes::new().with("format", "jpg"));

    let mut resolved = registry.resolve(&[ShortcutArg::from("thumb")]).unwrap();
    resolved.insert("format", None);

    assert_eq!(
        registry.named_shortcut("thumb"),
        Some(&Attributes::new().with("format", "jpg"))
    );
}

#[test]
fn test_named_lookup_needs_a_single_argument() {
    let mut registry = DescriptorRegistry::new();
    registry.register_named("thumb", Attributes::new());

    let result = registry.resolve(&[ShortcutArg::symbol("thumb"), ShortcutArg::symbol("thumb")]);
    assert!(matches!(result, Err(ShortcutError::InvalidShortcut { .. })));
}

#[test]
fn test_later_registration_wins_on_equal_arity() {
    let mut registry = DescriptorRegistry::new();
    registry.register_pattern(vec![Matcher::TypeOf(ArgKind::Integer)], |_, _| {
        Attributes::new().with("processing_method", "first")
    });
    registry.register_pattern(vec![Matcher::Literal(ShortcutArg::from(300))], |_, _| {
        Attributes::new().with("processing_method", "second")
    });

    let winner = registry.resolve(&[ShortcutArg::from(300)]).unwrap();
    assert_eq!(winner, Attributes::new().with("processing_method", "second"));

    // The earlier shortcut still serves arguments the later one does not cover
    let fallback = registry.resolve(&[ShortcutArg::from(42)]).unwrap();
    assert_eq!(fallback, Attributes::new().with("processing_method", "first"));
}

#[test]
fn test_different_arities_do_not_compete() {
    let mut registry = DescriptorRegistry::new();
    registry.register_pattern(vec![Matcher::pattern(".*").unwrap()], |_, _| {
        Attributes::new().with("processing_method", "one")
    });
    registry.register_pattern(
        vec![Matcher::pattern(".*").unwrap(), Matcher::pattern(".*").unwrap()],
        |_, _| Attributes::new().with("processing_method", "two"),
    );

    let one = registry.resolve(&[ShortcutArg::from("a")]).unwrap();
    let two = registry
        .resolve(&[ShortcutArg::from("a"), ShortcutArg::from("b")])
        .unwrap();
    assert_eq!(one, Attributes::new().with("processing_method", "one"));
    assert_eq!(two, Attributes::new().with("processing_method", "two"));
}

#[test]
fn test_single_pattern_capture_group() {
    let mut registry = DescriptorRegistry::new();
    registry.register_pattern(
        vec![Matcher::pattern("^hello(.*)$").unwrap()],
        |_, captures| {
            let group = captures
                .and_then(|c| c.get(1))
                .map(|m| m.as_str())
                .unwrap_or("");
            Attributes::new().with("processing_method", group)
        },
    );

    let attributes = registry.resolve(&[ShortcutArg::from("hellothere")]).unwrap();
    assert_eq!(attributes, Attributes::new().with("processing_method", "there"));
}

#[test]
fn test_geometry_style_shortcut() {
    let mut registry = DescriptorRegistry::new();
    registry.register_pattern(
        vec![
            Matcher::pattern(r"^\d*x\d*[#!]?$").unwrap(),
            Matcher::TypeOf(ArgKind::Symbol),
        ],
        |args, _| {
            Attributes::new()
                .with("processing_method", "resize")
                .with("processing_options", Value::map([("geometry", args[0].to_value())]))
                .with("format", args[1].to_value())
        },
    );

    let descriptor = registry
        .from_call_style(vec![ShortcutArg::from("300x200#"), ShortcutArg::symbol("jpg")])
        .unwrap();
    assert_eq!(descriptor.processing_method.as_deref(), Some("resize"));
    assert_eq!(
        descriptor.processing_options["geometry"],
        Value::from("300x200#")
    );
    assert_eq!(descriptor.format.as_deref(), Some("jpg"));
}

#[test]
fn test_from_call_style_empty_equals_empty_map() {
    let mut registry = DescriptorRegistry::new();
    registry.set_defaults(configured_defaults());

    let no_args = registry.from_call_style(DescriptorArgs::Empty).unwrap();
    let empty_map = registry.from_call_style(Attributes::new()).unwrap();
    assert_eq!(no_args, empty_map);
}

#[test]
fn test_from_call_style_empty_matches_bare_descriptor_only_without_defaults() {
    let bare = Descriptor::new(Attributes::new()).unwrap();

    let registry = DescriptorRegistry::new();
    assert_eq!(registry.from_call_style(DescriptorArgs::Empty).unwrap(), bare);

    let mut registry = DescriptorRegistry::new();
    registry.set_defaults(configured_defaults());
    assert_ne!(registry.from_call_style(DescriptorArgs::Empty).unwrap(), bare);
}

#[test]
fn test_from_call_style_keeps_explicit_null_format() {
    let mut registry = DescriptorRegistry::new();
    registry.set_defaults(Defaults {
        format: Some("tif".to_string()),
        ..Default::default()
    });

    let descriptor = registry
        .from_call_style(Attributes::new().with_null("format"))
        .unwrap();
    assert_eq!(descriptor.format, None);

    let defaulted = registry.from_call_style(Attributes::new()).unwrap();
    assert_eq!(defaulted.format.as_deref(), Some("tif"));
}

#[test]
fn test_from_call_style_descriptor_bypasses_defaults() {
    let mut registry = DescriptorRegistry::new();
    registry.set_defaults(configured_defaults());

    let existing = Descriptor::new(Attributes::new().with("uid", "a")).unwrap();
    let copy = registry.from_call_style(existing.clone()).unwrap();
    assert_eq!(copy, existing);
    assert_eq!(copy.processing_method, None);
}

#[test]
fn test_from_call_style_rejects_unknown_attribute() {
    let registry = DescriptorRegistry::new();
    let result = registry.from_call_style(Attributes::new().with("fridge", "cold"));
    assert!(matches!(result, Err(ShortcutError::Descriptor(_))));
}

#[test]
fn test_defaults_do_not_touch_existing_descriptors() {
    let mut registry = DescriptorRegistry::new();
    let before = registry.from_call_style(DescriptorArgs::Empty).unwrap();
    registry.set_defaults(configured_defaults());
    assert_eq!(before.format, None);
}

#[test]
fn test_shared_registry_concurrent_reads() {
    let mut registry = DescriptorRegistry::new();
    registry.register_named("thumb", Attributes::new().with("format", "jpg"));
    let shared = Arc::new(SharedRegistry::new(registry));

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let shared = Arc::clone(&shared);
            thread::spawn(move || {
                shared
                    .load()
                    .resolve_with_defaults(&[ShortcutArg::symbol("thumb")])
                    .unwrap()
            })
        })
        .collect();

    for handle in handles {
        let descriptor = handle.join().unwrap();
        assert_eq!(descriptor.format.as_deref(), Some("jpg"));
    }
}
