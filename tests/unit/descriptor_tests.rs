// Descriptor construction, access and signature tests

use rstest::rstest;
use transform_url::descriptor::{DescriptorError, Options, Value};
use transform_url::{Attributes, Descriptor, Field};

fn standard_attributes() -> Attributes {
    Attributes::new()
        .with("uid", "ahaha")
        .with("processing_method", "round")
        .with("format", "gif")
        .with("processing_options", Value::map([("radius", 5), ("blur", 2)]))
        .with("encoding", Value::map([("flumps_per_minute", 56)]))
        .with("default", "default_image.png")
}

fn standard() -> Descriptor {
    Descriptor::new(standard_attributes()).expect("valid descriptor")
}

#[test]
fn test_unknown_attribute_fails_construction() {
    let result = Descriptor::new(Attributes::new().with("fridge", "cold"));
    assert!(matches!(
        result,
        Err(DescriptorError::UnknownAttribute { names }) if names == "fridge"
    ));
}

#[test]
fn test_all_unknown_attributes_are_reported() {
    let result = Descriptor::new(
        Attributes::new()
            .with("fridge", "cold")
            .with("oven", "hot")
            .with("uid", "a"),
    );
    let err = result.unwrap_err();
    assert_eq!(err, DescriptorError::unknown_attribute("fridge, oven"));
}

#[test]
fn test_get_set_restricted_to_known_fields() {
    let mut descriptor = standard();
    assert_eq!(descriptor.get("format").unwrap(), Some(Value::from("gif")));
    assert!(matches!(
        descriptor.get("sha"),
        Err(DescriptorError::UnknownAttribute { .. })
    ));
    assert!(matches!(
        descriptor.set("sha", Some(Value::from("x"))),
        Err(DescriptorError::UnknownAttribute { .. })
    ));
    descriptor.set("format", None).unwrap();
    assert_eq!(descriptor.format, None);
}

#[test]
fn test_signature_ignores_insertion_order() {
    let mut forward = Options::new();
    forward.insert("a".to_string(), Value::from("1"));
    forward.insert("b".to_string(), Value::from("2"));
    let backward: Options = [("b", "2"), ("a", "1")]
        .into_iter()
        .map(|(k, v)| (k.to_string(), Value::from(v)))
        .collect();

    let one = Descriptor {
        uid: Some("x".to_string()),
        processing_options: forward,
        ..Default::default()
    };
    let two = Descriptor {
        uid: Some("x".to_string()),
        processing_options: backward,
        ..Default::default()
    };
    assert_eq!(one.signature("secret", 16), two.signature("secret", 16));
}

#[test]
fn test_signature_is_stable_for_equal_descriptors() {
    assert_eq!(
        standard().signature("secret", 16),
        standard().signature("secret", 16)
    );
}

#[rstest]
#[case::uid(Field::Uid, Value::from("different yo"))]
#[case::format(Field::Format, Value::from("tif"))]
#[case::processing_method(Field::ProcessingMethod, Value::from("doogie"))]
#[case::default(Field::Default, Value::from("other.png"))]
#[case::option_value(Field::ProcessingOptions, Value::map([("radius", 6), ("blur", 2)]))]
#[case::option_key(Field::ProcessingOptions, Value::map([("radius", 5), ("slumdog", 2)]))]
#[case::encoding_value(Field::Encoding, Value::map([("flumps_per_minute", 50.3)]))]
#[case::encoding_key(Field::Encoding, Value::map([("bit_rate", 56)]))]
fn test_signature_changes_with_any_field(#[case] field: Field, #[case] value: Value) {
    let original = standard();
    let mut changed = standard();
    changed.set_field(field, Some(value)).unwrap();

    assert_ne!(
        original.signature("secret", 16),
        changed.signature("secret", 16)
    );
    assert_ne!(original.cache_key(), changed.cache_key());
}

#[test]
fn test_signature_distinguishes_missing_from_empty() {
    let missing = Descriptor {
        uid: Some("x".to_string()),
        ..Default::default()
    };
    let empty = Descriptor {
        uid: Some("x".to_string()),
        default: Some(String::new()),
        ..Default::default()
    };
    assert_ne!(missing.signature("s", 16), empty.signature("s", 16));
}

#[test]
fn test_to_attributes_has_all_six_fields() {
    let attributes = standard().to_attributes();
    for field in Field::ALL {
        assert!(attributes.contains(field.as_str()), "missing {}", field);
    }
    assert_eq!(attributes, standard_attributes());
}
