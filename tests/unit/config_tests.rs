// Configuration loading and end-to-end wiring tests

use std::io::Write;
use std::sync::Arc;

use tempfile::NamedTempFile;
use transform_url::attachment::{AttachmentRegistry, AttachmentValue};
use transform_url::config::{Config, ConfigError};
use transform_url::url::UrlError;
use transform_url::{Descriptor, DescriptorArgs, SharedRegistry, ShortcutArg, UrlCodec};

const MEDIA_CONFIG: &str = r#"
url:
  protect_from_tampering: true
  secret: "${TRANSFORM_URL_IT_SECRET}"
  signature_length: 12
  path_prefix: "/media"
defaults:
  format: jpg
  encoding:
    quality: 85
shortcuts:
  thumb:
    processing_method: resize
    processing_options:
      geometry: "100x100#"
  original:
    encoding: {}
    format: ~
"#;

fn write_config(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

fn media_codec() -> (Arc<UrlCodec>, SharedRegistry) {
    std::env::set_var("TRANSFORM_URL_IT_SECRET", "integration-secret");
    let file = write_config(MEDIA_CONFIG);
    let config = Config::from_file(file.path()).unwrap();
    let registry = SharedRegistry::new(config.build_registry());
    let codec = config.build_codec(registry.clone()).unwrap();
    (codec, registry)
}

#[test]
fn test_loaded_config_drives_codec() {
    let (codec, _) = media_codec();

    assert_eq!(codec.config().secret, "integration-secret");
    assert_eq!(codec.config().signature_length, 12);

    let url = codec.url_for("cats/tom", ShortcutArg::symbol("thumb")).unwrap();
    assert!(url.starts_with("/media/cats/tom.jpg?m=resize&o[geometry]=100x100%23&e[quality]=85&s="));

    let signature = url.rsplit("s=").next().unwrap();
    assert_eq!(signature.len(), 12);

    let descriptor = codec.decode_url(&url).unwrap();
    assert_eq!(descriptor.uid.as_deref(), Some("cats/tom"));
    assert_eq!(descriptor.processing_method.as_deref(), Some("resize"));
}

#[test]
fn test_shortcut_with_explicit_null_format() {
    let (codec, _) = media_codec();
    let url = codec.url_for("cats/tom", ShortcutArg::symbol("original")).unwrap();
    assert!(url.starts_with("/media/cats/tom?s="));
}

#[test]
fn test_unknown_shortcut_name() {
    let (codec, _) = media_codec();
    let result = codec.url_for("cats/tom", ShortcutArg::symbol("poster"));
    assert!(matches!(result, Err(UrlError::Shortcut(_))));
}

#[test]
fn test_invalid_config_is_rejected_before_building() {
    let file = write_config("url:\n  signature_length: 100\n");
    let config = Config::from_file(file.path()).unwrap();
    let result = config.build_codec(SharedRegistry::default());
    assert!(matches!(result, Err(ConfigError::Invalid(_))));
}

#[test]
fn test_malformed_yaml_is_parse_error() {
    let file = write_config("url: [unclosed\n");
    assert!(matches!(
        Config::from_file(file.path()),
        Err(ConfigError::Parse(_))
    ));
}

#[test]
fn test_attachment_flow() {
    let (codec, _) = media_codec();

    let mut attachments = AttachmentRegistry::new();
    attachments.register("avatar", Arc::clone(&codec), Some("defaults/avatar".to_string()));
    attachments.register("cover", Arc::clone(&codec), None);

    let mut avatar = attachments.attachment_for("avatar").unwrap();
    let fallback = avatar.to_value().unwrap();
    assert_eq!(fallback.uid(), "defaults/avatar");

    avatar.assign(Some("users/7/me".to_string()));
    let assigned = avatar.to_value().unwrap();
    assert_eq!(assigned.uid(), "users/7/me");
    let url = assigned.url(ShortcutArg::symbol("thumb")).unwrap();
    assert!(url.starts_with("/media/users/7/me.jpg?"));
    assert_eq!(codec.decode_url(&url).unwrap().uid.as_deref(), Some("users/7/me"));

    let cover = attachments.attachment_for("cover").unwrap();
    assert!(cover.to_value().is_none());
    assert!(attachments.attachment_for("banner").is_none());
}

#[test]
fn test_inherited_attachment_table_is_independent() {
    let (codec, _) = media_codec();

    let mut base = AttachmentRegistry::new();
    base.register("avatar", Arc::clone(&codec), None);

    let mut derived = base.inherit();
    derived.register("cover", codec, None);

    assert_eq!(derived.attributes().collect::<Vec<_>>(), vec!["avatar", "cover"]);
    assert_eq!(base.attributes().collect::<Vec<_>>(), vec!["avatar"]);
}

#[test]
fn test_registry_reload_reaches_existing_codec() {
    let (codec, registry) = media_codec();
    assert!(codec.url_for("a", ShortcutArg::symbol("poster")).is_err());

    let reloaded = Config::from_yaml_with_env(
        "shortcuts:\n  poster:\n    format: webp\n",
    )
    .unwrap();
    registry.reconfigure(reloaded.build_registry());

    let url = codec
        .url_for("a", DescriptorArgs::shortcut([ShortcutArg::symbol("poster")]))
        .unwrap();
    let expected = Descriptor {
        uid: Some("a".to_string()),
        format: Some("webp".to_string()),
        ..Default::default()
    };
    assert_eq!(url, codec.encode(&expected).unwrap());
    assert_eq!(codec.decode_url(&url).unwrap(), expected);
}
