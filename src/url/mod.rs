//! Descriptor URLs
//!
//! Encodes a [`Descriptor`] as a URL and decodes it back:
//!
//! ```text
//! <prefix>/<escaped uid>[.<format>]?m=<method>&o[<key>]=<val>&e[<key>]=<val>&d=<default>&s=<signature>
//! ```
//!
//! The uid and format travel in the path; every other field travels in the
//! query under a one-letter key and is left out when blank.
//!
//! # Security
//!
//! With `protect_from_tampering` on, every URL carries a signature over the
//! whole descriptor and decoding refuses URLs whose signature is missing or
//! wrong.

pub mod config;
pub mod error;
pub mod query;
pub mod signing;

use crate::constants::{
    DEFAULT_KEY, ENCODING_KEY, PROCESSING_METHOD_KEY, PROCESSING_OPTIONS_KEY, SIGNATURE_KEY,
};
use crate::descriptor::{Attributes, Descriptor, Field, Value};
use crate::shortcuts::{DescriptorArgs, SharedRegistry};

pub use config::CodecConfig;
pub use error::UrlError;

/// Query-carried fields, in URL order
const QUERY_FIELDS: [(Field, &str); 4] = [
    (Field::ProcessingMethod, PROCESSING_METHOD_KEY),
    (Field::ProcessingOptions, PROCESSING_OPTIONS_KEY),
    (Field::Encoding, ENCODING_KEY),
    (Field::Default, DEFAULT_KEY),
];

#[derive(Debug, Clone)]
pub struct UrlCodec {
    config: CodecConfig,
    registry: SharedRegistry,
}

impl UrlCodec {
    /// Build a codec, refusing settings that would weaken signatures
    pub fn new(
        config: CodecConfig,
        registry: impl Into<SharedRegistry>,
    ) -> Result<Self, UrlError> {
        config.validate().map_err(UrlError::InvalidConfig)?;
        Ok(Self {
            config,
            registry: registry.into(),
        })
    }

    pub fn config(&self) -> &CodecConfig {
        &self.config
    }

    pub fn registry(&self) -> &SharedRegistry {
        &self.registry
    }

    /// Build the URL for `uid` from any call shape the registry accepts
    pub fn url_for(&self, uid: &str, args: impl Into<DescriptorArgs>) -> Result<String, UrlError> {
        let mut descriptor = self.registry.load().from_call_style(args)?;
        descriptor.uid = Some(uid.to_string());
        self.encode(&descriptor)
    }

    pub fn encode(&self, descriptor: &Descriptor) -> Result<String, UrlError> {
        let uid = descriptor.uid.as_deref().ok_or(UrlError::MissingUid)?;

        let mut pairs: Vec<String> = QUERY_FIELDS
            .iter()
            .filter_map(|(field, key)| {
                descriptor
                    .field(*field)
                    .filter(|value| !value.is_blank())
                    .map(|value| query::build_query(&value, key))
            })
            .collect();

        if self.config.protect_from_tampering {
            let signature = signing::sign(descriptor, &self.config);
            pairs.push(format!("{}={}", SIGNATURE_KEY, signature));
        }

        let mut url = format!(
            "{}/{}",
            self.config.path_prefix,
            query::escape_except_for_slashes(uid)
        );
        if let Some(format) = &descriptor.format {
            url.push('.');
            url.push_str(&query::escape(format));
        }
        if !pairs.is_empty() {
            url.push('?');
            url.push_str(&pairs.join("&"));
        }

        tracing::debug!(uid = %uid, url = %url, "Encoded descriptor URL");
        Ok(url)
    }

    /// Decode a request target (`path?query`)
    pub fn decode_url(&self, url: &str) -> Result<Descriptor, UrlError> {
        let (path, query_string) = url.split_once('?').unwrap_or((url, ""));
        self.decode(path, query_string)
    }

    pub fn decode(&self, path: &str, query_string: &str) -> Result<Descriptor, UrlError> {
        let path = query::unescape(path);
        let relative = self
            .strip_path_prefix(&path)
            .ok_or_else(|| UrlError::UnknownUrl { path: path.clone() })?;
        let (uid, format) = split_format(relative);

        let mut query = query::parse_nested_query(query_string)?;

        let mut attributes = Attributes::new().with(Field::Uid, uid);
        if let Some(format) = format {
            attributes.insert(Field::Format, Some(Value::from(format)));
        }
        for (field, key) in QUERY_FIELDS {
            if let Some(value) = query.remove(key) {
                attributes.insert(field, Some(value));
            }
        }
        let descriptor = Descriptor::new(attributes)?;

        if self.config.protect_from_tampering {
            let signature = query.get(SIGNATURE_KEY).map(|value| value.as_text().unwrap_or_default());
            if let Err(err) = signing::verify(signature, &descriptor, &self.config) {
                tracing::warn!(path = %path, error = %err, "Rejected descriptor URL");
                return Err(err);
            }
        }

        tracing::debug!(path = %path, "Decoded descriptor URL");
        Ok(descriptor)
    }

    // `<prefix>/` followed by at least one non-dot character
    fn strip_path_prefix<'a>(&self, path: &'a str) -> Option<&'a str> {
        let relative = path
            .strip_prefix(self.config.path_prefix.as_str())?
            .strip_prefix('/')?;
        match relative.chars().next() {
            Some(first) if first != '.' => Some(relative),
            _ => None,
        }
    }
}

/// Split `dir/name.ext` into `("dir/name", Some("ext"))`. Only a dot in the
/// final segment starts a format.
///
/// The path cannot tell a format apart from a dot inside the uid, so a
/// format-less uid such as `notes/file.txt` decodes as uid `notes/file`
/// with format `txt`.
fn split_format(path: &str) -> (&str, Option<&str>) {
    let last_segment_start = path.rfind('/').map_or(0, |slash| slash + 1);
    match path[last_segment_start..].rfind('.') {
        Some(dot) => {
            let dot = last_segment_start + dot;
            let format = &path[dot + 1..];
            if format.is_empty() {
                (path, None)
            } else {
                (&path[..dot], Some(format))
            }
        }
        None => (path, None),
    }
}
