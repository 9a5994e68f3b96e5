//! Transformation descriptors
//!
//! A [`Descriptor`] names a stored resource (`uid`) and how it should be
//! served: a processing method with options, an output format with encoding
//! options, and a fallback value.
//!
//! Field access by name goes through the closed [`Field`] enum; any other
//! name is rejected with [`DescriptorError::UnknownAttribute`].

pub mod attributes;
pub mod error;
pub mod value;

use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::constants::{CACHE_KEY_LENGTH, CACHE_KEY_SALT};

pub use attributes::Attributes;
pub use error::DescriptorError;
pub use value::{options, prune_options, Options, Value};

/// The six descriptor fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Field {
    Uid,
    ProcessingMethod,
    ProcessingOptions,
    Format,
    Encoding,
    Default,
}

impl Field {
    pub const ALL: [Field; 6] = [
        Field::Uid,
        Field::ProcessingMethod,
        Field::ProcessingOptions,
        Field::Format,
        Field::Encoding,
        Field::Default,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Field::Uid => "uid",
            Field::ProcessingMethod => "processing_method",
            Field::ProcessingOptions => "processing_options",
            Field::Format => "format",
            Field::Encoding => "encoding",
            Field::Default => "default",
        }
    }

    /// Whether the field holds an option map rather than text
    pub fn is_map(&self) -> bool {
        matches!(self, Field::ProcessingOptions | Field::Encoding)
    }
}

impl FromStr for Field {
    type Err = DescriptorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Field::ALL
            .into_iter()
            .find(|field| field.as_str() == s)
            .ok_or_else(|| DescriptorError::unknown_attribute(s))
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Field> for String {
    fn from(field: Field) -> Self {
        field.as_str().to_string()
    }
}

/// Structured description of a requested resource transformation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Descriptor {
    pub uid: Option<String>,
    pub processing_method: Option<String>,
    pub processing_options: Options,
    pub format: Option<String>,
    pub encoding: Options,
    pub default: Option<String>,
}

impl Descriptor {
    /// Build a descriptor from a raw attribute map.
    ///
    /// Absent keys keep the field's empty value. Unknown keys are reported
    /// together in a single [`DescriptorError::UnknownAttribute`].
    pub fn new(attributes: Attributes) -> Result<Self, DescriptorError> {
        let unknown: Vec<&str> = attributes
            .iter()
            .map(|(name, _)| name.as_str())
            .filter(|name| name.parse::<Field>().is_err())
            .collect();
        if !unknown.is_empty() {
            return Err(DescriptorError::unknown_attribute(unknown.join(", ")));
        }

        let mut descriptor = Self::default();
        for (name, value) in attributes {
            descriptor.set(&name, value)?;
        }
        Ok(descriptor)
    }

    /// Read a field by name
    pub fn get(&self, name: &str) -> Result<Option<Value>, DescriptorError> {
        Ok(self.field(name.parse()?))
    }

    /// Write a field by name
    pub fn set(&mut self, name: &str, value: Option<Value>) -> Result<(), DescriptorError> {
        self.set_field(name.parse()?, value)
    }

    pub fn field(&self, field: Field) -> Option<Value> {
        match field {
            Field::Uid => self.uid.clone().map(Value::Text),
            Field::ProcessingMethod => self.processing_method.clone().map(Value::Text),
            Field::ProcessingOptions => Some(Value::Map(self.processing_options.clone())),
            Field::Format => self.format.clone().map(Value::Text),
            Field::Encoding => Some(Value::Map(self.encoding.clone())),
            Field::Default => self.default.clone().map(Value::Text),
        }
    }

    /// A null on a map field resets it to empty.
    pub fn set_field(&mut self, field: Field, value: Option<Value>) -> Result<(), DescriptorError> {
        match field {
            Field::Uid => self.uid = text_value(field, value)?,
            Field::ProcessingMethod => self.processing_method = text_value(field, value)?,
            Field::ProcessingOptions => self.processing_options = map_value(field, value)?,
            Field::Format => self.format = text_value(field, value)?,
            Field::Encoding => self.encoding = map_value(field, value)?,
            Field::Default => self.default = text_value(field, value)?,
        }
        Ok(())
    }

    /// All six fields as an attribute map
    pub fn to_attributes(&self) -> Attributes {
        Field::ALL
            .into_iter()
            .map(|field| (field, self.field(field)))
            .collect()
    }

    /// Deterministic digest over the canonical field order plus `secret`,
    /// truncated to `length` hex characters (at most 64).
    pub fn signature(&self, secret: &str, length: usize) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.canonical().as_bytes());
        hasher.update(secret.as_bytes());
        let mut digest = hex::encode(hasher.finalize());
        digest.truncate(length);
        digest
    }

    /// Short signature under a fixed salt, independent of any URL secret
    pub fn cache_key(&self) -> String {
        self.signature(CACHE_KEY_SALT, CACHE_KEY_LENGTH)
    }

    /// Canonical form: `[uid, format, processing_method, options, encoding,
    /// default]` as compact JSON, maps sorted by key.
    fn canonical(&self) -> String {
        let text = |field: &Option<String>| {
            field
                .clone()
                .map_or(serde_json::Value::Null, serde_json::Value::String)
        };
        let map = |options: &Options| {
            serde_json::Value::Object(
                options
                    .iter()
                    .map(|(key, value)| (key.clone(), value.into()))
                    .collect(),
            )
        };

        serde_json::Value::Array(vec![
            text(&self.uid),
            text(&self.format),
            text(&self.processing_method),
            map(&self.processing_options),
            map(&self.encoding),
            text(&self.default),
        ])
        .to_string()
    }
}

impl TryFrom<Attributes> for Descriptor {
    type Error = DescriptorError;

    fn try_from(attributes: Attributes) -> Result<Self, Self::Error> {
        Descriptor::new(attributes)
    }
}

fn text_value(field: Field, value: Option<Value>) -> Result<Option<String>, DescriptorError> {
    match value {
        None => Ok(None),
        Some(Value::Text(text)) => Ok(Some(text)),
        Some(_) => Err(DescriptorError::InvalidAttributeValue {
            field: field.as_str(),
            expected: "text",
        }),
    }
}

// Empty nested containers are pruned so the stored map matches what a URL
// can carry.
fn map_value(field: Field, value: Option<Value>) -> Result<Options, DescriptorError> {
    match value {
        None => Ok(Options::new()),
        Some(Value::Map(map)) => {
            if map.values().any(Value::has_nested_list) {
                return Err(DescriptorError::InvalidAttributeValue {
                    field: field.as_str(),
                    expected: "a map without lists nested directly in lists",
                });
            }
            Ok(prune_options(map))
        }
        Some(_) => Err(DescriptorError::InvalidAttributeValue {
            field: field.as_str(),
            expected: "map",
        }),
    }
}
