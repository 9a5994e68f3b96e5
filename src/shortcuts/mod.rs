//! Shortcut resolution
//!
//! Callers rarely spell out a full attribute map. The registry lets them
//! name a descriptor instead:
//!
//! ```text
//! thumb                 -> named shortcut
//! "300x200#", png       -> pattern shortcut (Pattern, TypeOf(Symbol))
//! ```
//!
//! Pattern shortcuts are grouped by arity and checked most-recent first, so
//! a later registration overrides an earlier one that matches the same
//! arguments.

pub mod error;
pub mod matcher;
pub mod shared;

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use regex::Captures;
use serde::{Deserialize, Serialize};

use crate::descriptor::{Attributes, Descriptor, Field, Options, Value};

pub use error::ShortcutError;
pub use matcher::{ArgKind, Matcher, ShortcutArg};
pub use shared::SharedRegistry;

/// Resolver invoked for a matching pattern shortcut.
///
/// The captures are only provided when the shortcut has a single
/// [`Matcher::Pattern`].
pub type Resolver = Arc<dyn Fn(&[ShortcutArg], Option<&Captures<'_>>) -> Attributes + Send + Sync>;

/// Defaults applied to fields a caller leaves out
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Defaults {
    pub processing_method: Option<String>,
    pub processing_options: Options,
    pub format: Option<String>,
    pub encoding: Options,
    pub default: Option<String>,
}

impl Defaults {
    pub fn is_empty(&self) -> bool {
        *self == Defaults::default()
    }

    pub fn to_attributes(&self) -> Attributes {
        let mut attributes = Attributes::new();
        attributes.insert(Field::ProcessingMethod, self.processing_method.clone().map(Value::Text));
        attributes.insert(Field::ProcessingOptions, Some(Value::Map(self.processing_options.clone())));
        attributes.insert(Field::Format, self.format.clone().map(Value::Text));
        attributes.insert(Field::Encoding, Some(Value::Map(self.encoding.clone())));
        attributes.insert(Field::Default, self.default.clone().map(Value::Text));
        attributes
    }
}

/// The call shapes accepted by [`DescriptorRegistry::from_call_style`]
#[derive(Debug, Clone)]
pub enum DescriptorArgs {
    /// Defaults only
    Empty,
    /// A full attribute map, merged over the defaults
    Attributes(Attributes),
    /// An existing descriptor, copied without defaulting
    Descriptor(Descriptor),
    /// Positional shortcut arguments
    Shortcut(Vec<ShortcutArg>),
}

impl DescriptorArgs {
    pub fn shortcut<A: Into<ShortcutArg>>(args: impl IntoIterator<Item = A>) -> Self {
        DescriptorArgs::Shortcut(args.into_iter().map(Into::into).collect())
    }
}

impl From<Attributes> for DescriptorArgs {
    fn from(attributes: Attributes) -> Self {
        DescriptorArgs::Attributes(attributes)
    }
}

impl From<Descriptor> for DescriptorArgs {
    fn from(descriptor: Descriptor) -> Self {
        DescriptorArgs::Descriptor(descriptor)
    }
}

impl From<ShortcutArg> for DescriptorArgs {
    fn from(arg: ShortcutArg) -> Self {
        DescriptorArgs::Shortcut(vec![arg])
    }
}

impl From<Vec<ShortcutArg>> for DescriptorArgs {
    fn from(args: Vec<ShortcutArg>) -> Self {
        DescriptorArgs::Shortcut(args)
    }
}

#[derive(Clone)]
struct PatternShortcut {
    matchers: Vec<Matcher>,
    resolver: Resolver,
}

impl PatternShortcut {
    fn matches(&self, args: &[ShortcutArg]) -> bool {
        self.matchers.len() == args.len()
            && self
                .matchers
                .iter()
                .zip(args)
                .all(|(matcher, arg)| matcher.covers(arg))
    }

    fn resolve(&self, args: &[ShortcutArg]) -> Attributes {
        let captures = match self.matchers.as_slice() {
            [Matcher::Pattern(regex)] => args
                .first()
                .and_then(ShortcutArg::text)
                .and_then(|text| regex.captures(text)),
            _ => None,
        };
        (self.resolver)(args, captures.as_ref())
    }
}

impl fmt::Debug for PatternShortcut {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PatternShortcut")
            .field("matchers", &self.matchers)
            .finish_non_exhaustive()
    }
}

/// Defaults plus named and pattern shortcuts.
///
/// Configure it with `&mut self` at startup, then share it read-only
/// (see [`SharedRegistry`]).
#[derive(Debug, Clone, Default)]
pub struct DescriptorRegistry {
    defaults: Defaults,
    named: HashMap<String, Attributes>,
    // arity -> entries, most recent first
    patterns: HashMap<usize, Vec<PatternShortcut>>,
}

impl DescriptorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn defaults(&self) -> &Defaults {
        &self.defaults
    }

    /// Replace the defaults. Descriptors built earlier are unaffected.
    pub fn set_defaults(&mut self, defaults: Defaults) {
        self.defaults = defaults;
    }

    pub fn register_named(&mut self, name: impl Into<String>, attributes: Attributes) {
        let name = name.into();
        tracing::debug!(shortcut = %name, "Registered named shortcut");
        self.named.insert(name, attributes);
    }

    /// Register a pattern shortcut. It takes priority over every earlier
    /// shortcut with the same number of matchers.
    pub fn register_pattern<F>(&mut self, matchers: Vec<Matcher>, resolver: F)
    where
        F: Fn(&[ShortcutArg], Option<&Captures<'_>>) -> Attributes + Send + Sync + 'static,
    {
        let entries = self.patterns.entry(matchers.len()).or_default();
        entries.insert(
            0,
            PatternShortcut {
                matchers,
                resolver: Arc::new(resolver),
            },
        );
    }

    pub fn named_shortcut(&self, name: &str) -> Option<&Attributes> {
        self.named.get(name)
    }

    /// Expand shortcut arguments into an attribute map
    pub fn resolve(&self, args: &[ShortcutArg]) -> Result<Attributes, ShortcutError> {
        if let [arg] = args {
            if let Some(attributes) = arg.text().and_then(|name| self.named.get(name)) {
                return Ok(attributes.clone());
            }
        }

        let entry = self
            .patterns
            .get(&args.len())
            .and_then(|entries| entries.iter().find(|entry| entry.matches(args)));

        match entry {
            Some(entry) => Ok(entry.resolve(args)),
            None => {
                let args = args
                    .iter()
                    .map(|arg| format!("{:?}", arg))
                    .collect::<Vec<_>>()
                    .join(", ");
                tracing::debug!(args = %args, "No shortcut matched");
                Err(ShortcutError::InvalidShortcut { args })
            }
        }
    }

    /// Build a descriptor from `attributes` with defaults filling the fields
    /// it leaves out. Explicit nulls are kept.
    pub fn new_with_defaults(&self, attributes: Attributes) -> Result<Descriptor, ShortcutError> {
        let merged = attributes.merged_over(self.defaults.to_attributes());
        Ok(Descriptor::new(merged)?)
    }

    pub fn resolve_with_defaults(&self, args: &[ShortcutArg]) -> Result<Descriptor, ShortcutError> {
        let attributes = self.resolve(args)?;
        self.new_with_defaults(attributes)
    }

    /// Uniform entry point for every call shape
    pub fn from_call_style(&self, args: impl Into<DescriptorArgs>) -> Result<Descriptor, ShortcutError> {
        match args.into() {
            DescriptorArgs::Empty => self.new_with_defaults(Attributes::new()),
            DescriptorArgs::Shortcut(args) if args.is_empty() => {
                self.new_with_defaults(Attributes::new())
            }
            DescriptorArgs::Attributes(attributes) => self.new_with_defaults(attributes),
            DescriptorArgs::Descriptor(descriptor) => Ok(descriptor),
            DescriptorArgs::Shortcut(args) => self.resolve_with_defaults(&args),
        }
    }
}
