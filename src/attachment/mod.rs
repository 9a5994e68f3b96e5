//! Attachment attributes
//!
//! Record layers that store resource uids on their models talk to this
//! crate through two calls per attribute: `assign(value)` when the attribute
//! is written and `to_value()` when it is read. [`AttachmentRegistry`] keeps
//! which codec (and optional default uid) serves each attribute name.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::shortcuts::DescriptorArgs;
use crate::url::{UrlCodec, UrlError};

/// The setter/getter pair a record layer calls for an attachment attribute
pub trait AttachmentValue {
    type Input;
    type Output;

    fn assign(&mut self, value: Self::Input);

    fn to_value(&self) -> Self::Output;
}

#[derive(Debug, Clone)]
pub struct AttributeBinding {
    codec: Arc<UrlCodec>,
    default_uid: Option<String>,
}

impl AttributeBinding {
    pub fn codec(&self) -> &Arc<UrlCodec> {
        &self.codec
    }

    pub fn default_uid(&self) -> Option<&str> {
        self.default_uid.as_deref()
    }
}

/// Attribute name -> codec binding, per model
#[derive(Debug, Clone, Default)]
pub struct AttachmentRegistry {
    bindings: BTreeMap<String, AttributeBinding>,
}

impl AttachmentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of this table for a derived model; later registrations on the
    /// copy do not leak back.
    pub fn inherit(&self) -> Self {
        self.clone()
    }

    pub fn register(
        &mut self,
        attribute: impl Into<String>,
        codec: Arc<UrlCodec>,
        default_uid: Option<String>,
    ) {
        let attribute = attribute.into();
        tracing::debug!(attribute = %attribute, "Registered attachment attribute");
        self.bindings
            .insert(attribute, AttributeBinding { codec, default_uid });
    }

    pub fn binding(&self, attribute: &str) -> Option<&AttributeBinding> {
        self.bindings.get(attribute)
    }

    pub fn attributes(&self) -> impl Iterator<Item = &str> {
        self.bindings.keys().map(String::as_str)
    }

    /// Fresh, unassigned attachment for `attribute`
    pub fn attachment_for(&self, attribute: &str) -> Option<UidAttachment> {
        self.binding(attribute).cloned().map(UidAttachment::new)
    }
}

/// Attachment holding a stored resource uid
#[derive(Debug, Clone)]
pub struct UidAttachment {
    binding: AttributeBinding,
    uid: Option<String>,
}

impl UidAttachment {
    pub fn new(binding: AttributeBinding) -> Self {
        Self { binding, uid: None }
    }
}

impl AttachmentValue for UidAttachment {
    type Input = Option<String>;
    type Output = Option<AttachedResource>;

    fn assign(&mut self, value: Option<String>) {
        self.uid = value;
    }

    /// The assigned uid, or the attribute's default when nothing is assigned
    fn to_value(&self) -> Option<AttachedResource> {
        let uid = self
            .uid
            .clone()
            .or_else(|| self.binding.default_uid.clone())?;
        Some(AttachedResource {
            uid,
            codec: Arc::clone(&self.binding.codec),
        })
    }
}

/// A readable attachment: a uid plus the codec that renders its URLs
#[derive(Debug, Clone)]
pub struct AttachedResource {
    uid: String,
    codec: Arc<UrlCodec>,
}

impl AttachedResource {
    pub fn uid(&self) -> &str {
        &self.uid
    }

    pub fn url(&self, args: impl Into<DescriptorArgs>) -> Result<String, UrlError> {
        self.codec.url_for(&self.uid, args)
    }
}
