//! Descriptor error types

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DescriptorError {
    /// A name outside the six descriptor fields was used
    #[error("Descriptor doesn't recognise the following attributes: {names}")]
    UnknownAttribute { names: String },

    /// A known field was given a value of the wrong shape
    #[error("Invalid value for '{field}': expected {expected}")]
    InvalidAttributeValue {
        field: &'static str,
        expected: &'static str,
    },
}

impl DescriptorError {
    pub fn unknown_attribute(name: impl Into<String>) -> Self {
        DescriptorError::UnknownAttribute { names: name.into() }
    }
}
