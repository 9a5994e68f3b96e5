//! URL codec error types
//!
//! Structured errors with HTTP status mapping, following the same pattern
//! as the descriptor and shortcut modules.

use thiserror::Error;

use crate::descriptor::DescriptorError;
use crate::shortcuts::ShortcutError;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UrlError {
    /// Path does not sit under the configured prefix
    #[error("path '{path}' not found")]
    UnknownUrl { path: String },

    /// Tamper protection is on and the URL carries no signature
    #[error("URL signature is missing")]
    SignatureMissing,

    /// The signature does not match the decoded descriptor
    #[error("URL signature is incorrect")]
    IncorrectSignature,

    /// A descriptor without a uid cannot be turned into a path
    #[error("descriptor has no uid")]
    MissingUid,

    /// Query keys disagree on the shape of a value (e.g. `o=1&o[a]=2`)
    #[error("malformed query parameter '{key}': {message}")]
    MalformedQuery { key: String, message: String },

    /// Codec settings that would make URLs unsafe (e.g. a zero-length signature)
    #[error("invalid codec configuration: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    Shortcut(#[from] ShortcutError),

    #[error(transparent)]
    Descriptor(#[from] DescriptorError),
}

impl UrlError {
    /// Maps URL errors to HTTP status codes
    ///
    /// - UnknownUrl → 404 (Not Found)
    /// - SignatureMissing, IncorrectSignature → 403 (Forbidden)
    /// - InvalidConfig → 500 (Internal Server Error)
    /// - everything else → 400 (Bad Request)
    pub fn to_http_status(&self) -> u16 {
        match self {
            UrlError::UnknownUrl { .. } => 404,
            UrlError::InvalidConfig(_) => 500,
            UrlError::SignatureMissing | UrlError::IncorrectSignature => 403,
            UrlError::MissingUid
            | UrlError::MalformedQuery { .. }
            | UrlError::Shortcut(_)
            | UrlError::Descriptor(_) => 400,
        }
    }

    pub fn malformed(key: impl Into<String>, message: impl Into<String>) -> Self {
        UrlError::MalformedQuery {
            key: key.into(),
            message: message.into(),
        }
    }
}
