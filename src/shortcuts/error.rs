//! Shortcut resolution error types

use thiserror::Error;

use crate::descriptor::DescriptorError;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ShortcutError {
    /// Neither a named nor a pattern shortcut matched the arguments
    #[error("No shortcut was found matching ({args})")]
    InvalidShortcut { args: String },

    #[error(transparent)]
    Descriptor(#[from] DescriptorError),
}
