// Error types module

use thiserror::Error;

use crate::config::ConfigError;
use crate::descriptor::DescriptorError;
use crate::shortcuts::ShortcutError;
use crate::url::UrlError;

/// Crate-level error
///
/// Each module has its own error enum; this one lets callers that cross
/// modules (the CLI, record layers) use `?` throughout.
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration errors (invalid YAML, missing env vars, bad values)
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Bad descriptor field names or values
    #[error(transparent)]
    Descriptor(#[from] DescriptorError),

    /// No shortcut matched
    #[error(transparent)]
    Shortcut(#[from] ShortcutError),

    /// URL decoding and signature failures
    #[error(transparent)]
    Url(#[from] UrlError),
}

pub type Result<T> = std::result::Result<T, Error>;
