// Transform URL Library
//
// Descriptor <-> URL codec with tamper-proof signatures, plus the shortcut
// mini-language for building descriptors from terse arguments.

pub mod attachment;
pub mod config;
pub mod constants;
pub mod descriptor;
pub mod error;
pub mod logging;
pub mod shortcuts;
pub mod url;

pub use descriptor::{Attributes, Descriptor, Field, Value};
pub use error::{Error, Result};
pub use shortcuts::{DescriptorArgs, DescriptorRegistry, Matcher, ShortcutArg, SharedRegistry};
pub use url::{CodecConfig, UrlCodec};
