//! URL signing
//!
//! The signature covers the whole descriptor, uid and format included,
//! even though only the query carries it:
//!
//! ```text
//! signature = hex(SHA-256(canonical(descriptor) + secret))[..signature_length]
//! ```

use crate::descriptor::Descriptor;

use super::config::CodecConfig;
use super::error::UrlError;

/// Signature for `descriptor` under the configured secret and length
pub fn sign(descriptor: &Descriptor, config: &CodecConfig) -> String {
    descriptor.signature(&config.secret, config.signature_length)
}

/// Check a signature taken from a URL
///
/// # Returns
/// * `Ok(())` if the signature matches
/// * `Err(UrlError::SignatureMissing)` if no signature was given
/// * `Err(UrlError::IncorrectSignature)` if it does not match
pub fn verify(
    signature: Option<&str>,
    descriptor: &Descriptor,
    config: &CodecConfig,
) -> Result<(), UrlError> {
    let signature = signature.ok_or(UrlError::SignatureMissing)?;
    let expected = sign(descriptor, config);

    if constant_time_compare(signature, &expected) {
        Ok(())
    } else {
        Err(UrlError::IncorrectSignature)
    }
}

/// Constant-time string comparison to prevent timing attacks
fn constant_time_compare(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }

    a.bytes().zip(b.bytes()).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}
