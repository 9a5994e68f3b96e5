// Constants module - centralized default values for configuration
//
// Query keys and signature defaults are part of the URL contract: changing
// any of them invalidates every URL already handed out.

// =============================================================================
// URL defaults
// =============================================================================

/// Default for `protect_from_tampering`
pub const DEFAULT_PROTECT_FROM_TAMPERING: bool = true;

/// Placeholder secret; deployments are expected to override it
pub const DEFAULT_SECRET: &str = "This is a secret!";

/// Default number of hex characters kept from the signature digest
pub const DEFAULT_SIGNATURE_LENGTH: usize = 16;

/// Longest signature a SHA-256 hex digest can provide
pub const MAX_SIGNATURE_LENGTH: usize = 64;

/// Default path prefix (URLs start at the root)
pub const DEFAULT_PATH_PREFIX: &str = "";

// =============================================================================
// Query keys
// =============================================================================

pub const PROCESSING_METHOD_KEY: &str = "m";
pub const PROCESSING_OPTIONS_KEY: &str = "o";
pub const ENCODING_KEY: &str = "e";
pub const DEFAULT_KEY: &str = "d";
pub const SIGNATURE_KEY: &str = "s";

/// Deepest bracket nesting accepted in a query key (`o[a][b]` has depth 2)
pub const MAX_QUERY_DEPTH: usize = 100;

// =============================================================================
// Cache keys
// =============================================================================

/// Salt used for descriptor cache keys
pub const CACHE_KEY_SALT: &str = "descriptor-cache-key";

/// Length of descriptor cache keys
pub const CACHE_KEY_LENGTH: usize = 10;
