//! Shared constants and invariants

/// Subtracted from both token deadlines before a cached token is served.
pub const DEFAULT_SAFETY_MARGIN_MS: i64 = 3_600_000;
pub const DEFAULT_HTTP_TIMEOUT_MS: u64 = 30_000;

pub const SIGN_IN_PATH: &str = "/idm/web/Authentication/signIn";
pub const SIGN_OUT_PATH: &str = "/idm/web/Authentication/signOut";

pub const QUERY_SCHEMA: (&str, &str) = ("schema", "1.0");
pub const QUERY_FORM: (&str, &str) = ("form", "json");
