//! # IDM Token Agent Library
//!
//! Keeps a short-lived token from an IDM identity service and hands it to
//! any number of concurrent callers, signing in again only when the cached
//! token has outlived its validity or idle window.
//!
//! Modules:
//! - `cache`: the self-refreshing token cache and its state record
//! - `sources`: identity service client (sign-in / sign-out over HTTP)
//! - `parser`: decoding of the sign-in response envelope
//! - `config`: YAML settings with environment expansion
//! - `observability`: prometheus metrics

pub mod config;
pub mod cache;
pub mod error;
pub mod sources;
pub mod parser;
pub mod tests;
pub mod observability;
pub mod helpers;
pub mod utils;


pub use crate::cache::token_cache::TokenCache;
pub use crate::error::AuthError;
pub use crate::parser::sign_in::SignInResponse;
pub use crate::sources::{IdentityProvider, IdentityService};
