//! Sources module
//!
//! The identity service the token cache signs in against, behind a trait so
//! the cache can be driven by something other than HTTP.

use std::future::Future;

use crate::error::AuthError;
use crate::parser::sign_in::SignInResponse;

pub mod identity;

pub use identity::IdentityService;

pub trait IdentityProvider: Send + Sync {
    /// Authenticate with the configured credentials and return a fresh token.
    fn sign_in(&self) -> impl Future<Output = Result<SignInResponse, AuthError>> + Send;

    /// Invalidate `token` at the identity service.
    fn sign_out(&self, token: &str) -> impl Future<Output = Result<(), AuthError>> + Send;
}
