use serde::Deserialize;
use tracing::debug;

use crate::error::AuthError;

/// Payload of a successful sign-in. Durations are milliseconds.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SignInResponse {
    pub token: String,
    /// total token lifetime counted from sign-in
    pub duration: i64,
    /// allowed inactivity between two uses
    pub idle_timeout: i64,
    #[serde(default)]
    pub user_name: String,
    #[serde(default)]
    pub user_id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SignInEnvelope {
    sign_in_response: SignInResponse,
}

/// Decode the `{"signInResponse": {...}}` envelope returned by the identity service.
pub fn decode_response(body: &[u8]) -> Result<SignInResponse, AuthError> {
    let envelope: SignInEnvelope = serde_json::from_slice(body)?;
    let response = envelope.sign_in_response;
    if response.token.is_empty() {
        return Err(AuthError::EmptyToken);
    }
    debug!(user_name = %response.user_name, user_id = %response.user_id, "decoded sign-in response");
    Ok(response)
}
