use std::fmt;
use std::time::Duration;

use reqwest::{Client, Response};
use tracing::{info, warn};

use crate::error::AuthError;
use crate::parser::sign_in::{decode_response, SignInResponse};
use crate::sources::IdentityProvider;
use crate::utils::constants::{
    DEFAULT_HTTP_TIMEOUT_MS, QUERY_FORM, QUERY_SCHEMA, SIGN_IN_PATH, SIGN_OUT_PATH,
};

/// HTTP client for the IDM authentication endpoints.
#[derive(Clone)]
pub struct IdentityService {
    client: Client,
    service_url: String,
    principal: String,
    secret: String,
    request_timeout: Duration,
}

impl IdentityService {
    pub fn new(principal: impl Into<String>, secret: impl Into<String>, service_url: impl Into<String>) -> Self {
        let service_url: String = service_url.into();
        Self {
            client: Client::new(),
            service_url: service_url.trim_end_matches('/').to_owned(),
            principal: principal.into(),
            secret: secret.into(),
            request_timeout: Duration::from_millis(DEFAULT_HTTP_TIMEOUT_MS),
        }
    }

    pub fn with_request_timeout(mut self, request_timeout: Duration) -> Self {
        self.request_timeout = request_timeout;
        self
    }

    pub fn principal(&self) -> &str {
        &self.principal
    }

    pub fn service_url(&self) -> &str {
        &self.service_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.service_url, path)
    }
}

impl fmt::Debug for IdentityService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IdentityService")
            .field("service_url", &self.service_url)
            .field("principal", &self.principal)
            .field("secret", &"***")
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}

impl IdentityProvider for IdentityService {
    async fn sign_in(&self) -> Result<SignInResponse, AuthError> {
        let url = self.endpoint(SIGN_IN_PATH);
        info!(%url, principal = %self.principal, "--> sign-in");

        let response = self
            .client
            .get(&url)
            .query(&[QUERY_SCHEMA, QUERY_FORM])
            .basic_auth(&self.principal, Some(&self.secret))
            .timeout(self.request_timeout)
            .send()
            .await?;

        let body = success_body(response).await?;
        decode_response(&body)
    }

    async fn sign_out(&self, token: &str) -> Result<(), AuthError> {
        let url = self.endpoint(SIGN_OUT_PATH);
        info!(%url, principal = %self.principal, "--> sign-out");

        let response = self
            .client
            .get(&url)
            .query(&[QUERY_SCHEMA, QUERY_FORM, ("token", token)])
            .timeout(self.request_timeout)
            .send()
            .await?;

        // body of a successful sign-out carries nothing we use
        success_body(response).await?;
        Ok(())
    }
}

/// Body of a 2xx response; anything else becomes `AuthError::Status`.
async fn success_body(response: Response) -> Result<Vec<u8>, AuthError> {
    let status = response.status();
    let body = response.bytes().await?;
    if !status.is_success() {
        warn!(%status, "identity service rejected the request");
        return Err(AuthError::Status {
            status,
            body: String::from_utf8_lossy(&body).into_owned(),
        });
    }
    Ok(body.to_vec())
}
