use std::fmt;
use std::time::{Duration, Instant};

use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::cache::token_state::TokenState;
use crate::config::settings::IdentitySettings;
use crate::error::AuthError;
use crate::helpers::time::{format_millis, Clock, SystemClock};
use crate::observability::metrics::get_metrics;
use crate::sources::{IdentityProvider, IdentityService};
use crate::utils::constants::DEFAULT_SAFETY_MARGIN_MS;

/// Self-refreshing token holder.
///
/// Every operation runs under one async mutex, including the sign-in round
/// trip, so at most one sign-in is in flight and no caller can observe a
/// half-written [`TokenState`]. Staleness is only checked when a token is
/// asked for; nothing refreshes in the background.
pub struct TokenCache<P = IdentityService, C = SystemClock> {
    provider: P,
    clock: C,
    /// ms subtracted from both deadlines
    safety_margin: i64,
    state: Mutex<TokenState>,
}

impl TokenCache {
    /// Store the credentials. No request is made until a token is needed.
    pub fn new(principal: impl Into<String>, secret: impl Into<String>, service_url: impl Into<String>) -> Self {
        Self::with_provider(IdentityService::new(principal, secret, service_url))
    }

    pub fn from_settings(settings: &IdentitySettings) -> Self {
        let provider = IdentityService::new(
            settings.principal.to_owned(),
            settings.secret.to_owned(),
            settings.service_url.to_owned(),
        )
        .with_request_timeout(Duration::from_millis(settings.request_timeout_ms));

        Self::with_provider(provider).with_safety_margin(settings.safety_margin_ms)
    }
}

impl<P> TokenCache<P, SystemClock> {
    pub fn with_provider(provider: P) -> Self {
        Self {
            provider,
            clock: SystemClock,
            safety_margin: DEFAULT_SAFETY_MARGIN_MS,
            state: Mutex::new(TokenState::default()),
        }
    }
}

impl<P, C> TokenCache<P, C> {
    pub fn with_safety_margin(mut self, safety_margin_ms: i64) -> Self {
        self.safety_margin = safety_margin_ms;
        self
    }

    /// Swap the time source; tests drive expiry with a manual clock.
    pub fn with_clock<D>(self, clock: D) -> TokenCache<P, D> {
        TokenCache {
            provider: self.provider,
            clock,
            safety_margin: self.safety_margin,
            state: self.state,
        }
    }

    pub fn safety_margin(&self) -> i64 {
        self.safety_margin
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    #[cfg(test)]
    pub(crate) async fn snapshot(&self) -> TokenState {
        self.state.lock().await.clone()
    }
}

impl<P: IdentityProvider, C: Clock> TokenCache<P, C> {
    /// Return the cached token if it is still accessible, otherwise sign in
    /// first. On failure the previous state is kept and the error returned.
    pub async fn get_token(&self) -> Result<String, AuthError> {
        let mut state = self.state.lock().await;

        let now = self.clock.now_millis();
        if state.is_accessible(now, self.safety_margin) {
            state.touch(now);
            get_metrics().await.cache_hits.inc();
            debug!("serving cached token");
            return Ok(state.token.clone());
        }

        // refresh when expired or idle timeout exceeded
        self.sign_in_locked(&mut state).await?;
        Ok(state.token.clone())
    }

    /// Sign in now, whatever the state of the cached token.
    pub async fn sign_in(&self) -> Result<(), AuthError> {
        let mut state = self.state.lock().await;
        self.sign_in_locked(&mut state).await
    }

    /// Invalidate the token remotely and forget it locally.
    ///
    /// The local token is cleared once the request has been attempted, even
    /// when it fails on the wire or is answered with a non-2xx status; that
    /// error is still returned. With no token held this returns `Ok(())`
    /// without contacting the identity service.
    pub async fn sign_out(&self) -> Result<(), AuthError> {
        let mut state = self.state.lock().await;
        if !state.has_token() {
            debug!("sign-out skipped, no token held");
            return Ok(());
        }

        get_metrics().await.sign_out_requests.inc();
        let result = self.provider.sign_out(&state.token).await;
        state.clear();

        match &result {
            Ok(()) => info!("signed out"),
            Err(err) => warn!(error = %err, "sign-out request failed, local token dropped anyway"),
        }
        result
    }

    /// Sign-in body shared by `get_token` and `sign_in`. Takes the already
    /// guarded state; the mutex is not reentrant.
    async fn sign_in_locked(&self, state: &mut TokenState) -> Result<(), AuthError> {
        let metrics = get_metrics().await;
        metrics.sign_in_requests.inc();

        let start = Instant::now();
        let result = self.provider.sign_in().await;
        metrics.sign_in_duration.observe(start.elapsed().as_secs_f64());

        let response = result.inspect_err(|err| {
            metrics.sign_in_failures.with_label_values(&[err.reason()]).inc();
            warn!(error = %err, "sign-in failed");
        })?;

        let now = self.clock.now_millis();
        *state = TokenState::signed_in(&response, now);
        info!(
            validity_ms = state.validity,
            idle_timeout_ms = state.idle_timeout,
            refresh_after = %format_millis(state.expires_at(self.safety_margin)),
            "signed in"
        );
        Ok(())
    }
}

impl<P: fmt::Debug, C: fmt::Debug> fmt::Debug for TokenCache<P, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenCache")
            .field("provider", &self.provider)
            .field("clock", &self.clock)
            .field("safety_margin", &self.safety_margin)
            .finish_non_exhaustive()
    }
}
