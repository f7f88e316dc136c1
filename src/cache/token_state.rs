use tracing::debug;

use crate::parser::sign_in::SignInResponse;

/// Why a cached token can not be served.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Staleness {
    NoToken,
    DurationExceeded,
    IdleTimeoutExceeded,
}

/// Token plus the timestamps of the sign-in that produced it.
///
/// Always replaced as a whole: either `token` is empty, or every other
/// field belongs to the same sign-in response.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenState {
    pub token: String,
    /// unix millis of the sign-in
    pub issued_at: i64,
    /// unix millis of the last served read
    pub last_used_at: i64,
    /// ms, counted from `issued_at`
    pub validity: i64,
    /// ms, counted from `last_used_at`
    pub idle_timeout: i64,
}

impl TokenState {
    pub fn signed_in(response: &SignInResponse, now: i64) -> Self {
        Self {
            token: response.token.to_owned(),
            issued_at: now,
            last_used_at: now,
            validity: response.duration,
            idle_timeout: response.idle_timeout,
        }
    }

    pub fn has_token(&self) -> bool {
        !self.token.is_empty()
    }

    /// Last instant the token may be served, counting from sign-in.
    pub fn expires_at(&self, safety_margin: i64) -> i64 {
        self.issued_at
            .saturating_add(self.validity)
            .saturating_sub(safety_margin)
    }

    /// Last instant the token may be served, counting from its last use.
    pub fn idle_until(&self, safety_margin: i64) -> i64 {
        self.last_used_at
            .saturating_add(self.idle_timeout)
            .saturating_sub(safety_margin)
    }

    pub fn staleness(&self, now: i64, safety_margin: i64) -> Option<Staleness> {
        if !self.has_token() {
            return Some(Staleness::NoToken);
        }
        if now > self.expires_at(safety_margin) {
            return Some(Staleness::DurationExceeded);
        }
        if now > self.idle_until(safety_margin) {
            return Some(Staleness::IdleTimeoutExceeded);
        }
        None
    }

    pub fn is_accessible(&self, now: i64, safety_margin: i64) -> bool {
        match self.staleness(now, safety_margin) {
            None => true,
            Some(reason) => {
                debug!(?reason, "cached token is not accessible");
                false
            }
        }
    }

    pub fn touch(&mut self, now: i64) {
        self.last_used_at = now;
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}
