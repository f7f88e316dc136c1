// tests/common/mod.rs
pub use axum::Router;
pub use serde_json::json;
pub use tokio::task::JoinHandle;

use std::collections::VecDeque;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use http::StatusCode;

use crate::error::AuthError;
use crate::parser::sign_in::SignInResponse;
use crate::sources::IdentityProvider;

pub use crate::utils::constants::{SIGN_IN_PATH, SIGN_OUT_PATH};

/// Spawn an Axum router on an ephemeral port and return (JoinHandle, SocketAddr)
pub async fn spawn_axum(router: Router) -> (JoinHandle<()>, SocketAddr) {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.expect("bind failed");
    let addr = listener.local_addr().unwrap();
    let handle = tokio::spawn(async move {
        axum::serve(listener, router).await.expect("server failed");
    });
    (handle, addr)
}

pub fn sign_in_body(token: &str, duration: i64, idle_timeout: i64) -> serde_json::Value {
    json!({
        "signInResponse": {
            "token": token,
            "duration": duration,
            "idleTimeout": idle_timeout,
            "userName": "admin@example.com",
            "userId": "http://idm.example.com/idm/data/User/mps/1150127438"
        }
    })
}

/// What the next sign-in of a [`ScriptedProvider`] does.
#[derive(Debug, Clone)]
pub enum Step {
    Token(&'static str),
    Reject,
}

/// In-memory identity provider that counts calls and tracks how many
/// sign-ins overlap. Unscripted sign-ins return `token-<n>`.
#[derive(Debug, Default)]
pub struct ScriptedProvider {
    script: Mutex<VecDeque<Step>>,
    pub duration: i64,
    pub idle_timeout: i64,
    pub delay: Duration,
    pub fail_sign_out: bool,
    sign_ins: AtomicUsize,
    sign_outs: AtomicUsize,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
    signed_out_tokens: Mutex<Vec<String>>,
}

impl ScriptedProvider {
    pub fn new(duration: i64, idle_timeout: i64) -> Self {
        Self { duration, idle_timeout, ..Default::default() }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn failing_sign_out(mut self) -> Self {
        self.fail_sign_out = true;
        self
    }

    pub fn push(&self, step: Step) {
        self.script.lock().unwrap().push_back(step);
    }

    pub fn sign_ins(&self) -> usize {
        self.sign_ins.load(Ordering::SeqCst)
    }

    pub fn sign_outs(&self) -> usize {
        self.sign_outs.load(Ordering::SeqCst)
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    pub fn signed_out_tokens(&self) -> Vec<String> {
        self.signed_out_tokens.lock().unwrap().clone()
    }
}

impl IdentityProvider for ScriptedProvider {
    async fn sign_in(&self) -> Result<SignInResponse, AuthError> {
        let n = self.sign_ins.fetch_add(1, Ordering::SeqCst) + 1;
        let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(current, Ordering::SeqCst);

        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        let step = self.script.lock().unwrap().pop_front();
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        let token = match step {
            Some(Step::Reject) => {
                return Err(AuthError::Status {
                    status: StatusCode::UNAUTHORIZED,
                    body: "bad credentials".to_owned(),
                })
            }
            Some(Step::Token(token)) => token.to_owned(),
            None => format!("token-{n}"),
        };
        Ok(SignInResponse {
            token,
            duration: self.duration,
            idle_timeout: self.idle_timeout,
            user_name: "admin@example.com".to_owned(),
            user_id: "1150127438".to_owned(),
        })
    }

    async fn sign_out(&self, token: &str) -> Result<(), AuthError> {
        self.sign_outs.fetch_add(1, Ordering::SeqCst);
        self.signed_out_tokens.lock().unwrap().push(token.to_owned());
        if self.fail_sign_out {
            return Err(AuthError::Status {
                status: StatusCode::BAD_GATEWAY,
                body: "upstream unavailable".to_owned(),
            });
        }
        Ok(())
    }
}
