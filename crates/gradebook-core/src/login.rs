//! End-to-end login orchestration.
//!
//! The flow consults the [`LoginAttemptGuard`] first, then looks the account
//! up and verifies the password. Every rejected credential produces exactly
//! one `record_failure`; every verified one exactly one `record_success`.
//! Validation, rate-limit and backend errors leave the guard untouched.

use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;
use tokio::sync::Mutex;

use crate::account::{AccountKind, Identity};
use crate::credentials::{CredentialVerifier, Verification};
use crate::error::CoreError;
use crate::guard::{Decision, LoginAttemptGuard};
use crate::store::AccountStore;

#[derive(Debug, thiserror::Error)]
pub enum LoginError {
    #[error("too many login attempts")]
    RateLimited { retry_after: Duration },

    #[error("invalid user type: {0}")]
    InvalidUserType(String),

    /// Unknown account or wrong password; deliberately indistinguishable.
    #[error("invalid email or password")]
    InvalidCredentials,

    #[error("internal error: {0}")]
    Internal(String),
}

impl From<CoreError> for LoginError {
    fn from(e: CoreError) -> Self {
        match e {
            CoreError::InvalidAccountKind(kind) => LoginError::InvalidUserType(kind),
            other => LoginError::Internal(other.to_string()),
        }
    }
}

#[derive(Clone)]
pub struct LoginFlow {
    guard: Arc<LoginAttemptGuard>,
    accounts: Arc<dyn AccountStore>,
    verifier: Arc<dyn CredentialVerifier>,
    /// Per-identifier locks held from the guard check until the outcome is recorded.
    in_flight: Arc<DashMap<String, Arc<Mutex<()>>>>,
}

impl LoginFlow {
    pub fn new(
        guard: Arc<LoginAttemptGuard>,
        accounts: Arc<dyn AccountStore>,
        verifier: Arc<dyn CredentialVerifier>,
    ) -> Self {
        Self {
            guard,
            accounts,
            verifier,
            in_flight: Arc::new(DashMap::new()),
        }
    }

    /// Authenticates `email`/`password` as a `user_type` account on behalf of
    /// the client `identifier`.
    ///
    /// Attempts from the same identifier run one at a time, so concurrent
    /// requests cannot all pass the guard before any failure is counted.
    pub async fn login(
        &self,
        identifier: &str,
        email: &str,
        password: &str,
        user_type: &str,
    ) -> Result<Identity, LoginError> {
        let lock = self
            .in_flight
            .entry(identifier.to_string())
            .or_default()
            .value()
            .clone();
        let permit = lock.lock().await;

        let result = self.attempt(identifier, email, password, user_type).await;

        drop(permit);
        drop(lock);
        self.in_flight
            .remove_if(identifier, |_, lock| Arc::strong_count(lock) == 1);

        result
    }

    async fn attempt(
        &self,
        identifier: &str,
        email: &str,
        password: &str,
        user_type: &str,
    ) -> Result<Identity, LoginError> {
        if let Decision::Blocked { retry_after } = self.guard.check_and_consume(identifier) {
            tracing::warn!("Login blocked for {identifier}: too many failed attempts");
            return Err(LoginError::RateLimited { retry_after });
        }

        let kind: AccountKind = user_type.parse()?;

        let verifier = Arc::clone(&self.verifier);
        let password = password.to_string();

        let Some(account) = self.accounts.find_account(email, kind).await? else {
            tokio::task::spawn_blocking(move || verifier.verify_absent(&password))
                .await
                .map_err(|e| LoginError::Internal(e.to_string()))?;
            let count = self.guard.record_failure(identifier);
            tracing::warn!("Failed login from {identifier}: no {kind} account ({count} consecutive)");
            return Err(LoginError::InvalidCredentials);
        };

        let verification = tokio::task::spawn_blocking(move || verifier.verify(&account, &password))
            .await
            .map_err(|e| LoginError::Internal(e.to_string()))??;

        match verification {
            Verification::Verified(identity) => {
                self.guard.record_success(identifier);
                tracing::info!("Login succeeded for {kind} {}", identity.id);
                Ok(identity)
            }
            Verification::Rejected => {
                let count = self.guard.record_failure(identifier);
                tracing::warn!("Failed login from {identifier}: wrong password ({count} consecutive)");
                Err(LoginError::InvalidCredentials)
            }
        }
    }
}
