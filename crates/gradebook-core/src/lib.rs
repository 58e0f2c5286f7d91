//! Gradebook core library: HTTP-agnostic login and account logic.
//!
//! `gradebook-core` holds the pieces of the student-information backend that
//! carry state or policy. The web crate (`gradebook-web`) wires them to axum
//! routes and a PostgreSQL pool.
//!
//! # Modules
//!
//! - [`guard`]: [`LoginAttemptGuard`], the per-client failed-login throttle.
//! - [`account`]: Account kinds, stored accounts and the public [`Identity`].
//! - [`credentials`]: Salted password-hash verification ([`HashVerifier`]).
//! - [`store`]: The [`AccountStore`] contract implemented by the database layer.
//! - [`login`]: [`LoginFlow`], the guard → lookup → verify orchestration.
//! - [`error`]: Unified error type ([`CoreError`]) and result alias ([`CoreResult`]).

pub mod account;
pub mod credentials;
pub mod error;
pub mod guard;
pub mod login;
pub mod store;

pub use account::{Account, AccountKind, Identity};
pub use credentials::{hash_password, CredentialVerifier, HashVerifier, Verification};
pub use error::{CoreError, CoreResult};
pub use guard::{Decision, GuardConfig, LoginAttemptGuard};
pub use login::{LoginError, LoginFlow};
pub use store::AccountStore;
