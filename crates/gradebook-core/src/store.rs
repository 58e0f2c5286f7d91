//! Account lookup contract.

use async_trait::async_trait;

use crate::account::{Account, AccountKind};
use crate::error::CoreResult;

/// Source of login accounts, partitioned by [`AccountKind`].
#[async_trait]
pub trait AccountStore: Send + Sync {
    /// Looks up the account with `email` in the partition for `kind`.
    ///
    /// Returns `Ok(None)` when no such account exists. Backend failures are
    /// reported as [`CoreError::Store`](crate::CoreError::Store).
    async fn find_account(&self, email: &str, kind: AccountKind) -> CoreResult<Option<Account>>;
}
