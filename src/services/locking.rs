//! Row-level account locking for balance-affecting operations.
//!
//! An `Account` row is the unit of mutual exclusion. A lock is acquired with
//! a `SELECT ... FOR UPDATE` read inside the caller's transaction and lives
//! until that transaction commits or rolls back; it is never held across a
//! wait on external I/O. When an operation touches several accounts it must
//! acquire their locks in [`lock_order`] to avoid deadlocking against an
//! opposite-order peer.

use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QuerySelect};
use uuid::Uuid;

use crate::entities::account::{self, AccountType};
use crate::errors::LedgerError;

/// Identity of an account captured at an operation's initial read, used to
/// detect cross-transaction drift once the row lock is held.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountSnapshot {
    pub organization_id: Uuid,
    pub branch_id: Uuid,
    pub account_type: AccountType,
}

impl From<&account::Model> for AccountSnapshot {
    fn from(model: &account::Model) -> Self {
        Self {
            organization_id: model.organization_id,
            branch_id: model.branch_id,
            account_type: model.account_type.clone(),
        }
    }
}

/// The total acquisition order for a set of account locks: ascending by id,
/// duplicates collapsed.
pub fn lock_order<I>(ids: I) -> Vec<Uuid>
where
    I: IntoIterator<Item = Uuid>,
{
    let mut ids: Vec<Uuid> = ids.into_iter().collect();
    ids.sort();
    ids.dedup();
    ids
}

/// Issue a locking read on the account row and return it.
///
/// Blocks the calling operation until any other holder of the row's lock
/// releases it. The lock belongs to `conn`'s enclosing transaction; if the
/// caller's future is dropped while waiting, no lock is held.
pub async fn acquire_for_update<C>(conn: &C, account_id: Uuid) -> Result<account::Model, LedgerError>
where
    C: ConnectionTrait,
{
    account::Entity::find_by_id(account_id)
        .filter(account::Column::DeletedAt.is_null())
        .lock_exclusive()
        .one(conn)
        .await?
        .ok_or_else(|| LedgerError::NotFound(format!("account {account_id}")))
}

/// [`acquire_for_update`], then verify the locked row's tenant and type still
/// match the snapshot captured earlier in the operation.
///
/// A mismatch means another transaction changed the account's identity
/// between the caller's initial read and this lock; the caller must re-read
/// and retry the whole operation.
pub async fn acquire_and_validate<C>(
    conn: &C,
    account_id: Uuid,
    expected: &AccountSnapshot,
) -> Result<account::Model, LedgerError>
where
    C: ConnectionTrait,
{
    let locked = acquire_for_update(conn, account_id).await?;

    if locked.organization_id != expected.organization_id
        || locked.branch_id != expected.branch_id
        || locked.account_type != expected.account_type
    {
        return Err(LedgerError::ConcurrentModification(account_id));
    }

    Ok(locked)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lock_order_sorts_ascending_and_dedups() {
        let a = Uuid::from_u128(3);
        let b = Uuid::from_u128(1);
        let c = Uuid::from_u128(2);

        let ordered = lock_order(vec![a, b, c, b, a]);
        assert_eq!(ordered, vec![b, c, a]);
    }

    #[test]
    fn lock_order_of_empty_set_is_empty() {
        assert!(lock_order(Vec::new()).is_empty());
    }
}
