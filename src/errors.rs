use rust_decimal::Decimal;
use sea_orm::error::DbErr;
use thiserror::Error;
use uuid::Uuid;

/// Error taxonomy for the ledger core.
///
/// Every failure is scoped to the single operation that raised it and is
/// returned to the immediate caller with enough structure to render a precise
/// message. No automatic retry happens inside this crate; re-attempting after
/// a [`LedgerError::ConcurrentModification`] is the caller's responsibility.
#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("Database error: {0}")]
    Database(#[from] DbErr),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    /// A referenced entity does not exist or belongs to a different
    /// tenant/grouping.
    #[error("Invalid reference: {0}")]
    Reference(String),

    /// A structural write would introduce a cycle in the definition tree or
    /// the alternative-account chain. Rejected before any write.
    #[error("Cycle detected: {0}")]
    Cycle(String),

    /// An operation was attempted against a journal voucher in a lifecycle
    /// state that forbids it.
    #[error("Invalid state: {0}")]
    State(String),

    /// Debit and credit totals differ at a lifecycle-advancing checkpoint.
    /// Carries both totals so the caller can render the discrepancy.
    #[error("Journal voucher is not balanced: debit {debit} != credit {credit}")]
    UnbalancedVoucher { debit: Decimal, credit: Decimal },

    /// The account's identity changed between the caller's initial read and
    /// its attempt to mutate it. The caller must re-read and retry.
    #[error("Account {0} was modified by another transaction")]
    ConcurrentModification(Uuid),

    /// An event could not be handed to the in-process channel. The services
    /// log and swallow this; delivery is a pure notification contract.
    #[error("Event error: {0}")]
    Event(String),
}

impl LedgerError {
    /// True when the caller can recover by correcting its input and retrying.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, LedgerError::Database(_))
    }
}
