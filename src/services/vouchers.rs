//! Voucher posting engine: journal voucher drafting, entry collection, the
//! debit-equals-credit invariant, and the printed/approved/released lifecycle.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, NaiveTime, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};
use uuid::Uuid;
use validator::Validate;

use crate::entities::account;
use crate::entities::journal_voucher::{self, VoucherState};
use crate::entities::journal_voucher_entry as entry;
use crate::errors::LedgerError;
use crate::events::{entity_topics, Event, EventEnvelope, EventSender};
use crate::services::locking::{self, AccountSnapshot};
use crate::tenant::{Actor, Tenant, TenantScoped};

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct CreateVoucherRequest {
    #[validate(required)]
    pub currency_id: Option<Uuid>,
    #[validate(length(min = 1, max = 255, message = "Voucher name is required"))]
    pub name: String,
    #[serde(default)]
    pub voucher_number: String,
    #[serde(default)]
    pub cash_voucher_number: String,
    #[serde(default)]
    pub date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub reference: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AddEntryRequest {
    pub account_id: Uuid,
    #[serde(default)]
    pub member_profile_id: Option<Uuid>,
    #[serde(default)]
    pub employee_user_id: Option<Uuid>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub debit: Decimal,
    #[serde(default)]
    pub credit: Decimal,
}

/// Service for journal vouchers and their entries.
#[derive(Clone)]
pub struct VoucherService {
    db: Arc<DatabaseConnection>,
    event_sender: Option<Arc<EventSender>>,
}

impl VoucherService {
    pub fn new(db: Arc<DatabaseConnection>, event_sender: Option<Arc<EventSender>>) -> Self {
        Self { db, event_sender }
    }

    /// Creates an empty draft voucher.
    #[instrument(skip(self, request), fields(organization_id = %actor.tenant.organization_id, name = %request.name))]
    pub async fn create_voucher(
        &self,
        actor: &Actor,
        request: CreateVoucherRequest,
    ) -> Result<journal_voucher::Model, LedgerError> {
        request
            .validate()
            .map_err(|e| LedgerError::Validation(e.to_string()))?;
        let currency_id = request
            .currency_id
            .ok_or_else(|| LedgerError::Validation("Currency is required".into()))?;

        let now = Utc::now();
        let id = Uuid::new_v4();
        let model = journal_voucher::ActiveModel {
            id: Set(id),
            organization_id: Set(actor.tenant.organization_id),
            branch_id: Set(actor.tenant.branch_id),
            currency_id: Set(currency_id),
            name: Set(request.name),
            voucher_number: Set(request.voucher_number),
            cash_voucher_number: Set(request.cash_voucher_number),
            date: Set(request.date.unwrap_or(now)),
            description: Set(request.description),
            reference: Set(request.reference),
            status: Set(VoucherState::Draft.to_string()),
            print_number: Set(0),
            printed_date: Set(None),
            printed_by_id: Set(None),
            approved_date: Set(None),
            approved_by_id: Set(None),
            released_date: Set(None),
            released_by_id: Set(None),
            posted_at: Set(None),
            posted_by_id: Set(None),
            created_at: Set(now),
            created_by_id: Set(actor.user_id),
            updated_at: Set(now),
            updated_by_id: Set(actor.user_id),
            deleted_at: Set(None),
            deleted_by_id: Set(None),
        }
        .insert(&*self.db)
        .await?;
        info!(voucher_id = %id, "journal voucher created");

        self.emit(EventEnvelope::new(
            entity_topics("journal_voucher", "create", id, &actor.tenant),
            Event::JournalVoucherCreated(id),
        ))
        .await;

        Ok(model)
    }

    pub async fn get_voucher(
        &self,
        tenant: &Tenant,
        voucher_id: Uuid,
    ) -> Result<Option<journal_voucher::Model>, LedgerError> {
        Ok(journal_voucher::Entity::scoped(tenant)
            .filter(journal_voucher::Column::Id.eq(voucher_id))
            .one(&*self.db)
            .await?)
    }

    /// Live entries of a voucher, in display order.
    pub async fn entries(
        &self,
        tenant: &Tenant,
        voucher_id: Uuid,
    ) -> Result<Vec<entry::Model>, LedgerError> {
        Ok(entry::Entity::scoped(tenant)
            .filter(entry::Column::JournalVoucherId.eq(voucher_id))
            .order_by_asc(entry::Column::Index)
            .all(&*self.db)
            .await?)
    }

    /// Appends an entry to a draft voucher.
    ///
    /// The referenced account must be live in the same tenant and must allow
    /// journal-voucher postings. Negative amounts are rejected; balance is
    /// not checked here, only at print and release.
    #[instrument(skip(self, request), fields(voucher_id = %voucher_id, account_id = %request.account_id))]
    pub async fn add_entry(
        &self,
        actor: &Actor,
        voucher_id: Uuid,
        request: AddEntryRequest,
    ) -> Result<entry::Model, LedgerError> {
        let txn = self.db.begin().await?;
        let voucher = self.lock_voucher(&txn, &actor.tenant, voucher_id).await?;
        if voucher.state() != VoucherState::Draft {
            return Err(LedgerError::State(format!(
                "voucher {voucher_id} is {}, entries may only be added to a draft",
                voucher.state()
            )));
        }

        if request.debit < Decimal::ZERO || request.credit < Decimal::ZERO {
            return Err(LedgerError::Validation(format!(
                "entry amounts must not be negative (debit {}, credit {})",
                request.debit, request.credit
            )));
        }

        let account = account::Entity::scoped(&actor.tenant)
            .filter(account::Column::Id.eq(request.account_id))
            .one(&txn)
            .await?
            .ok_or_else(|| {
                LedgerError::Reference(format!("account {} not found", request.account_id))
            })?;
        if !account.allow_journal_voucher {
            return Err(LedgerError::Validation(format!(
                "account {} does not accept journal voucher postings",
                account.id
            )));
        }

        let index = entry::Entity::scoped(&actor.tenant)
            .filter(entry::Column::JournalVoucherId.eq(voucher_id))
            .count(&txn)
            .await? as i32;

        let now = Utc::now();
        let id = Uuid::new_v4();
        let model = entry::ActiveModel {
            id: Set(id),
            organization_id: Set(actor.tenant.organization_id),
            branch_id: Set(actor.tenant.branch_id),
            journal_voucher_id: Set(voucher_id),
            account_id: Set(request.account_id),
            member_profile_id: Set(request.member_profile_id),
            employee_user_id: Set(request.employee_user_id),
            description: Set(request.description),
            debit: Set(request.debit),
            credit: Set(request.credit),
            index: Set(index),
            created_at: Set(now),
            created_by_id: Set(actor.user_id),
            updated_at: Set(now),
            updated_by_id: Set(actor.user_id),
            deleted_at: Set(None),
            deleted_by_id: Set(None),
        }
        .insert(&txn)
        .await?;
        txn.commit().await?;

        self.emit(EventEnvelope::new(
            entity_topics("journal_voucher_entry", "create", id, &actor.tenant),
            Event::JournalVoucherEntryAdded {
                voucher_id,
                entry_id: id,
            },
        ))
        .await;

        Ok(model)
    }

    /// Returns the voucher's exact debit and credit totals, or an
    /// [`LedgerError::UnbalancedVoucher`] carrying both when they differ.
    pub async fn validate_balance(
        &self,
        tenant: &Tenant,
        voucher_id: Uuid,
    ) -> Result<(Decimal, Decimal), LedgerError> {
        let entries = self.entries(tenant, voucher_id).await?;
        let (debit, credit) = entry::totals(&entries);
        if debit != credit {
            return Err(LedgerError::UnbalancedVoucher { debit, credit });
        }
        Ok((debit, credit))
    }

    /// Prints a draft voucher: under an exclusive voucher-row lock, verifies
    /// the balance, locks every referenced account, and stamps the printed
    /// fields, incrementing `print_number`.
    #[instrument(skip(self), fields(voucher_id = %voucher_id))]
    pub async fn print(
        &self,
        actor: &Actor,
        voucher_id: Uuid,
    ) -> Result<journal_voucher::Model, LedgerError> {
        let voucher = self.require_voucher(&actor.tenant, voucher_id).await?;
        if voucher.state() != VoucherState::Draft {
            return Err(LedgerError::State(format!(
                "voucher {voucher_id} is {}, only a draft voucher can be printed",
                voucher.state()
            )));
        }

        let entries = self.entries(&actor.tenant, voucher_id).await?;
        let snapshots = self.snapshot_accounts(&actor.tenant, &entries).await?;

        let now = Utc::now();
        let txn = self.db.begin().await?;
        let voucher = self.lock_voucher(&txn, &actor.tenant, voucher_id).await?;
        if voucher.state() != VoucherState::Draft {
            return Err(LedgerError::State(format!(
                "voucher {voucher_id} is {}, only a draft voucher can be printed",
                voucher.state()
            )));
        }
        self.lock_and_check(&txn, &actor.tenant, voucher_id, &snapshots)
            .await?;

        let print_number = voucher.print_number + 1;
        let mut active: journal_voucher::ActiveModel = voucher.into();
        active.printed_date = Set(Some(now));
        active.printed_by_id = Set(Some(actor.user_id));
        active.print_number = Set(print_number);
        active.updated_at = Set(now);
        active.updated_by_id = Set(actor.user_id);
        let model = active.update(&txn).await?;
        txn.commit().await?;
        info!(print_number = model.print_number, "journal voucher printed");

        self.emit(EventEnvelope::new(
            entity_topics("journal_voucher", "print", voucher_id, &actor.tenant),
            Event::JournalVoucherPrinted(voucher_id),
        ))
        .await;

        Ok(model)
    }

    /// Approves a printed voucher. No account state is touched, so no locks
    /// are taken.
    #[instrument(skip(self), fields(voucher_id = %voucher_id))]
    pub async fn approve(
        &self,
        actor: &Actor,
        voucher_id: Uuid,
    ) -> Result<journal_voucher::Model, LedgerError> {
        let voucher = self.require_voucher(&actor.tenant, voucher_id).await?;
        if voucher.state() != VoucherState::Printed {
            return Err(LedgerError::State(format!(
                "voucher {voucher_id} is {}, only a printed voucher can be approved",
                voucher.state()
            )));
        }

        let now = Utc::now();
        let mut active: journal_voucher::ActiveModel = voucher.into();
        active.approved_date = Set(Some(now));
        active.approved_by_id = Set(Some(actor.user_id));
        active.updated_at = Set(now);
        active.updated_by_id = Set(actor.user_id);
        let model = active.update(&*self.db).await?;
        info!("journal voucher approved");

        self.emit(EventEnvelope::new(
            entity_topics("journal_voucher", "approve", voucher_id, &actor.tenant),
            Event::JournalVoucherApproved(voucher_id),
        ))
        .await;

        Ok(model)
    }

    /// Releases an approved voucher into the ledger: under an exclusive
    /// voucher-row lock, re-verifies the balance, locks every referenced
    /// account, and stamps the released and posted fields. Release is
    /// terminal.
    #[instrument(skip(self), fields(voucher_id = %voucher_id))]
    pub async fn release(
        &self,
        actor: &Actor,
        voucher_id: Uuid,
    ) -> Result<journal_voucher::Model, LedgerError> {
        let voucher = self.require_voucher(&actor.tenant, voucher_id).await?;
        if voucher.state() != VoucherState::Approved {
            return Err(LedgerError::State(format!(
                "voucher {voucher_id} is {}, only an approved voucher can be released",
                voucher.state()
            )));
        }

        let entries = self.entries(&actor.tenant, voucher_id).await?;
        let snapshots = self.snapshot_accounts(&actor.tenant, &entries).await?;

        let now = Utc::now();
        let txn = self.db.begin().await?;
        let voucher = self.lock_voucher(&txn, &actor.tenant, voucher_id).await?;
        if voucher.state() != VoucherState::Approved {
            return Err(LedgerError::State(format!(
                "voucher {voucher_id} is {}, only an approved voucher can be released",
                voucher.state()
            )));
        }
        self.lock_and_check(&txn, &actor.tenant, voucher_id, &snapshots)
            .await?;

        let mut active: journal_voucher::ActiveModel = voucher.into();
        active.released_date = Set(Some(now));
        active.released_by_id = Set(Some(actor.user_id));
        active.posted_at = Set(Some(now));
        active.posted_by_id = Set(Some(actor.user_id));
        active.status = Set(VoucherState::Released.to_string());
        active.updated_at = Set(now);
        active.updated_by_id = Set(actor.user_id);
        let model = active.update(&txn).await?;
        txn.commit().await?;
        info!("journal voucher released");

        self.emit(EventEnvelope::new(
            entity_topics("journal_voucher", "release", voucher_id, &actor.tenant),
            Event::JournalVoucherReleased(voucher_id),
        ))
        .await;

        Ok(model)
    }

    /// Draft vouchers, most recently touched first.
    pub async fn drafts(&self, tenant: &Tenant) -> Result<Vec<journal_voucher::Model>, LedgerError> {
        Ok(journal_voucher::Entity::scoped(tenant)
            .filter(journal_voucher::Column::PrintedDate.is_null())
            .order_by_desc(journal_voucher::Column::UpdatedAt)
            .all(&*self.db)
            .await?)
    }

    /// Printed but not yet approved vouchers.
    pub async fn printed(
        &self,
        tenant: &Tenant,
    ) -> Result<Vec<journal_voucher::Model>, LedgerError> {
        Ok(journal_voucher::Entity::scoped(tenant)
            .filter(journal_voucher::Column::PrintedDate.is_not_null())
            .filter(journal_voucher::Column::ApprovedDate.is_null())
            .order_by_desc(journal_voucher::Column::UpdatedAt)
            .all(&*self.db)
            .await?)
    }

    /// Approved but not yet released vouchers.
    pub async fn approved(
        &self,
        tenant: &Tenant,
    ) -> Result<Vec<journal_voucher::Model>, LedgerError> {
        Ok(journal_voucher::Entity::scoped(tenant)
            .filter(journal_voucher::Column::ApprovedDate.is_not_null())
            .filter(journal_voucher::Column::ReleasedDate.is_null())
            .order_by_desc(journal_voucher::Column::UpdatedAt)
            .all(&*self.db)
            .await?)
    }

    /// Released vouchers.
    pub async fn released(
        &self,
        tenant: &Tenant,
    ) -> Result<Vec<journal_voucher::Model>, LedgerError> {
        Ok(journal_voucher::Entity::scoped(tenant)
            .filter(journal_voucher::Column::ReleasedDate.is_not_null())
            .order_by_desc(journal_voucher::Column::UpdatedAt)
            .all(&*self.db)
            .await?)
    }

    /// Vouchers released since midnight UTC.
    pub async fn released_today(
        &self,
        tenant: &Tenant,
    ) -> Result<Vec<journal_voucher::Model>, LedgerError> {
        let midnight = Utc::now()
            .date_naive()
            .and_time(NaiveTime::MIN)
            .and_utc();
        Ok(journal_voucher::Entity::scoped(tenant)
            .filter(journal_voucher::Column::ReleasedDate.gte(midnight))
            .order_by_desc(journal_voucher::Column::UpdatedAt)
            .all(&*self.db)
            .await?)
    }

    /// Soft-deletes a draft voucher together with its entries. Vouchers past
    /// draft are part of the audit trail and cannot be deleted.
    #[instrument(skip(self), fields(voucher_id = %voucher_id))]
    pub async fn delete_voucher(&self, actor: &Actor, voucher_id: Uuid) -> Result<(), LedgerError> {
        let voucher = self.require_voucher(&actor.tenant, voucher_id).await?;
        if voucher.state() != VoucherState::Draft {
            return Err(LedgerError::State(format!(
                "voucher {voucher_id} is {}, only a draft voucher can be deleted",
                voucher.state()
            )));
        }

        let entries = self.entries(&actor.tenant, voucher_id).await?;
        let now = Utc::now();

        let txn = self.db.begin().await?;
        for item in entries {
            let mut active: entry::ActiveModel = item.into();
            active.deleted_at = Set(Some(now));
            active.deleted_by_id = Set(Some(actor.user_id));
            active.updated_at = Set(now);
            active.updated_by_id = Set(actor.user_id);
            active.update(&txn).await?;
        }
        let mut active: journal_voucher::ActiveModel = voucher.into();
        active.deleted_at = Set(Some(now));
        active.deleted_by_id = Set(Some(actor.user_id));
        active.updated_at = Set(now);
        active.updated_by_id = Set(actor.user_id);
        active.update(&txn).await?;
        txn.commit().await?;
        info!("journal voucher soft-deleted");

        self.emit(EventEnvelope::new(
            entity_topics("journal_voucher", "delete", voucher_id, &actor.tenant),
            Event::JournalVoucherDeleted(voucher_id),
        ))
        .await;

        Ok(())
    }

    async fn require_voucher(
        &self,
        tenant: &Tenant,
        voucher_id: Uuid,
    ) -> Result<journal_voucher::Model, LedgerError> {
        self.get_voucher(tenant, voucher_id)
            .await?
            .ok_or_else(|| LedgerError::NotFound(format!("journal voucher {voucher_id}")))
    }

    /// Locking read of the voucher row inside `txn`. Entry appends and
    /// lifecycle writes both take this lock, so neither can interleave with
    /// the other's validate-then-write window.
    async fn lock_voucher(
        &self,
        txn: &DatabaseTransaction,
        tenant: &Tenant,
        voucher_id: Uuid,
    ) -> Result<journal_voucher::Model, LedgerError> {
        journal_voucher::Entity::scoped(tenant)
            .filter(journal_voucher::Column::Id.eq(voucher_id))
            .lock_exclusive()
            .one(txn)
            .await?
            .ok_or_else(|| LedgerError::NotFound(format!("journal voucher {voucher_id}")))
    }

    /// Under the voucher lock: re-reads the entries, enforces the balance
    /// invariant, then locks every referenced account in ascending-id order,
    /// validating each against its pre-transaction snapshot. An account added
    /// after the snapshots were taken is locked without a drift check.
    async fn lock_and_check(
        &self,
        txn: &DatabaseTransaction,
        tenant: &Tenant,
        voucher_id: Uuid,
        snapshots: &HashMap<Uuid, AccountSnapshot>,
    ) -> Result<(), LedgerError> {
        let entries = entry::Entity::scoped(tenant)
            .filter(entry::Column::JournalVoucherId.eq(voucher_id))
            .order_by_asc(entry::Column::Index)
            .all(txn)
            .await?;
        let (debit, credit) = entry::totals(&entries);
        if debit != credit {
            return Err(LedgerError::UnbalancedVoucher { debit, credit });
        }

        for account_id in locking::lock_order(entries.iter().map(|e| e.account_id)) {
            match snapshots.get(&account_id) {
                Some(snapshot) => {
                    locking::acquire_and_validate(txn, account_id, snapshot).await?;
                }
                None => {
                    locking::acquire_for_update(txn, account_id).await?;
                }
            }
        }
        Ok(())
    }

    /// Pre-transaction identity snapshots of every account the entries touch,
    /// keyed by account id. Re-validated under lock before the lifecycle
    /// write.
    async fn snapshot_accounts(
        &self,
        tenant: &Tenant,
        entries: &[entry::Model],
    ) -> Result<HashMap<Uuid, AccountSnapshot>, LedgerError> {
        let mut snapshots = HashMap::new();
        for account_id in locking::lock_order(entries.iter().map(|e| e.account_id)) {
            let account = account::Entity::scoped(tenant)
                .filter(account::Column::Id.eq(account_id))
                .one(&*self.db)
                .await?
                .ok_or_else(|| LedgerError::Reference(format!("account {account_id} not found")))?;
            snapshots.insert(account_id, AccountSnapshot::from(&account));
        }
        Ok(snapshots)
    }

    async fn emit(&self, envelope: EventEnvelope) {
        if let Some(sender) = &self.event_sender {
            if let Err(e) = sender.send(envelope).await {
                warn!(error = %e, "failed to send voucher event");
            }
        }
    }
}
