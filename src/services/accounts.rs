//! Chart-of-accounts store: create, classify, and retrieve accounts scoped to
//! a tenant, and maintain the alternative-account chaining that groups a loan
//! account with its interest/fee/fines accounts.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::Utc;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, PaginatorTrait, QueryFilter, QueryOrder,
    Set,
};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};
use uuid::Uuid;
use validator::Validate;

use crate::entities::account::{
    self, AccountType, ComputationType, DiminishingInterestMode, EarnedUnearnedInterest,
    GeneralLedgerType, InterestDeduction, LoanSavingType, LumpsumComputationType,
    OtherDeductionEntry,
};
use crate::errors::LedgerError;
use crate::events::{entity_topics, Event, EventEnvelope, EventSender};
use crate::tenant::{Actor, Tenant, TenantScoped};

/// Fines grace-period day counts, one (amortization, maturity) pair per
/// payment frequency.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GracePeriods {
    pub daily_amortization: i32,
    pub daily_maturity: i32,
    pub weekly_amortization: i32,
    pub weekly_maturity: i32,
    pub monthly_amortization: i32,
    pub monthly_maturity: i32,
    pub semi_monthly_amortization: i32,
    pub semi_monthly_maturity: i32,
    pub quarterly_amortization: i32,
    pub quarterly_maturity: i32,
    pub semi_annual_amortization: i32,
    pub semi_annual_maturity: i32,
    pub lumpsum_amortization: i32,
    pub lumpsum_maturity: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateAccountRequest {
    #[validate(length(min = 1, max = 255, message = "Account name is required"))]
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub account_type: AccountType,
    pub general_ledger_type: GeneralLedgerType,
    #[serde(default)]
    pub computation_type: Option<ComputationType>,
    #[validate(required)]
    pub currency_id: Option<Uuid>,
    #[serde(default)]
    pub min_amount: Option<Decimal>,
    #[serde(default)]
    pub max_amount: Option<Decimal>,
    #[serde(default)]
    pub index: Option<i32>,
    #[serde(default)]
    pub interest_standard: Decimal,
    #[serde(default)]
    pub interest_secured: Decimal,
    #[serde(default)]
    pub fines_amortization: Decimal,
    #[serde(default)]
    pub fines_maturity: Decimal,
    #[serde(default)]
    pub grace_periods: GracePeriods,
    #[serde(default)]
    pub lumpsum_computation_type: Option<LumpsumComputationType>,
    #[serde(default)]
    pub diminishing_interest_mode: Option<DiminishingInterestMode>,
    #[serde(default)]
    pub earned_unearned_interest: Option<EarnedUnearnedInterest>,
    #[serde(default)]
    pub loan_saving_type: Option<LoanSavingType>,
    #[serde(default)]
    pub interest_deduction: Option<InterestDeduction>,
    #[serde(default)]
    pub other_deduction_entry: Option<OtherDeductionEntry>,
    #[serde(default)]
    pub general_ledger_definition_id: Option<Uuid>,
    #[serde(default)]
    pub account_classification_id: Option<Uuid>,
    #[serde(default)]
    pub account_category_id: Option<Uuid>,
    #[serde(default)]
    pub computation_sheet_id: Option<Uuid>,
    // Posting-source gates; unset means allowed.
    #[serde(default)]
    pub allow_withdraw: Option<bool>,
    #[serde(default)]
    pub allow_deposit: Option<bool>,
    #[serde(default)]
    pub allow_journal: Option<bool>,
    #[serde(default)]
    pub allow_payment: Option<bool>,
    #[serde(default)]
    pub allow_adjustment: Option<bool>,
    #[serde(default)]
    pub allow_journal_voucher: Option<bool>,
    #[serde(default)]
    pub allow_check_voucher: Option<bool>,
}

impl Default for CreateAccountRequest {
    fn default() -> Self {
        Self {
            name: String::new(),
            description: String::new(),
            account_type: AccountType::Deposit,
            general_ledger_type: GeneralLedgerType::Assets,
            computation_type: None,
            currency_id: None,
            min_amount: None,
            max_amount: None,
            index: None,
            interest_standard: Decimal::ZERO,
            interest_secured: Decimal::ZERO,
            fines_amortization: Decimal::ZERO,
            fines_maturity: Decimal::ZERO,
            grace_periods: GracePeriods::default(),
            lumpsum_computation_type: None,
            diminishing_interest_mode: None,
            earned_unearned_interest: None,
            loan_saving_type: None,
            interest_deduction: None,
            other_deduction_entry: None,
            general_ledger_definition_id: None,
            account_classification_id: None,
            account_category_id: None,
            computation_sheet_id: None,
            allow_withdraw: None,
            allow_deposit: None,
            allow_journal: None,
            allow_payment: None,
            allow_adjustment: None,
            allow_journal_voucher: None,
            allow_check_voucher: None,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateAccountRequest {
    #[validate(length(min = 1, max = 255, message = "Account name must not be empty"))]
    pub name: Option<String>,
    pub description: Option<String>,
    pub min_amount: Option<Decimal>,
    pub max_amount: Option<Decimal>,
    pub index: Option<i32>,
    pub computation_type: Option<ComputationType>,
}

/// Service for the chart of accounts.
#[derive(Clone)]
pub struct AccountService {
    db: Arc<DatabaseConnection>,
    event_sender: Option<Arc<EventSender>>,
}

impl AccountService {
    pub fn new(db: Arc<DatabaseConnection>, event_sender: Option<Arc<EventSender>>) -> Self {
        Self { db, event_sender }
    }

    /// Creates a leaf financial account for the actor's tenant.
    #[instrument(skip(self, request), fields(organization_id = %actor.tenant.organization_id, branch_id = %actor.tenant.branch_id, name = %request.name))]
    pub async fn create_account(
        &self,
        actor: &Actor,
        request: CreateAccountRequest,
    ) -> Result<account::Model, LedgerError> {
        request
            .validate()
            .map_err(|e| LedgerError::Validation(e.to_string()))?;

        let min_amount = request.min_amount.unwrap_or(Decimal::ZERO);
        let max_amount = request.max_amount.unwrap_or(dec!(50000));
        if min_amount > max_amount {
            return Err(LedgerError::Validation(format!(
                "min_amount {min_amount} exceeds max_amount {max_amount}"
            )));
        }

        let currency_id = request
            .currency_id
            .ok_or_else(|| LedgerError::Validation("Currency is required".into()))?;

        let index = match request.index {
            Some(index) => index,
            None => {
                let existing = account::Entity::scoped(&actor.tenant)
                    .count(&*self.db)
                    .await?;
                existing as i32
            }
        };

        let now = Utc::now();
        let id = Uuid::new_v4();
        let gp = request.grace_periods;

        let model = account::ActiveModel {
            id: Set(id),
            organization_id: Set(actor.tenant.organization_id),
            branch_id: Set(actor.tenant.branch_id),
            name: Set(request.name),
            description: Set(request.description),
            account_type: Set(request.account_type),
            general_ledger_type: Set(request.general_ledger_type),
            computation_type: Set(request.computation_type.unwrap_or(ComputationType::Straight)),
            currency_id: Set(currency_id),
            min_amount: Set(min_amount),
            max_amount: Set(max_amount),
            index: Set(index),
            interest_standard: Set(request.interest_standard),
            interest_secured: Set(request.interest_secured),
            fines_amortization: Set(request.fines_amortization),
            fines_maturity: Set(request.fines_maturity),
            grace_period_daily_amortization: Set(gp.daily_amortization),
            grace_period_daily_maturity: Set(gp.daily_maturity),
            grace_period_weekly_amortization: Set(gp.weekly_amortization),
            grace_period_weekly_maturity: Set(gp.weekly_maturity),
            grace_period_monthly_amortization: Set(gp.monthly_amortization),
            grace_period_monthly_maturity: Set(gp.monthly_maturity),
            grace_period_semi_monthly_amortization: Set(gp.semi_monthly_amortization),
            grace_period_semi_monthly_maturity: Set(gp.semi_monthly_maturity),
            grace_period_quarterly_amortization: Set(gp.quarterly_amortization),
            grace_period_quarterly_maturity: Set(gp.quarterly_maturity),
            grace_period_semi_annual_amortization: Set(gp.semi_annual_amortization),
            grace_period_semi_annual_maturity: Set(gp.semi_annual_maturity),
            grace_period_lumpsum_amortization: Set(gp.lumpsum_amortization),
            grace_period_lumpsum_maturity: Set(gp.lumpsum_maturity),
            lumpsum_computation_type: Set(request
                .lumpsum_computation_type
                .unwrap_or(LumpsumComputationType::None)),
            diminishing_interest_mode: Set(request
                .diminishing_interest_mode
                .unwrap_or(DiminishingInterestMode::None)),
            earned_unearned_interest: Set(request
                .earned_unearned_interest
                .unwrap_or(EarnedUnearnedInterest::None)),
            loan_saving_type: Set(request.loan_saving_type.unwrap_or(LoanSavingType::Separate)),
            interest_deduction: Set(request
                .interest_deduction
                .unwrap_or(InterestDeduction::Above)),
            other_deduction_entry: Set(request
                .other_deduction_entry
                .unwrap_or(OtherDeductionEntry::None)),
            alternative_account_id: Set(None),
            general_ledger_definition_id: Set(request.general_ledger_definition_id),
            account_classification_id: Set(request.account_classification_id),
            account_category_id: Set(request.account_category_id),
            computation_sheet_id: Set(request.computation_sheet_id),
            allow_withdraw: Set(request.allow_withdraw.unwrap_or(true)),
            allow_deposit: Set(request.allow_deposit.unwrap_or(true)),
            allow_journal: Set(request.allow_journal.unwrap_or(true)),
            allow_payment: Set(request.allow_payment.unwrap_or(true)),
            allow_adjustment: Set(request.allow_adjustment.unwrap_or(true)),
            allow_journal_voucher: Set(request.allow_journal_voucher.unwrap_or(true)),
            allow_check_voucher: Set(request.allow_check_voucher.unwrap_or(true)),
            created_at: Set(now),
            created_by_id: Set(actor.user_id),
            updated_at: Set(now),
            updated_by_id: Set(actor.user_id),
            deleted_at: Set(None),
            deleted_by_id: Set(None),
        };

        let model = model.insert(&*self.db).await?;
        info!(account_id = %id, "account created");

        self.emit(EventEnvelope::new(
            entity_topics("account", "create", id, &actor.tenant),
            Event::AccountCreated(id),
        ))
        .await;

        Ok(model)
    }

    /// A single live account visible to the tenant.
    pub async fn get_account(
        &self,
        tenant: &Tenant,
        account_id: Uuid,
    ) -> Result<Option<account::Model>, LedgerError> {
        Ok(account::Entity::scoped(tenant)
            .filter(account::Column::Id.eq(account_id))
            .one(&*self.db)
            .await?)
    }

    /// All live accounts for the tenant, in presentation order.
    pub async fn list_by_tenant(&self, tenant: &Tenant) -> Result<Vec<account::Model>, LedgerError> {
        Ok(account::Entity::scoped(tenant)
            .order_by_asc(account::Column::Index)
            .order_by_asc(account::Column::Name)
            .all(&*self.db)
            .await?)
    }

    /// Live accounts of one classification.
    pub async fn find_by_type(
        &self,
        tenant: &Tenant,
        account_type: AccountType,
    ) -> Result<Vec<account::Model>, LedgerError> {
        Ok(account::Entity::scoped(tenant)
            .filter(account::Column::AccountType.eq(account_type))
            .order_by_asc(account::Column::Index)
            .all(&*self.db)
            .await?)
    }

    /// All loan accounts for the tenant.
    pub async fn loan_accounts(&self, tenant: &Tenant) -> Result<Vec<account::Model>, LedgerError> {
        self.find_by_type(tenant, AccountType::Loan).await
    }

    /// Updates mutable account fields, re-checking the amount range.
    #[instrument(skip(self, request), fields(account_id = %account_id))]
    pub async fn update_account(
        &self,
        actor: &Actor,
        account_id: Uuid,
        request: UpdateAccountRequest,
    ) -> Result<account::Model, LedgerError> {
        request
            .validate()
            .map_err(|e| LedgerError::Validation(e.to_string()))?;

        let existing = self
            .get_account(&actor.tenant, account_id)
            .await?
            .ok_or_else(|| LedgerError::NotFound(format!("account {account_id}")))?;

        let min_amount = request.min_amount.unwrap_or(existing.min_amount);
        let max_amount = request.max_amount.unwrap_or(existing.max_amount);
        if min_amount > max_amount {
            return Err(LedgerError::Validation(format!(
                "min_amount {min_amount} exceeds max_amount {max_amount}"
            )));
        }

        let mut active: account::ActiveModel = existing.into();
        if let Some(name) = request.name {
            active.name = Set(name);
        }
        if let Some(description) = request.description {
            active.description = Set(description);
        }
        if let Some(computation_type) = request.computation_type {
            active.computation_type = Set(computation_type);
        }
        if let Some(index) = request.index {
            active.index = Set(index);
        }
        active.min_amount = Set(min_amount);
        active.max_amount = Set(max_amount);
        active.updated_at = Set(Utc::now());
        active.updated_by_id = Set(actor.user_id);

        let model = active.update(&*self.db).await?;
        info!(account_id = %account_id, "account updated");

        self.emit(EventEnvelope::new(
            entity_topics("account", "update", account_id, &actor.tenant),
            Event::AccountUpdated(account_id),
        ))
        .await;

        Ok(model)
    }

    /// Soft-deletes an account. The tombstoned row keeps historical ledger
    /// entries valid.
    #[instrument(skip(self), fields(account_id = %account_id))]
    pub async fn delete_account(&self, actor: &Actor, account_id: Uuid) -> Result<(), LedgerError> {
        let existing = self
            .get_account(&actor.tenant, account_id)
            .await?
            .ok_or_else(|| LedgerError::NotFound(format!("account {account_id}")))?;

        let mut active: account::ActiveModel = existing.into();
        let now = Utc::now();
        active.deleted_at = Set(Some(now));
        active.deleted_by_id = Set(Some(actor.user_id));
        active.updated_at = Set(now);
        active.updated_by_id = Set(actor.user_id);
        active.update(&*self.db).await?;
        info!(account_id = %account_id, "account soft-deleted");

        self.emit(EventEnvelope::new(
            entity_topics("account", "delete", account_id, &actor.tenant),
            Event::AccountDeleted(account_id),
        ))
        .await;

        Ok(())
    }

    /// Chains `alternate_account_id` to `loan_account_id`, grouping a loan
    /// with an associated interest/fee/fines account.
    ///
    /// Both accounts must live in the actor's tenant, and the chain
    /// `loan → alternate → ...` must stay acyclic.
    #[instrument(skip(self), fields(loan_account_id = %loan_account_id, alternate_account_id = %alternate_account_id))]
    pub async fn chain_alternative(
        &self,
        actor: &Actor,
        loan_account_id: Uuid,
        alternate_account_id: Uuid,
    ) -> Result<account::Model, LedgerError> {
        let loan = account::Entity::live()
            .filter(account::Column::Id.eq(loan_account_id))
            .one(&*self.db)
            .await?
            .ok_or_else(|| LedgerError::NotFound(format!("account {loan_account_id}")))?;
        let alternate = account::Entity::live()
            .filter(account::Column::Id.eq(alternate_account_id))
            .one(&*self.db)
            .await?
            .ok_or_else(|| LedgerError::NotFound(format!("account {alternate_account_id}")))?;

        for model in [&loan, &alternate] {
            if model.organization_id != actor.tenant.organization_id
                || model.branch_id != actor.tenant.branch_id
            {
                return Err(LedgerError::Reference(format!(
                    "account {} belongs to a different tenant",
                    model.id
                )));
            }
        }

        // Walk the alternative chain starting at the alternate; the visited
        // set bounds the walk by the chain length.
        let mut visited: HashSet<Uuid> = HashSet::new();
        visited.insert(loan_account_id);
        let mut cursor = Some(alternate_account_id);
        while let Some(id) = cursor {
            if !visited.insert(id) {
                return Err(LedgerError::Cycle(format!(
                    "chaining account {alternate_account_id} to {loan_account_id} would close a loop at {id}"
                )));
            }
            let link = account::Entity::live()
                .filter(account::Column::Id.eq(id))
                .one(&*self.db)
                .await?
                .ok_or_else(|| LedgerError::Reference(format!("account {id} in chain not found")))?;
            cursor = link.alternative_account_id;
        }

        let mut active: account::ActiveModel = loan.into();
        active.alternative_account_id = Set(Some(alternate_account_id));
        active.updated_at = Set(Utc::now());
        active.updated_by_id = Set(actor.user_id);
        let model = active.update(&*self.db).await?;
        info!("alternative account chained");

        self.emit(EventEnvelope::new(
            entity_topics("account", "update", loan_account_id, &actor.tenant),
            Event::AccountUpdated(loan_account_id),
        ))
        .await;

        Ok(model)
    }

    async fn emit(&self, envelope: EventEnvelope) {
        if let Some(sender) = &self.event_sender {
            if let Err(e) = sender.send(envelope).await {
                warn!(error = %e, "failed to send account event");
            }
        }
    }
}
