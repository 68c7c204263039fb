use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::tenant::TenantScoped;

/// Classification of a leaf financial account.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(50))")]
pub enum AccountType {
    #[sea_orm(string_value = "Deposit")]
    Deposit,
    #[sea_orm(string_value = "Loan")]
    Loan,
    #[sea_orm(string_value = "A/R-Ledger")]
    ARLedger,
    #[sea_orm(string_value = "A/R-Aging")]
    ARAging,
    #[sea_orm(string_value = "Fines")]
    Fines,
    #[sea_orm(string_value = "Interest")]
    Interest,
    #[sea_orm(string_value = "SVF-Ledger")]
    SVFLedger,
    #[sea_orm(string_value = "W-Off")]
    WOff,
    #[sea_orm(string_value = "A/P-Ledger")]
    APLedger,
    #[sea_orm(string_value = "Other")]
    Other,
    #[sea_orm(string_value = "Time Deposit")]
    TimeDeposit,
}

/// Financial-statement category. Used both as an account's statement type and
/// as the category of a general-ledger definition node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(50))")]
pub enum GeneralLedgerType {
    #[sea_orm(string_value = "Assets")]
    Assets,
    #[sea_orm(string_value = "Liabilities")]
    Liabilities,
    #[sea_orm(string_value = "Equity")]
    Equity,
    #[sea_orm(string_value = "Revenue")]
    Revenue,
    #[sea_orm(string_value = "Expenses")]
    Expenses,
}

/// Interest/amortization computation algorithm configured on an account.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(50))")]
pub enum ComputationType {
    #[sea_orm(string_value = "Straight")]
    Straight,
    #[sea_orm(string_value = "Diminishing")]
    Diminishing,
    #[sea_orm(string_value = "DiminishingAddOn")]
    DiminishingAddOn,
    #[sea_orm(string_value = "DiminishingYearly")]
    DiminishingYearly,
    #[sea_orm(string_value = "DiminishingStraight")]
    DiminishingStraight,
    #[sea_orm(string_value = "DiminishingQuarterly")]
    DiminishingQuarterly,
}

#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(50))")]
pub enum LumpsumComputationType {
    #[sea_orm(string_value = "None")]
    None,
    #[sea_orm(string_value = "Compute Fines Maturity")]
    FinesMaturity,
    #[sea_orm(string_value = "Compute Interest Maturity / Terms")]
    InterestMaturity,
    #[sea_orm(string_value = "Compute Advance Interest")]
    AdvanceInterest,
}

#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(50))")]
pub enum DiminishingInterestMode {
    #[sea_orm(string_value = "None")]
    None,
    #[sea_orm(string_value = "By Amortization")]
    ByAmortization,
    #[sea_orm(string_value = "By Amortization Daily (Arrears)")]
    ByAmortizationDailyArrears,
}

/// How interest is recorded for an account.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(50))")]
pub enum EarnedUnearnedInterest {
    #[sea_orm(string_value = "None")]
    None,
    #[sea_orm(string_value = "By Formula")]
    ByFormula,
    #[sea_orm(string_value = "By Formula + Actual Pay")]
    ByFormulaActualPay,
    #[sea_orm(string_value = "By Advance Interest + Actual Pay")]
    ByAdvanceInterestActualPay,
}

/// How loan-linked savings are stored and reported.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(50))")]
pub enum LoanSavingType {
    #[sea_orm(string_value = "Separate")]
    Separate,
    #[sea_orm(string_value = "Single Ledger")]
    SingleLedger,
    #[sea_orm(string_value = "Single Ledger Semi (15/30)")]
    SingleLedgerSemi,
    #[sea_orm(string_value = "Single Ledger Semi Within Maturity")]
    SingleLedgerSemiMaturity,
}

#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(10))")]
pub enum InterestDeduction {
    #[sea_orm(string_value = "Above")]
    Above,
    #[sea_orm(string_value = "Below")]
    Below,
}

#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
pub enum OtherDeductionEntry {
    #[sea_orm(string_value = "None")]
    None,
    #[sea_orm(string_value = "Health Care")]
    HealthCare,
}

/// A leaf financial account in the chart of accounts.
///
/// Scoped to an (organization, branch) tenant pair and soft-deleted only, so
/// historical ledger entries keep a valid reference. `alternative_account_id`
/// chains an interest/fee/fines account to its parent loan account.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "accounts")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    pub organization_id: Uuid,
    pub branch_id: Uuid,

    pub name: String,
    pub description: String,
    pub account_type: AccountType,
    pub general_ledger_type: GeneralLedgerType,
    pub computation_type: ComputationType,
    pub currency_id: Uuid,

    /// Smallest transactable amount.
    pub min_amount: Decimal,
    /// Largest transactable amount. Never below `min_amount`.
    pub max_amount: Decimal,
    /// Sibling display order within the tenant's chart.
    pub index: i32,

    pub interest_standard: Decimal,
    pub interest_secured: Decimal,
    pub fines_amortization: Decimal,
    pub fines_maturity: Decimal,

    // Fines grace-period day counts, one pair per payment frequency.
    pub grace_period_daily_amortization: i32,
    pub grace_period_daily_maturity: i32,
    pub grace_period_weekly_amortization: i32,
    pub grace_period_weekly_maturity: i32,
    pub grace_period_monthly_amortization: i32,
    pub grace_period_monthly_maturity: i32,
    pub grace_period_semi_monthly_amortization: i32,
    pub grace_period_semi_monthly_maturity: i32,
    pub grace_period_quarterly_amortization: i32,
    pub grace_period_quarterly_maturity: i32,
    pub grace_period_semi_annual_amortization: i32,
    pub grace_period_semi_annual_maturity: i32,
    pub grace_period_lumpsum_amortization: i32,
    pub grace_period_lumpsum_maturity: i32,

    pub lumpsum_computation_type: LumpsumComputationType,
    pub diminishing_interest_mode: DiminishingInterestMode,
    pub earned_unearned_interest: EarnedUnearnedInterest,
    pub loan_saving_type: LoanSavingType,
    pub interest_deduction: InterestDeduction,
    pub other_deduction_entry: OtherDeductionEntry,

    /// Self-reference chaining this account to a parent loan account.
    pub alternative_account_id: Option<Uuid>,
    pub general_ledger_definition_id: Option<Uuid>,
    pub account_classification_id: Option<Uuid>,
    pub account_category_id: Option<Uuid>,
    pub computation_sheet_id: Option<Uuid>,

    // Posting-source gates: which transaction sources may post to this
    // account. All default to true.
    pub allow_withdraw: bool,
    pub allow_deposit: bool,
    pub allow_journal: bool,
    pub allow_payment: bool,
    pub allow_adjustment: bool,
    pub allow_journal_voucher: bool,
    pub allow_check_voucher: bool,

    pub created_at: DateTime<Utc>,
    pub created_by_id: Uuid,
    pub updated_at: DateTime<Utc>,
    pub updated_by_id: Uuid,
    pub deleted_at: Option<DateTime<Utc>>,
    pub deleted_by_id: Option<Uuid>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl TenantScoped for Entity {
    fn organization_column() -> Column {
        Column::OrganizationId
    }

    fn branch_column() -> Column {
        Column::BranchId
    }

    fn deleted_at_column() -> Column {
        Column::DeletedAt
    }
}

impl Model {
    /// Whether `amount` falls inside the account's transactable range.
    pub fn is_transactable(&self, amount: Decimal) -> bool {
        self.min_amount <= amount && amount <= self.max_amount
    }
}
