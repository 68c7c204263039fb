//! Default chart-of-accounts seeding for a newly provisioned tenant.
//!
//! Seeds the four code-ranged groupings, a starter definition tree under
//! each, and a set of default deposit, loan, and share-capital accounts. The
//! whole seed runs in one transaction and is idempotent per tenant: if the
//! tenant already has any grouping, nothing is written.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use sea_orm::{
    ActiveModelTrait, DatabaseConnection, DatabaseTransaction, PaginatorTrait, Set,
    TransactionTrait,
};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::entities::account::{
    self, AccountType, ComputationType, DiminishingInterestMode, EarnedUnearnedInterest,
    GeneralLedgerType, InterestDeduction, LoanSavingType, LumpsumComputationType,
    OtherDeductionEntry,
};
use crate::entities::general_ledger_accounts_grouping as grouping;
use crate::entities::general_ledger_definition as definition;
use crate::errors::LedgerError;
use crate::events::{Event, EventEnvelope, EventSender};
use crate::tenant::{Actor, TenantScoped};

struct SeedContext<'a> {
    actor: &'a Actor,
    currency_id: Uuid,
    now: DateTime<Utc>,
}

/// Seeds the default chart of accounts for the actor's tenant.
///
/// Returns `Ok(true)` when the seed ran and `Ok(false)` when the tenant
/// already had groupings and was left untouched.
#[instrument(skip(db, event_sender), fields(organization_id = %actor.tenant.organization_id, branch_id = %actor.tenant.branch_id))]
pub async fn seed_chart_of_accounts(
    db: &DatabaseConnection,
    event_sender: Option<&EventSender>,
    actor: &Actor,
    currency_id: Uuid,
) -> Result<bool, LedgerError> {
    let existing = grouping::Entity::scoped(&actor.tenant).count(db).await?;
    if existing > 0 {
        info!(groupings = existing, "tenant already seeded, skipping");
        return Ok(false);
    }

    let ctx = SeedContext {
        actor,
        currency_id,
        now: Utc::now(),
    };

    let txn = db.begin().await?;
    seed_groupings_and_definitions(&txn, &ctx).await?;
    seed_accounts(&txn, &ctx).await?;
    txn.commit().await?;
    info!("default chart of accounts seeded");

    if let Some(sender) = event_sender {
        let tenant = actor.tenant;
        let envelope = EventEnvelope::new(
            vec![
                "chart_of_accounts.seed".to_string(),
                format!("chart_of_accounts.seed.branch.{}", tenant.branch_id),
                format!("chart_of_accounts.seed.organization.{}", tenant.organization_id),
            ],
            Event::ChartOfAccountsSeeded {
                organization_id: tenant.organization_id,
                branch_id: tenant.branch_id,
            },
        );
        if let Err(e) = sender.send(envelope).await {
            warn!(error = %e, "failed to send seed event");
        }
    }

    Ok(true)
}

async fn seed_groupings_and_definitions(
    txn: &DatabaseTransaction,
    ctx: &SeedContext<'_>,
) -> Result<(), LedgerError> {
    let assets = new_grouping(
        ctx,
        "Assets",
        "Represents resources owned by the organization that have economic value and can provide future benefits.",
        dec!(1000.00),
        dec!(1999.99),
    )
    .insert(txn)
    .await?;
    let liabilities = new_grouping(
        ctx,
        "Liabilities, Equity & Reserves",
        "Encompasses the organization's debts, obligations, member equity contributions, and retained earnings reserves.",
        dec!(2000.00),
        dec!(3999.99),
    )
    .insert(txn)
    .await?;
    let income = new_grouping(
        ctx,
        "Income",
        "Revenue generated from the organization's primary operations, services, and other income-generating activities.",
        dec!(4000.00),
        dec!(4999.99),
    )
    .insert(txn)
    .await?;
    let expenses = new_grouping(
        ctx,
        "Expenses",
        "Costs incurred in the normal course of business operations, including administrative, operational, and member service expenses.",
        dec!(5000.00),
        dec!(5999.99),
    )
    .insert(txn)
    .await?;

    // Assets: one header of current assets plus a standalone PPE leaf.
    let current_assets = new_definition(
        ctx,
        assets.id,
        None,
        "Current Assets",
        "Assets expected to be converted to cash within one year",
        0,
        false,
        GeneralLedgerType::Assets,
    )
    .insert(txn)
    .await?;
    let asset_leaves = [
        ("Cash on Hand", "Physical cash and currency held by the organization"),
        ("Cash on Bank", "Funds deposited in bank accounts"),
        ("Accounts Receivable", "Money owed to the organization by members and customers"),
        ("Inventory", "Goods and materials held for sale or production"),
    ];
    for (i, (name, description)) in asset_leaves.iter().enumerate() {
        new_definition(
            ctx,
            assets.id,
            Some(current_assets.id),
            name,
            description,
            i as i32 + 1,
            true,
            GeneralLedgerType::Assets,
        )
        .insert(txn)
        .await?;
    }
    new_definition(
        ctx,
        assets.id,
        None,
        "Property, Plant & Equipment",
        "Long-term physical assets used in operations",
        5,
        true,
        GeneralLedgerType::Assets,
    )
    .insert(txn)
    .await?;

    // Liabilities & equity: two headers with two leaves each.
    let current_liabilities = new_definition(
        ctx,
        liabilities.id,
        None,
        "Current Liabilities",
        "Short-term debts and obligations",
        0,
        false,
        GeneralLedgerType::Liabilities,
    )
    .insert(txn)
    .await?;
    let member_equity = new_definition(
        ctx,
        liabilities.id,
        None,
        "Member Equity",
        "Member ownership and retained earnings",
        1,
        false,
        GeneralLedgerType::Equity,
    )
    .insert(txn)
    .await?;
    new_definition(
        ctx,
        liabilities.id,
        Some(current_liabilities.id),
        "Accounts Payable",
        "Money owed to suppliers and creditors",
        2,
        true,
        GeneralLedgerType::Liabilities,
    )
    .insert(txn)
    .await?;
    new_definition(
        ctx,
        liabilities.id,
        Some(current_liabilities.id),
        "Member Deposits",
        "Funds deposited by cooperative members",
        3,
        true,
        GeneralLedgerType::Liabilities,
    )
    .insert(txn)
    .await?;
    new_definition(
        ctx,
        liabilities.id,
        Some(member_equity.id),
        "Share Capital",
        "Member contributions to cooperative capital",
        4,
        true,
        GeneralLedgerType::Equity,
    )
    .insert(txn)
    .await?;
    new_definition(
        ctx,
        liabilities.id,
        Some(member_equity.id),
        "Retained Earnings",
        "Accumulated profits retained in the cooperative",
        5,
        true,
        GeneralLedgerType::Equity,
    )
    .insert(txn)
    .await?;

    // Income: flat posting leaves.
    let income_leaves = [
        ("Interest Income", "Income earned from loans and investments"),
        ("Service Fees", "Fees collected for various cooperative services"),
        ("Membership Fees", "Fees collected from new and existing members"),
    ];
    for (i, (name, description)) in income_leaves.iter().enumerate() {
        new_definition(
            ctx,
            income.id,
            None,
            name,
            description,
            i as i32 + 1,
            true,
            GeneralLedgerType::Revenue,
        )
        .insert(txn)
        .await?;
    }

    // Expenses: one operating header with its leaves.
    let operating = new_definition(
        ctx,
        expenses.id,
        None,
        "Operating Expenses",
        "General expenses for daily operations",
        0,
        false,
        GeneralLedgerType::Expenses,
    )
    .insert(txn)
    .await?;
    let expense_leaves = [
        ("Salaries and Wages", "Employee compensation and benefits"),
        ("Utilities Expense", "Electricity, water, internet, and other utilities"),
        ("Office Supplies", "Stationery, printing materials, and office consumables"),
        ("Rent Expense", "Monthly rental for office space and facilities"),
    ];
    for (i, (name, description)) in expense_leaves.iter().enumerate() {
        new_definition(
            ctx,
            expenses.id,
            Some(operating.id),
            name,
            description,
            i as i32 + 1,
            true,
            GeneralLedgerType::Expenses,
        )
        .insert(txn)
        .await?;
    }

    Ok(())
}

async fn seed_accounts(txn: &DatabaseTransaction, ctx: &SeedContext<'_>) -> Result<(), LedgerError> {
    let deposits: [(&str, &str, Decimal, Decimal, Decimal); 9] = [
        (
            "Regular Savings",
            "Basic savings account for general purpose savings with standard interest rates.",
            dec!(100.00),
            dec!(1000000.00),
            dec!(2.5),
        ),
        (
            "Premium Savings",
            "High-yield savings account with better interest rates for higher balances.",
            dec!(5000.00),
            dec!(5000000.00),
            dec!(4.0),
        ),
        (
            "Junior Savings",
            "Special savings account designed for minors and young members.",
            dec!(50.00),
            dec!(100000.00),
            dec!(3.0),
        ),
        (
            "Senior Citizen Savings",
            "Special savings account with higher interest rates for senior citizens.",
            dec!(500.00),
            dec!(2000000.00),
            dec!(3.5),
        ),
        (
            "Christmas Savings",
            "Seasonal savings account for holiday preparations with withdrawal restrictions.",
            dec!(200.00),
            dec!(500000.00),
            dec!(3.0),
        ),
        (
            "Education Savings",
            "Long-term savings account dedicated to educational expenses.",
            dec!(1000.00),
            dec!(3000000.00),
            dec!(4.0),
        ),
        (
            "Emergency Fund",
            "High-liquidity savings account for emergency situations.",
            dec!(500.00),
            dec!(1000000.00),
            dec!(2.0),
        ),
        (
            "Business Savings",
            "Savings account designed for small businesses and entrepreneurs.",
            dec!(2000.00),
            dec!(10000000.00),
            dec!(3.5),
        ),
        (
            "Retirement Savings",
            "Long-term savings account for retirement planning with tax benefits.",
            dec!(1000.00),
            dec!(5000000.00),
            dec!(4.5),
        ),
    ];
    for (i, (name, description, min, max, interest)) in deposits.iter().enumerate() {
        let mut active = new_account(
            ctx,
            name,
            description,
            AccountType::Deposit,
            GeneralLedgerType::Assets,
            *min,
            *max,
            i as i32 + 1,
        );
        active.interest_standard = Set(*interest);
        active.insert(txn).await?;
    }

    // Loan accounts, each chained to its interest, service-fee, and fines
    // accounts through alternative_account_id.
    let loans: [(&str, &str, Decimal, Decimal, Decimal, Decimal, Decimal, Decimal, ComputationType, InterestDeduction); 3] = [
        (
            "Emergency Loan",
            "Quick access loan for urgent financial needs and unexpected expenses.",
            dec!(1000.00),
            dec!(100000.00),
            dec!(8.5),
            dec!(7.5),
            dec!(1.0),
            dec!(2.0),
            ComputationType::Diminishing,
            InterestDeduction::Above,
        ),
        (
            "Business Loan",
            "Capital loan for business expansion, equipment purchase, and working capital needs.",
            dec!(50000.00),
            dec!(5000000.00),
            dec!(10.0),
            dec!(9.0),
            dec!(1.5),
            dec!(2.5),
            ComputationType::Diminishing,
            InterestDeduction::Above,
        ),
        (
            "Educational Loan",
            "Student loan for tuition fees, educational expenses, and academic development.",
            dec!(5000.00),
            dec!(500000.00),
            dec!(6.5),
            dec!(5.5),
            dec!(0.5),
            dec!(1.0),
            ComputationType::Straight,
            InterestDeduction::Below,
        ),
    ];
    for (i, loan) in loans.iter().enumerate() {
        let (
            name,
            description,
            min,
            max,
            interest_standard,
            interest_secured,
            fines_amortization,
            fines_maturity,
            computation_type,
            interest_deduction,
        ) = loan;
        let index = i as i32 + 10;

        let mut active = new_account(
            ctx,
            name,
            description,
            AccountType::Loan,
            GeneralLedgerType::Assets,
            *min,
            *max,
            index,
        );
        active.computation_type = Set(computation_type.clone());
        active.interest_standard = Set(*interest_standard);
        active.interest_secured = Set(*interest_secured);
        active.fines_amortization = Set(*fines_amortization);
        active.fines_maturity = Set(*fines_maturity);
        active.diminishing_interest_mode = Set(DiminishingInterestMode::ByAmortization);
        active.earned_unearned_interest = Set(EarnedUnearnedInterest::ByFormula);
        active.interest_deduction = Set(interest_deduction.clone());
        let loan_model = active.insert(txn).await?;

        let linked: [(&str, AccountType, Decimal, i32); 3] = [
            ("Interest", AccountType::Interest, dec!(1000000.00), index + 100),
            ("Service Fee", AccountType::SVFLedger, dec!(50000.00), index + 200),
            ("Fines", AccountType::Fines, dec!(100000.00), index + 300),
        ];
        for (prefix, account_type, max, linked_index) in linked {
            let mut active = new_account(
                ctx,
                &format!("{prefix} {name}"),
                &format!("{prefix} account for {description}"),
                account_type,
                GeneralLedgerType::Revenue,
                Decimal::ZERO,
                max,
                linked_index,
            );
            active.alternative_account_id = Set(Some(loan_model.id));
            active.insert(txn).await?;
        }
    }

    new_account(
        ctx,
        "Paid Up Share Capital",
        "Member's share capital contribution representing ownership stake in the cooperative.",
        AccountType::Other,
        GeneralLedgerType::Equity,
        dec!(100.00),
        dec!(1000000.00),
        10,
    )
    .insert(txn)
    .await?;

    Ok(())
}

fn new_grouping(
    ctx: &SeedContext<'_>,
    name: &str,
    description: &str,
    from_code: Decimal,
    to_code: Decimal,
) -> grouping::ActiveModel {
    grouping::ActiveModel {
        id: Set(Uuid::new_v4()),
        organization_id: Set(ctx.actor.tenant.organization_id),
        branch_id: Set(ctx.actor.tenant.branch_id),
        name: Set(name.to_string()),
        description: Set(description.to_string()),
        from_code: Set(from_code),
        to_code: Set(to_code),
        debit: Set(Decimal::ZERO),
        credit: Set(Decimal::ZERO),
        created_at: Set(ctx.now),
        created_by_id: Set(ctx.actor.user_id),
        updated_at: Set(ctx.now),
        updated_by_id: Set(ctx.actor.user_id),
        deleted_at: Set(None),
        deleted_by_id: Set(None),
    }
}

#[allow(clippy::too_many_arguments)]
fn new_definition(
    ctx: &SeedContext<'_>,
    grouping_id: Uuid,
    parent_definition_id: Option<Uuid>,
    name: &str,
    description: &str,
    index: i32,
    is_posting: bool,
    general_ledger_type: GeneralLedgerType,
) -> definition::ActiveModel {
    definition::ActiveModel {
        id: Set(Uuid::new_v4()),
        organization_id: Set(ctx.actor.tenant.organization_id),
        branch_id: Set(ctx.actor.tenant.branch_id),
        grouping_id: Set(grouping_id),
        parent_definition_id: Set(parent_definition_id),
        name: Set(name.to_string()),
        name_in_total: Set(name.to_string()),
        description: Set(description.to_string()),
        index: Set(index),
        is_posting: Set(is_posting),
        general_ledger_type: Set(general_ledger_type),
        beginning_balance_debit: Set(Decimal::ZERO),
        beginning_balance_credit: Set(Decimal::ZERO),
        created_at: Set(ctx.now),
        created_by_id: Set(ctx.actor.user_id),
        updated_at: Set(ctx.now),
        updated_by_id: Set(ctx.actor.user_id),
        deleted_at: Set(None),
        deleted_by_id: Set(None),
    }
}

#[allow(clippy::too_many_arguments)]
fn new_account(
    ctx: &SeedContext<'_>,
    name: &str,
    description: &str,
    account_type: AccountType,
    general_ledger_type: GeneralLedgerType,
    min_amount: Decimal,
    max_amount: Decimal,
    index: i32,
) -> account::ActiveModel {
    account::ActiveModel {
        id: Set(Uuid::new_v4()),
        organization_id: Set(ctx.actor.tenant.organization_id),
        branch_id: Set(ctx.actor.tenant.branch_id),
        name: Set(name.to_string()),
        description: Set(description.to_string()),
        account_type: Set(account_type),
        general_ledger_type: Set(general_ledger_type),
        computation_type: Set(ComputationType::Straight),
        currency_id: Set(ctx.currency_id),
        min_amount: Set(min_amount),
        max_amount: Set(max_amount),
        index: Set(index),
        interest_standard: Set(Decimal::ZERO),
        interest_secured: Set(Decimal::ZERO),
        fines_amortization: Set(Decimal::ZERO),
        fines_maturity: Set(Decimal::ZERO),
        grace_period_daily_amortization: Set(0),
        grace_period_daily_maturity: Set(0),
        grace_period_weekly_amortization: Set(0),
        grace_period_weekly_maturity: Set(0),
        grace_period_monthly_amortization: Set(0),
        grace_period_monthly_maturity: Set(0),
        grace_period_semi_monthly_amortization: Set(0),
        grace_period_semi_monthly_maturity: Set(0),
        grace_period_quarterly_amortization: Set(0),
        grace_period_quarterly_maturity: Set(0),
        grace_period_semi_annual_amortization: Set(0),
        grace_period_semi_annual_maturity: Set(0),
        grace_period_lumpsum_amortization: Set(0),
        grace_period_lumpsum_maturity: Set(0),
        lumpsum_computation_type: Set(LumpsumComputationType::None),
        diminishing_interest_mode: Set(DiminishingInterestMode::None),
        earned_unearned_interest: Set(EarnedUnearnedInterest::None),
        loan_saving_type: Set(LoanSavingType::Separate),
        interest_deduction: Set(InterestDeduction::Above),
        other_deduction_entry: Set(OtherDeductionEntry::None),
        alternative_account_id: Set(None),
        general_ledger_definition_id: Set(None),
        account_classification_id: Set(None),
        account_category_id: Set(None),
        computation_sheet_id: Set(None),
        allow_withdraw: Set(true),
        allow_deposit: Set(true),
        allow_journal: Set(true),
        allow_payment: Set(true),
        allow_adjustment: Set(true),
        allow_journal_voucher: Set(true),
        allow_check_voucher: Set(true),
        created_at: Set(ctx.now),
        created_by_id: Set(ctx.actor.user_id),
        updated_at: Set(ctx.now),
        updated_by_id: Set(ctx.actor.user_id),
        deleted_at: Set(None),
        deleted_by_id: Set(None),
    }
}
