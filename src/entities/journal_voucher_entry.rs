use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::tenant::TenantScoped;

/// One debit-or-credit line of a journal voucher.
///
/// Conventional double-entry discipline expects exactly one of `debit` and
/// `credit` to be non-zero, but only the voucher-level sum invariant is
/// enforced; an entry carrying both sides is stored as given.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "journal_voucher_entries")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    pub organization_id: Uuid,
    pub branch_id: Uuid,

    pub journal_voucher_id: Uuid,
    pub account_id: Uuid,

    /// Optional member payee.
    pub member_profile_id: Option<Uuid>,
    /// Optional employee payee.
    pub employee_user_id: Option<Uuid>,

    pub description: String,
    pub debit: Decimal,
    pub credit: Decimal,
    /// Display order within the voucher; not load-bearing for the balance
    /// invariant.
    pub index: i32,

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

/// Sum the debit and credit sides of a set of entries exactly.
pub fn totals(entries: &[Model]) -> (Decimal, Decimal) {
    entries.iter().fold(
        (Decimal::ZERO, Decimal::ZERO),
        |(debit, credit), entry| (debit + entry.debit, credit + entry.credit),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn entry(debit: Decimal, credit: Decimal) -> Model {
        Model {
            id: Uuid::new_v4(),
            organization_id: Uuid::new_v4(),
            branch_id: Uuid::new_v4(),
            journal_voucher_id: Uuid::new_v4(),
            account_id: Uuid::new_v4(),
            member_profile_id: None,
            employee_user_id: None,
            description: String::new(),
            debit,
            credit,
            index: 0,
            created_at: Utc::now(),
            created_by_id: Uuid::new_v4(),
            updated_at: Utc::now(),
            updated_by_id: Uuid::new_v4(),
            deleted_at: None,
            deleted_by_id: None,
        }
    }

    #[test]
    fn totals_sum_both_sides_exactly() {
        let entries = vec![
            entry(dec!(500.00), Decimal::ZERO),
            entry(Decimal::ZERO, dec!(300.00)),
            entry(Decimal::ZERO, dec!(200.00)),
        ];

        let (debit, credit) = totals(&entries);
        assert_eq!(debit, dec!(500.00));
        assert_eq!(credit, dec!(500.00));
    }

    #[test]
    fn totals_of_no_entries_are_zero() {
        let (debit, credit) = totals(&[]);
        assert_eq!(debit, Decimal::ZERO);
        assert_eq!(credit, Decimal::ZERO);
    }

    #[test]
    fn totals_keep_exact_cents() {
        // 0.10 + 0.20 == 0.30 exactly under decimal arithmetic; this is the
        // case binary floating point gets wrong.
        let entries = vec![
            entry(dec!(0.10), Decimal::ZERO),
            entry(dec!(0.20), Decimal::ZERO),
            entry(Decimal::ZERO, dec!(0.30)),
        ];

        let (debit, credit) = totals(&entries);
        assert_eq!(debit, credit);
    }
}
