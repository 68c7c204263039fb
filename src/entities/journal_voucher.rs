use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::tenant::TenantScoped;

/// Lifecycle state of a journal voucher, derived from its timestamps.
///
/// Transitions are monotonic: draft → printed → approved → released, and a
/// later stage's timestamp is never cleared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum VoucherState {
    Draft,
    Printed,
    Approved,
    Released,
}

/// A posting batch of journal voucher entries.
///
/// The batch may only progress past draft when the sum of its entries' debits
/// equals the sum of their credits.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "journal_vouchers")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    pub organization_id: Uuid,
    pub branch_id: Uuid,
    pub currency_id: Uuid,

    pub name: String,
    pub voucher_number: String,
    pub cash_voucher_number: String,
    pub date: DateTime<Utc>,
    pub description: String,
    pub reference: String,
    /// Status label kept alongside the lifecycle timestamps; "draft" until
    /// released.
    pub status: String,
    /// Number of times the voucher has been printed.
    pub print_number: i32,

    pub printed_date: Option<DateTime<Utc>>,
    pub printed_by_id: Option<Uuid>,
    pub approved_date: Option<DateTime<Utc>>,
    pub approved_by_id: Option<Uuid>,
    pub released_date: Option<DateTime<Utc>>,
    pub released_by_id: Option<Uuid>,
    pub posted_at: Option<DateTime<Utc>>,
    pub posted_by_id: Option<Uuid>,

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
    /// Derive the lifecycle state from timestamp nullity. The furthest stage
    /// whose timestamp is set wins, so a row that somehow carries an approved
    /// date without a printed one still reads as approved rather than
    /// panicking.
    pub fn state(&self) -> VoucherState {
        if self.released_date.is_some() {
            VoucherState::Released
        } else if self.approved_date.is_some() {
            VoucherState::Approved
        } else if self.printed_date.is_some() {
            VoucherState::Printed
        } else {
            VoucherState::Draft
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn voucher() -> Model {
        Model {
            id: Uuid::new_v4(),
            organization_id: Uuid::new_v4(),
            branch_id: Uuid::new_v4(),
            currency_id: Uuid::new_v4(),
            name: "JV-0001".into(),
            voucher_number: "0001".into(),
            cash_voucher_number: String::new(),
            date: Utc::now(),
            description: String::new(),
            reference: String::new(),
            status: "draft".into(),
            print_number: 0,
            printed_date: None,
            printed_by_id: None,
            approved_date: None,
            approved_by_id: None,
            released_date: None,
            released_by_id: None,
            posted_at: None,
            posted_by_id: None,
            created_at: Utc::now(),
            created_by_id: Uuid::new_v4(),
            updated_at: Utc::now(),
            updated_by_id: Uuid::new_v4(),
            deleted_at: None,
            deleted_by_id: None,
        }
    }

    #[test]
    fn state_follows_timestamp_nullity() {
        let mut v = voucher();
        assert_eq!(v.state(), VoucherState::Draft);

        v.printed_date = Some(Utc::now());
        assert_eq!(v.state(), VoucherState::Printed);

        v.approved_date = Some(Utc::now());
        assert_eq!(v.state(), VoucherState::Approved);

        v.released_date = Some(Utc::now());
        assert_eq!(v.state(), VoucherState::Released);
    }

    #[test]
    fn state_display_is_lowercase() {
        assert_eq!(VoucherState::Draft.to_string(), "draft");
        assert_eq!(VoucherState::Released.to_string(), "released");
    }
}
