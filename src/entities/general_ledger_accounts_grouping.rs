use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::tenant::TenantScoped;

/// A top-level, code-ranged bucket of the chart of accounts, e.g. "Assets"
/// covering codes 1000.00 to 1999.99. Owns an ordered collection of
/// general-ledger definition nodes.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "general_ledger_accounts_groupings")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    pub organization_id: Uuid,
    pub branch_id: Uuid,

    pub name: String,
    pub description: String,

    /// Inclusive lower bound of the numeric code range. Never above `to_code`.
    pub from_code: Decimal,
    pub to_code: Decimal,

    /// Aggregate totals, maintained by reporting jobs outside this core.
    pub debit: Decimal,
    pub credit: Decimal,

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
