use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::account::GeneralLedgerType;
use crate::tenant::TenantScoped;

/// A node in the self-referencing definition tree of one grouping.
///
/// Parent references are plain ids resolved by lookup; the tree is kept
/// acyclic by checking the parent chain before any re-parenting write. A node
/// with children is conventionally non-posting (`is_posting == false`).
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "general_ledger_definitions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    pub organization_id: Uuid,
    pub branch_id: Uuid,

    pub grouping_id: Uuid,
    /// Parent node within the same grouping, if any.
    pub parent_definition_id: Option<Uuid>,

    pub name: String,
    /// Display name used when the node appears in a total line.
    pub name_in_total: String,
    pub description: String,

    /// Sibling display order, ascending.
    pub index: i32,
    /// True for posting leaves, false for aggregation headers.
    pub is_posting: bool,
    pub general_ledger_type: GeneralLedgerType,

    pub beginning_balance_debit: Decimal,
    pub beginning_balance_credit: Decimal,

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
