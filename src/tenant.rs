//! Tenant scoping for every entity in this core.
//!
//! Every record is owned by an (organization, branch) pair and is
//! soft-deleted rather than removed. [`TenantScoped::scoped`] is the single
//! place those two filters are applied; services never hand-write the
//! equivalent `WHERE` clauses.

use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, Select};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The (organization, branch) pair scoping visibility and mutation rights.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tenant {
    pub organization_id: Uuid,
    pub branch_id: Uuid,
}

impl Tenant {
    pub fn new(organization_id: Uuid, branch_id: Uuid) -> Self {
        Self {
            organization_id,
            branch_id,
        }
    }
}

/// An already-authorized user acting within a tenant. This core trusts the
/// caller to have performed authorization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub tenant: Tenant,
    pub user_id: Uuid,
}

impl Actor {
    pub fn new(tenant: Tenant, user_id: Uuid) -> Self {
        Self { tenant, user_id }
    }
}

/// Mandatory query decorator: tenant filter plus soft-delete tombstone filter.
pub trait TenantScoped: EntityTrait {
    fn organization_column() -> Self::Column;
    fn branch_column() -> Self::Column;
    fn deleted_at_column() -> Self::Column;

    /// All live rows visible to `tenant`.
    fn scoped(tenant: &Tenant) -> Select<Self> {
        Self::find()
            .filter(Self::organization_column().eq(tenant.organization_id))
            .filter(Self::branch_column().eq(tenant.branch_id))
            .filter(Self::deleted_at_column().is_null())
    }

    /// All live rows regardless of tenant. Used when an operation must
    /// distinguish "does not exist" from "exists in another tenant".
    fn live() -> Select<Self> {
        Self::find().filter(Self::deleted_at_column().is_null())
    }
}
