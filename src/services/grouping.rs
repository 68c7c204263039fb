//! Ledger grouping hierarchy: code-ranged groupings, the self-referencing
//! general-ledger definition tree under each, and an ordered tree renderer
//! for financial-statement display.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, PaginatorTrait, QueryFilter, QueryOrder,
    Set,
};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};
use uuid::Uuid;
use validator::Validate;

use crate::entities::account::GeneralLedgerType;
use crate::entities::general_ledger_accounts_grouping as grouping;
use crate::entities::general_ledger_definition as definition;
use crate::errors::LedgerError;
use crate::events::{entity_topics, Event, EventEnvelope, EventSender};
use crate::tenant::{Actor, Tenant, TenantScoped};

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct CreateGroupingRequest {
    #[validate(length(min = 1, max = 255, message = "Grouping name is required"))]
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub from_code: Decimal,
    pub to_code: Decimal,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateGroupingRequest {
    #[validate(length(min = 1, max = 255, message = "Grouping name must not be empty"))]
    pub name: Option<String>,
    pub description: Option<String>,
    pub from_code: Option<Decimal>,
    pub to_code: Option<Decimal>,
    /// Aggregate totals, written back by reporting jobs.
    pub debit: Option<Decimal>,
    pub credit: Option<Decimal>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateDefinitionRequest {
    pub grouping_id: Uuid,
    #[serde(default)]
    pub parent_definition_id: Option<Uuid>,
    #[validate(length(min = 1, max = 255, message = "Definition name is required"))]
    pub name: String,
    #[serde(default)]
    pub name_in_total: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub index: Option<i32>,
    #[serde(default)]
    pub is_posting: bool,
    pub general_ledger_type: GeneralLedgerType,
    #[serde(default)]
    pub beginning_balance_debit: Decimal,
    #[serde(default)]
    pub beginning_balance_credit: Decimal,
}

impl Default for CreateDefinitionRequest {
    fn default() -> Self {
        Self {
            grouping_id: Uuid::nil(),
            parent_definition_id: None,
            name: String::new(),
            name_in_total: String::new(),
            description: String::new(),
            index: None,
            is_posting: false,
            general_ledger_type: GeneralLedgerType::Assets,
            beginning_balance_debit: Decimal::ZERO,
            beginning_balance_credit: Decimal::ZERO,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateDefinitionRequest {
    #[validate(length(min = 1, max = 255, message = "Definition name must not be empty"))]
    pub name: Option<String>,
    pub name_in_total: Option<String>,
    pub description: Option<String>,
    pub index: Option<i32>,
    pub is_posting: Option<bool>,
    pub beginning_balance_debit: Option<Decimal>,
    pub beginning_balance_credit: Option<Decimal>,
}

/// Service for groupings and their definition trees.
#[derive(Clone)]
pub struct GroupingService {
    db: Arc<DatabaseConnection>,
    event_sender: Option<Arc<EventSender>>,
}

impl GroupingService {
    pub fn new(db: Arc<DatabaseConnection>, event_sender: Option<Arc<EventSender>>) -> Self {
        Self { db, event_sender }
    }

    /// Creates a code-ranged grouping for the actor's tenant.
    #[instrument(skip(self, request), fields(organization_id = %actor.tenant.organization_id, name = %request.name))]
    pub async fn create_grouping(
        &self,
        actor: &Actor,
        request: CreateGroupingRequest,
    ) -> Result<grouping::Model, LedgerError> {
        request
            .validate()
            .map_err(|e| LedgerError::Validation(e.to_string()))?;

        if request.from_code > request.to_code {
            return Err(LedgerError::Validation(format!(
                "from_code {} exceeds to_code {}",
                request.from_code, request.to_code
            )));
        }

        let now = Utc::now();
        let id = Uuid::new_v4();
        let model = grouping::ActiveModel {
            id: Set(id),
            organization_id: Set(actor.tenant.organization_id),
            branch_id: Set(actor.tenant.branch_id),
            name: Set(request.name),
            description: Set(request.description),
            from_code: Set(request.from_code),
            to_code: Set(request.to_code),
            debit: Set(Decimal::ZERO),
            credit: Set(Decimal::ZERO),
            created_at: Set(now),
            created_by_id: Set(actor.user_id),
            updated_at: Set(now),
            updated_by_id: Set(actor.user_id),
            deleted_at: Set(None),
            deleted_by_id: Set(None),
        }
        .insert(&*self.db)
        .await?;
        info!(grouping_id = %id, "grouping created");

        self.emit(EventEnvelope::new(
            entity_topics("general_ledger_accounts_grouping", "create", id, &actor.tenant),
            Event::GroupingCreated(id),
        ))
        .await;

        Ok(model)
    }

    pub async fn get_grouping(
        &self,
        tenant: &Tenant,
        grouping_id: Uuid,
    ) -> Result<Option<grouping::Model>, LedgerError> {
        Ok(grouping::Entity::scoped(tenant)
            .filter(grouping::Column::Id.eq(grouping_id))
            .one(&*self.db)
            .await?)
    }

    /// All live groupings for the tenant, in code order.
    pub async fn list_groupings(&self, tenant: &Tenant) -> Result<Vec<grouping::Model>, LedgerError> {
        Ok(grouping::Entity::scoped(tenant)
            .order_by_asc(grouping::Column::FromCode)
            .all(&*self.db)
            .await?)
    }

    #[instrument(skip(self, request), fields(grouping_id = %grouping_id))]
    pub async fn update_grouping(
        &self,
        actor: &Actor,
        grouping_id: Uuid,
        request: UpdateGroupingRequest,
    ) -> Result<grouping::Model, LedgerError> {
        request
            .validate()
            .map_err(|e| LedgerError::Validation(e.to_string()))?;

        let existing = self
            .get_grouping(&actor.tenant, grouping_id)
            .await?
            .ok_or_else(|| LedgerError::NotFound(format!("grouping {grouping_id}")))?;

        let from_code = request.from_code.unwrap_or(existing.from_code);
        let to_code = request.to_code.unwrap_or(existing.to_code);
        if from_code > to_code {
            return Err(LedgerError::Validation(format!(
                "from_code {from_code} exceeds to_code {to_code}"
            )));
        }

        let mut active: grouping::ActiveModel = existing.into();
        if let Some(name) = request.name {
            active.name = Set(name);
        }
        if let Some(description) = request.description {
            active.description = Set(description);
        }
        active.from_code = Set(from_code);
        active.to_code = Set(to_code);
        if let Some(debit) = request.debit {
            active.debit = Set(debit);
        }
        if let Some(credit) = request.credit {
            active.credit = Set(credit);
        }
        active.updated_at = Set(Utc::now());
        active.updated_by_id = Set(actor.user_id);
        let model = active.update(&*self.db).await?;

        self.emit(EventEnvelope::new(
            entity_topics(
                "general_ledger_accounts_grouping",
                "update",
                grouping_id,
                &actor.tenant,
            ),
            Event::GroupingUpdated(grouping_id),
        ))
        .await;

        Ok(model)
    }

    /// Adds a definition node under a grouping, optionally beneath a parent
    /// node of the same grouping.
    #[instrument(skip(self, request), fields(grouping_id = %request.grouping_id, name = %request.name))]
    pub async fn add_definition(
        &self,
        actor: &Actor,
        request: CreateDefinitionRequest,
    ) -> Result<definition::Model, LedgerError> {
        request
            .validate()
            .map_err(|e| LedgerError::Validation(e.to_string()))?;

        self.get_grouping(&actor.tenant, request.grouping_id)
            .await?
            .ok_or_else(|| {
                LedgerError::Reference(format!("grouping {} not found", request.grouping_id))
            })?;

        if let Some(parent_id) = request.parent_definition_id {
            let parent = self
                .get_definition(&actor.tenant, parent_id)
                .await?
                .ok_or_else(|| {
                    LedgerError::Reference(format!("parent definition {parent_id} not found"))
                })?;
            if parent.grouping_id != request.grouping_id {
                return Err(LedgerError::Reference(format!(
                    "parent definition {parent_id} belongs to grouping {}",
                    parent.grouping_id
                )));
            }
            if parent.is_posting {
                warn!(parent_id = %parent_id, "attaching a child under a posting definition");
            }
        }

        let index = match request.index {
            Some(index) => index,
            None => {
                let mut siblings = definition::Entity::scoped(&actor.tenant)
                    .filter(definition::Column::GroupingId.eq(request.grouping_id));
                siblings = match request.parent_definition_id {
                    Some(parent_id) => {
                        siblings.filter(definition::Column::ParentDefinitionId.eq(parent_id))
                    }
                    None => siblings.filter(definition::Column::ParentDefinitionId.is_null()),
                };
                siblings.count(&*self.db).await? as i32
            }
        };

        let now = Utc::now();
        let id = Uuid::new_v4();
        let model = definition::ActiveModel {
            id: Set(id),
            organization_id: Set(actor.tenant.organization_id),
            branch_id: Set(actor.tenant.branch_id),
            grouping_id: Set(request.grouping_id),
            parent_definition_id: Set(request.parent_definition_id),
            name: Set(request.name.clone()),
            name_in_total: Set(if request.name_in_total.is_empty() {
                request.name.clone()
            } else {
                request.name_in_total
            }),
            description: Set(request.description),
            index: Set(index),
            is_posting: Set(request.is_posting),
            general_ledger_type: Set(request.general_ledger_type),
            beginning_balance_debit: Set(request.beginning_balance_debit),
            beginning_balance_credit: Set(request.beginning_balance_credit),
            created_at: Set(now),
            created_by_id: Set(actor.user_id),
            updated_at: Set(now),
            updated_by_id: Set(actor.user_id),
            deleted_at: Set(None),
            deleted_by_id: Set(None),
        }
        .insert(&*self.db)
        .await?;
        info!(definition_id = %id, "definition created");

        self.emit(EventEnvelope::new(
            entity_topics("general_ledger_definition", "create", id, &actor.tenant),
            Event::DefinitionCreated(id),
        ))
        .await;

        Ok(model)
    }

    pub async fn get_definition(
        &self,
        tenant: &Tenant,
        definition_id: Uuid,
    ) -> Result<Option<definition::Model>, LedgerError> {
        Ok(definition::Entity::scoped(tenant)
            .filter(definition::Column::Id.eq(definition_id))
            .one(&*self.db)
            .await?)
    }

    #[instrument(skip(self, request), fields(definition_id = %definition_id))]
    pub async fn update_definition(
        &self,
        actor: &Actor,
        definition_id: Uuid,
        request: UpdateDefinitionRequest,
    ) -> Result<definition::Model, LedgerError> {
        request
            .validate()
            .map_err(|e| LedgerError::Validation(e.to_string()))?;

        let existing = self
            .get_definition(&actor.tenant, definition_id)
            .await?
            .ok_or_else(|| LedgerError::NotFound(format!("definition {definition_id}")))?;

        let mut active: definition::ActiveModel = existing.into();
        if let Some(name) = request.name {
            active.name = Set(name);
        }
        if let Some(name_in_total) = request.name_in_total {
            active.name_in_total = Set(name_in_total);
        }
        if let Some(description) = request.description {
            active.description = Set(description);
        }
        if let Some(index) = request.index {
            active.index = Set(index);
        }
        if let Some(is_posting) = request.is_posting {
            active.is_posting = Set(is_posting);
        }
        if let Some(debit) = request.beginning_balance_debit {
            active.beginning_balance_debit = Set(debit);
        }
        if let Some(credit) = request.beginning_balance_credit {
            active.beginning_balance_credit = Set(credit);
        }
        active.updated_at = Set(Utc::now());
        active.updated_by_id = Set(actor.user_id);
        let model = active.update(&*self.db).await?;

        self.emit(EventEnvelope::new(
            entity_topics("general_ledger_definition", "update", definition_id, &actor.tenant),
            Event::DefinitionUpdated(definition_id),
        ))
        .await;

        Ok(model)
    }

    /// Moves a definition under a new parent (or to the root when `None`).
    ///
    /// Rejects a move that would make the node an ancestor of itself.
    #[instrument(skip(self), fields(definition_id = %definition_id))]
    pub async fn reparent_definition(
        &self,
        actor: &Actor,
        definition_id: Uuid,
        new_parent_id: Option<Uuid>,
    ) -> Result<definition::Model, LedgerError> {
        let existing = self
            .get_definition(&actor.tenant, definition_id)
            .await?
            .ok_or_else(|| LedgerError::NotFound(format!("definition {definition_id}")))?;

        if let Some(parent_id) = new_parent_id {
            if parent_id == definition_id {
                return Err(LedgerError::Cycle(format!(
                    "definition {definition_id} cannot be its own parent"
                )));
            }
            let parent = self
                .get_definition(&actor.tenant, parent_id)
                .await?
                .ok_or_else(|| {
                    LedgerError::Reference(format!("parent definition {parent_id} not found"))
                })?;
            if parent.grouping_id != existing.grouping_id {
                return Err(LedgerError::Reference(format!(
                    "parent definition {parent_id} belongs to grouping {}",
                    parent.grouping_id
                )));
            }

            // Walk up from the proposed parent; meeting the moved node means
            // the move would close a loop.
            let mut visited: HashSet<Uuid> = HashSet::new();
            let mut cursor = Some(parent_id);
            while let Some(id) = cursor {
                if id == definition_id {
                    return Err(LedgerError::Cycle(format!(
                        "moving definition {definition_id} under {parent_id} would create a cycle"
                    )));
                }
                if !visited.insert(id) {
                    break;
                }
                cursor = self
                    .get_definition(&actor.tenant, id)
                    .await?
                    .and_then(|d| d.parent_definition_id);
            }
        }

        let mut active: definition::ActiveModel = existing.into();
        active.parent_definition_id = Set(new_parent_id);
        active.updated_at = Set(Utc::now());
        active.updated_by_id = Set(actor.user_id);
        let model = active.update(&*self.db).await?;
        info!("definition reparented");

        self.emit(EventEnvelope::new(
            entity_topics("general_ledger_definition", "update", definition_id, &actor.tenant),
            Event::DefinitionUpdated(definition_id),
        ))
        .await;

        Ok(model)
    }

    /// Soft-deletes a childless definition node.
    #[instrument(skip(self), fields(definition_id = %definition_id))]
    pub async fn delete_definition(
        &self,
        actor: &Actor,
        definition_id: Uuid,
    ) -> Result<(), LedgerError> {
        let existing = self
            .get_definition(&actor.tenant, definition_id)
            .await?
            .ok_or_else(|| LedgerError::NotFound(format!("definition {definition_id}")))?;

        let children = definition::Entity::scoped(&actor.tenant)
            .filter(definition::Column::ParentDefinitionId.eq(definition_id))
            .count(&*self.db)
            .await?;
        if children > 0 {
            return Err(LedgerError::State(format!(
                "definition {definition_id} still has {children} child definitions"
            )));
        }

        let mut active: definition::ActiveModel = existing.into();
        let now = Utc::now();
        active.deleted_at = Set(Some(now));
        active.deleted_by_id = Set(Some(actor.user_id));
        active.updated_at = Set(now);
        active.updated_by_id = Set(actor.user_id);
        active.update(&*self.db).await?;
        info!("definition soft-deleted");

        self.emit(EventEnvelope::new(
            entity_topics("general_ledger_definition", "delete", definition_id, &actor.tenant),
            Event::DefinitionDeleted(definition_id),
        ))
        .await;

        Ok(())
    }

    /// Loads all live definitions of a grouping and assembles them into an
    /// ordered tree for display.
    pub async fn render_tree(
        &self,
        tenant: &Tenant,
        grouping_id: Uuid,
    ) -> Result<DefinitionTree, LedgerError> {
        self.get_grouping(tenant, grouping_id)
            .await?
            .ok_or_else(|| LedgerError::NotFound(format!("grouping {grouping_id}")))?;

        let nodes = definition::Entity::scoped(tenant)
            .filter(definition::Column::GroupingId.eq(grouping_id))
            .all(&*self.db)
            .await?;

        Ok(DefinitionTree::build(nodes))
    }

    async fn emit(&self, envelope: EventEnvelope) {
        if let Some(sender) = &self.event_sender {
            if let Err(e) = sender.send(envelope).await {
                warn!(error = %e, "failed to send grouping event");
            }
        }
    }
}

/// An in-memory arena over one grouping's definitions.
///
/// Siblings are ordered by `(index, id)`; id breaks ties deterministically.
/// Nodes whose parent chain never reaches a root (orphans, or members of a
/// corrupt parent loop) are unreachable from iteration, so walking the tree
/// always terminates.
#[derive(Debug, Clone)]
pub struct DefinitionTree {
    nodes: Vec<definition::Model>,
    /// Child arena indices per node, sibling-ordered.
    children: Vec<Vec<usize>>,
    /// Root arena indices, sibling-ordered.
    roots: Vec<usize>,
}

impl DefinitionTree {
    pub fn build(mut nodes: Vec<definition::Model>) -> Self {
        nodes.sort_by(|a, b| a.index.cmp(&b.index).then(a.id.cmp(&b.id)));

        let by_id: HashMap<Uuid, usize> =
            nodes.iter().enumerate().map(|(i, n)| (n.id, i)).collect();

        let mut children: Vec<Vec<usize>> = vec![Vec::new(); nodes.len()];
        let mut roots: Vec<usize> = Vec::new();
        for (i, node) in nodes.iter().enumerate() {
            match node.parent_definition_id.and_then(|p| by_id.get(&p)) {
                Some(&parent) => children[parent].push(i),
                None if node.parent_definition_id.is_none() => roots.push(i),
                // Parent id points at a deleted or foreign node; drop the
                // subtree from display rather than mis-rooting it.
                None => {}
            }
        }

        Self {
            nodes,
            children,
            roots,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    pub fn roots(&self) -> impl Iterator<Item = &definition::Model> {
        self.roots.iter().map(move |&i| &self.nodes[i])
    }

    pub fn children_of(&self, id: Uuid) -> Vec<&definition::Model> {
        self.nodes
            .iter()
            .position(|n| n.id == id)
            .map(|i| self.children[i].iter().map(|&c| &self.nodes[c]).collect())
            .unwrap_or_default()
    }

    /// Depth-first pre-order walk, each item paired with its depth. The
    /// iterator borrows the tree and can be created any number of times.
    pub fn iter(&self) -> TreeIter<'_> {
        let stack: Vec<(usize, usize)> = self.roots.iter().rev().map(|&i| (i, 0)).collect();
        TreeIter { tree: self, stack }
    }
}

pub struct TreeIter<'a> {
    tree: &'a DefinitionTree,
    stack: Vec<(usize, usize)>,
}

impl<'a> Iterator for TreeIter<'a> {
    type Item = (&'a definition::Model, usize);

    fn next(&mut self) -> Option<Self::Item> {
        let (index, depth) = self.stack.pop()?;
        for &child in self.tree.children[index].iter().rev() {
            self.stack.push((child, depth + 1));
        }
        Some((&self.tree.nodes[index], depth))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rust_decimal::Decimal;

    fn node(id: u128, parent: Option<u128>, index: i32, name: &str) -> definition::Model {
        definition::Model {
            id: Uuid::from_u128(id),
            organization_id: Uuid::from_u128(900),
            branch_id: Uuid::from_u128(901),
            grouping_id: Uuid::from_u128(800),
            parent_definition_id: parent.map(Uuid::from_u128),
            name: name.to_string(),
            name_in_total: format!("Total {name}"),
            description: String::new(),
            index,
            is_posting: false,
            general_ledger_type: GeneralLedgerType::Assets,
            beginning_balance_debit: Decimal::ZERO,
            beginning_balance_credit: Decimal::ZERO,
            created_at: Utc::now(),
            created_by_id: Uuid::from_u128(902),
            updated_at: Utc::now(),
            updated_by_id: Uuid::from_u128(902),
            deleted_at: None,
            deleted_by_id: None,
        }
    }

    #[test]
    fn siblings_come_out_in_index_order() {
        let tree = DefinitionTree::build(vec![
            node(3, None, 3, "third"),
            node(1, None, 1, "first"),
            node(2, None, 2, "second"),
        ]);

        let names: Vec<&str> = tree.roots().map(|n| n.name.as_str()).collect();
        assert_eq!(names, vec!["first", "second", "third"]);
    }

    #[test]
    fn iteration_is_depth_first_pre_order() {
        let tree = DefinitionTree::build(vec![
            node(1, None, 0, "current-assets"),
            node(2, Some(1), 0, "cash"),
            node(3, Some(1), 1, "receivables"),
            node(4, None, 1, "fixed-assets"),
            node(5, Some(4), 0, "equipment"),
        ]);

        let walk: Vec<(&str, usize)> = tree.iter().map(|(n, d)| (n.name.as_str(), d)).collect();
        assert_eq!(
            walk,
            vec![
                ("current-assets", 0),
                ("cash", 1),
                ("receivables", 1),
                ("fixed-assets", 0),
                ("equipment", 1),
            ]
        );
    }

    #[test]
    fn iteration_can_restart() {
        let tree = DefinitionTree::build(vec![node(1, None, 0, "a"), node(2, Some(1), 0, "b")]);

        assert_eq!(tree.iter().count(), 2);
        assert_eq!(tree.iter().count(), 2);
    }

    #[test]
    fn parent_loops_do_not_hang_iteration() {
        // Two nodes that claim each other as parent never reach a root, so
        // they fall out of the walk instead of looping it.
        let tree = DefinitionTree::build(vec![
            node(1, Some(2), 0, "a"),
            node(2, Some(1), 1, "b"),
            node(3, None, 2, "root"),
        ]);

        let names: Vec<&str> = tree.iter().map(|(n, _)| n.name.as_str()).collect();
        assert_eq!(names, vec!["root"]);
    }

    #[test]
    fn children_of_returns_ordered_children() {
        let tree = DefinitionTree::build(vec![
            node(1, None, 0, "parent"),
            node(3, Some(1), 1, "second-child"),
            node(2, Some(1), 0, "first-child"),
        ]);

        let names: Vec<&str> = tree
            .children_of(Uuid::from_u128(1))
            .into_iter()
            .map(|n| n.name.as_str())
            .collect();
        assert_eq!(names, vec!["first-child", "second-child"]);
    }
}
