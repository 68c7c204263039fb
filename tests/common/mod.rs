//! Shared harness for integration tests: an in-memory SQLite database with
//! the full schema applied, the three services wired to one event channel,
//! and an actor fixture.

// Not every test binary uses every helper.
#![allow(dead_code)]

use std::sync::Arc;

use sea_orm::DatabaseConnection;
use sea_orm_migration::MigratorTrait;
use tokio::sync::mpsc;
use uuid::Uuid;

use coop_ledger::db::{establish_connection_with_config, DbConfig};
use coop_ledger::events::{EventEnvelope, EventSender};
use coop_ledger::migrator::Migrator;
use coop_ledger::services::accounts::{AccountService, CreateAccountRequest};
use coop_ledger::services::grouping::GroupingService;
use coop_ledger::services::vouchers::VoucherService;
use coop_ledger::tenant::{Actor, Tenant};

pub struct TestApp {
    pub db: Arc<DatabaseConnection>,
    pub accounts: AccountService,
    pub groupings: GroupingService,
    pub vouchers: VoucherService,
    pub events: mpsc::Receiver<EventEnvelope>,
    pub actor: Actor,
    pub currency_id: Uuid,
}

pub async fn spawn_app() -> TestApp {
    // A single pooled connection keeps the in-memory schema alive across
    // queries.
    let config = DbConfig {
        url: "sqlite::memory:".to_string(),
        max_connections: 1,
        min_connections: 1,
        ..Default::default()
    };
    let db = establish_connection_with_config(&config)
        .await
        .expect("failed to open in-memory database");
    Migrator::up(&db, None).await.expect("failed to migrate");

    let db = Arc::new(db);
    let (sender, events) = EventSender::channel(1024);
    let sender = Arc::new(sender);

    let actor = Actor::new(Tenant::new(Uuid::new_v4(), Uuid::new_v4()), Uuid::new_v4());

    TestApp {
        accounts: AccountService::new(db.clone(), Some(sender.clone())),
        groupings: GroupingService::new(db.clone(), Some(sender.clone())),
        vouchers: VoucherService::new(db.clone(), Some(sender)),
        db,
        events,
        actor,
        currency_id: Uuid::new_v4(),
    }
}

/// A second actor in a different organization and branch, sharing the app's
/// database.
pub fn other_tenant_actor() -> Actor {
    Actor::new(Tenant::new(Uuid::new_v4(), Uuid::new_v4()), Uuid::new_v4())
}

/// A minimal valid deposit-account request.
pub fn deposit_request(app: &TestApp, name: &str) -> CreateAccountRequest {
    CreateAccountRequest {
        name: name.to_string(),
        currency_id: Some(app.currency_id),
        ..Default::default()
    }
}
