mod common;

use assert_matches::assert_matches;
use rust_decimal_macros::dec;
use uuid::Uuid;

use common::{deposit_request, other_tenant_actor, spawn_app};
use coop_ledger::errors::LedgerError;
use coop_ledger::events::Event;
use coop_ledger::services::accounts::{CreateAccountRequest, UpdateAccountRequest};

#[tokio::test]
async fn created_account_is_retrievable_with_defaults() {
    let mut app = spawn_app().await;

    let account = app
        .accounts
        .create_account(&app.actor, deposit_request(&app, "Regular Savings"))
        .await
        .unwrap();

    assert_eq!(account.name, "Regular Savings");
    assert!(account.allow_journal_voucher);
    assert!(account.allow_withdraw);
    assert_eq!(account.min_amount, dec!(0));
    assert_eq!(account.max_amount, dec!(50000));

    let fetched = app
        .accounts
        .get_account(&app.actor.tenant, account.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(fetched.id, account.id);

    let event = app.events.recv().await.unwrap();
    assert_eq!(event.event, Event::AccountCreated(account.id));
    assert_eq!(event.topics[0], "account.create");
}

#[tokio::test]
async fn min_amount_above_max_amount_is_rejected() {
    let app = spawn_app().await;

    let request = CreateAccountRequest {
        min_amount: Some(dec!(500)),
        max_amount: Some(dec!(100)),
        ..deposit_request(&app, "Backwards Range")
    };
    let err = app
        .accounts
        .create_account(&app.actor, request)
        .await
        .unwrap_err();
    assert_matches!(err, LedgerError::Validation(_));
}

#[tokio::test]
async fn missing_currency_is_rejected() {
    let app = spawn_app().await;

    let request = CreateAccountRequest {
        currency_id: None,
        ..deposit_request(&app, "No Currency")
    };
    let err = app
        .accounts
        .create_account(&app.actor, request)
        .await
        .unwrap_err();
    assert_matches!(err, LedgerError::Validation(_));
}

#[tokio::test]
async fn listing_orders_accounts_by_index() {
    let app = spawn_app().await;

    for (name, index) in [("third", 2), ("first", 0), ("second", 1)] {
        let request = CreateAccountRequest {
            index: Some(index),
            ..deposit_request(&app, name)
        };
        app.accounts
            .create_account(&app.actor, request)
            .await
            .unwrap();
    }

    let listed = app.accounts.list_by_tenant(&app.actor.tenant).await.unwrap();
    let names: Vec<&str> = listed.iter().map(|a| a.name.as_str()).collect();
    assert_eq!(names, vec!["first", "second", "third"]);
}

#[tokio::test]
async fn accounts_are_invisible_to_other_tenants() {
    let app = spawn_app().await;
    let stranger = other_tenant_actor();

    let account = app
        .accounts
        .create_account(&app.actor, deposit_request(&app, "Mine"))
        .await
        .unwrap();

    let seen = app
        .accounts
        .get_account(&stranger.tenant, account.id)
        .await
        .unwrap();
    assert!(seen.is_none());
    assert!(app
        .accounts
        .list_by_tenant(&stranger.tenant)
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn soft_deleted_account_disappears_from_queries() {
    let app = spawn_app().await;

    let account = app
        .accounts
        .create_account(&app.actor, deposit_request(&app, "Doomed"))
        .await
        .unwrap();
    app.accounts
        .delete_account(&app.actor, account.id)
        .await
        .unwrap();

    let seen = app
        .accounts
        .get_account(&app.actor.tenant, account.id)
        .await
        .unwrap();
    assert!(seen.is_none());

    let err = app
        .accounts
        .delete_account(&app.actor, account.id)
        .await
        .unwrap_err();
    assert_matches!(err, LedgerError::NotFound(_));
}

#[tokio::test]
async fn update_respects_amount_range() {
    let app = spawn_app().await;

    let account = app
        .accounts
        .create_account(&app.actor, deposit_request(&app, "Adjustable"))
        .await
        .unwrap();

    let updated = app
        .accounts
        .update_account(
            &app.actor,
            account.id,
            UpdateAccountRequest {
                name: Some("Adjusted".to_string()),
                min_amount: Some(dec!(10)),
                max_amount: Some(dec!(100)),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.name, "Adjusted");
    assert_eq!(updated.min_amount, dec!(10));

    let err = app
        .accounts
        .update_account(
            &app.actor,
            account.id,
            UpdateAccountRequest {
                min_amount: Some(dec!(500)),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert_matches!(err, LedgerError::Validation(_));
}

#[tokio::test]
async fn chaining_links_loan_to_alternate_account() {
    let app = spawn_app().await;

    let loan = app
        .accounts
        .create_account(&app.actor, deposit_request(&app, "Salary Loan"))
        .await
        .unwrap();
    let interest = app
        .accounts
        .create_account(&app.actor, deposit_request(&app, "Salary Loan Interest"))
        .await
        .unwrap();

    let chained = app
        .accounts
        .chain_alternative(&app.actor, loan.id, interest.id)
        .await
        .unwrap();
    assert_eq!(chained.alternative_account_id, Some(interest.id));
}

#[tokio::test]
async fn chaining_rejects_a_cycle() {
    let app = spawn_app().await;

    let a = app
        .accounts
        .create_account(&app.actor, deposit_request(&app, "A"))
        .await
        .unwrap();
    let b = app
        .accounts
        .create_account(&app.actor, deposit_request(&app, "B"))
        .await
        .unwrap();

    app.accounts
        .chain_alternative(&app.actor, a.id, b.id)
        .await
        .unwrap();
    let err = app
        .accounts
        .chain_alternative(&app.actor, b.id, a.id)
        .await
        .unwrap_err();
    assert_matches!(err, LedgerError::Cycle(_));

    // The failed call wrote nothing.
    let b = app
        .accounts
        .get_account(&app.actor.tenant, b.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(b.alternative_account_id, None);
}

#[tokio::test]
async fn chaining_rejects_self_reference() {
    let app = spawn_app().await;

    let a = app
        .accounts
        .create_account(&app.actor, deposit_request(&app, "Selfish"))
        .await
        .unwrap();

    let err = app
        .accounts
        .chain_alternative(&app.actor, a.id, a.id)
        .await
        .unwrap_err();
    assert_matches!(err, LedgerError::Cycle(_));
}

#[tokio::test]
async fn chaining_across_tenants_is_an_invalid_reference() {
    let app = spawn_app().await;
    let stranger = other_tenant_actor();

    let mine = app
        .accounts
        .create_account(&app.actor, deposit_request(&app, "Mine"))
        .await
        .unwrap();
    let theirs = app
        .accounts
        .create_account(&stranger, deposit_request(&app, "Theirs"))
        .await
        .unwrap();

    let err = app
        .accounts
        .chain_alternative(&app.actor, mine.id, theirs.id)
        .await
        .unwrap_err();
    assert_matches!(err, LedgerError::Reference(_));

    let err = app
        .accounts
        .chain_alternative(&app.actor, mine.id, Uuid::new_v4())
        .await
        .unwrap_err();
    assert_matches!(err, LedgerError::NotFound(_));
}
