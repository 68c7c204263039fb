mod common;

use rust_decimal_macros::dec;

use common::spawn_app;
use coop_ledger::entities::account::AccountType;
use coop_ledger::services::seeder::seed_chart_of_accounts;

#[tokio::test]
async fn seeding_builds_the_default_chart() {
    let app = spawn_app().await;

    let seeded = seed_chart_of_accounts(&app.db, None, &app.actor, app.currency_id)
        .await
        .unwrap();
    assert!(seeded);

    let groupings = app.groupings.list_groupings(&app.actor.tenant).await.unwrap();
    let names: Vec<&str> = groupings.iter().map(|g| g.name.as_str()).collect();
    assert_eq!(
        names,
        vec!["Assets", "Liabilities, Equity & Reserves", "Income", "Expenses"]
    );
    assert_eq!(groupings[0].from_code, dec!(1000.00));
    assert_eq!(groupings[3].to_code.round_dp(2), dec!(5999.99));

    let accounts = app.accounts.list_by_tenant(&app.actor.tenant).await.unwrap();
    assert!(accounts.iter().any(|a| a.name == "Regular Savings"));
    assert!(accounts.iter().any(|a| a.name == "Paid Up Share Capital"));

    let loans = app.accounts.loan_accounts(&app.actor.tenant).await.unwrap();
    let loan_names: Vec<&str> = loans.iter().map(|a| a.name.as_str()).collect();
    assert_eq!(
        loan_names,
        vec!["Emergency Loan", "Business Loan", "Educational Loan"]
    );
}

#[tokio::test]
async fn seeding_twice_is_a_no_op() {
    let app = spawn_app().await;

    assert!(seed_chart_of_accounts(&app.db, None, &app.actor, app.currency_id)
        .await
        .unwrap());
    assert!(!seed_chart_of_accounts(&app.db, None, &app.actor, app.currency_id)
        .await
        .unwrap());

    let groupings = app.groupings.list_groupings(&app.actor.tenant).await.unwrap();
    assert_eq!(groupings.len(), 4);
}

#[tokio::test]
async fn seeded_loan_accessories_chain_back_to_their_loan() {
    let app = spawn_app().await;
    seed_chart_of_accounts(&app.db, None, &app.actor, app.currency_id)
        .await
        .unwrap();

    let accounts = app.accounts.list_by_tenant(&app.actor.tenant).await.unwrap();
    let emergency = accounts
        .iter()
        .find(|a| a.name == "Emergency Loan")
        .unwrap();

    for prefix in ["Interest", "Service Fee", "Fines"] {
        let accessory = accounts
            .iter()
            .find(|a| a.name == format!("{prefix} Emergency Loan"))
            .unwrap();
        assert_eq!(accessory.alternative_account_id, Some(emergency.id));
    }

    let interest = app
        .accounts
        .find_by_type(&app.actor.tenant, AccountType::Interest)
        .await
        .unwrap();
    assert_eq!(interest.len(), 3);
}

#[tokio::test]
async fn seeded_definition_tree_renders_with_headers_first() {
    let app = spawn_app().await;
    seed_chart_of_accounts(&app.db, None, &app.actor, app.currency_id)
        .await
        .unwrap();

    let groupings = app.groupings.list_groupings(&app.actor.tenant).await.unwrap();
    let assets = groupings.iter().find(|g| g.name == "Assets").unwrap();

    let tree = app
        .groupings
        .render_tree(&app.actor.tenant, assets.id)
        .await
        .unwrap();
    let walk: Vec<(String, usize)> = tree
        .iter()
        .map(|(node, depth)| (node.name.clone(), depth))
        .collect();
    assert_eq!(walk[0], ("Current Assets".to_string(), 0));
    assert_eq!(walk[1], ("Cash on Hand".to_string(), 1));
    assert!(walk.contains(&("Property, Plant & Equipment".to_string(), 0)));

    let roots: Vec<String> = tree.roots().map(|n| n.name.clone()).collect();
    assert_eq!(roots.len(), 2);
}
