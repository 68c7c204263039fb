mod common;

use assert_matches::assert_matches;
use rust_decimal_macros::dec;
use uuid::Uuid;

use common::spawn_app;
use coop_ledger::entities::account::GeneralLedgerType;
use coop_ledger::errors::LedgerError;
use coop_ledger::services::grouping::{
    CreateDefinitionRequest, CreateGroupingRequest, UpdateGroupingRequest,
};

fn grouping_request(name: &str) -> CreateGroupingRequest {
    CreateGroupingRequest {
        name: name.to_string(),
        from_code: dec!(1000.00),
        to_code: dec!(1999.99),
        ..Default::default()
    }
}

fn definition_request(grouping_id: Uuid, name: &str) -> CreateDefinitionRequest {
    CreateDefinitionRequest {
        grouping_id,
        name: name.to_string(),
        general_ledger_type: GeneralLedgerType::Assets,
        ..Default::default()
    }
}

#[tokio::test]
async fn grouping_code_range_must_be_ordered() {
    let app = spawn_app().await;

    let err = app
        .groupings
        .create_grouping(
            &app.actor,
            CreateGroupingRequest {
                name: "Backwards".to_string(),
                from_code: dec!(2000.00),
                to_code: dec!(1000.00),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert_matches!(err, LedgerError::Validation(_));

    let grouping = app
        .groupings
        .create_grouping(&app.actor, grouping_request("Assets"))
        .await
        .unwrap();
    let err = app
        .groupings
        .update_grouping(
            &app.actor,
            grouping.id,
            UpdateGroupingRequest {
                from_code: Some(dec!(5000.00)),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert_matches!(err, LedgerError::Validation(_));
}

#[tokio::test]
async fn definition_requires_an_existing_grouping() {
    let app = spawn_app().await;

    let err = app
        .groupings
        .add_definition(&app.actor, definition_request(Uuid::new_v4(), "Orphan"))
        .await
        .unwrap_err();
    assert_matches!(err, LedgerError::Reference(_));
}

#[tokio::test]
async fn definition_name_in_total_defaults_to_the_name() {
    let app = spawn_app().await;

    let grouping = app
        .groupings
        .create_grouping(&app.actor, grouping_request("Assets"))
        .await
        .unwrap();

    let defaulted = app
        .groupings
        .add_definition(&app.actor, definition_request(grouping.id, "Current Assets"))
        .await
        .unwrap();
    assert_eq!(defaulted.name_in_total, "Current Assets");

    let named = app
        .groupings
        .add_definition(
            &app.actor,
            CreateDefinitionRequest {
                name_in_total: "Total Other Assets".to_string(),
                ..definition_request(grouping.id, "Other Assets")
            },
        )
        .await
        .unwrap();
    assert_eq!(named.name_in_total, "Total Other Assets");
}

#[tokio::test]
async fn definition_parent_must_share_the_grouping() {
    let app = spawn_app().await;

    let assets = app
        .groupings
        .create_grouping(&app.actor, grouping_request("Assets"))
        .await
        .unwrap();
    let income = app
        .groupings
        .create_grouping(&app.actor, grouping_request("Income"))
        .await
        .unwrap();
    let income_root = app
        .groupings
        .add_definition(&app.actor, definition_request(income.id, "Fees"))
        .await
        .unwrap();

    let err = app
        .groupings
        .add_definition(
            &app.actor,
            CreateDefinitionRequest {
                parent_definition_id: Some(income_root.id),
                ..definition_request(assets.id, "Cash")
            },
        )
        .await
        .unwrap_err();
    assert_matches!(err, LedgerError::Reference(_));
}

#[tokio::test]
async fn reparenting_under_a_descendant_is_rejected() {
    let app = spawn_app().await;

    let assets = app
        .groupings
        .create_grouping(&app.actor, grouping_request("Assets"))
        .await
        .unwrap();
    let parent = app
        .groupings
        .add_definition(&app.actor, definition_request(assets.id, "Current Assets"))
        .await
        .unwrap();
    let child = app
        .groupings
        .add_definition(
            &app.actor,
            CreateDefinitionRequest {
                parent_definition_id: Some(parent.id),
                ..definition_request(assets.id, "Cash")
            },
        )
        .await
        .unwrap();

    let err = app
        .groupings
        .reparent_definition(&app.actor, parent.id, Some(child.id))
        .await
        .unwrap_err();
    assert_matches!(err, LedgerError::Cycle(_));

    // The rejected move left the original parent link intact.
    let child = app
        .groupings
        .get_definition(&app.actor.tenant, child.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(child.parent_definition_id, Some(parent.id));
}

#[tokio::test]
async fn definition_with_children_cannot_be_deleted() {
    let app = spawn_app().await;

    let assets = app
        .groupings
        .create_grouping(&app.actor, grouping_request("Assets"))
        .await
        .unwrap();
    let parent = app
        .groupings
        .add_definition(&app.actor, definition_request(assets.id, "Current Assets"))
        .await
        .unwrap();
    let child = app
        .groupings
        .add_definition(
            &app.actor,
            CreateDefinitionRequest {
                parent_definition_id: Some(parent.id),
                ..definition_request(assets.id, "Cash")
            },
        )
        .await
        .unwrap();

    let err = app
        .groupings
        .delete_definition(&app.actor, parent.id)
        .await
        .unwrap_err();
    assert_matches!(err, LedgerError::State(_));

    // Deleting bottom-up works.
    app.groupings
        .delete_definition(&app.actor, child.id)
        .await
        .unwrap();
    app.groupings
        .delete_definition(&app.actor, parent.id)
        .await
        .unwrap();
}

#[tokio::test]
async fn rendered_tree_walks_depth_first_in_index_order() {
    let app = spawn_app().await;

    let assets = app
        .groupings
        .create_grouping(&app.actor, grouping_request("Assets"))
        .await
        .unwrap();
    let current = app
        .groupings
        .add_definition(
            &app.actor,
            CreateDefinitionRequest {
                index: Some(0),
                ..definition_request(assets.id, "Current Assets")
            },
        )
        .await
        .unwrap();
    app.groupings
        .add_definition(
            &app.actor,
            CreateDefinitionRequest {
                parent_definition_id: Some(current.id),
                index: Some(1),
                ..definition_request(assets.id, "Cash on Bank")
            },
        )
        .await
        .unwrap();
    app.groupings
        .add_definition(
            &app.actor,
            CreateDefinitionRequest {
                parent_definition_id: Some(current.id),
                index: Some(0),
                ..definition_request(assets.id, "Cash on Hand")
            },
        )
        .await
        .unwrap();
    app.groupings
        .add_definition(
            &app.actor,
            CreateDefinitionRequest {
                index: Some(1),
                ..definition_request(assets.id, "Fixed Assets")
            },
        )
        .await
        .unwrap();

    let tree = app
        .groupings
        .render_tree(&app.actor.tenant, assets.id)
        .await
        .unwrap();
    let walk: Vec<(String, usize)> = tree
        .iter()
        .map(|(node, depth)| (node.name.clone(), depth))
        .collect();
    assert_eq!(
        walk,
        vec![
            ("Current Assets".to_string(), 0),
            ("Cash on Hand".to_string(), 1),
            ("Cash on Bank".to_string(), 1),
            ("Fixed Assets".to_string(), 0),
        ]
    );
}

#[tokio::test]
async fn soft_deleted_definitions_leave_the_tree() {
    let app = spawn_app().await;

    let assets = app
        .groupings
        .create_grouping(&app.actor, grouping_request("Assets"))
        .await
        .unwrap();
    let keep = app
        .groupings
        .add_definition(&app.actor, definition_request(assets.id, "Keep"))
        .await
        .unwrap();
    let drop = app
        .groupings
        .add_definition(&app.actor, definition_request(assets.id, "Drop"))
        .await
        .unwrap();

    app.groupings
        .delete_definition(&app.actor, drop.id)
        .await
        .unwrap();

    let tree = app
        .groupings
        .render_tree(&app.actor.tenant, assets.id)
        .await
        .unwrap();
    let names: Vec<String> = tree.iter().map(|(node, _)| node.name.clone()).collect();
    assert_eq!(names, vec!["Keep".to_string()]);
    assert_eq!(tree.children_of(keep.id).len(), 0);
}
