use sea_orm::Database;

use engine::{
    AlertKind, AlertThresholds, Category, ContributionInput, ContributionPatch, Engine,
    EngineError, GuestInput,
};
use migration::MigratorTrait;

async fn engine_with_thresholds(thresholds: AlertThresholds) -> Engine {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    Engine::builder()
        .database(db)
        .thresholds(thresholds)
        .build()
        .await
        .unwrap()
}

async fn engine() -> Engine {
    engine_with_thresholds(AlertThresholds::default()).await
}

async fn guest(engine: &Engine, first_name: &str, last_name: &str) -> i32 {
    engine
        .create_guest(GuestInput {
            first_name: first_name.into(),
            last_name: last_name.into(),
            ..Default::default()
        })
        .await
        .unwrap()
        .id
}

fn pledge(guest_id: i32, category: &str, description: &str, servings: i64) -> ContributionInput {
    ContributionInput {
        guest_id: guest_id.into(),
        category: category.into(),
        description: description.into(),
        servings: servings.into(),
    }
}

#[tokio::test]
async fn create_contribution_requires_existing_guest() {
    let engine = engine().await;

    let err = engine
        .create_contribution(pledge(42, "SALTY", "Cake salé", 8))
        .await
        .unwrap_err();
    assert_eq!(err, EngineError::KeyNotFound("guest 42".to_string()));

    let err = engine
        .create_contribution(pledge(42, "SALTY", "Ca", 8))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Validation(_)));
}

#[tokio::test]
async fn create_and_fetch_contribution() {
    let engine = engine().await;
    let guest_id = guest(&engine, "Julie", "Lambert").await;

    let created = engine
        .create_contribution(pledge(guest_id, "SWEET", "Fondant au chocolat", 10))
        .await
        .unwrap();
    assert_eq!(created.guest_id, guest_id);
    assert_eq!(created.category, Category::Sweet);
    assert_eq!(created.servings, 10);

    assert_eq!(engine.contribution(created.id).await.unwrap(), created);
}

#[tokio::test]
async fn update_contribution_keeps_owner() {
    let engine = engine().await;
    let guest_id = guest(&engine, "Hugo", "Fontaine").await;
    let created = engine
        .create_contribution(pledge(guest_id, "DRINK", "Cidre", 6))
        .await
        .unwrap();

    let updated = engine
        .update_contribution(
            created.id,
            ContributionPatch {
                category: "SIDE".into(),
                servings: 20.into(),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.guest_id, guest_id);
    assert_eq!(updated.category, Category::Side);
    assert_eq!(updated.description, "Cidre");
    assert_eq!(updated.servings, 20);

    let err = engine
        .update_contribution(
            created.id,
            ContributionPatch {
                servings: 51.into(),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Validation(_)));

    let err = engine
        .update_contribution(created.id + 100, ContributionPatch::default())
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::KeyNotFound(_)));
}

#[tokio::test]
async fn delete_contribution() {
    let engine = engine().await;
    let guest_id = guest(&engine, "Inès", "Garnier").await;
    let created = engine
        .create_contribution(pledge(guest_id, "SALTY", "Chips", 15))
        .await
        .unwrap();

    engine.delete_contribution(created.id).await.unwrap();
    assert!(engine.list_contributions(None).await.unwrap().is_empty());

    let err = engine.delete_contribution(created.id).await.unwrap_err();
    assert!(matches!(err, EngineError::KeyNotFound(_)));
}

#[tokio::test]
async fn board_groups_every_category() {
    let engine = engine().await;
    let alice = guest(&engine, "Alice", "Mercier").await;
    let bruno = guest(&engine, "Bruno", "Faure").await;

    engine
        .create_contribution(pledge(alice, "SALTY", "Quiche", 8))
        .await
        .unwrap();
    engine
        .create_contribution(pledge(bruno, "SALTY", "Pizza", 6))
        .await
        .unwrap();
    engine
        .create_contribution(pledge(bruno, "DRINK", "Eau pétillante", 12))
        .await
        .unwrap();

    let board = engine.contribution_board(None).await.unwrap();
    assert_eq!(board.totals.total_contributions, 3);
    assert_eq!(board.totals.total_servings, 26);
    assert_eq!(board.totals.by_category[Category::Salty].count, 2);
    assert_eq!(board.totals.by_category[Category::Salty].servings, 14);
    assert!(board.grouped[Category::Sweet].is_empty());
    assert!(board.grouped[Category::Side].is_empty());

    let salty = &board.grouped[Category::Salty];
    assert_eq!(salty.len(), 2);
    let owner = salty[1].guest.as_ref().unwrap();
    assert_eq!(owner.id, bruno);
    assert_eq!(owner.first_name, "Bruno");
    assert_eq!(owner.last_name, "Faure");

    let drinks = engine
        .contribution_board(Some(Category::Drink))
        .await
        .unwrap();
    assert_eq!(drinks.totals.total_contributions, 1);
    assert_eq!(drinks.totals.total_servings, 12);
    assert!(drinks.grouped[Category::Salty].is_empty());
    assert_eq!(drinks.grouped[Category::Drink].len(), 1);
}

#[tokio::test]
async fn statistics_on_empty_event() {
    let engine = engine().await;

    let stats = engine.statistics().await.unwrap();
    assert_eq!(stats.guests_count, 0);
    assert_eq!(stats.contributions_count, 0);
    assert_eq!(stats.servings_per_guest, 0.0);
    assert_eq!(stats.alerts.len(), 4);
    assert!(stats.alerts.iter().all(|a| a.kind == AlertKind::Warning));
}

#[tokio::test]
async fn statistics_low_servings() {
    let engine = engine().await;
    let mut ids = Vec::new();
    for i in 0..10 {
        ids.push(guest(&engine, &format!("Invité{i}"), "Dupont").await);
    }
    engine
        .create_contribution(pledge(ids[0], "SWEET", "Madeleines", 5))
        .await
        .unwrap();

    let stats = engine.statistics().await.unwrap();
    assert_eq!(stats.guests_count, 10);
    assert_eq!(stats.total_servings, 5);
    assert_eq!(stats.servings_per_guest, 0.5);
    assert!(
        stats
            .alerts
            .iter()
            .any(|a| a.kind == AlertKind::Warning && a.message.contains("parts par personne"))
    );
}

#[tokio::test]
async fn statistics_use_configured_thresholds() {
    let engine = engine_with_thresholds(AlertThresholds {
        min_servings_per_guest: 2.0,
        crowd_size: 2,
    })
    .await;
    assert_eq!(engine.thresholds().crowd_size, 2);
    guest(&engine, "Noé", "Blanc").await;
    guest(&engine, "Léa", "Blanc").await;

    let stats = engine.statistics().await.unwrap();
    let last = stats.alerts.last().unwrap();
    assert_eq!(last.kind, AlertKind::Info);
}
