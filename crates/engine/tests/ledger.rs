use chrono::NaiveDate;
use sea_orm::Database;

use engine::{
    CostDraft, CostPatch, CostShortcutDraft, Currency, Engine, EngineError, ExchangeDraft,
    IncomeDraft, IncomePatch, IncomeSource,
};
use migration::MigratorTrait;

async fn engine() -> Engine {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    Engine::builder().database(db).build().await.unwrap()
}

async fn seeded() -> (Engine, i32, Currency, i32) {
    let engine = engine().await;
    let user = engine.create_user("alice", "token-alice").await.unwrap();
    let usd = engine.create_currency("US Dollar", "$").await.unwrap();
    let groceries = engine.create_cost_category("Groceries").await.unwrap();
    (engine, user.id, usd, groceries.id)
}

fn date(value: &str) -> NaiveDate {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").unwrap()
}

async fn equity_of(engine: &Engine, currency_id: i32) -> i64 {
    engine
        .currencies()
        .await
        .unwrap()
        .into_iter()
        .find(|currency| currency.id == currency_id)
        .unwrap()
        .equity
}

fn cost_draft(user_id: i32, currency_id: i32, category_id: i32, value: i64) -> CostDraft {
    CostDraft {
        name: "coffee".to_string(),
        value,
        timestamp: date("2026-03-10"),
        user_id,
        currency_id,
        category_id,
    }
}

#[tokio::test]
async fn cost_books_against_equity_and_delete_refunds() {
    let (engine, user_id, usd, category_id) = seeded().await;

    let cost = engine
        .add_cost(cost_draft(user_id, usd.id, category_id, 450))
        .await
        .unwrap();
    assert_eq!(equity_of(&engine, usd.id).await, -450);
    assert_eq!(cost.currency.equity, -450);

    engine.delete_cost(cost.id).await.unwrap();
    assert_eq!(equity_of(&engine, usd.id).await, 0);
}

#[tokio::test]
async fn income_books_into_equity_and_delete_reverts() {
    let (engine, user_id, usd, _) = seeded().await;

    let income = engine
        .add_income(IncomeDraft {
            name: "salary".to_string(),
            value: 200_000,
            timestamp: date("2026-03-01"),
            source: IncomeSource::Revenue,
            user_id,
            currency_id: usd.id,
        })
        .await
        .unwrap();
    assert_eq!(equity_of(&engine, usd.id).await, 200_000);

    engine.delete_income(income.id).await.unwrap();
    assert_eq!(equity_of(&engine, usd.id).await, 0);
}

#[tokio::test]
async fn exchange_moves_equity_between_currencies() {
    let (engine, user_id, usd, _) = seeded().await;
    let eur = engine.create_currency("Euro", "€").await.unwrap();

    let exchange = engine
        .add_exchange(ExchangeDraft {
            from_value: 10_000,
            to_value: 9_200,
            timestamp: date("2026-03-05"),
            user_id,
            from_currency_id: usd.id,
            to_currency_id: eur.id,
        })
        .await
        .unwrap();
    assert_eq!(equity_of(&engine, usd.id).await, -10_000);
    assert_eq!(equity_of(&engine, eur.id).await, 9_200);

    engine.delete_exchange(exchange.id).await.unwrap();
    assert_eq!(equity_of(&engine, usd.id).await, 0);
    assert_eq!(equity_of(&engine, eur.id).await, 0);
}

#[tokio::test]
async fn exchange_requires_two_distinct_currencies() {
    let (engine, user_id, usd, _) = seeded().await;

    let err = engine
        .add_exchange(ExchangeDraft {
            from_value: 100,
            to_value: 100,
            timestamp: date("2026-03-05"),
            user_id,
            from_currency_id: usd.id,
            to_currency_id: usd.id,
        })
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::BadRequest(_)));
    assert_eq!(equity_of(&engine, usd.id).await, 0);
}

#[tokio::test]
async fn cost_value_update_adjusts_equity_by_the_difference() {
    let (engine, user_id, usd, category_id) = seeded().await;

    let cost = engine
        .add_cost(cost_draft(user_id, usd.id, category_id, 1_000))
        .await
        .unwrap();

    engine
        .update_cost(
            cost.id,
            CostPatch {
                value: Some(1_500),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(equity_of(&engine, usd.id).await, -1_500);

    engine
        .update_cost(
            cost.id,
            CostPatch {
                value: Some(400),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(equity_of(&engine, usd.id).await, -400);
}

#[tokio::test]
async fn cost_currency_update_rebooks_both_ledgers() {
    let (engine, user_id, usd, category_id) = seeded().await;
    let eur = engine.create_currency("Euro", "€").await.unwrap();

    let cost = engine
        .add_cost(cost_draft(user_id, usd.id, category_id, 1_000))
        .await
        .unwrap();

    let updated = engine
        .update_cost(
            cost.id,
            CostPatch {
                value: Some(800),
                currency_id: Some(eur.id),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.currency.id, eur.id);
    assert_eq!(equity_of(&engine, usd.id).await, 0);
    assert_eq!(equity_of(&engine, eur.id).await, -800);
}

#[tokio::test]
async fn income_currency_update_rebooks_both_ledgers() {
    let (engine, user_id, usd, _) = seeded().await;
    let eur = engine.create_currency("Euro", "€").await.unwrap();

    let income = engine
        .add_income(IncomeDraft {
            name: "gift".to_string(),
            value: 5_000,
            timestamp: date("2026-03-02"),
            source: IncomeSource::Gift,
            user_id,
            currency_id: usd.id,
        })
        .await
        .unwrap();

    engine
        .update_income(
            income.id,
            IncomePatch {
                currency_id: Some(eur.id),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(equity_of(&engine, usd.id).await, 0);
    assert_eq!(equity_of(&engine, eur.id).await, 5_000);
}

#[tokio::test]
async fn noop_patch_is_rejected() {
    let (engine, user_id, usd, category_id) = seeded().await;
    let cost = engine
        .add_cost(cost_draft(user_id, usd.id, category_id, 1_000))
        .await
        .unwrap();

    let err = engine
        .update_cost(cost.id, CostPatch::default())
        .await
        .unwrap_err();
    assert_eq!(err, EngineError::BadRequest("nothing to update".to_string()));

    // echoing the stored values back counts as a no-op too
    let err = engine
        .update_cost(
            cost.id,
            CostPatch {
                value: Some(1_000),
                name: Some("coffee".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err, EngineError::BadRequest("nothing to update".to_string()));
    assert_eq!(equity_of(&engine, usd.id).await, -1_000);
}

#[tokio::test]
async fn duplicate_currency_and_category_are_conflicts() {
    let (engine, _, _, _) = seeded().await;

    let err = engine.create_currency("US Dollar", "D").await.unwrap_err();
    assert!(matches!(err, EngineError::ExistingKey(_)));
    let err = engine.create_currency("Dollar", "$").await.unwrap_err();
    assert!(matches!(err, EngineError::ExistingKey(_)));
    let err = engine.create_currency("Hryvnia", "UAH").await.unwrap_err();
    assert!(matches!(err, EngineError::BadRequest(_)));

    let err = engine.create_cost_category("Groceries").await.unwrap_err();
    assert!(matches!(err, EngineError::ExistingKey(_)));
}

#[tokio::test]
async fn missing_references_are_not_found() {
    let (engine, user_id, usd, category_id) = seeded().await;

    let err = engine.cost(999).await.unwrap_err();
    assert_eq!(err, EngineError::KeyNotFound("cost not exists".to_string()));

    let err = engine
        .add_cost(cost_draft(user_id, 999, category_id, 100))
        .await
        .unwrap_err();
    assert_eq!(
        err,
        EngineError::KeyNotFound("currency not exists".to_string())
    );

    let err = engine
        .add_cost(cost_draft(user_id, usd.id, 999, 100))
        .await
        .unwrap_err();
    assert_eq!(
        err,
        EngineError::KeyNotFound("cost category not exists".to_string())
    );
    // the failed inserts must not have touched the ledger
    assert_eq!(equity_of(&engine, usd.id).await, 0);
}

#[tokio::test]
async fn cost_list_is_newest_first_but_count_covers_the_table() {
    let (engine, user_id, usd, category_id) = seeded().await;
    let bob = engine.create_user("bob", "token-bob").await.unwrap();

    for (day, value) in [("2026-03-01", 100), ("2026-03-03", 200), ("2026-03-02", 300)] {
        engine
            .add_cost(CostDraft {
                name: "coffee".to_string(),
                value,
                timestamp: date(day),
                user_id,
                currency_id: usd.id,
                category_id,
            })
            .await
            .unwrap();
    }
    engine
        .add_cost(cost_draft(bob.id, usd.id, category_id, 50))
        .await
        .unwrap();

    let costs = engine.costs(Some(user_id), 0, 10).await.unwrap();
    let values: Vec<i64> = costs.iter().map(|cost| cost.value).collect();
    assert_eq!(values, vec![200, 300, 100]);

    assert_eq!(engine.count_costs().await.unwrap(), 4);
}

#[tokio::test]
async fn shortcut_positions_stay_dense() {
    let (engine, user_id, usd, category_id) = seeded().await;

    for name in ["coffee", "bus", "lunch"] {
        engine
            .add_cost_shortcut(CostShortcutDraft {
                name: name.to_string(),
                value: Some(300),
                user_id,
                currency_id: usd.id,
                category_id,
            })
            .await
            .unwrap();
    }

    let shortcuts = engine.cost_shortcuts(user_id).await.unwrap();
    let positions: Vec<i32> = shortcuts.iter().map(|s| s.ui_position_index).collect();
    assert_eq!(positions, vec![1, 2, 3]);

    let middle = shortcuts[1].id;
    engine.delete_cost_shortcut(user_id, middle).await.unwrap();

    let shortcuts = engine.cost_shortcuts(user_id).await.unwrap();
    let names: Vec<&str> = shortcuts.iter().map(|s| s.name.as_str()).collect();
    let positions: Vec<i32> = shortcuts.iter().map(|s| s.ui_position_index).collect();
    assert_eq!(names, vec!["coffee", "lunch"]);
    assert_eq!(positions, vec![1, 2]);
}

#[tokio::test]
async fn shortcut_reorder_shifts_the_window() {
    let (engine, user_id, usd, category_id) = seeded().await;

    for name in ["coffee", "bus", "lunch", "gym"] {
        engine
            .add_cost_shortcut(CostShortcutDraft {
                name: name.to_string(),
                value: None,
                user_id,
                currency_id: usd.id,
                category_id,
            })
            .await
            .unwrap();
    }

    let shortcuts = engine.cost_shortcuts(user_id).await.unwrap();
    let gym = shortcuts[3].id;

    let moved = engine.reorder_cost_shortcut(user_id, gym, 1).await.unwrap();
    assert_eq!(moved.ui_position_index, 1);

    let shortcuts = engine.cost_shortcuts(user_id).await.unwrap();
    let names: Vec<&str> = shortcuts.iter().map(|s| s.name.as_str()).collect();
    let positions: Vec<i32> = shortcuts.iter().map(|s| s.ui_position_index).collect();
    assert_eq!(names, vec!["gym", "coffee", "bus", "lunch"]);
    assert_eq!(positions, vec![1, 2, 3, 4]);

    let err = engine
        .reorder_cost_shortcut(user_id, gym, 5)
        .await
        .unwrap_err();
    assert_eq!(
        err,
        EngineError::BadRequest("position must be between 1 and 4".to_string())
    );
}

#[tokio::test]
async fn shortcut_reorder_is_scoped_to_the_owner() {
    let (engine, user_id, usd, category_id) = seeded().await;
    let bob = engine.create_user("bob", "token-bob").await.unwrap();

    let shortcut = engine
        .add_cost_shortcut(CostShortcutDraft {
            name: "coffee".to_string(),
            value: Some(300),
            user_id,
            currency_id: usd.id,
            category_id,
        })
        .await
        .unwrap();

    let err = engine
        .delete_cost_shortcut(bob.id, shortcut.id)
        .await
        .unwrap_err();
    assert_eq!(
        err,
        EngineError::KeyNotFound("cost shortcut not exists".to_string())
    );
}

#[tokio::test]
async fn applying_a_shortcut_books_a_cost_dated_today() {
    let (engine, user_id, usd, category_id) = seeded().await;

    let preset = engine
        .add_cost_shortcut(CostShortcutDraft {
            name: "coffee".to_string(),
            value: Some(350),
            user_id,
            currency_id: usd.id,
            category_id,
        })
        .await
        .unwrap();

    let cost = engine
        .apply_cost_shortcut(user_id, preset.id, None)
        .await
        .unwrap();
    assert_eq!(cost.value, 350);
    assert_eq!(cost.timestamp, engine::money::today());
    assert_eq!(equity_of(&engine, usd.id).await, -350);

    // an explicit value wins over the preset
    let cost = engine
        .apply_cost_shortcut(user_id, preset.id, Some(500))
        .await
        .unwrap();
    assert_eq!(cost.value, 500);
    assert_eq!(equity_of(&engine, usd.id).await, -850);
}

#[tokio::test]
async fn shortcut_without_any_value_is_unusable() {
    let (engine, user_id, usd, category_id) = seeded().await;

    let blank = engine
        .add_cost_shortcut(CostShortcutDraft {
            name: "misc".to_string(),
            value: None,
            user_id,
            currency_id: usd.id,
            category_id,
        })
        .await
        .unwrap();

    let err = engine
        .apply_cost_shortcut(user_id, blank.id, None)
        .await
        .unwrap_err();
    assert_eq!(
        err,
        EngineError::BadRequest("the shortcut has no predefined value".to_string())
    );
}

#[tokio::test]
async fn big_cost_audience_respects_thresholds() {
    let (engine, alice_id, _, _) = seeded().await;
    let bob = engine.create_user("bob", "token-bob").await.unwrap();
    let carol = engine.create_user("carol", "token-carol").await.unwrap();

    engine
        .update_big_cost_threshold(bob.id, Some(10_000))
        .await
        .unwrap();
    engine
        .update_big_cost_threshold(carol.id, Some(50_000))
        .await
        .unwrap();

    let audience = engine.users_for_big_cost(20_000, alice_id).await.unwrap();
    let names: Vec<&str> = audience.iter().map(|u| u.name.as_str()).collect();
    assert_eq!(names, vec!["bob"]);

    // the author never hears about their own cost
    let audience = engine.users_for_big_cost(20_000, bob.id).await.unwrap();
    assert!(audience.is_empty());
}

#[tokio::test]
async fn bank_import_dedup_is_per_user() {
    let (engine, alice_id, _, _) = seeded().await;
    let bob = engine.create_user("bob", "token-bob").await.unwrap();

    assert!(!engine.already_imported(alice_id, "stmt-1").await.unwrap());
    engine.mark_imported(alice_id, "stmt-1").await.unwrap();
    assert!(engine.already_imported(alice_id, "stmt-1").await.unwrap());
    assert!(!engine.already_imported(bob.id, "stmt-1").await.unwrap());
}
