use std::time::Duration;

use sea_orm::Database;
use serde_json::{Value, json};

use engine::Engine;
use migration::MigratorTrait;

struct TestApp {
    base: String,
    client: reqwest::Client,
}

impl TestApp {
    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base)
    }

    async fn get(&self, path: &str, token: &str) -> reqwest::Response {
        self.client
            .get(self.url(path))
            .bearer_auth(token)
            .send()
            .await
            .unwrap()
    }

    async fn post(&self, path: &str, token: &str, body: Value) -> reqwest::Response {
        self.client
            .post(self.url(path))
            .bearer_auth(token)
            .json(&body)
            .send()
            .await
            .unwrap()
    }

    async fn patch(&self, path: &str, token: &str, body: Value) -> reqwest::Response {
        self.client
            .patch(self.url(path))
            .bearer_auth(token)
            .json(&body)
            .send()
            .await
            .unwrap()
    }
}

/// Boot the API over an in-memory database with two users seeded.
async fn spawn_app() -> TestApp {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();

    let engine = Engine::builder()
        .database(db.clone())
        .build()
        .await
        .unwrap();
    engine.create_user("alice", "token-alice").await.unwrap();
    engine.create_user("bob", "token-bob").await.unwrap();

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = server::spawn_with_listener(engine, listener).unwrap();

    TestApp {
        base: format!("http://{addr}"),
        client: reqwest::Client::new(),
    }
}

async fn seed_currency_and_category(app: &TestApp) -> (i64, i64) {
    let currency = app
        .post(
            "/currencies",
            "token-alice",
            json!({"name": "US Dollar", "sign": "$"}),
        )
        .await
        .json::<Value>()
        .await
        .unwrap();
    let category = app
        .post(
            "/costs/categories",
            "token-alice",
            json!({"name": "Groceries"}),
        )
        .await
        .json::<Value>()
        .await
        .unwrap();
    (
        currency["result"]["id"].as_i64().unwrap(),
        category["result"]["id"].as_i64().unwrap(),
    )
}

#[tokio::test]
async fn requests_without_a_valid_token_are_unauthorized() {
    let app = spawn_app().await;

    let response = app
        .client
        .get(app.url("/currencies"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 400); // missing Authorization header

    let response = app.get("/currencies", "wrong-token").await;
    assert_eq!(response.status(), 401);
}

#[tokio::test]
async fn currency_lifecycle_exposes_equity() {
    let app = spawn_app().await;

    let response = app
        .post(
            "/currencies",
            "token-alice",
            json!({"name": "US Dollar", "sign": "$"}),
        )
        .await;
    assert_eq!(response.status(), 201);

    let response = app
        .post(
            "/currencies",
            "token-bob",
            json!({"name": "US Dollar", "sign": "D"}),
        )
        .await;
    assert_eq!(response.status(), 409);

    let body = app
        .get("/currencies", "token-alice")
        .await
        .json::<Value>()
        .await
        .unwrap();
    assert_eq!(body["result"][0]["currency"]["sign"], "$");
    assert_eq!(body["result"][0]["amount"], 0.0);
}

#[tokio::test]
async fn cost_creation_accepts_raw_values_and_books_equity() {
    let app = spawn_app().await;
    let (currency_id, category_id) = seed_currency_and_category(&app).await;

    let response = app
        .post(
            "/costs",
            "token-alice",
            json!({
                "name": "market",
                "value": "4.50",
                "timestamp": "2026-03-02",
                "currencyId": currency_id,
                "categoryId": category_id,
            }),
        )
        .await;
    assert_eq!(response.status(), 201);
    let body = response.json::<Value>().await.unwrap();
    assert_eq!(body["result"]["value"], 4.5);
    assert_eq!(body["result"]["category"]["name"], "Groceries");

    let body = app
        .get("/currencies", "token-alice")
        .await
        .json::<Value>()
        .await
        .unwrap();
    assert_eq!(body["result"][0]["amount"], -4.5);
}

#[tokio::test]
async fn invalid_money_and_dates_are_unprocessable() {
    let app = spawn_app().await;
    let (currency_id, category_id) = seed_currency_and_category(&app).await;

    let response = app
        .post(
            "/costs",
            "token-alice",
            json!({
                "name": "market",
                "value": "not a number",
                "currencyId": currency_id,
                "categoryId": category_id,
            }),
        )
        .await;
    assert_eq!(response.status(), 422);

    let response = app
        .post(
            "/costs",
            "token-alice",
            json!({
                "name": "market",
                "value": 100,
                "timestamp": "03/02/2026",
                "currencyId": currency_id,
                "categoryId": category_id,
            }),
        )
        .await;
    assert_eq!(response.status(), 422);
}

#[tokio::test]
async fn missing_cost_is_not_found_and_noop_patch_is_rejected() {
    let app = spawn_app().await;
    let (currency_id, category_id) = seed_currency_and_category(&app).await;

    let response = app.get("/costs/999", "token-alice").await;
    assert_eq!(response.status(), 404);
    let body = response.json::<Value>().await.unwrap();
    assert_eq!(body["error"], "cost not exists");

    let created = app
        .post(
            "/costs",
            "token-alice",
            json!({
                "name": "market",
                "value": 450,
                "currencyId": currency_id,
                "categoryId": category_id,
            }),
        )
        .await
        .json::<Value>()
        .await
        .unwrap();
    let cost_id = created["result"]["id"].as_i64().unwrap();

    let response = app
        .patch(&format!("/costs/{cost_id}"), "token-alice", json!({}))
        .await;
    assert_eq!(response.status(), 400);
    let body = response.json::<Value>().await.unwrap();
    assert_eq!(body["error"], "nothing to update");
}

#[tokio::test]
async fn transactions_feed_paginates_with_context_and_left() {
    let app = spawn_app().await;
    let (currency_id, category_id) = seed_currency_and_category(&app).await;

    for day in ["2026-03-01", "2026-03-02", "2026-03-03"] {
        app.post(
            "/costs",
            "token-alice",
            json!({
                "name": "market",
                "value": 100,
                "timestamp": day,
                "currencyId": currency_id,
                "categoryId": category_id,
            }),
        )
        .await;
    }

    let body = app
        .get("/transactions?limit=2", "token-alice")
        .await
        .json::<Value>()
        .await
        .unwrap();
    assert_eq!(body["result"].as_array().unwrap().len(), 2);
    assert_eq!(body["context"], 2);
    assert_eq!(body["left"], 1);
    assert_eq!(body["result"][0]["timestamp"], "2026-03-03");
    assert_eq!(body["result"][0]["icon"], "Groceries");
    assert_eq!(body["result"][0]["user"], "alice");
}

#[tokio::test]
async fn analytics_requires_exactly_one_selector() {
    let app = spawn_app().await;

    let response = app.get("/analytics/basic", "token-alice").await;
    assert_eq!(response.status(), 400);

    let response = app
        .get("/analytics/basic?period=current-month", "token-alice")
        .await;
    assert_eq!(response.status(), 200);

    let response = app
        .get(
            "/analytics/basic?startDate=2026-03-01",
            "token-alice",
        )
        .await;
    assert_eq!(response.status(), 400);
}

#[tokio::test]
async fn big_costs_notify_users_over_their_threshold_once() {
    let app = spawn_app().await;
    let (currency_id, category_id) = seed_currency_and_category(&app).await;

    let response = app
        .patch("/users/me", "token-bob", json!({"bigCostThreshold": "50"}))
        .await;
    assert_eq!(response.status(), 200);

    app.post(
        "/costs",
        "token-alice",
        json!({
            "name": "laptop",
            "value": "999.99",
            "currencyId": currency_id,
            "categoryId": category_id,
        }),
    )
    .await;

    // fan-out runs on a background task
    tokio::time::sleep(Duration::from_millis(100)).await;

    let body = app
        .get("/notifications", "token-bob")
        .await
        .json::<Value>()
        .await
        .unwrap();
    let big_costs = body["result"]["bigCosts"].as_array().unwrap();
    assert_eq!(big_costs.len(), 1);
    assert_eq!(big_costs[0]["message"], "laptop: 999.99 $");

    let body = app
        .get("/notifications", "token-bob")
        .await
        .json::<Value>()
        .await
        .unwrap();
    assert!(body["result"]["bigCosts"].as_array().unwrap().is_empty());

    // the author never hears about their own cost
    let body = app
        .get("/notifications", "token-alice")
        .await
        .json::<Value>()
        .await
        .unwrap();
    assert!(body["result"]["bigCosts"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn raising_a_cost_over_a_threshold_notifies_on_update() {
    let app = spawn_app().await;
    let (currency_id, category_id) = seed_currency_and_category(&app).await;

    app.patch("/users/me", "token-bob", json!({"bigCostThreshold": "50"}))
        .await;

    let created = app
        .post(
            "/costs",
            "token-alice",
            json!({
                "name": "headphones",
                "value": "20",
                "currencyId": currency_id,
                "categoryId": category_id,
            }),
        )
        .await
        .json::<Value>()
        .await
        .unwrap();
    let cost_id = created["result"]["id"].as_i64().unwrap();

    tokio::time::sleep(Duration::from_millis(100)).await;
    let body = app
        .get("/notifications", "token-bob")
        .await
        .json::<Value>()
        .await
        .unwrap();
    assert!(body["result"]["bigCosts"].as_array().unwrap().is_empty());

    let response = app
        .patch(
            &format!("/costs/{cost_id}"),
            "token-alice",
            json!({"value": "120"}),
        )
        .await;
    assert_eq!(response.status(), 200);

    // fan-out runs on a background task
    tokio::time::sleep(Duration::from_millis(100)).await;
    let body = app
        .get("/notifications", "token-bob")
        .await
        .json::<Value>()
        .await
        .unwrap();
    let big_costs = body["result"]["bigCosts"].as_array().unwrap();
    assert_eq!(big_costs.len(), 1);
    assert_eq!(big_costs[0]["message"], "headphones: 120 $");
}

#[tokio::test]
async fn shortcut_flow_over_http() {
    let app = spawn_app().await;
    let (currency_id, category_id) = seed_currency_and_category(&app).await;

    let created = app
        .post(
            "/costs/shortcuts",
            "token-alice",
            json!({
                "name": "coffee",
                "value": "3.50",
                "currencyId": currency_id,
                "categoryId": category_id,
            }),
        )
        .await;
    assert_eq!(created.status(), 201);
    let body = created.json::<Value>().await.unwrap();
    let shortcut_id = body["result"]["id"].as_i64().unwrap();
    assert_eq!(body["result"]["uiPositionIndex"], 1);

    let applied = app
        .post(
            &format!("/costs/shortcuts/{shortcut_id}"),
            "token-alice",
            json!({}),
        )
        .await;
    assert_eq!(applied.status(), 201);
    let body = applied.json::<Value>().await.unwrap();
    assert_eq!(body["result"]["value"], 3.5);

    // another user cannot see or apply it
    let body = app
        .get("/costs/shortcuts", "token-bob")
        .await
        .json::<Value>()
        .await
        .unwrap();
    assert!(body["result"].as_array().unwrap().is_empty());
    let applied = app
        .post(
            &format!("/costs/shortcuts/{shortcut_id}"),
            "token-bob",
            json!({}),
        )
        .await;
    assert_eq!(applied.status(), 404);
}
