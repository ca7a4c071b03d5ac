use axum::{
    Router,
    extract::{Request, State},
    http::StatusCode,
    middleware::{self, Next},
    response::Response,
    routing::{get, post},
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Bearer},
};

use std::sync::Arc;

use crate::{
    analytics, bank, costs, currencies, exchange, incomes, notifications, notify::Notifier,
    transactions, users,
};
use engine::Engine;

#[derive(Clone)]
pub struct ServerState {
    pub engine: Arc<Engine>,
    pub notifier: Notifier,
}

async fn auth(
    auth_header: TypedHeader<Authorization<Bearer>>,
    State(state): State<ServerState>,
    mut request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let token = auth_header.token();
    if token.is_empty() {
        return Err(StatusCode::UNAUTHORIZED);
    }

    let user = state
        .engine
        .user_by_token(token)
        .await
        .map_err(|_| StatusCode::UNAUTHORIZED)?;

    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}

pub(crate) fn router(state: ServerState) -> Router {
    Router::new()
        .route(
            "/currencies",
            get(currencies::list).post(currencies::create),
        )
        .route(
            "/costs/categories",
            get(costs::categories).post(costs::category_create),
        )
        .route(
            "/costs/shortcuts",
            get(costs::shortcuts)
                .post(costs::shortcut_create)
                .put(costs::shortcut_reorder),
        )
        .route(
            "/costs/shortcuts/{shortcut_id}",
            post(costs::shortcut_apply).delete(costs::shortcut_delete),
        )
        .route("/costs", get(costs::list).post(costs::create))
        .route(
            "/costs/{cost_id}",
            get(costs::retrieve)
                .patch(costs::update)
                .delete(costs::remove),
        )
        .route("/incomes", get(incomes::list).post(incomes::create))
        .route(
            "/incomes/{income_id}",
            get(incomes::retrieve)
                .patch(incomes::update)
                .delete(incomes::remove),
        )
        .route("/exchange", get(exchange::list).post(exchange::create))
        .route(
            "/exchange/{exchange_id}",
            get(exchange::retrieve).delete(exchange::remove),
        )
        .route("/transactions", get(transactions::list))
        .route("/transactions/sync", post(bank::sync))
        .route("/analytics/basic", get(analytics::basic))
        .route("/notifications", get(notifications::list))
        .route("/users/me", get(users::me).patch(users::update_me))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth))
        .with_state(state)
}

pub async fn run(engine: Engine) {
    let listener = match tokio::net::TcpListener::bind("127.0.0.1:3000").await {
        Ok(listener) => listener,
        Err(err) => {
            tracing::error!("failed to bind server listener: {err}");
            return;
        }
    };
    if let Err(err) = run_with_listener(engine, listener).await {
        tracing::error!("server failed: {err}");
    }
}

pub async fn run_with_listener(
    engine: Engine,
    listener: tokio::net::TcpListener,
) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    tracing::info!("Server listening on {}", addr);

    let state = ServerState {
        engine: Arc::new(engine),
        notifier: Notifier::default(),
    };

    axum::serve(listener, router(state)).await
}

pub fn spawn_with_listener(
    engine: Engine,
    listener: tokio::net::TcpListener,
) -> Result<std::net::SocketAddr, std::io::Error> {
    let addr = listener.local_addr()?;

    tokio::spawn(async move {
        if let Err(err) = run_with_listener(engine, listener).await {
            tracing::error!("server failed: {err}");
        }
    });

    Ok(addr)
}
