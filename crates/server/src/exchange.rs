use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
};

use api_types::{
    PaginationQuery, Response, ResponseMultiPaginated,
    transaction::{ExchangeCreateBody, ExchangeView},
};
use engine::{ExchangeDraft, money, users};

use crate::{
    DEFAULT_PAGE_SIZE, ServerError, costs::timestamp_or_today, currencies::currency_view,
    paginated, server::ServerState,
};

fn exchange_view(exchange: &engine::Exchange) -> ExchangeView {
    ExchangeView {
        id: exchange.id,
        from_value: money::pretty_money(exchange.from_value),
        to_value: money::pretty_money(exchange.to_value),
        timestamp: exchange.timestamp,
        from_currency: currency_view(&exchange.from_currency),
        to_currency: currency_view(&exchange.to_currency),
    }
}

pub async fn create(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Json(body): Json<ExchangeCreateBody>,
) -> Result<(StatusCode, Json<Response<ExchangeView>>), ServerError> {
    let exchange = state
        .engine
        .add_exchange(ExchangeDraft {
            from_value: money::cents_from_raw(&body.from_value)?,
            to_value: money::cents_from_raw(&body.to_value)?,
            timestamp: timestamp_or_today(body.timestamp.as_deref())?,
            user_id: user.id,
            from_currency_id: body.from_currency_id,
            to_currency_id: body.to_currency_id,
        })
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(Response {
            result: exchange_view(&exchange),
        }),
    ))
}

pub async fn list(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Query(pagination): Query<PaginationQuery>,
) -> Result<Json<ResponseMultiPaginated<ExchangeView>>, ServerError> {
    let offset = pagination.context.unwrap_or(0);
    let limit = pagination.limit.unwrap_or(DEFAULT_PAGE_SIZE);

    let exchanges = state.engine.exchanges(Some(user.id), offset, limit).await?;
    let total = state.engine.count_exchanges().await?;
    Ok(Json(paginated(
        exchanges.iter().map(exchange_view).collect(),
        offset,
        total,
    )))
}

pub async fn retrieve(
    State(state): State<ServerState>,
    Path(exchange_id): Path<i32>,
) -> Result<Json<Response<ExchangeView>>, ServerError> {
    let exchange = state.engine.exchange(exchange_id).await?;
    Ok(Json(Response {
        result: exchange_view(&exchange),
    }))
}

pub async fn remove(
    State(state): State<ServerState>,
    Path(exchange_id): Path<i32>,
) -> Result<StatusCode, ServerError> {
    state.engine.delete_exchange(exchange_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
