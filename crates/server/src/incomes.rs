use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
};

use api_types::{
    PaginationQuery, Response, ResponseMultiPaginated,
    transaction::{self, IncomeCreateBody, IncomeUpdateBody, IncomeView},
};
use engine::{IncomeDraft, IncomePatch, IncomeSource, money, users};

use crate::{
    DEFAULT_PAGE_SIZE, ServerError, costs::timestamp_or_today, currencies::currency_view, notify,
    paginated, server::ServerState,
};

fn source_from_api(source: transaction::IncomeSource) -> IncomeSource {
    match source {
        transaction::IncomeSource::Revenue => IncomeSource::Revenue,
        transaction::IncomeSource::Gift => IncomeSource::Gift,
        transaction::IncomeSource::Debt => IncomeSource::Debt,
        transaction::IncomeSource::Other => IncomeSource::Other,
    }
}

fn source_to_api(source: IncomeSource) -> transaction::IncomeSource {
    match source {
        IncomeSource::Revenue => transaction::IncomeSource::Revenue,
        IncomeSource::Gift => transaction::IncomeSource::Gift,
        IncomeSource::Debt => transaction::IncomeSource::Debt,
        IncomeSource::Other => transaction::IncomeSource::Other,
    }
}

fn income_view(income: &engine::Income) -> IncomeView {
    IncomeView {
        id: income.id,
        name: income.name.clone(),
        value: money::pretty_money(income.value),
        timestamp: income.timestamp,
        source: source_to_api(income.source),
        currency: currency_view(&income.currency),
    }
}

pub async fn create(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Json(body): Json<IncomeCreateBody>,
) -> Result<(StatusCode, Json<Response<IncomeView>>), ServerError> {
    let income = state
        .engine
        .add_income(IncomeDraft {
            name: body.name,
            value: money::cents_from_raw(&body.value)?,
            timestamp: timestamp_or_today(body.timestamp.as_deref())?,
            source: source_from_api(body.source),
            user_id: user.id,
            currency_id: body.currency_id,
        })
        .await?;

    let view = income_view(&income);
    tokio::spawn(notify::notify_about_income(
        state.engine.clone(),
        state.notifier.clone(),
        income,
    ));
    Ok((StatusCode::CREATED, Json(Response { result: view })))
}

pub async fn list(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Query(pagination): Query<PaginationQuery>,
) -> Result<Json<ResponseMultiPaginated<IncomeView>>, ServerError> {
    let offset = pagination.context.unwrap_or(0);
    let limit = pagination.limit.unwrap_or(DEFAULT_PAGE_SIZE);

    let incomes = state.engine.incomes(Some(user.id), offset, limit).await?;
    let total = state.engine.count_incomes().await?;
    Ok(Json(paginated(
        incomes.iter().map(income_view).collect(),
        offset,
        total,
    )))
}

pub async fn retrieve(
    State(state): State<ServerState>,
    Path(income_id): Path<i32>,
) -> Result<Json<Response<IncomeView>>, ServerError> {
    let income = state.engine.income(income_id).await?;
    Ok(Json(Response {
        result: income_view(&income),
    }))
}

pub async fn update(
    State(state): State<ServerState>,
    Path(income_id): Path<i32>,
    Json(body): Json<IncomeUpdateBody>,
) -> Result<Json<Response<IncomeView>>, ServerError> {
    let patch = IncomePatch {
        name: body.name,
        value: body.value.as_ref().map(money::cents_from_raw).transpose()?,
        timestamp: body
            .timestamp
            .as_deref()
            .map(money::timestamp_from_raw)
            .transpose()?,
        source: body.source.map(source_from_api),
        currency_id: body.currency_id,
    };

    let income = state.engine.update_income(income_id, patch).await?;
    Ok(Json(Response {
        result: income_view(&income),
    }))
}

pub async fn remove(
    State(state): State<ServerState>,
    Path(income_id): Path<i32>,
) -> Result<StatusCode, ServerError> {
    state.engine.delete_income(income_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
