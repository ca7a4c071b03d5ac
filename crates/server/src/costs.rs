use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use chrono::NaiveDate;

use api_types::{
    PaginationQuery, Response, ResponseMulti, ResponseMultiPaginated,
    shortcut::{
        CostShortcutApplyBody, CostShortcutCreateBody, CostShortcutReorderBody, CostShortcutView,
    },
    transaction::{
        CostCategoryCreateBody, CostCategoryView, CostCreateBody, CostUpdateBody, CostView,
    },
};
use engine::{CostDraft, CostPatch, CostShortcutDraft, money, users};

use crate::{
    DEFAULT_PAGE_SIZE, ServerError, currencies::currency_view, notify, paginated,
    server::ServerState,
};

pub(crate) fn category_view(category: &engine::CostCategory) -> CostCategoryView {
    CostCategoryView {
        id: category.id,
        name: category.name.clone(),
    }
}

fn cost_view(cost: &engine::Cost) -> CostView {
    CostView {
        id: cost.id,
        name: cost.name.clone(),
        value: money::pretty_money(cost.value),
        timestamp: cost.timestamp,
        currency: currency_view(&cost.currency),
        category: category_view(&cost.category),
    }
}

fn shortcut_view(shortcut: &engine::CostShortcut) -> CostShortcutView {
    CostShortcutView {
        id: shortcut.id,
        name: shortcut.name.clone(),
        value: shortcut.value.map(money::pretty_money),
        currency: currency_view(&shortcut.currency),
        category: category_view(&shortcut.category),
        ui_position_index: shortcut.ui_position_index,
    }
}

/// Resolve an optional raw timestamp, falling back to today.
pub(crate) fn timestamp_or_today(raw: Option<&str>) -> Result<NaiveDate, ServerError> {
    match raw {
        Some(raw) => Ok(money::timestamp_from_raw(raw)?),
        None => Ok(money::today()),
    }
}

pub async fn category_create(
    State(state): State<ServerState>,
    Json(body): Json<CostCategoryCreateBody>,
) -> Result<(StatusCode, Json<Response<CostCategoryView>>), ServerError> {
    let category = state.engine.create_cost_category(&body.name).await?;
    Ok((
        StatusCode::CREATED,
        Json(Response {
            result: category_view(&category),
        }),
    ))
}

pub async fn categories(
    State(state): State<ServerState>,
) -> Result<Json<ResponseMulti<CostCategoryView>>, ServerError> {
    let categories = state.engine.cost_categories().await?;
    Ok(Json(ResponseMulti {
        result: categories.iter().map(category_view).collect(),
    }))
}

pub async fn create(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Json(body): Json<CostCreateBody>,
) -> Result<(StatusCode, Json<Response<CostView>>), ServerError> {
    let cost = state
        .engine
        .add_cost(CostDraft {
            name: body.name,
            value: money::cents_from_raw(&body.value)?,
            timestamp: timestamp_or_today(body.timestamp.as_deref())?,
            user_id: user.id,
            currency_id: body.currency_id,
            category_id: body.category_id,
        })
        .await?;

    let view = cost_view(&cost);
    tokio::spawn(notify::notify_about_big_cost(
        state.engine.clone(),
        state.notifier.clone(),
        cost,
    ));
    Ok((StatusCode::CREATED, Json(Response { result: view })))
}

pub async fn list(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Query(pagination): Query<PaginationQuery>,
) -> Result<Json<ResponseMultiPaginated<CostView>>, ServerError> {
    let offset = pagination.context.unwrap_or(0);
    let limit = pagination.limit.unwrap_or(DEFAULT_PAGE_SIZE);

    let costs = state.engine.costs(Some(user.id), offset, limit).await?;
    let total = state.engine.count_costs().await?;
    Ok(Json(paginated(
        costs.iter().map(cost_view).collect(),
        offset,
        total,
    )))
}

pub async fn retrieve(
    State(state): State<ServerState>,
    Path(cost_id): Path<i32>,
) -> Result<Json<Response<CostView>>, ServerError> {
    let cost = state.engine.cost(cost_id).await?;
    Ok(Json(Response {
        result: cost_view(&cost),
    }))
}

pub async fn update(
    State(state): State<ServerState>,
    Path(cost_id): Path<i32>,
    Json(body): Json<CostUpdateBody>,
) -> Result<Json<Response<CostView>>, ServerError> {
    let patch = CostPatch {
        name: body.name,
        value: body.value.as_ref().map(money::cents_from_raw).transpose()?,
        timestamp: body
            .timestamp
            .as_deref()
            .map(money::timestamp_from_raw)
            .transpose()?,
        currency_id: body.currency_id,
        category_id: body.category_id,
    };

    let cost = state.engine.update_cost(cost_id, patch).await?;
    let view = cost_view(&cost);
    tokio::spawn(notify::notify_about_big_cost(
        state.engine.clone(),
        state.notifier.clone(),
        cost,
    ));
    Ok(Json(Response { result: view }))
}

pub async fn remove(
    State(state): State<ServerState>,
    Path(cost_id): Path<i32>,
) -> Result<StatusCode, ServerError> {
    state.engine.delete_cost(cost_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn shortcut_create(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Json(body): Json<CostShortcutCreateBody>,
) -> Result<(StatusCode, Json<Response<CostShortcutView>>), ServerError> {
    let shortcut = state
        .engine
        .add_cost_shortcut(CostShortcutDraft {
            name: body.name,
            value: body.value.as_ref().map(money::cents_from_raw).transpose()?,
            user_id: user.id,
            currency_id: body.currency_id,
            category_id: body.category_id,
        })
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(Response {
            result: shortcut_view(&shortcut),
        }),
    ))
}

pub async fn shortcuts(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
) -> Result<Json<ResponseMulti<CostShortcutView>>, ServerError> {
    let shortcuts = state.engine.cost_shortcuts(user.id).await?;
    Ok(Json(ResponseMulti {
        result: shortcuts.iter().map(shortcut_view).collect(),
    }))
}

pub async fn shortcut_delete(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Path(shortcut_id): Path<i32>,
) -> Result<StatusCode, ServerError> {
    state
        .engine
        .delete_cost_shortcut(user.id, shortcut_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn shortcut_reorder(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Json(body): Json<CostShortcutReorderBody>,
) -> Result<Json<Response<CostShortcutView>>, ServerError> {
    let shortcut = state
        .engine
        .reorder_cost_shortcut(user.id, body.id, body.position)
        .await?;
    Ok(Json(Response {
        result: shortcut_view(&shortcut),
    }))
}

/// Book a cost dated today from a stored shortcut.
pub async fn shortcut_apply(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Path(shortcut_id): Path<i32>,
    Json(body): Json<CostShortcutApplyBody>,
) -> Result<(StatusCode, Json<Response<CostView>>), ServerError> {
    let value = body.value.as_ref().map(money::cents_from_raw).transpose()?;
    let cost = state
        .engine
        .apply_cost_shortcut(user.id, shortcut_id, value)
        .await?;

    let view = cost_view(&cost);
    tokio::spawn(notify::notify_about_big_cost(
        state.engine.clone(),
        state.notifier.clone(),
        cost,
    ));
    Ok((StatusCode::CREATED, Json(Response { result: view })))
}
