use axum::{Extension, Json, extract::State};

use api_types::{
    Response,
    user::{UserUpdateBody, UserView},
};
use engine::{money, users};

use crate::{ServerError, server::ServerState};

fn user_view(user: &users::Model) -> UserView {
    UserView {
        id: user.id,
        name: user.name.clone(),
        big_cost_threshold: user.big_cost_threshold.map(money::pretty_money),
    }
}

pub async fn me(
    Extension(user): Extension<users::Model>,
) -> Result<Json<Response<UserView>>, ServerError> {
    Ok(Json(Response {
        result: user_view(&user),
    }))
}

/// Set or clear the caller's big-cost notification threshold.
pub async fn update_me(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Json(body): Json<UserUpdateBody>,
) -> Result<Json<Response<UserView>>, ServerError> {
    let threshold = body
        .big_cost_threshold
        .as_ref()
        .map(money::cents_from_raw)
        .transpose()?;

    let updated = state
        .engine
        .update_big_cost_threshold(user.id, threshold)
        .await?;
    Ok(Json(Response {
        result: user_view(&updated),
    }))
}
