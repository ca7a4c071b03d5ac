use axum::{Extension, Json, extract::State};

use api_types::{Response, notification::NotificationsView};
use engine::users;

use crate::{ServerError, server::ServerState};

/// Pending notifications for the caller; reading empties the queue.
pub async fn list(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
) -> Result<Json<Response<NotificationsView>>, ServerError> {
    let notifications = state.notifier.drain(user.id).await;
    Ok(Json(Response {
        result: notifications,
    }))
}
