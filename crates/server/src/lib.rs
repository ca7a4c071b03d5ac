use axum::{Json, http::StatusCode, response::IntoResponse};
use engine::EngineError;

use serde::Serialize;
pub use server::{run, run_with_listener, spawn_with_listener};

mod analytics;
mod bank;
mod costs;
mod currencies;
mod exchange;
mod incomes;
mod notifications;
pub mod notify;
mod server;
mod transactions;
mod users;

pub enum ServerError {
    Engine(EngineError),
    Generic(String),
}

#[derive(Serialize)]
struct Error {
    error: String,
}

fn status_for_engine_error(err: &EngineError) -> StatusCode {
    match err {
        EngineError::KeyNotFound(_) => StatusCode::NOT_FOUND,
        EngineError::ExistingKey(_) => StatusCode::CONFLICT,
        EngineError::BadRequest(_) => StatusCode::BAD_REQUEST,
        EngineError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        EngineError::InvalidAmount(_) | EngineError::InvalidTimestamp(_) => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
    }
}

fn message_for_engine_error(err: EngineError) -> String {
    match err {
        EngineError::Database(db_err) => {
            tracing::error!("database error: {db_err}");
            "internal server error".to_string()
        }
        other => other.to_string(),
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> axum::response::Response {
        let (status, error) = match self {
            ServerError::Engine(err) => {
                (status_for_engine_error(&err), message_for_engine_error(err))
            }
            ServerError::Generic(err) => (StatusCode::BAD_REQUEST, err),
        };

        (status, Json(Error { error })).into_response()
    }
}

impl From<EngineError> for ServerError {
    fn from(value: EngineError) -> Self {
        Self::Engine(value)
    }
}

/// Default page size for list endpoints.
pub(crate) const DEFAULT_PAGE_SIZE: u64 = 10;

/// `context`/`left` pagination contract: `context` is the absolute offset
/// after this page, `left` is what remains. An empty page resets both to 0.
pub(crate) fn paginated<T>(
    items: Vec<T>,
    offset: u64,
    total: u64,
) -> api_types::ResponseMultiPaginated<T> {
    if items.is_empty() {
        return api_types::ResponseMultiPaginated {
            result: items,
            context: 0,
            left: 0,
        };
    }
    let context = offset + items.len() as u64;
    api_types::ResponseMultiPaginated {
        left: total as i64 - context as i64,
        result: items,
        context,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn engine_not_found_maps_to_404() {
        let res = ServerError::from(EngineError::KeyNotFound("x".to_string())).into_response();
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn engine_conflict_maps_to_409() {
        let res = ServerError::from(EngineError::ExistingKey("x".to_string())).into_response();
        assert_eq!(res.status(), StatusCode::CONFLICT);
    }

    #[test]
    fn engine_validation_maps_to_422() {
        let res = ServerError::from(EngineError::InvalidAmount("x".to_string())).into_response();
        assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let res =
            ServerError::from(EngineError::InvalidTimestamp("x".to_string())).into_response();
        assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn engine_bad_request_maps_to_400() {
        let res = ServerError::from(EngineError::BadRequest("x".to_string())).into_response();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn generic_maps_to_400() {
        let res = ServerError::Generic("bad".to_string()).into_response();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn pagination_reports_context_and_left() {
        let page = paginated(vec![1, 2, 3], 5, 20);
        assert_eq!(page.context, 8);
        assert_eq!(page.left, 12);
    }

    #[test]
    fn empty_page_resets_pagination() {
        let page = paginated(Vec::<i32>::new(), 5, 20);
        assert_eq!(page.context, 0);
        assert_eq!(page.left, 0);
    }
}
