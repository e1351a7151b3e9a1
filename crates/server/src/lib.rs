use axum::{Json, http::StatusCode, response::IntoResponse};
use engine::EngineError;

use serde::Serialize;
pub use server::{AuthConfig, ServerState, router, run, run_with_listener, spawn_with_listener};

mod auth;
mod expenses;
mod reports;
mod server;
mod statistics;

pub mod types {
    pub mod expense {
        pub use api_types::expense::{
            ChartView, ExpenseListParams, ExpenseNew, ExpenseUpdate, ExpenseView, SummaryView,
        };
    }

    pub mod user {
        pub use api_types::user::{AccessToken, LoginUser, SignupUser, TokenPair, TokenRefresh};
    }
}

pub enum ServerError {
    Engine(EngineError),
    Unauthorized,
    Generic(String),
}

#[derive(Serialize)]
struct Error {
    error: String,
}

fn status_for_engine_error(err: &EngineError) -> StatusCode {
    match err {
        EngineError::Forbidden(_) => StatusCode::FORBIDDEN,
        EngineError::KeyNotFound(_) => StatusCode::NOT_FOUND,
        EngineError::Database(_) | EngineError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        EngineError::Validation(_)
        | EngineError::InvalidDateRange(_)
        | EngineError::InvalidOrdering(_) => StatusCode::UNPROCESSABLE_ENTITY,
    }
}

fn message_for_engine_error(err: EngineError) -> String {
    match err {
        EngineError::Database(db_err) => {
            tracing::error!("database error: {db_err}");
            "internal server error".to_string()
        }
        EngineError::Internal(detail) => {
            tracing::error!("internal error: {detail}");
            "internal server error".to_string()
        }
        other => other.to_string(),
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> axum::response::Response {
        match self {
            // Field-scoped validation failures keep their per-field shape.
            ServerError::Engine(EngineError::Validation(field_errors)) => {
                let errors: serde_json::Map<String, serde_json::Value> = field_errors
                    .into_iter()
                    .map(|err| (err.field.to_string(), err.message.into()))
                    .collect();
                (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    Json(serde_json::json!({ "errors": errors })),
                )
                    .into_response()
            }
            ServerError::Engine(err) => {
                let status = status_for_engine_error(&err);
                let error = message_for_engine_error(err);
                (status, Json(Error { error })).into_response()
            }
            ServerError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                Json(Error {
                    error: "invalid credentials".to_string(),
                }),
            )
                .into_response(),
            ServerError::Generic(error) => {
                (StatusCode::BAD_REQUEST, Json(Error { error })).into_response()
            }
        }
    }
}

impl From<EngineError> for ServerError {
    fn from(value: EngineError) -> Self {
        Self::Engine(value)
    }
}
