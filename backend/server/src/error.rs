use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use sheets::FetchError;
use thiserror::Error;
use tracing::error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Fetch(#[from] FetchError),
}

#[derive(Serialize)]
pub struct ErrorBody {
    pub error: String,
    pub kind: &'static str,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, kind) = match &self {
            AppError::Fetch(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.kind()),
        };

        error!(kind, "Request failed: {self}");

        let body = ErrorBody {
            error: self.to_string(),
            kind,
        };

        (status, Json(body)).into_response()
    }
}
