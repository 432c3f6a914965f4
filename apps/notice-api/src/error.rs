//! Error types for the notice API

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use notice_core::NoticeError;
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error(transparent)]
    Pipeline(#[from] NoticeError),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Pipeline(NoticeError::Input(_)) => StatusCode::BAD_REQUEST,
            ApiError::Pipeline(NoticeError::Schema(_)) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Pipeline(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!("Pipeline error: {}", self);
            "Internal error".to_string()
        } else {
            self.to_string()
        };

        let body = Json(json!({
            "error": message,
            "status": status.as_u16(),
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_inputs_map_to_bad_request() {
        let err = ApiError::Pipeline(NoticeError::Input("due_date".into()));
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn schema_errors_map_to_unprocessable_entity() {
        let err = ApiError::Pipeline(NoticeError::Schema("missing county".into()));
        assert_eq!(err.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn pipeline_failures_map_to_internal_error() {
        let err = ApiError::Pipeline(NoticeError::Fill("template gone".into()));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let err = ApiError::Pipeline(NoticeError::Flatten("bad pdf".into()));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let err = ApiError::Pipeline(NoticeError::Archive("unreadable".into()));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn bad_uploads_map_to_bad_request() {
        let err = ApiError::InvalidRequest("Invalid CSV base64".into());
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }
}
