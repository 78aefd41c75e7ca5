//! Mapping of domain failures onto HTTP responses

use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::Json;
use tracing::error;

use super::types::ApiResponse;
use crate::RagChatError;

/// Handler result carrying the standard response envelope
pub type ApiResult<T> = Result<Json<ApiResponse<T>>, ApiError>;

/// Wrapper making domain errors usable as axum responses
#[derive(Debug)]
pub struct ApiError(pub RagChatError);

impl From<RagChatError> for ApiError {
    fn from(err: RagChatError) -> Self {
        Self(err)
    }
}

/// Pipeline failures are judged by the stage error they carry
fn status_for(err: &RagChatError) -> StatusCode {
    match err {
        RagChatError::UserNotFound(_) | RagChatError::SessionNotFound(_) => StatusCode::NOT_FOUND,
        RagChatError::InvalidCredentials | RagChatError::InvalidToken => StatusCode::UNAUTHORIZED,
        RagChatError::UsernameTaken(_) | RagChatError::EmailTaken(_) => StatusCode::BAD_REQUEST,
        RagChatError::InvalidInput(_) => StatusCode::UNPROCESSABLE_ENTITY,
        RagChatError::RateLimited(_)
        | RagChatError::Embedding(_)
        | RagChatError::Generation(_)
        | RagChatError::Http(_) => StatusCode::BAD_GATEWAY,
        RagChatError::Pipeline { source, .. } => status_for(source),
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = status_for(&self.0);

        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            error!("Internal error: {}", self.0);
            "Internal server error".to_string()
        } else {
            if status.is_server_error() {
                error!("Upstream error: {}", self.0);
            }
            self.0.to_string()
        };

        (status, Json(ApiResponse::<()>::error(message))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use super::*;
    use crate::errors::PipelineStage;

    #[test]
    fn test_not_found_mapping() {
        let id = Uuid::new_v4();
        assert_eq!(
            status_for(&RagChatError::SessionNotFound(id)),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_for(&RagChatError::UserNotFound(id)),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn test_auth_mapping() {
        assert_eq!(
            status_for(&RagChatError::InvalidCredentials),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            status_for(&RagChatError::InvalidToken),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            status_for(&RagChatError::UsernameTaken("alice".to_string())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_for(&RagChatError::EmailTaken("alice@example.com".to_string())),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_upstream_mapping() {
        assert_eq!(
            status_for(&RagChatError::Embedding("down".to_string())),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            status_for(&RagChatError::RateLimited("429".to_string())),
            StatusCode::BAD_GATEWAY
        );
    }

    #[test]
    fn test_pipeline_error_maps_by_source() {
        let err = RagChatError::in_stage(
            PipelineStage::Generate,
            RagChatError::Generation("empty completion".to_string()),
        );
        assert_eq!(status_for(&err), StatusCode::BAD_GATEWAY);

        let err = RagChatError::in_stage(
            PipelineStage::Persist,
            RagChatError::Database(sqlx::Error::PoolClosed),
        );
        assert_eq!(status_for(&err), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
