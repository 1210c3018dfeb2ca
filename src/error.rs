use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),

    #[error("Item {0} not found")]
    NotFound(i64),

    #[error("Schema initialization failed: {0}")]
    Schema(#[source] sqlx::Error),

    #[error("Query failed: {0}")]
    Query(#[source] sqlx::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::NotFound(_) => (StatusCode::NOT_FOUND, "Item not found".to_string()),
            AppError::Schema(_) | AppError::Query(_) => {
                // Log the real failure, never leak it to the client.
                error!("{self}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Failed to update item".to_string(),
                )
            }
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn validation_maps_to_400_with_message() {
        let response = AppError::Validation("bad payload".to_string()).into_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await, json!({ "error": "bad payload" }));
    }

    #[tokio::test]
    async fn not_found_maps_to_404() {
        let response = AppError::NotFound(7).into_response();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            body_json(response).await,
            json!({ "error": "Item not found" })
        );
    }

    #[tokio::test]
    async fn store_failures_hide_detail_behind_generic_500() {
        let response = AppError::Query(sqlx::Error::PoolClosed).into_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body_json(response).await,
            json!({ "error": "Failed to update item" })
        );
    }

    #[tokio::test]
    async fn schema_failures_also_return_generic_500() {
        let response = AppError::Schema(sqlx::Error::PoolTimedOut).into_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(response).await;
        assert_eq!(body, json!({ "error": "Failed to update item" }));
    }
}
