//! Error handling for the HTTP layer

use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use locallib_db::StoreError;
use maud::html;
use thiserror::Error;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::page::layout;

/// Request failures that end in an error page.
///
/// Form validation problems are not errors; they re-render the form.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("not found: {message}")]
    NotFound { message: String, code: String },

    #[error("bad request: {message}")]
    BadRequest { message: String, code: String },

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Create a not found error
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
            code: "not_found".to_string(),
        }
    }

    /// Create a bad request error
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest {
            message: message.into(),
            code: "bad_request".to_string(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            AppError::Store(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let error_id = Uuid::new_v4();
        let timestamp = OffsetDateTime::now_utc().to_string();
        let status = self.status();

        let (error_code, message) = match self {
            AppError::NotFound { message, code } => (code, message),
            AppError::BadRequest { message, code } => (code, message),
            AppError::Store(e) => ("store_failure".to_string(), e.to_string()),
            AppError::Internal(e) => ("internal_error".to_string(), format!("{e:#}")),
        };

        if status.is_server_error() {
            tracing::error!(
                error_id = %error_id,
                error_code = %error_code,
                status_code = %status.as_u16(),
                error = %message,
                "Request error"
            );
        } else {
            tracing::warn!(
                error_id = %error_id,
                error_code = %error_code,
                status_code = %status.as_u16(),
                "Request error"
            );
        }

        // Hide internal error details outside debug builds
        let message = if cfg!(not(debug_assertions)) && status.is_server_error() {
            "An internal server error occurred".to_string()
        } else {
            message
        };

        let body = html! {
            h2 { (status.as_u16()) }
            p class="error-message" { (message) }
            p class="error-meta" {
                "code: " (error_code) " · trace id: " (error_id.to_string()) " · " (timestamp)
            }
        };

        (status, Html(layout(html! { "Error" }, body).into_string())).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn body_text(response: Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[test]
    fn test_error_response_mapping() {
        let error = AppError::not_found("Book not found");
        let response = error.into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_store_error_mapping() {
        let error = AppError::from(StoreError::Unavailable("connection refused".to_string()));
        let response = error.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_internal_error_mapping() {
        let internal_error = anyhow::anyhow!("Snapshot write failed");
        let error = AppError::Internal(internal_error);
        assert_eq!(error.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_error_page_format() {
        let response = AppError::not_found("Author <unknown> not found").into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let html = body_text(response).await;
        assert!(html.contains("<title>Error</title>"));
        assert!(html.contains("Author &lt;unknown&gt; not found"));
        assert!(html.contains("code: not_found"));
        assert!(html.contains("trace id: "));
    }

    #[tokio::test]
    async fn test_bad_request_page() {
        let response = AppError::bad_request("Failed to deserialize form body").into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let html = body_text(response).await;
        assert!(html.contains("Failed to deserialize form body"));
    }
}
