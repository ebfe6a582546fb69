//! Unified error handling with Sentry integration.
//!
//! Route handlers return `Result<T, AppError>`. Server-side failures are
//! captured to Sentry before the error page is rendered; details of backend
//! failures are never shown to the shopper.

use askama::Template;
use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use thiserror::Error;

use crate::commerce::{CommerceError, CommerceErrorKind};

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// The commerce backend could not be reached in time.
    #[error("Backend unavailable: {0}")]
    BackendUnavailable(CommerceError),

    /// The commerce backend answered with an error.
    #[error("Backend error: {0}")]
    BackendError(CommerceError),

    /// The request has no usable visitor session.
    #[error("Session missing")]
    SessionMissing,

    /// The session store failed.
    #[error("Session error: {0}")]
    Session(#[from] tower_sessions::session::Error),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),
}

impl From<CommerceError> for AppError {
    fn from(err: CommerceError) -> Self {
        match err.kind() {
            CommerceErrorKind::BackendUnavailable => Self::BackendUnavailable(err),
            CommerceErrorKind::BackendError => Self::BackendError(err),
        }
    }
}

impl AppError {
    /// HTTP status for this error.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::BackendUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::BackendError(_) => StatusCode::BAD_GATEWAY,
            Self::SessionMissing => StatusCode::UNAUTHORIZED,
            Self::Session(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
        }
    }

    /// Message shown to the shopper.
    fn public_message(&self) -> String {
        match self {
            Self::BackendUnavailable(_) => {
                "The shop is temporarily unavailable. Please try again in a moment.".to_string()
            }
            Self::BackendError(_) => "Something went wrong while loading your order.".to_string(),
            Self::SessionMissing => "Your session has expired. Please reload the page.".to_string(),
            Self::Session(_) => "Internal server error".to_string(),
            Self::BadRequest(_) => self.to_string(),
        }
    }
}

/// Generic error page.
#[derive(Template)]
#[template(path = "error.html")]
pub struct ErrorTemplate {
    pub status: u16,
    pub message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        if status.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        } else {
            tracing::debug!(error = %self, "Request rejected");
        }

        let message = self.public_message();
        let page = ErrorTemplate {
            status: status.as_u16(),
            message,
        };
        match page.render() {
            Ok(html) => (status, Html(html)).into_response(),
            Err(_) => (status, page.message).into_response(),
        }
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Add a breadcrumb for shopper actions.
///
/// Breadcrumbs appear in Sentry error reports to show the trail of actions
/// leading up to an error.
pub fn add_breadcrumb(category: &str, message: &str, data: Option<&[(&str, &str)]>) {
    let mut breadcrumb = sentry::Breadcrumb {
        category: Some(category.to_string()),
        message: Some(message.to_string()),
        level: sentry::Level::Info,
        ..Default::default()
    };

    if let Some(pairs) = data {
        for (key, value) in pairs {
            breadcrumb.data.insert(
                (*key).to_string(),
                serde_json::Value::String((*value).to_string()),
            );
        }
    }

    sentry::add_breadcrumb(breadcrumb);
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn status_of(err: AppError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn test_commerce_errors_map_by_kind() {
        let unavailable = AppError::from(CommerceError::Unavailable("timeout".to_string()));
        assert!(matches!(unavailable, AppError::BackendUnavailable(_)));

        let backend = AppError::from(CommerceError::Status {
            status: 500,
            body: String::new(),
        });
        assert!(matches!(backend, AppError::BackendError(_)));
    }

    #[test]
    fn test_app_error_status_codes() {
        assert_eq!(
            status_of(AppError::BackendUnavailable(CommerceError::Unavailable(
                String::new()
            ))),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            status_of(AppError::BackendError(CommerceError::GraphQL(Vec::new()))),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(status_of(AppError::SessionMissing), StatusCode::UNAUTHORIZED);
        assert_eq!(
            status_of(AppError::BadRequest("quantity".to_string())),
            StatusCode::BAD_REQUEST
        );
    }

    #[tokio::test]
    async fn test_session_store_failure_is_generic_500() {
        let err = AppError::from(tower_sessions::session::Error::Store(
            tower_sessions::session_store::Error::Backend("connection reset".to_string()),
        ));
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = String::from_utf8(body.to_vec()).unwrap();
        assert!(body.contains("Internal server error"));
        assert!(!body.contains("connection reset"));
    }

    #[tokio::test]
    async fn test_backend_details_are_not_exposed() {
        let response = AppError::BackendError(CommerceError::Status {
            status: 500,
            body: "stack trace with secrets".to_string(),
        })
        .into_response();

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = String::from_utf8(body.to_vec()).unwrap();
        assert!(!body.contains("secrets"));
        assert!(body.contains("502"));
    }
}
