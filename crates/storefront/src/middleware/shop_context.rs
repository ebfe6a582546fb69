//! Shopper extractor.
//!
//! Resolves the visitor session and the commerce backend identity kept in
//! it into a [`ShopContext`] for backend calls.

use axum::{extract::FromRequestParts, http::request::Parts};
use tower_sessions::Session;

use super::request_id::RequestId;
use crate::commerce::ShopContext;
use crate::error::AppError;
use crate::models::session::{backend_token, set_backend_token};

/// The current shopper: visitor session plus backend context.
///
/// Handlers call [`Shopper::persist`] once their backend calls are done so a
/// token issued by the backend is kept for the next request.
///
/// # Example
///
/// ```rust,ignore
/// async fn handler(State(state): State<AppState>, shopper: Shopper) -> Result<Response> {
///     let order = state.active_orders().refresh(state.commerce(), &shopper.context).await?;
///     shopper.persist().await?;
///     // ...
/// }
/// ```
pub struct Shopper {
    pub session: Session,
    pub context: ShopContext,
}

impl Shopper {
    /// Store a backend token issued during this request.
    ///
    /// # Errors
    ///
    /// Returns an error if the session store fails.
    pub async fn persist(&self) -> Result<(), AppError> {
        if let Some(token) = self.context.issued_token() {
            tracing::debug!("Backend issued a new session token");
            set_backend_token(&self.session, token).await?;
        }
        Ok(())
    }
}

impl<S> FromRequestParts<S> for Shopper
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let session = parts
            .extensions
            .get::<Session>()
            .cloned()
            .ok_or(AppError::SessionMissing)?;

        let token = backend_token(&session).await?;
        let request_id = parts
            .extensions
            .get::<RequestId>()
            .map(|RequestId(id)| id.clone());

        Ok(Self {
            session,
            context: ShopContext::new(token, request_id),
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use axum::http::Request;
    use tower_sessions::MemoryStore;

    use super::*;

    #[tokio::test]
    async fn test_without_session_layer_is_rejected() {
        let (mut parts, ()) = Request::new(()).into_parts();
        let result = Shopper::from_request_parts(&mut parts, &()).await;
        assert!(matches!(result, Err(AppError::SessionMissing)));
    }

    #[tokio::test]
    async fn test_context_carries_stored_token_and_request_id() {
        let session = Session::new(None, Arc::new(MemoryStore::default()), None);
        set_backend_token(&session, "tok-1").await.unwrap();

        let (mut parts, ()) = Request::new(()).into_parts();
        parts.extensions.insert(session);
        parts.extensions.insert(RequestId("req-1".to_string()));

        let shopper = Shopper::from_request_parts(&mut parts, &()).await.unwrap();
        assert_eq!(shopper.context.auth_token(), Some("tok-1"));
        assert_eq!(shopper.context.request_id(), Some("req-1"));
    }

    #[tokio::test]
    async fn test_persist_stores_issued_token() {
        let session = Session::new(None, Arc::new(MemoryStore::default()), None);
        let shopper = Shopper {
            session: session.clone(),
            context: ShopContext::default(),
        };
        shopper.context.record_issued_token("fresh");

        shopper.persist().await.unwrap();
        assert_eq!(
            backend_token(&session).await.unwrap().as_deref(),
            Some("fresh")
        );
    }
}
