//! Per-request context passed to every backend call.

use std::sync::{Arc, OnceLock};

/// The shopper's identity towards the commerce backend.
///
/// Carries the backend session token stored in the visitor's session (if
/// any) and the request id forwarded for log correlation. When the backend
/// issues a new token during the request, it is recorded here so the route
/// layer can persist it after its backend calls are done.
#[derive(Debug, Clone, Default)]
pub struct ShopContext {
    auth_token: Option<String>,
    request_id: Option<String>,
    issued_token: Arc<OnceLock<String>>,
}

impl ShopContext {
    /// Create a context from the stored backend token and the request id.
    #[must_use]
    pub fn new(auth_token: Option<String>, request_id: Option<String>) -> Self {
        Self {
            auth_token,
            request_id,
            issued_token: Arc::new(OnceLock::new()),
        }
    }

    /// Token to authenticate backend calls with.
    ///
    /// Prefers a token issued during this request over the stored one.
    #[must_use]
    pub fn auth_token(&self) -> Option<&str> {
        self.issued_token
            .get()
            .map(String::as_str)
            .or(self.auth_token.as_deref())
    }

    /// Request id forwarded to the backend.
    #[must_use]
    pub fn request_id(&self) -> Option<&str> {
        self.request_id.as_deref()
    }

    /// Record a token returned by the backend.
    ///
    /// Tokens equal to the stored one are ignored; only the first new token
    /// of a request is kept.
    pub fn record_issued_token(&self, token: &str) {
        if self.auth_token.as_deref() == Some(token) {
            return;
        }
        let _ = self.issued_token.set(token.to_string());
    }

    /// A token issued during this request that still needs persisting.
    #[must_use]
    pub fn issued_token(&self) -> Option<&str> {
        self.issued_token.get().map(String::as_str)
    }
}
