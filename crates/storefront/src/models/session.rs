//! Session-related types.
//!
//! Values kept in the visitor session between requests.

use tower_sessions::Session;

use crate::components::ScrollMemory;

/// Session keys.
pub mod keys {
    /// Displayable message from the last rejected order mutation. Read once.
    pub const ACTIVE_ORDER_ERROR: &str = "active_order_error";

    /// The commerce backend's session token.
    pub const BACKEND_TOKEN: &str = "backend_token";

    /// Breadcrumb scroll state.
    pub const SCROLL_MEMORY: &str = "scroll_memory";
}

/// Store the message of a rejected order mutation for the next render.
///
/// # Errors
///
/// Returns an error if the session store fails.
pub async fn set_order_error(
    session: &Session,
    message: &str,
) -> Result<(), tower_sessions::session::Error> {
    session.insert(keys::ACTIVE_ORDER_ERROR, message).await
}

/// Take the pending order error, removing it from the session.
///
/// # Errors
///
/// Returns an error if the session store fails.
pub async fn take_order_error(
    session: &Session,
) -> Result<Option<String>, tower_sessions::session::Error> {
    session.remove::<String>(keys::ACTIVE_ORDER_ERROR).await
}

/// The backend session token stored for this visitor.
///
/// # Errors
///
/// Returns an error if the session store fails.
pub async fn backend_token(
    session: &Session,
) -> Result<Option<String>, tower_sessions::session::Error> {
    session.get::<String>(keys::BACKEND_TOKEN).await
}

/// Remember the backend session token for this visitor.
///
/// # Errors
///
/// Returns an error if the session store fails.
pub async fn set_backend_token(
    session: &Session,
    token: &str,
) -> Result<(), tower_sessions::session::Error> {
    session.insert(keys::BACKEND_TOKEN, token).await
}

/// The visitor's breadcrumb scroll state.
///
/// # Errors
///
/// Returns an error if the session store fails.
pub async fn scroll_memory(
    session: &Session,
) -> Result<ScrollMemory, tower_sessions::session::Error> {
    Ok(session
        .get::<ScrollMemory>(keys::SCROLL_MEMORY)
        .await?
        .unwrap_or_default())
}

/// Store the visitor's breadcrumb scroll state.
///
/// # Errors
///
/// Returns an error if the session store fails.
pub async fn set_scroll_memory(
    session: &Session,
    memory: &ScrollMemory,
) -> Result<(), tower_sessions::session::Error> {
    session.insert(keys::SCROLL_MEMORY, memory).await
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use tower_sessions::MemoryStore;

    use super::*;

    fn session() -> Session {
        Session::new(None, Arc::new(MemoryStore::default()), None)
    }

    #[tokio::test]
    async fn test_order_error_is_read_once() {
        let session = session();
        set_order_error(&session, "Out of stock").await.unwrap();

        assert_eq!(
            take_order_error(&session).await.unwrap().as_deref(),
            Some("Out of stock")
        );
        assert_eq!(take_order_error(&session).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_scroll_memory_defaults_and_persists() {
        let session = session();
        let mut memory = scroll_memory(&session).await.unwrap();
        assert_eq!(memory.restore("/checkout"), None);

        memory.save("/checkout", 64);
        set_scroll_memory(&session, &memory).await.unwrap();
        assert_eq!(
            scroll_memory(&session).await.unwrap().restore("/"),
            Some(64)
        );
    }

    #[tokio::test]
    async fn test_backend_token_round_trip() {
        let session = session();
        assert_eq!(backend_token(&session).await.unwrap(), None);

        set_backend_token(&session, "abc").await.unwrap();
        assert_eq!(backend_token(&session).await.unwrap().as_deref(), Some("abc"));
    }
}
