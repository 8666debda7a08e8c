//! crates/catalog_core/src/ports.rs
//!
//! Defines the service contracts (traits) the console depends on.
//! These traits form the boundary of the hexagonal architecture, allowing the core
//! to stay independent of the REST API and of where the session cookie lives.

use async_trait::async_trait;

use crate::domain::{AuthToken, Credentials, Product, ProductPayload, RequestContext};

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations.
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    /// The server rejected the credentials or the token.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),
    /// The server answered with a non-success status and a message.
    #[error("{message} (status {status})")]
    Server { status: u16, message: String },
    /// The request never produced a response.
    #[error("Network error: {0}")]
    Transport(String),
    /// The response body did not have the expected shape.
    #[error("Unexpected response: {0}")]
    Decode(String),
    /// Local persistence (the cookie file) failed.
    #[error("Storage error: {0}")]
    Storage(String),
}

impl PortError {
    /// The text to show the user: the server's own message when there is one.
    pub fn user_message(&self) -> String {
        match self {
            PortError::Unauthorized(message) => message.clone(),
            PortError::Server { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

#[async_trait]
pub trait AuthService: Send + Sync {
    /// Exchanges credentials for a token.
    async fn sign_in(&self, credentials: &Credentials) -> PortResult<AuthToken>;

    /// Asks the server whether the context's token is still valid.
    async fn check(&self, ctx: &RequestContext) -> PortResult<()>;
}

#[async_trait]
pub trait ProductRepository: Send + Sync {
    async fn list(&self, ctx: &RequestContext) -> PortResult<Vec<Product>>;

    async fn create(&self, ctx: &RequestContext, payload: &ProductPayload) -> PortResult<()>;

    async fn update(
        &self,
        ctx: &RequestContext,
        id: &str,
        payload: &ProductPayload,
    ) -> PortResult<()>;

    async fn delete(&self, ctx: &RequestContext, id: &str) -> PortResult<()>;
}

/// Client-side persistence for the session token.
pub trait TokenStore: Send + Sync {
    /// Returns the stored token, or `None` when nothing usable is stored.
    fn load(&self) -> PortResult<Option<AuthToken>>;

    fn save(&self, token: &AuthToken) -> PortResult<()>;
}
