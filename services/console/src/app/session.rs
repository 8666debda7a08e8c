//! services/console/src/app/session.rs
//!
//! Session lifecycle: restoring the stored token at startup and signing in.

use catalog_core::domain::{Credentials, RequestContext};
use tracing::{info, warn};

use crate::app::state::{Console, SessionStatus};
use crate::error::ConsoleError;

impl Console {
    /// Restores the session from the stored cookie, if there is one.
    ///
    /// A stored token is verified with the server once. On success the
    /// session is authenticated and the product list is fetched; on failure
    /// the session stays unauthenticated and the user is asked to sign in.
    pub async fn init(&mut self) {
        let stored = match self.services.tokens.load() {
            Ok(stored) => stored,
            Err(e) => {
                warn!("Could not read the stored session: {}", e);
                None
            }
        };

        let Some(token) = stored else {
            info!("No stored session; waiting for sign-in");
            self.state.session = SessionStatus::Unauthenticated;
            return;
        };

        self.ctx = RequestContext::with_token(token.token);
        match self.services.auth.check(&self.ctx).await {
            Ok(()) => {
                info!("Stored session is valid");
                self.state.session = SessionStatus::Authenticated;
                self.load_products_or_report().await;
            }
            Err(e) => {
                warn!("Stored session was rejected: {}", e.user_message());
                self.state.session = SessionStatus::Unauthenticated;
            }
        }
    }

    /// Posts the credentials; on success persists the token and loads the
    /// product list. A failed load is reported separately and does not undo
    /// the sign-in.
    pub async fn sign_in(&mut self, credentials: Credentials) -> Result<(), ConsoleError> {
        let token = match self.services.auth.sign_in(&credentials).await {
            Ok(token) => token,
            Err(e) => {
                self.state.session = SessionStatus::Unauthenticated;
                return Err(e.into());
            }
        };
        info!(username = %credentials.username, expires_at = %token.expires_at, "Signed in");

        if let Err(e) = self.services.tokens.save(&token) {
            warn!("Signed in, but the session cookie was not saved: {}", e);
        }
        self.ctx = RequestContext::with_token(token.token);
        self.state.session = SessionStatus::Authenticated;
        self.load_products_or_report().await;
        Ok(())
    }
}
