//! services/console/src/adapters/cookie_jar.rs
//!
//! A file-backed cookie holding the session token. It implements the
//! `TokenStore` port from the `core` crate.

use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

use catalog_core::domain::AuthToken;
use catalog_core::ports::{PortError, PortResult, TokenStore};
use chrono::{DateTime, Utc};
use tracing::{debug, warn};

/// Name of the cookie the token is stored under.
pub const TOKEN_COOKIE: &str = "hexToken";

/// Stores the token as a single `hexToken=<token>;expires=<date>` line.
#[derive(Debug, Clone)]
pub struct CookieJar {
    path: PathBuf,
}

impl CookieJar {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl TokenStore for CookieJar {
    fn load(&self) -> PortResult<Option<AuthToken>> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                warn!(path = %self.path.display(), "Cookie file is unreadable: {}", e);
                return Ok(None);
            }
        };

        let Some(token) = parse_cookie(&raw) else {
            warn!(path = %self.path.display(), "Cookie file is malformed; ignoring it");
            return Ok(None);
        };

        if token.is_expired_at(Utc::now()) {
            debug!(expired_at = %token.expires_at, "Stored token has expired");
            return Ok(None);
        }
        Ok(Some(token))
    }

    fn save(&self, token: &AuthToken) -> PortResult<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| PortError::Storage(e.to_string()))?;
        }
        fs::write(&self.path, format_cookie(token))
            .map_err(|e| PortError::Storage(e.to_string()))?;
        debug!(path = %self.path.display(), "Session cookie saved");
        Ok(())
    }
}

fn format_cookie(token: &AuthToken) -> String {
    format!(
        "{}={};expires={};\n",
        TOKEN_COOKIE,
        token.token,
        token.expires_at.to_rfc2822()
    )
}

fn parse_cookie(raw: &str) -> Option<AuthToken> {
    let mut token = None;
    let mut expires_at = None;
    for part in raw.trim().split(';').map(str::trim) {
        if let Some(value) = part.strip_prefix(TOKEN_COOKIE).and_then(|v| v.strip_prefix('=')) {
            token = Some(value.to_string());
        } else if let Some(value) = part.strip_prefix("expires=") {
            expires_at = DateTime::parse_from_rfc2822(value)
                .ok()
                .map(|dt| dt.with_timezone(&Utc));
        }
    }
    Some(AuthToken {
        token: token.filter(|t| !t.is_empty())?,
        expires_at: expires_at?,
    })
}
