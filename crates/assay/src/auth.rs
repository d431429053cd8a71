//! Caller identity resolution.
//!
//! Token verification belongs to an external identity provider. The
//! analysis core only ever sees the resolved [`Identity`].

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Placeholder shown when an identity carries no email.
pub const UNKNOWN_USER: &str = "Unknown";

/// A verified caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub uid: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl Identity {
    pub fn new(uid: impl Into<String>) -> Self {
        Self {
            uid: uid.into(),
            email: None,
            name: None,
        }
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Label used in reports: the email, or [`UNKNOWN_USER`].
    pub fn display_email(&self) -> &str {
        self.email.as_deref().unwrap_or(UNKNOWN_USER)
    }
}

/// Why a bearer token was refused. Callers treat every variant as
/// unauthenticated.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("Token has been revoked. Please log in again.")]
    TokenRevoked,

    #[error("Token has expired.")]
    TokenExpired,

    #[error("Invalid authentication credentials: {0}")]
    TokenInvalid(String),
}

/// Resolves bearer tokens to identities.
#[async_trait]
pub trait Authenticator: Send + Sync {
    async fn authenticate(&self, token: &str) -> Result<Identity, AuthError>;
}

#[derive(Debug, Clone)]
struct TokenEntry {
    identity: Identity,
    revoked: bool,
    expires_at: Option<DateTime<Utc>>,
}

/// Authenticator backed by a fixed token table.
///
/// Suited to development and tests; production deployments plug in an
/// identity provider behind [`Authenticator`].
#[derive(Debug, Clone, Default)]
pub struct StaticTokenAuthenticator {
    tokens: HashMap<String, TokenEntry>,
}

impl StaticTokenAuthenticator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a comma-separated table of `token=uid[:email[:name]]` entries.
    pub fn from_token_list(list: &str) -> Result<Self, AuthError> {
        let mut auth = Self::new();

        for entry in list.split(',').map(str::trim).filter(|e| !e.is_empty()) {
            let (token, who) = entry
                .split_once('=')
                .ok_or_else(|| AuthError::TokenInvalid(format!("malformed token entry '{}'", entry)))?;

            let mut parts = who.splitn(3, ':');
            let uid = parts.next().unwrap_or_default().trim();
            if token.trim().is_empty() || uid.is_empty() {
                return Err(AuthError::TokenInvalid(format!(
                    "token entry '{}' needs a token and a uid",
                    entry
                )));
            }

            let mut identity = Identity::new(uid);
            if let Some(email) = parts.next().map(str::trim).filter(|s| !s.is_empty()) {
                identity = identity.with_email(email);
            }
            if let Some(name) = parts.next().map(str::trim).filter(|s| !s.is_empty()) {
                identity = identity.with_name(name);
            }

            auth = auth.with_token(token.trim(), identity);
        }

        Ok(auth)
    }

    /// Register a token.
    pub fn with_token(mut self, token: impl Into<String>, identity: Identity) -> Self {
        self.tokens.insert(
            token.into(),
            TokenEntry {
                identity,
                revoked: false,
                expires_at: None,
            },
        );
        self
    }

    /// Mark a registered token as revoked.
    pub fn revoke(mut self, token: &str) -> Self {
        if let Some(entry) = self.tokens.get_mut(token) {
            entry.revoked = true;
        }
        self
    }

    /// Give a registered token an expiry time.
    pub fn expire_at(mut self, token: &str, at: DateTime<Utc>) -> Self {
        if let Some(entry) = self.tokens.get_mut(token) {
            entry.expires_at = Some(at);
        }
        self
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

#[async_trait]
impl Authenticator for StaticTokenAuthenticator {
    async fn authenticate(&self, token: &str) -> Result<Identity, AuthError> {
        let entry = self
            .tokens
            .get(token)
            .ok_or_else(|| AuthError::TokenInvalid("unknown token".to_string()))?;

        if entry.revoked {
            return Err(AuthError::TokenRevoked);
        }
        if entry.expires_at.is_some_and(|at| at <= Utc::now()) {
            return Err(AuthError::TokenExpired);
        }

        Ok(entry.identity.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[tokio::test]
    async fn test_from_token_list() {
        let auth = StaticTokenAuthenticator::from_token_list(
            "abc=u1:ada@example.com:Ada, xyz=u2, ,k=u3::Kay",
        )
        .unwrap();
        assert_eq!(auth.len(), 3);

        let ada = auth.authenticate("abc").await.unwrap();
        assert_eq!(ada.uid, "u1");
        assert_eq!(ada.display_email(), "ada@example.com");
        assert_eq!(ada.name.as_deref(), Some("Ada"));

        let anon = auth.authenticate("xyz").await.unwrap();
        assert_eq!(anon.display_email(), UNKNOWN_USER);

        let kay = auth.authenticate("k").await.unwrap();
        assert_eq!(kay.email, None);
        assert_eq!(kay.name.as_deref(), Some("Kay"));
    }

    #[test]
    fn test_malformed_token_list() {
        assert!(StaticTokenAuthenticator::from_token_list("no-equals-sign").is_err());
        assert!(StaticTokenAuthenticator::from_token_list("tok=").is_err());
        assert!(StaticTokenAuthenticator::from_token_list("").unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unknown_token() {
        let auth = StaticTokenAuthenticator::new();
        assert!(matches!(
            auth.authenticate("nope").await,
            Err(AuthError::TokenInvalid(_))
        ));
    }

    #[tokio::test]
    async fn test_revoked_and_expired() {
        let auth = StaticTokenAuthenticator::new()
            .with_token("r", Identity::new("u1"))
            .with_token("e", Identity::new("u2"))
            .with_token("f", Identity::new("u3"))
            .revoke("r")
            .expire_at("e", Utc::now() - Duration::minutes(1))
            .expire_at("f", Utc::now() + Duration::hours(1));

        assert_eq!(auth.authenticate("r").await, Err(AuthError::TokenRevoked));
        assert_eq!(auth.authenticate("e").await, Err(AuthError::TokenExpired));
        assert!(auth.authenticate("f").await.is_ok());
    }
}
