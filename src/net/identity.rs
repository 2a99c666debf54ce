//! Identity capability: the current session and its bearer token.
//!
//! DESIGN
//! ======
//! The identity provider is external; this module only defines the seam
//! ([`IdentityProvider`]) plus [`StaticSession`], which holds tokens handed
//! to the process at start-up. Sign-in itself happens elsewhere.
//!
//! ERROR HANDLING
//! ==============
//! [`acquire_token`] never propagates. Provider failures and missing
//! sessions are logged and become `None`, which the widget turns into its
//! error state.

use std::sync::Mutex;

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde_json::{Map, Value};

use crate::config::IdentityPool;

/// Claims tried in order when naming the signed-in user.
const USERNAME_CLAIMS: [&str; 3] = ["cognito:username", "username", "email"];

// =============================================================================
// TYPES
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum IdentityError {
    #[error("identity provider failed: {0}")]
    Provider(String),
}

/// Tokens issued for a signed-in user.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct SessionTokens {
    pub access_token: Option<String>,
    pub id_token: Option<String>,
}

impl std::fmt::Debug for SessionTokens {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionTokens")
            .field("access_token", &self.access_token.as_ref().map(|_| "<redacted>"))
            .field("id_token", &self.id_token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl SessionTokens {
    /// Returns `None` when neither token is present.
    #[must_use]
    pub fn from_parts(access_token: Option<String>, id_token: Option<String>) -> Option<Self> {
        if access_token.is_none() && id_token.is_none() {
            return None;
        }
        Some(Self { access_token, id_token })
    }

    /// User name carried in the identity token's claims.
    ///
    /// Claims are decoded without signature verification; the result is for
    /// display only.
    #[must_use]
    pub fn username(&self) -> Option<String> {
        let claims = decode_claims(self.id_token.as_deref()?)?;
        USERNAME_CLAIMS
            .iter()
            .find_map(|key| claims.get(*key).and_then(Value::as_str))
            .map(ToOwned::to_owned)
    }
}

/// Result of asking the provider for the current session.
#[derive(Debug, Clone, Default)]
pub struct AuthSession {
    /// `None` when nobody is signed in.
    pub tokens: Option<SessionTokens>,
}

// =============================================================================
// PROVIDER TRAIT
// =============================================================================

#[async_trait::async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Fetch the current session.
    ///
    /// # Errors
    ///
    /// Returns an [`IdentityError`] if the provider cannot be reached.
    async fn fetch_session(&self) -> Result<AuthSession, IdentityError>;

    /// End the current session.
    ///
    /// # Errors
    ///
    /// Returns an [`IdentityError`] if the provider rejects the sign-out.
    async fn sign_out(&self) -> Result<(), IdentityError>;
}

/// Session seeded with tokens obtained outside the process.
pub struct StaticSession {
    pool: IdentityPool,
    tokens: Mutex<Option<SessionTokens>>,
}

impl StaticSession {
    #[must_use]
    pub fn new(pool: IdentityPool, tokens: Option<SessionTokens>) -> Self {
        tracing::info!(
            user_pool_id = %pool.user_pool_id,
            region = pool.region().unwrap_or("unknown"),
            signed_in = tokens.is_some(),
            "identity session configured"
        );
        Self { pool, tokens: Mutex::new(tokens) }
    }

    #[must_use]
    pub fn pool(&self) -> &IdentityPool {
        &self.pool
    }
}

#[async_trait::async_trait]
impl IdentityProvider for StaticSession {
    async fn fetch_session(&self) -> Result<AuthSession, IdentityError> {
        let tokens = self
            .tokens
            .lock()
            .map_err(|e| IdentityError::Provider(e.to_string()))?
            .clone();
        Ok(AuthSession { tokens })
    }

    async fn sign_out(&self) -> Result<(), IdentityError> {
        self.tokens
            .lock()
            .map_err(|e| IdentityError::Provider(e.to_string()))?
            .take();
        tracing::info!(client_id = %self.pool.client_id, "signed out");
        Ok(())
    }
}

// =============================================================================
// TOKEN ACQUISITION
// =============================================================================

/// Identity token of the current session, or `None` on any failure.
///
/// Only the identity token is returned; an access token in the same session
/// is never forwarded.
pub async fn acquire_token(identity: &dyn IdentityProvider) -> Option<String> {
    let session = match identity.fetch_session().await {
        Ok(session) => session,
        Err(e) => {
            tracing::warn!(error = %e, "error fetching auth session");
            return None;
        }
    };

    let Some(tokens) = session.tokens else {
        tracing::warn!("no active session");
        return None;
    };
    tracing::debug!(
        has_access_token = tokens.access_token.is_some(),
        has_id_token = tokens.id_token.is_some(),
        "auth session fetched"
    );

    let token = tokens.id_token.filter(|token| !token.is_empty());
    if token.is_none() {
        tracing::warn!("session has no identity token");
    }
    token
}

fn decode_claims(token: &str) -> Option<Map<String, Value>> {
    let payload = token.split('.').nth(1)?;
    let bytes = URL_SAFE_NO_PAD.decode(payload.trim_end_matches('=')).ok()?;
    serde_json::from_slice(&bytes).ok()
}

#[cfg(test)]
#[path = "identity_test.rs"]
mod tests;
