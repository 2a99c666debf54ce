//! Widget configuration parsed from environment variables.
//!
//! DESIGN
//! ======
//! Resolution is all-or-nothing: either every required value is present and
//! a complete [`WidgetConfig`] comes back, or a [`ConfigError`] names the
//! first missing value. Callers never see a partially-populated config.

use url::Url;

pub const API_URL_VAR: &str = "API_URL";
pub const USER_POOL_ID_VAR: &str = "COGNITO_USER_POOL_ID";
pub const USER_POOL_CLIENT_ID_VAR: &str = "COGNITO_USER_POOL_CLIENT_ID";
pub const AUTH_MODE_VAR: &str = "CHAT_AUTH_MODE";

/// Path segment joined onto the API base to reach the chat endpoint.
pub const CHAT_PATH: &str = "chat";

// =============================================================================
// ERROR
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// A required environment variable is unset or empty.
    #[error("required environment variable {var} is not defined")]
    MissingVar { var: &'static str },

    /// The API base location is not an absolute http(s) URL.
    #[error("invalid {var} '{value}': {reason}")]
    InvalidUrl {
        var: &'static str,
        value: String,
        reason: String,
    },

    #[error("unknown CHAT_AUTH_MODE: {0} (expected 'cognito' or 'none')")]
    UnknownAuthMode(String),
}

// =============================================================================
// TYPES
// =============================================================================

/// Identifiers of the user pool that issues identity tokens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityPool {
    pub user_pool_id: String,
    pub client_id: String,
}

impl IdentityPool {
    /// Region prefix of the pool id (`us-east-1_AbCd` → `us-east-1`).
    #[must_use]
    pub fn region(&self) -> Option<&str> {
        self.user_pool_id
            .split_once('_')
            .map(|(region, _)| region)
            .filter(|region| !region.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthConfig {
    /// Requests carry the pool's identity token as a bearer credential.
    IdentityPool(IdentityPool),
    /// Requests go out without an `Authorization` header.
    Anonymous,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WidgetConfig {
    pub api_url: Url,
    pub chat_endpoint: Url,
    pub auth: AuthConfig,
}

impl WidgetConfig {
    /// Build typed widget config from environment variables.
    ///
    /// Required:
    /// - `API_URL`: base location of the chat service
    /// - `COGNITO_USER_POOL_ID`, `COGNITO_USER_POOL_CLIENT_ID` (cognito mode)
    ///
    /// Optional:
    /// - `CHAT_AUTH_MODE`: `cognito` (default) or `none`
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] naming the first missing or invalid value.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build config from an arbitrary key lookup. Empty values count as unset.
    ///
    /// # Errors
    ///
    /// Same as [`WidgetConfig::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |var: &'static str| {
            lookup(var)
                .filter(|value| !value.trim().is_empty())
                .ok_or(ConfigError::MissingVar { var })
        };

        let anonymous = parse_auth_mode(lookup(AUTH_MODE_VAR).as_deref())?;
        let raw_url = read(API_URL_VAR)?;
        let auth = if anonymous {
            AuthConfig::Anonymous
        } else {
            AuthConfig::IdentityPool(IdentityPool {
                user_pool_id: read(USER_POOL_ID_VAR)?,
                client_id: read(USER_POOL_CLIENT_ID_VAR)?,
            })
        };

        let api_url = parse_base_url(&raw_url)?;
        let chat_endpoint = chat_endpoint(&api_url)?;
        Ok(Self { api_url, chat_endpoint, auth })
    }
}

/// Resolve the chat endpoint relative to the API base.
///
/// Follows URL reference resolution, so a base without a trailing slash has
/// its last path segment replaced: `https://h/api/` → `https://h/api/chat`,
/// `https://h/api` → `https://h/chat`.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidUrl`] if the base cannot take a relative path.
pub fn chat_endpoint(base: &Url) -> Result<Url, ConfigError> {
    base.join(CHAT_PATH).map_err(|e| ConfigError::InvalidUrl {
        var: API_URL_VAR,
        value: base.to_string(),
        reason: e.to_string(),
    })
}

fn parse_base_url(raw: &str) -> Result<Url, ConfigError> {
    let invalid = |reason: String| ConfigError::InvalidUrl {
        var: API_URL_VAR,
        value: raw.to_owned(),
        reason,
    };
    let url = Url::parse(raw.trim()).map_err(|e| invalid(e.to_string()))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(invalid(format!("unsupported scheme '{other}'"))),
    }
}

/// Returns `true` for the anonymous mode.
fn parse_auth_mode(raw: Option<&str>) -> Result<bool, ConfigError> {
    match raw.map(str::trim).filter(|mode| !mode.is_empty()).unwrap_or("cognito") {
        "cognito" => Ok(false),
        "none" => Ok(true),
        other => Err(ConfigError::UnknownAuthMode(other.to_owned())),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
