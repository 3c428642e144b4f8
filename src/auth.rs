//! Credentials, endpoint and client identification.
//!
//! Token acquisition itself is pluggable through [`TokenProvider`]; this
//! crate ships a static bearer token and a simple token file. Anything more
//! involved (OAuth flows, metadata servers) is expected to implement the
//! trait.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;

use crate::errors::{Result, StitcherError};

pub const DEFAULT_HOST: &str = "videostitcher.googleapis.com";

pub const DEFAULT_SCOPES: &[&str] = &["https://www.googleapis.com/auth/cloud-platform"];

/// Environment variable consulted when no credentials are configured.
pub const ACCESS_TOKEN_ENV: &str = "VIDEO_STITCHER_ACCESS_TOKEN";

/// Produces bearer tokens for outgoing requests.
#[async_trait]
pub trait TokenProvider: Send + Sync + fmt::Debug {
    async fn token(&self, scopes: &[String]) -> Result<String>;

    /// Project billed for requests, if the credentials carry one.
    fn quota_project_id(&self) -> Option<&str> {
        None
    }
}

/// A fixed bearer token.
#[derive(Clone)]
pub struct StaticToken {
    token: String,
    quota_project_id: Option<String>,
}

impl StaticToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            quota_project_id: None,
        }
    }

    /// Load `{"access_token": "...", "quota_project_id": "..."}` from disk.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        #[derive(Deserialize)]
        struct TokenFile {
            access_token: String,
            #[serde(default)]
            quota_project_id: Option<String>,
        }

        let contents = std::fs::read_to_string(path.as_ref())?;
        let file: TokenFile = serde_json::from_str(&contents)?;
        if file.access_token.is_empty() {
            return Err(StitcherError::Authentication {
                message: format!("{} has an empty access_token", path.as_ref().display()),
            });
        }
        Ok(Self {
            token: file.access_token,
            quota_project_id: file.quota_project_id,
        })
    }
}

impl fmt::Debug for StaticToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StaticToken")
            .field("token", &"<redacted>")
            .field("quota_project_id", &self.quota_project_id)
            .finish()
    }
}

#[async_trait]
impl TokenProvider for StaticToken {
    async fn token(&self, _scopes: &[String]) -> Result<String> {
        Ok(self.token.clone())
    }

    fn quota_project_id(&self) -> Option<&str> {
        self.quota_project_id.as_deref()
    }
}

/// Credential options recognised by the client builder.
#[derive(Debug, Clone, Default)]
pub struct CredentialsConfig {
    /// Mutually exclusive with `credentials_file`.
    pub credentials: Option<Arc<dyn TokenProvider>>,
    /// Mutually exclusive with `credentials`.
    pub credentials_file: Option<PathBuf>,
    /// Replaces [`DEFAULT_SCOPES`].
    pub scopes: Option<Vec<String>>,
    /// Overrides the quota project carried by the credentials.
    pub quota_project_id: Option<String>,
    /// Defaults to the host.
    pub api_audience: Option<String>,
}

/// Credentials ready to be attached to requests.
#[derive(Debug, Clone)]
pub struct ResolvedCredentials {
    pub provider: Arc<dyn TokenProvider>,
    pub scopes: Vec<String>,
    pub quota_project_id: Option<String>,
    pub audience: String,
}

impl CredentialsConfig {
    /// Reject conflicting options without loading anything.
    pub fn validate(&self) -> Result<()> {
        if self.credentials.is_some() && self.credentials_file.is_some() {
            return Err(StitcherError::Config(
                "'credentials_file' and 'credentials' are mutually exclusive".into(),
            ));
        }
        Ok(())
    }

    /// Validate the options and pick a token source.
    ///
    /// Fails with [`StitcherError::Config`] when both explicit credentials
    /// and a credentials file are given, before touching the file or the
    /// network.
    pub fn resolve(self, host: &str) -> Result<ResolvedCredentials> {
        self.validate()?;
        let provider: Arc<dyn TokenProvider> = match (self.credentials, self.credentials_file) {
            (Some(credentials), _) => credentials,
            (None, Some(path)) => Arc::new(StaticToken::from_file(path)?),
            (None, None) => {
                let token = std::env::var(ACCESS_TOKEN_ENV).map_err(|_| {
                    StitcherError::Authentication {
                        message: format!(
                            "no credentials configured. Pass them to \
                             ClientBuilder::credentials() or set the {ACCESS_TOKEN_ENV} \
                             environment variable."
                        ),
                    }
                })?;
                Arc::new(StaticToken::new(token))
            }
        };

        let quota_project_id = self
            .quota_project_id
            .or_else(|| provider.quota_project_id().map(str::to_string));

        Ok(ResolvedCredentials {
            provider,
            scopes: self
                .scopes
                .unwrap_or_else(|| DEFAULT_SCOPES.iter().map(|s| s.to_string()).collect()),
            quota_project_id,
            audience: self.api_audience.unwrap_or_else(|| host.to_string()),
        })
    }
}

/// Normalise a host into a base URL.
///
/// `host` may be a bare hostname (`:443` is appended when no port is given
/// and `https` is assumed) or a full `http(s)://` URL, used as-is.
pub fn resolve_endpoint(host: &str) -> String {
    let host = host.trim_end_matches('/');
    if host.contains("://") {
        return host.to_string();
    }
    if host.contains(':') {
        format!("https://{host}")
    } else {
        format!("https://{host}:443")
    }
}

/// Identifies the library in request headers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientInfo {
    pub library_version: String,
    /// Appended to the `user-agent` header.
    pub user_agent: Option<String>,
}

impl ClientInfo {
    pub fn new() -> Self {
        Self {
            library_version: env!("CARGO_PKG_VERSION").to_string(),
            user_agent: None,
        }
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Value of the `x-goog-api-client` header.
    pub fn api_client_header(&self) -> String {
        format!("gl-rust gccl/{}", self.library_version)
    }

    pub fn user_agent_header(&self) -> String {
        let base = format!("video-stitcher-rust/{}", self.library_version);
        match &self.user_agent {
            Some(extra) => format!("{base} {extra}"),
            None => base,
        }
    }
}

impl Default for ClientInfo {
    fn default() -> Self {
        Self::new()
    }
}
