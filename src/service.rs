//! Remote service endpoints and liveness probe.

use serde::Deserialize;
use url::Url;

use crate::config::ServiceConfig;

/// Resolved URLs of the remote service.
#[derive(Debug, Clone)]
pub struct ServiceEndpoints {
    /// `POST` generation endpoint.
    pub generate: Url,
    /// `POST` login endpoint.
    pub login: Url,
    /// `POST` registration endpoint.
    pub register: Url,
    /// `GET` liveness endpoint.
    pub health: Url,
}

impl ServiceEndpoints {
    /// Resolve every endpoint against the configured base URL.
    ///
    /// Paths are appended to the base path, so a base of
    /// `http://host/api` yields `http://host/api/generate`.
    pub fn from_config(config: &ServiceConfig) -> Result<Self, url::ParseError> {
        let base = config.base_url.trim_end_matches('/');
        let join = |path: &str| Url::parse(&format!("{base}/{}", path.trim_start_matches('/')));

        Ok(Self {
            generate: join(&config.generate_path)?,
            login: join(&config.login_path)?,
            register: join(&config.register_path)?,
            health: join(&config.health_path)?,
        })
    }
}

/// Body of the liveness endpoint.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct Health {
    /// `"ok"` when the service is up.
    pub status: String,
}

/// Probe the service's liveness endpoint.
pub async fn check_health(http: &reqwest::Client, url: &Url) -> reqwest::Result<Health> {
    http.get(url.clone())
        .send()
        .await?
        .error_for_status()?
        .json()
        .await
}
