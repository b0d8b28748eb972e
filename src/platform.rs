//! Platform environment discovery.
//!
//! # Responsibilities
//! - Read the Cloud Foundry `VCAP_APPLICATION` document
//! - Expose the routes the running application is reachable on
//! - Derive the dashboard URL returned on provisioning
//!
//! # Design Decisions
//! - Discovery runs once at startup; any failure is fatal
//! - `application_uris` wins over the legacy `uris` field

use serde::Deserialize;
use url::Url;

/// Environment variable holding the application document.
pub const VCAP_APPLICATION: &str = "VCAP_APPLICATION";

/// Path appended to the application route to form the dashboard URL.
pub const DASHBOARD_PATH: &str = "/dashboard";

/// Error type for platform discovery.
#[derive(Debug, thiserror::Error)]
pub enum PlatformError {
    #[error("{0} is not set; not running on a Cloud Foundry platform")]
    Missing(&'static str),

    #[error("failed to parse VCAP_APPLICATION: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("application has no routes; cannot build a dashboard URL")]
    NoRoutes,

    #[error("invalid dashboard URL for route {route:?}: {source}")]
    InvalidRoute {
        route: String,
        source: url::ParseError,
    },
}

/// The subset of `VCAP_APPLICATION` this broker uses.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppEnv {
    #[serde(default, rename = "application_id")]
    pub id: String,

    #[serde(default, rename = "application_name")]
    pub name: String,

    #[serde(default)]
    pub instance_id: String,

    #[serde(default)]
    pub space_name: String,

    #[serde(default)]
    pub application_uris: Vec<String>,

    #[serde(default)]
    uris: Vec<String>,
}

impl AppEnv {
    /// Discover the application environment from the process environment.
    pub fn current() -> Result<Self, PlatformError> {
        let raw =
            std::env::var(VCAP_APPLICATION).map_err(|_| PlatformError::Missing(VCAP_APPLICATION))?;
        Self::from_json(&raw)
    }

    /// Parse a `VCAP_APPLICATION` document.
    pub fn from_json(raw: &str) -> Result<Self, PlatformError> {
        let mut env: AppEnv = serde_json::from_str(raw)?;
        if env.application_uris.is_empty() {
            env.application_uris = std::mem::take(&mut env.uris);
        }
        Ok(env)
    }

    /// Build an environment for an application reachable on `routes`.
    pub fn with_routes<I, S>(routes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            application_uris: routes.into_iter().map(Into::into).collect(),
            ..Default::default()
        }
    }

    /// URL of the dashboard, served from the first public route.
    pub fn dashboard_url(&self) -> Result<Url, PlatformError> {
        let route = self.application_uris.first().ok_or(PlatformError::NoRoutes)?;
        Url::parse(&format!("https://{route}{DASHBOARD_PATH}")).map_err(|source| {
            PlatformError::InvalidRoute {
                route: route.clone(),
                source,
            }
        })
    }
}
