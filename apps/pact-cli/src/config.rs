// config.rs — CLI configuration: pact.toml plus environment overrides.
//
// The resolved values become an explicit Session passed into the HTTP
// client; nothing reads ambient global state after this point.

use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use pact_client::Session;

/// Contents of pact.toml.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PactConfig {
    /// Base URL of the agreements backend, e.g. `http://localhost:8000/api/`.
    pub base_url: Option<String>,

    /// Bearer token from sign-in.
    pub token: Option<String>,
}

impl PactConfig {
    /// Load from a TOML file. A missing file is not an error — everything
    /// can come from the environment or flags instead.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        toml::from_str(&raw).with_context(|| format!("parsing {}", path.display()))
    }

    /// Apply environment overrides (`PACT_BASE_URL`, `PACT_TOKEN`).
    pub fn with_env(mut self) -> Self {
        if let Ok(url) = std::env::var("PACT_BASE_URL") {
            self.base_url = Some(url);
        }
        if let Ok(token) = std::env::var("PACT_TOKEN") {
            self.token = Some(token);
        }
        self
    }

    /// Build the session, requiring a base URL from some source.
    pub fn session(&self) -> Result<Session> {
        let base_url = self
            .base_url
            .clone()
            .context("no base URL configured; set base_url in pact.toml or PACT_BASE_URL")?;
        let mut session = Session::new(base_url);
        if let Some(token) = &self.token {
            session = session.with_token(token.clone());
        }
        Ok(session)
    }
}
