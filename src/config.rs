//! Flow configuration: endpoint paths and navigation targets.

use anyhow::{anyhow, Result};

const DEFAULT_REGISTER_PATH: &str = "/webauthn/register";
const DEFAULT_LOGIN_PATH: &str = "/webauthn/login";
const DEFAULT_DASHBOARD_PATH: &str = "/dashboard";

/// Paths the flow controller touches on the relying party.
///
/// Registration and login each use one path for both the options `GET` and
/// the verification `POST`. The dashboard path is where a verified
/// authentication navigates to.
#[derive(Debug, Clone)]
pub struct FlowConfig {
    register_path: String,
    login_path: String,
    dashboard_path: String,
}

impl Default for FlowConfig {
    fn default() -> Self {
        Self {
            register_path: DEFAULT_REGISTER_PATH.to_string(),
            login_path: DEFAULT_LOGIN_PATH.to_string(),
            dashboard_path: DEFAULT_DASHBOARD_PATH.to_string(),
        }
    }
}

impl FlowConfig {
    /// Create a configuration with explicit paths.
    ///
    /// # Errors
    /// Returns error if any path is empty or not absolute.
    pub fn new(
        register_path: impl Into<String>,
        login_path: impl Into<String>,
        dashboard_path: impl Into<String>,
    ) -> Result<Self> {
        let register_path = validate_path(register_path.into())?;
        let login_path = validate_path(login_path.into())?;
        let dashboard_path = validate_path(dashboard_path.into())?;

        Ok(Self {
            register_path,
            login_path,
            dashboard_path,
        })
    }

    /// # Errors
    /// Returns error if the path is empty or not absolute.
    pub fn with_register_path(mut self, path: impl Into<String>) -> Result<Self> {
        self.register_path = validate_path(path.into())?;
        Ok(self)
    }

    /// # Errors
    /// Returns error if the path is empty or not absolute.
    pub fn with_login_path(mut self, path: impl Into<String>) -> Result<Self> {
        self.login_path = validate_path(path.into())?;
        Ok(self)
    }

    /// # Errors
    /// Returns error if the path is empty or not absolute.
    pub fn with_dashboard_path(mut self, path: impl Into<String>) -> Result<Self> {
        self.dashboard_path = validate_path(path.into())?;
        Ok(self)
    }

    #[must_use]
    pub fn register_path(&self) -> &str {
        &self.register_path
    }

    #[must_use]
    pub fn login_path(&self) -> &str {
        &self.login_path
    }

    #[must_use]
    pub fn dashboard_path(&self) -> &str {
        &self.dashboard_path
    }
}

fn validate_path(path: String) -> Result<String> {
    let path = path.trim().to_string();
    if path.is_empty() {
        return Err(anyhow!("Flow path must not be empty"));
    }
    if !path.starts_with('/') {
        return Err(anyhow!("Flow path must be absolute: {path}"));
    }
    Ok(path)
}
