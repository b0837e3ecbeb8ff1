use std::fmt::Debug;

use error_stack::report;

use super::app_config::ConfigError;

pub const DEFAULT_API_KEY_VAR: &str = "BREVO_API_KEY_CLIENT_1";
pub const DEFAULT_CREDENTIALS_VAR: &str = "GOOGLE_CREDENTIALS_JSON";

/// Names of the environment variables holding the secrets.
#[derive(serde::Deserialize, Debug, Clone)]
#[serde(default)]
pub struct SecretsConfig {
    pub api_key_var: Box<str>,
    pub credentials_var: Box<str>,
}

impl Default for SecretsConfig {
    fn default() -> Self {
        Self {
            api_key_var: DEFAULT_API_KEY_VAR.into(),
            credentials_var: DEFAULT_CREDENTIALS_VAR.into(),
        }
    }
}

#[derive(Clone)]
pub struct Secrets {
    api_key: Box<str>,
    google_credentials_json: Option<Box<str>>,
}

impl Debug for Secrets {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Secrets")
            .field("api_key", &"<redacted>")
            .field(
                "google_credentials_json",
                &self.google_credentials_json.as_ref().map(|_| "<redacted>"),
            )
            .finish()
    }
}

impl Secrets {
    pub fn from_env(config: &SecretsConfig) -> error_stack::Result<Self, ConfigError> {
        Self::from_lookup(config, |name| std::env::var(name).ok())
    }

    /// Blank values count as missing. Only the API key is required.
    pub fn from_lookup<F>(config: &SecretsConfig, lookup: F) -> error_stack::Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let present = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let api_key = present(&config.api_key_var)
            .ok_or_else(|| report!(ConfigError::MissingApiKey(config.api_key_var.to_string())))?;

        Ok(Secrets {
            api_key: api_key.into(),
            google_credentials_json: present(&config.credentials_var).map(Into::into),
        })
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn google_credentials_json(&self) -> Option<&str> {
        self.google_credentials_json.as_deref()
    }
}
