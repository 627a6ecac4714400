//! Secure handling of API credentials.
//!
//! News backends and LLM providers all authenticate with bearer-style keys.
//! Keys are wrapped so they cannot leak through `Debug` output or logs and
//! are zeroed on drop; the raw value is only reachable through an explicit
//! [`ApiCredential::expose`] at the point of use.

use secrecy::{ExposeSecret, SecretString};
use serde_json::Value as JsonValue;

use super::ProviderError;

/// Where a credential was obtained from, for debugging without exposure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialSource {
    /// Passed directly by calling code
    Programmatic,

    /// Read from a configuration value
    Config,

    /// Read from an environment variable
    Environment,
}

/// An API key that cannot be accidentally printed.
pub struct ApiCredential {
    secret: SecretString,
    source: CredentialSource,
    label: &'static str,
}

impl std::fmt::Debug for ApiCredential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiCredential")
            .field("label", &self.label)
            .field("source", &self.source)
            .field("value", &"[REDACTED]")
            .finish()
    }
}

impl ApiCredential {
    /// Wrap a key supplied by calling code.
    pub fn new(key: impl Into<String>, source: CredentialSource, label: &'static str) -> Self {
        Self {
            secret: SecretString::from(key.into()),
            source,
            label,
        }
    }

    /// Read a key from an environment variable.
    pub fn from_env(var: &str, label: &'static str) -> Result<Self, ProviderError> {
        let key = std::env::var(var)
            .map_err(|_| ProviderError::NotConfigured(format!("{} env not set", var)))?;
        Ok(Self::new(key, CredentialSource::Environment, label))
    }

    /// Read a key from a config value, falling back to an env variable.
    pub fn from_config_or_env(
        config: &JsonValue,
        config_key: &str,
        env_var: &str,
        label: &'static str,
    ) -> Result<Self, ProviderError> {
        if let Some(key) = config[config_key].as_str() {
            if !key.is_empty() {
                return Ok(Self::new(key, CredentialSource::Config, label));
            }
        }
        Self::from_env(env_var, label).map_err(|_| {
            ProviderError::NotConfigured(format!(
                "{} required: set '{}' in config or {} env",
                label, config_key, env_var
            ))
        })
    }

    /// Whether a credential could be loaded without actually loading it.
    pub fn is_available(config: &JsonValue, config_key: &str, env_var: &str) -> bool {
        config[config_key].as_str().is_some_and(|k| !k.is_empty())
            || std::env::var(env_var).is_ok_and(|k| !k.is_empty())
    }

    /// Expose the raw key. Call only at the point of use (request headers).
    pub fn expose(&self) -> &str {
        self.secret.expose_secret()
    }

    pub fn is_empty(&self) -> bool {
        self.secret.expose_secret().is_empty()
    }

    pub fn source(&self) -> CredentialSource {
        self.source
    }
}
