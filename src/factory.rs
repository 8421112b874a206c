use crate::providers::{AzureOpenAICompletionProvider, OpenAICompletionProvider};
use crate::{CompletionProvider, Error};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use std::env;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// Supported completion backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    OpenAI,
    AzureOpenAI,
}

impl ProviderKind {
    /// The discriminant string used in configuration.
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::OpenAI => "openai",
            ProviderKind::AzureOpenAI => "azure_openai",
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "openai" => Ok(ProviderKind::OpenAI),
            "azure_openai" => Ok(ProviderKind::AzureOpenAI),
            other => Err(Error::config(format!(
                "Unknown provider '{other}'. Valid values are: openai, azure_openai"
            ))),
        }
    }
}

/// Configuration for creating providers.
///
/// `provider` is the discriminant selecting the backend. Every other field is
/// optional. A missing `api_key` is looked up in the environment variable named
/// by `api_key_env`, or the backend's default variable.
#[derive(Debug, Clone, Deserialize)]
pub struct ProviderConfig {
    pub provider: String,
    #[serde(default)]
    pub api_key: Option<SecretString>,
    #[serde(default)]
    pub api_key_env: Option<String>,
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default)]
    pub api_version: Option<String>,
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl ProviderConfig {
    /// Create an empty configuration for a backend kind.
    pub fn new(kind: ProviderKind) -> Self {
        Self {
            provider: kind.as_str().to_string(),
            api_key: None,
            api_key_env: None,
            base_url: None,
            api_version: None,
            timeout_secs: None,
        }
    }

    /// Create configuration for the OpenAI provider.
    pub fn openai(api_key: String) -> Self {
        Self::new(ProviderKind::OpenAI).with_api_key(api_key)
    }

    /// Create configuration for the Azure OpenAI provider.
    ///
    /// `endpoint` is the resource URL, e.g. `https://my-resource.openai.azure.com`.
    pub fn azure_openai(api_key: String, endpoint: String) -> Self {
        Self::new(ProviderKind::AzureOpenAI)
            .with_api_key(api_key)
            .with_base_url(endpoint)
    }

    pub fn with_api_key(mut self, api_key: String) -> Self {
        self.api_key = Some(SecretString::new(api_key));
        self
    }

    /// Read the API key from this environment variable instead of the backend default.
    pub fn with_api_key_env(mut self, name: impl Into<String>) -> Self {
        self.api_key_env = Some(name.into());
        self
    }

    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = Some(base_url);
        self
    }

    pub fn with_api_version(mut self, api_version: String) -> Self {
        self.api_version = Some(api_version);
        self
    }

    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = Some(secs);
        self
    }

    /// Parse the discriminant.
    pub fn kind(&self) -> Result<ProviderKind, Error> {
        self.provider.parse()
    }

    /// Fail unless the discriminant names `expected`.
    pub fn ensure_kind(&self, expected: ProviderKind) -> Result<(), Error> {
        if self.provider == expected.as_str() {
            Ok(())
        } else {
            Err(Error::config(format!(
                "provider '{}' cannot be initialized with config for provider '{}'",
                expected, self.provider
            )))
        }
    }

    /// Resolve the API key from the config, then from the environment.
    pub fn resolve_api_key(&self, default_env: &str) -> Result<SecretString, Error> {
        if let Some(key) = &self.api_key {
            if !key.expose_secret().is_empty() {
                return Ok(key.clone());
            }
        }

        let var = self.api_key_env.as_deref().unwrap_or(default_env);
        match env::var(var) {
            Ok(key) if !key.is_empty() => Ok(SecretString::new(key)),
            _ => Err(Error::config(format!(
                "API key not found. Please set the {var} environment variable."
            ))),
        }
    }

    /// Resolve the base URL from the config, then from `env_var`.
    pub fn resolve_base_url(&self, env_var: &str) -> Option<String> {
        self.base_url
            .clone()
            .or_else(|| env::var(env_var).ok())
            .filter(|url| !url.is_empty())
            .map(|url| url.trim_end_matches('/').to_string())
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }

    /// Create configuration from environment variables.
    ///
    /// `PROVIDER_TYPE` selects the backend. When it is unset, the backend is
    /// inferred from which API key variable is present.
    pub fn from_env() -> Result<Self, Error> {
        let kind: ProviderKind = match env::var("PROVIDER_TYPE") {
            Ok(provider_type) => provider_type.to_lowercase().parse()?,
            Err(_) => {
                if env::var(AzureOpenAICompletionProvider::API_KEY_ENV).is_ok() {
                    ProviderKind::AzureOpenAI
                } else if env::var(OpenAICompletionProvider::API_KEY_ENV).is_ok() {
                    ProviderKind::OpenAI
                } else {
                    return Err(Error::config(
                        "No valid API credentials found in environment. Set PROVIDER_TYPE (openai/azure_openai) with appropriate credentials",
                    ));
                }
            }
        };

        let mut config = Self::new(kind);
        if let Some(secs) = env::var("PROVIDER_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
        {
            config.timeout_secs = Some(secs);
        }
        Ok(config)
    }
}

/// Factory for creating providers from configuration.
pub struct ProviderFactory;

impl ProviderFactory {
    /// Create the provider named by the configuration's discriminant.
    pub fn create(config: &ProviderConfig) -> Result<Box<dyn CompletionProvider>, Error> {
        match config.kind()? {
            ProviderKind::OpenAI => Ok(Box::new(OpenAICompletionProvider::from_config(config)?)),
            ProviderKind::AzureOpenAI => Ok(Box::new(AzureOpenAICompletionProvider::from_config(
                config,
            )?)),
        }
    }

    /// Create a provider from environment variables.
    pub fn from_env() -> Result<Box<dyn CompletionProvider>, Error> {
        let config = ProviderConfig::from_env()?;
        Self::create(&config)
    }
}
