//! Azure OpenAI provider implementation.
//!
//! Azure serves the OpenAI chat completions API per deployment:
//! - URL structure: `{endpoint}/openai/deployments/{deployment}/chat/completions?api-version=..`
//! - Authentication via API key in the `api-key` header
//! - The deployment is the final `model` argument, so a `model` override reroutes the call

use crate::provider::{CompletionArgs, CompletionClient, CompletionProvider};
use crate::providers::dispatch::Dispatcher;
use crate::providers::http::HttpClient;
use crate::providers::openai::chat_completion_args;
use crate::{BackendResponse, Error, ProviderConfig, ProviderKind, Task};
use secrecy::SecretString;
use std::env;
use std::time::Duration;
use tracing::{debug, error, Dispatch};

/// Environment variable holding the Azure OpenAI API key.
pub const AZURE_OPENAI_API_KEY_ENV: &str = "AZURE_OPENAI_API_KEY";
/// Environment variable holding the resource endpoint.
pub const AZURE_OPENAI_ENDPOINT_ENV: &str = "AZURE_OPENAI_ENDPOINT";
/// Environment variable overriding the API version.
pub const AZURE_OPENAI_API_VERSION_ENV: &str = "OPENAI_API_VERSION";
pub const DEFAULT_API_VERSION: &str = "2024-02-15-preview";

/// Validated connection settings handed to the client builder.
pub struct AzureSettings {
    pub api_key: SecretString,
    pub endpoint: String,
    pub api_version: String,
    pub timeout: Option<Duration>,
}

/// Azure OpenAI chat completions provider.
pub struct AzureOpenAICompletionProvider {
    dispatcher: Dispatcher,
}

impl AzureOpenAICompletionProvider {
    pub const API_KEY_ENV: &'static str = AZURE_OPENAI_API_KEY_ENV;

    /// Validate `config` and build the backend client with `build`.
    ///
    /// `build` only runs once validation has passed.
    pub fn with_client<C, F>(config: &ProviderConfig, build: F) -> Result<Self, Error>
    where
        C: CompletionClient,
        F: FnOnce(AzureSettings) -> Result<C, Error>,
    {
        if let Err(e) = config.ensure_kind(ProviderKind::AzureOpenAI) {
            error!(provider = %config.provider, "Invalid provider");
            return Err(e);
        }

        let api_key = config.resolve_api_key(AZURE_OPENAI_API_KEY_ENV).map_err(|e| {
            error!("Azure OpenAI API key not found");
            e
        })?;

        let endpoint = config
            .resolve_base_url(AZURE_OPENAI_ENDPOINT_ENV)
            .ok_or_else(|| {
                error!("Azure OpenAI endpoint not found");
                Error::config(format!(
                    "Azure OpenAI endpoint not found. Set `base_url` or the {AZURE_OPENAI_ENDPOINT_ENV} environment variable."
                ))
            })?;

        let api_version = config
            .api_version
            .clone()
            .or_else(|| env::var(AZURE_OPENAI_API_VERSION_ENV).ok())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_API_VERSION.to_string());

        let client = build(AzureSettings {
            api_key,
            endpoint,
            api_version,
            timeout: config.timeout(),
        })?;

        debug!("AzureOpenAICompletionProvider initialized successfully");
        Ok(Self {
            dispatcher: Dispatcher::new("AzureOpenAI", Box::new(client)),
        })
    }

    /// Send this provider's logs to `dispatch` instead of the default dispatcher.
    pub fn with_dispatch(mut self, dispatch: Dispatch) -> Self {
        self.dispatcher.set_dispatch(dispatch);
        self
    }
}

#[async_trait::async_trait]
impl CompletionProvider for AzureOpenAICompletionProvider {
    fn from_config(config: &ProviderConfig) -> Result<Self, Error> {
        Self::with_client(config, |settings| {
            HttpClient::azure(
                &settings.endpoint,
                &settings.api_version,
                settings.api_key,
                settings.timeout,
            )
        })
    }

    fn name(&self) -> &'static str {
        "AzureOpenAI"
    }

    fn build_args(&self, task: &Task) -> Result<CompletionArgs, Error> {
        chat_completion_args(task)
    }

    fn execute_sync(&self, task: &Task) -> Result<BackendResponse, Error> {
        let args = self.build_args(task)?;
        self.dispatcher.execute_sync(&args)
    }

    async fn execute(&self, task: &Task) -> Result<BackendResponse, Error> {
        let args = self.build_args(task)?;
        self.dispatcher.execute(&args).await
    }
}
