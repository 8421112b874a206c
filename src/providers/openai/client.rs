use super::args::chat_completion_args;
use crate::provider::{CompletionArgs, CompletionClient, CompletionProvider};
use crate::providers::dispatch::Dispatcher;
use crate::providers::http::HttpClient;
use crate::{BackendResponse, Error, ProviderConfig, ProviderKind, Task};
use secrecy::SecretString;
use std::time::Duration;
use tracing::{debug, error, Dispatch};

/// Environment variable holding the OpenAI API key.
pub const OPENAI_API_KEY_ENV: &str = "OPENAI_API_KEY";
/// Environment variable overriding the OpenAI base URL.
pub const OPENAI_BASE_URL_ENV: &str = "OPENAI_BASE_URL";
pub const OPENAI_DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Validated connection settings handed to the client builder.
pub struct OpenAISettings {
    pub api_key: SecretString,
    pub base_url: String,
    pub timeout: Option<Duration>,
}

/// OpenAI chat completions provider.
pub struct OpenAICompletionProvider {
    dispatcher: Dispatcher,
}

impl OpenAICompletionProvider {
    pub const API_KEY_ENV: &'static str = OPENAI_API_KEY_ENV;

    /// Validate `config` and build the backend client with `build`.
    ///
    /// `build` only runs once validation has passed.
    pub fn with_client<C, F>(config: &ProviderConfig, build: F) -> Result<Self, Error>
    where
        C: CompletionClient,
        F: FnOnce(OpenAISettings) -> Result<C, Error>,
    {
        if let Err(e) = config.ensure_kind(ProviderKind::OpenAI) {
            error!(provider = %config.provider, "Invalid provider");
            return Err(e);
        }
        let api_key = config.resolve_api_key(OPENAI_API_KEY_ENV).map_err(|e| {
            error!("OpenAI API key not found");
            e
        })?;
        let base_url = config
            .resolve_base_url(OPENAI_BASE_URL_ENV)
            .unwrap_or_else(|| OPENAI_DEFAULT_BASE_URL.to_string());

        let client = build(OpenAISettings {
            api_key,
            base_url,
            timeout: config.timeout(),
        })?;

        debug!("OpenAICompletionProvider initialized successfully");
        Ok(Self {
            dispatcher: Dispatcher::new("OpenAI", Box::new(client)),
        })
    }

    /// Send this provider's logs to `dispatch` instead of the default dispatcher.
    pub fn with_dispatch(mut self, dispatch: Dispatch) -> Self {
        self.dispatcher.set_dispatch(dispatch);
        self
    }
}

#[async_trait::async_trait]
impl CompletionProvider for OpenAICompletionProvider {
    fn from_config(config: &ProviderConfig) -> Result<Self, Error> {
        Self::with_client(config, |settings| {
            HttpClient::openai(&settings.base_url, settings.api_key, settings.timeout)
        })
    }

    fn name(&self) -> &'static str {
        "OpenAI"
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
