//! reqwest-backed transport shared by the OpenAI-compatible providers.

use crate::provider::{CompletionArgs, CompletionClient};
use crate::{BackendError, BackendResponse, Error};
use reqwest::header::CONTENT_TYPE;
use reqwest::{StatusCode, Url};
use secrecy::{ExposeSecret, SecretString};
use serde_json::Value;
use std::sync::OnceLock;
use std::time::Duration;

/// How the API key is presented to the backend.
enum Auth {
    Bearer(SecretString),
    ApiKeyHeader(SecretString),
}

/// Where a completion request is sent.
enum Route {
    /// A single chat completions URL.
    Fixed(String),
    /// Azure deployment routing: the deployment is taken from the `model` argument.
    AzureDeployment { endpoint: Url, api_version: String },
}

/// HTTP client for chat completion endpoints.
///
/// Holds an async client for [`CompletionClient::create`] and lazily builds a
/// blocking client on the first [`CompletionClient::create_blocking`] call.
pub struct HttpClient {
    client: reqwest::Client,
    blocking: OnceLock<reqwest::blocking::Client>,
    route: Route,
    auth: Auth,
    timeout: Option<Duration>,
}

impl HttpClient {
    /// Client for the OpenAI chat completions API under `base_url`.
    pub fn openai(
        base_url: &str,
        api_key: SecretString,
        timeout: Option<Duration>,
    ) -> Result<Self, Error> {
        Self::build(
            Route::Fixed(format!("{base_url}/chat/completions")),
            Auth::Bearer(api_key),
            timeout,
        )
    }

    /// Client for an Azure OpenAI resource.
    ///
    /// `endpoint` must be an absolute URL such as `https://my-resource.openai.azure.com`.
    pub fn azure(
        endpoint: &str,
        api_version: &str,
        api_key: SecretString,
        timeout: Option<Duration>,
    ) -> Result<Self, Error> {
        let endpoint = Url::parse(endpoint)
            .ok()
            .filter(|url| !url.cannot_be_a_base())
            .ok_or_else(|| Error::config(format!("Invalid Azure OpenAI endpoint '{endpoint}'")))?;

        Self::build(
            Route::AzureDeployment {
                endpoint,
                api_version: api_version.to_string(),
            },
            Auth::ApiKeyHeader(api_key),
            timeout,
        )
    }

    fn build(route: Route, auth: Auth, timeout: Option<Duration>) -> Result<Self, Error> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| Error::config(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            blocking: OnceLock::new(),
            route,
            auth,
            timeout,
        })
    }

    /// Resolve the request URL for a set of arguments.
    pub(crate) fn url(&self, args: &CompletionArgs) -> Result<String, BackendError> {
        match &self.route {
            Route::Fixed(url) => Ok(url.clone()),
            Route::AzureDeployment {
                endpoint,
                api_version,
            } => {
                // "." and ".." would be dropped from the path rather than encoded.
                let deployment = args
                    .get("model")
                    .and_then(Value::as_str)
                    .filter(|model| !matches!(*model, "" | "." | ".."))
                    .ok_or_else(|| {
                        BackendError::invalid_request("`model` must name an Azure deployment")
                    })?;

                let mut url = endpoint.clone();
                url.path_segments_mut()
                    .map_err(|_| BackendError::invalid_request("Azure endpoint must be an absolute URL"))?
                    .pop_if_empty()
                    .extend(["openai", "deployments"])
                    .push(deployment)
                    .extend(["chat", "completions"]);
                url.query_pairs_mut().append_pair("api-version", api_version);
                Ok(url.into())
            }
        }
    }

    fn auth_header(&self) -> (&'static str, String) {
        match &self.auth {
            Auth::Bearer(key) => ("Authorization", format!("Bearer {}", key.expose_secret())),
            Auth::ApiKeyHeader(key) => ("api-key", key.expose_secret().clone()),
        }
    }

    fn blocking_client(&self) -> Result<&reqwest::blocking::Client, BackendError> {
        if let Some(client) = self.blocking.get() {
            return Ok(client);
        }
        let client = reqwest::blocking::Client::builder()
            .timeout(self.timeout)
            .build()?;
        Ok(self.blocking.get_or_init(|| client))
    }
}

/// Turn a finished HTTP exchange into a backend response without reshaping the body.
fn read_body(
    status: StatusCode,
    content_type: Option<String>,
    body: String,
) -> Result<BackendResponse, BackendError> {
    if !status.is_success() {
        return Err(BackendError::Api {
            status: status.as_u16(),
            body,
        });
    }

    let event_stream = content_type
        .as_deref()
        .is_some_and(|ct| ct.starts_with("text/event-stream"));
    if event_stream {
        Ok(BackendResponse::EventStream(body))
    } else {
        Ok(BackendResponse::Json(serde_json::from_str(&body)?))
    }
}

fn content_type(headers: &reqwest::header::HeaderMap) -> Option<String> {
    headers
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned)
}

#[async_trait::async_trait]
impl CompletionClient for HttpClient {
    async fn create(&self, args: &CompletionArgs) -> Result<BackendResponse, BackendError> {
        let url = self.url(args)?;
        let (header, value) = self.auth_header();

        let response = self
            .client
            .post(url)
            .header(header, value)
            .json(args)
            .send()
            .await?;

        let status = response.status();
        let content_type = content_type(response.headers());
        let body = response.text().await?;
        read_body(status, content_type, body)
    }

    fn create_blocking(&self, args: &CompletionArgs) -> Result<BackendResponse, BackendError> {
        let url = self.url(args)?;
        let (header, value) = self.auth_header();

        let response = self
            .blocking_client()?
            .post(url)
            .header(header, value)
            .json(args)
            .send()?;

        let status = response.status();
        let content_type = content_type(response.headers());
        let body = response.text()?;
        read_body(status, content_type, body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn args(value: Value) -> CompletionArgs {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_azure_url_uses_model_as_deployment() {
        let client = HttpClient::azure(
            "https://my-resource.openai.azure.com",
            "2024-02-15-preview",
            SecretString::new("key".to_string()),
            None,
        )
        .unwrap();

        let url = client.url(&args(json!({"model": "my-gpt4"}))).unwrap();
        assert_eq!(
            url,
            "https://my-resource.openai.azure.com/openai/deployments/my-gpt4/chat/completions?api-version=2024-02-15-preview"
        );
    }

    #[test]
    fn test_azure_url_requires_model() {
        let client = HttpClient::azure(
            "https://my-resource.openai.azure.com",
            "2024-02-15-preview",
            SecretString::new("key".to_string()),
            None,
        )
        .unwrap();

        let err = client.url(&args(json!({"model": null}))).unwrap_err();
        assert!(matches!(err, BackendError::InvalidRequest(_)));
    }

    #[test]
    fn test_azure_deployment_is_a_single_encoded_segment() {
        let client = HttpClient::azure(
            "https://my-resource.openai.azure.com/",
            "2024-02-15-preview",
            SecretString::new("key".to_string()),
            None,
        )
        .unwrap();

        let model = "evil/../../x?api-version=0&";
        let url = Url::parse(&client.url(&args(json!({"model": model}))).unwrap()).unwrap();

        assert_eq!(url.host_str(), Some("my-resource.openai.azure.com"));
        let segments: Vec<&str> = url.path_segments().unwrap().collect();
        assert_eq!(segments.len(), 5);
        assert_eq!(&segments[..2], ["openai", "deployments"]);
        assert_eq!(&segments[3..], ["chat", "completions"]);
        assert!(!segments[2].contains(['/', '?']));

        let query: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert_eq!(
            query,
            [("api-version".to_string(), "2024-02-15-preview".to_string())]
        );

        let err = client.url(&args(json!({"model": ".."}))).unwrap_err();
        assert!(matches!(err, BackendError::InvalidRequest(_)));
    }

    #[test]
    fn test_azure_rejects_relative_endpoint() {
        let err = HttpClient::azure(
            "my-resource.openai.azure.com",
            "2024-02-15-preview",
            SecretString::new("key".to_string()),
            None,
        )
        .err()
        .unwrap();
        assert!(err.is_configuration());
    }

    #[test]
    fn test_openai_url_and_auth() {
        let client = HttpClient::openai(
            "https://api.openai.com/v1",
            SecretString::new("sk-test".to_string()),
            Some(Duration::from_secs(5)),
        )
        .unwrap();

        assert_eq!(
            client.url(&CompletionArgs::new()).unwrap(),
            "https://api.openai.com/v1/chat/completions"
        );
        assert_eq!(
            client.auth_header(),
            ("Authorization", "Bearer sk-test".to_string())
        );
    }

    #[test]
    fn test_read_body() {
        let ok = read_body(
            StatusCode::OK,
            Some("application/json".to_string()),
            r#"{"id":"x"}"#.to_string(),
        )
        .unwrap();
        assert_eq!(ok, BackendResponse::Json(json!({"id": "x"})));

        let stream = read_body(
            StatusCode::OK,
            Some("text/event-stream; charset=utf-8".to_string()),
            "data: [DONE]\n\n".to_string(),
        )
        .unwrap();
        assert!(stream.is_event_stream());

        let err = read_body(StatusCode::TOO_MANY_REQUESTS, None, "slow down".to_string())
            .unwrap_err();
        assert_eq!(err.status(), Some(429));

        let err = read_body(StatusCode::OK, None, "not json".to_string()).unwrap_err();
        assert!(matches!(err, BackendError::Decode(_)));
    }
}
