use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Backend-agnostic parameters of a completion request.
///
/// Optional fields left as `None` are never forwarded to a backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    pub model: String,
    pub temperature: f64,
    pub top_p: f64,
    pub stream: bool,
    pub max_tokens_to_sample: Option<u32>,
    pub functions: Option<Vec<Value>>,
    pub tools: Option<Vec<Value>>,
    pub response_format: Option<Value>,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            model: "gpt-4o".to_string(),
            temperature: 0.1,
            top_p: 1.0,
            stream: false,
            max_tokens_to_sample: Some(1024),
            functions: None,
            tools: None,
            response_format: None,
        }
    }
}

impl GenerationConfig {
    /// Create a configuration for a model with default sampling parameters.
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            ..Self::default()
        }
    }

    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_top_p(mut self, top_p: f64) -> Self {
        self.top_p = top_p;
        self
    }

    pub fn with_stream(mut self, stream: bool) -> Self {
        self.stream = stream;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: Option<u32>) -> Self {
        self.max_tokens_to_sample = max_tokens;
        self
    }

    pub fn with_functions(mut self, functions: Vec<Value>) -> Self {
        self.functions = Some(functions);
        self
    }

    pub fn with_tools(mut self, tools: Vec<Value>) -> Self {
        self.tools = Some(tools);
        self
    }

    pub fn with_response_format(mut self, response_format: Value) -> Self {
        self.response_format = Some(response_format);
        self
    }
}
