//! Provider implementations for different completion backends.

pub mod azure;
mod dispatch;
pub mod http;
pub mod openai;

// Re-export commonly used provider types
pub use azure::{AzureOpenAICompletionProvider, AzureSettings};
pub use http::HttpClient;
pub use openai::{OpenAICompletionProvider, OpenAISettings};
