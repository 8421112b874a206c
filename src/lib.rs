//! A pluggable completion dispatcher over multiple LLM backends.
//!
//! A backend-agnostic [`Task`] is normalized into the argument map a backend
//! expects and executed through a [`CompletionProvider`], either blocking
//! ([`CompletionProvider::execute_sync`]) or async ([`CompletionProvider::execute`]).
//! OpenAI and Azure OpenAI are supported.

pub mod error;
pub mod factory;
pub mod provider;
pub mod providers;
pub mod response;
pub mod types;

// Re-export core types for easy usage
pub use error::{BackendError, Error};
pub use factory::{ProviderConfig, ProviderFactory, ProviderKind};
pub use provider::{CompletionArgs, CompletionClient, CompletionProvider};
pub use providers::*;
pub use response::BackendResponse;
pub use types::*;
