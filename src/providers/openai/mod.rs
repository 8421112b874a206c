//! OpenAI chat completions backend.

pub mod args;
pub mod client;

pub use args::chat_completion_args;
pub use client::{
    OpenAICompletionProvider, OpenAISettings, OPENAI_API_KEY_ENV, OPENAI_BASE_URL_ENV,
    OPENAI_DEFAULT_BASE_URL,
};
