//! Chat completions argument shape shared by OpenAI and Azure OpenAI.

use crate::provider::CompletionArgs;
use crate::{Error, Message, Task};
use serde::Serialize;
use serde_json::Value;

/// Arguments derived from a task before caller overrides are applied.
#[derive(Debug, Serialize)]
struct ChatCompletionArgs<'a> {
    model: &'a str,
    temperature: f64,
    top_p: f64,
    stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    functions: Option<&'a [Value]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tools: Option<&'a [Value]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<&'a Value>,
    messages: &'a [Message],
}

impl<'a> ChatCompletionArgs<'a> {
    fn from_task(task: &'a Task) -> Self {
        let config = &task.generation_config;
        Self {
            model: &config.model,
            temperature: config.temperature,
            top_p: config.top_p,
            stream: config.stream,
            max_tokens: config.max_tokens_to_sample,
            functions: config.functions.as_deref(),
            tools: config.tools.as_deref(),
            response_format: config.response_format.as_ref(),
            messages: &task.messages,
        }
    }
}

/// Build the chat completions argument map for a task.
///
/// Overrides are a flat overlay applied last: each override key replaces the
/// derived value wholesale, and unknown keys pass through untouched.
pub fn chat_completion_args(task: &Task) -> Result<CompletionArgs, Error> {
    let base = serde_json::to_value(ChatCompletionArgs::from_task(task))?;
    let mut args: CompletionArgs = serde_json::from_value(base)?;

    args.extend(
        task.overrides
            .iter()
            .map(|(key, value)| (key.clone(), value.clone())),
    );
    Ok(args)
}
