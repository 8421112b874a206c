use super::{GenerationConfig, Message, Prompt};
use serde_json::{Map, Value};

/// Caller-supplied argument overrides, applied last over the derived arguments.
pub type Overrides = Map<String, Value>;

/// A single completion request: messages, generation parameters and overrides.
#[derive(Debug, Clone, PartialEq)]
pub struct Task {
    pub messages: Vec<Message>,
    pub generation_config: GenerationConfig,
    pub overrides: Overrides,
}

impl Task {
    /// Create a task with no overrides.
    pub fn new(prompt: impl Into<Prompt>, generation_config: GenerationConfig) -> Self {
        Self {
            messages: prompt.into().into_messages(),
            generation_config,
            overrides: Overrides::new(),
        }
    }

    /// Add a single override. A later override for the same key replaces the earlier one.
    pub fn with_override(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.overrides.insert(key.into(), value.into());
        self
    }

    /// Add every entry of `overrides`.
    pub fn with_overrides(mut self, overrides: Overrides) -> Self {
        self.overrides.extend(overrides);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_task_overrides() {
        let task = Task::new("hi", GenerationConfig::new("gpt-4"))
            .with_override("temperature", 0.9)
            .with_override("user", "abc")
            .with_override("temperature", 0.5);

        assert_eq!(task.messages, vec![Message::user("hi")]);
        assert_eq!(task.overrides.len(), 2);
        assert_eq!(task.overrides["temperature"], json!(0.5));
    }
}
