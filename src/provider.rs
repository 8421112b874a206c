use crate::{BackendError, BackendResponse, Error, ProviderConfig, Task};
use serde_json::{Map, Value};

/// Backend-native call arguments, keyed by the names the backend expects.
pub type CompletionArgs = Map<String, Value>;

/// A completion backend: translates tasks into native calls and executes them.
///
/// Providers hold no per-request mutable state, so one instance can serve
/// overlapping sync and async executions.
#[async_trait::async_trait]
pub trait CompletionProvider: Send + Sync + 'static {
    /// Construct and fully validate a provider. Fails with [`Error::Configuration`]
    /// when the discriminant does not match or a credential is missing.
    fn from_config(config: &ProviderConfig) -> Result<Self, Error>
    where
        Self: Sized;

    /// Human-readable backend name used in logs and errors.
    fn name(&self) -> &'static str;

    /// Build the final argument map for a task, overrides applied.
    fn build_args(&self, task: &Task) -> Result<CompletionArgs, Error>;

    /// Execute a task, blocking the current thread until the backend responds.
    ///
    /// Must not be called from within an async runtime context.
    fn execute_sync(&self, task: &Task) -> Result<BackendResponse, Error>;

    /// Execute a task asynchronously. Dropping the future cancels the backend call.
    async fn execute(&self, task: &Task) -> Result<BackendResponse, Error>;
}

/// Transport capability a provider owns and delegates backend calls to.
#[async_trait::async_trait]
pub trait CompletionClient: Send + Sync + 'static {
    async fn create(&self, args: &CompletionArgs) -> Result<BackendResponse, BackendError>;

    fn create_blocking(&self, args: &CompletionArgs) -> Result<BackendResponse, BackendError>;
}
