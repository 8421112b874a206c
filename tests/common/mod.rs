#![allow(dead_code)]

use completion_dispatch::{
    AzureOpenAICompletionProvider, BackendError, BackendResponse, CompletionArgs,
    CompletionClient, GenerationConfig, ProviderConfig, Task,
};
use serde_json::{json, Value};
use std::io;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tracing::Dispatch;
use tracing_subscriber::fmt::MakeWriter;

pub const TEST_API_KEY: &str = "super-secret-azure-key";
pub const TEST_ENDPOINT: &str = "https://my-resource.openai.azure.com";

/// Azure config with an explicit key and endpoint.
pub fn azure_config() -> ProviderConfig {
    ProviderConfig::azure_openai(TEST_API_KEY.to_string(), TEST_ENDPOINT.to_string())
}

/// The example configuration: gpt-4, temperature 0.2, 256 tokens, no optionals.
pub fn example_config() -> GenerationConfig {
    GenerationConfig::new("gpt-4")
        .with_temperature(0.2)
        .with_top_p(1.0)
        .with_stream(false)
        .with_max_tokens(Some(256))
}

pub fn example_task() -> Task {
    Task::new("hi", example_config())
}

/// Execution path a recorded call came through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Sync,
    Async,
}

/// Client that records every call and echoes the arguments back.
#[derive(Clone, Default)]
pub struct RecordingClient {
    calls: Arc<Mutex<Vec<(Mode, CompletionArgs)>>>,
}

impl RecordingClient {
    pub fn calls(&self) -> Vec<(Mode, CompletionArgs)> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, mode: Mode, args: &CompletionArgs) -> BackendResponse {
        self.calls.lock().unwrap().push((mode, args.clone()));
        BackendResponse::Json(json!({ "echo": Value::Object(args.clone()) }))
    }
}

#[async_trait::async_trait]
impl CompletionClient for RecordingClient {
    async fn create(&self, args: &CompletionArgs) -> Result<BackendResponse, BackendError> {
        tokio::task::yield_now().await;
        Ok(self.record(Mode::Async, args))
    }

    fn create_blocking(&self, args: &CompletionArgs) -> Result<BackendResponse, BackendError> {
        Ok(self.record(Mode::Sync, args))
    }
}

/// Client whose backend always rejects the call.
pub struct FailingClient {
    pub status: u16,
}

#[async_trait::async_trait]
impl CompletionClient for FailingClient {
    async fn create(&self, _args: &CompletionArgs) -> Result<BackendResponse, BackendError> {
        Err(BackendError::Api {
            status: self.status,
            body: "invalid api key".to_string(),
        })
    }

    fn create_blocking(&self, _args: &CompletionArgs) -> Result<BackendResponse, BackendError> {
        Err(BackendError::Api {
            status: self.status,
            body: "invalid api key".to_string(),
        })
    }
}

/// Sets its flag when dropped.
struct DropFlag(Arc<AtomicBool>);

impl Drop for DropFlag {
    fn drop(&mut self) {
        self.0.store(true, Ordering::SeqCst);
    }
}

/// Client whose first async call never completes; later calls succeed.
#[derive(Clone, Default)]
pub struct StallingClient {
    calls: Arc<AtomicUsize>,
    pub dropped: Arc<AtomicBool>,
}

#[async_trait::async_trait]
impl CompletionClient for StallingClient {
    async fn create(&self, _args: &CompletionArgs) -> Result<BackendResponse, BackendError> {
        if self.calls.fetch_add(1, Ordering::SeqCst) == 0 {
            let _flag = DropFlag(self.dropped.clone());
            std::future::pending::<()>().await;
        }
        Ok(BackendResponse::Json(json!({"ok": true})))
    }

    fn create_blocking(&self, _args: &CompletionArgs) -> Result<BackendResponse, BackendError> {
        Ok(BackendResponse::Json(json!({"ok": true})))
    }
}

pub fn azure_with<C: CompletionClient>(client: C) -> AzureOpenAICompletionProvider {
    AzureOpenAICompletionProvider::with_client(&azure_config(), |_| Ok(client)).unwrap()
}

/// In-memory log sink.
#[derive(Clone, Default)]
pub struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl CapturedLogs {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for CapturedLogs {
    type Writer = CapturedLogs;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

/// A dispatcher that records everything down to TRACE into the returned sink.
pub fn capturing_dispatch() -> (Dispatch, CapturedLogs) {
    let logs = CapturedLogs::default();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(logs.clone())
        .with_max_level(tracing::Level::TRACE)
        .with_ansi(false)
        .finish();
    (Dispatch::new(subscriber), logs)
}
