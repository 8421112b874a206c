//! Execution plumbing shared by every provider: logging around one backend call.

use crate::provider::{CompletionArgs, CompletionClient};
use crate::{BackendError, BackendResponse, Error};
use tracing::instrument::WithSubscriber;
use tracing::{debug, debug_span, error, trace, Dispatch, Instrument};
use uuid::Uuid;

/// Owns a provider's backend client and the logger its executions report to.
pub(crate) struct Dispatcher {
    name: &'static str,
    client: Box<dyn CompletionClient>,
    dispatch: Dispatch,
}

impl Dispatcher {
    /// Report to the dispatcher that is current when the provider is built.
    pub(crate) fn new(name: &'static str, client: Box<dyn CompletionClient>) -> Self {
        Self {
            name,
            client,
            dispatch: tracing::dispatcher::get_default(|current| current.clone()),
        }
    }

    pub(crate) fn set_dispatch(&mut self, dispatch: Dispatch) {
        self.dispatch = dispatch;
    }

    pub(crate) fn execute_sync(&self, args: &CompletionArgs) -> Result<BackendResponse, Error> {
        tracing::dispatcher::with_default(&self.dispatch, || {
            let span = debug_span!(
                "completion",
                provider = self.name,
                mode = "sync",
                request_id = %Uuid::new_v4()
            );
            let _enter = span.enter();

            self.log_request(args);
            let result = self.client.create_blocking(args);
            self.finish(result)
        })
    }

    pub(crate) async fn execute(&self, args: &CompletionArgs) -> Result<BackendResponse, Error> {
        async move {
            let span = debug_span!(
                "completion",
                provider = self.name,
                mode = "async",
                request_id = %Uuid::new_v4()
            );

            async move {
                self.log_request(args);
                let result = self.client.create(args).await;
                self.finish(result)
            }
            .instrument(span)
            .await
        }
        .with_subscriber(self.dispatch.clone())
        .await
    }

    fn log_request(&self, args: &CompletionArgs) {
        let keys: Vec<&str> = args.keys().map(String::as_str).collect();
        let model = args
            .get("model")
            .and_then(|model| model.as_str())
            .unwrap_or_default();
        debug!(
            model,
            keys = ?keys,
            "Executing {} task",
            self.name
        );
        trace!(args = ?args, "{} task arguments", self.name);
    }

    fn finish(
        &self,
        result: Result<BackendResponse, BackendError>,
    ) -> Result<BackendResponse, Error> {
        match result {
            Ok(response) => {
                debug!("{} task executed successfully", self.name);
                Ok(response)
            }
            Err(e) => {
                error!(error = %e, status = ?e.status(), "{} task execution failed", self.name);
                Err(Error::backend(self.name, e))
            }
        }
    }
}
