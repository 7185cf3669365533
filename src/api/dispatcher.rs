use log::{debug, error};
use std::sync::Arc;
use tokio::sync::mpsc;

use crate::api::{FetchError, Transport};
use crate::dashboard::{AppPath, Completion, Dispatcher, FetchRequest, Method};

/// Runs requests on the tokio runtime and reports each outcome as one
/// [`Completion`] on a channel drained by the event loop, so the host is
/// only ever touched from the loop itself.
pub struct NetworkDispatcher {
    transport: Arc<dyn Transport>,
    completions: mpsc::UnboundedSender<Completion>,
}

impl NetworkDispatcher {
    pub fn new(transport: Arc<dyn Transport>) -> (Self, mpsc::UnboundedReceiver<Completion>) {
        let (completions, receiver) = mpsc::unbounded_channel();
        (
            Self {
                transport,
                completions,
            },
            receiver,
        )
    }
}

impl Dispatcher for NetworkDispatcher {
    fn dispatch(&mut self, origin: AppPath, request: FetchRequest) {
        let transport = Arc::clone(&self.transport);
        let completions = self.completions.clone();
        let request_id = request.id;

        tokio::spawn(async move {
            // the call runs in its own task so a panic still yields a completion
            let call = tokio::spawn(async move {
                match request.method {
                    Method::Get => transport.get(&request.path, &request.params).await,
                    Method::Post => transport.post(&request.path, &request.params).await,
                }
            });
            let outcome = match call.await {
                Ok(outcome) => outcome,
                Err(e) => {
                    error!("Request {} for {} aborted: {}", request_id, origin, e);
                    Err(FetchError::Other(format!("request aborted: {}", e)))
                }
            };

            let completion = Completion {
                origin,
                request_id,
                outcome,
            };
            if completions.send(completion).is_err() {
                debug!("Event loop closed, dropping completion for {}", request_id);
            }
        });
    }
}
