use crate::controller::ReplyRequest;
use crate::error::BackendError;
use crate::event::AppEvent;
use async_trait::async_trait;
use eframe::egui;
use serde::{Deserialize, Serialize};
use std::sync::{mpsc, Arc};
use std::time::Duration;
use tokio::runtime::Handle;
use tracing::{debug, warn};

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    message: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatReply {
    answer: String,
}

/// Answers one chat message. Implementations are single-shot: no retries,
/// no streaming.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    async fn ask(&self, message: &str) -> Result<String, BackendError>;
}

pub struct HttpBackend {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpBackend {
    pub fn new(endpoint: impl Into<String>, timeout: Option<Duration>) -> Result<Self, BackendError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            endpoint: endpoint.into(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl ChatBackend for HttpBackend {
    async fn ask(&self, message: &str) -> Result<String, BackendError> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(&ChatRequest { message })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(BackendError::Status(status));
        }

        let reply: ChatReply = response
            .json()
            .await
            .map_err(|err| BackendError::Decode(err.to_string()))?;
        Ok(reply.answer)
    }
}

/// Runs reply requests on the tokio runtime and hands the outcome back to
/// the UI thread as an [`AppEvent`].
#[derive(Clone)]
pub struct ReplyDispatcher {
    backend: Arc<dyn ChatBackend>,
    runtime_handle: Handle,
    tx: mpsc::Sender<AppEvent>,
}

impl ReplyDispatcher {
    pub fn new(backend: Arc<dyn ChatBackend>, runtime_handle: Handle, tx: mpsc::Sender<AppEvent>) -> Self {
        Self {
            backend,
            runtime_handle,
            tx,
        }
    }

    pub fn dispatch(&self, request: ReplyRequest, repaint: Option<egui::Context>) {
        let backend = Arc::clone(&self.backend);
        let tx = self.tx.clone();

        self.runtime_handle.spawn(async move {
            debug!(turn = request.turn.0, session_id = %request.session_id, "sending chat turn");
            let outcome = backend.ask(&request.text).await;
            if let Err(err) = &outcome {
                warn!(turn = request.turn.0, "chat turn failed: {err}");
            }

            if tx
                .send(AppEvent::ReplyFinished {
                    turn: request.turn,
                    outcome,
                })
                .is_err()
            {
                debug!(turn = request.turn.0, "ui closed before reply arrived");
                return;
            }
            if let Some(ctx) = repaint {
                ctx.request_repaint();
            }
        });
    }
}
