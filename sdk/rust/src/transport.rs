//! Batched HTTP transport
//!
//! Records are enqueued without blocking and shipped by a background task,
//! either when a buffer reaches the batch size or on the periodic flush
//! tick. Delivery is best-effort: batches the collector rejects or that
//! fail on the wire are logged and dropped, never surfaced to the host
//! application.

use std::time::Duration;

use serde_json::Value;
use tokio::sync::{mpsc, oneshot};

use crate::models::{Span, Trace};

pub(crate) const API_KEY_HEADER: &str = "X-AgentPulse-Key";

const QUEUE_CAPACITY: usize = 1024;
const SEND_TIMEOUT_SECS: u64 = 10;

#[derive(Debug)]
enum Command {
    Trace(Value),
    Span(Value),
    Flush(oneshot::Sender<()>),
    Shutdown(oneshot::Sender<()>),
}

#[derive(Debug, Clone)]
pub(crate) struct TransportConfig {
    pub endpoint: String,
    pub api_key: Option<String>,
    pub flush_interval: Duration,
    pub batch_size: usize,
}

/// Handle to the background sender; cheap to clone
#[derive(Clone)]
pub(crate) struct Transport {
    tx: mpsc::Sender<Command>,
}

impl Transport {
    /// Spawn the background flusher. Must be called within a tokio runtime.
    pub(crate) fn new(config: TransportConfig) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(SEND_TIMEOUT_SECS))
            .build()?;

        let (tx, rx) = mpsc::channel(QUEUE_CAPACITY);
        tokio::spawn(run_worker(rx, http, config));

        Ok(Self { tx })
    }

    pub(crate) fn send_trace(&self, trace: &Trace) {
        self.enqueue(Command::Trace, serde_json::to_value(trace));
    }

    pub(crate) fn send_span(&self, span: &Span) {
        self.enqueue(Command::Span, serde_json::to_value(span));
    }

    fn enqueue(&self, wrap: fn(Value) -> Command, record: serde_json::Result<Value>) {
        let record = match record {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(error = %e, "failed to serialize telemetry record, dropping");
                return;
            }
        };

        match self.tx.try_send(wrap(record)) {
            Ok(()) => {}
            Err(mpsc::error::TrySendError::Full(_)) => {
                tracing::warn!("telemetry queue full, dropping record");
            }
            Err(mpsc::error::TrySendError::Closed(_)) => {
                tracing::debug!("telemetry transport is shut down, dropping record");
            }
        }
    }

    /// Flush buffered records and wait for the sends to complete
    pub(crate) async fn flush(&self) {
        self.signal(Command::Flush).await;
    }

    /// Flush remaining records and stop the worker
    pub(crate) async fn shutdown(&self) {
        self.signal(Command::Shutdown).await;
    }

    async fn signal(&self, wrap: fn(oneshot::Sender<()>) -> Command) {
        let (ack_tx, ack_rx) = oneshot::channel();
        if self.tx.send(wrap(ack_tx)).await.is_err() {
            return;
        }
        let _ = ack_rx.await;
    }
}

struct BatchSender {
    http: reqwest::Client,
    api_key: Option<String>,
    traces_url: String,
    spans_url: String,
}

impl BatchSender {
    /// Traces flush before spans so referenced trace rows exist first
    async fn flush(&self, traces: &mut Vec<Value>, spans: &mut Vec<Value>) {
        self.post(&self.traces_url, traces).await;
        self.post(&self.spans_url, spans).await;
    }

    async fn post(&self, url: &str, batch: &mut Vec<Value>) {
        if batch.is_empty() {
            return;
        }
        let payload = std::mem::take(batch);
        let count = payload.len();

        let mut request = self.http.post(url).json(&payload);
        if let Some(key) = &self.api_key {
            request = request.header(API_KEY_HEADER, key);
        }

        match request.send().await {
            Ok(resp) if resp.status().is_success() => {
                tracing::trace!(url, count, "telemetry batch sent");
            }
            Ok(resp) => {
                tracing::warn!(
                    url,
                    count,
                    status = %resp.status(),
                    "collector rejected telemetry batch, dropping"
                );
            }
            Err(e) => {
                tracing::warn!(url, count, error = %e, "failed to send telemetry batch, dropping");
            }
        }
    }
}

async fn run_worker(mut rx: mpsc::Receiver<Command>, http: reqwest::Client, config: TransportConfig) {
    let endpoint = config.endpoint.trim_end_matches('/');
    let sender = BatchSender {
        http,
        api_key: config.api_key,
        traces_url: format!("{}/v1/traces", endpoint),
        spans_url: format!("{}/v1/spans", endpoint),
    };

    let mut traces: Vec<Value> = Vec::new();
    let mut spans: Vec<Value> = Vec::new();

    let mut interval = tokio::time::interval(config.flush_interval);
    interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            cmd = rx.recv() => match cmd {
                Some(Command::Trace(value)) => {
                    traces.push(value);
                    if traces.len() >= config.batch_size {
                        sender.flush(&mut traces, &mut spans).await;
                    }
                }
                Some(Command::Span(value)) => {
                    spans.push(value);
                    if spans.len() >= config.batch_size {
                        sender.flush(&mut traces, &mut spans).await;
                    }
                }
                Some(Command::Flush(ack)) => {
                    sender.flush(&mut traces, &mut spans).await;
                    let _ = ack.send(());
                }
                Some(Command::Shutdown(ack)) => {
                    sender.flush(&mut traces, &mut spans).await;
                    let _ = ack.send(());
                    break;
                }
                // All handles dropped; drain and exit
                None => {
                    sender.flush(&mut traces, &mut spans).await;
                    break;
                }
            },
            _ = interval.tick() => {
                sender.flush(&mut traces, &mut spans).await;
            }
        }
    }
}
