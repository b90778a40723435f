//! Client entry point

use std::time::Duration;

use crate::models::Trace;
use crate::transport::{Transport, TransportConfig};

/// Default collector endpoint
pub const DEFAULT_ENDPOINT: &str = "http://localhost:3000";

const DEFAULT_FLUSH_INTERVAL: Duration = Duration::from_secs(2);
const DEFAULT_BATCH_SIZE: usize = 50;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to initialize telemetry transport: {0}")]
    Transport(#[from] reqwest::Error),
}

/// Configures and creates an [`AgentPulse`] client
#[derive(Debug, Clone)]
pub struct AgentPulseBuilder {
    endpoint: String,
    api_key: Option<String>,
    flush_interval: Duration,
    batch_size: usize,
    enabled: bool,
}

impl Default for AgentPulseBuilder {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            api_key: None,
            flush_interval: DEFAULT_FLUSH_INTERVAL,
            batch_size: DEFAULT_BATCH_SIZE,
            enabled: true,
        }
    }
}

impl AgentPulseBuilder {
    /// Collector base URL, e.g. `http://localhost:3000`
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// API key sent with every batch
    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// How often buffered records are shipped (default 2s)
    pub fn flush_interval(mut self, interval: Duration) -> Self {
        self.flush_interval = interval;
        self
    }

    /// Buffer size that triggers an immediate flush (default 50)
    pub fn batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    /// Build a no-op client: traces are created normally but never sent.
    /// Useful for tests and for opting out in production.
    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    /// Create the client and spawn its background flusher.
    /// Must be called within a tokio runtime.
    pub fn build(self) -> Result<AgentPulse, Error> {
        let transport = if self.enabled {
            Some(Transport::new(TransportConfig {
                endpoint: self.endpoint,
                api_key: self.api_key,
                flush_interval: self.flush_interval,
                batch_size: self.batch_size,
            })?)
        } else {
            None
        };
        Ok(AgentPulse { transport })
    }
}

/// Handle for recording agent telemetry; cheap to clone
#[derive(Clone)]
pub struct AgentPulse {
    transport: Option<Transport>,
}

impl AgentPulse {
    pub fn builder() -> AgentPulseBuilder {
        AgentPulseBuilder::default()
    }

    /// Shorthand for [`AgentPulse::builder`] with an endpoint and API key
    pub fn new(endpoint: impl Into<String>, api_key: impl Into<String>) -> Result<Self, Error> {
        Self::builder().endpoint(endpoint).api_key(api_key).build()
    }

    pub fn is_enabled(&self) -> bool {
        self.transport.is_some()
    }

    /// Begin a trace for one agent run
    pub fn start_trace(&self, agent_name: impl Into<String>) -> Trace {
        Trace::new().with_agent(agent_name)
    }

    /// Mark the trace successful and queue it for delivery
    pub fn end_trace(&self, mut trace: Trace) {
        trace.end();
        self.dispatch(&trace);
    }

    /// Mark the trace failed and queue it for delivery
    pub fn fail_trace(&self, mut trace: Trace, error: impl Into<String>) {
        trace.fail(error);
        self.dispatch(&trace);
    }

    fn dispatch(&self, trace: &Trace) {
        let Some(transport) = &self.transport else {
            return;
        };
        // Trace goes out before its spans so the collector sees the parent first
        transport.send_trace(trace);
        for span in &trace.spans {
            transport.send_span(span);
        }
    }

    /// Ship everything buffered so far and wait for delivery to finish
    pub async fn flush(&self) {
        if let Some(transport) = &self.transport {
            transport.flush().await;
        }
    }

    /// Flush remaining records and stop the background flusher
    pub async fn shutdown(&self) {
        if let Some(transport) = &self.transport {
            transport.shutdown().await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SpanKind;
    use httpmock::prelude::*;

    #[tokio::test]
    async fn test_end_trace_ships_trace_and_spans() {
        let server = MockServer::start_async().await;
        let traces_mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/v1/traces")
                    .header("X-AgentPulse-Key", "ap_live");
                then.status(201);
            })
            .await;
        let spans_mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/v1/spans")
                    .header("X-AgentPulse-Key", "ap_live");
                then.status(201);
            })
            .await;

        let client = AgentPulse::builder()
            .endpoint(server.base_url())
            .api_key("ap_live")
            .build()
            .unwrap();

        let mut trace = client.start_trace("researcher");
        let mut span = trace.start_span("search", SpanKind::Tool);
        span.end();
        trace.record(span);
        client.end_trace(trace);
        client.flush().await;

        traces_mock.assert_async().await;
        spans_mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_disabled_client_sends_nothing() {
        let server = MockServer::start_async().await;
        let any_post = server
            .mock_async(|when, then| {
                when.method(POST);
                then.status(201);
            })
            .await;

        let client = AgentPulse::builder()
            .endpoint(server.base_url())
            .disabled()
            .build()
            .unwrap();
        assert!(!client.is_enabled());

        let trace = client.start_trace("quiet");
        client.end_trace(trace);
        client.flush().await;
        client.shutdown().await;

        assert_eq!(any_post.hits_async().await, 0);
    }
}
