//! Request transport.
//!
//! The coordinator only needs "send a request, later receive a structured
//! outcome". [`Transport::send`] never blocks the page: completions are picked
//! up by [`Transport::poll_completed`] and fed back as events, so a response
//! is handled on the page's own loop like any other input.

use crate::app::{OutboundRequest, RequestId};
use crate::domain::error::{HangarError, Result};
use crate::domain::{FailureReason, RequestOutcome};
use reqwest::blocking::Client;
use reqwest::Url;
use std::collections::VecDeque;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::time::{Duration, Instant};

/// An outbound request together with the headers the runtime attached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedRequest {
    pub request: OutboundRequest,
    pub headers: Vec<(String, String)>,
}

impl PreparedRequest {
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// A finished request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completion {
    pub request: RequestId,
    pub outcome: RequestOutcome,
}

pub trait Transport {
    /// Starts a `POST`. Must return without waiting for the response.
    fn send(&mut self, request: PreparedRequest);

    /// Completions that arrived since the last call, in arrival order.
    fn poll_completed(&mut self) -> Vec<Completion>;
}

/// HTTP transport running each request on its own thread.
///
/// No timeout is configured beyond the client defaults; a hung request leaves
/// its control pending until the page is reloaded.
#[derive(Debug)]
pub struct HttpTransport {
    client: Client,
    base_url: Url,
    tx: Sender<Completion>,
    rx: Receiver<Completion>,
    in_flight: usize,
    ready: Vec<Completion>,
}

impl HttpTransport {
    /// Creates a transport resolving relative control URLs against `base_url`.
    ///
    /// # Errors
    ///
    /// Returns [`HangarError::Transport`] if the base URL does not parse or the
    /// HTTP client cannot be built.
    pub fn new(base_url: &str) -> Result<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|e| HangarError::Transport(format!("invalid base url {base_url}: {e}")))?;
        let client = Client::builder()
            .build()
            .map_err(|e| HangarError::Transport(e.to_string()))?;
        let (tx, rx) = mpsc::channel();

        Ok(Self {
            client,
            base_url,
            tx,
            rx,
            in_flight: 0,
            ready: Vec::new(),
        })
    }

    /// Blocks until every in-flight request completed or `timeout` elapsed.
    ///
    /// Completions are kept for the next [`Transport::poll_completed`]. Returns
    /// the number of requests still outstanding.
    pub fn settle(&mut self, timeout: Duration) -> usize {
        let deadline = Instant::now() + timeout;

        while self.in_flight > 0 {
            let remaining = deadline.saturating_duration_since(Instant::now());
            match self.rx.recv_timeout(remaining) {
                Ok(completion) => {
                    self.in_flight -= 1;
                    self.ready.push(completion);
                }
                Err(RecvTimeoutError::Timeout) => {
                    tracing::warn!(
                        in_flight = self.in_flight,
                        "requests still outstanding after settle timeout"
                    );
                    break;
                }
                Err(RecvTimeoutError::Disconnected) => break,
            }
        }
        self.in_flight
    }

    fn execute(client: &Client, url: Url, headers: &[(String, String)]) -> RequestOutcome {
        let mut builder = client.post(url);
        for (name, value) in headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        let response = match builder.send() {
            Ok(response) => response,
            Err(e) => return RequestOutcome::Failure(FailureReason::Network(e.to_string())),
        };

        let status = response.status().as_u16();
        match response.text() {
            Ok(body) => RequestOutcome::from_http(status, &body),
            Err(e) => RequestOutcome::Failure(FailureReason::Network(e.to_string())),
        }
    }
}

impl Transport for HttpTransport {
    fn send(&mut self, prepared: PreparedRequest) {
        let id = prepared.request.id;
        let url = match self.base_url.join(&prepared.request.url) {
            Ok(url) => url,
            Err(e) => {
                tracing::warn!(
                    request_id = %id,
                    url = %prepared.request.url,
                    error = %e,
                    "unresolvable request url"
                );
                // still reported through the channel so the control recovers
                let _ = self.tx.send(Completion {
                    request: id,
                    outcome: RequestOutcome::Failure(FailureReason::Network(e.to_string())),
                });
                self.in_flight += 1;
                return;
            }
        };

        tracing::debug!(request_id = %id, url = %url, "sending request");
        let client = self.client.clone();
        let tx = self.tx.clone();
        self.in_flight += 1;

        std::thread::spawn(move || {
            let outcome = Self::execute(&client, url, &prepared.headers);
            tracing::debug!(request_id = %id, outcome = ?outcome, "request completed");
            let _ = tx.send(Completion { request: id, outcome });
        });
    }

    fn poll_completed(&mut self) -> Vec<Completion> {
        let mut done = std::mem::take(&mut self.ready);
        while let Ok(completion) = self.rx.try_recv() {
            self.in_flight = self.in_flight.saturating_sub(1);
            done.push(completion);
        }
        done
    }
}

/// Offline transport: requests stay outstanding until completed by hand.
#[derive(Debug, Default)]
pub struct ScriptedTransport {
    sent: Vec<PreparedRequest>,
    outstanding: VecDeque<RequestId>,
    completed: Vec<Completion>,
}

impl ScriptedTransport {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Every request sent so far, in send order.
    #[must_use]
    pub fn sent(&self) -> &[PreparedRequest] {
        &self.sent
    }

    #[must_use]
    pub fn outstanding(&self) -> usize {
        self.outstanding.len()
    }

    /// Completes a specific request. Returns `false` if it is not outstanding.
    pub fn complete(&mut self, request: RequestId, outcome: RequestOutcome) -> bool {
        let Some(pos) = self.outstanding.iter().position(|id| *id == request) else {
            return false;
        };
        self.outstanding.remove(pos);
        self.completed.push(Completion { request, outcome });
        true
    }

    /// Completes the oldest outstanding request.
    pub fn complete_next(&mut self, outcome: RequestOutcome) -> Option<RequestId> {
        let request = self.outstanding.pop_front()?;
        self.completed.push(Completion { request, outcome });
        Some(request)
    }
}

impl Transport for ScriptedTransport {
    fn send(&mut self, request: PreparedRequest) {
        self.outstanding.push_back(request.request.id);
        self.sent.push(request);
    }

    fn poll_completed(&mut self) -> Vec<Completion> {
        std::mem::take(&mut self.completed)
    }
}
