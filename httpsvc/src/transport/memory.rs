//
// Copyright 2026 Hans W. Uhlig. All Rights Reserved.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//      http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//

//! In-process transport with scripted responses.

use super::{ExchangeError, HttpExchangeAdapter};
use crate::adapter::{Payload, Publisher, ResponseHead};
use crate::request::{HttpRequest, RequestBody};
use crate::{Argument, HttpServiceError};
use bytes::{Bytes, BytesMut};
use futures::channel::oneshot;
use futures::future::{self, FutureExt, Shared};
use futures::stream::{self, Stream, StreamExt};
use http::header::{HeaderName, HeaderValue};
use http::{HeaderMap, Method, StatusCode};
use parking_lot::Mutex;
use std::collections::{HashMap, VecDeque};
use std::fmt;
use std::pin::Pin;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::task::{Context, Poll};

#[cfg(feature = "observability")]
use tracing::{debug, instrument};

/// How a scripted exchange ends after its head and chunks.
#[derive(Debug, Clone)]
enum Ending {
    Complete,
    Hang,
    Fail(String),
}

/// A canned response replayed by [`MemoryExchangeAdapter`].
///
/// # Examples
///
/// ```rust
/// use httpsvc::transport::ScriptedResponse;
/// use http::StatusCode;
///
/// // Immediate JSON answer
/// let found = ScriptedResponse::ok().with_json(&serde_json::json!({"id": 1}));
///
/// // Two chunks, then the stream stays open until the caller walks away
/// let feed = ScriptedResponse::ok().with_chunk("a").with_chunk("b").then_hang();
///
/// // Error status and connection failure
/// let missing = ScriptedResponse::status(StatusCode::NOT_FOUND);
/// let refused = ScriptedResponse::failure("connection refused");
/// ```
#[derive(Clone)]
pub struct ScriptedResponse {
    head: Option<ResponseHead>,
    chunks: Vec<Bytes>,
    ending: Ending,
    gate: Option<Shared<oneshot::Receiver<()>>>,
}

impl ScriptedResponse {
    /// A `200 OK` response with no body.
    #[must_use]
    pub fn ok() -> Self {
        Self::status(StatusCode::OK)
    }

    /// A response with the given status and no body.
    #[must_use]
    pub fn status(status: StatusCode) -> Self {
        Self {
            head: Some(ResponseHead::new(status)),
            chunks: Vec::new(),
            ending: Ending::Complete,
            gate: None,
        }
    }

    /// A response that never produces anything.
    #[must_use]
    pub fn pending() -> Self {
        Self {
            head: None,
            chunks: Vec::new(),
            ending: Ending::Hang,
            gate: None,
        }
    }

    /// A response that fails with [`ExchangeError::Connection`] before any head.
    #[must_use]
    pub fn failure(reason: impl Into<String>) -> Self {
        Self {
            head: None,
            chunks: Vec::new(),
            ending: Ending::Fail(reason.into()),
            gate: None,
        }
    }

    /// Adds a response header. Invalid names or values are ignored.
    #[must_use]
    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        if let (Some(head), Ok(name), Ok(value)) = (
            self.head.as_mut(),
            HeaderName::try_from(name),
            HeaderValue::try_from(value),
        ) {
            head.headers.append(name, value);
        }
        self
    }

    /// Replaces the body with a single chunk.
    #[must_use]
    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.chunks = vec![body.into()];
        self
    }

    /// Replaces the body with the JSON encoding of `value`.
    #[must_use]
    pub fn with_json<T: serde::Serialize>(self, value: &T) -> Self {
        let body = serde_json::to_vec(value).unwrap_or_default();
        self.with_header("content-type", "application/json")
            .with_body(body)
    }

    /// Appends a body chunk.
    #[must_use]
    pub fn with_chunk(mut self, chunk: impl Into<Bytes>) -> Self {
        self.chunks.push(chunk.into());
        self
    }

    /// Keeps the stream open after the last chunk instead of completing.
    #[must_use]
    pub fn then_hang(mut self) -> Self {
        self.ending = Ending::Hang;
        self
    }

    /// Fails with [`ExchangeError::Connection`] after the last chunk.
    #[must_use]
    pub fn then_fail(mut self, reason: impl Into<String>) -> Self {
        self.ending = Ending::Fail(reason.into());
        self
    }

    /// Holds the response back until the returned gate is opened.
    ///
    /// Dropping the gate without opening it fails the exchange.
    #[must_use]
    pub fn gated(mut self) -> (Self, ResponseGate) {
        let (tx, rx) = oneshot::channel();
        self.gate = Some(rx.shared());
        (self, ResponseGate { tx })
    }

    fn into_publisher(self) -> Publisher {
        let Self {
            head,
            chunks,
            ending,
            gate,
        } = self;

        let items = head
            .map(Payload::Head)
            .into_iter()
            .chain(chunks.into_iter().map(Payload::Data))
            .map(Ok);
        let tail: Publisher = match ending {
            Ending::Complete => stream::empty().boxed(),
            Ending::Hang => stream::pending().boxed(),
            Ending::Fail(reason) => failed(reason),
        };
        let response = stream::iter(items.collect::<Vec<_>>()).chain(tail).boxed();

        match gate {
            None => response,
            Some(gate) => stream::once(async move {
                match gate.await {
                    Ok(()) => response,
                    Err(_) => failed("response gate dropped".to_string()),
                }
            })
            .flatten()
            .boxed(),
        }
    }
}

impl fmt::Debug for ScriptedResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScriptedResponse")
            .field("head", &self.head)
            .field("chunks", &self.chunks.len())
            .field("ending", &self.ending)
            .field("gated", &self.gate.is_some())
            .finish()
    }
}

fn failed(reason: String) -> Publisher {
    let error: HttpServiceError = ExchangeError::connection(reason).into();
    stream::once(future::ready(Err(error))).boxed()
}

/// Releases a [`ScriptedResponse::gated`] response.
#[derive(Debug)]
pub struct ResponseGate {
    tx: oneshot::Sender<()>,
}

impl ResponseGate {
    /// Lets the held response through.
    pub fn open(self) {
        let _ = self.tx.send(());
    }
}

/// A request as seen by [`MemoryExchangeAdapter`].
#[derive(Debug)]
pub struct RecordedRequest {
    /// Order in which the exchange started, from zero.
    pub sequence: u64,
    /// The verb.
    pub method: Method,
    /// The final URL.
    pub url: String,
    /// The request headers.
    pub headers: HeaderMap,
    /// The request cookies.
    pub cookies: Vec<(String, String)>,
    /// The transport-only attributes.
    pub attributes: HashMap<String, Argument>,
    /// The body bytes; publisher bodies are drained chunk by chunk.
    pub body: Bytes,
    /// Whether the body arrived as a publisher.
    pub streamed_body: bool,
}

impl RecordedRequest {
    /// Returns the first value of a header as a string.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|value| value.to_str().ok())
    }

    /// Decodes the body as JSON.
    ///
    /// # Errors
    ///
    /// Returns a decode error if the body is not valid JSON for `T`.
    pub fn json<T: serde::de::DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_slice(&self.body)
    }
}

#[derive(Debug, Default)]
struct MemoryState {
    scripted: Mutex<VecDeque<ScriptedResponse>>,
    default_response: Mutex<Option<ScriptedResponse>>,
    requests: Mutex<Vec<RecordedRequest>>,
    exchanges: AtomicU64,
    started: AtomicU64,
    completions: AtomicU64,
    cancellations: AtomicU64,
}

impl MemoryState {
    fn next_response(&self) -> ScriptedResponse {
        self.scripted
            .lock()
            .pop_front()
            .or_else(|| self.default_response.lock().clone())
            .unwrap_or_else(ScriptedResponse::ok)
    }
}

/// An [`HttpExchangeAdapter`] that answers from a script instead of the network.
///
/// Responses queued with [`MemoryExchangeAdapter::enqueue`] are used first,
/// in order; after that every exchange gets the default response (`200 OK`
/// with an empty body unless replaced). Exchanges are lazy: the request is
/// recorded, and a script consumed, only when the publisher is first polled.
///
/// Clones share the same script, recordings and counters, so a test can hand
/// one clone to a factory and inspect another.
///
/// # Counters
///
/// - **exchanges**: calls to [`HttpExchangeAdapter::exchange`]
/// - **started**: publishers polled at least once
/// - **completions**: publishers that reached their end or an error
/// - **cancellations**: publishers dropped before reaching either
///
/// # Examples
///
/// ```rust
/// use futures::StreamExt;
/// use httpsvc::request::HttpRequestValues;
/// use httpsvc::transport::{HttpExchangeAdapter, MemoryExchangeAdapter, ScriptedResponse};
/// use http::Method;
///
/// # #[tokio::main]
/// # async fn main() {
/// let transport = MemoryExchangeAdapter::new();
/// transport.enqueue(ScriptedResponse::ok().with_body("hello"));
///
/// let request = HttpRequestValues::with_template(Method::GET, "/greeting").build().unwrap();
/// let payloads: Vec<_> = transport.exchange(request).collect().await;
/// assert_eq!(payloads.len(), 2);
///
/// let recorded = transport.take_requests();
/// assert_eq!(recorded[0].url, "/greeting");
/// assert_eq!(transport.completion_count(), 1);
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryExchangeAdapter {
    state: Arc<MemoryState>,
}

impl MemoryExchangeAdapter {
    /// Creates an adapter that answers `200 OK` to everything.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the response used once the queue is empty.
    #[must_use]
    pub fn with_default_response(self, response: ScriptedResponse) -> Self {
        *self.state.default_response.lock() = Some(response);
        self
    }

    /// Queues a response for the next exchange that starts.
    pub fn enqueue(&self, response: ScriptedResponse) {
        self.state.scripted.lock().push_back(response);
    }

    /// Removes and returns every request recorded so far.
    pub fn take_requests(&self) -> Vec<RecordedRequest> {
        std::mem::take(&mut *self.state.requests.lock())
    }

    /// Number of requests recorded and not yet taken.
    #[must_use]
    pub fn recorded_count(&self) -> usize {
        self.state.requests.lock().len()
    }

    /// Number of calls to [`HttpExchangeAdapter::exchange`].
    #[must_use]
    pub fn exchange_count(&self) -> u64 {
        self.state.exchanges.load(Ordering::Relaxed)
    }

    /// Number of exchanges whose publisher was polled.
    #[must_use]
    pub fn started_count(&self) -> u64 {
        self.state.started.load(Ordering::Relaxed)
    }

    /// Number of exchanges that ran to their end.
    #[must_use]
    pub fn completion_count(&self) -> u64 {
        self.state.completions.load(Ordering::Relaxed)
    }

    /// Number of exchanges abandoned before their end.
    #[must_use]
    pub fn cancellation_count(&self) -> u64 {
        self.state.cancellations.load(Ordering::Relaxed)
    }
}

impl HttpExchangeAdapter for MemoryExchangeAdapter {
    #[cfg_attr(
        feature = "observability",
        instrument(skip(self, request), fields(method = %request.method, url = %request.url))
    )]
    fn exchange(&self, request: HttpRequest) -> Publisher {
        self.state.exchanges.fetch_add(1, Ordering::Relaxed);

        #[cfg(feature = "observability")]
        debug!("Memory exchange created");

        let state = Arc::clone(&self.state);
        let response = stream::once(async move {
            let sequence = state.started.fetch_add(1, Ordering::Relaxed);
            let recorded = record(sequence, request).await;
            let script = state.next_response();
            state.requests.lock().push(recorded);
            script.into_publisher()
        })
        .flatten()
        .boxed();

        Box::pin(Tracked {
            inner: response,
            state: Arc::clone(&self.state),
            finished: false,
        })
    }
}

async fn record(sequence: u64, request: HttpRequest) -> RecordedRequest {
    let HttpRequest {
        method,
        url,
        headers,
        cookies,
        attributes,
        body,
    } = request;

    let streamed_body = body.is_publisher();
    let body = match body {
        RequestBody::Publisher(mut publisher) => {
            let mut buffer = BytesMut::new();
            while let Some(Ok(payload)) = publisher.next().await {
                if let Payload::Data(chunk) = payload {
                    buffer.extend_from_slice(&chunk);
                }
            }
            buffer.freeze()
        }
        other => other.to_bytes().unwrap_or_default(),
    };

    RecordedRequest {
        sequence,
        method,
        url,
        headers,
        cookies,
        attributes,
        body,
        streamed_body,
    }
}

/// Counts how a memory exchange ends.
struct Tracked {
    inner: Publisher,
    state: Arc<MemoryState>,
    finished: bool,
}

impl Tracked {
    fn finish(&mut self) {
        if !self.finished {
            self.finished = true;
            self.state.completions.fetch_add(1, Ordering::Relaxed);
        }
    }
}

impl Stream for Tracked {
    type Item = Result<Payload, HttpServiceError>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        if self.finished {
            return Poll::Ready(None);
        }
        let polled = self.inner.as_mut().poll_next(cx);
        match &polled {
            Poll::Ready(None) | Poll::Ready(Some(Err(_))) => self.finish(),
            _ => {}
        }
        polled
    }
}

impl Drop for Tracked {
    fn drop(&mut self) {
        if !self.finished {
            self.state.cancellations.fetch_add(1, Ordering::Relaxed);

            #[cfg(feature = "observability")]
            debug!("Memory exchange cancelled");
        }
    }
}
