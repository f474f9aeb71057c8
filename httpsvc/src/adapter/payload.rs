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

//! The canonical asynchronous representation shared by transports, the
//! dispatcher and the adapter registry.

use crate::HttpServiceError;
use bytes::Bytes;
use futures::future::BoxFuture;
use futures::stream::{BoxStream, Stream};
use http::{HeaderMap, StatusCode};
use serde::de::DeserializeOwned;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

/// A lazy producer of zero, one or many payloads.
///
/// Nothing happens until the publisher is polled, and dropping it cancels
/// whatever work is still outstanding.
pub type Publisher = BoxStream<'static, Result<Payload, HttpServiceError>>;

/// Status line and headers of a response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseHead {
    /// The response status.
    pub status: StatusCode,
    /// The response headers.
    pub headers: HeaderMap,
}

impl ResponseHead {
    /// Creates a head with the given status and no headers.
    #[must_use]
    pub fn new(status: StatusCode) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
        }
    }
}

/// A complete response: status, headers and the aggregated body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseEntity {
    /// The response status.
    pub status: StatusCode,
    /// The response headers.
    pub headers: HeaderMap,
    /// The full response body.
    pub body: Bytes,
}

impl ResponseEntity {
    /// Decodes the body as JSON.
    ///
    /// # Errors
    ///
    /// Returns [`HttpServiceError::Decode`] if the body is not valid JSON for `T`.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, HttpServiceError> {
        Ok(serde_json::from_slice(&self.body)?)
    }
}

/// One element of a [`Publisher`].
///
/// A transport emits one [`Payload::Head`] followed by zero or more
/// [`Payload::Data`] chunks. Response functions reshape that sequence into
/// whatever the method declared, e.g. a single [`Payload::Entity`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload {
    /// Status and headers.
    Head(ResponseHead),
    /// A chunk of body data.
    Data(Bytes),
    /// A complete response.
    Entity(ResponseEntity),
}

impl Payload {
    /// Returns the body bytes carried by this payload, if any.
    #[must_use]
    pub fn as_bytes(&self) -> Option<&Bytes> {
        match self {
            Self::Data(bytes) => Some(bytes),
            Self::Entity(entity) => Some(&entity.body),
            Self::Head(_) => None,
        }
    }

    /// Decodes the body bytes as JSON.
    ///
    /// # Errors
    ///
    /// Returns [`HttpServiceError::UnexpectedOutcome`] for a head-only
    /// payload and [`HttpServiceError::Decode`] for malformed JSON.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use httpsvc::adapter::Payload;
    ///
    /// let payload = Payload::Data(bytes::Bytes::from_static(b"[1,2,3]"));
    /// let numbers: Vec<u32> = payload.json().unwrap();
    /// assert_eq!(numbers, vec![1, 2, 3]);
    /// ```
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, HttpServiceError> {
        let bytes = self
            .as_bytes()
            .ok_or(HttpServiceError::UnexpectedOutcome {
                expected: "a payload with a body",
            })?;
        Ok(serde_json::from_slice(bytes)?)
    }

    /// Returns the head of a [`Payload::Head`] or [`Payload::Entity`].
    #[must_use]
    pub fn into_head(self) -> Option<ResponseHead> {
        match self {
            Self::Head(head) => Some(head),
            Self::Entity(entity) => Some(ResponseHead {
                status: entity.status,
                headers: entity.headers,
            }),
            Self::Data(_) => None,
        }
    }

    /// Returns the entity of a [`Payload::Entity`].
    #[must_use]
    pub fn into_entity(self) -> Option<ResponseEntity> {
        match self {
            Self::Entity(entity) => Some(entity),
            _ => None,
        }
    }
}

/// A future resolving to at most one payload.
///
/// This is the async return type for single-value methods.
pub struct PayloadFuture(BoxFuture<'static, Result<Option<Payload>, HttpServiceError>>);

impl PayloadFuture {
    /// Wraps a future.
    pub fn new<F>(future: F) -> Self
    where
        F: Future<Output = Result<Option<Payload>, HttpServiceError>> + Send + 'static,
    {
        Self(Box::pin(future))
    }

    /// Awaits the payload and decodes it as JSON.
    ///
    /// # Errors
    ///
    /// Fails with the exchange error, with [`HttpServiceError::UnexpectedOutcome`]
    /// when the response had no body, or with a decode error.
    pub async fn json<T: DeserializeOwned>(self) -> Result<T, HttpServiceError> {
        match self.await? {
            Some(payload) => payload.json(),
            None => Err(HttpServiceError::UnexpectedOutcome {
                expected: "a response body",
            }),
        }
    }
}

impl Future for PayloadFuture {
    type Output = Result<Option<Payload>, HttpServiceError>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        self.0.as_mut().poll(cx)
    }
}

impl fmt::Debug for PayloadFuture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PayloadFuture(..)")
    }
}

/// A stream of payloads, the return type for multi-value methods.
///
/// Dropping the stream before it ends cancels the underlying exchange.
pub struct PayloadStream(Publisher);

impl PayloadStream {
    /// Wraps a publisher.
    #[must_use]
    pub fn new(publisher: Publisher) -> Self {
        Self(publisher)
    }

    /// Unwraps the publisher.
    #[must_use]
    pub fn into_inner(self) -> Publisher {
        self.0
    }
}

impl Stream for PayloadStream {
    type Item = Result<Payload, HttpServiceError>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.0.as_mut().poll_next(cx)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.0.size_hint()
    }
}

impl fmt::Debug for PayloadStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PayloadStream(..)")
    }
}

/// A future that completes when the exchange finishes, discarding any payload.
pub struct CompletionFuture(BoxFuture<'static, Result<(), HttpServiceError>>);

impl CompletionFuture {
    /// Wraps a future.
    pub fn new<F>(future: F) -> Self
    where
        F: Future<Output = Result<(), HttpServiceError>> + Send + 'static,
    {
        Self(Box::pin(future))
    }
}

impl Future for CompletionFuture {
    type Output = Result<(), HttpServiceError>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        self.0.as_mut().poll(cx)
    }
}

impl fmt::Debug for CompletionFuture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("CompletionFuture(..)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::StreamExt;

    #[test]
    fn test_entity_json() {
        let entity = ResponseEntity {
            status: StatusCode::OK,
            headers: HeaderMap::new(),
            body: Bytes::from_static(br#"{"id":7}"#),
        };
        let value: serde_json::Value = entity.json().unwrap();
        assert_eq!(value["id"], 7);
    }

    #[test]
    fn test_head_has_no_body() {
        let payload = Payload::Head(ResponseHead::new(StatusCode::OK));
        assert!(payload.as_bytes().is_none());
        assert!(payload.json::<u32>().is_err());
    }

    #[test]
    fn test_entity_into_head() {
        let payload = Payload::Entity(ResponseEntity {
            status: StatusCode::CREATED,
            headers: HeaderMap::new(),
            body: Bytes::new(),
        });
        assert_eq!(payload.into_head().unwrap().status, StatusCode::CREATED);
    }

    #[tokio::test]
    async fn test_payload_future_json() {
        let future = PayloadFuture::new(async { Ok(Some(Payload::Data(Bytes::from_static(b"12")))) });
        assert_eq!(future.json::<u32>().await.unwrap(), 12);

        let empty = PayloadFuture::new(async { Ok(None) });
        assert!(empty.json::<u32>().await.is_err());
    }

    #[tokio::test]
    async fn test_payload_stream_yields_publisher_items() {
        let publisher: Publisher = futures::stream::iter(vec![
            Ok(Payload::Data(Bytes::from_static(b"a"))),
            Ok(Payload::Data(Bytes::from_static(b"b"))),
        ])
        .boxed();
        let items: Vec<_> = PayloadStream::new(publisher).collect().await;
        assert_eq!(items.len(), 2);
    }
}
