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

//! Response functions: reshaping a transport publisher into what a method declared.
//!
//! A transport emits one head followed by body chunks. Every function here
//! checks the head first and turns a non-success status into
//! [`ExchangeError::Status`] carrying the aggregated body.

use crate::HttpServiceError;
use crate::adapter::{Payload, Publisher, ResponseEntity, ResponseHead};
use crate::service::ResponseKind;
use crate::transport::ExchangeError;
use bytes::{Bytes, BytesMut};
use futures::{StreamExt, future, stream};
use http::StatusCode;

/// How the transport's sequence began.
enum Start {
    Head(ResponseHead),
    Entity(ResponseEntity),
    /// Body data with no head; taken as an implicit `200 OK`.
    Data(Bytes),
    Empty,
}

async fn start(publisher: &mut Publisher) -> Result<Start, HttpServiceError> {
    match publisher.next().await.transpose()? {
        None => Ok(Start::Empty),
        Some(Payload::Head(head)) if head.status.is_success() => Ok(Start::Head(head)),
        Some(Payload::Head(head)) => {
            let body = collect_body(publisher, BytesMut::new()).await?;
            Err(status_error(head.status, body))
        }
        Some(Payload::Entity(entity)) if entity.status.is_success() => Ok(Start::Entity(entity)),
        Some(Payload::Entity(entity)) => Err(status_error(entity.status, entity.body)),
        Some(Payload::Data(chunk)) => Ok(Start::Data(chunk)),
    }
}

fn status_error(status: StatusCode, body: Bytes) -> HttpServiceError {
    ExchangeError::Status { status, body }.into()
}

async fn collect_body(publisher: &mut Publisher, mut body: BytesMut) -> Result<Bytes, HttpServiceError> {
    while let Some(item) = publisher.next().await {
        if let Some(chunk) = item?.as_bytes() {
            body.extend_from_slice(chunk);
        }
    }
    Ok(body.freeze())
}

/// Consumes the whole publisher and extracts at most one value of `kind`.
///
/// A body is `None` when the transport sent no body chunks at all.
pub(crate) async fn single_value(
    kind: ResponseKind,
    mut publisher: Publisher,
) -> Result<Option<Payload>, HttpServiceError> {
    let (head, mut body, mut has_body) = match start(&mut publisher).await? {
        Start::Empty => {
            return match kind {
                ResponseKind::Void | ResponseKind::Body => Ok(None),
                _ => Err(HttpServiceError::UnexpectedOutcome {
                    expected: "a response head",
                }),
            };
        }
        Start::Head(head) => (head, BytesMut::new(), false),
        Start::Entity(entity) => (
            ResponseHead {
                status: entity.status,
                headers: entity.headers,
            },
            BytesMut::from(&entity.body[..]),
            true,
        ),
        Start::Data(chunk) => (ResponseHead::new(StatusCode::OK), BytesMut::from(&chunk[..]), true),
    };

    while let Some(item) = publisher.next().await {
        if let Some(chunk) = item?.as_bytes() {
            body.extend_from_slice(chunk);
            has_body = true;
        }
    }

    Ok(match kind {
        ResponseKind::Void => None,
        ResponseKind::Headers => Some(Payload::Head(head)),
        ResponseKind::Body => has_body.then(|| Payload::Data(body.freeze())),
        ResponseKind::Entity => Some(Payload::Entity(ResponseEntity {
            status: head.status,
            headers: head.headers,
            body: body.freeze(),
        })),
        ResponseKind::BodilessEntity => Some(Payload::Entity(ResponseEntity {
            status: head.status,
            headers: head.headers,
            body: Bytes::new(),
        })),
    })
}

/// Wraps [`single_value`] as a publisher of zero or one element.
pub(crate) fn single_value_publisher(kind: ResponseKind, publisher: Publisher) -> Publisher {
    stream::once(single_value(kind, publisher))
        .filter_map(|result| future::ready(result.transpose()))
        .boxed()
}

/// Emits each body chunk as its own element once the head checks out.
///
/// Dropping the returned publisher drops the transport's, cancelling the exchange.
pub(crate) fn body_stream(mut publisher: Publisher) -> Publisher {
    stream::once(async move {
        match start(&mut publisher).await {
            Err(error) => stream::once(future::ready(Err(error))).boxed(),
            Ok(Start::Empty) => stream::empty().boxed(),
            Ok(Start::Entity(entity)) if entity.body.is_empty() => stream::empty().boxed(),
            Ok(Start::Entity(entity)) => {
                stream::once(future::ready(Ok(Payload::Data(entity.body)))).boxed()
            }
            Ok(Start::Head(_)) => data_only(publisher),
            Ok(Start::Data(chunk)) => stream::once(future::ready(Ok(Payload::Data(chunk))))
                .chain(data_only(publisher))
                .boxed(),
        }
    })
    .flatten()
    .boxed()
}

fn data_only(publisher: Publisher) -> Publisher {
    publisher
        .filter_map(|item| {
            future::ready(match item {
                Ok(Payload::Data(chunk)) => Some(Ok(Payload::Data(chunk))),
                Ok(Payload::Entity(entity)) => Some(Ok(Payload::Data(entity.body))),
                Ok(Payload::Head(_)) => None,
                Err(error) => Some(Err(error)),
            })
        })
        .boxed()
}

/// Runs the publisher to the end, discarding every value.
pub(crate) async fn drain(publisher: Publisher) -> Result<(), HttpServiceError> {
    single_value(ResponseKind::Void, publisher).await.map(|_| ())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn head(status: StatusCode) -> Result<Payload, HttpServiceError> {
        Ok(Payload::Head(ResponseHead::new(status)))
    }

    fn data(s: &'static str) -> Result<Payload, HttpServiceError> {
        Ok(Payload::Data(Bytes::from_static(s.as_bytes())))
    }

    fn publisher(items: Vec<Result<Payload, HttpServiceError>>) -> Publisher {
        stream::iter(items).boxed()
    }

    #[tokio::test]
    async fn test_body_concatenates_chunks() {
        let p = publisher(vec![head(StatusCode::OK), data("ab"), data("cd")]);
        let payload = single_value(ResponseKind::Body, p).await.unwrap().unwrap();
        assert_eq!(payload, Payload::Data(Bytes::from_static(b"abcd")));
    }

    #[tokio::test]
    async fn test_body_absent_without_chunks() {
        let p = publisher(vec![head(StatusCode::NO_CONTENT)]);
        assert!(single_value(ResponseKind::Body, p).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_entity_and_bodiless_entity() {
        let p = publisher(vec![head(StatusCode::CREATED), data("x")]);
        let entity = single_value(ResponseKind::Entity, p).await.unwrap().unwrap();
        let entity = entity.into_entity().unwrap();
        assert_eq!(entity.status, StatusCode::CREATED);
        assert_eq!(entity.body, Bytes::from_static(b"x"));

        let p = publisher(vec![head(StatusCode::CREATED), data("x")]);
        let entity = single_value(ResponseKind::BodilessEntity, p).await.unwrap().unwrap();
        assert!(entity.into_entity().unwrap().body.is_empty());
    }

    #[tokio::test]
    async fn test_headers_only() {
        let p = publisher(vec![head(StatusCode::ACCEPTED), data("ignored")]);
        let payload = single_value(ResponseKind::Headers, p).await.unwrap().unwrap();
        assert_eq!(payload.into_head().unwrap().status, StatusCode::ACCEPTED);
    }

    #[tokio::test]
    async fn test_error_status_carries_body() {
        let p = publisher(vec![head(StatusCode::NOT_FOUND), data("no "), data("such")]);
        let error = single_value(ResponseKind::Body, p).await.unwrap_err();
        match error.as_exchange_error() {
            Some(ExchangeError::Status { status, body }) => {
                assert_eq!(*status, StatusCode::NOT_FOUND);
                assert_eq!(body, &Bytes::from_static(b"no such"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_empty_publisher() {
        assert!(single_value(ResponseKind::Void, publisher(vec![])).await.unwrap().is_none());
        assert!(matches!(
            single_value(ResponseKind::Headers, publisher(vec![])).await,
            Err(HttpServiceError::UnexpectedOutcome { .. })
        ));
    }

    #[tokio::test]
    async fn test_body_stream_emits_chunks() {
        let p = publisher(vec![head(StatusCode::OK), data("a"), data("b")]);
        let items: Vec<_> = body_stream(p).collect().await;
        assert_eq!(items.len(), 2);
        assert_eq!(items[1].as_ref().unwrap(), &Payload::Data(Bytes::from_static(b"b")));
    }

    #[tokio::test]
    async fn test_body_stream_error_status() {
        let p = publisher(vec![head(StatusCode::BAD_GATEWAY)]);
        let items: Vec<_> = body_stream(p).collect().await;
        assert_eq!(items.len(), 1);
        assert!(items[0].as_ref().unwrap_err().is_exchange_error());
    }

    #[tokio::test]
    async fn test_drain_propagates_failure() {
        let p = publisher(vec![
            head(StatusCode::OK),
            Err(ExchangeError::connection("reset").into()),
        ]);
        assert!(drain(p).await.is_err());
    }
}
