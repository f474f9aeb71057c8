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

//! Transport layer error types.
//!
//! Exchange errors are reported by an [`HttpExchangeAdapter`](super::HttpExchangeAdapter)
//! and travel through the response publisher unchanged. The invocation
//! pipeline never retries them; they surface to the caller in whatever form
//! the method's return shape expresses failure:
//!
//! - **Blocking** methods return them as `Err`
//! - **Async** methods resolve the returned future to `Err`
//! - **Streaming** methods terminate the stream with an `Err` item

use bytes::Bytes;
use http::StatusCode;
use std::io;
use thiserror::Error;

/// Errors reported by the HTTP transport.
///
/// # Examples
///
/// ```rust
/// use httpsvc::transport::ExchangeError;
/// use http::StatusCode;
///
/// let error = ExchangeError::Status {
///     status: StatusCode::NOT_FOUND,
///     body: bytes::Bytes::from_static(b"no such user"),
/// };
/// assert_eq!(error.status(), Some(StatusCode::NOT_FOUND));
/// assert!(!error.is_recoverable());
/// ```
#[derive(Debug, Error)]
pub enum ExchangeError {
    /// The server answered with a non-success status.
    #[error("request failed with status {status}")]
    Status {
        /// The response status.
        status: StatusCode,
        /// The response body, possibly empty.
        body: Bytes,
    },

    /// The connection could not be established or was lost mid-exchange.
    #[error("connection failed: {reason}")]
    Connection {
        /// Description of the failure.
        reason: String,
    },

    /// An I/O error occurred while reading or writing the exchange.
    #[error("I/O error: {source}")]
    Io {
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// The exchange was cancelled before it completed.
    #[error("exchange was cancelled")]
    Cancelled,

    /// A transport-specific failure that fits no other category.
    #[error("transport error: {source}")]
    Other {
        /// The underlying error.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl ExchangeError {
    /// Creates a connection error from a reason string.
    pub fn connection(reason: impl Into<String>) -> Self {
        Self::Connection {
            reason: reason.into(),
        }
    }

    /// Wraps an arbitrary transport error.
    pub fn other(source: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Other {
            source: Box::new(source),
        }
    }

    /// Returns the response status for [`ExchangeError::Status`].
    #[must_use]
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns `true` if retrying the same request might succeed.
    ///
    /// Connection and I/O failures and `5xx` responses are considered
    /// transient. Retrying is left to the caller or the transport.
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::Status { status, .. } => status.is_server_error(),
            Self::Connection { .. } | Self::Io { .. } => true,
            Self::Cancelled | Self::Other { .. } => false,
        }
    }
}

impl From<io::Error> for ExchangeError {
    fn from(source: io::Error) -> Self {
        Self::Io { source }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_accessor() {
        let error = ExchangeError::Status {
            status: StatusCode::BAD_GATEWAY,
            body: Bytes::new(),
        };
        assert_eq!(error.status(), Some(StatusCode::BAD_GATEWAY));
        assert_eq!(ExchangeError::Cancelled.status(), None);
    }

    #[test]
    fn test_recoverability() {
        let server = ExchangeError::Status {
            status: StatusCode::SERVICE_UNAVAILABLE,
            body: Bytes::new(),
        };
        assert!(server.is_recoverable());

        let client = ExchangeError::Status {
            status: StatusCode::BAD_REQUEST,
            body: Bytes::new(),
        };
        assert!(!client.is_recoverable());

        assert!(ExchangeError::connection("refused").is_recoverable());
        assert!(!ExchangeError::Cancelled.is_recoverable());
    }

    #[test]
    fn test_from_io_error() {
        let error: ExchangeError = io::Error::other("broken pipe").into();
        assert!(matches!(error, ExchangeError::Io { .. }));
        assert!(error.to_string().contains("broken pipe"));
    }
}
