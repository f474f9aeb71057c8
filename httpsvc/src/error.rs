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

//! Top-level error types for httpsvc.
//!
//! Errors are layered by the phase in which they occur:
//!
//! 1. **Configuration** ([`ConfigurationError`]): detected while building a
//!    factory or a client. Fatal; no client is produced.
//! 2. **Resolution** ([`ResolutionError`]): an argument of one call could not
//!    be turned into a request component. Fails that call only.
//! 3. **Exchange** ([`ExchangeError`]): reported by the transport and passed
//!    through unchanged.
//!
//! [`HttpServiceError`] composes these layers and adds the failures owned by
//! the invocation pipeline itself: blocking timeouts, blocking from inside a
//! runtime, and misuse of the dynamic client.
//!
//! # Examples
//!
//! ```rust
//! use httpsvc::HttpServiceError;
//! use httpsvc::service::ConfigurationError;
//! use httpsvc::transport::ExchangeError;
//!
//! let error: HttpServiceError = ConfigurationError::MissingExchangeAdapter.into();
//! assert!(error.is_configuration_error());
//!
//! let error: HttpServiceError = ExchangeError::Cancelled.into();
//! assert!(error.is_exchange_error());
//! ```

use crate::resolver::ResolutionError;
use crate::service::ConfigurationError;
use crate::transport::ExchangeError;
use std::error::Error as StdError;
use std::fmt;
use std::time::Duration;

/// Top-level error type for httpsvc operations.
#[derive(Debug)]
pub enum HttpServiceError {
    /// Building a factory or client failed.
    Configuration(ConfigurationError),

    /// An argument could not be resolved into the request.
    Resolution(ResolutionError),

    /// The transport reported a failure.
    Exchange(ExchangeError),

    /// A blocking call did not complete within the configured bound.
    ///
    /// Distinct from [`ExchangeError`] so that callers can tell a slow
    /// server apart from one that answered with a failure.
    Timeout {
        /// The bound that was exceeded.
        duration: Duration,
    },

    /// A blocking call was made from inside a current-thread Tokio runtime.
    ///
    /// Parking that thread would stall the only thread able to complete the
    /// response, so the call is refused instead.
    BlockingInRuntime,

    /// The client has no method with this name.
    UnknownMethod {
        /// The requested method name.
        method: String,
    },

    /// The number of arguments does not match the method definition.
    ArgumentCount {
        /// The method name.
        method: String,
        /// Declared parameter count.
        expected: usize,
        /// Supplied argument count.
        actual: usize,
    },

    /// The invocation produced a different outcome than the caller expected.
    UnexpectedOutcome {
        /// Description of the expected outcome.
        expected: &'static str,
    },

    /// A response payload could not be decoded.
    Decode(serde_json::Error),

    /// An error raised by a default method body.
    Application(Box<dyn StdError + Send + Sync>),
}

impl HttpServiceError {
    /// Returns `true` if this is a configuration error.
    #[must_use]
    pub const fn is_configuration_error(&self) -> bool {
        matches!(self, Self::Configuration(_))
    }

    /// Returns `true` if this is a resolution error.
    #[must_use]
    pub const fn is_resolution_error(&self) -> bool {
        matches!(self, Self::Resolution(_))
    }

    /// Returns `true` if this error was reported by the transport.
    #[must_use]
    pub const fn is_exchange_error(&self) -> bool {
        matches!(self, Self::Exchange(_))
    }

    /// Returns `true` if a blocking call timed out.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use httpsvc::HttpServiceError;
    /// use std::time::Duration;
    ///
    /// let error = HttpServiceError::Timeout { duration: Duration::from_secs(5) };
    /// assert!(error.is_timeout());
    /// assert!(!error.is_exchange_error());
    /// ```
    #[must_use]
    pub const fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }

    /// Returns `true` if this error signals incorrect use of the API rather
    /// than a runtime failure.
    ///
    /// Misuse errors are programming errors and should not be retried.
    #[must_use]
    pub const fn is_misuse(&self) -> bool {
        matches!(
            self,
            Self::BlockingInRuntime
                | Self::UnknownMethod { .. }
                | Self::ArgumentCount { .. }
                | Self::UnexpectedOutcome { .. }
        )
    }

    /// Returns the transport error, if any.
    #[must_use]
    pub fn as_exchange_error(&self) -> Option<&ExchangeError> {
        match self {
            Self::Exchange(e) => Some(e),
            _ => None,
        }
    }
}

impl fmt::Display for HttpServiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Configuration(e) => write!(f, "configuration error: {}", e),
            Self::Resolution(e) => write!(f, "argument resolution failed: {}", e),
            Self::Exchange(e) => write!(f, "exchange failed: {}", e),
            Self::Timeout { duration } => {
                write!(f, "timed out after {:?} waiting for response", duration)
            }
            Self::BlockingInRuntime => write!(
                f,
                "blocking call made from inside a current-thread Tokio runtime; use an async return type instead"
            ),
            Self::UnknownMethod { method } => write!(f, "unknown method '{}'", method),
            Self::ArgumentCount {
                method,
                expected,
                actual,
            } => write!(
                f,
                "method '{}' expects {} argument(s), got {}",
                method, expected, actual
            ),
            Self::UnexpectedOutcome { expected } => {
                write!(f, "invocation did not produce {}", expected)
            }
            Self::Decode(e) => write!(f, "failed to decode response: {}", e),
            Self::Application(e) => write!(f, "application error: {}", e),
        }
    }
}

impl StdError for HttpServiceError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Self::Configuration(e) => Some(e),
            Self::Resolution(e) => Some(e),
            Self::Exchange(e) => Some(e),
            Self::Decode(e) => Some(e),
            Self::Application(e) => Some(e.as_ref()),
            _ => None,
        }
    }
}

impl From<ConfigurationError> for HttpServiceError {
    fn from(error: ConfigurationError) -> Self {
        Self::Configuration(error)
    }
}

impl From<ResolutionError> for HttpServiceError {
    fn from(error: ResolutionError) -> Self {
        Self::Resolution(error)
    }
}

impl From<ExchangeError> for HttpServiceError {
    fn from(error: ExchangeError) -> Self {
        Self::Exchange(error)
    }
}

impl From<serde_json::Error> for HttpServiceError {
    fn from(error: serde_json::Error) -> Self {
        Self::Decode(error)
    }
}
