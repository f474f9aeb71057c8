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

//! The per-method dispatcher.

use crate::adapter::{Payload, Publisher, block_on_deadline};
use crate::observability::ClientMetrics;
use crate::request::HttpRequest;
use crate::service::descriptor::{HttpRequestTemplate, ServiceDescriptor};
use crate::service::response::{body_stream, drain, single_value, single_value_publisher};
use crate::service::{Outcome, ResponseKind, ReturnShape, ReturnType, TaskSpawner};
use crate::transport::HttpExchangeAdapter;
use crate::{Argument, HttpServiceError};
use futures::FutureExt;
use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};
#[cfg(feature = "observability")]
use tracing::{debug, instrument, warn};

/// State shared by every method of every client a factory builds.
pub(crate) struct ClientRuntime {
    pub transport: Arc<dyn HttpExchangeAdapter>,
    pub spawner: Arc<dyn TaskSpawner>,
    pub block_timeout: Duration,
    #[cfg_attr(not(feature = "observability"), allow(dead_code))]
    pub log_detached_failures: bool,
    pub metrics: Arc<ClientMetrics>,
}

impl fmt::Debug for ClientRuntime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientRuntime")
            .field("spawner", &self.spawner)
            .field("block_timeout", &self.block_timeout)
            .field("log_detached_failures", &self.log_detached_failures)
            .finish_non_exhaustive()
    }
}

/// One remote method, bound and ready to dispatch.
///
/// A call runs through three phases: every argument is handed to its bound
/// resolver, the collected values are built into an [`HttpRequest`], and the
/// request goes to the transport. What happens to the response depends on
/// the declared [`ReturnShape`]:
///
/// - **Blocking**: the calling thread waits, at most for the block timeout
/// - **Reactive**: a handle of the declared type is returned at once
/// - **Fire and forget**: the exchange runs on the task spawner and the
///   call returns [`Outcome::Detached`]
///
/// Methods are immutable and safe to call from any number of threads.
#[derive(Clone)]
pub struct HttpServiceMethod {
    descriptor: Arc<ServiceDescriptor>,
    runtime: Arc<ClientRuntime>,
}

impl HttpServiceMethod {
    pub(crate) fn new(descriptor: ServiceDescriptor, runtime: Arc<ClientRuntime>) -> Self {
        Self {
            descriptor: Arc::new(descriptor),
            runtime,
        }
    }

    /// The method name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.descriptor.name
    }

    /// The derived request template.
    #[must_use]
    pub fn template(&self) -> &HttpRequestTemplate {
        &self.descriptor.template
    }

    /// The declared return type.
    #[must_use]
    pub fn return_type(&self) -> ReturnType {
        self.descriptor.return_type
    }

    /// Number of declared parameters.
    #[must_use]
    pub fn arity(&self) -> usize {
        self.descriptor.bindings.len()
    }

    /// Resolves `arguments` into a request without sending it.
    ///
    /// # Errors
    ///
    /// - [`HttpServiceError::ArgumentCount`] if the count differs from the declaration
    /// - Any error raised by a resolver, usually [`HttpServiceError::Resolution`]
    pub fn resolve(&self, arguments: Vec<Argument>) -> Result<HttpRequest, HttpServiceError> {
        let descriptor = &self.descriptor;
        if arguments.len() != descriptor.bindings.len() {
            return Err(HttpServiceError::ArgumentCount {
                method: descriptor.name.to_string(),
                expected: descriptor.bindings.len(),
                actual: arguments.len(),
            });
        }

        let mut values = descriptor.template.new_request_values();
        for (argument, binding) in arguments.into_iter().zip(&descriptor.bindings) {
            binding
                .resolver
                .resolve(argument, &binding.parameter, &mut values)?;
        }
        Ok(values.build()?)
    }

    /// Dispatches one call.
    ///
    /// # Errors
    ///
    /// Resolution errors are returned for every shape. Blocking methods also
    /// return the exchange error, [`HttpServiceError::Timeout`] or
    /// [`HttpServiceError::BlockingInRuntime`]; reactive methods report
    /// exchange errors through the returned handle, and fire-and-forget
    /// methods only count and log them.
    #[cfg_attr(
        feature = "observability",
        instrument(
            level = "debug",
            skip(self, arguments),
            fields(service = %self.descriptor.service, method = %self.descriptor.name)
        )
    )]
    pub fn invoke(&self, arguments: Vec<Argument>) -> Result<Outcome, HttpServiceError> {
        let metrics = &self.runtime.metrics;
        metrics.record_invocation();

        let request = match self.resolve(arguments) {
            Ok(request) => request,
            Err(error) => {
                if error.is_resolution_error() {
                    metrics.record_resolution_failure();
                } else {
                    metrics.record_failure();
                }
                #[cfg(feature = "observability")]
                warn!(error = %error, "Failed to resolve arguments");
                return Err(error);
            }
        };

        #[cfg(feature = "observability")]
        debug!(verb = %request.method, url = %request.url, "Dispatching request");

        let publisher = self.runtime.transport.exchange(request);
        let kind = self.descriptor.return_type.kind();
        match self.descriptor.return_type.shape() {
            ReturnShape::Blocking => self.block(single_value(kind, publisher)),
            ReturnShape::Reactive { .. } => self.adapt(publisher),
            ReturnShape::FireAndForget => {
                self.detach(publisher);
                Ok(Outcome::Detached)
            }
        }
    }

    fn block(
        &self,
        response: impl Future<Output = Result<Option<Payload>, HttpServiceError>>,
    ) -> Result<Outcome, HttpServiceError> {
        let metrics = &self.runtime.metrics;
        let started = Instant::now();
        let result = block_on_deadline(response, self.runtime.block_timeout).and_then(|r| r);
        metrics.record_latency(started.elapsed());
        match result {
            Ok(value) => Ok(Outcome::Value(value)),
            Err(error) => {
                if error.is_timeout() {
                    metrics.record_timeout();
                } else {
                    metrics.record_failure();
                }
                #[cfg(feature = "observability")]
                warn!(error = %error, "Blocking call failed");
                Err(error)
            }
        }
    }

    fn adapt(&self, publisher: Publisher) -> Result<Outcome, HttpServiceError> {
        let adapter = self
            .descriptor
            .adapter
            .as_ref()
            .ok_or(HttpServiceError::UnexpectedOutcome {
                expected: "a reactive adapter",
            })?;
        let kind = self.descriptor.return_type.kind();
        let shaped = if adapter.descriptor().is_multi_value() && kind == ResponseKind::Body {
            body_stream(publisher)
        } else {
            single_value_publisher(kind, publisher)
        };
        Ok(Outcome::Reactive(adapter.from_publisher(shaped)))
    }

    fn detach(&self, publisher: Publisher) {
        let runtime = Arc::clone(&self.runtime);
        #[cfg(feature = "observability")]
        let method = Arc::clone(&self.descriptor.name);
        let task = async move {
            if let Err(_error) = drain(publisher).await {
                #[cfg(feature = "observability")]
                if runtime.log_detached_failures {
                    warn!(method = %method, error = %_error, "Detached request failed");
                }
                runtime.metrics.record_detached_failure();
            }
        };
        self.runtime.spawner.spawn(task.boxed());
    }
}

impl fmt::Debug for HttpServiceMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpServiceMethod")
            .field("descriptor", &self.descriptor)
            .finish_non_exhaustive()
    }
}
