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

#![doc = include_str!("../../README.md")]
#![allow(clippy::module_inception)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

//! # httpsvc - Declarative HTTP Service Clients
//!
//! httpsvc turns a description of an HTTP API, a set of method
//! definitions with annotated parameters, into a client whose calls become
//! HTTP requests:
//!
//! - **Resolver chain**: each parameter is bound once to the resolver that
//!   turns its argument into a header, path variable, query parameter,
//!   cookie, body, attribute, URL or verb
//! - **Request templates**: verb, URL, content type and fixed headers are
//!   merged from service and method level when the client is built
//! - **Return shapes**: blocking with a bounded wait, asynchronous handles
//!   of any registered type, or fire-and-forget
//! - **Pluggable transports**: anything implementing
//!   [`HttpExchangeAdapter`](transport::HttpExchangeAdapter)
//! - **Observability**: `tracing` events and `metrics` counters behind the
//!   `observability` feature
//!
//! ## Architecture
//!
//! - **[`service`]**: definitions, the factory, clients and the dispatcher
//! - **[`resolver`]**: the argument resolver chain
//! - **[`request`]**: per-call request values and the finished request
//! - **[`adapter`]**: the canonical publisher and the reactive adapter registry
//! - **[`transport`]**: the transport seam and an in-memory transport
//! - **[`observability`]**: client metrics
//!
//! ## Error Handling
//!
//! Build-time problems are [`ConfigurationError`](service::ConfigurationError)s
//! and never surface at call time. Call-time failures are
//! [`HttpServiceError`]s; see [`error`] for the layering.

pub mod adapter;
pub mod argument;
pub mod conversion;
pub mod error;
pub mod observability;
pub mod placeholder;
pub mod request;
pub mod resolver;
pub mod service;
pub mod transport;

pub use argument::Argument;
pub use conversion::{ConversionService, DefaultConversionService};
pub use error::HttpServiceError;
pub use observability::ClientMetrics;
pub use placeholder::{EmbeddedValueResolver, PropertyPlaceholderResolver};
pub use resolver::{HttpServiceArgumentResolver, MethodParameter, ResolutionError};
pub use service::{
    ConfigurationError, HttpService, HttpServiceClient, HttpServiceDefinition,
    HttpServiceProxyFactory, HttpServiceProxyFactoryBuilder, Outcome, ProxyFactoryConfig,
};
pub use transport::{ExchangeError, HttpExchangeAdapter};
