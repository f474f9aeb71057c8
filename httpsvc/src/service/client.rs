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

//! The dynamic client and the typed-service seam.

use crate::adapter::{Payload, ResponseEntity, ResponseHead};
use crate::observability::ClientMetrics;
use crate::service::{DefaultMethodHandler, HttpServiceDefinition, HttpServiceMethod};
use crate::{Argument, HttpServiceError};
use bytes::Bytes;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
#[cfg(feature = "observability")]
use tracing::debug;

/// The result of one invocation.
pub enum Outcome {
    /// A blocking method's value, or a default method's result.
    Value(Option<Payload>),
    /// A reactive method's handle, of the declared return type.
    Reactive(Box<dyn Any + Send>),
    /// A fire-and-forget method was started.
    Detached,
}

impl Outcome {
    /// A value holding `value` encoded as a JSON body.
    ///
    /// Convenient for default methods that compute a result locally.
    ///
    /// # Errors
    ///
    /// Returns [`HttpServiceError::Decode`] if `value` cannot be encoded.
    pub fn json<T: Serialize>(value: &T) -> Result<Self, HttpServiceError> {
        let body = serde_json::to_vec(value)?;
        Ok(Self::Value(Some(Payload::Data(Bytes::from(body)))))
    }

    /// Returns `true` for [`Outcome::Detached`].
    #[must_use]
    pub const fn is_detached(&self) -> bool {
        matches!(self, Self::Detached)
    }

    /// Unwraps a value.
    ///
    /// # Errors
    ///
    /// Returns [`HttpServiceError::UnexpectedOutcome`] for any other outcome.
    pub fn into_payload(self) -> Result<Option<Payload>, HttpServiceError> {
        match self {
            Self::Value(value) => Ok(value),
            _ => Err(HttpServiceError::UnexpectedOutcome { expected: "a value" }),
        }
    }

    /// Decodes a value's body as JSON.
    ///
    /// # Errors
    ///
    /// Returns [`HttpServiceError::UnexpectedOutcome`] if there is no body
    /// and [`HttpServiceError::Decode`] if it is not valid JSON for `T`.
    pub fn into_json<T: DeserializeOwned>(self) -> Result<T, HttpServiceError> {
        self.into_payload()?
            .ok_or(HttpServiceError::UnexpectedOutcome { expected: "a body" })?
            .json()
    }

    /// Unwraps a value holding a head or an entity.
    ///
    /// # Errors
    ///
    /// Returns [`HttpServiceError::UnexpectedOutcome`] for any other outcome.
    pub fn into_head(self) -> Result<ResponseHead, HttpServiceError> {
        self.into_payload()?
            .and_then(Payload::into_head)
            .ok_or(HttpServiceError::UnexpectedOutcome { expected: "a response head" })
    }

    /// Unwraps a value holding an entity.
    ///
    /// # Errors
    ///
    /// Returns [`HttpServiceError::UnexpectedOutcome`] for any other outcome.
    pub fn into_entity(self) -> Result<ResponseEntity, HttpServiceError> {
        self.into_payload()?
            .and_then(Payload::into_entity)
            .ok_or(HttpServiceError::UnexpectedOutcome { expected: "a response entity" })
    }

    /// Discards a value, or accepts a detached call.
    ///
    /// # Errors
    ///
    /// Returns [`HttpServiceError::UnexpectedOutcome`] for a reactive handle,
    /// which would otherwise be dropped unobserved.
    pub fn into_unit(self) -> Result<(), HttpServiceError> {
        match self {
            Self::Value(_) | Self::Detached => Ok(()),
            Self::Reactive(_) => Err(HttpServiceError::UnexpectedOutcome {
                expected: "a value or a detached call",
            }),
        }
    }

    /// Unwraps a reactive handle of type `T`.
    ///
    /// # Errors
    ///
    /// Returns [`HttpServiceError::UnexpectedOutcome`] if the outcome is not
    /// a handle of type `T`.
    pub fn into_reactive<T: Any>(self) -> Result<T, HttpServiceError> {
        let unexpected = HttpServiceError::UnexpectedOutcome {
            expected: "a reactive handle of the requested type",
        };
        match self {
            Self::Reactive(handle) => handle.downcast::<T>().map(|h| *h).map_err(|_| unexpected),
            _ => Err(unexpected),
        }
    }
}

impl fmt::Debug for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Value(value) => f.debug_tuple("Value").field(value).finish(),
            Self::Reactive(_) => f.write_str("Reactive(..)"),
            Self::Detached => f.write_str("Detached"),
        }
    }
}

enum MethodEntry {
    Remote(HttpServiceMethod),
    Default(DefaultMethodHandler),
}

struct ClientInner {
    service: String,
    methods: HashMap<String, MethodEntry>,
    metrics: Arc<ClientMetrics>,
}

/// A built client for one service.
///
/// Calls are routed by method name. Remote operations go through their
/// [`HttpServiceMethod`]; default methods run their own body with this
/// client and never reach the transport. Cloning is cheap and clones share
/// everything.
///
/// # Examples
///
/// ```rust
/// use httpsvc::service::{
///     ExchangeDefinition, HttpServiceDefinition, HttpServiceProxyFactory, MethodDefinition,
///     ParamAnnotation, ParameterDefinition,
/// };
/// use httpsvc::transport::{MemoryExchangeAdapter, ScriptedResponse};
/// use httpsvc::Argument;
///
/// let transport = MemoryExchangeAdapter::new();
/// transport.enqueue(ScriptedResponse::ok().with_json(&serde_json::json!({"id": 7})));
///
/// let factory = HttpServiceProxyFactory::builder_for(transport.clone()).build().unwrap();
/// let client = factory
///     .create_client_from_definition(
///         &HttpServiceDefinition::new("Users").method(
///             MethodDefinition::exchange("get", ExchangeDefinition::get("http://h/users/{id}"))
///                 .param(ParameterDefinition::of::<u64>("id").annotated(ParamAnnotation::path_variable())),
///         ),
///     )
///     .unwrap();
///
/// let user: serde_json::Value = client.invoke("get", vec![Argument::from(7u64)]).unwrap().into_json().unwrap();
/// assert_eq!(user["id"], 7);
/// assert_eq!(transport.take_requests()[0].url, "http://h/users/7");
/// ```
#[derive(Clone)]
pub struct HttpServiceClient {
    inner: Arc<ClientInner>,
}

impl HttpServiceClient {
    pub(crate) fn new(
        service: String,
        remote: Vec<HttpServiceMethod>,
        defaults: Vec<(String, DefaultMethodHandler)>,
        metrics: Arc<ClientMetrics>,
    ) -> Self {
        let mut methods = HashMap::with_capacity(remote.len() + defaults.len());
        for method in remote {
            methods.insert(method.name().to_string(), MethodEntry::Remote(method));
        }
        for (name, handler) in defaults {
            methods.insert(name, MethodEntry::Default(handler));
        }
        Self {
            inner: Arc::new(ClientInner {
                service,
                methods,
                metrics,
            }),
        }
    }

    /// The service name.
    #[must_use]
    pub fn service_name(&self) -> &str {
        &self.inner.service
    }

    /// Calls `method` with `arguments`.
    ///
    /// # Errors
    ///
    /// - [`HttpServiceError::UnknownMethod`] if the service declares no such
    ///   remote or default method
    /// - Anything [`HttpServiceMethod::invoke`] or the default body returns
    pub fn invoke(&self, method: &str, arguments: Vec<Argument>) -> Result<Outcome, HttpServiceError> {
        match self.inner.methods.get(method) {
            Some(MethodEntry::Remote(remote)) => remote.invoke(arguments),
            Some(MethodEntry::Default(handler)) => {
                self.inner.metrics.record_default_method_call();
                #[cfg(feature = "observability")]
                debug!(service = %self.inner.service, method, "Invoking default method");
                handler(self, arguments)
            }
            None => Err(HttpServiceError::UnknownMethod {
                method: method.to_string(),
            }),
        }
    }

    /// The dispatcher of a remote method.
    #[must_use]
    pub fn method(&self, name: &str) -> Option<&HttpServiceMethod> {
        match self.inner.methods.get(name) {
            Some(MethodEntry::Remote(method)) => Some(method),
            _ => None,
        }
    }

    /// Returns `true` if `name` is a remote operation.
    #[must_use]
    pub fn is_remote(&self, name: &str) -> bool {
        self.method(name).is_some()
    }

    /// Names of every callable method, in no particular order.
    pub fn method_names(&self) -> impl Iterator<Item = &str> {
        self.inner.methods.keys().map(String::as_str)
    }

    /// Metrics shared with the factory that built this client.
    #[must_use]
    pub fn metrics(&self) -> &ClientMetrics {
        &self.inner.metrics
    }
}

impl fmt::Debug for HttpServiceClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&str> = self.method_names().collect();
        names.sort_unstable();
        f.debug_struct("HttpServiceClient")
            .field("service", &self.inner.service)
            .field("methods", &names)
            .finish()
    }
}

/// A typed service interface backed by a client.
///
/// Implementors describe themselves once and wrap the built client; their
/// methods convert typed arguments into [`Argument`]s and delegate to
/// [`HttpServiceClient::invoke`].
///
/// ```rust
/// use httpsvc::service::{
///     ExchangeDefinition, HttpService, HttpServiceClient, HttpServiceDefinition,
///     HttpServiceProxyFactory, MethodDefinition,
/// };
/// use httpsvc::transport::{MemoryExchangeAdapter, ScriptedResponse};
/// use httpsvc::HttpServiceError;
///
/// struct Health(HttpServiceClient);
///
/// impl HttpService for Health {
///     fn definition() -> HttpServiceDefinition {
///         HttpServiceDefinition::new("Health")
///             .method(MethodDefinition::exchange("status", ExchangeDefinition::get("http://h/health")))
///     }
///
///     fn from_client(client: HttpServiceClient) -> Self {
///         Self(client)
///     }
/// }
///
/// impl Health {
///     fn status(&self) -> Result<String, HttpServiceError> {
///         self.0.invoke("status", Vec::new())?.into_json()
///     }
/// }
///
/// let transport = MemoryExchangeAdapter::new()
///     .with_default_response(ScriptedResponse::ok().with_json(&"UP"));
/// let factory = HttpServiceProxyFactory::builder_for(transport).build().unwrap();
/// let health: Health = factory.create_client().unwrap();
/// assert_eq!(health.status().unwrap(), "UP");
/// ```
pub trait HttpService: Sized {
    /// Describes the service.
    fn definition() -> HttpServiceDefinition;

    /// Wraps a client built from [`HttpService::definition`].
    fn from_client(client: HttpServiceClient) -> Self;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_json_roundtrip() {
        let outcome = Outcome::json(&vec![1, 2]).unwrap();
        let values: Vec<u32> = outcome.into_json().unwrap();
        assert_eq!(values, vec![1, 2]);
    }

    #[test]
    fn test_into_reactive_wrong_type() {
        let outcome = Outcome::Reactive(Box::new(5u8));
        assert!(matches!(
            outcome.into_reactive::<String>(),
            Err(HttpServiceError::UnexpectedOutcome { .. })
        ));
        assert_eq!(Outcome::Reactive(Box::new(5u8)).into_reactive::<u8>().unwrap(), 5);
    }

    #[test]
    fn test_into_unit() {
        assert!(Outcome::Detached.into_unit().is_ok());
        assert!(Outcome::Value(None).into_unit().is_ok());
        assert!(Outcome::Reactive(Box::new(())).into_unit().is_err());
        assert!(Outcome::Detached.into_payload().is_err());
    }

    #[test]
    fn test_unknown_method() {
        let client = HttpServiceClient::new("S".to_string(), Vec::new(), Vec::new(), Arc::default());
        assert!(matches!(
            client.invoke("missing", Vec::new()),
            Err(HttpServiceError::UnknownMethod { .. })
        ));
    }

    #[test]
    fn test_default_method_routed() {
        let handler: DefaultMethodHandler = Arc::new(|client: &HttpServiceClient, args: Vec<Argument>| {
            Outcome::json(&format!("{}:{}", client.service_name(), args.len()))
        });
        let client = HttpServiceClient::new(
            "S".to_string(),
            Vec::new(),
            vec![("greet".to_string(), handler)],
            Arc::default(),
        );
        let greeting: String = client
            .invoke("greet", vec![Argument::Null])
            .unwrap()
            .into_json()
            .unwrap();
        assert_eq!(greeting, "S:1");
        assert_eq!(client.metrics().total_default_method_calls(), 1);
        assert!(!client.is_remote("greet"));
    }
}
