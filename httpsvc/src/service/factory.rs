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

//! The factory that turns service definitions into clients.

use crate::adapter::ReactiveAdapterRegistry;
use crate::observability::ClientMetrics;
use crate::placeholder::EmbeddedValueResolver;
use crate::resolver::ArgumentResolverRef;
use crate::service::descriptor::{BuildContext, ServiceDescriptor};
use crate::service::method::ClientRuntime;
use crate::service::{
    ConfigurationError, HttpService, HttpServiceClient, HttpServiceDefinition,
    HttpServiceMethod, HttpServiceProxyFactoryBuilder, ProxyFactoryConfig, TaskSpawner,
};
use crate::transport::HttpExchangeAdapter;
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;
#[cfg(feature = "observability")]
use tracing::{debug, instrument};

/// Builds clients for service definitions.
///
/// A factory is assembled once by [`HttpServiceProxyFactoryBuilder`] and is
/// immutable afterwards. Every client it builds shares its transport,
/// resolver chain, adapter registry and metrics.
///
/// Building a client does all the work that can fail: templates are derived,
/// placeholders resolved and every parameter bound to a resolver. A client
/// is either complete or not produced at all.
pub struct HttpServiceProxyFactory {
    resolvers: Vec<ArgumentResolverRef>,
    embedded: Option<Arc<dyn EmbeddedValueResolver>>,
    registry: Arc<ReactiveAdapterRegistry>,
    config: ProxyFactoryConfig,
    runtime: Arc<ClientRuntime>,
}

impl HttpServiceProxyFactory {
    /// Starts a builder with no transport.
    #[must_use]
    pub fn builder() -> HttpServiceProxyFactoryBuilder {
        HttpServiceProxyFactoryBuilder::new()
    }

    /// Starts a builder with `transport`.
    #[must_use]
    pub fn builder_for(transport: impl HttpExchangeAdapter) -> HttpServiceProxyFactoryBuilder {
        HttpServiceProxyFactoryBuilder::new().exchange_adapter(transport)
    }

    pub(crate) fn new(
        transport: Arc<dyn HttpExchangeAdapter>,
        resolvers: Vec<ArgumentResolverRef>,
        embedded: Option<Arc<dyn EmbeddedValueResolver>>,
        registry: Arc<ReactiveAdapterRegistry>,
        spawner: Arc<dyn TaskSpawner>,
        config: ProxyFactoryConfig,
    ) -> Self {
        let runtime = Arc::new(ClientRuntime {
            transport,
            spawner,
            block_timeout: config.block_timeout,
            log_detached_failures: config.log_detached_failures,
            metrics: Arc::new(ClientMetrics::new()),
        });
        Self {
            resolvers,
            embedded,
            registry,
            config,
            runtime,
        }
    }

    /// Builds the typed client `S`.
    ///
    /// # Errors
    ///
    /// See [`HttpServiceProxyFactory::create_client_from_definition`].
    pub fn create_client<S: HttpService>(&self) -> Result<S, ConfigurationError> {
        let definition = S::definition();
        self.create_client_from_definition(&definition).map(S::from_client)
    }

    /// Builds a dynamic client for `definition`.
    ///
    /// Only remote operations and default methods are callable; any other
    /// declared method is ignored.
    ///
    /// # Errors
    ///
    /// - [`ConfigurationError::DuplicateMethod`] for a name declared twice
    /// - [`ConfigurationError::MissingHttpMethod`] if a remote method has no verb
    /// - [`ConfigurationError::UnresolvedParameter`] if no resolver claims a parameter
    /// - [`ConfigurationError::ConflictingOverrides`] for two URL or two verb parameters
    /// - [`ConfigurationError::UnsupportedReturnType`] for an unregistered reactive type
    /// - Any error from the embedded value resolver or a resolver's validation
    #[cfg_attr(
        feature = "observability",
        instrument(level = "debug", skip(self, definition), fields(service = %definition.name()))
    )]
    pub fn create_client_from_definition(
        &self,
        definition: &HttpServiceDefinition,
    ) -> Result<HttpServiceClient, ConfigurationError> {
        let context = BuildContext {
            resolvers: &self.resolvers,
            embedded: self.embedded.as_deref(),
            registry: &self.registry,
        };

        let mut seen = HashSet::new();
        let mut remote = Vec::new();
        let mut defaults = Vec::new();
        for method in definition.methods() {
            if !seen.insert(method.name()) {
                return Err(ConfigurationError::DuplicateMethod {
                    service: definition.name().to_string(),
                    method: method.name().to_string(),
                });
            }
            match (method.exchange_definition(), method.default_body()) {
                (Some(exchange), _) => {
                    let descriptor = ServiceDescriptor::build(definition, method, exchange, &context)?;
                    #[cfg(feature = "observability")]
                    debug!(
                        method = method.name(),
                        verb = %descriptor.template.method(),
                        url = descriptor.template.url(),
                        "Bound remote method"
                    );
                    remote.push(HttpServiceMethod::new(descriptor, Arc::clone(&self.runtime)));
                }
                (None, Some(handler)) => {
                    defaults.push((method.name().to_string(), Arc::clone(handler)));
                }
                (None, None) => {}
            }
        }

        Ok(HttpServiceClient::new(
            definition.name().to_string(),
            remote,
            defaults,
            Arc::clone(&self.runtime.metrics),
        ))
    }

    /// Metrics shared by every client this factory builds.
    #[must_use]
    pub fn metrics(&self) -> Arc<ClientMetrics> {
        Arc::clone(&self.runtime.metrics)
    }

    /// The configuration the factory was built with.
    #[must_use]
    pub const fn config(&self) -> &ProxyFactoryConfig {
        &self.config
    }

    /// The resolver chain, custom resolvers first.
    #[must_use]
    pub fn argument_resolvers(&self) -> &[ArgumentResolverRef] {
        &self.resolvers
    }

    /// The adapter registry.
    #[must_use]
    pub fn reactive_adapter_registry(&self) -> &Arc<ReactiveAdapterRegistry> {
        &self.registry
    }
}

impl fmt::Debug for HttpServiceProxyFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpServiceProxyFactory")
            .field("resolvers", &self.resolvers)
            .field("embedded", &self.embedded)
            .field("adapters", &self.registry.len())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Argument;
    use crate::service::{
        ExchangeDefinition, MethodDefinition, Outcome, ParamAnnotation, ParameterDefinition,
    };
    use crate::transport::{MemoryExchangeAdapter, ScriptedResponse};

    fn factory(transport: &MemoryExchangeAdapter) -> HttpServiceProxyFactory {
        HttpServiceProxyFactory::builder_for(transport.clone()).build().unwrap()
    }

    #[test]
    fn test_duplicate_method() {
        let definition = HttpServiceDefinition::new("S")
            .method(MethodDefinition::exchange("a", ExchangeDefinition::get("/a")))
            .method(MethodDefinition::exchange("a", ExchangeDefinition::get("/b")));
        let error = factory(&MemoryExchangeAdapter::new())
            .create_client_from_definition(&definition)
            .unwrap_err();
        assert!(matches!(error, ConfigurationError::DuplicateMethod { .. }));
    }

    #[test]
    fn test_failed_build_yields_no_client() {
        let definition = HttpServiceDefinition::new("S")
            .method(MethodDefinition::exchange("ok", ExchangeDefinition::get("/ok")))
            .method(
                MethodDefinition::exchange("bad", ExchangeDefinition::get("/bad"))
                    .param(ParameterDefinition::of::<String>("unannotated")),
            );
        assert!(
            factory(&MemoryExchangeAdapter::new())
                .create_client_from_definition(&definition)
                .is_err()
        );
    }

    #[test]
    fn test_blocking_call_through_memory_transport() {
        let transport = MemoryExchangeAdapter::new();
        transport.enqueue(ScriptedResponse::ok().with_json(&"pong"));
        let definition = HttpServiceDefinition::new("S")
            .with_exchange(ExchangeDefinition::new().with_url("http://svc"))
            .method(
                MethodDefinition::exchange("ping", ExchangeDefinition::post("/ping"))
                    .param(ParameterDefinition::of::<String>("q").annotated(ParamAnnotation::request_param())),
            );
        let client = factory(&transport).create_client_from_definition(&definition).unwrap();
        let reply: String = client
            .invoke("ping", vec![Argument::from("x")])
            .unwrap()
            .into_json()
            .unwrap();
        assert_eq!(reply, "pong");

        let requests = transport.take_requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].method, http::Method::POST);
        assert_eq!(requests[0].url, "http://svc/ping?q=x");
        assert_eq!(client.metrics().total_invocations(), 1);
    }

    #[test]
    fn test_default_method_registered() {
        let definition = HttpServiceDefinition::new("S").method(MethodDefinition::default_method(
            "local",
            |_, _| Ok(Outcome::Value(None)),
        ));
        let client = factory(&MemoryExchangeAdapter::new())
            .create_client_from_definition(&definition)
            .unwrap();
        assert_eq!(client.method_names().count(), 1);
        assert!(client.invoke("other", Vec::new()).is_err());
    }

    #[test]
    fn test_argument_count_checked() {
        let transport = MemoryExchangeAdapter::new();
        let definition = HttpServiceDefinition::new("S")
            .method(MethodDefinition::exchange("a", ExchangeDefinition::get("http://h/a")));
        let client = factory(&transport).create_client_from_definition(&definition).unwrap();
        assert!(matches!(
            client.invoke("a", vec![Argument::Null]),
            Err(crate::HttpServiceError::ArgumentCount { expected: 0, actual: 1, .. })
        ));
        assert_eq!(transport.exchange_count(), 0);
    }
}
