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

//! Fluent assembly of an [`HttpServiceProxyFactory`].

use crate::adapter::ReactiveAdapterRegistry;
use crate::conversion::{ConversionService, DefaultConversionService};
use crate::placeholder::EmbeddedValueResolver;
use crate::resolver::{ArgumentResolverRef, HttpServiceArgumentResolver, default_resolvers};
use crate::service::{
    ConfigurationError, DefaultSpawner, HttpServiceProxyFactory, ProxyFactoryConfig, TaskSpawner,
};
use crate::transport::HttpExchangeAdapter;
use std::sync::Arc;
use std::time::Duration;

/// Builder for [`HttpServiceProxyFactory`].
///
/// Only the transport is required. Everything else has a default:
///
/// | Setting                  | Default                                  |
/// |--------------------------|------------------------------------------|
/// | custom resolvers         | none                                     |
/// | conversion service       | [`DefaultConversionService`]             |
/// | embedded value resolver  | none; URLs are used as written           |
/// | adapter registry         | [`ReactiveAdapterRegistry::shared`]      |
/// | task spawner             | [`DefaultSpawner`]                       |
/// | block timeout            | 5 seconds                                |
///
/// # Examples
///
/// ## Minimal
///
/// ```rust
/// use httpsvc::service::HttpServiceProxyFactory;
/// use httpsvc::transport::MemoryExchangeAdapter;
///
/// let factory = HttpServiceProxyFactory::builder()
///     .exchange_adapter(MemoryExchangeAdapter::new())
///     .build()
///     .unwrap();
/// assert_eq!(factory.argument_resolvers().len(), 8);
/// ```
///
/// ## Missing Transport
///
/// ```rust
/// use httpsvc::service::{ConfigurationError, HttpServiceProxyFactory};
///
/// let error = HttpServiceProxyFactory::builder().build().unwrap_err();
/// assert_eq!(error, ConfigurationError::MissingExchangeAdapter);
/// ```
///
/// ## Custom Configuration
///
/// ```rust
/// use httpsvc::service::{HttpServiceProxyFactory, ProxyFactoryConfig};
/// use httpsvc::transport::MemoryExchangeAdapter;
/// use httpsvc::PropertyPlaceholderResolver;
/// use std::time::Duration;
///
/// let config = ProxyFactoryConfig::new().with_log_detached_failures(false);
/// let factory = HttpServiceProxyFactory::builder_for(MemoryExchangeAdapter::new())
///     .with_config(config)
///     .block_timeout(Duration::from_secs(2))
///     .embedded_value_resolver(
///         PropertyPlaceholderResolver::new().with_property("api.host", "https://api.example.com"),
///     )
///     .build()
///     .unwrap();
/// assert_eq!(factory.config().block_timeout, Duration::from_secs(2));
/// assert!(!factory.config().log_detached_failures);
/// ```
#[derive(Default)]
pub struct HttpServiceProxyFactoryBuilder {
    transport: Option<Arc<dyn HttpExchangeAdapter>>,
    custom_resolvers: Vec<ArgumentResolverRef>,
    conversion: Option<Arc<dyn ConversionService>>,
    embedded: Option<Arc<dyn EmbeddedValueResolver>>,
    registry: Option<Arc<ReactiveAdapterRegistry>>,
    spawner: Option<Arc<dyn TaskSpawner>>,
    config: ProxyFactoryConfig,
}

impl HttpServiceProxyFactoryBuilder {
    /// Creates a builder with default settings and no transport.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the transport.
    #[must_use]
    pub fn exchange_adapter(mut self, transport: impl HttpExchangeAdapter) -> Self {
        self.transport = Some(Arc::new(transport));
        self
    }

    /// Adds a resolver ahead of the built-in ones.
    ///
    /// Custom resolvers are consulted in the order they were added.
    #[must_use]
    pub fn custom_argument_resolver(
        mut self,
        resolver: impl HttpServiceArgumentResolver + 'static,
    ) -> Self {
        self.custom_resolvers.push(Arc::new(resolver));
        self
    }

    /// Sets how named-value arguments are converted to strings.
    #[must_use]
    pub fn conversion_service(mut self, conversion: impl ConversionService + 'static) -> Self {
        self.conversion = Some(Arc::new(conversion));
        self
    }

    /// Sets how `${...}` placeholders in URLs are resolved.
    #[must_use]
    pub fn embedded_value_resolver(mut self, resolver: impl EmbeddedValueResolver + 'static) -> Self {
        self.embedded = Some(Arc::new(resolver));
        self
    }

    /// Replaces the adapter registry.
    #[must_use]
    pub fn reactive_adapter_registry(mut self, registry: Arc<ReactiveAdapterRegistry>) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Sets where fire-and-forget requests run.
    #[must_use]
    pub fn task_spawner(mut self, spawner: impl TaskSpawner + 'static) -> Self {
        self.spawner = Some(Arc::new(spawner));
        self
    }

    /// Sets the bound on blocking calls.
    #[must_use]
    pub fn block_timeout(mut self, timeout: Duration) -> Self {
        self.config.block_timeout = timeout;
        self
    }

    /// Replaces the whole configuration.
    #[must_use]
    pub fn with_config(mut self, config: ProxyFactoryConfig) -> Self {
        self.config = config;
        self
    }

    /// Builds the factory.
    ///
    /// # Errors
    ///
    /// - [`ConfigurationError::MissingExchangeAdapter`] if no transport was set
    /// - [`ConfigurationError::InvalidConfig`] if the configuration is invalid
    pub fn build(self) -> Result<HttpServiceProxyFactory, ConfigurationError> {
        let transport = self
            .transport
            .ok_or(ConfigurationError::MissingExchangeAdapter)?;
        self.config.validate()?;

        let registry = self.registry.unwrap_or_else(ReactiveAdapterRegistry::shared);
        let conversion = self
            .conversion
            .unwrap_or_else(|| Arc::new(DefaultConversionService));
        let mut resolvers = self.custom_resolvers;
        resolvers.extend(default_resolvers(conversion, Arc::clone(&registry)));
        let spawner = self.spawner.unwrap_or_else(|| Arc::new(DefaultSpawner));

        Ok(HttpServiceProxyFactory::new(
            transport,
            resolvers,
            self.embedded,
            registry,
            spawner,
            self.config,
        ))
    }
}
