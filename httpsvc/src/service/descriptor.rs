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

//! Per-method request templates and resolver bindings.
//!
//! Everything here is computed once while a client is built. At call time
//! the dispatcher only clones the template and walks the bound resolvers.

use crate::adapter::{ReactiveAdapter, ReactiveAdapterRegistry};
use crate::placeholder::EmbeddedValueResolver;
use crate::request::HttpRequestValues;
use crate::resolver::{ArgumentResolverRef, MethodParameter, RequestOverride, find_resolver};
use crate::service::{
    ConfigurationError, ExchangeDefinition, HttpServiceDefinition, MethodDefinition, ReturnShape,
    ReturnType,
};
use http::header::{ACCEPT, CONTENT_TYPE, HeaderName, HeaderValue};
use http::{HeaderMap, Method};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// The fixed part of every request a method sends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequestTemplate {
    method: Method,
    url: String,
    headers: HeaderMap,
}

impl HttpRequestTemplate {
    /// Merges a method's exchange over its service's.
    ///
    /// The method's verb, content type and accept list win. URLs are joined
    /// with exactly one `/` after `${...}` placeholders are resolved. Fixed
    /// headers are added service first.
    ///
    /// # Errors
    ///
    /// - [`ConfigurationError::MissingHttpMethod`] if neither level declares a verb
    /// - [`ConfigurationError::UnresolvablePlaceholder`] from `embedded`
    /// - [`ConfigurationError::InvalidHeader`] for a fixed header not written
    ///   as `name=value`, or with an invalid name or value
    ///
    /// # Examples
    ///
    /// ```rust
    /// use httpsvc::service::{ExchangeDefinition, HttpRequestTemplate};
    /// use http::Method;
    ///
    /// let service = ExchangeDefinition::new().with_url("https://api.example.com/");
    /// let method = ExchangeDefinition::get("/users/{id}").with_accept("application/json");
    ///
    /// let template = HttpRequestTemplate::derive("get_user", Some(&service), &method, None).unwrap();
    /// assert_eq!(template.method(), &Method::GET);
    /// assert_eq!(template.url(), "https://api.example.com/users/{id}");
    /// assert_eq!(template.headers()["accept"], "application/json");
    /// ```
    pub fn derive(
        method_name: &str,
        service: Option<&ExchangeDefinition>,
        method: &ExchangeDefinition,
        embedded: Option<&dyn EmbeddedValueResolver>,
    ) -> Result<Self, ConfigurationError> {
        let verb = method
            .method()
            .or_else(|| service.and_then(ExchangeDefinition::method))
            .cloned()
            .ok_or_else(|| ConfigurationError::MissingHttpMethod {
                method: method_name.to_string(),
            })?;

        let base = resolve_placeholders(service.and_then(ExchangeDefinition::url), embedded)?;
        let path = resolve_placeholders(method.url(), embedded)?;
        let url = join_urls(&base, &path);

        let mut headers = HeaderMap::new();
        let content_type = method
            .content_type()
            .or_else(|| service.and_then(ExchangeDefinition::content_type));
        if let Some(content_type) = content_type {
            headers.insert(CONTENT_TYPE, header_value("content-type", content_type)?);
        }
        let accept = if method.accept().is_empty() {
            service.map(ExchangeDefinition::accept).unwrap_or_default()
        } else {
            method.accept()
        };
        if !accept.is_empty() {
            headers.insert(ACCEPT, header_value("accept", &accept.join(", "))?);
        }
        let fixed = service
            .map(ExchangeDefinition::headers)
            .unwrap_or_default()
            .iter()
            .chain(method.headers());
        for header in fixed {
            add_fixed_header(&mut headers, header)?;
        }

        Ok(Self { method: verb, url, headers })
    }

    /// The HTTP verb.
    #[must_use]
    pub const fn method(&self) -> &Method {
        &self.method
    }

    /// The URL template, possibly containing `{name}` path variables.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Headers sent with every request.
    #[must_use]
    pub const fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Starts the values of one call from this template.
    #[must_use]
    pub fn new_request_values(&self) -> HttpRequestValues {
        let mut values = HttpRequestValues::with_template(self.method.clone(), self.url.clone());
        values.extend_headers(&self.headers);
        values
    }
}

fn resolve_placeholders(
    url: Option<&str>,
    embedded: Option<&dyn EmbeddedValueResolver>,
) -> Result<String, ConfigurationError> {
    match (url, embedded) {
        (None, _) => Ok(String::new()),
        (Some(url), Some(resolver)) => resolver.resolve(url),
        (Some(url), None) => Ok(url.to_string()),
    }
}

fn join_urls(base: &str, path: &str) -> String {
    match (base.is_empty(), path.is_empty()) {
        (true, _) => path.to_string(),
        (false, true) => base.to_string(),
        (false, false) => format!(
            "{}/{}",
            base.trim_end_matches('/'),
            path.trim_start_matches('/')
        ),
    }
}

fn header_value(name: &str, value: &str) -> Result<HeaderValue, ConfigurationError> {
    HeaderValue::from_str(value).map_err(|e| ConfigurationError::InvalidHeader {
        header: name.to_string(),
        reason: e.to_string(),
    })
}

/// Adds a `name=value` header. A comma-separated value adds one entry per element.
fn add_fixed_header(headers: &mut HeaderMap, header: &str) -> Result<(), ConfigurationError> {
    let invalid = |reason: String| ConfigurationError::InvalidHeader {
        header: header.to_string(),
        reason,
    };
    let (name, values) = header
        .split_once('=')
        .ok_or_else(|| invalid("expected 'name=value'".to_string()))?;
    let name = HeaderName::from_bytes(name.trim().as_bytes()).map_err(|e| invalid(e.to_string()))?;
    for value in values.split(',').map(str::trim).filter(|v| !v.is_empty()) {
        headers.append(name.clone(), header_value(header, value)?);
    }
    Ok(())
}

/// A parameter together with the resolver bound to it.
#[derive(Debug, Clone)]
pub(crate) struct ParameterBinding {
    pub parameter: MethodParameter,
    pub resolver: ArgumentResolverRef,
}

/// Everything the dispatcher needs to run one remote method.
pub(crate) struct ServiceDescriptor {
    pub service: Arc<str>,
    pub name: Arc<str>,
    pub template: HttpRequestTemplate,
    pub bindings: Vec<ParameterBinding>,
    pub return_type: ReturnType,
    /// Set for reactive methods only.
    pub adapter: Option<ReactiveAdapter>,
}

impl fmt::Debug for ServiceDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceDescriptor")
            .field("service", &self.service)
            .field("name", &self.name)
            .field("template", &self.template)
            .field("parameters", &self.bindings.len())
            .field("return_type", &self.return_type)
            .finish_non_exhaustive()
    }
}

/// What [`ServiceDescriptor::build`] reads from the factory.
pub(crate) struct BuildContext<'a> {
    pub resolvers: &'a [ArgumentResolverRef],
    pub embedded: Option<&'a dyn EmbeddedValueResolver>,
    pub registry: &'a ReactiveAdapterRegistry,
}

impl ServiceDescriptor {
    /// Derives the template and binds a resolver to every parameter.
    ///
    /// `method` must be a remote operation.
    pub fn build(
        service: &HttpServiceDefinition,
        method: &MethodDefinition,
        exchange: &ExchangeDefinition,
        context: &BuildContext<'_>,
    ) -> Result<Self, ConfigurationError> {
        let name: Arc<str> = Arc::from(method.name());
        let template = HttpRequestTemplate::derive(
            &name,
            service.exchange_definition(),
            exchange,
            context.embedded,
        )?;

        let mut bindings = Vec::with_capacity(method.parameters().len());
        let mut overrides: HashMap<RequestOverride, usize> = HashMap::new();
        for (index, definition) in method.parameters().iter().enumerate() {
            let parameter = MethodParameter::new(Arc::clone(&name), index, definition.clone());
            let resolver = find_resolver(context.resolvers, &parameter).ok_or_else(|| {
                ConfigurationError::UnresolvedParameter {
                    method: name.to_string(),
                    parameter: definition.name().to_string(),
                    index,
                }
            })?;
            resolver.validate(&parameter)?;
            if let Some(kind) = resolver.request_override() {
                let count = overrides.entry(kind).or_default();
                *count += 1;
                if *count > 1 {
                    return Err(ConfigurationError::ConflictingOverrides {
                        method: name.to_string(),
                        kind: kind.label(),
                    });
                }
            }
            bindings.push(ParameterBinding {
                parameter,
                resolver: Arc::clone(resolver),
            });
        }

        let return_type = method.return_type();
        let adapter = match return_type.shape() {
            ReturnShape::Reactive { type_id, type_name } => Some(
                context
                    .registry
                    .get_by_id(type_id)
                    .cloned()
                    .ok_or_else(|| ConfigurationError::UnsupportedReturnType {
                        method: name.to_string(),
                        type_name,
                    })?,
            ),
            ReturnShape::Blocking | ReturnShape::FireAndForget => None,
        };

        Ok(Self {
            service: Arc::from(service.name()),
            name,
            template,
            bindings,
            return_type,
            adapter,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::PayloadStream;
    use crate::resolver::default_resolvers;
    use crate::service::{ParamAnnotation, ParameterDefinition, ResponseKind};
    use crate::{DefaultConversionService, PropertyPlaceholderResolver};
    use url::Url;

    fn derive(service: Option<ExchangeDefinition>, method: ExchangeDefinition) -> Result<HttpRequestTemplate, ConfigurationError> {
        HttpRequestTemplate::derive("m", service.as_ref(), &method, None)
    }

    #[test]
    fn test_method_verb_wins() {
        let service = ExchangeDefinition::new().with_method(Method::POST);
        let template = derive(Some(service.clone()), ExchangeDefinition::get("/a")).unwrap();
        assert_eq!(template.method(), &Method::GET);

        let template = derive(Some(service), ExchangeDefinition::new().with_url("/a")).unwrap();
        assert_eq!(template.method(), &Method::POST);
    }

    #[test]
    fn test_missing_verb() {
        assert_eq!(
            derive(None, ExchangeDefinition::new().with_url("/a")),
            Err(ConfigurationError::MissingHttpMethod { method: "m".to_string() })
        );
    }

    #[test]
    fn test_url_join() {
        assert_eq!(join_urls("http://h/api/", "/users"), "http://h/api/users");
        assert_eq!(join_urls("http://h/api", "users"), "http://h/api/users");
        assert_eq!(join_urls("", "/users"), "/users");
        assert_eq!(join_urls("http://h", ""), "http://h");
    }

    #[test]
    fn test_placeholders_resolved() {
        let embedded = PropertyPlaceholderResolver::new().with_property("host", "http://svc");
        let service = ExchangeDefinition::new().with_url("${host}");
        let template = HttpRequestTemplate::derive(
            "m",
            Some(&service),
            &ExchangeDefinition::get("/v${version:2}/items"),
            Some(&embedded),
        )
        .unwrap();
        assert_eq!(template.url(), "http://svc/v2/items");
    }

    #[test]
    fn test_content_type_and_accept() {
        let service = ExchangeDefinition::new()
            .with_content_type("text/plain")
            .with_accept("text/plain");
        let method = ExchangeDefinition::post("/a")
            .with_content_type("application/json")
            .with_accept("application/json")
            .with_accept("application/cbor");
        let template = derive(Some(service), method).unwrap();
        assert_eq!(template.headers()["content-type"], "application/json");
        assert_eq!(template.headers()["accept"], "application/json, application/cbor");
    }

    #[test]
    fn test_fixed_headers() {
        let service = ExchangeDefinition::new().with_header("X-Service=svc");
        let method = ExchangeDefinition::get("/a").with_header("X-Multi = a, b");
        let template = derive(Some(service), method).unwrap();
        assert_eq!(template.headers()["x-service"], "svc");
        let multi: Vec<_> = template.headers().get_all("x-multi").iter().collect();
        assert_eq!(multi, vec!["a", "b"]);
    }

    #[test]
    fn test_malformed_fixed_header() {
        let result = derive(None, ExchangeDefinition::get("/a").with_header("X-Broken"));
        assert!(matches!(result, Err(ConfigurationError::InvalidHeader { .. })));
    }

    fn build(method: MethodDefinition) -> Result<ServiceDescriptor, ConfigurationError> {
        let registry = ReactiveAdapterRegistry::shared();
        let resolvers = default_resolvers(Arc::new(DefaultConversionService), registry.clone());
        let service = HttpServiceDefinition::new("S").method(method.clone());
        let context = BuildContext {
            resolvers: &resolvers,
            embedded: None,
            registry: &registry,
        };
        let exchange = method.exchange_definition().cloned().unwrap_or_default();
        ServiceDescriptor::build(&service, &method, &exchange, &context)
    }

    #[test]
    fn test_binds_resolvers() {
        let method = MethodDefinition::exchange("get", ExchangeDefinition::get("/{id}"))
            .param(ParameterDefinition::of::<u64>("id").annotated(ParamAnnotation::path_variable()))
            .param(ParameterDefinition::of::<Url>("target"));
        let descriptor = build(method).unwrap();
        assert_eq!(descriptor.bindings.len(), 2);
        assert!(format!("{:?}", descriptor.bindings[0].resolver).starts_with("PathVariable"));
        assert_eq!(descriptor.bindings[1].resolver.request_override(), Some(RequestOverride::Url));
        assert!(descriptor.adapter.is_none());
    }

    #[test]
    fn test_unresolved_parameter() {
        let method = MethodDefinition::exchange("get", ExchangeDefinition::get("/"))
            .param(ParameterDefinition::of::<String>("plain"));
        assert_eq!(
            build(method).unwrap_err(),
            ConfigurationError::UnresolvedParameter {
                method: "get".to_string(),
                parameter: "plain".to_string(),
                index: 0,
            }
        );
    }

    #[test]
    fn test_conflicting_url_overrides() {
        let method = MethodDefinition::exchange("get", ExchangeDefinition::get("/"))
            .param(ParameterDefinition::of::<Url>("a"))
            .param(ParameterDefinition::of::<Option<Url>>("b"));
        assert!(matches!(
            build(method),
            Err(ConfigurationError::ConflictingOverrides { kind: "url", .. })
        ));
    }

    #[test]
    fn test_reactive_adapter_looked_up() {
        let method = MethodDefinition::exchange("list", ExchangeDefinition::get("/"))
            .returns(ReturnType::reactive::<PayloadStream>(ResponseKind::Body));
        let descriptor = build(method).unwrap();
        assert!(descriptor.adapter.unwrap().descriptor().is_multi_value());
    }

    #[test]
    fn test_unsupported_return_type() {
        let method = MethodDefinition::exchange("list", ExchangeDefinition::get("/"))
            .returns(ReturnType::reactive::<String>(ResponseKind::Body));
        assert!(matches!(
            build(method),
            Err(ConfigurationError::UnsupportedReturnType { .. })
        ));
    }
}
