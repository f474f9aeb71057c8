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

//! The declaration surface: how a service describes its remote operations.
//!
//! A service is described once, as data, by an [`HttpServiceDefinition`].
//! The factory reads it when a client is built and never again.
//!
//! ```rust
//! use httpsvc::service::{
//!     ExchangeDefinition, HttpServiceDefinition, MethodDefinition, ParamAnnotation,
//!     ParameterDefinition, ResponseKind, ReturnType,
//! };
//!
//! let definition = HttpServiceDefinition::new("UserService")
//!     .with_exchange(ExchangeDefinition::new().with_url("/users"))
//!     .method(
//!         MethodDefinition::exchange("get_user", ExchangeDefinition::get("/{id}"))
//!             .param(ParameterDefinition::of::<u64>("id").annotated(ParamAnnotation::path_variable()))
//!             .param(
//!                 ParameterDefinition::of::<String>("trace")
//!                     .annotated(ParamAnnotation::header().named("X-Trace").required(false)),
//!             )
//!             .returns(ReturnType::blocking(ResponseKind::Body)),
//!     );
//!
//! assert_eq!(definition.methods().len(), 1);
//! ```

use crate::service::{HttpServiceClient, Outcome};
use crate::{Argument, HttpServiceError};
use http::Method;
use std::any::{Any, TypeId};
use std::fmt;
use std::sync::Arc;

/// Request metadata declared on a service or one of its methods.
///
/// Every field is optional. A method's definition is merged over its
/// service's when the request template is derived.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExchangeDefinition {
    method: Option<Method>,
    url: Option<String>,
    content_type: Option<String>,
    accept: Vec<String>,
    headers: Vec<String>,
}

impl ExchangeDefinition {
    /// Creates an empty definition.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A `GET` exchange on `url`.
    #[must_use]
    pub fn get(url: impl Into<String>) -> Self {
        Self::new().with_method(Method::GET).with_url(url)
    }

    /// A `POST` exchange on `url`.
    #[must_use]
    pub fn post(url: impl Into<String>) -> Self {
        Self::new().with_method(Method::POST).with_url(url)
    }

    /// A `PUT` exchange on `url`.
    #[must_use]
    pub fn put(url: impl Into<String>) -> Self {
        Self::new().with_method(Method::PUT).with_url(url)
    }

    /// A `PATCH` exchange on `url`.
    #[must_use]
    pub fn patch(url: impl Into<String>) -> Self {
        Self::new().with_method(Method::PATCH).with_url(url)
    }

    /// A `DELETE` exchange on `url`.
    #[must_use]
    pub fn delete(url: impl Into<String>) -> Self {
        Self::new().with_method(Method::DELETE).with_url(url)
    }

    /// A `HEAD` exchange on `url`.
    #[must_use]
    pub fn head(url: impl Into<String>) -> Self {
        Self::new().with_method(Method::HEAD).with_url(url)
    }

    /// An `OPTIONS` exchange on `url`.
    #[must_use]
    pub fn options(url: impl Into<String>) -> Self {
        Self::new().with_method(Method::OPTIONS).with_url(url)
    }

    /// Sets the verb.
    #[must_use]
    pub fn with_method(mut self, method: Method) -> Self {
        self.method = Some(method);
        self
    }

    /// Sets the URL template.
    #[must_use]
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Sets the request content type.
    #[must_use]
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    /// Adds an accepted media type.
    #[must_use]
    pub fn with_accept(mut self, media_type: impl Into<String>) -> Self {
        self.accept.push(media_type.into());
        self
    }

    /// Adds a fixed header written as `name=value`.
    #[must_use]
    pub fn with_header(mut self, header: impl Into<String>) -> Self {
        self.headers.push(header.into());
        self
    }

    /// The verb, if declared.
    #[must_use]
    pub fn method(&self) -> Option<&Method> {
        self.method.as_ref()
    }

    /// The URL template, if declared.
    #[must_use]
    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    /// The content type, if declared.
    #[must_use]
    pub fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    /// The accepted media types.
    #[must_use]
    pub fn accept(&self) -> &[String] {
        &self.accept
    }

    /// The fixed headers, as written.
    #[must_use]
    pub fn headers(&self) -> &[String] {
        &self.headers
    }
}

/// Which request component a parameter feeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnnotationKind {
    /// A request header.
    Header,
    /// The request body.
    Body,
    /// A `{name}` placeholder in the URL template.
    PathVariable,
    /// A query parameter, or a form field for form content types.
    RequestParam,
    /// A cookie.
    CookieValue,
    /// Transport-only metadata.
    RequestAttribute,
}

/// Marks how a parameter contributes to the request.
///
/// Annotations are required by default. A default value implies the
/// parameter is not required.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamAnnotation {
    kind: AnnotationKind,
    name: Option<String>,
    required: bool,
    default_value: Option<String>,
}

impl ParamAnnotation {
    fn new(kind: AnnotationKind) -> Self {
        Self {
            kind,
            name: None,
            required: true,
            default_value: None,
        }
    }

    /// A header parameter.
    #[must_use]
    pub fn header() -> Self {
        Self::new(AnnotationKind::Header)
    }

    /// The body parameter.
    #[must_use]
    pub fn body() -> Self {
        Self::new(AnnotationKind::Body)
    }

    /// A path-variable parameter.
    #[must_use]
    pub fn path_variable() -> Self {
        Self::new(AnnotationKind::PathVariable)
    }

    /// A request-parameter parameter.
    #[must_use]
    pub fn request_param() -> Self {
        Self::new(AnnotationKind::RequestParam)
    }

    /// A cookie parameter.
    #[must_use]
    pub fn cookie_value() -> Self {
        Self::new(AnnotationKind::CookieValue)
    }

    /// A request-attribute parameter.
    #[must_use]
    pub fn request_attribute() -> Self {
        Self::new(AnnotationKind::RequestAttribute)
    }

    /// Names the header, variable, parameter, cookie or attribute explicitly.
    #[must_use]
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets whether a value must be supplied.
    #[must_use]
    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    /// Sets the value used when the argument is absent.
    #[must_use]
    pub fn with_default(mut self, value: impl Into<String>) -> Self {
        self.default_value = Some(value.into());
        self.required = false;
        self
    }

    /// The kind of annotation.
    #[must_use]
    pub const fn kind(&self) -> AnnotationKind {
        self.kind
    }

    /// The explicit name, if any.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Whether a value must be supplied.
    #[must_use]
    pub const fn is_required(&self) -> bool {
        self.required
    }

    /// The default value, if any.
    #[must_use]
    pub fn default_value(&self) -> Option<&str> {
        self.default_value.as_deref()
    }
}

/// One declared parameter of a method.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterDefinition {
    name: String,
    type_id: TypeId,
    type_name: &'static str,
    annotation: Option<ParamAnnotation>,
    optional: bool,
}

impl ParameterDefinition {
    /// Declares a parameter of type `T`.
    #[must_use]
    pub fn of<T: Any>(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_id: TypeId::of::<T>(),
            type_name: std::any::type_name::<T>(),
            annotation: None,
            optional: false,
        }
    }

    /// Attaches an annotation.
    #[must_use]
    pub fn annotated(mut self, annotation: ParamAnnotation) -> Self {
        self.annotation = Some(annotation);
        self
    }

    /// Marks the parameter as accepting an absent value.
    #[must_use]
    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    /// The parameter name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The declared type's id.
    #[must_use]
    pub const fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// The declared type's name.
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Returns `true` if the parameter was declared as type `T`.
    #[must_use]
    pub fn is<T: Any>(&self) -> bool {
        self.type_id == TypeId::of::<T>()
    }

    /// The annotation, if any.
    #[must_use]
    pub fn annotation(&self) -> Option<&ParamAnnotation> {
        self.annotation.as_ref()
    }

    /// Returns the annotation if it is of the given kind.
    #[must_use]
    pub fn annotation_of(&self, kind: AnnotationKind) -> Option<&ParamAnnotation> {
        self.annotation.as_ref().filter(|a| a.kind == kind)
    }

    /// Whether an absent value is acceptable.
    #[must_use]
    pub const fn is_optional(&self) -> bool {
        self.optional
    }
}

/// What a method extracts from the response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResponseKind {
    /// Nothing; the response is drained.
    Void,
    /// The status and headers.
    Headers,
    /// The body.
    Body,
    /// Status, headers and body.
    Entity,
    /// Status and headers as an entity with an empty body.
    BodilessEntity,
}

/// The calling convention of a method.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReturnShape {
    /// The caller waits for the value, bounded by the block timeout.
    Blocking,
    /// The caller receives an asynchronous handle of the given type.
    Reactive {
        /// The handle type's id.
        type_id: TypeId,
        /// The handle type's name.
        type_name: &'static str,
    },
    /// The request is started and the caller does not wait.
    FireAndForget,
}

/// The declared return type of a method.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReturnType {
    shape: ReturnShape,
    kind: ResponseKind,
}

impl ReturnType {
    /// A blocking method returning `kind`.
    #[must_use]
    pub const fn blocking(kind: ResponseKind) -> Self {
        Self {
            shape: ReturnShape::Blocking,
            kind,
        }
    }

    /// An asynchronous method returning a handle of type `T`.
    ///
    /// `T` must be registered in the adapter registry, or building the client fails.
    #[must_use]
    pub fn reactive<T: Any>(kind: ResponseKind) -> Self {
        Self {
            shape: ReturnShape::Reactive {
                type_id: TypeId::of::<T>(),
                type_name: std::any::type_name::<T>(),
            },
            kind,
        }
    }

    /// A method that starts the request and returns at once.
    #[must_use]
    pub const fn fire_and_forget() -> Self {
        Self {
            shape: ReturnShape::FireAndForget,
            kind: ResponseKind::Void,
        }
    }

    /// The calling convention.
    #[must_use]
    pub const fn shape(&self) -> ReturnShape {
        self.shape
    }

    /// What is extracted from the response.
    #[must_use]
    pub const fn kind(&self) -> ResponseKind {
        self.kind
    }
}

impl Default for ReturnType {
    fn default() -> Self {
        Self::blocking(ResponseKind::Body)
    }
}

/// Body of a method that is not a remote operation.
///
/// It receives the client itself, so it can call the service's remote
/// operations.
pub type DefaultMethodHandler =
    Arc<dyn Fn(&HttpServiceClient, Vec<Argument>) -> Result<Outcome, HttpServiceError> + Send + Sync>;

/// One declared method.
#[derive(Clone)]
pub struct MethodDefinition {
    name: String,
    exchange: Option<ExchangeDefinition>,
    parameters: Vec<ParameterDefinition>,
    return_type: ReturnType,
    default_body: Option<DefaultMethodHandler>,
}

impl MethodDefinition {
    /// Declares a remote operation.
    #[must_use]
    pub fn exchange(name: impl Into<String>, exchange: ExchangeDefinition) -> Self {
        Self {
            name: name.into(),
            exchange: Some(exchange),
            parameters: Vec::new(),
            return_type: ReturnType::default(),
            default_body: None,
        }
    }

    /// Declares a method with its own body, executed without any request.
    #[must_use]
    pub fn default_method<F>(name: impl Into<String>, body: F) -> Self
    where
        F: Fn(&HttpServiceClient, Vec<Argument>) -> Result<Outcome, HttpServiceError>
            + Send
            + Sync
            + 'static,
    {
        Self {
            name: name.into(),
            exchange: None,
            parameters: Vec::new(),
            return_type: ReturnType::default(),
            default_body: Some(Arc::new(body)),
        }
    }

    /// Adds a parameter.
    #[must_use]
    pub fn param(mut self, parameter: ParameterDefinition) -> Self {
        self.parameters.push(parameter);
        self
    }

    /// Sets the return type. Defaults to a blocking body.
    #[must_use]
    pub fn returns(mut self, return_type: ReturnType) -> Self {
        self.return_type = return_type;
        self
    }

    /// The method name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The method-level exchange; `None` for methods that are not remote operations.
    #[must_use]
    pub fn exchange_definition(&self) -> Option<&ExchangeDefinition> {
        self.exchange.as_ref()
    }

    /// The declared parameters.
    #[must_use]
    pub fn parameters(&self) -> &[ParameterDefinition] {
        &self.parameters
    }

    /// The declared return type.
    #[must_use]
    pub const fn return_type(&self) -> ReturnType {
        self.return_type
    }

    /// The default body, if any.
    #[must_use]
    pub fn default_body(&self) -> Option<&DefaultMethodHandler> {
        self.default_body.as_ref()
    }

    /// Returns `true` if this method maps to an HTTP request.
    #[must_use]
    pub fn is_remote(&self) -> bool {
        self.exchange.is_some()
    }
}

impl fmt::Debug for MethodDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MethodDefinition")
            .field("name", &self.name)
            .field("exchange", &self.exchange)
            .field("parameters", &self.parameters)
            .field("return_type", &self.return_type)
            .field("default_body", &self.default_body.is_some())
            .finish()
    }
}

/// A complete service description.
#[derive(Debug, Clone)]
pub struct HttpServiceDefinition {
    name: String,
    exchange: Option<ExchangeDefinition>,
    methods: Vec<MethodDefinition>,
}

impl HttpServiceDefinition {
    /// Starts a definition.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            exchange: None,
            methods: Vec::new(),
        }
    }

    /// Sets the service-level exchange shared by every method.
    #[must_use]
    pub fn with_exchange(mut self, exchange: ExchangeDefinition) -> Self {
        self.exchange = Some(exchange);
        self
    }

    /// Adds a method.
    #[must_use]
    pub fn method(mut self, method: MethodDefinition) -> Self {
        self.methods.push(method);
        self
    }

    /// Adds the methods of a parent service that this one does not redeclare.
    ///
    /// The parent's service-level exchange is adopted if this definition
    /// has none.
    ///
    /// ```rust
    /// use httpsvc::service::{ExchangeDefinition, HttpServiceDefinition, MethodDefinition};
    ///
    /// let base = HttpServiceDefinition::new("Base")
    ///     .method(MethodDefinition::exchange("ping", ExchangeDefinition::get("/ping")))
    ///     .method(MethodDefinition::exchange("info", ExchangeDefinition::get("/info")));
    /// let child = HttpServiceDefinition::new("Child")
    ///     .method(MethodDefinition::exchange("info", ExchangeDefinition::get("/v2/info")))
    ///     .inherit(&base);
    ///
    /// assert_eq!(child.methods().len(), 2);
    /// let info = child.find("info").unwrap();
    /// assert_eq!(info.exchange_definition().unwrap().url(), Some("/v2/info"));
    /// ```
    #[must_use]
    pub fn inherit(mut self, parent: &HttpServiceDefinition) -> Self {
        if self.exchange.is_none() {
            self.exchange = parent.exchange.clone();
        }
        for method in &parent.methods {
            if self.find(&method.name).is_none() {
                self.methods.push(method.clone());
            }
        }
        self
    }

    /// The service name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The service-level exchange, if any.
    #[must_use]
    pub fn exchange_definition(&self) -> Option<&ExchangeDefinition> {
        self.exchange.as_ref()
    }

    /// The declared methods, in order.
    #[must_use]
    pub fn methods(&self) -> &[MethodDefinition] {
        &self.methods
    }

    /// Finds a method by name.
    #[must_use]
    pub fn find(&self, name: &str) -> Option<&MethodDefinition> {
        self.methods.iter().find(|m| m.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_value_implies_not_required() {
        let annotation = ParamAnnotation::request_param().with_default("10");
        assert!(!annotation.is_required());
        assert_eq!(annotation.default_value(), Some("10"));
    }

    #[test]
    fn test_annotation_of_filters_kind() {
        let parameter =
            ParameterDefinition::of::<String>("id").annotated(ParamAnnotation::path_variable());
        assert!(parameter.annotation_of(AnnotationKind::PathVariable).is_some());
        assert!(parameter.annotation_of(AnnotationKind::Header).is_none());
        assert!(parameter.is::<String>());
        assert!(!parameter.is::<&str>());
    }

    #[test]
    fn test_inherit_keeps_own_exchange() {
        let parent = HttpServiceDefinition::new("P")
            .with_exchange(ExchangeDefinition::new().with_url("/parent"));
        let child = HttpServiceDefinition::new("C")
            .with_exchange(ExchangeDefinition::new().with_url("/child"))
            .inherit(&parent);
        assert_eq!(child.exchange_definition().unwrap().url(), Some("/child"));

        let orphan = HttpServiceDefinition::new("O").inherit(&parent);
        assert_eq!(orphan.exchange_definition().unwrap().url(), Some("/parent"));
    }

    #[test]
    fn test_default_method_is_not_remote() {
        let method = MethodDefinition::default_method("greet", |_, _| Ok(Outcome::Value(None)));
        assert!(!method.is_remote());
        assert!(method.default_body().is_some());
    }

    #[test]
    fn test_fire_and_forget_extracts_nothing() {
        let return_type = ReturnType::fire_and_forget();
        assert_eq!(return_type.shape(), ReturnShape::FireAndForget);
        assert_eq!(return_type.kind(), ResponseKind::Void);
    }
}
