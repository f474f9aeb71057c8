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

//! Argument resolvers: turning call arguments into request parts.
//!
//! When a client is built, every parameter of every remote method is
//! offered to the resolver chain in order, and the first resolver whose
//! [`supports`](HttpServiceArgumentResolver::supports) returns `true` is
//! bound to it for good. At call time each argument goes straight to its
//! bound resolver, which adds to the call's [`HttpRequestValues`].
//!
//! # Chain Order
//!
//! 1. Custom resolvers, in registration order
//! 2. [`RequestHeaderArgumentResolver`]
//! 3. [`RequestBodyArgumentResolver`]
//! 4. [`PathVariableArgumentResolver`]
//! 5. [`RequestParamArgumentResolver`]
//! 6. [`CookieValueArgumentResolver`]
//! 7. [`RequestAttributeArgumentResolver`]
//! 8. [`UrlArgumentResolver`]
//! 9. [`HttpMethodArgumentResolver`]
//!
//! A parameter no resolver claims fails the build with
//! [`ConfigurationError::UnresolvedParameter`](crate::service::ConfigurationError::UnresolvedParameter).
//!
//! # Custom Resolvers
//!
//! ```rust
//! use httpsvc::request::HttpRequestValues;
//! use httpsvc::resolver::{HttpServiceArgumentResolver, MethodParameter};
//! use httpsvc::{Argument, HttpServiceError};
//!
//! /// A bearer token passed as a plain argument.
//! #[derive(Debug)]
//! struct Token(String);
//!
//! #[derive(Debug)]
//! struct TokenResolver;
//!
//! impl HttpServiceArgumentResolver for TokenResolver {
//!     fn supports(&self, parameter: &MethodParameter) -> bool {
//!         parameter.definition().is::<Token>()
//!     }
//!
//!     fn resolve(
//!         &self,
//!         argument: Argument,
//!         _parameter: &MethodParameter,
//!         request: &mut HttpRequestValues,
//!     ) -> Result<(), HttpServiceError> {
//!         if let Some(token) = argument.downcast_ref::<Token>() {
//!             request.add_header("authorization", &format!("Bearer {}", token.0))?;
//!         }
//!         Ok(())
//!     }
//! }
//! ```

mod attribute;
mod body;
mod cookie;
mod error;
mod header;
mod method_override;
mod named;
mod path_variable;
mod request_param;
mod url_override;

pub use self::attribute::RequestAttributeArgumentResolver;
pub use self::body::RequestBodyArgumentResolver;
pub use self::cookie::CookieValueArgumentResolver;
pub use self::error::ResolutionError;
pub use self::header::RequestHeaderArgumentResolver;
pub use self::method_override::HttpMethodArgumentResolver;
pub use self::path_variable::PathVariableArgumentResolver;
pub use self::request_param::RequestParamArgumentResolver;
pub use self::url_override::UrlArgumentResolver;

use crate::adapter::ReactiveAdapterRegistry;
use crate::conversion::ConversionService;
use crate::request::HttpRequestValues;
use crate::service::{AnnotationKind, ConfigurationError, ParameterDefinition};
use crate::{Argument, HttpServiceError};
use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// Contributes one method parameter to the outgoing request.
///
/// Resolvers are stateless apart from their configuration and are shared
/// by every client and every concurrent call.
pub trait HttpServiceArgumentResolver: fmt::Debug + Send + Sync {
    /// Returns `true` if this resolver handles `parameter`.
    ///
    /// Called once per parameter while the client is built.
    fn supports(&self, parameter: &MethodParameter) -> bool;

    /// Checks a claimed parameter while the client is built.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigurationError`] if the declaration can never be
    /// resolved, which aborts the build.
    fn validate(&self, parameter: &MethodParameter) -> Result<(), ConfigurationError> {
        let _ = parameter;
        Ok(())
    }

    /// The part of the request template this resolver replaces, if any.
    ///
    /// A method may bind at most one parameter per override kind.
    fn request_override(&self) -> Option<RequestOverride> {
        None
    }

    /// Adds `argument` to `request`.
    ///
    /// # Errors
    ///
    /// Returns an error if the argument cannot be turned into a request
    /// part. The error fails this call only.
    fn resolve(
        &self,
        argument: Argument,
        parameter: &MethodParameter,
        request: &mut HttpRequestValues,
    ) -> Result<(), HttpServiceError>;
}

/// A part of the request template that a parameter replaces wholesale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequestOverride {
    /// The target URL.
    Url,
    /// The HTTP verb.
    Method,
}

impl RequestOverride {
    /// A short label for error messages.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Url => "url",
            Self::Method => "http method",
        }
    }
}

/// A parameter in the context of its method.
#[derive(Debug, Clone)]
pub struct MethodParameter {
    method: Arc<str>,
    index: usize,
    definition: ParameterDefinition,
}

impl MethodParameter {
    /// Creates a parameter at `index` of `method`.
    #[must_use]
    pub fn new(method: impl Into<Arc<str>>, index: usize, definition: ParameterDefinition) -> Self {
        Self {
            method: method.into(),
            index,
            definition,
        }
    }

    /// The declaring method's name.
    #[must_use]
    pub fn method_name(&self) -> &str {
        &self.method
    }

    /// Position of the parameter, from zero.
    #[must_use]
    pub const fn index(&self) -> usize {
        self.index
    }

    /// The parameter's declared name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.definition.name()
    }

    /// The parameter declaration.
    #[must_use]
    pub const fn definition(&self) -> &ParameterDefinition {
        &self.definition
    }

    /// Returns `true` if the parameter carries an annotation of `kind`.
    #[must_use]
    pub fn has_annotation(&self, kind: AnnotationKind) -> bool {
        self.definition.annotation_of(kind).is_some()
    }

    /// Returns `true` if the parameter was declared as type `T`.
    #[must_use]
    pub fn is<T: Any>(&self) -> bool {
        self.definition.is::<T>()
    }
}

/// Shared handle to a resolver.
pub type ArgumentResolverRef = Arc<dyn HttpServiceArgumentResolver>;

/// Builds the built-in resolvers in chain order.
#[must_use]
pub fn default_resolvers(
    conversion: Arc<dyn ConversionService>,
    registry: Arc<ReactiveAdapterRegistry>,
) -> Vec<ArgumentResolverRef> {
    let conversion = &conversion;
    let resolvers: [ArgumentResolverRef; 8] = [
        Arc::new(RequestHeaderArgumentResolver::new(Arc::clone(conversion))),
        Arc::new(RequestBodyArgumentResolver::new(registry)),
        Arc::new(PathVariableArgumentResolver::new(Arc::clone(conversion))),
        Arc::new(RequestParamArgumentResolver::new(Arc::clone(conversion))),
        Arc::new(CookieValueArgumentResolver::new(Arc::clone(conversion))),
        Arc::new(RequestAttributeArgumentResolver),
        Arc::new(UrlArgumentResolver),
        Arc::new(HttpMethodArgumentResolver),
    ];
    resolvers.into()
}

/// Returns the first resolver in `chain` that supports `parameter`.
#[must_use]
pub fn find_resolver<'a>(
    chain: &'a [ArgumentResolverRef],
    parameter: &MethodParameter,
) -> Option<&'a ArgumentResolverRef> {
    chain.iter().find(|resolver| resolver.supports(parameter))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DefaultConversionService;
    use crate::service::ParamAnnotation;
    use http::Method;
    use url::Url;

    fn chain() -> Vec<ArgumentResolverRef> {
        default_resolvers(
            Arc::new(DefaultConversionService),
            ReactiveAdapterRegistry::shared(),
        )
    }

    fn resolver_for(definition: ParameterDefinition) -> Option<String> {
        let chain = chain();
        let parameter = MethodParameter::new("m", 0, definition);
        find_resolver(&chain, &parameter).map(|resolver| format!("{resolver:?}"))
    }

    #[test]
    fn test_chain_order() {
        let names: Vec<String> = chain().iter().map(|r| format!("{r:?}")).collect();
        assert!(names[0].starts_with("RequestHeader"));
        assert!(names[1].starts_with("RequestBody"));
        assert!(names[2].starts_with("PathVariable"));
        assert!(names[3].starts_with("RequestParam"));
        assert!(names[4].starts_with("CookieValue"));
        assert!(names[5].starts_with("RequestAttribute"));
        assert!(names[6].starts_with("Url"));
        assert!(names[7].starts_with("HttpMethod"));
    }

    #[test]
    fn test_annotation_wins_over_type() {
        let definition =
            ParameterDefinition::of::<Url>("target").annotated(ParamAnnotation::header());
        assert!(resolver_for(definition).unwrap().starts_with("RequestHeader"));
    }

    #[test]
    fn test_type_based_resolvers() {
        assert!(
            resolver_for(ParameterDefinition::of::<Option<Url>>("u"))
                .unwrap()
                .starts_with("Url")
        );
        assert!(
            resolver_for(ParameterDefinition::of::<Method>("m"))
                .unwrap()
                .starts_with("HttpMethod")
        );
    }

    #[test]
    fn test_unannotated_is_unclaimed() {
        assert!(resolver_for(ParameterDefinition::of::<String>("plain")).is_none());
    }
}
