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

use super::named::{NamedValueInfo, Shapes, resolve_named_value};
use super::{HttpServiceArgumentResolver, MethodParameter};
use crate::conversion::ConversionService;
use crate::request::HttpRequestValues;
use crate::service::AnnotationKind;
use crate::{Argument, HttpServiceError};
use std::sync::Arc;

/// Adds request parameters.
///
/// Parameters become the query string, or the form body when the request
/// content type is `application/x-www-form-urlencoded` and no other body is
/// set. An absent optional value adds nothing rather than an empty entry.
#[derive(Debug, Clone)]
pub struct RequestParamArgumentResolver {
    conversion: Arc<dyn ConversionService>,
}

impl RequestParamArgumentResolver {
    /// Creates a resolver converting values with `conversion`.
    #[must_use]
    pub fn new(conversion: Arc<dyn ConversionService>) -> Self {
        Self { conversion }
    }
}

impl HttpServiceArgumentResolver for RequestParamArgumentResolver {
    fn supports(&self, parameter: &MethodParameter) -> bool {
        parameter.has_annotation(AnnotationKind::RequestParam)
    }

    fn resolve(
        &self,
        argument: Argument,
        parameter: &MethodParameter,
        request: &mut HttpRequestValues,
    ) -> Result<(), HttpServiceError> {
        let Some(info) =
            NamedValueInfo::of(parameter, AnnotationKind::RequestParam, "request param")
        else {
            return Ok(());
        };
        let shapes = Shapes {
            multi_value: true,
            map: true,
        };
        resolve_named_value(
            info,
            argument,
            shapes,
            self.conversion.as_ref(),
            &mut |name, value| {
                request.add_request_param(name, value);
                Ok(())
            },
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DefaultConversionService;
    use crate::service::{ParamAnnotation, ParameterDefinition};
    use http::Method;

    fn resolve(argument: Argument, annotation: ParamAnnotation) -> HttpRequestValues {
        let resolver = RequestParamArgumentResolver::new(Arc::new(DefaultConversionService));
        let parameter = MethodParameter::new(
            "search",
            0,
            ParameterDefinition::of::<Option<String>>("q")
                .annotated(annotation)
                .optional(),
        );
        let mut request = HttpRequestValues::with_template(Method::GET, "/search");
        resolver.resolve(argument, &parameter, &mut request).unwrap();
        request
    }

    #[test]
    fn test_query_entry() {
        let request = resolve(Argument::from("rust"), ParamAnnotation::request_param());
        assert_eq!(request.build().unwrap().url, "/search?q=rust");
    }

    #[test]
    fn test_absent_optional_omits_entry() {
        let request = resolve(Argument::Null, ParamAnnotation::request_param());
        assert!(request.request_params().is_empty());
        assert_eq!(request.build().unwrap().url, "/search");
    }

    #[test]
    fn test_default_value() {
        let request = resolve(
            Argument::Null,
            ParamAnnotation::request_param().named("page").with_default("1"),
        );
        assert_eq!(request.build().unwrap().url, "/search?page=1");
    }

    #[test]
    fn test_repeated_params() {
        let request = resolve(
            Argument::from(vec!["a", "b"]),
            ParamAnnotation::request_param().named("tag"),
        );
        assert_eq!(request.build().unwrap().url, "/search?tag=a&tag=b");
    }
}
