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

/// Adds header parameters.
///
/// A list argument repeats the header once per element. A map argument on
/// a parameter without an explicit name adds one header per entry.
#[derive(Debug, Clone)]
pub struct RequestHeaderArgumentResolver {
    conversion: Arc<dyn ConversionService>,
}

impl RequestHeaderArgumentResolver {
    /// Creates a resolver converting values with `conversion`.
    #[must_use]
    pub fn new(conversion: Arc<dyn ConversionService>) -> Self {
        Self { conversion }
    }
}

impl HttpServiceArgumentResolver for RequestHeaderArgumentResolver {
    fn supports(&self, parameter: &MethodParameter) -> bool {
        parameter.has_annotation(AnnotationKind::Header)
    }

    fn resolve(
        &self,
        argument: Argument,
        parameter: &MethodParameter,
        request: &mut HttpRequestValues,
    ) -> Result<(), HttpServiceError> {
        let Some(info) = NamedValueInfo::of(parameter, AnnotationKind::Header, "header") else {
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
            &mut |name, value| request.add_header(name, &value),
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DefaultConversionService;
    use crate::resolver::ResolutionError;
    use crate::service::{ParamAnnotation, ParameterDefinition};
    use std::collections::BTreeMap;

    fn resolver() -> RequestHeaderArgumentResolver {
        RequestHeaderArgumentResolver::new(Arc::new(DefaultConversionService))
    }

    fn parameter(annotation: ParamAnnotation) -> MethodParameter {
        MethodParameter::new(
            "call",
            0,
            ParameterDefinition::of::<String>("trace_id").annotated(annotation),
        )
    }

    #[test]
    fn test_named_header() {
        let mut request = HttpRequestValues::new();
        resolver()
            .resolve(
                Argument::from("abc"),
                &parameter(ParamAnnotation::header().named("X-Trace")),
                &mut request,
            )
            .unwrap();
        assert_eq!(request.headers().get("x-trace").unwrap(), "abc");
    }

    #[test]
    fn test_parameter_name_fallback() {
        let mut request = HttpRequestValues::new();
        resolver()
            .resolve(Argument::from(1), &parameter(ParamAnnotation::header()), &mut request)
            .unwrap();
        assert_eq!(request.headers().get("trace_id").unwrap(), "1");
    }

    #[test]
    fn test_repeated_header() {
        let mut request = HttpRequestValues::new();
        resolver()
            .resolve(
                Argument::from(vec!["a", "b"]),
                &parameter(ParamAnnotation::header().named("X-Tag")),
                &mut request,
            )
            .unwrap();
        assert_eq!(request.headers().get_all("x-tag").iter().count(), 2);
    }

    #[test]
    fn test_header_map() {
        let mut headers = BTreeMap::new();
        headers.insert("X-One", "1");
        headers.insert("X-Two", "2");

        let mut request = HttpRequestValues::new();
        resolver()
            .resolve(Argument::from(headers), &parameter(ParamAnnotation::header()), &mut request)
            .unwrap();
        assert_eq!(request.headers().len(), 2);
    }

    #[test]
    fn test_missing_required() {
        let mut request = HttpRequestValues::new();
        let error = resolver()
            .resolve(Argument::Null, &parameter(ParamAnnotation::header()), &mut request)
            .unwrap_err();
        assert!(matches!(
            error,
            HttpServiceError::Resolution(ResolutionError::MissingValue { kind: "header", .. })
        ));
    }

    #[test]
    fn test_invalid_header_value() {
        let mut request = HttpRequestValues::new();
        let error = resolver()
            .resolve(
                Argument::from("bad\r\nvalue"),
                &parameter(ParamAnnotation::header().named("X-Bad")),
                &mut request,
            )
            .unwrap_err();
        assert!(error.is_resolution_error());
    }
}
