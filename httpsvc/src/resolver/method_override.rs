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

use super::{HttpServiceArgumentResolver, MethodParameter, RequestOverride, ResolutionError};
use crate::request::HttpRequestValues;
use crate::{Argument, HttpServiceError};
use http::Method;

/// Replaces the request verb with a `Method` argument.
///
/// Claims parameters declared as [`Method`] or `Option<Method>`. A `Null`
/// argument keeps the declared verb.
#[derive(Debug, Clone, Copy, Default)]
pub struct HttpMethodArgumentResolver;

impl HttpServiceArgumentResolver for HttpMethodArgumentResolver {
    fn supports(&self, parameter: &MethodParameter) -> bool {
        parameter.is::<Method>() || parameter.is::<Option<Method>>()
    }

    fn request_override(&self) -> Option<RequestOverride> {
        Some(RequestOverride::Method)
    }

    fn resolve(
        &self,
        argument: Argument,
        parameter: &MethodParameter,
        request: &mut HttpRequestValues,
    ) -> Result<(), HttpServiceError> {
        let method = match argument {
            Argument::Null => return Ok(()),
            Argument::Method(method) => method,
            Argument::Str(text) => Method::from_bytes(text.as_bytes())
                .map_err(|e| ResolutionError::conversion(parameter.name(), e.to_string()))?,
            _ => {
                return Err(ResolutionError::UnexpectedValue {
                    parameter: parameter.name().to_string(),
                    expected: "an HTTP method",
                }
                .into());
            }
        };
        request.set_http_method(method);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::ParameterDefinition;

    fn parameter() -> MethodParameter {
        MethodParameter::new("send", 1, ParameterDefinition::of::<Method>("verb"))
    }

    #[test]
    fn test_override_verb() {
        let mut request = HttpRequestValues::with_template(Method::GET, "/");
        HttpMethodArgumentResolver
            .resolve(Argument::from(Method::PUT), &parameter(), &mut request)
            .unwrap();
        assert_eq!(request.build().unwrap().method, Method::PUT);
    }

    #[test]
    fn test_from_string() {
        let mut request = HttpRequestValues::with_template(Method::GET, "/");
        HttpMethodArgumentResolver
            .resolve(Argument::from("PATCH"), &parameter(), &mut request)
            .unwrap();
        assert_eq!(request.http_method(), Some(&Method::PATCH));
    }

    #[test]
    fn test_wrong_value() {
        let mut request = HttpRequestValues::new();
        let result = HttpMethodArgumentResolver.resolve(Argument::from(3), &parameter(), &mut request);
        assert!(result.unwrap_err().is_resolution_error());
    }
}
