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
use url::Url;

/// Replaces the target URL with a `Url` argument.
///
/// Claims parameters declared as [`Url`] or `Option<Url>`, regardless of
/// annotation. A `Null` argument keeps the templated URL. A string argument
/// is parsed as a URL.
#[derive(Debug, Clone, Copy, Default)]
pub struct UrlArgumentResolver;

impl HttpServiceArgumentResolver for UrlArgumentResolver {
    fn supports(&self, parameter: &MethodParameter) -> bool {
        parameter.is::<Url>() || parameter.is::<Option<Url>>()
    }

    fn request_override(&self) -> Option<RequestOverride> {
        Some(RequestOverride::Url)
    }

    fn resolve(
        &self,
        argument: Argument,
        parameter: &MethodParameter,
        request: &mut HttpRequestValues,
    ) -> Result<(), HttpServiceError> {
        match argument {
            Argument::Null => Ok(()),
            Argument::Url(url) => {
                request.set_url(url);
                Ok(())
            }
            Argument::Str(text) => {
                let url = Url::parse(&text)
                    .map_err(|e| ResolutionError::conversion(parameter.name(), e.to_string()))?;
                request.set_url(url);
                Ok(())
            }
            _ => Err(ResolutionError::UnexpectedValue {
                parameter: parameter.name().to_string(),
                expected: "a URL",
            }
            .into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::ParameterDefinition;
    use http::Method;

    fn parameter() -> MethodParameter {
        MethodParameter::new("fetch", 0, ParameterDefinition::of::<Option<Url>>("target"))
    }

    #[test]
    fn test_override_replaces_template() {
        let mut request = HttpRequestValues::with_template(Method::GET, "/default/{id}");
        let url = Url::parse("https://mirror.example.com/data").unwrap();
        UrlArgumentResolver
            .resolve(Argument::from(url), &parameter(), &mut request)
            .unwrap();
        assert_eq!(request.build().unwrap().url, "https://mirror.example.com/data");
    }

    #[test]
    fn test_null_keeps_template() {
        let mut request = HttpRequestValues::with_template(Method::GET, "/default");
        UrlArgumentResolver
            .resolve(Argument::Null, &parameter(), &mut request)
            .unwrap();
        assert!(request.url().is_none());
    }

    #[test]
    fn test_unparseable_string() {
        let mut request = HttpRequestValues::new();
        let result = UrlArgumentResolver.resolve(Argument::from("not a url"), &parameter(), &mut request);
        assert!(result.unwrap_err().is_resolution_error());
    }

    #[test]
    fn test_supports_by_type() {
        assert!(UrlArgumentResolver.supports(&parameter()));
        let other = MethodParameter::new("fetch", 0, ParameterDefinition::of::<String>("target"));
        assert!(!UrlArgumentResolver.supports(&other));
    }
}
