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

/// Adds cookie parameters.
#[derive(Debug, Clone)]
pub struct CookieValueArgumentResolver {
    conversion: Arc<dyn ConversionService>,
}

impl CookieValueArgumentResolver {
    /// Creates a resolver converting values with `conversion`.
    #[must_use]
    pub fn new(conversion: Arc<dyn ConversionService>) -> Self {
        Self { conversion }
    }
}

impl HttpServiceArgumentResolver for CookieValueArgumentResolver {
    fn supports(&self, parameter: &MethodParameter) -> bool {
        parameter.has_annotation(AnnotationKind::CookieValue)
    }

    fn resolve(
        &self,
        argument: Argument,
        parameter: &MethodParameter,
        request: &mut HttpRequestValues,
    ) -> Result<(), HttpServiceError> {
        let Some(info) = NamedValueInfo::of(parameter, AnnotationKind::CookieValue, "cookie")
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
                request.add_cookie(name, value);
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

    #[test]
    fn test_cookie_entries() {
        let resolver = CookieValueArgumentResolver::new(Arc::new(DefaultConversionService));
        let parameter = MethodParameter::new(
            "me",
            0,
            ParameterDefinition::of::<String>("session")
                .annotated(ParamAnnotation::cookie_value().named("SESSION")),
        );
        let mut request = HttpRequestValues::new();
        resolver
            .resolve(Argument::from("s1"), &parameter, &mut request)
            .unwrap();
        resolver
            .resolve(Argument::from("s2"), &parameter, &mut request)
            .unwrap();

        let built = request.build().unwrap();
        assert_eq!(built.cookie_header().as_deref(), Some("SESSION=s1; SESSION=s2"));
    }
}
