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

/// Fills `{name}` placeholders in the URL template.
///
/// Each variable takes exactly one value; a list argument is rejected. A map
/// argument on a parameter without an explicit name sets one variable per
/// entry. Values are percent-encoded when the request is built.
///
/// An optional variable with no value sets nothing, so a template that still
/// names it fails the build with [`ResolutionError::MissingPathVariable`].
///
/// [`ResolutionError::MissingPathVariable`]: super::ResolutionError::MissingPathVariable
#[derive(Debug, Clone)]
pub struct PathVariableArgumentResolver {
    conversion: Arc<dyn ConversionService>,
}

impl PathVariableArgumentResolver {
    /// Creates a resolver converting values with `conversion`.
    #[must_use]
    pub fn new(conversion: Arc<dyn ConversionService>) -> Self {
        Self { conversion }
    }
}

impl HttpServiceArgumentResolver for PathVariableArgumentResolver {
    fn supports(&self, parameter: &MethodParameter) -> bool {
        parameter.has_annotation(AnnotationKind::PathVariable)
    }

    fn resolve(
        &self,
        argument: Argument,
        parameter: &MethodParameter,
        request: &mut HttpRequestValues,
    ) -> Result<(), HttpServiceError> {
        let Some(info) =
            NamedValueInfo::of(parameter, AnnotationKind::PathVariable, "path variable")
        else {
            return Ok(());
        };
        let shapes = Shapes {
            multi_value: false,
            map: true,
        };
        resolve_named_value(
            info,
            argument,
            shapes,
            self.conversion.as_ref(),
            &mut |name, value| {
                request.set_uri_variable(name, value);
                Ok(())
            },
        )?;
        Ok(())
    }
}
