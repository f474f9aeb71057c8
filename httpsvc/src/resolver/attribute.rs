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

use super::{HttpServiceArgumentResolver, MethodParameter, ResolutionError};
use crate::request::HttpRequestValues;
use crate::service::AnnotationKind;
use crate::{Argument, HttpServiceError};

/// Stores request-attribute parameters for the transport.
///
/// Attributes are never sent on the wire. The value is stored as given,
/// without conversion; what a transport does with it is up to the transport.
#[derive(Debug, Clone, Copy, Default)]
pub struct RequestAttributeArgumentResolver;

impl HttpServiceArgumentResolver for RequestAttributeArgumentResolver {
    fn supports(&self, parameter: &MethodParameter) -> bool {
        parameter.has_annotation(AnnotationKind::RequestAttribute)
    }

    fn resolve(
        &self,
        argument: Argument,
        parameter: &MethodParameter,
        request: &mut HttpRequestValues,
    ) -> Result<(), HttpServiceError> {
        let Some(annotation) = parameter
            .definition()
            .annotation_of(AnnotationKind::RequestAttribute)
        else {
            return Ok(());
        };
        let name = annotation
            .name()
            .filter(|name| !name.is_empty())
            .unwrap_or(parameter.name());

        if argument.is_null() {
            if annotation.is_required() && !parameter.definition().is_optional() {
                return Err(ResolutionError::missing("request attribute", name).into());
            }
            return Ok(());
        }
        request.add_attribute(name, argument);
        Ok(())
    }
}
