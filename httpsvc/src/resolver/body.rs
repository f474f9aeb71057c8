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
use crate::adapter::ReactiveAdapterRegistry;
use crate::request::{HttpRequestValues, RequestBody};
use crate::service::{AnnotationKind, ConfigurationError};
use crate::{Argument, HttpServiceError};
use bytes::Bytes;
use std::sync::Arc;

/// Sets the request body.
///
/// - `Bytes` and strings are sent as raw bytes
/// - JSON values, scalars, lists and maps are sent as JSON
/// - an object whose type is registered in the [`ReactiveAdapterRegistry`]
///   is converted to a [`Publisher`](crate::adapter::Publisher) and handed
///   to the transport without being consumed
/// - any other object is passed through for the transport to encode
#[derive(Debug, Clone)]
pub struct RequestBodyArgumentResolver {
    registry: Arc<ReactiveAdapterRegistry>,
}

impl RequestBodyArgumentResolver {
    /// Creates a resolver recognizing the asynchronous types in `registry`.
    #[must_use]
    pub fn new(registry: Arc<ReactiveAdapterRegistry>) -> Self {
        Self { registry }
    }
}

impl HttpServiceArgumentResolver for RequestBodyArgumentResolver {
    fn supports(&self, parameter: &MethodParameter) -> bool {
        parameter.has_annotation(AnnotationKind::Body)
    }

    fn validate(&self, parameter: &MethodParameter) -> Result<(), ConfigurationError> {
        let no_value = self
            .registry
            .get_by_id(parameter.definition().type_id())
            .is_some_and(|adapter| adapter.descriptor().is_no_value());
        if no_value {
            return Err(ConfigurationError::NoValueBody {
                method: parameter.method_name().to_string(),
                parameter: parameter.name().to_string(),
            });
        }
        Ok(())
    }

    fn resolve(
        &self,
        argument: Argument,
        parameter: &MethodParameter,
        request: &mut HttpRequestValues,
    ) -> Result<(), HttpServiceError> {
        let required = parameter
            .definition()
            .annotation_of(AnnotationKind::Body)
            .is_some_and(|annotation| annotation.is_required())
            && !parameter.definition().is_optional();

        let body = match argument {
            Argument::Null if required => {
                return Err(ResolutionError::missing("body", parameter.name()).into());
            }
            Argument::Null => return Ok(()),
            Argument::Bytes(bytes) => RequestBody::Bytes(bytes),
            Argument::Str(text) => RequestBody::Bytes(Bytes::from(text)),
            Argument::Json(json) => RequestBody::Json(json),
            Argument::Object(object) => match self.registry.get_for_value(object.as_ref()) {
                Some(adapter) if adapter.descriptor().is_no_value() => {
                    return Err(ResolutionError::InvalidBody {
                        reason: format!(
                            "'{}' produces no value",
                            adapter.descriptor().type_name()
                        ),
                    }
                    .into());
                }
                Some(adapter) => match adapter.to_publisher(object) {
                    Some(publisher) => RequestBody::Publisher(publisher),
                    None => {
                        return Err(ResolutionError::InvalidBody {
                            reason: "body adapter rejected the value".to_string(),
                        }
                        .into());
                    }
                },
                None => RequestBody::Object(object),
            },
            other => match to_json(&other) {
                Some(json) => RequestBody::Json(json),
                None => {
                    return Err(ResolutionError::InvalidBody {
                        reason: format!("{} cannot be encoded as JSON", other.kind()),
                    }
                    .into());
                }
            },
        };
        request.set_body_value(body);
        Ok(())
    }
}

/// Converts plain arguments to JSON. Bytes and objects have no JSON form.
fn to_json(argument: &Argument) -> Option<serde_json::Value> {
    use serde_json::Value;

    Some(match argument {
        Argument::Null => Value::Null,
        Argument::Str(text) => Value::String(text.clone()),
        Argument::Int(v) => Value::from(*v),
        Argument::UInt(v) => Value::from(*v),
        Argument::Float(v) => Value::from(*v),
        Argument::Bool(v) => Value::Bool(*v),
        Argument::Url(url) => Value::String(url.to_string()),
        Argument::Method(method) => Value::String(method.to_string()),
        Argument::Json(json) => json.clone(),
        Argument::List(items) => Value::Array(items.iter().map(to_json).collect::<Option<_>>()?),
        Argument::Map(entries) => Value::Object(
            entries
                .iter()
                .map(|(key, value)| Some((key.clone(), to_json(value)?)))
                .collect::<Option<_>>()?,
        ),
        Argument::Bytes(_) | Argument::Object(_) => return None,
    })
}
