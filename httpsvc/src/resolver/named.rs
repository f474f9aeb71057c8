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

//! Shared handling for resolvers that add `name -> value` entries.

use super::{MethodParameter, ResolutionError};
use crate::Argument;
use crate::conversion::ConversionService;
use crate::service::AnnotationKind;

/// What a named-value resolver needs to know about its parameter.
#[derive(Debug, Clone, Copy)]
pub(crate) struct NamedValueInfo<'a> {
    /// Header, variable, parameter or cookie name.
    pub name: &'a str,
    /// Whether the name came from the annotation.
    pub explicit: bool,
    pub required: bool,
    pub default_value: Option<&'a str>,
    /// Used in error messages, e.g. "header".
    pub label: &'static str,
}

impl<'a> NamedValueInfo<'a> {
    /// Reads the annotation of `kind` on `parameter`, if present.
    pub fn of(
        parameter: &'a MethodParameter,
        kind: AnnotationKind,
        label: &'static str,
    ) -> Option<Self> {
        let annotation = parameter.definition().annotation_of(kind)?;
        let explicit = annotation.name().is_some_and(|name| !name.is_empty());
        Some(Self {
            name: annotation.name().filter(|_| explicit).unwrap_or(parameter.name()),
            explicit,
            required: annotation.is_required() && !parameter.definition().is_optional(),
            default_value: annotation.default_value(),
            label,
        })
    }
}

/// Which argument shapes a resolver accepts besides a single value.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Shapes {
    /// A list adds one entry per element.
    pub multi_value: bool,
    /// A map without an explicit name adds one entry per key.
    pub map: bool,
}

/// Converts `argument` into string entries and hands each to `add`.
///
/// `Null`, and an empty list, fall back to the default value, fail when the
/// value is required, or add nothing.
pub(crate) fn resolve_named_value(
    info: NamedValueInfo<'_>,
    argument: Argument,
    shapes: Shapes,
    conversion: &dyn ConversionService,
    add: &mut dyn FnMut(&str, String) -> Result<(), ResolutionError>,
) -> Result<(), ResolutionError> {
    match argument {
        Argument::Map(entries) if shapes.map && !info.explicit => {
            for (key, value) in entries {
                let entry = NamedValueInfo {
                    name: &key,
                    explicit: true,
                    required: false,
                    default_value: None,
                    label: info.label,
                };
                resolve_named_value(entry, value, shapes, conversion, add)?;
            }
            Ok(())
        }
        Argument::List(values) if values.is_empty() => absent(info, add),
        Argument::List(values) if shapes.multi_value => {
            let mut added = false;
            for value in values {
                if let Some(converted) = convert(info, &value, conversion)? {
                    add(info.name, converted)?;
                    added = true;
                }
            }
            if added { Ok(()) } else { absent(info, add) }
        }
        Argument::List(_) => Err(ResolutionError::UnexpectedValue {
            parameter: info.name.to_string(),
            expected: "a single value",
        }),
        value => match convert(info, &value, conversion)? {
            Some(converted) => add(info.name, converted),
            None => absent(info, add),
        },
    }
}

fn absent(
    info: NamedValueInfo<'_>,
    add: &mut dyn FnMut(&str, String) -> Result<(), ResolutionError>,
) -> Result<(), ResolutionError> {
    match info.default_value {
        Some(default) => add(info.name, default.to_string()),
        None if info.required => Err(ResolutionError::missing(info.label, info.name)),
        None => Ok(()),
    }
}

fn convert(
    info: NamedValueInfo<'_>,
    value: &Argument,
    conversion: &dyn ConversionService,
) -> Result<Option<String>, ResolutionError> {
    conversion
        .convert(value)
        .map_err(|reason| ResolutionError::conversion(info.name, reason))
}
