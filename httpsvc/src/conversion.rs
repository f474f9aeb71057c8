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

//! Conversion of argument values into their string wire form.
//!
//! Header, path-variable, query-parameter and cookie resolvers all go
//! through a [`ConversionService`], so one implementation controls how every
//! scalar is rendered on the wire.

use crate::argument::Argument;
use std::fmt;

/// Converts a single argument value to its string wire representation.
///
/// Returning `Ok(None)` means "no value"; the calling resolver then applies
/// its default or required-value rules.
///
/// # Examples
///
/// A conversion service that renders booleans as `1`/`0` and delegates the
/// rest:
///
/// ```rust
/// use httpsvc::{Argument, ConversionService, DefaultConversionService};
///
/// #[derive(Debug)]
/// struct NumericBooleans;
///
/// impl ConversionService for NumericBooleans {
///     fn convert(&self, value: &Argument) -> Result<Option<String>, String> {
///         match value {
///             Argument::Bool(b) => Ok(Some(if *b { "1" } else { "0" }.to_string())),
///             other => DefaultConversionService.convert(other),
///         }
///     }
/// }
///
/// assert_eq!(NumericBooleans.convert(&Argument::Bool(true)).unwrap().as_deref(), Some("1"));
/// ```
pub trait ConversionService: fmt::Debug + Send + Sync {
    /// Converts `value` to a string.
    ///
    /// # Errors
    ///
    /// Returns a human-readable reason when the value has no string form.
    fn convert(&self, value: &Argument) -> Result<Option<String>, String>;
}

/// The conversion service used when none is configured.
///
/// Scalars, URLs, HTTP verbs and scalar JSON values are formatted with their
/// natural `Display` form. Lists, maps, bytes, JSON objects and opaque
/// objects have no single string form and are rejected.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultConversionService;

impl ConversionService for DefaultConversionService {
    fn convert(&self, value: &Argument) -> Result<Option<String>, String> {
        match value {
            Argument::Null => Ok(None),
            Argument::Str(s) => Ok(Some(s.clone())),
            Argument::Int(v) => Ok(Some(v.to_string())),
            Argument::UInt(v) => Ok(Some(v.to_string())),
            Argument::Float(v) => Ok(Some(v.to_string())),
            Argument::Bool(v) => Ok(Some(v.to_string())),
            Argument::Url(url) => Ok(Some(url.to_string())),
            Argument::Method(method) => Ok(Some(method.to_string())),
            Argument::Json(json) => match json {
                serde_json::Value::Null => Ok(None),
                serde_json::Value::String(s) => Ok(Some(s.clone())),
                serde_json::Value::Bool(b) => Ok(Some(b.to_string())),
                serde_json::Value::Number(n) => Ok(Some(n.to_string())),
                _ => Err("JSON arrays and objects have no string form".to_string()),
            },
            other => Err(format!("{} values have no string form", other.kind())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use url::Url;

    fn convert(value: Argument) -> Result<Option<String>, String> {
        DefaultConversionService.convert(&value)
    }

    #[test]
    fn test_scalars() {
        assert_eq!(convert(Argument::Int(-4)).unwrap().as_deref(), Some("-4"));
        assert_eq!(convert(Argument::UInt(9)).unwrap().as_deref(), Some("9"));
        assert_eq!(convert(Argument::Float(1.5)).unwrap().as_deref(), Some("1.5"));
        assert_eq!(convert(Argument::Bool(false)).unwrap().as_deref(), Some("false"));
        assert_eq!(convert("x".into()).unwrap().as_deref(), Some("x"));
    }

    #[test]
    fn test_null_is_none() {
        assert_eq!(convert(Argument::Null).unwrap(), None);
        assert_eq!(convert(Argument::Json(serde_json::Value::Null)).unwrap(), None);
    }

    #[test]
    fn test_url_and_method() {
        let url = Url::parse("https://example.com/a").unwrap();
        assert_eq!(
            convert(url.into()).unwrap().as_deref(),
            Some("https://example.com/a")
        );
        assert_eq!(
            convert(http::Method::PATCH.into()).unwrap().as_deref(),
            Some("PATCH")
        );
    }

    #[test]
    fn test_rejects_composites() {
        assert!(convert(Argument::List(vec![])).is_err());
        assert!(convert(Argument::Map(vec![])).is_err());
        assert!(convert(Argument::object(3u8)).is_err());
        assert!(convert(Argument::Json(serde_json::json!({"a": 1}))).is_err());
    }
}
