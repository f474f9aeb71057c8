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

//! Build-time resolution of `${...}` placeholders in URL templates.
//!
//! Placeholders are filled from process configuration once, when a client is
//! built. They are unrelated to `{name}` path variables, which are filled
//! from call arguments on every invocation.

use crate::service::ConfigurationError;
use std::collections::HashMap;
use std::fmt;

/// Resolves embedded placeholders in a declared URL.
pub trait EmbeddedValueResolver: fmt::Debug + Send + Sync {
    /// Returns `value` with every placeholder replaced.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::UnresolvablePlaceholder`] for a
    /// placeholder that has neither a value nor a default.
    fn resolve(&self, value: &str) -> Result<String, ConfigurationError>;
}

/// Resolves `${key}` and `${key:default}` from a fixed property map.
///
/// # Examples
///
/// ```rust
/// use httpsvc::{EmbeddedValueResolver, PropertyPlaceholderResolver};
///
/// let resolver = PropertyPlaceholderResolver::new()
///     .with_property("api.host", "https://api.example.com");
///
/// assert_eq!(
///     resolver.resolve("${api.host}/v${api.version:1}/users").unwrap(),
///     "https://api.example.com/v1/users"
/// );
/// assert!(resolver.resolve("${missing}").is_err());
/// ```
#[derive(Debug, Clone, Default)]
pub struct PropertyPlaceholderResolver {
    properties: HashMap<String, String>,
}

impl PropertyPlaceholderResolver {
    /// Creates a resolver with no properties.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a resolver from an existing property map.
    #[must_use]
    pub fn from_properties(properties: HashMap<String, String>) -> Self {
        Self { properties }
    }

    /// Adds a property.
    #[must_use]
    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }
}

impl EmbeddedValueResolver for PropertyPlaceholderResolver {
    fn resolve(&self, value: &str) -> Result<String, ConfigurationError> {
        let mut resolved = String::with_capacity(value.len());
        let mut rest = value;

        while let Some(start) = rest.find("${") {
            resolved.push_str(&rest[..start]);
            let after = &rest[start + 2..];
            let Some(end) = after.find('}') else {
                // Unterminated, keep the remainder verbatim.
                resolved.push_str(&rest[start..]);
                return Ok(resolved);
            };

            let expression = &after[..end];
            let (key, default) = match expression.split_once(':') {
                Some((key, default)) => (key, Some(default)),
                None => (expression, None),
            };

            match (self.properties.get(key), default) {
                (Some(found), _) => resolved.push_str(found),
                (None, Some(default)) => resolved.push_str(default),
                (None, None) => {
                    return Err(ConfigurationError::UnresolvablePlaceholder {
                        placeholder: key.to_string(),
                    });
                }
            }
            rest = &after[end + 1..];
        }

        resolved.push_str(rest);
        Ok(resolved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_placeholders() {
        let resolver = PropertyPlaceholderResolver::new();
        assert_eq!(resolver.resolve("/users/{id}").unwrap(), "/users/{id}");
    }

    #[test]
    fn test_property_wins_over_default() {
        let resolver = PropertyPlaceholderResolver::new().with_property("v", "2");
        assert_eq!(resolver.resolve("/v${v:1}").unwrap(), "/v2");
    }

    #[test]
    fn test_multiple_placeholders() {
        let resolver = PropertyPlaceholderResolver::new()
            .with_property("host", "h")
            .with_property("port", "80");
        assert_eq!(resolver.resolve("${host}:${port}").unwrap(), "h:80");
    }

    #[test]
    fn test_unterminated_is_kept() {
        let resolver = PropertyPlaceholderResolver::new();
        assert_eq!(resolver.resolve("/a/${oops").unwrap(), "/a/${oops");
    }

    #[test]
    fn test_missing_without_default_fails() {
        let resolver = PropertyPlaceholderResolver::new();
        assert_eq!(
            resolver.resolve("${base}/x"),
            Err(ConfigurationError::UnresolvablePlaceholder {
                placeholder: "base".to_string()
            })
        );
    }
}
