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

//! Factory configuration.

use crate::service::ConfigurationError;
use std::time::Duration;

/// Default bound on blocking calls.
pub const DEFAULT_BLOCK_TIMEOUT: Duration = Duration::from_secs(5);

/// Plain configuration values for an [`HttpServiceProxyFactory`](crate::service::HttpServiceProxyFactory).
///
/// Collaborators such as the transport or custom resolvers are given to the
/// builder directly; this struct only carries values, so it can be loaded
/// from a file when the `serde-config` feature is enabled.
///
/// # Examples
///
/// ```rust
/// use httpsvc::service::ProxyFactoryConfig;
/// use std::time::Duration;
///
/// let config = ProxyFactoryConfig::default();
/// assert_eq!(config.block_timeout, Duration::from_secs(5));
///
/// let config = ProxyFactoryConfig::new()
///     .with_block_timeout(Duration::from_millis(250))
///     .with_log_detached_failures(false);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde-config", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde-config", serde(default))]
pub struct ProxyFactoryConfig {
    /// Bound on how long a blocking method waits for its response.
    ///
    /// Asynchronous and streaming methods are never bounded by it.
    ///
    /// Default: 5 seconds
    pub block_timeout: Duration,

    /// Log fire-and-forget failures at `warn`.
    ///
    /// Failures are counted in the factory metrics either way.
    ///
    /// Default: true
    pub log_detached_failures: bool,
}

impl Default for ProxyFactoryConfig {
    fn default() -> Self {
        Self {
            block_timeout: DEFAULT_BLOCK_TIMEOUT,
            log_detached_failures: true,
        }
    }
}

impl ProxyFactoryConfig {
    /// Creates the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the blocking call timeout.
    #[must_use]
    pub fn with_block_timeout(mut self, timeout: Duration) -> Self {
        self.block_timeout = timeout;
        self
    }

    /// Sets whether fire-and-forget failures are logged.
    #[must_use]
    pub fn with_log_detached_failures(mut self, enabled: bool) -> Self {
        self.log_detached_failures = enabled;
        self
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::InvalidConfig`] if the block timeout is zero.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if self.block_timeout.is_zero() {
            return Err(ConfigurationError::InvalidConfig {
                reason: "block_timeout must be greater than 0".to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ProxyFactoryConfig::default();
        assert_eq!(config.block_timeout, DEFAULT_BLOCK_TIMEOUT);
        assert!(config.log_detached_failures);
    }

    #[test]
    fn test_builder_pattern() {
        let config = ProxyFactoryConfig::new()
            .with_block_timeout(Duration::from_secs(1))
            .with_log_detached_failures(false);
        assert_eq!(config.block_timeout, Duration::from_secs(1));
        assert!(!config.log_detached_failures);
    }

    #[test]
    fn test_validate_zero_timeout() {
        let config = ProxyFactoryConfig {
            block_timeout: Duration::ZERO,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigurationError::InvalidConfig { .. })
        ));
    }

    #[cfg(feature = "serde-config")]
    #[test]
    fn test_deserialize_partial() {
        let config: ProxyFactoryConfig =
            serde_json::from_str(r#"{"log_detached_failures": false}"#).unwrap();
        assert_eq!(config.block_timeout, DEFAULT_BLOCK_TIMEOUT);
        assert!(!config.log_detached_failures);
    }
}
