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

//! Build-time configuration errors.
//!
//! Every variant here aborts client construction. No partially built client
//! is ever handed out, so a configuration error can never surface at call
//! time.

use thiserror::Error;

/// Errors detected while building a factory or a client.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    /// No resolver in the chain claimed a parameter.
    #[error("no argument resolver for parameter '{parameter}' (index {index}) of method '{method}'")]
    UnresolvedParameter {
        /// The method name.
        method: String,
        /// The parameter name.
        parameter: String,
        /// The parameter position.
        index: usize,
    },

    /// A method declares more than one override of the same kind.
    #[error("method '{method}' declares more than one {kind} override parameter")]
    ConflictingOverrides {
        /// The method name.
        method: String,
        /// The override kind ("url" or "http method").
        kind: &'static str,
    },

    /// Neither the method nor its service declares an HTTP verb.
    #[error("method '{method}' does not declare an HTTP method")]
    MissingHttpMethod {
        /// The method name.
        method: String,
    },

    /// The declared return type has no adapter in the registry.
    #[error("method '{method}' returns unsupported type '{type_name}'")]
    UnsupportedReturnType {
        /// The method name.
        method: String,
        /// The declared return type.
        type_name: &'static str,
    },

    /// A `${...}` placeholder in a URL template could not be resolved.
    #[error("could not resolve placeholder '{placeholder}'")]
    UnresolvablePlaceholder {
        /// The unresolved placeholder key.
        placeholder: String,
    },

    /// The factory was built without a transport.
    #[error("an HttpExchangeAdapter is required")]
    MissingExchangeAdapter,

    /// Two methods with the same name were declared on one service.
    #[error("service '{service}' declares method '{method}' more than once")]
    DuplicateMethod {
        /// The service name.
        service: String,
        /// The duplicated method name.
        method: String,
    },

    /// A fixed header declared on a service or method is not valid.
    #[error("invalid fixed header '{header}': {reason}")]
    InvalidHeader {
        /// The header declaration as written.
        header: String,
        /// Why the header was rejected.
        reason: String,
    },

    /// A factory configuration value is out of range.
    #[error("invalid configuration: {reason}")]
    InvalidConfig {
        /// Why the configuration was rejected.
        reason: String,
    },

    /// A request body of a type that produces no values.
    #[error("parameter '{parameter}' of method '{method}' is a body type that produces no value")]
    NoValueBody {
        /// The method name.
        method: String,
        /// The parameter name.
        parameter: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unresolved_parameter_display() {
        let error = ConfigurationError::UnresolvedParameter {
            method: "get_user".to_string(),
            parameter: "id".to_string(),
            index: 0,
        };
        let message = error.to_string();
        assert!(message.contains("'id'"));
        assert!(message.contains("'get_user'"));
    }

    #[test]
    fn test_missing_adapter_display() {
        assert_eq!(
            ConfigurationError::MissingExchangeAdapter.to_string(),
            "an HttpExchangeAdapter is required"
        );
    }
}
