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

//! Call-time argument resolution errors.

use thiserror::Error;

/// Errors raised while turning one call's arguments into a request.
///
/// A resolution error fails only the invocation that produced it; the
/// client and all other in-flight calls are unaffected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolutionError {
    /// A required argument was absent and no default value was declared.
    #[error("missing {kind} value '{name}'")]
    MissingValue {
        /// What kind of request component was missing ("header", "body", ...).
        kind: &'static str,
        /// The component name.
        name: String,
    },

    /// An argument could not be converted to its string wire form.
    #[error("cannot convert value for '{name}': {reason}")]
    Conversion {
        /// The component name.
        name: String,
        /// Why the conversion failed.
        reason: String,
    },

    /// The URL template names a path variable that no argument supplied.
    #[error("no value for path variable '{name}'")]
    MissingPathVariable {
        /// The placeholder name.
        name: String,
    },

    /// A header name or value is not valid HTTP.
    #[error("invalid header '{name}': {reason}")]
    InvalidHeader {
        /// The header name.
        name: String,
        /// Why the header was rejected.
        reason: String,
    },

    /// The request body could not be produced.
    #[error("invalid request body: {reason}")]
    InvalidBody {
        /// Why the body was rejected.
        reason: String,
    },

    /// A resolver received a value of an unexpected shape.
    #[error("unexpected value for parameter '{parameter}': expected {expected}")]
    UnexpectedValue {
        /// The parameter name.
        parameter: String,
        /// Description of the accepted value shape.
        expected: &'static str,
    },
}

impl ResolutionError {
    /// Creates a conversion error.
    pub fn conversion(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Conversion {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Creates a missing-value error.
    pub fn missing(kind: &'static str, name: impl Into<String>) -> Self {
        Self::MissingValue {
            kind,
            name: name.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let error = ResolutionError::missing("header", "X-Trace");
        assert_eq!(error.to_string(), "missing header value 'X-Trace'");

        let error = ResolutionError::MissingPathVariable {
            name: "id".to_string(),
        };
        assert!(error.to_string().contains("'id'"));
    }
}
