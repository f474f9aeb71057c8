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

//! Runtime argument values passed to service methods.
//!
//! A typed stand-in converts each of its Rust arguments into an [`Argument`]
//! before handing the call to the dispatcher. Most std types convert with
//! `into()`; structured request bodies go through [`Argument::json`] and
//! anything else can travel as an opaque [`Argument::object`].
//!
//! ```rust
//! use httpsvc::Argument;
//!
//! let id: Argument = 42u64.into();
//! let page: Argument = Option::<u32>::None.into();
//! let tags: Argument = vec!["a", "b"].into();
//!
//! assert!(matches!(id, Argument::UInt(42)));
//! assert!(page.is_null());
//! assert!(matches!(tags, Argument::List(ref items) if items.len() == 2));
//! ```

use bytes::Bytes;
use http::Method;
use serde::Serialize;
use std::any::Any;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use url::Url;

/// A single runtime argument of a service method call.
pub enum Argument {
    /// No value. Produced by `None` and by `()`.
    Null,
    /// A string.
    Str(String),
    /// A signed integer.
    Int(i64),
    /// An unsigned integer.
    UInt(u64),
    /// A floating point number.
    Float(f64),
    /// A boolean.
    Bool(bool),
    /// Several values, e.g. a repeated header or query parameter.
    List(Vec<Argument>),
    /// Named values in declaration order, e.g. a header map.
    Map(Vec<(String, Argument)>),
    /// An absolute URL.
    Url(Url),
    /// An HTTP verb.
    Method(Method),
    /// Raw bytes, used as-is for request bodies.
    Bytes(Bytes),
    /// A JSON document, used for request bodies.
    Json(serde_json::Value),
    /// An opaque value for custom resolvers and asynchronous body types.
    Object(Box<dyn Any + Send>),
}

impl Argument {
    /// Serializes a value into an [`Argument::Json`].
    ///
    /// # Errors
    ///
    /// Returns the serializer's error if `value` cannot be represented as JSON.
    pub fn json<T: Serialize + ?Sized>(value: &T) -> Result<Self, serde_json::Error> {
        serde_json::to_value(value).map(Self::Json)
    }

    /// Boxes an arbitrary value into an [`Argument::Object`].
    ///
    /// ```rust
    /// use httpsvc::Argument;
    ///
    /// struct Token(&'static str);
    ///
    /// let argument = Argument::object(Token("secret"));
    /// assert_eq!(argument.downcast_ref::<Token>().map(|t| t.0), Some("secret"));
    /// ```
    pub fn object<T: Any + Send>(value: T) -> Self {
        Self::Object(Box::new(value))
    }

    /// Returns `true` for [`Argument::Null`].
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Borrows the inner value of an [`Argument::Object`] as `T`.
    #[must_use]
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        match self {
            Self::Object(value) => value.downcast_ref::<T>(),
            _ => None,
        }
    }

    /// Returns a short description of the variant, used in error messages.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Str(_) => "string",
            Self::Int(_) | Self::UInt(_) => "integer",
            Self::Float(_) => "float",
            Self::Bool(_) => "boolean",
            Self::List(_) => "list",
            Self::Map(_) => "map",
            Self::Url(_) => "url",
            Self::Method(_) => "http method",
            Self::Bytes(_) => "bytes",
            Self::Json(_) => "json",
            Self::Object(_) => "object",
        }
    }
}

impl fmt::Debug for Argument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("Null"),
            Self::Str(v) => f.debug_tuple("Str").field(v).finish(),
            Self::Int(v) => f.debug_tuple("Int").field(v).finish(),
            Self::UInt(v) => f.debug_tuple("UInt").field(v).finish(),
            Self::Float(v) => f.debug_tuple("Float").field(v).finish(),
            Self::Bool(v) => f.debug_tuple("Bool").field(v).finish(),
            Self::List(v) => f.debug_tuple("List").field(v).finish(),
            Self::Map(v) => f.debug_tuple("Map").field(v).finish(),
            Self::Url(v) => f.debug_tuple("Url").field(&v.as_str()).finish(),
            Self::Method(v) => f.debug_tuple("Method").field(v).finish(),
            Self::Bytes(v) => f.debug_tuple("Bytes").field(&v.len()).finish(),
            Self::Json(v) => f.debug_tuple("Json").field(v).finish(),
            Self::Object(_) => f.write_str("Object(..)"),
        }
    }
}

impl From<()> for Argument {
    fn from(_: ()) -> Self {
        Self::Null
    }
}

impl From<String> for Argument {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

impl From<&str> for Argument {
    fn from(value: &str) -> Self {
        Self::Str(value.to_string())
    }
}

impl From<&String> for Argument {
    fn from(value: &String) -> Self {
        Self::Str(value.clone())
    }
}

impl From<char> for Argument {
    fn from(value: char) -> Self {
        Self::Str(value.to_string())
    }
}

impl From<bool> for Argument {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

macro_rules! impl_from_signed {
    ($($ty:ty),*) => {
        $(impl From<$ty> for Argument {
            fn from(value: $ty) -> Self {
                Self::Int(i64::from(value))
            }
        })*
    };
}

macro_rules! impl_from_unsigned {
    ($($ty:ty),*) => {
        $(impl From<$ty> for Argument {
            fn from(value: $ty) -> Self {
                Self::UInt(u64::from(value))
            }
        })*
    };
}

impl_from_signed!(i8, i16, i32, i64);
impl_from_unsigned!(u8, u16, u32, u64);

impl From<isize> for Argument {
    fn from(value: isize) -> Self {
        Self::Int(value as i64)
    }
}

impl From<usize> for Argument {
    fn from(value: usize) -> Self {
        Self::UInt(value as u64)
    }
}

impl From<f32> for Argument {
    fn from(value: f32) -> Self {
        Self::Float(f64::from(value))
    }
}

impl From<f64> for Argument {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<Url> for Argument {
    fn from(value: Url) -> Self {
        Self::Url(value)
    }
}

impl From<Method> for Argument {
    fn from(value: Method) -> Self {
        Self::Method(value)
    }
}

impl From<Bytes> for Argument {
    fn from(value: Bytes) -> Self {
        Self::Bytes(value)
    }
}

impl From<serde_json::Value> for Argument {
    fn from(value: serde_json::Value) -> Self {
        Self::Json(value)
    }
}

impl<T: Into<Argument>> From<Option<T>> for Argument {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

impl<T: Into<Argument>> From<Vec<T>> for Argument {
    fn from(values: Vec<T>) -> Self {
        Self::List(values.into_iter().map(Into::into).collect())
    }
}

impl<K: Into<String>, V: Into<Argument>> From<BTreeMap<K, V>> for Argument {
    fn from(values: BTreeMap<K, V>) -> Self {
        Self::Map(
            values
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

impl<K: Into<String>, V: Into<Argument>, S> From<HashMap<K, V, S>> for Argument {
    fn from(values: HashMap<K, V, S>) -> Self {
        Self::Map(
            values
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}
