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

//! Request body representations.

use crate::adapter::Publisher;
use bytes::Bytes;
use std::any::Any;
use std::fmt;

/// The body of an outgoing request.
#[derive(Default)]
pub enum RequestBody {
    /// No body.
    #[default]
    Empty,
    /// Raw bytes, sent as-is.
    Bytes(Bytes),
    /// A JSON document for the transport to encode.
    Json(serde_json::Value),
    /// An asynchronous producer of body chunks, passed through un-consumed.
    ///
    /// Only [`Payload::Data`](crate::adapter::Payload::Data) items carry body
    /// content; transports ignore any other item.
    Publisher(Publisher),
    /// A value only the transport knows how to encode.
    Object(Box<dyn Any + Send>),
}

impl RequestBody {
    /// Returns `true` if there is no body.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    /// Returns `true` if the body is an asynchronous publisher.
    #[must_use]
    pub const fn is_publisher(&self) -> bool {
        matches!(self, Self::Publisher(_))
    }

    /// Returns the body bytes of [`RequestBody::Bytes`], or the encoded JSON of
    /// [`RequestBody::Json`].
    #[must_use]
    pub fn to_bytes(&self) -> Option<Bytes> {
        match self {
            Self::Bytes(bytes) => Some(bytes.clone()),
            Self::Json(json) => serde_json::to_vec(json).ok().map(Bytes::from),
            _ => None,
        }
    }
}

impl fmt::Debug for RequestBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => f.write_str("Empty"),
            Self::Bytes(bytes) => f.debug_tuple("Bytes").field(bytes).finish(),
            Self::Json(json) => f.debug_tuple("Json").field(json).finish(),
            Self::Publisher(_) => f.write_str("Publisher(..)"),
            Self::Object(_) => f.write_str("Object(..)"),
        }
    }
}
