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

use crate::adapter::Publisher;
use crate::request::HttpRequest;
use std::sync::Arc;

/// Executes HTTP requests on behalf of the invocation pipeline.
///
/// Implementations are shared by every client a factory builds and are
/// called concurrently, so any state must be internally synchronized.
///
/// # Implementing a Transport
///
/// ```rust
/// use httpsvc::adapter::{Payload, Publisher, ResponseHead};
/// use httpsvc::request::HttpRequest;
/// use httpsvc::transport::HttpExchangeAdapter;
/// use futures::StreamExt;
/// use http::StatusCode;
///
/// /// Answers every request with `204 No Content`.
/// struct NoContent;
///
/// impl HttpExchangeAdapter for NoContent {
///     fn exchange(&self, _request: HttpRequest) -> Publisher {
///         futures::stream::once(async {
///             Ok(Payload::Head(ResponseHead::new(StatusCode::NO_CONTENT)))
///         })
///         .boxed()
///     }
/// }
/// ```
pub trait HttpExchangeAdapter: Send + Sync + 'static {
    /// Starts an exchange for `request`.
    ///
    /// The returned publisher must not perform any work until polled, and
    /// must cancel outstanding work when dropped.
    fn exchange(&self, request: HttpRequest) -> Publisher;
}

impl<T: HttpExchangeAdapter + ?Sized> HttpExchangeAdapter for Arc<T> {
    fn exchange(&self, request: HttpRequest) -> Publisher {
        (**self).exchange(request)
    }
}

impl<T: HttpExchangeAdapter + ?Sized> HttpExchangeAdapter for Box<T> {
    fn exchange(&self, request: HttpRequest) -> Publisher {
        (**self).exchange(request)
    }
}
