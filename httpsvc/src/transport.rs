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

//! The HTTP transport abstraction.
//!
//! The invocation pipeline never performs I/O itself. Every finished
//! [`HttpRequest`](crate::request::HttpRequest) is handed to an
//! [`HttpExchangeAdapter`], which returns a [`Publisher`](crate::adapter::Publisher)
//! of response [`Payload`](crate::adapter::Payload)s. Connection handling, TLS
//! and transport-level retries all live behind this trait.
//!
//! This module includes:
//!
//! - [`HttpExchangeAdapter`]: the transport contract
//! - [`ExchangeError`]: failures a transport reports
//! - [`MemoryExchangeAdapter`]: an in-process transport with scripted
//!   responses, for tests and examples
//!
//! # Contract
//!
//! A transport emits one [`Payload::Head`](crate::adapter::Payload::Head)
//! followed by zero or more [`Payload::Data`](crate::adapter::Payload::Data)
//! chunks, or an error. The publisher must be lazy: no I/O starts until it is
//! first polled. Dropping it before the end must stop delivery and release
//! whatever the exchange holds.
//!
//! # Examples
//!
//! ```rust
//! use httpsvc::transport::{MemoryExchangeAdapter, ScriptedResponse};
//!
//! let transport = MemoryExchangeAdapter::new()
//!     .with_default_response(ScriptedResponse::ok().with_body("pong"));
//! assert_eq!(transport.exchange_count(), 0);
//! ```

mod error;
mod memory;
mod traits;

pub use self::error::ExchangeError;
pub use self::memory::{MemoryExchangeAdapter, RecordedRequest, ResponseGate, ScriptedResponse};
pub use self::traits::HttpExchangeAdapter;
