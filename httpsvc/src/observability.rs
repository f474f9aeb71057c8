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

//! Observability support for service clients.
//!
//! Every factory owns a [`ClientMetrics`] shared by all the clients it
//! builds. The counters are plain atomics, always available; with the
//! `observability` feature enabled each update is also reported through the
//! [`metrics`](https://docs.rs/metrics) facade under the `httpsvc.client.*`
//! names, and the pipeline logs through [`tracing`](https://docs.rs/tracing):
//!
//! | Event                              | Level   |
//! |------------------------------------|---------|
//! | Method bound at build time         | `debug` |
//! | Request issued                     | `debug` |
//! | Default method invoked             | `debug` |
//! | Memory exchange created/cancelled  | `debug` |
//! | Call failed                        | `warn`  |
//! | Fire-and-forget request failed     | `warn`  |
//!
//! # Examples
//!
//! ```rust
//! use httpsvc::observability::ClientMetrics;
//!
//! let metrics = ClientMetrics::new();
//! metrics.record_invocation();
//! metrics.record_timeout();
//!
//! assert_eq!(metrics.total_invocations(), 1);
//! assert_eq!(metrics.total_failures(), 1);
//! assert_eq!(metrics.total_timeouts(), 1);
//! ```

mod metrics;

pub use self::metrics::ClientMetrics;
