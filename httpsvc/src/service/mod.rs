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

//! Service definitions, clients and the factory that builds them.
//!
//! # Lifecycle
//!
//! 1. Describe a service with an [`HttpServiceDefinition`], by hand or
//!    through an [`HttpService`] implementation.
//! 2. Assemble an [`HttpServiceProxyFactory`] with
//!    [`HttpServiceProxyFactoryBuilder`]; only a transport is required.
//! 3. Build a client. Every remote method gets an [`HttpRequestTemplate`] and
//!    a resolver per parameter, or the build fails as a whole.
//! 4. Call methods. Each call resolves its arguments, builds one request and
//!    hands it to the transport; the method's [`ReturnType`] decides whether
//!    the caller blocks, receives a handle or moves on.
//!
//! # Example
//!
//! ```rust
//! use httpsvc::adapter::PayloadFuture;
//! use httpsvc::service::{
//!     ExchangeDefinition, HttpServiceDefinition, HttpServiceProxyFactory, MethodDefinition,
//!     ParamAnnotation, ParameterDefinition, ResponseKind, ReturnType,
//! };
//! use httpsvc::transport::{MemoryExchangeAdapter, ScriptedResponse};
//! use httpsvc::Argument;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let transport = MemoryExchangeAdapter::new();
//! transport.enqueue(ScriptedResponse::ok().with_json(&serde_json::json!({"name": "ada"})));
//!
//! let definition = HttpServiceDefinition::new("Users")
//!     .with_exchange(ExchangeDefinition::new().with_url("https://api.example.com"))
//!     .method(
//!         MethodDefinition::exchange("find", ExchangeDefinition::get("/users"))
//!             .param(ParameterDefinition::of::<String>("name").annotated(ParamAnnotation::request_param()))
//!             .returns(ReturnType::reactive::<PayloadFuture>(ResponseKind::Body)),
//!     );
//!
//! let factory = HttpServiceProxyFactory::builder_for(transport.clone()).build().unwrap();
//! let client = factory.create_client_from_definition(&definition).unwrap();
//!
//! let pending: PayloadFuture = client
//!     .invoke("find", vec![Argument::from("ada")])
//!     .unwrap()
//!     .into_reactive()
//!     .unwrap();
//! let user: serde_json::Value = pending.await.unwrap().unwrap().json().unwrap();
//! assert_eq!(user["name"], "ada");
//! assert_eq!(transport.take_requests()[0].url, "https://api.example.com/users?name=ada");
//! # }
//! ```

mod builder;
mod client;
mod config;
mod definition;
pub(crate) mod descriptor;
mod error;
mod factory;
mod method;
mod response;
mod spawn;

pub use self::builder::HttpServiceProxyFactoryBuilder;
pub use self::client::{HttpService, HttpServiceClient, Outcome};
pub use self::config::{DEFAULT_BLOCK_TIMEOUT, ProxyFactoryConfig};
pub use self::definition::{
    AnnotationKind, DefaultMethodHandler, ExchangeDefinition, HttpServiceDefinition,
    MethodDefinition, ParamAnnotation, ParameterDefinition, ResponseKind, ReturnShape, ReturnType,
};
pub use self::descriptor::HttpRequestTemplate;
pub use self::error::ConfigurationError;
pub use self::factory::HttpServiceProxyFactory;
pub use self::method::HttpServiceMethod;
pub use self::spawn::{DefaultSpawner, DetachedTask, TaskSpawner, TokioSpawner};
