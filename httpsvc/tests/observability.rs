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

//! Counters shared by every client a factory builds, exercised with a
//! `tracing` subscriber installed so the logged paths run too.

use http::StatusCode;
use httpsvc::service::{
    ExchangeDefinition, HttpServiceDefinition, HttpServiceProxyFactory, MethodDefinition,
    ParamAnnotation, ParameterDefinition,
};
use httpsvc::transport::{MemoryExchangeAdapter, ScriptedResponse};
use httpsvc::Argument;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new("httpsvc=debug"))
        .with_test_writer()
        .try_init();
}

fn definition(name: &str) -> HttpServiceDefinition {
    HttpServiceDefinition::new(name)
        .with_exchange(ExchangeDefinition::new().with_url("http://metrics"))
        .method(
            MethodDefinition::exchange("get", ExchangeDefinition::get("/items/{id}"))
                .param(ParameterDefinition::of::<u64>("id").annotated(ParamAnnotation::path_variable())),
        )
        .method(MethodDefinition::default_method("noop", |_, _| {
            Ok(httpsvc::Outcome::Value(None))
        }))
}

#[test]
fn test_metrics_shared_across_clients() {
    init_tracing();
    let transport = MemoryExchangeAdapter::new()
        .with_default_response(ScriptedResponse::ok().with_json(&"item"));
    let factory = HttpServiceProxyFactory::builder_for(transport.clone())
        .build()
        .unwrap();
    let first = factory.create_client_from_definition(&definition("First")).unwrap();
    let second = factory.create_client_from_definition(&definition("Second")).unwrap();

    first.invoke("get", vec![Argument::from(1u64)]).unwrap();
    second.invoke("get", vec![Argument::from(2u64)]).unwrap();
    second.invoke("noop", Vec::new()).unwrap();

    let metrics = factory.metrics();
    assert_eq!(metrics.total_invocations(), 2);
    assert_eq!(metrics.total_default_method_calls(), 1);
    assert_eq!(metrics.total_failures(), 0);
    assert_eq!(first.metrics().total_invocations(), 2);
}

#[test]
fn test_failures_are_classified() {
    init_tracing();
    let transport = MemoryExchangeAdapter::new();
    transport.enqueue(ScriptedResponse::status(StatusCode::INTERNAL_SERVER_ERROR));
    let factory = HttpServiceProxyFactory::builder_for(transport.clone())
        .block_timeout(Duration::from_millis(50))
        .build()
        .unwrap();
    let client = factory.create_client_from_definition(&definition("Items")).unwrap();

    assert!(client.invoke("get", vec![Argument::Null]).is_err());
    assert!(client.invoke("get", vec![Argument::from(7u64)]).is_err());
    transport.enqueue(ScriptedResponse::pending());
    assert!(client.invoke("get", vec![Argument::from(8u64)]).is_err());

    let metrics = factory.metrics();
    assert_eq!(metrics.total_invocations(), 3);
    assert_eq!(metrics.total_resolution_failures(), 1);
    assert_eq!(metrics.total_timeouts(), 1);
    assert_eq!(metrics.total_failures(), 3);
    assert_eq!(transport.exchange_count(), 2);
}
