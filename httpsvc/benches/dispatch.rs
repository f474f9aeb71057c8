//! Dispatch benchmarks for httpsvc
//!
//! Measures the two halves of a call:
//! - Argument resolution into a request
//! - A full blocking call through the in-memory transport

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use httpsvc::service::{
    ExchangeDefinition, HttpServiceClient, HttpServiceDefinition, HttpServiceProxyFactory,
    MethodDefinition, ParamAnnotation, ParameterDefinition, ResponseKind, ReturnType,
};
use httpsvc::transport::{MemoryExchangeAdapter, ScriptedResponse};
use httpsvc::Argument;

fn client(body_size: usize) -> HttpServiceClient {
    let transport = MemoryExchangeAdapter::new()
        .with_default_response(ScriptedResponse::ok().with_body(vec![b'x'; body_size]));
    let definition = HttpServiceDefinition::new("Bench")
        .with_exchange(ExchangeDefinition::new().with_url("http://bench"))
        .method(
            MethodDefinition::exchange("get", ExchangeDefinition::get("/items/{id}"))
                .param(ParameterDefinition::of::<u64>("id").annotated(ParamAnnotation::path_variable()))
                .param(
                    ParameterDefinition::of::<String>("trace")
                        .annotated(ParamAnnotation::header().named("X-Trace")),
                )
                .param(ParameterDefinition::of::<Vec<String>>("tag").annotated(ParamAnnotation::request_param()))
                .returns(ReturnType::blocking(ResponseKind::Body)),
        );
    HttpServiceProxyFactory::builder_for(transport)
        .build()
        .unwrap()
        .create_client_from_definition(&definition)
        .unwrap()
}

fn arguments() -> Vec<Argument> {
    vec![
        Argument::from(42u64),
        Argument::from("trace-1"),
        Argument::from(vec!["a", "b", "c"]),
    ]
}

/// Benchmark resolving arguments into a request without sending it
fn bench_resolve(c: &mut Criterion) {
    let client = client(0);
    let method = client.method("get").unwrap().clone();
    c.bench_function("resolve", |b| {
        b.iter(|| black_box(method.resolve(arguments()).unwrap()));
    });
}

/// Benchmark a full blocking call against the in-memory transport
fn bench_blocking_dispatch(c: &mut Criterion) {
    let mut group = c.benchmark_group("blocking_dispatch");

    for size in [0usize, 1024, 65536] {
        let client = client(size);
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{size}bytes")),
            &size,
            |b, _| {
                b.iter(|| black_box(client.invoke("get", arguments()).unwrap()));
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_resolve, bench_blocking_dispatch);
criterion_main!(benches);
