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

//! Bridging between the canonical [`Publisher`] and declared return types.
//!
//! Every asynchronous type a service method may return (and every
//! asynchronous type it may accept as a request body) is described by a
//! [`ReactiveAdapter`]: a pair of conversions to and from [`Publisher`],
//! keyed by the type's [`TypeId`]. Adapters live in a
//! [`ReactiveAdapterRegistry`], which is assembled once and never mutated.
//!
//! # Built-in Adapters
//!
//! | Type                   | Values      |
//! |------------------------|-------------|
//! | [`PayloadFuture`]      | zero or one |
//! | [`PayloadStream`]      | many        |
//! | [`CompletionFuture`]   | none        |
//!
//! # Registering a Type
//!
//! ```rust
//! use httpsvc::adapter::{Publisher, ReactiveAdapter, ReactiveAdapterRegistry};
//!
//! /// A boxed stream of raw body chunks.
//! struct Chunks(Publisher);
//!
//! let registry = ReactiveAdapterRegistry::builder()
//!     .with_defaults()
//!     .register(ReactiveAdapter::multi_value::<Chunks>(|c| c.0, Chunks))
//!     .build();
//!
//! assert!(registry.get::<Chunks>().is_some());
//! assert!(registry.get::<String>().is_none());
//! ```

mod blocking;
mod payload;

pub use blocking::{block_on_deadline, in_runtime_context};
pub use payload::{
    CompletionFuture, Payload, PayloadFuture, PayloadStream, Publisher, ResponseEntity,
    ResponseHead,
};

use futures::{StreamExt, future, stream};
use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, OnceLock};

type ToPublisher = Arc<dyn Fn(Box<dyn Any + Send>) -> Option<Publisher> + Send + Sync>;
type FromPublisher = Arc<dyn Fn(Publisher) -> Box<dyn Any + Send> + Send + Sync>;

/// Describes an asynchronous type known to the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReactiveTypeDescriptor {
    type_id: TypeId,
    type_name: &'static str,
    multi_value: bool,
    no_value: bool,
}

impl ReactiveTypeDescriptor {
    /// Describes a type that produces at most one value.
    #[must_use]
    pub fn single_value<T: Any>() -> Self {
        Self::new::<T>(false, false)
    }

    /// Describes a type that produces any number of values.
    #[must_use]
    pub fn multi_value<T: Any>() -> Self {
        Self::new::<T>(true, false)
    }

    /// Describes a type that only signals completion or failure.
    #[must_use]
    pub fn no_value<T: Any>() -> Self {
        Self::new::<T>(false, true)
    }

    fn new<T: Any>(multi_value: bool, no_value: bool) -> Self {
        Self {
            type_id: TypeId::of::<T>(),
            type_name: std::any::type_name::<T>(),
            multi_value,
            no_value,
        }
    }

    /// The described type's id.
    #[must_use]
    pub const fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// The described type's name.
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Whether the type may carry more than one value.
    #[must_use]
    pub const fn is_multi_value(&self) -> bool {
        self.multi_value
    }

    /// Whether the type carries no value at all.
    #[must_use]
    pub const fn is_no_value(&self) -> bool {
        self.no_value
    }
}

/// Converts one asynchronous type to and from [`Publisher`].
#[derive(Clone)]
pub struct ReactiveAdapter {
    descriptor: ReactiveTypeDescriptor,
    to_publisher: ToPublisher,
    from_publisher: FromPublisher,
}

impl ReactiveAdapter {
    /// Creates an adapter from typed conversion functions.
    pub fn new<T, F, G>(descriptor: ReactiveTypeDescriptor, to: F, from: G) -> Self
    where
        T: Any + Send,
        F: Fn(T) -> Publisher + Send + Sync + 'static,
        G: Fn(Publisher) -> T + Send + Sync + 'static,
    {
        debug_assert_eq!(descriptor.type_id, TypeId::of::<T>());
        Self {
            descriptor,
            to_publisher: Arc::new(move |value: Box<dyn Any + Send>| -> Option<Publisher> {
                value.downcast::<T>().ok().map(|value| to(*value))
            }),
            from_publisher: Arc::new(move |publisher: Publisher| -> Box<dyn Any + Send> {
                Box::new(from(publisher))
            }),
        }
    }

    /// Creates an adapter for a single-value type.
    pub fn single_value<T: Any + Send>(
        to: impl Fn(T) -> Publisher + Send + Sync + 'static,
        from: impl Fn(Publisher) -> T + Send + Sync + 'static,
    ) -> Self {
        Self::new(ReactiveTypeDescriptor::single_value::<T>(), to, from)
    }

    /// Creates an adapter for a multi-value type.
    pub fn multi_value<T: Any + Send>(
        to: impl Fn(T) -> Publisher + Send + Sync + 'static,
        from: impl Fn(Publisher) -> T + Send + Sync + 'static,
    ) -> Self {
        Self::new(ReactiveTypeDescriptor::multi_value::<T>(), to, from)
    }

    /// Creates an adapter for a completion-only type.
    pub fn no_value<T: Any + Send>(
        to: impl Fn(T) -> Publisher + Send + Sync + 'static,
        from: impl Fn(Publisher) -> T + Send + Sync + 'static,
    ) -> Self {
        Self::new(ReactiveTypeDescriptor::no_value::<T>(), to, from)
    }

    /// The adapted type.
    #[must_use]
    pub const fn descriptor(&self) -> &ReactiveTypeDescriptor {
        &self.descriptor
    }

    /// Converts a boxed value of the adapted type into a publisher.
    ///
    /// Returns `None` if `value` is not of the adapted type.
    #[must_use]
    pub fn to_publisher(&self, value: Box<dyn Any + Send>) -> Option<Publisher> {
        (self.to_publisher)(value)
    }

    /// Converts a publisher into a boxed value of the adapted type.
    #[must_use]
    pub fn from_publisher(&self, publisher: Publisher) -> Box<dyn Any + Send> {
        (self.from_publisher)(publisher)
    }
}

impl fmt::Debug for ReactiveAdapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReactiveAdapter")
            .field("descriptor", &self.descriptor)
            .finish_non_exhaustive()
    }
}

/// Immutable set of [`ReactiveAdapter`]s keyed by type.
///
/// The registry is safe to share between any number of factories and
/// clients; [`ReactiveAdapterRegistry::shared`] returns the process-wide
/// default containing the built-in adapters.
#[derive(Debug, Clone, Default)]
pub struct ReactiveAdapterRegistry {
    adapters: HashMap<TypeId, ReactiveAdapter>,
}

impl ReactiveAdapterRegistry {
    /// Creates a registry with the built-in adapters.
    #[must_use]
    pub fn new() -> Self {
        Self::builder().with_defaults().build()
    }

    /// Creates a registry with no adapters at all.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Starts assembling a registry.
    #[must_use]
    pub fn builder() -> ReactiveAdapterRegistryBuilder {
        ReactiveAdapterRegistryBuilder::default()
    }

    /// The process-wide registry with the built-in adapters.
    ///
    /// ```rust
    /// use httpsvc::adapter::{PayloadFuture, ReactiveAdapterRegistry};
    /// use std::sync::Arc;
    ///
    /// let a = ReactiveAdapterRegistry::shared();
    /// let b = ReactiveAdapterRegistry::shared();
    /// assert!(Arc::ptr_eq(&a, &b));
    /// assert!(a.get::<PayloadFuture>().is_some());
    /// ```
    #[must_use]
    pub fn shared() -> Arc<Self> {
        static SHARED: OnceLock<Arc<ReactiveAdapterRegistry>> = OnceLock::new();
        SHARED.get_or_init(|| Arc::new(Self::new())).clone()
    }

    /// Looks up the adapter for `T`.
    #[must_use]
    pub fn get<T: Any>(&self) -> Option<&ReactiveAdapter> {
        self.get_by_id(TypeId::of::<T>())
    }

    /// Looks up an adapter by type id.
    #[must_use]
    pub fn get_by_id(&self, type_id: TypeId) -> Option<&ReactiveAdapter> {
        self.adapters.get(&type_id)
    }

    /// Finds the adapter for the concrete type inside a boxed value.
    #[must_use]
    pub fn get_for_value(&self, value: &(dyn Any + Send)) -> Option<&ReactiveAdapter> {
        self.get_by_id((*value).type_id())
    }

    /// Number of registered adapters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.adapters.len()
    }

    /// Returns `true` if no adapters are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.adapters.is_empty()
    }
}

/// Assembles a [`ReactiveAdapterRegistry`].
#[derive(Debug, Default)]
pub struct ReactiveAdapterRegistryBuilder {
    adapters: HashMap<TypeId, ReactiveAdapter>,
}

impl ReactiveAdapterRegistryBuilder {
    /// Adds the built-in adapters.
    #[must_use]
    pub fn with_defaults(self) -> Self {
        self.register(payload_future_adapter())
            .register(payload_stream_adapter())
            .register(completion_future_adapter())
    }

    /// Adds an adapter, replacing any previous adapter for the same type.
    #[must_use]
    pub fn register(mut self, adapter: ReactiveAdapter) -> Self {
        self.adapters.insert(adapter.descriptor.type_id, adapter);
        self
    }

    /// Finishes the registry.
    #[must_use]
    pub fn build(self) -> ReactiveAdapterRegistry {
        ReactiveAdapterRegistry {
            adapters: self.adapters,
        }
    }
}

fn payload_future_adapter() -> ReactiveAdapter {
    ReactiveAdapter::single_value::<PayloadFuture>(
        |single| {
            stream::once(single)
                .filter_map(|result| future::ready(result.transpose()))
                .boxed()
        },
        |mut publisher| PayloadFuture::new(async move { publisher.next().await.transpose() }),
    )
}

fn payload_stream_adapter() -> ReactiveAdapter {
    ReactiveAdapter::multi_value::<PayloadStream>(PayloadStream::into_inner, PayloadStream::new)
}

fn completion_future_adapter() -> ReactiveAdapter {
    ReactiveAdapter::no_value::<CompletionFuture>(
        |completion| {
            stream::once(completion)
                .filter_map(|result| future::ready(result.err().map(Err)))
                .boxed()
        },
        |mut publisher| {
            CompletionFuture::new(async move {
                while let Some(item) = publisher.next().await {
                    item?;
                }
                Ok(())
            })
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::HttpServiceError;
    use crate::transport::ExchangeError;
    use bytes::Bytes;

    fn data(s: &'static str) -> Result<Payload, HttpServiceError> {
        Ok(Payload::Data(Bytes::from_static(s.as_bytes())))
    }

    #[test]
    fn test_defaults_registered() {
        let registry = ReactiveAdapterRegistry::new();
        assert_eq!(registry.len(), 3);
        assert!(!registry.get::<PayloadFuture>().unwrap().descriptor().is_multi_value());
        assert!(registry.get::<PayloadStream>().unwrap().descriptor().is_multi_value());
        assert!(registry.get::<CompletionFuture>().unwrap().descriptor().is_no_value());
    }

    #[test]
    fn test_empty_registry() {
        assert!(ReactiveAdapterRegistry::empty().is_empty());
    }

    #[test]
    fn test_to_publisher_rejects_wrong_type() {
        let registry = ReactiveAdapterRegistry::new();
        let adapter = registry.get::<PayloadStream>().unwrap();
        assert!(adapter.to_publisher(Box::new(5u32)).is_none());
    }

    #[test]
    fn test_get_for_value() {
        let registry = ReactiveAdapterRegistry::new();
        let value: Box<dyn Any + Send> =
            Box::new(PayloadStream::new(stream::empty().boxed()));
        assert!(registry.get_for_value(value.as_ref()).is_some());
    }

    #[tokio::test]
    async fn test_future_takes_first_value() {
        let adapter = ReactiveAdapterRegistry::new().get::<PayloadFuture>().cloned().unwrap();
        let publisher = stream::iter(vec![data("a"), data("b")]).boxed();
        let future = adapter
            .from_publisher(publisher)
            .downcast::<PayloadFuture>()
            .unwrap();
        let payload = future.await.unwrap().unwrap();
        assert_eq!(payload.as_bytes().unwrap(), &Bytes::from_static(b"a"));
    }

    #[tokio::test]
    async fn test_future_round_trip_empty() {
        let adapter = ReactiveAdapterRegistry::new().get::<PayloadFuture>().cloned().unwrap();
        let publisher = adapter
            .to_publisher(Box::new(PayloadFuture::new(async { Ok(None) })))
            .unwrap();
        let items: Vec<_> = publisher.collect().await;
        assert!(items.is_empty());
    }

    #[tokio::test]
    async fn test_completion_surfaces_error() {
        let adapter = ReactiveAdapterRegistry::new()
            .get::<CompletionFuture>()
            .cloned()
            .unwrap();
        let publisher = stream::iter(vec![
            data("ignored"),
            Err(HttpServiceError::Exchange(ExchangeError::Cancelled)),
        ])
        .boxed();
        let future = adapter
            .from_publisher(publisher)
            .downcast::<CompletionFuture>()
            .unwrap();
        assert!(future.await.unwrap_err().is_exchange_error());
    }
}
