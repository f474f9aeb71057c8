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

//! Counters for the invocation pipeline.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Metrics for service method invocations.
///
/// A timeout or resolution failure also counts as a failure.
///
/// # Examples
///
/// ```rust
/// use httpsvc::observability::ClientMetrics;
/// use std::time::Duration;
///
/// let metrics = ClientMetrics::new();
/// metrics.record_invocation();
/// metrics.record_latency(Duration::from_millis(4));
/// metrics.record_invocation();
/// metrics.record_latency(Duration::from_millis(6));
///
/// assert_eq!(metrics.total_invocations(), 2);
/// assert_eq!(metrics.average_latency(), Duration::from_millis(5));
/// ```
#[derive(Debug, Default)]
pub struct ClientMetrics {
    /// Remote method invocations started
    invocations: AtomicU64,
    /// Invocations that returned an error to the caller
    failures: AtomicU64,
    /// Blocking invocations that hit the block timeout
    timeouts: AtomicU64,
    /// Invocations whose arguments could not be resolved
    resolution_failures: AtomicU64,
    /// Fire-and-forget requests that failed in the background
    detached_failures: AtomicU64,
    /// Calls routed to a default method body
    default_method_calls: AtomicU64,
    /// Sum of blocking call latencies
    total_latency_us: AtomicU64,
    /// Number of latency measurements
    latency_count: AtomicU64,
}

impl ClientMetrics {
    /// Creates a metrics tracker with every counter at zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the start of a remote method invocation.
    pub fn record_invocation(&self) {
        self.invocations.fetch_add(1, Ordering::Relaxed);
        #[cfg(feature = "observability")]
        metrics::counter!("httpsvc.client.invocations").increment(1);
    }

    /// Records an invocation that failed.
    pub fn record_failure(&self) {
        self.failures.fetch_add(1, Ordering::Relaxed);
        #[cfg(feature = "observability")]
        metrics::counter!("httpsvc.client.failures").increment(1);
    }

    /// Records a blocking invocation that timed out.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use httpsvc::observability::ClientMetrics;
    ///
    /// let metrics = ClientMetrics::new();
    /// metrics.record_timeout();
    /// assert_eq!(metrics.total_timeouts(), 1);
    /// assert_eq!(metrics.total_failures(), 1);
    /// ```
    pub fn record_timeout(&self) {
        self.timeouts.fetch_add(1, Ordering::Relaxed);
        self.record_failure();
        #[cfg(feature = "observability")]
        metrics::counter!("httpsvc.client.timeouts").increment(1);
    }

    /// Records an invocation whose arguments could not be resolved.
    pub fn record_resolution_failure(&self) {
        self.resolution_failures.fetch_add(1, Ordering::Relaxed);
        self.record_failure();
        #[cfg(feature = "observability")]
        metrics::counter!("httpsvc.client.resolution_failures").increment(1);
    }

    /// Records a fire-and-forget request that failed after the caller returned.
    pub fn record_detached_failure(&self) {
        self.detached_failures.fetch_add(1, Ordering::Relaxed);
        #[cfg(feature = "observability")]
        metrics::counter!("httpsvc.client.detached_failures").increment(1);
    }

    /// Records a call to a default method body.
    pub fn record_default_method_call(&self) {
        self.default_method_calls.fetch_add(1, Ordering::Relaxed);
        #[cfg(feature = "observability")]
        metrics::counter!("httpsvc.client.default_method_calls").increment(1);
    }

    /// Records how long a blocking call took.
    pub fn record_latency(&self, latency: Duration) {
        let us = u64::try_from(latency.as_micros()).unwrap_or(u64::MAX);
        self.total_latency_us.fetch_add(us, Ordering::Relaxed);
        self.latency_count.fetch_add(1, Ordering::Relaxed);
        #[cfg(feature = "observability")]
        metrics::histogram!("httpsvc.client.latency.us").record(us as f64);
    }

    /// Total invocations started.
    #[must_use]
    pub fn total_invocations(&self) -> u64 {
        self.invocations.load(Ordering::Relaxed)
    }

    /// Total invocations failed, including timeouts and resolution failures.
    #[must_use]
    pub fn total_failures(&self) -> u64 {
        self.failures.load(Ordering::Relaxed)
    }

    /// Total blocking invocations that timed out.
    #[must_use]
    pub fn total_timeouts(&self) -> u64 {
        self.timeouts.load(Ordering::Relaxed)
    }

    /// Total invocations whose arguments could not be resolved.
    #[must_use]
    pub fn total_resolution_failures(&self) -> u64 {
        self.resolution_failures.load(Ordering::Relaxed)
    }

    /// Total fire-and-forget requests that failed.
    #[must_use]
    pub fn total_detached_failures(&self) -> u64 {
        self.detached_failures.load(Ordering::Relaxed)
    }

    /// Total calls to default method bodies.
    #[must_use]
    pub fn total_default_method_calls(&self) -> u64 {
        self.default_method_calls.load(Ordering::Relaxed)
    }

    /// Average blocking call latency in microseconds, or 0 with no samples.
    #[must_use]
    pub fn average_latency_us(&self) -> u64 {
        let total = self.total_latency_us.load(Ordering::Relaxed);
        let count = self.latency_count.load(Ordering::Relaxed);
        if count == 0 { 0 } else { total / count }
    }

    /// Average blocking call latency.
    #[must_use]
    pub fn average_latency(&self) -> Duration {
        Duration::from_micros(self.average_latency_us())
    }

    /// Resets every counter to zero.
    pub fn reset(&self) {
        self.invocations.store(0, Ordering::Relaxed);
        self.failures.store(0, Ordering::Relaxed);
        self.timeouts.store(0, Ordering::Relaxed);
        self.resolution_failures.store(0, Ordering::Relaxed);
        self.detached_failures.store(0, Ordering::Relaxed);
        self.default_method_calls.store(0, Ordering::Relaxed);
        self.total_latency_us.store(0, Ordering::Relaxed);
        self.latency_count.store(0, Ordering::Relaxed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failures_roll_up() {
        let metrics = ClientMetrics::new();
        metrics.record_timeout();
        metrics.record_resolution_failure();
        metrics.record_failure();
        assert_eq!(metrics.total_failures(), 3);
        assert_eq!(metrics.total_timeouts(), 1);
        assert_eq!(metrics.total_resolution_failures(), 1);
    }

    #[test]
    fn test_detached_failures_are_separate() {
        let metrics = ClientMetrics::new();
        metrics.record_detached_failure();
        assert_eq!(metrics.total_detached_failures(), 1);
        assert_eq!(metrics.total_failures(), 0);
    }

    #[test]
    fn test_latency_zero_without_samples() {
        assert_eq!(ClientMetrics::new().average_latency(), Duration::ZERO);
    }

    #[test]
    fn test_reset() {
        let metrics = ClientMetrics::new();
        metrics.record_invocation();
        metrics.record_default_method_call();
        metrics.record_latency(Duration::from_millis(1));
        metrics.reset();
        assert_eq!(metrics.total_invocations(), 0);
        assert_eq!(metrics.total_default_method_calls(), 0);
        assert_eq!(metrics.average_latency_us(), 0);
    }
}
