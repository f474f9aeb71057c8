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

//! Synchronous waiting on a future with a deadline.
//!
//! Blocking service methods are bridged onto the asynchronous transport by
//! polling the response future on the *calling* thread and parking that
//! thread between wake-ups. No runtime thread is ever parked.
//!
//! # Reentrancy
//!
//! Inside a current-thread Tokio runtime the calling thread is the only one
//! that can drive the transport, so parking it is a guaranteed deadlock. The
//! wait refuses to start there and fails with
//! [`HttpServiceError::BlockingInRuntime`].
//!
//! On a multi-thread runtime the wait runs inside
//! [`tokio::task::block_in_place`], which hands a worker's queued tasks to
//! another thread before parking. `spawn_blocking` threads and the thread
//! driving `Runtime::block_on` may therefore call blocking methods freely.

use crate::HttpServiceError;
use futures::task::{ArcWake, waker};
use std::future::Future;
use std::pin::pin;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::task::{Context, Poll};
use std::thread::{self, Thread};
use std::time::{Duration, Instant};
use tokio::runtime::{Handle, RuntimeFlavor};

/// Wakes a parked thread.
struct ThreadWaker {
    thread: Thread,
    notified: AtomicBool,
}

impl ArcWake for ThreadWaker {
    fn wake_by_ref(arc_self: &Arc<Self>) {
        arc_self.notified.store(true, Ordering::Release);
        arc_self.thread.unpark();
    }
}

/// Returns `true` if the current thread has entered a Tokio runtime.
#[must_use]
pub fn in_runtime_context() -> bool {
    Handle::try_current().is_ok()
}

/// Drives `future` to completion on the current thread, giving up after `timeout`.
///
/// A timeout too large to express as a deadline waits without one.
///
/// # Errors
///
/// - [`HttpServiceError::BlockingInRuntime`] if called from inside a
///   current-thread Tokio runtime
/// - [`HttpServiceError::Timeout`] if the future is still pending when the
///   deadline passes; the future is dropped, which cancels the exchange
///
/// # Examples
///
/// ```rust
/// use httpsvc::adapter::block_on_deadline;
/// use std::time::Duration;
///
/// let value = block_on_deadline(async { 21 * 2 }, Duration::from_millis(50)).unwrap();
/// assert_eq!(value, 42);
///
/// let error = block_on_deadline(std::future::pending::<()>(), Duration::from_millis(20))
///     .unwrap_err();
/// assert!(error.is_timeout());
/// ```
pub fn block_on_deadline<F: Future>(future: F, timeout: Duration) -> Result<F::Output, HttpServiceError> {
    match Handle::try_current() {
        Err(_) => park_until_ready(future, timeout),
        Ok(handle) if handle.runtime_flavor() == RuntimeFlavor::CurrentThread => {
            Err(HttpServiceError::BlockingInRuntime)
        }
        Ok(_) => tokio::task::block_in_place(|| park_until_ready(future, timeout)),
    }
}

fn park_until_ready<F: Future>(future: F, timeout: Duration) -> Result<F::Output, HttpServiceError> {
    let deadline = Instant::now().checked_add(timeout);
    let signal = Arc::new(ThreadWaker {
        thread: thread::current(),
        notified: AtomicBool::new(false),
    });
    let task_waker = waker(signal.clone());
    let mut cx = Context::from_waker(&task_waker);
    let mut future = pin!(future);

    loop {
        if let Poll::Ready(output) = future.as_mut().poll(&mut cx) {
            return Ok(output);
        }

        // Park until woken or out of time. Spurious unparks just loop.
        loop {
            if signal.notified.swap(false, Ordering::Acquire) {
                break;
            }
            match deadline {
                Some(deadline) => {
                    let now = Instant::now();
                    if now >= deadline {
                        return Err(HttpServiceError::Timeout { duration: timeout });
                    }
                    thread::park_timeout(deadline - now);
                }
                None => thread::park(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::channel::oneshot;

    #[test]
    fn test_ready_future() {
        assert_eq!(block_on_deadline(async { 5 }, Duration::from_secs(1)).unwrap(), 5);
    }

    #[test]
    fn test_woken_from_other_thread() {
        let (tx, rx) = oneshot::channel();
        let sender = thread::spawn(move || {
            thread::sleep(Duration::from_millis(20));
            tx.send("done").unwrap();
        });
        let value = block_on_deadline(rx, Duration::from_secs(2)).unwrap().unwrap();
        assert_eq!(value, "done");
        sender.join().unwrap();
    }

    #[test]
    fn test_timeout_respects_bound() {
        let start = Instant::now();
        let error = block_on_deadline(std::future::pending::<()>(), Duration::from_millis(100))
            .unwrap_err();
        let elapsed = start.elapsed();
        assert!(error.is_timeout());
        assert!(elapsed >= Duration::from_millis(100));
        assert!(elapsed < Duration::from_secs(2));
    }

    #[test]
    fn test_unbounded_timeout() {
        let (tx, rx) = oneshot::channel();
        let sender = thread::spawn(move || {
            thread::sleep(Duration::from_millis(20));
            tx.send(3).unwrap();
        });
        let value = block_on_deadline(rx, Duration::MAX).unwrap().unwrap();
        assert_eq!(value, 3);
        sender.join().unwrap();
    }

    #[tokio::test]
    async fn test_refuses_inside_current_thread_runtime() {
        let error = block_on_deadline(async { 1 }, Duration::from_secs(1)).unwrap_err();
        assert!(matches!(error, HttpServiceError::BlockingInRuntime));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_allowed_on_multi_thread_worker() {
        let value = block_on_deadline(async { 9 }, Duration::from_secs(1)).unwrap();
        assert_eq!(value, 9);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_allowed_on_blocking_pool() {
        let (tx, rx) = oneshot::channel();
        tokio::spawn(async move {
            tokio::task::yield_now().await;
            tx.send("late").unwrap();
        });
        let value = tokio::task::spawn_blocking(move || block_on_deadline(rx, Duration::from_secs(2)))
            .await
            .unwrap()
            .unwrap()
            .unwrap();
        assert_eq!(value, "late");
    }
}
