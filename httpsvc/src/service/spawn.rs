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

//! Where fire-and-forget requests run.

use futures::future::BoxFuture;
use std::fmt;
use std::sync::OnceLock;
use std::thread;
use tokio::runtime::{Handle, Runtime};

#[cfg(feature = "observability")]
use tracing::warn;

/// A fire-and-forget request, boxed for spawning.
pub type DetachedTask = BoxFuture<'static, ()>;

/// Runs fire-and-forget requests in the background.
pub trait TaskSpawner: fmt::Debug + Send + Sync {
    /// Starts `task` and returns without waiting for it.
    fn spawn(&self, task: DetachedTask);
}

/// Spawns onto the caller's Tokio runtime, or a shared background runtime
/// outside one.
///
/// The background runtime is built on first use and has a single worker
/// thread named `httpsvc-detached`, shared by every client in the process.
/// Applications that own a runtime should prefer [`TokioSpawner`].
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultSpawner;

impl TaskSpawner for DefaultSpawner {
    fn spawn(&self, task: DetachedTask) {
        if let Ok(handle) = Handle::try_current() {
            handle.spawn(task);
            return;
        }
        match detached_runtime() {
            Some(runtime) => {
                runtime.spawn(task);
            }
            None => {
                let spawned = thread::Builder::new()
                    .name(DETACHED_THREAD_NAME.to_string())
                    .spawn(move || futures::executor::block_on(task));
                if let Err(_error) = spawned {
                    #[cfg(feature = "observability")]
                    warn!(error = %_error, "Failed to start detached request thread");
                }
            }
        }
    }
}

const DETACHED_THREAD_NAME: &str = "httpsvc-detached";

/// The process-wide runtime for requests detached outside any runtime.
fn detached_runtime() -> Option<&'static Runtime> {
    static RUNTIME: OnceLock<Option<Runtime>> = OnceLock::new();
    RUNTIME
        .get_or_init(|| {
            let built = tokio::runtime::Builder::new_multi_thread()
                .worker_threads(1)
                .thread_name(DETACHED_THREAD_NAME)
                .enable_all()
                .build();
            match built {
                Ok(runtime) => Some(runtime),
                Err(_error) => {
                    #[cfg(feature = "observability")]
                    warn!(error = %_error, "Failed to build detached request runtime");
                    None
                }
            }
        })
        .as_ref()
}

/// Spawns onto a specific Tokio runtime.
#[derive(Debug, Clone)]
pub struct TokioSpawner {
    handle: Handle,
}

impl TokioSpawner {
    /// Spawns onto the runtime behind `handle`.
    #[must_use]
    pub fn new(handle: Handle) -> Self {
        Self { handle }
    }
}

impl TaskSpawner for TokioSpawner {
    fn spawn(&self, task: DetachedTask) {
        self.handle.spawn(task);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::FutureExt;
    use std::collections::HashSet;
    use std::sync::mpsc;
    use std::time::Duration;

    #[test]
    fn test_default_spawner_outside_runtime() {
        let (tx, rx) = mpsc::channel();
        DefaultSpawner.spawn(
            async move {
                tx.send(thread::current().name().map(str::to_string)).unwrap();
            }
            .boxed(),
        );
        let name = rx.recv_timeout(Duration::from_secs(2)).unwrap();
        assert_eq!(name.as_deref(), Some("httpsvc-detached"));
    }

    #[test]
    fn test_default_spawner_shares_one_thread() {
        let (tx, rx) = mpsc::channel();
        for _ in 0..64 {
            let tx = tx.clone();
            DefaultSpawner.spawn(
                async move {
                    tx.send(thread::current().id()).unwrap();
                }
                .boxed(),
            );
        }
        drop(tx);
        let threads: HashSet<_> = rx.iter().collect();
        assert_eq!(threads.len(), 1);
    }

    #[tokio::test]
    async fn test_default_spawner_inside_runtime() {
        let (tx, rx) = futures::channel::oneshot::channel();
        DefaultSpawner.spawn(
            async move {
                tx.send(()).unwrap();
            }
            .boxed(),
        );
        rx.await.unwrap();
    }

    #[test]
    fn test_tokio_spawner() {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        let (tx, rx) = mpsc::channel();
        TokioSpawner::new(runtime.handle().clone()).spawn(
            async move {
                tx.send(7).unwrap();
            }
            .boxed(),
        );
        assert_eq!(rx.recv_timeout(Duration::from_secs(2)).unwrap(), 7);
    }
}
