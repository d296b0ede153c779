use std::future::Future;

use tokio::task::JoinHandle;
use tracing::error;
use tracing::info;

use crate::Result;

/// Spawns a named long-running task and logs how it ended.
pub(crate) fn spawn_task<F, Fut>(
    name: &str,
    task_fn: F,
) -> JoinHandle<()>
where
    F: FnOnce() -> Fut + Send + 'static,
    Fut: Future<Output = Result<()>> + Send + 'static,
{
    let name = name.to_string();
    tokio::spawn(async move {
        match task_fn().await {
            Ok(()) => info!("task {name} stopped"),
            Err(e) => error!("task {name} stopped with error: {:?}", e),
        }
    })
}
