use std::sync::atomic::AtomicU32;
use std::sync::atomic::Ordering;
use std::sync::Arc;

use crate::async_task::spawn_task;
use crate::Error;

#[tokio::test]
async fn test_spawn_task_runs_to_completion() {
    let counter = Arc::new(AtomicU32::new(0));
    let c = counter.clone();

    let handle = spawn_task("counter", move || async move {
        c.fetch_add(1, Ordering::SeqCst);
        Ok(())
    });

    handle.await.expect("task should not panic");
    assert_eq!(counter.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_spawn_task_swallows_task_error() {
    let handle = spawn_task("failing", || async { Err(Error::Fatal("boom".to_string())) });

    // The error is logged, not propagated through the join handle.
    assert!(handle.await.is_ok());
}
