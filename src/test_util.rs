//! Helpers for running async code under the Embassy executor in tests.
//!
//! `embassy_time::Timer` only accepts wakers created by the Embassy executor, so
//! anything that paces or polls has to run on a real `Executor`.

use embassy_executor::{Executor, SpawnToken, Spawner};
use std::future::Future;
use std::pin::Pin;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

/// Upper bound for a single test future.
const RUN_TIMEOUT: Duration = Duration::from_secs(10);

type BoxedJob = Pin<Box<dyn Future<Output = ()> + Send>>;

#[embassy_executor::task(pool_size = 32)]
async fn drive(job: BoxedJob) {
    job.await;
}

/// Start a fresh executor thread and spawn the task built by `token` on it.
///
/// The executor thread parks forever once the task is done.
pub fn spawn_executor<S>(token: impl FnOnce() -> SpawnToken<S> + Send + 'static) {
    thread::Builder::new()
        .name("test-executor".to_string())
        .spawn(move || {
            let executor: &'static mut Executor = Box::leak(Box::new(Executor::new()));
            executor.run(|spawner: Spawner| {
                if let Err(e) = spawner.spawn(token()) {
                    panic!("Failed to spawn test task: {:?}", e);
                }
            });
        })
        .expect("failed to spawn executor thread");
}

/// Run `fut` to completion on its own executor and return its output.
pub fn run_on_executor<F>(fut: F) -> F::Output
where
    F: Future + Send + 'static,
    F::Output: Send + 'static,
{
    let (tx, rx) = mpsc::channel();
    let job: BoxedJob = Box::pin(async move {
        let _ = tx.send(fut.await);
    });

    spawn_executor(move || drive(job));
    rx.recv_timeout(RUN_TIMEOUT).expect("future did not complete on the executor")
}
