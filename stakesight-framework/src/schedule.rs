//! Background task scheduling with cooperative cancellation.
//!
//! Every task spawned through a [`TaskScope`] watches the same shutdown
//! signal. Shutting the scope down stops periodic work between ticks, so a
//! call already in flight completes but nothing new is started.

use std::future::Future;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

use crate::tween::Tween;

/// Owner of a group of background tasks.
#[derive(Debug)]
pub struct TaskScope {
    name: String,
    shutdown_tx: watch::Sender<bool>,
    tasks: Vec<JoinHandle<()>>,
}

impl TaskScope {
    pub fn new(name: impl Into<String>) -> Self {
        let (shutdown_tx, _) = watch::channel(false);
        Self {
            name: name.into(),
            shutdown_tx,
            tasks: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Receiver that flips to `true` on shutdown.
    pub fn shutdown_signal(&self) -> watch::Receiver<bool> {
        self.shutdown_tx.subscribe()
    }

    /// Number of tasks still running.
    pub fn active(&self) -> usize {
        self.tasks.iter().filter(|task| !task.is_finished()).count()
    }

    /// Spawn a task that is tracked by the scope.
    ///
    /// The future is raced against the shutdown signal and dropped when it
    /// fires.
    pub fn spawn<F>(&mut self, future: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let mut shutdown_rx = self.shutdown_signal();
        self.tasks.push(tokio::spawn(async move {
            tokio::select! {
                _ = future => {}
                _ = wait_for_shutdown(&mut shutdown_rx) => {}
            }
        }));
    }

    /// Run `f` immediately and then once per `interval` until shutdown.
    ///
    /// A tick that falls due while the previous call is still running is
    /// delayed rather than bursted. Shutdown is only observed between
    /// calls.
    pub fn every<F, Fut>(&mut self, label: impl Into<String>, interval: Duration, mut f: F)
    where
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let label = label.into();
        let scope = self.name.clone();
        let mut shutdown_rx = self.shutdown_signal();

        self.tasks.push(tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            tracing::debug!(scope = %scope, task = %label, ?interval, "Periodic task started");

            loop {
                tokio::select! {
                    _ = ticker.tick() => {}
                    _ = wait_for_shutdown(&mut shutdown_rx) => break,
                }
                if *shutdown_rx.borrow() {
                    break;
                }
                f().await;
            }

            tracing::debug!(scope = %scope, task = %label, "Periodic task stopped");
        }));
    }

    /// Signal shutdown and wait for every task to exit.
    pub async fn shutdown(mut self) {
        let _ = self.shutdown_tx.send(true);
        let tasks = std::mem::take(&mut self.tasks);
        let count = tasks.len();

        for task in tasks {
            if let Err(e) = task.await {
                if !e.is_cancelled() {
                    tracing::warn!(scope = %self.name, error = %e, "Task ended abnormally");
                }
            }
        }

        tracing::info!(scope = %self.name, tasks = count, "Scope shut down");
    }
}

impl Drop for TaskScope {
    fn drop(&mut self) {
        let _ = self.shutdown_tx.send(true);
        for task in &self.tasks {
            task.abort();
        }
    }
}

async fn wait_for_shutdown(rx: &mut watch::Receiver<bool>) {
    // A closed channel means the scope is gone
    let _ = rx.wait_for(|stopped| *stopped).await;
}

/// Handle to a single cancellable task.
#[derive(Debug)]
pub struct TaskHandle {
    cancel_tx: watch::Sender<bool>,
    handle: JoinHandle<()>,
}

impl TaskHandle {
    /// Stop the task before its next update.
    pub fn cancel(&self) {
        let _ = self.cancel_tx.send(true);
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Wait for the task to exit.
    pub async fn join(self) {
        let _ = self.handle.await;
    }
}

/// Drive `tween` on a timer, handing each sample to `on_update`.
///
/// The first sample is taken right away and the last one is exactly the
/// target. Cancelling stops updates; the last value passed to `on_update`
/// is the one that remains.
pub fn animate<F>(tween: Tween, frame_interval: Duration, mut on_update: F) -> TaskHandle
where
    F: FnMut(f64) + Send + 'static,
{
    let (cancel_tx, mut cancel_rx) = watch::channel(false);

    let handle = tokio::spawn(async move {
        let started = Instant::now();
        let mut ticker = tokio::time::interval(frame_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                _ = ticker.tick() => {}
                _ = wait_for_shutdown(&mut cancel_rx) => break,
            }

            let elapsed = started.elapsed();
            on_update(tween.sample(elapsed));
            if tween.is_finished(elapsed) {
                break;
            }
        }
    });

    TaskHandle { cancel_tx, handle }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tween::Easing;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[tokio::test(start_paused = true)]
    async fn test_every_fires_immediately_then_periodically() {
        let count = Arc::new(AtomicUsize::new(0));
        let counter = count.clone();

        let mut scope = TaskScope::new("test");
        scope.every("tick", Duration::from_secs(10), move || {
            let counter = counter.clone();
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
            }
        });

        tokio::time::sleep(Duration::from_millis(1)).await;
        assert_eq!(count.load(Ordering::SeqCst), 1);

        tokio::time::sleep(Duration::from_secs(25)).await;
        assert_eq!(count.load(Ordering::SeqCst), 3);

        scope.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_stops_ticks() {
        let count = Arc::new(AtomicUsize::new(0));
        let counter = count.clone();

        let mut scope = TaskScope::new("test");
        scope.every("tick", Duration::from_secs(1), move || {
            let counter = counter.clone();
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
            }
        });

        tokio::time::sleep(Duration::from_millis(1500)).await;
        scope.shutdown().await;
        let seen = count.load(Ordering::SeqCst);

        tokio::time::sleep(Duration::from_secs(10)).await;
        assert_eq!(count.load(Ordering::SeqCst), seen);
    }

    #[tokio::test(start_paused = true)]
    async fn test_in_flight_call_completes() {
        let done = Arc::new(AtomicUsize::new(0));
        let flag = done.clone();

        let mut scope = TaskScope::new("test");
        scope.every("slow", Duration::from_secs(10), move || {
            let flag = flag.clone();
            async move {
                tokio::time::sleep(Duration::from_secs(2)).await;
                flag.fetch_add(1, Ordering::SeqCst);
            }
        });

        tokio::time::sleep(Duration::from_millis(500)).await;
        scope.shutdown().await;

        assert_eq!(done.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_animate_ends_on_target() {
        let samples = Arc::new(parking_lot::Mutex::new(Vec::new()));
        let sink = samples.clone();

        let tween = Tween::new(1000.0, 1523.45, Duration::from_millis(200), Easing::EaseOutCubic);
        let handle = animate(tween, Duration::from_millis(16), move |v| sink.lock().push(v));
        handle.join().await;

        let samples = samples.lock();
        assert!(samples.len() > 2);
        assert_eq!(*samples.last().unwrap(), 1523.45);
        assert!(samples.windows(2).all(|w| w[0] <= w[1]));
    }

    #[tokio::test(start_paused = true)]
    async fn test_animate_cancel_keeps_last_value() {
        let samples = Arc::new(parking_lot::Mutex::new(Vec::new()));
        let sink = samples.clone();

        let tween = Tween::new(0.0, 100.0, Duration::from_secs(1), Easing::Linear);
        let handle = animate(tween, Duration::from_millis(50), move |v| sink.lock().push(v));

        tokio::time::sleep(Duration::from_millis(275)).await;
        handle.cancel();
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert!(handle.is_finished());

        let count = samples.lock().len();
        tokio::time::sleep(Duration::from_secs(2)).await;

        let samples = samples.lock();
        assert_eq!(samples.len(), count);
        let last = *samples.last().unwrap();
        assert!(last > 0.0 && last < 100.0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_spawn_is_dropped_on_shutdown() {
        let done = Arc::new(AtomicUsize::new(0));
        let flag = done.clone();

        let mut scope = TaskScope::new("test");
        scope.spawn(async move {
            tokio::time::sleep(Duration::from_secs(60)).await;
            flag.fetch_add(1, Ordering::SeqCst);
        });
        assert_eq!(scope.active(), 1);

        scope.shutdown().await;
        assert_eq!(done.load(Ordering::SeqCst), 0);
    }
}
