//! Background expiry sweep task.
//!
//! Periodically removes expired session rows, either with a single bulk
//! delete or (in callback mode) by notifying a registered expire callback for
//! each row before deletion. The sweep runs inline in the task loop, so two
//! sweeps can never overlap even when one outlasts the interval.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use crate::config::StoreConfig;
use crate::store::{ExpireCallback, SessionSweep};

/// Recurring expiry sweep over a session store.
///
/// The sweep mode is fixed once the sweeper is spawned: callback mode when a
/// callback was registered (and callback mode is enabled in the config),
/// simple bulk deletion otherwise. Whether to spawn a sweeper at all is the
/// caller's decision, typically gated on
/// [`StoreConfig::auto_delete_expired`].
pub struct ExpirySweeper<S> {
    store: Arc<S>,
    interval: Duration,
    callback_enabled: bool,
    callback: Option<ExpireCallback>,
}

impl<S> ExpirySweeper<S>
where
    S: SessionSweep + 'static,
{
    /// Creates a sweeper over `store` with the interval and callback-mode
    /// switch taken from `config`.
    pub fn new(store: Arc<S>, config: &StoreConfig) -> Self {
        Self {
            store,
            interval: Duration::from_millis(config.sweep_interval_ms),
            callback_enabled: config.enable_expire_callback,
            callback: None,
        }
    }

    /// Overrides the sweep interval.
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Registers the expire callback and reports whether callback mode is
    /// supported. When this returns `false` the callback was not stored and
    /// the caller must not rely on expire notifications.
    pub fn register_expire_callback(&mut self, callback: ExpireCallback) -> bool {
        if !self.callback_enabled {
            return false;
        }
        self.callback = Some(callback);
        true
    }

    /// Starts the recurring sweep task and hands back its lifecycle handle.
    pub fn spawn(self) -> SweeperHandle {
        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(self.interval);
            // A sweep that outlasts the interval delays the next tick instead
            // of piling up missed firings.
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // The first tick fires immediately; skip it so the first sweep
            // happens one full interval after startup.
            ticker.tick().await;
            loop {
                ticker.tick().await;
                self.sweep_once().await;
            }
        });
        SweeperHandle { task: Some(task) }
    }

    /// One sweep cycle. Failures are logged and absorbed; the timer keeps
    /// firing.
    async fn sweep_once(&self) {
        let result = match &self.callback {
            Some(callback) => self.store.sweep_expired_with(callback).await,
            None => self.store.delete_expired().await,
        };
        match result {
            Ok(0) => debug!("expiry sweep: no expired sessions"),
            Ok(removed) => info!(removed, "expiry sweep completed"),
            Err(err) => warn!(error = %err, "expiry sweep failed"),
        }
    }
}

/// Handle owning a running sweep task.
///
/// Dropping the handle stops the task; [`SweeperHandle::shutdown`] does the
/// same explicitly and may be called any number of times.
pub struct SweeperHandle {
    task: Option<JoinHandle<()>>,
}

impl SweeperHandle {
    /// Stops the sweep task. No further firings occur afterwards.
    pub fn shutdown(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }

    /// Whether the task has not been shut down yet.
    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }
}

impl Drop for SweeperHandle {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    use async_trait::async_trait;

    use super::ExpirySweeper;
    use crate::config::StoreConfig;
    use crate::store::{ExpireCallback, Result, SessionSweep};

    struct CountingSweep {
        simple: AtomicU64,
        with_callback: AtomicU64,
    }

    impl CountingSweep {
        fn new() -> Self {
            Self {
                simple: AtomicU64::new(0),
                with_callback: AtomicU64::new(0),
            }
        }
    }

    #[async_trait]
    impl SessionSweep for CountingSweep {
        async fn delete_expired(&self) -> Result<u64> {
            self.simple.fetch_add(1, Ordering::SeqCst);
            Ok(0)
        }

        async fn sweep_expired_with(&self, _callback: &ExpireCallback) -> Result<u64> {
            self.with_callback.fetch_add(1, Ordering::SeqCst);
            Ok(0)
        }
    }

    fn short_interval_config(enable_callback: bool) -> StoreConfig {
        StoreConfig {
            sweep_interval_ms: 20,
            auto_delete_expired: true,
            enable_expire_callback: enable_callback,
            ..StoreConfig::default()
        }
    }

    #[tokio::test]
    async fn sweeper_fires_in_simple_mode_and_stops_on_shutdown() {
        let store = Arc::new(CountingSweep::new());
        let sweeper = ExpirySweeper::new(Arc::clone(&store), &short_interval_config(false));
        let mut handle = sweeper.spawn();

        tokio::time::sleep(Duration::from_millis(120)).await;
        assert!(store.simple.load(Ordering::SeqCst) >= 1);
        assert_eq!(store.with_callback.load(Ordering::SeqCst), 0);

        handle.shutdown();
        // Second shutdown is a no-op.
        handle.shutdown();
        assert!(!handle.is_running());

        let fired = store.simple.load(Ordering::SeqCst);
        tokio::time::sleep(Duration::from_millis(80)).await;
        assert_eq!(store.simple.load(Ordering::SeqCst), fired);
    }

    #[tokio::test]
    async fn callback_registration_requires_enabled_mode() {
        let store = Arc::new(CountingSweep::new());
        let noop: ExpireCallback = Arc::new(|_, _| Ok(()));

        let mut disabled = ExpirySweeper::new(Arc::clone(&store), &short_interval_config(false));
        assert!(!disabled.register_expire_callback(Arc::clone(&noop)));

        let mut enabled = ExpirySweeper::new(Arc::clone(&store), &short_interval_config(true));
        assert!(enabled.register_expire_callback(noop));

        let _handle = enabled.spawn();
        tokio::time::sleep(Duration::from_millis(120)).await;
        assert!(store.with_callback.load(Ordering::SeqCst) >= 1);
        assert_eq!(store.simple.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn dropping_handle_stops_the_task() {
        let store = Arc::new(CountingSweep::new());
        let handle = ExpirySweeper::new(Arc::clone(&store), &short_interval_config(false)).spawn();
        tokio::time::sleep(Duration::from_millis(60)).await;
        drop(handle);

        let fired = store.simple.load(Ordering::SeqCst);
        tokio::time::sleep(Duration::from_millis(80)).await;
        assert_eq!(store.simple.load(Ordering::SeqCst), fired);
    }
}
