//! Rate limiters for presentation-side dispatch triggers.
//!
//! Neither type touches the store; they decide *when* a caller-supplied
//! closure runs. Both read time from `tokio::time` so tests can drive them
//! with a paused clock.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::time::Instant;

/// Leading-edge debounce.
///
/// The first call runs immediately and opens a cooldown window; every call
/// that arrives before the window closes is dropped.
#[derive(Debug, Clone)]
pub struct Debounce {
    cooldown: Duration,
    until: Option<Instant>,
}

impl Debounce {
    pub fn new(cooldown: Duration) -> Self {
        Self {
            cooldown,
            until: None,
        }
    }

    /// Run `f` unless a cooldown is in progress.
    ///
    /// # Returns
    ///
    /// `Some` with `f`'s result when it ran, `None` when the call was dropped.
    pub fn call<R>(&mut self, f: impl FnOnce() -> R) -> Option<R> {
        let now = Instant::now();
        if let Some(until) = self.until
            && now < until
        {
            return None;
        }
        self.until = Some(now + self.cooldown);
        Some(f())
    }

    /// `true` while calls are being dropped.
    pub fn is_cooling_down(&self) -> bool {
        self.until.is_some_and(|until| Instant::now() < until)
    }
}

struct ThrottleState<T> {
    saved: Option<T>,
    pending: bool,
}

/// Trailing-edge throttle.
///
/// Every call saves its argument. The first call of a burst schedules a
/// delivery one window later; when it fires, the most recently saved argument
/// is handed to the sink exactly once. Calls during the window only replace
/// the saved argument.
pub struct Throttle<T> {
    window: Duration,
    state: Arc<Mutex<ThrottleState<T>>>,
    sink: Arc<dyn Fn(T) + Send + Sync>,
}

impl<T> std::fmt::Debug for Throttle<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Throttle")
            .field("window", &self.window)
            .finish_non_exhaustive()
    }
}

impl<T: Send + 'static> Throttle<T> {
    /// Create a throttle delivering to `sink` at most once per `window`.
    pub fn new(window: Duration, sink: impl Fn(T) + Send + Sync + 'static) -> Self {
        Self {
            window,
            state: Arc::new(Mutex::new(ThrottleState {
                saved: None,
                pending: false,
            })),
            sink: Arc::new(sink),
        }
    }

    /// Save `arg` and schedule a delivery if none is pending.
    ///
    /// Outside a tokio runtime there is no timer to schedule on; the argument
    /// is delivered immediately and a warning is logged.
    pub fn call(&self, arg: T) {
        {
            let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
            state.saved = Some(arg);
            if state.pending {
                return;
            }
            state.pending = true;
        }

        let state = Arc::clone(&self.state);
        let sink = Arc::clone(&self.sink);
        let window = self.window;
        match Handle::try_current() {
            Ok(handle) => {
                handle.spawn(async move {
                    tokio::time::sleep(window).await;
                    flush(&state, sink.as_ref());
                });
            }
            Err(_) => {
                tracing::warn!("throttle called outside a tokio runtime; delivering immediately");
                flush(&state, sink.as_ref());
            }
        }
    }
}

fn flush<T>(state: &Mutex<ThrottleState<T>>, sink: &(dyn Fn(T) + Send + Sync)) {
    let saved = {
        let mut state = state.lock().unwrap_or_else(PoisonError::into_inner);
        state.pending = false;
        state.saved.take()
    };
    if let Some(arg) = saved {
        sink(arg);
    }
}
