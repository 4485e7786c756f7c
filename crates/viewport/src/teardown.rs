use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::Mutex;

/// Scoped resource guard for view teardown.
///
/// Aggregates child cleanup actions (unsubscribe handles, timer aborts)
/// and releases all of them exactly once, regardless of which exit path
/// fires first: an explicit [`TeardownGuard::release_all`] or drop.
#[derive(Default)]
pub struct TeardownGuard {
    released: AtomicBool,
    actions: Mutex<Vec<Box<dyn FnOnce() + Send>>>,
}

impl TeardownGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a cleanup action. Actions deferred after release run
    /// immediately instead of leaking.
    pub fn defer(&self, action: impl FnOnce() + Send + 'static) {
        if self.released.load(Ordering::SeqCst) {
            action();
            return;
        }
        self.actions.lock().push(Box::new(action));
    }

    /// Runs every deferred action, in registration order. Subsequent
    /// calls are no-ops. Returns how many actions ran.
    pub fn release_all(&self) -> usize {
        if self.released.swap(true, Ordering::SeqCst) {
            return 0;
        }
        let actions = std::mem::take(&mut *self.actions.lock());
        let count = actions.len();
        for action in actions {
            action();
        }
        count
    }

    pub fn is_released(&self) -> bool {
        self.released.load(Ordering::SeqCst)
    }
}

impl Drop for TeardownGuard {
    fn drop(&mut self) {
        self.release_all();
    }
}
