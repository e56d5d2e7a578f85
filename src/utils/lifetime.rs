use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Liveness token shared between a view and the async work it spawns.
///
/// The view ends the token when it is torn down; spawned work checks
/// `is_alive` before writing its result back.
#[derive(Clone, Debug)]
pub struct ViewLifetime {
    alive: Arc<AtomicBool>,
}

impl ViewLifetime {
    pub fn new() -> Self {
        Self {
            alive: Arc::new(AtomicBool::new(true)),
        }
    }

    pub fn is_alive(&self) -> bool {
        self.alive.load(Ordering::Acquire)
    }

    pub fn end(&self) {
        self.alive.store(false, Ordering::Release);
    }

    /// Hands `value` back only while the view is still alive.
    pub fn deliver<T>(&self, value: T) -> Option<T> {
        if self.is_alive() {
            Some(value)
        } else {
            log::debug!("Dropping async result for a view that is gone");
            None
        }
    }
}

impl Default for ViewLifetime {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clones_share_liveness() {
        let lifetime = ViewLifetime::new();
        let task_copy = lifetime.clone();

        assert_eq!(task_copy.deliver(7), Some(7));

        lifetime.end();
        assert!(!task_copy.is_alive());
        assert_eq!(task_copy.deliver(7), None);
    }

    #[tokio::test]
    async fn test_result_discarded_after_end() {
        let lifetime = ViewLifetime::new();
        let worker = lifetime.clone();

        let handle = tokio::spawn(async move {
            tokio::time::sleep(std::time::Duration::from_millis(20)).await;
            worker.deliver("loaded")
        });
        lifetime.end();

        assert_eq!(handle.await.unwrap(), None);
    }
}
