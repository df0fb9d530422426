use std::future;
use std::time::Duration;

use tokio::time::{
    self,
    Instant,
};

// Coalesces a burst of mutations into a bounded number of publishes: a publish is due
// after `quiet` with no further mutations, but no later than `max_wait` after the first
// unpublished one.  Kubernetes watches can emit hundreds of events per second during a
// rollout; publishing each one would thrash the renderer.
#[derive(Debug)]
pub struct Debounce {
    quiet: Duration,
    max_wait: Duration,
    deadline: Option<Instant>,
    limit: Option<Instant>,
}

impl Debounce {
    pub fn new(quiet: Duration, max_wait: Duration) -> Debounce {
        Debounce { quiet, max_wait, deadline: None, limit: None }
    }

    // Record one mutation
    pub fn touch(&mut self) {
        self.touch_at(Instant::now());
    }

    fn touch_at(&mut self, now: Instant) {
        let limit = *self.limit.get_or_insert(now + self.max_wait);
        self.deadline = Some(limit.min(now + self.quiet));
    }

    pub fn pending(&self) -> bool {
        self.deadline.is_some()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    // Call once the pending batch has been published
    pub fn reset(&mut self) {
        self.deadline = None;
        self.limit = None;
    }
}

// Select-friendly: pends forever when there's no deadline, so a quiet synchronizer just
// keeps waiting on its event stream.
pub async fn sleep_until_deadline(deadline: Option<Instant>) {
    match deadline {
        Some(d) => time::sleep_until(d).await,
        None => future::pending().await,
    }
}
