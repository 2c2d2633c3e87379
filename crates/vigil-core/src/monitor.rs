//! Proctoring signal collectors active during the exam.
//!
//! Three observers are installed together and torn down together:
//!
//! - visibility: every "page hidden" notification becomes a `tab_switch`
//! - fullscreen: every change that leaves fullscreen becomes a
//!   `fullscreen_exit`; re-entry is never forced
//! - frame sampler: a repeating timer that asks the session to score a
//!   camera frame
//!
//! Notifications that arrive while the observers are not installed are
//! ignored, which is how teardown "removes" the listeners.

use chrono::{DateTime, Duration, Utc};
use tracing::{debug, warn};

use crate::{
    fullscreen::Fullscreen,
    scheduler::{Scheduler, TimerId, TimerKind},
    traits::SubscriptionId,
};

#[derive(Debug, Default)]
pub struct Monitors {
    visibility: bool,
    fullscreen: Option<SubscriptionId>,
    sampler: Option<TimerId>,
}

impl Monitors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install all three observers.  Installing twice replaces the first set.
    pub fn install(
        &mut self,
        fullscreen: &Fullscreen,
        scheduler: &mut Scheduler,
        sample_every: Duration,
        now: DateTime<Utc>,
    ) {
        self.teardown(fullscreen, scheduler);

        self.visibility = true;
        self.fullscreen = match fullscreen.subscribe() {
            Ok(id) => Some(id),
            Err(e) => {
                warn!(error = %e, "fullscreen change notifications unavailable");
                None
            }
        };
        self.sampler = Some(scheduler.set_interval(TimerKind::FrameSample, sample_every, now));
        debug!(fullscreen_subscribed = self.fullscreen.is_some(), "monitors installed");
    }

    /// Remove every observer.  Safe to call when nothing is installed.
    pub fn teardown(&mut self, fullscreen: &Fullscreen, scheduler: &mut Scheduler) {
        if let Some(id) = self.fullscreen.take() {
            fullscreen.unsubscribe(id);
        }
        if let Some(id) = self.sampler.take() {
            scheduler.cancel(id);
        }
        if self.visibility {
            self.visibility = false;
            debug!("monitors torn down");
        }
    }

    pub fn watching_visibility(&self) -> bool {
        self.visibility
    }

    pub fn watching_fullscreen(&self) -> bool {
        self.fullscreen.is_some()
    }

    pub fn sampling(&self) -> bool {
        self.sampler.is_some()
    }

    pub fn is_installed(&self) -> bool {
        self.visibility || self.fullscreen.is_some() || self.sampler.is_some()
    }
}
