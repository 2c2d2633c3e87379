//! Cooperative timer wheel for the exam screen.
//!
//! All timers (countdown, expiry, autosave, debounce, frame sampler) live in
//! one `Scheduler`.  Nothing runs on its own: the session calls `pop_due` with
//! the current time and handles each fired timer in due order.  Clearing the
//! scheduler is the single place where every pending timer is dropped.

use std::collections::BTreeMap;

use chrono::{DateTime, Duration, Utc};

/// Handle returned when a timer is armed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimerId(u64);

/// What a timer is for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimerKind {
    Countdown,
    /// One-shot at the exam deadline.
    Expiry,
    Autosave,
    AutosaveDebounce,
    FrameSample,
}

#[derive(Debug, Clone)]
struct Timer {
    kind: TimerKind,
    due: DateTime<Utc>,
    /// `Some` for repeating timers.
    period: Option<Duration>,
}

/// A timer that has come due.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FiredTimer {
    pub id: TimerId,
    pub kind: TimerKind,
    /// The instant the timer was due, which may be earlier than "now".
    pub at: DateTime<Utc>,
}

#[derive(Debug, Default)]
pub struct Scheduler {
    next_id: u64,
    timers: BTreeMap<TimerId, Timer>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arm a repeating timer whose first firing is one `period` after `now`.
    ///
    /// A non-positive period degrades to a one-shot timer so `pop_due` can
    /// never loop forever.
    pub fn set_interval(&mut self, kind: TimerKind, period: Duration, now: DateTime<Utc>) -> TimerId {
        let period = (period > Duration::zero()).then_some(period);
        self.insert(Timer {
            kind,
            due: now + period.unwrap_or_else(Duration::zero),
            period,
        })
    }

    /// Arm a repeating timer phased to `anchor`: it fires at
    /// `anchor + k * period` for every `k` whose instant lies after `now`.
    pub fn set_interval_anchored(
        &mut self,
        kind: TimerKind,
        period: Duration,
        anchor: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> TimerId {
        if period <= Duration::zero() || now < anchor {
            return self.set_interval(kind, period, anchor.max(now));
        }
        let period_ms = period.num_milliseconds().max(1);
        let periods = (now - anchor).num_milliseconds() / period_ms + 1;
        self.insert(Timer {
            kind,
            due: anchor + Duration::milliseconds(periods * period_ms),
            period: Some(period),
        })
    }

    /// Arm a one-shot timer due `delay` after `now`.
    pub fn set_timeout(&mut self, kind: TimerKind, delay: Duration, now: DateTime<Utc>) -> TimerId {
        self.insert(Timer { kind, due: now + delay, period: None })
    }

    /// Disarm a timer.  Returns false if it had already fired or been cleared.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        self.timers.remove(&id).is_some()
    }

    /// Disarm every timer.
    pub fn clear(&mut self) {
        self.timers.clear();
    }

    pub fn len(&self) -> usize {
        self.timers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }

    pub fn is_armed(&self, id: TimerId) -> bool {
        self.timers.contains_key(&id)
    }

    /// The earliest pending due instant.
    pub fn next_due(&self) -> Option<DateTime<Utc>> {
        self.timers.values().map(|t| t.due).min()
    }

    /// Take the earliest timer due at or before `now`.
    ///
    /// Ties are broken by arming order.  Repeating timers are re-armed one
    /// period after their previous due instant; one-shot timers are removed.
    pub fn pop_due(&mut self, now: DateTime<Utc>) -> Option<FiredTimer> {
        let (id, _) = self
            .timers
            .iter()
            .filter(|(_, t)| t.due <= now)
            .min_by_key(|(id, t)| (t.due, **id))?;
        let id = *id;

        let timer = self.timers.get_mut(&id)?;
        let fired = FiredTimer { id, kind: timer.kind, at: timer.due };
        match timer.period {
            Some(period) => timer.due += period,
            None => {
                self.timers.remove(&id);
            }
        }
        Some(fired)
    }

    fn insert(&mut self, timer: Timer) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.timers.insert(id, timer);
        id
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone, Utc};

    use super::{Scheduler, TimerKind};

    fn t0() -> chrono::DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_nothing_fires_before_due() {
        let mut s = Scheduler::new();
        s.set_timeout(TimerKind::AutosaveDebounce, Duration::milliseconds(500), t0());
        assert!(s.pop_due(t0() + Duration::milliseconds(499)).is_none());
        let fired = s.pop_due(t0() + Duration::milliseconds(500)).unwrap();
        assert_eq!(fired.kind, TimerKind::AutosaveDebounce);
        assert!(s.is_empty(), "one-shot timers are removed after firing");
    }

    #[test]
    fn test_intervals_rearm_from_their_due_instant() {
        let mut s = Scheduler::new();
        s.set_interval(TimerKind::Autosave, Duration::seconds(10), t0());

        let now = t0() + Duration::seconds(35);
        let fired: Vec<_> = std::iter::from_fn(|| s.pop_due(now)).map(|f| f.at).collect();
        assert_eq!(
            fired,
            vec![
                t0() + Duration::seconds(10),
                t0() + Duration::seconds(20),
                t0() + Duration::seconds(30),
            ]
        );
        assert_eq!(s.next_due(), Some(t0() + Duration::seconds(40)));
    }

    #[test]
    fn test_timers_fire_in_due_order_then_arming_order() {
        let mut s = Scheduler::new();
        s.set_interval(TimerKind::Autosave, Duration::seconds(2), t0());
        s.set_interval(TimerKind::Countdown, Duration::seconds(1), t0());

        let now = t0() + Duration::seconds(2);
        let kinds: Vec<_> = std::iter::from_fn(|| s.pop_due(now)).map(|f| f.kind).collect();
        assert_eq!(
            kinds,
            vec![TimerKind::Countdown, TimerKind::Autosave, TimerKind::Countdown]
        );
    }

    #[test]
    fn test_cancel_and_clear_disarm() {
        let mut s = Scheduler::new();
        let a = s.set_timeout(TimerKind::AutosaveDebounce, Duration::seconds(1), t0());
        s.set_interval(TimerKind::FrameSample, Duration::seconds(60), t0());
        assert!(s.cancel(a));
        assert!(!s.cancel(a));
        assert!(!s.is_armed(a));
        assert_eq!(s.len(), 1);
        s.clear();
        assert!(s.pop_due(t0() + Duration::days(1)).is_none());
    }

    #[test]
    fn test_anchored_interval_stays_in_phase_with_its_anchor() {
        let mut s = Scheduler::new();
        let now = t0() + Duration::milliseconds(1_700_500);
        s.set_interval_anchored(TimerKind::Countdown, Duration::seconds(1), t0(), now);
        assert_eq!(s.next_due(), Some(t0() + Duration::seconds(1701)));

        let fired = s.pop_due(t0() + Duration::seconds(1702)).unwrap();
        assert_eq!(fired.at, t0() + Duration::seconds(1701));
        assert_eq!(s.next_due(), Some(t0() + Duration::seconds(1702)));
    }

    #[test]
    fn test_zero_period_interval_fires_once() {
        let mut s = Scheduler::new();
        s.set_interval(TimerKind::Countdown, Duration::zero(), t0());
        assert!(s.pop_due(t0()).is_some());
        assert!(s.pop_due(t0()).is_none());
    }
}
