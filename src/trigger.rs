//! Infinite-scroll trigger.
//!
//! Watches a single sentinel card (the last one rendered) and emits one
//! signal each time that card enters the visible range. The presentation
//! layer feeds visibility through [`ScrollTrigger::observe`] on every update.

use std::fmt;
use std::ops::Range;

/// Handle of a rendered card: its index in the collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Sentinel(pub usize);

impl Sentinel {
    fn is_within(self, visible: &Range<usize>) -> bool {
        visible.contains(&self.0)
    }
}

impl fmt::Display for Sentinel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "card #{}", self.0)
    }
}

/// A live observation of one sentinel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Observation {
    sentinel: Sentinel,
    /// `None` until the first visibility report after wiring
    was_visible: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum TriggerState {
    #[default]
    Idle,
    Armed(Observation),
    /// Fired; keeps the last known visibility until re-armed.
    Triggered { sentinel: Sentinel, visible: bool },
}

type SignalFn = Box<dyn FnMut(Sentinel) + Send>;

#[derive(Default)]
pub struct ScrollTrigger {
    state: TriggerState,
    /// Attached while a load was in flight, waiting for `resume`
    pending: Option<Sentinel>,
    on_signal: Option<SignalFn>,
    fired: u64,
}

impl fmt::Debug for ScrollTrigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScrollTrigger")
            .field("state", &self.state)
            .field("pending", &self.pending)
            .field("fired", &self.fired)
            .finish_non_exhaustive()
    }
}

impl ScrollTrigger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the callback that receives "advance page" signals.
    pub fn on_signal(&mut self, callback: impl FnMut(Sentinel) + Send + 'static) {
        self.on_signal = Some(Box::new(callback));
    }

    pub fn state(&self) -> &TriggerState {
        &self.state
    }

    pub fn pending(&self) -> Option<Sentinel> {
        self.pending
    }

    /// Total signals emitted so far.
    pub fn fired(&self) -> u64 {
        self.fired
    }

    /// Number of live observations. Never more than one.
    pub fn live_observations(&self) -> usize {
        usize::from(matches!(self.state, TriggerState::Armed(_)))
    }

    /// Observe `sentinel`, replacing whatever was observed before.
    ///
    /// Attaching the sentinel that is already observed, or that already
    /// fired, changes nothing. While a load is in flight the sentinel is
    /// only remembered; [`resume`](Self::resume) wires it once the load is
    /// over.
    pub fn attach(&mut self, sentinel: Sentinel, load_in_flight: bool) {
        let current = match &self.state {
            TriggerState::Armed(obs) => Some(obs.sentinel),
            TriggerState::Triggered { sentinel, .. } => Some(*sentinel),
            TriggerState::Idle => None,
        };
        if current == Some(sentinel) && !load_in_flight {
            return;
        }

        self.tear_down();

        if load_in_flight {
            tracing::trace!(%sentinel, "load in flight, deferring attach");
            self.pending = Some(sentinel);
            return;
        }

        tracing::trace!(%sentinel, "armed");
        self.state = TriggerState::Armed(Observation {
            sentinel,
            was_visible: None,
        });
    }

    /// Wire the sentinel attached during the load that just finished.
    ///
    /// If that is the card which already fired (the page failed and the
    /// list did not grow), it is re-armed with its last known visibility so
    /// it only fires again after scrolling back onto it.
    pub fn resume(&mut self) {
        let Some(sentinel) = self.pending.take() else {
            return;
        };
        match self.state {
            TriggerState::Triggered {
                sentinel: fired,
                visible,
            } if fired == sentinel => {
                tracing::trace!(%sentinel, "re-armed after load");
                self.state = TriggerState::Armed(Observation {
                    sentinel,
                    was_visible: Some(visible),
                });
            }
            _ => self.attach(sentinel, false),
        }
    }

    /// Stop observing and forget everything, including a fired sentinel.
    pub fn detach(&mut self) {
        self.tear_down();
        self.state = TriggerState::Idle;
    }

    /// Treat the next visibility report for `sentinel` as a fresh entry.
    ///
    /// Used when the user explicitly moves onto the sentinel card. Only an
    /// armed observation of that same card is affected, so a fired card
    /// still waits for its load cycle to end.
    pub fn revisit(&mut self, sentinel: Sentinel) {
        if let TriggerState::Armed(obs) = &mut self.state {
            if obs.sentinel == sentinel && obs.was_visible.is_some() {
                tracing::trace!(%sentinel, "revisited");
                obs.was_visible = None;
            }
        }
    }

    /// Drop the live observation and any pending sentinel. A fired
    /// sentinel is remembered so `resume` can re-arm it.
    fn tear_down(&mut self) {
        if let TriggerState::Armed(obs) = &self.state {
            tracing::trace!(sentinel = %obs.sentinel, "observation torn down");
        }
        self.pending = None;
        if matches!(self.state, TriggerState::Armed(_)) {
            self.state = TriggerState::Idle;
        }
    }

    /// Report which cards are on screen. Returns whether a signal fired.
    pub fn observe(&mut self, visible: &Range<usize>) -> bool {
        match &mut self.state {
            TriggerState::Idle => false,
            TriggerState::Triggered {
                sentinel,
                visible: seen,
            } => {
                *seen = sentinel.is_within(visible);
                false
            }
            TriggerState::Armed(obs) => {
                let now = obs.sentinel.is_within(visible);
                let entered = now && obs.was_visible != Some(true);
                obs.was_visible = Some(now);
                if !entered {
                    return false;
                }

                let sentinel = obs.sentinel;
                self.state = TriggerState::Triggered {
                    sentinel,
                    visible: true,
                };
                self.fired += 1;
                tracing::debug!(%sentinel, "sentinel visible, signalling next page");
                if let Some(callback) = self.on_signal.as_mut() {
                    callback(sentinel);
                }
                true
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use super::*;

    fn counting_trigger() -> (ScrollTrigger, Arc<AtomicUsize>) {
        let count = Arc::new(AtomicUsize::new(0));
        let mut trigger = ScrollTrigger::new();
        let c = Arc::clone(&count);
        trigger.on_signal(move |_| {
            c.fetch_add(1, Ordering::SeqCst);
        });
        (trigger, count)
    }

    #[test]
    fn starts_idle_and_ignores_visibility() {
        let (mut trigger, count) = counting_trigger();
        assert_eq!(trigger.state(), &TriggerState::Idle);
        assert!(!trigger.observe(&(0..100)));
        assert_eq!(count.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn fires_when_sentinel_enters_view() {
        let (mut trigger, count) = counting_trigger();
        trigger.attach(Sentinel(19), false);
        assert_eq!(trigger.live_observations(), 1);

        assert!(!trigger.observe(&(0..8)));
        assert!(trigger.observe(&(12..20)));
        assert_eq!(count.load(Ordering::SeqCst), 1);
        assert!(matches!(trigger.state(), TriggerState::Triggered { .. }));
        assert_eq!(trigger.live_observations(), 0);
    }

    #[test]
    fn fires_immediately_if_already_visible() {
        let (mut trigger, count) = counting_trigger();
        trigger.attach(Sentinel(3), false);
        assert!(trigger.observe(&(0..8)));
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn fires_once_per_attachment() {
        let (mut trigger, count) = counting_trigger();
        trigger.attach(Sentinel(19), false);
        trigger.observe(&(12..20));
        trigger.observe(&(0..8));
        trigger.observe(&(12..20));
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn reattaching_same_sentinel_does_not_double_fire() {
        let (mut trigger, count) = counting_trigger();
        trigger.attach(Sentinel(19), false);
        trigger.attach(Sentinel(19), false);
        assert_eq!(trigger.live_observations(), 1);

        trigger.observe(&(0..8));
        trigger.attach(Sentinel(19), false);
        trigger.observe(&(12..20));
        trigger.attach(Sentinel(19), false);
        trigger.observe(&(0..8));
        trigger.attach(Sentinel(19), false);
        trigger.observe(&(12..20));
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn rearm_on_new_sentinel_after_trigger() {
        let (mut trigger, count) = counting_trigger();
        trigger.attach(Sentinel(19), false);
        trigger.observe(&(12..20));

        trigger.attach(Sentinel(39), false);
        assert!(matches!(trigger.state(), TriggerState::Armed(_)));
        assert!(!trigger.observe(&(12..24)));
        assert!(trigger.observe(&(32..40)));
        assert_eq!(count.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn resume_after_failed_load_waits_for_new_entry() {
        let (mut trigger, count) = counting_trigger();
        trigger.attach(Sentinel(19), false);
        trigger.observe(&(12..20));

        // Load in flight, then it fails: the last card is unchanged.
        trigger.attach(Sentinel(19), true);
        assert_eq!(trigger.pending(), Some(Sentinel(19)));
        trigger.resume();
        assert_eq!(trigger.live_observations(), 1);

        assert!(!trigger.observe(&(12..20)));
        assert!(!trigger.observe(&(0..8)));
        assert!(trigger.observe(&(12..20)));
        assert_eq!(count.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn resume_without_pending_is_noop() {
        let (mut trigger, _) = counting_trigger();
        trigger.attach(Sentinel(3), false);
        trigger.observe(&(0..8));
        trigger.resume();
        assert!(matches!(trigger.state(), TriggerState::Triggered { .. }));
    }

    #[test]
    fn attach_during_load_is_deferred_until_resume() {
        let (mut trigger, count) = counting_trigger();
        trigger.attach(Sentinel(19), false);
        trigger.attach(Sentinel(39), true);

        assert_eq!(trigger.live_observations(), 0);
        assert_eq!(trigger.pending(), Some(Sentinel(39)));
        assert!(!trigger.observe(&(32..40)));

        trigger.resume();
        assert_eq!(trigger.pending(), None);
        assert!(trigger.observe(&(32..40)));
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn later_attach_replaces_pending() {
        let (mut trigger, _) = counting_trigger();
        trigger.attach(Sentinel(19), true);
        trigger.attach(Sentinel(39), true);
        assert_eq!(trigger.pending(), Some(Sentinel(39)));
        trigger.attach(Sentinel(39), false);
        assert_eq!(trigger.pending(), None);
        assert_eq!(trigger.live_observations(), 1);
    }

    #[test]
    fn detach_stops_signals() {
        let (mut trigger, count) = counting_trigger();
        trigger.attach(Sentinel(5), false);
        trigger.detach();
        assert_eq!(trigger.state(), &TriggerState::Idle);
        assert!(!trigger.observe(&(0..10)));
        assert_eq!(count.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn detach_forgets_fired_sentinel() {
        let (mut trigger, count) = counting_trigger();
        trigger.attach(Sentinel(5), false);
        trigger.observe(&(0..10));
        trigger.attach(Sentinel(5), true);

        trigger.detach();
        assert_eq!(trigger.state(), &TriggerState::Idle);
        assert_eq!(trigger.pending(), None);
        trigger.resume();
        assert!(!trigger.observe(&(0..10)));
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn revisit_refires_sentinel_that_never_left_view() {
        let (mut trigger, count) = counting_trigger();
        trigger.attach(Sentinel(19), false);
        trigger.observe(&(0..24));
        trigger.attach(Sentinel(19), true);
        trigger.resume();
        assert!(!trigger.observe(&(0..24)));

        trigger.revisit(Sentinel(19));
        assert!(trigger.observe(&(0..24)));
        assert_eq!(count.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn revisit_ignores_fired_and_other_sentinels() {
        let (mut trigger, count) = counting_trigger();
        trigger.attach(Sentinel(19), false);
        trigger.observe(&(0..24));

        trigger.revisit(Sentinel(19));
        assert!(!trigger.observe(&(0..24)));

        trigger.attach(Sentinel(39), false);
        trigger.observe(&(0..24));
        trigger.revisit(Sentinel(19));
        assert!(!trigger.observe(&(0..24)));
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn callback_receives_the_sentinel() {
        let seen = Arc::new(AtomicUsize::new(usize::MAX));
        let mut trigger = ScrollTrigger::new();
        let s = Arc::clone(&seen);
        trigger.on_signal(move |sentinel| s.store(sentinel.0, Ordering::SeqCst));
        trigger.attach(Sentinel(7), false);
        trigger.observe(&(0..10));
        assert_eq!(seen.load(Ordering::SeqCst), 7);
        assert_eq!(trigger.fired(), 1);
    }
}
