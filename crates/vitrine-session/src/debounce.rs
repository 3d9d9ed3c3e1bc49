//! Debounced search input as an explicit state machine.
//!
//! Keystrokes arrive faster than the listing service should be queried, and
//! responses can resolve out of order over the network. Both hazards are
//! handled here, without touching a real clock:
//!
//! - the *quiet period* is modeled as a timer the driver starts on request;
//!   a restart invalidates the previous timer by generation number, so
//!   cancellation needs no timer handle;
//! - every issued request is tagged with a strictly increasing sequence
//!   number, and only a response carrying the latest issued number is ever
//!   admitted. A slow response that arrives after a newer request was issued
//!   is discarded silently, so the rendered listing always reflects the most
//!   recently issued request.
//!
//! The machine is pure: it emits [`DebounceEffect`]s describing what the
//! driver should do and never sleeps or performs I/O itself, which is what
//! makes the ordering property testable with plain function calls.

use std::time::Duration;

/// Where the machine currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DebounceState {
    /// No query in flight or scheduled.
    Idle,
    /// A quiet-period timer is pending.
    Scheduled,
    /// A request has been issued; its response has not yet been admitted.
    InFlight,
}

/// What the driver must do next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DebounceEffect {
    /// (Re)start the quiet-period timer. Any previously started timer is
    /// dead: its generation no longer matches.
    StartTimer { timer: u64, delay: Duration },
    /// Issue the search request for `text`, tagged with `seq`.
    Issue { text: String, seq: u64 },
}

/// Turns a stream of keystrokes into at most one request per quiet period
/// and gates responses by issue order.
#[derive(Debug)]
pub struct SearchDebouncer {
    quiet_period: Duration,
    state: DebounceState,
    pending_text: Option<String>,
    timer_gen: u64,
    latest_seq: u64,
}

impl SearchDebouncer {
    #[must_use]
    pub fn new(quiet_period: Duration) -> Self {
        Self {
            quiet_period,
            state: DebounceState::Idle,
            pending_text: None,
            timer_gen: 0,
            latest_seq: 0,
        }
    }

    #[must_use]
    pub fn state(&self) -> DebounceState {
        self.state
    }

    /// Sequence number of the most recently issued request; 0 before any.
    #[must_use]
    pub fn latest_seq(&self) -> u64 {
        self.latest_seq
    }

    /// A keystroke changed the input to `text`.
    ///
    /// Non-empty text (re)starts the quiet-period timer. Empty text takes
    /// the fast path: the timer is bypassed and the default unfiltered
    /// request is issued immediately.
    pub fn input(&mut self, text: &str) -> DebounceEffect {
        self.timer_gen += 1;
        if text.is_empty() {
            self.pending_text = None;
            self.state = DebounceState::InFlight;
            DebounceEffect::Issue {
                text: String::new(),
                seq: self.next_seq(),
            }
        } else {
            self.pending_text = Some(text.to_owned());
            self.state = DebounceState::Scheduled;
            DebounceEffect::StartTimer {
                timer: self.timer_gen,
                delay: self.quiet_period,
            }
        }
    }

    /// The quiet-period timer `timer` elapsed.
    ///
    /// Returns the issue effect, or `None` when the timer was superseded by
    /// a later keystroke or an immediate dispatch before it fired.
    pub fn timer_fired(&mut self, timer: u64) -> Option<DebounceEffect> {
        if timer != self.timer_gen || self.state != DebounceState::Scheduled {
            return None;
        }
        let text = self.pending_text.take().unwrap_or_default();
        self.state = DebounceState::InFlight;
        Some(DebounceEffect::Issue {
            text,
            seq: self.next_seq(),
        })
    }

    /// Allocates a sequence number for a request issued outside the debounce
    /// path (facet, price, sort, page, and category changes).
    ///
    /// The new request supersedes anything scheduled or in flight: a pending
    /// quiet-period timer is invalidated and an older response can no longer
    /// be admitted.
    pub fn issue_now(&mut self) -> u64 {
        self.timer_gen += 1;
        self.pending_text = None;
        self.state = DebounceState::InFlight;
        self.next_seq()
    }

    /// A response tagged `seq` arrived. `true` means render it; `false`
    /// means a newer request has been issued since, and the stale response
    /// must be discarded without touching the view.
    pub fn admit(&mut self, seq: u64) -> bool {
        if seq != self.latest_seq {
            return false;
        }
        if self.state == DebounceState::InFlight {
            self.state = DebounceState::Idle;
        }
        true
    }

    fn next_seq(&mut self) -> u64 {
        self.latest_seq += 1;
        self.latest_seq
    }
}
