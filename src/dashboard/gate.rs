//! Polling gate: interval throttle plus single-flight guard.
//!
//! Every polled page owns one gate. A tick only turns into a request when the
//! page is visible, more than `min_interval` seconds have passed since the
//! last issued refresh, and no request of this page is still outstanding.

use log::debug;

use crate::dashboard::RequestId;

/// Shortest refresh interval a gate accepts, in seconds
pub const MIN_INTERVAL_SECS: u64 = 1;

/// One-time layout construction state of a page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Layout {
    #[default]
    Uninitialized,
    Ready,
}

/// Why a refresh was not issued
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Skip {
    /// Hidden pages never refresh
    Hidden,
    /// Interval has not elapsed yet
    TooSoon,
    /// A request is outstanding; this one is coalesced into it
    InFlight,
}

/// Permission to issue exactly one request with the given id
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pass {
    pub request_id: RequestId,
    /// True only on the first pass over the page's lifetime
    pub build_layout: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Refresh(Pass),
    Skip(Skip),
}

impl Decision {
    pub fn pass(self) -> Option<Pass> {
        match self {
            Decision::Refresh(pass) => Some(pass),
            Decision::Skip(_) => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct PollingGate {
    min_interval: u64,
    last_refresh: i64,
    in_flight: Option<RequestId>,
    layout: Layout,
}

impl PollingGate {
    /// `min_interval` below [`MIN_INTERVAL_SECS`] is raised to it
    pub fn new(min_interval: u64) -> Self {
        Self {
            min_interval: min_interval.max(MIN_INTERVAL_SECS),
            last_refresh: 0,
            in_flight: None,
            layout: Layout::Uninitialized,
        }
    }

    pub fn min_interval(&self) -> u64 {
        self.min_interval
    }

    /// Takes effect at the next tick; never forces a refresh
    pub fn set_min_interval(&mut self, seconds: u64) {
        let seconds = seconds.max(MIN_INTERVAL_SECS);
        debug!("Refresh interval changed {}s -> {}s", self.min_interval, seconds);
        self.min_interval = seconds;
    }

    /// Wall-clock seconds of the last issued refresh, 0 if never
    pub fn last_refresh(&self) -> i64 {
        self.last_refresh
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn in_flight(&self) -> Option<RequestId> {
        self.in_flight
    }

    pub fn layout(&self) -> Layout {
        self.layout
    }

    /// Periodic refresh check, called from a page's tick handler
    pub fn maybe_refresh(&mut self, visible: bool, now: i64) -> Decision {
        if !visible {
            return Decision::Skip(Skip::Hidden);
        }
        // intervals beyond i64::MAX mean "never again", not a negative bound
        let min_interval = i64::try_from(self.min_interval).unwrap_or(i64::MAX);
        if now.saturating_sub(self.last_refresh) <= min_interval {
            return Decision::Skip(Skip::TooSoon);
        }
        self.begin(now)
    }

    /// User-initiated reset: bypasses the interval, not the single-flight guard
    pub fn force(&mut self, visible: bool, now: i64) -> Decision {
        if !visible {
            return Decision::Skip(Skip::Hidden);
        }
        self.begin(now)
    }

    /// Settles the outstanding request. Returns false for a completion that
    /// does not belong to it, which leaves the gate untouched.
    pub fn finish(&mut self, request_id: RequestId) -> bool {
        match self.in_flight {
            Some(outstanding) if outstanding == request_id => {
                self.in_flight = None;
                true
            }
            _ => false,
        }
    }

    fn begin(&mut self, now: i64) -> Decision {
        if let Some(outstanding) = self.in_flight {
            debug!("Refresh coalesced into outstanding request {}", outstanding);
            return Decision::Skip(Skip::InFlight);
        }

        let request_id = RequestId::new();
        self.in_flight = Some(request_id);
        // monotonic even when a reset arrives with an older clock reading
        self.last_refresh = self.last_refresh.max(now);

        let build_layout = self.layout == Layout::Uninitialized;
        self.layout = Layout::Ready;

        Decision::Refresh(Pass {
            request_id,
            build_layout,
        })
    }
}
