//! The two-step capture state machine

use std::fmt;
use std::time::{Duration, Instant};

use thiserror::Error;
use tracing::{debug, info, warn};

use super::status::{Controls, Status};
use crate::capture::Capture;
use crate::config::DEFAULT_LIVENESS_TIMEOUT_SECS;
use crate::error::CaptureError;

/// Where the user is in the capture sequence
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FlowState {
    #[default]
    Idle,
    AwaitingFirst,
    AwaitingSecond,
    Done,
}

impl fmt::Display for FlowState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::AwaitingFirst => "awaiting screen 1",
            Self::AwaitingSecond => "awaiting screen 2",
            Self::Done => "done",
        };
        f.write_str(name)
    }
}

/// The two captures of a flow
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureStep {
    /// Before scrolling
    First,
    /// After scrolling
    Second,
}

impl CaptureStep {
    pub fn number(&self) -> u8 {
        match self {
            Self::First => 1,
            Self::Second => 2,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::First => "Screen 1",
            Self::Second => "Screen 2",
        }
    }

    /// Status shown while the capture is in flight
    pub fn capturing_status(&self) -> Status {
        match self {
            Self::First => Status::info("Capturing Screen 1 (pre-scroll)..."),
            Self::Second => Status::info("Capturing Screen 2 (post-scroll)..."),
        }
    }
}

/// Proof that a capture was dispatched for a given step of a given flow.
///
/// Results are only accepted with the ticket that is currently in flight, so
/// a capture issued before a reset can never land in the new flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CaptureTicket {
    step: CaptureStep,
    generation: u64,
}

impl CaptureTicket {
    pub fn step(&self) -> CaptureStep {
        self.step
    }
}

/// Why a capture request was refused
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowRejection {
    #[error("capture flow has not been started")]
    NotStarted,

    #[error("Screen 2 requested before Screen 1 was captured")]
    MissingFirstCapture,

    #[error("{step:?} capture requested while {state}")]
    OutOfOrder { step: CaptureStep, state: FlowState },

    #[error("a capture is already in progress")]
    AlreadyInFlight,

    #[error("both screens are already captured; start again to recapture")]
    Finished,
}

/// Result of applying a capture outcome
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlowUpdate {
    /// The outcome belonged to a flow that has since been reset
    Stale,
    /// The capture failed; the same step may be retried
    Retry(Status),
    /// Screen 1 recorded, waiting for screen 2
    Advanced(Status),
    /// Both screens recorded
    Completed(Status),
}

impl FlowUpdate {
    pub fn status(&self) -> Option<&Status> {
        match self {
            Self::Stale => None,
            Self::Retry(status) | Self::Advanced(status) | Self::Completed(status) => Some(status),
        }
    }
}

/// Capture flow state, owned by the UI and mutated only through its methods
#[derive(Debug, Clone)]
pub struct CaptureFlow {
    state: FlowState,
    first: Option<Capture>,
    second: Option<Capture>,
    in_flight: Option<CaptureTicket>,
    generation: u64,
    liveness_timeout: Duration,
    liveness_deadline: Option<Instant>,
}

impl Default for CaptureFlow {
    fn default() -> Self {
        Self::new(Duration::from_secs(DEFAULT_LIVENESS_TIMEOUT_SECS))
    }
}

impl CaptureFlow {
    pub fn new(liveness_timeout: Duration) -> Self {
        Self {
            state: FlowState::Idle,
            first: None,
            second: None,
            in_flight: None,
            generation: 0,
            liveness_timeout,
            liveness_deadline: None,
        }
    }

    pub fn state(&self) -> FlowState {
        self.state
    }

    pub fn first(&self) -> Option<&Capture> {
        self.first.as_ref()
    }

    pub fn second(&self) -> Option<&Capture> {
        self.second.as_ref()
    }

    /// The capture currently awaited, if any
    pub fn in_flight(&self) -> Option<CaptureTicket> {
        self.in_flight
    }

    /// Return to `Idle`, discarding both captures and any pending result
    pub fn reset(&mut self) {
        if self.in_flight.is_some() {
            debug!("reset while a capture is in flight; its result will be ignored");
        }
        self.state = FlowState::Idle;
        self.first = None;
        self.second = None;
        self.in_flight = None;
        self.liveness_deadline = None;
        self.generation += 1;
    }

    /// Begin a new flow.
    ///
    /// Always resets first. Without a capture host the flow stays `Idle`.
    pub fn start(&mut self, host_available: bool, now: Instant) -> Status {
        self.reset();

        if !host_available {
            warn!("start pressed without a capture host");
            return Status::for_capture_error(CaptureStep::First, &CaptureError::HostUnavailable);
        }

        self.state = FlowState::AwaitingFirst;
        self.liveness_deadline = Some(now + self.liveness_timeout);
        info!("capture flow started");
        Status::info(
            "Open your Material Storage via the Journal (do NOT scroll). \
             Press [1] to capture Screen 1 when ready.",
        )
    }

    /// Reserve the single in-flight slot for a capture of `step`
    pub fn begin_capture(&mut self, step: CaptureStep) -> Result<CaptureTicket, FlowRejection> {
        if self.in_flight.is_some() {
            return Err(FlowRejection::AlreadyInFlight);
        }

        match (self.state, step) {
            (FlowState::Idle, _) => return Err(FlowRejection::NotStarted),
            (FlowState::Done, _) => return Err(FlowRejection::Finished),
            (_, CaptureStep::Second) if self.first.is_none() => {
                return Err(FlowRejection::MissingFirstCapture)
            }
            (FlowState::AwaitingFirst, CaptureStep::First)
            | (FlowState::AwaitingSecond, CaptureStep::Second) => {}
            (state, step) => return Err(FlowRejection::OutOfOrder { step, state }),
        }

        let ticket = CaptureTicket {
            step,
            generation: self.generation,
        };
        self.in_flight = Some(ticket);
        debug!("dispatching {} capture", step.label());
        Ok(ticket)
    }

    /// Apply the outcome of a dispatched capture
    pub fn complete_capture(
        &mut self,
        ticket: CaptureTicket,
        result: Result<Capture, CaptureError>,
    ) -> FlowUpdate {
        if self.in_flight != Some(ticket) || ticket.generation != self.generation {
            debug!("ignoring stale {} capture result", ticket.step.label());
            return FlowUpdate::Stale;
        }
        self.in_flight = None;

        let capture = match result {
            Ok(capture) => capture,
            Err(e) => {
                warn!("{} capture failed: {}", ticket.step.label(), e);
                return FlowUpdate::Retry(Status::for_capture_error(ticket.step, &e));
            }
        };

        match ticket.step {
            CaptureStep::First => {
                self.first = Some(capture);
                self.liveness_deadline = None;
                self.state = FlowState::AwaitingSecond;
                info!("screen 1 captured");
                FlowUpdate::Advanced(Status::success(
                    "Screen 1 captured. Now scroll in-game (keep the last row visible), \
                     then press [2] to capture Screen 2.",
                ))
            }
            CaptureStep::Second => {
                self.second = Some(capture);
                self.state = FlowState::Done;
                info!("screen 2 captured; flow complete");
                FlowUpdate::Completed(Status::success(
                    "Screen 2 captured. Both screens recorded; enter your quantities.",
                ))
            }
        }
    }

    /// One-shot hint when nothing has been captured long after starting.
    ///
    /// Advisory only: never changes state or touches an in-flight capture.
    pub fn poll_liveness(&mut self, now: Instant) -> Option<Status> {
        let deadline = self.liveness_deadline?;
        if self.state != FlowState::AwaitingFirst || self.first.is_some() {
            self.liveness_deadline = None;
            return None;
        }
        if now < deadline {
            return None;
        }

        self.liveness_deadline = None;
        warn!(
            "no pre-scroll capture {}s after start",
            self.liveness_timeout.as_secs()
        );
        Some(Status::warning(
            "App is failing to capture: make sure the Material Storage is open via the Journal \
             and check your capture permissions and game focus.",
        ))
    }

    /// Control enablement for the current state
    pub fn controls(&self) -> Controls {
        let idle_slot = self.in_flight.is_none();
        Controls {
            start: true,
            capture_first: idle_slot && self.state == FlowState::AwaitingFirst,
            capture_second: idle_slot
                && self.state == FlowState::AwaitingSecond
                && self.first.is_some(),
        }
    }
}
