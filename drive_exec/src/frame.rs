//! # Frame scheduling
//!
//! The simulation is ticked once per frame. A `FrameLoop` calls a frame function at a fixed
//! nominal period, passing it the wall-clock time elapsed since the previous frame, until either
//! the frame function asks to stop or the loop's `CancelToken` is cancelled. The token is checked
//! immediately before every frame, so once it is cancelled no further frame runs.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::{info, warn};
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};
use std::thread;
use std::time::{Duration, Instant};
use thiserror::Error;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Measures the time elapsed between consecutive frames.
#[derive(Debug, Clone)]
pub struct FrameClock {
    nominal_period_s: f64,
    last: Option<Instant>,
}

/// A handle which stops a `FrameLoop`. Clones share the same state.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

/// Runs a frame function at a fixed period.
pub struct FrameLoop {
    period: Duration,

    clock: FrameClock,

    cancel: CancelToken,

    /// Number of frames executed so far
    num_frames: u64,

    /// Number of consecutive frames which took longer than the period
    num_consec_overruns: u64,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Returned by a frame function to say whether the loop should carry on.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum LoopControl {
    Continue,
    Break,
}

/// Why a frame loop stopped.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum LoopExit {
    /// The frame function returned `LoopControl::Break`.
    Finished,

    /// The loop's token was cancelled.
    Cancelled,
}

#[derive(Debug, Error)]
pub enum FrameError {
    #[error("The frame period must be a positive number of seconds, got {0}")]
    InvalidPeriod(f64),
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl FrameClock {
    pub fn new(nominal_period_s: f64) -> Self {
        Self {
            nominal_period_s,
            last: None,
        }
    }

    /// Forget the previous frame, the next tick will report the nominal period.
    pub fn restart(&mut self) {
        self.last = None;
    }

    /// Seconds elapsed since the previous tick.
    pub fn tick(&mut self) -> f64 {
        self.tick_at(Instant::now())
    }

    /// Seconds elapsed between the previous tick and `now`.
    ///
    /// The first tick after creation or a restart returns the nominal period.
    pub fn tick_at(&mut self, now: Instant) -> f64 {
        let dt_s = match self.last {
            Some(last) => now.saturating_duration_since(last).as_secs_f64(),
            None => self.nominal_period_s,
        };

        self.last = Some(now);

        dt_s
    }
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }
}

impl FrameLoop {
    /// Create a new loop running every `period_s` seconds, stopped by `cancel`.
    pub fn new(period_s: f64, cancel: CancelToken) -> Result<Self, FrameError> {
        if !period_s.is_finite() || period_s <= 0.0 {
            return Err(FrameError::InvalidPeriod(period_s));
        }

        Ok(Self {
            period: Duration::from_secs_f64(period_s),
            clock: FrameClock::new(period_s),
            cancel,
            num_frames: 0,
            num_consec_overruns: 0,
        })
    }

    /// A token which cancels this loop.
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    pub fn num_frames(&self) -> u64 {
        self.num_frames
    }

    /// Call `frame` once per period with the elapsed time in seconds since the previous frame.
    ///
    /// Blocks until `frame` returns `LoopControl::Break` or the token is cancelled.
    pub fn run<F>(&mut self, mut frame: F) -> LoopExit
    where
        F: FnMut(f64) -> LoopControl,
    {
        self.clock.restart();

        loop {
            if self.cancel.is_cancelled() {
                info!("Frame loop cancelled after {} frames", self.num_frames);
                return LoopExit::Cancelled;
            }

            let frame_start = Instant::now();
            let dt_s = self.clock.tick_at(frame_start);

            self.num_frames += 1;

            if frame(dt_s) == LoopControl::Break {
                return LoopExit::Finished;
            }

            let frame_dur = frame_start.elapsed();

            match self.period.checked_sub(frame_dur) {
                Some(d) => {
                    self.num_consec_overruns = 0;
                    thread::sleep(d);
                }
                None => {
                    self.num_consec_overruns += 1;
                    warn!(
                        "Frame overran by {:.06} s ({} consecutive)",
                        frame_dur.as_secs_f64() - self.period.as_secs_f64(),
                        self.num_consec_overruns
                    );
                }
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_clock() {
        let mut clock = FrameClock::new(0.5);
        let t0 = Instant::now();

        assert_eq!(clock.tick_at(t0), 0.5);
        assert!((clock.tick_at(t0 + Duration::from_millis(20)) - 0.02).abs() < 1e-9);

        // Time going backwards gives a zero length frame
        assert_eq!(clock.tick_at(t0), 0.0);

        clock.restart();
        assert_eq!(clock.tick_at(t0 + Duration::from_secs(10)), 0.5);
    }

    #[test]
    fn test_invalid_period() {
        assert!(FrameLoop::new(0.0, CancelToken::new()).is_err());
        assert!(FrameLoop::new(-1.0, CancelToken::new()).is_err());
        assert!(FrameLoop::new(std::f64::NAN, CancelToken::new()).is_err());
    }

    #[test]
    fn test_break() {
        let mut fl = FrameLoop::new(0.001, CancelToken::new()).unwrap();
        let mut dts = Vec::new();

        let exit = fl.run(|dt_s| {
            dts.push(dt_s);
            if dts.len() == 5 {
                LoopControl::Break
            } else {
                LoopControl::Continue
            }
        });

        assert_eq!(exit, LoopExit::Finished);
        assert_eq!(fl.num_frames(), 5);
        assert_eq!(dts[0], 0.001);
        assert!(dts.iter().all(|dt| *dt >= 0.0));
    }

    #[test]
    fn test_cancel_inside_frame() {
        let mut fl = FrameLoop::new(0.001, CancelToken::new()).unwrap();
        let token = fl.cancel_token();
        let mut frames_after_cancel = 0;
        let mut cancelled = false;

        let exit = fl.run(|_| {
            if cancelled {
                frames_after_cancel += 1;
            }
            token.cancel();
            cancelled = true;
            LoopControl::Continue
        });

        assert_eq!(exit, LoopExit::Cancelled);
        assert_eq!(frames_after_cancel, 0);
        assert_eq!(fl.num_frames(), 1);
    }

    #[test]
    fn test_cancel_from_thread() {
        let token = CancelToken::new();
        let mut fl = FrameLoop::new(0.001, token.clone()).unwrap();

        let handle = thread::spawn(move || {
            thread::sleep(Duration::from_millis(20));
            token.cancel();
        });

        let exit = fl.run(|_| LoopControl::Continue);
        handle.join().unwrap();

        assert_eq!(exit, LoopExit::Cancelled);
        assert!(fl.num_frames() > 0);

        // A cancelled token stops the loop before any frame
        let frames = fl.num_frames();
        assert_eq!(fl.run(|_| LoopControl::Continue), LoopExit::Cancelled);
        assert_eq!(fl.num_frames(), frames);
    }
}
