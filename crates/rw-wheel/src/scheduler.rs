//! Frame scheduling
//!
//! The session asks its scheduler for one frame at a time and the host calls
//! `RaffleSession::on_frame` when it fires. In the browser this is
//! `requestAnimationFrame`; headless callers use [`ManualClock`].

/// Host frame clock
pub trait FrameScheduler {
    /// Request one more frame. Requesting while a frame is pending is a no-op.
    fn schedule_next_tick(&mut self);

    /// Drop the pending frame, if any
    fn cancel(&mut self);

    /// A frame has been requested and not yet delivered
    fn is_pending(&self) -> bool;
}

/// Converts host timestamps (ms) into clamped elapsed seconds
#[derive(Debug, Clone, Copy)]
pub struct FrameTimer {
    previous_ms: Option<f64>,
    max_step: f64,
}

impl FrameTimer {
    pub fn new(max_step: f64) -> Self {
        Self {
            previous_ms: None,
            max_step,
        }
    }

    /// Elapsed seconds since the previous frame. The first frame after a
    /// reset yields zero; backwards timestamps yield zero.
    pub fn elapsed(&mut self, timestamp_ms: f64) -> f64 {
        let previous = self.previous_ms.unwrap_or(timestamp_ms);
        self.previous_ms = Some(timestamp_ms);
        ((timestamp_ms - previous) / 1000.0).clamp(0.0, self.max_step)
    }

    /// Forget the previous timestamp (loop went idle)
    pub fn reset(&mut self) {
        self.previous_ms = None;
    }

    pub fn is_running(&self) -> bool {
        self.previous_ms.is_some()
    }
}

/// Manually advanced clock for tests and the simulator
#[derive(Debug, Clone)]
pub struct ManualClock {
    now_ms: f64,
    frame_ms: f64,
    pending: bool,
    requests: u64,
    cancels: u64,
}

impl ManualClock {
    /// Clock delivering frames `frame_ms` apart
    pub fn new(frame_ms: f64) -> Self {
        Self {
            now_ms: 0.0,
            frame_ms,
            pending: false,
            requests: 0,
            cancels: 0,
        }
    }

    /// 60 Hz display
    pub fn sixty_hz() -> Self {
        Self::new(1000.0 / 60.0)
    }

    /// Deliver the pending frame, advancing time by one interval
    pub fn next_frame(&mut self) -> Option<f64> {
        if !self.pending {
            return None;
        }
        self.pending = false;
        self.now_ms += self.frame_ms;
        Some(self.now_ms)
    }

    /// Let wall time pass without delivering a frame (tab in background)
    pub fn sleep(&mut self, ms: f64) {
        self.now_ms += ms;
    }

    pub fn now_ms(&self) -> f64 {
        self.now_ms
    }

    pub fn frame_ms(&self) -> f64 {
        self.frame_ms
    }

    /// Total frames requested
    pub fn requests(&self) -> u64 {
        self.requests
    }

    /// Total cancellations of a pending frame
    pub fn cancels(&self) -> u64 {
        self.cancels
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::sixty_hz()
    }
}

impl FrameScheduler for ManualClock {
    fn schedule_next_tick(&mut self) {
        if !self.pending {
            self.pending = true;
            self.requests += 1;
        }
    }

    fn cancel(&mut self) {
        if self.pending {
            self.pending = false;
            self.cancels += 1;
        }
    }

    fn is_pending(&self) -> bool {
        self.pending
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_first_frame_is_zero() {
        let mut timer = FrameTimer::new(0.05);
        assert_eq!(timer.elapsed(1234.0), 0.0);
        assert_relative_eq!(timer.elapsed(1250.0), 0.016);
    }

    #[test]
    fn test_large_gap_is_clamped() {
        let mut timer = FrameTimer::new(0.05);
        timer.elapsed(0.0);
        assert_relative_eq!(timer.elapsed(10_000.0), 0.05);
        assert_eq!(timer.elapsed(9_000.0), 0.0);
    }

    #[test]
    fn test_reset_forgets_previous() {
        let mut timer = FrameTimer::new(0.05);
        timer.elapsed(100.0);
        timer.reset();
        assert!(!timer.is_running());
        assert_eq!(timer.elapsed(5_000.0), 0.0);
    }

    #[test]
    fn test_manual_clock_delivers_only_requested_frames() {
        let mut clock = ManualClock::new(10.0);
        assert_eq!(clock.next_frame(), None);
        clock.schedule_next_tick();
        clock.schedule_next_tick();
        assert_eq!(clock.requests(), 1);
        assert_eq!(clock.next_frame(), Some(10.0));
        assert_eq!(clock.next_frame(), None);

        clock.schedule_next_tick();
        clock.cancel();
        assert_eq!(clock.next_frame(), None);
        assert_eq!(clock.cancels(), 1);
    }
}
