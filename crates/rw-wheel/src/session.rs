//! Raffle session — everything the page does, minus the DOM
//!
//! The host forwards form values, key and pointer events and frame callbacks;
//! the session updates state, panel labels and dirty flags, and hands back
//! draw commands. No operation leaves a partial mutation behind on failure.

use serde::{Deserialize, Serialize};

use rw_core::{RandomSource, RwError, RwResult, WheelConfig};

use crate::physics::{SpinEngine, SpinPhase, SpinState, TickOutcome};
use crate::pool::{DrawOutcome, NumberRange, PoolManager, WheelItem, parse_bound};
use crate::render::{self, DrawCommand, WheelView};
use crate::scheduler::{FrameScheduler, FrameTimer, ManualClock};
use crate::scratch::{Point, ScratchCard};
use crate::selector::pick_winning_index;

/// Panel label texts
pub mod labels {
    pub const READY: &str = "Ready";
    pub const SPINNING: &str = "Spinning";
    pub const SLOWING_DOWN: &str = "Slowing down";
    pub const STOPPED: &str = "Stopped";
    pub const SCRATCH_TO_REVEAL: &str = "Scratch to reveal";

    pub const NONE: &str = "None";
    pub const HIDDEN: &str = "Hidden";
    pub const INELIGIBLE: &str = "Number pool empty or invalid range";
    pub const NO_HISTORY: &str = "No numbers removed yet.";
}

/// Which game is showing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameMode {
    /// Spinning wheel over a number range
    #[default]
    Number,
    /// Scratch card over text options
    Text,
}

impl GameMode {
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Number => "Number",
            Self::Text => "Text",
        }
    }
}

/// What changed since the host last drew
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Dirty {
    pub wheel: bool,
    pub cover: bool,
    pub history: bool,
}

/// Page state
pub struct RaffleSession<S: FrameScheduler, R: RandomSource> {
    config: WheelConfig,
    mode: GameMode,
    pools: PoolManager,
    /// Snapshot of the number pool shown on the wheel
    wheel_items: Vec<WheelItem>,
    spin: SpinEngine,
    timer: FrameTimer,
    scratch: ScratchCard,
    scheduler: S,
    rng: R,
    status: String,
    result: String,
    number_error: String,
    text_error: String,
    dirty: Dirty,
}

impl<S: FrameScheduler, R: RandomSource> RaffleSession<S, R> {
    /// New session in Number mode over the default `0..=100` range
    pub fn new(config: WheelConfig, scheduler: S, rng: R) -> Self {
        let mut pools = PoolManager::new(config.limits);
        let default_range = NumberRange::default();
        if let Err(e) = pools.build_pool(default_range.min as f64, default_range.max as f64) {
            log::warn!("default range unusable with configured limits: {}", e);
        }

        let wheel_items = pools.number_wheel_items();
        log::info!("raffle session ready ({} numbers)", wheel_items.len());

        Self {
            spin: SpinEngine::new(config.physics.clone()),
            timer: FrameTimer::new(config.physics.max_frame_step),
            config,
            mode: GameMode::Number,
            pools,
            wheel_items,
            scratch: ScratchCard::new(),
            scheduler,
            rng,
            status: labels::READY.to_string(),
            result: labels::NONE.to_string(),
            number_error: String::new(),
            text_error: String::new(),
            dirty: Dirty {
                wheel: true,
                cover: true,
                history: true,
            },
        }
    }

    // ═══════════════════════════════════════════════════════════════════════
    // ACCESSORS
    // ═══════════════════════════════════════════════════════════════════════

    pub fn config(&self) -> &WheelConfig {
        &self.config
    }

    pub fn mode(&self) -> GameMode {
        self.mode
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn result(&self) -> &str {
        &self.result
    }

    pub fn number_error(&self) -> &str {
        &self.number_error
    }

    pub fn text_error(&self) -> &str {
        &self.text_error
    }

    pub fn pools(&self) -> &PoolManager {
        &self.pools
    }

    pub fn wheel_items(&self) -> &[WheelItem] {
        &self.wheel_items
    }

    pub fn spin_state(&self) -> &SpinState {
        self.spin.state()
    }

    pub fn spin_phase(&self) -> SpinPhase {
        self.spin.phase()
    }

    pub fn scratch(&self) -> &ScratchCard {
        &self.scratch
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }

    /// Wheel is spinning, gliding or held
    pub fn is_busy(&self) -> bool {
        self.spin.is_moving()
    }

    /// Drain the dirty flags
    pub fn take_dirty(&mut self) -> Dirty {
        std::mem::take(&mut self.dirty)
    }

    fn set_labels(&mut self, status: &str, result: &str) {
        self.status = status.to_string();
        self.result = result.to_string();
    }

    fn snapshot_wheel(&mut self) {
        self.wheel_items = self.pools.number_wheel_items();
        self.dirty.wheel = true;
    }

    // ═══════════════════════════════════════════════════════════════════════
    // MODE
    // ═══════════════════════════════════════════════════════════════════════

    /// Switch games. Ignored for the current mode or while the wheel moves.
    pub fn switch_mode(&mut self, mode: GameMode) -> bool {
        if mode == self.mode || self.is_busy() {
            return false;
        }

        self.mode = mode;
        self.number_error.clear();
        self.text_error.clear();

        match mode {
            GameMode::Number => {
                if self.pools.number_items().is_empty() && !self.pools.reset() {
                    let range = NumberRange::default();
                    if let Err(e) = self.pools.build_pool(range.min as f64, range.max as f64) {
                        log::warn!("default range unusable with configured limits: {}", e);
                    }
                }
                self.snapshot_wheel();
                self.dirty.history = true;
                self.set_labels(labels::READY, labels::NONE);
            }
            GameMode::Text => {
                let status = if self.scratch.text_result().is_some() {
                    labels::SCRATCH_TO_REVEAL
                } else {
                    labels::READY
                };
                self.set_labels(status, labels::HIDDEN);
            }
        }

        log::debug!("mode switched to {}", mode.display_name());
        true
    }

    // ═══════════════════════════════════════════════════════════════════════
    // NUMBER MODE
    // ═══════════════════════════════════════════════════════════════════════

    /// Apply raw min/max form values
    pub fn apply_number_range(&mut self, min_raw: &str, max_raw: &str) -> RwResult<()> {
        if self.is_busy() {
            return Err(RwError::Busy);
        }

        let min = parse_bound(min_raw);
        let max = parse_bound(max_raw);
        if let Err(e) = self.pools.build_pool(min, max) {
            self.number_error = e.to_string();
            if self.mode == GameMode::Number {
                self.wheel_items.clear();
                self.dirty.wheel = true;
            }
            return Err(e);
        }

        self.number_error.clear();
        self.dirty.history = true;
        if self.mode == GameMode::Number {
            self.snapshot_wheel();
            self.set_labels(labels::READY, labels::NONE);
        }
        Ok(())
    }

    /// Reset button: clear the error and re-apply the current inputs
    pub fn reset_number_mode(&mut self, min_raw: &str, max_raw: &str) -> RwResult<()> {
        if self.is_busy() {
            return Err(RwError::Busy);
        }
        self.number_error.clear();
        let applied = self.apply_number_range(min_raw, max_raw);
        self.set_labels(labels::READY, labels::NONE);
        applied
    }

    /// History list lines, oldest first
    pub fn removed_history_lines(&self) -> Vec<String> {
        let removed = self.pools.removed();
        if removed.is_empty() {
            return vec![labels::NO_HISTORY.to_string()];
        }
        removed.iter().map(i64::to_string).collect()
    }

    /// Spin key pressed. Key auto-repeat is ignored.
    pub fn space_down(&mut self, repeat: bool) -> RwResult<()> {
        if repeat || self.mode != GameMode::Number {
            return Ok(());
        }

        if let Err(e) = self.spin.press(self.wheel_items.len(), self.config.limits.min_items) {
            self.set_labels(labels::STOPPED, labels::INELIGIBLE);
            if self.pools.number_items().is_empty() {
                self.number_error = e.to_string();
            }
            log::warn!("spin rejected: {} items on wheel", self.wheel_items.len());
            return Err(e);
        }

        self.status = labels::SPINNING.to_string();
        self.dirty.wheel = true;
        if !self.scheduler.is_pending() {
            self.timer.reset();
            self.scheduler.schedule_next_tick();
        }
        Ok(())
    }

    /// Spin key released
    pub fn space_up(&mut self) {
        if self.spin.release() {
            self.status = labels::SLOWING_DOWN.to_string();
        }
    }

    /// Window lost focus: never leave the wheel accelerating or a stroke open
    pub fn blur(&mut self) {
        if self.spin.state().is_holding_space {
            self.space_up();
        }
        self.scratch.end_stroke();
    }

    /// A requested frame fired
    pub fn on_frame(&mut self, timestamp_ms: f64) {
        let dt = self.timer.elapsed(timestamp_ms);

        match self.spin.step(dt) {
            TickOutcome::Stopped => self.resolve_stop(),
            TickOutcome::Moving if self.spin.angular_velocity() > 0.0 => self.dirty.wheel = true,
            _ => {}
        }

        if self.spin.is_moving() {
            self.scheduler.schedule_next_tick();
        } else {
            self.timer.reset();
        }
    }

    /// Page is going away: stop the wheel where it stands and drop any pending frame
    pub fn teardown(&mut self) {
        if self.spin.halt() {
            self.set_labels(labels::READY, labels::NONE);
            self.dirty.wheel = true;
        }
        self.scratch.end_stroke();
        self.scheduler.cancel();
        self.timer.reset();
        log::info!("raffle session torn down");
    }

    fn resolve_stop(&mut self) {
        self.dirty.wheel = true;

        let Some(index) = pick_winning_index(self.wheel_items.len(), self.spin.rotation()) else {
            self.set_labels(labels::STOPPED, labels::NONE);
            return;
        };

        let item = self.wheel_items[index].clone();
        let text = item.to_string();
        self.spin.set_result(Some(text.clone()));
        self.set_labels(labels::STOPPED, &text);
        log::info!("wheel stopped on {} (segment {})", text, index);

        let Some(value) = item.as_number() else {
            return;
        };
        self.dirty.history = true;
        match self.pools.draw_and_remove(value) {
            Ok(DrawOutcome::Exhausted { .. }) => {
                self.number_error = RwError::PoolExhausted.to_string();
                self.wheel_items.clear();
            }
            Ok(DrawOutcome::Drawn { .. }) => self.snapshot_wheel(),
            Err(e) => log::warn!("drawn value not removed: {}", e),
        }
    }

    /// Wheel projection for a surface of the given size
    pub fn wheel_commands(&self, width: f64, height: f64) -> Vec<DrawCommand> {
        let view = WheelView {
            items: &self.wheel_items,
            rotation: self.spin.rotation(),
            in_motion: self.mode == GameMode::Number && self.is_busy(),
            width,
            height,
        };
        render::render_wheel(&view, &self.config.style)
    }

    // ═══════════════════════════════════════════════════════════════════════
    // TEXT MODE
    // ═══════════════════════════════════════════════════════════════════════

    /// Apply raw multi-line options. Any concealed answer is discarded.
    pub fn apply_text_options(&mut self, raw: &str) -> RwResult<()> {
        if let Err(e) = self.pools.apply_text_options(raw) {
            self.text_error = e.to_string();
            return Err(e);
        }

        self.text_error.clear();
        self.scratch.invalidate();
        self.dirty.cover = true;
        if self.mode == GameMode::Text {
            self.set_labels(labels::READY, labels::HIDDEN);
        }
        Ok(())
    }

    /// Re-apply options, then conceal a freshly sampled answer
    pub fn reset_scratch_card(&mut self, raw: &str) -> RwResult<String> {
        if let Err(e) = self.apply_text_options(raw) {
            self.status = labels::STOPPED.to_string();
            return Err(e);
        }

        let options = self
            .pools
            .text_options()
            .ok_or(RwError::TooFewOptions {
                min: self.config.limits.min_items,
            })?;
        let answer = self.scratch.reset(options, &mut self.rng).to_string();
        self.dirty.cover = true;
        self.status = labels::SCRATCH_TO_REVEAL.to_string();
        Ok(answer)
    }

    /// Drop options and answer
    pub fn clear_text_options(&mut self) {
        self.pools.clear_text();
        self.text_error.clear();
        self.scratch.invalidate();
        self.dirty.cover = true;
        self.set_labels(labels::READY, labels::NONE);
    }

    /// Text beneath the scratch cover
    pub fn scratch_label(&self) -> &str {
        self.scratch.label()
    }

    /// Fresh cover for a surface of the given size
    pub fn scratch_cover_commands(&self, width: f64, height: f64) -> Vec<DrawCommand> {
        render::render_scratch_cover(width, height, &self.config.style)
    }

    /// Pointer pressed on the scratch surface
    pub fn pointer_down(&mut self, at: Point) -> Option<DrawCommand> {
        self.scratch
            .pointer_down(at)
            .map(|p| render::render_scratch_hole(p, self.config.scratch.brush_radius))
    }

    /// Pointer moved over the scratch surface
    pub fn pointer_move(&mut self, at: Point) -> Option<DrawCommand> {
        self.scratch
            .pointer_move(at)
            .map(|p| render::render_scratch_hole(p, self.config.scratch.brush_radius))
    }

    /// Pointer released, left the surface or was cancelled
    pub fn pointer_up(&mut self) {
        self.scratch.end_stroke();
    }
}

impl<R: RandomSource> RaffleSession<ManualClock, R> {
    /// Deliver pending frames for `ms` of clock time. Returns frames delivered.
    pub fn advance_for(&mut self, ms: f64) -> usize {
        let until = self.scheduler.now_ms() + ms;
        let mut frames = 0;
        while self.scheduler.now_ms() + self.scheduler.frame_ms() <= until {
            let Some(ts) = self.scheduler.next_frame() else {
                break;
            };
            self.on_frame(ts);
            frames += 1;
        }
        frames
    }

    /// Deliver frames until the loop stops rescheduling or `max_frames` pass
    pub fn run_until_idle(&mut self, max_frames: usize) -> usize {
        let mut frames = 0;
        while frames < max_frames {
            let Some(ts) = self.scheduler.next_frame() else {
                break;
            };
            self.on_frame(ts);
            frames += 1;
        }
        frames
    }

    /// Hold the spin key for `ms`, release, and glide to rest.
    /// Returns the winning label.
    pub fn spin_for(&mut self, hold_ms: f64) -> RwResult<String> {
        self.space_down(false)?;
        self.advance_for(hold_ms);
        self.space_up();
        self.run_until_idle(usize::MAX);
        Ok(self.result.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rw_core::SeededRandom;

    type TestSession = RaffleSession<ManualClock, SeededRandom>;

    fn session() -> TestSession {
        RaffleSession::new(WheelConfig::standard(), ManualClock::sixty_hz(), SeededRandom::new(1))
    }

    #[test]
    fn test_starts_ready_with_default_range() {
        let mut s = session();
        assert_eq!(s.mode(), GameMode::Number);
        assert_eq!(s.wheel_items().len(), 101);
        assert_eq!((s.status(), s.result()), (labels::READY, labels::NONE));
        assert_eq!(s.removed_history_lines(), vec![labels::NO_HISTORY.to_string()]);
        assert!(s.take_dirty().wheel);
        assert_eq!(s.take_dirty(), Dirty::default());
    }

    #[test]
    fn test_invalid_range_empties_wheel_keeps_pool() {
        let mut s = session();
        let err = s.apply_number_range("5", "5").unwrap_err();
        assert_eq!(s.number_error(), err.to_string());
        assert!(s.wheel_items().is_empty());
        assert_eq!(s.pools().number_items().len(), 101);
        assert_eq!(s.space_down(false), Err(RwError::PoolIneligible));
        assert_eq!(s.result(), labels::INELIGIBLE);
    }

    #[test]
    fn test_repeat_key_is_ignored() {
        let mut s = session();
        s.space_down(true).unwrap();
        assert!(!s.is_busy());
        assert!(!s.scheduler().is_pending());
    }

    #[test]
    fn test_busy_blocks_mode_and_range_changes() {
        let mut s = session();
        s.space_down(false).unwrap();
        assert!(!s.switch_mode(GameMode::Text));
        assert_eq!(s.apply_number_range("1", "5"), Err(RwError::Busy));
        assert_eq!(s.reset_number_mode("1", "5"), Err(RwError::Busy));
        assert_eq!(s.wheel_items().len(), 101);
    }

    #[test]
    fn test_blur_releases_hold() {
        let mut s = session();
        s.space_down(false).unwrap();
        s.advance_for(200.0);
        s.blur();
        assert_eq!(s.status(), labels::SLOWING_DOWN);
        assert_eq!(s.spin_phase(), SpinPhase::Decelerating);
        s.run_until_idle(usize::MAX);
        assert_eq!(s.status(), labels::STOPPED);
        assert!(!s.scheduler().is_pending());
    }

    #[test]
    fn test_teardown_cancels_pending_frame() {
        let mut s = session();
        s.space_down(false).unwrap();
        assert!(s.scheduler().is_pending());
        s.teardown();
        assert!(!s.scheduler().is_pending());
        assert_eq!(s.scheduler().cancels(), 1);
        assert!(!s.spin_state().is_holding_space);
    }

    #[test]
    fn test_teardown_mid_glide_leaves_wheel_idle() {
        let mut s = session();
        s.space_down(false).unwrap();
        s.advance_for(300.0);
        s.space_up();
        s.advance_for(100.0);
        assert!(s.is_busy());

        s.teardown();
        assert!(!s.is_busy());
        assert!(!s.scheduler().is_pending());
        assert_eq!(s.spin_phase(), SpinPhase::Idle);
        assert_eq!((s.status(), s.result()), (labels::READY, labels::NONE));
        assert!(s.pools().removed().is_empty());

        assert!(s.switch_mode(GameMode::Text));
        assert!(s.switch_mode(GameMode::Number));
        assert_eq!(s.apply_number_range("1", "20"), Ok(()));
        assert_eq!(s.spin_for(500.0).map(|r| !r.is_empty()), Ok(true));
    }

    #[test]
    fn test_failed_reset_still_clears_labels() {
        let mut s = session();
        s.apply_number_range("1", "10").unwrap();
        s.spin_for(400.0).unwrap();
        assert_eq!(s.status(), labels::STOPPED);

        assert_eq!(
            s.reset_number_mode("5", "5"),
            Err(RwError::RangeTooSmall { min: 2 })
        );
        assert_eq!((s.status(), s.result()), (labels::READY, labels::NONE));
        assert_eq!(s.number_error(), "Range must contain at least 2 numbers to spin.");
    }

    #[test]
    fn test_space_in_text_mode_does_nothing() {
        let mut s = session();
        assert!(s.switch_mode(GameMode::Text));
        assert_eq!(s.result(), labels::HIDDEN);
        s.space_down(false).unwrap();
        assert!(!s.is_busy());
    }

    #[test]
    fn test_scratch_flow() {
        let mut s = session();
        s.switch_mode(GameMode::Text);
        assert_eq!(s.pointer_down(Point::new(1.0, 1.0)), None);

        let answer = s.reset_scratch_card("alpha\nbeta\ngamma").unwrap();
        assert!(["alpha", "beta", "gamma"].contains(&answer.as_str()));
        assert_eq!(s.scratch_label(), answer);
        assert_eq!(s.status(), labels::SCRATCH_TO_REVEAL);
        assert!(s.take_dirty().cover);

        assert!(matches!(
            s.pointer_down(Point::new(10.0, 20.0)),
            Some(DrawCommand::EraseCircle { radius, .. }) if radius == 26.0
        ));
        s.pointer_up();
        assert_eq!(s.pointer_move(Point::new(11.0, 20.0)), None);

        s.clear_text_options();
        assert!(!s.scratch().is_enabled());
        assert_eq!(s.result(), labels::NONE);
    }

    #[test]
    fn test_failed_scratch_reset_reports_stopped() {
        let mut s = session();
        s.switch_mode(GameMode::Text);
        assert!(s.reset_scratch_card("same\nsame").is_err());
        assert_eq!(s.status(), labels::STOPPED);
        assert_eq!(s.text_error(), "Enter at least 2 distinct options.");
    }
}
