//! Spin physics — hold-to-accelerate, release-to-glide
//!
//! ```text
//! Idle ──press──> Accelerating ──(v = target)──> Holding
//!                      │                            │
//!                      └──────────release───────────┘
//!                                   │
//!                                   v
//!                             Decelerating ──(v <= min_stop)──> Idle (Stopped)
//! ```
//!
//! The engine knows nothing about time sources or pools: the caller feeds it
//! elapsed seconds and the current item count.

use serde::{Deserialize, Serialize};

use rw_core::{PhysicsConfig, RwError, RwResult, TAU};

/// Transient spin state
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SpinState {
    /// User is holding the spin key
    pub is_holding_space: bool,
    /// Wheel has velocity or is being driven
    pub is_spinning: bool,
    /// Radians per second, never negative
    pub angular_velocity: f64,
    /// Wheel angle in `[0, TAU)`
    pub rotation: f64,
    /// Released and gliding to rest
    pub decelerating: bool,
    /// Last resolved winner
    pub result: Option<String>,
}

/// Observable phase derived from `SpinState`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpinPhase {
    Idle,
    Accelerating,
    Holding,
    Decelerating,
}

impl SpinPhase {
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Idle => "Idle",
            Self::Accelerating => "Accelerating",
            Self::Holding => "Holding",
            Self::Decelerating => "Decelerating",
        }
    }
}

/// What a single tick did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Nothing moving
    Idle,
    /// Still in motion, keep ticking
    Moving,
    /// Came to rest on this tick, resolve the winner
    Stopped,
}

/// Spin state machine
#[derive(Debug, Clone)]
pub struct SpinEngine {
    physics: PhysicsConfig,
    state: SpinState,
}

impl SpinEngine {
    pub fn new(physics: PhysicsConfig) -> Self {
        Self {
            physics,
            state: SpinState::default(),
        }
    }

    pub fn state(&self) -> &SpinState {
        &self.state
    }

    pub fn physics(&self) -> &PhysicsConfig {
        &self.physics
    }

    pub fn rotation(&self) -> f64 {
        self.state.rotation
    }

    pub fn angular_velocity(&self) -> f64 {
        self.state.angular_velocity
    }

    /// Current phase
    pub fn phase(&self) -> SpinPhase {
        let s = &self.state;
        if s.is_holding_space {
            if s.angular_velocity >= self.physics.target_speed {
                SpinPhase::Holding
            } else {
                SpinPhase::Accelerating
            }
        } else if s.decelerating {
            SpinPhase::Decelerating
        } else {
            SpinPhase::Idle
        }
    }

    /// Wheel needs frames (spinning, gliding or held)
    pub fn is_moving(&self) -> bool {
        let s = &self.state;
        s.is_spinning || s.decelerating || s.is_holding_space
    }

    /// Spin-start intent. Rejected without any state change when fewer than
    /// `min_items` are on the wheel. Pressing while gliding grabs the wheel again.
    pub fn press(&mut self, item_count: usize, min_items: usize) -> RwResult<()> {
        if item_count < min_items.max(1) {
            return Err(RwError::PoolIneligible);
        }

        let s = &mut self.state;
        s.is_holding_space = true;
        s.decelerating = false;
        s.is_spinning = true;
        s.angular_velocity = s.angular_velocity.max(self.physics.initial_speed());

        log::debug!(
            "spin press: {} items, v = {:.3} rad/s",
            item_count,
            s.angular_velocity
        );
        Ok(())
    }

    /// Release intent. Returns true when the wheel started gliding.
    pub fn release(&mut self) -> bool {
        let s = &mut self.state;
        if !s.is_holding_space {
            return false;
        }
        s.is_holding_space = false;
        if s.is_spinning {
            s.decelerating = true;
            log::debug!("spin release at v = {:.3} rad/s", s.angular_velocity);
            return true;
        }
        false
    }

    /// Stop dead without resolving an outcome. Returns true if the wheel was moving.
    pub fn halt(&mut self) -> bool {
        let s = &mut self.state;
        let was_moving = s.is_spinning || s.is_holding_space || s.decelerating;
        s.is_holding_space = false;
        s.decelerating = false;
        s.is_spinning = false;
        s.angular_velocity = 0.0;
        if was_moving {
            log::debug!("spin halted at rotation {:.3}", s.rotation);
        }
        was_moving
    }

    /// Advance by `dt` seconds
    pub fn step(&mut self, dt: f64) -> TickOutcome {
        let physics = &self.physics;
        let s = &mut self.state;
        let dt = dt.max(0.0);
        let mut stopped = false;

        if s.is_holding_space {
            s.angular_velocity =
                (s.angular_velocity + physics.acceleration * dt).min(physics.target_speed);
        } else if s.decelerating {
            s.angular_velocity *= physics.decay_per_step.powf(dt * 60.0);
            if s.angular_velocity <= physics.min_stop_speed {
                s.angular_velocity = 0.0;
                s.decelerating = false;
                s.is_spinning = false;
                stopped = true;
            }
        }

        if s.angular_velocity > 0.0 {
            s.rotation = (s.rotation + s.angular_velocity * dt).rem_euclid(TAU);
        }

        if stopped {
            log::debug!("spin stopped at rotation {:.4}", s.rotation);
            TickOutcome::Stopped
        } else if s.is_spinning || s.decelerating || s.is_holding_space {
            TickOutcome::Moving
        } else {
            TickOutcome::Idle
        }
    }

    /// Store the resolved winner
    pub fn set_result(&mut self, result: Option<String>) {
        self.state.result = result;
    }
}
