//! Wheel configuration

use serde::{Deserialize, Serialize};

use crate::error::{RwError, RwResult};

/// Spin physics constants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Speed reached while holding (rad/s)
    pub target_speed: f64,
    /// Ramp rate while holding (rad/s²)
    pub acceleration: f64,
    /// At or below this speed a decelerating wheel snaps to rest (rad/s)
    pub min_stop_speed: f64,
    /// Velocity multiplier applied per 1/60 s while decelerating
    pub decay_per_step: f64,
    /// Fraction of `target_speed` seeded on press
    pub initial_speed_fraction: f64,
    /// Largest elapsed time accepted for one tick (s)
    pub max_frame_step: f64,
}

impl PhysicsConfig {
    /// Standard feel
    pub fn standard() -> Self {
        Self {
            target_speed: 10.8,
            acceleration: 9.4,
            min_stop_speed: 0.006,
            decay_per_step: 0.985,
            initial_speed_fraction: 0.35,
            max_frame_step: 0.05,
        }
    }

    /// Shorter glide after release
    pub fn quick() -> Self {
        Self {
            decay_per_step: 0.95,
            min_stop_speed: 0.02,
            ..Self::standard()
        }
    }

    /// Speed seeded when a spin starts
    pub fn initial_speed(&self) -> f64 {
        self.target_speed * self.initial_speed_fraction
    }

    fn validate(&self) -> RwResult<()> {
        if !(self.target_speed > 0.0) || !(self.acceleration > 0.0) {
            return Err(RwError::Config(
                "target_speed and acceleration must be positive".into(),
            ));
        }
        if !(self.decay_per_step > 0.0 && self.decay_per_step < 1.0) {
            return Err(RwError::Config("decay_per_step must be in (0, 1)".into()));
        }
        if !(self.min_stop_speed > 0.0) || self.min_stop_speed >= self.target_speed {
            return Err(RwError::Config(
                "min_stop_speed must be positive and below target_speed".into(),
            ));
        }
        if !(0.0..=1.0).contains(&self.initial_speed_fraction) {
            return Err(RwError::Config(
                "initial_speed_fraction must be in [0, 1]".into(),
            ));
        }
        if !(self.max_frame_step > 0.0) {
            return Err(RwError::Config("max_frame_step must be positive".into()));
        }
        Ok(())
    }
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self::standard()
    }
}

/// Pool size limits shared by both games
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PoolLimits {
    /// Minimum items for a pool to be spin-eligible
    pub min_items: usize,
    /// Maximum items in any pool
    pub max_items: usize,
}

impl Default for PoolLimits {
    fn default() -> Self {
        Self {
            min_items: 2,
            max_items: 500,
        }
    }
}

/// Scratch card settings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScratchConfig {
    /// Radius of each erased hole (canvas px)
    pub brush_radius: f64,
}

impl Default for ScratchConfig {
    fn default() -> Self {
        Self { brush_radius: 26.0 }
    }
}

/// Colours and fonts used when projecting state to draw commands
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WheelStyle {
    pub font_family: String,
    pub ink: String,
    pub hub: String,
    pub separator: String,
    pub motion_dark: String,
    pub motion_light: String,
    pub empty_fill: String,
    pub empty_ring: String,
    pub empty_text: String,
    /// Gradient stops for the scratch cover (offset, colour)
    pub cover_stops: Vec<(f64, String)>,
    pub cover_text: String,
}

impl Default for WheelStyle {
    fn default() -> Self {
        Self {
            font_family: "Avenir Next".into(),
            ink: "#111827".into(),
            hub: "#19243a".into(),
            separator: "#ffffff".into(),
            motion_dark: "#50535b".into(),
            motion_light: "#c7ccd6".into(),
            empty_fill: "#dce1ec".into(),
            empty_ring: "#8d97ad".into(),
            empty_text: "#3d475e".into(),
            cover_stops: vec![
                (0.0, "#8f98a7".into()),
                (0.5, "#c4cbd8".into()),
                (1.0, "#8a95a4".into()),
            ],
            cover_text: "rgba(255, 255, 255, 0.86)".into(),
        }
    }
}

/// Complete widget configuration
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct WheelConfig {
    #[serde(default)]
    pub physics: PhysicsConfig,
    #[serde(default)]
    pub limits: PoolLimits,
    #[serde(default)]
    pub scratch: ScratchConfig,
    #[serde(default)]
    pub style: WheelStyle,
}

impl WheelConfig {
    /// Standard preset
    pub fn standard() -> Self {
        Self::default()
    }

    /// Quick-stop preset
    pub fn quick() -> Self {
        Self {
            physics: PhysicsConfig::quick(),
            ..Self::default()
        }
    }

    /// Look up a preset by name
    pub fn preset(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "standard" => Some(Self::standard()),
            "quick" => Some(Self::quick()),
            _ => None,
        }
    }

    /// Reject non-physical values
    pub fn validate(&self) -> RwResult<()> {
        self.physics.validate()?;
        if self.limits.min_items < 2 {
            return Err(RwError::Config("min_items must be at least 2".into()));
        }
        if self.limits.max_items < self.limits.min_items {
            return Err(RwError::Config("max_items must be >= min_items".into()));
        }
        if !(self.scratch.brush_radius > 0.0) {
            return Err(RwError::Config("brush_radius must be positive".into()));
        }
        Ok(())
    }

    /// Parse and validate a JSON config
    pub fn from_json(json: &str) -> RwResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        log::debug!(
            "config loaded: target {} rad/s, decay {}, pool {}..={}",
            config.physics.target_speed,
            config.physics.decay_per_step,
            config.limits.min_items,
            config.limits.max_items
        );
        Ok(config)
    }

    /// Export as pretty JSON
    pub fn to_json_pretty(&self) -> RwResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
