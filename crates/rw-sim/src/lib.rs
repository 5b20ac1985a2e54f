//! RaffleWheel Simulator
//!
//! Drives a [`RaffleSession`] on a [`ManualClock`] so that spins and scratch
//! cards can be replayed from the command line, with no page attached.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};
use serde::Serialize;

use rw_core::{SeededRandom, WheelConfig};
use rw_wheel::{GameMode, ManualClock, RaffleSession};

pub type SimSession = RaffleSession<ManualClock, SeededRandom>;

/// Parameters of a spin run
#[derive(Debug, Clone)]
pub struct SpinPlan {
    pub min: String,
    pub max: String,
    pub hold_ms: Vec<f64>,
    pub fps: f64,
    pub seed: u64,
}

/// One completed (or refused) spin
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpinDraw {
    pub hold_ms: f64,
    pub result: String,
    pub remaining: usize,
}

/// Outcome of a spin run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpinReport {
    pub draws: Vec<SpinDraw>,
    pub removed: Vec<i64>,
    /// Why the run ended early, if it did
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stopped: Option<String>,
}

/// Load a config file, or the standard preset when no path is given
pub fn load_config(path: Option<&Path>) -> Result<WheelConfig> {
    let Some(path) = path else {
        return Ok(WheelConfig::standard());
    };
    let json = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    WheelConfig::from_json(&json).with_context(|| format!("Invalid config {}", path.display()))
}

/// Preset by name
pub fn preset(name: &str) -> Result<WheelConfig> {
    match WheelConfig::preset(name) {
        Some(config) => Ok(config),
        None => bail!("Unknown preset '{}' (expected standard or quick)", name),
    }
}

fn session(config: WheelConfig, fps: f64, seed: u64) -> Result<SimSession> {
    if !(fps.is_finite() && fps > 0.0) {
        bail!("Frame rate must be positive, got {}", fps);
    }
    Ok(RaffleSession::new(
        config,
        ManualClock::new(1000.0 / fps),
        SeededRandom::new(seed),
    ))
}

/// Build the pool from the plan's bounds and spin once per hold duration.
///
/// A refused spin ends the run; the report records why.
pub fn run_spins(config: WheelConfig, plan: &SpinPlan) -> Result<SpinReport> {
    let mut session = session(config, plan.fps, plan.seed)?;
    session
        .apply_number_range(&plan.min, &plan.max)
        .context("Range rejected")?;

    let mut draws = Vec::with_capacity(plan.hold_ms.len());
    let mut stopped = None;
    for &hold_ms in &plan.hold_ms {
        match session.spin_for(hold_ms) {
            Ok(result) => {
                let remaining = session.pools().number_items().len();
                log::info!("held {:.0}ms -> {} ({} left)", hold_ms, result, remaining);
                draws.push(SpinDraw {
                    hold_ms,
                    result,
                    remaining,
                });
            }
            Err(e) => {
                log::warn!("spin refused after {} draws: {}", draws.len(), e);
                stopped = Some(e.to_string());
                break;
            }
        }
    }

    Ok(SpinReport {
        draws,
        removed: session.pools().removed().to_vec(),
        stopped,
    })
}

/// Reset the scratch card `count` times and collect the concealed answers
pub fn run_scratch(config: WheelConfig, raw: &str, seed: u64, count: usize) -> Result<Vec<String>> {
    let mut session = session(config, 60.0, seed)?;
    session.switch_mode(GameMode::Text);

    let mut answers = Vec::with_capacity(count);
    for _ in 0..count {
        answers.push(session.reset_scratch_card(raw).context("Options rejected")?);
    }
    Ok(answers)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plan(min: &str, max: &str, holds: &[f64]) -> SpinPlan {
        SpinPlan {
            min: min.into(),
            max: max.into(),
            hold_ms: holds.to_vec(),
            fps: 60.0,
            seed: 7,
        }
    }

    #[test]
    fn test_spins_draw_distinct_values() {
        let report = run_spins(WheelConfig::standard(), &plan("1", "10", &[400.0, 900.0, 1500.0]))
            .unwrap();

        assert_eq!(report.draws.len(), 3);
        assert_eq!(report.stopped, None);
        let drawn: Vec<String> = report.draws.iter().map(|d| d.result.clone()).collect();
        let removed: Vec<String> = report.removed.iter().map(i64::to_string).collect();
        assert_eq!(drawn, removed);
        assert_eq!(report.draws.last().unwrap().remaining, 7);
    }

    #[test]
    fn test_run_stops_when_pool_too_small() {
        let report = run_spins(WheelConfig::standard(), &plan("1", "3", &[300.0; 5])).unwrap();

        assert_eq!(report.draws.len(), 2);
        assert_eq!(
            report.stopped.as_deref(),
            Some("No numbers left. Reset Number Mode to continue.")
        );
    }

    #[test]
    fn test_bad_range_is_an_error() {
        let err = run_spins(WheelConfig::standard(), &plan("9", "1", &[300.0])).unwrap_err();
        assert!(format!("{:#}", err).contains("Min must be less than or equal to max."));
    }

    #[test]
    fn test_zero_fps_rejected() {
        let mut p = plan("1", "10", &[300.0]);
        p.fps = 0.0;
        assert!(run_spins(WheelConfig::standard(), &p).is_err());
    }

    #[test]
    fn test_scratch_answers_come_from_options() {
        let answers = run_scratch(WheelConfig::standard(), "red\ngreen\nblue", 3, 20).unwrap();
        assert_eq!(answers.len(), 20);
        assert!(answers.iter().all(|a| ["red", "green", "blue"].contains(&a.as_str())));
    }

    #[test]
    fn test_scratch_is_seed_deterministic() {
        let a = run_scratch(WheelConfig::standard(), "a\nb\nc\nd", 11, 8).unwrap();
        let b = run_scratch(WheelConfig::standard(), "a\nb\nc\nd", 11, 8).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_unknown_preset() {
        assert!(preset("quick").is_ok());
        assert!(preset("turbo").is_err());
    }
}
