//! Scratch card
//!
//! One concealed answer sits under an erasable cover. Erasing is purely
//! visual: there is no "revealed" detection, the answer is always drawn
//! beneath the cover.

use serde::{Deserialize, Serialize};

use rw_core::RandomSource;

use crate::pool::TextOptions;

/// Text shown under the cover while no answer is concealed
pub const SCRATCH_PROMPT: &str = "Click \"Reset Scratch Card\" to pick random text.";

/// Canvas-space point
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// On-screen box of a canvas, used to map client coordinates to canvas pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceRect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
    pub canvas_width: f64,
    pub canvas_height: f64,
}

impl SurfaceRect {
    /// Map a client-space pointer position into canvas pixels.
    /// `None` when the surface has no visible area.
    pub fn to_canvas(&self, client_x: f64, client_y: f64) -> Option<Point> {
        if self.width <= 0.0 || self.height <= 0.0 {
            return None;
        }
        Some(Point {
            x: (client_x - self.left) / self.width * self.canvas_width,
            y: (client_y - self.top) / self.height * self.canvas_height,
        })
    }
}

/// Scratch card controller state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScratchCard {
    /// Erase input has an effect (an answer is concealed)
    enabled: bool,
    /// Pointer is down on the surface
    scratching: bool,
    /// Concealed answer
    text_result: Option<String>,
    /// Text rendered beneath the cover
    label: String,
}

impl ScratchCard {
    pub fn new() -> Self {
        Self {
            enabled: false,
            scratching: false,
            text_result: None,
            label: SCRATCH_PROMPT.to_string(),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn is_scratching(&self) -> bool {
        self.scratching
    }

    pub fn text_result(&self) -> Option<&str> {
        self.text_result.as_deref()
    }

    /// Text under the cover
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Fresh cover over a newly sampled answer. Samples with replacement from
    /// the full option list, duplicates included.
    pub fn reset<R: RandomSource + ?Sized>(&mut self, options: &TextOptions, rng: &mut R) -> &str {
        let answer = if options.is_empty() {
            None
        } else {
            let index = rng.sample_index(options.len());
            Some(options.options()[index].clone())
        };
        self.conceal(answer);
        log::debug!("scratch card reset (answer concealed: {})", self.enabled);
        &self.label
    }

    /// Drop the answer and show the prompt under a fresh cover
    pub fn invalidate(&mut self) {
        self.conceal(None);
    }

    fn conceal(&mut self, answer: Option<String>) {
        self.label = answer.clone().unwrap_or_else(|| SCRATCH_PROMPT.to_string());
        self.enabled = answer.is_some();
        self.text_result = answer;
        self.scratching = false;
    }

    /// Start a stroke. Returns the hole to punch.
    pub fn pointer_down(&mut self, at: Point) -> Option<Point> {
        if !self.enabled {
            return None;
        }
        self.scratching = true;
        Some(at)
    }

    /// Continue a stroke. Returns the hole to punch.
    pub fn pointer_move(&mut self, at: Point) -> Option<Point> {
        (self.enabled && self.scratching).then_some(at)
    }

    /// End the stroke (pointer up, leave, cancel or window blur)
    pub fn end_stroke(&mut self) {
        self.scratching = false;
    }
}

impl Default for ScratchCard {
    fn default() -> Self {
        Self::new()
    }
}
