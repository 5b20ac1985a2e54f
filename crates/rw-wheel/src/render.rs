//! Rendering — state to draw commands
//!
//! Stateless projections. Hosts replay the commands on a real surface; tests
//! inspect them directly.

use std::f64::consts::FRAC_PI_2;

use serde::{Deserialize, Serialize};

use rw_core::{TAU, WheelStyle};

use crate::pool::WheelItem;
use crate::scratch::Point;

/// Slices narrower than this get no label (rad)
const MIN_LABEL_SLICE: f64 = 0.06;
/// Gap between wheel edge and canvas edge (px)
const WHEEL_MARGIN: f64 = 8.0;
const HUB_RATIO: f64 = 0.13;
const LABEL_RADIUS_RATIO: f64 = 0.7;

/// Single drawing operation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DrawCommand {
    /// Clear the whole surface
    Clear { width: f64, height: f64 },
    /// Pie slice from the centre, filled then outlined
    Sector {
        cx: f64,
        cy: f64,
        radius: f64,
        start: f64,
        end: f64,
        fill: String,
        stroke: String,
        line_width: f64,
    },
    FillCircle {
        cx: f64,
        cy: f64,
        radius: f64,
        fill: String,
    },
    StrokeCircle {
        cx: f64,
        cy: f64,
        radius: f64,
        color: String,
        line_width: f64,
    },
    /// Centred text, rotated by `angle` around its anchor
    Text {
        text: String,
        x: f64,
        y: f64,
        angle: f64,
        font: String,
        color: String,
    },
    /// Rectangle filled with a linear gradient from (x0, y0) to (x1, y1)
    GradientRect {
        width: f64,
        height: f64,
        x0: f64,
        y0: f64,
        x1: f64,
        y1: f64,
        stops: Vec<(f64, String)>,
    },
    /// Punch a transparent hole
    EraseCircle { cx: f64, cy: f64, radius: f64 },
}

/// Everything the wheel projection needs
#[derive(Debug, Clone, Copy)]
pub struct WheelView<'a> {
    pub items: &'a [WheelItem],
    pub rotation: f64,
    pub in_motion: bool,
    pub width: f64,
    pub height: f64,
}

fn font(style: &WheelStyle, px: u32) -> String {
    format!("700 {}px {}", px, style.font_family)
}

/// Segment colour: two greys while moving, a hue wheel at rest
pub fn segment_color(index: usize, in_motion: bool, style: &WheelStyle) -> String {
    if in_motion {
        return if index % 2 == 0 {
            style.motion_dark.clone()
        } else {
            style.motion_light.clone()
        };
    }
    let hue = (index * 37) % 360;
    format!("hsl({} 72% 56%)", hue)
}

/// Label text for a slice, `None` when the slice is too narrow
pub fn fit_label(value: &str, slice: f64) -> Option<String> {
    if slice < MIN_LABEL_SLICE {
        return None;
    }
    let max_chars = if slice < 0.22 {
        5
    } else if slice < 0.32 {
        9
    } else {
        14
    };
    if value.chars().count() > max_chars {
        let head: String = value.chars().take(max_chars - 1).collect();
        Some(format!("{}...", head))
    } else {
        Some(value.to_string())
    }
}

/// Wheel radius for a surface
pub fn wheel_radius(width: f64, height: f64) -> f64 {
    (width / 2.0).min(height / 2.0) - WHEEL_MARGIN
}

/// Project the wheel
pub fn render_wheel(view: &WheelView<'_>, style: &WheelStyle) -> Vec<DrawCommand> {
    let cx = view.width / 2.0;
    let cy = view.height / 2.0;
    let radius = wheel_radius(view.width, view.height);

    let mut commands = vec![DrawCommand::Clear {
        width: view.width,
        height: view.height,
    }];

    if view.items.is_empty() {
        commands.extend(render_empty_wheel(cx, cy, radius, style));
        return commands;
    }

    let slice = TAU / view.items.len() as f64;
    let label_px = if slice < 0.14 { 12 } else { 14 };

    for (i, item) in view.items.iter().enumerate() {
        let start = view.rotation + i as f64 * slice;
        commands.push(DrawCommand::Sector {
            cx,
            cy,
            radius,
            start,
            end: start + slice,
            fill: segment_color(i, view.in_motion, style),
            stroke: style.separator.clone(),
            line_width: 1.0,
        });

        if let Some(text) = fit_label(&item.to_string(), slice) {
            let angle = start + slice / 2.0;
            let label_radius = radius * LABEL_RADIUS_RATIO;
            commands.push(DrawCommand::Text {
                text,
                x: cx + angle.cos() * label_radius,
                y: cy + angle.sin() * label_radius,
                angle: angle + FRAC_PI_2,
                font: font(style, label_px),
                color: style.ink.clone(),
            });
        }
    }

    commands.push(DrawCommand::FillCircle {
        cx,
        cy,
        radius: radius * HUB_RATIO,
        fill: style.hub.clone(),
    });
    commands.push(DrawCommand::StrokeCircle {
        cx,
        cy,
        radius,
        color: style.hub.clone(),
        line_width: 3.0,
    });
    commands
}

fn render_empty_wheel(cx: f64, cy: f64, radius: f64, style: &WheelStyle) -> Vec<DrawCommand> {
    vec![
        DrawCommand::FillCircle {
            cx,
            cy,
            radius,
            fill: style.empty_fill.clone(),
        },
        DrawCommand::StrokeCircle {
            cx,
            cy,
            radius,
            color: style.empty_ring.clone(),
            line_width: 3.0,
        },
        DrawCommand::Text {
            text: "No Items".into(),
            x: cx,
            y: cy,
            angle: 0.0,
            font: font(style, 24),
            color: style.empty_text.clone(),
        },
    ]
}

/// Fresh scratch cover
pub fn render_scratch_cover(width: f64, height: f64, style: &WheelStyle) -> Vec<DrawCommand> {
    vec![
        DrawCommand::Clear { width, height },
        DrawCommand::GradientRect {
            width,
            height,
            x0: 0.0,
            y0: 0.0,
            x1: width,
            y1: height,
            stops: style.cover_stops.clone(),
        },
        DrawCommand::Text {
            text: "Scratch Here".into(),
            x: width / 2.0,
            y: height / 2.0,
            angle: 0.0,
            font: font(style, 34),
            color: style.cover_text.clone(),
        },
    ]
}

/// One erased hole in the cover
pub fn render_scratch_hole(at: Point, radius: f64) -> DrawCommand {
    DrawCommand::EraseCircle {
        cx: at.x,
        cy: at.y,
        radius,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn numbers(n: i64) -> Vec<WheelItem> {
        (1..=n).map(WheelItem::Number).collect()
    }

    fn view(items: &[WheelItem], in_motion: bool) -> WheelView<'_> {
        WheelView {
            items,
            rotation: 0.0,
            in_motion,
            width: 400.0,
            height: 400.0,
        }
    }

    #[test]
    fn test_empty_wheel_says_no_items() {
        let commands = render_wheel(&view(&[], false), &WheelStyle::default());
        assert!(commands.iter().any(|c| matches!(c, DrawCommand::Text { text, .. } if text == "No Items")));
        assert!(!commands.iter().any(|c| matches!(c, DrawCommand::Sector { .. })));
    }

    #[test]
    fn test_one_sector_per_item() {
        let items = numbers(12);
        let commands = render_wheel(&view(&items, false), &WheelStyle::default());
        let sectors = commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Sector { .. }))
            .count();
        assert_eq!(sectors, 12);
        match &commands[1] {
            DrawCommand::Sector { radius, start, end, fill, .. } => {
                assert_relative_eq!(*radius, 192.0);
                assert_relative_eq!(*start, 0.0);
                assert_relative_eq!(*end, TAU / 12.0);
                assert_eq!(fill, "hsl(0 72% 56%)");
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_motion_colours_alternate() {
        let style = WheelStyle::default();
        assert_eq!(segment_color(0, true, &style), style.motion_dark);
        assert_eq!(segment_color(1, true, &style), style.motion_light);
        assert_eq!(segment_color(10, false, &style), "hsl(10 72% 56%)");
    }

    #[test]
    fn test_label_truncation_by_slice() {
        assert_eq!(fit_label("Pepperoni Pizza", 0.05), None);
        assert_eq!(fit_label("Pepperoni Pizza", 0.1).as_deref(), Some("Pepp..."));
        assert_eq!(fit_label("Pepperoni Pizza", 0.3).as_deref(), Some("Pepperon..."));
        assert_eq!(fit_label("Pepperoni Pizza", 1.0).as_deref(), Some("Pepperoni Piz..."));
        assert_eq!(fit_label("Tacos", 0.1).as_deref(), Some("Tacos"));
    }

    #[test]
    fn test_dense_wheel_skips_labels() {
        let items = numbers(500);
        let commands = render_wheel(&view(&items, false), &WheelStyle::default());
        let labels = commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Text { .. }))
            .count();
        assert_eq!(labels, 0);
    }

    #[test]
    fn test_scratch_cover_and_hole() {
        let cover = render_scratch_cover(320.0, 160.0, &WheelStyle::default());
        assert!(matches!(cover[0], DrawCommand::Clear { .. }));
        assert!(matches!(&cover[2], DrawCommand::Text { text, .. } if text == "Scratch Here"));
        assert_eq!(
            render_scratch_hole(Point::new(3.0, 4.0), 26.0),
            DrawCommand::EraseCircle { cx: 3.0, cy: 4.0, radius: 26.0 }
        );
    }
}
