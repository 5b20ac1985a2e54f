//! Replays draw commands on a 2D canvas context

use std::f64::consts::TAU;

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, Document, HtmlCanvasElement};

use rw_wheel::DrawCommand;

/// Resolve a canvas element by id
pub fn resolve_canvas(document: &Document, id: &str) -> Result<HtmlCanvasElement, JsValue> {
    document
        .get_element_by_id(id)
        .ok_or_else(|| JsValue::from_str(&format!("canvas element with id '{}' not found", id)))?
        .dyn_into::<HtmlCanvasElement>()
        .map_err(|_| JsValue::from_str(&format!("failed to cast '{}' to HtmlCanvasElement", id)))
}

/// 2D context of a canvas
pub fn canvas_context(canvas: &HtmlCanvasElement) -> Result<CanvasRenderingContext2d, JsValue> {
    canvas
        .get_context("2d")?
        .ok_or_else(|| JsValue::from_str("failed to get 2d context"))?
        .dyn_into::<CanvasRenderingContext2d>()
        .map_err(|_| JsValue::from_str("failed to cast context to CanvasRenderingContext2d"))
}

/// Execute a batch of commands
pub fn paint(ctx: &CanvasRenderingContext2d, commands: &[DrawCommand]) -> Result<(), JsValue> {
    for command in commands {
        paint_one(ctx, command)?;
    }
    Ok(())
}

/// Execute one command. Every command leaves the context state as it found it.
pub fn paint_one(ctx: &CanvasRenderingContext2d, command: &DrawCommand) -> Result<(), JsValue> {
    match command {
        DrawCommand::Clear { width, height } => {
            ctx.save();
            ctx.set_global_composite_operation("source-over")?;
            ctx.clear_rect(0.0, 0.0, *width, *height);
            ctx.restore();
        }
        DrawCommand::Sector {
            cx,
            cy,
            radius,
            start,
            end,
            fill,
            stroke,
            line_width,
        } => {
            ctx.begin_path();
            ctx.move_to(*cx, *cy);
            ctx.arc(*cx, *cy, *radius, *start, *end)?;
            ctx.close_path();
            ctx.set_fill_style_str(fill);
            ctx.fill();
            ctx.set_line_width(*line_width);
            ctx.set_stroke_style_str(stroke);
            ctx.stroke();
        }
        DrawCommand::FillCircle {
            cx,
            cy,
            radius,
            fill,
        } => {
            ctx.begin_path();
            ctx.arc(*cx, *cy, *radius, 0.0, TAU)?;
            ctx.set_fill_style_str(fill);
            ctx.fill();
        }
        DrawCommand::StrokeCircle {
            cx,
            cy,
            radius,
            color,
            line_width,
        } => {
            ctx.begin_path();
            ctx.arc(*cx, *cy, *radius, 0.0, TAU)?;
            ctx.set_line_width(*line_width);
            ctx.set_stroke_style_str(color);
            ctx.stroke();
        }
        DrawCommand::Text {
            text,
            x,
            y,
            angle,
            font,
            color,
        } => {
            ctx.save();
            ctx.translate(*x, *y)?;
            ctx.rotate(*angle)?;
            ctx.set_fill_style_str(color);
            ctx.set_font(font);
            ctx.set_text_align("center");
            ctx.set_text_baseline("middle");
            ctx.fill_text(text, 0.0, 0.0)?;
            ctx.restore();
        }
        DrawCommand::GradientRect {
            width,
            height,
            x0,
            y0,
            x1,
            y1,
            stops,
        } => {
            let gradient = ctx.create_linear_gradient(*x0, *y0, *x1, *y1);
            for (offset, color) in stops {
                gradient.add_color_stop(*offset as f32, color)?;
            }
            ctx.save();
            ctx.set_fill_style_canvas_gradient(&gradient);
            ctx.fill_rect(0.0, 0.0, *width, *height);
            ctx.restore();
        }
        DrawCommand::EraseCircle { cx, cy, radius } => {
            ctx.save();
            ctx.set_global_composite_operation("destination-out")?;
            ctx.begin_path();
            ctx.arc(*cx, *cy, *radius, 0.0, TAU)?;
            ctx.fill();
            ctx.restore();
        }
    }
    Ok(())
}
