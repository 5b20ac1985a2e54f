// ============================================================================
// RAFFLEWHEEL — WASM Host
// Binds the raffle session to the page: DOM events in, canvas drawing out
// ============================================================================

pub mod canvas;
pub mod dom;
pub mod frame;

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{
    CanvasRenderingContext2d, Document, Event, EventTarget, KeyboardEvent, PointerEvent, Window,
};

use rw_core::WheelConfig;
use rw_wheel::{GameMode, Point, RaffleSession, SurfaceRect};

use crate::canvas::{canvas_context, paint, paint_one};
use crate::dom::Refs;
use crate::frame::{AnimationFrameScheduler, FrameCallback, MathRandom};

/// Optional inline JSON config element
const CONFIG_ELEMENT_ID: &str = "wheel-config";

// ============================================================================
// INITIALIZATION
// ============================================================================

#[cfg(feature = "console_error_panic_hook")]
pub fn set_panic_hook() {
    console_error_panic_hook::set_once();
}

/// Entry point
#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    #[cfg(feature = "console_error_panic_hook")]
    set_panic_hook();

    console_log::init_with_level(log::Level::Debug).ok();
    bootstrap()?;
    log::info!("[RaffleWheel] Initialized");
    Ok(())
}

fn bootstrap() -> Result<(), JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("window unavailable"))?;
    let document = window
        .document()
        .ok_or_else(|| JsValue::from_str("document unavailable"))?;

    let refs = Refs::resolve(&document)?;
    let wheel_ctx = canvas_context(&refs.wheel_canvas)?;
    let scratch_ctx = canvas_context(&refs.scratch_canvas)?;

    let callback: FrameCallback = Rc::new(RefCell::new(None));
    let scheduler = AnimationFrameScheduler::new(window.clone(), Rc::clone(&callback));
    let session = RaffleSession::new(load_config(&document), scheduler, MathRandom);

    let app = Rc::new(RefCell::new(App {
        session,
        refs,
        wheel_ctx,
        scratch_ctx,
    }));

    install_frame_callback(&callback, &app);
    bind_events(&window, &app)?;

    {
        let mut app = app.borrow_mut();
        let (min, max) = app.range_inputs();
        // Inputs may hold a range other than the built-in default
        app.session.apply_number_range(&min, &max).ok();
        app.sync()?;
    }
    Ok(())
}

fn load_config(document: &Document) -> WheelConfig {
    inline_config(
        document
            .get_element_by_id(CONFIG_ELEMENT_ID)
            .and_then(|el| el.text_content()),
    )
}

/// Config from the inline element's text. Missing, blank or invalid text
/// falls back to the defaults.
fn inline_config(text: Option<String>) -> WheelConfig {
    let Some(json) = text.filter(|json| !json.trim().is_empty()) else {
        return WheelConfig::default();
    };
    match WheelConfig::from_json(&json) {
        Ok(config) => config,
        Err(e) => {
            log::warn!("[RaffleWheel] ignoring inline config: {}", e);
            WheelConfig::default()
        }
    }
}

// ============================================================================
// APP
// ============================================================================

type Session = RaffleSession<AnimationFrameScheduler, MathRandom>;

struct App {
    session: Session,
    refs: Refs,
    wheel_ctx: CanvasRenderingContext2d,
    scratch_ctx: CanvasRenderingContext2d,
}

impl App {
    fn range_inputs(&self) -> (String, String) {
        (self.refs.min_input.value(), self.refs.max_input.value())
    }

    fn scratch_point(&self, event: &PointerEvent) -> Option<Point> {
        let canvas = &self.refs.scratch_canvas;
        let rect = canvas.get_bounding_client_rect();
        SurfaceRect {
            left: rect.left(),
            top: rect.top(),
            width: rect.width(),
            height: rect.height(),
            canvas_width: canvas.width() as f64,
            canvas_height: canvas.height() as f64,
        }
        .to_canvas(event.client_x() as f64, event.client_y() as f64)
    }

    fn erase(&self, hole: Option<rw_wheel::DrawCommand>) -> Result<(), JsValue> {
        match hole {
            Some(command) => paint_one(&self.scratch_ctx, &command),
            None => Ok(()),
        }
    }

    /// Project session state onto the page
    fn sync(&mut self) -> Result<(), JsValue> {
        let dirty = self.session.take_dirty();
        let refs = &self.refs;

        if dirty.wheel {
            let canvas = &refs.wheel_canvas;
            let commands = self
                .session
                .wheel_commands(canvas.width() as f64, canvas.height() as f64);
            paint(&self.wheel_ctx, &commands)?;
        }
        if dirty.cover {
            let canvas = &refs.scratch_canvas;
            refs.scratch_result
                .set_text_content(Some(self.session.scratch_label()));
            let commands = self
                .session
                .scratch_cover_commands(canvas.width() as f64, canvas.height() as f64);
            paint(&self.scratch_ctx, &commands)?;
        }
        if dirty.history {
            refs.render_history(&self.session.removed_history_lines())?;
        }

        refs.show_mode(self.session.mode() == GameMode::Number)?;
        refs.status.set_text_content(Some(self.session.status()));
        refs.result.set_text_content(Some(self.session.result()));
        refs.number_error
            .set_text_content(Some(self.session.number_error()));
        refs.text_error
            .set_text_content(Some(self.session.text_error()));
        Ok(())
    }
}

// ============================================================================
// FRAME LOOP
// ============================================================================

fn install_frame_callback(callback: &FrameCallback, app: &Rc<RefCell<App>>) {
    let app = Rc::clone(app);
    *callback.borrow_mut() = Some(Closure::wrap(Box::new(move |timestamp: f64| {
        let Ok(mut app) = app.try_borrow_mut() else {
            log::warn!("[RaffleWheel] frame skipped: app busy");
            return;
        };
        app.session.scheduler_mut().frame_fired();
        app.session.on_frame(timestamp);
        if let Err(e) = app.sync() {
            log::error!("[RaffleWheel] draw failed: {:?}", e);
        }
    }) as Box<dyn FnMut(f64)>));
}

// ============================================================================
// EVENTS
// ============================================================================

/// Attach `handler` to `event` on `target`; the page is re-synced afterwards
fn on<E, F>(
    target: &EventTarget,
    event: &str,
    app: &Rc<RefCell<App>>,
    mut handler: F,
) -> Result<(), JsValue>
where
    E: JsCast + 'static,
    F: FnMut(&mut App, E) -> Result<(), JsValue> + 'static,
{
    let app = Rc::clone(app);
    let closure = Closure::wrap(Box::new(move |event: Event| {
        let Ok(mut app) = app.try_borrow_mut() else {
            return;
        };
        let result = handler(&mut *app, event.unchecked_into::<E>()).and_then(|_| app.sync());
        if let Err(e) = result {
            log::error!("[RaffleWheel] event handler failed: {:?}", e);
        }
    }) as Box<dyn FnMut(Event)>);
    target.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())?;
    closure.forget();
    Ok(())
}

fn bind_events(window: &Window, app: &Rc<RefCell<App>>) -> Result<(), JsValue> {
    let refs: [EventTarget; 9] = {
        let app = app.borrow();
        let r = &app.refs;
        [
            r.tab_number.clone().into(),
            r.tab_text.clone().into(),
            r.apply_range.clone().into(),
            r.reset_number.clone().into(),
            r.apply_options.clone().into(),
            r.reset_scratch.clone().into(),
            r.clear_text.clone().into(),
            r.wheel_focus.clone().into(),
            r.scratch_canvas.clone().into(),
        ]
    };
    let [
        tab_number,
        tab_text,
        apply_range,
        reset_number,
        apply_options,
        reset_scratch,
        clear_text,
        wheel_focus,
        scratch,
    ] = refs;

    on(&tab_number, "click", app, |app, _: Event| {
        app.session.switch_mode(GameMode::Number);
        Ok(())
    })?;
    on(&tab_text, "click", app, |app, _: Event| {
        app.session.switch_mode(GameMode::Text);
        Ok(())
    })?;

    on(&apply_range, "click", app, |app, _: Event| {
        let (min, max) = app.range_inputs();
        if let Err(e) = app.session.apply_number_range(&min, &max) {
            log::debug!("[RaffleWheel] range not applied: {}", e);
        }
        Ok(())
    })?;
    on(&reset_number, "click", app, |app, _: Event| {
        let (min, max) = app.range_inputs();
        if let Err(e) = app.session.reset_number_mode(&min, &max) {
            log::debug!("[RaffleWheel] reset not applied: {}", e);
        }
        Ok(())
    })?;

    on(&apply_options, "click", app, |app, _: Event| {
        let raw = app.refs.text_options.value();
        app.session.apply_text_options(&raw).ok();
        Ok(())
    })?;
    on(&reset_scratch, "click", app, |app, _: Event| {
        let raw = app.refs.text_options.value();
        app.session.reset_scratch_card(&raw).ok();
        Ok(())
    })?;
    on(&clear_text, "click", app, |app, _: Event| {
        app.refs.text_options.set_value("");
        app.session.clear_text_options();
        Ok(())
    })?;

    on(&wheel_focus, "keydown", app, |app, event: KeyboardEvent| {
        if event.code() != "Space" {
            return Ok(());
        }
        event.prevent_default();
        if let Err(e) = app.session.space_down(event.repeat()) {
            log::debug!("[RaffleWheel] spin not started: {}", e);
        }
        Ok(())
    })?;
    on(&wheel_focus, "keyup", app, |app, event: KeyboardEvent| {
        if event.code() == "Space" {
            event.prevent_default();
            app.session.space_up();
        }
        Ok(())
    })?;

    on(&scratch, "pointerdown", app, |app, event: PointerEvent| {
        let hole = app
            .scratch_point(&event)
            .and_then(|p| app.session.pointer_down(p));
        app.erase(hole)
    })?;
    on(&scratch, "pointermove", app, |app, event: PointerEvent| {
        let hole = app
            .scratch_point(&event)
            .and_then(|p| app.session.pointer_move(p));
        app.erase(hole)
    })?;
    for name in ["pointerup", "pointerleave", "pointercancel"] {
        on(&scratch, name, app, |app, _: Event| {
            app.session.pointer_up();
            Ok(())
        })?;
    }

    on(window, "blur", app, |app, _: Event| {
        app.session.blur();
        Ok(())
    })?;
    on(window, "pagehide", app, |app, _: Event| {
        app.session.teardown();
        Ok(())
    })?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inline_config_fallbacks() {
        assert_eq!(inline_config(None), WheelConfig::default());
        assert_eq!(inline_config(Some("  \n ".into())), WheelConfig::default());
        assert_eq!(inline_config(Some("{broken".into())), WheelConfig::default());
    }

    #[test]
    fn test_inline_config_overrides() {
        let config = inline_config(Some(r#"{"physics":{"decay_per_step":0.95}}"#.into()));
        assert_eq!(config.physics.decay_per_step, 0.95);
        assert_eq!(config.limits, WheelConfig::default().limits);
    }

    #[test]
    fn test_invalid_physics_falls_back() {
        let config = inline_config(Some(r#"{"physics":{"decay_per_step":1.5}}"#.into()));
        assert_eq!(config, WheelConfig::default());
    }
}
