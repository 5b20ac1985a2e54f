//! Browser-backed scheduler and randomness

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::Window;

use rw_core::RandomSource;
use rw_wheel::FrameScheduler;

/// Slot holding the frame callback. Filled once the app exists.
pub type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;

/// `requestAnimationFrame` scheduler
pub struct AnimationFrameScheduler {
    window: Window,
    callback: FrameCallback,
    handle: Option<i32>,
}

impl AnimationFrameScheduler {
    pub fn new(window: Window, callback: FrameCallback) -> Self {
        Self {
            window,
            callback,
            handle: None,
        }
    }

    /// The requested frame is being delivered
    pub fn frame_fired(&mut self) {
        self.handle = None;
    }
}

impl FrameScheduler for AnimationFrameScheduler {
    fn schedule_next_tick(&mut self) {
        if self.handle.is_some() {
            return;
        }
        let callback = self.callback.borrow();
        let Some(closure) = callback.as_ref() else {
            log::error!("[RaffleWheel] frame callback not installed");
            return;
        };
        match self
            .window
            .request_animation_frame(closure.as_ref().unchecked_ref())
        {
            Ok(id) => self.handle = Some(id),
            Err(e) => log::error!("[RaffleWheel] requestAnimationFrame failed: {:?}", e),
        }
    }

    fn cancel(&mut self) {
        if let Some(id) = self.handle.take() {
            if let Err(e) = self.window.cancel_animation_frame(id) {
                log::warn!("[RaffleWheel] cancelAnimationFrame failed: {:?}", e);
            }
        }
    }

    fn is_pending(&self) -> bool {
        self.handle.is_some()
    }
}

/// `Math.random` source
#[derive(Debug, Default, Clone, Copy)]
pub struct MathRandom;

impl RandomSource for MathRandom {
    fn next_unit(&mut self) -> f64 {
        js_sys::Math::random()
    }
}
