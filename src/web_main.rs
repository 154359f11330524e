use crate::{Config, FrameLoop, Game, WebRenderer};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::MouseEvent;

type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut()>>>>;
type SharedLoop = Rc<RefCell<FrameLoop<WebRenderer>>>;

fn io_to_js(err: std::io::Error) -> JsValue {
    JsValue::from_str(&err.to_string())
}

fn request_frame(callback: &FrameCallback) -> Result<i32, JsValue> {
    let window = web_sys::window().ok_or("no window")?;
    let callback = callback.borrow();
    let closure = callback.as_ref().ok_or("frame callback missing")?;
    window.request_animation_frame(closure.as_ref().unchecked_ref())
}

fn schedule(frame_loop: &SharedLoop, callback: &FrameCallback) {
    match request_frame(callback) {
        Ok(id) => frame_loop.borrow_mut().frame_scheduled(id),
        Err(e) => web_sys::console::error_1(&e),
    }
}

/// Handle returned to JavaScript for controlling a running game.
#[wasm_bindgen]
pub struct GameHandle {
    frame_loop: SharedLoop,
}

#[wasm_bindgen]
impl GameHandle {
    /// Cancel the frame loop. The restart control stops working as well.
    pub fn stop(&self) -> Result<(), JsValue> {
        if let Some(id) = self.frame_loop.borrow_mut().stop() {
            let window = web_sys::window().ok_or("no window")?;
            window.cancel_animation_frame(id)?;
        }

        web_sys::console::log_1(&"[WASM] Game loop stopped".into());
        Ok(())
    }

    pub fn score(&self) -> u32 {
        self.frame_loop.borrow().game.score
    }

    pub fn is_running(&self) -> bool {
        self.frame_loop.borrow().game.is_running()
    }
}

#[wasm_bindgen]
pub fn start_game() -> Result<GameHandle, JsValue> {
    // Set panic hook for better error messages
    console_error_panic_hook::set_once();

    web_sys::console::log_1(&"[WASM] Starting lane runner...".into());

    let game = Game::new(Config::default());
    let frame_loop = match WebRenderer::new(&game)
        .and_then(|renderer| FrameLoop::new(game, renderer).map_err(io_to_js))
    {
        Ok(fl) => Rc::new(RefCell::new(fl)),
        Err(e) => {
            web_sys::console::error_1(&format!("[WASM] Failed to create game loop: {:?}", e).into());
            return Err(e);
        }
    };

    // The animation frame callback reschedules itself while the run lasts
    let frame_callback: FrameCallback = Rc::new(RefCell::new(None));
    let reschedule = frame_callback.clone();
    let loop_for_frames = frame_loop.clone();
    *frame_callback.borrow_mut() = Some(Closure::wrap(Box::new(move || {
        let keep_going = match loop_for_frames.borrow_mut().update_frame() {
            Ok(keep_going) => keep_going,
            Err(e) => {
                web_sys::console::error_1(&io_to_js(e));
                return; // Stop loop on error
            }
        };

        if keep_going {
            schedule(&loop_for_frames, &reschedule);
        } else if !loop_for_frames.borrow().is_stopped() {
            let score = loop_for_frames.borrow().game.score_text();
            web_sys::console::log_1(&format!("[WASM] Game over, {}", score).into());
        }
    }) as Box<dyn FnMut()>));

    // Restart resets the game and re-enters the frame loop
    let loop_for_restart = frame_loop.clone();
    let frames_for_restart = frame_callback.clone();
    let on_restart = Closure::wrap(Box::new(move |_event: MouseEvent| {
        let needs_frame = match loop_for_restart.borrow_mut().restart() {
            Ok(needs_frame) => needs_frame,
            Err(e) => {
                web_sys::console::error_1(&io_to_js(e));
                return;
            }
        };

        if needs_frame {
            web_sys::console::log_1(&"[WASM] Restarted".into());
            schedule(&loop_for_restart, &frames_for_restart);
        }
    }) as Box<dyn FnMut(MouseEvent)>);

    frame_loop
        .borrow()
        .renderer
        .restart_button()
        .add_event_listener_with_callback("click", on_restart.as_ref().unchecked_ref())?;
    on_restart.forget();

    // Show the starting layout and enter the loop
    frame_loop.borrow_mut().draw().map_err(io_to_js)?;
    let first = request_frame(&frame_callback)?;
    frame_loop.borrow_mut().frame_scheduled(first);

    web_sys::console::log_1(&"[WASM] Game loop started".into());

    Ok(GameHandle { frame_loop })
}
