use crate::camera::{Camera, Projected};
use crate::entity::Direction;
use crate::game::{Game, GameState};
use crate::renderer::{Input, Renderer};
use std::cell::RefCell;
use std::collections::VecDeque;
use std::io;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, Document, HtmlCanvasElement, HtmlElement, KeyboardEvent};

// Colors match the original scene materials
const COLOR_BACKGROUND: &str = "#000000";
const COLOR_PLATFORM: &str = "#333333";
const COLOR_PLAYER: &str = "#00FF00";
const COLOR_OBSTACLE: &str = "#FF0000";

const SCORE_ID: &str = "score";
const GAME_OVER_ID: &str = "game-over";
const RESTART_ID: &str = "restart";

fn js_to_io(err: JsValue) -> io::Error {
    io::Error::new(io::ErrorKind::Other, format!("{:?}", err))
}

fn element_by_id(document: &Document, id: &str) -> Result<HtmlElement, JsValue> {
    document
        .get_element_by_id(id)
        .ok_or_else(|| JsValue::from_str(&format!("missing #{} element", id)))?
        .dyn_into::<HtmlElement>()
        .map_err(JsValue::from)
}

fn key_direction(key: &str) -> Option<Direction> {
    match key {
        "ArrowLeft" => Some(Direction::Left),
        "ArrowRight" => Some(Direction::Right),
        _ => None,
    }
}

pub struct WebRenderer {
    document: Document,
    context: CanvasRenderingContext2d,
    camera: Camera,

    // Overlay elements owned by the host page
    score: HtmlElement,
    game_over: HtmlElement,
    restart: HtmlElement,

    // Last values pushed to the DOM
    shown_score: Option<u32>,
    shown_game_over: Option<bool>,

    pending_input: Rc<RefCell<VecDeque<Input>>>,
}

impl WebRenderer {
    /// Create a full-window canvas on the document body. The size is taken
    /// once; the canvas does not follow window resizes.
    pub fn new(game: &Game) -> Result<Self, JsValue> {
        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;
        let body = document.body().ok_or("no body")?;

        let width = window.inner_width()?.as_f64().unwrap_or(800.0);
        let height = window.inner_height()?.as_f64().unwrap_or(600.0);

        let canvas = document
            .create_element("canvas")?
            .dyn_into::<HtmlCanvasElement>()?;
        canvas.set_width(width as u32);
        canvas.set_height(height as u32);
        canvas.style().set_property("display", "block")?;
        body.append_child(&canvas)?;

        let context = canvas
            .get_context("2d")?
            .ok_or("no 2d context")?
            .dyn_into::<CanvasRenderingContext2d>()?;

        let score = element_by_id(&document, SCORE_ID)?;
        let game_over = element_by_id(&document, GAME_OVER_ID)?;
        let restart = element_by_id(&document, RESTART_ID)?;

        Ok(Self {
            document,
            context,
            camera: Camera::new(&game.config, width, height),
            score,
            game_over,
            restart,
            shown_score: None,
            shown_game_over: None,
            pending_input: Rc::new(RefCell::new(VecDeque::new())),
        })
    }

    /// The restart control; clicking it is wired up by the frame loop
    pub fn restart_button(&self) -> &HtmlElement {
        &self.restart
    }

    fn setup_keyboard_listeners(&self) -> Result<(), JsValue> {
        for (event_name, pressed) in [("keydown", true), ("keyup", false)] {
            let pending_input = self.pending_input.clone();

            let closure = Closure::wrap(Box::new(move |event: KeyboardEvent| {
                if let Some(direction) = key_direction(&event.key()) {
                    let input = if pressed {
                        Input::Press(direction)
                    } else {
                        Input::Release(direction)
                    };
                    pending_input.borrow_mut().push_back(input);
                    event.prevent_default();
                }
            }) as Box<dyn FnMut(KeyboardEvent)>);

            self.document
                .add_event_listener_with_callback(event_name, closure.as_ref().unchecked_ref())?;

            closure.forget(); // Keep listener alive
        }
        Ok(())
    }

    fn draw_platform(&self, game: &Game) {
        let outline = self.camera.platform_outline(&game.config);
        let Some(&(x0, y0)) = outline.first() else {
            return;
        };

        self.context.set_fill_style_str(COLOR_PLATFORM);
        self.context.begin_path();
        self.context.move_to(x0, y0);
        for &(x, y) in &outline[1..] {
            self.context.line_to(x, y);
        }
        self.context.close_path();
        self.context.fill();
    }

    fn draw_cube(&self, p: Projected, color: &str) {
        let size = p.scale;
        self.context.set_fill_style_str(color);
        self.context
            .fill_rect(p.x - size / 2.0, p.y - size / 2.0, size, size);
    }

    fn sync_overlay(&mut self, game: &Game) -> Result<(), JsValue> {
        if self.shown_score != Some(game.score) {
            self.score.set_inner_text(&game.score_text());
            self.shown_score = Some(game.score);
        }

        let game_over = game.state == GameState::GameOver;
        if self.shown_game_over != Some(game_over) {
            let display = if game_over { "block" } else { "none" };
            self.game_over.style().set_property("display", display)?;
            self.restart.style().set_property("display", display)?;
            self.shown_game_over = Some(game_over);
        }
        Ok(())
    }
}

impl Renderer for WebRenderer {
    fn init(&mut self) -> io::Result<()> {
        self.setup_keyboard_listeners().map_err(js_to_io)
    }

    fn render(&mut self, game: &Game) -> io::Result<()> {
        let (width, height) = self.camera.viewport();

        self.context.set_fill_style_str(COLOR_BACKGROUND);
        self.context.fill_rect(0.0, 0.0, width, height);

        self.draw_platform(game);

        // Painter's order: furthest cube first
        let mut cubes: Vec<(Projected, &str)> = game
            .obstacles
            .iter()
            .filter_map(|o| self.camera.project(o.position))
            .map(|p| (p, COLOR_OBSTACLE))
            .collect();
        if let Some(p) = self.camera.project(game.player.position) {
            cubes.push((p, COLOR_PLAYER));
        }
        cubes.sort_by(|a, b| b.0.depth.total_cmp(&a.0.depth));

        for (p, color) in cubes {
            self.draw_cube(p, color);
        }

        self.sync_overlay(game).map_err(js_to_io)
    }

    fn cleanup(&mut self) -> io::Result<()> {
        // Listeners live as long as the page
        Ok(())
    }

    fn poll_input(&mut self) -> io::Result<Option<Input>> {
        Ok(self.pending_input.borrow_mut().pop_front())
    }
}
