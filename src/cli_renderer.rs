use crate::camera::{Camera, Projected};
use crate::entity::Direction;
use crate::game::{Game, GameState};
use crate::renderer::{Input, Renderer};
use crossterm::{
    cursor,
    event::{
        self, Event, KeyCode, KeyEvent, KeyEventKind, KeyboardEnhancementFlags,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    execute, queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{self, ClearType},
};
use std::collections::VecDeque;
use std::io::{self, Write};
use std::time::{Duration, Instant};

// Lines reserved below the scene for score and help text
const INFO_LINES: u16 = 3;

// Without release events a held key is considered up once auto-repeat stops.
// The first repeat comes after the OS repeat delay, later ones much faster.
const FIRST_REPEAT_TIMEOUT: Duration = Duration::from_millis(600);
const HOLD_TIMEOUT: Duration = Duration::from_millis(120);

const POLL_TIMEOUT: Duration = Duration::from_millis(4);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shade {
    Empty,
    Platform,
    Player,
    Obstacle,
}

/// Rasterize the scene onto a `width` x `height` grid of square cells.
pub fn rasterize(game: &Game, width: usize, height: usize) -> Vec<Vec<Shade>> {
    let mut grid = vec![vec![Shade::Empty; width]; height];
    if width == 0 || height == 0 {
        return grid;
    }

    let camera = Camera::new(&game.config, width as f64, height as f64);

    let outline = camera.platform_outline(&game.config);
    for (y, row) in grid.iter_mut().enumerate() {
        for (x, cell) in row.iter_mut().enumerate() {
            if point_in_convex_polygon((x as f64 + 0.5, y as f64 + 0.5), &outline) {
                *cell = Shade::Platform;
            }
        }
    }

    // Far to near so closer cubes overdraw
    let mut cubes: Vec<(Projected, Shade)> = game
        .obstacles
        .iter()
        .filter_map(|o| camera.project(o.position))
        .map(|p| (p, Shade::Obstacle))
        .collect();
    if let Some(p) = camera.project(game.player.position) {
        cubes.push((p, Shade::Player));
    }
    cubes.sort_by(|a, b| b.0.depth.total_cmp(&a.0.depth));

    for (p, shade) in cubes {
        fill_square(&mut grid, p, shade);
    }

    grid
}

fn fill_square(grid: &mut [Vec<Shade>], p: Projected, shade: Shade) {
    let half = (p.scale / 2.0).max(0.5);
    let height = grid.len() as f64;
    let width = grid.first().map_or(0, |row| row.len()) as f64;

    let x0 = (p.x - half).floor().max(0.0);
    let x1 = (p.x + half).ceil().min(width);
    let y0 = (p.y - half).floor().max(0.0);
    let y1 = (p.y + half).ceil().min(height);

    if x0 >= x1 || y0 >= y1 {
        return;
    }

    for row in &mut grid[y0 as usize..y1 as usize] {
        for cell in &mut row[x0 as usize..x1 as usize] {
            *cell = shade;
        }
    }
}

/// Works for either winding order; degenerate outlines contain nothing.
pub fn point_in_convex_polygon(point: (f64, f64), polygon: &[(f64, f64)]) -> bool {
    if polygon.len() < 3 {
        return false;
    }

    let mut sign = 0.0;
    for i in 0..polygon.len() {
        let (ax, ay) = polygon[i];
        let (bx, by) = polygon[(i + 1) % polygon.len()];
        let cross = (bx - ax) * (point.1 - ay) - (by - ay) * (point.0 - ax);

        if cross != 0.0 {
            if sign == 0.0 {
                sign = cross.signum();
            } else if cross.signum() != sign {
                return false;
            }
        }
    }
    true
}

#[derive(Debug, Clone, Copy)]
struct HeldKey {
    direction: Direction,
    since: Instant,
    repeating: bool,
}

impl HeldKey {
    fn timeout(&self) -> Duration {
        if self.repeating {
            HOLD_TIMEOUT
        } else {
            FIRST_REPEAT_TIMEOUT
        }
    }
}

pub struct CliRenderer {
    active: bool,
    enhanced_keys: bool,
    held: Option<HeldKey>,
    pending: VecDeque<Input>,
}

impl CliRenderer {
    pub fn new() -> Self {
        Self {
            active: false,
            enhanced_keys: false,
            held: None,
            pending: VecDeque::new(),
        }
    }

    fn draw_scene(&self, game: &Game, stdout: &mut io::Stdout) -> io::Result<u16> {
        let (term_width, term_height) = terminal::size()?;
        let width = (term_width / 2) as usize;
        let height = term_height.saturating_sub(INFO_LINES) as usize;

        queue!(stdout, cursor::MoveTo(0, 0))?;

        for row in rasterize(game, width, height) {
            for shade in row {
                let color = match shade {
                    Shade::Empty => Color::Black,
                    Shade::Platform => Color::DarkGrey,
                    Shade::Player => Color::Green,
                    Shade::Obstacle => Color::Red,
                };
                queue!(stdout, SetBackgroundColor(color), Print("  "))?;
            }
            queue!(stdout, ResetColor, Print("\r\n"))?;
        }

        Ok(height as u16)
    }

    fn draw_info(&self, game: &Game, top: u16, stdout: &mut io::Stdout) -> io::Result<()> {
        queue!(
            stdout,
            cursor::MoveTo(0, top),
            ResetColor,
            terminal::Clear(ClearType::CurrentLine),
            Print(game.score_text())
        )?;

        queue!(
            stdout,
            cursor::MoveTo(0, top + 1),
            terminal::Clear(ClearType::CurrentLine),
            Print("Controls: Left/Right to steer | Q to quit")
        )?;

        queue!(
            stdout,
            cursor::MoveTo(0, top + 2),
            terminal::Clear(ClearType::CurrentLine)
        )?;
        if game.state == GameState::GameOver {
            queue!(
                stdout,
                SetForegroundColor(Color::Red),
                Print("GAME OVER! Press R to restart"),
                ResetColor
            )?;
        }

        Ok(())
    }

    fn translate(&mut self, key: KeyEvent) {
        let direction = match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                if key.kind != KeyEventKind::Release {
                    self.pending.push_back(Input::Quit);
                }
                return;
            }
            KeyCode::Char('r') | KeyCode::Char('R') => {
                if key.kind != KeyEventKind::Release {
                    self.pending.push_back(Input::Restart);
                }
                return;
            }
            KeyCode::Left => Direction::Left,
            KeyCode::Right => Direction::Right,
            _ => return,
        };

        if self.enhanced_keys {
            match key.kind {
                KeyEventKind::Press => self.pending.push_back(Input::Press(direction)),
                KeyEventKind::Release => self.pending.push_back(Input::Release(direction)),
                KeyEventKind::Repeat => {}
            }
            return;
        }

        // Some platforms report releases even without enhancement
        if key.kind == KeyEventKind::Release {
            if matches!(self.held, Some(held) if held.direction == direction) {
                self.held = None;
            }
            self.pending.push_back(Input::Release(direction));
            return;
        }

        // Auto-repeat keeps refreshing the hold; switching sides lets go of the other key
        let mut repeating = false;
        if let Some(held) = self.held {
            if held.direction == direction {
                repeating = true;
            } else {
                self.pending.push_back(Input::Release(held.direction));
            }
        }
        self.held = Some(HeldKey {
            direction,
            since: Instant::now(),
            repeating,
        });
        self.pending.push_back(Input::Press(direction));
    }

    fn expire_hold(&mut self) {
        if let Some(held) = self.held {
            if held.since.elapsed() >= held.timeout() {
                self.held = None;
                self.pending.push_back(Input::Release(held.direction));
            }
        }
    }
}

impl Default for CliRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer for CliRenderer {
    fn init(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(
            stdout,
            terminal::EnterAlternateScreen,
            terminal::Clear(ClearType::All),
            cursor::Hide
        )?;
        self.active = true;

        self.enhanced_keys = terminal::supports_keyboard_enhancement().unwrap_or(false);
        if self.enhanced_keys {
            execute!(
                stdout,
                PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES)
            )?;
        }
        Ok(())
    }

    fn render(&mut self, game: &Game) -> io::Result<()> {
        let mut stdout = io::stdout();

        let scene_height = self.draw_scene(game, &mut stdout)?;
        self.draw_info(game, scene_height, &mut stdout)?;

        stdout.flush()?;
        Ok(())
    }

    fn cleanup(&mut self) -> io::Result<()> {
        if !self.active {
            return Ok(());
        }
        self.active = false;

        let mut stdout = io::stdout();
        if self.enhanced_keys {
            execute!(stdout, PopKeyboardEnhancementFlags)?;
            self.enhanced_keys = false;
        }
        execute!(
            stdout,
            cursor::Show,
            terminal::LeaveAlternateScreen,
            ResetColor
        )?;
        terminal::disable_raw_mode()?;
        Ok(())
    }

    fn poll_input(&mut self) -> io::Result<Option<Input>> {
        if let Some(input) = self.pending.pop_front() {
            return Ok(Some(input));
        }

        while event::poll(POLL_TIMEOUT)? {
            if let Event::Key(key) = event::read()? {
                self.translate(key);
            }
            if !self.pending.is_empty() {
                break;
            }
        }

        if !self.enhanced_keys {
            self.expire_hold();
        }
        Ok(self.pending.pop_front())
    }
}

impl Drop for CliRenderer {
    fn drop(&mut self) {
        let _ = self.cleanup();
    }
}
