/*
 * Application Module
 *
 * The nannou side of the viewer. The window is the field: its size sets the
 * field size and the column count sets the grid. Pointer events are mapped to
 * field coordinates (top-left origin, y down) and forwarded to the flock.
 *
 * The flock advances on a fixed timestep so its speed does not depend on the
 * render rate.
 */

use std::sync::OnceLock;
use std::time::{Duration, Instant};

use nannou::prelude::*;
use nannou_egui::Egui;
use tracing::{debug, info, warn};

use crate::debug::DebugInfo;
use crate::flock::Flock;
use crate::layout::FieldLayout;
use crate::params::{FlockConfig, Preset};
use crate::renderer::view;
use crate::ui;
use crate::DEFAULT_COLS;

const STEP_SIZE: Duration = Duration::from_micros(16_667);
// Drop time rather than spiral when a frame takes too long
const MAX_STEPS_PER_FRAME: usize = 4;

// Everything the window needs before it opens
#[derive(Clone, Debug)]
pub struct Launch {
    pub config: FlockConfig,
    pub preset: Preset,
    pub cols: usize,
    pub width: u32,
    pub height: u32,
}

impl Default for Launch {
    fn default() -> Self {
        Self {
            config: FlockConfig::default(),
            preset: Preset::Background,
            cols: DEFAULT_COLS,
            width: 1024,
            height: 640,
        }
    }
}

static LAUNCH: OnceLock<Launch> = OnceLock::new();

// Viewer-only state the UI edits
#[derive(Clone, Copy, Debug)]
pub struct Controls {
    pub preset: Preset,
    pub cols: usize,
    pub paused: bool,
    pub show_debug: bool,
}

pub struct Model {
    pub flock: Flock,
    pub egui: Egui,
    pub controls: Controls,
    pub debug_info: DebugInfo,
    accumulator: Duration,
}

// Open the window and block until it closes
pub fn run(launch: Launch) {
    if LAUNCH.set(launch).is_err() {
        warn!("viewer already launched");
        return;
    }
    nannou::app(model).update(update).run();
}

pub fn field_to_window(pos: crate::Vec2, rect: Rect) -> Point2 {
    pt2(rect.left() + pos.x, rect.top() - pos.y)
}

pub fn window_to_field(pos: Point2, rect: Rect) -> crate::Vec2 {
    crate::vec2(pos.x - rect.left(), rect.top() - pos.y)
}

fn layout_for(rect: Rect, cols: usize) -> FieldLayout {
    FieldLayout::square_cells(rect.w(), rect.h(), cols)
}

pub fn model(app: &App) -> Model {
    let launch = LAUNCH.get().cloned().unwrap_or_default();

    let window_id = app
        .new_window()
        .title("ASCII Flock")
        .size(launch.width, launch.height)
        .view(view)
        .mouse_moved(mouse_moved)
        .mouse_pressed(mouse_pressed)
        .mouse_exited(mouse_exited)
        .key_pressed(key_pressed)
        .resized(resized)
        .raw_event(raw_window_event)
        .build()
        .expect("failed to open window");
    let window = app.window(window_id).expect("window just opened");
    let egui = Egui::from_window(&window);

    let layout = layout_for(window.rect(), launch.cols);
    let flock = Flock::new(launch.config.clone(), layout).expect("config validated before launch");
    info!(preset = %launch.preset, seed = flock.seed(), "viewer started");

    Model {
        flock,
        egui,
        controls: Controls {
            preset: launch.preset,
            cols: launch.cols,
            paused: false,
            show_debug: false,
        },
        debug_info: DebugInfo::new(Instant::now()),
        accumulator: Duration::ZERO,
    }
}

pub fn update(app: &App, model: &mut Model, update: Update) {
    model.debug_info.fps = app.fps();
    model.debug_info.frame_time = update.since_last;

    let response = ui::update_ui(
        &mut model.egui,
        model.flock.config_mut(),
        &mut model.controls,
        &model.debug_info,
    );
    let rect = app.window_rect();
    if let Some(preset) = response.preset {
        switch_preset(model, preset, rect);
    } else if response.reset {
        model.flock.reset();
    }
    if response.cols_changed {
        model.flock.resize(layout_for(rect, model.controls.cols));
    }

    let mut steps = 0;
    if !model.controls.paused {
        model.accumulator += update.since_last;
        while model.accumulator >= STEP_SIZE && steps < MAX_STEPS_PER_FRAME {
            model.flock.step();
            model.accumulator -= STEP_SIZE;
            steps += 1;
        }
        if steps == MAX_STEPS_PER_FRAME {
            model.accumulator = Duration::ZERO;
        }
    }
    model.debug_info.steps_per_frame = steps;

    model.debug_info.stats = model.flock.stats();
    if model.debug_info.log_due(Instant::now()) {
        debug!(stats = %model.debug_info.stats, fps = model.debug_info.fps, "flock stats");
    }
}

// Fresh flock with the preset's parameters; seed and threading carry over
fn switch_preset(model: &mut Model, preset: Preset, rect: Rect) {
    let current = model.flock.config();
    let config = FlockConfig {
        seed: current.seed,
        parallel: current.parallel,
        ..preset.config()
    };
    match Flock::new(config, layout_for(rect, model.controls.cols)) {
        Ok(flock) => {
            info!(%preset, "preset switched");
            model.flock = flock;
        }
        Err(err) => warn!(%preset, %err, "preset rejected"),
    }
}

fn mouse_moved(app: &App, model: &mut Model, pos: Point2) {
    let field = window_to_field(pos, app.window_rect());
    model.flock.pointer_moved(field);
}

fn mouse_exited(_app: &App, model: &mut Model) {
    model.flock.pointer_left();
}

fn mouse_pressed(app: &App, model: &mut Model, button: MouseButton) {
    if button == MouseButton::Left {
        let field = window_to_field(app.mouse.position(), app.window_rect());
        model.flock.drop_crumb(field);
    }
}

fn key_pressed(_app: &App, model: &mut Model, key: Key) {
    match key {
        Key::Space => model.controls.paused = !model.controls.paused,
        Key::R => model.flock.reset(),
        Key::D => model.controls.show_debug = !model.controls.show_debug,
        _ => {}
    }
}

fn resized(_app: &App, model: &mut Model, size: Vec2) {
    let layout = FieldLayout::square_cells(size.x, size.y, model.controls.cols);
    model.flock.resize(layout);
}

fn raw_window_event(_app: &App, model: &mut Model, event: &nannou::winit::event::WindowEvent) {
    model.egui.handle_raw_event(event);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_and_field_coordinates_agree() {
        let rect = Rect::from_w_h(200.0, 100.0);
        assert_eq!(window_to_field(pt2(-100.0, 50.0), rect), crate::vec2(0.0, 0.0));
        assert_eq!(window_to_field(pt2(0.0, 0.0), rect), crate::vec2(100.0, 50.0));

        let back = field_to_window(crate::vec2(30.0, 80.0), rect);
        assert_eq!((back.x, back.y), (-70.0, -30.0));
    }
}
