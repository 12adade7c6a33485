use std::path::Path;

use chrono::Local;
use glider_launch::core::params::Settings;
use glider_launch::core::report::{render_sweep_chart, sweep_window, timestamped_path};
use glider_launch::core::window::ScreenRect;
use macroquad::prelude::*;

use crate::constants::{
    BACKGROUND, BOTTOM_MARGIN, GRID_COLOR, INITIAL_WINDOW_HEIGHT, INITIAL_WINDOW_WIDTH,
    LEFT_MARGIN, MSAA_SAMPLES, RIGHT_MARGIN, TOP_MARGIN, UI_FONT_PATH,
};
use crate::render::{draw_axis_tick_labels, draw_grid, draw_hud, draw_sweep};
use crate::state::ViewerState;

pub(crate) fn window_conf() -> Conf {
    Conf {
        window_title: "Glider Launch Sweep Viewer".to_string(),
        window_width: INITIAL_WINDOW_WIDTH,
        window_height: INITIAL_WINDOW_HEIGHT,
        high_dpi: true,
        sample_count: MSAA_SAMPLES,
        ..Default::default()
    }
}

/// Settings file from the first argument, defaults otherwise.
fn startup_settings() -> Settings {
    let Some(path) = std::env::args().nth(1) else {
        return Settings::default();
    };
    match Settings::load(Path::new(&path)) {
        Ok(settings) => settings,
        Err(err) => {
            eprintln!("{err}. Falling back to default settings.");
            Settings::default()
        }
    }
}

fn handle_keys(state: &mut ViewerState) {
    if is_key_pressed(KeyCode::Right) {
        state.select_next();
    }
    if is_key_pressed(KeyCode::Left) {
        state.select_previous();
    }
    if is_key_pressed(KeyCode::Up) {
        state.adjust_speed(1.0);
    }
    if is_key_pressed(KeyCode::Down) {
        state.adjust_speed(-1.0);
    }
    if is_key_pressed(KeyCode::RightBracket) {
        state.adjust_sweep_max(1);
    }
    if is_key_pressed(KeyCode::LeftBracket) {
        state.adjust_sweep_max(-1);
    }
    if is_key_pressed(KeyCode::R) {
        state.reset();
    }
    if is_key_pressed(KeyCode::S) {
        let path = timestamped_path(Path::new("."), "flight_paths", "png", Local::now());
        state.status_line = match render_sweep_chart(&state.sweep, &path) {
            Ok(()) => format!("Saved {}", path.display()),
            Err(err) => format!("Save failed: {err}"),
        };
    }
}

pub(crate) async fn run() {
    let ui_font = match load_ttf_font(UI_FONT_PATH).await {
        Ok(font) => Some(font),
        Err(err) => {
            println!("Could not load '{UI_FONT_PATH}': {err}. Falling back to default font.");
            None
        }
    };

    let mut state = ViewerState::new(startup_settings());

    loop {
        let screen_w = screen_width();
        let screen_h = screen_height();

        handle_keys(&mut state);

        let rect = ScreenRect {
            left: f64::from(LEFT_MARGIN),
            right: f64::from(screen_w - RIGHT_MARGIN),
            top: f64::from(TOP_MARGIN),
            bottom: f64::from(screen_h - BOTTOM_MARGIN),
        };
        let window = sweep_window(&state.sweep);

        clear_background(BACKGROUND);
        draw_grid(rect, GRID_COLOR);
        draw_axis_tick_labels(&window, rect, ui_font.as_ref());
        draw_sweep(&state, &window, rect);
        draw_hud(&state, rect, screen_h, ui_font.as_ref());

        next_frame().await;
    }
}
