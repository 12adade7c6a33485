use macroquad::prelude::Color;

pub const INITIAL_WINDOW_WIDTH: i32 = 1600;
pub const INITIAL_WINDOW_HEIGHT: i32 = 900;
pub const MSAA_SAMPLES: i32 = 4;
pub const UI_FONT_PATH: &str = "assets/fonts/Lato-Regular.ttf";

pub const LEFT_MARGIN: f32 = 90.0;
pub const RIGHT_MARGIN: f32 = 30.0;
pub const TOP_MARGIN: f32 = 120.0;
pub const BOTTOM_MARGIN: f32 = 130.0;

pub const TITLE_Y: f32 = 46.0;
pub const CONTROLS_Y: f32 = 84.0;
pub const X_GRID_LINES: usize = 10;
pub const Y_GRID_LINES: usize = 8;

pub const SPEED_STEP_MPS: f64 = 0.1;
pub const SWEEP_STEP_DEG: i32 = 1;

pub const BACKGROUND: Color = Color::new(0.98, 0.984, 0.992, 1.0);
pub const GRID_COLOR: Color = Color::new(0.89, 0.906, 0.925, 1.0);
pub const OPTIMUM_COLOR: Color = Color::new(0.14, 0.45, 0.95, 1.0);
pub const SELECTED_COLOR: Color = Color::new(0.86, 0.15, 0.15, 1.0);
