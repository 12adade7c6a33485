use glider_launch::core::flight::{Flight, FlightOutcome};
use glider_launch::core::report::sweep_color;
use glider_launch::core::window::{PlotWindow, ScreenRect, format_axis_value};
use macroquad::prelude::*;

use crate::constants::{
    CONTROLS_Y, OPTIMUM_COLOR, SELECTED_COLOR, TITLE_Y, X_GRID_LINES, Y_GRID_LINES,
};
use crate::state::ViewerState;

pub(crate) fn draw_ui_text(
    text: &str,
    x: f32,
    y: f32,
    font_size: u16,
    color: Color,
    font: Option<&Font>,
) {
    draw_text_ex(
        text,
        x,
        y,
        TextParams {
            font,
            font_size,
            color,
            ..Default::default()
        },
    );
}

fn screen_point(window: &PlotWindow, rect: ScreenRect, x: f64, y: f64) -> Vec2 {
    let (sx, sy) = window.to_screen(x, y, rect);
    vec2(sx as f32, sy as f32)
}

pub(crate) fn draw_grid(rect: ScreenRect, color: Color) {
    let (left, right) = (rect.left as f32, rect.right as f32);
    let (top, bottom) = (rect.top as f32, rect.bottom as f32);
    for i in 0..=X_GRID_LINES {
        let t = i as f32 / X_GRID_LINES as f32;
        let x = left + t * (right - left);
        draw_line(x, top, x, bottom, 1.0, color);
    }
    for i in 0..=Y_GRID_LINES {
        let t = i as f32 / Y_GRID_LINES as f32;
        let y = bottom - t * (bottom - top);
        draw_line(left, y, right, y, 1.0, color);
    }
    draw_line(left, bottom, right, bottom, 2.0, DARKGRAY);
    draw_line(left, top, left, bottom, 2.0, DARKGRAY);
}

pub(crate) fn draw_axis_tick_labels(window: &PlotWindow, rect: ScreenRect, font: Option<&Font>) {
    let label_color = Color::from_rgba(105, 113, 124, 255);
    let tick_font_size: u16 = 16;

    for value in PlotWindow::ticks(window.x_min, window.x_max, X_GRID_LINES) {
        let label = format_axis_value(value, window.width());
        let size = measure_text(&label, font, tick_font_size, 1.0);
        let p = screen_point(window, rect, value, window.y_min);
        draw_ui_text(
            &label,
            p.x - (size.width * 0.5),
            p.y + 22.0,
            tick_font_size,
            label_color,
            font,
        );
    }

    for value in PlotWindow::ticks(window.y_min, window.y_max, Y_GRID_LINES) {
        let label = format_axis_value(value, window.height());
        let size = measure_text(&label, font, tick_font_size, 1.0);
        let p = screen_point(window, rect, window.x_min, value);
        draw_ui_text(
            &label,
            (p.x - 8.0) - size.width,
            p.y + (size.height * 0.35),
            tick_font_size,
            label_color,
            font,
        );
    }

    let (right, top, bottom) = (rect.right as f32, rect.top as f32, rect.bottom as f32);
    draw_ui_text(
        "Distance (m)",
        right - 130.0,
        bottom + 48.0,
        18,
        label_color,
        font,
    );
    draw_ui_text(
        "Height (m)",
        rect.left as f32 + 10.0,
        top - 8.0,
        18,
        label_color,
        font,
    );
}

pub(crate) fn draw_flight(
    flight: &Flight,
    window: &PlotWindow,
    rect: ScreenRect,
    thickness: f32,
    color: Color,
) {
    let points: Vec<Vec2> = flight
        .trajectory
        .iter()
        .filter(|s| s.x_m.is_finite() && s.y_m.is_finite())
        .map(|s| screen_point(window, rect, s.x_m, s.y_m))
        .collect();
    for pair in points.windows(2) {
        draw_line(pair[0].x, pair[0].y, pair[1].x, pair[1].y, thickness, color);
    }
    if let Some(end) = points.last() {
        draw_circle(end.x, end.y, thickness + 1.5, color);
    }
}

pub(crate) fn draw_sweep(state: &ViewerState, window: &PlotWindow, rect: ScreenRect) {
    let best = state.sweep.best_flight().map(|f| f.angle_deg);
    for (index, flight) in state.sweep.flights.iter().enumerate() {
        if index == state.selected || Some(flight.angle_deg) == best {
            continue;
        }
        let c = sweep_color(index);
        draw_flight(
            flight,
            window,
            rect,
            1.5,
            Color::from_rgba(c.0, c.1, c.2, 150),
        );
    }
    if let Some(flight) = state.sweep.best_flight() {
        draw_flight(flight, window, rect, 3.0, OPTIMUM_COLOR);
    }
    if let Some(flight) = state.selected_flight() {
        draw_flight(flight, window, rect, 2.5, SELECTED_COLOR);
    }
}

fn outcome_text(outcome: FlightOutcome) -> &'static str {
    match outcome {
        FlightOutcome::Landed => "landed",
        FlightOutcome::Diverged => "diverged (extrapolated)",
        FlightOutcome::StepLimit => "step limit",
    }
}

pub(crate) fn draw_hud(state: &ViewerState, rect: ScreenRect, screen_h: f32, font: Option<&Font>) {
    let header_color = Color::from_rgba(30, 30, 35, 255);
    let left = rect.left as f32;

    draw_ui_text(
        "Glider launch - angle sweep",
        left,
        TITLE_Y,
        30,
        header_color,
        font,
    );
    draw_ui_text(
        "Left/Right select angle | Up/Down launch speed | [ ] sweep end | S save PNG | R reset",
        left + 12.0,
        CONTROLS_Y,
        20,
        DARKGRAY,
        font,
    );

    let optimum = match state.sweep.result.best_angle_deg {
        Some(angle) => format!(
            "Optimum: {angle} deg -> {:.3} m",
            state.sweep.result.best_distance_m
        ),
        None => "Optimum: none".to_string(),
    };
    draw_ui_text(
        &format!(
            "{optimum} | Sweep {}..{} deg | Speed {:.1} m/s | Height {:.2} m",
            state.range.min_deg,
            state.range.max_deg,
            state.params.initial_speed_mps,
            state.params.launch_height_m
        ),
        left,
        screen_h - 45.0,
        24,
        OPTIMUM_COLOR,
        font,
    );

    if let Some(flight) = state.selected_flight() {
        draw_ui_text(
            &format!(
                "Selected {:.0} deg: {:.3} m in {:.3} s, apex {:.3} m, {} | {}",
                flight.angle_deg,
                flight.distance_m,
                flight.flight_time_s(),
                flight.apex_m(),
                outcome_text(flight.outcome),
                state.status_line
            ),
            left,
            screen_h - 14.0,
            20,
            SELECTED_COLOR,
            font,
        );
    }
}
