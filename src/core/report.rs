//! Console text, PNG charts and the gear-point export.

use std::error::Error;
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use plotters::prelude::*;

use crate::core::error::ReportError;
use crate::core::flight::{Flight, FlightOutcome, Sweep, SweepResult};
use crate::core::gear::{GearDesign, ProfilePoint};
use crate::core::params::{AngleSweepRange, SimulationParameters};
use crate::core::window::{DISTANCE_TO_HEIGHT_RATIO, GEAR_ASPECT_RATIO, PlotWindow};

pub const CHART_SIZE: (u32, u32) = (1600, 900);
pub const GEAR_CHART_SIZE: (u32, u32) = (900, 900);

/// Line colours cycled through the sweep; every fifth angle is drawn in
/// black and gets a legend entry.
pub const SWEEP_PALETTE: [RGBColor; 5] = [
    RGBColor(214, 39, 40),
    RGBColor(44, 160, 44),
    RGBColor(31, 119, 180),
    RGBColor(148, 103, 189),
    RGBColor(255, 127, 14),
];
const LABELLED_EVERY: usize = 5;

pub fn sweep_color(index: usize) -> RGBColor {
    if index % LABELLED_EVERY == 0 {
        BLACK
    } else {
        SWEEP_PALETTE[index % SWEEP_PALETTE.len()]
    }
}

/// `<dir>/<stem>_<YYYYmmdd-HHMMSS>.<ext>`
pub fn timestamped_path(dir: &Path, stem: &str, extension: &str, at: DateTime<Local>) -> PathBuf {
    dir.join(format!("{stem}_{}.{extension}", at.format("%Y%m%d-%H%M%S")))
}

pub fn format_inputs(params: &SimulationParameters, range: AngleSweepRange) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Input values:");
    let _ = writeln!(out, "  Drag coefficient: {}", params.drag_coefficient);
    let _ = writeln!(out, "  Plane mass: {} kg", params.mass_kg);
    let _ = writeln!(out, "  Initial velocity: {} m/s", params.initial_speed_mps);
    let _ = writeln!(out, "  Lift coefficient: {}", params.lift_coefficient);
    let _ = writeln!(out, "  Wing area: {} m^2", params.wing_area_m2);
    let _ = writeln!(out, "  Reference area: {} m^2", params.reference_area_m2);
    let _ = writeln!(out, "  Launch height: {} m", params.launch_height_m);
    let _ = writeln!(out, "  Angles: {} to {} deg (exclusive)", range.min_deg, range.max_deg);
    let _ = write!(out, "  Time step: {} s", params.timestep_s);
    out
}

pub fn format_flight_line(flight: &Flight, best: &SweepResult) -> String {
    let note = match flight.outcome {
        FlightOutcome::Landed => "",
        FlightOutcome::Diverged => " [diverged, extrapolated]",
        FlightOutcome::StepLimit => " [step limit reached]",
    };
    format!(
        "Angle {:>4.0} deg: distance {:.4} m after {:.3} s (longest so far {:.4} m){note}",
        flight.angle_deg,
        flight.distance_m,
        flight.flight_time_s(),
        best.best_distance_m
    )
}

pub fn format_optimum(result: &SweepResult) -> String {
    match result.best_angle_deg {
        Some(angle) => format!(
            "Optimal launch angle: {angle} deg, theoretical distance {:.4} m",
            result.best_distance_m
        ),
        None => "No launch angle in the sweep travelled any distance.".to_string(),
    }
}

pub fn format_gear_design(gear: &GearDesign) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Friction: static {:.6} N, dynamic {:.6} N",
        gear.resistance.static_n, gear.resistance.dynamic_n
    );
    let _ = writeln!(out, "Plane load: {:.6} N", gear.plane_load_n);
    let _ = writeln!(out, "Impulse force: {:.6} N", gear.impulse_n);
    let _ = writeln!(
        out,
        "Gear ratios: small {:.6}, big {:.6}",
        gear.ratios.small, gear.ratios.big
    );
    let _ = writeln!(
        out,
        "Profile: {} points, dr = {:.6}",
        gear.profile.points.len(),
        gear.profile.radius_step
    );
    let _ = writeln!(out, "Outline length: {:.6}", gear.outline_length);
    let _ = write!(out, "Output velocity: {:.4} m/s", gear.output_velocity_mps);
    out
}

/// One `[x, y, index],` line per point inside `[` and `]`, the list format
/// the CAD import script reads.
pub fn format_gear_points(points: &[ProfilePoint]) -> String {
    let mut out = String::from("[");
    for point in points {
        let _ = writeln!(out, "[{:?}, {:?}, {}],", point.x, point.y, point.index);
    }
    out.push(']');
    out
}

pub fn write_gear_points(points: &[ProfilePoint], path: &Path) -> Result<(), ReportError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, format_gear_points(points))?;
    Ok(())
}

pub fn sweep_window(sweep: &Sweep) -> PlotWindow {
    PlotWindow::fit(
        sweep
            .flights
            .iter()
            .flat_map(|flight| flight.trajectory.iter().map(|s| (s.x_m, s.y_m))),
        DISTANCE_TO_HEIGHT_RATIO,
        1.0,
    )
}

pub fn render_sweep_chart(sweep: &Sweep, path: &Path) -> Result<(), ReportError> {
    if sweep.flights.is_empty() {
        return Err(ReportError::Empty("the sweep evaluated no angles"));
    }
    draw_sweep(sweep, path).map_err(|e| ReportError::Chart(e.to_string()))
}

pub fn sweep_title(sweep: &Sweep) -> String {
    let heading = format!(
        "Plane flight paths, {} to {} degrees",
        sweep.range.min_deg, sweep.range.max_deg
    );
    match sweep.result.best_angle_deg {
        Some(angle) => format!("{heading}. Optimal angle {angle} degrees"),
        None => heading,
    }
}

fn draw_sweep(sweep: &Sweep, path: &Path) -> Result<(), Box<dyn Error>> {
    let window = sweep_window(sweep);
    let title = sweep_title(sweep);

    let root = BitMapBackend::new(path, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE)?;
    let mut chart = ChartBuilder::on(&root)
        .caption(title, ("sans-serif", 28).into_font())
        .margin(20)
        .x_label_area_size(50)
        .y_label_area_size(60)
        .build_cartesian_2d(window.x_min..window.x_max, window.y_min..window.y_max)?;
    chart
        .configure_mesh()
        .x_desc("Distance (m)")
        .y_desc("Height (m)")
        .draw()?;

    for (index, flight) in sweep.flights.iter().enumerate() {
        let color = sweep_color(index);
        let series = chart.draw_series(LineSeries::new(
            flight.trajectory.iter().map(|s| (s.x_m, s.y_m)),
            &color,
        ))?;
        if index % LABELLED_EVERY == 0 {
            series
                .label(format!("Launch angle {} deg", flight.angle_deg))
                .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], &color));
        }
    }

    if let Some(best) = sweep.best_flight() {
        chart
            .draw_series(LineSeries::new(
                best.trajectory.iter().map(|s| (s.x_m, s.y_m)),
                BLUE.stroke_width(3),
            ))?
            .label(format!("Optimum {} deg", best.angle_deg))
            .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], BLUE.stroke_width(3)));
    }

    chart
        .configure_series_labels()
        .background_style(&WHITE.mix(0.85))
        .border_style(&BLACK)
        .draw()?;
    root.present()?;
    Ok(())
}

pub fn render_gear_chart(gear: &GearDesign, path: &Path) -> Result<(), ReportError> {
    if gear.profile.points.is_empty() {
        return Err(ReportError::Empty("the gear profile has no points"));
    }
    draw_gear(gear, path).map_err(|e| ReportError::Chart(e.to_string()))
}

fn draw_gear(gear: &GearDesign, path: &Path) -> Result<(), Box<dyn Error>> {
    let points = &gear.profile.points;
    let window = PlotWindow::fit(
        points
            .iter()
            .map(|p| (p.x, p.y))
            .chain([(gear.outline_length, 0.0)]),
        GEAR_ASPECT_RATIO,
        0.01,
    );

    let root = BitMapBackend::new(path, GEAR_CHART_SIZE).into_drawing_area();
    root.fill(&WHITE)?;
    let mut chart = ChartBuilder::on(&root)
        .caption(
            format!("Gear Ratio {:.4} {:.4}", gear.ratios.small, gear.ratios.big),
            ("sans-serif", 26).into_font(),
        )
        .margin(20)
        .x_label_area_size(45)
        .y_label_area_size(60)
        .build_cartesian_2d(window.x_min..window.x_max, window.y_min..window.y_max)?;
    chart.configure_mesh().x_desc("X-axis").y_desc("Y-axis").draw()?;

    chart.draw_series(LineSeries::new(points.iter().map(|p| (p.x, p.y)), &BLACK))?;
    chart.draw_series(
        points
            .iter()
            .map(|p| Circle::new((p.x, p.y), 2, SWEEP_PALETTE[2].filled())),
    )?;

    if let Some(last) = points.last() {
        chart.draw_series(LineSeries::new([(0.0, 0.0), (last.x, last.y)], &SWEEP_PALETTE[0]))?;
    }
    chart.draw_series(LineSeries::new(
        [(0.0, 0.0), (gear.outline_length, 0.0)],
        &SWEEP_PALETTE[1],
    ))?;

    root.present()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use chrono::{Local, TimeZone};

    use plotters::prelude::{BLACK, RGBColor};

    use super::{
        format_flight_line, format_gear_points, format_inputs, format_optimum, sweep_color,
        sweep_title, sweep_window, timestamped_path,
    };
    use crate::core::flight::{self, SweepResult};
    use crate::core::gear::ProfilePoint;
    use crate::core::params::{AngleSweepRange, SimulationParameters};

    fn rgb(color: RGBColor) -> (u8, u8, u8) {
        (color.0, color.1, color.2)
    }

    #[test]
    fn every_fifth_angle_is_black() {
        assert_eq!(rgb(sweep_color(0)), rgb(BLACK));
        assert_eq!(rgb(sweep_color(5)), rgb(BLACK));
        assert_ne!(rgb(sweep_color(1)), rgb(BLACK));
        assert_ne!(rgb(sweep_color(4)), rgb(sweep_color(3)));
    }

    #[test]
    fn timestamped_path_embeds_local_time() {
        let at = Local
            .with_ymd_and_hms(2026, 3, 4, 5, 6, 7)
            .single()
            .expect("unambiguous local time");
        let path = timestamped_path(Path::new("out"), "flight_paths", "png", at);
        assert_eq!(path, Path::new("out").join("flight_paths_20260304-050607.png"));
    }

    #[test]
    fn gear_points_are_a_list_literal() {
        let points = [
            ProfilePoint {
                x: 0.5,
                y: 0.0,
                index: 0,
            },
            ProfilePoint {
                x: -0.25,
                y: 1.0,
                index: 1,
            },
        ];
        assert_eq!(
            format_gear_points(&points),
            "[[0.5, 0.0, 0],\n[-0.25, 1.0, 1],\n]"
        );
        assert_eq!(format_gear_points(&[]), "[]");
    }

    #[test]
    fn optimum_line_handles_empty_sweep() {
        assert!(format_optimum(&SweepResult::default()).starts_with("No launch angle"));
        let result = SweepResult {
            best_angle_deg: Some(7),
            best_distance_m: 3.25,
        };
        assert_eq!(
            format_optimum(&result),
            "Optimal launch angle: 7 deg, theoretical distance 3.2500 m"
        );
    }

    #[test]
    fn inputs_list_every_constant() {
        let text = format_inputs(
            &SimulationParameters::default(),
            AngleSweepRange::default(),
        );
        assert!(text.contains("Plane mass: 0.01 kg"));
        assert!(text.contains("Angles: 0 to 25 deg"));
        assert!(text.ends_with("Time step: 0.001 s"));
    }

    #[test]
    fn flight_line_reports_distance_and_best() {
        let params = SimulationParameters {
            launch_height_m: 0.0,
            ..SimulationParameters::default()
        };
        let flight = flight::simulate(4.0, &params);
        let line = format_flight_line(&flight, &SweepResult::default());
        assert_eq!(
            line,
            "Angle    4 deg: distance 0.0000 m after 0.000 s (longest so far 0.0000 m)"
        );
    }

    #[test]
    fn sweep_title_names_the_range_and_optimum() {
        let params = SimulationParameters {
            launch_height_m: 0.0,
            ..SimulationParameters::default()
        };
        let range = AngleSweepRange::new(3, 9).expect("valid range");
        let grounded = flight::sweep(range, &params);
        assert_eq!(sweep_title(&grounded), "Plane flight paths, 3 to 9 degrees");

        let mut found = grounded.clone();
        found.result = SweepResult {
            best_angle_deg: Some(5),
            best_distance_m: 1.0,
        };
        assert_eq!(
            sweep_title(&found),
            "Plane flight paths, 3 to 9 degrees. Optimal angle 5 degrees"
        );
    }

    #[test]
    fn sweep_window_contains_every_sample() {
        let range = AngleSweepRange::new(0, 3).expect("valid range");
        let sweep = flight::sweep(range, &SimulationParameters::default());
        let window = sweep_window(&sweep);

        for sample in sweep.flights.iter().flat_map(|f| f.trajectory.iter()) {
            if sample.x_m.is_finite() && sample.y_m.is_finite() {
                assert!(sample.x_m >= window.x_min && sample.x_m <= window.x_max);
                assert!(sample.y_m >= window.y_min && sample.y_m <= window.y_max);
            }
        }
    }
}
