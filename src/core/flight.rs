use crate::core::params::{AngleSweepRange, SimulationParameters};

/// Largest horizontal velocity change per step the integrator accepts before
/// treating the flight as diverged.
pub const INSTABILITY_THRESHOLD_MPS: f64 = 1000.0;

/// Share of the lift vector that acts against the direction of travel.
const LIFT_INDUCED_DRAG_SHARE: f64 = 0.3;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TrajectorySample {
    pub time_s: f64,
    pub x_m: f64,
    pub y_m: f64,
    pub vx_mps: f64,
    pub vy_mps: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FlightOutcome {
    /// Height reached zero.
    Landed,
    /// The instability guard stopped the integration early.
    Diverged,
    /// `max_steps` ran out before the glider came down.
    StepLimit,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Flight {
    pub angle_deg: f64,
    pub distance_m: f64,
    pub outcome: FlightOutcome,
    pub trajectory: Vec<TrajectorySample>,
}

impl Flight {
    pub fn terminal(&self) -> Option<&TrajectorySample> {
        self.trajectory.last()
    }

    pub fn flight_time_s(&self) -> f64 {
        self.terminal().map_or(0.0, |s| s.time_s)
    }

    pub fn apex_m(&self) -> f64 {
        self.trajectory
            .iter()
            .fold(f64::NEG_INFINITY, |acc, s| acc.max(s.y_m))
    }
}

/// Quadratic drag; keeps the sign of `speed_mps`.
pub fn drag_force(speed_mps: f64, params: &SimulationParameters) -> f64 {
    let drag = params.drag_coefficient
        * params.reference_area_m2
        * params.air_density_kgpm3
        * speed_mps.powi(2)
        / 2.0;
    if speed_mps < 0.0 { -drag } else { drag }
}

pub fn lift_force(speed_mps: f64, params: &SimulationParameters) -> f64 {
    params.lift_coefficient * params.wing_area_m2 * params.air_density_kgpm3 * speed_mps.powi(2)
        / 2.0
}

/// Net `(fx, fy)` in newtons for the current speed and flight-path angle.
///
/// Lift is resolved along the flight path with a 0.3 share acting as drag.
/// While descending the full horizontal lift component is added on top.
pub fn net_force(
    speed_mps: f64,
    path_angle_rad: f64,
    params: &SimulationParameters,
) -> (f64, f64) {
    let gravity = -params.mass_kg * params.gravity_mps2;
    let drag = drag_force(speed_mps, params);
    let lift = lift_force(speed_mps, params);

    let fy = gravity + lift * path_angle_rad.cos();
    let mut fx =
        -drag * path_angle_rad.cos() + lift * -path_angle_rad.sin() * LIFT_INDUCED_DRAG_SHARE;
    if path_angle_rad < 0.0 {
        fx += lift * -path_angle_rad.sin();
    }
    (fx, fy)
}

/// Integrates one launch with semi-implicit Euler until the glider is on the
/// ground. Parameters are used as given; see `SimulationParameters::validate`.
pub fn simulate(angle_deg: f64, params: &SimulationParameters) -> Flight {
    let theta = angle_deg.to_radians();
    let dt = params.timestep_s;

    let mut state = TrajectorySample {
        time_s: 0.0,
        x_m: 0.0,
        y_m: params.launch_height_m,
        vx_mps: params.initial_speed_mps * theta.cos(),
        vy_mps: params.initial_speed_mps * theta.sin(),
    };
    let mut speed = params.initial_speed_mps;
    // The first step resolves forces along the launch angle converted to
    // radians a second time; recorded sweeps depend on it.
    let mut path_angle = theta.to_radians();

    let mut trajectory = Vec::new();
    let mut outcome = FlightOutcome::Landed;
    let mut steps = 0usize;

    while state.y_m > 0.0 {
        if steps == params.max_steps {
            outcome = FlightOutcome::StepLimit;
            break;
        }
        trajectory.push(state);

        let (fx, fy) = net_force(speed, path_angle, params);
        let ax = fx / params.mass_kg;
        let ay = fy / params.mass_kg;

        // NaN never trips this, it propagates into y and ends the loop.
        if (ax * dt).abs() > INSTABILITY_THRESHOLD_MPS {
            repeat_last_delta(&mut state, &trajectory);
            outcome = FlightOutcome::Diverged;
            break;
        }

        state.vx_mps += ax * dt;
        state.vy_mps += ay * dt;
        state.x_m += state.vx_mps * dt;
        state.y_m += state.vy_mps * dt;
        speed = (state.vx_mps.powi(2) + state.vy_mps.powi(2)).sqrt();
        path_angle = (state.vy_mps / state.vx_mps).atan();
        state.time_s += dt;
        steps += 1;
    }

    trajectory.push(state);
    Flight {
        angle_deg,
        distance_m: state.x_m.abs(),
        outcome,
        trajectory,
    }
}

/// Extrapolates one more step from the last two recorded samples.
fn repeat_last_delta(state: &mut TrajectorySample, trajectory: &[TrajectorySample]) {
    if let [.., previous, last] = trajectory {
        state.x_m += last.x_m - previous.x_m;
        state.y_m += last.y_m - previous.y_m;
        state.vx_mps += last.vx_mps - previous.vx_mps;
        state.vy_mps += last.vy_mps - previous.vy_mps;
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SweepResult {
    pub best_angle_deg: Option<i32>,
    pub best_distance_m: f64,
}

impl SweepResult {
    /// Keeps the candidate only if it is strictly farther, so ties go to the
    /// angle seen first.
    pub fn consider(&mut self, angle_deg: i32, distance_m: f64) -> bool {
        if self.best_distance_m < distance_m {
            self.best_angle_deg = Some(angle_deg);
            self.best_distance_m = distance_m;
            true
        } else {
            false
        }
    }
}

#[derive(Clone, Debug)]
pub struct Sweep {
    pub range: AngleSweepRange,
    pub flights: Vec<Flight>,
    pub result: SweepResult,
}

impl Sweep {
    pub fn best_flight(&self) -> Option<&Flight> {
        let best = self.result.best_angle_deg?;
        self.flights
            .iter()
            .find(|flight| flight.angle_deg == f64::from(best))
    }
}

/// Runs every angle in increasing order and hands each flight to `on_flight`
/// together with the best result so far.
pub fn sweep_with<F>(
    range: AngleSweepRange,
    params: &SimulationParameters,
    mut on_flight: F,
) -> SweepResult
where
    F: FnMut(Flight, &SweepResult),
{
    let mut result = SweepResult::default();
    for angle_deg in range.angles() {
        let flight = simulate(f64::from(angle_deg), params);
        result.consider(angle_deg, flight.distance_m);
        on_flight(flight, &result);
    }
    result
}

pub fn sweep(range: AngleSweepRange, params: &SimulationParameters) -> Sweep {
    let mut flights = Vec::with_capacity(range.len());
    let result = sweep_with(range, params, |flight, _| flights.push(flight));
    Sweep {
        range,
        flights,
        result,
    }
}

pub fn find_optimal_angle(range: AngleSweepRange, params: &SimulationParameters) -> SweepResult {
    sweep_with(range, params, |_, _| {})
}
