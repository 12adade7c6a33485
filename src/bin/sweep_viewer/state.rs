use glider_launch::core::flight::{self, Flight, Sweep};
use glider_launch::core::params::{AngleSweepRange, Settings, SimulationParameters};

use crate::constants::{SPEED_STEP_MPS, SWEEP_STEP_DEG};

pub(crate) struct ViewerState {
    pub(crate) defaults: Settings,
    pub(crate) params: SimulationParameters,
    pub(crate) range: AngleSweepRange,
    pub(crate) sweep: Sweep,
    pub(crate) selected: usize,
    pub(crate) status_line: String,
}

impl ViewerState {
    pub(crate) fn new(defaults: Settings) -> Self {
        let params = defaults.flight;
        let range = defaults.sweep;
        let sweep = flight::sweep(range, &params);
        let mut state = Self {
            defaults,
            params,
            range,
            sweep,
            selected: 0,
            status_line: String::new(),
        };
        state.select_optimum();
        state.status_line = "Ready".to_string();
        state
    }

    fn recompute(&mut self) {
        self.sweep = flight::sweep(self.range, &self.params);
        self.select_optimum();
    }

    fn select_optimum(&mut self) {
        self.selected = self
            .sweep
            .result
            .best_angle_deg
            .and_then(|best| {
                self.sweep
                    .flights
                    .iter()
                    .position(|f| f.angle_deg == f64::from(best))
            })
            .unwrap_or(0);
    }

    pub(crate) fn selected_flight(&self) -> Option<&Flight> {
        self.sweep.flights.get(self.selected)
    }

    pub(crate) fn select_next(&mut self) {
        if self.selected + 1 < self.sweep.flights.len() {
            self.selected += 1;
        }
    }

    pub(crate) fn select_previous(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub(crate) fn adjust_speed(&mut self, steps: f64) {
        let speed = self.params.initial_speed_mps + steps * SPEED_STEP_MPS;
        self.params.initial_speed_mps = ((speed * 10.0).round() / 10.0).max(0.0);
        self.recompute();
        self.status_line = format!("Launch speed {:.1} m/s", self.params.initial_speed_mps);
    }

    pub(crate) fn adjust_sweep_max(&mut self, steps: i32) {
        let max_deg = (self.range.max_deg + steps * SWEEP_STEP_DEG).max(self.range.min_deg + 1);
        self.range.max_deg = max_deg;
        self.recompute();
        self.status_line = format!("Sweeping {} to {} deg", self.range.min_deg, max_deg);
    }

    pub(crate) fn reset(&mut self) {
        self.params = self.defaults.flight;
        self.range = self.defaults.sweep;
        self.recompute();
        self.status_line = "Reset".to_string();
    }
}
