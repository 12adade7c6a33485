use std::fs;
use std::ops::Range;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::error::{ConfigError, ParameterError};
use crate::core::gear::GearSettings;

pub const EARTH_GRAVITY_MPS2: f64 = 9.81;
pub const SEA_LEVEL_AIR_DENSITY_KGPM3: f64 = 1.225;

/// Physical constants for one glider flight. Defaults describe the
/// styrofoam test plane launched from the 1.7 m rail.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationParameters {
    pub gravity_mps2: f64,
    pub air_density_kgpm3: f64,
    pub drag_coefficient: f64,
    pub mass_kg: f64,
    pub initial_speed_mps: f64,
    pub lift_coefficient: f64,
    pub wing_area_m2: f64,
    pub reference_area_m2: f64,
    pub timestep_s: f64,
    pub launch_height_m: f64,
    /// Ceiling on integration steps for flights that never come down.
    pub max_steps: usize,
}

impl Default for SimulationParameters {
    fn default() -> Self {
        Self {
            gravity_mps2: EARTH_GRAVITY_MPS2,
            air_density_kgpm3: SEA_LEVEL_AIR_DENSITY_KGPM3,
            drag_coefficient: 0.3,
            mass_kg: 0.01,
            initial_speed_mps: 3.6,
            lift_coefficient: 0.3,
            wing_area_m2: 0.0545,
            reference_area_m2: 0.0206,
            timestep_s: 0.001,
            launch_height_m: 1.7,
            max_steps: 1_000_000,
        }
    }
}

impl SimulationParameters {
    /// Optional hardening; `flight::simulate` runs unchecked.
    pub fn validate(&self) -> Result<(), ParameterError> {
        let values = [
            ("gravity_mps2", self.gravity_mps2),
            ("air_density_kgpm3", self.air_density_kgpm3),
            ("drag_coefficient", self.drag_coefficient),
            ("mass_kg", self.mass_kg),
            ("initial_speed_mps", self.initial_speed_mps),
            ("lift_coefficient", self.lift_coefficient),
            ("wing_area_m2", self.wing_area_m2),
            ("reference_area_m2", self.reference_area_m2),
            ("timestep_s", self.timestep_s),
            ("launch_height_m", self.launch_height_m),
        ];
        if let Some(&(name, _)) = values.iter().find(|(_, value)| !value.is_finite()) {
            return Err(ParameterError::NonFinite(name));
        }
        if self.mass_kg <= 0.0 {
            return Err(ParameterError::NonPositive {
                name: "mass_kg",
                value: self.mass_kg,
            });
        }
        if self.timestep_s <= 0.0 {
            return Err(ParameterError::NonPositive {
                name: "timestep_s",
                value: self.timestep_s,
            });
        }
        if self.max_steps == 0 {
            return Err(ParameterError::ZeroStepLimit);
        }
        Ok(())
    }
}

/// Integer launch angles `[min_deg, max_deg)` at one degree resolution.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AngleSweepRange {
    pub min_deg: i32,
    pub max_deg: i32,
}

impl Default for AngleSweepRange {
    fn default() -> Self {
        Self {
            min_deg: 0,
            max_deg: 25,
        }
    }
}

impl AngleSweepRange {
    pub fn new(min_deg: i32, max_deg: i32) -> Result<Self, ParameterError> {
        let range = Self { min_deg, max_deg };
        range.validate()?;
        Ok(range)
    }

    pub fn validate(&self) -> Result<(), ParameterError> {
        if self.min_deg > self.max_deg {
            return Err(ParameterError::InvertedSweep {
                min: self.min_deg,
                max: self.max_deg,
            });
        }
        Ok(())
    }

    pub fn angles(&self) -> Range<i32> {
        self.min_deg..self.max_deg
    }

    pub fn len(&self) -> usize {
        self.angles().len()
    }

    pub fn is_empty(&self) -> bool {
        self.min_deg >= self.max_deg
    }
}

/// Everything a settings file may override.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub flight: SimulationParameters,
    pub sweep: AngleSweepRange,
    pub gear: GearSettings,
}

impl Settings {
    pub fn from_json_str(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let settings = Self::from_json_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), ParameterError> {
        self.flight.validate()?;
        self.sweep.validate()?;
        self.gear.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::{AngleSweepRange, Settings, SimulationParameters};
    use crate::core::error::ParameterError;

    #[test]
    fn defaults_match_test_plane() {
        let params = SimulationParameters::default();
        assert_eq!(params.mass_kg, 0.01);
        assert_eq!(params.initial_speed_mps, 3.6);
        assert_eq!(params.launch_height_m, 1.7);
        assert_eq!(params.timestep_s, 0.001);
        assert!(params.validate().is_ok());
    }

    #[test]
    fn rejects_zero_mass() {
        let params = SimulationParameters {
            mass_kg: 0.0,
            ..SimulationParameters::default()
        };
        assert!(matches!(
            params.validate(),
            Err(ParameterError::NonPositive { name: "mass_kg", .. })
        ));
    }

    #[test]
    fn rejects_non_finite_constant() {
        let params = SimulationParameters {
            air_density_kgpm3: f64::NAN,
            ..SimulationParameters::default()
        };
        assert!(matches!(
            params.validate(),
            Err(ParameterError::NonFinite("air_density_kgpm3"))
        ));
    }

    #[test]
    fn sweep_range_is_half_open() {
        let range = AngleSweepRange::new(3, 7).expect("range should be valid");
        assert_eq!(range.angles().collect::<Vec<_>>(), vec![3, 4, 5, 6]);
        assert_eq!(range.len(), 4);
        assert!(AngleSweepRange::new(5, 5).expect("empty is allowed").is_empty());
        assert!(AngleSweepRange::new(8, 2).is_err());
    }

    #[test]
    fn partial_settings_fill_in_defaults() {
        let settings = Settings::from_json_str(
            r#"{ "flight": { "initial_speed_mps": 5.0 }, "sweep": { "max_deg": 40 } }"#,
        )
        .expect("settings should parse");

        assert_eq!(settings.flight.initial_speed_mps, 5.0);
        assert_eq!(settings.flight.mass_kg, 0.01);
        assert_eq!(settings.sweep.min_deg, 0);
        assert_eq!(settings.sweep.max_deg, 40);
        assert_eq!(settings.gear.angle_step_deg, 1.0);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn settings_validation_reaches_every_section() {
        let settings = Settings::from_json_str(r#"{ "gear": { "angle_step_deg": 0.0 } }"#)
            .expect("settings should parse");
        assert!(matches!(
            settings.validate(),
            Err(ParameterError::InvalidAngleStep(_))
        ));
    }
}
