//! Gear sizing for the falling-weight launch mechanism.
//!
//! A bolt load dropped from `drop_height_m` pulls the glider cart up the ramp
//! through a pair of nautilus gears. The smallest ratio has to overcome static
//! friction while the load is still being jerked into motion; the largest one
//! only has to beat dynamic friction. The profile in between grows linearly.

use serde::{Deserialize, Serialize};

use crate::core::error::ParameterError;
use crate::core::params::EARTH_GRAVITY_MPS2;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FrictionSource {
    pub name: String,
    pub angle_deg: f64,
    pub static_coefficient: f64,
    pub dynamic_coefficient: f64,
    pub normal_load: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GearSettings {
    pub gravity_mps2: f64,
    pub plane_mass_kg: f64,
    pub cart_mass_kg: f64,
    pub bolt_load_kg: f64,
    pub ramp_angle_deg: f64,
    pub air_resistance_n: f64,
    pub drop_height_m: f64,
    /// Lift the plane produces on the ramp, which unloads the ramp friction.
    pub plane_lift_n: f64,
    /// Duration of the momentum change while the string goes taut.
    pub impulse_time_s: f64,
    pub angle_step_deg: f64,
    pub big_gear_factor: f64,
    /// `None` derives the ramp and gearbox sources from the masses above.
    pub friction_sources: Option<Vec<FrictionSource>>,
}

impl Default for GearSettings {
    fn default() -> Self {
        Self {
            gravity_mps2: EARTH_GRAVITY_MPS2,
            plane_mass_kg: 0.048,
            cart_mass_kg: 0.08,
            bolt_load_kg: 0.21,
            ramp_angle_deg: 15.0,
            air_resistance_n: 0.0,
            drop_height_m: 1.5,
            plane_lift_n: 0.0,
            impulse_time_s: 1.2,
            angle_step_deg: 1.0,
            big_gear_factor: 1.0,
            friction_sources: None,
        }
    }
}

impl GearSettings {
    pub fn friction_sources(&self) -> Vec<FrictionSource> {
        if let Some(sources) = &self.friction_sources {
            return sources.clone();
        }
        vec![
            FrictionSource {
                name: "Ramp bottom friction".to_string(),
                angle_deg: self.ramp_angle_deg,
                static_coefficient: 0.2,
                dynamic_coefficient: 0.1,
                normal_load: self.plane_mass_kg + self.cart_mass_kg - self.plane_lift_n,
            },
            FrictionSource {
                name: "Gearbox friction".to_string(),
                angle_deg: 0.0,
                static_coefficient: 0.01,
                dynamic_coefficient: 0.005,
                normal_load: 1.0,
            },
        ]
    }

    pub fn validate(&self) -> Result<(), ParameterError> {
        let values = [
            ("gear.gravity_mps2", self.gravity_mps2),
            ("gear.plane_mass_kg", self.plane_mass_kg),
            ("gear.cart_mass_kg", self.cart_mass_kg),
            ("gear.bolt_load_kg", self.bolt_load_kg),
            ("gear.ramp_angle_deg", self.ramp_angle_deg),
            ("gear.air_resistance_n", self.air_resistance_n),
            ("gear.drop_height_m", self.drop_height_m),
            ("gear.plane_lift_n", self.plane_lift_n),
            ("gear.impulse_time_s", self.impulse_time_s),
            ("gear.big_gear_factor", self.big_gear_factor),
        ];
        if let Some(&(name, _)) = values.iter().find(|(_, value)| !value.is_finite()) {
            return Err(ParameterError::NonFinite(name));
        }
        for (name, value) in [
            ("gear.bolt_load_kg", self.bolt_load_kg),
            ("gear.impulse_time_s", self.impulse_time_s),
        ] {
            if value <= 0.0 {
                return Err(ParameterError::NonPositive { name, value });
            }
        }
        profile_point_count(self.angle_step_deg).map(|_| ())
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Resistance {
    pub static_n: f64,
    pub dynamic_n: f64,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GearRatios {
    pub small: f64,
    pub big: f64,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PolarPoint {
    pub index: usize,
    pub increasing_radius: f64,
    pub decreasing_radius: f64,
    pub theta_deg: f64,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProfilePoint {
    pub x: f64,
    pub y: f64,
    pub index: usize,
}

#[derive(Clone, Debug, PartialEq)]
pub struct NautilusProfile {
    pub radius_step: f64,
    pub polar: Vec<PolarPoint>,
    pub points: Vec<ProfilePoint>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct GearDesign {
    pub resistance: Resistance,
    pub plane_load_n: f64,
    pub pull_force_max_n: f64,
    pub pull_force_min_n: f64,
    pub impulse_n: f64,
    pub ratios: GearRatios,
    pub profile: NautilusProfile,
    pub outline_length: f64,
    pub output_velocity_mps: f64,
}

pub fn resistance(sources: &[FrictionSource]) -> Resistance {
    sources
        .iter()
        .fold(Resistance::default(), |total, source| Resistance {
            static_n: total.static_n + static_friction(source),
            dynamic_n: total.dynamic_n + dynamic_friction(source),
        })
}

pub fn static_friction(source: &FrictionSource) -> f64 {
    source.angle_deg.to_radians().sin() * source.static_coefficient * source.normal_load
}

/// Takes the sine of the raw degree value, not of the converted angle.
pub fn dynamic_friction(source: &FrictionSource) -> f64 {
    source.angle_deg.sin() * source.dynamic_coefficient * source.normal_load
}

pub fn impulse_force(height_m: f64, mass_kg: f64, impulse_time_s: f64, gravity_mps2: f64) -> f64 {
    mass_kg * (2.0 * gravity_mps2 * height_m).sqrt() / impulse_time_s
}

pub fn plane_load(ramp_angle_deg: f64, plane_mass_kg: f64, air_resistance_n: f64) -> f64 {
    ramp_angle_deg.to_radians().cos() * plane_mass_kg + air_resistance_n
}

pub fn gear_ratios(
    force_required_high: f64,
    force_required_low: f64,
    load_force_min: f64,
    load_force_max: f64,
) -> GearRatios {
    GearRatios {
        small: force_required_high / load_force_max,
        big: force_required_low / load_force_min,
    }
}

/// Finest profile the exporter will produce, a thousandth of a degree.
pub const MAX_PROFILE_POINTS: usize = 360_000;

fn profile_point_count(angle_step_deg: f64) -> Result<usize, ParameterError> {
    if !angle_step_deg.is_finite() || angle_step_deg <= 0.0 || angle_step_deg > 360.0 {
        return Err(ParameterError::InvalidAngleStep(angle_step_deg));
    }
    let count = 360.0 / angle_step_deg;
    if count > MAX_PROFILE_POINTS as f64 {
        return Err(ParameterError::InvalidAngleStep(angle_step_deg));
    }
    Ok(count as usize)
}

/// One revolution of points whose radius climbs linearly from the small to
/// the big ratio. Real nautilus gears are not linear, but close enough.
pub fn nautilus_profile(
    ratios: GearRatios,
    angle_step_deg: f64,
    big_gear_factor: f64,
) -> Result<NautilusProfile, ParameterError> {
    let count = profile_point_count(angle_step_deg)?;
    let radius_step = (ratios.big - ratios.small) / count as f64;

    let polar: Vec<PolarPoint> = (0..=count)
        .map(|index| {
            let i = index as f64;
            PolarPoint {
                index,
                increasing_radius: ratios.small + i * radius_step * big_gear_factor,
                decreasing_radius: ratios.big - i * radius_step * big_gear_factor,
                theta_deg: angle_step_deg * i,
            }
        })
        .collect();

    let points = polar
        .iter()
        .map(|p| {
            let theta = p.theta_deg.to_radians();
            ProfilePoint {
                x: theta.cos() * p.increasing_radius * big_gear_factor,
                y: theta.sin() * p.increasing_radius * big_gear_factor,
                index: p.index,
            }
        })
        .collect();

    Ok(NautilusProfile {
        radius_step,
        polar,
        points,
    })
}

/// Polyline length of the outer edge.
pub fn outline_length(points: &[ProfilePoint]) -> f64 {
    points
        .windows(2)
        .map(|pair| (pair[1].x - pair[0].x).hypot(pair[1].y - pair[0].y))
        .sum()
}

/// Launch speed estimate from the ratio weighted towards the big end.
/// Ignores the impulse, so treat it as a rough figure.
pub fn output_velocity(ratios: GearRatios, height_m: f64, gravity_mps2: f64) -> f64 {
    let average_ratio = ratios.small / 3.0 + 2.0 * ratios.big / 3.0;
    (2.0 * (gravity_mps2 * average_ratio) * height_m).sqrt()
}

pub fn design(settings: &GearSettings) -> Result<GearDesign, ParameterError> {
    let resistance = resistance(&settings.friction_sources());
    let plane_load_n = plane_load(
        settings.ramp_angle_deg,
        settings.plane_mass_kg,
        settings.air_resistance_n,
    );
    let pull_force_max_n = resistance.static_n + plane_load_n;
    let pull_force_min_n = resistance.dynamic_n + plane_load_n;
    let impulse_n = impulse_force(
        settings.drop_height_m,
        settings.bolt_load_kg,
        settings.impulse_time_s,
        settings.gravity_mps2,
    );
    let ratios = gear_ratios(
        pull_force_max_n,
        pull_force_min_n,
        settings.bolt_load_kg,
        settings.bolt_load_kg + impulse_n,
    );
    let profile = nautilus_profile(ratios, settings.angle_step_deg, settings.big_gear_factor)?;
    let outline_length = outline_length(&profile.points);
    let output_velocity_mps =
        output_velocity(ratios, settings.drop_height_m, settings.gravity_mps2);

    Ok(GearDesign {
        resistance,
        plane_load_n,
        pull_force_max_n,
        pull_force_min_n,
        impulse_n,
        ratios,
        profile,
        outline_length,
        output_velocity_mps,
    })
}

#[cfg(test)]
mod tests {
    use super::{
        FrictionSource, GearRatios, GearSettings, MAX_PROFILE_POINTS, ProfilePoint, design,
        gear_ratios, impulse_force, nautilus_profile, outline_length, output_velocity, plane_load,
        resistance,
    };
    use crate::core::error::ParameterError;

    fn assert_close(actual: f64, expected: f64, tolerance: f64) {
        assert!(
            (actual - expected).abs() <= tolerance,
            "actual={actual}, expected={expected}, tolerance={tolerance}"
        );
    }

    #[test]
    fn ratios_divide_required_force_by_load() {
        let ratios = gear_ratios(2.0, 1.0, 0.5, 1.0);
        assert_eq!(
            ratios,
            GearRatios {
                small: 2.0,
                big: 2.0,
            }
        );
    }

    #[test]
    fn impulse_matches_free_fall_momentum() {
        // 0.2 kg from 1.25 m lands at 4.95 m/s.
        assert_close(impulse_force(1.25, 0.2, 0.5, 9.8), 1.9799, 0.001);
    }

    #[test]
    fn plane_load_on_flat_ramp_is_the_mass() {
        assert_close(plane_load(0.0, 0.048, 0.01), 0.058, 1e-12);
    }

    #[test]
    fn friction_uses_degrees_for_static_and_raw_angle_for_dynamic() {
        let sources = vec![FrictionSource {
            name: "ramp".to_string(),
            angle_deg: 30.0,
            static_coefficient: 0.2,
            dynamic_coefficient: 0.1,
            normal_load: 2.0,
        }];
        let total = resistance(&sources);

        assert_close(total.static_n, 0.2, 1e-12);
        assert_close(total.dynamic_n, 30f64.sin() * 0.2, 1e-12);
    }

    #[test]
    fn profile_spans_one_revolution() {
        let ratios = GearRatios {
            small: 1.0,
            big: 3.0,
        };
        let profile = nautilus_profile(ratios, 90.0, 1.0).expect("valid step");

        assert_eq!(profile.points.len(), 5);
        assert_close(profile.radius_step, 0.5, 1e-12);
        assert_close(profile.points[0].x, 1.0, 1e-12);
        assert_close(profile.points[1].y, 1.5, 1e-12);
        assert_close(profile.points[4].x, 3.0, 1e-12);
        assert_close(profile.points[4].y, 0.0, 1e-12);
        assert_close(profile.polar[4].decreasing_radius, 1.0, 1e-12);
        assert_eq!(profile.points[4].index, 4);
    }

    #[test]
    fn rejects_degenerate_angle_step() {
        let ratios = GearRatios {
            small: 1.0,
            big: 2.0,
        };
        assert!(matches!(
            nautilus_profile(ratios, 0.0, 1.0),
            Err(ParameterError::InvalidAngleStep(_))
        ));
        assert!(nautilus_profile(ratios, 400.0, 1.0).is_err());
    }

    #[test]
    fn rejects_steps_finer_than_the_point_limit() {
        let settings = GearSettings {
            angle_step_deg: 1e-300,
            ..GearSettings::default()
        };
        assert!(matches!(
            settings.validate(),
            Err(ParameterError::InvalidAngleStep(_))
        ));
        assert!(matches!(
            design(&settings),
            Err(ParameterError::InvalidAngleStep(_))
        ));

        let ratios = GearRatios {
            small: 1.0,
            big: 2.0,
        };
        let profile = nautilus_profile(ratios, 0.01, 1.0).expect("fine step is accepted");
        assert!(profile.points.len() <= MAX_PROFILE_POINTS + 1);
    }

    #[test]
    fn outline_sums_segment_lengths() {
        let points = [
            ProfilePoint {
                x: 0.0,
                y: 0.0,
                index: 0,
            },
            ProfilePoint {
                x: 3.0,
                y: 0.0,
                index: 1,
            },
            ProfilePoint {
                x: 3.0,
                y: 4.0,
                index: 2,
            },
        ];
        assert_close(outline_length(&points), 7.0, 1e-12);
        assert_eq!(outline_length(&points[..1]), 0.0);
    }

    #[test]
    fn output_velocity_uses_weighted_ratio() {
        let ratios = GearRatios {
            small: 3.0,
            big: 3.0,
        };
        let expected = (2.0 * 9.81 * 3.0 * 1.5f64).sqrt();
        assert_close(output_velocity(ratios, 1.5, 9.81), expected, 1e-9);
    }

    #[test]
    fn default_mechanism_design() {
        let settings = GearSettings::default();
        let gear = design(&settings).expect("defaults are valid");

        assert_eq!(gear.profile.points.len(), 361);
        assert_close(gear.plane_load_n, 15f64.to_radians().cos() * 0.048, 1e-12);
        assert_close(gear.impulse_n, 0.9494, 0.001);
        assert!(gear.ratios.small > 0.0);
        assert!(gear.ratios.big > gear.ratios.small);
        assert!(gear.outline_length > 0.0);
        assert!(gear.output_velocity_mps > 0.0);
    }

    #[test]
    fn explicit_friction_sources_replace_defaults() {
        let settings = GearSettings {
            friction_sources: Some(vec![]),
            ..GearSettings::default()
        };
        let gear = design(&settings).expect("valid settings");
        assert_eq!(gear.resistance.static_n, 0.0);
        assert_eq!(gear.pull_force_max_n, gear.plane_load_n);
    }
}
