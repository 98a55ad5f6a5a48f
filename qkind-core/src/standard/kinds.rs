//! Standard quantity kinds.

use once_cell::sync::Lazy;

use super::units;
use crate::kind::QuantityKind;

fn kind(name: &str, symbol: &str, unit: &Lazy<crate::unit::Unit>, tags: &[&str]) -> QuantityKind {
    tags.iter()
        .fold(
            QuantityKind::builder(name, (**unit).clone()).symbol(symbol),
            |builder, tag| builder.tag(tag),
        )
        .build()
}

pub static DIMENSIONLESS: Lazy<QuantityKind> = Lazy::new(|| kind("Dimensionless", "1", &units::UNITLESS, &[]));

// geometry and kinematics
pub static LENGTH: Lazy<QuantityKind> = Lazy::new(|| kind("Length", "L", &units::METRE, &["geometric"]));
pub static AREA: Lazy<QuantityKind> = Lazy::new(|| kind("Area", "A", &units::SQUARE_METRE, &["geometric"]));
pub static VOLUME: Lazy<QuantityKind> = Lazy::new(|| kind("Volume", "V", &units::CUBIC_METRE, &["geometric"]));
pub static ANGLE: Lazy<QuantityKind> =
    Lazy::new(|| kind("Angle", "θ", &units::RADIAN, &["geometric", "rotational"]));
pub static TIME: Lazy<QuantityKind> = Lazy::new(|| kind("Time", "t", &units::SECOND, &["temporal"]));
pub static FREQUENCY: Lazy<QuantityKind> = Lazy::new(|| kind("Frequency", "f", &units::HERTZ, &["temporal"]));
pub static VELOCITY: Lazy<QuantityKind> =
    Lazy::new(|| kind("Velocity", "v", &units::METRE_PER_SECOND, &["kinematic"]));
pub static ACCELERATION: Lazy<QuantityKind> =
    Lazy::new(|| kind("Acceleration", "a", &units::METRE_PER_SECOND_SQUARED, &["kinematic"]));

// mechanics
pub static MASS: Lazy<QuantityKind> = Lazy::new(|| kind("Mass", "m", &units::KILOGRAM, &["mechanical"]));
pub static FORCE: Lazy<QuantityKind> = Lazy::new(|| kind("Force", "F", &units::NEWTON, &["mechanical"]));
pub static PRESSURE: Lazy<QuantityKind> = Lazy::new(|| kind("Pressure", "p", &units::PASCAL, &["mechanical"]));
pub static ENERGY: Lazy<QuantityKind> =
    Lazy::new(|| kind("Energy", "E", &units::JOULE, &["mechanical", "thermal", "electrical"]));
/// Same dimension as [`ENERGY`], distinct kind.
pub static TORQUE: Lazy<QuantityKind> =
    Lazy::new(|| kind("Torque", "τ", &units::NEWTON_METRE, &["mechanical", "rotational"]));
pub static POWER: Lazy<QuantityKind> =
    Lazy::new(|| kind("Power", "P", &units::WATT, &["mechanical", "electrical"]));

// electromagnetism
pub static ELECTRIC_CURRENT: Lazy<QuantityKind> =
    Lazy::new(|| kind("ElectricCurrent", "I", &units::AMPERE, &["electrical"]));
pub static ELECTRIC_CHARGE: Lazy<QuantityKind> =
    Lazy::new(|| kind("ElectricCharge", "Q", &units::COULOMB, &["electrical"]));
pub static VOLTAGE: Lazy<QuantityKind> = Lazy::new(|| kind("Voltage", "U", &units::VOLT, &["electrical"]));
pub static MAGNETIC_FLUX: Lazy<QuantityKind> =
    Lazy::new(|| kind("MagneticFlux", "Φ", &units::WEBER, &["magnetic"]));
pub static MAGNETIC_FLUX_DENSITY: Lazy<QuantityKind> =
    Lazy::new(|| kind("MagneticFluxDensity", "B", &units::TESLA, &["magnetic"]));

// thermodynamics
pub static TEMPERATURE_DELTA: Lazy<QuantityKind> =
    Lazy::new(|| kind("TemperatureDelta", "ΔT", &units::KELVIN, &["thermal"]));
/// A point on the thermodynamic scale; differences are [`TEMPERATURE_DELTA`].
pub static ABSOLUTE_TEMPERATURE: Lazy<QuantityKind> = Lazy::new(|| {
    QuantityKind::builder("AbsoluteTemperature", units::KELVIN.clone())
        .symbol("T")
        .point_of(&TEMPERATURE_DELTA)
        .tag("thermal")
        .build()
});

/// Every standard kind.
pub fn all() -> Vec<QuantityKind> {
    [
        &DIMENSIONLESS,
        &LENGTH,
        &AREA,
        &VOLUME,
        &ANGLE,
        &TIME,
        &FREQUENCY,
        &VELOCITY,
        &ACCELERATION,
        &MASS,
        &FORCE,
        &PRESSURE,
        &ENERGY,
        &TORQUE,
        &POWER,
        &ELECTRIC_CURRENT,
        &ELECTRIC_CHARGE,
        &VOLTAGE,
        &MAGNETIC_FLUX,
        &MAGNETIC_FLUX_DENSITY,
        &TEMPERATURE_DELTA,
        &ABSOLUTE_TEMPERATURE,
    ]
    .into_iter()
    .map(|kind| (**kind).clone())
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn names_are_unique() {
        let kinds = all();
        let names: HashSet<&str> = kinds.iter().map(QuantityKind::name).collect();
        assert_eq!(names.len(), kinds.len());
        assert_eq!(kinds.len(), 22);
    }

    #[test]
    fn tags_are_interned() {
        let first = ENERGY.tags().find(|tag| tag.name() == "mechanical").cloned();
        let second = FORCE.tags().find(|tag| tag.name() == "mechanical").cloned();
        assert!(first.is_some());
        assert_eq!(first, second);
    }

    #[test]
    fn only_absolute_temperature_is_point_like() {
        let points: Vec<_> = all().into_iter().filter(QuantityKind::is_point_like).collect();
        assert_eq!(points, vec![ABSOLUTE_TEMPERATURE.clone()]);
    }

    #[test]
    fn angle_is_dimensionless() {
        assert!(ANGLE.is_dimensionless());
        assert!(DIMENSIONLESS.is_dimensionless());
        assert!(!LENGTH.is_dimensionless());
    }
}
