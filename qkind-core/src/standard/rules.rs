//! Standard inference rules.

use once_cell::sync::Lazy;

use super::kinds::*;
use crate::error::RegistryError;
use crate::rules::{InferenceRule, RuleRegistry, RuleSet};

/// The standard rules in registration order.
///
/// Multiplications are commutative; divisions only resolve in the listed direction, so `Force / Pressure` is an
/// `Area` while `Pressure / Force` has no rule.
pub fn all() -> Vec<InferenceRule> {
    vec![
        // geometry
        InferenceRule::multiply(&LENGTH, &LENGTH, &AREA),
        InferenceRule::multiply(&AREA, &LENGTH, &VOLUME),
        InferenceRule::divide(&AREA, &LENGTH, &LENGTH),
        InferenceRule::divide(&VOLUME, &AREA, &LENGTH),
        // kinematics
        InferenceRule::divide(&LENGTH, &TIME, &VELOCITY),
        InferenceRule::multiply(&VELOCITY, &TIME, &LENGTH),
        InferenceRule::divide(&VELOCITY, &TIME, &ACCELERATION),
        InferenceRule::multiply(&ACCELERATION, &TIME, &VELOCITY),
        InferenceRule::divide(&DIMENSIONLESS, &TIME, &FREQUENCY),
        InferenceRule::multiply(&FREQUENCY, &TIME, &DIMENSIONLESS),
        // mechanics
        InferenceRule::multiply(&MASS, &ACCELERATION, &FORCE),
        InferenceRule::divide(&FORCE, &MASS, &ACCELERATION),
        InferenceRule::divide(&FORCE, &ACCELERATION, &MASS),
        InferenceRule::multiply(&FORCE, &LENGTH, &ENERGY),
        InferenceRule::multiply(&PRESSURE, &AREA, &FORCE),
        InferenceRule::divide(&FORCE, &AREA, &PRESSURE),
        InferenceRule::divide(&FORCE, &PRESSURE, &AREA),
        InferenceRule::multiply(&TORQUE, &ANGLE, &ENERGY),
        InferenceRule::divide(&ENERGY, &ANGLE, &TORQUE),
        InferenceRule::multiply(&POWER, &TIME, &ENERGY),
        InferenceRule::divide(&ENERGY, &TIME, &POWER),
        InferenceRule::divide(&ENERGY, &POWER, &TIME),
        InferenceRule::multiply(&FORCE, &VELOCITY, &POWER),
        // electromagnetism
        InferenceRule::multiply(&ELECTRIC_CURRENT, &TIME, &ELECTRIC_CHARGE),
        InferenceRule::divide(&ELECTRIC_CHARGE, &TIME, &ELECTRIC_CURRENT),
        InferenceRule::multiply(&VOLTAGE, &ELECTRIC_CURRENT, &POWER),
        InferenceRule::divide(&POWER, &ELECTRIC_CURRENT, &VOLTAGE),
        InferenceRule::divide(&ENERGY, &ELECTRIC_CHARGE, &VOLTAGE),
        InferenceRule::divide(&MAGNETIC_FLUX, &AREA, &MAGNETIC_FLUX_DENSITY),
        InferenceRule::multiply(&MAGNETIC_FLUX_DENSITY, &AREA, &MAGNETIC_FLUX),
    ]
}

/// An unsealed registry holding the standard rules, ready for more.
pub fn standard_registry() -> Result<RuleRegistry, RegistryError> {
    let mut registry = RuleRegistry::new();
    registry.register_all(all())?;
    Ok(registry)
}

static STANDARD_RULES: Lazy<RuleSet> = Lazy::new(|| {
    standard_registry()
        .unwrap_or_else(|err| panic!("standard rule catalog is inconsistent: {err}"))
        .freeze()
});

/// The standard rules, frozen.
///
/// # Panics
///
/// On first use, if the built-in catalog holds two rules for the same key with different results.
pub fn standard_rules() -> RuleSet {
    STANDARD_RULES.clone()
}
