//! Standard units.
//!
//! Ratios are relative to the coherent SI unit of each dimension. The affine temperature scales convert with
//! `kelvin = value · ratio + offset`.

use once_cell::sync::Lazy;

use super::dimensions::{
    AMOUNT_OF_SUBSTANCE, ELECTRIC_CURRENT, LENGTH, LUMINOUS_INTENSITY, MASS, TEMPERATURE, TIME,
};
use crate::dimension::Dimension;
use crate::unit::Unit;

fn dimension_of(factors: &[(&Dimension, i32)]) -> Dimension {
    factors
        .iter()
        .fold(Dimension::none(), |acc, (dimension, exponent)| {
            acc.multiply(&dimension.pow(*exponent))
        })
}

// ─────────────────────────────────────────────────────────────────────────────
// SI base units
// ─────────────────────────────────────────────────────────────────────────────

pub static METRE: Lazy<Unit> = Lazy::new(|| Unit::base("m", "metre", LENGTH.clone()));
pub static KILOGRAM: Lazy<Unit> = Lazy::new(|| Unit::base("kg", "kilogram", MASS.clone()));
pub static SECOND: Lazy<Unit> = Lazy::new(|| Unit::base("s", "second", TIME.clone()));
pub static AMPERE: Lazy<Unit> = Lazy::new(|| Unit::base("A", "ampere", ELECTRIC_CURRENT.clone()));
pub static KELVIN: Lazy<Unit> = Lazy::new(|| Unit::base("K", "kelvin", TEMPERATURE.clone()));
pub static MOLE: Lazy<Unit> = Lazy::new(|| Unit::base("mol", "mole", AMOUNT_OF_SUBSTANCE.clone()));
pub static CANDELA: Lazy<Unit> = Lazy::new(|| Unit::base("cd", "candela", LUMINOUS_INTENSITY.clone()));

/// The dimensionless unit `1`.
pub static UNITLESS: Lazy<Unit> = Lazy::new(Unit::none);

// ─────────────────────────────────────────────────────────────────────────────
// Named derived units
// ─────────────────────────────────────────────────────────────────────────────

pub static NEWTON: Lazy<Unit> = Lazy::new(|| {
    Unit::base("N", "newton", dimension_of(&[(&*MASS, 1), (&*LENGTH, 1), (&*TIME, -2)]))
});
pub static JOULE: Lazy<Unit> = Lazy::new(|| {
    Unit::base("J", "joule", dimension_of(&[(&*MASS, 1), (&*LENGTH, 2), (&*TIME, -2)]))
});
pub static PASCAL: Lazy<Unit> = Lazy::new(|| {
    Unit::base("Pa", "pascal", dimension_of(&[(&*MASS, 1), (&*LENGTH, -1), (&*TIME, -2)]))
});
pub static WATT: Lazy<Unit> = Lazy::new(|| {
    Unit::base("W", "watt", dimension_of(&[(&*MASS, 1), (&*LENGTH, 2), (&*TIME, -3)]))
});
pub static HERTZ: Lazy<Unit> = Lazy::new(|| Unit::base("Hz", "hertz", dimension_of(&[(&*TIME, -1)])));
pub static COULOMB: Lazy<Unit> = Lazy::new(|| {
    Unit::base("C", "coulomb", dimension_of(&[(&*ELECTRIC_CURRENT, 1), (&*TIME, 1)]))
});
pub static VOLT: Lazy<Unit> = Lazy::new(|| {
    Unit::base(
        "V",
        "volt",
        dimension_of(&[(&*MASS, 1), (&*LENGTH, 2), (&*TIME, -3), (&*ELECTRIC_CURRENT, -1)]),
    )
});
pub static WEBER: Lazy<Unit> = Lazy::new(|| {
    Unit::base(
        "Wb",
        "weber",
        dimension_of(&[(&*MASS, 1), (&*LENGTH, 2), (&*TIME, -2), (&*ELECTRIC_CURRENT, -1)]),
    )
});
pub static TESLA: Lazy<Unit> = Lazy::new(|| {
    Unit::base(
        "T",
        "tesla",
        dimension_of(&[(&*MASS, 1), (&*TIME, -2), (&*ELECTRIC_CURRENT, -1)]),
    )
});
/// Radian; dimensionless.
pub static RADIAN: Lazy<Unit> = Lazy::new(|| Unit::base("rad", "radian", Dimension::none()));

// ─────────────────────────────────────────────────────────────────────────────
// Composite and scaled units
// ─────────────────────────────────────────────────────────────────────────────

pub static SQUARE_METRE: Lazy<Unit> = Lazy::new(|| &*METRE ^ 2);
pub static CUBIC_METRE: Lazy<Unit> = Lazy::new(|| &*METRE ^ 3);
pub static METRE_PER_SECOND: Lazy<Unit> = Lazy::new(|| &*METRE / &*SECOND);
pub static METRE_PER_SECOND_SQUARED: Lazy<Unit> = Lazy::new(|| &*METRE / &(&*SECOND ^ 2));
pub static NEWTON_METRE: Lazy<Unit> = Lazy::new(|| &*NEWTON * &*METRE);

pub static KILOMETRE: Lazy<Unit> = Lazy::new(|| Unit::derived("km", "kilometre", LENGTH.clone(), 1.0e3));
pub static CENTIMETRE: Lazy<Unit> = Lazy::new(|| Unit::derived("cm", "centimetre", LENGTH.clone(), 1.0e-2));
pub static GRAM: Lazy<Unit> = Lazy::new(|| Unit::derived("g", "gram", MASS.clone(), 1.0e-3));
pub static MINUTE: Lazy<Unit> = Lazy::new(|| Unit::derived("min", "minute", TIME.clone(), 60.0));
pub static HOUR: Lazy<Unit> = Lazy::new(|| Unit::derived("h", "hour", TIME.clone(), 3600.0));

// ─────────────────────────────────────────────────────────────────────────────
// Affine temperature scales
// ─────────────────────────────────────────────────────────────────────────────

pub static CELSIUS: Lazy<Unit> =
    Lazy::new(|| Unit::affine("°C", "degree Celsius", TEMPERATURE.clone(), 1.0, 273.15));
pub static FAHRENHEIT: Lazy<Unit> = Lazy::new(|| {
    Unit::affine(
        "°F",
        "degree Fahrenheit",
        TEMPERATURE.clone(),
        5.0 / 9.0,
        273.15 - 32.0 * 5.0 / 9.0,
    )
});

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn named_units_match_their_definitions() {
        assert_eq!(JOULE.dimension(), NEWTON_METRE.dimension());
        assert_eq!(NEWTON.dimension(), (&*KILOGRAM * &*METRE_PER_SECOND_SQUARED).dimension());
        assert_eq!(PASCAL.dimension(), (&*NEWTON / &*SQUARE_METRE).dimension());
        assert_eq!(WATT.dimension(), (&*JOULE / &*SECOND).dimension());
        assert_eq!(WEBER.dimension(), (&*TESLA * &*SQUARE_METRE).dimension());
        assert_eq!(VOLT.dimension(), (&*WATT / &*AMPERE).dimension());
        assert_eq!(COULOMB.dimension(), (&*AMPERE * &*SECOND).dimension());
        assert_eq!(HERTZ.dimension(), (&*UNITLESS / &*SECOND).dimension());
        assert!(RADIAN.is_dimensionless());
    }

    #[test]
    fn scaled_units() {
        assert_relative_eq!(KILOMETRE.ratio(), 1000.0);
        assert_relative_eq!((&*KILOMETRE / &*HOUR).ratio(), 1.0 / 3.6);
        assert_relative_eq!(GRAM.ratio(), 1.0e-3);
        assert_eq!(METRE_PER_SECOND_SQUARED.to_string(), "m/s^2");
    }

    #[test]
    fn temperature_scales_are_affine() {
        assert!(CELSIUS.is_affine());
        assert!(FAHRENHEIT.is_affine());
        assert!(!KELVIN.is_affine());
        assert_eq!(CELSIUS.dimension(), KELVIN.dimension());
    }
}
