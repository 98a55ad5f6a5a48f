//! Numeric value paired with a unit.

use core::fmt::{Display, Formatter, Result as FmtResult};

use crate::dimension::Dimension;
use crate::error::UnitError;
use crate::unit::Unit;

/// A value expressed in a [`Unit`].
///
/// ```rust
/// use qkind_core::standard::units;
/// use qkind_core::Measurement;
///
/// let d = Measurement::new(1.5, units::KILOMETRE.clone());
/// let m = d.convert_to(&units::METRE).unwrap();
/// assert!((m.value() - 1500.0).abs() < 1e-9);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct Measurement {
    value: f64,
    unit: Unit,
}

impl Measurement {
    #[inline]
    pub fn new(value: f64, unit: Unit) -> Self {
        Self { value, unit }
    }

    #[inline]
    pub fn value(&self) -> f64 {
        self.value
    }

    #[inline]
    pub fn unit(&self) -> &Unit {
        &self.unit
    }

    pub fn dimension(&self) -> Dimension {
        self.unit.dimension()
    }

    fn same_dimension(&self, target: &Unit) -> Result<(), UnitError> {
        let expected = target.dimension();
        let found = self.dimension();
        if expected == found {
            Ok(())
        } else {
            Err(UnitError::DimensionMismatch {
                expected: expected.to_string(),
                found: found.to_string(),
            })
        }
    }

    /// Converts an absolute reading (`canonical = value · ratio + offset`).
    pub fn convert_to(&self, target: &Unit) -> Result<Self, UnitError> {
        self.same_dimension(target)?;
        let canonical = self.value * self.unit.ratio() + self.unit.offset();
        Ok(Self::new((canonical - target.offset()) / target.ratio(), target.clone()))
    }

    /// Converts a difference between two readings; offsets cancel, only ratios apply.
    pub fn convert_delta_to(&self, target: &Unit) -> Result<Self, UnitError> {
        self.same_dimension(target)?;
        Ok(Self::new(self.value * self.unit.ratio() / target.ratio(), target.clone()))
    }

    /// Sum expressed in `self`'s unit.
    pub fn checked_add(&self, rhs: &Self) -> Result<Self, UnitError> {
        let rhs = rhs.convert_to(&self.unit)?;
        Ok(Self::new(self.value + rhs.value, self.unit.clone()))
    }

    /// Difference expressed in `self`'s unit.
    pub fn checked_sub(&self, rhs: &Self) -> Result<Self, UnitError> {
        let rhs = rhs.convert_to(&self.unit)?;
        Ok(Self::new(self.value - rhs.value, self.unit.clone()))
    }

    pub fn checked_mul(&self, rhs: &Self) -> Result<Self, UnitError> {
        Ok(Self::new(self.value * rhs.value, self.unit.try_mul(&rhs.unit)?))
    }

    pub fn checked_div(&self, rhs: &Self) -> Result<Self, UnitError> {
        Ok(Self::new(self.value / rhs.value, self.unit.try_div(&rhs.unit)?))
    }

    /// Multiplies the value by a plain number, keeping the unit.
    pub fn scale(&self, factor: f64) -> Self {
        Self::new(self.value * factor, self.unit.clone())
    }
}

impl Display for Measurement {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        if self.unit.expr().is_identity() {
            write!(f, "{}", self.value)
        } else {
            write!(f, "{} {}", self.value, self.unit)
        }
    }
}
