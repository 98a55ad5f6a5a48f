//! Quantity type: a measurement tagged with its semantic kind.
//!
//! Addition and subtraction follow the point/delta rules of the kinds involved:
//!
//! | operation               | allowed when                                  | result kind      |
//! |-------------------------|-----------------------------------------------|------------------|
//! | `k + k`                 | `k` allows direct addition                    | `k`              |
//! | `k - k`                 | `k` allows direct subtraction                 | `k`              |
//! | `point - point`         | `point` has a difference kind                 | difference kind  |
//! | `point ± delta`         | `delta` is the difference kind of `point`     | `point`          |
//! | `delta + point`         | `delta` is the difference kind of `point`     | `point`          |
//!
//! Multiplication and division ask an [`InferenceEngine`] for the result kind. When no rule applies and exactly one
//! operand is dimensionless, the other operand's kind is kept, unless that kind is point-like. Division keeps only the
//! dividend's kind: `x / ratio` is an `x`, while `ratio / x` needs a rule of its own.

use core::fmt::{Display, Formatter, Result as FmtResult};

use crate::error::{InferenceError, KindError};
use crate::inference::InferenceEngine;
use crate::kind::QuantityKind;
use crate::measurement::Measurement;
use crate::rules::Operator;
use crate::unit::Unit;

/// A [`Measurement`] with a [`QuantityKind`].
///
/// # Examples
///
/// ```rust
/// use qkind_core::standard::{kinds, units};
/// use qkind_core::{InferenceEngine, Measurement, Quantity};
///
/// let force = Quantity::of(100.0, &kinds::FORCE);
/// let arm = Quantity::new(Measurement::new(200.0, units::CENTIMETRE.clone()), &kinds::LENGTH).unwrap();
/// let work = force.checked_mul(&arm, InferenceEngine::global()).unwrap();
/// assert_eq!(work.kind(), &*kinds::ENERGY);
/// let joules = work.convert_to(&units::JOULE).unwrap();
/// assert!((joules.value() - 200.0).abs() < 1e-9);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct Quantity {
    measurement: Measurement,
    kind: QuantityKind,
}

impl Quantity {
    /// Fails when the measurement's dimension is not the kind's.
    pub fn new(measurement: Measurement, kind: &QuantityKind) -> Result<Self, KindError> {
        check_dimension(&measurement, kind)?;
        Ok(Self::new_unchecked(measurement, kind))
    }

    pub fn new_unchecked(measurement: Measurement, kind: &QuantityKind) -> Self {
        Self {
            measurement,
            kind: kind.clone(),
        }
    }

    /// `value` in the canonical unit of `kind`.
    pub fn of(value: f64, kind: &QuantityKind) -> Self {
        Self::new_unchecked(Measurement::new(value, kind.canonical_unit().clone()), kind)
    }

    #[inline]
    pub fn value(&self) -> f64 {
        self.measurement.value()
    }

    #[inline]
    pub fn unit(&self) -> &Unit {
        self.measurement.unit()
    }

    #[inline]
    pub fn kind(&self) -> &QuantityKind {
        &self.kind
    }

    #[inline]
    pub fn measurement(&self) -> &Measurement {
        &self.measurement
    }

    /// Same kind, expressed in `unit`.
    pub fn convert_to(&self, unit: &Unit) -> Result<Self, KindError> {
        let measurement = self.measurement.convert_to(unit)?;
        Ok(Self::new_unchecked(measurement, &self.kind))
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Additive
    // ─────────────────────────────────────────────────────────────────────────

    pub fn checked_add(&self, rhs: &Self) -> Result<Self, KindError> {
        if self.kind == rhs.kind {
            if !self.kind.allows_addition() {
                return Err(KindError::AdditionNotAllowed {
                    kind: self.kind.clone(),
                });
            }
            let sum = self.measurement.checked_add(&rhs.measurement)?;
            return Ok(Self::new_unchecked(sum, &self.kind));
        }
        if self.kind.difference_kind() == Some(&rhs.kind) {
            return self.shifted(rhs, 1.0);
        }
        if rhs.kind.difference_kind() == Some(&self.kind) {
            return rhs.shifted(self, 1.0);
        }
        Err(self.incompatible("add", rhs))
    }

    pub fn checked_sub(&self, rhs: &Self) -> Result<Self, KindError> {
        if self.kind == rhs.kind {
            if self.kind.allows_subtraction() {
                let difference = self.measurement.checked_sub(&rhs.measurement)?;
                return Ok(Self::new_unchecked(difference, &self.kind));
            }
            let Some(delta) = self.kind.difference_kind() else {
                return Err(KindError::SubtractionNotAllowed {
                    kind: self.kind.clone(),
                });
            };
            let unit = delta.canonical_unit();
            let a = self.measurement.convert_to(unit)?;
            let b = rhs.measurement.convert_to(unit)?;
            return Ok(Self::new_unchecked(
                Measurement::new(a.value() - b.value(), unit.clone()),
                delta,
            ));
        }
        if self.kind.difference_kind() == Some(&rhs.kind) {
            return self.shifted(rhs, -1.0);
        }
        Err(self.incompatible("subtract", rhs))
    }

    /// `self` (a point) moved by `sign · delta`, in `self`'s unit.
    fn shifted(&self, delta: &Self, sign: f64) -> Result<Self, KindError> {
        let delta = delta.measurement.convert_delta_to(self.unit())?;
        Ok(Self::new_unchecked(
            Measurement::new(self.value() + sign * delta.value(), self.unit().clone()),
            &self.kind,
        ))
    }

    fn incompatible(&self, operation: &'static str, rhs: &Self) -> KindError {
        KindError::IncompatibleKinds {
            operation,
            left: self.kind.clone(),
            right: rhs.kind.clone(),
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Multiplicative
    // ─────────────────────────────────────────────────────────────────────────

    pub fn checked_mul(&self, rhs: &Self, engine: &InferenceEngine) -> Result<Self, KindError> {
        let kind = result_kind(&self.kind, Operator::Multiply, &rhs.kind, engine)?;
        let measurement = self.measurement.checked_mul(&rhs.measurement)?;
        self.finish(measurement, kind, engine)
    }

    /// Divides, asking `engine` for the result kind.
    ///
    /// A dimensionless divisor keeps this quantity's kind. A dimensionless dividend does not take the divisor's kind,
    /// since the reciprocal is a different kind: without a rule, `Dimensionless / x` fails with
    /// [`KindError::NoInference`].
    pub fn checked_div(&self, rhs: &Self, engine: &InferenceEngine) -> Result<Self, KindError> {
        let kind = result_kind(&self.kind, Operator::Divide, &rhs.kind, engine)?;
        let measurement = self.measurement.checked_div(&rhs.measurement)?;
        self.finish(measurement, kind, engine)
    }

    fn finish(&self, measurement: Measurement, kind: QuantityKind, engine: &InferenceEngine) -> Result<Self, KindError> {
        if engine.settings().validate_dimensions {
            check_dimension(&measurement, &kind)?;
        }
        Ok(Self::new_unchecked(measurement, &kind))
    }

    /// Multiplies by a plain number. Point-like kinds refuse.
    pub fn checked_scale(&self, factor: f64) -> Result<Self, KindError> {
        if self.kind.is_point_like() {
            return Err(KindError::PointScaling {
                kind: self.kind.clone(),
            });
        }
        Ok(Self::new_unchecked(self.measurement.scale(factor), &self.kind))
    }

    fn operator_add(&self, rhs: &Self) -> Self {
        self.checked_add(rhs).unwrap_or_else(|err| panic!("{err}"))
    }

    fn operator_sub(&self, rhs: &Self) -> Self {
        self.checked_sub(rhs).unwrap_or_else(|err| panic!("{err}"))
    }

    fn operator_mul(&self, rhs: &Self) -> Self {
        self.checked_mul(rhs, InferenceEngine::global())
            .unwrap_or_else(|err| panic!("{err}"))
    }

    fn operator_div(&self, rhs: &Self) -> Self {
        self.checked_div(rhs, InferenceEngine::global())
            .unwrap_or_else(|err| panic!("{err}"))
    }
}

fn check_dimension(measurement: &Measurement, kind: &QuantityKind) -> Result<(), KindError> {
    let found = measurement.dimension();
    if found == *kind.dimension() {
        Ok(())
    } else {
        Err(KindError::DimensionMismatch {
            kind: kind.clone(),
            expected: kind.dimension().to_string(),
            found: found.to_string(),
        })
    }
}

fn result_kind(
    left: &QuantityKind,
    operator: Operator,
    right: &QuantityKind,
    engine: &InferenceEngine,
) -> Result<QuantityKind, KindError> {
    match engine.infer(left, operator, right) {
        Ok(kind) => Ok(kind),
        Err(InferenceError::NoPath { .. } | InferenceError::TransitiveDisabled { .. }) => {
            dimensionless_fallback(left, operator, right)
        }
        Err(err) => Err(err.into()),
    }
}

fn dimensionless_fallback(
    left: &QuantityKind,
    operator: Operator,
    right: &QuantityKind,
) -> Result<QuantityKind, KindError> {
    let kept = match (left.is_dimensionless(), right.is_dimensionless(), operator) {
        (false, true, _) => left,
        (true, false, Operator::Multiply) => right,
        _ => {
            return Err(KindError::NoInference {
                left: left.clone(),
                operator,
                right: right.clone(),
            })
        }
    };
    if kept.is_point_like() {
        return Err(KindError::PointScaling { kind: kept.clone() });
    }
    Ok(kept.clone())
}

impl Display for Quantity {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{} ({})", self.measurement, self.kind)
    }
}

// Operator forms.
//
// # Panics
//
// Whenever the matching `checked_*` method fails. `*` and `/` use the process-wide engine
// ([`InferenceEngine::global`]).
crate::macros::forward_binary_op!(impl[] Add, add => operator_add for Quantity, output Quantity);
crate::macros::forward_binary_op!(impl[] Sub, sub => operator_sub for Quantity, output Quantity);
crate::macros::forward_binary_op!(impl[] Mul, mul => operator_mul for Quantity, output Quantity);
crate::macros::forward_binary_op!(impl[] Div, div => operator_div for Quantity, output Quantity);

impl core::ops::Mul<f64> for Quantity {
    type Output = Quantity;

    /// # Panics
    ///
    /// For point-like kinds.
    fn mul(self, factor: f64) -> Quantity {
        self.checked_scale(factor).unwrap_or_else(|err| panic!("{err}"))
    }
}

impl core::ops::Mul<Quantity> for f64 {
    type Output = Quantity;

    fn mul(self, quantity: Quantity) -> Quantity {
        quantity * self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::InferenceSettings;
    use crate::standard::{kinds, standard_rules, units};
    use approx::assert_relative_eq;

    fn engine() -> InferenceEngine {
        InferenceEngine::new(standard_rules())
    }

    fn celsius(value: f64) -> Quantity {
        Quantity::new(Measurement::new(value, units::CELSIUS.clone()), &kinds::ABSOLUTE_TEMPERATURE).unwrap()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Construction
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn construction_checks_dimension() {
        let ok = Quantity::new(Measurement::new(3.0, units::KILOMETRE.clone()), &kinds::LENGTH);
        assert!(ok.is_ok());
        let err = Quantity::new(Measurement::new(3.0, units::SECOND.clone()), &kinds::LENGTH).unwrap_err();
        assert!(matches!(err, KindError::DimensionMismatch { .. }));
    }

    #[test]
    fn conversion_keeps_kind() {
        let d = Quantity::of(1500.0, &kinds::LENGTH).convert_to(&units::KILOMETRE).unwrap();
        assert_relative_eq!(d.value(), 1.5);
        assert_eq!(d.kind(), &*kinds::LENGTH);
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Addition and subtraction
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn same_kind_addition() {
        let a = Quantity::of(2.0, &kinds::LENGTH);
        let b = Quantity::new(Measurement::new(1.0, units::KILOMETRE.clone()), &kinds::LENGTH).unwrap();
        let sum = a.checked_add(&b).unwrap();
        assert_relative_eq!(sum.value(), 1002.0);
        assert_relative_eq!(b.checked_sub(&a).unwrap().value(), 0.998);
    }

    #[test]
    fn unrelated_kinds_do_not_add() {
        let energy = Quantity::of(1.0, &kinds::ENERGY);
        let torque = Quantity::of(1.0, &kinds::TORQUE);
        assert!(matches!(
            energy.checked_add(&torque),
            Err(KindError::IncompatibleKinds { operation: "add", .. })
        ));
    }

    #[test]
    fn point_minus_point_is_delta() {
        let diff = celsius(30.0).checked_sub(&celsius(10.0)).unwrap();
        assert_eq!(diff.kind(), &*kinds::TEMPERATURE_DELTA);
        assert_relative_eq!(diff.value(), 20.0, epsilon = 1e-9);
        assert_eq!(diff.unit(), &*units::KELVIN);
    }

    #[test]
    fn point_plus_point_fails() {
        assert!(matches!(
            celsius(1.0).checked_add(&celsius(2.0)),
            Err(KindError::AdditionNotAllowed { .. })
        ));
    }

    #[test]
    fn point_and_delta_mix() {
        let delta = Quantity::of(5.0, &kinds::TEMPERATURE_DELTA);
        let warmer = celsius(10.0).checked_add(&delta).unwrap();
        assert_eq!(warmer.kind(), &*kinds::ABSOLUTE_TEMPERATURE);
        assert_eq!(warmer.unit(), &*units::CELSIUS);
        assert_relative_eq!(warmer.value(), 15.0);

        let also_warmer = delta.checked_add(&celsius(10.0)).unwrap();
        assert_relative_eq!(also_warmer.value(), 15.0);

        let cooler = celsius(10.0).checked_sub(&delta).unwrap();
        assert_relative_eq!(cooler.value(), 5.0);

        assert!(matches!(
            delta.checked_sub(&celsius(10.0)),
            Err(KindError::IncompatibleKinds { operation: "subtract", .. })
        ));
    }

    #[test]
    fn subtraction_without_difference_kind() {
        let counter = QuantityKind::builder("Counter", Unit::none())
            .allow_subtraction(false)
            .build();
        let a = Quantity::of(3.0, &counter);
        assert!(matches!(
            a.checked_sub(&a),
            Err(KindError::SubtractionNotAllowed { .. })
        ));
        assert_relative_eq!(a.checked_add(&a).unwrap().value(), 6.0);
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Multiplication and division
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn inferred_products() {
        let engine = engine();
        let energy = Quantity::of(100.0, &kinds::FORCE)
            .checked_mul(&Quantity::of(2.0, &kinds::LENGTH), &engine)
            .unwrap();
        assert_eq!(energy.kind(), &*kinds::ENERGY);
        assert_relative_eq!(energy.value(), 200.0);

        let area = Quantity::of(10.0, &kinds::FORCE)
            .checked_div(&Quantity::of(5.0, &kinds::PRESSURE), &engine)
            .unwrap();
        assert_eq!(area.kind(), &*kinds::AREA);
        assert_relative_eq!(area.value(), 2.0);
    }

    #[test]
    fn divide_rules_are_directional() {
        let engine = engine();
        let result = Quantity::of(5.0, &kinds::PRESSURE).checked_div(&Quantity::of(10.0, &kinds::FORCE), &engine);
        assert!(matches!(result, Err(KindError::NoInference { .. })));
    }

    #[test]
    fn dimensionless_operand_keeps_kind() {
        let engine = engine();
        let ratio = Quantity::of(3.0, &kinds::DIMENSIONLESS);
        let force = Quantity::of(2.0, &kinds::FORCE);
        assert_eq!(force.checked_mul(&ratio, &engine).unwrap().kind(), &*kinds::FORCE);
        assert_eq!(ratio.checked_mul(&force, &engine).unwrap().kind(), &*kinds::FORCE);
        let halved = force.checked_div(&ratio, &engine).unwrap();
        assert_relative_eq!(halved.value(), 2.0 / 3.0);
        assert!(matches!(
            ratio.checked_div(&force, &engine),
            Err(KindError::NoInference { .. })
        ));
    }

    #[test]
    fn dimensionless_dividend_needs_a_rule() {
        let engine = engine();
        let one = Quantity::of(1.0, &kinds::DIMENSIONLESS);

        let rate = one.checked_div(&Quantity::of(4.0, &kinds::TIME), &engine).unwrap();
        assert_eq!(rate.kind(), &*kinds::FREQUENCY);
        assert_relative_eq!(rate.value(), 0.25);

        let err = one.checked_div(&Quantity::of(2.0, &kinds::MASS), &engine).unwrap_err();
        assert!(matches!(
            err,
            KindError::NoInference { ref left, operator: Operator::Divide, ref right }
                if *left == *kinds::DIMENSIONLESS && *right == *kinds::MASS
        ));
    }

    #[test]
    fn point_kinds_refuse_scaling() {
        let engine = engine();
        let ratio = Quantity::of(2.0, &kinds::DIMENSIONLESS);
        let kelvin = Quantity::of(300.0, &kinds::ABSOLUTE_TEMPERATURE);
        assert!(matches!(
            kelvin.checked_mul(&ratio, &engine),
            Err(KindError::PointScaling { .. })
        ));
        assert!(matches!(kelvin.checked_scale(2.0), Err(KindError::PointScaling { .. })));
        let delta = Quantity::of(3.0, &kinds::TEMPERATURE_DELTA);
        assert_relative_eq!(delta.checked_scale(2.0).unwrap().value(), 6.0);
    }

    #[test]
    fn affine_measurement_cannot_multiply() {
        let engine = engine();
        let ratio = Quantity::of(2.0, &kinds::DIMENSIONLESS);
        let err = celsius(20.0).checked_mul(&ratio, &engine).unwrap_err();
        // the kind is point-like, which is reported before the unit is touched
        assert!(matches!(err, KindError::PointScaling { .. }));

        let custom = QuantityKind::builder("Reading", units::KELVIN.clone()).build();
        let reading = Quantity::new(Measurement::new(20.0, units::CELSIUS.clone()), &custom).unwrap();
        assert!(matches!(
            reading.checked_mul(&ratio, &engine),
            Err(KindError::Unit(_))
        ));
    }

    #[test]
    fn direct_only_engine_still_falls_back() {
        let engine = InferenceEngine::with_settings(standard_rules(), InferenceSettings::DIRECT_ONLY);
        let ratio = Quantity::of(2.0, &kinds::DIMENSIONLESS);
        let length = Quantity::of(2.0, &kinds::LENGTH);
        assert_eq!(length.checked_mul(&ratio, &engine).unwrap().kind(), &*kinds::LENGTH);
    }

    #[test]
    fn operators_use_the_global_engine() {
        let p = Quantity::of(1000.0, &kinds::PRESSURE);
        let a = Quantity::of(2.0, &kinds::AREA);
        let l = Quantity::of(3.0, &kinds::LENGTH);
        let energy = &(&p * &a) * &l;
        assert_eq!(energy.kind(), &*kinds::ENERGY);
        assert_relative_eq!(energy.value(), 6000.0);
        assert_relative_eq!((2.0 * l.clone()).value(), 6.0);
        assert_relative_eq!((l.clone() + l).value(), 6.0);
    }

    #[test]
    #[should_panic(expected = "no inference rule")]
    fn operator_panics_without_rule() {
        let _ = Quantity::of(1.0, &kinds::ENERGY) / Quantity::of(1.0, &kinds::MASS);
    }

    #[test]
    fn display() {
        let q = Quantity::of(2.5, &kinds::FORCE);
        assert_eq!(q.to_string(), "2.5 N (Force)");
    }
}
