//! Unit types.
//!
//! A [`Unit`] is an expression over [`BaseUnit`] atoms. Every atom knows its [`Dimension`] and its conversion
//! `ratio` to the coherent SI unit of that dimension, so a composite unit's dimension and ratio follow from its
//! canonical factor set.
//!
//! Affine units (°C, °F) carry an offset and are *non-combinable*: they may be converted to and from, but never
//! multiplied, divided, raised to a power other than `0`/`1`, or rescaled. The `try_*` methods report this as a
//! [`UnitError::AffineComposition`]; the operator forms panic.

use core::fmt::{self, Debug, Display, Formatter};
use core::hash::{Hash, Hasher};
use std::cmp::Ordering;
use std::sync::Arc;

use crate::canonical::BASIS_LEN;
use crate::dimension::Dimension;
use crate::error::UnitError;
use crate::expr::{Atom, Expr, Node};

/// Symbols of the coherent SI base units, in fast-path vector order.
pub const SI_UNIT_BASIS: [&str; BASIS_LEN] = ["m", "kg", "s", "A", "K", "mol", "cd"];

/// An atomic, named **unit**.
///
/// * `ratio` is the conversion factor to the coherent SI unit of `dimension`: `1 km = 1000 m`, so the kilometre
///   has `ratio == 1000.0`.
/// * `offset` is only meaningful for affine units: `canonical = value · ratio + offset`.
///
/// Like every [`Atom`], identity is the symbol alone.
#[derive(Clone)]
pub struct BaseUnit {
    symbol: Arc<str>,
    name: Arc<str>,
    dimension: Dimension,
    ratio: f64,
    offset: f64,
    affine: bool,
}

impl BaseUnit {
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn dimension(&self) -> &Dimension {
        &self.dimension
    }

    pub fn ratio(&self) -> f64 {
        self.ratio
    }

    pub fn offset(&self) -> f64 {
        self.offset
    }

    pub fn is_affine(&self) -> bool {
        self.affine
    }
}

impl PartialEq for BaseUnit {
    fn eq(&self, other: &Self) -> bool {
        self.symbol == other.symbol
    }
}

impl Eq for BaseUnit {}

impl PartialOrd for BaseUnit {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for BaseUnit {
    fn cmp(&self, other: &Self) -> Ordering {
        self.symbol.cmp(&other.symbol)
    }
}

impl Hash for BaseUnit {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.symbol.hash(state);
    }
}

impl Debug for BaseUnit {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("BaseUnit")
            .field("symbol", &self.symbol)
            .field("dimension", &self.dimension.to_string())
            .field("ratio", &self.ratio)
            .field("offset", &self.offset)
            .finish()
    }
}

impl Display for BaseUnit {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.symbol)
    }
}

impl Atom for BaseUnit {
    fn symbol(&self) -> &str {
        &self.symbol
    }

    fn basis_index(&self) -> Option<usize> {
        SI_UNIT_BASIS.iter().position(|symbol| *symbol == &*self.symbol)
    }
}

/// A unit expression.
///
/// ```rust
/// use qkind_core::{Dimension, Unit};
///
/// let length = Dimension::base("L", "length");
/// let time = Dimension::base("T", "time");
/// let metre = Unit::base("m", "metre", length);
/// let second = Unit::base("s", "second", time);
///
/// let speed = &metre / &second;
/// assert_eq!(speed.to_string(), "m/s");
/// assert_eq!(speed.ratio(), 1.0);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, Default)]
pub struct Unit(Expr<BaseUnit>);

impl Unit {
    /// A coherent unit (`ratio == 1`) of `dimension`.
    pub fn base(symbol: impl Into<Arc<str>>, name: impl Into<Arc<str>>, dimension: Dimension) -> Self {
        Self::derived(symbol, name, dimension, 1.0)
    }

    /// A named unit of `dimension` worth `ratio` coherent units.
    pub fn derived(
        symbol: impl Into<Arc<str>>,
        name: impl Into<Arc<str>>,
        dimension: Dimension,
        ratio: f64,
    ) -> Self {
        Self(Expr::basic(BaseUnit {
            symbol: symbol.into(),
            name: name.into(),
            dimension,
            ratio,
            offset: 0.0,
            affine: false,
        }))
    }

    /// A non-combinable unit with `canonical = value · ratio + offset`.
    pub fn affine(
        symbol: impl Into<Arc<str>>,
        name: impl Into<Arc<str>>,
        dimension: Dimension,
        ratio: f64,
        offset: f64,
    ) -> Self {
        Self(Expr::basic(BaseUnit {
            symbol: symbol.into(),
            name: name.into(),
            dimension,
            ratio,
            offset,
            affine: true,
        }))
    }

    /// The dimensionless unit `1`.
    pub fn none() -> Self {
        Self(Expr::none())
    }

    /// Wraps an arbitrary unit expression.
    ///
    /// Fails when an affine atom appears anywhere except as the whole expression, or when the unit's dimension
    /// cannot be represented.
    pub fn from_expr(expr: Expr<BaseUnit>) -> Result<Self, UnitError> {
        if let Node::Basic(_) = expr.node() {
            return Ok(Self(expr));
        }
        if let Some(atom) = expr.find_atom(&BaseUnit::is_affine) {
            return Err(UnitError::AffineComposition {
                unit: atom.symbol.to_string(),
                operation: "compose",
            });
        }
        Self::checked(expr)
    }

    fn checked(expr: Expr<BaseUnit>) -> Result<Self, UnitError> {
        let unit = Self(expr);
        unit.try_dimension()?;
        Ok(unit)
    }

    pub fn expr(&self) -> &Expr<BaseUnit> {
        &self.0
    }

    /// `true` when this unit is a single affine atom.
    pub fn is_affine(&self) -> bool {
        self.0.as_basic().is_some_and(BaseUnit::is_affine)
    }

    pub fn is_dimensionless(&self) -> bool {
        self.dimension().is_dimensionless()
    }

    /// Canonical dimension: the product of every atom's dimension raised to its exponent.
    pub fn try_dimension(&self) -> Result<Dimension, UnitError> {
        let mut dimension = Dimension::none();
        for (atom, exponent) in self.0.factors().iter() {
            dimension = dimension.try_multiply(&atom.dimension.try_pow(exponent)?)?;
        }
        Ok(dimension)
    }

    /// [`try_dimension`](Self::try_dimension).
    ///
    /// Every `Unit` built through this module has a representable dimension, so this only panics for a unit
    /// whose dimension exponents overflow.
    pub fn dimension(&self) -> Dimension {
        self.try_dimension().unwrap_or_else(|err| panic!("{err}"))
    }

    /// Conversion factor to the coherent SI unit of [`dimension`](Self::dimension).
    pub fn ratio(&self) -> f64 {
        self.0
            .factors()
            .iter()
            .map(|(atom, exponent)| atom.ratio.powi(exponent))
            .product()
    }

    /// Affine offset; zero for every non-affine unit.
    pub fn offset(&self) -> f64 {
        match self.0.as_basic() {
            Some(atom) if atom.affine => atom.offset,
            _ => 0.0,
        }
    }

    fn guard(&self, operation: &'static str) -> Result<(), UnitError> {
        match self.0.as_basic() {
            Some(atom) if atom.affine => Err(UnitError::AffineComposition {
                unit: atom.symbol.to_string(),
                operation,
            }),
            _ => Ok(()),
        }
    }

    pub fn try_mul(&self, rhs: &Self) -> Result<Self, UnitError> {
        self.guard("multiply")?;
        rhs.guard("multiply")?;
        Self::checked(self.0.try_multiply(&rhs.0)?)
    }

    pub fn try_div(&self, rhs: &Self) -> Result<Self, UnitError> {
        self.guard("divide")?;
        rhs.guard("divide")?;
        Self::checked(self.0.try_divide(&rhs.0)?)
    }

    /// `self ^ exponent`. Affine units only accept `0` and `1`.
    pub fn try_pow(&self, exponent: i32) -> Result<Self, UnitError> {
        match exponent {
            0 => Ok(Self::none()),
            1 => Ok(self.clone()),
            _ => {
                self.guard("exponentiate")?;
                Self::checked(self.0.try_pow(exponent)?)
            }
        }
    }

    /// A new named unit worth `factor` of this one (a prefix, or `min` from `s`).
    ///
    /// Scaling an affine unit by exactly `1` returns it unchanged; any other factor fails.
    pub fn try_scale(
        &self,
        factor: f64,
        symbol: impl Into<Arc<str>>,
        name: impl Into<Arc<str>>,
    ) -> Result<Self, UnitError> {
        if self.is_affine() {
            if factor == 1.0 {
                return Ok(self.clone());
            }
            self.guard("scale")?;
        }
        Ok(Self::derived(symbol, name, self.dimension(), self.ratio() * factor))
    }

    fn operator_mul(&self, rhs: &Self) -> Self {
        self.try_mul(rhs).unwrap_or_else(|err| panic!("{err}"))
    }

    fn operator_div(&self, rhs: &Self) -> Self {
        self.try_div(rhs).unwrap_or_else(|err| panic!("{err}"))
    }

    fn operator_pow(&self, exponent: i32) -> Self {
        self.try_pow(exponent).unwrap_or_else(|err| panic!("{err}"))
    }
}

impl Display for Unit {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Display::fmt(&self.0, f)
    }
}

// `*`, `/` and `^` on units.
//
// # Panics
//
// When an operand is affine or an exponent overflows; use `try_mul`, `try_div` or `try_pow` to get a `UnitError`
// instead.
crate::macros::forward_binary_op!(impl[] Mul, mul => operator_mul for Unit, output Unit);
crate::macros::forward_binary_op!(impl[] Div, div => operator_div for Unit, output Unit);
crate::macros::forward_pow_op!(impl[] for Unit => operator_pow, output Unit);
