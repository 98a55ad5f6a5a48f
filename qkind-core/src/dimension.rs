//! Dimension types.

use core::fmt::{self, Debug, Display, Formatter};
use core::hash::{Hash, Hasher};
use std::cmp::Ordering;
use std::sync::Arc;

use crate::canonical::BASIS_LEN;
use crate::expr::{Atom, Expr};

/// Symbols of the SI base dimensions, in fast-path vector order.
pub const SI_DIMENSION_BASIS: [&str; BASIS_LEN] = ["L", "M", "T", "I", "Θ", "N", "J"];

/// An atomic **dimension** (length, mass, time …).
///
/// Identity is the symbol: two base dimensions with the same symbol are the same factor, whatever their names.
///
/// ```rust
/// use qkind_core::{BaseDimension, Dimension};
///
/// let length = Dimension::basic(BaseDimension::new("L", "length"));
/// let time = Dimension::basic(BaseDimension::new("T", "time"));
/// let velocity = &length / &time;
/// assert_eq!(velocity.to_string(), "L/T");
/// ```
#[derive(Clone)]
pub struct BaseDimension {
    symbol: Arc<str>,
    name: Arc<str>,
}

impl BaseDimension {
    pub fn new(symbol: impl Into<Arc<str>>, name: impl Into<Arc<str>>) -> Self {
        Self {
            symbol: symbol.into(),
            name: name.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl PartialEq for BaseDimension {
    fn eq(&self, other: &Self) -> bool {
        self.symbol == other.symbol
    }
}

impl Eq for BaseDimension {}

impl PartialOrd for BaseDimension {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for BaseDimension {
    fn cmp(&self, other: &Self) -> Ordering {
        self.symbol.cmp(&other.symbol)
    }
}

impl Hash for BaseDimension {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.symbol.hash(state);
    }
}

impl Debug for BaseDimension {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "BaseDimension({} {})", self.symbol, self.name)
    }
}

impl Display for BaseDimension {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.symbol)
    }
}

impl Atom for BaseDimension {
    fn symbol(&self) -> &str {
        &self.symbol
    }

    fn basis_index(&self) -> Option<usize> {
        SI_DIMENSION_BASIS
            .iter()
            .position(|symbol| *symbol == &*self.symbol)
    }
}

/// A dimension expression: products, quotients and integer powers of [`BaseDimension`]s.
///
/// `Dimension::none()` is the dimensionless identity.
pub type Dimension = Expr<BaseDimension>;

impl Expr<BaseDimension> {
    /// Shorthand for `Dimension::basic(BaseDimension::new(symbol, name))`.
    pub fn base(symbol: impl Into<Arc<str>>, name: impl Into<Arc<str>>) -> Self {
        Expr::basic(BaseDimension::new(symbol, name))
    }

    /// `true` for the identity dimension.
    pub fn is_dimensionless(&self) -> bool {
        self.is_identity()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ReductionConfig;

    fn length() -> Dimension {
        Dimension::base("L", "length")
    }

    fn mass() -> Dimension {
        Dimension::base("M", "mass")
    }

    fn time() -> Dimension {
        Dimension::base("T", "time")
    }

    #[test]
    fn identity_is_symbol_only() {
        assert_eq!(BaseDimension::new("L", "length"), BaseDimension::new("L", "distance"));
        assert_ne!(BaseDimension::new("L", "length"), BaseDimension::new("M", "length"));
    }

    #[test]
    fn basis_indices() {
        assert_eq!(BaseDimension::new("L", "length").basis_index(), Some(0));
        assert_eq!(BaseDimension::new("Θ", "temperature").basis_index(), Some(4));
        assert_eq!(BaseDimension::new("Ω", "custom").basis_index(), None);
    }

    #[test]
    fn force_from_parts() {
        let force = mass() * length() / (time() ^ 2);
        let other = length() * (time() ^ -2) * mass();
        assert_eq!(force, other);
        assert_eq!(force.to_string(), "L·M/T^2");
    }

    #[test]
    fn energy_two_ways() {
        let force = &mass() * &length() / (time() ^ 2);
        let energy = &force * &length();
        let velocity = length() / time();
        let kinetic = mass() * (velocity ^ 2);
        assert_eq!(energy, kinetic);
    }

    #[test]
    fn ratio_is_dimensionless() {
        assert!((length() / length()).is_dimensionless());
        assert!(!length().is_dimensionless());
        assert!(Dimension::none().is_dimensionless());
    }

    #[test]
    fn custom_dimension_uses_factor_sets() {
        let money = Dimension::base("$", "currency");
        let rate = &money / &time();
        for config in ReductionConfig::all_combinations() {
            config.scoped(|| {
                assert_eq!(&rate * &time(), money);
                assert_ne!(rate, money);
            });
        }
    }
}
