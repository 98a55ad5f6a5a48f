//! Canonical form of expression trees.
//!
//! Every [`Expr`] reduces to a [`FactorSet`]: a map from atom to non-zero signed exponent. Products add exponents,
//! a divisor contributes its exponents negated, and a power multiplies the contribution of its base. Two
//! expressions are equal exactly when their factor sets are equal, whatever order, nesting or expansion they were
//! built with.
//!
//! `multiply`, `divide` and `pow` combine factor sets and render the result back into a tree:
//!
//! | factor set            | rendered as                                       |
//! |-----------------------|---------------------------------------------------|
//! | empty                 | `None`                                            |
//! | `{a: 1}`              | `Basic(a)`                                        |
//! | `{a: n}`              | `Power(Basic(a), n)`                              |
//! | several, same sign    | `Product` of `Basic`/`Power` terms                |
//! | several, mixed signs  | `Division(positive terms, negated negative terms)` when quotient display is on |
//!
//! Exponents are bounded by [`MAX_EXPONENT`] in magnitude, partial sums included. Every combination is checked and
//! reports [`ExponentOverflow`] instead of wrapping.
//!
//! How the work is done is governed by [`ReductionConfig`]; the result never is.

use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use std::hash::{Hash, Hasher};

use crate::config::ReductionConfig;
use crate::error::ExponentOverflow;
use crate::expr::{Atom, Expr, Node};

/// Number of slots in a [`FactorVector`].
pub const BASIS_LEN: usize = 7;

/// Largest exponent magnitude a factor may carry. `i32::MIN` is excluded so negation never overflows.
pub const MAX_EXPONENT: i32 = i32::MAX;

fn bounded<A: Atom>(atom: &A, exponent: Option<i32>) -> Result<i32, ExponentOverflow> {
    match exponent {
        Some(value) if value != i32::MIN => Ok(value),
        _ => Err(ExponentOverflow {
            atom: atom.symbol().to_string(),
        }),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Factor sets
// ─────────────────────────────────────────────────────────────────────────────

/// Canonical multiset of `(atom, exponent)` pairs. Exponents are never zero.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct FactorSet<A: Atom> {
    factors: BTreeMap<A, i32>,
}

impl<A: Atom> Default for FactorSet<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A: Atom> FactorSet<A> {
    /// The empty (identity) factor set.
    pub fn new() -> Self {
        Self {
            factors: BTreeMap::new(),
        }
    }

    pub(crate) fn single(atom: A, exponent: i32) -> Self {
        let mut factors = BTreeMap::new();
        if exponent != 0 {
            factors.insert(atom, exponent);
        }
        Self { factors }
    }

    /// Canonicalizes `expr`.
    pub fn of(expr: &Expr<A>) -> Self {
        expr.factors().clone()
    }

    /// Adds `exponent` to the exponent of `atom`, dropping it when the sum reaches zero.
    pub fn add(&mut self, atom: A, exponent: i32) -> Result<(), ExponentOverflow> {
        if exponent == 0 {
            return Ok(());
        }
        let exponent = bounded(&atom, Some(exponent))?;
        match self.factors.entry(atom) {
            Entry::Vacant(slot) => {
                slot.insert(exponent);
            }
            Entry::Occupied(mut slot) => {
                let sum = bounded(slot.key(), slot.get().checked_add(exponent))?;
                if sum == 0 {
                    slot.remove();
                } else {
                    *slot.get_mut() = sum;
                }
            }
        }
        Ok(())
    }

    /// Exponent of `atom` (zero when absent).
    pub fn exponent(&self, atom: &A) -> i32 {
        self.factors.get(atom).copied().unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.factors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factors.is_empty()
    }

    /// Factors in symbol order.
    pub fn iter(&self) -> impl Iterator<Item = (&A, i32)> + '_ {
        self.factors.iter().map(|(atom, exponent)| (atom, *exponent))
    }

    /// `self + sign · other`, merged in a single pass.
    pub fn combined(&self, other: &Self, sign: i32) -> Result<Self, ExponentOverflow> {
        let mut merged = self.clone();
        for (atom, exponent) in other.iter() {
            merged.add(atom.clone(), bounded(atom, sign.checked_mul(exponent))?)?;
        }
        Ok(merged)
    }

    /// Every exponent multiplied by `n`.
    pub fn scaled(&self, n: i32) -> Result<Self, ExponentOverflow> {
        if n == 0 {
            return Ok(Self::new());
        }
        let mut factors = BTreeMap::new();
        for (atom, exponent) in self.iter() {
            factors.insert(atom.clone(), bounded(atom, exponent.checked_mul(n))?);
        }
        Ok(Self { factors })
    }

    /// `dividend / divisor`, cancelling one shared symbol at a time.
    ///
    /// Produces the same set as `dividend.combined(divisor, -1)`.
    pub fn divide_iteratively(dividend: &Self, divisor: &Self) -> Result<Self, ExponentOverflow> {
        let mut numerator = Self::new();
        let mut denominator = Self::new();
        for (atom, exponent) in dividend.iter() {
            if exponent > 0 {
                numerator.add(atom.clone(), exponent)?;
            } else {
                denominator.add(atom.clone(), -exponent)?;
            }
        }
        for (atom, exponent) in divisor.iter() {
            if exponent > 0 {
                denominator.add(atom.clone(), exponent)?;
            } else {
                numerator.add(atom.clone(), -exponent)?;
            }
        }

        loop {
            let shared = numerator
                .factors
                .keys()
                .find(|atom| denominator.factors.contains_key(*atom))
                .cloned();
            let Some(atom) = shared else {
                break;
            };
            let common = numerator.exponent(&atom).min(denominator.exponent(&atom));
            numerator.add(atom.clone(), -common)?;
            denominator.add(atom, -common)?;
        }

        let mut result = numerator;
        for (atom, exponent) in denominator.iter() {
            result.add(atom.clone(), -exponent)?;
        }
        Ok(result)
    }

    /// `true` when both positive and negative exponents are present.
    pub fn has_mixed_signs(&self) -> bool {
        let mut positive = false;
        let mut negative = false;
        for (_, exponent) in self.iter() {
            positive |= exponent > 0;
            negative |= exponent < 0;
        }
        positive && negative
    }

    fn filtered(&self, keep: impl Fn(i32) -> bool, sign: i32) -> Self {
        Self {
            factors: self
                .iter()
                .filter(|(_, exponent)| keep(*exponent))
                .map(|(atom, exponent)| (atom.clone(), sign * exponent))
                .collect(),
        }
    }

    /// Renders this set as a simplified tree (see the module table).
    pub fn to_expr(&self, prefer_quotient: bool) -> Expr<A> {
        if prefer_quotient && self.has_mixed_signs() {
            let numerator = self.filtered(|e| e > 0, 1).terms();
            let denominator = self.filtered(|e| e < 0, -1).terms();
            return Expr::from_parts(Node::Division(numerator, denominator), self.clone());
        }
        self.terms()
    }

    fn terms(&self) -> Expr<A> {
        let mut terms: Vec<Expr<A>> = self.iter().map(|(atom, exponent)| term(atom, exponent)).collect();
        match terms.len() {
            0 => Expr::none(),
            1 => terms.swap_remove(0),
            _ => Expr::from_parts(Node::Product(terms), self.clone()),
        }
    }
}

fn term<A: Atom>(atom: &A, exponent: i32) -> Expr<A> {
    let basic = Expr::basic(atom.clone());
    if exponent == 1 {
        basic
    } else {
        Expr::from_parts(Node::Power(basic, exponent), FactorSet::single(atom.clone(), exponent))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Fast-path vector
// ─────────────────────────────────────────────────────────────────────────────

/// Fixed-size exponent vector over the basis atoms.
///
/// Only defined for sets whose atoms all report a [`basis_index`](Atom::basis_index).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub struct FactorVector([i32; BASIS_LEN]);

impl FactorVector {
    /// `None` as soon as a non-basis atom shows up.
    pub fn from_factors<A: Atom>(factors: &FactorSet<A>) -> Option<Self> {
        let mut exponents = [0; BASIS_LEN];
        for (atom, exponent) in factors.iter() {
            match atom.basis_index() {
                Some(slot) if slot < BASIS_LEN => exponents[slot] = exponent,
                _ => return None,
            }
        }
        Some(Self(exponents))
    }

    pub fn from_expr<A: Atom>(expr: &Expr<A>) -> Option<Self> {
        Self::from_factors(expr.factors())
    }

    pub fn exponents(&self) -> &[i32; BASIS_LEN] {
        &self.0
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Algebra on expressions
// ─────────────────────────────────────────────────────────────────────────────

impl<A: Atom> Expr<A> {
    /// Fast-path vector, memoized after the first call.
    pub fn factor_vector(&self) -> Option<FactorVector> {
        self.cached_vector()
    }

    /// This expression re-rendered from its factor set.
    pub fn canonical(&self) -> Self {
        self.canonical_with(ReductionConfig::current())
    }

    fn canonical_with(&self, config: ReductionConfig) -> Self {
        self.factors().to_expr(config.prefer_quotient_display)
    }

    /// `true` when the expression reduces to the identity.
    pub fn is_identity(&self) -> bool {
        self.factors().is_empty()
    }

    /// Canonical product of `self` and `rhs`.
    pub fn try_multiply(&self, rhs: &Self) -> Result<Self, ExponentOverflow> {
        let config = ReductionConfig::current();
        Ok(self
            .factors()
            .combined(rhs.factors(), 1)?
            .to_expr(config.prefer_quotient_display))
    }

    /// Canonical quotient of `self` by `rhs`; shared factors cancel.
    pub fn try_divide(&self, rhs: &Self) -> Result<Self, ExponentOverflow> {
        let config = ReductionConfig::current();
        let quotient = if config.division_single_pass {
            self.factors().combined(rhs.factors(), -1)?
        } else {
            FactorSet::divide_iteratively(self.factors(), rhs.factors())?
        };
        Ok(quotient.to_expr(config.prefer_quotient_display))
    }

    /// `self ^ exponent`.
    ///
    /// `^0` is the identity and `^1` returns `self`. With lazy power expansion a composite base is wrapped in a
    /// `Power` node instead of having the exponent distributed; the factor set is the same either way.
    pub fn try_pow(&self, exponent: i32) -> Result<Self, ExponentOverflow> {
        match exponent {
            0 => Ok(Self::none()),
            1 => Ok(self.clone()),
            _ => {
                let config = ReductionConfig::current();
                if config.lazy_power_expansion && !self.is_atomic() {
                    Self::try_power(self.clone(), exponent)
                } else {
                    Ok(self
                        .factors()
                        .scaled(exponent)?
                        .to_expr(config.prefer_quotient_display))
                }
            }
        }
    }

    /// [`try_multiply`](Self::try_multiply).
    ///
    /// # Panics
    ///
    /// When a combined exponent overflows.
    pub fn multiply(&self, rhs: &Self) -> Self {
        self.try_multiply(rhs).unwrap_or_else(|err| panic!("{err}"))
    }

    /// [`try_divide`](Self::try_divide).
    ///
    /// # Panics
    ///
    /// When a combined exponent overflows.
    pub fn divide(&self, rhs: &Self) -> Self {
        self.try_divide(rhs).unwrap_or_else(|err| panic!("{err}"))
    }

    /// [`try_pow`](Self::try_pow).
    ///
    /// # Panics
    ///
    /// When a scaled exponent overflows.
    pub fn pow(&self, exponent: i32) -> Self {
        self.try_pow(exponent).unwrap_or_else(|err| panic!("{err}"))
    }

    /// `None / self`. Never fails: negating an in-range set stays in range.
    pub fn reciprocal(&self) -> Self {
        let config = ReductionConfig::current();
        self.factors()
            .filtered(|_| true, -1)
            .to_expr(config.prefer_quotient_display)
    }

    /// Canonical equality.
    pub fn equivalent(&self, other: &Self) -> bool {
        if self.ptr_eq(other) {
            return true;
        }
        let config = ReductionConfig::current();
        if !config.equality_normalization {
            return self.structurally_eq(other)
                || self
                    .canonical_with(config)
                    .structurally_eq(&other.canonical_with(config));
        }
        if config.use_factor_vector {
            if let (Some(a), Some(b)) = (self.factor_vector(), other.factor_vector()) {
                return a == b;
            }
        }
        self.factors() == other.factors()
    }
}

impl<A: Atom> PartialEq for Expr<A> {
    fn eq(&self, other: &Self) -> bool {
        self.equivalent(other)
    }
}

impl<A: Atom> Eq for Expr<A> {}

impl<A: Atom> Hash for Expr<A> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.factors().hash(state);
    }
}

impl<A: Atom> Default for Expr<A> {
    fn default() -> Self {
        Self::none()
    }
}

crate::macros::forward_binary_op!(impl[A: Atom] Mul, mul => multiply for Expr<A>, output Expr<A>);
crate::macros::forward_binary_op!(impl[A: Atom] Div, div => divide for Expr<A>, output Expr<A>);
crate::macros::forward_pow_op!(impl[A: Atom] for Expr<A> => pow, output Expr<A>);
