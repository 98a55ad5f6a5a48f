//! Expression trees shared by dimensions and units.
//!
//! An [`Expr<A>`] is an immutable tree over atoms `A`:
//!
//! - `None`: the identity (dimensionless),
//! - `Basic(atom)`,
//! - `Product(operands)` with at least two operands,
//! - `Division(dividend, divisor)`,
//! - `Power(base, exponent)` with an exponent other than `0` and `1`.
//!
//! The raw constructors ([`Expr::product`], [`Expr::quotient`], [`Expr::power`]) keep whatever shape they are
//! given; nested products are *logically* flat but never flattened physically. The algebraic operations that
//! reduce a tree to canonical form live in [`crate::canonical`].
//!
//! Every node carries the canonical factor set of its sub-tree, built from its children's sets when the node is
//! created. Construction fails with [`ExponentOverflow`] when an exponent would leave
//! `-MAX_EXPONENT..=MAX_EXPONENT`, so an expression that exists always has a representable canonical form.
//!
//! Nodes are reference counted, so cloning an expression is cheap and sub-trees are shared.

use core::fmt::{self, Debug, Display, Formatter};
use core::hash::Hash;
use std::sync::Arc;

use once_cell::sync::OnceCell;

use crate::canonical::{FactorSet, FactorVector};
use crate::error::ExponentOverflow;

/// Atomic symbol of an expression tree (a base dimension, a named unit, …).
///
/// Equality, ordering and hashing must all be defined by the symbol alone: two atoms with the same symbol are the
/// same factor.
pub trait Atom: Clone + Eq + Ord + Hash + Debug + Display + Send + Sync + 'static {
    /// Printable symbol, also the identity of the atom.
    fn symbol(&self) -> &str;

    /// Slot in the fixed exponent vector used by the equality fast path.
    ///
    /// Atoms outside the basis return `None`; expressions containing them fall back to full factor sets.
    fn basis_index(&self) -> Option<usize> {
        None
    }
}

/// One node of an expression tree.
#[derive(Clone, Debug)]
pub enum Node<A: Atom> {
    /// The identity element.
    None,
    /// A single atom.
    Basic(A),
    /// Product of two or more operands.
    Product(Vec<Expr<A>>),
    /// `dividend / divisor`.
    Division(Expr<A>, Expr<A>),
    /// `base ^ exponent`.
    Power(Expr<A>, i32),
}

/// An immutable, cheaply clonable expression tree.
pub struct Expr<A: Atom> {
    inner: Arc<ExprInner<A>>,
}

struct ExprInner<A: Atom> {
    node: Node<A>,
    factors: FactorSet<A>,
    // Write-once memo for the equality fast path.
    vector: OnceCell<Option<FactorVector>>,
}

impl<A: Atom> Clone for Expr<A> {
    #[inline]
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<A: Atom> Debug for Expr<A> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Debug::fmt(&self.inner.node, f)
    }
}

impl<A: Atom> Expr<A> {
    /// A node whose factor set is already known.
    pub(crate) fn from_parts(node: Node<A>, factors: FactorSet<A>) -> Self {
        Self {
            inner: Arc::new(ExprInner {
                node,
                factors,
                vector: OnceCell::new(),
            }),
        }
    }

    fn try_from_node(node: Node<A>) -> Result<Self, ExponentOverflow> {
        let factors = match &node {
            Node::None => FactorSet::new(),
            Node::Basic(atom) => FactorSet::single(atom.clone(), 1),
            Node::Product(operands) => operands
                .iter()
                .try_fold(FactorSet::new(), |acc, operand| acc.combined(operand.factors(), 1))?,
            Node::Division(dividend, divisor) => dividend.factors().combined(divisor.factors(), -1)?,
            Node::Power(base, exponent) => base.factors().scaled(*exponent)?,
        };
        Ok(Self::from_parts(node, factors))
    }

    /// The identity expression.
    pub fn none() -> Self {
        Self::from_parts(Node::None, FactorSet::new())
    }

    /// A single atom.
    pub fn basic(atom: A) -> Self {
        let factors = FactorSet::single(atom.clone(), 1);
        Self::from_parts(Node::Basic(atom), factors)
    }

    /// Product of `operands`, kept as given.
    ///
    /// Zero operands give the identity and a single operand is returned unchanged, so a `Product` node always
    /// holds at least two operands.
    pub fn try_product<I: IntoIterator<Item = Expr<A>>>(operands: I) -> Result<Self, ExponentOverflow> {
        let mut operands: Vec<Expr<A>> = operands.into_iter().collect();
        match operands.len() {
            0 => Ok(Self::none()),
            1 => Ok(operands.swap_remove(0)),
            _ => Self::try_from_node(Node::Product(operands)),
        }
    }

    /// `dividend / divisor`, kept as given.
    pub fn try_quotient(dividend: Expr<A>, divisor: Expr<A>) -> Result<Self, ExponentOverflow> {
        Self::try_from_node(Node::Division(dividend, divisor))
    }

    /// `base ^ exponent`, kept as given.
    ///
    /// `base^0` is the identity and `base^1` is `base` itself.
    pub fn try_power(base: Expr<A>, exponent: i32) -> Result<Self, ExponentOverflow> {
        match exponent {
            0 => Ok(Self::none()),
            1 => Ok(base),
            _ => Self::try_from_node(Node::Power(base, exponent)),
        }
    }

    /// [`try_product`](Self::try_product).
    ///
    /// # Panics
    ///
    /// When a combined exponent overflows.
    pub fn product<I: IntoIterator<Item = Expr<A>>>(operands: I) -> Self {
        Self::try_product(operands).unwrap_or_else(|err| panic!("{err}"))
    }

    /// [`try_quotient`](Self::try_quotient).
    ///
    /// # Panics
    ///
    /// When a combined exponent overflows.
    pub fn quotient(dividend: Expr<A>, divisor: Expr<A>) -> Self {
        Self::try_quotient(dividend, divisor).unwrap_or_else(|err| panic!("{err}"))
    }

    /// [`try_power`](Self::try_power).
    ///
    /// # Panics
    ///
    /// When a scaled exponent overflows.
    pub fn power(base: Expr<A>, exponent: i32) -> Self {
        Self::try_power(base, exponent).unwrap_or_else(|err| panic!("{err}"))
    }

    /// The root node.
    #[inline]
    pub fn node(&self) -> &Node<A> {
        &self.inner.node
    }

    /// Canonical factor set of this expression.
    #[inline]
    pub fn factors(&self) -> &FactorSet<A> {
        &self.inner.factors
    }

    /// Returns the atom if this expression is a single `Basic` node.
    pub fn as_basic(&self) -> Option<&A> {
        match self.node() {
            Node::Basic(atom) => Some(atom),
            _ => None,
        }
    }

    /// `true` for `None` and `Basic` nodes.
    pub fn is_atomic(&self) -> bool {
        matches!(self.node(), Node::None | Node::Basic(_))
    }

    /// `true` if both handles point at the same node allocation.
    #[inline]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// First atom in the tree (depth first, left to right) that satisfies `pred`.
    pub fn find_atom(&self, pred: &impl Fn(&A) -> bool) -> Option<&A> {
        match self.node() {
            Node::None => None,
            Node::Basic(atom) => pred(atom).then_some(atom),
            Node::Product(operands) => operands.iter().find_map(|op| op.find_atom(pred)),
            Node::Division(dividend, divisor) => dividend.find_atom(pred).or_else(|| divisor.find_atom(pred)),
            Node::Power(base, _) => base.find_atom(pred),
        }
    }

    /// Node-by-node comparison. Unlike `==` this distinguishes `a·b` from `b·a`.
    pub fn structurally_eq(&self, other: &Self) -> bool {
        if self.ptr_eq(other) {
            return true;
        }
        match (self.node(), other.node()) {
            (Node::None, Node::None) => true,
            (Node::Basic(a), Node::Basic(b)) => a == b,
            (Node::Product(xs), Node::Product(ys)) => {
                xs.len() == ys.len() && xs.iter().zip(ys).all(|(x, y)| x.structurally_eq(y))
            }
            (Node::Division(n1, d1), Node::Division(n2, d2)) => {
                n1.structurally_eq(n2) && d1.structurally_eq(d2)
            }
            (Node::Power(b1, e1), Node::Power(b2, e2)) => e1 == e2 && b1.structurally_eq(b2),
            _ => false,
        }
    }

    /// Memoized fast-path vector; computed on first use.
    pub(crate) fn cached_vector(&self) -> Option<FactorVector> {
        *self
            .inner
            .vector
            .get_or_init(|| FactorVector::from_factors(self.factors()))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Display
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, PartialEq, Eq)]
enum Position {
    Factor,
    Divisor,
    Base,
}

fn write_operand<A: Atom>(f: &mut Formatter<'_>, expr: &Expr<A>, position: Position) -> fmt::Result {
    let parens = match (expr.node(), position) {
        (Node::None | Node::Basic(_), _) => false,
        (Node::Division(..), _) => true,
        (Node::Product(_), Position::Factor) => false,
        (Node::Product(_), _) => true,
        (Node::Power(..), Position::Base) => true,
        (Node::Power(..), _) => false,
    };
    if parens {
        write!(f, "({})", expr)
    } else {
        write!(f, "{}", expr)
    }
}

impl<A: Atom> Display for Expr<A> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self.node() {
            Node::None => f.write_str("1"),
            Node::Basic(atom) => write!(f, "{}", atom),
            Node::Product(operands) => {
                for (i, operand) in operands.iter().enumerate() {
                    if i > 0 {
                        f.write_str("·")?;
                    }
                    write_operand(f, operand, Position::Factor)?;
                }
                Ok(())
            }
            Node::Division(dividend, divisor) => {
                write_operand(f, dividend, Position::Factor)?;
                f.write_str("/")?;
                write_operand(f, divisor, Position::Divisor)
            }
            Node::Power(base, exponent) => {
                write_operand(f, base, Position::Base)?;
                write!(f, "^{}", exponent)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
    struct Sym(&'static str);

    impl Display for Sym {
        fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
            f.write_str(self.0)
        }
    }

    impl Atom for Sym {
        fn symbol(&self) -> &str {
            self.0
        }
    }

    fn sym(s: &'static str) -> Expr<Sym> {
        Expr::basic(Sym(s))
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Constructors
    // ─────────────────────────────────────────────────────────────────────────────

    #[test]
    fn empty_product_is_none() {
        assert!(matches!(Expr::<Sym>::product(vec![]).node(), Node::None));
    }

    #[test]
    fn single_operand_product_is_the_operand() {
        let a = sym("a");
        let p = Expr::product(vec![a.clone()]);
        assert!(p.ptr_eq(&a));
    }

    #[test]
    fn product_keeps_nesting() {
        let inner = Expr::product(vec![sym("a"), sym("b")]);
        let outer = Expr::product(vec![inner, sym("c")]);
        match outer.node() {
            Node::Product(ops) => {
                assert_eq!(ops.len(), 2);
                assert!(matches!(ops[0].node(), Node::Product(_)));
            }
            other => panic!("expected product, got {:?}", other),
        }
    }

    #[test]
    fn power_zero_and_one_collapse() {
        let a = sym("a");
        assert!(matches!(Expr::power(a.clone(), 0).node(), Node::None));
        assert!(Expr::power(a.clone(), 1).ptr_eq(&a));
        assert!(matches!(Expr::power(a, 3).node(), Node::Power(_, 3)));
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Structural queries
    // ─────────────────────────────────────────────────────────────────────────────

    #[test]
    fn structural_equality_is_order_sensitive() {
        let ab = Expr::product(vec![sym("a"), sym("b")]);
        let ab2 = Expr::product(vec![sym("a"), sym("b")]);
        let ba = Expr::product(vec![sym("b"), sym("a")]);
        assert!(ab.structurally_eq(&ab2));
        assert!(!ab.structurally_eq(&ba));
    }

    #[test]
    fn find_atom_walks_the_tree() {
        let e = Expr::quotient(sym("a"), Expr::power(Expr::product(vec![sym("b"), sym("c")]), 2));
        assert_eq!(e.find_atom(&|s: &Sym| s.0 == "c"), Some(&Sym("c")));
        assert_eq!(e.find_atom(&|s: &Sym| s.0 != "a"), Some(&Sym("b")));
        assert_eq!(e.find_atom(&|s: &Sym| s.0 == "z"), None);
    }

    #[test]
    fn nodes_carry_their_factor_sets() {
        let e = Expr::power(Expr::quotient(sym("a"), Expr::power(sym("b"), 2)), -3);
        assert_eq!(e.factors().exponent(&Sym("a")), -3);
        assert_eq!(e.factors().exponent(&Sym("b")), 6);
    }

    #[test]
    fn overflowing_constructors_fail() {
        let big = Expr::power(sym("a"), 70_000);
        let err = Expr::try_power(big.clone(), 70_000).unwrap_err();
        assert_eq!(err.atom, "a");
        assert!(Expr::try_power(sym("a"), i32::MIN).is_err());
        let near = Expr::power(sym("a"), i32::MAX);
        assert!(Expr::try_product(vec![near.clone(), sym("a")]).is_err());
        assert!(Expr::try_quotient(near.clone(), Expr::power(sym("a"), -1)).is_err());
        // in range once cancelled
        assert!(Expr::try_quotient(near, sym("a")).is_ok());
    }

    #[test]
    #[should_panic(expected = "overflows the supported range")]
    fn overflowing_power_panics() {
        let _ = Expr::power(Expr::power(sym("a"), 70_000), 70_000);
    }

    #[test]
    fn as_basic_and_is_atomic() {
        assert_eq!(sym("a").as_basic(), Some(&Sym("a")));
        assert!(sym("a").is_atomic());
        assert!(Expr::<Sym>::none().is_atomic());
        assert!(!Expr::product(vec![sym("a"), sym("b")]).is_atomic());
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Display
    // ─────────────────────────────────────────────────────────────────────────────

    #[test]
    fn display_shapes() {
        assert_eq!(Expr::<Sym>::none().to_string(), "1");
        assert_eq!(Expr::product(vec![sym("a"), sym("b")]).to_string(), "a·b");
        assert_eq!(Expr::quotient(sym("a"), sym("b")).to_string(), "a/b");
        assert_eq!(Expr::power(sym("a"), -2).to_string(), "a^-2");
    }

    #[test]
    fn display_parenthesizes_composites() {
        let ab = Expr::product(vec![sym("a"), sym("b")]);
        assert_eq!(Expr::power(ab.clone(), 3).to_string(), "(a·b)^3");
        assert_eq!(Expr::quotient(sym("c"), ab.clone()).to_string(), "c/(a·b)");
        let nested = Expr::quotient(Expr::quotient(sym("a"), sym("b")), sym("c"));
        assert_eq!(nested.to_string(), "(a/b)/c");
        assert_eq!(Expr::power(Expr::power(sym("a"), 2), 3).to_string(), "(a^2)^3");
    }
}
