//! Quantity kinds and kind tags.
//!
//! A [`QuantityKind`] is the semantic label of a quantity: Energy and Torque are both measured in joules but are
//! different kinds. Kinds are created once and compared by identity, so two kinds built with the same name are
//! still distinct.

use core::fmt::{self, Debug, Display, Formatter};
use core::hash::{Hash, Hasher};
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use once_cell::sync::Lazy;
use parking_lot::RwLock;

use crate::dimension::Dimension;
use crate::unit::Unit;

// ─────────────────────────────────────────────────────────────────────────────
// Tags
// ─────────────────────────────────────────────────────────────────────────────

/// Descriptive label attached to kinds ("mechanical", "rotational", …). Canonical by name.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct QuantityKindTag(Arc<str>);

impl QuantityKindTag {
    pub fn name(&self) -> &str {
        &self.0
    }
}

impl Debug for QuantityKindTag {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "QuantityKindTag({})", self.0)
    }
}

impl Display for QuantityKindTag {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Thread-safe tag interner: one shared allocation per tag name.
#[derive(Default)]
pub struct TagInterner {
    tags: RwLock<HashMap<Arc<str>, QuantityKindTag>>,
}

static GLOBAL_TAGS: Lazy<TagInterner> = Lazy::new(TagInterner::new);

impl TagInterner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Process-wide interner used by [`QuantityKindBuilder::tag`].
    pub fn global() -> &'static TagInterner {
        &GLOBAL_TAGS
    }

    /// Returns the tag for `name`, creating it on first use.
    pub fn intern(&self, name: &str) -> QuantityKindTag {
        if let Some(tag) = self.tags.read().get(name) {
            return tag.clone();
        }
        let mut tags = self.tags.write();
        tags.entry(Arc::from(name))
            .or_insert_with_key(|key| QuantityKindTag(Arc::clone(key)))
            .clone()
    }

    /// The tag for `name` if it was interned before.
    pub fn get(&self, name: &str) -> Option<QuantityKindTag> {
        self.tags.read().get(name).cloned()
    }

    pub fn len(&self) -> usize {
        self.tags.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.read().is_empty()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Kinds
// ─────────────────────────────────────────────────────────────────────────────

struct KindData {
    name: String,
    symbol: String,
    canonical_unit: Unit,
    dimension: Dimension,
    allow_addition: bool,
    allow_subtraction: bool,
    difference_kind: Option<QuantityKind>,
    tags: BTreeSet<QuantityKindTag>,
}

/// Semantic kind of a quantity.
///
/// ```rust
/// use qkind_core::standard::{kinds, units};
/// use qkind_core::QuantityKind;
///
/// let work = QuantityKind::builder("Work", units::JOULE.clone()).symbol("W").build();
/// assert_eq!(work.dimension(), kinds::ENERGY.dimension());
/// assert_ne!(work, *kinds::ENERGY);
/// ```
#[derive(Clone)]
pub struct QuantityKind(Arc<KindData>);

impl QuantityKind {
    pub fn builder(name: impl Into<String>, canonical_unit: Unit) -> QuantityKindBuilder {
        QuantityKindBuilder {
            name: name.into(),
            symbol: None,
            canonical_unit,
            allow_addition: true,
            allow_subtraction: true,
            difference_kind: None,
            tags: BTreeSet::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.0.name
    }

    pub fn symbol(&self) -> &str {
        &self.0.symbol
    }

    pub fn canonical_unit(&self) -> &Unit {
        &self.0.canonical_unit
    }

    /// Dimension of the canonical unit.
    pub fn dimension(&self) -> &Dimension {
        &self.0.dimension
    }

    pub fn allows_addition(&self) -> bool {
        self.0.allow_addition
    }

    pub fn allows_subtraction(&self) -> bool {
        self.0.allow_subtraction
    }

    /// Kind produced by `point - point`, for affine kinds.
    pub fn difference_kind(&self) -> Option<&QuantityKind> {
        self.0.difference_kind.as_ref()
    }

    pub fn tags(&self) -> impl Iterator<Item = &QuantityKindTag> + '_ {
        self.0.tags.iter()
    }

    pub fn has_tag(&self, name: &str) -> bool {
        self.0.tags.iter().any(|tag| tag.name() == name)
    }

    /// A point on an affine scale: has a difference kind and allows neither direct addition nor subtraction.
    pub fn is_point_like(&self) -> bool {
        self.0.difference_kind.is_some() && !self.0.allow_addition && !self.0.allow_subtraction
    }

    pub fn is_dimensionless(&self) -> bool {
        self.0.dimension.is_dimensionless()
    }
}

impl PartialEq for QuantityKind {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for QuantityKind {}

impl Hash for QuantityKind {
    fn hash<H: Hasher>(&self, state: &mut H) {
        Arc::as_ptr(&self.0).hash(state);
    }
}

impl Debug for QuantityKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "QuantityKind({})", self.0.name)
    }
}

impl Display for QuantityKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.name)
    }
}

/// Builder returned by [`QuantityKind::builder`].
#[must_use]
pub struct QuantityKindBuilder {
    name: String,
    symbol: Option<String>,
    canonical_unit: Unit,
    allow_addition: bool,
    allow_subtraction: bool,
    difference_kind: Option<QuantityKind>,
    tags: BTreeSet<QuantityKindTag>,
}

impl QuantityKindBuilder {
    pub fn symbol(mut self, symbol: impl Into<String>) -> Self {
        self.symbol = Some(symbol.into());
        self
    }

    pub fn allow_addition(mut self, allowed: bool) -> Self {
        self.allow_addition = allowed;
        self
    }

    pub fn allow_subtraction(mut self, allowed: bool) -> Self {
        self.allow_subtraction = allowed;
        self
    }

    /// Marks the kind as a point on an affine scale whose differences are `delta`.
    ///
    /// Disables direct addition and subtraction.
    pub fn point_of(mut self, delta: &QuantityKind) -> Self {
        self.difference_kind = Some(delta.clone());
        self.allow_addition = false;
        self.allow_subtraction = false;
        self
    }

    /// Adds a tag interned through the process-wide [`TagInterner`].
    pub fn tag(self, name: &str) -> Self {
        let tag = TagInterner::global().intern(name);
        self.with_tag(tag)
    }

    pub fn with_tag(mut self, tag: QuantityKindTag) -> Self {
        self.tags.insert(tag);
        self
    }

    pub fn build(self) -> QuantityKind {
        let dimension = self.canonical_unit.dimension();
        QuantityKind(Arc::new(KindData {
            symbol: self.symbol.unwrap_or_else(|| self.name.clone()),
            name: self.name,
            canonical_unit: self.canonical_unit,
            dimension,
            allow_addition: self.allow_addition,
            allow_subtraction: self.allow_subtraction,
            difference_kind: self.difference_kind,
            tags: self.tags,
        }))
    }
}
