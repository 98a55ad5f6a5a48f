//! Core type system for dimension-checked, kind-aware physical quantities.
//!
//! `qkind-core` works on two layers:
//!
//! - **Dimensions and units** are immutable expression trees ([`Expr`]) of products, quotients and integer powers.
//!   Two expressions compare equal exactly when their canonical factor sets ([`FactorSet`]) agree, however they were
//!   built: operand order, nesting and lazy or eager power expansion never matter.
//! - **Quantity kinds** ([`QuantityKind`]) give a numeric [`Measurement`] its meaning: Energy and Torque share the
//!   joule but are different kinds. Multiplying or dividing [`Quantity`] values asks an [`InferenceEngine`] for the
//!   result kind, following registered [`InferenceRule`]s directly or through a bounded breadth-first search.
//!
//! Most users should depend on `qkind` (the facade crate) unless they need direct access to these primitives.
//!
//! # Quick start
//!
//! Dimension algebra:
//!
//! ```rust
//! use qkind_core::standard::dimensions::{LENGTH, MASS, TIME};
//!
//! let force = &*MASS * &*LENGTH / (&*TIME ^ 2);
//! let energy = &force * &*LENGTH;
//! let lazy = (&*LENGTH * &*TIME * &*MASS * &*LENGTH) ^ 5;
//! assert_eq!(energy.to_string(), "L^2·M/T^2");
//! assert_eq!(lazy, (&*LENGTH ^ 10) * (&*TIME ^ 5) * (&*MASS ^ 5));
//! ```
//!
//! Kind inference:
//!
//! ```rust
//! use qkind_core::standard::kinds;
//! use qkind_core::Quantity;
//!
//! let pressure = Quantity::of(1000.0, &kinds::PRESSURE);
//! let area = Quantity::of(2.0, &kinds::AREA);
//! let force = &pressure * &area;
//! assert_eq!(force.kind(), &*kinds::FORCE);
//! assert_eq!(force.value(), 2000.0);
//! ```
//!
//! # Configuration
//!
//! [`ReductionConfig`] selects how canonical forms are computed (lazy powers, the factor-vector fast path,
//! single-pass division). Every combination gives the same results. [`InferenceSettings`] and
//! [`RegistrySettings`] control the inference engine and rule registry; [`Settings`] loads all three from TOML.
//!
//! # Panics and errors
//!
//! Every fallible operation has a `try_*` or `checked_*` form returning a `Result`. The operator forms on units and
//! quantities panic with the error message instead. Dimension operators only fail when an exponent would leave
//! `±MAX_EXPONENT`; [`Expr::try_multiply`], [`Expr::try_divide`] and [`Expr::try_pow`] report that as
//! [`ExponentOverflow`].
//!
//! # Logging
//!
//! Diagnostics go through the [`log`](https://docs.rs/log) facade; no logger is installed by this crate.

#![forbid(unsafe_code)]

// ─────────────────────────────────────────────────────────────────────────────
// Core modules
// ─────────────────────────────────────────────────────────────────────────────

mod canonical;
mod config;
mod dimension;
mod error;
mod expr;
mod inference;
mod kind;
mod macros;
mod measurement;
mod persistent;
mod quantity;
mod rules;
mod unit;

// ─────────────────────────────────────────────────────────────────────────────
// Public re-exports of core types
// ─────────────────────────────────────────────────────────────────────────────

pub use canonical::{FactorSet, FactorVector, BASIS_LEN, MAX_EXPONENT};
pub use config::{InferenceSettings, ReductionConfig, RegistrySettings, Settings};
pub use dimension::{BaseDimension, Dimension, SI_DIMENSION_BASIS};
pub use error::{ConfigError, ExponentOverflow, InferenceError, KindError, RegistryError, UnitError};
pub use expr::{Atom, Expr, Node};
pub use inference::{enumerate_paths, find_path, InferenceCache, InferenceEngine, InferencePath, InferenceStep};
pub use kind::{QuantityKind, QuantityKindBuilder, QuantityKindTag, TagInterner};
pub use measurement::Measurement;
pub use persistent::PersistentList;
pub use quantity::Quantity;
pub use rules::{InferenceRule, Operator, RuleKey, RuleRegistry, RuleSet};
pub use unit::{BaseUnit, Unit, SI_UNIT_BASIS};

// ─────────────────────────────────────────────────────────────────────────────
// Standard catalog
// ─────────────────────────────────────────────────────────────────────────────

/// SI dimensions, units, kinds and inference rules.
pub mod standard;
