//! Dimensionally checked quantities with semantic kinds.
//!
//! `qkind` is the user-facing crate in this workspace. It re-exports the full API from `qkind-core` plus the standard
//! SI catalog (dimensions, units, kinds and inference rules).
//!
//! The core idea is: a value is a [`Quantity`], a [`Measurement`] (number and unit) tagged with a [`QuantityKind`].
//! Units and dimensions compare by their canonical factor sets, and the kind of a product or quotient comes from
//! registered inference rules, directly or through a bounded multi-step search.
//!
//! # What this crate solves
//!
//! - Unit and dimension equality independent of construction order, nesting and power expansion.
//! - Telling apart kinds that share a dimension (Energy and Torque are both joules).
//! - Point/delta semantics for affine kinds such as absolute temperature.
//! - Multi-step kind inference with ambiguity detection.
//!
//! # What this crate does not try to solve
//!
//! - Parsing units from free text.
//! - Persisting rules across runs.
//! - Uncertainty propagation: quantities are backed by `f64`.
//!
//! # Quick start
//!
//! ```rust
//! use qkind::kinds;
//! use qkind::Quantity;
//!
//! let force = Quantity::of(100.0, &kinds::FORCE);
//! let length = Quantity::of(2.0, &kinds::LENGTH);
//! let energy = &force * &length;
//! assert_eq!(energy.kind(), &*kinds::ENERGY);
//! assert_eq!(energy.value(), 200.0);
//! ```
//!
//! Custom kinds and rules go into a registry which is frozen and handed to an engine:
//!
//! ```rust
//! use qkind::{kinds, units, InferenceEngine, InferenceRule, Quantity, QuantityKind};
//!
//! let density = QuantityKind::builder("Density", &*units::KILOGRAM / &(&*units::METRE ^ 3)).build();
//! let rules = qkind::standard_rules()
//!     .extended([InferenceRule::divide(&kinds::MASS, &kinds::VOLUME, &density)])
//!     .unwrap();
//! let engine = InferenceEngine::new(rules);
//!
//! let rho = Quantity::of(10.0, &kinds::MASS)
//!     .checked_div(&Quantity::of(2.0, &kinds::VOLUME), &engine)
//!     .unwrap();
//! assert_eq!(rho.kind(), &density);
//! ```
//!
//! # Incorrect usage
//!
//! ```should_panic
//! use qkind::{kinds, Quantity};
//!
//! // no rule for Energy / Mass and neither operand is dimensionless
//! let _ = Quantity::of(1.0, &kinds::ENERGY) / Quantity::of(1.0, &kinds::MASS);
//! ```
//!
//! # Modules
//!
//! The standard catalog is re-exported at the crate root:
//!
//! - `qkind::dimensions` (the seven SI base dimensions)
//! - `qkind::units` (SI base and named derived units, km, g, min, h, °C, °F)
//! - `qkind::kinds` (Length, Force, Energy, Torque, AbsoluteTemperature, …)
//! - `qkind::rules` (the standard inference rules)
//!
//! # Panics and errors
//!
//! Operators on units and quantities panic when the corresponding `try_*`/`checked_*` method would fail; use those
//! methods to get a `Result` instead.

#![forbid(unsafe_code)]

pub use qkind_core::*;

pub use qkind_core::standard::dimensions;
pub use qkind_core::standard::kinds;
pub use qkind_core::standard::rules;
pub use qkind_core::standard::units;
pub use qkind_core::standard::{standard_registry, standard_rules};
