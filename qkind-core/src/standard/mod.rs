//! Standard catalog.
//!
//! `qkind-core` ships a small SI catalog so that quantity arithmetic works out of the box:
//!
//! - [`dimensions`]: the seven SI base dimensions.
//! - [`units`]: SI base units, a few named derived units, common scaled units and the affine °C / °F.
//! - [`kinds`]: standard quantity kinds, tagged by domain.
//! - [`rules`]: the standard inference rules, frozen by [`standard_rules`].

pub mod dimensions;
pub mod kinds;
pub mod rules;
pub mod units;

pub use rules::{standard_registry, standard_rules};
