//! Error types for unit algebra, rule registration, kind inference and quantity arithmetic.

use crate::canonical::MAX_EXPONENT;
use crate::inference::InferencePath;
use crate::kind::QuantityKind;
use crate::rules::Operator;

/// A canonical exponent left the range `-MAX_EXPONENT..=MAX_EXPONENT`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("exponent of '{atom}' overflows the supported range (±{max})", max = MAX_EXPONENT)]
pub struct ExponentOverflow {
    pub atom: String,
}

/// Structural errors raised by the unit layer.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum UnitError {
    /// An affine unit (°C, °F, …) was used in an algebraic operation.
    #[error("cannot {operation} affine unit '{unit}': it only supports offset conversion")]
    AffineComposition {
        unit: String,
        operation: &'static str,
    },

    /// Two units (or a unit and a target) do not share a dimension.
    #[error("dimension mismatch: expected {expected}, found {found}")]
    DimensionMismatch { expected: String, found: String },

    #[error(transparent)]
    Exponent(#[from] ExponentOverflow),
}

/// Errors raised while building a rule registry.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RegistryError {
    #[error("rule registry is sealed; cannot register {rule}")]
    Sealed { rule: String },

    #[error("conflicting inference rule {rule}: key already resolves to {existing}")]
    Conflict { rule: String, existing: String },
}

/// Errors raised by the inference engine.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum InferenceError {
    #[error("no direct inference rule for {left} {operator} {right} and transitive inference is disabled")]
    TransitiveDisabled {
        left: QuantityKind,
        operator: Operator,
        right: QuantityKind,
    },

    #[error("no inference path for {left} {operator} {right} within depth {depth}")]
    NoPath {
        left: QuantityKind,
        operator: Operator,
        right: QuantityKind,
        depth: usize,
    },

    #[error("ambiguous: {} distinct results found for {left} {operator} {right}", distinct_count(.paths))]
    Ambiguous {
        left: QuantityKind,
        operator: Operator,
        right: QuantityKind,
        paths: Vec<InferencePath>,
    },
}

impl InferenceError {
    /// Distinct result kinds of an ambiguous query, in discovery order.
    ///
    /// Empty for every other variant.
    pub fn distinct_results(&self) -> Vec<QuantityKind> {
        match self {
            InferenceError::Ambiguous { paths, .. } => distinct_kinds(paths),
            _ => Vec::new(),
        }
    }
}

fn distinct_kinds(paths: &[InferencePath]) -> Vec<QuantityKind> {
    let mut kinds: Vec<QuantityKind> = Vec::new();
    for path in paths {
        let result = path.result();
        if !kinds.contains(result) {
            kinds.push(result.clone());
        }
    }
    kinds
}

fn distinct_count(paths: &[InferencePath]) -> usize {
    distinct_kinds(paths).len()
}

/// Kind-semantic errors raised by quantity arithmetic.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum KindError {
    #[error("direct addition is not allowed for {kind}")]
    AdditionNotAllowed { kind: QuantityKind },

    #[error("direct subtraction is not allowed for {kind} and it has no difference kind")]
    SubtractionNotAllowed { kind: QuantityKind },

    #[error("cannot {operation} {left} and {right}: kinds are unrelated")]
    IncompatibleKinds {
        operation: &'static str,
        left: QuantityKind,
        right: QuantityKind,
    },

    #[error("no inference rule for {left} {operator} {right} and no dimensionless operand")]
    NoInference {
        left: QuantityKind,
        operator: Operator,
        right: QuantityKind,
    },

    #[error("point-like kind {kind} cannot be scaled")]
    PointScaling { kind: QuantityKind },

    #[error("measurement dimension {found} does not match kind {kind} ({expected})")]
    DimensionMismatch {
        kind: QuantityKind,
        expected: String,
        found: String,
    },

    #[error(transparent)]
    Unit(#[from] UnitError),

    #[error(transparent)]
    Inference(#[from] InferenceError),
}

/// Errors raised while loading [`Settings`](crate::config::Settings).
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Read(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}
