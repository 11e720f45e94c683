//! Error types for the Trellis layout engine.

use thiserror::Error;

/// Top-level error type for the Trellis engine.
#[derive(Debug, Error)]
pub enum TrellisError {
    #[error(transparent)]
    Rule(#[from] RuleError),

    #[error(transparent)]
    Solver(#[from] SolverError),

    #[error(transparent)]
    Layout(#[from] LayoutError),
}

/// A sizing rule was constructed with an out-of-range value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuleError {
    #[error("{rule} cannot be negative: {value}")]
    NegativeValue { rule: &'static str, value: i64 },

    #[error("{rule} value {value} does not fit in a cell count")]
    ValueTooLarge { rule: &'static str, value: i64 },

    #[error("Percentage must be between 0 and 100: {value}")]
    PercentageOutOfRange { value: i64 },

    #[error("Ratio denominator must be positive: {denominator}")]
    ZeroDenominator { denominator: i64 },

    #[error("Ratio numerator cannot be negative: {numerator}")]
    NegativeNumerator { numerator: i64 },

    #[error("Fill weight must be at least 1: {weight}")]
    FillWeightTooSmall { weight: i64 },
}

/// Errors raised by the constraint solver.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SolverError {
    /// A required constraint conflicts with earlier required constraints.
    #[error("The constraint cannot be satisfied")]
    UnsatisfiableConstraint,

    #[error("The constraint is not in the solver")]
    UnknownConstraint,

    /// The tableau reached a state the simplex method rules out.
    #[error("Internal solver error: {0}")]
    InternalError(&'static str),
}

/// Errors during layout computation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LayoutError {
    #[error("Segment constraints could not be solved: {0}")]
    Solver(#[from] SolverError),
}
