//! Constraint solving for Trellis layouts.
//!
//! This crate implements:
//! - Linear expressions over solver variables
//! - Prioritized constraint strengths
//! - The Cassowary simplex algorithm
//! - Translation of sizing rules into segment constraints

mod cassowary;
mod expression;
mod solver;
mod strength;

pub use cassowary::{ConstraintId, Solver};
pub use expression::{Constraint, Expression, Relation, Term, Variable};
pub use solver::{gap_total, solve_segments, Sizes};
pub use strength::Strength;
pub use trellis_core::SolverError;
