//! Core types for the Trellis layout engine.
//!
//! This crate provides:
//! - Cell geometry (`Rect`, `Margin`, `Position`, `Size`, `Direction`)
//! - The validated `SizingRule` model
//! - Error types shared by the solver and the layout crates

pub mod errors;
pub mod rule;
pub mod types;

pub use errors::{LayoutError, RuleError, SolverError, TrellisError};
pub use rule::{FillWeight, Fraction, Percent, RawRule, SizingRule};
pub use types::{Direction, Margin, Position, Rect, Size};
