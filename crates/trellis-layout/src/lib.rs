//! Constraint-based layout for terminal user interfaces.
//!
//! A [`Layout`] splits a rectangle of cells into an ordered run of segments,
//! one per [`SizingRule`], along a row or a column.
//!
//! # Architecture
//!
//! 1. **Margin**: the area is shrunk by the layout's margin
//! 2. **Constraint solving**: sizing rules are solved by `trellis-constraint`
//! 3. **Placement**: segments are positioned with spacing and flex offsets
//!
//! # Example
//!
//! ```
//! use trellis_layout::{Layout, Rect, SizingRule};
//!
//! let area = Rect::new(0, 0, 80, 24);
//! let rows = Layout::vertical([SizingRule::length(3), SizingRule::fill_default()]).split(area);
//!
//! assert_eq!(rows[0], Rect::new(0, 0, 80, 3));
//! assert_eq!(rows[1], Rect::new(0, 3, 80, 21));
//! ```

mod config;
mod flex;
mod layout;

pub use config::LayoutConfig;
pub use flex::Flex;
pub use layout::Layout;
pub use trellis_core::{
    Direction, LayoutError, Margin, Position, RawRule, Rect, RuleError, Size, SizingRule,
};
