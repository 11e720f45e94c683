//! Geometry value types measured in terminal cells.

/// Axis along which a layout splits its area.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Direction {
    /// Segments are laid out left to right (a row).
    Horizontal,
    /// Segments are laid out top to bottom (a column).
    #[default]
    Vertical,
}

impl Direction {
    /// The perpendicular direction.
    pub fn orthogonal(self) -> Self {
        match self {
            Direction::Horizontal => Direction::Vertical,
            Direction::Vertical => Direction::Horizontal,
        }
    }
}

/// A cell coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Position {
    pub x: u16,
    pub y: u16,
}

impl Position {
    pub const ORIGIN: Self = Self { x: 0, y: 0 };

    pub const fn new(x: u16, y: u16) -> Self {
        Self { x, y }
    }

    /// Move by the given deltas, saturating at the coordinate bounds.
    pub fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: saturating_shift(self.x, dx),
            y: saturating_shift(self.y, dy),
        }
    }
}

fn saturating_shift(value: u16, delta: i32) -> u16 {
    (i32::from(value) + delta).clamp(0, i32::from(u16::MAX)) as u16
}

/// A width/height pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Size {
    pub width: u16,
    pub height: u16,
}

impl Size {
    pub const ZERO: Self = Self { width: 0, height: 0 };

    pub const fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }

    /// Number of cells covered.
    pub fn area(&self) -> u32 {
        u32::from(self.width) * u32::from(self.height)
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// Insets applied to each side of a rectangle before it is split.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Margin {
    pub top: u16,
    pub right: u16,
    pub bottom: u16,
    pub left: u16,
}

impl Margin {
    pub const NONE: Self = Self { top: 0, right: 0, bottom: 0, left: 0 };

    pub const fn new(top: u16, right: u16, bottom: u16, left: u16) -> Self {
        Self { top, right, bottom, left }
    }

    /// Create uniform margin.
    pub const fn uniform(value: u16) -> Self {
        Self::new(value, value, value, value)
    }

    /// Create symmetric margin.
    pub const fn symmetric(vertical: u16, horizontal: u16) -> Self {
        Self::new(vertical, horizontal, vertical, horizontal)
    }

    /// Margin on the left and right sides only.
    pub const fn horizontal(value: u16) -> Self {
        Self::new(0, value, 0, value)
    }

    /// Margin on the top and bottom sides only.
    pub const fn vertical(value: u16) -> Self {
        Self::new(value, 0, value, 0)
    }

    /// Total horizontal margin.
    pub fn horizontal_total(&self) -> u16 {
        self.left.saturating_add(self.right)
    }

    /// Total vertical margin.
    pub fn vertical_total(&self) -> u16 {
        self.top.saturating_add(self.bottom)
    }
}

/// An axis-aligned rectangle of terminal cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rect {
    pub x: u16,
    pub y: u16,
    pub width: u16,
    pub height: u16,
}

impl Rect {
    pub const ZERO: Self = Self { x: 0, y: 0, width: 0, height: 0 };

    pub const fn new(x: u16, y: u16, width: u16, height: u16) -> Self {
        Self { x, y, width, height }
    }

    /// Number of cells covered.
    pub fn area(&self) -> u32 {
        self.size().area()
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn left(&self) -> u16 {
        self.x
    }

    /// The exclusive right edge (x + width).
    pub fn right(&self) -> u16 {
        self.x.saturating_add(self.width)
    }

    pub fn top(&self) -> u16 {
        self.y
    }

    /// The exclusive bottom edge (y + height).
    pub fn bottom(&self) -> u16 {
        self.y.saturating_add(self.height)
    }

    pub fn position(&self) -> Position {
        Position::new(self.x, self.y)
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Extent along the given direction's main axis.
    pub fn extent(&self, direction: Direction) -> u16 {
        match direction {
            Direction::Horizontal => self.width,
            Direction::Vertical => self.height,
        }
    }

    /// Check if a cell lies inside the rectangle.
    pub fn contains(&self, position: Position) -> bool {
        position.x >= self.x
            && position.x < self.right()
            && position.y >= self.y
            && position.y < self.bottom()
    }

    /// Shrink by the margin on every side.
    ///
    /// A margin larger than the rectangle collapses that axis to zero; the
    /// result always lies within `self`.
    pub fn inner(&self, margin: Margin) -> Rect {
        Rect {
            x: self.x.saturating_add(margin.left.min(self.width)),
            y: self.y.saturating_add(margin.top.min(self.height)),
            width: self.width.saturating_sub(margin.horizontal_total()),
            height: self.height.saturating_sub(margin.vertical_total()),
        }
    }
}

impl From<(Position, Size)> for Rect {
    fn from((position, size): (Position, Size)) -> Self {
        Self::new(position.x, position.y, size.width, size.height)
    }
}
