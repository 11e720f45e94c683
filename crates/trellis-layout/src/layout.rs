//! Splitting a rectangle into segments.

use trellis_constraint::{gap_total, solve_segments};
use trellis_core::{Direction, LayoutError, Margin, Rect, SizingRule};

use crate::flex::Flex;

/// How to split an area into an ordered run of segments.
///
/// A `Layout` is an immutable value: the `with_*` methods return a modified
/// copy. Splitting does not mutate it, so one layout can be reused for every
/// frame.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Layout {
    direction: Direction,
    rules: Vec<SizingRule>,
    margin: Margin,
    spacing: u16,
    flex: Flex,
}

impl Layout {
    pub fn new(direction: Direction, rules: impl IntoIterator<Item = SizingRule>) -> Self {
        Self {
            direction,
            rules: rules.into_iter().collect(),
            ..Default::default()
        }
    }

    /// Segments stacked top to bottom.
    pub fn vertical(rules: impl IntoIterator<Item = SizingRule>) -> Self {
        Self::new(Direction::Vertical, rules)
    }

    /// Segments placed left to right.
    pub fn horizontal(rules: impl IntoIterator<Item = SizingRule>) -> Self {
        Self::new(Direction::Horizontal, rules)
    }

    pub fn with_direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    pub fn with_rules(mut self, rules: impl IntoIterator<Item = SizingRule>) -> Self {
        self.rules = rules.into_iter().collect();
        self
    }

    pub fn with_margin(mut self, margin: Margin) -> Self {
        self.margin = margin;
        self
    }

    /// Set the same margin on every side.
    pub fn with_uniform_margin(self, value: u16) -> Self {
        self.with_margin(Margin::uniform(value))
    }

    /// Set the gap between adjacent segments.
    pub fn with_spacing(mut self, spacing: u16) -> Self {
        self.spacing = spacing;
        self
    }

    pub fn with_flex(mut self, flex: Flex) -> Self {
        self.flex = flex;
        self
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn rules(&self) -> &[SizingRule] {
        &self.rules
    }

    pub fn margin(&self) -> Margin {
        self.margin
    }

    pub fn spacing(&self) -> u16 {
        self.spacing
    }

    pub fn flex(&self) -> Flex {
        self.flex
    }

    /// Split `area` into one rectangle per rule, in rule order.
    ///
    /// # Panics
    ///
    /// Panics if the required segment constraints cannot be solved. The
    /// required set is built to always be feasible, so this indicates a bug;
    /// use [`Layout::try_split`] to receive it as an error instead.
    pub fn split(&self, area: Rect) -> Vec<Rect> {
        match self.try_split(area) {
            Ok(rects) => rects,
            Err(err) => {
                tracing::error!(%err, ?area, layout = ?self, "layout solve failed");
                panic!("layout invariant violated: {err}");
            }
        }
    }

    /// Split `area` into one rectangle per rule, in rule order.
    pub fn try_split(&self, area: Rect) -> Result<Vec<Rect>, LayoutError> {
        if self.rules.is_empty() {
            return Ok(Vec::new());
        }

        let inner = area.inner(self.margin);
        let count = self.rules.len();
        let available = u32::from(inner.extent(self.direction));
        let total_spacing = gap_total(count, self.spacing);
        // available fits in u16 and saturating_sub only shrinks it
        let distributable = available.saturating_sub(total_spacing) as u16;

        let sizes = solve_segments(&self.rules, distributable, self.spacing)?;

        let used = sizes
            .iter()
            .fold(total_spacing, |acc, &size| acc.saturating_add(u32::from(size)));
        let leftover = available.saturating_sub(used);
        let offsets = self.flex.offsets(leftover, count);
        if leftover > 0 && self.flex != Flex::Start {
            tracing::debug!(leftover, flex = ?self.flex, "distributing leftover space");
        }

        let start = match self.direction {
            Direction::Horizontal => inner.x,
            Direction::Vertical => inner.y,
        };
        // Segments never cross the far edge of the inner area
        let end = u32::from(start) + available;
        let mut position = u32::from(start).saturating_add(offsets.lead);

        let rects = sizes
            .iter()
            .enumerate()
            .map(|(i, &size)| {
                let clamped = position.min(end);
                let offset = u16::try_from(clamped).unwrap_or(u16::MAX);
                // visible <= size, so it fits in u16
                let visible = u32::from(size).min(end - clamped) as u16;
                let rect = match self.direction {
                    Direction::Horizontal => Rect::new(offset, inner.y, visible, inner.height),
                    Direction::Vertical => Rect::new(inner.x, offset, inner.width, visible),
                };
                position = position
                    .saturating_add(u32::from(size))
                    .saturating_add(u32::from(self.spacing))
                    .saturating_add(offsets.gap_after(i));
                rect
            })
            .collect();

        Ok(rects)
    }
}
