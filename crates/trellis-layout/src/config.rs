//! Serializable layout descriptions.
//!
//! A [`LayoutConfig`] is what a theme or configuration file deserializes into.
//! Its rules are kept in their raw signed form until [`LayoutConfig::into_layout`]
//! validates them, so an out-of-range value is reported as a [`RuleError`]
//! naming the offending rule rather than as a generic parse failure.

use serde::{Deserialize, Serialize};
use trellis_core::{Direction, Margin, RawRule, RuleError, SizingRule};

use crate::flex::Flex;
use crate::layout::Layout;

/// Declarative form of a [`Layout`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutConfig {
    #[serde(default)]
    pub direction: Direction,
    pub rules: Vec<RawRule>,
    #[serde(default)]
    pub margin: Margin,
    #[serde(default)]
    pub spacing: u16,
    #[serde(default)]
    pub flex: Flex,
}

impl LayoutConfig {
    /// Validate every rule and build the layout.
    pub fn into_layout(self) -> Result<Layout, RuleError> {
        let rules = self
            .rules
            .into_iter()
            .map(SizingRule::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Layout::new(self.direction, rules)
            .with_margin(self.margin)
            .with_spacing(self.spacing)
            .with_flex(self.flex))
    }
}

impl TryFrom<LayoutConfig> for Layout {
    type Error = RuleError;

    fn try_from(config: LayoutConfig) -> Result<Self, Self::Error> {
        config.into_layout()
    }
}

impl From<&Layout> for LayoutConfig {
    fn from(layout: &Layout) -> Self {
        Self {
            direction: layout.direction(),
            rules: layout.rules().iter().copied().map(RawRule::from).collect(),
            margin: layout.margin(),
            spacing: layout.spacing(),
            flex: layout.flex(),
        }
    }
}
