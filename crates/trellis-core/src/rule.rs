//! Per-segment sizing rules.
//!
//! Every rule is validated when it is built. Range-restricted payloads are
//! wrapped in types whose only constructors check the range, so a
//! `SizingRule` value is always well-formed.

use std::num::{NonZeroU16, NonZeroU32};

use crate::errors::RuleError;

/// A percentage in `0..=100`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Percent(u16);

impl Percent {
    pub fn new(value: u16) -> Result<Self, RuleError> {
        if value > 100 {
            return Err(RuleError::PercentageOutOfRange { value: i64::from(value) });
        }
        Ok(Self(value))
    }

    pub fn get(self) -> u16 {
        self.0
    }
}

/// A `numerator / denominator` share with a positive denominator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Fraction {
    numerator: u32,
    denominator: NonZeroU32,
}

impl Fraction {
    pub fn new(numerator: u32, denominator: u32) -> Result<Self, RuleError> {
        let denominator = NonZeroU32::new(denominator).ok_or(RuleError::ZeroDenominator {
            denominator: i64::from(denominator),
        })?;
        Ok(Self { numerator, denominator })
    }

    pub fn numerator(self) -> u32 {
        self.numerator
    }

    pub fn denominator(self) -> u32 {
        self.denominator.get()
    }
}

/// Relative weight of a `Fill` segment, at least 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FillWeight(NonZeroU16);

impl FillWeight {
    pub const ONE: Self = Self(NonZeroU16::MIN);

    pub fn new(weight: u16) -> Result<Self, RuleError> {
        NonZeroU16::new(weight)
            .map(Self)
            .ok_or(RuleError::FillWeightTooSmall { weight: i64::from(weight) })
    }

    pub fn get(self) -> u16 {
        self.0.get()
    }
}

impl Default for FillWeight {
    fn default() -> Self {
        Self::ONE
    }
}

/// How a single segment is sized along the split axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "RawRule", into = "RawRule"))]
pub enum SizingRule {
    /// Exactly this many cells.
    Length(u16),
    /// A percentage of the available space, rounded down.
    Percentage(Percent),
    /// A ratio of the available space, rounded down.
    Ratio(Fraction),
    /// At least this many cells; otherwise competes for leftover space.
    Min(u16),
    /// At most this many cells; otherwise competes for leftover space.
    Max(u16),
    /// A weighted share of the leftover space.
    Fill(FillWeight),
}

impl SizingRule {
    pub fn length(value: u16) -> Self {
        SizingRule::Length(value)
    }

    pub fn percentage(value: u16) -> Result<Self, RuleError> {
        Percent::new(value).map(SizingRule::Percentage)
    }

    pub fn ratio(numerator: u32, denominator: u32) -> Result<Self, RuleError> {
        Fraction::new(numerator, denominator).map(SizingRule::Ratio)
    }

    pub fn min(value: u16) -> Self {
        SizingRule::Min(value)
    }

    pub fn max(value: u16) -> Self {
        SizingRule::Max(value)
    }

    pub fn fill(weight: u16) -> Result<Self, RuleError> {
        FillWeight::new(weight).map(SizingRule::Fill)
    }

    /// `Fill` with weight 1.
    pub fn fill_default() -> Self {
        SizingRule::Fill(FillWeight::ONE)
    }

    /// Weight this rule contributes to the leftover-space pool.
    ///
    /// `Min` and `Max` count as `Fill(1)`.
    pub fn fill_weight(&self) -> u32 {
        match self {
            SizingRule::Fill(weight) => u32::from(weight.get()),
            SizingRule::Min(_) | SizingRule::Max(_) => 1,
            SizingRule::Length(_) | SizingRule::Percentage(_) | SizingRule::Ratio(_) => 0,
        }
    }

    /// Whether the rule competes for leftover space.
    pub fn is_flexible(&self) -> bool {
        self.fill_weight() > 0
    }

    /// Lower bound this rule forces on its segment.
    pub fn min_bound(&self) -> u16 {
        match self {
            SizingRule::Min(value) => *value,
            _ => 0,
        }
    }
}

/// Unvalidated, signed form of a [`SizingRule`] as it appears in
/// configuration files.
///
/// Serialized externally tagged: `{"length": 20}`, `{"ratio": [1, 3]}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum RawRule {
    Length(i64),
    Percentage(i64),
    Ratio(i64, i64),
    Min(i64),
    Max(i64),
    Fill(i64),
}

fn cells(rule: &'static str, value: i64) -> Result<u16, RuleError> {
    if value < 0 {
        return Err(RuleError::NegativeValue { rule, value });
    }
    u16::try_from(value).map_err(|_| RuleError::ValueTooLarge { rule, value })
}

impl TryFrom<RawRule> for SizingRule {
    type Error = RuleError;

    fn try_from(raw: RawRule) -> Result<Self, Self::Error> {
        match raw {
            RawRule::Length(value) => cells("Length", value).map(SizingRule::Length),
            RawRule::Percentage(value) => {
                if !(0..=100).contains(&value) {
                    return Err(RuleError::PercentageOutOfRange { value });
                }
                SizingRule::percentage(value as u16)
            }
            RawRule::Ratio(numerator, denominator) => {
                if denominator <= 0 {
                    return Err(RuleError::ZeroDenominator { denominator });
                }
                if numerator < 0 {
                    return Err(RuleError::NegativeNumerator { numerator });
                }
                let numerator = u32::try_from(numerator)
                    .map_err(|_| RuleError::ValueTooLarge { rule: "Ratio", value: numerator })?;
                let denominator = u32::try_from(denominator)
                    .map_err(|_| RuleError::ValueTooLarge { rule: "Ratio", value: denominator })?;
                SizingRule::ratio(numerator, denominator)
            }
            RawRule::Min(value) => cells("Min", value).map(SizingRule::Min),
            RawRule::Max(value) => cells("Max", value).map(SizingRule::Max),
            RawRule::Fill(weight) => {
                if weight < 1 {
                    return Err(RuleError::FillWeightTooSmall { weight });
                }
                let weight = u16::try_from(weight)
                    .map_err(|_| RuleError::ValueTooLarge { rule: "Fill", value: weight })?;
                SizingRule::fill(weight)
            }
        }
    }
}

impl From<SizingRule> for RawRule {
    fn from(rule: SizingRule) -> Self {
        match rule {
            SizingRule::Length(value) => RawRule::Length(i64::from(value)),
            SizingRule::Percentage(p) => RawRule::Percentage(i64::from(p.get())),
            SizingRule::Ratio(f) => {
                RawRule::Ratio(i64::from(f.numerator()), i64::from(f.denominator()))
            }
            SizingRule::Min(value) => RawRule::Min(i64::from(value)),
            SizingRule::Max(value) => RawRule::Max(i64::from(value)),
            SizingRule::Fill(weight) => RawRule::Fill(i64::from(weight.get())),
        }
    }
}
