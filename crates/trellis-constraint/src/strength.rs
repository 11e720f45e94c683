//! Constraint strengths.

/// Constraint strength levels.
///
/// A strength packs three tiers into one number: `strong * 1e6 + medium * 1e3
/// + weak`, each component in `[0, 1000]`. A whole tier therefore outweighs
/// any amount of the tiers below it, and a weight inside a tier orders
/// constraints of the same tier.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default)]
pub struct Strength(f64);

impl Strength {
    pub const REQUIRED: Strength = Strength(1_001_001_000.0);
    pub const STRONG: Strength = Strength(1_000_000.0);
    pub const MEDIUM: Strength = Strength(1_000.0);
    pub const WEAK: Strength = Strength(1.0);

    /// Create a raw strength, clipped to `[0, REQUIRED]`.
    pub fn new(value: f64) -> Self {
        Self(value.clamp(0.0, Self::REQUIRED.0))
    }

    /// Build a strength from its tier components, scaled by `weight`.
    pub fn create(strong: f64, medium: f64, weak: f64, weight: f64) -> Self {
        let strong = strong.clamp(0.0, 1000.0) * weight;
        let medium = medium.clamp(0.0, 1000.0) * weight;
        let weak = weak.clamp(0.0, 1000.0) * weight;
        Self::new(strong * 1_000_000.0 + medium * 1_000.0 + weak)
    }

    /// A strength inside the weak tier; `weight` is clamped to `[0, 1000]`.
    pub fn weak_weighted(weight: f64) -> Self {
        Self::create(0.0, 0.0, weight, 1.0)
    }

    pub fn value(self) -> f64 {
        self.0
    }

    /// Check if this is a required constraint.
    pub fn is_required(self) -> bool {
        self.0 >= Self::REQUIRED.0
    }
}
