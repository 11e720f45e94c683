//! Segment constraint system.
//!
//! This module bridges Trellis sizing rules and the Cassowary simplex solver:
//! every segment gets a size and a position variable, the positions are
//! chained through the sizes and the spacing, and each rule adds its own
//! constraint on its segment's size.

use smallvec::SmallVec;
use trellis_core::{SizingRule, SolverError};

use crate::cassowary::Solver;
use crate::expression::Variable;
use crate::strength::Strength;

/// Segment sizes in rule order.
pub type Sizes = SmallVec<[u16; 8]>;

/// Solve the sizes of `rules` laid out in `available` cells with `spacing`
/// cells between neighbours.
///
/// Each call builds and discards its own solver.
pub fn solve_segments(
    rules: &[SizingRule],
    available: u16,
    spacing: u16,
) -> Result<Sizes, SolverError> {
    if rules.is_empty() {
        return Ok(Sizes::new());
    }
    SegmentSystem::new(rules, available, spacing).solve()
}

/// Solver variables for one segment.
#[derive(Debug, Clone, Copy)]
struct SegmentVars {
    size: Variable,
    position: Variable,
}

/// The constraint system for one split axis.
#[derive(Debug)]
struct SegmentSystem<'a> {
    solver: Solver,
    rules: &'a [SizingRule],
    segments: SmallVec<[SegmentVars; 8]>,
    end: Variable,
    available: u16,
    spacing: u16,
    /// Σ Fill weights plus one per Min/Max rule
    fill_pool: u32,
    /// REQUIRED lower bound per segment, see [`min_floors`]
    floors: SmallVec<[u16; 8]>,
}

impl<'a> SegmentSystem<'a> {
    fn new(rules: &'a [SizingRule], available: u16, spacing: u16) -> Self {
        let mut solver = Solver::new();
        let segments = (0..rules.len())
            .map(|i| SegmentVars {
                size: solver.new_variable(format!("size_{i}")),
                position: solver.new_variable(format!("pos_{i}")),
            })
            .collect();
        let end = solver.new_variable("pos_end");
        let fill_pool = rules.iter().map(SizingRule::fill_weight).sum();
        let room = u32::from(available).saturating_sub(gap_total(rules.len(), spacing));
        let floors = min_floors(rules, room);

        Self {
            solver,
            rules,
            segments,
            end,
            available,
            spacing,
            fill_pool,
            floors,
        }
    }

    fn solve(mut self) -> Result<Sizes, SolverError> {
        tracing::debug!(
            segments = self.rules.len(),
            available = self.available,
            spacing = self.spacing,
            fill_pool = self.fill_pool,
            "solving segment constraints"
        );

        let bound = self.bound();
        self.add_structural_constraints(bound)?;
        for i in 0..self.rules.len() {
            self.add_rule_constraints(i)?;
        }

        self.solver.update_variables();
        let sizes = self.extract_sizes(bound);
        tracing::debug!(?sizes, "segment sizes solved");
        Ok(sizes)
    }

    /// Total of all gaps between segments.
    fn total_spacing(&self) -> u32 {
        gap_total(self.rules.len(), self.spacing)
    }

    /// Upper bound for the end of the last segment.
    ///
    /// This is `available` unless the gaps alone exceed it. Every segment is
    /// then forced to zero size, since no `Min` floor survives in
    /// [`min_floors`].
    fn bound(&self) -> u32 {
        let gaps = self.total_spacing();
        let available = u32::from(self.available);
        if gaps > available {
            tracing::debug!(available, gaps, "spacing exceeds the available space");
        }
        available.max(gaps)
    }

    /// Position chaining, non-negative sizes and the total-fits bound.
    fn add_structural_constraints(&mut self, bound: u32) -> Result<(), SolverError> {
        let count = self.segments.len();

        for segment in &self.segments {
            self.solver
                .add_constraint(segment.size.greater_or_equal(0.0, Strength::REQUIRED))?;
        }

        self.solver
            .add_constraint(self.segments[0].position.equal_to(0.0, Strength::REQUIRED))?;

        for (i, segment) in self.segments.iter().enumerate() {
            let gap = if i + 1 < count { f64::from(self.spacing) } else { 0.0 };
            let next = self.segments.get(i + 1).map_or(self.end, |s| s.position);
            self.solver.add_constraint(
                next.equal_to(segment.position + segment.size + gap, Strength::REQUIRED),
            )?;
        }

        self.solver
            .add_constraint(self.end.less_or_equal(f64::from(bound), Strength::REQUIRED))?;
        Ok(())
    }

    fn add_rule_constraints(&mut self, index: usize) -> Result<(), SolverError> {
        let size = self.segments[index].size;
        let available = u64::from(self.available);

        match self.rules[index] {
            SizingRule::Length(value) => {
                self.solver
                    .add_constraint(size.equal_to(f64::from(value), Strength::STRONG))?;
            }
            SizingRule::Percentage(percent) => {
                let target = available * u64::from(percent.get()) / 100;
                self.solver
                    .add_constraint(size.equal_to(target as f64, Strength::STRONG))?;
            }
            SizingRule::Ratio(fraction) => {
                let target =
                    available * u64::from(fraction.numerator()) / u64::from(fraction.denominator());
                self.solver
                    .add_constraint(size.equal_to(target as f64, Strength::STRONG))?;
            }
            SizingRule::Min(value) => {
                let floor = f64::from(self.floors[index]);
                let value = f64::from(value);
                self.solver
                    .add_constraint(size.greater_or_equal(floor, Strength::REQUIRED))?;
                if let Some(share) = self.fill_share(1) {
                    self.solver
                        .add_constraint(size.equal_to(value.max(share), Strength::WEAK))?;
                }
            }
            SizingRule::Max(value) => {
                let value = f64::from(value);
                self.solver
                    .add_constraint(size.less_or_equal(value, Strength::REQUIRED))?;
                if let Some(share) = self.fill_share(1) {
                    self.solver
                        .add_constraint(size.equal_to(value.min(share), Strength::WEAK))?;
                }
            }
            SizingRule::Fill(weight) => {
                let weight = weight.get();
                if let Some(share) = self.fill_share(weight) {
                    let strength = Strength::weak_weighted(f64::from(weight));
                    self.solver.add_constraint(size.equal_to(share, strength))?;
                }
            }
        }
        Ok(())
    }

    /// `available * weight / pool`, or `None` without any flexible rule.
    fn fill_share(&self, weight: u16) -> Option<f64> {
        (self.fill_pool > 0).then(|| {
            f64::from(self.available) * f64::from(weight) / f64::from(self.fill_pool)
        })
    }

    /// Round the solved sizes to whole cells.
    ///
    /// Rounding half up can push the total one or more cells past the bound
    /// when several sizes end in `.5`; those cells are taken back from the
    /// segments that were rounded up, last segment first.
    fn extract_sizes(&self, bound: u32) -> Sizes {
        let raw: SmallVec<[f64; 8]> = self
            .segments
            .iter()
            .map(|segment| self.solver.value_of(segment.size))
            .collect();
        let mut sizes: Sizes = raw
            .iter()
            .map(|&value| value.round().clamp(0.0, f64::from(u16::MAX)) as u16)
            .collect();

        let used = sizes
            .iter()
            .fold(self.total_spacing(), |acc, &s| acc.saturating_add(u32::from(s)));
        let mut overflow = used.saturating_sub(bound);
        if overflow > 0 {
            tracing::debug!(overflow, "trimming cells added by rounding");
        }

        for i in (0..sizes.len()).rev() {
            if overflow == 0 {
                break;
            }
            let rounded_up = f64::from(sizes[i]) > raw[i];
            if rounded_up && sizes[i] > self.floors[i] {
                sizes[i] -= 1;
                overflow -= 1;
            }
        }

        sizes
    }
}

/// Cells taken by the gaps between `count` segments: `spacing * (count - 1)`,
/// saturating.
pub fn gap_total(count: usize, spacing: u16) -> u32 {
    let gaps = u32::try_from(count.saturating_sub(1)).unwrap_or(u32::MAX);
    u32::from(spacing).saturating_mul(gaps)
}

/// The REQUIRED floor of each segment.
///
/// `Min(v)` rules keep their full `v` while the floors fit in `room`, the
/// space left after the gaps. Once they no longer fit, earlier rules keep
/// their floor and later ones get what is left, possibly zero, so the
/// segments never outgrow the available space.
fn min_floors(rules: &[SizingRule], room: u32) -> SmallVec<[u16; 8]> {
    let requested = rules
        .iter()
        .fold(0u32, |acc, rule| acc.saturating_add(u32::from(rule.min_bound())));
    if requested > room {
        tracing::debug!(requested, room, "minimum sizes exceed the available space");
    }

    let mut remaining = room;
    rules
        .iter()
        .map(|rule| {
            let floor = u32::from(rule.min_bound()).min(remaining);
            remaining -= floor;
            // floor <= min_bound, which is a u16
            floor as u16
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solve(rules: &[SizingRule], available: u16, spacing: u16) -> Vec<u16> {
        solve_segments(rules, available, spacing).unwrap().to_vec()
    }

    #[test]
    fn test_no_rules() {
        assert!(solve_segments(&[], 100, 2).unwrap().is_empty());
    }

    #[test]
    fn test_lengths() {
        let rules = [SizingRule::length(20), SizingRule::length(30), SizingRule::length(50)];
        assert_eq!(solve(&rules, 100, 0), vec![20, 30, 50]);
    }

    #[test]
    fn test_lengths_leave_remainder_unassigned() {
        let rules = [SizingRule::length(10), SizingRule::length(20)];
        assert_eq!(solve(&rules, 100, 0), vec![10, 20]);
    }

    #[test]
    fn test_percentage_rounds_down() {
        let rules = [SizingRule::percentage(33).unwrap(), SizingRule::percentage(50).unwrap()];
        // 47 * 33 / 100 = 15.51 -> 15, 47 * 50 / 100 = 23.5 -> 23
        assert_eq!(solve(&rules, 47, 0), vec![15, 23]);
    }

    #[test]
    fn test_ratio_rounds_down() {
        let rules = [SizingRule::ratio(1, 3).unwrap(), SizingRule::ratio(2, 3).unwrap()];
        assert_eq!(solve(&rules, 100, 0), vec![33, 66]);
    }

    #[test]
    fn test_length_and_fill() {
        let rules = [SizingRule::length(20), SizingRule::fill_default()];
        assert_eq!(solve(&rules, 100, 0), vec![20, 80]);
    }

    #[test]
    fn test_equal_fills_split_evenly() {
        let rules = [SizingRule::fill_default(), SizingRule::fill_default()];
        assert_eq!(solve(&rules, 100, 0), vec![50, 50]);
    }

    #[test]
    fn test_weighted_fills() {
        let rules = [SizingRule::fill(1).unwrap(), SizingRule::fill(3).unwrap()];
        assert_eq!(solve(&rules, 100, 0), vec![25, 75]);
    }

    #[test]
    fn test_min_takes_fill_share() {
        let rules = [SizingRule::min(30), SizingRule::fill_default()];
        let sizes = solve(&rules, 100, 0);
        assert!(sizes[0] >= 30);
        assert_eq!(sizes.iter().sum::<u16>(), 100);
    }

    #[test]
    fn test_min_above_share() {
        let rules = [SizingRule::min(70), SizingRule::fill_default()];
        assert_eq!(solve(&rules, 100, 0), vec![70, 30]);
    }

    #[test]
    fn test_max_caps_segment() {
        // Fill only pulls towards its own share of the pool (100 / 2), so the
        // cells Max gives up stay unassigned.
        let rules = [SizingRule::max(10), SizingRule::fill_default()];
        assert_eq!(solve(&rules, 100, 0), vec![10, 50]);
    }

    #[test]
    fn test_max_above_share() {
        let rules = [SizingRule::max(80), SizingRule::fill_default()];
        assert_eq!(solve(&rules, 100, 0), vec![50, 50]);
    }

    #[test]
    fn test_spacing_counts_against_bound() {
        let rules = [SizingRule::length(40), SizingRule::length(40)];
        assert_eq!(solve(&rules, 90, 10), vec![40, 40]);
    }

    #[test]
    fn test_lengths_shrink_to_fit() {
        let rules = [SizingRule::length(60), SizingRule::length(60)];
        let sizes = solve(&rules, 100, 0);
        assert_eq!(sizes.iter().sum::<u16>(), 100);
    }

    #[test]
    fn test_spacing_larger_than_space() {
        let rules = [SizingRule::fill_default(), SizingRule::fill_default()];
        assert_eq!(solve(&rules, 0, 10), vec![0, 0]);
    }

    #[test]
    fn test_zero_available() {
        let rules = [SizingRule::length(5), SizingRule::fill_default()];
        assert_eq!(solve(&rules, 0, 0), vec![0, 0]);
    }

    #[test]
    fn test_min_capped_by_available() {
        let rules = [SizingRule::min(20)];
        assert_eq!(solve(&rules, 10, 0), vec![10]);
    }

    #[test]
    fn test_min_floors_shrink_in_rule_order() {
        // 8 + 8 cannot fit in 10: the first Min keeps 8, the second gets 2,
        // and the Length gives up its cells
        let rules = [SizingRule::length(4), SizingRule::min(8), SizingRule::min(8)];
        assert_eq!(solve(&rules, 10, 0), vec![0, 8, 2]);
    }

    #[test]
    fn test_min_floors_leave_room_for_spacing() {
        let rules = [SizingRule::min(6), SizingRule::min(6)];
        let sizes = solve(&rules, 10, 2);
        assert_eq!(sizes.to_vec(), vec![6, 2]);
    }

    #[test]
    fn test_min_floors() {
        let rules = [SizingRule::min(5), SizingRule::fill_default(), SizingRule::min(7)];
        assert_eq!(min_floors(&rules, 20).to_vec(), vec![5, 0, 7]);
        assert_eq!(min_floors(&rules, 9).to_vec(), vec![5, 0, 4]);
        assert_eq!(min_floors(&rules, 0).to_vec(), vec![0, 0, 0]);
    }

    #[test]
    fn test_gap_total_saturates() {
        assert_eq!(gap_total(0, 5), 0);
        assert_eq!(gap_total(1, 5), 0);
        assert_eq!(gap_total(4, 5), 15);
        assert_eq!(gap_total(usize::MAX, u16::MAX), u32::MAX);
    }

    #[test]
    fn test_rounding_never_overflows() {
        let rules = [SizingRule::fill_default(), SizingRule::fill_default()];
        let sizes = solve(&rules, 101, 0);
        assert_eq!(sizes.iter().map(|&s| u32::from(s)).sum::<u32>(), 101);
    }

    #[test]
    fn test_deterministic() {
        let rules = [
            SizingRule::min(3),
            SizingRule::fill(2).unwrap(),
            SizingRule::max(7),
            SizingRule::percentage(10).unwrap(),
        ];
        let first = solve(&rules, 61, 1);
        for _ in 0..5 {
            assert_eq!(solve(&rules, 61, 1), first);
        }
    }
}
