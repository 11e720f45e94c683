//! Placement of the space a layout's segments leave unused.

use smallvec::SmallVec;

/// Where leftover space along the split axis goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Flex {
    /// Pack segments at the start; leftover space trails the last segment.
    #[default]
    Start,
    /// Pack segments at the end
    End,
    /// Center segments
    Center,
    /// Leftover space goes between segments, none at the edges
    SpaceBetween,
    /// Each segment gets equal space on both sides, so gaps are twice the edges
    SpaceAround,
    /// Edges and gaps all get equal space
    SpaceEvenly,
}

/// Extra cells inserted before the first segment and after each segment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct FlexOffsets {
    pub lead: u32,
    /// Extra cells in the gap after segment `i`; one entry per gap.
    pub gaps: SmallVec<[u32; 8]>,
}

impl FlexOffsets {
    pub fn gap_after(&self, index: usize) -> u32 {
        self.gaps.get(index).copied().unwrap_or(0)
    }
}

/// Split `total` into `slots` near-equal parts, remainder to the first ones.
fn distribute(total: u32, slots: usize) -> impl Iterator<Item = u32> {
    let slots_u32 = slots.max(1) as u32;
    let base = total / slots_u32;
    let remainder = (total % slots_u32) as usize;
    (0..slots).map(move |i| base + u32::from(i < remainder))
}

impl Flex {
    pub(crate) fn offsets(self, leftover: u32, count: usize) -> FlexOffsets {
        let gap_count = count.saturating_sub(1);
        let none = || SmallVec::from_elem(0, gap_count);

        match self {
            Flex::Start => FlexOffsets { lead: 0, gaps: none() },
            Flex::End => FlexOffsets { lead: leftover, gaps: none() },
            Flex::Center => FlexOffsets { lead: leftover / 2, gaps: none() },
            Flex::SpaceBetween if gap_count == 0 => FlexOffsets { lead: 0, gaps: none() },
            Flex::SpaceBetween => FlexOffsets {
                lead: 0,
                gaps: distribute(leftover, gap_count).collect(),
            },
            Flex::SpaceAround => {
                // One half-unit on each side of every segment
                let halves: SmallVec<[u32; 16]> = distribute(leftover, count * 2).collect();
                FlexOffsets {
                    lead: halves.first().copied().unwrap_or(0),
                    gaps: (0..gap_count)
                        .map(|i| halves[2 * i + 1] + halves[2 * i + 2])
                        .collect(),
                }
            }
            Flex::SpaceEvenly => {
                let mut slots = distribute(leftover, count + 1);
                FlexOffsets {
                    lead: slots.next().unwrap_or(0),
                    gaps: slots.take(gap_count).collect(),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distribute_remainder_first() {
        assert_eq!(distribute(10, 3).collect::<Vec<_>>(), vec![4, 3, 3]);
        assert_eq!(distribute(0, 2).collect::<Vec<_>>(), vec![0, 0]);
        assert_eq!(distribute(5, 0).count(), 0);
    }

    #[test]
    fn test_start_end_center() {
        assert_eq!(Flex::Start.offsets(9, 3).lead, 0);
        assert_eq!(Flex::End.offsets(9, 3).lead, 9);
        assert_eq!(Flex::Center.offsets(9, 3).lead, 4);
        assert_eq!(Flex::Center.offsets(9, 3).gaps.as_slice(), &[0, 0]);
    }

    #[test]
    fn test_space_between() {
        let offsets = Flex::SpaceBetween.offsets(7, 3);
        assert_eq!(offsets.lead, 0);
        assert_eq!(offsets.gaps.as_slice(), &[4, 3]);

        let single = Flex::SpaceBetween.offsets(7, 1);
        assert_eq!(single, FlexOffsets::default());
    }

    #[test]
    fn test_space_around() {
        // 12 cells over 2 segments: 3 | a | 6 | b | 3
        let offsets = Flex::SpaceAround.offsets(12, 2);
        assert_eq!(offsets.lead, 3);
        assert_eq!(offsets.gaps.as_slice(), &[6]);
    }

    #[test]
    fn test_space_evenly() {
        // 10 cells over 2 segments: 4 | a | 3 | b | 3
        let offsets = Flex::SpaceEvenly.offsets(10, 2);
        assert_eq!(offsets.lead, 4);
        assert_eq!(offsets.gaps.as_slice(), &[3]);
        assert_eq!(offsets.gap_after(5), 0);
    }
}
