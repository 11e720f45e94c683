//! Property-based tests for rectangle splitting.
//! Each property is checked over generated rule lists and areas.

use proptest::prelude::*;
use trellis_layout::{Direction, Flex, Layout, Margin, Rect, SizingRule};

fn rule() -> impl Strategy<Value = SizingRule> {
    prop_oneof![
        (0u16..=120).prop_map(SizingRule::length),
        (0u16..=100).prop_map(|p| SizingRule::percentage(p).unwrap()),
        (0u32..=8, 1u32..=8).prop_map(|(n, d)| SizingRule::ratio(n, d).unwrap()),
        (0u16..=40).prop_map(SizingRule::min),
        (0u16..=120).prop_map(SizingRule::max),
        (1u16..=5).prop_map(|w| SizingRule::fill(w).unwrap()),
    ]
}

fn flex() -> impl Strategy<Value = Flex> {
    prop_oneof![
        Just(Flex::Start),
        Just(Flex::End),
        Just(Flex::Center),
        Just(Flex::SpaceBetween),
        Just(Flex::SpaceAround),
        Just(Flex::SpaceEvenly),
    ]
}

fn heights(rects: &[Rect]) -> Vec<u16> {
    rects.iter().map(|rect| rect.height).collect()
}

proptest::proptest! {
    /// One rectangle per rule, in any area.
    #[test]
    fn output_count_matches_rules(
        rules in prop::collection::vec(rule(), 0..8),
        width in 0u16..=300,
        height in 0u16..=300,
        spacing in 0u16..=10,
    ) {
        let rects = Layout::vertical(rules.clone())
            .with_spacing(spacing)
            .split(Rect::new(0, 0, width, height));
        prop_assert_eq!(rects.len(), rules.len());
    }

    /// Segments and gaps stay inside the area whenever the gaps and minimums fit.
    #[test]
    fn segments_fit_within_area(
        rules in prop::collection::vec(rule(), 1..7),
        extent in 0u16..=300,
        spacing in 0u16..=6,
        flex in flex(),
    ) {
        let gaps = 2 * u32::from(spacing) * (rules.len() as u32 - 1);
        let minimums: u32 = rules.iter().map(|r| u32::from(r.min_bound())).sum();
        prop_assume!(gaps + minimums <= u32::from(extent));

        let area = Rect::new(3, 5, extent, 10);
        let rects = Layout::horizontal(rules.clone())
            .with_spacing(spacing)
            .with_flex(flex)
            .split(area);

        let used: u32 = rects.iter().map(|r| u32::from(r.width)).sum::<u32>()
            + u32::from(spacing) * (rules.len() as u32 - 1);
        prop_assert!(used <= u32::from(extent), "used {} of {}", used, extent);
        for rect in &rects {
            prop_assert!(rect.left() >= area.left());
            prop_assert!(rect.right() <= area.right());
            prop_assert_eq!(rect.y, area.y);
            prop_assert_eq!(rect.height, area.height);
        }
        for pair in rects.windows(2) {
            prop_assert!(pair[0].right() + spacing <= pair[1].left());
        }
    }

    /// Every rectangle lies inside the inner area, for any rules, spacing,
    /// margin and flex.
    #[test]
    fn segments_stay_inside_inner_area(
        rules in prop::collection::vec(rule(), 1..7),
        x in 0u16..=50,
        y in 0u16..=50,
        extent in 0u16..=120,
        spacing in 0u16..=40,
        margin in 0u16..=8,
        flex in flex(),
        horizontal in any::<bool>(),
    ) {
        let area = Rect::new(x, y, extent, extent);
        let inner = area.inner(Margin::uniform(margin));
        let direction = if horizontal { Direction::Horizontal } else { Direction::Vertical };
        let rects = Layout::new(direction, rules)
            .with_spacing(spacing)
            .with_uniform_margin(margin)
            .with_flex(flex)
            .split(area);

        for rect in &rects {
            prop_assert!(rect.left() >= inner.left(), "{:?} escapes {:?}", rect, inner);
            prop_assert!(rect.top() >= inner.top(), "{:?} escapes {:?}", rect, inner);
            prop_assert!(rect.right() <= inner.right(), "{:?} escapes {:?}", rect, inner);
            prop_assert!(rect.bottom() <= inner.bottom(), "{:?} escapes {:?}", rect, inner);
        }
    }

    /// `Min(v)` is never smaller than `v` while the minimums fit.
    #[test]
    fn min_is_respected(
        rules in prop::collection::vec(rule(), 1..7),
        extent in 0u16..=300,
        spacing in 0u16..=6,
    ) {
        let gaps = 2 * u32::from(spacing) * (rules.len() as u32 - 1);
        let minimums: u32 = rules.iter().map(|r| u32::from(r.min_bound())).sum();
        prop_assume!(gaps + minimums <= u32::from(extent));

        let rects = Layout::vertical(rules.clone())
            .with_spacing(spacing)
            .split(Rect::new(0, 0, 10, extent));
        for (rule, size) in rules.iter().zip(heights(&rects)) {
            if let SizingRule::Min(value) = rule {
                prop_assert!(size >= *value, "{:?} solved to {}", rule, size);
            }
        }
    }

    /// `Max(v)` is never larger than `v`.
    #[test]
    fn max_is_respected(
        rules in prop::collection::vec(rule(), 1..7),
        extent in 0u16..=300,
        spacing in 0u16..=6,
    ) {
        let rects = Layout::vertical(rules.clone())
            .with_spacing(spacing)
            .split(Rect::new(0, 0, 10, extent));
        for (rule, size) in rules.iter().zip(heights(&rects)) {
            if let SizingRule::Max(value) = rule {
                prop_assert!(size <= *value, "{:?} solved to {}", rule, size);
            }
        }
    }

    /// Lengths that fit are honored exactly.
    #[test]
    fn fitting_lengths_are_exact(
        lengths in prop::collection::vec(0u16..=60, 1..6),
        slack in 0u16..=50,
        with_fill in any::<bool>(),
    ) {
        let total: u16 = lengths.iter().sum();
        let mut rules: Vec<SizingRule> = lengths.iter().copied().map(SizingRule::length).collect();
        if with_fill {
            rules.push(SizingRule::fill_default());
        }

        let rects = Layout::vertical(rules).split(Rect::new(0, 0, 1, total + slack));
        prop_assert_eq!(&heights(&rects)[..lengths.len()], &lengths[..]);
    }

    /// A percentage next to a fill gets `floor(available * p / 100)`.
    #[test]
    fn percentage_is_floored(percent in 0u16..=100, extent in 0u16..=400) {
        let rules = [SizingRule::percentage(percent).unwrap(), SizingRule::fill_default()];
        let rects = Layout::vertical(rules).split(Rect::new(0, 0, 1, extent));

        let expected = (u32::from(extent) * u32::from(percent) / 100) as u16;
        prop_assert_eq!(rects[0].height, expected);
        prop_assert_eq!(rects[1].height, extent - expected);
    }

    /// A ratio next to a fill gets `floor(available * n / d)`.
    #[test]
    fn ratio_is_floored(denominator in 1u32..=12, numerator in 0u32..=12, extent in 0u16..=400) {
        prop_assume!(numerator <= denominator);
        let rules = [SizingRule::ratio(numerator, denominator).unwrap(), SizingRule::fill_default()];
        let rects = Layout::vertical(rules).split(Rect::new(0, 0, 1, extent));

        let expected = (u32::from(extent) * numerator / denominator) as u16;
        prop_assert_eq!(rects[0].height, expected);
    }

    /// Splitting the same area twice gives the same rectangles.
    #[test]
    fn split_is_deterministic(
        rules in prop::collection::vec(rule(), 0..7),
        extent in 0u16..=300,
        spacing in 0u16..=6,
        flex in flex(),
        horizontal in any::<bool>(),
    ) {
        let direction = if horizontal { Direction::Horizontal } else { Direction::Vertical };
        let layout = Layout::new(direction, rules)
            .with_spacing(spacing)
            .with_flex(flex);
        let area = Rect::new(1, 2, extent, extent);
        prop_assert_eq!(layout.split(area), layout.split(area));
    }

    /// A uniform margin shrinks a lone fill by twice the margin on each axis.
    #[test]
    fn margin_shrinks_area(
        margin in 0u16..=20,
        width in 40u16..=200,
        height in 40u16..=200,
    ) {
        let area = Rect::new(0, 0, width, height);
        let rects = Layout::vertical([SizingRule::fill_default()])
            .with_uniform_margin(margin)
            .split(area);

        prop_assert_eq!(
            rects,
            vec![Rect::new(margin, margin, width - 2 * margin, height - 2 * margin)]
        );
    }
}
