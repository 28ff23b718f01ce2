//! Line wrapping and gap computation.
//!
//! Everything here works in vertical orientation: `y` is the main axis and
//! `x` the cross axis. Horizontal containers are flipped by the engine before
//! and after.

use glam::DVec2;
use listflex_config::{Alignment, Distribution};
use smallvec::SmallVec;

/// A run of consecutive items sharing the main axis.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Line {
    /// Indices into the sorted item list
    pub items: SmallVec<[usize; 8]>,
    /// Largest cross-axis extent among the members
    pub cross: f64,
}

/// Split items into lines along the main axis.
///
/// With `wraps` set, a line is closed when the next item would overflow
/// `space`. A line always holds at least one item, so an item larger than the
/// space still gets a line of its own. Without wrapping every item shares a
/// single line.
pub fn wrap_lines(sizes: &[DVec2], space: f64, gap: f64, wraps: bool) -> Vec<Line> {
    let mut lines = Vec::new();
    let mut current = Line::default();
    let mut used = 0.0;

    for (i, size) in sizes.iter().enumerate() {
        let needed = if current.items.is_empty() { size.y } else { used + gap + size.y };

        if wraps && !current.items.is_empty() && needed > space {
            lines.push(std::mem::take(&mut current));
            used = size.y;
        } else {
            used = needed;
        }

        current.items.push(i);
        current.cross = current.cross.max(size.x);
    }

    if !current.items.is_empty() {
        lines.push(current);
    }

    lines
}

/// Leading offset and step between consecutive entries on one axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spacing {
    /// Space before the first entry
    pub lead: f64,
    /// Space between consecutive entries
    pub between: f64,
}

impl Spacing {
    /// Compute spacing for `count` entries occupying `used` of `available`.
    ///
    /// `used` already includes the base `gap` between entries. Space modes
    /// never distribute negative space; static alignment may offset the block
    /// outside the container when it overflows.
    pub fn resolve(
        distribution: Distribution,
        alignment: Alignment,
        available: f64,
        used: f64,
        count: usize,
        gap: f64,
    ) -> Spacing {
        let extra = (available - used).max(0.0);

        match distribution {
            Distribution::SpaceAround if count > 0 => {
                let space = extra / count as f64;
                Spacing { lead: space / 2.0, between: gap + space }
            }
            Distribution::SpaceBetween if count > 1 => Spacing {
                lead: 0.0,
                between: gap + extra / (count - 1) as f64,
            },
            Distribution::SpaceEvenly if count > 0 => {
                let space = extra / (count + 1) as f64;
                Spacing { lead: space, between: gap + space }
            }
            Distribution::None => Spacing {
                lead: alignment.offset(available, used),
                between: gap,
            },
            _ => Spacing { lead: 0.0, between: gap },
        }
    }
}

/// Total extent of `extents` laid end to end with `gap` between them.
pub(crate) fn span(extents: impl Iterator<Item = f64>, gap: f64) -> f64 {
    let mut total = 0.0;
    let mut count = 0;
    for extent in extents {
        total += extent;
        count += 1;
    }
    if count > 1 {
        total += gap * (count - 1) as f64;
    }
    total
}

#[cfg(test)]
mod tests {
    use super::*;

    fn main_sizes(extents: &[f64]) -> Vec<DVec2> {
        extents.iter().map(|&e| DVec2::new(10.0, e)).collect()
    }

    #[test]
    fn test_wrap_boundary() {
        let lines = wrap_lines(&main_sizes(&[60.0, 60.0]), 100.0, 0.0, true);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].items.as_slice(), &[0]);
        assert_eq!(lines[1].items.as_slice(), &[1]);
    }

    #[test]
    fn test_oversized_item_gets_its_own_line() {
        let lines = wrap_lines(&main_sizes(&[150.0, 30.0, 30.0]), 100.0, 0.0, true);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].items.as_slice(), &[0]);
        assert_eq!(lines[1].items.as_slice(), &[1, 2]);
    }

    #[test]
    fn test_gap_counts_toward_overflow() {
        // 45 + 10 + 45 = 100 fits exactly; a third item does not.
        let lines = wrap_lines(&main_sizes(&[45.0, 45.0, 45.0]), 100.0, 10.0, true);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].items.as_slice(), &[0, 1]);
    }

    #[test]
    fn test_no_wrap_keeps_single_line() {
        let lines = wrap_lines(&main_sizes(&[60.0, 60.0, 60.0]), 100.0, 0.0, false);
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].items.len(), 3);
    }

    #[test]
    fn test_line_cross_is_max_member_extent() {
        let sizes = vec![DVec2::new(20.0, 10.0), DVec2::new(35.0, 10.0), DVec2::new(5.0, 10.0)];
        let lines = wrap_lines(&sizes, 100.0, 0.0, true);
        assert!((lines[0].cross - 35.0).abs() < 0.001);
    }

    #[test]
    fn test_empty_input_has_no_lines() {
        assert!(wrap_lines(&[], 100.0, 0.0, true).is_empty());
    }

    #[test]
    fn test_space_between() {
        // Three 50px entries in 300px: 150 extra over two gaps.
        let spacing = Spacing::resolve(
            Distribution::SpaceBetween,
            Alignment::Start,
            300.0,
            150.0,
            3,
            0.0,
        );
        assert_eq!(spacing, Spacing { lead: 0.0, between: 75.0 });
    }

    #[test]
    fn test_space_between_single_entry_adds_nothing() {
        let spacing = Spacing::resolve(
            Distribution::SpaceBetween,
            Alignment::Start,
            300.0,
            50.0,
            1,
            8.0,
        );
        assert_eq!(spacing, Spacing { lead: 0.0, between: 8.0 });
    }

    #[test]
    fn test_space_around() {
        let spacing = Spacing::resolve(
            Distribution::SpaceAround,
            Alignment::Start,
            200.0,
            100.0,
            2,
            0.0,
        );
        assert_eq!(spacing, Spacing { lead: 25.0, between: 50.0 });
    }

    #[test]
    fn test_space_evenly() {
        let spacing = Spacing::resolve(
            Distribution::SpaceEvenly,
            Alignment::Start,
            180.0,
            90.0,
            3,
            0.0,
        );
        assert!((spacing.lead - 22.5).abs() < 0.001);
        assert!((spacing.between - 22.5).abs() < 0.001);
    }

    #[test]
    fn test_space_modes_ignore_overflow() {
        let spacing = Spacing::resolve(
            Distribution::SpaceEvenly,
            Alignment::Start,
            100.0,
            140.0,
            2,
            4.0,
        );
        assert_eq!(spacing, Spacing { lead: 0.0, between: 4.0 });
    }

    #[test]
    fn test_static_alignment() {
        let center = Spacing::resolve(Distribution::None, Alignment::Center, 200.0, 50.0, 1, 0.0);
        assert!((center.lead - 75.0).abs() < 0.001);
        let end = Spacing::resolve(Distribution::None, Alignment::End, 200.0, 50.0, 1, 0.0);
        assert!((end.lead - 150.0).abs() < 0.001);
    }

    #[test]
    fn test_span() {
        assert!((span([10.0, 20.0, 30.0].into_iter(), 5.0) - 70.0).abs() < 0.001);
        assert!((span(std::iter::empty(), 5.0)).abs() < 0.001);
    }
}
