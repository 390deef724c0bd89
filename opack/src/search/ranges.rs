use crate::domination::{DomConfig, DominationOracle};
use crate::entities::{Axis, Interval, Rectangle};

/// One branch point for a rectangle's coordinate on one axis: either a
/// concrete wall-adjacent position or a coarse interior block to be refined
/// after propagation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Candidate {
    Pos(i32),
    Block(Interval),
}

/// Partitions a rectangle's feasible coordinate range into wall-adjacent
/// positions (explored exactly, with dominated gaps skipped) and interior
/// blocks (explored coarsely at a granularity set by `scale`).
///
/// Edge positions are where domination bounds bite; the interior collapses
/// into a handful of representative blocks whose exact coordinate is settled
/// later by the refinement phase.
#[derive(Clone, Copy, Debug)]
pub struct CoordinateRanges {
    scale: f32,
}

impl CoordinateRanges {
    pub fn new(scale: f32) -> Self {
        debug_assert!(scale > 0.0);
        CoordinateRanges { scale }
    }

    /// Candidates for `rect` with edge coordinates in `0..=last`,
    /// restricted to `min_pos..=max_pos.unwrap_or(last)`.
    ///
    /// `min_pos` carries the duplicate-order lower bound, `max_pos` the
    /// symmetry confinement of the root rectangle. When either restriction
    /// is active the corresponding boundary is no longer the box wall and
    /// only the trivial domination configurations apply there.
    pub fn candidates(
        &self,
        rect: &Rectangle,
        axis: Axis,
        last: i32,
        dom: &dyn DominationOracle,
        max_pos: Option<i32>,
        min_pos: i32,
    ) -> Vec<Candidate> {
        let lo = min_pos.max(0);
        let cap = max_pos.unwrap_or(last).min(last);
        if lo > cap {
            return vec![];
        }

        let gap_bound = dom.gap_bound(rect);
        let cfg_left = DomConfig::new(lo == 0, cap == last);
        let cfg_right = DomConfig::new(cap == last, lo == 0);

        let mut seen = vec![false; (last + 1) as usize];
        let mut out = vec![];
        let mut push_pos = |out: &mut Vec<Candidate>, p: i32| {
            if !std::mem::replace(&mut seen[p as usize], true) {
                out.push(Candidate::Pos(p));
            }
        };

        // near-wall positions: gap == coordinate
        let left_end = gap_bound.min(cap);
        for p in lo..=left_end {
            if p > 0 && dom.dominated(rect, p, cfg_left) {
                continue;
            }
            push_pos(&mut out, p);
        }

        // far-wall positions: gap == last - coordinate
        let right_begin = (last - gap_bound).max(lo);
        for p in (right_begin..=cap).rev() {
            let gap = last - p;
            if gap > 0 && dom.dominated(rect, gap, cfg_right) {
                continue;
            }
            push_pos(&mut out, p);
        }

        // interior blocks between the two wall regions
        let mid_lo = (left_end + 1).max(lo);
        let mid_hi = (right_begin - 1).min(cap);
        if mid_lo <= mid_hi {
            let extent = rect.extent(axis);
            let mut block = Interval::init(mid_lo, extent, self.scale, mid_hi);
            while !block.is_empty() {
                out.push(Candidate::Block(block));
                block.next(extent, self.scale, mid_hi);
            }
        }

        out
    }
}

/// Halved explorable range for the first placed rectangle, eliminating
/// mirror-symmetric solutions.
pub fn symmetry_cap(last: i32) -> i32 {
    last / 2
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domination::NoDomination;

    fn count_positions(cands: &[Candidate]) -> usize {
        cands.iter().filter(|c| matches!(c, Candidate::Pos(_))).count()
    }

    /// Oracle claiming every gap in range dominated, for range shaping tests.
    struct AllDominated(i32);

    impl DominationOracle for AllDominated {
        fn gap_bound(&self, _rect: &Rectangle) -> i32 {
            self.0
        }
        fn dominated(&self, _rect: &Rectangle, gap: i32, config: DomConfig) -> bool {
            config.near_wall() && gap <= self.0
        }
    }

    #[test]
    fn covers_every_position_without_domination() {
        let ranges = CoordinateRanges::new(1.0);
        let rect = Rectangle::new(0, 3, 2, false);
        let cands = ranges.candidates(&rect, Axis::X, 4, &NoDomination, None, 0);
        // gap bound 0: positions 0 and 4 as wall positions, rest as blocks
        let mut covered = vec![false; 5];
        for c in &cands {
            match c {
                Candidate::Pos(p) => covered[*p as usize] = true,
                Candidate::Block(iv) => {
                    for p in iv.begin..=iv.end {
                        covered[p as usize] = true;
                    }
                }
            }
        }
        assert!(covered.iter().all(|&c| c));
    }

    #[test]
    fn dominated_gaps_are_skipped_at_both_walls() {
        let ranges = CoordinateRanges::new(1.0);
        let rect = Rectangle::new(0, 3, 2, false);
        let cands = ranges.candidates(&rect, Axis::X, 6, &AllDominated(3), None, 0);
        // only the two flush positions survive; no interior remains
        assert_eq!(cands, vec![Candidate::Pos(0), Candidate::Pos(6)]);
    }

    #[test]
    fn symmetry_cap_halves_the_range() {
        let ranges = CoordinateRanges::new(1.0);
        let rect = Rectangle::new(0, 2, 2, false);
        let cands = ranges.candidates(&rect, Axis::X, 5, &NoDomination, Some(symmetry_cap(5)), 0);
        for c in &cands {
            match c {
                Candidate::Pos(p) => assert!(*p <= 2),
                Candidate::Block(iv) => assert!(iv.end <= 2),
            }
        }
    }

    #[test]
    fn min_pos_respects_duplicate_order() {
        let ranges = CoordinateRanges::new(1.0);
        let rect = Rectangle::new(0, 2, 2, false);
        let cands = ranges.candidates(&rect, Axis::X, 5, &NoDomination, None, 3);
        assert!(count_positions(&cands) > 0);
        for c in &cands {
            match c {
                Candidate::Pos(p) => assert!(*p >= 3),
                Candidate::Block(iv) => assert!(iv.begin >= 3),
            }
        }
    }

    #[test]
    fn empty_when_bounds_cross() {
        let ranges = CoordinateRanges::new(1.0);
        let rect = Rectangle::new(0, 2, 2, false);
        assert!(ranges.candidates(&rect, Axis::X, 5, &NoDomination, Some(1), 3).is_empty());
    }
}
