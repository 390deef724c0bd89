use crate::domination::{DomConfig, DominationOracle};
use crate::entities::{Axis, Rectangle};

/// Domination for the sequential unoriented-rectangle family
/// (k x (k+1) for k = 1..=n, all rotatable).
///
/// Like [`super::SquareDom`] this sidesteps the recursive table build, but
/// the family is orientation-sensitive: eligibility of a filler depends on
/// which of its sides runs along the gap. A filler that fits the gap width
/// but not the strip beside the rectangle could still use the gap column
/// elsewhere, which voids the claim outright (the conservative,
/// box-independent reading).
#[derive(Clone, Copy, Debug)]
pub struct URectDom {
    n: usize,
    axis: Axis,
}

impl URectDom {
    pub fn new(n: usize, axis: Axis) -> Self {
        URectDom { n, axis }
    }
}

impl DominationOracle for URectDom {
    fn gap_bound(&self, rect: &Rectangle) -> i32 {
        rect.extent(self.axis)
    }

    fn dominated(&self, rect: &Rectangle, gap: i32, config: DomConfig) -> bool {
        let extent = rect.extent(self.axis);
        let span = rect.demand(self.axis);
        if gap < 1 || gap > extent {
            return false;
        }
        let k = rect.min_dim;
        let mut eligible_area: u64 = 0;
        let mut any_eligible = false;
        for j in 1..=(self.n as i32).min(gap) {
            if j == k {
                continue;
            }
            let fits_strip = (j <= gap && j + 1 <= span) || (j + 1 <= gap && j <= span);
            if fits_strip {
                any_eligible = true;
                eligible_area += j as u64 * (j + 1) as u64;
            } else {
                // fits the gap width only: a potential column dweller
                return false;
            }
        }
        if !any_eligible {
            return true;
        }
        config.near_wall() && eligible_area < gap as u64 * span as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn family_rect(k: i32) -> Rectangle {
        Rectangle::new(0, k, k + 1, true)
    }

    #[test]
    fn small_gaps_beside_larger_members_are_dominated() {
        let dom = URectDom::new(4, Axis::X);
        // 1-wide gap beside the 2x3: only the 1x2 fits, area 2 < 3
        assert!(dom.dominated(&family_rect(2), 1, DomConfig::TT));
        assert!(!dom.dominated(&family_rect(2), 1, DomConfig::FF));
        // 1-wide gap beside the 1x2 itself: nothing else has a unit side
        assert!(dom.dominated(&family_rect(1), 1, DomConfig::TT));
    }

    #[test]
    fn sufficient_filler_area_is_not_dominated() {
        let dom = URectDom::new(4, Axis::X);
        // 3-wide gap beside the 4x5: fillers 1x2, 2x3, 3x4 give area 20 >= 15
        assert!(!dom.dominated(&family_rect(4), 3, DomConfig::TT));
    }

    #[test]
    fn rotation_changes_the_table() {
        let dom = URectDom::new(4, Axis::X);
        let mut r = family_rect(3);
        // unrotated: extent 3; gap 3 is in range
        assert_eq!(dom.gap_bound(&r), 3);
        r.rotated = true;
        assert_eq!(dom.gap_bound(&r), 4);
        assert!(!dom.dominated(&r, 5, DomConfig::TT));
    }
}
