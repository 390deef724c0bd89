use crate::domination::DominationOracle;
use crate::entities::{Axis, Instance, RectId, Rectangle};
use crate::search::ranges::CoordinateRanges;
use itertools::Itertools;
use std::cmp::Reverse;

fn orientations(rect: &Rectangle) -> &'static [bool] {
    if rect.rotatable { &[false, true] } else { &[false] }
}

/// Number of branch points the coordinate ranges will generate for the
/// rectangle on `axis`, summed over its allowed orientations. Orientations
/// that do not fit the axis contribute nothing.
pub fn branching_factor(
    rect: &Rectangle,
    axis: Axis,
    n_coords: i32,
    dom: &dyn DominationOracle,
    ranges: &CoordinateRanges,
) -> u64 {
    let mut probe = rect.clone();
    let mut total = 0;
    for &rotated in orientations(rect) {
        probe.rotated = rotated;
        let last = n_coords - probe.extent(axis);
        if last < 0 {
            continue;
        }
        total += ranges.candidates(&probe, axis, last, dom, None, 0).len() as u64;
    }
    total
}

/// Variable order for the search: cheapest branching first, larger area as
/// tie-break. Duplicates keep their id order (the fixed relative order the
/// domination tables assume); `root` is moved to the front.
pub fn branching_order(
    instance: &Instance,
    axis: Axis,
    n_coords: i32,
    dom: &dyn DominationOracle,
    ranges: &CoordinateRanges,
    root: Option<RectId>,
) -> Vec<RectId> {
    let mut order = instance
        .rects
        .iter()
        .map(|r| r.id)
        .sorted_by_key(|&id| {
            let r = &instance.rects[id];
            (
                branching_factor(r, axis, n_coords, dom, ranges),
                Reverse(r.area),
                id,
            )
        })
        .collect_vec();
    if let Some(root) = root {
        let pos = order.iter().position(|&id| id == root).unwrap();
        order.remove(pos);
        order.insert(0, root);
    }
    order
}

/// Picks the rectangle whose branching benefits most from the halved
/// symmetry range: prefer one that is already down to a unique branch in
/// every orientation, else the one with the most branches to cut, else the
/// tallest, else the first.
///
/// Only the first rectangle of each dimension group is eligible: halving
/// the range of a later duplicate can conflict with the fixed relative
/// order among equals and lose every representative of a solution class.
pub fn first_symmetry(
    instance: &Instance,
    axis: Axis,
    n_coords: i32,
    dom: &dyn DominationOracle,
    ranges: &CoordinateRanges,
) -> RectId {
    debug_assert!(!instance.is_empty());
    let eligible = instance
        .rects
        .iter()
        .filter(|r| instance.rects.iter().find(|s| s.same_dims(r)).unwrap().id == r.id)
        .collect_vec();
    let factor = |r: &Rectangle| {
        orientations(r)
            .iter()
            .map(|&rotated| {
                let mut probe = r.clone();
                probe.rotated = rotated;
                let last = n_coords - probe.extent(axis);
                if last < 0 {
                    return 0;
                }
                ranges.candidates(&probe, axis, last, dom, None, 0).len() as u64
            })
            .collect_vec()
    };
    let factors = eligible.iter().map(|r| factor(r)).collect_vec();

    if let Some(i) = factors.iter().position(|fs| fs.iter().all(|&f| f == 1)) {
        return eligible[i].id;
    }
    if factors.iter().any(|fs| fs.iter().any(|&f| f > 1)) {
        let (i, _) = factors
            .iter()
            .enumerate()
            .max_by_key(|(i, fs)| (fs.iter().sum::<u64>(), Reverse(*i)))
            .unwrap();
        return eligible[i].id;
    }
    eligible
        .iter()
        .max_by_key(|r| (r.height, Reverse(r.id)))
        .unwrap()
        .id
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domination::NoDomination;
    use crate::entities::RectDesc;

    fn instance(dims: &[(i32, i32)]) -> Instance {
        let descs = dims
            .iter()
            .map(|&(w, h)| RectDesc { width: w, height: h, rotatable: false })
            .collect_vec();
        Instance::new(&descs).unwrap()
    }

    #[test]
    fn wider_rectangles_branch_less() {
        let ranges = CoordinateRanges::new(1.0);
        let inst = instance(&[(1, 1), (4, 1)]);
        let narrow = branching_factor(&inst.rects[0], Axis::X, 6, &NoDomination, &ranges);
        let wide = branching_factor(&inst.rects[1], Axis::X, 6, &NoDomination, &ranges);
        assert!(wide < narrow);
    }

    #[test]
    fn rotatable_rectangles_count_both_orientations() {
        let ranges = CoordinateRanges::new(1.0);
        let fixed = Rectangle::new(0, 2, 3, false);
        let free = Rectangle::new(1, 2, 3, true);
        let f = branching_factor(&fixed, Axis::X, 6, &NoDomination, &ranges);
        let r = branching_factor(&free, Axis::X, 6, &NoDomination, &ranges);
        assert!(r > f);
    }

    #[test]
    fn order_starts_at_the_root_and_prefers_constrained_rects(){
        let ranges = CoordinateRanges::new(1.0);
        let inst = instance(&[(1, 1), (5, 1), (3, 1)]);
        let order = branching_order(&inst, Axis::X, 6, &NoDomination, &ranges, Some(2));
        assert_eq!(order[0], 2);
        // the 5-wide rectangle has fewer candidate positions than the 1-wide
        let pos_wide = order.iter().position(|&id| id == 1).unwrap();
        let pos_narrow = order.iter().position(|&id| id == 0).unwrap();
        assert!(pos_wide < pos_narrow);
    }

    #[test]
    fn first_symmetry_prefers_unique_branches() {
        let ranges = CoordinateRanges::new(1.0);
        // the 6-wide rectangle has exactly one position in a 6-wide box
        let inst = instance(&[(2, 2), (6, 1)]);
        assert_eq!(first_symmetry(&inst, Axis::X, 6, &NoDomination, &ranges), 1);
    }
}
