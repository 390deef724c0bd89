use crate::entities::{Instance, Solution};
use itertools::Itertools;
use log::error;

//Various checks to verify correctness of the state of the system.
//Used in debug_assert!() blocks and by the scenario tests.

/// Every rectangle placed exactly once, inside the box, pairwise disjoint,
/// with dimensions matching the instance.
pub fn solution_is_valid(solution: &Solution, instance: &Instance) -> bool {
    let b = solution.box_dims;

    if solution.placements.len() != instance.len() {
        error!(
            "solution places {} of {} rectangles",
            solution.placements.len(),
            instance.len()
        );
        return false;
    }

    let mut seen = vec![false; instance.len()];
    for p in &solution.placements {
        if std::mem::replace(&mut seen[p.id], true) {
            error!("rectangle {} placed twice", p.id);
            return false;
        }
        let r = &instance.rects[p.id];
        if p.rotated && !(r.rotatable || r.width == r.height) {
            error!("rectangle {} rotated but not rotatable", p.id);
            return false;
        }
        let (w, h) = if p.rotated { (r.height, r.width) } else { (r.width, r.height) };
        if p.x < 0 || p.y < 0 || p.x + w > b.width || p.y + h > b.height {
            error!("rectangle {} out of bounds at ({}, {})", p.id, p.x, p.y);
            return false;
        }
    }

    for (a, c) in solution.placements.iter().tuple_combinations() {
        let ra = &instance.rects[a.id];
        let rc = &instance.rects[c.id];
        let (aw, ah) = if a.rotated { (ra.height, ra.width) } else { (ra.width, ra.height) };
        let (cw, ch) = if c.rotated { (rc.height, rc.width) } else { (rc.width, rc.height) };
        let x_overlap = a.x < c.x + cw && c.x < a.x + aw;
        let y_overlap = a.y < c.y + ch && c.y < a.y + ah;
        if x_overlap && y_overlap {
            error!("rectangles {} and {} overlap", a.id, c.id);
            return false;
        }
    }

    true
}
