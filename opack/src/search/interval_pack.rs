use crate::domination::{DomTable, DominationOracle, NoDomination, PackingCache, build_oracle};
use crate::entities::{Axis, BoxDims, Instance, Placement, RectId, Rectangle, Solution};
use crate::occupancy::AxisBins;
use crate::search::packer::{Counters, PackConfig, Packer};
use crate::search::ranges::{Candidate, CoordinateRanges, symmetry_cap};
use crate::search::{branching_order, first_symmetry};
use crate::util::assertions;
use log::{debug, trace};

/// The canonical search driver: depth-first backtracking over per-axis
/// interval domains with compression after every assignment.
///
/// A probe runs three phases through the same push/compress/pop machinery:
/// coordinates on the primary (x) axis are branched first (wall-adjacent
/// positions exactly, the interior as coarse blocks), then every surviving
/// block is refined to a point, and finally the orthogonal (y) axis is
/// assigned with exact pairwise disjointness as the guarantee behind the
/// returned placement. Backtracking restores all state bit-identically via
/// the axis undo logs.
pub struct IntervalPack {
    instance: Instance,
    config: PackConfig,
    template: Option<DomTable>,
    rects: Vec<Rectangle>,
    box_dims: Option<BoxDims>,
    xbins: AxisBins,
    ybins: AxisBins,
    dom_x: Box<dyn DominationOracle>,
    dom_y: Box<dyn DominationOracle>,
    ranges: CoordinateRanges,
    order: Vec<RectId>,
    root: Option<RectId>,
    counters: Counters,
    solution: Option<Solution>,
}

impl IntervalPack {
    /// Builds the per-instance state, including the domination table
    /// template when the general tables apply (the recognized sequential
    /// families use their closed-form oracles instead).
    pub fn new(instance: Instance, config: PackConfig) -> Self {
        let template = (config.use_domination
            && instance.len() > 1
            && !instance.is_sequential_squares()
            && !instance.is_sequential_unoriented())
        .then(|| {
            let mut cache = PackingCache::default();
            DomTable::build(&instance, &mut cache, config.dom_max_fillers)
        });
        let rects = instance.rects.clone();
        IntervalPack {
            instance,
            config,
            template,
            rects,
            box_dims: None,
            xbins: AxisBins::new(Axis::X),
            ybins: AxisBins::new(Axis::Y),
            dom_x: Box::new(NoDomination),
            dom_y: Box::new(NoDomination),
            ranges: CoordinateRanges::new(config.scale),
            order: vec![],
            root: None,
            counters: Counters::default(),
            solution: None,
        }
    }

    fn make_oracle(
        &self,
        axis: Axis,
        box_dims: BoxDims,
        symmetry_root: Option<(RectId, i32)>,
    ) -> Box<dyn DominationOracle> {
        if !self.config.use_domination || self.instance.len() < 2 {
            return Box::new(NoDomination);
        }
        build_oracle(
            &self.instance,
            axis,
            box_dims,
            self.template.as_ref(),
            symmetry_root,
        )
    }

    /// Loosest confinement bound of the root rectangle on `axis` over its
    /// allowed orientations, for the table retraction pass.
    fn symmetry_bound(&self, root: RectId, axis: Axis, box_dims: BoxDims) -> i32 {
        let r = &self.instance.rects[root];
        let extent = if r.rotatable { r.min_dim } else { r.extent(axis) };
        symmetry_cap(box_dims.span(axis) - extent)
    }

    fn dup_min_pos(&self, id: RectId) -> i32 {
        let r = &self.rects[id];
        self.rects
            .iter()
            .filter(|s| s.id < id && s.same_dims(r) && self.xbins.is_tracked(s.id))
            .map(|s| self.xbins.domain(s.id).begin)
            .max()
            .unwrap_or(0)
    }

    fn pack_primary(&mut self, depth: usize) -> bool {
        if depth == self.order.len() {
            return self.refine();
        }
        let id = self.order[depth];
        if self.xbins.is_tracked(id) && self.xbins.domain(id).is_point() {
            // already resolved by compression
            return self.pack_primary(depth + 1);
        }

        let orients: &[bool] = if self.rects[id].rotatable { &[false, true] } else { &[false] };
        for &rotated in orients {
            self.rects[id].rotated = rotated;
            let mark_orient = self.xbins.mark();
            if !self.xbins.is_tracked(id) {
                if !self.xbins.activate(&self.rects[id]) {
                    continue;
                }
                if !self.xbins.compress() {
                    self.xbins.pop_to(mark_orient);
                    continue;
                }
            }

            let last = self.xbins.last(id);
            let max_pos = (Some(id) == self.root).then(|| symmetry_cap(last));
            let min_pos = self.dup_min_pos(id);
            let cands = self.ranges.candidates(
                &self.rects[id],
                Axis::X,
                last,
                self.dom_x.as_ref(),
                max_pos,
                min_pos,
            );
            for cand in cands {
                self.counters.nodes_primary += 1;
                let mark = self.xbins.mark();
                let ok = match cand {
                    Candidate::Pos(p) => self.xbins.place(id, p),
                    Candidate::Block(block) => self.xbins.assign_block(id, block),
                };
                if ok
                    && self.xbins.compress()
                    && self.xbins.area_bound_holds(&self.rects)
                    && self.pack_primary(depth + 1)
                {
                    return true;
                }
                self.xbins.pop_to(mark);
            }
            self.xbins.pop_to(mark_orient);
        }
        self.rects[id].rotated = false;
        false
    }

    /// Settles every surviving interval block to a concrete coordinate.
    fn refine(&mut self) -> bool {
        let next = (0..self.rects.len())
            .find(|&id| self.xbins.is_tracked(id) && !self.xbins.domain(id).is_point());
        let Some(id) = next else {
            return self.pack_ortho_start();
        };

        let d = self.xbins.domain(id);
        let min_pos = self.dup_min_pos(id);
        for p in d.begin.max(min_pos)..=d.end {
            self.counters.nodes_refine += 1;
            let mark = self.xbins.mark();
            if self.xbins.place(id, p)
                && self.xbins.compress()
                && self.xbins.area_bound_holds(&self.rects)
                && self.refine()
            {
                return true;
            }
            self.xbins.pop_to(mark);
        }
        false
    }

    /// Transition into the orthogonal axis: orientations are fixed now, so
    /// the remaining rectangles enter the y model before its search starts.
    fn pack_ortho_start(&mut self) -> bool {
        let mark = self.ybins.mark();
        for id in 0..self.rects.len() {
            if !self.ybins.is_tracked(id) && !self.ybins.activate(&self.rects[id]) {
                self.ybins.pop_to(mark);
                return false;
            }
        }
        if !self.ybins.compress() || !self.ybins.area_bound_holds(&self.rects) {
            self.ybins.pop_to(mark);
            return false;
        }
        for id in 0..self.rects.len() {
            self.rects[id].x = Some(self.xbins.domain(id).begin);
        }

        let found = self.pack_ortho(0);
        if !found {
            self.ybins.pop_to(mark);
            for r in &mut self.rects {
                r.x = None;
            }
        }
        found
    }

    fn pack_ortho(&mut self, depth: usize) -> bool {
        if depth == self.order.len() {
            self.record_solution();
            return true;
        }
        let id = self.order[depth];
        let d = self.ybins.domain(id);
        let x = self.rects[id].x.unwrap();
        let (w, h) = (self.rects[id].w(), self.rects[id].h());

        for y in d.begin..=d.end {
            let clash = self.order[..depth].iter().any(|&s| {
                let rs = &self.rects[s];
                let (sx, sy) = (rs.x.unwrap(), rs.y.unwrap());
                x < sx + rs.w() && sx < x + w && y < sy + rs.h() && sy < y + h
            });
            if clash {
                continue;
            }
            self.counters.nodes_ortho += 1;
            let mark = self.ybins.mark();
            if self.ybins.place(id, y) && self.ybins.compress() {
                self.rects[id].y = Some(y);
                if self.pack_ortho(depth + 1) {
                    return true;
                }
                self.rects[id].y = None;
            }
            self.ybins.pop_to(mark);
        }
        false
    }

    fn record_solution(&mut self) {
        let box_dims = self.box_dims.unwrap();
        let placements = self
            .rects
            .iter()
            .map(|r| Placement {
                id: r.id,
                x: r.x.unwrap(),
                y: r.y.unwrap(),
                rotated: r.rotated,
            })
            .collect();
        let solution = Solution { box_dims, placements };
        debug_assert!(assertions::solution_is_valid(&solution, &self.instance));
        self.solution = Some(solution);
    }
}

fn fits_box(r: &Rectangle, b: BoxDims) -> bool {
    (r.width <= b.width && r.height <= b.height)
        || (r.rotatable && r.height <= b.width && r.width <= b.height)
}

impl Packer for IntervalPack {
    fn init_box(&mut self, box_dims: BoxDims) -> bool {
        self.box_dims = Some(box_dims);
        self.solution = None;
        self.counters = Counters::default();
        for r in &mut self.rects {
            r.reset();
        }

        if self.instance.total_area > box_dims.area() {
            trace!("box {}x{} rejected by total area", box_dims.width, box_dims.height);
            return false;
        }
        if !self.rects.iter().all(|r| fits_box(r, box_dims)) {
            trace!("box {}x{} rejected: a rectangle cannot fit", box_dims.width, box_dims.height);
            return false;
        }

        let n = self.rects.len();
        self.xbins.resize(box_dims, n);
        self.ybins.resize(box_dims, n);

        // root selection runs on tables without the symmetry retraction,
        // which itself needs the root
        let plain_x = self.make_oracle(Axis::X, box_dims, None);
        self.root = (n > 0 && self.config.break_symmetry).then(|| {
            first_symmetry(&self.instance, Axis::X, box_dims.width, plain_x.as_ref(), &self.ranges)
        });
        let sym = |axis: Axis, pack: &Self| {
            pack.root.map(|root| (root, pack.symmetry_bound(root, axis, box_dims)))
        };
        self.dom_x = self.make_oracle(Axis::X, box_dims, sym(Axis::X, self));
        self.dom_y = self.make_oracle(Axis::Y, box_dims, sym(Axis::Y, self));

        self.order = branching_order(
            &self.instance,
            Axis::X,
            box_dims.width,
            self.dom_x.as_ref(),
            &self.ranges,
            self.root,
        );

        // rectangles with a fixed orientation participate in propagation on
        // both axes from the start
        for id in 0..n {
            if !self.rects[id].rotatable
                && (!self.xbins.activate(&self.rects[id]) || !self.ybins.activate(&self.rects[id]))
            {
                return false;
            }
        }
        if !self.xbins.compress() || !self.ybins.compress() {
            return false;
        }
        if !self.xbins.area_bound_holds(&self.rects) || !self.ybins.area_bound_holds(&self.rects) {
            return false;
        }
        true
    }

    fn pack(&mut self) -> bool {
        if self.box_dims.is_none() {
            return false;
        }
        let found = self.pack_primary(0);
        debug!(
            "search finished: {} ({} primary, {} refine, {} ortho nodes)",
            if found { "placement found" } else { "exhausted" },
            self.counters.nodes_primary,
            self.counters.nodes_refine,
            self.counters.nodes_ortho,
        );
        found
    }

    fn solution(&self) -> Option<&Solution> {
        self.solution.as_ref()
    }

    fn counters(&self) -> Counters {
        self.counters
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::RectDesc;

    fn instance(dims: &[(i32, i32, bool)]) -> Instance {
        let descs = dims
            .iter()
            .map(|&(w, h, r)| RectDesc { width: w, height: h, rotatable: r })
            .collect::<Vec<_>>();
        Instance::new(&descs).unwrap()
    }

    fn run(dims: &[(i32, i32, bool)], w: i32, h: i32) -> Option<Solution> {
        let inst = instance(dims);
        let mut packer = IntervalPack::new(inst.clone(), PackConfig::default());
        let feasible = packer.init_box(BoxDims::new(w, h).unwrap()) && packer.pack();
        let solution = packer.solution().cloned();
        if feasible {
            assert!(assertions::solution_is_valid(solution.as_ref().unwrap(), &inst));
        }
        solution
    }

    #[test]
    fn single_rectangle_exact_box() {
        let sol = run(&[(3, 2, false)], 3, 2).unwrap();
        assert_eq!(sol.placements[0], Placement { id: 0, x: 0, y: 0, rotated: false });
    }

    #[test]
    fn two_rectangles_stack() {
        assert!(run(&[(4, 2, false), (4, 2, false)], 4, 4).is_some());
    }

    #[test]
    fn oversized_rectangle_fails_fast() {
        let inst = instance(&[(5, 3, false)]);
        let mut packer = IntervalPack::new(inst, PackConfig::default());
        assert!(!packer.init_box(BoxDims::new(4, 4).unwrap()));
        assert_eq!(packer.counters().total(), 0);
    }

    #[test]
    fn rotation_rescues_a_tight_fit() {
        let sol = run(&[(5, 3, true)], 3, 5).unwrap();
        let p = sol.placements[0];
        assert!(p.rotated);
        assert_eq!((p.x, p.y), (0, 0));
    }

    #[test]
    fn empty_instance_is_trivially_feasible() {
        let sol = run(&[], 1, 1).unwrap();
        assert!(sol.placements.is_empty());
    }

    #[test]
    fn infeasible_by_area_pressure() {
        // 2x2 + 2x2 cannot share a 3x3 box despite the area fitting a 4x2
        assert!(run(&[(2, 2, false), (2, 2, false)], 3, 3).is_none());
    }
}
