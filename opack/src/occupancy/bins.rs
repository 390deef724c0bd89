use crate::entities::{Axis, BoxDims, Interval, RectId, Rectangle};
use crate::occupancy::WasteHistogram;
use crate::util::FastRemove;

/// Outcome of tightening one rectangle's domain against the capacity vector.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AdjustResult {
    Unchanged,
    Shrunk,
    Conflict,
}

/// Position in the undo log; everything recorded after a mark can be reversed
/// exactly with [`AxisBins::pop_to`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LogMark(usize);

/// Reversible domain edit. Every mutation of the occupancy state appends one
/// of these; undoing replays them strictly LIFO.
#[derive(Clone, Copy, Debug)]
enum Edit {
    /// A rectangle entered domain tracking with a fresh full-range interval.
    Activate { rect: RectId, in_active: bool },
    /// A rectangle's interval was narrowed; `resolved` marks its removal
    /// from the compression worklist upon reaching a single point.
    Narrow { rect: RectId, prev: Interval, resolved: bool },
    /// A rectangle was marked placed.
    Place { rect: RectId },
}

/// Occupancy model for one axis of one candidate bounding box.
///
/// Maintains the remaining capacity at every coordinate of the axis, the
/// waste histogram mirroring it, and the interval domain of every tracked
/// rectangle. A tracked rectangle's contribution to the capacity vector is
/// always exactly the compulsory region of its current interval, so placement
/// (narrowing to a point) and propagation (narrowing by compression) go
/// through the same strip bookkeeping and undo identically.
#[derive(Clone, Debug)]
pub struct AxisBins {
    axis: Axis,
    capacity: i32,
    bins: Vec<i32>,
    waste: WasteHistogram,
    domains: Vec<Interval>,
    ext: Vec<i32>,
    dem: Vec<i32>,
    tracked: Vec<bool>,
    placed: Vec<bool>,
    active: FastRemove,
    log: Vec<Edit>,
}

impl AxisBins {
    pub fn new(axis: Axis) -> Self {
        AxisBins {
            axis,
            capacity: 0,
            bins: vec![],
            waste: WasteHistogram::default(),
            domains: vec![],
            ext: vec![],
            dem: vec![],
            tracked: vec![],
            placed: vec![],
            active: FastRemove::default(),
            log: vec![],
        }
    }

    pub fn axis(&self) -> Axis {
        self.axis
    }

    /// Reallocates all state for a new candidate box.
    pub fn resize(&mut self, box_dims: BoxDims, n_rects: usize) {
        let n_coords = box_dims.span(self.axis);
        self.capacity = box_dims.span(self.axis.orthogonal());
        self.bins.clear();
        self.bins.resize(n_coords as usize, self.capacity);
        self.waste.reset(self.capacity, n_coords);
        self.domains.clear();
        self.domains.resize(n_rects, Interval::default());
        self.ext.clear();
        self.ext.resize(n_rects, 0);
        self.dem.clear();
        self.dem.resize(n_rects, 0);
        self.tracked.clear();
        self.tracked.resize(n_rects, false);
        self.placed.clear();
        self.placed.resize(n_rects, false);
        self.active.reset(n_rects);
        self.log.clear();
    }

    pub fn n_coords(&self) -> i32 {
        self.bins.len() as i32
    }

    /// Highest feasible edge coordinate for a tracked rectangle.
    pub fn last(&self, rect: RectId) -> i32 {
        self.n_coords() - self.ext[rect]
    }

    pub fn domain(&self, rect: RectId) -> Interval {
        self.domains[rect]
    }

    pub fn is_tracked(&self, rect: RectId) -> bool {
        self.tracked[rect]
    }

    pub fn is_placed(&self, rect: RectId) -> bool {
        self.placed[rect]
    }

    /// Whether the rectangle is still on the compression worklist (its
    /// domain has not resolved to a single point).
    pub fn is_unresolved(&self, rect: RectId) -> bool {
        self.active.contains(rect)
    }

    pub fn mark(&self) -> LogMark {
        LogMark(self.log.len())
    }

    /// Starts tracking a rectangle under its current orientation: full-range
    /// domain, initial compulsory strips. Returns false when the rectangle
    /// does not fit the axis at all or its compulsory region is unsupported;
    /// nothing is recorded in that case.
    pub fn activate(&mut self, r: &Rectangle) -> bool {
        let id = r.id;
        debug_assert!(!self.tracked[id]);
        let ext = r.extent(self.axis);
        let dem = r.demand(self.axis);
        let last = self.n_coords() - ext;
        if last < 0 {
            return false;
        }
        let full = Interval::full(last, ext);
        if let Some((lo, hi)) = full.compulsory(ext)
            && !self.supported(lo, hi, dem, None)
        {
            return false;
        }
        self.ext[id] = ext;
        self.dem[id] = dem;
        self.domains[id] = full;
        self.tracked[id] = true;
        let in_active = !full.is_point();
        if in_active {
            self.active.insert(id);
        }
        if let Some((lo, hi)) = full.compulsory(ext) {
            self.draw_strips(lo, hi, dem);
        }
        self.log.push(Edit::Activate { rect: id, in_active });
        true
    }

    /// Fixes a tracked rectangle's edge at `at`: narrows its domain to a
    /// point and marks it placed. Returns false (recording nothing) when the
    /// position is outside the domain or its footprint is unsupported.
    pub fn place(&mut self, rect: RectId, at: i32) -> bool {
        debug_assert!(self.tracked[rect] && !self.placed[rect]);
        let (ext, dem) = (self.ext[rect], self.dem[rect]);
        let d = self.domains[rect];
        if !d.contains(at) || !self.supported(at, at + ext - 1, dem, d.compulsory(ext)) {
            return false;
        }
        self.narrow(rect, Interval::point(at, ext));
        self.placed[rect] = true;
        self.log.push(Edit::Place { rect });
        true
    }

    /// Narrows a tracked rectangle's domain to the part of `block` it can
    /// still support, tightening the block's ends against the capacity
    /// vector. Returns false (recording nothing) when nothing in the block
    /// is feasible.
    pub fn assign_block(&mut self, rect: RectId, block: Interval) -> bool {
        debug_assert!(self.tracked[rect]);
        let d = self.domains[rect];
        let lo = block.begin.max(d.begin);
        let hi = block.end.min(d.end);
        if lo > hi {
            return false;
        }
        match self.tighten(rect, lo, hi) {
            None => false,
            Some((b, e)) => {
                let ext = self.ext[rect];
                if (b, e) != (d.begin, d.end) {
                    self.narrow(rect, Interval { begin: b, end: e, width: ext - (e - b) });
                }
                true
            }
        }
    }

    /// O(extent) pre-filter: could the rectangle's footprint at `at` still be
    /// supported by the capacity vector?
    pub fn can_fit(&self, r: &Rectangle, at: i32) -> bool {
        let (ext, dem) = if self.tracked[r.id] {
            (self.ext[r.id], self.dem[r.id])
        } else {
            (r.extent(self.axis), r.demand(self.axis))
        };
        if at < 0 || at + ext > self.n_coords() {
            return false;
        }
        if self.tracked[r.id] && !self.domains[r.id].contains(at) {
            return false;
        }
        let own = if self.tracked[r.id] {
            self.domains[r.id].compulsory(ext)
        } else {
            None
        };
        self.supported(at, at + ext - 1, dem, own)
    }

    /// Constraint propagation to fixpoint: repeatedly tightens the domain of
    /// every unresolved rectangle against the capacity vector until a full
    /// pass changes nothing. Returns false exactly when some domain became
    /// empty; the caller must backtrack (all edits up to its mark are still
    /// recorded and reversible).
    pub fn compress(&mut self) -> bool {
        loop {
            let mut changed = false;
            let mut i = 0;
            while i < self.active.len() {
                let rect = self.active.get(i);
                match self.adjust_domain(rect) {
                    AdjustResult::Conflict => return false,
                    AdjustResult::Shrunk => {
                        changed = true;
                        // a resolved rectangle was swap-removed from the
                        // worklist; the slot now holds a different element
                        if i < self.active.len() && self.active.get(i) == rect {
                            i += 1;
                        }
                    }
                    AdjustResult::Unchanged => i += 1,
                }
            }
            if !changed {
                return true;
            }
        }
    }

    /// Tightens one rectangle's domain in place.
    pub fn adjust_domain(&mut self, rect: RectId) -> AdjustResult {
        let d = self.domains[rect];
        match self.tighten(rect, d.begin, d.end) {
            None => AdjustResult::Conflict,
            Some((b, e)) if (b, e) == (d.begin, d.end) => AdjustResult::Unchanged,
            Some((b, e)) => {
                let ext = self.ext[rect];
                self.narrow(rect, Interval { begin: b, end: e, width: ext - (e - b) });
                AdjustResult::Shrunk
            }
        }
    }

    /// Reverses every edit recorded after `mark`, restoring the capacity
    /// vector, waste histogram and all domains bit-identically.
    pub fn pop_to(&mut self, mark: LogMark) {
        while self.log.len() > mark.0 {
            match self.log.pop().unwrap() {
                Edit::Narrow { rect, prev, resolved } => self.decompress(rect, prev, resolved),
                Edit::Activate { rect, in_active } => {
                    let ext = self.ext[rect];
                    let dem = self.dem[rect];
                    if let Some((lo, hi)) = self.domains[rect].compulsory(ext) {
                        self.erase_strips(lo, hi, dem);
                    }
                    self.tracked[rect] = false;
                    if in_active {
                        self.active.remove(rect);
                    }
                }
                Edit::Place { rect } => self.placed[rect] = false,
            }
        }
    }

    /// Exact reversal of one domain narrowing: removes the strips drawn for
    /// the newly-compulsory coordinates and restores the wider interval.
    fn decompress(&mut self, rect: RectId, prev: Interval, resolved: bool) {
        let ext = self.ext[rect];
        let dem = self.dem[rect];
        let cur = self.domains[rect];
        if let Some((c_lo, c_hi)) = cur.compulsory(ext) {
            match prev.compulsory(ext) {
                Some((p_lo, p_hi)) => {
                    if c_lo < p_lo {
                        self.erase_strips(c_lo, p_lo - 1, dem);
                    }
                    if c_hi > p_hi {
                        self.erase_strips(p_hi + 1, c_hi, dem);
                    }
                }
                None => self.erase_strips(c_lo, c_hi, dem),
            }
        }
        self.domains[rect] = prev;
        if resolved {
            self.active.insert(rect);
        }
    }

    /// Area-based prune: remaining free capacity, minus the free capacity no
    /// remaining rectangle can use, must cover the rectangle area not yet
    /// reflected in the capacity vector.
    pub fn area_bound_holds(&self, rects: &[Rectangle]) -> bool {
        let mut remaining: u64 = 0;
        let mut min_dem = i32::MAX;
        for r in rects {
            if self.tracked[r.id] {
                let d = self.domains[r.id];
                let contributed = d
                    .compulsory(self.ext[r.id])
                    .map_or(0, |(lo, hi)| (hi - lo + 1) as u64 * self.dem[r.id] as u64);
                debug_assert!(contributed <= r.area);
                if contributed < r.area {
                    remaining += r.area - contributed;
                    min_dem = min_dem.min(self.dem[r.id]);
                }
            } else {
                remaining += r.area;
                let dem = if r.rotatable { r.min_dim } else { r.demand(self.axis) };
                min_dem = min_dem.min(dem);
            }
        }
        if remaining == 0 {
            return true;
        }
        let free = self.waste.total();
        let wasted = self.waste.wasted_below(min_dem);
        free - wasted >= remaining
    }

    /// Debug check: histogram and capacity vector agree.
    pub fn verify_waste(&self) -> bool {
        self.waste.matches(&self.bins)
    }

    /// Debug check: the capacity vector equals a from-scratch recomputation
    /// from the tracked rectangles' compulsory regions.
    pub fn verify_bins(&self) -> bool {
        let mut fresh = vec![self.capacity; self.bins.len()];
        for rect in 0..self.domains.len() {
            if !self.tracked[rect] {
                continue;
            }
            if let Some((lo, hi)) = self.domains[rect].compulsory(self.ext[rect]) {
                for c in lo..=hi {
                    fresh[c as usize] -= self.dem[rect];
                }
            }
        }
        fresh == self.bins
    }

    /// Finds the tightest sub-range of `lo..=hi` whose two end positions are
    /// both fully supported (every covered coordinate has remaining capacity
    /// at least the demand, counting the rectangle's own contribution).
    /// `None` when no position in the range is feasible.
    fn tighten(&self, rect: RectId, lo: i32, hi: i32) -> Option<(i32, i32)> {
        let (ext, dem) = (self.ext[rect], self.dem[rect]);
        let own = self.domains[rect].compulsory(ext);
        let avail = |c: i32| {
            self.bins[c as usize]
                + match own {
                    Some((l, h)) if l <= c && c <= h => dem,
                    _ => 0,
                }
        };

        // scan upward for the lowest supported position
        let mut b = lo;
        let mut c = lo;
        let lowest = loop {
            if b > hi {
                return None;
            }
            if c > b + ext - 1 {
                break b;
            }
            if avail(c) >= dem {
                c += 1;
            } else {
                b = c + 1;
                c = b;
            }
        };

        // scan downward for the highest supported position
        let mut e = hi;
        let mut c = hi + ext - 1;
        let highest = loop {
            if e < lowest {
                return None;
            }
            if c < e {
                break e;
            }
            if avail(c) >= dem {
                c -= 1;
            } else {
                e = c - ext;
                c = e + ext - 1;
            }
        };

        Some((lowest, highest))
    }

    /// Narrows a domain to `new` (must be a feasible sub-range of the current
    /// one), drawing strips for the newly-compulsory coordinates.
    fn narrow(&mut self, rect: RectId, new: Interval) {
        let ext = self.ext[rect];
        let dem = self.dem[rect];
        let prev = self.domains[rect];
        debug_assert!(!new.is_empty() && new.begin >= prev.begin && new.end <= prev.end);

        self.domains[rect] = new;
        if let Some((n_lo, n_hi)) = new.compulsory(ext) {
            match prev.compulsory(ext) {
                Some((p_lo, p_hi)) => {
                    if n_lo < p_lo {
                        self.draw_strips(n_lo, p_lo - 1, dem);
                    }
                    if n_hi > p_hi {
                        self.draw_strips(p_hi + 1, n_hi, dem);
                    }
                }
                None => self.draw_strips(n_lo, n_hi, dem),
            }
        }
        let resolved = new.is_point() && self.active.contains(rect);
        if resolved {
            self.active.remove(rect);
        }
        self.log.push(Edit::Narrow { rect, prev, resolved });
    }

    fn supported(&self, lo: i32, hi: i32, dem: i32, own: Option<(i32, i32)>) -> bool {
        (lo..=hi).all(|c| {
            let boost = match own {
                Some((l, h)) if l <= c && c <= h => dem,
                _ => 0,
            };
            self.bins[c as usize] + boost >= dem
        })
    }

    fn draw_strips(&mut self, lo: i32, hi: i32, dem: i32) {
        for c in lo..=hi {
            let old = self.bins[c as usize];
            debug_assert!(old >= dem);
            self.bins[c as usize] = old - dem;
            self.waste.on_change(old, old - dem);
        }
    }

    fn erase_strips(&mut self, lo: i32, hi: i32, dem: i32) {
        for c in lo..=hi {
            let old = self.bins[c as usize];
            self.bins[c as usize] = old + dem;
            self.waste.on_change(old, old + dem);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bins_4x4() -> AxisBins {
        let mut bins = AxisBins::new(Axis::Y);
        bins.resize(BoxDims::new(4, 4).unwrap(), 2);
        bins
    }

    fn full_width_rect(id: RectId) -> Rectangle {
        Rectangle::new(id, 4, 2, false)
    }

    #[test]
    fn push_pop_symmetry_restores_state_exactly() {
        let mut bins = bins_4x4();
        let a = full_width_rect(0);
        let b = full_width_rect(1);
        assert!(bins.activate(&a));
        assert!(bins.activate(&b));

        let before_domains = (bins.domain(0), bins.domain(1));
        let mark = bins.mark();

        assert!(bins.place(0, 0));
        assert!(bins.compress());
        assert!(bins.place(1, 2));
        assert!(bins.compress());
        assert!(bins.verify_waste() && bins.verify_bins());

        bins.pop_to(mark);
        assert!(bins.verify_waste() && bins.verify_bins());
        assert_eq!((bins.domain(0), bins.domain(1)), before_domains);
        assert!(!bins.is_placed(0) && !bins.is_placed(1));
        assert!(bins.is_unresolved(0) && bins.is_unresolved(1));
    }

    #[test]
    fn compression_forces_compulsory_rectangle_to_a_point() {
        // placing one full-width rectangle leaves exactly one slot for the
        // other; compression must resolve it without any branching
        let mut bins = bins_4x4();
        let a = full_width_rect(0);
        let b = full_width_rect(1);
        assert!(bins.activate(&a));
        assert!(bins.activate(&b));

        assert!(bins.place(0, 0));
        assert!(bins.compress());

        let d = bins.domain(1);
        assert!(d.is_point());
        assert_eq!(d.begin, 2);
        // resolved rectangles leave the worklist
        assert!(!bins.is_unresolved(1));
        assert!(bins.verify_waste() && bins.verify_bins());
    }

    #[test]
    fn compression_is_monotone() {
        let mut bins = bins_4x4();
        let a = full_width_rect(0);
        let b = Rectangle::new(1, 2, 2, false);
        assert!(bins.activate(&a));
        assert!(bins.activate(&b));

        let before = bins.domain(1);
        assert!(bins.place(0, 0));
        assert!(bins.compress());
        let after = bins.domain(1);
        assert!(after.begin >= before.begin && after.end <= before.end);
        assert_eq!(after, Interval { begin: 2, end: 2, width: 2 });
    }

    #[test]
    fn conflict_when_domain_empties() {
        let mut bins = AxisBins::new(Axis::Y);
        bins.resize(BoxDims::new(4, 4).unwrap(), 3);
        for id in 0..3 {
            assert!(bins.activate(&full_width_rect(id)));
        }

        let mark = bins.mark();
        assert!(bins.place(0, 0));
        // the other two are both forced into rows 2..4, which fit only one
        assert!(!bins.compress());
        bins.pop_to(mark);
        assert!(bins.verify_waste() && bins.verify_bins());
        assert_eq!(bins.domain(1), Interval::full(2, 2));
    }

    #[test]
    fn block_assignment_tightens_to_supported_ends() {
        let mut bins = AxisBins::new(Axis::Y);
        bins.resize(BoxDims::new(4, 8).unwrap(), 2);
        let a = Rectangle::new(0, 4, 2, false);
        let b = Rectangle::new(1, 4, 3, false);
        assert!(bins.activate(&a));
        assert!(bins.activate(&b));
        assert!(bins.place(0, 0));
        assert!(bins.compress());

        // rows 0..2 are full; a block starting below must slide upward
        let block = Interval::init(0, 3, 1.0, 5);
        assert!(bins.assign_block(1, block));
        assert_eq!(bins.domain(1).begin, 2);
        assert!(bins.verify_waste() && bins.verify_bins());
    }

    #[test]
    fn area_bound_rejects_overfull_axis() {
        let mut bins = bins_4x4();
        let rects = vec![
            Rectangle::new(0, 4, 3, false),
            Rectangle::new(1, 4, 2, false),
        ];
        assert!(bins.activate(&rects[0]));
        assert!(bins.activate(&rects[1]));
        // 4x3 + 4x2 = 20 > 16 available
        assert!(!bins.area_bound_holds(&rects));
    }
}
