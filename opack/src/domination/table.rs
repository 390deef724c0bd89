use crate::domination::{DomConfig, DominationOracle, PackingCache};
use crate::entities::{Axis, BoxDims, Instance, RectId, Rectangle};
use crate::search::subinstance_packable;
use itertools::Itertools;
use log::debug;

/// Gap-indexed domination entries for one rectangle in one dimension order.
///
/// `extent` runs along the packing axis (it bounds the gap range), `span`
/// across it (it is the long side of the wall strip). One vector per
/// edge-availability configuration, indexed by `gap - 1`.
#[derive(Clone, Debug)]
struct OrientTable {
    extent: i32,
    span: i32,
    tt: Vec<bool>,
    tf: Vec<bool>,
    ft: Vec<bool>,
    ff: Vec<bool>,
}

impl OrientTable {
    fn get(&self, config: DomConfig, gap: i32) -> bool {
        if gap < 1 || gap > self.extent {
            return false;
        }
        let i = (gap - 1) as usize;
        match config {
            DomConfig::TT => self.tt[i],
            DomConfig::TF => self.tf[i],
            DomConfig::FT => self.ft[i],
            DomConfig::FF => self.ff[i],
        }
    }

    fn clear(&mut self, gap: i32) {
        let i = (gap - 1) as usize;
        self.tt[i] = false;
        self.tf[i] = false;
        self.ft[i] = false;
        self.ff[i] = false;
    }

    fn clear_all(&mut self) {
        for v in [&mut self.tt, &mut self.tf, &mut self.ft, &mut self.ff] {
            v.iter_mut().for_each(|e| *e = false);
        }
    }
}

/// Slot 0 holds the (width, height) dimension order, slot 1 the swapped one.
/// Squares only carry slot 0.
#[derive(Clone, Debug)]
struct RectTables {
    slots: [Option<OrientTable>; 2],
}

fn slot_index(rect: &Rectangle, axis: Axis) -> usize {
    if rect.width == rect.height {
        return 0;
    }
    match axis {
        Axis::X => rect.rotated as usize,
        Axis::Y => !rect.rotated as usize,
    }
}

/// Instance-level domination tables, built once per problem instance and
/// cloned + finalized for every candidate box (some entries depend on the
/// exact box dimensions).
///
/// A wall gap is dominated when no subset of the other rectangles can
/// perfectly tile the strip between the wall and the rectangle: any
/// placement leaving such a gap can then be slid flush without losing
/// solutions. Tiling feasibility is decided by recursively invoking the
/// packing engine on the sub-instance, memoized by box dimensions plus
/// rectangle multiset; the recursive engine runs with domination disabled,
/// bounding the recursion to one level.
#[derive(Clone, Debug)]
pub struct DomTable {
    tables: Vec<RectTables>,
}

impl DomTable {
    pub fn build(instance: &Instance, cache: &mut PackingCache, max_fillers: usize) -> Self {
        let tables = instance
            .rects
            .iter()
            .map(|r| RectTables {
                slots: [
                    Some(build_orient(instance, r, r.width, r.height, cache, max_fillers)),
                    (r.width != r.height)
                        .then(|| build_orient(instance, r, r.height, r.width, cache, max_fillers)),
                ],
            })
            .collect_vec();
        debug!(
            "domination tables built for {} rectangles ({} sub-instances solved, {} cache hits)",
            instance.len(),
            cache.misses(),
            cache.hits()
        );
        let mut table = DomTable { tables };
        table.build_stage2(instance);
        table
    }

    /// Post-build scrubs: duplicate-order consistency and deadlock removal.
    fn build_stage2(&mut self, instance: &Instance) {
        // Duplicates are placed in a fixed relative order; only the first of
        // each group may claim dominated positions.
        for r in &instance.rects {
            let first_twin = instance
                .rects
                .iter()
                .find(|s| s.same_dims(r))
                .map(|s| s.id)
                .unwrap();
            if first_twin != r.id {
                for slot in self.tables[r.id].slots.iter_mut().flatten() {
                    slot.clear_all();
                }
            }
        }

        // Deadlock scrub: a claim whose every potential filler is itself
        // dominated at the residual gap it would have to occupy describes a
        // circular wall requirement and must be retracted.
        for id in (0..instance.len()).rev() {
            for slot in 0..2 {
                let Some(table) = &self.tables[id].slots[slot] else {
                    continue;
                };
                let (extent, span) = (table.extent, table.span);
                let mut retract = vec![];
                for gap in 1..=extent {
                    if !table.get(DomConfig::TT, gap) {
                        continue;
                    }
                    let fillers = instance
                        .rects
                        .iter()
                        .filter(|s| s.id != id && fits_strip(s, gap, span))
                        .collect_vec();
                    if !fillers.is_empty()
                        && fillers.iter().all(|s| self.filler_blocked(s, gap, span))
                    {
                        retract.push(gap);
                    }
                }
                if !retract.is_empty() {
                    let table = self.tables[id].slots[slot].as_mut().unwrap();
                    for gap in retract {
                        let i = (gap - 1) as usize;
                        table.tt[i] = false;
                        table.tf[i] = false;
                    }
                }
            }
        }
    }

    /// True when every orientation in which `s` fits the strip leaves a
    /// residual gap that `s`'s own tables already claim dominated for a
    /// non-trivial reason. Trivial claims (no filler exists at all for the
    /// residual) need no wall and cannot participate in a cycle.
    fn filler_blocked(&self, s: &Rectangle, gap: i32, span: i32) -> bool {
        let mut orients = vec![];
        if s.width <= gap && s.height <= span {
            orients.push((s.width, 0usize));
        }
        if s.rotatable && s.height <= gap && s.width <= span {
            orients.push((s.height, 1usize));
        }
        debug_assert!(!orients.is_empty());
        orients.into_iter().all(|(along, slot)| {
            let residual = gap - along;
            if residual == 0 {
                return false;
            }
            let slot = if s.width == s.height { 0 } else { slot };
            match &self.tables[s.id].slots[slot] {
                Some(t) => t.get(DomConfig::TT, residual) && !t.get(DomConfig::FF, residual),
                None => false,
            }
        })
    }

    /// Per-box copy with the box-dependent escape applied: a rectangle that
    /// fits the full gap column of this box but not the strip beside the
    /// rectangle can legitimately use the gap, voiding the claim.
    pub fn finalize(&self, instance: &Instance, axis: Axis, box_dims: BoxDims) -> FinalizedDom {
        let column = box_dims.span(axis.orthogonal());
        let mut tables = self.tables.clone();
        for (id, rect_tables) in tables.iter_mut().enumerate() {
            for table in rect_tables.slots.iter_mut().flatten() {
                let span = table.span;
                for gap in 1..=table.extent {
                    let dweller = instance.rects.iter().any(|s| {
                        s.id != id && fits_column(s, gap, column) && !fits_strip(s, gap, span)
                    });
                    if dweller {
                        table.clear(gap);
                    }
                }
            }
        }
        FinalizedDom { axis, tables }
    }
}

/// Box-finalized domination tables for one axis; the oracle the search
/// actually queries.
#[derive(Clone, Debug)]
pub struct FinalizedDom {
    axis: Axis,
    tables: Vec<RectTables>,
}

impl FinalizedDom {
    /// Retracts the symmetry-root rectangle's entries beyond its confined
    /// quadrant, so no claim relocates it past `max_coord`.
    pub fn preserve_top_symmetry(&mut self, root: RectId, max_coord: i32) {
        for table in self.tables[root].slots.iter_mut().flatten() {
            for gap in (max_coord + 1).max(1)..=table.extent {
                table.clear(gap);
            }
        }
    }
}

impl DominationOracle for FinalizedDom {
    fn gap_bound(&self, rect: &Rectangle) -> i32 {
        match &self.tables[rect.id].slots[slot_index(rect, self.axis)] {
            Some(t) => t.extent,
            None => 0,
        }
    }

    fn dominated(&self, rect: &Rectangle, gap: i32, config: DomConfig) -> bool {
        match &self.tables[rect.id].slots[slot_index(rect, self.axis)] {
            Some(t) => t.get(config, gap),
            None => false,
        }
    }
}

fn fits_strip(s: &Rectangle, gap: i32, span: i32) -> bool {
    (s.width <= gap && s.height <= span) || (s.rotatable && s.height <= gap && s.width <= span)
}

fn fits_column(s: &Rectangle, gap: i32, column: i32) -> bool {
    (s.width <= gap && s.height <= column) || (s.rotatable && s.height <= gap && s.width <= column)
}

fn build_orient(
    instance: &Instance,
    rect: &Rectangle,
    extent: i32,
    span: i32,
    cache: &mut PackingCache,
    max_fillers: usize,
) -> OrientTable {
    let n = extent as usize;
    let mut tt = vec![false; n];
    let mut ft = vec![false; n];
    for gap in 1..=extent {
        let eligible = instance
            .rects
            .iter()
            .filter(|s| s.id != rect.id && fits_strip(s, gap, span))
            .map(|s| (s.width, s.height, s.rotatable))
            .collect_vec();

        let i = (gap - 1) as usize;
        if eligible.is_empty() {
            // nothing can ever use the gap
            tt[i] = true;
            ft[i] = true;
            continue;
        }
        let strip_area = gap as u64 * span as u64;
        let eligible_area: u64 = eligible.iter().map(|&(w, h, _)| w as u64 * h as u64).sum();
        if eligible_area < strip_area {
            tt[i] = true;
            continue;
        }
        if eligible.len() <= max_fillers {
            tt[i] = !subset_tiles(&eligible, gap, span, cache);
        }
    }
    OrientTable { extent, span, tt: tt.clone(), tf: tt, ft: ft.clone(), ff: ft }
}

/// Can some subset of `eligible` perfectly tile the `gap x span` strip?
/// Subsets are enumerated by exact area match; each area-exact candidate is
/// handed to the (memoized) recursive engine.
fn subset_tiles(
    eligible: &[(i32, i32, bool)],
    gap: i32,
    span: i32,
    cache: &mut PackingCache,
) -> bool {
    let target = gap as u64 * span as u64;
    let mut items = eligible.to_vec();
    items.sort_unstable_by_key(|&(w, h, _)| std::cmp::Reverse(w as u64 * h as u64));
    let mut suffix = vec![0u64; items.len() + 1];
    for i in (0..items.len()).rev() {
        suffix[i] = suffix[i + 1] + items[i].0 as u64 * items[i].1 as u64;
    }
    let mut chosen = vec![];
    search_subsets(&items, &suffix, 0, target, &mut chosen, gap, span, cache)
}

#[allow(clippy::too_many_arguments)]
fn search_subsets(
    items: &[(i32, i32, bool)],
    suffix: &[u64],
    i: usize,
    remaining: u64,
    chosen: &mut Vec<(i32, i32, bool)>,
    gap: i32,
    span: i32,
    cache: &mut PackingCache,
) -> bool {
    if remaining == 0 {
        return cache.packable(gap, span, chosen, |rects, w, h| subinstance_packable(rects, w, h));
    }
    if i == items.len() || suffix[i] < remaining {
        return false;
    }
    let area = items[i].0 as u64 * items[i].1 as u64;
    if area <= remaining {
        chosen.push(items[i]);
        if search_subsets(items, suffix, i + 1, remaining - area, chosen, gap, span, cache) {
            chosen.pop();
            return true;
        }
        chosen.pop();
    }
    search_subsets(items, suffix, i + 1, remaining, chosen, gap, span, cache)
}
