use crate::entities::{BoxDims, Instance, RectDesc, Solution};
use crate::search::IntervalPack;
use log::{debug, trace};
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

/// Tuning knobs of the packing engine.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct PackConfig {
    /// Granularity of interior candidate blocks relative to rectangle extent
    pub scale: f32,
    /// Prune dominated wall gaps via precomputed tables
    pub use_domination: bool,
    /// Confine the root rectangle to one quadrant of the box
    pub break_symmetry: bool,
    /// Eligible-filler cap above which the table build stays conservative
    pub dom_max_fillers: usize,
}

impl Default for PackConfig {
    fn default() -> Self {
        PackConfig {
            scale: 1.0,
            use_domination: true,
            break_symmetry: true,
            dom_max_fillers: 10,
        }
    }
}

/// Nodes explored per search phase.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Counters {
    /// Coordinate/block assignments in the primary axis search
    pub nodes_primary: u64,
    /// Point assignments while refining interval blocks
    pub nodes_refine: u64,
    /// Coordinate assignments in the orthogonal-axis search
    pub nodes_ortho: u64,
}

impl Counters {
    pub fn total(&self) -> u64 {
        self.nodes_primary + self.nodes_refine + self.nodes_ortho
    }
}

/// Outcome of one box-size probe: a definitive feasibility answer plus
/// diagnostic counters and per-phase time.
#[derive(Clone, Debug)]
pub struct ProbeReport {
    pub box_dims: BoxDims,
    pub feasible: bool,
    pub solution: Option<Solution>,
    pub counters: Counters,
    pub table_time: Duration,
    pub search_time: Duration,
}

/// A packing strategy: initialized once per problem instance, re-initialized
/// per candidate box, then driven to a definitive answer.
pub trait Packer {
    /// Prepares the per-box state. Returns false when the box is already
    /// provably infeasible (no search necessary).
    fn init_box(&mut self, box_dims: BoxDims) -> bool;

    /// Runs the search to completion: true exactly when a complete
    /// placement was found.
    fn pack(&mut self) -> bool;

    fn solution(&self) -> Option<&Solution>;

    fn counters(&self) -> Counters;
}

/// Constructs the canonical packer for the instance. The seam exists so
/// alternative strategies can be slotted in behind the same contract.
pub fn new_packer(instance: Instance, config: PackConfig) -> Box<dyn Packer> {
    Box::new(IntervalPack::new(instance, config))
}

/// Probes one candidate box: returns a complete placement or a definitive
/// infeasibility result, with node counts and per-phase time.
pub fn probe(instance: &Instance, box_dims: BoxDims, config: &PackConfig) -> ProbeReport {
    let t0 = Instant::now();
    let mut packer = new_packer(instance.clone(), *config);
    let table_time = t0.elapsed();

    let t1 = Instant::now();
    let feasible = packer.init_box(box_dims) && packer.pack();
    let search_time = t1.elapsed();

    let counters = packer.counters();
    debug!(
        "probe {}x{}: {} ({} nodes, tables {:?}, search {:?})",
        box_dims.width,
        box_dims.height,
        if feasible { "feasible" } else { "infeasible" },
        counters.total(),
        table_time,
        search_time,
    );

    ProbeReport {
        box_dims,
        feasible,
        solution: packer.solution().cloned(),
        counters,
        table_time,
        search_time,
    }
}

/// Feasibility of a small sub-instance, used by the domination table builder
/// to decide whether a wall strip can be tiled. Runs on a fresh packer with
/// domination disabled, bounding the build recursion to one level.
pub fn subinstance_packable(rects: &[(i32, i32, bool)], width: i32, height: i32) -> bool {
    let descs = rects
        .iter()
        .map(|&(w, h, rotatable)| RectDesc { width: w, height: h, rotatable })
        .collect::<Vec<_>>();
    let instance = match Instance::new(&descs) {
        Ok(instance) => instance,
        Err(_) => return false,
    };
    let config = PackConfig { use_domination: false, ..PackConfig::default() };
    let Ok(box_dims) = BoxDims::new(width, height) else {
        return false;
    };
    let mut packer = IntervalPack::new(instance, config);
    let feasible = packer.init_box(box_dims) && packer.pack();
    trace!(
        "sub-instance {}x{} with {} rectangles: {}",
        width,
        height,
        rects.len(),
        if feasible { "packable" } else { "not packable" }
    );
    feasible
}
