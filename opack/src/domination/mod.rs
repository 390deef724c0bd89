mod cache;
mod square;
mod table;
mod urect;

pub use cache::PackingCache;
pub use square::SquareDom;
pub use table::{DomTable, FinalizedDom};
pub use urect::URectDom;

use crate::entities::{Axis, BoxDims, Instance, Rectangle};

/// Edge-availability configuration a domination query is made under.
///
/// The first flag states whether the near boundary of the gap is the box wall
/// itself (only then does the full table apply; against another rectangle's
/// edge only trivially-unusable gaps are dominated). The second flag states
/// whether the flush position at the far wall is still an available
/// relocation target, which matters for the symmetry-root rectangle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DomConfig {
    TT,
    TF,
    FT,
    FF,
}

impl DomConfig {
    pub fn new(near_wall: bool, far_available: bool) -> Self {
        match (near_wall, far_available) {
            (true, true) => DomConfig::TT,
            (true, false) => DomConfig::TF,
            (false, true) => DomConfig::FT,
            (false, false) => DomConfig::FF,
        }
    }

    pub fn near_wall(self) -> bool {
        matches!(self, DomConfig::TT | DomConfig::TF)
    }
}

/// Answers "is placing this rectangle at gap distance `gap` from a wall
/// guaranteed no better than placing it flush?" for the axis the oracle was
/// finalized for. Gaps outside the built range are never dominated.
pub trait DominationOracle {
    /// Upper end of the gap range covered by the tables for this rectangle
    /// in its current orientation.
    fn gap_bound(&self, rect: &Rectangle) -> i32;

    fn dominated(&self, rect: &Rectangle, gap: i32, config: DomConfig) -> bool;
}

/// Oracle used when domination is disabled (and one level into the
/// recursive table build): nothing is ever dominated.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoDomination;

impl DominationOracle for NoDomination {
    fn gap_bound(&self, _rect: &Rectangle) -> i32 {
        0
    }

    fn dominated(&self, _rect: &Rectangle, _gap: i32, _config: DomConfig) -> bool {
        false
    }
}

/// Selects the cheapest sound oracle for the instance: closed-form tables
/// for the recognized sequential families, the general (recursively built)
/// tables otherwise. `symmetry_root` carries the root rectangle and its
/// confinement bound for the late retraction pass on the general tables.
pub fn build_oracle(
    instance: &Instance,
    axis: Axis,
    box_dims: BoxDims,
    template: Option<&DomTable>,
    symmetry_root: Option<(crate::entities::RectId, i32)>,
) -> Box<dyn DominationOracle> {
    if instance.is_sequential_squares() {
        Box::new(SquareDom::new())
    } else if instance.is_sequential_unoriented() {
        Box::new(URectDom::new(instance.len(), axis))
    } else if let Some(template) = template {
        let mut finalized = template.finalize(instance, axis, box_dims);
        if let Some((root, max_coord)) = symmetry_root {
            finalized.preserve_top_symmetry(root, max_coord);
        }
        Box::new(finalized)
    } else {
        Box::new(NoDomination)
    }
}
