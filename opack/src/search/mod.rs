mod branching;
mod interval_pack;
mod packer;
mod ranges;

pub use branching::{branching_factor, branching_order, first_symmetry};
pub use interval_pack::IntervalPack;
pub use packer::{Counters, PackConfig, Packer, ProbeReport, new_packer, probe, subinstance_packable};
pub use ranges::{Candidate, CoordinateRanges, symmetry_cap};
