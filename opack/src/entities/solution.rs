use crate::entities::{BoxDims, RectId};
use serde::{Deserialize, Serialize};

/// Final coordinates of one rectangle in a feasible packing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Placement {
    pub id: RectId,
    pub x: i32,
    pub y: i32,
    pub rotated: bool,
}

/// A complete, non-overlapping, in-bounds placement of every rectangle of an
/// instance into a box. Produced only by a successful probe; validity is
/// guaranteed by the search and checked by `util::assertions` in debug builds.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Solution {
    pub box_dims: BoxDims,
    pub placements: Vec<Placement>,
}
