mod instance;
mod interval;
mod rectangle;
mod solution;

pub use instance::{BoxDims, Instance, RectDesc};
pub use interval::Interval;
pub use rectangle::{Axis, Rectangle};
pub use solution::{Placement, Solution};

/// Stable index of a rectangle in its [`Instance`].
/// Rectangles are stored in a single owned vector and referred to by id
/// everywhere; no references cross module boundaries.
pub type RectId = usize;
