use crate::entities::RectId;

/// One of the two axes of the bounding box.
///
/// Selects which rectangle dimension is the *extent* (the number of
/// coordinates the rectangle occupies along the axis) and which is the
/// *demand* (the capacity it consumes at each occupied coordinate).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
}

impl Axis {
    pub fn orthogonal(self) -> Axis {
        match self {
            Axis::X => Axis::Y,
            Axis::Y => Axis::X,
        }
    }
}

/// An item of the packing instance.
///
/// Created once per instance, reset at the start of every box attempt and
/// mutated destructively during search: orientation is fixed when the search
/// reaches the rectangle, coordinates are written once placed.
#[derive(Clone, Debug)]
pub struct Rectangle {
    pub id: RectId,
    pub width: i32,
    pub height: i32,
    pub area: u64,
    pub min_dim: i32,
    pub max_dim: i32,
    /// Whether the orientation may still be swapped. Always false for squares.
    pub rotatable: bool,
    pub rotated: bool,
    pub x: Option<i32>,
    pub y: Option<i32>,
}

impl Rectangle {
    pub fn new(id: RectId, width: i32, height: i32, rotatable: bool) -> Self {
        Rectangle {
            id,
            width,
            height,
            area: width as u64 * height as u64,
            min_dim: width.min(height),
            max_dim: width.max(height),
            rotatable: rotatable && width != height,
            rotated: false,
            x: None,
            y: None,
        }
    }

    /// Width in the current orientation.
    pub fn w(&self) -> i32 {
        if self.rotated { self.height } else { self.width }
    }

    /// Height in the current orientation.
    pub fn h(&self) -> i32 {
        if self.rotated { self.width } else { self.height }
    }

    /// Coordinates occupied along `axis` in the current orientation.
    pub fn extent(&self, axis: Axis) -> i32 {
        match axis {
            Axis::X => self.w(),
            Axis::Y => self.h(),
        }
    }

    /// Capacity consumed per occupied coordinate of `axis`.
    pub fn demand(&self, axis: Axis) -> i32 {
        self.extent(axis.orthogonal())
    }

    /// Clears all per-attempt state: orientation, coordinates.
    pub fn reset(&mut self) {
        self.rotated = false;
        self.x = None;
        self.y = None;
    }

    pub fn is_placed(&self) -> bool {
        self.x.is_some() && self.y.is_some()
    }

    /// True when both rectangles have identical dimensions (duplicates are
    /// subject to a fixed relative placement order).
    pub fn same_dims(&self, other: &Rectangle) -> bool {
        self.width == other.width && self.height == other.height
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn squares_are_never_rotatable() {
        let sq = Rectangle::new(0, 3, 3, true);
        assert!(!sq.rotatable);
    }

    #[test]
    fn orientation_swaps_extent_and_demand() {
        let mut r = Rectangle::new(0, 5, 3, true);
        assert_eq!((r.extent(Axis::X), r.demand(Axis::X)), (5, 3));
        r.rotated = true;
        assert_eq!((r.extent(Axis::X), r.demand(Axis::X)), (3, 5));
        assert_eq!((r.extent(Axis::Y), r.demand(Axis::Y)), (5, 3));
    }
}
