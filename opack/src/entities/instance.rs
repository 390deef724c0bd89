use crate::entities::Rectangle;
use anyhow::{Result, ensure};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Description of a single rectangle as provided by the caller.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct RectDesc {
    pub width: i32,
    pub height: i32,
    #[serde(default)]
    pub rotatable: bool,
}

/// A fixed set of rectangles to be packed. Ids are assigned in input order
/// and remain stable for the lifetime of the instance.
#[derive(Clone, Debug)]
pub struct Instance {
    pub rects: Vec<Rectangle>,
    pub total_area: u64,
}

impl Instance {
    pub fn new(descs: &[RectDesc]) -> Result<Self> {
        let mut rects = Vec::with_capacity(descs.len());
        for (id, d) in descs.iter().enumerate() {
            ensure!(
                d.width > 0 && d.height > 0,
                "rectangle {id} has non-positive dimensions: {}x{}",
                d.width,
                d.height
            );
            rects.push(Rectangle::new(id, d.width, d.height, d.rotatable));
        }
        let total_area = rects.iter().map(|r| r.area).sum();
        Ok(Instance { rects, total_area })
    }

    pub fn len(&self) -> usize {
        self.rects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rects.is_empty()
    }

    /// The sequential all-squares family: sizes 1..=n, each exactly once.
    pub fn is_sequential_squares(&self) -> bool {
        let n = self.rects.len();
        let mut seen = vec![false; n + 1];
        self.rects.iter().all(|r| {
            r.width == r.height
                && (1..=n as i32).contains(&r.width)
                && !std::mem::replace(&mut seen[r.width as usize], true)
        })
    }

    /// The sequential unoriented-rectangle family: k x (k+1) for k = 1..=n,
    /// all rotatable.
    pub fn is_sequential_unoriented(&self) -> bool {
        let n = self.rects.len();
        let mut seen = vec![false; n + 1];
        self.rects.iter().all(|r| {
            r.rotatable
                && r.max_dim == r.min_dim + 1
                && (1..=n as i32).contains(&r.min_dim)
                && !std::mem::replace(&mut seen[r.min_dim as usize], true)
        })
    }
}

/// Dimensions of a candidate bounding box.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BoxDims {
    pub width: i32,
    pub height: i32,
}

impl BoxDims {
    pub fn new(width: i32, height: i32) -> Result<Self> {
        ensure!(
            width > 0 && height > 0,
            "invalid box dimensions: {width}x{height}"
        );
        Ok(BoxDims { width, height })
    }

    pub fn area(&self) -> u64 {
        self.width as u64 * self.height as u64
    }

    pub fn span(&self, axis: crate::entities::Axis) -> i32 {
        match axis {
            crate::entities::Axis::X => self.width,
            crate::entities::Axis::Y => self.height,
        }
    }
}

impl PartialOrd for BoxDims {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for BoxDims {
    /// Boxes compare by area, then width, then height.
    fn cmp(&self, other: &Self) -> Ordering {
        self.area()
            .cmp(&other.area())
            .then(self.width.cmp(&other.width))
            .then(self.height.cmp(&other.height))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn descs(dims: &[(i32, i32)]) -> Vec<RectDesc> {
        dims.iter()
            .map(|&(w, h)| RectDesc { width: w, height: h, rotatable: false })
            .collect()
    }

    #[test]
    fn rejects_degenerate_rectangles() {
        assert!(Instance::new(&descs(&[(0, 4)])).is_err());
        assert!(Instance::new(&descs(&[(3, -1)])).is_err());
    }

    #[test]
    fn recognizes_sequential_squares() {
        let inst = Instance::new(&descs(&[(2, 2), (1, 1), (3, 3)])).unwrap();
        assert!(inst.is_sequential_squares());
        let inst = Instance::new(&descs(&[(2, 2), (2, 2)])).unwrap();
        assert!(!inst.is_sequential_squares());
    }

    #[test]
    fn box_ordering_is_area_then_width() {
        let a = BoxDims::new(2, 6).unwrap();
        let b = BoxDims::new(3, 4).unwrap();
        let c = BoxDims::new(4, 3).unwrap();
        assert!(a < b && b < c);
    }
}
