/// Histogram of free capacity, bucketed by remaining capacity value.
///
/// `bucket[c]` holds the total free area located at coordinates whose
/// remaining capacity is exactly `c`. The sum over all buckets therefore
/// always equals the total free area of the capacity vector; free area
/// sitting in buckets below the smallest demand any remaining rectangle can
/// still contribute is provably wasted and feeds the area-based prune.
#[derive(Clone, Debug, Default)]
pub struct WasteHistogram {
    buckets: Vec<u64>,
}

impl WasteHistogram {
    /// Reinitializes for a capacity vector of `n_coords` entries all at
    /// `capacity`.
    pub fn reset(&mut self, capacity: i32, n_coords: i32) {
        self.buckets.clear();
        self.buckets.resize(capacity as usize + 1, 0);
        self.buckets[capacity as usize] = capacity as u64 * n_coords as u64;
    }

    /// One coordinate's capacity changed from `old` to `new`.
    #[inline]
    pub fn on_change(&mut self, old: i32, new: i32) {
        self.buckets[old as usize] -= old as u64;
        self.buckets[new as usize] += new as u64;
    }

    /// Total free area. Always equal to the sum of the capacity vector.
    pub fn total(&self) -> u64 {
        self.buckets.iter().sum()
    }

    /// Free area trapped at coordinates whose capacity is below `demand`:
    /// no rectangle requiring at least `demand` can ever use it.
    pub fn wasted_below(&self, demand: i32) -> u64 {
        let cut = (demand.max(0) as usize).min(self.buckets.len());
        self.buckets[..cut].iter().sum()
    }

    /// Checks the histogram against the capacity vector it mirrors.
    pub fn matches(&self, bins: &[i32]) -> bool {
        let mut fresh = vec![0u64; self.buckets.len()];
        for &c in bins {
            fresh[c as usize] += c as u64;
        }
        fresh == self.buckets
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tracks_capacity_changes() {
        let mut w = WasteHistogram::default();
        w.reset(4, 3);
        assert_eq!(w.total(), 12);

        // one coordinate drops from 4 to 1
        w.on_change(4, 1);
        assert_eq!(w.total(), 9);
        assert_eq!(w.wasted_below(2), 1);
        assert_eq!(w.wasted_below(5), 9);

        assert!(w.matches(&[4, 1, 4]));
        assert!(!w.matches(&[4, 4, 4]));
    }
}
