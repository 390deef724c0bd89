use std::collections::HashMap;

/// Memoizes the feasibility of packing a rectangle multiset into a box,
/// keyed by box dimensions plus the sorted multiset. The domination table
/// builder probes many identical sub-instances across rectangles and gaps;
/// the cache collapses them to one engine invocation each.
#[derive(Clone, Debug, Default)]
pub struct PackingCache {
    map: HashMap<CacheKey, bool>,
    hits: u64,
    misses: u64,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
struct CacheKey {
    width: i32,
    height: i32,
    rects: Vec<(i32, i32, bool)>,
}

impl PackingCache {
    /// Feasibility of the sub-instance, computing and memoizing it on a miss.
    pub fn packable(
        &mut self,
        width: i32,
        height: i32,
        rects: &[(i32, i32, bool)],
        solve: impl FnOnce(&[(i32, i32, bool)], i32, i32) -> bool,
    ) -> bool {
        let mut sorted = rects.to_vec();
        sorted.sort_unstable();
        let key = CacheKey { width, height, rects: sorted };
        if let Some(&feasible) = self.map.get(&key) {
            self.hits += 1;
            return feasible;
        }
        self.misses += 1;
        let feasible = solve(&key.rects, width, height);
        self.map.insert(key, feasible);
        feasible
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn hits(&self) -> u64 {
        self.hits
    }

    pub fn misses(&self) -> u64 {
        self.misses
    }
}
