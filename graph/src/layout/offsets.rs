use smallvec::SmallVec;
use std::collections::HashMap;

/// Greedy per-row offset reservation for one column.
///
/// Each span takes the smallest positive offset that is free on every row it
/// covers. Reservations are never released during a pass.
#[derive(Debug, Default)]
pub struct OffsetAllocator {
    reserved: HashMap<usize, SmallVec<[u32; 4]>>,
    max_offset: u32,
}

impl OffsetAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserve an offset for rows `first..=last` (either order) and return it
    pub fn allocate(&mut self, first: usize, last: usize) -> u32 {
        let (lo, hi) = if first <= last { (first, last) } else { (last, first) };

        let mut offset = 1;
        while !self.is_free(offset, lo, hi) {
            offset += 1;
        }

        for row in lo..=hi {
            self.reserved.entry(row).or_default().push(offset);
        }
        self.max_offset = self.max_offset.max(offset);
        offset
    }

    fn is_free(&self, offset: u32, lo: usize, hi: usize) -> bool {
        (lo..=hi).all(|row| {
            self.reserved
                .get(&row)
                .map_or(true, |taken| !taken.contains(&offset))
        })
    }

    /// Largest offset handed out so far (0 if none)
    pub fn max_offset(&self) -> u32 {
        self.max_offset
    }
}
