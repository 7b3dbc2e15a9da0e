//! Row partitioning for the parallel strategy.

use std::ops::Range;

/// Contiguous, non-overlapping row ranges covering `[0, rows)`.
///
/// Rows are split as evenly as possible: with `rows = q * n + r`, the first
/// `r` ranges get `q + 1` rows and the rest get `q`. The number of ranges is
/// `min(workers, rows)` (at least one), so no range is ever empty unless the
/// image itself has no rows.
///
/// ```rust
/// use simdblur::RowPartition;
///
/// let partition = RowPartition::new(10, 4);
/// assert_eq!(partition.ranges(), &[0..3, 3..6, 6..8, 8..10]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowPartition {
    ranges: Vec<Range<usize>>,
}

impl RowPartition {
    pub fn new(rows: usize, workers: usize) -> Self {
        let count = workers.min(rows).max(1);
        let base = rows / count;
        let extra = rows % count;

        let mut ranges = Vec::with_capacity(count);
        let mut start = 0;
        for i in 0..count {
            let end = start + base + usize::from(i < extra);
            ranges.push(start..end);
            start = end;
        }

        Self { ranges }
    }

    pub fn ranges(&self) -> &[Range<usize>] {
        &self.ranges
    }

    /// Number of ranges, i.e. the number of tasks a pass dispatches.
    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    /// Splits `data`, laid out as rows of `row_len` floats, into one mutable
    /// slice per range.
    ///
    /// The slices are disjoint by construction (`split_at_mut`), which is what
    /// lets each worker write its rows without synchronization.
    ///
    /// # Panics
    ///
    /// When `data` is shorter than `rows * row_len`.
    pub fn split_mut<'a>(
        &self,
        data: &'a mut [f32],
        row_len: usize,
    ) -> Vec<(Range<usize>, &'a mut [f32])> {
        let mut rest = data;
        let mut chunks = Vec::with_capacity(self.ranges.len());

        for rows in &self.ranges {
            let (chunk, tail) = std::mem::take(&mut rest).split_at_mut(rows.len() * row_len);
            chunks.push((rows.clone(), chunk));
            rest = tail;
        }

        chunks
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_covers(partition: &RowPartition, rows: usize) {
        let mut expected_start = 0;
        for range in partition.ranges() {
            assert_eq!(range.start, expected_start);
            assert!(range.end >= range.start);
            expected_start = range.end;
        }
        assert_eq!(expected_start, rows);
    }

    #[test]
    fn remainder_goes_to_leading_ranges() {
        let partition = RowPartition::new(10, 3);
        assert_eq!(partition.ranges(), &[0..4, 4..7, 7..10]);
    }

    #[test]
    fn even_split() {
        let partition = RowPartition::new(64, 4);
        assert_eq!(partition.len(), 4);
        assert!(partition.ranges().iter().all(|r| r.len() == 16));
    }

    #[test]
    fn more_workers_than_rows() {
        let partition = RowPartition::new(3, 16);
        assert_eq!(partition.ranges(), &[0..1, 1..2, 2..3]);
    }

    #[test]
    fn zero_rows_or_workers() {
        assert_eq!(RowPartition::new(0, 8).ranges(), &[0..0]);
        assert_eq!(RowPartition::new(5, 0).ranges(), &[0..5]);
    }

    #[test]
    fn ranges_cover_all_rows() {
        for rows in [1, 2, 7, 31, 32, 33, 100, 1000] {
            for workers in 1..=12 {
                let partition = RowPartition::new(rows, workers);
                assert_covers(&partition, rows);
                let sizes: Vec<usize> = partition.ranges().iter().map(|r| r.len()).collect();
                let (min, max) = (sizes.iter().min().unwrap(), sizes.iter().max().unwrap());
                assert!(max - min <= 1, "rows {rows} workers {workers}: {sizes:?}");
            }
        }
    }

    #[test]
    fn split_mut_yields_disjoint_row_slices() {
        let row_len = 3;
        let mut data: Vec<f32> = (0..7 * row_len).map(|i| i as f32).collect();
        let partition = RowPartition::new(7, 3);

        let chunks = partition.split_mut(&mut data, row_len);
        assert_eq!(chunks.len(), 3);
        for (rows, chunk) in chunks {
            assert_eq!(chunk.len(), rows.len() * row_len);
            assert_eq!(chunk[0], (rows.start * row_len) as f32);
            chunk.fill(-1.0);
        }

        assert!(data.iter().all(|&v| v == -1.0));
    }
}
