//! Row-band decomposition of the grid across workers.

/// Half-open row interval `[lo, hi)` owned by one worker for a step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowBand {
    pub lo: usize,
    pub hi: usize,
}

impl RowBand {
    #[inline]
    pub fn contains(&self, row: usize) -> bool {
        row >= self.lo && row < self.hi
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.hi - self.lo
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.hi == self.lo
    }
}

/// Split `n` rows into `min(workers, n)` contiguous bands of `n / p` rows each,
/// the last band also taking the `n % p` leftover rows.
///
/// Returns an empty list when `n == 0`. `workers == 0` is treated as one worker.
pub fn partition_rows(n: usize, workers: usize) -> Vec<RowBand> {
    if n == 0 {
        return Vec::new();
    }
    let p = workers.clamp(1, n);
    let span = n / p;
    (0..p)
        .map(|k| {
            let lo = k * span;
            let hi = if k == p - 1 { n } else { (k + 1) * span };
            RowBand { lo, hi }
        })
        .collect()
}
