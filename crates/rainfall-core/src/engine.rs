//! Per-band trickle step: rain, absorb, route surplus to the lowest neighbours.
//!
//! Each worker gets exclusive `&mut` slices over its own rows of
//! `current_rain`, `absorbed` and `trickle_in`. Outflow to a row inside the
//! band is a plain write into the band's trickle slice; outflow to a row owned
//! by another band goes through [`BoundaryLockTable::deposit`].
//!
//! Cells only write to neighbour trickle buffers and never read another cell's
//! updated state, so the order cells are visited in has no effect on totals.
use crate::grid::Matrix;
use crate::locks::BoundaryLockTable;
use crate::partition::RowBand;

/// At most this much water leaves a cell in one step.
pub const MAX_TRICKLE: f32 = 1.0;

/// Mutable view over the rows of one band.
pub struct BandView<'a> {
    pub band: RowBand,
    pub rain: &'a mut [f32],
    pub absorbed: &'a mut [f32],
    pub trickle: &'a mut [f32],
}

/// Read-only inputs shared by every band for one step.
pub struct StepContext<'a> {
    pub elevation: &'a Matrix<i32>,
    pub locks: &'a BoundaryLockTable,
    pub absorption: f32,
    /// 1.0 while rain is still falling, 0.0 afterwards.
    pub rain_drop: f32,
}

/// Cut a row-major buffer into one mutable slice per band.
pub fn split_bands<'a>(data: &'a mut [f32], bands: &[RowBand], size: usize) -> Vec<&'a mut [f32]> {
    let mut rest = data;
    let mut out = Vec::with_capacity(bands.len());
    for band in bands {
        let (head, tail) = std::mem::take(&mut rest).split_at_mut(band.len() * size);
        out.push(head);
        rest = tail;
    }
    out
}

/// Orthogonal neighbours in north (`i+1`), south (`i-1`), east, west order.
/// Coordinates outside the grid are `None`.
#[inline]
fn neighbours(size: usize, i: usize, j: usize) -> [Option<(usize, usize)>; 4] {
    [
        (i + 1 < size).then(|| (i + 1, j)),
        i.checked_sub(1).map(|s| (s, j)),
        (j + 1 < size).then(|| (i, j + 1)),
        j.checked_sub(1).map(|w| (i, w)),
    ]
}

/// Run one step over every cell of `view.band`, in row-major order.
pub fn process_band(view: BandView<'_>, ctx: &StepContext<'_>) {
    let BandView { band, rain, absorbed, trickle } = view;
    let elevation = ctx.elevation;
    let n = elevation.size;
    debug_assert_eq!(rain.len(), band.len() * n);

    for i in band.lo..band.hi {
        for j in 0..n {
            let k = (i - band.lo) * n + j;

            rain[k] += ctx.rain_drop;

            let delta = ctx.absorption.min(rain[k]);
            absorbed[k] += delta;
            rain[k] -= delta;

            if rain[k] <= 0.0 {
                continue;
            }
            let trickle_amt = rain[k].min(MAX_TRICKLE);

            let here = elevation.get(i, j);
            let nbrs = neighbours(n, i, j);
            let smallest = nbrs
                .iter()
                .flatten()
                .map(|&(r, c)| elevation.get(r, c))
                .fold(here, i32::min);
            // No strictly lower neighbour: water waits here.
            if smallest == here {
                continue;
            }

            let mut dests = [(0usize, 0usize); 4];
            let mut count = 0;
            for &(r, c) in nbrs.iter().flatten() {
                if elevation.get(r, c) == smallest {
                    dests[count] = (r, c);
                    count += 1;
                }
            }
            let share = trickle_amt / count as f32;
            for &(r, c) in &dests[..count] {
                if band.contains(r) {
                    trickle[(r - band.lo) * n + c] += share;
                } else {
                    ctx.locks.deposit(r, c, share);
                }
            }
            rain[k] -= trickle_amt;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::GridModel;
    use crate::partition::partition_rows;

    /// Run one band pass over the whole grid split into `workers` bands,
    /// sequentially, and fold the boundary inboxes into `trickle_in`.
    fn run_bands(grid: &mut GridModel, workers: usize, absorption: f32, rain_drop: f32) {
        let n = grid.size();
        let bands = partition_rows(n, workers);
        let mut locks = BoundaryLockTable::new(n);
        {
            let GridModel { elevation, current_rain, trickle_in, absorbed } = grid;
            let ctx = StepContext { elevation, locks: &locks, absorption, rain_drop };
            let rains = split_bands(&mut current_rain.data, &bands, n);
            let abs = split_bands(&mut absorbed.data, &bands, n);
            let trs = split_bands(&mut trickle_in.data, &bands, n);
            for (((band, rain), absorbed), trickle) in bands.iter().zip(rains).zip(abs).zip(trs) {
                process_band(BandView { band: *band, rain, absorbed, trickle }, &ctx);
            }
        }
        locks.drain_into(&mut grid.trickle_in);
    }

    #[test]
    fn flat_grid_absorbs_and_keeps_surplus() {
        let mut g = GridModel::new(Matrix::filled(3, 7));
        run_bands(&mut g, 1, 0.5, 1.0);
        assert!(g.absorbed.data.iter().all(|&v| v == 0.5));
        assert!(g.current_rain.data.iter().all(|&v| v == 0.5));
        assert_eq!(g.trickle_in.total(), 0.0);
    }

    #[test]
    fn tied_lowest_neighbours_split_evenly() {
        // Centre at 5 with north and south at 1; everything else high.
        let mut elev = Matrix::filled(3, 9);
        elev.set(1, 1, 5);
        elev.set(0, 1, 1);
        elev.set(2, 1, 1);
        let mut g = GridModel::new(elev);
        g.current_rain.set(1, 1, 1.0);

        run_bands(&mut g, 1, 0.0, 0.0);

        assert_eq!(g.trickle_in.get(0, 1), 0.5);
        assert_eq!(g.trickle_in.get(2, 1), 0.5);
        assert_eq!(g.trickle_in.total(), 1.0);
        assert_eq!(g.current_rain.get(1, 1), 0.0);
    }

    #[test]
    fn no_strictly_lower_neighbour_keeps_water() {
        let mut elev = Matrix::filled(3, 4);
        elev.set(1, 1, 2);
        let mut g = GridModel::new(elev);
        g.current_rain.set(1, 1, 3.0);

        run_bands(&mut g, 1, 0.0, 0.0);

        assert_eq!(g.current_rain.get(1, 1), 3.0);
        assert_eq!(g.trickle_in.total(), 0.0);
    }

    #[test]
    fn outflow_is_capped_at_one_drop() {
        // Row descends eastward; the west cell holds 2.5 units.
        let elev = Matrix::from_fn(3, |_, c| (2 - c) as i32);
        let mut g = GridModel::new(elev);
        g.current_rain.set(1, 0, 2.5);

        run_bands(&mut g, 1, 0.0, 0.0);

        assert_eq!(g.trickle_in.get(1, 1), 1.0);
        assert_eq!(g.current_rain.get(1, 0), 1.5);
    }

    #[test]
    fn cross_band_outflow_matches_single_band() {
        // Elevation falls toward the middle row, so every row sends water
        // north or south across band edges once every row is its own band.
        let elev = Matrix::from_fn(6, |r, c| (r as i32 - 3).abs() * 4 + c as i32 % 2);
        let mut single = GridModel::new(elev.clone());
        let mut split = GridModel::new(elev);

        run_bands(&mut single, 1, 0.25, 1.0);
        run_bands(&mut split, 6, 0.25, 1.0);

        for (a, b) in single.trickle_in.data.iter().zip(&split.trickle_in.data) {
            assert!((a - b).abs() < 1e-6, "trickle mismatch {a} vs {b}");
        }
        assert_eq!(single.current_rain, split.current_rain);
        assert_eq!(single.absorbed, split.absorbed);
    }

    #[test]
    fn split_bands_follows_partition() {
        let mut data: Vec<f32> = (0..20).map(|v| v as f32).collect();
        let bands = partition_rows(5, 2);
        let parts = split_bands(&mut data, &bands, 4);
        assert_eq!(parts.len(), 2);
        assert_eq!(parts[0].len(), 8);
        assert_eq!(parts[1].len(), 12);
        assert_eq!(parts[1][0], 8.0);
    }
}
