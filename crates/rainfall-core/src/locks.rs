//! Per-row locks guarding trickle that crosses a band edge.
//!
//! A worker writes band-local trickle without locking. When a north or south
//! neighbour row belongs to another band, the outflow is added to that row's
//! inbox here while holding that row's lock. Each critical section is a single
//! increment under a single lock, so lock order never matters.
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::grid::Matrix;

pub struct BoundaryLockTable {
    rows: Vec<Mutex<Vec<f32>>>,
    size: usize,
}

impl BoundaryLockTable {
    /// One lock (and one zeroed inbox row) per grid row.
    pub fn new(size: usize) -> Self {
        Self {
            rows: (0..size).map(|_| Mutex::new(vec![0.0; size])).collect(),
            size,
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    fn lock(&self, row: usize) -> MutexGuard<'_, Vec<f32>> {
        // Poisoning means a worker panicked mid-step; that panic already
        // aborts the step, so the inner value is never merged.
        self.rows[row].lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Add `amount` to the inbound trickle of `(row, col)` under lock `row`.
    pub fn deposit(&self, row: usize, col: usize, amount: f32) {
        let mut inbox = self.lock(row);
        inbox[col] += amount;
    }

    /// Total water currently waiting in the inboxes.
    pub fn pending(&self) -> f64 {
        (0..self.rows.len())
            .map(|r| self.lock(r).iter().map(|&v| v as f64).sum::<f64>())
            .sum()
    }

    /// Add every inbox into `target` and reset the inboxes to zero.
    ///
    /// Takes `&mut self`: only called after all workers for the step joined.
    pub fn drain_into(&mut self, target: &mut Matrix<f32>) {
        debug_assert_eq!(target.size, self.size);
        for (r, row) in self.rows.iter_mut().enumerate() {
            let inbox = row.get_mut().unwrap_or_else(PoisonError::into_inner);
            for (c, v) in inbox.iter_mut().enumerate() {
                if *v != 0.0 {
                    target.data[r * self.size + c] += *v;
                    *v = 0.0;
                }
            }
        }
    }
}
