//! Seeded synthetic elevation grids for experiments and tests.
use noise::{NoiseFn, Perlin};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::grid::Matrix;

/// Independent uniform integer heights in `[0, max_height]`.
///
/// Produces many pits and plateaus, which is what the trickle rules find
/// hardest: lots of ties and lots of trapped water.
pub fn uniform_landscape(n: usize, max_height: i32, seed: u64) -> Matrix<i32> {
    let mut rng = StdRng::seed_from_u64(seed);
    let hi = max_height.max(0);
    Matrix::from_fn(n, |_, _| rng.gen_range(0..=hi))
}

/// Octave sum of Perlin noise with persistence 0.5 and lacunarity 2.
struct Fbm {
    noise: Perlin,
    octaves: u32,
}

impl Fbm {
    fn new(seed: u32, octaves: u32) -> Self {
        Self { noise: Perlin::new(seed), octaves }
    }

    fn sample(&self, x: f64, y: f64) -> f64 {
        let mut value = 0.0f64;
        let mut amp = 1.0f64;
        let mut freq = 1.0f64;
        for _ in 0..self.octaves {
            value += amp * self.noise.get([x * freq, y * freq]);
            amp *= 0.5;
            freq *= 2.0;
        }
        value
    }
}

/// Rolling terrain quantised to integer heights in `[0, relief]`.
pub fn fbm_landscape(n: usize, relief: i32, seed: u32) -> Matrix<i32> {
    let fbm = Fbm::new(seed, 5);
    let base_freq = 4.0 / n.max(1) as f64;
    let raw = Matrix::from_fn(n, |r, c| fbm.sample(c as f64 * base_freq, r as f64 * base_freq));

    let lo = raw.data.iter().cloned().fold(f64::INFINITY, f64::min);
    let hi = raw.data.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let span = hi - lo;
    let relief = relief.max(0) as f64;
    let data = raw
        .data
        .iter()
        .map(|&v| if span > 0.0 { ((v - lo) / span * relief).round() as i32 } else { 0 })
        .collect();
    Matrix::from_vec(n, data)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uniform_is_seeded_and_bounded() {
        let a = uniform_landscape(16, 9, 7);
        let b = uniform_landscape(16, 9, 7);
        let c = uniform_landscape(16, 9, 8);
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert!(a.data.iter().all(|&h| (0..=9).contains(&h)));
    }

    #[test]
    fn fbm_spans_requested_relief() {
        let g = fbm_landscape(32, 100, 42);
        let min = *g.data.iter().min().unwrap();
        let max = *g.data.iter().max().unwrap();
        assert_eq!(min, 0);
        assert_eq!(max, 100);
        assert_eq!(g, fbm_landscape(32, 100, 42));
    }

    #[test]
    fn single_cell_fbm_is_flat() {
        let g = fbm_landscape(1, 50, 3);
        assert_eq!(g.data, vec![0]);
    }
}
