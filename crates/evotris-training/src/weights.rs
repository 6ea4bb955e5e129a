//! Genome operations for the genetic algorithm.
//!
//! A genome is the flat weight vector of a [`Network`](crate::network::Network). Every
//! weight lives in the signed range `[-max_weight, max_weight]`; all operators clamp
//! their results back into it.
//!
//! - **Initialization**: [`random`] draws uniform weights
//! - **Crossover**: [`blx_alpha`] blends two parents
//! - **Mutation**: [`mutate`] adds Gaussian noise

use rand::Rng;
use rand_distr::Normal;

/// Creates a weight vector by applying a function to each index.
///
/// # Examples
///
/// ```
/// use evotris_training::weights;
///
/// let weights = weights::from_fn(|i| 1.0 / (i as f32 + 1.0), 5);
/// assert_eq!(weights.len(), 5);
/// assert_eq!(weights[1], 0.5);
/// ```
pub fn from_fn<F>(mut f: F, len: usize) -> Vec<f32>
where
    F: FnMut(usize) -> f32,
{
    let mut values = Vec::with_capacity(len);
    for i in 0..len {
        values.push(f(i));
    }
    values
}

/// Generates `len` weights sampled uniformly from `[-max_weight, max_weight]`.
pub fn random<R>(rng: &mut R, max_weight: f32, len: usize) -> Vec<f32>
where
    R: Rng + ?Sized,
{
    from_fn(|_| rng.random_range(-max_weight..=max_weight), len)
}

/// Performs BLX-α (Blend Crossover) between two parent genomes.
///
/// For parents `x1` and `x2` at position `i`, with `d = |x2 - x1|`, the child weight
/// is sampled uniformly from `[min - α·d, max + α·d]` and clamped to
/// `[-max_weight, max_weight]`. `alpha = 0` keeps children strictly between their
/// parents.
///
/// # Panics
///
/// Panics if parent vectors have different lengths.
pub fn blx_alpha<R>(p1: &[f32], p2: &[f32], alpha: f32, max_weight: f32, rng: &mut R) -> Vec<f32>
where
    R: Rng + ?Sized,
{
    assert_eq!(p1.len(), p2.len());
    from_fn(
        |i| {
            let x1 = p1[i];
            let x2 = p2[i];
            let min = f32::min(x1, x2);
            let max = f32::max(x1, x2);
            let d = max - min;
            let lower = min - alpha * d;
            let upper = max + alpha * d;
            rng.random_range(lower..=upper)
                .clamp(-max_weight, max_weight)
        },
        p1.len(),
    )
}

/// Applies Gaussian mutation in place.
///
/// Each weight is perturbed with probability `rate` by a sample of `noise` and clamped
/// to `[-max_weight, max_weight]`.
pub fn mutate<R>(weights: &mut [f32], noise: Normal<f32>, max_weight: f32, rate: f32, rng: &mut R)
where
    R: Rng + ?Sized,
{
    for w in weights {
        if rng.random_bool(rate.into()) {
            *w = (*w + rng.sample(noise)).clamp(-max_weight, max_weight);
        }
    }
}
