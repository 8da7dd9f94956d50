use serde::{Deserialize, Serialize};

use crate::error::EnvError;
use crate::noise;

/// A box in `R^n` with per-dimension bounds, which may be infinite.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoxSpace {
    low: Vec<f32>,
    high: Vec<f32>,
}

impl BoxSpace {
    /// # Errors
    ///
    /// Returns [`EnvError::Config`] if the bound vectors differ in length or
    /// any lower bound exceeds its upper bound.
    pub fn new(low: Vec<f32>, high: Vec<f32>) -> Result<Self, EnvError> {
        if low.len() != high.len() {
            return Err(EnvError::Config(format!(
                "space bounds differ in length: {} vs {}",
                low.len(),
                high.len()
            )));
        }
        if low.iter().zip(&high).any(|(l, h)| l.is_nan() || h.is_nan() || l > h) {
            return Err(EnvError::Config("space lower bound exceeds upper bound".into()));
        }
        Ok(Self { low, high })
    }

    /// Same bounds in every dimension.
    #[must_use]
    pub fn uniform(len: usize, low: f32, high: f32) -> Self {
        Self {
            low: vec![low; len],
            high: vec![high; len],
        }
    }

    #[must_use]
    pub fn unbounded(len: usize) -> Self {
        Self::uniform(len, f32::NEG_INFINITY, f32::INFINITY)
    }

    #[must_use]
    pub fn low(&self) -> &[f32] {
        &self.low
    }

    #[must_use]
    pub fn high(&self) -> &[f32] {
        &self.high
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.low.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.low.is_empty()
    }

    #[must_use]
    pub fn contains(&self, x: &[f32]) -> bool {
        x.len() == self.len()
            && x
                .iter()
                .zip(self.low.iter().zip(&self.high))
                .all(|(v, (l, h))| (*l..=*h).contains(v))
    }

    /// Half-width of each dimension, `(high - low) / 2`.
    #[must_use]
    pub fn scaling(&self) -> Vec<f32> {
        self.low
            .iter()
            .zip(&self.high)
            .map(|(l, h)| (h - l) * 0.5)
            .collect()
    }

    /// Draw a point: uniform where both bounds are finite, otherwise a
    /// standard normal shifted onto the finite bound.
    #[allow(clippy::cast_possible_truncation)]
    pub fn sample(&self, rng: &mut fastrand::Rng) -> Vec<f32> {
        self.low
            .iter()
            .zip(&self.high)
            .map(|(&l, &h)| {
                let (l, h) = (f64::from(l), f64::from(h));
                let value = match (l.is_finite(), h.is_finite()) {
                    (true, true) => noise::uniform(rng, l, h),
                    (true, false) => l + noise::standard_normal(rng).abs(),
                    (false, true) => h - noise::standard_normal(rng).abs(),
                    (false, false) => noise::standard_normal(rng),
                };
                value as f32
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mismatched_bounds_are_rejected() {
        assert!(BoxSpace::new(vec![0.0], vec![1.0, 2.0]).is_err());
        assert!(BoxSpace::new(vec![1.0], vec![0.0]).is_err());
        assert!(BoxSpace::new(vec![-1.0, 0.0], vec![1.0, 0.0]).is_ok());
    }

    #[test]
    fn samples_are_contained() {
        let space = BoxSpace::new(
            vec![-1.0, 0.0, f32::NEG_INFINITY],
            vec![1.0, f32::INFINITY, 2.0],
        )
        .unwrap();
        let mut rng = fastrand::Rng::with_seed(5);
        for _ in 0..500 {
            assert!(space.contains(&space.sample(&mut rng)));
        }
    }

    #[test]
    fn scaling_is_half_width() {
        let space = BoxSpace::uniform(3, -1.0, 1.0);
        assert_eq!(space.scaling(), vec![1.0; 3]);
        assert!(!space.contains(&[0.0, 0.0]));
        assert!(!space.contains(&[0.0, 0.0, 1.5]));
    }
}
