//! Similarity metrics used to rank entries.
//!
//! Every metric follows the same convention: a **higher** score means more
//! similar. Degenerate inputs (zero-norm vectors for cosine, constant
//! vectors for Pearson) yield `NaN`, which the store ranks last.

use crate::error::{Result, VectorStoreError};
use ndarray::ArrayView1;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Scores a pair of equal-length vectors
pub trait DistanceMetric: Send + Sync {
    /// Short identifier used in logs
    fn name(&self) -> &str;

    /// Raw similarity; callers guarantee `a.len() == b.len()`
    fn similarity(&self, a: &[f32], b: &[f32]) -> f32;

    /// Similarity with a dimension check
    fn score(&self, a: &[f32], b: &[f32]) -> Result<f32> {
        if a.len() != b.len() {
            return Err(VectorStoreError::InvalidDimension {
                expected: a.len(),
                actual: b.len(),
            });
        }
        Ok(self.similarity(a, b))
    }
}

/// Pearson correlation coefficient, treating the two vectors as paired samples
#[derive(Debug, Clone, Copy, Default)]
pub struct PearsonCorrelation;

impl DistanceMetric for PearsonCorrelation {
    fn name(&self) -> &str {
        "pearson"
    }

    #[allow(clippy::cast_possible_truncation)]
    fn similarity(&self, a: &[f32], b: &[f32]) -> f32 {
        let a = ArrayView1::from(a).mapv(f64::from);
        let b = ArrayView1::from(b).mapv(f64::from);
        let (Some(mean_a), Some(mean_b)) = (a.mean(), b.mean()) else {
            return f32::NAN;
        };

        let da = a - mean_a;
        let db = b - mean_b;
        let denom = (da.dot(&da) * db.dot(&db)).sqrt();

        (da.dot(&db) / denom).clamp(-1.0, 1.0) as f32
    }
}

/// `dot(a, b) / (‖a‖·‖b‖)`
#[derive(Debug, Clone, Copy, Default)]
pub struct CosineSimilarity;

impl DistanceMetric for CosineSimilarity {
    fn name(&self) -> &str {
        "cosine"
    }

    /// Accumulates in `f64` so large or tiny components neither overflow nor vanish
    #[allow(clippy::cast_possible_truncation)]
    fn similarity(&self, a: &[f32], b: &[f32]) -> f32 {
        let a = ArrayView1::from(a).mapv(f64::from);
        let b = ArrayView1::from(b).mapv(f64::from);
        let norm_a = a.dot(&a).sqrt();
        let norm_b = b.dot(&b).sqrt();
        (a.dot(&b) / (norm_a * norm_b)) as f32
    }
}

/// Caller-supplied scoring function
pub struct FnMetric<F> {
    name: String,
    func: F,
}

impl<F> FnMetric<F>
where
    F: Fn(&[f32], &[f32]) -> f32 + Send + Sync,
{
    pub fn new(name: impl Into<String>, func: F) -> Self {
        Self {
            name: name.into(),
            func,
        }
    }
}

impl<F> DistanceMetric for FnMetric<F>
where
    F: Fn(&[f32], &[f32]) -> f32 + Send + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn similarity(&self, a: &[f32], b: &[f32]) -> f32 {
        (self.func)(a, b)
    }
}

/// Built-in metrics selectable by name
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Metric {
    #[default]
    Pearson,
    Cosine,
}

impl Metric {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pearson => "pearson",
            Self::Cosine => "cosine",
        }
    }
}

impl DistanceMetric for Metric {
    fn name(&self) -> &str {
        self.as_str()
    }

    fn similarity(&self, a: &[f32], b: &[f32]) -> f32 {
        match self {
            Self::Pearson => PearsonCorrelation.similarity(a, b),
            Self::Cosine => CosineSimilarity.similarity(a, b),
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Metric {
    type Err = VectorStoreError;

    fn from_str(raw: &str) -> Result<Self> {
        match raw {
            "pearson" => Ok(Self::Pearson),
            "cosine" => Ok(Self::Cosine),
            other => Err(VectorStoreError::UnknownMetric(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-6
    }

    #[test]
    fn test_pearson_extremes() {
        let m = PearsonCorrelation;
        assert!(approx(m.similarity(&[1.0, 2.0, 3.0], &[2.0, 4.0, 6.0]), 1.0));
        assert!(approx(m.similarity(&[1.0, 2.0, 3.0], &[3.0, 2.0, 1.0]), -1.0));
        assert!(approx(m.similarity(&[1.0, 0.0, 1.0, 0.0], &[0.0, 1.0, 1.0, 0.0]), 0.0));
    }

    #[test]
    fn test_pearson_ignores_shift_and_scale_unlike_cosine() {
        let a: [f32; 4] = [0.1, 0.5, -0.3, 0.9];
        let b: Vec<f32> = a.iter().map(|v| v.mul_add(3.0, 10.0)).collect();

        assert!(approx(PearsonCorrelation.similarity(&a, &b), 1.0));
        assert!(CosineSimilarity.similarity(&a, &b) < 0.9);
    }

    #[test]
    fn test_degenerate_inputs_are_nan() {
        assert!(PearsonCorrelation.similarity(&[2.0, 2.0, 2.0], &[1.0, 2.0, 3.0]).is_nan());
        assert!(PearsonCorrelation.similarity(&[], &[]).is_nan());
        assert!(CosineSimilarity.similarity(&[0.0, 0.0], &[1.0, 0.0]).is_nan());
    }

    #[test]
    fn test_cosine_basic() {
        let m = CosineSimilarity;
        assert!(approx(m.similarity(&[1.0, 0.0], &[1.0, 0.0]), 1.0));
        assert!(approx(m.similarity(&[1.0, 0.0], &[0.0, 1.0]), 0.0));
        assert!(approx(m.similarity(&[1.0, 1.0], &[2.0, 2.0]), 1.0));
    }

    #[test]
    fn test_cosine_extreme_magnitudes() {
        let m = CosineSimilarity;
        assert!(approx(m.similarity(&[1e20, 0.0], &[1e20, 0.0]), 1.0));
        assert!(approx(m.similarity(&[1e-25, 0.0], &[1e-25, 0.0]), 1.0));
        assert!(approx(m.similarity(&[1e20, 0.0], &[0.0, 1e-25]), 0.0));
        assert!(approx(m.similarity(&[1e20, 1e20], &[1e-25, 1e-25]), 1.0));
    }

    #[test]
    fn test_score_rejects_dimension_mismatch() {
        let err = Metric::Cosine.score(&[1.0, 0.0], &[1.0, 0.0, 0.0]).unwrap_err();
        assert!(matches!(
            err,
            VectorStoreError::InvalidDimension {
                expected: 2,
                actual: 3
            }
        ));
    }

    #[test]
    fn test_metric_by_name() {
        assert_eq!(Metric::default(), Metric::Pearson);
        assert_eq!("cosine".parse::<Metric>().unwrap(), Metric::Cosine);
        assert!(matches!(
            "euclidean".parse::<Metric>(),
            Err(VectorStoreError::UnknownMetric(name)) if name == "euclidean"
        ));
    }

    #[test]
    fn test_fn_metric() {
        let dot = FnMetric::new("dot", |a: &[f32], b: &[f32]| {
            a.iter().zip(b).map(|(x, y)| x * y).sum()
        });
        assert_eq!(dot.name(), "dot");
        assert!(approx(dot.score(&[1.0, 2.0], &[3.0, 4.0]).unwrap(), 11.0));
    }
}
