use serde::Serialize;

/// Nearest-rank percentiles of a sample at a fixed set of points.
///
/// ```
/// use bitevo_stats::percentiles::Percentiles;
///
/// let values = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0];
/// let p = Percentiles::new(&values, &[25.0, 50.0, 90.0]);
/// assert_eq!(p.get(50.0), Some(6.0));
/// assert_eq!(p.get(90.0), Some(10.0));
/// assert_eq!(p.get(75.0), None);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Percentiles {
    /// `(point, value)` pairs in the order the points were requested.
    values: Vec<(f64, f64)>,
}

impl Percentiles {
    /// Computes the percentiles of `values` at `points` (each in `0.0..=100.0`).
    ///
    /// Every value is NaN for an empty sample.
    #[must_use]
    pub fn new(values: &[f64], points: &[f64]) -> Self {
        let mut sorted = values.to_vec();
        sorted.sort_by(f64::total_cmp);
        let values = points
            .iter()
            .map(|&p| (p, nearest_rank(&sorted, p)))
            .collect();
        Self { values }
    }

    /// Value at a requested point, or `None` if `point` was not requested.
    #[must_use]
    pub fn get(&self, point: f64) -> Option<f64> {
        self.values
            .iter()
            .find(|(p, _)| (p - point).abs() < f64::EPSILON)
            .map(|(_, v)| *v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.values.iter().copied()
    }
}

/// Element at index `floor(n * point / 100)` of `sorted`, clamped to the last element.
#[expect(
    clippy::cast_sign_loss,
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss
)]
fn nearest_rank(sorted: &[f64], point: f64) -> f64 {
    let Some(last) = sorted.len().checked_sub(1) else {
        return f64::NAN;
    };
    let idx = ((sorted.len() as f64 * point) / 100.0) as usize;
    sorted[idx.min(last)]
}
