/// A scalar function of one real variable, minimized by the engine.
///
/// Implemented for every `Fn(f64) -> f64`, so plain closures can be passed directly.
/// Implementations are expected to behave as pure functions; a non-finite result aborts
/// the run with [`FitnessError`](crate::FitnessError).
pub trait Objective {
    fn evaluate(&self, x: f64) -> f64;
}

impl<F> Objective for F
where
    F: Fn(f64) -> f64,
{
    fn evaluate(&self, x: f64) -> f64 {
        self(x)
    }
}
