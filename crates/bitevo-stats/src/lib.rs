//! Summary statistics over `f64` samples.
//!
//! Used to summarize a generation's fitness values and the outcomes of repeated runs.
//!
//! - [`descriptive`]: min, max, mean, median, standard deviation
//! - [`percentiles`]: nearest-rank percentiles at chosen points
//!
//! ```
//! use bitevo_stats::descriptive::DescriptiveStats;
//!
//! let stats = DescriptiveStats::new([1.0, 2.0, 3.0, 4.0, 5.0]).unwrap();
//! assert_eq!(stats.mean, 3.0);
//! assert_eq!(stats.count, 5);
//! ```

pub mod descriptive;
pub mod percentiles;
