//! Statistical summaries for the genopt workspace.
//!
//! The optimizer reports a summary of every generation's fitness vector. This crate holds
//! the small set of statistics needed for that, independent of the engine itself.
//!
//! # Modules
//!
//! - [`descriptive`]: min, max, mean, median, variance and standard deviation of a sample
//!
//! # Examples
//!
//! ```
//! use genopt_stats::descriptive::DescriptiveStats;
//!
//! let fitness = [1.0, 2.0, 3.0, 4.0, 5.0];
//! let stats = DescriptiveStats::new(fitness).unwrap();
//! assert_eq!(stats.mean, 3.0);
//! assert_eq!(stats.max, 5.0);
//! ```

pub mod descriptive;
