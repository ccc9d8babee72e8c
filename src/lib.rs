//! `lloyd` provides the shared foundation of a small toolkit for reproducible centroid
//! clustering in Rust.
//!
//! It is kin in spirit to Python's `scikit-learn`: estimators are configured through
//! hyperparameter builders, validated once, fitted on a [`DatasetBase`] and then used to
//! predict new observations.
//!
//! ## Current state
//!
//! The algorithms live in their own crates under `algorithms/`:
//!
//! * `lloyd-clustering`: seeded K-Means (Lloyd's iteration)
//!
//! Synthetic datasets for tests and benchmarks are provided by `lloyd-datasets`.
//!
//! This crate only contains what those crates share: the [`Float`] bound, the dataset
//! container, the [`traits`] every estimator implements, the [`ParamGuard`] hyperparameter
//! checking scheme and the common [`error`] type.

pub mod benchmarks;
pub mod dataset;
pub mod error;
mod param_guard;
pub mod prelude;
pub mod traits;

pub use dataset::{Dataset, DatasetBase, Float};
pub use param_guard::ParamGuard;
