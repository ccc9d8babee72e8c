//! `lloyd-clustering` provides a pure Rust implementation of K-Means clustering
//! which always gives the same answer for the same input.
//!
//! ## The big picture
//!
//! `lloyd-clustering` is the estimator crate of the `lloyd` workspace. The core `lloyd`
//! crate defines datasets and the `Fit`/`Predict` traits, `lloyd-datasets` generates
//! synthetic data and this crate turns a matrix of observations into a [`KMeans`] model.
//!
//! ## Current state
//!
//! Right now `lloyd-clustering` provides:
//! * [K-Means](KMeans), trained with Lloyd's algorithm
//! * [random](KMeansInit::Random), [K-means++](KMeansInit::KMeansPlusPlus) and
//!   [precomputed](KMeansInit::Precomputed) centroid initialisation
//! * two ways of handling [empty clusters](EmptyClusterPolicy)
//!
//! Every random choice is drawn from a generator seeded through the hyperparameters, so a fit is
//! fully determined by the dataset, `n_clusters`, `max_n_iterations` and the seed.
//!
//! Implementation choices, algorithmic details and a tutorial can be found in the page
//! dedicated to [`KMeans`].
#[allow(clippy::new_ret_no_self)]
mod k_means;

pub use k_means::*;
