use crate::KMeansParamsError;

use super::init::KMeansInit;
use lloyd::prelude::*;
use lloyd::Float;
use ndarray_rand::rand::{Rng, SeedableRng};
#[cfg(feature = "serde")]
use serde_crate::{Deserialize, Serialize};

#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// What happens to the centroid of a cluster left without any observation after an
/// assignment step.
///
/// The mean of an empty set is undefined, so the update step has to pick a fallback.
pub enum EmptyClusterPolicy {
    /// The centroid keeps the position it had before the update step.
    KeepPrevious,
    /// The centroid is moved onto the observation which is farthest from its own centroid.
    /// When several clusters are empty in the same update step, they are moved onto distinct
    /// observations, taken by decreasing distance (lowest index first on ties).
    FarthestPoint,
}

#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Clone, Debug, PartialEq)]
/// The set of hyperparameters that can be specified for the execution of
/// the [K-means algorithm](crate::KMeans).
pub struct KMeansValidParams<F: Float, R: Rng> {
    /// Number of times the k-means algorithm will be run with different centroid seeds.
    n_runs: usize,
    /// We exit the training loop after `max_n_iterations` update steps even if
    /// some observations are still changing cluster.
    max_n_iterations: u64,
    /// The number of clusters we will be looking for in the training dataset.
    n_clusters: usize,
    /// The initialization strategy used to initialize the centroids.
    init: KMeansInit<F>,
    /// The fallback applied to clusters left empty by an assignment step.
    empty_cluster_policy: EmptyClusterPolicy,
    /// The random number generator
    rng: R,
}

#[derive(Clone, Debug, PartialEq)]
/// An helper struct used to construct a set of [valid hyperparameters](KMeansValidParams) for
/// the [K-means algorithm](crate::KMeans) (using the builder pattern).
pub struct KMeansParams<F: Float, R: Rng>(KMeansValidParams<F, R>);

impl<F: Float, R: Rng> KMeansParams<F, R> {
    /// `new` lets us configure our training algorithm parameters:
    /// * we will be looking for `n_clusters` in the training dataset;
    /// * the training is considered complete when an assignment step leaves every
    ///   observation in the cluster it already belonged to;
    /// * we exit the training loop when the number of update steps reaches
    ///   `max_n_iterations` even if the memberships are still changing;
    /// * as KMeans convergence depends on centroids initialization
    ///   we can run the algorithm `n_runs` times and keep the run with the lowest
    ///   inertia, the sum of squared euclidean distances to the closest centroid
    ///   over all observations.
    ///
    /// Defaults are provided if optional parameters are not specified:
    /// * `max_n_iterations = 300`
    /// * `n_runs = 1`
    /// * `init = Random`
    /// * `empty_cluster_policy = KeepPrevious`
    pub fn new(n_clusters: usize, rng: R) -> Self {
        Self(KMeansValidParams {
            n_runs: 1,
            max_n_iterations: 300,
            n_clusters,
            init: KMeansInit::Random,
            empty_cluster_policy: EmptyClusterPolicy::KeepPrevious,
            rng,
        })
    }

    /// Change the value of `n_runs`
    pub fn n_runs(mut self, n_runs: usize) -> Self {
        self.0.n_runs = n_runs;
        self
    }

    /// Change the value of `max_n_iterations`
    pub fn max_n_iterations(mut self, max_n_iterations: u64) -> Self {
        self.0.max_n_iterations = max_n_iterations;
        self
    }

    /// Change the value of `init`
    pub fn init_method(mut self, init: KMeansInit<F>) -> Self {
        self.0.init = init;
        self
    }

    /// Change the value of `empty_cluster_policy`
    pub fn empty_cluster_policy(mut self, policy: EmptyClusterPolicy) -> Self {
        self.0.empty_cluster_policy = policy;
        self
    }
}

impl<F: Float, R: Rng + SeedableRng> KMeansParams<F, R> {
    /// Replace the random generator with a fresh one seeded with `seed`.
    ///
    /// Two fits with the same seed (and the same other hyperparameters) on the same
    /// dataset return identical models.
    pub fn seed(mut self, seed: u64) -> Self {
        self.0.rng = R::seed_from_u64(seed);
        self
    }
}

impl<F: Float, R: Rng> ParamGuard for KMeansParams<F, R> {
    type Checked = KMeansValidParams<F, R>;
    type Error = KMeansParamsError;

    fn check_ref(&self) -> Result<&Self::Checked, Self::Error> {
        if self.0.n_clusters == 0 {
            return Err(KMeansParamsError::NClusters);
        }
        if self.0.n_runs == 0 {
            return Err(KMeansParamsError::NRuns);
        }
        if self.0.max_n_iterations == 0 {
            return Err(KMeansParamsError::MaxIterations);
        }
        if let KMeansInit::Precomputed(centroids) = &self.0.init {
            if centroids.nrows() != self.0.n_clusters {
                return Err(KMeansParamsError::PrecomputedClusters {
                    expected: self.0.n_clusters,
                    found: centroids.nrows(),
                });
            }
        }
        Ok(&self.0)
    }

    fn check(self) -> Result<Self::Checked, Self::Error> {
        self.check_ref()?;
        Ok(self.0)
    }
}

impl<F: Float, R: Rng> KMeansValidParams<F, R> {
    /// The final results will be the best output of n_runs consecutive runs in terms of inertia.
    pub fn n_runs(&self) -> usize {
        self.n_runs
    }

    /// We exit the training loop after `max_n_iterations` update steps even if
    /// some observations are still changing cluster.
    pub fn max_n_iterations(&self) -> u64 {
        self.max_n_iterations
    }

    /// The number of clusters we will be looking for in the training dataset.
    pub fn n_clusters(&self) -> usize {
        self.n_clusters
    }

    /// Cluster initialization strategy
    pub fn init_method(&self) -> &KMeansInit<F> {
        &self.init
    }

    /// Fallback for clusters left empty by an assignment step
    pub fn empty_cluster_policy(&self) -> EmptyClusterPolicy {
        self.empty_cluster_policy
    }

    /// Returns the random generator
    pub fn rng(&self) -> &R {
        &self.rng
    }
}
