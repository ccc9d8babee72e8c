use std::cmp::Ordering;

use crate::k_means::errors::KMeansError;
use crate::k_means::{EmptyClusterPolicy, KMeansInit, KMeansParams, KMeansValidParams};
use crate::KMeansParamsError;
use lloyd::{prelude::*, DatasetBase, Float};
use ndarray::{Array1, Array2, ArrayBase, ArrayView1, ArrayView2, Axis, Data, DataMut, Ix1, Ix2, Zip};
use ndarray_rand::rand::Rng;
use ndarray_rand::rand::SeedableRng;
use rand_isaac::Isaac64Rng;
use tracing::{debug, trace};

#[cfg(feature = "serde")]
use serde_crate::{Deserialize, Serialize};

#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// How the training loop of a fitted [`KMeans`] came to an end.
pub enum KMeansTermination {
    /// An assignment step left every observation in the cluster it already belonged to.
    Converged,
    /// `max_n_iterations` update steps were performed before memberships settled.
    MaxIterationsReached,
}

#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Clone, Debug, PartialEq)]
/// K-means clustering aims to partition a set of unlabeled observations into clusters,
/// where each observation belongs to the cluster with the nearest mean.
///
/// The mean of the points within a cluster is called *centroid*.
///
/// Given the set of centroids, you can assign an observation to a cluster
/// choosing the nearest centroid.
///
/// We provide an implementation of the _standard algorithm_, also known as
/// Lloyd's algorithm or naive K-means, with squared euclidean distances.
///
/// More details on the algorithm can be found in the next section or
/// [here](https://en.wikipedia.org/wiki/K-means_clustering).
///
/// ## The algorithm
///
/// K-means is an iterative algorithm: it progressively refines the choice of centroids.
///
/// It's guaranteed to converge, even though it might not find the optimal set of centroids
/// (unfortunately it can get stuck in a local minimum, finding the optimal minimum is NP-hard!).
///
/// There are three steps in the standard algorithm:
/// - initialisation step: select initial centroids using one of our provided algorithms
///   (by default `n_clusters` distinct observations drawn from a seeded random generator);
/// - assignment step: assign each observation to the nearest cluster
///                    (minimum distance between the observation and the cluster's centroid,
///                    the lowest cluster index wins ties);
/// - update step: recompute the centroid of each cluster as the mean of its observations.
///   A cluster without observations is handled according to its
///   [`EmptyClusterPolicy`](crate::EmptyClusterPolicy).
///
/// The initialisation step is a one-off, done at the very beginning.
/// Update and assignment are repeated in a loop until convergence is reached (no observation
/// changes cluster between two consecutive assignment steps) or we perform
/// `max_n_iterations` update steps. Either way the memberships of the returned model are
/// the nearest-centroid assignment of its centroids.
///
/// The whole procedure is a pure function of the dataset and the hyperparameters: the random
/// generator is cloned at the start of every `fit`, so fitting twice gives identical models.
///
/// ## Parallelisation
///
/// The work performed by the assignment step does not require any coordination:
/// the closest centroid for each point can be computed independently from the
/// closest centroid for any of the remaining points.
///
/// This makes it a good candidate for parallel execution: `KMeans::fit` parallelises the
/// assignment step thanks to the `rayon` feature in `ndarray`.
///
/// The update step sums observations in index order on a single thread, once every
/// observation has been assigned. This keeps the output independent of the number of
/// threads.
///
/// ## Tutorial
///
/// Let's do a walkthrough of a training-predict example.
///
/// ```
/// use lloyd::DatasetBase;
/// use lloyd::traits::{Fit, Predict};
/// use lloyd_clustering::{KMeans, KMeansTermination};
/// use lloyd_datasets::generate;
/// use ndarray::{Axis, array};
/// use ndarray_rand::rand::SeedableRng;
/// use rand_isaac::Isaac64Rng;
/// use approx::assert_abs_diff_eq;
///
/// // Our random number generator, seeded for reproducibility
/// let mut rng = Isaac64Rng::seed_from_u64(42);
///
/// // `expected_centroids` has shape `(n_centroids, n_features)`
/// // i.e. three points in the 2-dimensional plane
/// let expected_centroids = array![[0., 1.], [-10., 20.], [-1., 10.]];
/// // Let's generate a synthetic dataset: three blobs of observations
/// // (100 points each) centered around our `expected_centroids`
/// let data = generate::blobs(100, &expected_centroids, &mut rng);
/// let n_clusters = expected_centroids.len_of(Axis(0));
///
/// let observations = DatasetBase::from(data);
/// // Let's configure and run our K-means algorithm
/// // We use the builder pattern to specify the hyperparameters
/// // `n_clusters` is the only mandatory parameter.
/// // If you don't specify the others (e.g. `n_runs` or `max_n_iterations`)
/// // default values will be used.
/// let model = KMeans::params_with_seed(n_clusters, 42)
///     .n_runs(5)
///     .fit(&observations)
///     .expect("KMeans fitted");
/// assert_eq!(model.termination(), KMeansTermination::Converged);
///
/// // Once we found our set of centroids, we can also assign new points to the nearest cluster
/// let new_observation = DatasetBase::from(array![[-9., 20.5]]);
/// // Predict returns the **index** of the nearest cluster
/// let dataset = model.predict(new_observation);
/// // We can retrieve the actual centroid of the closest cluster using `.centroids()`
/// let closest_centroid = &model.centroids().index_axis(Axis(0), dataset.targets()[0]);
/// assert_abs_diff_eq!(closest_centroid.to_owned(), array![-10., 20.], epsilon = 1e-1);
/// ```
pub struct KMeans<F: Float> {
    centroids: Array2<F>,
    memberships: Array1<usize>,
    cluster_count: Array1<usize>,
    inertia: F,
    n_iterations: u64,
    termination: KMeansTermination,
}

impl<F: Float> KMeans<F> {
    /// Hyperparameters seeded with `42`
    pub fn params(nclusters: usize) -> KMeansParams<F, Isaac64Rng> {
        Self::params_with_seed(nclusters, 42)
    }

    pub fn params_with_seed(nclusters: usize, seed: u64) -> KMeansParams<F, Isaac64Rng> {
        KMeansParams::new(nclusters, Isaac64Rng::seed_from_u64(seed))
    }

    pub fn params_with_rng<R: Rng>(nclusters: usize, rng: R) -> KMeansParams<F, R> {
        KMeansParams::new(nclusters, rng)
    }

    /// Return the set of centroids as a 2-dimensional matrix with shape
    /// `(n_centroids, n_features)`.
    pub fn centroids(&self) -> &Array2<F> {
        &self.centroids
    }

    /// Return the index of the cluster of each training observation
    pub fn memberships(&self) -> &Array1<usize> {
        &self.memberships
    }

    /// Return the number of training points belonging to each cluster
    pub fn cluster_count(&self) -> &Array1<usize> {
        &self.cluster_count
    }

    /// Return the sum of squared distances between each training point and its centroid
    pub fn inertia(&self) -> F {
        self.inertia
    }

    /// Return the number of update steps performed by the selected run
    pub fn n_iterations(&self) -> u64 {
        self.n_iterations
    }

    /// Return whether the selected run converged or ran out of iterations
    pub fn termination(&self) -> KMeansTermination {
        self.termination
    }
}

/// Outcome of a single initialisation followed by Lloyd iterations
struct LloydRun<F: Float> {
    centroids: Array2<F>,
    memberships: Array1<usize>,
    inertia: F,
    n_iterations: u64,
    termination: KMeansTermination,
}

impl<F: Float, R: Rng + Clone, DA: Data<Elem = F>, T> Fit<ArrayBase<DA, Ix2>, T, KMeansError>
    for KMeansValidParams<F, R>
{
    type Object = KMeans<F>;

    /// Given an input matrix `observations`, with shape `(n_observations, n_features)`,
    /// `fit` identifies `n_clusters` centroids based on the training data distribution.
    ///
    /// An instance of `KMeans` is returned.
    ///
    fn fit(
        &self,
        dataset: &DatasetBase<ArrayBase<DA, Ix2>, T>,
    ) -> Result<Self::Object, KMeansError> {
        let observations = dataset.records().view();
        let (n_samples, n_features) = observations.dim();

        if n_samples == 0 {
            return Err(KMeansError::EmptyDataset);
        }
        if self.n_clusters() > n_samples {
            return Err(KMeansError::TooManyClusters {
                n_clusters: self.n_clusters(),
                n_samples,
            });
        }
        if let KMeansInit::Precomputed(centroids) = self.init_method() {
            if centroids.ncols() != n_features {
                return Err(KMeansError::PrecomputedShape {
                    expected: n_features,
                    found: centroids.ncols(),
                });
            }
        }

        let mut rng = self.rng().clone();
        let mut best: Option<LloydRun<F>> = None;

        for run in 0..self.n_runs() {
            let centroids = self
                .init_method()
                .run(self.n_clusters(), observations, &mut rng);
            let candidate = lloyd(
                centroids,
                &observations,
                self.max_n_iterations(),
                self.empty_cluster_policy(),
            );
            debug!(
                run,
                inertia = %candidate.inertia,
                n_iterations = candidate.n_iterations,
                termination = ?candidate.termination,
                "k-means run finished"
            );

            // We keep the run which minimizes the inertia (defined as the sum of
            // the squared distances of the closest centroid for all observations).
            // Ties keep the earliest run.
            let improves = best
                .as_ref()
                .map_or(true, |best| candidate.inertia < best.inertia);
            if improves {
                best = Some(candidate);
            }
        }

        let best = best.ok_or(KMeansParamsError::NRuns)?;
        let mut cluster_count = Array1::zeros(self.n_clusters());
        best.memberships
            .iter()
            .for_each(|&c| cluster_count[c] += 1);

        Ok(KMeans {
            centroids: best.centroids,
            memberships: best.memberships,
            cluster_count,
            inertia: best.inertia,
            n_iterations: best.n_iterations,
            termination: best.termination,
        })
    }
}

impl<F: Float, DA: Data<Elem = F>> Transformer<&ArrayBase<DA, Ix2>, Array1<F>> for KMeans<F> {
    /// Given an input matrix `observations`, with shape `(n_observations, n_features)`,
    /// `transform` returns, for each observation, its squared distance to its centroid.
    fn transform(&self, observations: &ArrayBase<DA, Ix2>) -> Array1<F> {
        let mut dists = Array1::zeros(observations.nrows());
        update_min_dists(&self.centroids, &observations.view(), &mut dists);
        dists
    }
}

impl<F: Float, DA: Data<Elem = F>> PredictInplace<ArrayBase<DA, Ix2>, Array1<usize>>
    for KMeans<F>
{
    /// Given an input matrix `observations`, with shape `(n_observations, n_features)`,
    /// `predict` returns, for each observation, the index of the closest cluster/centroid.
    ///
    /// You can retrieve the centroid associated to an index using the
    /// [`centroids` method](#method.centroids).
    fn predict_inplace(&self, observations: &ArrayBase<DA, Ix2>, memberships: &mut Array1<usize>) {
        assert_eq!(
            observations.nrows(),
            memberships.len(),
            "The number of data points must match the number of memberships."
        );

        update_cluster_memberships(&self.centroids, &observations.view(), memberships);
    }

    fn default_target(&self, x: &ArrayBase<DA, Ix2>) -> Array1<usize> {
        Array1::zeros(x.nrows())
    }
}

impl<F: Float, DA: Data<Elem = F>> PredictInplace<ArrayBase<DA, Ix1>, usize> for KMeans<F> {
    /// Given one input observation, return the index of its closest cluster
    ///
    /// You can retrieve the centroid associated to an index using the
    /// [`centroids` method](#method.centroids).
    fn predict_inplace(&self, observation: &ArrayBase<DA, Ix1>, membership: &mut usize) {
        *membership = closest_centroid(&self.centroids, observation).0;
    }

    fn default_target(&self, _x: &ArrayBase<DA, Ix1>) -> usize {
        0
    }
}

/// Runs Lloyd's iteration from `centroids` until memberships stop changing or
/// `max_n_iterations` update steps have been performed.
///
/// The previous memberships are kept in their own buffer so that convergence is
/// decided by comparing two complete assignments.
fn lloyd<F: Float>(
    mut centroids: Array2<F>,
    observations: &ArrayView2<F>,
    max_n_iterations: u64,
    policy: EmptyClusterPolicy,
) -> LloydRun<F> {
    let n_samples = observations.nrows();
    let mut memberships = Array1::zeros(n_samples);
    let mut previous_memberships = Array1::zeros(n_samples);
    let mut dists = Array1::zeros(n_samples);

    update_memberships_and_dists(&centroids, observations, &mut memberships, &mut dists);

    let mut n_iterations = 0;
    let mut termination = KMeansTermination::MaxIterationsReached;
    while n_iterations < max_n_iterations {
        centroids = compute_centroids(&centroids, observations, &memberships, &dists, policy);
        n_iterations += 1;

        previous_memberships.assign(&memberships);
        update_memberships_and_dists(&centroids, observations, &mut memberships, &mut dists);

        let n_changed = Zip::from(&previous_memberships)
            .and(&memberships)
            .fold(0, |n, prev, curr| if prev != curr { n + 1 } else { n });
        trace!(n_iterations, n_changed, inertia = %dists.sum(), "lloyd iteration");

        if n_changed == 0 {
            termination = KMeansTermination::Converged;
            break;
        }
    }

    LloydRun {
        inertia: dists.sum(),
        centroids,
        memberships,
        n_iterations,
        termination,
    }
}

/// K-means is an iterative algorithm.
/// We will perform the assignment and update steps until we are satisfied
/// (according to our convergence criteria).
///
/// `compute_centroids` returns a 2-dimensional array,
/// where the i-th row corresponds to the i-th cluster.
///
/// `dists` holds the squared distance of each observation to the centroid it is
/// currently assigned to; it ranks candidates for `EmptyClusterPolicy::FarthestPoint`.
fn compute_centroids<F: Float>(
    old_centroids: &Array2<F>,
    // (n_observations, n_features)
    observations: &ArrayBase<impl Data<Elem = F>, Ix2>,
    // (n_observations,)
    cluster_memberships: &ArrayBase<impl Data<Elem = usize>, Ix1>,
    // (n_observations,)
    dists: &ArrayBase<impl Data<Elem = F>, Ix1>,
    policy: EmptyClusterPolicy,
) -> Array2<F> {
    let n_clusters = old_centroids.nrows();
    let mut counts: Array1<usize> = Array1::zeros(n_clusters);
    let mut sums = Array2::zeros((n_clusters, observations.ncols()));

    Zip::from(observations.rows())
        .and(cluster_memberships)
        .for_each(|observation, &cluster_membership| {
            let mut sum = sums.row_mut(cluster_membership);
            sum += &observation;
            counts[cluster_membership] += 1;
        });

    let mut relocations = match policy {
        EmptyClusterPolicy::KeepPrevious => Vec::new(),
        EmptyClusterPolicy::FarthestPoint => farthest_first(dists),
    }
    .into_iter();

    let mut centroids = old_centroids.clone();
    for (cluster, mut centroid) in centroids.rows_mut().into_iter().enumerate() {
        let count = counts[cluster];
        if count > 0 {
            let count = F::cast(count);
            Zip::from(&mut centroid)
                .and(&sums.row(cluster))
                .for_each(|c, &s| *c = s / count);
        } else if let Some(idx) = relocations.next() {
            centroid.assign(&observations.row(idx));
        }
    }
    centroids
}

/// Indices of the observations sorted by decreasing distance, lowest index first on ties.
fn farthest_first<F: Float>(dists: &ArrayBase<impl Data<Elem = F>, Ix1>) -> Vec<usize> {
    let mut order: Vec<usize> = (0..dists.len()).collect();
    order.sort_by(|&a, &b| {
        dists[b]
            .partial_cmp(&dists[a])
            .unwrap_or(Ordering::Equal)
            .then(a.cmp(&b))
    });
    order
}

// Update `cluster_memberships` with the index of the cluster each observation belongs to.
pub(crate) fn update_cluster_memberships<F: Float>(
    centroids: &ArrayBase<impl Data<Elem = F> + Sync, Ix2>,
    observations: &ArrayBase<impl Data<Elem = F> + Sync, Ix2>,
    cluster_memberships: &mut ArrayBase<impl DataMut<Elem = usize>, Ix1>,
) {
    Zip::from(observations.axis_iter(Axis(0)))
        .and(cluster_memberships)
        .par_for_each(|observation, cluster_membership| {
            *cluster_membership = closest_centroid(centroids, &observation).0
        });
}

// Updates `dists` with the distance of each observation from its closest centroid.
pub(crate) fn update_min_dists<F: Float>(
    centroids: &ArrayBase<impl Data<Elem = F> + Sync, Ix2>,
    observations: &ArrayBase<impl Data<Elem = F> + Sync, Ix2>,
    dists: &mut ArrayBase<impl DataMut<Elem = F>, Ix1>,
) {
    Zip::from(observations.axis_iter(Axis(0)))
        .and(dists)
        .par_for_each(|observation, dist| *dist = closest_centroid(centroids, &observation).1);
}

// Efficient combination of `update_cluster_memberships` and `update_min_dists`.
pub(crate) fn update_memberships_and_dists<F: Float>(
    centroids: &ArrayBase<impl Data<Elem = F> + Sync, Ix2>,
    observations: &ArrayBase<impl Data<Elem = F> + Sync, Ix2>,
    cluster_memberships: &mut ArrayBase<impl DataMut<Elem = usize>, Ix1>,
    dists: &mut ArrayBase<impl DataMut<Elem = F>, Ix1>,
) {
    Zip::from(observations.axis_iter(Axis(0)))
        .and(cluster_memberships)
        .and(dists)
        .par_for_each(|observation, cluster_membership, dist| {
            let (m, d) = closest_centroid(centroids, &observation);
            *cluster_membership = m;
            *dist = d;
        });
}

/// Given a matrix of centroids with shape (n_centroids, n_features) and an observation,
/// return the index of the closest centroid (the index of the corresponding row in `centroids`)
/// along with the squared distance to it. The lowest index wins ties.
pub(crate) fn closest_centroid<F: Float>(
    // (n_centroids, n_features)
    centroids: &ArrayBase<impl Data<Elem = F>, Ix2>,
    // (n_features)
    observation: &ArrayBase<impl Data<Elem = F>, Ix1>,
) -> (usize, F) {
    let iterator = centroids.rows().into_iter();

    let first_centroid = centroids.row(0);
    let (mut closest_index, mut minimum_distance) =
        (0, sq_l2_dist(first_centroid, observation.view()));

    for (centroid_index, centroid) in iterator.enumerate().skip(1) {
        let distance = sq_l2_dist(centroid, observation.view());
        if distance < minimum_distance {
            closest_index = centroid_index;
            minimum_distance = distance;
        }
    }
    (closest_index, minimum_distance)
}

/// Squared euclidean distance between two points
fn sq_l2_dist<F: Float>(a: ArrayView1<F>, b: ArrayView1<F>) -> F {
    Zip::from(&a).and(&b).fold(F::zero(), |acc, &x, &y| {
        let diff = x - y;
        acc + diff * diff
    })
}
