use super::algorithm::update_min_dists;
use lloyd::Float;
use ndarray::{s, Array1, Array2, ArrayView2, Axis};
use ndarray_rand::rand::distributions::{Distribution, WeightedIndex};
use ndarray_rand::rand::{self, Rng};
#[cfg(feature = "serde")]
use serde_crate::{Deserialize, Serialize};

#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Clone, Debug, PartialEq)]
#[non_exhaustive]
/// Specifies centroid initialization algorithm for KMeans.
pub enum KMeansInit<F: Float> {
    /// Pick `n_clusters` distinct observations uniformly at random, without replacement.
    /// When there are exactly `n_clusters` observations, every observation becomes the
    /// centroid of the cluster with its own index.
    Random,
    /// Precomputed list of centroids, represented as an array of (n_centroids, n_features).
    Precomputed(Array2<F>),
    /// K-means++ algorithm. Using this over random initialization causes K-means to converge
    /// faster for almost all cases, since K-means++ produces better centroids.
    KMeansPlusPlus,
}

impl<F: Float> KMeansInit<F> {
    /// Runs the chosen initialization routine
    pub(crate) fn run<R: Rng>(
        &self,
        n_clusters: usize,
        observations: ArrayView2<F>,
        rng: &mut R,
    ) -> Array2<F> {
        match self {
            Self::Random => random_init(n_clusters, observations, rng),
            Self::KMeansPlusPlus => k_means_plusplus(n_clusters, observations, rng),
            Self::Precomputed(centroids) => centroids.clone(),
        }
    }
}

/// Pick random points from the input matrix as centroids
fn random_init<F: Float>(
    n_clusters: usize,
    observations: ArrayView2<F>,
    rng: &mut impl Rng,
) -> Array2<F> {
    let (n_samples, _) = observations.dim();
    if n_clusters == n_samples {
        return observations.to_owned();
    }
    let indices = rand::seq::index::sample(rng, n_samples, n_clusters).into_vec();
    observations.select(Axis(0), &indices)
}

/// Selects centroids using the KMeans++ initialization algorithm. The weights determine the
/// likeliness of an input point to be selected as a centroid relative to other points. The
/// higher the weight, the more likely the point will be selected as a centroid.
fn k_means_plusplus<F: Float>(
    n_clusters: usize,
    observations: ArrayView2<F>,
    rng: &mut impl Rng,
) -> Array2<F> {
    let (n_samples, n_features) = observations.dim();
    let mut centroids = Array2::zeros((n_clusters, n_features));
    // Select 1st centroid from the input points uniformly
    let first = rng.gen_range(0..n_samples);
    centroids.row_mut(0).assign(&observations.row(first));

    let mut dists = Array1::zeros(n_samples);
    for c_cnt in 1..n_clusters {
        update_min_dists(&centroids.slice(s![0..c_cnt, ..]), &observations, &mut dists);
        // Every observation already sits on a centroid: fall back to a uniform pick
        let centroid_idx = match WeightedIndex::new(dists.iter()) {
            Ok(weights) => weights.sample(rng),
            Err(_) => rng.gen_range(0..n_samples),
        };
        centroids
            .row_mut(c_cnt)
            .assign(&observations.row(centroid_idx));
    }
    centroids
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use lloyd_datasets::generate;
    use ndarray::{array, concatenate};
    use ndarray_rand::rand::SeedableRng;
    use rand_isaac::Isaac64Rng;
    use std::collections::HashSet;

    #[test]
    fn test_precomputed() {
        let mut rng = Isaac64Rng::seed_from_u64(40);
        let centroids = array![[0.0, 1.0], [40.0, 10.0]];
        let observations = array![[3.0, 4.0], [1.0, 3.0], [25.0, 15.0]];
        let c = KMeansInit::Precomputed(centroids.clone()).run(2, observations.view(), &mut rng);
        assert_abs_diff_eq!(c, centroids);
    }

    #[test]
    fn random_init_picks_distinct_observations() {
        let mut rng = Isaac64Rng::seed_from_u64(42);
        let observations = Array2::from_shape_fn((50, 3), |(i, j)| (i * 3 + j) as f64);
        let centroids = KMeansInit::Random.run(10, observations.view(), &mut rng);

        assert_eq!(centroids.dim(), (10, 3));
        let picked = centroids
            .rows()
            .into_iter()
            .map(|row| {
                observations
                    .rows()
                    .into_iter()
                    .position(|obs| obs == row)
                    .expect("centroid is not an observation")
            })
            .collect::<HashSet<_>>();
        assert_eq!(picked.len(), 10);
    }

    #[test]
    fn random_init_is_seeded() {
        let observations = Array2::from_shape_fn((30, 2), |(i, j)| (i + 7 * j) as f64);
        let a = KMeansInit::Random.run(
            4,
            observations.view(),
            &mut Isaac64Rng::seed_from_u64(5),
        );
        let b = KMeansInit::Random.run(
            4,
            observations.view(),
            &mut Isaac64Rng::seed_from_u64(5),
        );
        assert_eq!(a, b);
    }

    #[test]
    fn random_init_with_as_many_clusters_as_observations() {
        let mut rng = Isaac64Rng::seed_from_u64(0);
        let observations = array![[5., 1.], [0., 0.], [3., 3.]];
        let centroids = KMeansInit::Random.run(3, observations.view(), &mut rng);
        assert_eq!(centroids, observations);
    }

    #[test]
    fn test_kmeans_plusplus() {
        let mut rng = Isaac64Rng::seed_from_u64(42);
        let centroids = [20.0, -1000.0, 1000.0];
        let clusters: Vec<Array2<_>> = centroids
            .iter()
            .map(|&c| generate::blobs(50, &array![[c, c]], &mut rng))
            .collect();
        let obs = clusters.iter().fold(Array2::default((0, 2)), |a, b| {
            concatenate(Axis(0), &[a.view(), b.view()]).unwrap()
        });

        let out = KMeansInit::KMeansPlusPlus.run(3, obs.view(), &mut rng);
        let mut cluster_ids = HashSet::new();
        for row in out.rows() {
            // Find the resulting cluster of each centroid
            let cluster_id = centroids
                .iter()
                .position(|&c| (row[0] - c).abs() < 20.0)
                .unwrap();
            cluster_ids.insert(cluster_id);
        }
        // Each centroid should be from a different cluster
        assert_eq!(cluster_ids.len(), 3);
    }

    #[test]
    fn kmeans_plusplus_on_duplicate_observations() {
        let mut rng = Isaac64Rng::seed_from_u64(3);
        let observations = array![[1., 1.], [1., 1.], [1., 1.]];
        let out = KMeansInit::KMeansPlusPlus.run(2, observations.view(), &mut rng);
        assert_eq!(out, array![[1., 1.], [1., 1.]]);
    }
}
