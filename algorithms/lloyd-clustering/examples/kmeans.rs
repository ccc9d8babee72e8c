use lloyd::traits::{Fit, Predict};
use lloyd::DatasetBase;
use lloyd_clustering::KMeans;
use lloyd_datasets::generate;
use ndarray::{array, Axis};
use ndarray_rand::rand::SeedableRng;
use rand_isaac::Isaac64Rng;
use tracing_subscriber::EnvFilter;

// A routine K-means task: build a synthetic dataset of 150 observations with 4 features,
// fit the algorithm on it and report what it found.
//
// Run with `RUST_LOG=lloyd_clustering=trace` to follow every iteration.
fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Our random number generator, seeded for reproducibility
    let mut rng = Isaac64Rng::seed_from_u64(42);

    // For each of our expected centroids, generate 50 data points around it (a "blob")
    let expected_centroids = array![
        [5.0, 3.4, 1.5, 0.2],
        [5.9, 2.8, 4.3, 1.3],
        [6.6, 3.0, 5.5, 2.0],
    ];
    let dataset = DatasetBase::from(generate::blobs(50, &expected_centroids, &mut rng));

    // Configure and run our training algorithm
    let n_clusters = expected_centroids.len_of(Axis(0));
    let model = KMeans::params_with_seed(n_clusters, 42)
        .max_n_iterations(300)
        .fit(&dataset)
        .expect("KMeans fitted");

    tracing::info!(
        n_iterations = model.n_iterations(),
        termination = ?model.termination(),
        inertia = model.inertia(),
        "k-means fitted"
    );
    for (idx, centroid) in model.centroids().outer_iter().enumerate() {
        println!(
            "cluster {}: {} observations, centroid {}",
            idx,
            model.cluster_count()[idx],
            centroid
        );
    }

    // Assign each point to a cluster using the set of centroids found using `fit`
    let dataset = model.predict(dataset);
    println!("memberships: {}", dataset.targets());
}
