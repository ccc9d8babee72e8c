use criterion::{
    black_box, criterion_group, criterion_main, AxisScale, BenchmarkId, Criterion,
    PlotConfiguration,
};
use lloyd::benchmarks::config;
use lloyd::traits::Fit;
use lloyd::DatasetBase;
use lloyd_clustering::{KMeans, KMeansInit};
use lloyd_datasets::generate;
use ndarray::Array2;
use ndarray_rand::rand::SeedableRng;
use ndarray_rand::rand_distr::Uniform;
use ndarray_rand::RandomExt;
use rand_xoshiro::Xoshiro256Plus;

fn k_means_bench(c: &mut Criterion) {
    let mut rng = Xoshiro256Plus::seed_from_u64(40);
    let cluster_sizes = vec![(100, 4), (400, 10), (3000, 10)];

    let mut benchmark = c.benchmark_group("naive_k_means");
    config::set_default_benchmark_configs(&mut benchmark);
    benchmark.plot_config(PlotConfiguration::default().summary_scale(AxisScale::Logarithmic));

    for (cluster_size, n_clusters) in cluster_sizes {
        let n_features = 3;
        let centroids =
            Array2::random_using((n_clusters, n_features), Uniform::new(-30., 30.), &mut rng);
        let dataset = DatasetBase::from(generate::blobs(cluster_size, &centroids, &mut rng));

        for (name, init) in [
            ("random", KMeansInit::Random),
            ("kmeans++", KMeansInit::KMeansPlusPlus),
        ] {
            benchmark.bench_function(BenchmarkId::new(name, cluster_size), |bencher| {
                bencher.iter(|| {
                    KMeans::params_with_seed(black_box(n_clusters), black_box(42))
                        .init_method(init.clone())
                        .max_n_iterations(black_box(1000))
                        .fit(&dataset)
                        .unwrap()
                });
            });
        }
    }

    benchmark.finish();
}

fn n_runs_bench(c: &mut Criterion) {
    let mut rng = Xoshiro256Plus::seed_from_u64(41);
    let centroids = Array2::random_using((8, 5), Uniform::new(-30., 30.), &mut rng);
    let dataset = DatasetBase::from(generate::blobs(500, &centroids, &mut rng));

    let mut benchmark = c.benchmark_group("k_means_n_runs");
    config::set_default_benchmark_configs(&mut benchmark);

    for n_runs in [1, 5, 10] {
        benchmark.bench_with_input(
            BenchmarkId::new("n_runs", n_runs),
            &n_runs,
            |bencher, &n_runs| {
                bencher.iter(|| {
                    black_box(
                        KMeans::params_with_seed(8, 42)
                            .n_runs(n_runs)
                            .fit(&dataset)
                            .unwrap(),
                    )
                });
            },
        );
    }

    benchmark.finish();
}

#[cfg(not(target_os = "windows"))]
criterion_group! {
    name = benches;
    config = config::get_default_profiling_configs();
    targets = k_means_bench, n_runs_bench
}
#[cfg(target_os = "windows")]
criterion_group!(benches, k_means_bench, n_runs_bench);

criterion_main!(benches);
