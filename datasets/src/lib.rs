//! `lloyd-datasets` provides synthetic datasets ready to be used in tests, benchmarks and
//! examples of the `lloyd` workspace.
//!
//! ## Current State
//!
//! Only generated data is provided: Gaussian (or any other distribution) blobs around a set of
//! known centroids, see [`generate`]. Loading real-world datasets is left to the caller, who
//! wraps any feature matrix with `lloyd::DatasetBase::from`.
//!
//! ## Using a generator
//!
//! ```
//! use lloyd_datasets::generate;
//! use ndarray::array;
//! use ndarray_rand::rand::SeedableRng;
//! use rand_isaac::Isaac64Rng;
//!
//! let mut rng = Isaac64Rng::seed_from_u64(42);
//! let centroids = array![[0., 1.], [-10., 20.], [-1., 10.]];
//! let records = generate::blobs(100, &centroids, &mut rng);
//! assert_eq!(records.dim(), (300, 2));
//! ```

pub mod generate;
