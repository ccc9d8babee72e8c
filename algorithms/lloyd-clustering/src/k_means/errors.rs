use thiserror::Error;

/// An error when fitting with an invalid hyperparameter
#[derive(Error, Debug)]
pub enum KMeansParamsError {
    #[error("n_clusters cannot be 0")]
    NClusters,
    #[error("n_runs cannot be 0")]
    NRuns,
    #[error("max_n_iterations cannot be 0")]
    MaxIterations,
    #[error("{found} precomputed centroids given for {expected} clusters")]
    PrecomputedClusters { expected: usize, found: usize },
}

/// An error when modeling a KMeans algorithm
#[derive(Error, Debug)]
pub enum KMeansError {
    /// When any of the hyperparameters are set the wrong value
    #[error("Invalid hyperparameter: {0}")]
    InvalidParams(#[from] KMeansParamsError),
    /// When the dataset has no observation to cluster
    #[error("Invalid argument: the dataset is empty")]
    EmptyDataset,
    /// When more clusters are requested than there are observations
    #[error("Invalid argument: cannot form {n_clusters} clusters from {n_samples} observations")]
    TooManyClusters { n_clusters: usize, n_samples: usize },
    /// When precomputed centroids do not live in the feature space of the dataset
    #[error("Invalid argument: precomputed centroids have {found} features, the dataset has {expected}")]
    PrecomputedShape { expected: usize, found: usize },
    #[error(transparent)]
    LloydError(#[from] lloyd::error::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use lloyd::prelude::*;
    use ndarray::Array2;

    fn reshaped(values: Vec<f64>) -> Result<Array2<f64>, KMeansError> {
        Ok(Array2::from_shape_vec((2, 3), values).map_err(lloyd::error::Error::from)?)
    }

    #[test]
    fn core_errors_are_forwarded() {
        let err = reshaped(vec![0.; 5]).unwrap_err();
        assert!(matches!(
            err,
            KMeansError::LloydError(lloyd::error::Error::NdShape(_))
        ));
        assert!(err.to_string().starts_with("invalid ndarray shape"));
    }

    #[test]
    fn params_errors_are_wrapped() {
        let err = KMeansError::from(KMeansParamsError::PrecomputedClusters {
            expected: 3,
            found: 2,
        });
        assert_eq!(
            err.to_string(),
            "Invalid hyperparameter: 2 precomputed centroids given for 3 clusters"
        );
    }
}
