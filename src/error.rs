//! Error types in lloyd
//!

use thiserror::Error;

use ndarray::ShapeError;

/// `Result` defaulting to the core [`Error`], any other error type can be named explicitly
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Failures shared by every estimator of the workspace.
///
/// The error type of each `Fit` implementation converts from it, so records that `ndarray`
/// refuses to shape can be propagated with `?` from inside a fit.
#[derive(Error, Debug, Clone)]
pub enum Error {
    #[error("invalid ndarray shape {0}")]
    NdShape(#[from] ShapeError),
}

#[cfg(test)]
mod tests {
    use super::{Error, Result};
    use ndarray::Array2;

    fn reshape(values: Vec<f64>) -> Result<Array2<f64>> {
        Ok(Array2::from_shape_vec((2, 2), values)?)
    }

    fn parse(text: &str) -> Result<f64, std::num::ParseFloatError> {
        text.parse()
    }

    #[test]
    fn default_error_is_the_core_error() {
        assert!(reshape(vec![1., 2., 3., 4.]).is_ok());
        assert!(matches!(reshape(vec![1.]), Err(Error::NdShape(_))));
    }

    #[test]
    fn error_type_can_be_overridden() {
        assert_eq!(parse("0.5"), Ok(0.5));
        assert!(parse("half").is_err());
    }
}
