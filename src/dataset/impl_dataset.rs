use super::{DatasetBase, Float, Records};
use crate::traits::{Predict, PredictInplace};
use ndarray::{ArrayBase, Data, Dimension, Ix2};

/// Implementation without constraints on records and targets
impl<R: Records, T> DatasetBase<R, T> {
    /// Create a new dataset from records and targets
    ///
    /// # Example
    ///
    /// ```
    /// use lloyd::DatasetBase;
    /// use ndarray::array;
    ///
    /// let dataset = DatasetBase::new(array![[1., 2.], [3., 4.]], array![0usize, 1]);
    /// ```
    pub fn new(records: R, targets: T) -> DatasetBase<R, T> {
        DatasetBase { records, targets }
    }

    /// Returns reference to records
    pub fn records(&self) -> &R {
        &self.records
    }

    /// Returns reference to targets
    pub fn targets(&self) -> &T {
        &self.targets
    }

    /// Updates the targets of a dataset
    pub fn with_targets<U>(self, targets: U) -> DatasetBase<R, U> {
        DatasetBase {
            records: self.records,
            targets,
        }
    }
}

/// Create an unlabeled dataset from a feature matrix
impl<F: Float, D: Data<Elem = F>> From<ArrayBase<D, Ix2>> for DatasetBase<ArrayBase<D, Ix2>, ()> {
    fn from(records: ArrayBase<D, Ix2>) -> Self {
        DatasetBase {
            records,
            targets: (),
        }
    }
}

/// Predict on a borrowed array, allocating the default target first
impl<'a, F, D, DM, T, O> Predict<&'a ArrayBase<D, DM>, T> for O
where
    D: Data<Elem = F>,
    DM: Dimension,
    O: PredictInplace<ArrayBase<D, DM>, T>,
{
    fn predict(&self, records: &'a ArrayBase<D, DM>) -> T {
        let mut targets = self.default_target(records);
        self.predict_inplace(records, &mut targets);
        targets
    }
}

/// Predict on a dataset, replacing its targets with the predictions
impl<R, T, S, O> Predict<DatasetBase<R, S>, DatasetBase<R, T>> for O
where
    R: Records,
    O: PredictInplace<R, T>,
{
    fn predict(&self, records: DatasetBase<R, S>) -> DatasetBase<R, T> {
        let mut targets = self.default_target(&records.records);
        self.predict_inplace(&records.records, &mut targets);
        records.with_targets(targets)
    }
}
