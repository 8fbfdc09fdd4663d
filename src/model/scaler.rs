use crate::error::{Error, Result};
use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Standard deviations below this are treated as a constant column and
/// replaced by 1.0 so the transform never divides by zero.
const MIN_SCALE: f64 = 10.0 * f64::EPSILON;

/// Per-feature standardization fitted on a training matrix.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct StandardScaler {
    means: Vec<f64>,
    scales: Vec<f64>,
}

impl StandardScaler {
    /// Computes column means and population standard deviations.
    pub fn fit(records: &Array2<f64>) -> Result<StandardScaler> {
        if records.ncols() == 0 {
            return Err(Error::EmptyInput);
        }
        let means = records.mean_axis(Axis(0)).ok_or(Error::EmptyInput)?;
        let scales = records.var_axis(Axis(0), 0.0).mapv(|v| {
            let std = v.sqrt();
            if std < MIN_SCALE {
                1.0
            } else {
                std
            }
        });
        debug!("Fitted scaler: means {:?}, scales {:?}", means, scales);

        Ok(StandardScaler {
            means: means.to_vec(),
            scales: scales.to_vec(),
        })
    }

    pub fn n_features(&self) -> usize {
        self.means.len()
    }

    pub fn means(&self) -> &[f64] {
        &self.means
    }

    pub fn scales(&self) -> &[f64] {
        &self.scales
    }

    pub fn transform(&self, records: ArrayView2<f64>) -> Result<Array2<f64>> {
        self.check_width(records.ncols())?;
        let means = ArrayView1::from(&self.means[..]);
        let scales = ArrayView1::from(&self.scales[..]);
        Ok((&records - &means) / &scales)
    }

    pub fn transform_row(&self, row: &[f64]) -> Result<Array1<f64>> {
        self.check_width(row.len())?;
        Ok(row
            .iter()
            .zip(self.means.iter().zip(&self.scales))
            .map(|(x, (mean, scale))| (x - mean) / scale)
            .collect())
    }

    fn check_width(&self, found: usize) -> Result<()> {
        if found != self.n_features() {
            return Err(Error::ShapeMismatch {
                expected: self.n_features(),
                found,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn fits_mean_and_population_std() {
        let records = array![[1.0, 10.0], [3.0, 10.0], [5.0, 40.0], [7.0, 40.0]];
        let scaler = StandardScaler::fit(&records).unwrap();
        assert_eq!(scaler.means(), &[4.0, 25.0]);
        assert!(close(scaler.scales()[0], 5.0_f64.sqrt()));
        assert!(close(scaler.scales()[1], 15.0));
    }

    #[test]
    fn transformed_columns_are_standardized() {
        let records = array![[1.0, 200.0], [2.0, 100.0], [6.0, 300.0], [3.0, 400.0]];
        let scaler = StandardScaler::fit(&records).unwrap();
        let scaled = scaler.transform(records.view()).unwrap();
        for column in scaled.columns() {
            assert!(close(column.mean().unwrap(), 0.0));
            assert!(close(column.mapv(|v| v * v).mean().unwrap(), 1.0));
        }
    }

    #[test]
    fn constant_column_uses_unit_scale() {
        let records = array![[5.0, 1.0], [5.0, 2.0], [5.0, 3.0]];
        let scaler = StandardScaler::fit(&records).unwrap();
        assert_eq!(scaler.scales()[0], 1.0);
        let row = scaler.transform_row(&[9.0, 2.0]).unwrap();
        assert_eq!(row[0], 4.0);
        assert!(row.iter().all(|v| v.is_finite()));
    }

    #[test]
    fn row_and_matrix_transforms_agree() {
        let records = array![[1.0, 2.0, 3.0], [4.0, 0.0, 1.0], [2.0, 2.0, 8.0]];
        let scaler = StandardScaler::fit(&records).unwrap();
        let matrix = scaler.transform(records.view()).unwrap();
        for (i, row) in records.rows().into_iter().enumerate() {
            let single = scaler.transform_row(&row.to_vec()).unwrap();
            assert_eq!(single, matrix.row(i));
        }
    }

    #[test]
    fn wrong_width_is_rejected() {
        let scaler = StandardScaler::fit(&array![[1.0, 2.0], [3.0, 4.0]]).unwrap();
        assert!(matches!(
            scaler.transform_row(&[1.0]),
            Err(Error::ShapeMismatch {
                expected: 2,
                found: 1
            })
        ));
        assert!(matches!(
            scaler.transform_row(&[1.0, 2.0, 3.0]),
            Err(Error::ShapeMismatch { found: 3, .. })
        ));
        assert!(scaler.transform(array![[1.0, 2.0, 3.0]].view()).is_err());
    }

    #[test]
    fn transform_is_not_idempotent() {
        let records = array![[10.0, 1.0], [20.0, 3.0], [30.0, 8.0]];
        let scaler = StandardScaler::fit(&records).unwrap();
        let once = scaler.transform_row(&[25.0, 4.0]).unwrap();
        let twice = scaler.transform_row(once.as_slice().unwrap()).unwrap();
        assert_ne!(once, twice);
    }

    #[test]
    fn empty_matrix_cannot_be_fitted() {
        let records = Array2::<f64>::zeros((0, 3));
        assert!(matches!(StandardScaler::fit(&records), Err(Error::EmptyInput)));
        let records = Array2::<f64>::zeros((4, 0));
        assert!(matches!(StandardScaler::fit(&records), Err(Error::EmptyInput)));
    }
}
