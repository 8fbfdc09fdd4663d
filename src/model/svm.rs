use crate::dataset::Samples;
use crate::error::{Error, Result};
use linfa::prelude::*;
use linfa_svm::Svm;
use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use tracing::{debug, info};

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum Kernel {
    Linear,
    /// Radial basis (Gaussian) kernel.
    #[default]
    Rbf,
}

impl fmt::Display for Kernel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Kernel::Linear => f.write_str("linear"),
            Kernel::Rbf => f.write_str("rbf"),
        }
    }
}

impl FromStr for Kernel {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "linear" => Ok(Kernel::Linear),
            "rbf" | "gaussian" => Ok(Kernel::Rbf),
            other => Err(format!(
                "unknown kernel {:?}, expected \"linear\" or \"rbf\"",
                other
            )),
        }
    }
}

fn default_c() -> f64 {
    1.0
}

/// Training-time settings for the classifier.
///
/// `gamma` only applies to the RBF kernel. When absent it is derived from the
/// training data as `1 / (n_features * var(X))`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ClassifierParams {
    #[serde(default)]
    pub kernel: Kernel,
    #[serde(default = "default_c")]
    pub c: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gamma: Option<f64>,
}

impl Default for ClassifierParams {
    fn default() -> Self {
        ClassifierParams {
            kernel: Kernel::default(),
            c: default_c(),
            gamma: None,
        }
    }
}

impl ClassifierParams {
    pub fn validate(&self) -> Result<()> {
        if !(self.c.is_finite() && self.c > 0.0) {
            return Err(Error::InvalidConfig(format!(
                "c must be positive, got {}",
                self.c
            )));
        }
        if let Some(gamma) = self.gamma {
            if !(gamma.is_finite() && gamma > 0.0) {
                return Err(Error::InvalidConfig(format!(
                    "gamma must be positive, got {}",
                    gamma
                )));
            }
        }
        Ok(())
    }

    fn resolve_gamma(&self, records: &Array2<f64>) -> f64 {
        if let Some(gamma) = self.gamma {
            return gamma;
        }
        let n = records.len() as f64;
        let mean = records.sum() / n;
        let var = records.mapv(|v| (v - mean).powi(2)).sum() / n;
        let denom = records.ncols() as f64 * var;
        if denom.is_finite() && denom > 0.0 {
            1.0 / denom
        } else {
            1.0
        }
    }
}

/// Confusion counts of a classifier on held-out samples.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Evaluation {
    pub true_positives: usize,
    pub true_negatives: usize,
    pub false_positives: usize,
    pub false_negatives: usize,
}

impl Evaluation {
    pub fn total(&self) -> usize {
        self.true_positives + self.true_negatives + self.false_positives + self.false_negatives
    }

    /// Fraction of correct predictions, in `[0, 1]`.
    pub fn accuracy(&self) -> f64 {
        (self.true_positives + self.true_negatives) as f64 / self.total() as f64
    }

    /// Accuracy of always predicting the most frequent true label.
    pub fn majority_baseline(&self) -> f64 {
        let positives = self.true_positives + self.false_negatives;
        let negatives = self.true_negatives + self.false_positives;
        positives.max(negatives) as f64 / self.total() as f64
    }
}

/// Binary kernel SVM over standardized features. `true` is the positive class.
#[derive(Serialize, Deserialize)]
pub struct SvmClassifier {
    kernel: Kernel,
    c: f64,
    gamma: Option<f64>,
    n_features: usize,
    model: Svm<f64, bool>,
}

impl SvmClassifier {
    pub fn fit(train: &Samples, params: &ClassifierParams) -> Result<SvmClassifier> {
        params.validate()?;
        if train.is_empty() || train.n_features() == 0 {
            return Err(Error::EmptyInput);
        }
        let (negatives, positives) = train.class_counts();
        if negatives == 0 || positives == 0 {
            return Err(Error::SingleClass);
        }

        let svm = Svm::<f64, bool>::params().pos_neg_weights(params.c, params.c);
        let (svm, gamma) = match params.kernel {
            Kernel::Linear => (svm.linear_kernel(), None),
            Kernel::Rbf => {
                let gamma = params.resolve_gamma(&train.records);
                (svm.gaussian_kernel(1.0 / gamma), Some(gamma))
            }
        };
        debug!(
            "Fitting {} SVM on {} samples (c = {}, gamma = {:?})",
            params.kernel,
            train.len(),
            params.c,
            gamma
        );

        let model = svm.fit(&train.to_dataset())?;
        info!(
            "SVM fitted with {} support vectors out of {} samples",
            model.nsupport(),
            train.len()
        );

        Ok(SvmClassifier {
            kernel: params.kernel,
            c: params.c,
            gamma,
            n_features: train.n_features(),
            model,
        })
    }

    pub fn kernel(&self) -> Kernel {
        self.kernel
    }

    pub fn c(&self) -> f64 {
        self.c
    }

    /// The RBF width used at fit time, `None` for the linear kernel.
    pub fn gamma(&self) -> Option<f64> {
        self.gamma
    }

    pub fn n_features(&self) -> usize {
        self.n_features
    }

    pub fn support_vectors(&self) -> usize {
        self.model.nsupport()
    }

    /// Predicts the label of one standardized feature row.
    pub fn predict(&self, row: &[f64]) -> Result<bool> {
        self.check_width(row.len())?;
        let positive: bool = self.model.predict(Array1::from(row.to_vec()));
        Ok(positive)
    }

    pub fn predict_batch(&self, records: &Array2<f64>) -> Result<Array1<bool>> {
        self.check_width(records.ncols())?;
        let predictions: Array1<bool> = self.model.predict(records);
        Ok(predictions)
    }

    pub fn evaluate(&self, test: &Samples) -> Result<Evaluation> {
        if test.is_empty() {
            return Err(Error::EmptyInput);
        }
        let predictions = self.predict_batch(&test.records)?;

        let mut eval = Evaluation {
            true_positives: 0,
            true_negatives: 0,
            false_positives: 0,
            false_negatives: 0,
        };
        for (real, pred) in test.labels.iter().zip(predictions.iter()) {
            match (*real, *pred) {
                (true, true) => eval.true_positives += 1,
                (true, false) => eval.false_negatives += 1,
                (false, true) => eval.false_positives += 1,
                (false, false) => eval.true_negatives += 1,
            }
        }
        Ok(eval)
    }

    fn check_width(&self, found: usize) -> Result<()> {
        if found != self.n_features {
            return Err(Error::ShapeMismatch {
                expected: self.n_features,
                found,
            });
        }
        Ok(())
    }
}
