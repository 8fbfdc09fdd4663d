//! Serving-side entry point for the web layer.
//!
//! The service is built once at startup and then only read, so a single
//! instance can be shared by reference across request handlers.

use crate::error::{Error, Result};
use crate::explain;
use crate::model::{self, Loaded, StandardScaler, SvmClassifier};
use crate::records::{BloodTestInput, DiabetesInput, Diagnosis};
use crate::task::Task;
use std::path::Path;
use tracing::{info, warn};

/// A loaded scaler and classifier for one task.
pub struct Predictor {
    task: Task,
    scaler: StandardScaler,
    classifier: SvmClassifier,
}

impl Predictor {
    pub fn new(task: Task, scaler: StandardScaler, classifier: SvmClassifier) -> Result<Predictor> {
        for found in [scaler.n_features(), classifier.n_features()] {
            if found != task.n_features() {
                return Err(Error::ShapeMismatch {
                    expected: task.n_features(),
                    found,
                });
            }
        }
        Ok(Predictor {
            task,
            scaler,
            classifier,
        })
    }

    /// Reads `<task>_scaler.bin` and `<task>_model.bin` from `dir`. Both must
    /// come from the same training run.
    pub fn load(task: Task, dir: &Path) -> Result<Predictor> {
        let scaler: Loaded<StandardScaler> = model::load(task, &dir.join(task.scaler_file()))?;
        let classifier: Loaded<SvmClassifier> = model::load(task, &dir.join(task.model_file()))?;
        if scaler.run != classifier.run {
            return Err(Error::ArtifactRun {
                scaler: scaler.run,
                model: classifier.run,
            });
        }
        Predictor::new(task, scaler.payload, classifier.payload)
    }

    pub fn task(&self) -> Task {
        self.task
    }

    /// Scales a raw feature vector and predicts its label.
    pub fn predict(&self, raw: &[f64]) -> Result<bool> {
        let names = self.task.feature_names();
        if let Some((name, value)) = names.iter().zip(raw).find(|(_, v)| !v.is_finite()) {
            return Err(Error::NonFinite {
                feature: name.to_string(),
                value: *value,
            });
        }
        let scaled = self.scaler.transform_row(raw)?;
        self.classifier.predict(&scaled.to_vec())
    }
}

pub struct DiagnosisService {
    diabetes: Option<Predictor>,
    blood_test: Option<Predictor>,
}

impl DiagnosisService {
    pub fn new(diabetes: Option<Predictor>, blood_test: Option<Predictor>) -> DiagnosisService {
        DiagnosisService {
            diabetes,
            blood_test,
        }
    }

    /// Loads every task found in `dir`. Tasks whose artifacts are missing or
    /// unreadable stay unavailable; the others keep working.
    pub fn load(dir: &Path) -> DiagnosisService {
        let load = |task: Task| match Predictor::load(task, dir) {
            Ok(predictor) => {
                info!("Loaded {} model from {}", task, dir.display());
                Some(predictor)
            }
            Err(why) => {
                warn!("{} predictions unavailable: {}", task, why);
                None
            }
        };
        DiagnosisService::new(load(Task::Diabetes), load(Task::BloodTest))
    }

    pub fn predictor(&self, task: Task) -> Result<&Predictor> {
        let predictor = match task {
            Task::Diabetes => &self.diabetes,
            Task::BloodTest => &self.blood_test,
        };
        predictor.as_ref().ok_or(Error::ModelUnavailable(task))
    }

    pub fn is_available(&self, task: Task) -> bool {
        self.predictor(task).is_ok()
    }

    pub fn diagnose_diabetes(&self, input: &DiabetesInput) -> Result<Diagnosis> {
        let task = Task::Diabetes;
        let positive = self.predictor(task)?.predict(&input.features())?;
        Ok(Diagnosis {
            task,
            positive,
            outcome: task.outcome(positive).to_string(),
            explanation: explain::diabetes(positive, input),
        })
    }

    pub fn diagnose_blood_test(&self, input: &BloodTestInput) -> Result<Diagnosis> {
        let task = Task::BloodTest;
        let positive = self.predictor(task)?.predict(&input.features())?;
        Ok(Diagnosis {
            task,
            positive,
            outcome: task.outcome(positive).to_string(),
            explanation: explain::blood_test(positive, input),
        })
    }

    /// Dispatches a raw feature vector to the matching typed diagnosis.
    pub fn diagnose(&self, task: Task, raw: &[f64]) -> Result<Diagnosis> {
        let width = |found: usize| Error::ShapeMismatch {
            expected: task.n_features(),
            found,
        };
        match task {
            Task::Diabetes => {
                let values: [f64; 8] = raw.try_into().map_err(|_| width(raw.len()))?;
                self.diagnose_diabetes(&DiabetesInput::from_features(values))
            }
            Task::BloodTest => {
                let values: [f64; 5] = raw.try_into().map_err(|_| width(raw.len()))?;
                self.diagnose_blood_test(&BloodTestInput::from_features(values))
            }
        }
    }
}
