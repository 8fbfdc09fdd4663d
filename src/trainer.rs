//! Offline training: dataset → split → scale → fit → evaluate → persist.

use crate::config::Config;
use crate::dataset::{self, Samples};
use crate::error::Result;
use crate::model::{
    self, ClassifierParams, Evaluation, Kernel, Staged, StandardScaler, SvmClassifier,
};
use crate::task::Task;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

/// Summary of a training run, written next to the artifacts.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct TrainingReport {
    pub task: Task,
    pub kernel: Kernel,
    pub c: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gamma: Option<f64>,
    pub seed: u64,
    pub train_samples: usize,
    pub test_samples: usize,
    pub support_vectors: usize,
    pub accuracy: f64,
    pub majority_baseline: f64,
    pub trained_at: String,
    /// Shared by the scaler and model artifacts of this run.
    pub run_id: String,
    pub evaluation: Evaluation,
}

/// A fitted scaler/classifier pair and how it scored on held-out data.
pub struct TrainedPipeline {
    pub scaler: StandardScaler,
    pub classifier: SvmClassifier,
    pub report: TrainingReport,
}

impl TrainedPipeline {
    /// Writes the scaler, the classifier and the report into `dir`. All three
    /// are staged before any is renamed into place, so a failed write keeps
    /// the previous run's files.
    pub fn persist(&self, dir: &Path) -> Result<()> {
        let task = self.report.task;
        let run = &self.report.run_id;
        let scaler_path = dir.join(task.scaler_file());
        let model_path = dir.join(task.model_file());
        let report_path = dir.join(task.report_file());

        let staged = [
            Staged::write(&scaler_path, &model::encode(task, run, &self.scaler)?)?,
            Staged::write(&model_path, &model::encode(task, run, &self.classifier)?)?,
            Staged::write(&report_path, toml::to_string_pretty(&self.report)?.as_bytes())?,
        ];
        for file in staged {
            file.commit()?;
        }
        info!("Scaler saved to {}", scaler_path.display());
        info!("Model saved to {}", model_path.display());
        info!("Run {} report saved to {}", run, report_path.display());
        Ok(())
    }
}

/// Fits a pipeline on `samples`. Nothing is written to disk.
pub fn train(
    task: Task,
    samples: &Samples,
    params: &ClassifierParams,
    test_ratio: f64,
    seed: u64,
) -> Result<TrainedPipeline> {
    let (negatives, positives) = samples.class_counts();
    info!(
        "Training {} model on {} samples (negative: {}, positive: {})",
        task,
        samples.len(),
        negatives,
        positives
    );

    let (train, test) = samples.split(test_ratio, seed)?;
    info!("Training samples: {}, testing samples: {}", train.len(), test.len());

    let scaler = StandardScaler::fit(&train.records)?;
    let train = Samples::new(scaler.transform(train.records.view())?, train.labels)?;
    let test = Samples::new(scaler.transform(test.records.view())?, test.labels)?;

    let classifier = SvmClassifier::fit(&train, params)?;
    let evaluation = classifier.evaluate(&test)?;
    info!(
        "{} model accuracy: {:.2}% (majority baseline {:.2}%)",
        task,
        evaluation.accuracy() * 100.0,
        evaluation.majority_baseline() * 100.0
    );

    let report = TrainingReport {
        task,
        kernel: classifier.kernel(),
        c: classifier.c(),
        gamma: classifier.gamma(),
        seed,
        train_samples: train.len(),
        test_samples: test.len(),
        support_vectors: classifier.support_vectors(),
        accuracy: evaluation.accuracy(),
        majority_baseline: evaluation.majority_baseline(),
        trained_at: Utc::now().to_rfc3339(),
        run_id: format!("{:016x}", rand::random::<u64>()),
        evaluation,
    };

    Ok(TrainedPipeline {
        scaler,
        classifier,
        report,
    })
}

/// Loads the task's dataset from the config, trains and persists.
pub fn run(task: Task, config: &Config) -> Result<TrainingReport> {
    let settings = config.task(task);
    let samples = dataset::load(&settings.dataset, task)?;
    let pipeline = train(
        task,
        &samples,
        &settings.classifier,
        config.test_ratio,
        config.seed,
    )?;
    pipeline.persist(&config.models_dir)?;
    Ok(pipeline.report)
}
