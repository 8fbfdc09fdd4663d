use crate::error::{Error, Result};
use crate::model::ClassifierParams;
use crate::task::Task;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Training settings for one task.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct TaskConfig {
    pub dataset: PathBuf,
    #[serde(flatten)]
    pub classifier: ClassifierParams,
}

impl TaskConfig {
    fn for_task(task: Task) -> TaskConfig {
        TaskConfig {
            dataset: PathBuf::from(format!("{}_dataset.csv", task.as_str())),
            classifier: ClassifierParams::default(),
        }
    }
}

fn default_models_dir() -> PathBuf {
    PathBuf::from("models")
}

fn default_seed() -> u64 {
    42
}

fn default_test_ratio() -> f64 {
    0.2
}

fn default_diabetes() -> TaskConfig {
    TaskConfig::for_task(Task::Diabetes)
}

fn default_blood_test() -> TaskConfig {
    TaskConfig::for_task(Task::BloodTest)
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Config {
    #[serde(default = "default_models_dir")]
    pub models_dir: PathBuf,
    #[serde(default = "default_seed")]
    pub seed: u64,
    /// Fraction of samples held out for evaluation.
    #[serde(default = "default_test_ratio")]
    pub test_ratio: f64,
    #[serde(default = "default_diabetes")]
    pub diabetes: TaskConfig,
    #[serde(default = "default_blood_test")]
    pub blood_test: TaskConfig,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            models_dir: default_models_dir(),
            seed: default_seed(),
            test_ratio: default_test_ratio(),
            diabetes: default_diabetes(),
            blood_test: default_blood_test(),
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Config> {
        let text = fs::read_to_string(path).map_err(|why| Error::io(path, why))?;
        Config::parse(&text)
    }

    pub fn parse(text: &str) -> Result<Config> {
        let config: Config = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.test_ratio > 0.0 && self.test_ratio < 1.0) {
            return Err(Error::InvalidConfig(format!(
                "test_ratio must be between 0 and 1, got {}",
                self.test_ratio
            )));
        }
        self.diabetes.classifier.validate()?;
        self.blood_test.classifier.validate()
    }

    pub fn task(&self, task: Task) -> &TaskConfig {
        match task {
            Task::Diabetes => &self.diabetes,
            Task::BloodTest => &self.blood_test,
        }
    }

    pub fn task_mut(&mut self, task: Task) -> &mut TaskConfig {
        match task {
            Task::Diabetes => &mut self.diabetes,
            Task::BloodTest => &mut self.blood_test,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Kernel;

    #[test]
    fn empty_file_gives_defaults() {
        let config = Config::parse("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.seed, 42);
        assert_eq!(config.test_ratio, 0.2);
        assert_eq!(config.models_dir, PathBuf::from("models"));
        assert_eq!(
            config.task(Task::BloodTest).dataset,
            PathBuf::from("blood_test_dataset.csv")
        );
        assert_eq!(config.diabetes.classifier.kernel, Kernel::Rbf);
    }

    #[test]
    fn reads_task_tables() {
        let config = Config::parse(
            r#"
            models_dir = "artifacts"
            seed = 7

            [diabetes]
            dataset = "data/diabetes.csv"
            kernel = "linear"
            c = 0.5

            [blood_test]
            dataset = "data/blood.csv"
            gamma = 0.1
            "#,
        )
        .unwrap();
        assert_eq!(config.models_dir, PathBuf::from("artifacts"));
        assert_eq!(config.seed, 7);
        assert_eq!(config.diabetes.classifier.kernel, Kernel::Linear);
        assert_eq!(config.diabetes.classifier.c, 0.5);
        assert_eq!(config.blood_test.classifier.kernel, Kernel::Rbf);
        assert_eq!(config.blood_test.classifier.c, 1.0);
        assert_eq!(config.blood_test.classifier.gamma, Some(0.1));
    }

    #[test]
    fn rejects_bad_values() {
        assert!(matches!(
            Config::parse("test_ratio = 1.5"),
            Err(Error::InvalidConfig(_))
        ));
        assert!(matches!(
            Config::parse("[diabetes]\ndataset = \"d.csv\"\nc = -1.0"),
            Err(Error::InvalidConfig(_))
        ));
        assert!(matches!(
            Config::parse("[diabetes]\ndataset = \"d.csv\"\nkernel = \"poly\""),
            Err(Error::Config(_))
        ));
    }
}
