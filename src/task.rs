//! The two clinical classification tasks and their fixed schemas.

use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Name of the label column in every training dataset.
pub const LABEL_COLUMN: &str = "outcome";

const DIABETES_FEATURES: [&str; 8] = [
    "pregnancies",
    "glucose",
    "blood_pressure",
    "skin_thickness",
    "insulin",
    "bmi",
    "diabetes_pedigree_function",
    "age",
];

const BLOOD_TEST_FEATURES: [&str; 5] = [
    "hemoglobin",
    "wbc_count",
    "rbc_count",
    "platelets",
    "cholesterol",
];

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Task {
    Diabetes,
    BloodTest,
}

impl Task {
    /// Feature columns, in the order the models consume them.
    pub fn feature_names(&self) -> &'static [&'static str] {
        match self {
            Task::Diabetes => &DIABETES_FEATURES,
            Task::BloodTest => &BLOOD_TEST_FEATURES,
        }
    }

    pub fn n_features(&self) -> usize {
        self.feature_names().len()
    }

    /// Wording for a prediction, as stored with the report.
    pub fn outcome(&self, positive: bool) -> &'static str {
        match (self, positive) {
            (Task::Diabetes, true) => "Diabetic",
            (Task::Diabetes, false) => "Non-Diabetic",
            (Task::BloodTest, true) => "Abnormal",
            (Task::BloodTest, false) => "Normal",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Task::Diabetes => "diabetes",
            Task::BloodTest => "blood_test",
        }
    }

    pub fn scaler_file(&self) -> String {
        format!("{}_scaler.bin", self.as_str())
    }

    pub fn model_file(&self) -> String {
        format!("{}_model.bin", self.as_str())
    }

    pub fn report_file(&self) -> String {
        format!("{}_report.toml", self.as_str())
    }
}

impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Task {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "diabetes" => Ok(Task::Diabetes),
            "blood_test" | "bloodtest" => Ok(Task::BloodTest),
            other => Err(format!(
                "unknown task {:?}, expected \"diabetes\" or \"blood_test\"",
                other
            )),
        }
    }
}
