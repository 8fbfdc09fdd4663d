//! Typed form inputs handed over by the web layer.

use crate::task::Task;
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct DiabetesInput {
    pub pregnancies: f64,
    pub glucose: f64,
    pub blood_pressure: f64,
    pub skin_thickness: f64,
    pub insulin: f64,
    pub bmi: f64,
    pub diabetes_pedigree_function: f64,
    pub age: f64,
}

impl DiabetesInput {
    /// Feature vector in [`Task::Diabetes`] schema order.
    pub fn features(&self) -> [f64; 8] {
        [
            self.pregnancies,
            self.glucose,
            self.blood_pressure,
            self.skin_thickness,
            self.insulin,
            self.bmi,
            self.diabetes_pedigree_function,
            self.age,
        ]
    }

    pub fn from_features(v: [f64; 8]) -> DiabetesInput {
        DiabetesInput {
            pregnancies: v[0],
            glucose: v[1],
            blood_pressure: v[2],
            skin_thickness: v[3],
            insulin: v[4],
            bmi: v[5],
            diabetes_pedigree_function: v[6],
            age: v[7],
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct BloodTestInput {
    pub hemoglobin: f64,
    pub wbc_count: f64,
    pub rbc_count: f64,
    pub platelets: f64,
    pub cholesterol: f64,
}

impl BloodTestInput {
    /// Feature vector in [`Task::BloodTest`] schema order.
    pub fn features(&self) -> [f64; 5] {
        [
            self.hemoglobin,
            self.wbc_count,
            self.rbc_count,
            self.platelets,
            self.cholesterol,
        ]
    }

    pub fn from_features(v: [f64; 5]) -> BloodTestInput {
        BloodTestInput {
            hemoglobin: v[0],
            wbc_count: v[1],
            rbc_count: v[2],
            platelets: v[3],
            cholesterol: v[4],
        }
    }
}

/// Outcome of one diagnosis request, ready to be stored and rendered.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Diagnosis {
    pub task: Task,
    pub positive: bool,
    /// "Diabetic", "Normal", ...
    pub outcome: String,
    pub explanation: String,
}
