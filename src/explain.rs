//! Patient-facing wording for a prediction.

use crate::records::{BloodTestInput, DiabetesInput};

const GLUCOSE_WATCH: f64 = 125.0;
const BMI_WATCH: f64 = 30.0;
const CHOLESTEROL_WATCH: f64 = 200.0;

pub fn diabetes(positive: bool, input: &DiabetesInput) -> String {
    let (first, second) = if positive {
        (
            "Your test results suggest elevated diabetes risk factors that need medical attention.",
            "Please schedule a consultation with an endocrinologist for proper diagnosis and treatment plan.",
        )
    } else if input.glucose > GLUCOSE_WATCH || input.bmi > BMI_WATCH {
        (
            "Your glucose levels are within acceptable range, but some parameters need monitoring.",
            "Maintain a balanced diet, exercise regularly, and get checkups every 6 months.",
        )
    } else {
        (
            "Your test results show healthy glucose metabolism and low diabetes risk.",
            "Continue your current lifestyle with regular exercise and healthy eating habits.",
        )
    };
    format!("{} {}", first, second)
}

pub fn blood_test(positive: bool, input: &BloodTestInput) -> String {
    let (first, second) = if positive {
        (
            "Some blood parameters are outside the normal range and require medical review.",
            "Consult your doctor to discuss these results and potential treatment or lifestyle changes.",
        )
    } else if input.cholesterol > CHOLESTEROL_WATCH {
        (
            "Most blood values are normal, but cholesterol levels should be monitored closely.",
            "Focus on heart-healthy diet and regular physical activity to maintain good health.",
        )
    } else {
        (
            "All your blood test parameters are within healthy limits, indicating good overall health.",
            "Keep up with regular health checkups every 6-12 months to maintain wellness.",
        )
    };
    format!("{} {}", first, second)
}
