//! Diabetes-risk and blood-test classifiers for a hospital back office.
//!
//! [`trainer`] fits a [`model::StandardScaler`] and a [`model::SvmClassifier`]
//! per [`task::Task`] and persists them; [`service::DiagnosisService`] loads
//! them once and answers diagnosis requests from typed form records.

pub mod config;
pub mod dataset;
pub mod error;
pub mod explain;
pub mod logging;
pub mod model;
pub mod records;
pub mod service;
pub mod task;
pub mod trainer;

pub use error::{Error, Result};
