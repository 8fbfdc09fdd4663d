use crate::error::{Error, Result};
use crate::task::{Task, LABEL_COLUMN};
use csv::StringRecord;
use linfa::dataset::Dataset;
use ndarray::{Array1, Array2, Axis, Ix1};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::fs::File;
use std::path::Path;
use tracing::{debug, info};

/// Labeled feature matrix. Row `i` of `records` is labeled by `labels[i]`,
/// where `true` is the positive class (`outcome == 1`).
#[derive(Debug, Clone, PartialEq)]
pub struct Samples {
    pub records: Array2<f64>,
    pub labels: Array1<bool>,
}

impl Samples {
    pub fn new(records: Array2<f64>, labels: Array1<bool>) -> Result<Samples> {
        if records.nrows() != labels.len() {
            return Err(Error::ShapeMismatch {
                expected: records.nrows(),
                found: labels.len(),
            });
        }
        Ok(Samples { records, labels })
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn n_features(&self) -> usize {
        self.records.ncols()
    }

    /// Number of (negative, positive) samples.
    pub fn class_counts(&self) -> (usize, usize) {
        let positive = self.labels.iter().filter(|l| **l).count();
        (self.len() - positive, positive)
    }

    /// Shuffles row indices with a seeded RNG and holds out the first
    /// `ceil(test_ratio * n)` of them. Returns `(train, test)`.
    pub fn split(&self, test_ratio: f64, seed: u64) -> Result<(Samples, Samples)> {
        let n = self.len();
        let n_test = (test_ratio * n as f64).ceil() as usize;
        if !(test_ratio > 0.0 && test_ratio < 1.0) || n_test == 0 || n_test >= n {
            return Err(Error::TooFewSamples {
                rows: n,
                ratio: test_ratio,
            });
        }

        let mut index: Vec<usize> = (0..n).collect();
        index.shuffle(&mut StdRng::seed_from_u64(seed));
        let (test_idx, train_idx) = index.split_at(n_test);

        let pick = |idx: &[usize]| Samples {
            records: self.records.select(Axis(0), idx),
            labels: self.labels.select(Axis(0), idx),
        };
        Ok((pick(train_idx), pick(test_idx)))
    }

    /// View as a linfa dataset for fitting.
    pub fn to_dataset(&self) -> Dataset<f64, bool, Ix1> {
        Dataset::new(self.records.clone(), self.labels.clone())
    }
}

/// Loads a task's training CSV. The header must list the task's features in
/// schema order followed by the label column.
pub fn load(path: &Path, task: Task) -> Result<Samples> {
    info!("Loading {}", path.display());
    let file = File::open(path).map_err(|why| Error::io(path, why))?;
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(file);

    let headers = reader.headers()?.clone();
    check_header(path, task, &headers)?;

    let width = task.n_features();
    let (mut features, mut labels) = (Vec::new(), Vec::new());
    for (i, record) in reader.records().enumerate() {
        let fields: StringRecord = record?;
        let row = fields.position().map_or(i + 2, |p| p.line() as usize);

        for (column, name) in task.feature_names().iter().enumerate() {
            features.push(parse_value(path, row, name, fields.get(column))?);
        }
        labels.push(parse_label(path, row, fields.get(width))?);
    }

    if labels.is_empty() {
        return Err(Error::EmptyDataset(path.to_path_buf()));
    }
    debug!("Parsed {} rows of {} features", labels.len(), width);

    let records = Array2::from_shape_fn((labels.len(), width), |(i, j)| features[i * width + j]);
    Samples::new(records, Array1::from(labels))
}

fn check_header(path: &Path, task: Task, headers: &StringRecord) -> Result<()> {
    let found: Vec<&str> = headers.iter().collect();
    let mut expected: Vec<&str> = task.feature_names().to_vec();
    expected.push(LABEL_COLUMN);

    if found != expected {
        return Err(Error::Header {
            path: path.to_path_buf(),
            reason: format!(
                "expected columns [{}], found [{}]",
                expected.join(", "),
                found.join(", ")
            ),
        });
    }
    Ok(())
}

fn parse_value(path: &Path, row: usize, column: &str, field: Option<&str>) -> Result<f64> {
    let raw = field.unwrap_or_default();
    match raw.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(Error::Parse {
            path: path.to_path_buf(),
            row,
            column: column.to_string(),
            value: raw.to_string(),
        }),
    }
}

fn parse_label(path: &Path, row: usize, field: Option<&str>) -> Result<bool> {
    match parse_value(path, row, LABEL_COLUMN, field)? {
        v if v == 0.0 => Ok(false),
        v if v == 1.0 => Ok(true),
        _ => Err(Error::Parse {
            path: path.to_path_buf(),
            row,
            column: LABEL_COLUMN.to_string(),
            value: field.unwrap_or_default().to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;
    use std::io::Write;

    const BLOOD_HEADER: &str = "hemoglobin,wbc_count,rbc_count,platelets,cholesterol,outcome";

    fn write_csv(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    fn numbered(n: usize) -> Samples {
        let records = Array2::from_shape_fn((n, 2), |(i, j)| (i * 2 + j) as f64);
        let labels = Array1::from_shape_fn(n, |i| i % 2 == 0);
        Samples::new(records, labels).unwrap()
    }

    #[test]
    fn loads_blood_test_csv() {
        let file = write_csv(&format!(
            "{}\n14.2, 7000, 4.9, 250000, 180, 0\n11.0,12000,3.9,120000,260,1.0\n",
            BLOOD_HEADER
        ));
        let samples = load(file.path(), Task::BloodTest).unwrap();
        assert_eq!(samples.len(), 2);
        assert_eq!(samples.n_features(), 5);
        assert_eq!(samples.records.row(0)[1], 7000.0);
        assert_eq!(samples.labels, array![false, true]);
        assert_eq!(samples.class_counts(), (1, 1));
    }

    #[test]
    fn rejects_wrong_header() {
        let file = write_csv("hemoglobin,wbc_count,outcome\n1,2,0\n");
        match load(file.path(), Task::BloodTest) {
            Err(Error::Header { .. }) => (),
            other => panic!("expected header error, got {:?}", other),
        }
    }

    #[test]
    fn rejects_non_binary_label() {
        let file = write_csv(&format!("{}\n14,7000,4.9,250000,180,2\n", BLOOD_HEADER));
        match load(file.path(), Task::BloodTest) {
            Err(Error::Parse { row, column, .. }) => {
                assert_eq!(row, 2);
                assert_eq!(column, "outcome");
            }
            other => panic!("expected parse error, got {:?}", other),
        }
    }

    #[test]
    fn rejects_non_numeric_feature() {
        let file = write_csv(&format!("{}\n14,high,4.9,250000,180,0\n", BLOOD_HEADER));
        match load(file.path(), Task::BloodTest) {
            Err(Error::Parse { column, value, .. }) => {
                assert_eq!(column, "wbc_count");
                assert_eq!(value, "high");
            }
            other => panic!("expected parse error, got {:?}", other),
        }
    }

    #[test]
    fn header_only_file_is_empty() {
        let file = write_csv(&format!("{}\n", BLOOD_HEADER));
        assert!(matches!(
            load(file.path(), Task::BloodTest),
            Err(Error::EmptyDataset(_))
        ));
    }

    #[test]
    fn missing_file_is_io_error() {
        let result = load(Path::new("does/not/exist.csv"), Task::Diabetes);
        assert!(matches!(result, Err(Error::Io { .. })));
    }

    #[test]
    fn split_sizes_round_test_up() {
        let (train, test) = numbered(11).split(0.2, 42).unwrap();
        assert_eq!(test.len(), 3);
        assert_eq!(train.len(), 8);
    }

    #[test]
    fn split_is_reproducible_and_partitions_rows() {
        let samples = numbered(50);
        let (train_a, test_a) = samples.split(0.2, 7).unwrap();
        let (train_b, test_b) = samples.split(0.2, 7).unwrap();
        assert_eq!(train_a, train_b);
        assert_eq!(test_a, test_b);

        let mut seen: Vec<f64> = train_a
            .records
            .column(0)
            .iter()
            .chain(test_a.records.column(0).iter())
            .copied()
            .collect();
        seen.sort_by(|a, b| a.partial_cmp(b).unwrap());
        let all: Vec<f64> = (0..50).map(|i| (i * 2) as f64).collect();
        assert_eq!(seen, all);
    }

    #[test]
    fn split_depends_on_seed() {
        let samples = numbered(50);
        let (_, test_a) = samples.split(0.2, 1).unwrap();
        let (_, test_b) = samples.split(0.2, 2).unwrap();
        assert_ne!(test_a, test_b);
    }

    #[test]
    fn dataset_view_keeps_one_label_per_row() {
        let samples = numbered(6);
        let dataset = samples.to_dataset();
        assert_eq!(dataset.records(), &samples.records);
        assert_eq!(dataset.targets(), &samples.labels);
    }

    #[test]
    fn split_rejects_degenerate_partitions() {
        assert!(numbered(1).split(0.2, 42).is_err());
        assert!(numbered(10).split(0.0, 42).is_err());
        assert!(numbered(10).split(1.0, 42).is_err());
    }
}
