use super::loader::load_csv_reader;
use super::TrainingDataset;
use crate::error::DetectorError;
use ndarray::array;
use std::fs;
use tempfile::tempdir;

const SAMPLE: &str = "\
Timestamp,BytesSent,BytesReceived,PacketsSent,PacketsReceived,Duration,Protocol
2024-01-01T00:00:00,1500,2300,40,38,12,TCP
2024-01-01T00:00:05,800,950,22,20,4,UDP
2024-01-01T00:00:09,4200,6100,95,90,30,TCP
";

#[test]
fn test_load_selects_feature_columns() {
    let ds = load_csv_reader(SAMPLE.as_bytes()).unwrap();

    assert_eq!(ds.len(), 3);
    assert_eq!(ds.features().row(0).to_vec(), vec![1500.0, 2300.0, 40.0, 12.0]);
    assert_eq!(ds.features().row(2).to_vec(), vec![4200.0, 6100.0, 95.0, 30.0]);
}

#[test]
fn test_column_order_does_not_matter() {
    let csv = "Duration,PacketsSent,BytesReceived,BytesSent\n10,100,1200,1000\n";
    let ds = load_csv_reader(csv.as_bytes()).unwrap();
    assert_eq!(ds.features().row(0).to_vec(), vec![1000.0, 1200.0, 100.0, 10.0]);
}

#[test]
fn test_missing_column() {
    let csv = "BytesSent,BytesReceived,PacketsSent\n1,2,3\n";
    let err = load_csv_reader(csv.as_bytes()).unwrap_err();
    assert!(matches!(err, DetectorError::MissingColumn(ref c) if c == "Duration"));
}

#[test]
fn test_invalid_value_reports_row() {
    let csv = "BytesSent,BytesReceived,PacketsSent,Duration\n1,2,3,4\n5,abc,7,8\n";
    let err = load_csv_reader(csv.as_bytes()).unwrap_err();
    match err {
        DetectorError::InvalidValue { column, row, value } => {
            assert_eq!(column, "BytesReceived");
            assert_eq!(row, 2);
            assert_eq!(value, "abc");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_header_only_is_empty() {
    let csv = "BytesSent,BytesReceived,PacketsSent,Duration\n";
    let ds = load_csv_reader(csv.as_bytes()).unwrap();
    assert!(ds.is_empty());
}

#[test]
fn test_from_csv_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("traffic.csv");
    fs::write(&path, SAMPLE).unwrap();

    let ds = TrainingDataset::from_csv(&path).unwrap();
    assert_eq!(ds.len(), 3);
}

#[test]
fn test_missing_file_is_io_error() {
    let dir = tempdir().unwrap();
    let err = TrainingDataset::from_csv(dir.path().join("nope.csv")).unwrap_err();
    assert!(matches!(err, DetectorError::Io(_)));
}

#[test]
fn test_from_matrix_rejects_wrong_width() {
    let err = TrainingDataset::from_matrix(array![[1.0, 2.0, 3.0]]).unwrap_err();
    assert!(matches!(err, DetectorError::InvalidConfig(_)));
}

#[test]
fn test_from_matrix_rejects_nan() {
    let err = TrainingDataset::from_matrix(array![[1.0, f64::NAN, 3.0, 4.0]]).unwrap_err();
    assert!(matches!(err, DetectorError::InvalidValue { row: 1, .. }));
}

#[test]
fn test_shipped_dataset_end_to_end() {
    use crate::logic::features::FlowRecord;
    use crate::logic::model::{DetectionContext, ForestConfig, ThresholdConfig};

    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/../data/synthetic_network_traffic.csv");
    let ctx = DetectionContext::from_csv(path, ForestConfig::default(), ThresholdConfig::default())
        .unwrap();

    assert_eq!(ctx.summary().dataset_rows, 1000);
    assert!(!ctx.classify(&FlowRecord::normal_example()).unwrap().is_anomaly);
    assert!(ctx.classify(&FlowRecord::anomalous_example()).unwrap().is_anomaly);
}
