//! CSV loading
//!
//! Columns are located by header name; extra columns are ignored.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use ndarray::Array2;

use crate::error::{DetectorError, Result};
use crate::logic::features::{FEATURE_COUNT, FEATURE_LAYOUT};
use super::TrainingDataset;

/// Load the training dataset from a CSV file
pub fn load_csv_file(path: &Path) -> Result<TrainingDataset> {
    let file = File::open(path)?;
    let dataset = load_csv_reader(BufReader::new(file))?;

    log::info!("Loaded {} training flows from {}", dataset.len(), path.display());
    Ok(dataset)
}

/// Load the training dataset from any CSV source
pub fn load_csv_reader<R: Read>(source: R) -> Result<TrainingDataset> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(source);

    let headers = reader.headers()?.clone();
    let columns = FEATURE_LAYOUT
        .iter()
        .map(|name| {
            headers
                .iter()
                .position(|h| h == *name)
                .ok_or_else(|| DetectorError::MissingColumn(name.to_string()))
        })
        .collect::<Result<Vec<usize>>>()?;

    let mut values = Vec::new();
    let mut rows = 0usize;

    for result in reader.records() {
        let record = result?;
        rows += 1;

        for (feature, &col) in columns.iter().enumerate() {
            let field = record.get(col).unwrap_or("");
            let value = parse_value(field).ok_or_else(|| DetectorError::InvalidValue {
                column: FEATURE_LAYOUT[feature].to_string(),
                row: rows,
                value: field.to_string(),
            })?;
            values.push(value);
        }
    }

    let matrix = Array2::from_shape_vec((rows, FEATURE_COUNT), values)
        .map_err(|e| DetectorError::InvalidConfig(e.to_string()))?;

    TrainingDataset::from_matrix(matrix)
}

fn parse_value(field: &str) -> Option<f64> {
    field.parse::<f64>().ok().filter(|v| v.is_finite())
}
