//! Matrix input files: JSON `{"rows": [[...], ...]}` or headerless numeric CSV.

use anyhow::{bail, Context, Result};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Deserialize, Serialize)]
pub struct MatrixFile {
    pub rows: Vec<Vec<f64>>,
}

/// Combined-form rows from `path`, dispatched on the file extension.
pub fn read_rows(path: &Path) -> Result<Vec<Vec<f64>>> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("json") => read_json(path),
        Some("csv") => read_csv(path),
        other => bail!("unsupported input extension {other:?} (expected .json or .csv)"),
    }
}

fn read_json(path: &Path) -> Result<Vec<Vec<f64>>> {
    let bytes = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    let file: MatrixFile = serde_json::from_slice(&bytes)
        .with_context(|| format!("parsing {} as {{\"rows\": [[...]]}}", path.display()))?;
    Ok(file.rows)
}

fn read_csv(path: &Path) -> Result<Vec<Vec<f64>>> {
    let df = LazyCsvReader::new(path)
        .with_has_header(false)
        .with_infer_schema_length(Some(100))
        .finish()?
        .collect()
        .with_context(|| format!("reading {}", path.display()))?;
    tracing::debug!(rows = df.height(), cols = df.width(), "input_csv_shape");
    let mut rows = vec![Vec::with_capacity(df.width()); df.height()];
    for (j, s) in df.get_columns().iter().enumerate() {
        let s = s.cast(&DataType::Float64)?;
        for (i, v) in s.f64()?.into_iter().enumerate() {
            let v = v.with_context(|| format!("missing value at row {i}, column {j}"))?;
            rows[i].push(v);
        }
    }
    Ok(rows)
}
