//! CSV loader for batches of estimate inputs.
//!
//! ## CSV Format
//!
//! Amounts are in **thousands** of dollars, matching the command-line
//! positional arguments. Headers are matched by name, so column order does
//! not matter. Optional columns may be left out entirely or left empty.
//!
//! | Column          | Required | Notes                                    |
//! |-----------------|----------|------------------------------------------|
//! | `label`         | no       | Free text echoed into the report         |
//! | `ordinary`      | yes      | Wages, interest, short-term gains        |
//! | `gains`         | yes      | Long-term capital gains                  |
//! | `dividends`     | no       | Taxed as ordinary income                 |
//! | `charitable`    | no       | Cash gifts to charity                    |
//! | `salt`          | no       | State and local tax paid                 |
//!
//! Negative amounts are not errors at this layer. They are clamped to zero
//! when the row is converted.
//!
//! ### Example
//!
//! ```csv
//! label,ordinary,gains,dividends,charitable,salt
//! base case,123,123,12,0,0
//! itemizer,100,25,2,30,10
//! ```
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tax_core::{EstimateInput, ReducedEstimateInput};
use tracing::warn;

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct InputRow {
    #[serde(default)]
    pub label: Option<String>,
    pub ordinary: f64,
    pub gains: f64,
    #[serde(default)]
    pub dividends: Option<f64>,
    #[serde(default)]
    pub charitable: Option<f64>,
    #[serde(default)]
    pub salt: Option<f64>,
}

impl InputRow {
    pub fn to_estimate_input(&self) -> EstimateInput {
        EstimateInput::from_thousands(
            self.ordinary,
            self.gains,
            self.dividends.unwrap_or(0.0),
            self.charitable.unwrap_or(0.0),
            self.salt.unwrap_or(0.0),
        )
    }

    /// Drops `dividends` and `salt`; the reduced profile has no slot for them.
    pub fn to_reduced_input(&self) -> ReducedEstimateInput {
        if self.dividends.is_some_and(|d| d != 0.0) || self.salt.is_some_and(|s| s != 0.0) {
            warn!(
                label = self.label.as_deref().unwrap_or(""),
                "dividends and salt columns are ignored by the reduced profile"
            );
        }
        ReducedEstimateInput::from_thousands(
            self.ordinary,
            self.gains,
            self.charitable.unwrap_or(0.0),
        )
    }
}

/// Errors that can occur while loading a batch input file.
#[derive(Debug, thiserror::Error)]
pub enum InputCsvError {
    /// Bad structure, missing required column or type mismatch.
    #[error("CSV parse error on row {row}: {source}")]
    Parse {
        row: usize,
        #[source]
        source: csv::Error,
    },

    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Parse CSV text into input rows, in file order.
///
/// `row` in [`InputCsvError::Parse`] is 1-based; the header is row 0.
pub fn load_from_str(input: &str) -> Result<Vec<InputRow>, InputCsvError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .flexible(false)
        .from_reader(input.as_bytes());

    reader
        .deserialize::<InputRow>()
        .enumerate()
        .map(|(idx, result)| result.map_err(|source| InputCsvError::Parse { row: idx + 1, source }))
        .collect()
}

/// Read a file from disk and delegate to [`load_from_str`].
pub fn load_from_file(path: &Path) -> Result<Vec<InputRow>, InputCsvError> {
    let contents = std::fs::read_to_string(path).map_err(|source| InputCsvError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    load_from_str(&contents)
}
