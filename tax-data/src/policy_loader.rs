use std::fs;
use std::path::{Path, PathBuf};

use tax_core::{PolicyTable, PolicyTableError};
use thiserror::Error;
use tracing::info;

use crate::bracket_schedule::{BracketScheduleError, BracketScheduleLoader};

#[derive(Debug, Error)]
pub enum PolicyLoaderError {
    #[error("Failed to parse policy TOML: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Policy table for tax year {tax_year} is invalid: {source}")]
    Invalid {
        tax_year: i32,
        #[source]
        source: PolicyTableError,
    },

    #[error("No built-in policy table for tax year {0}")]
    UnknownYear(i32),

    #[error("Bracket schedule error: {0}")]
    Schedule(#[from] BracketScheduleError),
}

/// Loads [`PolicyTable`]s from TOML and validates them before handing them out.
pub struct PolicyTableLoader;

impl PolicyTableLoader {
    /// Parse and validate a policy table from TOML text.
    pub fn parse_toml(contents: &str) -> Result<PolicyTable, PolicyLoaderError> {
        let table: PolicyTable = toml::from_str(contents)?;
        Self::checked(table)
    }

    /// Read, parse and validate a policy table file.
    pub fn from_file(path: &Path) -> Result<PolicyTable, PolicyLoaderError> {
        let contents = fs::read_to_string(path).map_err(|source| PolicyLoaderError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let table = Self::parse_toml(&contents)?;
        info!(
            tax_year = table.tax_year,
            path = %path.display(),
            "Loaded policy table"
        );
        Ok(table)
    }

    /// Replace the ordinary brackets of `base` with the joint schedule for
    /// `base.tax_year` read from an IRS-style bracket CSV.
    pub fn with_bracket_csv(
        base: &PolicyTable,
        path: &Path,
    ) -> Result<PolicyTable, PolicyLoaderError> {
        let file = fs::File::open(path).map_err(|source| PolicyLoaderError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let records = BracketScheduleLoader::parse(file)?;
        let brackets = BracketScheduleLoader::joint_brackets(&records, base.tax_year)?;
        info!(
            tax_year = base.tax_year,
            brackets = brackets.len(),
            path = %path.display(),
            "Loaded ordinary brackets from CSV"
        );
        Self::checked(base.with_ordinary_brackets(brackets))
    }

    fn checked(table: PolicyTable) -> Result<PolicyTable, PolicyLoaderError> {
        table
            .validate()
            .map_err(|source| PolicyLoaderError::Invalid {
                tax_year: table.tax_year,
                source,
            })?;
        Ok(table)
    }
}
