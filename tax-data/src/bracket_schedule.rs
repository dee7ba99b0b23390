use std::io::Read;

use rust_decimal::Decimal;
use serde::Deserialize;
use tax_core::OrdinaryBracket;
use thiserror::Error;

/// IRS schedule used by married couples filing jointly.
pub const JOINT_SCHEDULE: &str = "Y-1";

/// Errors that can occur when loading an ordinary bracket schedule.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BracketScheduleError {
    #[error("CSV parse error: {0}")]
    CsvParse(String),

    #[error("Invalid schedule: {0}")]
    InvalidSchedule(String),

    #[error("Schedule {0} is not a joint-filer schedule (expected Y-1)")]
    UnsupportedSchedule(String),

    #[error("No {schedule} rows for tax year {tax_year}")]
    NoRows { tax_year: i32, schedule: String },

    #[error("Row starting at {found} leaves a gap or overlap; expected it to start at {expected}")]
    Discontinuous { expected: Decimal, found: Decimal },

    #[error("Row starting at {min_income} has no upper bound but is not the last row")]
    UnboundedRowNotLast { min_income: Decimal },

    #[error("Last row starting at {0} must have an empty max_income")]
    MissingUnboundedRow(Decimal),

    #[error(
        "Row starting at {min_income} has base_tax {found}; cumulative tax below it is {expected}"
    )]
    BaseTaxMismatch {
        min_income: Decimal,
        expected: Decimal,
        found: Decimal,
    },
}

impl From<csv::Error> for BracketScheduleError {
    fn from(err: csv::Error) -> Self {
        BracketScheduleError::CsvParse(err.to_string())
    }
}

/// Checks an IRS schedule code.
///
/// - Schedule X → Single
/// - Schedule Y-1 → Married Filing Jointly
/// - Schedule Y-2 → Married Filing Separately
/// - Schedule Z → Head of Household
///
/// Only Y-1 is usable here; the others are recognised so the error can say
/// why they were rejected.
fn ensure_joint_schedule(schedule: &str) -> Result<(), BracketScheduleError> {
    match schedule {
        JOINT_SCHEDULE => Ok(()),
        "X" | "Y-2" | "Z" => Err(BracketScheduleError::UnsupportedSchedule(
            schedule.to_string(),
        )),
        _ => Err(BracketScheduleError::InvalidSchedule(schedule.to_string())),
    }
}

/// A single record from a tax brackets CSV file.
///
/// The CSV format uses IRS schedule designations:
/// - `tax_year`: The tax year (e.g., 2025)
/// - `schedule`: The IRS schedule code (X, Y-1, Y-2, Z)
/// - `min_income`: The minimum income for this bracket
/// - `max_income`: The maximum income for this bracket (empty for unlimited)
/// - `base_tax`: The cumulative tax on income below `min_income`
/// - `rate`: The marginal tax rate as a decimal (e.g., 0.10 for 10%)
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct TaxBracketRecord {
    pub tax_year: i32,
    pub schedule: String,
    pub min_income: Decimal,
    #[serde(deserialize_with = "deserialize_optional_decimal")]
    pub max_income: Option<Decimal>,
    pub base_tax: Decimal,
    pub rate: Decimal,
}

fn deserialize_optional_decimal<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    match s {
        Some(s) if s.trim().is_empty() => Ok(None),
        Some(s) => s
            .trim()
            .parse::<Decimal>()
            .map(Some)
            .map_err(serde::de::Error::custom),
        None => Ok(None),
    }
}

/// Loader for ordinary bracket schedules stored as IRS-style CSV.
///
/// The CSV stores `min_income`/`base_tax` per row; the engine only needs
/// upper bounds and rates. The conversion re-derives every `base_tax` from
/// the rows below it and rejects the file if any disagree, so a typo in the
/// CSV cannot silently shift the schedule.
pub struct BracketScheduleLoader;

impl BracketScheduleLoader {
    /// Parse tax bracket records from a CSV reader.
    pub fn parse<R: Read>(reader: R) -> Result<Vec<TaxBracketRecord>, BracketScheduleError> {
        let mut csv_reader = csv::Reader::from_reader(reader);
        let mut records = Vec::new();

        for result in csv_reader.deserialize() {
            let record: TaxBracketRecord = result?;
            records.push(record);
        }

        Ok(records)
    }

    /// Build the joint-filer schedule for `tax_year` from parsed records.
    ///
    /// Rows for other years and other schedules are ignored.
    pub fn joint_brackets(
        records: &[TaxBracketRecord],
        tax_year: i32,
    ) -> Result<Vec<OrdinaryBracket>, BracketScheduleError> {
        Self::brackets_for(records, tax_year, JOINT_SCHEDULE)
    }

    /// Build the schedule for `(tax_year, schedule)` from parsed records.
    pub fn brackets_for(
        records: &[TaxBracketRecord],
        tax_year: i32,
        schedule: &str,
    ) -> Result<Vec<OrdinaryBracket>, BracketScheduleError> {
        ensure_joint_schedule(schedule)?;

        let mut rows: Vec<&TaxBracketRecord> = records
            .iter()
            .filter(|r| r.tax_year == tax_year && r.schedule == schedule)
            .collect();
        rows.sort_by(|a, b| a.min_income.cmp(&b.min_income));

        let Some(last) = rows.last() else {
            return Err(BracketScheduleError::NoRows {
                tax_year,
                schedule: schedule.to_string(),
            });
        };
        if last.max_income.is_some() {
            return Err(BracketScheduleError::MissingUnboundedRow(last.min_income));
        }

        let last_index = rows.len() - 1;
        let mut expected_min = Decimal::ZERO;
        let mut cumulative_tax = Decimal::ZERO;
        let mut brackets = Vec::with_capacity(rows.len());

        for (index, row) in rows.iter().enumerate() {
            if row.min_income != expected_min {
                return Err(BracketScheduleError::Discontinuous {
                    expected: expected_min,
                    found: row.min_income,
                });
            }
            if row.base_tax != cumulative_tax {
                return Err(BracketScheduleError::BaseTaxMismatch {
                    min_income: row.min_income,
                    expected: cumulative_tax,
                    found: row.base_tax,
                });
            }

            match row.max_income {
                Some(max_income) => {
                    cumulative_tax += (max_income - row.min_income) * row.rate;
                    expected_min = max_income;
                    brackets.push(OrdinaryBracket::bounded(max_income, row.rate));
                }
                None if index != last_index => {
                    return Err(BracketScheduleError::UnboundedRowNotLast {
                        min_income: row.min_income,
                    });
                }
                None => brackets.push(OrdinaryBracket::unbounded(row.rate)),
            }
        }

        Ok(brackets)
    }
}
