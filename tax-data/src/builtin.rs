//! Policy tables compiled into the binary.

use tax_core::PolicyTable;

use crate::policy_loader::{PolicyLoaderError, PolicyTableLoader};

const POLICY_2024_MFJ: &str = include_str!("../data/policy_2024_mfj.toml");
const POLICY_2025_MFJ: &str = include_str!("../data/policy_2025_mfj.toml");

/// Bundled IRS-style bracket schedule covering the built-in years.
pub const BUILTIN_BRACKETS_CSV: &str = include_str!("../data/tax_brackets.csv");

const BUILTIN: &[(i32, &str)] = &[(2024, POLICY_2024_MFJ), (2025, POLICY_2025_MFJ)];

/// Tax years with a bundled policy table, oldest first.
pub fn available_years() -> Vec<i32> {
    BUILTIN.iter().map(|(year, _)| *year).collect()
}

/// Parse and validate the bundled policy table for `tax_year`.
pub fn builtin_policy(tax_year: i32) -> Result<PolicyTable, PolicyLoaderError> {
    let (_, contents) = BUILTIN
        .iter()
        .find(|(year, _)| *year == tax_year)
        .ok_or(PolicyLoaderError::UnknownYear(tax_year))?;
    PolicyTableLoader::parse_toml(contents)
}
