mod estimate_input;
mod estimate_result;
mod policy_table;

pub use estimate_input::{
    EstimateInput, MAX_INPUT_UNITS, ReducedEstimateInput, thousands_to_units,
};
pub use estimate_result::{EstimateResult, ReducedEstimateResult};
pub use policy_table::{OrdinaryBracket, PolicyTable, PolicyTableError};

#[cfg(test)]
pub(crate) use policy_table::test_support;
