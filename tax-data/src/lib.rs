pub mod bracket_schedule;
pub mod builtin;
pub mod input_csv;
pub mod policy_loader;
pub mod report;

pub use bracket_schedule::{BracketScheduleError, BracketScheduleLoader, TaxBracketRecord};
pub use builtin::{available_years, builtin_policy};
pub use input_csv::{InputCsvError, InputRow};
pub use policy_loader::{PolicyLoaderError, PolicyTableLoader};
pub use report::EstimateReport;
