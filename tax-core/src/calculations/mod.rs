//! Estimate stages and the orchestrators that sequence them.
//!
//! Each stage is a pure value-in/value-out calculation over a borrowed
//! [`crate::PolicyTable`]; nothing here performs I/O or holds mutable state.

pub mod brackets;
pub mod capital_gains;
pub mod common;
pub mod deduction;
pub mod joint_estimate;
pub mod reduced_estimate;
pub mod surtax_credit;

pub use brackets::OrdinaryTaxSchedule;
pub use capital_gains::{CapitalGainsStacker, GainsBands};
pub use deduction::{DeductionChoice, DeductionSelector};
pub use joint_estimate::{JointEstimator, TaxableSplit};
pub use reduced_estimate::{
    MAX_ADJUSTMENT_MULTIPLIER, PersonalAdjustment, ReducedEstimator, ReducedProfile,
    ReducedProfileError,
};
pub use surtax_credit::{CreditApplication, SurtaxCreditLayer};
