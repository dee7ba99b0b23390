//! Reduced three-input profile: ordinary income, long-term gains, charitable.
//!
//! This profile has no dividends, no SALT input, no surtax and no child
//! credit. A fixed SALT-equivalent amount stands in for the capped SALT
//! allowance when itemizing.
//!
//! An optional [`PersonalAdjustment`] can be reported alongside the total.
//! It is a personal correction, not a tax rule: it has no lower bound and
//! can go negative for low incomes, so it is never applied unless requested
//! and never replaces `total_tax`.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use tax_core::{
//!     OrdinaryBracket, PolicyTable, ReducedEstimateInput, ReducedEstimator, ReducedProfile,
//! };
//!
//! # let policy = PolicyTable {
//! #     tax_year: 2024,
//! #     standard_deduction: dec!(29200),
//! #     ordinary_brackets: vec![
//! #         OrdinaryBracket::bounded(dec!(23200), dec!(0.10)),
//! #         OrdinaryBracket::bounded(dec!(94300), dec!(0.12)),
//! #         OrdinaryBracket::unbounded(dec!(0.22)),
//! #     ],
//! #     capital_gains_zero_top: dec!(94050),
//! #     capital_gains_fifteen_top: dec!(583750),
//! #     salt_base_cap: dec!(10000),
//! #     salt_floor_cap: dec!(10000),
//! #     salt_phaseout_start_magi: dec!(0),
//! #     salt_phaseout_rate: dec!(0),
//! #     ctc_per_child: dec!(2000),
//! #     ctc_phaseout_start_magi: dec!(400000),
//! #     ctc_phaseout_step_size: dec!(1000),
//! #     ctc_phaseout_amount_per_step: dec!(50),
//! #     niit_threshold_magi: dec!(250000),
//! #     niit_rate: dec!(0.038),
//! #     charitable_cash_agi_cap_fraction: dec!(0.60),
//! #     qualifying_children_under_17: 3,
//! # };
//! let profile = ReducedProfile::new(dec!(10000));
//! let estimator = ReducedEstimator::new(&policy, profile).unwrap();
//!
//! let result = estimator.estimate(&ReducedEstimateInput::from_thousands(123.0, 4.0, 56.0));
//!
//! assert_eq!(result.estimate.deduction_used, dec!(66000));
//! assert_eq!(result.estimate.total_tax, dec!(6376));
//! assert_eq!(result.adjusted_total_tax, None);
//! ```

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::calculations::brackets::OrdinaryTaxSchedule;
use crate::calculations::capital_gains::CapitalGainsStacker;
use crate::calculations::common::round_whole_units;
use crate::calculations::deduction::DeductionSelector;
use crate::calculations::joint_estimate::TaxableSplit;
use crate::{
    EstimateResult, MAX_INPUT_UNITS, PolicyTable, PolicyTableError, ReducedEstimateInput,
    ReducedEstimateResult,
};

/// Largest accepted [`PersonalAdjustment::multiplier`].
pub const MAX_ADJUSTMENT_MULTIPLIER: Decimal = dec!(10);

/// Faults in the policy table or the [`ReducedProfile`] handed to
/// [`ReducedEstimator::new`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ReducedProfileError {
    #[error("policy table: {0}")]
    Policy(#[from] PolicyTableError),

    #[error("salt_deduction: amount must not be negative, got {0}")]
    NegativeSaltDeduction(Decimal),

    /// The SALT-equivalent amount is above [`MAX_INPUT_UNITS`].
    #[error("salt_deduction: amount exceeds the input ceiling, got {0}")]
    SaltDeductionTooLarge(Decimal),

    #[error("personal_adjustment: multiplier must be between 0 and 10, got {0}")]
    AdjustmentMultiplierOutOfRange(Decimal),

    #[error("personal_adjustment: offset magnitude exceeds the input ceiling, got {0}")]
    AdjustmentOffsetOutOfRange(Decimal),
}

/// Opt-in `multiplier × total − offset` correction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonalAdjustment {
    pub multiplier: Decimal,
    pub offset: Decimal,
}

impl Default for PersonalAdjustment {
    fn default() -> Self {
        Self {
            multiplier: dec!(0.95),
            offset: dec!(5000),
        }
    }
}

impl PersonalAdjustment {
    /// Unbounded below.
    pub fn apply(
        &self,
        total_tax: Decimal,
    ) -> Decimal {
        self.multiplier * total_tax - self.offset
    }
}

/// Configuration distinguishing the reduced profile from the full one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReducedProfile {
    /// SALT-equivalent amount added to capped charitable gifts when itemizing.
    pub salt_deduction: Decimal,

    #[serde(default)]
    pub personal_adjustment: Option<PersonalAdjustment>,
}

impl ReducedProfile {
    pub fn new(salt_deduction: Decimal) -> Self {
        Self {
            salt_deduction,
            personal_adjustment: None,
        }
    }

    pub fn with_personal_adjustment(
        mut self,
        adjustment: PersonalAdjustment,
    ) -> Self {
        self.personal_adjustment = Some(adjustment);
        self
    }

    /// Checks the profile amounts against the input ceiling.
    pub fn validate(&self) -> Result<(), ReducedProfileError> {
        if self.salt_deduction < Decimal::ZERO {
            return Err(ReducedProfileError::NegativeSaltDeduction(self.salt_deduction));
        }
        if self.salt_deduction > MAX_INPUT_UNITS {
            return Err(ReducedProfileError::SaltDeductionTooLarge(self.salt_deduction));
        }
        if let Some(adjustment) = self.personal_adjustment {
            if adjustment.multiplier < Decimal::ZERO
                || adjustment.multiplier > MAX_ADJUSTMENT_MULTIPLIER
            {
                return Err(ReducedProfileError::AdjustmentMultiplierOutOfRange(
                    adjustment.multiplier,
                ));
            }
            if adjustment.offset.abs() > MAX_INPUT_UNITS {
                return Err(ReducedProfileError::AdjustmentOffsetOutOfRange(adjustment.offset));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct ReducedEstimator<'a> {
    policy: &'a PolicyTable,
    profile: ReducedProfile,
}

impl<'a> ReducedEstimator<'a> {
    /// # Errors
    ///
    /// Returns [`ReducedProfileError`] if the table is malformed or a
    /// profile amount is out of range.
    pub fn new(
        policy: &'a PolicyTable,
        profile: ReducedProfile,
    ) -> Result<Self, ReducedProfileError> {
        policy.validate()?;
        profile.validate()?;
        Ok(Self { policy, profile })
    }

    pub fn profile(&self) -> &ReducedProfile {
        &self.profile
    }

    pub fn estimate(
        &self,
        input: &ReducedEstimateInput,
    ) -> ReducedEstimateResult {
        let input = input.normalized();
        let agi = input.adjusted_gross_income();

        let deduction = DeductionSelector::new(self.policy).select_with_salt_allowance(
            agi,
            input.charitable_cash_given,
            self.profile.salt_deduction,
        );

        let taxable = TaxableSplit::new(
            input.ordinary_income,
            input.long_term_gains,
            deduction.deduction_used,
        );

        let schedule = OrdinaryTaxSchedule::new(&self.policy.ordinary_brackets);
        let ordinary_tax = schedule.tax(taxable.ordinary);
        let gains_tax = CapitalGainsStacker::new(
            self.policy.capital_gains_zero_top,
            self.policy.capital_gains_fifteen_top,
        )
        .tax(taxable.ordinary, taxable.long_term_gains);
        let total_tax = ordinary_tax + gains_tax;

        let adjusted_total_tax = self
            .profile
            .personal_adjustment
            .map(|adjustment| adjustment.apply(total_tax));

        debug!(
            tax_year = self.policy.tax_year,
            agi = %agi,
            deduction = %deduction.deduction_used,
            itemized = deduction.itemized_was_used,
            total_tax = %total_tax,
            adjusted = ?adjusted_total_tax,
            "reduced estimate complete"
        );

        ReducedEstimateResult {
            estimate: EstimateResult {
                adjusted_gross_income: round_whole_units(agi),
                deduction_used: round_whole_units(deduction.deduction_used),
                itemized_was_used: deduction.itemized_was_used,
                taxable_ordinary: round_whole_units(taxable.ordinary),
                taxable_long_term_gains: round_whole_units(taxable.long_term_gains),
                marginal_ordinary_rate: schedule.marginal_rate(taxable.ordinary),
                ordinary_tax: round_whole_units(ordinary_tax),
                long_term_gains_tax: round_whole_units(gains_tax),
                net_investment_income_tax: Decimal::ZERO,
                child_credit_used: Decimal::ZERO,
                total_tax: round_whole_units(total_tax),
            },
            adjusted_total_tax: adjusted_total_tax.map(round_whole_units),
        }
    }
}
