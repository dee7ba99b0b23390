//! Full married-filing-jointly estimate.
//!
//! The estimate is a single left-to-right pass over five stages:
//!
//! | Stage | Produces |
//! |-------|----------|
//! | Input normalizer | clamped amounts, AGI, MAGI |
//! | Deduction selector | deduction used, itemized flag |
//! | Bracket tax | tax on taxable ordinary income |
//! | Capital-gains stacker | tax on taxable long-term gains |
//! | Surtax and credit layer | NIIT, child credit used, total tax |
//!
//! The deduction is taken from ordinary income first. Any part of it left
//! over reduces long-term gains.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use tax_core::{EstimateInput, JointEstimator, OrdinaryBracket, PolicyTable};
//!
//! let policy = PolicyTable {
//!     tax_year: 2025,
//!     standard_deduction: dec!(31500),
//!     ordinary_brackets: vec![
//!         OrdinaryBracket::bounded(dec!(23850), dec!(0.10)),
//!         OrdinaryBracket::bounded(dec!(96950), dec!(0.12)),
//!         OrdinaryBracket::bounded(dec!(206700), dec!(0.22)),
//!         OrdinaryBracket::bounded(dec!(394600), dec!(0.24)),
//!         OrdinaryBracket::bounded(dec!(501050), dec!(0.32)),
//!         OrdinaryBracket::bounded(dec!(751600), dec!(0.35)),
//!         OrdinaryBracket::unbounded(dec!(0.37)),
//!     ],
//!     capital_gains_zero_top: dec!(96700),
//!     capital_gains_fifteen_top: dec!(600050),
//!     salt_base_cap: dec!(40000),
//!     salt_floor_cap: dec!(10000),
//!     salt_phaseout_start_magi: dec!(500000),
//!     salt_phaseout_rate: dec!(0.30),
//!     ctc_per_child: dec!(2200),
//!     ctc_phaseout_start_magi: dec!(400000),
//!     ctc_phaseout_step_size: dec!(1000),
//!     ctc_phaseout_amount_per_step: dec!(50),
//!     niit_threshold_magi: dec!(250000),
//!     niit_rate: dec!(0.038),
//!     charitable_cash_agi_cap_fraction: dec!(0.60),
//!     qualifying_children_under_17: 3,
//! };
//!
//! let estimator = JointEstimator::new(&policy).unwrap();
//! let input = EstimateInput::from_thousands(123.0, 123.0, 12.0, 12.0, 12.0);
//! let result = estimator.estimate(&input);
//!
//! assert_eq!(result.adjusted_gross_income, dec!(258000));
//! assert_eq!(result.deduction_used, dec!(31500));
//! assert_eq!(result.total_tax, dec!(24752));
//! ```

use rust_decimal::Decimal;
use tracing::debug;

use crate::calculations::brackets::OrdinaryTaxSchedule;
use crate::calculations::capital_gains::CapitalGainsStacker;
use crate::calculations::common::{clamp_zero, round_whole_units};
use crate::calculations::deduction::DeductionSelector;
use crate::calculations::surtax_credit::SurtaxCreditLayer;
use crate::{EstimateInput, EstimateResult, PolicyTable, PolicyTableError};

/// Taxable ordinary income and taxable gains after the deduction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaxableSplit {
    pub ordinary: Decimal,
    pub long_term_gains: Decimal,
}

impl TaxableSplit {
    /// Applies `deduction` to ordinary income first, then to gains.
    pub fn new(
        ordinary_part: Decimal,
        long_term_gains: Decimal,
        deduction: Decimal,
    ) -> Self {
        let unused_deduction = clamp_zero(deduction - ordinary_part);
        Self {
            ordinary: clamp_zero(ordinary_part - deduction),
            long_term_gains: clamp_zero(long_term_gains - unused_deduction),
        }
    }
}

/// Estimator for the full five-input joint profile.
///
/// Holds a validated policy table; [`JointEstimator::estimate`] is total.
#[derive(Debug, Clone, Copy)]
pub struct JointEstimator<'a> {
    policy: &'a PolicyTable,
}

impl<'a> JointEstimator<'a> {
    /// Validates `policy` and builds an estimator over it.
    ///
    /// # Errors
    ///
    /// Returns [`PolicyTableError`] if the table is malformed.
    pub fn new(policy: &'a PolicyTable) -> Result<Self, PolicyTableError> {
        policy.validate()?;
        Ok(Self { policy })
    }

    pub fn policy(&self) -> &'a PolicyTable {
        self.policy
    }

    /// Runs every stage and returns the rounded result record.
    pub fn estimate(
        &self,
        input: &EstimateInput,
    ) -> EstimateResult {
        let input = input.normalized();
        let agi = input.adjusted_gross_income();
        let magi = input.modified_agi();

        let deduction = DeductionSelector::new(self.policy).select(
            agi,
            magi,
            input.charitable_cash_given,
            input.salt_paid,
        );

        let taxable = TaxableSplit::new(
            input.ordinary_part(),
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

        let layer = SurtaxCreditLayer::new(self.policy);
        let niit = layer.net_investment_income_tax(input.dividends, input.long_term_gains, magi);
        let credit = layer.child_credit(magi);
        let applied = layer.apply_credit(ordinary_tax + gains_tax + niit, credit);

        debug!(
            tax_year = self.policy.tax_year,
            agi = %agi,
            deduction = %deduction.deduction_used,
            itemized = deduction.itemized_was_used,
            ordinary_tax = %ordinary_tax,
            gains_tax = %gains_tax,
            niit = %niit,
            credit_used = %applied.credit_used,
            total_tax = %applied.total_tax,
            "joint estimate complete"
        );

        EstimateResult {
            adjusted_gross_income: round_whole_units(agi),
            deduction_used: round_whole_units(deduction.deduction_used),
            itemized_was_used: deduction.itemized_was_used,
            taxable_ordinary: round_whole_units(taxable.ordinary),
            taxable_long_term_gains: round_whole_units(taxable.long_term_gains),
            marginal_ordinary_rate: schedule.marginal_rate(taxable.ordinary),
            ordinary_tax: round_whole_units(ordinary_tax),
            long_term_gains_tax: round_whole_units(gains_tax),
            net_investment_income_tax: round_whole_units(niit),
            child_credit_used: round_whole_units(applied.credit_used),
            total_tax: round_whole_units(applied.total_tax),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::OrdinaryBracket;
    use crate::models::test_support::policy_2025;

    fn scenario_a() -> EstimateInput {
        EstimateInput::from_thousands(123.0, 123.0, 12.0, 12.0, 12.0)
    }

    // =========================================================================
    // TaxableSplit tests
    // =========================================================================

    #[test]
    fn taxable_split_deducts_from_ordinary_first() {
        let split = TaxableSplit::new(dec!(135000), dec!(123000), dec!(31500));

        assert_eq!(split.ordinary, dec!(103500));
        assert_eq!(split.long_term_gains, dec!(123000));
    }

    #[test]
    fn taxable_split_spills_unused_deduction_onto_gains() {
        let split = TaxableSplit::new(dec!(20000), dec!(50000), dec!(31500));

        assert_eq!(split.ordinary, dec!(0));
        assert_eq!(split.long_term_gains, dec!(38500));
    }

    #[test]
    fn taxable_split_never_negative() {
        let split = TaxableSplit::new(dec!(1000), dec!(2000), dec!(31500));

        assert_eq!(split.ordinary, dec!(0));
        assert_eq!(split.long_term_gains, dec!(0));
    }

    // =========================================================================
    // construction tests
    // =========================================================================

    #[test]
    fn new_rejects_malformed_policy() {
        let policy = policy_2025().with_ordinary_brackets(vec![OrdinaryBracket::bounded(
            dec!(10000),
            dec!(0.10),
        )]);

        assert_eq!(
            JointEstimator::new(&policy).err(),
            Some(PolicyTableError::FinalBracketBounded(dec!(10000)))
        );
    }

    // =========================================================================
    // estimate tests
    // =========================================================================

    #[test]
    fn estimate_scenario_a() {
        let policy = policy_2025();
        let estimator = JointEstimator::new(&policy).unwrap();

        let result = estimator.estimate(&scenario_a());

        assert_eq!(
            result,
            EstimateResult {
                adjusted_gross_income: dec!(258000),
                deduction_used: dec!(31500),
                itemized_was_used: false,
                taxable_ordinary: dec!(103500),
                taxable_long_term_gains: dec!(123000),
                marginal_ordinary_rate: dec!(0.22),
                ordinary_tax: dec!(12598),
                long_term_gains_tax: dec!(18450),
                net_investment_income_tax: dec!(304),
                child_credit_used: dec!(6600),
                total_tax: dec!(24752),
            }
        );
    }

    #[test]
    fn estimate_zero_input() {
        let policy = policy_2025();
        let estimator = JointEstimator::new(&policy).unwrap();

        let result = estimator.estimate(&EstimateInput::default());

        assert_eq!(result.adjusted_gross_income, dec!(0));
        assert_eq!(result.deduction_used, policy.standard_deduction);
        assert!(!result.itemized_was_used);
        assert_eq!(result.ordinary_tax, dec!(0));
        assert_eq!(result.long_term_gains_tax, dec!(0));
        assert_eq!(result.net_investment_income_tax, dec!(0));
        assert_eq!(result.child_credit_used, dec!(0));
        assert_eq!(result.total_tax, dec!(0));
    }

    #[test]
    fn estimate_normalizes_negative_inputs() {
        let policy = policy_2025();
        let estimator = JointEstimator::new(&policy).unwrap();
        let mut input = scenario_a();
        input.salt_paid = dec!(-50000);

        let result = estimator.estimate(&input);

        assert_eq!(result.total_tax, dec!(24752));
    }

    #[test]
    fn estimate_itemizes_with_large_gifts_and_salt() {
        let policy = policy_2025();
        let estimator = JointEstimator::new(&policy).unwrap();
        let input = EstimateInput::from_thousands(300.0, 0.0, 0.0, 20.0, 35.0);

        let result = estimator.estimate(&input);

        assert_eq!(result.deduction_used, dec!(55000));
        assert!(result.itemized_was_used);
        assert_eq!(result.taxable_ordinary, dec!(245000));
    }

    #[test]
    fn estimate_credit_limited_by_tax() {
        let policy = policy_2025();
        let estimator = JointEstimator::new(&policy).unwrap();
        // Taxable 28500: 2385 + 0.12 * 4650 = 2943
        let input = EstimateInput::from_thousands(60.0, 0.0, 0.0, 0.0, 0.0);

        let result = estimator.estimate(&input);

        assert_eq!(result.ordinary_tax, dec!(2943));
        assert_eq!(result.child_credit_used, dec!(2943));
        assert_eq!(result.total_tax, dec!(0));
    }

    #[test]
    fn estimate_rounds_only_at_output() {
        let policy = policy_2025();
        let estimator = JointEstimator::new(&policy).unwrap();
        // Taxable ordinary 11.25 -> tax 1.125 rounds to 1; NIIT and gains are zero.
        let input = EstimateInput {
            ordinary_income: dec!(31511.25),
            ..EstimateInput::default()
        };

        let result = estimator.estimate(&input);

        assert_eq!(result.taxable_ordinary, dec!(11));
        assert_eq!(result.ordinary_tax, dec!(1));
        assert_eq!(result.child_credit_used, dec!(1));
        assert_eq!(result.total_tax, dec!(0));
    }

    #[test]
    fn estimate_is_referentially_transparent() {
        let policy = policy_2025();
        let estimator = JointEstimator::new(&policy).unwrap();

        assert_eq!(estimator.estimate(&scenario_a()), estimator.estimate(&scenario_a()));
    }

    #[test]
    fn estimate_marginal_rate_uses_unrounded_taxable() {
        let policy = policy_2025();
        let estimator = JointEstimator::new(&policy).unwrap();
        // Taxable 23850.40 rounds down to the 10% bound but sits in the 12% bracket.
        let input = EstimateInput {
            ordinary_income: dec!(55350.40),
            ..EstimateInput::default()
        };

        let result = estimator.estimate(&input);

        assert_eq!(result.taxable_ordinary, dec!(23850));
        assert_eq!(result.marginal_ordinary_rate, dec!(0.12));
    }

    #[test]
    fn estimate_survives_inputs_at_the_ceiling() {
        let policy = policy_2025();
        let estimator = JointEstimator::new(&policy).unwrap();

        let input = EstimateInput::from_thousands(1e26, 1e26, 1e26, 1e26, 1e26);

        let result = estimator.estimate(&input);

        assert_eq!(result.adjusted_gross_income, dec!(3000000000000000));
        assert_eq!(result.deduction_used, dec!(1000000000010000));
        assert!(result.itemized_was_used);
        assert_eq!(result.marginal_ordinary_rate, dec!(0.37));
        assert_eq!(result.child_credit_used, dec!(0));
        assert!(result.total_tax > Decimal::ZERO);
    }

    #[test]
    fn estimate_saturates_unnormalized_extremes() {
        let policy = policy_2025();
        let estimator = JointEstimator::new(&policy).unwrap();
        let input = EstimateInput {
            ordinary_income: Decimal::MAX,
            long_term_gains: Decimal::MAX,
            dividends: Decimal::MAX,
            charitable_cash_given: Decimal::MAX,
            salt_paid: Decimal::MAX,
        };

        let result = estimator.estimate(&input);

        assert_eq!(
            result,
            estimator.estimate(&EstimateInput::from_thousands(1e26, 1e26, 1e26, 1e26, 1e26))
        );
    }
}
