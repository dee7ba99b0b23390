//! Progressive marginal-rate tax on ordinary taxable income.
//!
//! Each bracket taxes only the slice of income between the previous bracket's
//! upper bound and its own, so the result is continuous and non-decreasing.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use tax_core::OrdinaryBracket;
//! use tax_core::calculations::OrdinaryTaxSchedule;
//!
//! let brackets = vec![
//!     OrdinaryBracket::bounded(dec!(23850), dec!(0.10)),
//!     OrdinaryBracket::bounded(dec!(96950), dec!(0.12)),
//!     OrdinaryBracket::unbounded(dec!(0.22)),
//! ];
//! let schedule = OrdinaryTaxSchedule::new(&brackets);
//!
//! // 2385 + 8772 + 0.22 * 6550
//! assert_eq!(schedule.tax(dec!(103500)), dec!(12598.00));
//! assert_eq!(schedule.marginal_rate(dec!(103500)), dec!(0.22));
//! ```

use rust_decimal::Decimal;

use crate::OrdinaryBracket;
use crate::calculations::common::clamp_zero;

#[derive(Debug, Clone, Copy)]
pub struct OrdinaryTaxSchedule<'a> {
    brackets: &'a [OrdinaryBracket],
}

impl<'a> OrdinaryTaxSchedule<'a> {
    /// Brackets must be ascending and end with an unbounded entry; see
    /// [`crate::PolicyTable::validate`].
    pub fn new(brackets: &'a [OrdinaryBracket]) -> Self {
        Self { brackets }
    }

    /// Tax on `taxable` ordinary income. Zero or negative income yields zero.
    pub fn tax(
        &self,
        taxable: Decimal,
    ) -> Decimal {
        if taxable <= Decimal::ZERO {
            return Decimal::ZERO;
        }

        let mut total = Decimal::ZERO;
        let mut floor = Decimal::ZERO;

        for bracket in self.brackets {
            let ceiling = match bracket.upper_bound {
                Some(bound) => taxable.min(bound),
                None => taxable,
            };
            total += clamp_zero(ceiling - floor) * bracket.rate;

            if bracket.contains(taxable) {
                break;
            }
            if let Some(bound) = bracket.upper_bound {
                floor = bound;
            }
        }

        total
    }

    /// Rate of the bracket containing `taxable`.
    ///
    /// Income of exactly a bracket's upper bound belongs to that bracket.
    pub fn marginal_rate(
        &self,
        taxable: Decimal,
    ) -> Decimal {
        let taxable = clamp_zero(taxable);
        self.brackets
            .iter()
            .find(|bracket| bracket.contains(taxable))
            .or(self.brackets.last())
            .map_or(Decimal::ZERO, |bracket| bracket.rate)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::models::test_support::{policy_2024, policy_2025};

    // =========================================================================
    // tax tests
    // =========================================================================

    #[test]
    fn tax_is_zero_for_zero_income() {
        let policy = policy_2025();
        let schedule = OrdinaryTaxSchedule::new(&policy.ordinary_brackets);

        assert_eq!(schedule.tax(dec!(0)), dec!(0));
    }

    #[test]
    fn tax_is_zero_for_negative_income() {
        let policy = policy_2025();
        let schedule = OrdinaryTaxSchedule::new(&policy.ordinary_brackets);

        assert_eq!(schedule.tax(dec!(-5000)), dec!(0));
    }

    #[test]
    fn tax_first_bracket() {
        let policy = policy_2025();
        let schedule = OrdinaryTaxSchedule::new(&policy.ordinary_brackets);

        assert_eq!(schedule.tax(dec!(10000)), dec!(1000.00));
    }

    #[test]
    fn tax_third_bracket_2025() {
        let policy = policy_2025();
        let schedule = OrdinaryTaxSchedule::new(&policy.ordinary_brackets);

        // 2385 + 0.12 * 73100 + 0.22 * 6550 = 2385 + 8772 + 1441
        assert_eq!(schedule.tax(dec!(103500)), dec!(12598));
    }

    #[test]
    fn tax_second_bracket_2024() {
        let policy = policy_2024();
        let schedule = OrdinaryTaxSchedule::new(&policy.ordinary_brackets);

        // 2320 + 0.12 * 33800
        assert_eq!(schedule.tax(dec!(57000)), dec!(6376));
    }

    #[test]
    fn tax_top_bracket_2025() {
        let policy = policy_2025();
        let schedule = OrdinaryTaxSchedule::new(&policy.ordinary_brackets);

        // Cumulative at 751600 is 202154.50; plus 0.37 * 48400
        assert_eq!(schedule.tax(dec!(800000)), dec!(220062.50));
    }

    #[test]
    fn tax_at_bracket_boundary_matches_cumulative_base() {
        let policy = policy_2025();
        let schedule = OrdinaryTaxSchedule::new(&policy.ordinary_brackets);

        assert_eq!(schedule.tax(dec!(23850)), dec!(2385));
        assert_eq!(schedule.tax(dec!(96950)), dec!(11157));
        assert_eq!(schedule.tax(dec!(206700)), dec!(35302));
        assert_eq!(schedule.tax(dec!(394600)), dec!(80398));
        assert_eq!(schedule.tax(dec!(501050)), dec!(114462));
        assert_eq!(schedule.tax(dec!(751600)), dec!(202154.50));
    }

    #[test]
    fn tax_is_continuous_across_every_boundary() {
        let policy = policy_2025();
        let schedule = OrdinaryTaxSchedule::new(&policy.ordinary_brackets);
        let epsilon = dec!(0.01);

        for bracket in &policy.ordinary_brackets {
            let Some(bound) = bracket.upper_bound else {
                continue;
            };
            let below = schedule.tax(bound - epsilon);
            let at = schedule.tax(bound);
            let above = schedule.tax(bound + epsilon);

            // A cent of income moves tax by at most a cent times the top rate.
            assert!(at - below <= epsilon, "jump below {bound}");
            assert!(above - at <= epsilon, "jump above {bound}");
            assert!(below <= at && at <= above, "decrease near {bound}");
        }
    }

    #[test]
    fn tax_marginal_slice_uses_containing_bracket_rate() {
        let policy = policy_2025();
        let schedule = OrdinaryTaxSchedule::new(&policy.ordinary_brackets);

        let base = schedule.tax(dec!(150000));
        let next = schedule.tax(dec!(151000));

        assert_eq!(next - base, dec!(220));
    }

    #[test]
    fn tax_single_unbounded_bracket_is_flat() {
        let brackets = vec![OrdinaryBracket::unbounded(dec!(0.25))];
        let schedule = OrdinaryTaxSchedule::new(&brackets);

        assert_eq!(schedule.tax(dec!(40000)), dec!(10000));
    }

    // =========================================================================
    // marginal_rate tests
    // =========================================================================

    #[test]
    fn marginal_rate_at_boundary_belongs_to_lower_bracket() {
        let policy = policy_2025();
        let schedule = OrdinaryTaxSchedule::new(&policy.ordinary_brackets);

        assert_eq!(schedule.marginal_rate(dec!(23850)), dec!(0.10));
        assert_eq!(schedule.marginal_rate(dec!(23851)), dec!(0.12));
    }

    #[test]
    fn marginal_rate_top_bracket() {
        let policy = policy_2025();
        let schedule = OrdinaryTaxSchedule::new(&policy.ordinary_brackets);

        assert_eq!(schedule.marginal_rate(dec!(2000000)), dec!(0.37));
    }

    #[test]
    fn marginal_rate_empty_schedule_is_zero() {
        let schedule = OrdinaryTaxSchedule::new(&[]);

        assert_eq!(schedule.marginal_rate(dec!(1000)), dec!(0));
    }
}
