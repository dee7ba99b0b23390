//! Net investment income surtax and the nonrefundable child credit.
//!
//! # Net investment income tax
//!
//! Simplified: the surtax base is the smaller of investment income
//! (dividends plus long-term gains) and MAGI above the threshold. It never
//! exceeds either quantity.
//!
//! # Child credit
//!
//! The credit phases out in whole steps. Any MAGI above the start, however
//! small, consumes one full step of reduction:
//!
//! ```text
//! steps     = ceil(max(0, MAGI - start) / step_size)
//! credit    = max(0, children * per_child - steps * amount_per_step)
//! ```
//!
//! The credit is nonrefundable: it can bring tax to zero, never below.

use rust_decimal::Decimal;

use crate::PolicyTable;
use crate::calculations::common::clamp_zero;

/// Tax before and after the child credit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreditApplication {
    pub tax_before_credits: Decimal,
    pub credit_used: Decimal,
    pub total_tax: Decimal,
}

#[derive(Debug, Clone, Copy)]
pub struct SurtaxCreditLayer<'a> {
    policy: &'a PolicyTable,
}

impl<'a> SurtaxCreditLayer<'a> {
    pub fn new(policy: &'a PolicyTable) -> Self {
        Self { policy }
    }

    pub fn net_investment_income_tax(
        &self,
        dividends: Decimal,
        long_term_gains: Decimal,
        modified_agi: Decimal,
    ) -> Decimal {
        let investment_income = clamp_zero(dividends + long_term_gains);
        let excess = clamp_zero(modified_agi - self.policy.niit_threshold_magi);
        investment_income.min(excess) * self.policy.niit_rate
    }

    /// Number of phase-out steps consumed at `modified_agi`.
    pub fn phaseout_steps(
        &self,
        modified_agi: Decimal,
    ) -> Decimal {
        let excess = clamp_zero(modified_agi - self.policy.ctc_phaseout_start_magi);
        (excess / self.policy.ctc_phaseout_step_size).ceil()
    }

    /// Child credit available before the nonrefundable limit.
    pub fn child_credit(
        &self,
        modified_agi: Decimal,
    ) -> Decimal {
        let base_credit =
            Decimal::from(self.policy.qualifying_children_under_17) * self.policy.ctc_per_child;
        let reduction =
            self.phaseout_steps(modified_agi) * self.policy.ctc_phaseout_amount_per_step;
        clamp_zero(base_credit - reduction)
    }

    /// Applies a nonrefundable credit: unused credit is neither refunded
    /// nor carried anywhere.
    pub fn apply_credit(
        &self,
        tax_before_credits: Decimal,
        credit: Decimal,
    ) -> CreditApplication {
        let credit_used = tax_before_credits.min(credit);
        CreditApplication {
            tax_before_credits,
            credit_used,
            total_tax: clamp_zero(tax_before_credits - credit_used),
        }
    }
}
