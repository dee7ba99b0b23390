//! Standard-versus-itemized deduction selection.
//!
//! The itemized deduction is the sum of two capped allowances:
//!
//! | Allowance  | Cap |
//! |------------|-----|
//! | Charitable | `charitable_cash_agi_cap_fraction × AGI` |
//! | SALT       | `max(floor, base − rate × max(0, MAGI − start))` |
//!
//! The larger of the standard and itemized amounts is used. A tie keeps the
//! standard deduction.

use rust_decimal::Decimal;

use crate::PolicyTable;
use crate::calculations::common::{clamp_zero, max};

/// Which deduction the estimate uses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeductionChoice {
    /// `max(standard_deduction, itemized)`.
    pub deduction_used: Decimal,

    /// Capped charitable plus capped SALT, whether or not it was used.
    pub itemized: Decimal,

    /// True only when itemized strictly exceeds the standard deduction.
    pub itemized_was_used: bool,
}

#[derive(Debug, Clone, Copy)]
pub struct DeductionSelector<'a> {
    policy: &'a PolicyTable,
}

impl<'a> DeductionSelector<'a> {
    pub fn new(policy: &'a PolicyTable) -> Self {
        Self { policy }
    }

    /// Selects the deduction for a full estimate.
    pub fn select(
        &self,
        adjusted_gross_income: Decimal,
        modified_agi: Decimal,
        charitable_cash_given: Decimal,
        salt_paid: Decimal,
    ) -> DeductionChoice {
        let salt_allowed = self.salt_allowed(salt_paid, modified_agi);
        self.select_with_salt_allowance(adjusted_gross_income, charitable_cash_given, salt_allowed)
    }

    /// Selects the deduction using an already-determined SALT allowance.
    ///
    /// The reduced profile passes a fixed SALT-equivalent amount here.
    pub fn select_with_salt_allowance(
        &self,
        adjusted_gross_income: Decimal,
        charitable_cash_given: Decimal,
        salt_allowed: Decimal,
    ) -> DeductionChoice {
        let charitable = self.charitable_allowed(charitable_cash_given, adjusted_gross_income);
        let itemized = charitable + salt_allowed;
        let standard = self.policy.standard_deduction;

        DeductionChoice {
            deduction_used: max(standard, itemized),
            itemized,
            itemized_was_used: itemized > standard,
        }
    }

    /// Cash gifts, capped at a fraction of AGI.
    pub fn charitable_allowed(
        &self,
        charitable_cash_given: Decimal,
        adjusted_gross_income: Decimal,
    ) -> Decimal {
        let cap = self.policy.charitable_cash_agi_cap_fraction * adjusted_gross_income;
        charitable_cash_given.min(cap)
    }

    /// SALT cap at `modified_agi`: a linear phase-down floored at `salt_floor_cap`.
    pub fn salt_cap(
        &self,
        modified_agi: Decimal,
    ) -> Decimal {
        let excess = clamp_zero(modified_agi - self.policy.salt_phaseout_start_magi);
        let reduced = self.policy.salt_base_cap - self.policy.salt_phaseout_rate * excess;
        max(self.policy.salt_floor_cap, reduced)
    }

    pub fn salt_allowed(
        &self,
        salt_paid: Decimal,
        modified_agi: Decimal,
    ) -> Decimal {
        salt_paid.min(self.salt_cap(modified_agi))
    }
}
