//! Per-year policy constants for the joint-filer estimate.
//!
//! A [`PolicyTable`] is loaded once per tax year and treated as immutable
//! configuration. Every estimator takes it as an explicit parameter, so
//! several years can be compared side by side in the same process.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration-integrity faults in a [`PolicyTable`].
///
/// These are raised at load time so a malformed table can never silently
/// undercompute tax.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PolicyTableError {
    /// The ordinary bracket schedule is empty.
    #[error("ordinary_brackets: no brackets provided")]
    NoOrdinaryBrackets,

    /// A bracket upper bound is zero or negative.
    #[error("ordinary_brackets[{index}]: upper bound must be positive, got {bound}")]
    NonPositiveBracketBound { index: usize, bound: Decimal },

    /// Bracket upper bounds must strictly increase.
    #[error(
        "ordinary_brackets[{index}]: upper bound {bound} does not exceed previous bound {previous}"
    )]
    NonIncreasingBracketBound {
        index: usize,
        bound: Decimal,
        previous: Decimal,
    },

    /// Only the final bracket may be unbounded.
    #[error("ordinary_brackets[{index}]: unbounded bracket must be the last entry")]
    UnboundedBracketNotLast { index: usize },

    /// The final bracket has an upper bound, leaving income above it untaxed.
    #[error("ordinary_brackets: final bracket must be unbounded, got upper bound {0}")]
    FinalBracketBounded(Decimal),

    /// A marginal rate is outside `[0, 1]`.
    #[error("ordinary_brackets[{index}]: rate must be between 0 and 1, got {rate}")]
    InvalidBracketRate { index: usize, rate: Decimal },

    /// A currency amount is negative.
    #[error("{field}: amount must not be negative, got {value}")]
    NegativeAmount { field: &'static str, value: Decimal },

    /// A fraction is outside `[0, 1]`.
    #[error("{field}: fraction must be between 0 and 1, got {value}")]
    InvalidFraction { field: &'static str, value: Decimal },

    /// The child credit phase-out step must be positive.
    #[error("ctc_phaseout_step_size: step size must be positive, got {0}")]
    InvalidPhaseoutStep(Decimal),

    /// The 0% gains band ceiling sits above the 15% band ceiling.
    #[error(
        "capital_gains_zero_top: {zero_top} exceeds capital_gains_fifteen_top {fifteen_top}"
    )]
    GainsThresholdsOutOfOrder {
        zero_top: Decimal,
        fifteen_top: Decimal,
    },

    /// The SALT floor exceeds the base cap, which would make the cap rise with income.
    #[error("salt_floor_cap: {floor} exceeds salt_base_cap {base}")]
    SaltFloorAboveBase { floor: Decimal, base: Decimal },
}

/// One row of the ordinary marginal-rate schedule.
///
/// `upper_bound` of `None` means the bracket extends to infinity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OrdinaryBracket {
    #[serde(default)]
    pub upper_bound: Option<Decimal>,
    pub rate: Decimal,
}

impl OrdinaryBracket {
    pub fn bounded(
        upper_bound: Decimal,
        rate: Decimal,
    ) -> Self {
        Self {
            upper_bound: Some(upper_bound),
            rate,
        }
    }

    pub fn unbounded(rate: Decimal) -> Self {
        Self {
            upper_bound: None,
            rate,
        }
    }

    /// Whether `taxable` falls at or below this bracket's ceiling.
    pub fn contains(
        &self,
        taxable: Decimal,
    ) -> bool {
        self.upper_bound.is_none_or(|bound| taxable <= bound)
    }
}

/// Versioned policy constants for married-filing-jointly estimates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PolicyTable {
    /// Tax year this table applies to.
    pub tax_year: i32,

    pub standard_deduction: Decimal,

    /// Marginal-rate schedule, ascending, ending with an unbounded bracket.
    pub ordinary_brackets: Vec<OrdinaryBracket>,

    /// Ordinary taxable income marking the top of the 0% long-term gains band.
    pub capital_gains_zero_top: Decimal,

    /// Ordinary taxable income marking the top of the 15% long-term gains band.
    pub capital_gains_fifteen_top: Decimal,

    /// State and local tax cap before any phase-down.
    pub salt_base_cap: Decimal,

    /// Minimum SALT cap after the phase-down.
    pub salt_floor_cap: Decimal,

    pub salt_phaseout_start_magi: Decimal,

    /// Cap reduction per unit of MAGI above the phase-down start.
    pub salt_phaseout_rate: Decimal,

    pub ctc_per_child: Decimal,
    pub ctc_phaseout_start_magi: Decimal,

    /// Every started step of this size above the start costs
    /// `ctc_phaseout_amount_per_step` of credit.
    pub ctc_phaseout_step_size: Decimal,
    pub ctc_phaseout_amount_per_step: Decimal,

    pub niit_threshold_magi: Decimal,
    pub niit_rate: Decimal,

    /// Share of AGI that cash charitable gifts may deduct.
    pub charitable_cash_agi_cap_fraction: Decimal,

    /// Fixed household assumption, not derived from income.
    pub qualifying_children_under_17: u32,
}

impl PolicyTable {
    /// Returns a copy of this table using `brackets` as the ordinary schedule.
    ///
    /// The result is not validated; call [`PolicyTable::validate`] before use.
    pub fn with_ordinary_brackets(
        &self,
        brackets: Vec<OrdinaryBracket>,
    ) -> Self {
        Self {
            ordinary_brackets: brackets,
            ..self.clone()
        }
    }

    /// Checks the table for configuration-integrity faults.
    ///
    /// # Errors
    ///
    /// Returns the first [`PolicyTableError`] found, naming the field at fault.
    pub fn validate(&self) -> Result<(), PolicyTableError> {
        self.validate_brackets()?;

        let amounts = [
            ("standard_deduction", self.standard_deduction),
            ("capital_gains_zero_top", self.capital_gains_zero_top),
            ("capital_gains_fifteen_top", self.capital_gains_fifteen_top),
            ("salt_base_cap", self.salt_base_cap),
            ("salt_floor_cap", self.salt_floor_cap),
            ("salt_phaseout_start_magi", self.salt_phaseout_start_magi),
            ("ctc_per_child", self.ctc_per_child),
            ("ctc_phaseout_start_magi", self.ctc_phaseout_start_magi),
            ("ctc_phaseout_amount_per_step", self.ctc_phaseout_amount_per_step),
            ("niit_threshold_magi", self.niit_threshold_magi),
        ];
        for (field, value) in amounts {
            if value < Decimal::ZERO {
                return Err(PolicyTableError::NegativeAmount { field, value });
            }
        }

        let fractions = [
            ("salt_phaseout_rate", self.salt_phaseout_rate),
            ("niit_rate", self.niit_rate),
            (
                "charitable_cash_agi_cap_fraction",
                self.charitable_cash_agi_cap_fraction,
            ),
        ];
        for (field, value) in fractions {
            if value < Decimal::ZERO || value > Decimal::ONE {
                return Err(PolicyTableError::InvalidFraction { field, value });
            }
        }

        if self.ctc_phaseout_step_size <= Decimal::ZERO {
            return Err(PolicyTableError::InvalidPhaseoutStep(
                self.ctc_phaseout_step_size,
            ));
        }
        if self.capital_gains_zero_top > self.capital_gains_fifteen_top {
            return Err(PolicyTableError::GainsThresholdsOutOfOrder {
                zero_top: self.capital_gains_zero_top,
                fifteen_top: self.capital_gains_fifteen_top,
            });
        }
        if self.salt_floor_cap > self.salt_base_cap {
            return Err(PolicyTableError::SaltFloorAboveBase {
                floor: self.salt_floor_cap,
                base: self.salt_base_cap,
            });
        }
        Ok(())
    }

    /// The schedule must cover `[0, +infinity)` with strictly increasing bounds.
    fn validate_brackets(&self) -> Result<(), PolicyTableError> {
        let Some(last) = self.ordinary_brackets.last() else {
            return Err(PolicyTableError::NoOrdinaryBrackets);
        };

        let last_index = self.ordinary_brackets.len() - 1;
        let mut previous = Decimal::ZERO;

        for (index, bracket) in self.ordinary_brackets.iter().enumerate() {
            if bracket.rate < Decimal::ZERO || bracket.rate > Decimal::ONE {
                return Err(PolicyTableError::InvalidBracketRate {
                    index,
                    rate: bracket.rate,
                });
            }
            match bracket.upper_bound {
                None if index != last_index => {
                    return Err(PolicyTableError::UnboundedBracketNotLast { index });
                }
                None => {}
                Some(bound) if bound <= Decimal::ZERO => {
                    return Err(PolicyTableError::NonPositiveBracketBound { index, bound });
                }
                Some(bound) if bound <= previous => {
                    return Err(PolicyTableError::NonIncreasingBracketBound {
                        index,
                        bound,
                        previous,
                    });
                }
                Some(bound) => previous = bound,
            }
        }

        match last.upper_bound {
            Some(bound) => Err(PolicyTableError::FinalBracketBounded(bound)),
            None => Ok(()),
        }
    }
}
