//! Input vectors for a single estimate request.
//!
//! Callers usually express amounts in thousands of dollars. Both input types
//! normalize at ingestion: negative or non-finite values become zero and
//! amounts above [`MAX_INPUT_UNITS`] are saturated. That is a clamping
//! policy, never an error.

use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use tracing::warn;

const THOUSAND: Decimal = Decimal::ONE_THOUSAND;

/// Largest accepted amount for any single input, in whole currency units.
///
/// Keeps every sum and product of an estimate inside `Decimal` range.
pub const MAX_INPUT_UNITS: Decimal = dec!(1000000000000000);

fn saturate(
    field: &'static str,
    value: Decimal,
) -> Decimal {
    if value > MAX_INPUT_UNITS {
        warn!(field, value = %value, max = %MAX_INPUT_UNITS, "saturating oversized input");
        return MAX_INPUT_UNITS;
    }
    value
}

/// Converts an amount in thousands to whole currency units.
///
/// Non-finite and negative inputs are clamped to zero; amounts above
/// [`MAX_INPUT_UNITS`] are saturated.
pub fn thousands_to_units(
    field: &'static str,
    thousands: f64,
) -> Decimal {
    if !thousands.is_finite() || thousands < 0.0 {
        warn!(field, value = thousands, "clamping invalid input to zero");
        return Decimal::ZERO;
    }
    match Decimal::from_f64(thousands).and_then(|value| value.checked_mul(THOUSAND)) {
        Some(units) => saturate(field, units),
        None if thousands >= 1.0 => {
            warn!(field, value = thousands, max = %MAX_INPUT_UNITS, "saturating oversized input");
            MAX_INPUT_UNITS
        }
        None => {
            warn!(field, value = thousands, "input not representable; using zero");
            Decimal::ZERO
        }
    }
}

fn clamp_input(
    field: &'static str,
    value: Decimal,
) -> Decimal {
    if value < Decimal::ZERO {
        warn!(field, value = %value, "clamping negative input to zero");
        return Decimal::ZERO;
    }
    saturate(field, value)
}

/// The five amounts of a full joint estimate, in whole currency units.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EstimateInput {
    /// Wages, interest and short-term gains.
    pub ordinary_income: Decimal,
    pub long_term_gains: Decimal,
    /// Always taxed as ordinary income.
    pub dividends: Decimal,
    pub charitable_cash_given: Decimal,
    /// State and local tax paid.
    pub salt_paid: Decimal,
}

impl EstimateInput {
    /// Builds an input from amounts expressed in thousands.
    ///
    /// # Example
    ///
    /// ```
    /// use rust_decimal_macros::dec;
    /// use tax_core::EstimateInput;
    ///
    /// let input = EstimateInput::from_thousands(123.0, 123.0, 12.0, f64::NAN, -4.0);
    ///
    /// assert_eq!(input.ordinary_income, dec!(123000));
    /// assert_eq!(input.charitable_cash_given, dec!(0));
    /// assert_eq!(input.salt_paid, dec!(0));
    /// ```
    pub fn from_thousands(
        ordinary_income: f64,
        long_term_gains: f64,
        dividends: f64,
        charitable_cash_given: f64,
        salt_paid: f64,
    ) -> Self {
        Self {
            ordinary_income: thousands_to_units("ordinary_income", ordinary_income),
            long_term_gains: thousands_to_units("long_term_gains", long_term_gains),
            dividends: thousands_to_units("dividends", dividends),
            charitable_cash_given: thousands_to_units(
                "charitable_cash_given",
                charitable_cash_given,
            ),
            salt_paid: thousands_to_units("salt_paid", salt_paid),
        }
    }

    /// Returns a copy with every negative amount clamped to zero and every
    /// oversized amount saturated at [`MAX_INPUT_UNITS`].
    pub fn normalized(&self) -> Self {
        Self {
            ordinary_income: clamp_input("ordinary_income", self.ordinary_income),
            long_term_gains: clamp_input("long_term_gains", self.long_term_gains),
            dividends: clamp_input("dividends", self.dividends),
            charitable_cash_given: clamp_input(
                "charitable_cash_given",
                self.charitable_cash_given,
            ),
            salt_paid: clamp_input("salt_paid", self.salt_paid),
        }
    }

    /// Income taxed at bracket rates: ordinary income plus dividends.
    pub fn ordinary_part(&self) -> Decimal {
        self.ordinary_income + self.dividends
    }

    pub fn adjusted_gross_income(&self) -> Decimal {
        self.ordinary_part() + self.long_term_gains
    }

    /// Modified AGI. No add-backs are modeled, so this equals AGI.
    pub fn modified_agi(&self) -> Decimal {
        self.adjusted_gross_income()
    }
}

/// The three amounts of the reduced profile, in whole currency units.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReducedEstimateInput {
    pub ordinary_income: Decimal,
    pub long_term_gains: Decimal,
    pub charitable_cash_given: Decimal,
}

impl ReducedEstimateInput {
    pub fn from_thousands(
        ordinary_income: f64,
        long_term_gains: f64,
        charitable_cash_given: f64,
    ) -> Self {
        Self {
            ordinary_income: thousands_to_units("ordinary_income", ordinary_income),
            long_term_gains: thousands_to_units("long_term_gains", long_term_gains),
            charitable_cash_given: thousands_to_units(
                "charitable_cash_given",
                charitable_cash_given,
            ),
        }
    }

    pub fn normalized(&self) -> Self {
        Self {
            ordinary_income: clamp_input("ordinary_income", self.ordinary_income),
            long_term_gains: clamp_input("long_term_gains", self.long_term_gains),
            charitable_cash_given: clamp_input(
                "charitable_cash_given",
                self.charitable_cash_given,
            ),
        }
    }

    pub fn adjusted_gross_income(&self) -> Decimal {
        self.ordinary_income + self.long_term_gains
    }
}
