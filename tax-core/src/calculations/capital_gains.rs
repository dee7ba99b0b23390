//! Long-term capital gains stacked on top of ordinary taxable income.
//!
//! Ordinary income fills the bands first, so gains only reach the 0% band if
//! ordinary taxable income sits below `capital_gains_zero_top`, and only
//! reach the 15% band below `capital_gains_fifteen_top`. Whatever remains is
//! taxed at 20%.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::calculations::common::clamp_zero;

pub const FIFTEEN_PERCENT_RATE: Decimal = dec!(0.15);
pub const TWENTY_PERCENT_RATE: Decimal = dec!(0.20);

/// Taxable long-term gains split across the three preferential bands.
///
/// The bands never overlap and always sum to the taxable gains.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GainsBands {
    pub zero: Decimal,
    pub fifteen: Decimal,
    pub twenty: Decimal,
}

impl GainsBands {
    pub fn total(&self) -> Decimal {
        self.zero + self.fifteen + self.twenty
    }

    pub fn tax(&self) -> Decimal {
        self.fifteen * FIFTEEN_PERCENT_RATE + self.twenty * TWENTY_PERCENT_RATE
    }
}

#[derive(Debug, Clone, Copy)]
pub struct CapitalGainsStacker {
    zero_top: Decimal,
    fifteen_top: Decimal,
}

impl CapitalGainsStacker {
    pub fn new(
        zero_top: Decimal,
        fifteen_top: Decimal,
    ) -> Self {
        Self {
            zero_top,
            fifteen_top,
        }
    }

    /// Splits `taxable_gains` into bands above `taxable_ordinary`.
    pub fn bands(
        &self,
        taxable_ordinary: Decimal,
        taxable_gains: Decimal,
    ) -> GainsBands {
        let taxable_ordinary = clamp_zero(taxable_ordinary);
        let taxable_gains = clamp_zero(taxable_gains);

        let zero = clamp_zero(taxable_gains.min(self.zero_top - taxable_ordinary));
        let fifteen = clamp_zero(
            (taxable_gains - zero).min(self.fifteen_top - (taxable_ordinary + zero)),
        );
        let twenty = clamp_zero(taxable_gains - zero - fifteen);

        GainsBands {
            zero,
            fifteen,
            twenty,
        }
    }

    pub fn tax(
        &self,
        taxable_ordinary: Decimal,
        taxable_gains: Decimal,
    ) -> Decimal {
        self.bands(taxable_ordinary, taxable_gains).tax()
    }
}
