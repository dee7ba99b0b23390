use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Output record of one estimate.
///
/// Every currency field is rounded to whole units. Internal stages work on
/// unrounded values; rounding happens only when this record is assembled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EstimateResult {
    pub adjusted_gross_income: Decimal,
    pub deduction_used: Decimal,
    pub itemized_was_used: bool,
    pub taxable_ordinary: Decimal,
    pub taxable_long_term_gains: Decimal,
    /// Rate of the ordinary bracket holding the last taxable dollar, taken
    /// from the unrounded taxable amount. Rates are never rounded.
    pub marginal_ordinary_rate: Decimal,
    pub ordinary_tax: Decimal,
    pub long_term_gains_tax: Decimal,
    pub net_investment_income_tax: Decimal,
    pub child_credit_used: Decimal,
    pub total_tax: Decimal,
}

/// Output of the reduced three-input profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReducedEstimateResult {
    #[serde(flatten)]
    pub estimate: EstimateResult,

    /// `total_tax` after the opt-in personal adjustment. Not a tax rule and
    /// may be negative; absent unless the adjustment was requested.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub adjusted_total_tax: Option<Decimal>,
}
