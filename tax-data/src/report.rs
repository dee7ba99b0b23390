use std::fmt;

use rust_decimal::Decimal;
use serde::Serialize;
use tax_core::{EstimateResult, PolicyTable, ReducedEstimateResult};

/// One estimate as printed by the CLI: the engine's result plus the context
/// needed to read it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EstimateReport {
    pub tax_year: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(flatten)]
    pub estimate: EstimateResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub adjusted_total_tax: Option<Decimal>,
}

impl EstimateReport {
    pub fn from_full(
        policy: &PolicyTable,
        label: Option<String>,
        estimate: EstimateResult,
    ) -> Self {
        Self {
            tax_year: policy.tax_year,
            label,
            estimate,
            adjusted_total_tax: None,
        }
    }

    pub fn from_reduced(
        policy: &PolicyTable,
        label: Option<String>,
        reduced: ReducedEstimateResult,
    ) -> Self {
        let mut report = Self::from_full(policy, label, reduced.estimate);
        report.adjusted_total_tax = reduced.adjusted_total_tax;
        report
    }
}

impl fmt::Display for EstimateReport {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        let e = &self.estimate;
        match &self.label {
            Some(label) => writeln!(f, "Tax year {} ({label})", self.tax_year)?,
            None => writeln!(f, "Tax year {}", self.tax_year)?,
        }
        let deduction_kind = if e.itemized_was_used { "itemized" } else { "standard" };
        writeln!(f, "  Adjusted gross income:   {:>12}", e.adjusted_gross_income)?;
        writeln!(f, "  Deduction ({deduction_kind:>8}):  {:>12}", e.deduction_used)?;
        writeln!(f, "  Taxable ordinary:        {:>12}", e.taxable_ordinary)?;
        writeln!(f, "  Taxable LT gains:        {:>12}", e.taxable_long_term_gains)?;
        writeln!(f, "  Ordinary tax:            {:>12}", e.ordinary_tax)?;
        writeln!(f, "  LT gains tax:            {:>12}", e.long_term_gains_tax)?;
        writeln!(f, "  Net investment inc. tax: {:>12}", e.net_investment_income_tax)?;
        writeln!(f, "  Child credit used:       {:>12}", e.child_credit_used)?;
        writeln!(f, "  Total tax:               {:>12}", e.total_tax)?;
        writeln!(
            f,
            "  Marginal ordinary rate:  {:>11}%",
            (e.marginal_ordinary_rate * Decimal::ONE_HUNDRED).normalize()
        )?;
        if let Some(adjusted) = self.adjusted_total_tax {
            writeln!(f, "  Personal adjustment:     {adjusted:>12}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;
    use serde_json::json;

    use tax_core::{EstimateInput, JointEstimator};

    use super::*;
    use crate::builtin::builtin_policy;

    fn sample_result() -> EstimateResult {
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
    }

    #[test]
    fn test_full_report_carries_year_and_rate() {
        let policy = builtin_policy(2025).unwrap();

        let report = EstimateReport::from_full(&policy, None, sample_result());

        assert_eq!(report.tax_year, 2025);
        assert_eq!(report.estimate.marginal_ordinary_rate, dec!(0.22));
        assert_eq!(report.adjusted_total_tax, None);
    }

    #[test]
    fn test_rate_follows_unrounded_taxable_income() {
        let policy = builtin_policy(2025).unwrap();
        let input = EstimateInput {
            ordinary_income: dec!(55350.40),
            ..EstimateInput::default()
        };
        let estimate = JointEstimator::new(&policy).unwrap().estimate(&input);

        let report = EstimateReport::from_full(&policy, None, estimate);
        let text = report.to_string();

        assert_eq!(report.estimate.taxable_ordinary, dec!(23850));
        assert!(text.contains(" 12%"), "got: {text}");
    }

    #[test]
    fn test_report_json_is_flat_camel_case() {
        let policy = builtin_policy(2025).unwrap();
        let report = EstimateReport::from_full(&policy, Some("base".to_string()), sample_result());

        let value = serde_json::to_value(&report).unwrap();

        assert_eq!(value["taxYear"], json!(2025));
        assert_eq!(value["label"], json!("base"));
        assert_eq!(value["totalTax"], json!("24752"));
        assert_eq!(value["itemizedWasUsed"], json!(false));
        assert_eq!(value["marginalOrdinaryRate"], json!("0.22"));
        assert!(value.get("adjustedTotalTax").is_none());
        assert!(value.get("estimate").is_none());
    }

    #[test]
    fn test_reduced_report_carries_adjustment() {
        let policy = builtin_policy(2024).unwrap();
        let reduced = ReducedEstimateResult {
            estimate: sample_result(),
            adjusted_total_tax: Some(dec!(-4050)),
        };

        let report = EstimateReport::from_reduced(&policy, None, reduced);
        let text = report.to_string();

        assert_eq!(report.adjusted_total_tax, Some(dec!(-4050)));
        assert!(text.contains("Personal adjustment"), "got: {text}");
        assert!(text.contains("-4050"), "got: {text}");
    }

    #[test]
    fn test_text_report_lines() {
        let policy = builtin_policy(2025).unwrap();
        let report = EstimateReport::from_full(&policy, None, sample_result());

        let text = report.to_string();

        assert!(text.starts_with("Tax year 2025\n"), "got: {text}");
        assert!(text.contains("standard"), "got: {text}");
        assert!(text.contains("24752"), "got: {text}");
        assert!(text.contains("22%"), "got: {text}");
        assert!(!text.contains("Personal adjustment"), "got: {text}");
    }
}
