use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::Parser;
use tax_core::{
    EstimateInput, JointEstimator, PersonalAdjustment, PolicyTable, ReducedEstimateInput,
    ReducedEstimator, ReducedProfile, thousands_to_units,
};
use tax_data::input_csv::{self, InputRow};
use tax_data::{EstimateReport, PolicyTableLoader, builtin_policy};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

/// Estimate federal income tax for a married couple filing jointly.
///
/// Amounts are given in thousands of dollars. In the default mode the
/// positional amounts are, in order:
/// ordinary income, long-term gains, dividends, charitable cash, SALT paid.
/// With `--reduced` they are: ordinary income, long-term gains, charitable cash.
/// Missing trailing amounts default to zero.
#[derive(Parser, Debug)]
#[command(name = "tax-estimate")]
#[command(version, about, long_about = None)]
struct Args {
    /// Amounts in thousands of dollars
    #[arg(allow_negative_numbers = true, num_args = 0..=5)]
    amounts: Vec<f64>,

    /// Tax year of a built-in policy table; repeat to compare years
    #[arg(short, long = "year", default_value = "2025")]
    years: Vec<i32>,

    /// Policy table TOML file; overrides --year
    #[arg(short, long, conflicts_with = "years")]
    policy: Option<PathBuf>,

    /// IRS-schedule CSV whose Y-1 rows replace the ordinary brackets
    #[arg(short, long)]
    brackets: Option<PathBuf>,

    /// Number of qualifying children under 17
    #[arg(short, long)]
    children: Option<u32>,

    /// Use the three-input profile (ordinary, gains, charitable)
    #[arg(short, long, default_value_t = false)]
    reduced: bool,

    /// SALT-equivalent amount in thousands used by the reduced profile
    #[arg(long, default_value_t = 10.0, requires = "reduced")]
    salt_deduction: f64,

    /// Also report 0.95 x total - 5000 (reduced profile only)
    #[arg(long, default_value_t = false, requires = "reduced")]
    personal_adjustment: bool,

    /// CSV file of inputs to estimate in one run
    #[arg(long, conflicts_with = "amounts")]
    batch: Option<PathBuf>,

    /// Print reports as JSON
    #[arg(long, default_value_t = false)]
    json: bool,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::from("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .with_target(false)
        .init();
}

fn load_policies(args: &Args) -> Result<Vec<PolicyTable>> {
    let mut policies = match &args.policy {
        Some(path) => vec![
            PolicyTableLoader::from_file(path)
                .with_context(|| format!("Failed to load policy: {}", path.display()))?,
        ],
        None => args
            .years
            .iter()
            .map(|&year| builtin_policy(year).with_context(|| format!("Tax year {year}")))
            .collect::<Result<Vec<_>>>()?,
    };

    for policy in &mut policies {
        if let Some(path) = &args.brackets {
            *policy = PolicyTableLoader::with_bracket_csv(policy, path)
                .with_context(|| format!("Failed to load brackets: {}", path.display()))?;
        }
        if let Some(children) = args.children {
            policy.qualifying_children_under_17 = children;
        }
    }

    Ok(policies)
}

fn load_rows(args: &Args) -> Result<Vec<InputRow>> {
    if let Some(path) = &args.batch {
        let rows = input_csv::load_from_file(path)
            .with_context(|| format!("Failed to load batch: {}", path.display()))?;
        info!(rows = rows.len(), path = %path.display(), "Loaded batch inputs");
        return Ok(rows);
    }

    let limit = if args.reduced { 3 } else { 5 };
    if args.amounts.len() > limit {
        bail!(
            "expected at most {limit} amounts, got {}",
            args.amounts.len()
        );
    }
    let amount = |i: usize| args.amounts.get(i).copied().unwrap_or(0.0);
    let row = if args.reduced {
        InputRow {
            label: None,
            ordinary: amount(0),
            gains: amount(1),
            dividends: None,
            charitable: Some(amount(2)),
            salt: None,
        }
    } else {
        InputRow {
            label: None,
            ordinary: amount(0),
            gains: amount(1),
            dividends: Some(amount(2)),
            charitable: Some(amount(3)),
            salt: Some(amount(4)),
        }
    };
    Ok(vec![row])
}

fn reduced_profile(args: &Args) -> Result<ReducedProfile> {
    if !args.salt_deduction.is_finite() || args.salt_deduction < 0.0 {
        bail!("Invalid --salt-deduction: {}", args.salt_deduction);
    }
    let profile = ReducedProfile::new(thousands_to_units("salt_deduction", args.salt_deduction));
    Ok(if args.personal_adjustment {
        profile.with_personal_adjustment(PersonalAdjustment::default())
    } else {
        profile
    })
}

fn estimate_all(
    args: &Args,
    policies: &[PolicyTable],
    rows: &[InputRow],
) -> Result<Vec<EstimateReport>> {
    let mut reports = Vec::with_capacity(policies.len() * rows.len());

    for policy in policies {
        if args.reduced {
            let estimator = ReducedEstimator::new(policy, reduced_profile(args)?)
                .with_context(|| format!("Tax year {}", policy.tax_year))?;
            for row in rows {
                let input: ReducedEstimateInput = row.to_reduced_input();
                debug!(tax_year = policy.tax_year, ?input, "Reduced estimate");
                let result = estimator.estimate(&input);
                reports.push(EstimateReport::from_reduced(policy, row.label.clone(), result));
            }
        } else {
            let estimator = JointEstimator::new(policy)
                .with_context(|| format!("Tax year {}", policy.tax_year))?;
            for row in rows {
                let input: EstimateInput = row.to_estimate_input();
                debug!(tax_year = policy.tax_year, ?input, "Joint estimate");
                let result = estimator.estimate(&input);
                reports.push(EstimateReport::from_full(policy, row.label.clone(), result));
            }
        }
    }

    Ok(reports)
}

fn main() -> Result<()> {
    init_tracing();
    let args = Args::parse();

    let policies = load_policies(&args)?;
    let rows = load_rows(&args)?;
    let reports = estimate_all(&args, &policies, &rows)?;

    if args.json {
        let out = serde_json::to_string_pretty(&reports).context("Failed to serialize reports")?;
        println!("{out}");
    } else {
        for (i, report) in reports.iter().enumerate() {
            if i > 0 {
                println!();
            }
            print!("{report}");
        }
    }

    Ok(())
}
