use chrono::{Datelike, Local, NaiveDate};
use clap::Args;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::{json, Value};

use vero_core::ledger::{PrepaymentInstallment, TaxCard, TaxCardType};
use vero_core::tax::calculator::{self, TaxParams};
use vero_core::tax::card::{self, TaxCardComparison};
use vero_core::tax::ennakkovero::{self, EnnakkoveroInput, PrepaymentStatus};
use vero_core::tax::estimate::{self, EstimateInput};
use vero_core::tax::form5::{self, Form5Entry};
use vero_core::tax::yel::{self, YelParams};
use vero_core::types::{with_metadata, Cents, Rate};

use super::{read_input, read_input_opt};
use crate::input::rates::RatesContext;

/// Arguments for income tax calculation
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct TaxArgs {
    /// Earned income for the year, in cents (negative for a loss)
    #[arg(long)]
    pub income: Option<Cents>,

    /// Municipality whose tax rate applies
    #[arg(long)]
    pub municipality: Option<String>,

    /// Municipal rate (e.g. 0.185), overrides --municipality
    #[arg(long)]
    pub municipal_rate: Option<Rate>,

    /// Church member (adds church tax at the default rate)
    #[arg(long)]
    pub church: bool,

    /// YEL premiums paid, in cents
    #[arg(long, default_value = "0")]
    pub yel_paid: Cents,

    /// Skip the 5% entrepreneur deduction
    #[arg(long)]
    pub no_entrepreneur_deduction: bool,

    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

/// Arguments for YEL premium calculation
#[derive(Args)]
pub struct YelArgs {
    /// Confirmed YEL work income, in cents
    #[arg(long)]
    pub income: Option<Cents>,

    /// Within the first 48 months of entrepreneurship
    #[arg(long)]
    pub new_entrepreneur: bool,

    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

/// Arguments for the ennakkovero comparison
#[derive(Args)]
pub struct EnnakkoveroArgs {
    /// Path to JSON input file with installments and the year-to-date estimate
    #[arg(long)]
    pub input: Option<String>,
}

/// Arguments for Form 5 generation
#[derive(Args)]
pub struct Form5Args {
    /// Path to JSON input file with the fiscal year's entries
    #[arg(long)]
    pub input: Option<String>,
}

/// Arguments for the year-to-date estimate
#[derive(Args)]
pub struct EstimateArgs {
    /// Path to JSON input file with ledger entries and taxpayer details
    #[arg(long)]
    pub input: Option<String>,
}

/// Arguments for the tax card comparison
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct TaxCardArgs {
    /// Withholding percentage on the card (e.g. 32.5)
    #[arg(long)]
    pub card_rate: Option<Decimal>,

    /// Calculated effective tax rate (e.g. 0.2841)
    #[arg(long)]
    pub effective_rate: Option<Rate>,

    /// Income booked so far, in cents
    #[arg(long)]
    pub income: Option<Cents>,

    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

/// Ennakkovero input as read from a file; the date and month default to today.
#[derive(Deserialize)]
struct EnnakkoveroRequest {
    installments: Vec<PrepaymentInstallment>,
    estimated_ytd_tax_cents: Cents,
    #[serde(default)]
    current_month: Option<i32>,
    #[serde(default)]
    as_of: Option<NaiveDate>,
}

#[derive(Deserialize)]
struct Form5Request {
    #[serde(default)]
    fiscal_year: Option<i32>,
    entries: Vec<Form5Entry>,
}

#[derive(Deserialize)]
struct EstimateRequest {
    #[serde(flatten)]
    estimate: EstimateInput,
    #[serde(default)]
    tax_card: Option<TaxCard>,
}

#[derive(Deserialize)]
struct TaxCardRequest {
    card: TaxCard,
    effective_rate: Rate,
    income_cents: Cents,
}

pub fn run_tax(args: TaxArgs, ctx: &RatesContext) -> Result<Value, Box<dyn std::error::Error>> {
    let rates = ctx.statutory(None)?;
    let params: TaxParams = match read_input_opt(args.input.as_deref())? {
        Some(params) => params,
        None => TaxParams {
            earned_income_cents: args
                .income
                .ok_or("--income is required (or provide --input)")?,
            municipal_rate: args.municipal_rate.unwrap_or_else(|| {
                rates.municipal_rate(args.municipality.as_deref().unwrap_or_default())
            }),
            church_rate: if args.church {
                rates.default_church_rate
            } else {
                Decimal::ZERO
            },
            apply_entrepreneur_deduction: !args.no_entrepreneur_deduction,
            yel_contribution_cents: args.yel_paid,
        },
    };

    let result = calculator::calculate_tax(&params, &rates.income_tax);
    let mut warnings = Vec::new();
    if result.gross_income_cents <= 0 {
        warnings.push("No positive earned income; no tax is due".to_string());
    }

    let output = with_metadata(
        "Progressive state income tax with cumulative bracket bases, flat municipal and church tax",
        &json!({
            "fiscal_year": rates.fiscal_year,
            "municipal_rate": params.municipal_rate,
            "church_rate": params.church_rate,
            "entrepreneur_deduction_rate": rates.income_tax.entrepreneur_deduction_rate,
        }),
        warnings,
        result,
    );
    Ok(serde_json::to_value(output)?)
}

pub fn run_yel(args: YelArgs, ctx: &RatesContext) -> Result<Value, Box<dyn std::error::Error>> {
    let rates = ctx.statutory(None)?;
    let params: YelParams = match read_input_opt(args.input.as_deref())? {
        Some(params) => params,
        None => YelParams {
            yel_income_cents: args
                .income
                .ok_or("--income is required (or provide --input)")?,
            is_new_entrepreneur: args.new_entrepreneur,
        },
    };

    let result = yel::calculate_yel(&params, &rates.yel);
    let mut warnings = Vec::new();
    if result.yel_income_cents != params.yel_income_cents {
        warnings.push(format!(
            "YEL income {} c is outside the statutory range and was clamped to {} c",
            params.yel_income_cents, result.yel_income_cents
        ));
    }

    let output = with_metadata(
        "YEL premium: clamped work income x base rate, less the new-entrepreneur discount",
        &json!({
            "fiscal_year": rates.fiscal_year,
            "min_income_cents": rates.yel.min_income_cents,
            "max_income_cents": rates.yel.max_income_cents,
        }),
        warnings,
        result,
    );
    Ok(serde_json::to_value(output)?)
}

pub fn run_ennakkovero(args: EnnakkoveroArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let request: EnnakkoveroRequest =
        read_input(args.input.as_deref(), "the ennakkovero comparison")?;
    let as_of = request.as_of.unwrap_or_else(|| Local::now().date_naive());
    let input = EnnakkoveroInput {
        installments: request.installments,
        estimated_ytd_tax_cents: request.estimated_ytd_tax_cents,
        current_month: request.current_month.unwrap_or(as_of.month() as i32),
        as_of,
    };

    let result = ennakkovero::compare_ennakkovero(&input);
    let mut warnings = Vec::new();
    if result.total_scheduled_cents == 0 && input.estimated_ytd_tax_cents > 0 {
        warnings.push(
            "No installments scheduled; status reports on track although tax is accruing"
                .to_string(),
        );
    }
    if result.status == PrepaymentStatus::Critical {
        warnings.push(result.message.clone());
    }

    let output = with_metadata(
        "Year-to-date tax annualised by 12 / current month, compared with the scheduled total",
        &json!({
            "as_of": input.as_of,
            "current_month": input.current_month,
            "on_track_below": "10%",
            "critical_from": "30%",
        }),
        warnings,
        result,
    );
    Ok(serde_json::to_value(output)?)
}

pub fn run_form5(args: Form5Args, ctx: &RatesContext) -> Result<Value, Box<dyn std::error::Error>> {
    let request: Form5Request = read_input(args.input.as_deref(), "Form 5 generation")?;
    let rates = ctx.statutory(request.fiscal_year)?;

    let result = form5::generate_form5(&request.entries, &rates.depreciation);
    let output = with_metadata(
        "Form 5 aggregation with declining-balance depreciation of equipment",
        &json!({
            "fiscal_year": rates.fiscal_year,
            "depreciation_rate": rates.depreciation.rate,
            "depreciation_threshold_cents": rates.depreciation.threshold_cents,
        }),
        Vec::new(),
        result,
    );
    Ok(serde_json::to_value(output)?)
}

pub fn run_estimate(args: EstimateArgs, ctx: &RatesContext) -> Result<Value, Box<dyn std::error::Error>> {
    let request: EstimateRequest = read_input(args.input.as_deref(), "the tax estimate")?;
    let rates = ctx.statutory(Some(request.estimate.fiscal_year))?;

    let estimate = estimate::estimate_ytd_tax(&request.estimate, rates);
    let comparison = request.tax_card.as_ref().and_then(|c| {
        card::compare_tax_card(c, estimate.tax.effective_rate, estimate.total_income_cents)
    });

    let mut warnings = Vec::new();
    if estimate.yel_paid_cents == 0 {
        warnings.push(
            "No YEL premiums booked; the computed annual premium was deducted instead".to_string(),
        );
    }
    if let Some(c) = &comparison {
        warnings.extend(card_warning(c));
    }

    let output = with_metadata(
        "Ledger totals for the fiscal year run through the YEL and income tax calculators",
        &json!({
            "fiscal_year": rates.fiscal_year,
            "municipality": request.estimate.municipality,
            "church_member": request.estimate.church_member,
        }),
        warnings,
        json!({ "estimate": estimate, "tax_card_comparison": comparison }),
    );
    Ok(serde_json::to_value(output)?)
}

pub fn run_tax_card(args: TaxCardArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let request: TaxCardRequest = match read_input_opt(args.input.as_deref())? {
        Some(request) => request,
        None => TaxCardRequest {
            card: TaxCard {
                year: Local::now().year(),
                card_type: TaxCardType::Entrepreneur,
                base_rate_pct: args
                    .card_rate
                    .ok_or("--card-rate is required (or provide --input)")?,
                additional_rate_pct: None,
                income_limit_cents: None,
                in_prepayment_register: true,
            },
            effective_rate: args
                .effective_rate
                .ok_or("--effective-rate is required (or provide --input)")?,
            income_cents: args
                .income
                .ok_or("--income is required (or provide --input)")?,
        },
    };

    let result = card::compare_tax_card(&request.card, request.effective_rate, request.income_cents);
    let warnings = match &result {
        Some(c) => card_warning(c).into_iter().collect(),
        None => vec!["No income booked yet; nothing to compare".to_string()],
    };

    let output = with_metadata(
        "Tax card withholding compared with the effective rate, 2 percentage point tolerance",
        &json!({ "income_cents": request.income_cents }),
        warnings,
        result,
    );
    Ok(serde_json::to_value(output)?)
}

fn card_warning(comparison: &TaxCardComparison) -> Option<String> {
    (comparison.status == card::TaxCardStatus::Lower).then(|| comparison.message.clone())
}
