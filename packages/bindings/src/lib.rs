use napi::Result as NapiResult;
use napi_derive::napi;
use serde::{Deserialize, Serialize};

use vero_core::compliance::{hetu, proof, validation};
use vero_core::ledger::{BankRecord, LedgerEntry, TaxCard};
use vero_core::rates::{RatesBook, StatutoryRates};
use vero_core::reconciliation::{apply, matcher};
use vero_core::tax::{calculator, card, ennakkovero, estimate, form5, yel};
use vero_core::{categories, VeroResult};

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

/// Parse the request, run `f`, serialise the answer.
fn call<I, O>(input_json: &str, f: impl FnOnce(I) -> VeroResult<O>) -> NapiResult<String>
where
    I: for<'de> Deserialize<'de>,
    O: Serialize,
{
    let input: I = serde_json::from_str(input_json).map_err(to_napi_error)?;
    let output = f(input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

/// Built-in rates for `year`, or the latest year when omitted.
fn statutory(year: Option<i32>) -> VeroResult<StatutoryRates> {
    let book = RatesBook::builtin();
    match year {
        Some(y) => book.for_year(y).cloned(),
        None => Ok(book.latest().cloned().unwrap_or_else(StatutoryRates::fiscal_2026)),
    }
}

#[derive(Deserialize)]
struct WithYear<T> {
    #[serde(default)]
    fiscal_year: Option<i32>,
    #[serde(flatten)]
    body: T,
}

// ---------------------------------------------------------------------------
// Tax
// ---------------------------------------------------------------------------

#[napi]
pub fn calculate_tax(input_json: String) -> NapiResult<String> {
    call(&input_json, |req: WithYear<calculator::TaxParams>| {
        let rates = statutory(req.fiscal_year)?;
        Ok(calculator::calculate_tax(&req.body, &rates.income_tax))
    })
}

#[napi]
pub fn calculate_yel(input_json: String) -> NapiResult<String> {
    call(&input_json, |req: WithYear<yel::YelParams>| {
        let rates = statutory(req.fiscal_year)?;
        Ok(yel::calculate_yel(&req.body, &rates.yel))
    })
}

#[napi]
pub fn compare_ennakkovero(input_json: String) -> NapiResult<String> {
    call(&input_json, |input: ennakkovero::EnnakkoveroInput| {
        Ok(ennakkovero::compare_ennakkovero(&input))
    })
}

#[derive(Deserialize)]
struct Form5Request {
    entries: Vec<form5::Form5Entry>,
}

#[napi]
pub fn generate_form5(input_json: String) -> NapiResult<String> {
    call(&input_json, |req: WithYear<Form5Request>| {
        let rates = statutory(req.fiscal_year)?;
        Ok(form5::generate_form5(&req.body.entries, &rates.depreciation))
    })
}

#[derive(Deserialize)]
struct EstimateRequest {
    #[serde(flatten)]
    estimate: estimate::EstimateInput,
    #[serde(default)]
    tax_card: Option<TaxCard>,
}

#[derive(Serialize)]
struct EstimateResponse {
    estimate: estimate::TaxEstimate,
    tax_card_comparison: Option<card::TaxCardComparison>,
}

#[napi]
pub fn estimate_ytd_tax(input_json: String) -> NapiResult<String> {
    call(&input_json, |req: EstimateRequest| {
        let rates = statutory(Some(req.estimate.fiscal_year))?;
        let estimate = estimate::estimate_ytd_tax(&req.estimate, &rates);
        let tax_card_comparison = req.tax_card.as_ref().and_then(|c| {
            card::compare_tax_card(c, estimate.tax.effective_rate, estimate.total_income_cents)
        });
        Ok(EstimateResponse {
            estimate,
            tax_card_comparison,
        })
    })
}

// ---------------------------------------------------------------------------
// Reconciliation
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
struct ReconcileRequest {
    bank_records: Vec<BankRecord>,
    entries: Vec<LedgerEntry>,
}

#[derive(Serialize)]
struct ReconcileResponse {
    matches: Vec<matcher::MatchCandidate>,
    write_back: apply::WriteBackPlan,
    summary: apply::ReconciliationSummary,
}

#[napi]
pub fn find_matches(input_json: String) -> NapiResult<String> {
    call(&input_json, |req: ReconcileRequest| {
        let matches = matcher::find_matches(&req.bank_records, &req.entries);
        Ok(ReconcileResponse {
            write_back: apply::plan_write_back(&matches, &req.entries),
            summary: apply::summarize(&req.bank_records, &req.entries, &matches),
            matches,
        })
    })
}

// ---------------------------------------------------------------------------
// Compliance
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
struct ComplianceRequest {
    entries: Vec<LedgerEntry>,
    #[serde(default)]
    tax_card: Option<TaxCard>,
}

#[derive(Serialize)]
struct ComplianceResponse {
    proof_status: proof::ProofStatus,
    depreciation_warnings: Vec<proof::DepreciationWarning>,
    prepayment_register: proof::PrepaymentRegisterStatus,
}

#[napi]
pub fn compliance_status(input_json: String) -> NapiResult<String> {
    call(&input_json, |req: WithYear<ComplianceRequest>| {
        let rates = statutory(req.fiscal_year)?;
        let entries = proof::entries_in_year(req.body.entries, req.fiscal_year);
        Ok(ComplianceResponse {
            proof_status: proof::proof_status(&entries),
            depreciation_warnings: proof::depreciation_warnings(&entries, &rates.depreciation),
            prepayment_register: proof::prepayment_register_status(req.body.tax_card.as_ref()),
        })
    })
}

#[derive(Deserialize)]
struct ValidateRequest {
    id: i64,
    entry: validation::NewEntry,
}

/// Validate a new entry and return it as it should be stored.
#[napi]
pub fn validate_entry(input_json: String) -> NapiResult<String> {
    call(&input_json, |req: ValidateRequest| {
        let date = validation::parse_iso_date(&req.entry.date)?;
        let rates = statutory(Some(validation::fiscal_year_of(date)))?;
        req.entry.into_ledger_entry(req.id, &rates.depreciation)
    })
}

#[napi]
pub fn detect_hetu(text: String) -> NapiResult<String> {
    serde_json::to_string(&hetu::detect_hetu(&text)).map_err(to_napi_error)
}

#[napi]
pub fn list_categories() -> NapiResult<String> {
    serde_json::to_string(&categories::CATEGORIES[..]).map_err(to_napi_error)
}
