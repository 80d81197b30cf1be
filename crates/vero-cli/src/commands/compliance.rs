use clap::Args;
use serde::Deserialize;
use serde_json::{json, Value};

use vero_core::compliance::validation::{self, NewEntry};
use vero_core::compliance::{hetu, proof};
use vero_core::ledger::{LedgerEntry, TaxCard};
use vero_core::types::with_metadata;

use super::read_input;
use crate::input::{self, rates::RatesContext};

/// Arguments for the compliance overview
#[derive(Args)]
pub struct ComplianceArgs {
    /// Path to JSON input file with `entries` and an optional `tax_card`
    #[arg(long)]
    pub input: Option<String>,
}

/// Arguments for new entry validation
#[derive(Args)]
pub struct ValidateArgs {
    /// Path to JSON input file with the entry
    #[arg(long)]
    pub input: Option<String>,

    /// Id to assign to the validated entry
    #[arg(long, default_value = "0")]
    pub id: i64,
}

/// Arguments for HETU detection
#[derive(Args)]
pub struct HetuArgs {
    /// Text to scan
    #[arg(long)]
    pub text: Option<String>,

    /// File to scan (plain text)
    #[arg(long)]
    pub file: Option<String>,
}

#[derive(Deserialize)]
struct ComplianceRequest {
    #[serde(default)]
    fiscal_year: Option<i32>,
    entries: Vec<LedgerEntry>,
    #[serde(default)]
    tax_card: Option<TaxCard>,
}

pub fn run_compliance(args: ComplianceArgs, ctx: &RatesContext) -> Result<Value, Box<dyn std::error::Error>> {
    let request: ComplianceRequest = read_input(args.input.as_deref(), "the compliance overview")?;
    let rates = ctx.statutory(request.fiscal_year)?;

    let entries = proof::entries_in_year(request.entries, request.fiscal_year);

    let proof_status = proof::proof_status(&entries);
    let depreciation_warnings = proof::depreciation_warnings(&entries, &rates.depreciation);
    let register = proof::prepayment_register_status(request.tax_card.as_ref());

    let mut warnings = Vec::new();
    if proof_status.missing_proof > 0 {
        warnings.push(format!("{} entries lack a tosite", proof_status.missing_proof));
    }
    if !depreciation_warnings.is_empty() {
        warnings.push(format!(
            "{} equipment purchase(s) above {} c must be depreciated",
            depreciation_warnings.len(),
            rates.depreciation.threshold_cents
        ));
    }
    warnings.extend(register.warning.clone());

    let output = with_metadata(
        "Tosite coverage per kirjanpitolaki, EVL depreciation threshold, prepayment register status",
        &json!({ "fiscal_year": request.fiscal_year }),
        warnings,
        json!({
            "proof_status": proof_status,
            "depreciation_warnings": depreciation_warnings,
            "prepayment_register": register,
        }),
    );
    Ok(serde_json::to_value(output)?)
}

pub fn run_validate(args: ValidateArgs, ctx: &RatesContext) -> Result<Value, Box<dyn std::error::Error>> {
    let entry: NewEntry = read_input(args.input.as_deref(), "entry validation")?;
    let date = validation::parse_iso_date(&entry.date)?;
    let rates = ctx.statutory(Some(validation::fiscal_year_of(date)))?;

    let mut warnings = Vec::new();
    if let Some(description) = &entry.description {
        if hetu::contains_hetu(description) {
            warnings.push("Description appears to contain a personal identity code".to_string());
        }
    }

    let stored = entry.into_ledger_entry(args.id, &rates.depreciation)?;
    let output = with_metadata(
        "Shape checks: ISO date, amount bounds, known category matching the entry kind",
        &json!({ "max_amount_cents": validation::MAX_AMOUNT_CENTS }),
        warnings,
        json!({ "valid": true, "entry": stored }),
    );
    Ok(serde_json::to_value(output)?)
}

pub fn run_hetu(args: HetuArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let text = if let Some(text) = args.text {
        text
    } else if let Some(ref path) = args.file {
        input::file::read_text(path)?
    } else if let Some(text) = input::stdin::read_stdin_text()? {
        text
    } else {
        return Err("--text, --file or stdin required for HETU detection".into());
    };

    let found = hetu::detect_hetu(&text);
    let output = with_metadata(
        "DDMMYYCZZZQ pattern scan with mod-31 check character validation",
        &json!({ "scanned_bytes": text.len() }),
        Vec::new(),
        json!({ "found": found.len(), "matches": found }),
    );
    Ok(serde_json::to_value(output)?)
}
