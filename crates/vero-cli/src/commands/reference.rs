use clap::{Args, ValueEnum};
use serde_json::{json, Value};

use vero_core::categories::{self, Category};
use vero_core::ledger::EntryKind;
use vero_core::types::with_metadata;

use crate::input::rates::RatesContext;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum KindArg {
    Income,
    Expense,
}

impl From<KindArg> for EntryKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Income => EntryKind::Income,
            KindArg::Expense => EntryKind::Expense,
        }
    }
}

/// Arguments for the category listing
#[derive(Args)]
pub struct CategoriesArgs {
    /// Only list categories of this kind
    #[arg(long)]
    pub kind: Option<KindArg>,
}

/// Arguments for the rates listing
#[derive(Args)]
pub struct RatesArgs {}

pub fn run_categories(args: CategoriesArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let list: Vec<&Category> = match args.kind {
        Some(kind) => categories::categories_by_kind(kind.into()).collect(),
        None => categories::CATEGORIES.iter().collect(),
    };
    Ok(serde_json::to_value(list)?)
}

pub fn run_rates(_args: RatesArgs, ctx: &RatesContext) -> Result<Value, Box<dyn std::error::Error>> {
    let rates = ctx.statutory(None)?;
    let output = with_metadata(
        "Statutory tables as configured for the fiscal year",
        &json!({ "fiscal_year": rates.fiscal_year }),
        Vec::new(),
        rates,
    );
    Ok(serde_json::to_value(output)?)
}
