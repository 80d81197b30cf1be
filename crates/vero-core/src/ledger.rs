use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::Cents;

// ---------------------------------------------------------------------------
// Bookkeeping entries
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryKind {
    Income,
    Expense,
}

/// Supporting document (tosite) attached to an entry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VoucherKind {
    Receipt,
    BankStatement,
    Settlement,
    EInvoice,
    Manual,
    #[default]
    None,
}

impl VoucherKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            VoucherKind::Receipt => "receipt",
            VoucherKind::BankStatement => "bank_statement",
            VoucherKind::Settlement => "settlement",
            VoucherKind::EInvoice => "e_invoice",
            VoucherKind::Manual => "manual",
            VoucherKind::None => "none",
        }
    }

    pub fn is_present(&self) -> bool {
        *self != VoucherKind::None
    }
}

/// A manually recorded bookkeeping entry, as loaded by the host application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerEntry {
    pub id: i64,
    pub kind: EntryKind,
    pub date: NaiveDate,
    pub fiscal_year: i32,
    /// Always positive; the kind carries the direction.
    pub amount_cents: Cents,
    /// Key into the category table.
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub voucher_kind: VoucherKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub depreciation_years: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub depreciation_remaining_cents: Option<Cents>,
    /// Reference number copied from the bank statement, if known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bank_ref: Option<String>,
    #[serde(default)]
    pub reconciled: bool,
}

// ---------------------------------------------------------------------------
// Bank activity
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BankRecord {
    pub id: i64,
    pub date: NaiveDate,
    /// Signed: negative is an outflow, positive an inflow.
    pub amount_cents: Cents,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub counterpart: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub matched_entry_id: Option<i64>,
}

// ---------------------------------------------------------------------------
// Tax authority records
// ---------------------------------------------------------------------------

/// One ennakkovero (prepayment tax) installment assigned by the tax authority.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrepaymentInstallment {
    pub id: i64,
    pub year: i32,
    pub due_date: NaiveDate,
    pub amount_cents: Cents,
    #[serde(default)]
    pub paid: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaxCardType {
    Main,
    Secondary,
    Entrepreneur,
}

/// Verokortti: the withholding percentages issued for a year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxCard {
    pub year: i32,
    pub card_type: TaxCardType,
    /// Withholding percentage, e.g. 32.5 for 32.5%.
    pub base_rate_pct: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additional_rate_pct: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub income_limit_cents: Option<Cents>,
    /// Registered in ennakkoperintärekisteri.
    #[serde(default = "default_true")]
    pub in_prepayment_register: bool,
}

fn default_true() -> bool {
    true
}
