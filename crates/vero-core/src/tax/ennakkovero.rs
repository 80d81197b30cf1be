use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::ledger::PrepaymentInstallment;
use crate::money::{round_cents, round_rate, whole_percent};
use crate::types::{Cents, Rate};

/// Deviation below this share of the schedule is considered on track.
const ON_TRACK_THRESHOLD: Decimal = dec!(0.10);

/// Underpayment at or above this share of the schedule is critical.
const CRITICAL_THRESHOLD: Decimal = dec!(0.30);

const MONTHS_PER_YEAR: i32 = 12;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnnakkoveroInput {
    /// Installments of one year, in any order.
    pub installments: Vec<PrepaymentInstallment>,
    /// Tax estimated on income earned so far this year.
    pub estimated_ytd_tax_cents: Cents,
    /// Months elapsed, normally 1-12. Zero or negative projects with a factor of 12.
    pub current_month: i32,
    /// Date used to find the next installment due.
    pub as_of: NaiveDate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrepaymentStatus {
    OnTrack,
    /// Projected tax exceeds the schedule.
    Underpaying,
    /// Projected tax is below the schedule.
    Overpaying,
    /// Projected tax exceeds the schedule by 30% or more.
    Critical,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnnakkoveroComparison {
    pub total_scheduled_cents: Cents,
    pub total_paid_cents: Cents,
    pub remaining_cents: Cents,
    /// Year-to-date estimate annualised.
    pub projected_annual_tax_cents: Cents,
    /// Positive: back-tax expected. Negative: overpaying.
    pub difference_cents: Cents,
    /// |difference| / scheduled; zero when nothing is scheduled.
    pub deviation_ratio: Rate,
    pub status: PrepaymentStatus,
    pub message: String,
    pub next_installment: Option<PrepaymentInstallment>,
}

// ---------------------------------------------------------------------------
// Main calculation
// ---------------------------------------------------------------------------

/// Compare the assigned prepayment schedule against the income trajectory.
///
/// With no installments scheduled the deviation is defined as zero, which
/// reports `OnTrack` even when tax is owed.
pub fn compare_ennakkovero(input: &EnnakkoveroInput) -> EnnakkoveroComparison {
    let total_scheduled: Cents = input.installments.iter().map(|i| i.amount_cents).sum();
    let total_paid: Cents = input
        .installments
        .iter()
        .filter(|i| i.paid)
        .map(|i| i.amount_cents)
        .sum();

    let projection_factor = if input.current_month > 0 {
        Decimal::from(MONTHS_PER_YEAR) / Decimal::from(input.current_month)
    } else {
        Decimal::from(MONTHS_PER_YEAR)
    };
    let projected = round_cents(Decimal::from(input.estimated_ytd_tax_cents) * projection_factor);

    let difference = projected - total_scheduled;
    let deviation = if total_scheduled > 0 {
        Decimal::from(difference.unsigned_abs()) / Decimal::from(total_scheduled)
    } else {
        Decimal::ZERO
    };

    let status = classify(difference, deviation);
    let message = advisory_message(status, deviation);

    tracing::debug!(
        total_scheduled,
        projected,
        difference,
        status = ?status,
        "prepayment schedule compared"
    );

    EnnakkoveroComparison {
        total_scheduled_cents: total_scheduled,
        total_paid_cents: total_paid,
        remaining_cents: total_scheduled - total_paid,
        projected_annual_tax_cents: projected,
        difference_cents: difference,
        deviation_ratio: round_rate(deviation),
        status,
        message,
        next_installment: next_installment(&input.installments, input.as_of).cloned(),
    }
}

/// Earliest unpaid installment due on or after `as_of`. Ties keep input order.
pub fn next_installment(
    installments: &[PrepaymentInstallment],
    as_of: NaiveDate,
) -> Option<&PrepaymentInstallment> {
    installments
        .iter()
        .filter(|i| !i.paid && i.due_date >= as_of)
        .min_by_key(|i| i.due_date)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn classify(difference: Cents, deviation: Rate) -> PrepaymentStatus {
    if deviation < ON_TRACK_THRESHOLD {
        PrepaymentStatus::OnTrack
    } else if difference > 0 && deviation >= CRITICAL_THRESHOLD {
        PrepaymentStatus::Critical
    } else if difference > 0 {
        PrepaymentStatus::Underpaying
    } else {
        PrepaymentStatus::Overpaying
    }
}

fn advisory_message(status: PrepaymentStatus, deviation: Rate) -> String {
    let pct = whole_percent(deviation);
    match status {
        PrepaymentStatus::OnTrack => {
            "Ennakkovero on aikataulussa. Ei tarvetta muutoksille.".to_string()
        }
        PrepaymentStatus::Critical => format!(
            "Tulosi ylittavat ennakkoveropaatoksen {pct}%. Paivita ennakkovero OmaVerossa \
             valttaaksesi jaannoksen ja korot (8% viivastyskorko)."
        ),
        PrepaymentStatus::Underpaying => format!(
            "Tulosi ovat {pct}% yli ennakkoveropaatoksen. Harkitse ennakkoveron korotusta OmaVerossa."
        ),
        PrepaymentStatus::Overpaying => format!(
            "Tulosi ovat {pct}% alle ennakkoveropaatoksen. Voit hakea ennakkoveron alentamista OmaVerosta."
        ),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
