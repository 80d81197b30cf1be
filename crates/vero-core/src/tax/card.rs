use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::ledger::TaxCard;
use crate::types::{Cents, Rate};

/// Withholding within this many rate points of the effective rate matches.
const TOLERANCE: Decimal = dec!(0.02);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaxCardStatus {
    /// Withholding exceeds the effective rate; a refund is likely.
    Higher,
    /// Withholding falls short of the effective rate; back-tax is likely.
    Lower,
    Matches,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxCardComparison {
    pub card_rate_pct: Decimal,
    pub calculated_effective_rate_pct: Decimal,
    /// Card rate minus effective rate, percentage points.
    pub difference_pp: Decimal,
    pub status: TaxCardStatus,
    pub message: String,
}

/// Compare the verokortti withholding percentage with the calculated
/// effective tax rate. Nothing is compared before any income is booked.
pub fn compare_tax_card(
    card: &TaxCard,
    effective_rate: Rate,
    income_cents: Cents,
) -> Option<TaxCardComparison> {
    if income_cents <= 0 {
        return None;
    }

    let withholding = card.base_rate_pct / dec!(100);
    let card_pct = card.base_rate_pct.normalize();
    let effective_pct = to_pct(effective_rate);
    let difference = to_pct(withholding - effective_rate);

    let (status, message) = if withholding > effective_rate + TOLERANCE {
        (
            TaxCardStatus::Higher,
            format!(
                "Verokorttisi pidatysprosentti ({card_pct}%) on {difference} prosenttiyksikkoa \
                 todellista veroastettasi ({effective_pct}%) korkeampi."
            ),
        )
    } else if withholding < effective_rate - TOLERANCE {
        (
            TaxCardStatus::Lower,
            format!(
                "Verokorttisi pidatysprosentti ({card_pct}%) on {} prosenttiyksikkoa \
                 todellista veroastettasi ({effective_pct}%) matalampi. Harkitse korotusta.",
                to_pct(effective_rate - withholding)
            ),
        )
    } else {
        (
            TaxCardStatus::Matches,
            format!(
                "Verokorttisi pidatysprosentti ({card_pct}%) vastaa hyvin todellista \
                 veroastettasi ({effective_pct}%)."
            ),
        )
    };

    Some(TaxCardComparison {
        card_rate_pct: card_pct,
        calculated_effective_rate_pct: effective_pct,
        difference_pp: difference,
        status,
        message,
    })
}

/// Rate to percent with one decimal.
fn to_pct(rate: Rate) -> Decimal {
    (rate * dec!(100))
        .round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero)
        .normalize()
}
