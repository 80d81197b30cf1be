//! Statutory constant tables, keyed by fiscal year.
//!
//! Every figure that changes with the tax year lives here so that several
//! years can be answered by the same process. The built-in book ships 2026;
//! further years are layered on from a rates file.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::depreciation::DepreciationPolicy;
use crate::error::VeroError;
use crate::types::{Cents, Money, Rate};
use crate::VeroResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// One band of the progressive state income tax schedule (euros).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxBracket {
    pub lower: Money,
    /// `None` for the open top band.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upper: Option<Money>,
    pub rate: Rate,
    /// Published cumulative tax at `lower`.
    pub base: Money,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IncomeTaxRates {
    /// Ordered by `lower`, ascending.
    pub state_brackets: Vec<TaxBracket>,
    /// Yrittäjävähennys.
    pub entrepreneur_deduction_rate: Rate,
}

impl IncomeTaxRates {
    /// The highest band whose lower bound is strictly below `taxable`.
    pub fn bracket_containing(&self, taxable: Money) -> Option<&TaxBracket> {
        self.state_brackets.iter().rev().find(|b| taxable > b.lower)
    }

    /// Band applying to the next euro earned: the containing band, or the
    /// lowest band when income has not yet entered any.
    pub fn bracket_for(&self, taxable: Money) -> Option<&TaxBracket> {
        self.bracket_containing(taxable)
            .or_else(|| self.state_brackets.first())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YelRates {
    pub base_rate: Rate,
    /// Discount for the first 48 months of entrepreneurship.
    pub new_entrepreneur_discount: Rate,
    pub min_income_cents: Cents,
    pub max_income_cents: Cents,
    /// Rough yearly pension accrual, informational only.
    pub accrual_rate: Rate,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatutoryRates {
    pub fiscal_year: i32,
    pub income_tax: IncomeTaxRates,
    pub yel: YelRates,
    pub depreciation: DepreciationPolicy,
    /// Kunnallisvero by municipality name.
    pub municipal_rates: BTreeMap<String, Rate>,
    pub default_municipal_rate: Rate,
    /// Evangelical Lutheran church tax.
    pub default_church_rate: Rate,
}

impl StatutoryRates {
    pub fn fiscal_2026() -> Self {
        let bracket = |lower: Decimal, upper: Option<Decimal>, rate: Decimal, base: Decimal| {
            TaxBracket {
                lower,
                upper,
                rate,
                base,
            }
        };

        let municipal_rates = [
            ("Helsinki", dec!(0.185)),
            ("Espoo", dec!(0.1775)),
            ("Tampere", dec!(0.1975)),
            ("Vantaa", dec!(0.19)),
            ("Oulu", dec!(0.2075)),
            ("Turku", dec!(0.1975)),
            ("Jyvaskyla", dec!(0.2075)),
            ("Kuopio", dec!(0.2125)),
            ("Lahti", dec!(0.2075)),
            ("Rovaniemi", dec!(0.2175)),
        ]
        .into_iter()
        .map(|(name, rate)| (name.to_string(), rate))
        .collect();

        Self {
            fiscal_year: 2026,
            income_tax: IncomeTaxRates {
                state_brackets: vec![
                    bracket(dec!(0), Some(dec!(20500)), dec!(0), dec!(0)),
                    bracket(dec!(20500), Some(dec!(30500)), dec!(0.064), dec!(0)),
                    bracket(dec!(30500), Some(dec!(50400)), dec!(0.1764), dec!(640)),
                    bracket(dec!(50400), Some(dec!(88200)), dec!(0.2132), dec!(4152.16)),
                    bracket(dec!(88200), None, dec!(0.3125), dec!(12215.68)),
                ],
                entrepreneur_deduction_rate: dec!(0.05),
            },
            yel: YelRates {
                base_rate: dec!(0.244),
                new_entrepreneur_discount: dec!(0.22),
                min_income_cents: 942_309,
                max_income_cents: 21_400_000,
                accrual_rate: dec!(0.015),
            },
            depreciation: DepreciationPolicy::statutory_2026(),
            municipal_rates,
            default_municipal_rate: dec!(0.185),
            default_church_rate: dec!(0.01),
        }
    }

    /// Municipal rate by name, falling back to the default rate.
    pub fn municipal_rate(&self, municipality: &str) -> Rate {
        self.municipal_rates
            .get(municipality)
            .copied()
            .unwrap_or(self.default_municipal_rate)
    }

    pub fn validate(&self) -> VeroResult<()> {
        let brackets = &self.income_tax.state_brackets;
        if brackets.is_empty() {
            return Err(VeroError::InvalidInput {
                field: "income_tax.state_brackets".into(),
                reason: format!("Fiscal year {} has no state tax brackets", self.fiscal_year),
            });
        }
        for pair in brackets.windows(2) {
            if pair[1].lower <= pair[0].lower {
                return Err(VeroError::InvalidInput {
                    field: "income_tax.state_brackets".into(),
                    reason: "Brackets must be ordered by ascending lower bound".into(),
                });
            }
        }
        if brackets.iter().any(|b| b.rate < Decimal::ZERO) {
            return Err(VeroError::InvalidInput {
                field: "income_tax.state_brackets".into(),
                reason: "Bracket rates must be non-negative".into(),
            });
        }
        if self.yel.min_income_cents > self.yel.max_income_cents {
            return Err(VeroError::InvalidInput {
                field: "yel".into(),
                reason: "Minimum YEL income exceeds maximum".into(),
            });
        }
        Ok(())
    }
}

/// Immutable mapping from fiscal year to its rates bundle.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RatesBook {
    years: BTreeMap<i32, StatutoryRates>,
}

impl RatesBook {
    pub fn builtin() -> Self {
        Self::default().with_year(StatutoryRates::fiscal_2026())
    }

    /// Parse a list of rate bundles, e.g. from a rates file.
    pub fn from_json(json: &str) -> VeroResult<Self> {
        let bundles: Vec<StatutoryRates> = serde_json::from_str(json)?;
        Self::from_bundles(bundles)
    }

    pub fn from_bundles(bundles: Vec<StatutoryRates>) -> VeroResult<Self> {
        let mut book = Self::default();
        for rates in bundles {
            rates.validate()?;
            book = book.with_year(rates);
        }
        Ok(book)
    }

    /// Add or replace one year.
    pub fn with_year(mut self, rates: StatutoryRates) -> Self {
        self.years.insert(rates.fiscal_year, rates);
        self
    }

    /// Layer `other` on top of `self`; years present in both come from `other`.
    pub fn merged(mut self, other: RatesBook) -> Self {
        self.years.extend(other.years);
        self
    }

    pub fn for_year(&self, fiscal_year: i32) -> VeroResult<&StatutoryRates> {
        self.years
            .get(&fiscal_year)
            .ok_or(VeroError::UnsupportedFiscalYear(fiscal_year))
    }

    pub fn years(&self) -> impl Iterator<Item = i32> + '_ {
        self.years.keys().copied()
    }

    pub fn latest(&self) -> Option<&StatutoryRates> {
        self.years.values().next_back()
    }
}
