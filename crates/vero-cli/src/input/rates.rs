use std::path::Path;

use vero_core::rates::{RatesBook, StatutoryRates};

use crate::input::file;

/// Statutory rates available to a command, plus the year chosen with `--year`.
pub struct RatesContext {
    book: RatesBook,
    year: Option<i32>,
}

impl RatesContext {
    /// Built-in rates, extended or overridden by an optional rates file.
    pub fn load(path: Option<&str>, year: Option<i32>) -> Result<Self, Box<dyn std::error::Error>> {
        let mut book = RatesBook::builtin();
        if let Some(path) = path {
            let bundles: Vec<StatutoryRates> = if is_yaml(path) {
                file::read_yaml(path)?
            } else {
                file::read_json(path)?
            };
            tracing::debug!(path, bundles = bundles.len(), "rates file loaded");
            book = book.merged(RatesBook::from_bundles(bundles)?);
        }
        Ok(Self { book, year })
    }

    /// Rates for `year`, else `--year`, else the latest configured year.
    pub fn statutory(&self, year: Option<i32>) -> Result<&StatutoryRates, Box<dyn std::error::Error>> {
        match year.or(self.year) {
            Some(y) => Ok(self.book.for_year(y)?),
            None => self
                .book
                .latest()
                .ok_or_else(|| "No statutory rates configured".into()),
        }
    }
}

fn is_yaml(path: &str) -> bool {
    matches!(
        Path::new(path).extension().and_then(|e| e.to_str()),
        Some("yaml" | "yml")
    )
}
