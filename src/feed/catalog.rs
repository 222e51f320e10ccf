use tracing::{debug, warn};

use crate::feed::CurrencyListSource;

/// Used when the currency list cannot be fetched.
pub const FALLBACK_CURRENCIES: [&str; 2] = ["USD", "EUR"];

/// Sorted, de-duplicated currency codes for the selectors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrencyCatalog {
    codes: Vec<String>,
    is_fallback: bool,
}

impl Default for CurrencyCatalog {
    fn default() -> Self {
        Self::fallback()
    }
}

impl CurrencyCatalog {
    #[must_use]
    pub fn fallback() -> Self {
        Self {
            codes: FALLBACK_CURRENCIES.iter().map(|code| (*code).to_owned()).collect(),
            is_fallback: true,
        }
    }

    /// Normalizes codes to upper case; an empty list yields the fallback.
    #[must_use]
    pub fn from_codes<I, S>(codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut codes: Vec<String> = codes
            .into_iter()
            .map(|code| code.as_ref().trim().to_ascii_uppercase())
            .filter(|code| !code.is_empty())
            .collect();
        codes.sort();
        codes.dedup();
        if codes.is_empty() {
            return Self::fallback();
        }
        Self {
            codes,
            is_fallback: false,
        }
    }

    pub fn load<S>(source: &S) -> Self
    where
        S: CurrencyListSource + ?Sized,
    {
        match source.fetch_currency_codes() {
            Ok(codes) => {
                let catalog = Self::from_codes(codes);
                debug!(count = catalog.codes.len(), "loaded currency list");
                catalog
            }
            Err(err) => {
                warn!(error = %err, "currency list unavailable, using fallback");
                Self::fallback()
            }
        }
    }

    #[must_use]
    pub fn codes(&self) -> &[String] {
        &self.codes
    }

    #[must_use]
    pub fn is_fallback(&self) -> bool {
        self.is_fallback
    }

    #[must_use]
    pub fn position(&self, code: &str) -> Option<usize> {
        self.codes
            .iter()
            .position(|candidate| candidate.eq_ignore_ascii_case(code))
    }

    /// Selector indices for a pair. Unknown codes map to the first and
    /// second entries, clamped to the list length.
    #[must_use]
    pub fn selection_for(&self, base: &str, target: &str) -> (usize, usize) {
        let last = self.codes.len().saturating_sub(1);
        let base_index = self.position(base).unwrap_or(0);
        let target_index = self.position(target).unwrap_or(1.min(last));
        (base_index, target_index)
    }
}
