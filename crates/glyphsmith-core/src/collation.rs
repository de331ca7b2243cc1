//! Icon name ordering
//!
//! Icon order decides code point assignment, so it has to be explicit and
//! identical on every platform. The default policy is a root-locale ICU
//! collator with numeric ordering (`icon-2` before `icon-10`) that ignores
//! case and accents.

use std::cmp::Ordering;

use icu::collator::options::{CollatorOptions, Strength};
use icu::collator::preferences::CollationNumericOrdering;
use icu::collator::{Collator, CollatorBorrowed, CollatorPreferences};

use crate::error::{Error, Result};

/// Comparison policy used to order icon names
pub trait Collation: Send + Sync {
    /// Compare two icon names
    fn compare(&self, a: &str, b: &str) -> Ordering;

    /// Compare two names, falling back to byte order when the collation
    /// considers them equal, so sorting is total.
    fn compare_total(&self, a: &str, b: &str) -> Ordering {
        self.compare(a, b).then_with(|| a.cmp(b))
    }
}

/// Numeric-aware, case-insensitive, locale-independent collation
pub struct NaturalCollation {
    collator: CollatorBorrowed<'static>,
}

impl NaturalCollation {
    /// Build the collator from compiled root-locale data
    pub fn new() -> Result<Self> {
        let mut prefs = CollatorPreferences::default();
        prefs.numeric_ordering = Some(CollationNumericOrdering::True);

        let mut options = CollatorOptions::default();
        options.strength = Some(Strength::Primary);

        let collator = Collator::try_new(prefs, options).map_err(|e| Error::Config {
            message: format!("collation data unavailable: {e}"),
        })?;

        Ok(Self { collator })
    }
}

impl Collation for NaturalCollation {
    fn compare(&self, a: &str, b: &str) -> Ordering {
        self.collator.compare(a, b)
    }
}

/// Plain byte-wise ordering
#[derive(Debug, Clone, Copy, Default)]
pub struct BytewiseCollation;

impl Collation for BytewiseCollation {
    fn compare(&self, a: &str, b: &str) -> Ordering {
        a.cmp(b)
    }
}
