//! Test lookups: `CardLookup` implementations for handler and API tests.

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use binlist_core::lookup::{Bank, CardDetail, CardLookup, Country, LookupError, NumberFormat};

/// A Danish Visa debit range, as the public binlist service describes it.
#[must_use]
pub fn visa_debit_detail() -> CardDetail {
    CardDetail {
        scheme: Some("visa".to_owned()),
        card_type: Some("debit".to_owned()),
        brand: Some("Visa/Dankort".to_owned()),
        prepaid: Some(false),
        number: Some(NumberFormat {
            length: Some(16),
            luhn: Some(true),
        }),
        country: Some(Country {
            numeric: Some("208".to_owned()),
            alpha2: Some("DK".to_owned()),
            name: Some("Denmark".to_owned()),
            currency: Some("DKK".to_owned()),
            ..Country::default()
        }),
        bank: Some(Bank {
            name: Some("Jyske Bank".to_owned()),
            city: Some("Hjørring".to_owned()),
            ..Bank::default()
        }),
    }
}

/// Answers every lookup with the same detail and records requested BINs.
#[derive(Debug)]
pub struct StaticCardLookup {
    detail: CardDetail,
    bins: Mutex<Vec<String>>,
}

impl StaticCardLookup {
    /// Creates a lookup that always returns `detail`.
    #[must_use]
    pub fn new(detail: CardDetail) -> Self {
        Self {
            detail,
            bins: Mutex::new(Vec::new()),
        }
    }

    /// BINs requested so far, in call order.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn requested_bins(&self) -> Vec<String> {
        self.bins.lock().unwrap().clone()
    }

    /// Number of lookups performed.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn calls(&self) -> usize {
        self.bins.lock().unwrap().len()
    }
}

#[async_trait]
impl CardLookup for StaticCardLookup {
    async fn lookup(&self, bin: &str) -> Result<CardDetail, LookupError> {
        self.bins.lock().unwrap().push(bin.to_owned());
        Ok(self.detail.clone())
    }
}

/// Fails every lookup with the configured error.
#[derive(Debug)]
pub struct FailingCardLookup(pub LookupError);

#[async_trait]
impl CardLookup for FailingCardLookup {
    async fn lookup(&self, _bin: &str) -> Result<CardDetail, LookupError> {
        Err(self.0.clone())
    }
}

/// Never answers. Counts how many lookups were started.
#[derive(Debug, Default)]
pub struct StalledCardLookup {
    calls: AtomicUsize,
}

impl StalledCardLookup {
    /// Number of lookups started.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CardLookup for StalledCardLookup {
    async fn lookup(&self, _bin: &str) -> Result<CardDetail, LookupError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        std::future::pending().await
    }
}
