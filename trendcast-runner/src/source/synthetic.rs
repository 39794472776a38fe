//! Synthetic sample data for offline use.
//!
//! Closes scatter uniformly within ±2% of a base price taken from a small
//! catalog of sample quotes; volumes are uniform in [1M, 5M]. Output is
//! deterministic for a given seed, symbol, length and end date. Series built
//! here are tagged synthetic and are meant for demos and tests only.

use chrono::{Days, NaiveDate, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::{PriceSource, SourceError, SourceKind};
use trendcast_core::{PriceBar, PriceSeries, SeriesError};

/// Reference quote for one listed symbol.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SampleQuote {
    pub symbol: &'static str,
    pub price: f64,
    pub high_52w: f64,
    pub low_52w: f64,
}

impl SampleQuote {
    const fn new(symbol: &'static str, price: f64, high_52w: f64, low_52w: f64) -> Self {
        Self {
            symbol,
            price,
            high_52w,
            low_52w,
        }
    }
}

/// Sample quotes; the first entry stands in for unknown symbols.
pub const SAMPLE_QUOTES: &[SampleQuote] = &[
    SampleQuote::new("TATAMOTORS.NS", 800.50, 900.75, 650.25),
    SampleQuote::new("RELIANCE.NS", 2500.75, 2800.50, 2200.25),
    SampleQuote::new("INFY.NS", 1500.25, 1700.50, 1300.75),
    SampleQuote::new("HDFCBANK.NS", 1600.50, 1800.25, 1400.50),
    SampleQuote::new("TCS.NS", 3500.75, 3800.50, 3200.25),
    SampleQuote::new("ICICIBANK.NS", 900.25, 1000.50, 800.25),
    SampleQuote::new("BHARTIARTL.NS", 850.50, 900.75, 700.25),
    SampleQuote::new("HINDUNILVR.NS", 2500.25, 2800.50, 2200.25),
    SampleQuote::new("KOTAKBANK.NS", 1800.50, 2000.75, 1600.25),
    SampleQuote::new("WIPRO.NS", 450.25, 500.50, 400.25),
    SampleQuote::new("AXISBANK.NS", 950.75, 1050.25, 850.50),
    SampleQuote::new("BAJAJFINSV.NS", 1500.50, 1650.75, 1350.25),
    SampleQuote::new("BAJFINANCE.NS", 6500.25, 7000.50, 6000.25),
    SampleQuote::new("HCLTECH.NS", 1200.75, 1300.50, 1100.25),
    SampleQuote::new("ITC.NS", 400.50, 450.75, 350.25),
    SampleQuote::new("LT.NS", 3200.25, 3500.50, 2900.25),
    SampleQuote::new("MARUTI.NS", 9000.75, 9500.50, 8500.25),
    SampleQuote::new("NESTLEIND.NS", 22000.50, 23000.75, 21000.25),
    SampleQuote::new("ONGC.NS", 200.25, 220.50, 180.25),
    SampleQuote::new("POWERGRID.NS", 250.75, 280.50, 220.25),
    SampleQuote::new("SUNPHARMA.NS", 1200.50, 1300.75, 1100.25),
    SampleQuote::new("TECHM.NS", 1100.25, 1200.50, 1000.25),
    SampleQuote::new("ULTRACEMCO.NS", 8000.75, 8500.50, 7500.25),
    SampleQuote::new("ASIANPAINT.NS", 3000.50, 3200.75, 2800.25),
    SampleQuote::new("BAJAJ-AUTO.NS", 4000.25, 4200.50, 3800.25),
    SampleQuote::new("BRITANNIA.NS", 4500.75, 4700.50, 4300.25),
    SampleQuote::new("CIPLA.NS", 1200.50, 1300.75, 1100.25),
    SampleQuote::new("DRREDDY.NS", 5500.25, 5800.50, 5200.25),
    SampleQuote::new("EICHERMOT.NS", 3500.75, 3700.50, 3300.25),
    SampleQuote::new("GRASIM.NS", 1800.50, 1900.75, 1700.25),
    SampleQuote::new("HDFCLIFE.NS", 600.25, 650.50, 550.25),
    SampleQuote::new("HEROMOTOCO.NS", 3000.75, 3200.50, 2800.25),
    SampleQuote::new("INDUSINDBK.NS", 1400.50, 1500.75, 1300.25),
    SampleQuote::new("JSWSTEEL.NS", 800.25, 850.50, 750.25),
    SampleQuote::new("M&M.NS", 1500.75, 1600.50, 1400.25),
    SampleQuote::new("NTPC.NS", 200.50, 220.75, 180.25),
    SampleQuote::new("SBILIFE.NS", 1200.25, 1300.50, 1100.25),
    SampleQuote::new("SHREECEM.NS", 25000.75, 26000.50, 24000.25),
    SampleQuote::new("TATACONSUM.NS", 800.50, 850.75, 750.25),
    SampleQuote::new("TATASTEEL.NS", 120.25, 130.50, 110.25),
    SampleQuote::new("UPL.NS", 600.75, 650.50, 550.25),
    SampleQuote::new("ADANIPORTS.NS", 800.50, 850.75, 750.25),
    SampleQuote::new("APOLLOHOSP.NS", 5000.25, 5200.50, 4800.25),
    SampleQuote::new("BAJAJHLDNG.NS", 7000.75, 7300.50, 6700.25),
    SampleQuote::new("BPCL.NS", 400.50, 420.75, 380.25),
    SampleQuote::new("COALINDIA.NS", 300.25, 320.50, 280.25),
    SampleQuote::new("DIVISLAB.NS", 3500.75, 3700.50, 3300.25),
    SampleQuote::new("HINDALCO.NS", 500.50, 520.75, 480.25),
    SampleQuote::new("IOC.NS", 150.25, 160.50, 140.25),
    SampleQuote::new("SBIN.NS", 600.75, 650.50, 550.25),
    SampleQuote::new("TATAPOWER.NS", 300.50, 320.75, 280.25),
];

/// Catalog entry for `symbol`, or the first entry when it is not listed.
pub fn sample_quote(symbol: &str) -> &'static SampleQuote {
    SAMPLE_QUOTES
        .iter()
        .find(|q| q.symbol.eq_ignore_ascii_case(symbol))
        .unwrap_or(&SAMPLE_QUOTES[0])
}

/// Seeded sample-data source.
#[derive(Debug, Clone, Copy)]
pub struct SyntheticSource {
    seed: u64,
    days: usize,
    end: NaiveDate,
}

impl SyntheticSource {
    pub const DEFAULT_DAYS: usize = 365;
    pub const MAX_DAILY_MOVE: f64 = 0.02;
    pub const MIN_VOLUME: u64 = 1_000_000;
    pub const MAX_VOLUME: u64 = 5_000_000;

    /// One year of rows ending today.
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            days: Self::DEFAULT_DAYS,
            end: Utc::now().date_naive(),
        }
    }

    pub fn with_days(mut self, days: usize) -> Self {
        self.days = days;
        self
    }

    pub fn with_end(mut self, end: NaiveDate) -> Self {
        self.end = end;
        self
    }

    /// Per-symbol seed: BLAKE3 over the master seed and the symbol bytes, so
    /// different symbols draw different rows under the same seed.
    pub fn symbol_seed(&self, symbol: &str) -> u64 {
        let mut hasher = blake3::Hasher::new();
        hasher.update(&self.seed.to_le_bytes());
        hasher.update(symbol.as_bytes());
        let hash = hasher.finalize();
        let mut head = [0u8; 8];
        head.copy_from_slice(&hash.as_bytes()[..8]);
        u64::from_le_bytes(head)
    }

    /// Build `days` consecutive daily rows ending at the configured date.
    pub fn generate(&self, symbol: &str) -> Result<PriceSeries, SeriesError> {
        if self.days == 0 {
            return Err(SeriesError::Empty);
        }
        let start = self
            .end
            .checked_sub_days(Days::new(self.days as u64 - 1))
            .ok_or(SeriesError::DateOverflow { index: 0 })?;

        let base = sample_quote(symbol).price;
        let mut rng = StdRng::seed_from_u64(self.symbol_seed(symbol));

        let mut bars = Vec::with_capacity(self.days);
        for date in start.iter_days().take(self.days) {
            let change: f64 = rng.gen_range(-Self::MAX_DAILY_MOVE..=Self::MAX_DAILY_MOVE);
            let volume = rng.gen_range(Self::MIN_VOLUME..=Self::MAX_VOLUME);
            bars.push(PriceBar::new(date, base * (1.0 + change)).with_volume(volume));
        }

        tracing::debug!(symbol, rows = bars.len(), base, "generated synthetic closes");
        PriceSeries::new(bars)
    }
}

impl PriceSource for SyntheticSource {
    fn name(&self) -> &str {
        "synthetic"
    }

    fn kind(&self) -> SourceKind {
        SourceKind::Synthetic
    }

    fn fetch(&self, symbol: &str) -> Result<PriceSeries, SourceError> {
        Ok(self.generate(symbol)?)
    }
}
