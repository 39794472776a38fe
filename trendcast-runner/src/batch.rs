//! Parallel analysis of independent series.
//!
//! Each series is analyzed on the rayon pool. Results come back in input
//! order regardless of scheduling.

use rayon::prelude::*;
use serde::Serialize;

use crate::cache::SourceCache;
use crate::source::{Fetched, PriceSource, SourceError, SourceKind};
use trendcast_core::{analyze, Analysis, PipelineConfig, PriceSeries};

/// One labelled analysis.
#[derive(Debug, Clone)]
pub struct BatchItem {
    pub label: String,
    pub kind: Option<SourceKind>,
    pub analysis: Analysis,
}

/// Compact per-label summary row for batch output.
#[derive(Debug, Clone, Serialize)]
pub struct BatchSummary<'a> {
    pub label: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<SourceKind>,
    #[serde(flatten)]
    pub analysis: trendcast_core::pipeline::AnalysisSummary<'a>,
}

impl BatchItem {
    pub fn summary(&self) -> BatchSummary<'_> {
        BatchSummary {
            label: &self.label,
            source: self.kind,
            analysis: self.analysis.summary(),
        }
    }
}

/// Analyze every `(label, series)` pair in parallel, preserving order.
pub fn analyze_batch(
    inputs: Vec<(String, PriceSeries)>,
    config: &PipelineConfig,
) -> Vec<BatchItem> {
    let items: Vec<BatchItem> = inputs
        .into_par_iter()
        .map(|(label, series)| BatchItem {
            analysis: analyze(&series, config),
            label,
            kind: None,
        })
        .collect();
    tracing::debug!(count = items.len(), "batch analyzed");
    items
}

/// Fetch every symbol through `cache` and analyze the ones that loaded.
///
/// Output order follows `symbols`; each entry is either an analysis or the
/// fetch error for that symbol.
pub fn analyze_symbols(
    symbols: &[String],
    source: &dyn PriceSource,
    cache: &SourceCache,
    config: &PipelineConfig,
) -> Vec<(String, Result<BatchItem, SourceError>)> {
    symbols
        .par_iter()
        .map(|symbol| {
            let result = cache.get_or_fetch(symbol, source).map(
                |Fetched {
                     symbol,
                     series,
                     kind,
                 }| BatchItem {
                    analysis: analyze(&series, config),
                    label: symbol,
                    kind: Some(kind),
                },
            );
            if let Err(e) = &result {
                tracing::warn!(symbol = %symbol, error = %e, "fetch failed");
            }
            (symbol.clone(), result)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::SyntheticSource;
    use chrono::NaiveDate;
    use trendcast_core::TimeWindow;

    fn series(start_price: f64, step: f64, n: usize) -> PriceSeries {
        let closes: Vec<f64> = (0..n).map(|i| start_price + step * i as f64).collect();
        PriceSeries::from_closes(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(), &closes).unwrap()
    }

    #[test]
    fn batch_preserves_input_order() {
        let inputs: Vec<(String, PriceSeries)> = (0..40)
            .map(|i| (format!("S{i}"), series(100.0 + i as f64, 1.0, 60)))
            .collect();
        let out = analyze_batch(inputs, &PipelineConfig::default());

        assert_eq!(out.len(), 40);
        for (i, item) in out.iter().enumerate() {
            assert_eq!(item.label, format!("S{i}"));
            assert_eq!(item.analysis.metrics.low, 100.0 + i as f64);
        }
    }

    #[test]
    fn batch_matches_sequential_analysis() {
        let config = PipelineConfig {
            window: TimeWindow::OneMonth,
            ..PipelineConfig::default()
        };
        let s = series(50.0, -0.2, 90);
        let out = analyze_batch(vec![("X".into(), s.clone())], &config);
        assert_eq!(out[0].analysis, analyze(&s, &config));
    }

    #[test]
    fn symbols_go_through_cache() {
        let source = SyntheticSource::new(3)
            .with_days(40)
            .with_end(NaiveDate::from_ymd_opt(2024, 2, 9).unwrap());
        let cache = SourceCache::default();
        let symbols = vec!["INFY".to_string(), "TCS".to_string(), "INFY.NS".to_string()];

        let out = analyze_symbols(&symbols, &source, &cache, &PipelineConfig::default());
        assert_eq!(out.len(), 3);
        assert_eq!(out[0].0, "INFY");
        let first = out[0].1.as_ref().unwrap();
        assert_eq!(first.label, "INFY.NS");
        assert_eq!(first.kind, Some(SourceKind::Synthetic));
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn summary_flattens_analysis() {
        let inputs = vec![("A".into(), series(10.0, 1.0, 5))];
        let out = analyze_batch(inputs, &PipelineConfig::default());
        let json = serde_json::to_value(out[0].summary()).unwrap();
        assert_eq!(json["label"], "A");
        assert_eq!(json["rows"], 5);
        assert!(json.get("source").is_none());
    }
}
