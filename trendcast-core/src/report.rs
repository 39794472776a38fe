//! Tabular views of pipeline outputs for report consumers.
//!
//! Undefined moving averages render as empty cells, never as zero.

use crate::domain::{ForecastSeries, PriceSeries};
use crate::metrics::Metrics;
use crate::table::Table;
use crate::trend::TrendAnnotatedSeries;

/// Conversion into a header-plus-rows table.
pub trait ToTable {
    fn to_table(&self) -> Table;
}

fn price(v: f64) -> String {
    if v.is_finite() {
        format!("{v:.2}")
    } else {
        String::new()
    }
}

fn optional_price(v: Option<f64>) -> String {
    v.map(price).unwrap_or_default()
}

impl ToTable for PriceSeries {
    fn to_table(&self) -> Table {
        let mut table = Table::new(["Date", "Close", "Volume"]);
        for bar in self {
            table.push_row([
                bar.date.to_string(),
                price(bar.close),
                bar.volume.map(|v| v.to_string()).unwrap_or_default(),
            ]);
        }
        table
    }
}

impl ToTable for TrendAnnotatedSeries {
    fn to_table(&self) -> Table {
        let mut table = Table::new(["Date", "Close", "Short_MA", "Long_MA", "Trend"]);
        for row in self.rows() {
            table.push_row([
                row.date.to_string(),
                price(row.close),
                optional_price(row.short_ma),
                optional_price(row.long_ma),
                row.regime.to_string(),
            ]);
        }
        table
    }
}

impl ToTable for ForecastSeries {
    fn to_table(&self) -> Table {
        let mut table = Table::new(["Date", "Predicted_Close"]);
        for point in self.points() {
            table.push_row([point.date.to_string(), price(point.predicted_close)]);
        }
        table
    }
}

impl ToTable for Metrics {
    fn to_table(&self) -> Table {
        Table::new(["Metric", "Value"])
            .with_row(["High".to_string(), format!("{:.2}", self.high)])
            .with_row(["Low".to_string(), format!("{:.2}", self.low)])
            .with_row([
                "Returns (%)".to_string(),
                format!("{:.2}", self.total_return_percent),
            ])
            .with_row(["Sharpe Ratio".to_string(), format!("{:.4}", self.sharpe_ratio)])
            .with_row(["Volatility".to_string(), format!("{:.4}", self.volatility)])
            .with_row(["Avg Return".to_string(), format!("{:.4}", self.avg_daily_return)])
    }
}

/// One-row summary table for a named stock.
pub fn summary_table(name: &str, metrics: &Metrics) -> Table {
    Table::new(["Stock Name", "High", "Low", "Returns (%)", "Sharpe Ratio"]).with_row([
        name.to_string(),
        format!("{:.2}", metrics.high),
        format!("{:.2}", metrics.low),
        format!("{:.2}", metrics.total_return_percent),
        format!("{:.2}", metrics.sharpe_ratio),
    ])
}
