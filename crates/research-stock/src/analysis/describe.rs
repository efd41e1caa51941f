//! Summary statistics of a price history

use super::technical::sample_std;
use crate::error::{ResearchError, Result};
use crate::market::Bar;
use comfy_table::presets::ASCII_MARKDOWN;
use comfy_table::{CellAlignment, Table};
use std::fmt;

/// Count, mean, spread and quartiles of one column
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnStats {
    pub name: &'static str,
    pub count: usize,
    pub mean: f64,
    pub std: Option<f64>,
    pub min: f64,
    pub q25: f64,
    pub q50: f64,
    pub q75: f64,
    pub max: f64,
}

impl ColumnStats {
    fn from_values(name: &'static str, values: &[f64]) -> Self {
        let mut sorted = values.to_vec();
        sorted.sort_by(f64::total_cmp);

        Self {
            name,
            count: values.len(),
            mean: values.iter().sum::<f64>() / values.len() as f64,
            std: sample_std(values),
            min: sorted[0],
            q25: quantile(&sorted, 0.25),
            q50: quantile(&sorted, 0.50),
            q75: quantile(&sorted, 0.75),
            max: sorted[sorted.len() - 1],
        }
    }
}

/// Linear interpolation between the closest ranks of a sorted slice
fn quantile(sorted: &[f64], q: f64) -> f64 {
    let position = q * (sorted.len() - 1) as f64;
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;
    sorted[lower] + (sorted[upper] - sorted[lower]) * (position - lower as f64)
}

/// Per-column statistics of the OHLCV history
#[derive(Debug, Clone, PartialEq)]
pub struct PriceSummary {
    pub columns: Vec<ColumnStats>,
}

impl PriceSummary {
    pub fn describe(bars: &[Bar]) -> Result<Self> {
        if bars.is_empty() {
            return Err(ResearchError::Indicator(
                "no price data to summarize".to_string(),
            ));
        }

        let column = |name, field: fn(&Bar) -> f64| {
            let values: Vec<f64> = bars.iter().map(field).collect();
            ColumnStats::from_values(name, &values)
        };

        Ok(Self {
            columns: vec![
                column("Open", |b| b.open),
                column("High", |b| b.high),
                column("Low", |b| b.low),
                column("Close", |b| b.close),
                column("Volume", |b| b.volume as f64),
            ],
        })
    }

    pub fn column(&self, name: &str) -> Option<&ColumnStats> {
        self.columns.iter().find(|c| c.name == name)
    }

    fn to_table(&self) -> Table {
        let mut table = Table::new();
        table.load_preset(ASCII_MARKDOWN);

        let mut header = vec![String::new()];
        header.extend(self.columns.iter().map(|c| c.name.to_string()));
        table.set_header(header);

        let rows: [(&str, fn(&ColumnStats) -> String); 8] = [
            ("count", |c| format!("{:.1}", c.count as f64)),
            ("mean", |c| format!("{:.2}", c.mean)),
            ("std", |c| c.std.map_or_else(|| "NaN".to_string(), |s| format!("{s:.2}"))),
            ("min", |c| format!("{:.2}", c.min)),
            ("25%", |c| format!("{:.2}", c.q25)),
            ("50%", |c| format!("{:.2}", c.q50)),
            ("75%", |c| format!("{:.2}", c.q75)),
            ("max", |c| format!("{:.2}", c.max)),
        ];

        for (label, render) in rows {
            let mut row = vec![label.to_string()];
            row.extend(self.columns.iter().map(render));
            table.add_row(row);
        }

        for column in table.column_iter_mut().skip(1) {
            column.set_cell_alignment(CellAlignment::Right);
        }

        table
    }
}

impl fmt::Display for PriceSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_table())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn bar(close: f64, volume: u64) -> Bar {
        Bar {
            timestamp: Utc.with_ymd_and_hms(2024, 10, 1, 0, 0, 0).unwrap(),
            open: close - 1.0,
            high: close + 2.0,
            low: close - 2.0,
            close,
            volume,
            adjclose: close,
        }
    }

    #[test]
    fn test_describe_close_column() {
        let bars: Vec<Bar> = [1.0, 2.0, 3.0, 4.0]
            .iter()
            .map(|&c| bar(c, 100))
            .collect();
        let summary = PriceSummary::describe(&bars).unwrap();
        let close = summary.column("Close").unwrap();

        assert_eq!(close.count, 4);
        assert!((close.mean - 2.5).abs() < 1e-9);
        assert!((close.std.unwrap() - 1.290_994_448_7).abs() < 1e-9);
        assert!((close.min - 1.0).abs() < 1e-9);
        assert!((close.q25 - 1.75).abs() < 1e-9);
        assert!((close.q50 - 2.5).abs() < 1e-9);
        assert!((close.q75 - 3.25).abs() < 1e-9);
        assert!((close.max - 4.0).abs() < 1e-9);
    }

    #[test]
    fn test_single_bar_has_no_std() {
        let summary = PriceSummary::describe(&[bar(250.0, 1_000)]).unwrap();
        let volume = summary.column("Volume").unwrap();
        assert!(volume.std.is_none());
        assert!((volume.q75 - 1_000.0).abs() < 1e-9);
        assert!(summary.to_string().contains("NaN"));
    }

    #[test]
    fn test_table_rendering() {
        let bars = vec![bar(10.0, 100), bar(20.0, 300)];
        let text = PriceSummary::describe(&bars).unwrap().to_string();

        for label in ["Open", "High", "Low", "Close", "Volume", "count", "mean", "25%", "max"] {
            assert!(text.contains(label), "missing {label} in\n{text}");
        }
        assert!(text.contains("15.00"));
        assert!(text.contains("200.00"));
    }

    #[test]
    fn test_empty_history() {
        assert!(PriceSummary::describe(&[]).is_err());
    }
}
