//! Technical indicators over daily closes

use crate::error::{ResearchError, Result};
use crate::interface::formatter::group_thousands;
use crate::market::Bar;
use serde::{Deserialize, Serialize};
use std::fmt;
use ta::Next;
use ta::indicators::{ExponentialMovingAverage, SimpleMovingAverage};

const RSI_PERIOD: usize = 14;
const BAND_WINDOW: usize = 20;

/// Indicator values at the most recent bar
///
/// Windowed values are `None` when the history is shorter than the window.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TechnicalIndicators {
    pub sma_50: Option<f64>,
    pub sma_200: Option<f64>,
    pub rsi: Option<f64>,
    pub macd: f64,
    pub signal: f64,
    pub upper_band: Option<f64>,
    pub lower_band: Option<f64>,
    pub volume_avg: f64,
}

/// RSI reading
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RsiSignal {
    Overbought,
    Oversold,
    Neutral,
}

impl fmt::Display for RsiSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            RsiSignal::Overbought => "overbought",
            RsiSignal::Oversold => "oversold",
            RsiSignal::Neutral => "neutral",
        })
    }
}

/// MACD position relative to its signal line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MacdTrend {
    Bullish,
    Bearish,
    Neutral,
}

impl fmt::Display for MacdTrend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            MacdTrend::Bullish => "bullish",
            MacdTrend::Bearish => "bearish",
            MacdTrend::Neutral => "neutral",
        })
    }
}

impl TechnicalIndicators {
    /// Compute all indicators from bars ordered oldest first
    pub fn calculate(bars: &[Bar]) -> Result<Self> {
        if bars.is_empty() {
            return Err(ResearchError::Indicator(
                "no price data to calculate indicators".to_string(),
            ));
        }

        let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();

        let sma_50 = sma(&closes, 50)?;
        let sma_200 = sma(&closes, 200)?;

        let ema_12 = ema_series(&closes, 12)?;
        let ema_26 = ema_series(&closes, 26)?;
        let macd_series: Vec<f64> = ema_12.iter().zip(&ema_26).map(|(a, b)| a - b).collect();
        let signal_series = ema_series(&macd_series, 9)?;

        let std_20 = sample_std(tail(&closes, BAND_WINDOW));
        let upper_band = sma_50.zip(std_20).map(|(mid, std)| mid + 2.0 * std);
        let lower_band = sma_50.zip(std_20).map(|(mid, std)| mid - 2.0 * std);

        let volume_avg = bars.iter().map(|b| b.volume as f64).sum::<f64>() / bars.len() as f64;

        Ok(Self {
            sma_50,
            sma_200,
            rsi: rsi(&closes, RSI_PERIOD),
            macd: macd_series.last().copied().unwrap_or_default(),
            signal: signal_series.last().copied().unwrap_or_default(),
            upper_band,
            lower_band,
            volume_avg,
        })
    }

    /// Overbought above 70, oversold below 30
    pub fn rsi_signal(&self) -> Option<RsiSignal> {
        self.rsi.map(|rsi| {
            if rsi > 70.0 {
                RsiSignal::Overbought
            } else if rsi < 30.0 {
                RsiSignal::Oversold
            } else {
                RsiSignal::Neutral
            }
        })
    }

    pub fn macd_trend(&self) -> MacdTrend {
        if self.macd > self.signal {
            MacdTrend::Bullish
        } else if self.macd < self.signal {
            MacdTrend::Bearish
        } else {
            MacdTrend::Neutral
        }
    }
}

impl fmt::Display for TechnicalIndicators {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "SMA 50: {}", price_or_na(self.sma_50))?;
        writeln!(f, "SMA 200: {}", price_or_na(self.sma_200))?;
        match (self.rsi, self.rsi_signal()) {
            (Some(rsi), Some(signal)) => writeln!(f, "RSI (14): {rsi:.2} ({signal})")?,
            _ => writeln!(f, "RSI (14): N/A")?,
        }
        writeln!(f, "MACD: {:.4}", self.macd)?;
        writeln!(f, "MACD Signal: {:.4} ({})", self.signal, self.macd_trend())?;
        writeln!(f, "Upper Band: {}", price_or_na(self.upper_band))?;
        writeln!(f, "Lower Band: {}", price_or_na(self.lower_band))?;
        write!(f, "Average Volume: {}", group_thousands(self.volume_avg))
    }
}

fn price_or_na(value: Option<f64>) -> String {
    value.map_or_else(|| "N/A".to_string(), |v| format!("{v:.2}"))
}

fn tail(values: &[f64], n: usize) -> &[f64] {
    &values[values.len().saturating_sub(n)..]
}

/// Mean of the last `period` values
fn sma(values: &[f64], period: usize) -> Result<Option<f64>> {
    if values.len() < period {
        return Ok(None);
    }

    let mut sma =
        SimpleMovingAverage::new(period).map_err(|e| ResearchError::Indicator(e.to_string()))?;
    Ok(values.iter().fold(None, |_, &v| Some(sma.next(v))))
}

/// EMA seeded with the first value, `alpha = 2 / (span + 1)`
fn ema_series(values: &[f64], span: usize) -> Result<Vec<f64>> {
    let mut ema =
        ExponentialMovingAverage::new(span).map_err(|e| ResearchError::Indicator(e.to_string()))?;
    Ok(values.iter().map(|&v| ema.next(v)).collect())
}

/// RSI from simple means of gains and losses over the last `period` changes
fn rsi(closes: &[f64], period: usize) -> Option<f64> {
    if closes.len() <= period {
        return None;
    }

    let changes: Vec<f64> = tail(closes, period + 1)
        .windows(2)
        .map(|w| w[1] - w[0])
        .collect();
    let gain = changes.iter().filter(|d| **d > 0.0).sum::<f64>() / period as f64;
    let loss = -changes.iter().filter(|d| **d < 0.0).sum::<f64>() / period as f64;

    match (gain > 0.0, loss > 0.0) {
        (_, true) => Some(100.0 - 100.0 / (1.0 + gain / loss)),
        (true, false) => Some(100.0),
        (false, false) => None,
    }
}

/// Sample (n - 1) standard deviation
pub(crate) fn sample_std(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }

    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1.0);
    Some(variance.sqrt())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};

    fn bars_from(closes: &[f64]) -> Vec<Bar> {
        let start = Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap();
        closes
            .iter()
            .enumerate()
            .map(|(i, &close)| Bar {
                timestamp: start + Duration::days(i as i64),
                open: close,
                high: close + 1.0,
                low: close - 1.0,
                close,
                volume: 1_000 * (i as u64 + 1),
                adjclose: close,
            })
            .collect()
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-6
    }

    #[test]
    fn test_empty_history_is_an_error() {
        assert!(matches!(
            TechnicalIndicators::calculate(&[]),
            Err(ResearchError::Indicator(_))
        ));
    }

    #[test]
    fn test_short_history_leaves_windows_empty() {
        let bars = bars_from(&[10.0, 11.0, 12.0]);
        let indicators = TechnicalIndicators::calculate(&bars).unwrap();

        assert!(indicators.sma_50.is_none());
        assert!(indicators.sma_200.is_none());
        assert!(indicators.rsi.is_none());
        assert!(indicators.upper_band.is_none());
        assert!(approx(indicators.volume_avg, 2_000.0));
    }

    #[test]
    fn test_moving_averages() {
        let closes: Vec<f64> = (1..=60).map(f64::from).collect();
        let indicators = TechnicalIndicators::calculate(&bars_from(&closes)).unwrap();

        // mean of 11..=60
        assert!(approx(indicators.sma_50.unwrap(), 35.5));
        assert!(indicators.sma_200.is_none());
    }

    #[test]
    fn test_rsi_all_gains() {
        let closes: Vec<f64> = (1..=20).map(f64::from).collect();
        let indicators = TechnicalIndicators::calculate(&bars_from(&closes)).unwrap();
        assert!(approx(indicators.rsi.unwrap(), 100.0));
        assert_eq!(indicators.rsi_signal(), Some(RsiSignal::Overbought));
    }

    #[test]
    fn test_rsi_flat_prices_is_undefined() {
        let indicators = TechnicalIndicators::calculate(&bars_from(&[50.0; 30])).unwrap();
        assert!(indicators.rsi.is_none());
    }

    #[test]
    fn test_rsi_mixed() {
        // 14 changes alternating +2 / -1: gain 1.0, loss 0.5, rs 2
        let mut closes = vec![100.0];
        for i in 0..14 {
            let last = closes[closes.len() - 1];
            closes.push(if i % 2 == 0 { last + 2.0 } else { last - 1.0 });
        }
        let indicators = TechnicalIndicators::calculate(&bars_from(&closes)).unwrap();
        assert!(approx(indicators.rsi.unwrap(), 100.0 - 100.0 / 3.0));
        assert_eq!(indicators.rsi_signal(), Some(RsiSignal::Neutral));
    }

    #[test]
    fn test_macd_seeded_with_first_close() {
        let indicators = TechnicalIndicators::calculate(&bars_from(&[10.0, 12.0])).unwrap();

        // ema12 = 10 + (2/13)*2, ema26 = 10 + (2/27)*2
        let macd = 4.0 / 13.0 - 4.0 / 27.0;
        assert!(approx(indicators.macd, macd));
        // signal: 0 then 0 + 0.2 * macd
        assert!(approx(indicators.signal, 0.2 * macd));
        assert_eq!(indicators.macd_trend(), MacdTrend::Bullish);
    }

    #[test]
    fn test_bands_centre_on_sma_50() {
        let mut closes = vec![100.0; 50];
        closes.extend([90.0, 110.0].repeat(10));
        let indicators = TechnicalIndicators::calculate(&bars_from(&closes)).unwrap();

        let sma_50 = indicators.sma_50.unwrap();
        let std_20 = sample_std(&[90.0, 110.0].repeat(10)).unwrap();
        assert!(approx(indicators.upper_band.unwrap(), sma_50 + 2.0 * std_20));
        assert!(approx(indicators.lower_band.unwrap(), sma_50 - 2.0 * std_20));
    }

    #[test]
    fn test_sample_std() {
        assert!(approx(sample_std(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]).unwrap(), 2.138_089_935));
        assert!(sample_std(&[1.0]).is_none());
    }

    #[test]
    fn test_display() {
        let closes: Vec<f64> = (1..=20).map(f64::from).collect();
        let text = TechnicalIndicators::calculate(&bars_from(&closes))
            .unwrap()
            .to_string();

        assert!(text.contains("SMA 50: N/A"));
        assert!(text.contains("RSI (14): 100.00 (overbought)"));
        assert!(text.contains("(bullish)"));
        assert!(text.contains("Average Volume: 10,500"));
    }
}
