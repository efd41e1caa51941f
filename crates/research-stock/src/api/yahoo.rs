//! Yahoo Finance API client

use super::RetryPolicy;
use super::quote_summary::{self, MODULES};
use crate::config::ResearchConfig;
use crate::error::{ResearchError, Result};
use crate::market::{Bar, CompanySnapshot, HistoryRange, MarketDataSource};
use crate::ticker::Ticker;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use governor::clock::DefaultClock;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter};
use reqwest::{Client, StatusCode};
use serde_json::Value;
use std::num::NonZeroU32;
use std::sync::Arc;
use time::OffsetDateTime;
use tokio::sync::Mutex;
use tracing::{debug, instrument};
use yahoo_finance_api as yahoo;

const COOKIE_URL: &str = "https://fc.yahoo.com";
const CRUMB_URL: &str = "https://query1.finance.yahoo.com/v1/test/getcrumb";
const QUOTE_SUMMARY_URL: &str = "https://query2.finance.yahoo.com/v10/finance/quoteSummary";
const USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0 Safari/537.36";
const PROVIDER: &str = "Yahoo Finance";

type SharedRateLimiter = Arc<RateLimiter<NotKeyed, InMemoryState, DefaultClock>>;

/// Map `yahoo_finance_api` failures so transport errors and throttling are retried
fn yahoo_error(err: yahoo::YahooError) -> ResearchError {
    match err {
        yahoo::YahooError::ConnectionFailed(e) => ResearchError::Connection(e.to_string()),
        yahoo::YahooError::TooManyRequests(_) => ResearchError::RateLimited {
            provider: PROVIDER.to_string(),
        },
        other => ResearchError::YahooFinance(other.to_string()),
    }
}

/// Yahoo Finance client
///
/// Price history goes through `yahoo_finance_api`. Fundamentals come from the
/// quoteSummary endpoint, which needs a session cookie and a matching crumb.
pub struct YahooFinanceClient {
    connector: yahoo::YahooConnector,
    http: Client,
    crumb: Mutex<Option<String>>,
    rate_limiter: SharedRateLimiter,
    retry: RetryPolicy,
}

impl YahooFinanceClient {
    /// Create a client using the timeouts, quota and retry settings of `config`
    pub fn new(config: &ResearchConfig) -> Result<Self> {
        let connector =
            yahoo::YahooConnector::new().map_err(|e| ResearchError::YahooFinance(e.to_string()))?;

        let http = Client::builder()
            .cookie_store(true)
            .user_agent(USER_AGENT)
            .timeout(config.request_timeout)
            .build()?;

        let quota = Quota::per_minute(
            NonZeroU32::new(config.yahoo_requests_per_minute).unwrap_or(NonZeroU32::MIN),
        );

        Ok(Self {
            connector,
            http,
            crumb: Mutex::new(None),
            rate_limiter: Arc::new(RateLimiter::direct(quota)),
            retry: RetryPolicy::from_config(config),
        })
    }

    /// Daily bars between two instants, oldest first
    pub async fn history_between(
        &self,
        ticker: &Ticker,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Bar>> {
        let start_odt = OffsetDateTime::from_unix_timestamp(start.timestamp())
            .map_err(|e| ResearchError::YahooFinance(format!("Invalid start timestamp: {e}")))?;
        let end_odt = OffsetDateTime::from_unix_timestamp(end.timestamp())
            .map_err(|e| ResearchError::YahooFinance(format!("Invalid end timestamp: {e}")))?;

        self.rate_limiter.until_ready().await;

        let response = self
            .connector
            .get_quote_history(ticker.as_str(), start_odt, end_odt)
            .await
            .map_err(yahoo_error)?;

        let quotes = response.quotes().map_err(yahoo_error)?;

        Ok(quotes
            .iter()
            .filter_map(|q| {
                Some(Bar {
                    timestamp: DateTime::from_timestamp(q.timestamp as i64, 0)?,
                    open: q.open,
                    high: q.high,
                    low: q.low,
                    close: q.close,
                    volume: q.volume,
                    adjclose: q.adjclose,
                })
            })
            .collect())
    }

    /// Current crumb, performing the cookie handshake on first use
    async fn crumb(&self) -> Result<String> {
        let mut cached = self.crumb.lock().await;
        if let Some(crumb) = cached.as_ref() {
            return Ok(crumb.clone());
        }

        // fc.yahoo.com answers 404 but sets the session cookie
        let _ = self.http.get(COOKIE_URL).send().await?;

        let response = self.http.get(CRUMB_URL).send().await?;
        if response.status() == StatusCode::TOO_MANY_REQUESTS {
            return Err(ResearchError::RateLimited {
                provider: PROVIDER.to_string(),
            });
        }

        let crumb = response.text().await?.trim().to_string();
        if crumb.is_empty() || crumb.contains('<') || crumb.contains(' ') {
            return Err(ResearchError::YahooFinance(
                "failed to obtain session crumb".to_string(),
            ));
        }

        debug!("Obtained Yahoo session crumb");
        *cached = Some(crumb.clone());
        Ok(crumb)
    }

    async fn send_quote_summary(&self, url: &str, modules: &str) -> Result<reqwest::Response> {
        let crumb = self.crumb().await?;
        self.rate_limiter.until_ready().await;

        Ok(self
            .http
            .get(url)
            .query(&[("modules", modules), ("crumb", crumb.as_str())])
            .send()
            .await?)
    }

    async fn fetch_quote_summary(&self, ticker: &Ticker) -> Result<Value> {
        let url = format!("{QUOTE_SUMMARY_URL}/{ticker}");
        let modules = MODULES.join(",");

        let mut response = self.send_quote_summary(&url, &modules).await?;

        // A stale crumb is answered with 401; refresh it once
        if response.status() == StatusCode::UNAUTHORIZED {
            debug!("Yahoo crumb rejected, refreshing");
            *self.crumb.lock().await = None;
            response = self.send_quote_summary(&url, &modules).await?;
        }

        check_quote_summary_status(response.status())?;
        Ok(response.json().await?)
    }
}

/// Statuses whose body is worth parsing
///
/// Unknown symbols come back as 404 with an error body.
fn check_quote_summary_status(status: StatusCode) -> Result<()> {
    match status {
        StatusCode::UNAUTHORIZED => Err(ResearchError::YahooFinance(
            "quoteSummary rejected the session crumb".to_string(),
        )),
        StatusCode::TOO_MANY_REQUESTS => Err(ResearchError::RateLimited {
            provider: PROVIDER.to_string(),
        }),
        status if status.is_success() || status == StatusCode::NOT_FOUND => Ok(()),
        status => Err(ResearchError::YahooFinance(format!("HTTP {status}"))),
    }
}

#[async_trait]
impl MarketDataSource for YahooFinanceClient {
    #[instrument(skip(self), fields(ticker = %ticker))]
    async fn history(&self, ticker: &Ticker, range: HistoryRange) -> Result<Vec<Bar>> {
        let end = Utc::now();
        let start = range.start_from(end);
        self.retry
            .run("Yahoo history", || self.history_between(ticker, start, end))
            .await
    }

    #[instrument(skip(self), fields(ticker = %ticker))]
    async fn snapshot(&self, ticker: &Ticker) -> Result<CompanySnapshot> {
        let body = self
            .retry
            .run("Yahoo quoteSummary", || self.fetch_quote_summary(ticker))
            .await?;
        quote_summary::parse_snapshot(ticker, &body)
    }
}
