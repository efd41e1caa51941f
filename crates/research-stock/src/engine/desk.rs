//! The research desk: data collection, computed inputs and LLM chains

use super::progress::{AnalysisMode, BasicSection, ProgressReporter, Stage, StageObserver};
use super::report::{BasicReport, ResearchReport};
use crate::analysis::{PriceSummary, TechnicalIndicators, ValuationMetrics};
use crate::api::YahooFinanceClient;
use crate::cache::CachedMarketData;
use crate::config::ResearchConfig;
use crate::error::Result;
use crate::interface::formatter::format_basic_info;
use crate::market::{self, MarketDataSource};
use crate::prompts::{names, register_prompts};
use crate::ticker::Ticker;
use chrono::Utc;
use research_chain::{LlmChain, SequentialChain};
use research_core::{Chain, ChainValues};
use research_llm::LLMProvider;
use research_prompt::PromptRegistry;
use serde_json::Value;
use std::sync::Arc;
use std::time::Instant;
use tracing::{Instrument, info, info_span, warn};
use uuid::Uuid;

const FUNDAMENTAL_ANALYSIS: &str = "fundamental_analysis";
const TECHNICAL_ANALYSIS: &str = "technical_analysis";
pub(super) const RECOMMENDATION: &str = "recommendation";
pub(super) const RESEARCH_REPORT: &str = "research_report";
pub(super) const ANALYSIS_REPORT: &str = "analysis_report";

/// Runs research flows against a market data source and an LLM provider
pub struct ResearchDesk {
    source: Arc<dyn MarketDataSource>,
    provider: Arc<dyn LLMProvider>,
    config: ResearchConfig,
    registry: PromptRegistry,
}

impl ResearchDesk {
    /// Create a desk over an arbitrary data source
    pub fn new(
        source: Arc<dyn MarketDataSource>,
        provider: Arc<dyn LLMProvider>,
        config: ResearchConfig,
    ) -> Result<Self> {
        config.validate()?;

        let registry = PromptRegistry::new();
        register_prompts(&registry)?;

        Ok(Self {
            source,
            provider,
            config,
            registry,
        })
    }

    /// Create a desk backed by a cached Yahoo Finance client
    pub fn with_yahoo(provider: Arc<dyn LLMProvider>, config: ResearchConfig) -> Result<Self> {
        let client = YahooFinanceClient::new(&config)?;
        let source = Arc::new(CachedMarketData::from_config(client, &config));
        Self::new(source, provider, config)
    }

    pub fn config(&self) -> &ResearchConfig {
        &self.config
    }

    fn llm_chain(&self, name: &str, prompt: &str, output_key: &str) -> Result<Arc<dyn Chain>> {
        Ok(Arc::new(LlmChain::new(
            name,
            self.registry.require(prompt)?,
            Arc::clone(&self.provider),
            self.config.llm_settings(),
            output_key,
        )))
    }

    fn professional_pipeline(&self) -> Result<SequentialChain> {
        Ok(SequentialChain::builder("professional")
            .input_variables([
                "ticker",
                "info",
                "valuation_metrics",
                "technical_indicators",
                "price_data",
            ])
            .step(self.llm_chain("fundamental", names::FUNDAMENTAL, FUNDAMENTAL_ANALYSIS)?)
            .step(self.llm_chain("technical", names::TECHNICAL, TECHNICAL_ANALYSIS)?)
            .step(self.llm_chain("recommendation", names::RECOMMENDATION, RECOMMENDATION)?)
            .output_variables([FUNDAMENTAL_ANALYSIS, TECHNICAL_ANALYSIS, RECOMMENDATION])
            .build()?)
    }

    fn basic_pipeline(&self) -> Result<SequentialChain> {
        Ok(SequentialChain::builder("basic")
            .input_variables(["ticker", "stock_data"])
            .step(self.llm_chain("basic.research", names::BASIC_RESEARCH, RESEARCH_REPORT)?)
            .step(self.llm_chain("basic.analysis", names::BASIC_ANALYSIS, ANALYSIS_REPORT)?)
            .step(self.llm_chain(
                "basic.recommendation",
                names::BASIC_RECOMMENDATION,
                RECOMMENDATION,
            )?)
            .output_variables([RESEARCH_REPORT, ANALYSIS_REPORT, RECOMMENDATION])
            .build()?)
    }

    /// Institutional-grade analysis: fundamentals, technicals, recommendation
    pub async fn professional_analysis(
        &self,
        ticker: &Ticker,
        progress: &dyn ProgressReporter,
    ) -> Result<ResearchReport> {
        let run_id = Uuid::new_v4();
        let span = info_span!("analysis", %ticker, %run_id, mode = "professional");
        self.run_professional(ticker, run_id, progress)
            .instrument(span)
            .await
    }

    async fn run_professional(
        &self,
        ticker: &Ticker,
        run_id: Uuid,
        progress: &dyn ProgressReporter,
    ) -> Result<ResearchReport> {
        progress.analysis_started(ticker, AnalysisMode::Professional);
        let started = Instant::now();

        progress.stage(Stage::CollectingData);
        let data = market::collect(self.source.as_ref(), ticker, self.config.history_range)
            .await?;

        progress.stage(Stage::CalculatingIndicators);
        let indicators = TechnicalIndicators::calculate(&data.history)?;
        let price_summary = PriceSummary::describe(&data.history)?;

        progress.stage(Stage::AnalyzingFundamentals);
        let valuation = ValuationMetrics::from_snapshot(&data.snapshot);

        let values = ChainValues::new()
            .with("ticker", Value::from(ticker.as_str()))
            .with("info", Value::from(data.snapshot.to_prompt_json()?))
            .with("valuation_metrics", Value::from(valuation.to_prompt_json()?))
            .with("technical_indicators", Value::from(indicators.to_string()))
            .with("price_data", Value::from(price_summary.to_string()));

        let observer = StageObserver::new(progress);
        let outputs = self
            .professional_pipeline()?
            .run(values, Some(&observer))
            .await?;

        let elapsed = started.elapsed();
        info!(elapsed_ms = elapsed.as_millis() as u64, "Professional analysis complete");

        Ok(ResearchReport {
            run_id,
            ticker: ticker.clone(),
            fundamental_analysis: outputs.require_str(FUNDAMENTAL_ANALYSIS)?.to_string(),
            technical_analysis: outputs.require_str(TECHNICAL_ANALYSIS)?.to_string(),
            recommendation: outputs.require_str(RECOMMENDATION)?.to_string(),
            indicators,
            valuation,
            generated_at: Utc::now(),
            elapsed,
        })
    }

    /// Lighter analysis: basic info, research, analysis, recommendation
    ///
    /// A failed snapshot does not abort the run; the error text takes the
    /// place of the basic information block.
    pub async fn basic_analysis(
        &self,
        ticker: &Ticker,
        progress: &dyn ProgressReporter,
    ) -> Result<BasicReport> {
        let run_id = Uuid::new_v4();
        let span = info_span!("analysis", %ticker, %run_id, mode = "basic");
        self.run_basic(ticker, run_id, progress)
            .instrument(span)
            .await
    }

    async fn run_basic(
        &self,
        ticker: &Ticker,
        run_id: Uuid,
        progress: &dyn ProgressReporter,
    ) -> Result<BasicReport> {
        progress.analysis_started(ticker, AnalysisMode::Basic);
        let started = Instant::now();

        let basic_info = match self.source.snapshot(ticker).await {
            Ok(snapshot) => format_basic_info(&snapshot),
            Err(e) => {
                warn!(error = %e, "Snapshot unavailable");
                format!("Error fetching stock info: {e}")
            }
        };
        progress.section(BasicSection::BasicInfo, &basic_info);

        let values = ChainValues::new()
            .with("ticker", Value::from(ticker.as_str()))
            .with("stock_data", Value::from(basic_info.as_str()));

        let observer = StageObserver::new(progress);
        let outputs = self.basic_pipeline()?.run(values, Some(&observer)).await?;

        let elapsed = started.elapsed();
        info!(elapsed_ms = elapsed.as_millis() as u64, "Basic analysis complete");

        Ok(BasicReport {
            run_id,
            ticker: ticker.clone(),
            basic_info,
            research_report: outputs.require_str(RESEARCH_REPORT)?.to_string(),
            analysis_report: outputs.require_str(ANALYSIS_REPORT)?.to_string(),
            recommendation: outputs.require_str(RECOMMENDATION)?.to_string(),
            generated_at: Utc::now(),
            elapsed,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::SilentProgress;
    use crate::error::ResearchError;
    use crate::market::{Bar, CompanySnapshot, HistoryRange};
    use async_trait::async_trait;
    use chrono::{Duration, TimeZone};
    use mockall::mock;
    use std::sync::Mutex;
    use research_llm::{
        CompletionRequest, CompletionResponse, LLMError, Message, StopReason, TokenUsage,
    };

    mock! {
        pub Provider {}

        #[async_trait]
        impl LLMProvider for Provider {
            async fn complete(&self, request: CompletionRequest) -> research_llm::Result<CompletionResponse>;
            fn name(&self) -> &str;
        }
    }

    struct FakeSource {
        closes: Vec<f64>,
        snapshot_fails: bool,
    }

    #[async_trait]
    impl MarketDataSource for FakeSource {
        async fn history(&self, _ticker: &Ticker, _range: HistoryRange) -> Result<Vec<Bar>> {
            let start = Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap();
            Ok(self
                .closes
                .iter()
                .enumerate()
                .map(|(i, &close)| Bar {
                    timestamp: start + Duration::days(i as i64),
                    open: close,
                    high: close,
                    low: close,
                    close,
                    volume: 1_000,
                    adjclose: close,
                })
                .collect())
        }

        async fn snapshot(&self, ticker: &Ticker) -> Result<CompanySnapshot> {
            if self.snapshot_fails {
                return Err(ResearchError::YahooFinance("Not Found".to_string()));
            }
            Ok(CompanySnapshot {
                long_name: Some("Tesla, Inc.".to_string()),
                trailing_pe: Some(70.23),
                ..CompanySnapshot::new(ticker)
            })
        }
    }

    fn reply(text: &str) -> CompletionResponse {
        CompletionResponse {
            message: Message::assistant(text),
            stop_reason: StopReason::EndTurn,
            usage: TokenUsage::default(),
        }
    }

    /// Answers each prompt with a label derived from its first line
    fn echoing_provider() -> MockProvider {
        let mut provider = MockProvider::new();
        provider.expect_name().return_const("mock".to_string());
        provider.expect_complete().returning(|request| {
            let prompt = &request.messages[0].content;
            let answer = if prompt.starts_with("Perform comprehensive fundamental") {
                "FUNDAMENTAL"
            } else if prompt.starts_with("Perform technical") {
                "TECHNICAL"
            } else if prompt.starts_with("Generate institutional") {
                assert!(prompt.contains("FUNDAMENTAL"));
                assert!(prompt.contains("TECHNICAL"));
                "RECOMMEND"
            } else if prompt.starts_with("Analyze the following") {
                "RESEARCH"
            } else if prompt.starts_with("Based on this research") {
                "ANALYSIS"
            } else {
                "BASIC RECOMMEND"
            };
            Ok(reply(answer))
        });
        provider
    }

    fn desk(source: FakeSource, provider: MockProvider) -> ResearchDesk {
        ResearchDesk::new(
            Arc::new(source),
            Arc::new(provider),
            ResearchConfig::default(),
        )
        .unwrap()
    }

    fn tsla() -> Ticker {
        Ticker::parse("TSLA").unwrap()
    }

    #[tokio::test]
    async fn test_professional_analysis() {
        let source = FakeSource {
            closes: (1..=60).map(f64::from).collect(),
            snapshot_fails: false,
        };
        let desk = desk(source, echoing_provider());

        let report = desk
            .professional_analysis(&tsla(), &SilentProgress)
            .await
            .unwrap();

        assert_eq!(report.ticker, tsla());
        assert_eq!(report.fundamental_analysis, "FUNDAMENTAL");
        assert_eq!(report.technical_analysis, "TECHNICAL");
        assert_eq!(report.recommendation, "RECOMMEND");
        assert_eq!(report.valuation.valuation.pe_ratio, Some(70.23));
        assert!(report.indicators.sma_50.is_some());
    }

    #[tokio::test]
    async fn test_professional_analysis_reports_collection_failure() {
        let source = FakeSource {
            closes: vec![250.0],
            snapshot_fails: true,
        };
        let mut provider = MockProvider::new();
        provider.expect_complete().never();

        let err = desk(source, provider)
            .professional_analysis(&tsla(), &SilentProgress)
            .await
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Failed to fetch data for TSLA: Yahoo Finance error: Not Found"
        );
    }

    #[tokio::test]
    async fn test_llm_failure_surfaces_as_chain_error() {
        let source = FakeSource {
            closes: vec![250.0, 251.0],
            snapshot_fails: false,
        };
        let mut provider = MockProvider::new();
        provider.expect_name().return_const("mock".to_string());
        provider
            .expect_complete()
            .times(1)
            .returning(|_| Err(LLMError::RateLimitExceeded("slow down".to_string())));

        let err = desk(source, provider)
            .professional_analysis(&tsla(), &SilentProgress)
            .await
            .unwrap_err();
        assert!(matches!(err, ResearchError::Chain(_)));
    }

    #[tokio::test]
    async fn test_basic_analysis_continues_without_snapshot() {
        let source = FakeSource {
            closes: Vec::new(),
            snapshot_fails: true,
        };
        let report = desk(source, echoing_provider())
            .basic_analysis(&tsla(), &SilentProgress)
            .await
            .unwrap();

        assert_eq!(
            report.basic_info,
            "Error fetching stock info: Yahoo Finance error: Not Found"
        );
        assert_eq!(report.research_report, "RESEARCH");
        assert_eq!(report.analysis_report, "ANALYSIS");
        assert_eq!(report.recommendation, "BASIC RECOMMEND");
    }

    #[derive(Default)]
    struct Sections(Mutex<Vec<(BasicSection, String)>>);

    impl ProgressReporter for Sections {
        fn section(&self, section: BasicSection, text: &str) {
            self.0.lock().unwrap().push((section, text.to_string()));
        }
    }

    #[tokio::test]
    async fn test_basic_sections_arrive_as_they_finish() {
        let source = FakeSource {
            closes: Vec::new(),
            snapshot_fails: false,
        };
        let mut provider = MockProvider::new();
        provider.expect_name().return_const("mock".to_string());
        let mut calls = 0;
        provider.expect_complete().returning(move |_| {
            calls += 1;
            if calls == 1 {
                Ok(reply("RESEARCH"))
            } else {
                Err(LLMError::RateLimitExceeded("slow down".to_string()))
            }
        });

        let sections = Sections::default();
        let result = desk(source, provider).basic_analysis(&tsla(), &sections).await;

        assert!(matches!(result, Err(ResearchError::Chain(_))));
        let sections = sections.0.lock().unwrap();
        assert_eq!(sections.len(), 2);
        assert_eq!(sections[0].0, BasicSection::BasicInfo);
        assert!(sections[0].1.starts_with("Name: Tesla, Inc.\n"));
        assert_eq!(sections[1], (BasicSection::Research, "RESEARCH".to_string()));
    }
}
