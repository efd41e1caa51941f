//! Command-line interface for stock-research

mod repl;

use clap::{Parser, ValueEnum};
use research_llm::providers::{OpenAIConfig, OpenAIProvider};
use research_stock::{AnalysisMode, ConsoleProgress, ResearchConfig, ResearchDesk};
use std::io;
use std::sync::Arc;
use tracing::info;

const PROFESSIONAL_BANNER: &str = r"
    #############################################
    #  INSTITUTIONAL STOCK ANALYSIS PLATFORM    #
    #  ---------------------------------------- #
    #  Provides professional-grade analysis for #
    #  fund managers and serious investors     #
    #############################################
    ";

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Mode {
    /// Fundamental, technical and recommendation reports
    Professional,
    /// Basic info, research, analysis and recommendation
    Basic,
}

impl From<Mode> for AnalysisMode {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Professional => AnalysisMode::Professional,
            Mode::Basic => AnalysisMode::Basic,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "stock-research", version)]
#[command(about = "LLM-written stock research reports from Yahoo Finance data", long_about = None)]
struct Args {
    /// Chat model (overrides RESEARCH_MODEL)
    #[arg(long)]
    model: Option<String>,

    /// Sampling temperature (overrides RESEARCH_TEMPERATURE)
    #[arg(long)]
    temperature: Option<f32>,

    /// OpenAI-compatible API base URL (overrides GROQ_API_BASE)
    #[arg(long)]
    api_base: Option<String>,

    /// Analysis flow
    #[arg(long, value_enum, default_value_t = Mode::Professional)]
    mode: Mode,

    /// Analyze a single ticker and exit
    #[arg(short, long)]
    ticker: Option<String>,

    /// Debug-level logging on stderr
    #[arg(short, long)]
    verbose: bool,
}

fn print_banner(mode: AnalysisMode) {
    match mode {
        AnalysisMode::Professional => println!("{PROFESSIONAL_BANNER}"),
        AnalysisMode::Basic => {
            println!("📈 Stock Analysis CLI Tool");
            println!("{}", "-".repeat(25));
        }
    }
}

fn build_desk(args: &Args) -> anyhow::Result<ResearchDesk> {
    let mut llm_config = OpenAIConfig::from_env()?;
    if let Some(api_base) = &args.api_base {
        llm_config = llm_config.with_api_base(api_base);
    }
    let provider = Arc::new(OpenAIProvider::with_config(llm_config)?);

    let mut config = ResearchConfig::from_env()?;
    if let Some(model) = &args.model {
        config.model.clone_from(model);
    }
    if let Some(temperature) = args.temperature {
        config.temperature = temperature;
    }

    info!(
        provider = provider.config().api_base.as_str(),
        model = %config.model,
        "Research desk configured"
    );
    Ok(ResearchDesk::with_yahoo(provider, config)?)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    research_utils::init_environment(args.verbose);

    let mode = AnalysisMode::from(args.mode);
    let desk = build_desk(&args)?;

    if let Some(ticker) = &args.ticker {
        if !repl::analyze(&desk, mode, ticker, &ConsoleProgress, &mut io::stdout()).await? {
            std::process::exit(1);
        }
        return Ok(());
    }

    print_banner(mode);
    repl::run(&desk, mode).await
}
