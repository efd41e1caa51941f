//! Interactive ticker loop

use research_stock::{
    AnalysisMode, CliFormatter, ConsoleProgress, ProgressReporter, ResearchDesk, ResearchError,
    Ticker,
};
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use std::io::{self, Write};
use tracing::warn;

/// What a line of user input asks for
#[derive(Debug, PartialEq, Eq)]
pub enum Command {
    Exit,
    Empty,
    Analyze(String),
}

impl Command {
    /// Trim and uppercase the input; `exit` and `quit` in any case end the session
    pub fn parse(line: &str) -> Self {
        let ticker = line.trim().to_uppercase();
        match ticker.as_str() {
            "" => Command::Empty,
            "EXIT" | "QUIT" => Command::Exit,
            _ => Command::Analyze(ticker),
        }
    }
}

pub fn prompt(mode: AnalysisMode) -> &'static str {
    match mode {
        AnalysisMode::Professional => "Enter stock ticker (or 'exit' to quit): ",
        AnalysisMode::Basic => "Enter stock ticker (or 'quit' to exit): ",
    }
}

pub fn farewell(mode: AnalysisMode) -> &'static str {
    match mode {
        AnalysisMode::Professional => "\nTerminating analysis session...",
        AnalysisMode::Basic => "Goodbye!",
    }
}

/// Analyze one ticker and write the report, or the failure line, to `out`
///
/// Basic-mode sections reach the terminal through `progress` as they finish,
/// so only the professional report is written here. Returns whether the
/// analysis succeeded.
pub async fn analyze(
    desk: &ResearchDesk,
    mode: AnalysisMode,
    input: &str,
    progress: &dyn ProgressReporter,
    out: &mut impl Write,
) -> io::Result<bool> {
    let result = async {
        let ticker = Ticker::parse(input)?;
        match mode {
            AnalysisMode::Professional => {
                let report = desk.professional_analysis(&ticker, progress).await?;
                Ok::<_, ResearchError>(Some(CliFormatter::format_report(&report)))
            }
            AnalysisMode::Basic => {
                desk.basic_analysis(&ticker, progress).await?;
                Ok::<_, ResearchError>(None)
            }
        }
    }
    .await;

    match result {
        Ok(report) => {
            if let Some(report) = report {
                writeln!(out, "{report}")?;
            }
            Ok(true)
        }
        Err(e) => {
            warn!(error = %e, "Analysis failed");
            writeln!(out, "{}", CliFormatter::format_error(mode, &e))?;
            Ok(false)
        }
    }
}

/// Read tickers until the user exits
pub async fn run(desk: &ResearchDesk, mode: AnalysisMode) -> anyhow::Result<()> {
    let mut editor = DefaultEditor::new()?;

    loop {
        println!();
        match editor.readline(prompt(mode)) {
            Ok(line) => {
                let _ = editor.add_history_entry(line.as_str());
                match Command::parse(&line) {
                    Command::Exit => {
                        println!("{}", farewell(mode));
                        break;
                    }
                    Command::Empty => println!("Please enter a valid ticker symbol"),
                    Command::Analyze(ticker) => {
                        analyze(desk, mode, &ticker, &ConsoleProgress, &mut io::stdout()).await?;
                    }
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("\nSession terminated by user");
                break;
            }
            Err(ReadlineError::Eof) => {
                println!("{}", farewell(mode));
                break;
            }
            Err(e) => println!("\n⚠️  Error: {e}"),
        }
    }

    Ok(())
}
