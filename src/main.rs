use std::fs;
use std::io::{self, IsTerminal, Read};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use chrono::NaiveDate;
use clap::{ArgAction, Parser, Subcommand};
use serde::Serialize;

use task_analyzer::api::{self, AnalyzeRequest, RequestContext, SuggestRequest};
use task_analyzer::{alog, alog_error, Config, Error, Result, Strategy};

/// Task Analyzer - rank a batch of tasks by a weighted priority score
#[derive(Parser, Debug)]
#[command(name = "task-analyzer")]
#[command(version, about, long_about = None)]
#[command(
    after_help = "ENVIRONMENT:\n    TASK_ANALYZER_DEBUG=1         Enable debug logging (alternative to -d)\n    TASK_ANALYZER_DEBUG=trace     Also log per-task scores (alternative to -dd)"
)]
pub struct Cli {
    /// Enable debug logging (writes to ~/.task-analyzer/analyzer.log); repeat for trace
    #[arg(short = 'd', long, action = ArgAction::Count)]
    pub debug: u8,

    /// Config file to use instead of ~/.task-analyzer/config.toml
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Score and rank an Analyze request body (JSON)
    Analyze {
        /// Request file; reads stdin when omitted or "-"
        file: Option<PathBuf>,

        /// Strategy overriding the one in the request
        #[arg(short, long)]
        strategy: Option<Strategy>,

        /// Score as of this day (YYYY-MM-DD) instead of today
        #[arg(long)]
        today: Option<NaiveDate>,

        /// Print JSON on one line
        #[arg(long)]
        compact: bool,
    },

    /// Return the top tasks of a batch, or of the built-in sample batch
    Suggest {
        /// Request file; reads stdin when omitted or "-" and stdin is piped
        file: Option<PathBuf>,

        /// Strategy overriding the one in the request
        #[arg(short, long)]
        strategy: Option<Strategy>,

        /// Number of tasks to return (values below 1 return one task)
        #[arg(short, long, allow_negative_numbers = true)]
        limit: Option<i64>,

        /// Score as of this day (YYYY-MM-DD) instead of today
        #[arg(long)]
        today: Option<NaiveDate>,

        /// Print JSON on one line
        #[arg(long)]
        compact: bool,
    },

    /// List the available strategies and their weights
    Strategies {
        /// Print JSON on one line
        #[arg(long)]
        compact: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    task_analyzer::log::init(cli.debug);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            alog_error!("Command failed: {}", err);
            eprintln!("error: {}", err);
            if err.is_client_error() {
                ExitCode::from(2)
            } else {
                ExitCode::FAILURE
            }
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Command::Analyze {
            file,
            strategy,
            today,
            compact,
        } => {
            alog!("Analyze command: file={:?}, strategy={:?}", file, strategy);
            let mut request: AnalyzeRequest = serde_json::from_str(&read_input(file.as_deref())?)?;
            if let Some(strategy) = strategy {
                request.strategy = Some(strategy.to_string());
            }
            let response = api::analyze(&request, &context(&config, today))?;
            print_json(&response, config.pretty && !compact)
        }
        Command::Suggest {
            file,
            strategy,
            limit,
            today,
            compact,
        } => {
            alog!(
                "Suggest command: file={:?}, strategy={:?}, limit={:?}",
                file,
                strategy,
                limit
            );
            let body = match file {
                Some(path) => read_input(Some(path.as_path()))?,
                None if io::stdin().is_terminal() => String::new(),
                None => read_input(None)?,
            };
            let mut request: SuggestRequest = if body.trim().is_empty() {
                SuggestRequest::default()
            } else {
                serde_json::from_str(&body)?
            };
            if let Some(strategy) = strategy {
                request.strategy = Some(strategy.to_string());
            }
            if limit.is_some() {
                request.limit = limit;
            }
            let response = api::suggest(&request, &context(&config, today))?;
            print_json(&response, config.pretty && !compact)
        }
        Command::Strategies { compact } => {
            let strategies: Vec<_> = Strategy::ALL.iter().map(Strategy::info).collect();
            print_json(&strategies, config.pretty && !compact)
        }
    }
}

fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => Config::load_from(path),
        // No home directory is not fatal for a one-shot command.
        None => match Config::load() {
            Err(Error::NoHomeDir) => Ok(Config::default()),
            other => other,
        },
    }
}

fn context(config: &Config, today: Option<NaiveDate>) -> RequestContext {
    let ctx = RequestContext::now(config);
    match today {
        Some(today) => ctx.with_today(today),
        None => ctx,
    }
}

fn read_input(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) if path != Path::new("-") => Ok(fs::read_to_string(path)?),
        _ => {
            let mut body = String::new();
            io::stdin().read_to_string(&mut body)?;
            Ok(body)
        }
    }
}

fn print_json<T: Serialize>(value: &T, pretty: bool) -> Result<()> {
    let json = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{}", json);
    Ok(())
}
