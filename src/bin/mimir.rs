//! mimir: political bias diagnosis CLI
//!
//! One-shot and interactive front ends for the diagnosis pipeline.

use std::io::{self, BufRead, IsTerminal, Read, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand, ValueEnum};
use tracing::info;

use mimir::config::{Config, ContractChoice, Secrets};
use mimir::provider::LlmDiagnosisProvider;
use mimir::{Diagnoser, DiagnosisReport, Genre, MimirError, SessionLedger};

/// Mimir CLI
#[derive(Parser)]
#[command(name = "mimir")]
#[command(version = mimir::PKG_VERSION)]
#[command(about = "Diagnose the political lean of a short opinion")]
struct Args {
    /// Path to configuration file.
    #[arg(short, long, env = "MIMIR_CONFIG")]
    config: Option<PathBuf>,

    /// Model identifier (overrides config).
    #[arg(short, long)]
    model: Option<String>,

    /// Reply contract to request (overrides config).
    #[arg(long, value_enum)]
    contract: Option<ContractArg>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Copy, ValueEnum)]
enum ContractArg {
    Structured,
    Labeled,
}

#[derive(Subcommand)]
enum Command {
    /// Diagnose a single text
    Diagnose {
        /// Text to diagnose (or omit to read from stdin)
        text: Option<String>,
        /// Theme: politics, economy, gender or other
        #[arg(short, long)]
        genre: Option<Genre>,
    },

    /// Interactive session with history and quota
    Session {
        /// Theme for submissions until changed with `/genre`
        #[arg(short, long)]
        genre: Option<Genre>,
        /// Write the history as CSV when the session ends
        /// (default file: diagnosis_history.csv)
        #[arg(short, long, num_args = 0..=1, default_missing_value = mimir::export::DEFAULT_FILE_NAME)]
        export: Option<PathBuf>,
    },

    /// List the reference opinions
    Corpus,
}

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    // Initialise tracing (default: warn for CLI; override with RUST_LOG).
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let args = Args::parse();

    let mut config = Config::load(args.config.as_deref())?;
    if let Some(model) = args.model {
        config.provider.model = model;
    }
    if let Some(contract) = args.contract {
        config.contract.kind = match contract {
            ContractArg::Structured => ContractChoice::Structured,
            ContractArg::Labeled => ContractChoice::Labeled,
        };
    }

    if let Command::Corpus = args.command {
        let corpus = config.reference_corpus()?;
        for entry in corpus.entries() {
            println!(
                "{:>5.2}  {:>4.2}  {}",
                entry.polarity, entry.intensity, entry.content
            );
        }
        return Ok(ExitCode::SUCCESS);
    }

    let secrets = Secrets::load()?;
    let diagnoser = build_diagnoser(&config, &secrets)?;
    let mut ledger = SessionLedger::new(config.session.max_usage);

    info!(
        version = mimir::PKG_VERSION,
        model = diagnoser.model(),
        "mimir starting"
    );

    match args.command {
        Command::Diagnose { text, genre } => {
            let text = read_input(text)?;
            if run_attempt(&diagnoser, &mut ledger, &text, genre).await {
                Ok(ExitCode::SUCCESS)
            } else {
                Ok(ExitCode::FAILURE)
            }
        }
        Command::Session { genre, export } => {
            run_session(&diagnoser, &mut ledger, genre).await?;
            if let Some(path) = export {
                if ledger.history().is_empty() {
                    eprintln!("履歴がないため書き出しをスキップしました。");
                } else {
                    std::fs::write(&path, ledger.export()?)?;
                    println!("診断履歴を {} に保存しました。", path.display());
                }
            }
            Ok(ExitCode::SUCCESS)
        }
        Command::Corpus => Ok(ExitCode::SUCCESS),
    }
}

/// Build a [`Diagnoser`] from configuration.
fn build_diagnoser(config: &Config, secrets: &Secrets) -> Result<Diagnoser, MimirError> {
    let settings = &config.provider;
    let mut provider =
        LlmDiagnosisProvider::new(settings.backend, secrets.api_key(settings.backend))
            .timeout_secs(settings.timeout_secs);
    if let Some(ref url) = settings.base_url {
        provider = provider.base_url(url);
    }
    if let Some(temp) = settings.temperature {
        provider = provider.temperature(temp);
    }

    Diagnoser::builder()
        .provider(Arc::new(provider))
        .model(&settings.model)
        .contract(config.contract.contract_kind())
        .corpus(config.reference_corpus()?)
        .build()
}

/// Run one attempt and print its outcome. Returns whether it succeeded.
async fn run_attempt(
    diagnoser: &Diagnoser,
    ledger: &mut SessionLedger,
    text: &str,
    genre: Option<Genre>,
) -> bool {
    eprintln!("診断中...");
    match diagnoser.diagnose(ledger, text, genre).await {
        Ok(report) => {
            print_report(&report, ledger.max_usage());
            true
        }
        Err(err) => {
            print_error(&err);
            false
        }
    }
}

async fn run_session(
    diagnoser: &Diagnoser,
    ledger: &mut SessionLedger,
    mut genre: Option<Genre>,
) -> io::Result<()> {
    println!(
        "投稿内容を入力してください（{}字以内）。/genre <テーマ>, /history, /quit",
        mimir::MAX_INPUT_CHARS
    );
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        print!("> ");
        io::stdout().flush()?;
        let Some(line) = lines.next() else {
            break;
        };
        let line = line?;
        let input = line.trim();

        match input.split_once(' ').map_or((input, ""), |(c, rest)| (c, rest.trim())) {
            ("", _) => continue,
            ("/quit", _) | ("/exit", _) => break,
            ("/history", _) => print_history(ledger),
            ("/genre", "") => {
                genre = None;
                println!("テーマ指定を解除しました。");
            }
            ("/genre", name) => match name.parse::<Genre>() {
                Ok(g) => {
                    genre = Some(g);
                    println!("テーマ: {}", g.label());
                }
                Err(err) => print_error(&err),
            },
            _ => {
                run_attempt(diagnoser, ledger, input, genre).await;
            }
        }
    }
    print_history(ledger);
    Ok(())
}

fn print_report(report: &DiagnosisReport, max_usage: u32) {
    let d = &report.diagnosis;
    println!(
        "傾向スコア: {}  強さスコア: {}",
        d.polarity(),
        d.intensity()
    );
    println!("コメント: {}", d.comment());
    println!();
    println!(
        "似た意見の例: {} (スコア: {}, {})",
        report.nearest.content, report.nearest.polarity, report.nearest.intensity
    );
    println!(
        "反対意見の例: {} (スコア: {}, {})",
        report.farthest.content, report.farthest.polarity, report.farthest.intensity
    );
    println!("残り診断回数: {}/{}", report.remaining, max_usage);
}

fn print_error(err: &MimirError) {
    eprintln!("{}", err.user_message());
    if let Some(raw) = err.raw_reply() {
        eprintln!("```\n{raw}\n```");
    }
}

fn print_history(ledger: &SessionLedger) {
    if ledger.history().is_empty() {
        return;
    }
    println!("\n### 診断履歴");
    for (i, entry) in ledger.history().iter().enumerate() {
        let genre = entry.genre.map(|g| g.label()).unwrap_or("-");
        println!(
            "{:>2}. [{}] {:>5.2} {:>4.2}  {}",
            i + 1,
            genre,
            entry.diagnosis.polarity(),
            entry.diagnosis.intensity(),
            entry.diagnosis.source_text()
        );
    }
}

/// Read input from the argument or stdin.
fn read_input(arg: Option<String>) -> io::Result<String> {
    match arg {
        Some(text) => Ok(text),
        None => {
            if io::stdin().is_terminal() {
                eprintln!("Reading from stdin (Ctrl+D to finish)...");
            }
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer)?;
            Ok(buffer.trim_end().to_string())
        }
    }
}
