//! CLI command definitions, routing, and tracing setup.
//!
//! This is the transport layer: it hands already-clean question text to the
//! orchestrator and renders answers or short failure messages. Upstream
//! failures never surface as stack traces here.

use clap::{Parser, Subcommand};
use color_eyre::eyre::Result;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::info;

use inkling_core::{
    Answer, OpenRouterClient, QueryOrchestrator, failure_message, no_content_message,
};
use inkling_corpus::{CorpusAggregator, CorpusCache, CorpusSource, PAGE_SEPARATOR};
use inkling_notion::NotionClient;
use inkling_shared::{AppConfig, config_file_path, init_config, load_config, validate_api_keys};

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// Inkling — answer questions grounded in your Notion workspace.
#[derive(Parser)]
#[command(
    name = "inkling",
    version,
    about = "Ask natural-language questions answered from a live snapshot of your Notion workspace.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Top-level CLI subcommands.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// Ask one question and print the answer.
    Ask {
        /// The question to answer.
        question: String,
    },

    /// Interactive question loop sharing one corpus cache.
    Chat,

    /// Build the corpus now and report what it contains.
    Sync {
        /// Print the full corpus text instead of a summary.
        #[arg(long)]
        print: bool,
    },

    /// Configuration management.
    Config {
        /// Config subcommand.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommands.
#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Initialize config file with defaults.
    Init,
    /// Show resolved configuration.
    Show,
    /// Print the config file path.
    Path,
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt().with_env_filter(env_filter).with_target(false).init();
        }
        LogFormat::Json => {
            fmt().json().with_env_filter(env_filter).init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Ask { question } => cmd_ask(&question).await,
        Command::Chat => cmd_chat().await,
        Command::Sync { print } => cmd_sync(print).await,
        Command::Config { action } => match action {
            ConfigAction::Init => cmd_config_init(),
            ConfigAction::Show => cmd_config_show(),
            ConfigAction::Path => cmd_config_path(),
        },
    }
}

// ---------------------------------------------------------------------------
// Component wiring
// ---------------------------------------------------------------------------

type Cache = CorpusCache<CorpusAggregator<NotionClient>>;
type Orchestrator = QueryOrchestrator<OpenRouterClient>;

/// Build the full answering pipeline from config: store → aggregator →
/// cache, plus the completion client behind the orchestrator.
fn build_pipeline(config: &AppConfig) -> Result<(Cache, Orchestrator)> {
    validate_api_keys(config)?;

    let store = NotionClient::new(&config.notion)?;
    let cache = CorpusCache::new(CorpusAggregator::new(store));
    let orchestrator = QueryOrchestrator::new(OpenRouterClient::new(&config.openrouter)?);

    Ok((cache, orchestrator))
}

/// Answer one question end-to-end and render the outcome as chat text.
///
/// Unrecoverable upstream failures become the short apologetic message, not
/// an error return — the user re-asks.
async fn answer_question(cache: &Cache, orchestrator: &Orchestrator, question: &str) -> String {
    let outcome = match cache.corpus().await {
        Ok(corpus) => orchestrator.answer(question, &corpus).await,
        Err(err) => Err(err),
    };

    match outcome {
        Ok(Answer::Reply(text)) => text,
        Ok(Answer::NoContent) => no_content_message().to_string(),
        Err(err) => failure_message(&err),
    }
}

// ---------------------------------------------------------------------------
// Command handlers
// ---------------------------------------------------------------------------

async fn cmd_ask(question: &str) -> Result<()> {
    let config = load_config()?;
    let (cache, orchestrator) = build_pipeline(&config)?;

    info!(question_chars = question.len(), "answering question");
    let reply = answer_question(&cache, &orchestrator, question).await;
    println!("{reply}");

    Ok(())
}

async fn cmd_chat() -> Result<()> {
    let config = load_config()?;
    let (cache, orchestrator) = build_pipeline(&config)?;

    println!("Inkling chat — ask about your workspace. Empty line or `exit` to quit.");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    loop {
        stdout.write_all(b"> ").await?;
        stdout.flush().await?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let question = line.trim();
        if question.is_empty() || question == "exit" {
            break;
        }

        let reply = answer_question(&cache, &orchestrator, question).await;
        println!("{reply}\n");
    }

    Ok(())
}

async fn cmd_sync(print: bool) -> Result<()> {
    let config = load_config()?;
    validate_api_keys(&config)?;

    let store = NotionClient::new(&config.notion)?;
    let aggregator = CorpusAggregator::new(store);

    info!("building corpus");
    let corpus = aggregator.build_corpus().await?;

    if print {
        println!("{corpus}");
        return Ok(());
    }

    let page_count = if corpus.is_empty() {
        0
    } else {
        corpus.matches(PAGE_SEPARATOR).count() + 1
    };

    println!();
    println!("  Corpus built successfully!");
    println!("  Pages: {page_count}");
    println!("  Size:  {} chars", corpus.len());
    println!();

    if page_count == 0 {
        println!("  No pages contributed content — check integration access.");
    }

    Ok(())
}

fn cmd_config_init() -> Result<()> {
    let path = init_config()?;
    println!("Created {}", path.display());
    Ok(())
}

fn cmd_config_show() -> Result<()> {
    let config = load_config()?;
    println!("{}", toml::to_string_pretty(&config)?);
    Ok(())
}

fn cmd_config_path() -> Result<()> {
    println!("{}", config_file_path()?.display());
    Ok(())
}
