//! Kilo Search - Main entrypoint.
//!
//! Loads the configuration and dictionary, installs logging, then either
//! runs the interactive prefix prompt or answers a batch of prefixes.

use clap::{Parser, Subcommand};
use kilo_search_lib::config::{ConfigLoader, KiloConfig, LogConfig, Validate, ENV_PREFIX};
use kilo_search_lib::data_structures::{KiloTrie, SessionStart};
use kilo_search_lib::dictionary::Dictionary;
use kilo_search_lib::error::{
    report_error, set_error_reporter, ErrorContext, KiloError, KiloResult, TracingErrorReporter,
};
use kilo_search_lib::utils::Timer;
use parking_lot::Mutex;
use serde::Serialize;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::process;
use std::sync::{mpsc, Arc};
use tracing::info;
use tracing_error::ErrorLayer;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

/// Timer label for dictionary loading.
const LOAD_TIMER: &str = "dictionary load time";

/// Timer label for one prefix search, from dispatch to delivery.
const TRAVERSE_TIMER: &str = "trie traverse time";

const RULE: &str = "------------------------------------------";

/// Command line arguments for Kilo Search.
#[derive(Parser, Debug)]
#[clap(name = "Kilo Search", version, author, about)]
struct Args {
    /// Path to configuration file
    #[clap(short, long, value_parser)]
    config: Option<PathBuf>,

    /// Path to the word list (overrides the configuration)
    #[clap(short, long, value_parser)]
    dictionary: Option<PathBuf>,

    /// Number of search workers (overrides the configuration)
    #[clap(short, long, value_parser)]
    workers: Option<usize>,

    /// Command to execute
    #[clap(subcommand)]
    command: Option<Command>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Command {
    /// Prompt for prefixes until told to stop
    Interactive,

    /// Answer the given prefixes and exit
    Query {
        /// Prefixes to search for
        #[clap(required = true)]
        prefixes: Vec<String>,

        /// Print the matches as JSON
        #[clap(long)]
        json: bool,

        /// Sort the matches of each prefix
        #[clap(long)]
        sorted: bool,
    },

    /// Validate the configuration file
    Validate,

    /// Generate a default configuration file
    GenConfig {
        /// Path to output configuration file
        #[clap(short, long, value_parser)]
        output: PathBuf,
    },
}

/// Matches for one prefix in batch mode.
#[derive(Debug, Serialize)]
struct QueryOutcome {
    prefix: String,
    count: usize,
    words: Vec<String>,
}

/// Initialize the logging system.
///
/// `RUST_LOG` takes precedence over the configured level. Logs go to stderr
/// so that stdout carries only search output.
fn init_logging(log: &LogConfig) -> KiloResult<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log.level));
    let fmt_layer = fmt::layer()
        .with_writer(io::stderr)
        .with_file(log.source_location)
        .with_line_number(log.source_location)
        .with_thread_names(true);

    let registry = tracing_subscriber::registry()
        .with(filter)
        .with(ErrorLayer::default());

    let installed = if log.json {
        registry.with(fmt_layer.json()).try_init()
    } else {
        registry.with(fmt_layer).try_init()
    };

    installed
        .map_err(|e| KiloError::Custom(format!("Failed to set global tracing subscriber: {e}")))
}

/// Main entry point for the application.
fn main() {
    let args = Args::parse();

    if let Err(err) = run(args) {
        report_error(ErrorContext::new(err, "kilo_search").with_span_trace());
        process::exit(1);
    }
}

fn run(args: Args) -> KiloResult<()> {
    let command = args.command.unwrap_or(Command::Interactive);

    if let Command::GenConfig { output } = &command {
        init_logging(&LogConfig::default())?;
        return generate_config(output);
    }

    let loader = ConfigLoader::new(args.config.as_deref(), ENV_PREFIX);
    let mut config = loader.load()?;
    if let Some(path) = args.dictionary {
        config.dictionary.path = Some(path);
    }
    if let Some(workers) = args.workers {
        config.search.worker_count = workers;
    }
    config.validate()?;

    init_logging(&config.log)?;
    set_error_reporter(Arc::new(TracingErrorReporter));

    match command {
        Command::Interactive => interactive(&config),
        Command::Query {
            prefixes,
            json,
            sorted,
        } => query(&config, &prefixes, json, sorted),
        Command::Validate => {
            info!("Configuration validated successfully");
            println!("Configuration is valid.");
            Ok(())
        }
        Command::GenConfig { .. } => Ok(()),
    }
}

fn generate_config(output: &Path) -> KiloResult<()> {
    info!("Generating default configuration");
    let toml = KiloConfig::default().to_toml()?;

    if let Some(parent) = output.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    std::fs::write(output, toml)?;

    info!("Default configuration written to {:?}", output);
    Ok(())
}

fn load_trie(config: &KiloConfig, timer: &mut Timer) -> KiloResult<KiloTrie> {
    timer.start(LOAD_TIMER);
    let (trie, report) = Dictionary::new(config.dictionary.clone()).load(&config.search)?;
    timer.stop(LOAD_TIMER);

    info!(
        words = report.words_inserted,
        duplicates = report.duplicates,
        blank = report.blank_lines,
        workers = trie.worker_count(),
        "Dictionary ready"
    );
    Ok(trie)
}

fn interactive(config: &KiloConfig) -> KiloResult<()> {
    let mut timer = Timer::new();
    let trie = load_trie(config, &mut timer)?;
    println!("Loaded {} words.", trie.len());

    let (tx, rx) = mpsc::channel::<Vec<String>>();
    let tx = Mutex::new(tx);
    trie.set_on_complete(move |words: &[String]| {
        let _ = tx.lock().send(words.to_vec());
    });

    let stdin = io::stdin();
    let mut input = stdin.lock();

    loop {
        let Some(prefix) = prompt_line(&mut input, "Enter a prefix: ")? else {
            break;
        };

        timer.start(TRAVERSE_TIMER);
        if trie.find_prefix_matches(&prefix)? == SessionStart::PoolExhausted {
            println!("All search workers are busy, please try again.");
            continue;
        }
        let words = rx
            .recv()
            .map_err(|_| KiloError::Custom("Search ended without delivering results".into()))?;
        timer.stop(TRAVERSE_TIMER);

        println!("found {} words with this prefix.", words.len());
        if ask_yes_no(&mut input, "Shall I print them?")? {
            println!("{RULE}");
            for word in &words {
                println!("{word}");
            }
            println!("{RULE}");
        }

        if !ask_yes_no(&mut input, "Would you like to continue?")? {
            break;
        }
    }

    print!("{timer}");
    Ok(())
}

fn query(config: &KiloConfig, prefixes: &[String], json: bool, sorted: bool) -> KiloResult<()> {
    let mut timer = Timer::new();
    let trie = load_trie(config, &mut timer)?;

    let mut outcomes = Vec::with_capacity(prefixes.len());
    for prefix in prefixes {
        timer.start(TRAVERSE_TIMER);
        trie.find_prefix_matches(prefix)?;
        trie.wait_until_idle();
        timer.stop(TRAVERSE_TIMER);

        let mut words = trie.request_result();
        if sorted {
            words.sort();
        }
        outcomes.push(QueryOutcome {
            prefix: prefix.clone(),
            count: words.len(),
            words,
        });
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&outcomes)?);
    } else {
        for outcome in &outcomes {
            println!("{} ({} matches)", outcome.prefix, outcome.count);
            for word in &outcome.words {
                println!("  {word}");
            }
        }
    }

    if let Some(stats) = timer.stats(TRAVERSE_TIMER) {
        info!(%stats, "Query timings");
    }
    Ok(())
}

/// Prints `prompt` and reads one line, without its line terminator.
///
/// Returns `None` at end of input.
fn prompt_line<R: BufRead>(input: &mut R, prompt: &str) -> KiloResult<Option<String>> {
    print!("{prompt}");
    io::stdout().flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
}

/// Asks a yes/no question until answered. End of input counts as "no".
fn ask_yes_no<R: BufRead>(input: &mut R, question: &str) -> KiloResult<bool> {
    let prompt = format!("{question} [Y/N]\n");
    loop {
        let Some(answer) = prompt_line(input, &prompt)? else {
            return Ok(false);
        };
        match answer.trim().chars().next() {
            Some('y' | 'Y') => return Ok(true),
            Some('n' | 'N') => return Ok(false),
            _ => println!("Please type Y or N then hit Enter"),
        }
    }
}
