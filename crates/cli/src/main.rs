//! Cache simulator CLI.
//!
//! This binary is the interactive front end of the simulator. It provides:
//! 1. **Run:** Simulate a trace (inline, from a file, or a preset) and print the report.
//! 2. **Patterns:** List the preset demonstration traces.
//! 3. **Prompt:** Print the request an external advisor would receive.
//! 4. **Recommend:** Validate a saved advisor reply and optionally run with it.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{ArgAction, Args, Parser, Subcommand};
use thiserror::Error;
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

use cachesim_core::advisory::{self, Advisor, Recommendation};
use cachesim_core::common::{AdvisoryError, ConfigError, TraceError};
use cachesim_core::sim::patterns::UnknownPattern;
use cachesim_core::sim::{self, Pattern};
use cachesim_core::{CacheConfig, ParseError, RawConfig, SimReport, Simulator, ValidationError};

#[derive(Parser, Debug)]
#[command(
    name = "cachesim",
    author,
    version,
    about = "Single-level cache simulator",
    long_about = "Simulate direct-mapped, 2-way set-associative and fully-associative caches \
with LRU or FIFO replacement over a trace of byte addresses.\n\n\
Examples:\n  \
cachesim run --trace \"1 2 1 3\" -a Fully-Associative -s 2 -b 1\n  \
cachesim run --pattern loop --steps\n  \
cachesim run --config cache.json --trace-file trace.txt --json\n  \
cachesim prompt --pattern mixed > request.txt\n  \
cachesim recommend --response reply.txt --pattern mixed --run"
)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace). `RUST_LOG` takes precedence.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Simulate a trace and print the report.
    Run {
        #[command(flatten)]
        config: ConfigArgs,

        #[command(flatten)]
        trace: TraceArgs,

        /// Print the report as JSON.
        #[arg(long)]
        json: bool,

        /// Print the outcome of every access before the report.
        #[arg(long)]
        steps: bool,
    },

    /// List the preset access patterns.
    Patterns,

    /// Print the advisor request for a trace and configuration.
    Prompt {
        #[command(flatten)]
        config: ConfigArgs,

        #[command(flatten)]
        trace: TraceArgs,
    },

    /// Validate a saved advisor reply.
    Recommend {
        /// File holding the advisor's reply text.
        #[arg(short, long)]
        response: PathBuf,

        #[command(flatten)]
        config: ConfigArgs,

        #[command(flatten)]
        trace: TraceArgs,

        /// Simulate the trace with the recommended configuration.
        #[arg(long)]
        run: bool,
    },
}

/// Configuration fields. Flags override `--config`, which overrides the defaults.
#[derive(Args, Debug)]
struct ConfigArgs {
    /// JSON configuration file.
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Number of cache lines.
    #[arg(short = 's', long)]
    cache_size: Option<String>,

    /// Bytes per block.
    #[arg(short = 'b', long)]
    block_size: Option<String>,

    /// Direct, Set-Associative or Fully-Associative.
    #[arg(short = 'a', long)]
    associativity: Option<String>,

    /// LRU or FIFO.
    #[arg(short = 'p', long = "policy")]
    policy: Option<String>,
}

/// Trace source. At most one may be given.
#[derive(Args, Debug)]
#[group(multiple = false)]
struct TraceArgs {
    /// Whitespace-separated byte addresses.
    #[arg(short, long)]
    trace: Option<String>,

    /// File of whitespace-separated byte addresses.
    #[arg(short = 'f', long, value_name = "FILE")]
    trace_file: Option<PathBuf>,

    /// Preset pattern name (see `cachesim patterns`).
    #[arg(long)]
    pattern: Option<String>,
}

#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Trace(#[from] TraceError),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Pattern(#[from] UnknownPattern),

    #[error(transparent)]
    Advisory(#[from] AdvisoryError),

    #[error("no trace given: pass --trace, --trace-file or --pattern")]
    NoTrace,

    #[error("could not serialize report: {0}")]
    Json(#[from] serde_json::Error),
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Run {
            config,
            trace,
            json,
            steps,
        } => cmd_run(&config, &trace, json, steps),
        Commands::Patterns => {
            cmd_patterns();
            Ok(())
        }
        Commands::Prompt { config, trace } => cmd_prompt(&config, &trace),
        Commands::Recommend {
            response,
            config,
            trace,
            run,
        } => cmd_recommend(&response, &config, &trace, run),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Installs a stderr subscriber; `RUST_LOG` wins over `-v`.
fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

impl ConfigArgs {
    /// Layers the flags over the config file, or over the defaults without one.
    ///
    /// Nothing is validated here, so a flag can replace a bad value from the file.
    fn raw(&self) -> Result<RawConfig, CliError> {
        let mut raw = match &self.config {
            Some(path) => RawConfig::from_json_file(path)?,
            None => RawConfig::default(),
        };
        if let Some(v) = &self.cache_size {
            raw.cache_size.clone_from(v);
        }
        if let Some(v) = &self.block_size {
            raw.block_size.clone_from(v);
        }
        if let Some(v) = &self.associativity {
            raw.associativity.clone_from(v);
        }
        if let Some(v) = &self.policy {
            raw.replacement_policy.clone_from(v);
        }
        Ok(raw)
    }

    /// Merges defaults, the config file and the flags, then validates once.
    fn resolve(&self) -> Result<CacheConfig, CliError> {
        let config = self.raw()?.validate()?;
        debug!(%config, "configuration resolved");
        Ok(config)
    }
}

impl TraceArgs {
    /// The trace as addresses, or `None` if no source was given.
    fn addresses(&self) -> Result<Option<Vec<u64>>, CliError> {
        if let Some(path) = &self.trace_file {
            return Ok(Some(sim::load_trace_file(path)?));
        }
        match self.text()? {
            Some(text) => Ok(Some(sim::parse(&text)?)),
            None => Ok(None),
        }
    }

    /// The trace as text, or `None` if no source was given.
    ///
    /// Inline traces are passed through unparsed. A trace file is loaded and
    /// rendered back as space-separated addresses.
    fn text(&self) -> Result<Option<String>, CliError> {
        if let Some(text) = &self.trace {
            return Ok(Some(text.clone()));
        }
        if let Some(path) = &self.trace_file {
            let addresses = sim::load_trace_file(path)?;
            let text: Vec<String> = addresses.iter().map(u64::to_string).collect();
            return Ok(Some(text.join(" ")));
        }
        if let Some(name) = &self.pattern {
            let pattern: Pattern = name.parse()?;
            return Ok(Some(pattern.text()));
        }
        Ok(None)
    }

    fn require_addresses(&self) -> Result<Vec<u64>, CliError> {
        self.addresses()?.ok_or(CliError::NoTrace)
    }

    fn require_text(&self) -> Result<String, CliError> {
        self.text()?.ok_or(CliError::NoTrace)
    }
}

/// Loads the whole trace before touching the simulator, then runs it.
fn cmd_run(config: &ConfigArgs, trace: &TraceArgs, json: bool, steps: bool) -> Result<(), CliError> {
    let config = config.resolve()?;
    let addresses = trace.require_addresses()?;
    let report = Simulator::new(&config).run(&addresses);
    print!("{}", render_report(&report, &addresses, json, steps)?);
    Ok(())
}

/// Formats a report as JSON, or as text optionally preceded by a step table.
/// The result ends with a newline.
fn render_report(
    report: &SimReport,
    addresses: &[u64],
    json: bool,
    steps: bool,
) -> Result<String, CliError> {
    if json {
        return Ok(format!("{}\n", report.to_json()?));
    }
    let mut out = String::new();
    if steps {
        let block_size = report.config.block_size.get();
        out.push_str(&format!("{:>5}  {:>12}  {:>10}  outcome\n", "step", "address", "block"));
        for (i, (addr, outcome)) in addresses.iter().zip(&report.outcomes).enumerate() {
            out.push_str(&format!(
                "{:>5}  {addr:>12}  {:>10}  {outcome}\n",
                i + 1,
                addr / block_size
            ));
        }
        out.push('\n');
    }
    out.push_str(&format!("{report}\n"));
    Ok(out)
}

fn cmd_patterns() {
    for pattern in Pattern::ALL {
        println!("{:<12} {}", pattern.name().to_lowercase(), pattern.text());
    }
}

fn cmd_prompt(config: &ConfigArgs, trace: &TraceArgs) -> Result<(), CliError> {
    let config = config.resolve()?;
    let text = trace.require_text()?;
    println!("{}", advisory::build_prompt(&text, &config));
    Ok(())
}

/// Replays an advisor reply captured earlier, e.g. from a chat session.
#[derive(Debug)]
struct ReplyFileAdvisor<'a> {
    path: &'a Path,
}

impl Advisor for ReplyFileAdvisor<'_> {
    fn recommend(
        &self,
        _pattern: &str,
        _current: &CacheConfig,
    ) -> Result<Recommendation, AdvisoryError> {
        let reply = fs::read_to_string(self.path).map_err(|e| {
            AdvisoryError::Unavailable(format!("{}: {e}", self.path.display()))
        })?;
        advisory::parse_recommendation(&reply)
    }
}

/// What `recommend` settled on.
#[derive(Debug)]
enum Advice {
    /// The advisor's configuration passed validation.
    Accepted(CacheConfig, Recommendation),
    /// No usable advice; the current configuration stands.
    Kept(CacheConfig, AdvisoryError),
}

impl Advice {
    /// The configuration to simulate with.
    const fn config(&self) -> &CacheConfig {
        match self {
            Self::Accepted(config, _) | Self::Kept(config, _) => config,
        }
    }
}

/// Asks `advisor` for a configuration.
///
/// With `fallback`, unusable advice keeps `current` instead of failing.
fn seek_advice(
    advisor: &dyn Advisor,
    text: &str,
    current: &CacheConfig,
    fallback: bool,
) -> Result<Advice, CliError> {
    match advisory::request_config(advisor, text, current) {
        Ok((config, recommendation)) => Ok(Advice::Accepted(config, recommendation)),
        Err(e) if fallback => {
            warn!(error = %e, "recommendation unusable, keeping current configuration");
            Ok(Advice::Kept(*current, e))
        }
        Err(e) => Err(e.into()),
    }
}

/// Reports the recommendation. With `--run`, a rejected recommendation falls
/// back to the current configuration instead of failing.
fn cmd_recommend(
    response: &Path,
    config: &ConfigArgs,
    trace: &TraceArgs,
    run: bool,
) -> Result<(), CliError> {
    let current = config.resolve()?;
    let text = trace.text()?.unwrap_or_default();
    let advisor = ReplyFileAdvisor { path: response };

    let advice = seek_advice(&advisor, &text, &current, run)?;
    match &advice {
        Advice::Accepted(config, recommendation) => {
            println!("Recommended configuration: {config}");
            for (field, note) in &recommendation.rationale {
                println!("  {field}: {note}");
            }
        }
        Advice::Kept(config, e) => {
            eprintln!("No recommendation: {e}");
            println!("Keeping configuration: {config}");
        }
    }

    if run {
        if text.trim().is_empty() {
            return Err(CliError::NoTrace);
        }
        let addresses = sim::parse(&text)?;
        let report = Simulator::new(advice.config()).run(&addresses);
        println!();
        print!("{}", render_report(&report, &addresses, false, false)?);
    }
    Ok(())
}
