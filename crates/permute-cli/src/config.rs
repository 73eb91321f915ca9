use anyhow::bail;
use clap::{Args, Parser, Subcommand, ValueEnum};
use permute_bridge::{
    BridgeConfig, DEFAULT_BATCH_SIZE, DEFAULT_CHANNEL_CAPACITY,
    permute::{Collation, Filter, Patterns},
};

/// Runtime configuration for the `permute` binary.
///
/// Global options may also come from environment variables (or a `.env`
/// file). Log verbosity is controlled through `RUST_LOG`.
#[derive(Parser, Debug, Clone)]
#[command(
    name = "permute",
    version,
    about = "Enumerate every ordering of a set of symbols, deduplicated and sorted"
)]
pub struct CliArgs {
    /// Maximum number of permutations returned by each producer fetch.
    ///
    /// Smaller batches give the controller more frequent progress; larger
    /// batches mean fewer round trips.
    ///
    /// Environment variable: `BATCH_SIZE`
    #[arg(long, env = "BATCH_SIZE", default_value_t = DEFAULT_BATCH_SIZE, global = true)]
    pub batch_size: usize,

    /// Capacity of the request and response channels between the controller
    /// and the producer.
    ///
    /// Environment variable: `CHANNEL_CAPACITY`
    #[arg(long, env = "CHANNEL_CAPACITY", default_value_t = DEFAULT_CHANNEL_CAPACITY, global = true)]
    pub channel_capacity: usize,

    /// Log output format. Logs are always written to stderr.
    ///
    /// Environment variable: `LOG_FORMAT`
    #[arg(long, env = "LOG_FORMAT", value_enum, default_value_t = LogFormat::Pretty, global = true)]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Subcommand, Debug, Clone)]
pub enum CliCommand {
    /// Enumerate SYMBOLS to completion and print the unique results and
    /// statistics.
    Run(RunArgs),
    /// Serve the producer protocol as JSON lines over stdin/stdout.
    Worker,
}

#[derive(Args, Debug, Clone)]
pub struct RunArgs {
    /// Symbols to permute. Split into characters unless `--separator` is
    /// given.
    pub symbols: String,

    /// Split SYMBOLS on this string instead of into characters.
    #[arg(short, long)]
    pub separator: Option<String>,

    /// Keep results starting with this prefix (repeatable; any may match).
    #[arg(long, value_name = "PREFIX")]
    pub starts: Vec<String>,

    /// Keep results ending with this suffix (repeatable; any may match).
    #[arg(long, value_name = "SUFFIX")]
    pub ends: Vec<String>,

    /// Keep results containing this substring (repeatable; any may match).
    #[arg(long, value_name = "TEXT")]
    pub contains: Vec<String>,

    /// Drop results starting with this prefix (repeatable).
    #[arg(long, value_name = "PREFIX")]
    pub exclude_starts: Vec<String>,

    /// Drop results ending with this suffix (repeatable).
    #[arg(long, value_name = "SUFFIX")]
    pub exclude_ends: Vec<String>,

    /// Drop results containing this substring (repeatable).
    #[arg(long, value_name = "TEXT")]
    pub exclude_contains: Vec<String>,

    /// Print at most this many results.
    #[arg(short, long)]
    pub limit: Option<usize>,

    /// Ordering of the printed results.
    #[arg(long, value_enum, default_value_t = CollationArg::Ordinal)]
    pub collation: CollationArg,

    /// Emit a single JSON report instead of plain text.
    #[arg(long, default_value_t = false)]
    pub json: bool,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollationArg {
    Ordinal,
    CaseFolded,
}

impl From<CollationArg> for Collation {
    fn from(arg: CollationArg) -> Self {
        match arg {
            CollationArg::Ordinal => Self::Ordinal,
            CollationArg::CaseFolded => Self::CaseFolded,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bridge: BridgeConfig,
    pub log_format: LogFormat,
    pub command: Command,
}

#[derive(Debug, Clone)]
pub enum Command {
    Run(RunConfig),
    Worker,
}

#[derive(Debug, Clone)]
pub struct RunConfig {
    pub symbols: Vec<String>,
    pub filter: Filter,
    pub limit: Option<usize>,
    pub collation: Collation,
    pub json: bool,
}

impl TryFrom<CliArgs> for AppConfig {
    type Error = anyhow::Error;

    fn try_from(args: CliArgs) -> Result<Self, Self::Error> {
        if args.batch_size == 0 {
            bail!("BATCH_SIZE must be greater than 0");
        }
        if args.channel_capacity == 0 {
            bail!("CHANNEL_CAPACITY must be greater than 0");
        }

        let command = match args.command {
            CliCommand::Run(run) => Command::Run(RunConfig::try_from(run)?),
            CliCommand::Worker => Command::Worker,
        };

        Ok(Self {
            bridge: BridgeConfig {
                batch_size: args.batch_size,
                channel_capacity: args.channel_capacity,
            },
            log_format: args.log_format,
            command,
        })
    }
}

impl TryFrom<RunArgs> for RunConfig {
    type Error = anyhow::Error;

    fn try_from(args: RunArgs) -> Result<Self, Self::Error> {
        let symbols: Vec<String> = match &args.separator {
            Some(separator) if separator.is_empty() => bail!("--separator must not be empty"),
            Some(separator) => args
                .symbols
                .split(separator.as_str())
                .filter(|s| !s.is_empty())
                .map(String::from)
                .collect(),
            None => args.symbols.chars().map(String::from).collect(),
        };
        if symbols.is_empty() {
            bail!("SYMBOLS must contain at least one symbol");
        }

        let filter = Filter {
            include: Patterns {
                starts: args.starts,
                ends: args.ends,
                contains: args.contains,
            },
            exclude: Patterns {
                starts: args.exclude_starts,
                ends: args.exclude_ends,
                contains: args.exclude_contains,
            },
        };

        Ok(Self {
            symbols,
            filter,
            limit: args.limit,
            collation: args.collation.into(),
            json: args.json,
        })
    }
}
