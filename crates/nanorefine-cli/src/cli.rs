use clap::{Args, Parser, Subcommand};
use nanorefine::engine::config::DescriptorKind;
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    author = "Tony Kan, Ted Yu, William A. Goddard III, Victor Wai Tak Kam",
    version,
    about = "NanoRefine CLI - Refinement filters for supported-nanocluster structure searches: energy windows, fingerprint deduplication, relaxation quality gating and connectivity checks.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output except for errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Set the number of threads for descriptor evaluation.
    /// Defaults to the number of available logical cores.
    #[arg(short = 'j', long, global = true, value_name = "NUM")]
    pub threads: Option<usize>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Keep the structures within an energy window of the batch minimum.
    EnergyFilter(EnergyFilterArgs),
    /// Keep the lowest-energy structure of every distinct site-occupation fingerprint.
    GraphFilter(GraphFilterArgs),
    /// Reset collapsed surrogate relaxations to their unrelaxed geometry.
    QualityGate(QualityGateArgs),
    /// Deduplicate refined structures and drop clusters that split into islands.
    Finalize(FinalizeArgs),
}

/// Arguments shared by every filtering subcommand.
#[derive(Args, Debug, Clone)]
pub struct CommonArgs {
    /// Paths to the input batch files (JSON). Batches of parallel search runs are pooled into one
    /// before filtering; they must share a template.
    #[arg(short, long, required = true, num_args(1..), value_name = "PATH")]
    pub input: Vec<PathBuf>,

    /// Path for the output batch file (JSON).
    #[arg(short, long, required = true, value_name = "PATH")]
    pub output: PathBuf,

    /// Path to an optional configuration file in TOML format.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Set a specific configuration value, overriding the config file.
    /// Can be used multiple times. Example: -S energy-window.threshold=0.5
    #[arg(short = 'S', long = "set", value_name = "KEY=VALUE", num_args(0..))]
    pub set_values: Vec<String>,

    /// Index of the search run. Output files are named `<stem>_NNN.<ext>` after it.
    #[arg(long, value_name = "INT")]
    pub run_index: Option<u32>,
}

/// Descriptor backend overrides for the graph-based subcommands.
#[derive(Args, Debug, Clone, Default)]
pub struct DescriptorArgs {
    /// Override the descriptor backend ('precomputed' or 'cutoff').
    #[arg(long, value_name = "KIND")]
    pub descriptor: Option<DescriptorKind>,

    /// Override the covalent-radius scale of the cutoff descriptor.
    #[arg(long, value_name = "FLOAT")]
    pub cutoff_scale: Option<f64>,
}

/// Arguments for the `energy-filter` subcommand.
#[derive(Args, Debug)]
pub struct EnergyFilterArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Override the width of the energy window, in eV.
    #[arg(short = 't', long, value_name = "FLOAT")]
    pub threshold: Option<f64>,
}

/// Arguments for the `graph-filter` subcommand.
#[derive(Args, Debug)]
pub struct GraphFilterArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    #[command(flatten)]
    pub descriptor: DescriptorArgs,
}

/// Arguments for the `quality-gate` subcommand.
#[derive(Args, Debug)]
pub struct QualityGateArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Override the kernel bandwidth of the energy-change density, in eV.
    #[arg(short, long, value_name = "FLOAT")]
    pub bandwidth: Option<f64>,

    /// Write a CSV report of every gate decision to this path.
    #[arg(short, long, value_name = "PATH")]
    pub report: Option<PathBuf>,
}

/// Arguments for the `finalize` subcommand.
#[derive(Args, Debug)]
pub struct FinalizeArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    #[command(flatten)]
    pub descriptor: DescriptorArgs,

    /// Skip the connectivity check and keep split clusters.
    #[arg(long)]
    pub no_joined_filter: bool,
}
