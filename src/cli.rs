use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "sarif-reporter",
    version,
    about = "Convert lint violations into a SARIF 2.1.0 report"
)]
pub struct Cli {
    /// Increase verbosity (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Read violations and write one SARIF document
    Convert(ConvertCommand),
}

#[derive(Args)]
pub struct ConvertCommand {
    /// Violation input; stdin when omitted or `-`
    pub input: Option<PathBuf>,
    #[arg(short, long, value_enum, default_value = "jsonl")]
    pub format: InputFormatArg,
    /// Directory result paths are made relative to
    #[arg(long)]
    pub root_dir: Option<String>,
    /// Write the report to this file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
    /// Also print the report to stdout when writing to a file
    #[arg(long)]
    pub tee: bool,
    #[arg(long)]
    pub tool_name: Option<String>,
    #[arg(long)]
    pub tool_version: Option<String>,
    /// Directory searched for sarif-reporter.toml (defaults to the current directory)
    #[arg(long)]
    pub config_dir: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum InputFormatArg {
    Jsonl,
    Text,
}
