mod cli;

use clap::Parser;
use sarif_reporter::input::{self, InputFormat};
use sarif_reporter::{config, logging, Formatter, OutputSink, ReporterError, SarifReport};
use std::fs::File;
use std::io::{self, BufReader};
use std::path::Path;
use tracing::info;

pub mod exit_code {
    pub const SUCCESS: i32 = 0;
    pub const WARNINGS: i32 = 1;
    pub const ERRORS: i32 = 2;
    pub const RUNTIME_FAILURE: i32 = 3;
}

fn run() -> Result<i32, ReporterError> {
    let cli = cli::Cli::parse();
    logging::init_logging(cli.verbose, cli.quiet);
    match cli.command {
        cli::Commands::Convert(cmd) => convert(cmd),
    }
}

fn convert(cmd: cli::ConvertCommand) -> Result<i32, ReporterError> {
    let config_dir = match cmd.config_dir {
        Some(dir) => dir,
        None => std::env::current_dir()?,
    };
    let loaded = config::load_config(&config_dir)?.unwrap_or_default();

    let mut tool = loaded.tool_info();
    if let Some(name) = cmd.tool_name {
        tool.name = name;
    }
    if let Some(version) = cmd.tool_version {
        tool.version = version;
    }
    let root_dir = cmd
        .root_dir
        .or_else(|| loaded.root_dir().map(str::to_string));

    let format = match cmd.format {
        cli::InputFormatArg::Jsonl => InputFormat::JsonLines,
        cli::InputFormatArg::Text => InputFormat::Text,
    };
    let violations = match cmd.input.as_deref() {
        Some(path) if path != Path::new("-") => input::read_violations(
            BufReader::new(File::open(path)?),
            format,
            root_dir.as_deref(),
        )?,
        _ => input::read_violations(io::stdin().lock(), format, root_dir.as_deref())?,
    };

    let mut report = SarifReport::new(tool);
    for violation in &violations {
        report.handle(violation)?;
    }

    // The sink is opened only once every violation has been accepted.
    let output = loaded.output.unwrap_or_default();
    let tee = cmd.tee || output.tee;
    let mut sink = match cmd.output.or(output.path) {
        Some(path) => OutputSink::to_writer(File::create(path)?, tee),
        None => OutputSink::stdout(),
    };
    report.finish(&mut sink)?;
    info!(results = report.results().len(), "report written");

    if report.has_error_level() {
        Ok(exit_code::ERRORS)
    } else if !report.is_empty() {
        Ok(exit_code::WARNINGS)
    } else {
        Ok(exit_code::SUCCESS)
    }
}

fn main() {
    match run() {
        Ok(code) => {
            if code != 0 {
                std::process::exit(code);
            }
        }
        Err(e) => {
            eprintln!("error: {}", e);
            std::process::exit(exit_code::RUNTIME_FAILURE);
        }
    }
}
