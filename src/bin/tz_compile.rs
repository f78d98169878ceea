//! Command line driver: polygon source in, timezone artifact out
//!
//! Usage:
//!   cargo run --release --bin tz_compile -- [input] [options]
//!
//! Options:
//!   --output <path>     Artifact path (default timezone_data.bin)
//!   --names <path>      Zone name table path (default timezone_names.json)
//!   --config <path>     JSON config file, flags override it wherever they appear
//!   --sequential        Compute shortcuts on a single thread
//!   --stats             Print artifact statistics as JSON on stdout
//!   --verbose           Log progress when RUST_LOG is not set

use anyhow::{bail, Context};
use std::env;
use std::fs;
use std::path::PathBuf;
use tracing::Level;
use tz_compiler::logging::StderrTracer;
use tz_compiler::{parse_polygon_file, ArtifactReader, ArtifactStats, Compiler, CompilerConfig};

fn print_usage(program: &str) {
    eprintln!("Usage: {} [input] [options]", program);
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --output <path>     Artifact path (default timezone_data.bin)");
    eprintln!("  --names <path>      Zone name table path (default timezone_names.json)");
    eprintln!("  --config <path>     JSON config file");
    eprintln!("  --sequential        Compute shortcuts on a single thread");
    eprintln!("  --stats             Print artifact statistics as JSON");
    eprintln!("  --verbose           Log progress when RUST_LOG is not set");
}

/// Command line flags as given. Path flags stay `None` when absent so they
/// only override the config file when the user set them.
#[derive(Debug, Default, PartialEq)]
struct Options {
    config_file: Option<PathBuf>,
    input: Option<PathBuf>,
    output: Option<PathBuf>,
    zone_names: Option<PathBuf>,
    sequential: bool,
    print_stats: bool,
    verbose: bool,
}

impl Options {
    /// Defaults, then the config file, then the flags
    fn resolve(&self) -> anyhow::Result<CompilerConfig> {
        let mut config = match &self.config_file {
            Some(path) => CompilerConfig::from_file(path)
                .with_context(|| format!("failed to load config {}", path.display()))?,
            None => CompilerConfig::default(),
        };
        if let Some(input) = &self.input {
            config.input = input.clone();
        }
        if let Some(output) = &self.output {
            config.output = output.clone();
        }
        if let Some(zone_names) = &self.zone_names {
            config.zone_names = zone_names.clone();
        }
        if self.sequential {
            config.parallel = false;
        }
        Ok(config)
    }
}

fn parse_args(args: &[String]) -> anyhow::Result<Option<Options>> {
    let mut options = Options::default();

    let mut i = 1;
    while i < args.len() {
        let value = |i: usize| {
            args.get(i + 1)
                .map(PathBuf::from)
                .with_context(|| format!("{} needs a value", args[i]))
        };
        match args[i].as_str() {
            "-h" | "--help" => return Ok(None),
            "--output" => {
                options.output = Some(value(i)?);
                i += 1;
            }
            "--names" => {
                options.zone_names = Some(value(i)?);
                i += 1;
            }
            "--config" => {
                options.config_file = Some(value(i)?);
                i += 1;
            }
            "--sequential" => options.sequential = true,
            "--stats" => options.print_stats = true,
            "--verbose" => options.verbose = true,
            other if other.starts_with("--") => bail!("unknown option {}", other),
            input => options.input = Some(PathBuf::from(input)),
        }
        i += 1;
    }

    Ok(Some(options))
}

/// Compile the artifact, then the zone table. Nothing is written unless the
/// artifact was built completely.
fn run(config: &CompilerConfig) -> anyhow::Result<ArtifactStats> {
    let raw = parse_polygon_file(&config.input)
        .with_context(|| format!("failed to read polygons from {}", config.input.display()))?;
    let (compiler, zones) = Compiler::from_raw(raw)?;

    let stats = compiler
        .compile(&config.output, config.parallel)
        .with_context(|| format!("failed to compile {}", config.output.display()))?;

    // read the header back as the runtime will
    let bytes = fs::read(&config.output)?;
    let header = ArtifactReader::new(&bytes)?.header();
    if header.polygon_count as usize != stats.polygon_count || bytes.len() as u64 != stats.file_len {
        bail!(
            "{} does not read back as written ({} polygons, {} bytes)",
            config.output.display(),
            header.polygon_count,
            bytes.len()
        );
    }

    zones
        .write_json(&config.zone_names)
        .with_context(|| format!("failed to write {}", config.zone_names.display()))?;
    Ok(stats)
}

fn main() -> anyhow::Result<()> {
    let args: Vec<String> = env::args().collect();
    let options = match parse_args(&args)? {
        Some(options) => options,
        None => {
            print_usage(&args[0]);
            return Ok(());
        }
    };

    let default_level = if options.verbose { Some(Level::INFO) } else { None };
    StderrTracer::register(default_level).context("failed to install the logger")?;

    let config = options.resolve()?;
    let stats = run(&config)?;

    if options.print_stats {
        println!("{}", serde_json::to_string_pretty(&stats)?);
    }
    Ok(())
}
