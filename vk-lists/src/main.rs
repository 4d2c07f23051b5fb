use std::io::IsTerminal;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use vk_lists::config::{self, Config};
use vk_lists::{extensions, layers, Logger, ResultLog, ScanMode};

/// Extracts Vulkan 1.2 extension and instance layer lists.
#[derive(Debug, Parser)]
#[command(name = "vk-lists", version)]
struct Cli {
    /// Directory holding `parser_in` and `parser_out` [default: three levels
    /// above the working directory]
    #[arg(long)]
    root: Option<PathBuf>,

    /// Directory with the registry and layer manifests
    #[arg(long)]
    input: Option<PathBuf>,

    /// Directory receiving the lists and `result_log.txt`
    #[arg(long)]
    output: Option<PathBuf>,

    /// Registry file name inside the input directory
    #[arg(long, default_value = config::REGISTRY_FILE_NAME)]
    registry: String,

    /// How the registry is read
    #[arg(long, value_enum, default_value_t = Mode::Lines)]
    mode: Mode,

    /// Exit without waiting for Enter
    #[arg(long)]
    no_pause: bool,

    /// More diagnostics on stderr (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Only errors on stderr
    #[arg(short, long)]
    quiet: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Mode {
    Lines,
    Elements,
}

impl From<Mode> for ScanMode {
    fn from(mode: Mode) -> ScanMode {
        match mode {
            Mode::Lines => ScanMode::Lines,
            Mode::Elements => ScanMode::Elements,
        }
    }
}

fn init_tracing(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(match verbose {
                0 => "warn",
                1 => "debug",
                _ => "trace",
            })
        })
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn build_config(cli: &Cli) -> std::io::Result<Config> {
    let root = match &cli.root {
        Some(root) => root.clone(),
        None => config::default_root(&std::env::current_dir()?),
    };

    let mut config = Config::from_root(&root);
    if let Some(input) = &cli.input {
        config.input_dir = input.clone();
    }
    if let Some(output) = &cli.output {
        config.output_dir = output.clone();
    }
    config.registry_file = cli.registry.clone();
    config.scan_mode = cli.mode.into();
    Ok(config)
}

fn wait_for_enter(cli: &Cli) {
    let stdin = std::io::stdin();
    if cli.no_pause || !stdin.is_terminal() {
        return;
    }
    let mut line = String::new();
    if let Err(e) = stdin.read_line(&mut line) {
        tracing::debug!("failed to wait for enter: {}", e);
    }
}

/// Runs both stages. Errors have already been logged when this returns
/// `false`.
fn run(config: &Config) -> bool {
    let mut console = ResultLog::console();

    if !config.input_dir.exists() {
        console.error(
            0,
            &format!(
                "Failed to find {} folder from '{}'!",
                config::INPUT_DIR_NAME,
                config.input_dir.display()
            ),
        );
        return false;
    }
    if !config.output_dir.exists() {
        console.error(
            0,
            &format!(
                "Failed to find {} folder from '{}'!",
                config::OUTPUT_DIR_NAME,
                config.output_dir.display()
            ),
        );
        return false;
    }

    let log_path = config.result_log_path();
    let mut log = match ResultLog::create(&log_path) {
        Ok(log) => log,
        Err(e) => {
            tracing::debug!("{:?}", e);
            console.error(
                0,
                &format!("Failed to open '{}' for writing!", log_path.display()),
            );
            return false;
        }
    };

    log.message(0, "Starting to parse extensions...");
    let registry = config.registry_path();
    match extensions::run(&registry, &config.output_dir, config.scan_mode, &mut log) {
        Ok(_) => log.success(0, "Parsed all extensions!"),
        Err(e) => {
            log.error(0, &e.to_string());
            log.error(0, "Failed to parse extensions!");
            return false;
        }
    }

    log.message(0, "Starting to parse layers...");
    match layers::run(&config.input_dir, &config.output_dir, &mut log) {
        Ok(_) => log.success(0, "Parsed all layers!"),
        Err(e) => {
            log.error(0, &e.to_string());
            log.error(0, "Failed to parse layers!");
            return false;
        }
    }

    true
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    let ok = match build_config(&cli) {
        Ok(config) => {
            tracing::debug!("{:?}", config);
            run(&config)
        }
        Err(e) => {
            ResultLog::console().error(0, &format!("Failed to resolve working directory: {}", e));
            false
        }
    };

    wait_for_enter(&cli);
    if ok {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
