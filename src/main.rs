use std::fs::File;
use std::path::PathBuf;
use std::process::ExitCode;

use aicli::Provider;
use aicli::core::config::{self, CliOverrides};
use clap::Parser;
use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};

#[derive(Parser)]
#[command(name = "aicli", version, about = "Chat with an AI assistant from the terminal")]
struct Args {
    /// LLM provider to use (overrides config and AICLI_PROVIDER)
    #[arg(short, long, value_enum)]
    provider: Option<Provider>,

    /// Model name (overrides config and AICLI_MODEL)
    #[arg(short, long)]
    model: Option<String>,

    /// Where to write the log; the terminal itself belongs to the UI
    #[arg(long, default_value = "aicli.log")]
    log_file: PathBuf,

    /// Log at debug level
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    dotenv::dotenv().ok();

    let log_config = ConfigBuilder::new().set_time_format_rfc3339().build();
    let level = if args.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    if let Ok(log_file) = File::create(&args.log_file) {
        let _ = WriteLogger::init(level, log_config, log_file);
    }

    let file_config = match config::load_config() {
        Ok(config) => config,
        Err(e) => {
            log::error!("{}", e);
            eprintln!("aicli: {e}");
            return ExitCode::FAILURE;
        }
    };
    let cli = CliOverrides {
        provider: args.provider.map(|p| p.as_str().to_string()),
        model: args.model,
    };
    let resolved = config::resolve(&file_config, &cli);
    log::info!(
        "aicli starting up (provider={}, model={})",
        resolved.provider,
        resolved.model
    );

    match aicli::tui::run(resolved) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            eprintln!("aicli: {e}");
            ExitCode::FAILURE
        }
    }
}
