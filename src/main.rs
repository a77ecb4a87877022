use anyhow::{Context, Result};
use log::{error, info, warn};
use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};
use std::fs;
use std::process::ExitCode;

use surfdrive_fetch::config;
use surfdrive_fetch::{fetch_with, FetchError, Outcome, TerminalProgress};

fn setup_logging() -> Result<()> {
    let log_dir = directories::BaseDirs::new()
        .ok_or_else(|| anyhow::anyhow!("Failed to get base directories"))?
        .data_local_dir()
        .join("surfdrive-fetch")
        .join("logs");

    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    let log_file = log_dir.join(format!(
        "fetch_{}.log",
        chrono::Local::now().format("%Y%m%d_%H%M%S")
    ));

    let config = ConfigBuilder::new()
        .set_time_format_rfc3339()
        .set_target_level(LevelFilter::Error)
        .set_location_level(LevelFilter::Debug)
        .build();

    let file = fs::File::create(log_file).context("Failed to create log file")?;
    WriteLogger::init(LevelFilter::Info, config, file)?;

    Ok(())
}

fn main() -> Result<ExitCode> {
    if let Err(e) = setup_logging() {
        eprintln!("file logging disabled: {}", e);
    }

    let project_root = config::project_root();
    config::load_dotenv(&project_root);

    let output = config::output_path(&project_root);
    info!("surfdrive-fetch starting");

    let mut progress = TerminalProgress::new();
    let result = fetch_with(
        |key| std::env::var(key).ok(),
        &output,
        &mut progress,
        |share| {
            println!("Target URL: {}", share.link);
            println!("Downloading to '{}'...", output.display());
        },
    );

    match result {
        Ok(Outcome::Complete { .. }) => {
            println!("Success! Saved to '{}'", output.display());
            Ok(ExitCode::SUCCESS)
        }
        Ok(Outcome::SizeMismatch { declared, received }) => {
            warn!("Kept incomplete file at {:?}", output);
            println!(
                "ERROR, something went wrong: expected {} bytes, received {}",
                declared, received
            );
            Ok(ExitCode::FAILURE)
        }
        Err(FetchError::Config(e)) => Err(e.into()),
        Err(FetchError::Download(e)) => {
            error!("Download failed: {}", e);
            println!("Error: {}", e);
            Ok(ExitCode::FAILURE)
        }
    }
}
