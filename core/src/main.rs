use bidsify_core::cli::{Cli, OutputFormat};
use bidsify_core::{BidsConverter, ConversionSummary, TextReport};
use clap::Parser;
use log::{error, info};
use std::process;

fn main() {
    let cli = Cli::parse();

    setup_logging(cli.verbose);

    let config = cli.config();
    info!(
        "Convert data to BIDS format. Input: {} Output: {}",
        config.input_root().display(),
        config.output_root().display()
    );

    let converter = BidsConverter::new(config);
    let summary = match converter.run() {
        Ok(summary) => summary,
        Err(e) => {
            error!("Conversion failed: {}", e);
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };

    output_summary(&summary, cli.format);
}

fn setup_logging(verbose: bool) {
    if verbose {
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Debug)
            .init();
    } else {
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Info)
            .init();
    }
}

fn output_summary(summary: &ConversionSummary, format: OutputFormat) {
    match format {
        OutputFormat::Text => {
            println!("{}", TextReport::new(summary));
        }
        OutputFormat::Json => {
            #[cfg(feature = "json")]
            {
                match serde_json::to_string_pretty(summary) {
                    Ok(json) => println!("{}", json),
                    Err(e) => {
                        error!("Failed to serialize to JSON: {}", e);
                        eprintln!("Error: Failed to serialize to JSON: {}", e);
                        process::exit(1);
                    }
                }
            }
            #[cfg(not(feature = "json"))]
            {
                eprintln!("Error: JSON output requires the 'json' feature");
                eprintln!("Rebuild with: cargo build --features json");
                process::exit(1);
            }
        }
    }
}
