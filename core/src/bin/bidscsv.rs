use bidsify_core::tabular::{add_subject_column, aggregate_levels, default_output_path};
use bidsify_core::{BidsError, Result};
use clap::{Parser, Subcommand};
use log::{error, info};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};
use std::process;

/// CSV helpers for metrics computed on BIDS data
#[derive(Parser, Debug)]
#[command(name = "bidscsv")]
#[command(about = "Post-process per-subject metric CSV files")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Aggregate rows sharing a vertebral level using a size-weighted average
    Aggregate {
        /// Path to the input CSV file
        #[arg(value_name = "INPUT_CSV")]
        input_csv: PathBuf,

        /// Path to the output CSV file [default: <input>_aggregated.csv]
        #[arg(long, alias = "output_csv")]
        output_csv: Option<PathBuf>,
    },

    /// Add a leading Subject column derived from the Filename column
    AddSubject {
        /// Path to the input CSV file
        #[arg(value_name = "INPUT_CSV")]
        input_csv: PathBuf,

        /// Path to the output CSV file [default: <input>_formatted.csv]
        #[arg(long)]
        output_csv: Option<PathBuf>,
    },
}

fn main() {
    let cli = Cli::parse();

    setup_logging(cli.verbose);

    let result = match &cli.command {
        Command::Aggregate {
            input_csv,
            output_csv,
        } => {
            let output = output_csv
                .clone()
                .unwrap_or_else(|| default_output_path(input_csv, "aggregated"));
            run(input_csv, &output, aggregate_levels).map(|rows| {
                println!("Aggregated data saved to {} ({} rows)", output.display(), rows)
            })
        }
        Command::AddSubject {
            input_csv,
            output_csv,
        } => {
            let output = output_csv
                .clone()
                .unwrap_or_else(|| default_output_path(input_csv, "formatted"));
            run(input_csv, &output, add_subject_column).map(|rows| {
                println!(
                    "Updated CSV with subject column saved to {} ({} rows)",
                    output.display(),
                    rows
                )
            })
        }
    };

    if let Err(e) = result {
        error!("{}", e);
        eprintln!("Error: {}", e);
        process::exit(1);
    }
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

/// Opens `input`, creates `output` and applies `transform` between them
fn run<F>(input: &Path, output: &Path, transform: F) -> Result<usize>
where
    F: FnOnce(BufReader<File>, BufWriter<File>) -> Result<usize>,
{
    info!("Reading {}", input.display());
    let reader = File::open(input).map_err(|e| BidsError::io(input, e))?;
    let writer = File::create(output).map_err(|e| BidsError::io(output, e))?;
    transform(BufReader::new(reader), BufWriter::new(writer))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_run_aggregate_to_default_path() {
        let temp_dir = TempDir::new().unwrap();
        let input = temp_dir.path().join("csa.csv");
        fs::write(
            &input,
            "Filename,VertLevel,Size [vox],MAP(),STD()\nsub-LC164_T2.nii.gz,2,10,1.5,0.5\n",
        )
        .unwrap();

        let output = default_output_path(&input, "aggregated");
        let rows = run(&input, &output, aggregate_levels).unwrap();

        assert_eq!(rows, 1);
        assert_eq!(output, temp_dir.path().join("csa_aggregated.csv"));
        assert_eq!(
            fs::read_to_string(&output).unwrap(),
            "subject,VertLevel,Size [vox],MAP(),STD()\nsub-LC164,2,10.0,1.5,0.5\n"
        );
    }

    #[test]
    fn test_run_missing_input() {
        let temp_dir = TempDir::new().unwrap();
        let err = run(
            &temp_dir.path().join("absent.csv"),
            &temp_dir.path().join("out.csv"),
            add_subject_column,
        )
        .unwrap_err();
        assert!(matches!(err, BidsError::Io { .. }));
    }

    #[test]
    fn test_parse_subcommands() {
        let cli = Cli::parse_from(["bidscsv", "aggregate", "in.csv", "--output-csv", "out.csv"]);
        assert!(matches!(
            cli.command,
            Command::Aggregate { output_csv: Some(ref p), .. } if p == Path::new("out.csv")
        ));

        let cli = Cli::parse_from(["bidscsv", "add-subject", "in.csv", "-v"]);
        assert!(cli.verbose);
        assert!(matches!(cli.command, Command::AddSubject { output_csv: None, .. }));
    }
}
