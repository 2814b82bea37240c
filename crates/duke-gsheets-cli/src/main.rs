//! Duke GSheets CLI - read and append header-keyed records

use anyhow::{Context, Result};
use clap::{ArgGroup, Parser, Subcommand};
use duke_gsheets::{records_from_csv, records_from_json, Record, SheetsClient, SheetsConfig};
use gsheets_protocol::a1;
use std::fs::File;
use std::io::{self, BufReader, Write};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "gsheets")]
#[command(
    author,
    version,
    about = "Read and append header-keyed records on Google Sheets"
)]
struct Cli {
    /// Service-account JSON key
    #[arg(long, global = true, env = "GSHEETS_CREDENTIALS", default_value = "credentials.json")]
    credentials: PathBuf,

    /// Display name of the spreadsheet
    #[arg(long, global = true, env = "GSHEETS_SPREADSHEET")]
    spreadsheet: Option<String>,

    /// Raise log verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the records of a worksheet, one per line
    Read {
        /// Worksheet index (0-based, default: 0)
        #[arg(short, long, default_value = "0")]
        worksheet: u32,

        /// Print compact JSON objects
        #[arg(long)]
        json: bool,
    },

    /// Append three sample Name/Age/City records
    WriteSample {
        /// Target worksheet title, created if missing
        #[arg(short, long, default_value = "sample_people_data_1")]
        worksheet: String,
    },

    /// Append records read from a CSV or JSON file
    #[command(group(ArgGroup::new("input").required(true).args(["csv", "json"])))]
    Append {
        /// Target worksheet title, created if missing
        #[arg(short, long)]
        worksheet: String,

        /// CSV file whose first line is the header row
        #[arg(long)]
        csv: Option<PathBuf>,

        /// JSON file holding an array of objects
        #[arg(long)]
        json: Option<PathBuf>,
    },

    /// List the worksheets of the spreadsheet
    Worksheets,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = SheetsConfig::new(cli.credentials, cli.spreadsheet.unwrap_or_default());

    match cli.command {
        Commands::Read { worksheet, json } => read(&config, worksheet, json),
        Commands::WriteSample { worksheet } => write_records(&config, &worksheet, &sample_people()),
        Commands::Append {
            worksheet,
            csv,
            json,
        } => {
            let records = match (csv, json) {
                (Some(path), _) => load_csv(&path)?,
                (None, Some(path)) => load_json(&path)?,
                (None, None) => anyhow::bail!("Pass --csv or --json"),
            };
            write_records(&config, &worksheet, &records)
        }
        Commands::Worksheets => list_worksheets(&config),
    }
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        _ => tracing::Level::DEBUG,
    };
    let filter = EnvFilter::builder()
        .with_default_directive(default.into())
        .from_env_lossy();
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn spreadsheet_name(config: &SheetsConfig) -> Result<&str> {
    if config.spreadsheet_name.is_empty() {
        anyhow::bail!("No spreadsheet given; pass --spreadsheet or set GSHEETS_SPREADSHEET");
    }
    Ok(&config.spreadsheet_name)
}

fn read(config: &SheetsConfig, worksheet: u32, json: bool) -> Result<()> {
    let name = spreadsheet_name(config)?;
    let records = duke_gsheets::read_records(config, worksheet)
        .with_context(|| format!("Failed to read worksheet {} of '{}'", worksheet, name))?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    for record in &records {
        if json {
            serde_json::to_writer(&mut out, record).context("Failed to encode record")?;
            writeln!(out)?;
        } else {
            writeln!(out, "{record}")?;
        }
    }
    Ok(())
}

fn write_records(config: &SheetsConfig, worksheet: &str, records: &[Record]) -> Result<()> {
    let name = spreadsheet_name(config)?;
    duke_gsheets::write_records(config, worksheet, records)
        .with_context(|| format!("Failed to write to '{}' in '{}'", worksheet, name))?;
    eprintln!("Wrote {} records to '{}'", records.len(), worksheet);
    Ok(())
}

fn list_worksheets(config: &SheetsConfig) -> Result<()> {
    let name = spreadsheet_name(config)?;
    let client = SheetsClient::connect(config).context("Failed to authenticate")?;
    let spreadsheet = client
        .open(name)
        .with_context(|| format!("Failed to open '{}'", name))?;

    for ws in spreadsheet.worksheets()? {
        let grid = ws.grid();
        let extent = a1::grid_extent(grid.row_count, grid.column_count)
            .unwrap_or_else(|| "empty".to_string());
        println!(
            "{}\t{}\t{} rows x {} columns ({})",
            ws.index(),
            ws.title(),
            grid.row_count,
            grid.column_count,
            extent
        );
    }
    Ok(())
}

fn load_csv(path: &Path) -> Result<Vec<Record>> {
    let file = File::open(path).with_context(|| format!("Failed to open '{}'", path.display()))?;
    records_from_csv(BufReader::new(file))
        .with_context(|| format!("Failed to parse CSV '{}'", path.display()))
}

fn load_json(path: &Path) -> Result<Vec<Record>> {
    let file = File::open(path).with_context(|| format!("Failed to open '{}'", path.display()))?;
    records_from_json(BufReader::new(file))
        .with_context(|| format!("Failed to parse JSON '{}'", path.display()))
}

fn sample_people() -> Vec<Record> {
    vec![
        Record::new().with("Name", "Alice").with("Age", 30).with("City", "New York"),
        Record::new().with("Name", "Bob").with("Age", 25).with("City", "Los Angeles"),
        Record::new().with("Name", "Charlie").with("Age", 35).with("City", "Chicago"),
    ]
}
