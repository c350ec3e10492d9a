//! Fleet cookie tracker CLI
//!
//! Command-line tool for reconciling attached devices with imported cookie
//! files and inspecting the persisted table.

use clap::{Args, Parser, Subcommand};
use fleet_core::{
    import_cookies, refresh, AdbSource, Config, CsvStore, DeviceSource, COLUMNS,
};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "fleet-cli")]
#[command(about = "Track connected devices and their cookie files", long_about = None)]
#[command(version)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

/// Paths and delimiter shared by the table-touching subcommands
#[derive(Args)]
struct StoreArgs {
    /// Directory holding imported cookie files
    #[arg(long, default_value = "cookies")]
    cookies_dir: PathBuf,

    /// Path to the data table file
    #[arg(long, default_value = "data.csv")]
    data: PathBuf,

    /// Field delimiter for the table file
    #[arg(long, default_value_t = ',')]
    delimiter: char,
}

impl StoreArgs {
    fn config(&self) -> Config {
        if !self.delimiter.is_ascii() {
            eprintln!("Error: delimiter must be a single ASCII character");
            std::process::exit(1);
        }
        Config {
            cookies_dir: self.cookies_dir.clone(),
            data_path: self.data.clone(),
            delimiter: self.delimiter as u8,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Re-enumerate devices and cookie files and rewrite the data table
    Refresh {
        #[command(flatten)]
        store: StoreArgs,
    },

    /// Display the persisted table
    Show {
        #[command(flatten)]
        store: StoreArgs,
    },

    /// List attached devices
    Devices,

    /// Copy cookie files into the cookie directory
    Import {
        #[command(flatten)]
        store: StoreArgs,

        /// Cookie files to import
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },

    /// Print a single cell of the table
    GetCell {
        #[command(flatten)]
        store: StoreArgs,

        /// Row index (0-based)
        #[arg(long)]
        row: usize,

        /// Column index (0-based)
        #[arg(long)]
        col: usize,
    },

    /// Set a single cell, growing the table as needed
    SetCell {
        #[command(flatten)]
        store: StoreArgs,

        /// Row index (0-based)
        #[arg(long)]
        row: usize,

        /// Column index (0-based)
        #[arg(long)]
        col: usize,

        /// Value to store
        #[arg(long)]
        value: String,
    },

    /// Print the table dimensions
    Shape {
        #[command(flatten)]
        store: StoreArgs,
    },

    /// Export the table to a file
    Export {
        #[command(flatten)]
        store: StoreArgs,

        /// Output format (csv or json)
        #[arg(long, default_value = "csv")]
        format: String,

        /// Output file path
        #[arg(short, long)]
        output: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();
    setup_logging(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> fleet_core::Result<()> {
    match cli.command {
        Commands::Refresh { store } => cmd_refresh(&store.config()),
        Commands::Show { store } => cmd_show(&store.config()),
        Commands::Devices => cmd_devices(),
        Commands::Import { store, files } => cmd_import(&store.config(), &files),
        Commands::GetCell { store, row, col } => cmd_get_cell(&store.config(), row, col),
        Commands::SetCell {
            store,
            row,
            col,
            value,
        } => cmd_set_cell(&store.config(), row, col, &value),
        Commands::Shape { store } => cmd_shape(&store.config()),
        Commands::Export {
            store,
            format,
            output,
        } => cmd_export(&store.config(), &format, &output),
    }
}

fn cmd_refresh(config: &Config) -> fleet_core::Result<()> {
    let summary = refresh(&AdbSource, config)?;

    println!(
        "Updated {} with {} devices and {} cookie files ({} rows)",
        config.data_path.display(),
        summary.devices,
        summary.cookie_files,
        summary.rows
    );

    Ok(())
}

fn cmd_show(config: &Config) -> fleet_core::Result<()> {
    let rows = match config.store().read_all() {
        Ok(rows) => rows,
        Err(fleet_core::Error::NotFound(_)) => Vec::new(),
        Err(e) => return Err(e),
    };

    if rows.is_empty() {
        println!("No data in table");
        return Ok(());
    }

    println!("{}", COLUMNS.join("\t"));
    println!("{}", "-".repeat(COLUMNS.len() * 12));

    for row in &rows {
        let values: Vec<&str> = (0..COLUMNS.len())
            .map(|i| row.get(i).map(String::as_str).unwrap_or(""))
            .collect();
        println!("{}", values.join("\t"));
    }

    println!();
    println!("{} row(s) from {}", rows.len(), config.data_path.display());

    Ok(())
}

fn cmd_devices() -> fleet_core::Result<()> {
    let devices = AdbSource.list_devices();

    if devices.is_empty() {
        println!("No authorized devices found");
        return Ok(());
    }

    println!("Devices ({}):", devices.len());
    for device in &devices {
        println!("  {}\t{}", device.serial, device.model);
    }

    Ok(())
}

fn cmd_import(config: &Config, files: &[PathBuf]) -> fleet_core::Result<()> {
    let copied = import_cookies(files, &config.cookies_dir)?;

    println!(
        "Imported {} cookie file(s) into {}",
        copied.len(),
        config.cookies_dir.display()
    );
    for path in &copied {
        println!("  {}", path.display());
    }

    Ok(())
}

fn cmd_get_cell(config: &Config, row: usize, col: usize) -> fleet_core::Result<()> {
    match config.store().get_cell(row, col)? {
        Some(value) => println!("{}", value),
        None => println!("No cell at ({}, {})", row, col),
    }

    Ok(())
}

fn cmd_set_cell(config: &Config, row: usize, col: usize, value: &str) -> fleet_core::Result<()> {
    config.store().update_cell(row, col, value)?;
    println!("Set ({}, {}) = {}", row, col, value);

    Ok(())
}

fn cmd_shape(config: &Config) -> fleet_core::Result<()> {
    let (rows, cols) = config.store().shape()?;
    println!("{} x {}", rows, cols);

    Ok(())
}

fn cmd_export(config: &Config, format: &str, output: &PathBuf) -> fleet_core::Result<()> {
    let rows = config.store().read_all()?;

    match format.to_lowercase().as_str() {
        "csv" => {
            CsvStore::with_delimiter(output, config.delimiter).write_all(&rows)?;
        }
        "json" => {
            let file = File::create(output)?;
            let mut writer = BufWriter::new(file);
            let json = serde_json::to_string_pretty(&rows)?;
            writeln!(writer, "{}", json)?;
        }
        _ => {
            eprintln!("Unknown format: {}. Supported formats: csv, json", format);
            std::process::exit(1);
        }
    }

    println!("Exported {} rows to {}", rows.len(), output.display());

    Ok(())
}

/// Setup tracing/logging based on verbosity level
fn setup_logging(verbosity: u8) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).without_time())
        .with(filter)
        .init();
}
