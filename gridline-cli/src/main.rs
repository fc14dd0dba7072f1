//! `gridline` entry point: view, filter, sort and export a JSON table.

mod dataset;
mod error;
mod paths;
mod view;

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{ArgAction, Parser, ValueEnum};
use gridline_lib::Table;
use gridline_lib::config::TableConfig;
use gridline_lib::export::ExportFormat;
use gridline_lib::model::key_by_column;
use gridline_lib::pipeline::{FilterMode, SortDirection};
use simplelog::{Config, LevelFilter, WriteLogger};

use error::CliError;

#[derive(ValueEnum, Copy, Clone, Debug, PartialEq, Eq)]
enum Format {
    Csv,
    Json,
    /// Paged plain text with the header on every page.
    Print,
}

impl From<Format> for ExportFormat {
    fn from(format: Format) -> Self {
        match format {
            Format::Csv => ExportFormat::Csv,
            Format::Json => ExportFormat::Json,
            Format::Print => ExportFormat::Print,
        }
    }
}

/// View, filter, sort and export tabular JSON data.
#[derive(Parser, Debug)]
#[command(name = "gridline", version, about, long_about = None)]
struct Cli {
    /// JSON file holding an array of row objects.
    data: PathBuf,

    /// Table config file (defaults to config.json in the config directory).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Column holding each row's identity.
    #[arg(long, default_value = "id")]
    key: String,

    /// Columns to show, in order, as `key` or `key=Header` (defaults to every key).
    #[arg(long, value_delimiter = ',')]
    columns: Vec<String>,

    /// Keep rows where any targeted column contains this text.
    #[arg(short, long)]
    filter: Option<String>,

    /// Restrict the filter to these columns.
    #[arg(long, value_delimiter = ',')]
    filter_columns: Vec<String>,

    /// Match the filter fuzzily instead of by substring.
    #[arg(long)]
    fuzzy: bool,

    /// Column to sort by.
    #[arg(short, long)]
    sort: Option<String>,

    /// Sort descending.
    #[arg(long, requires = "sort")]
    desc: bool,

    /// Rows per page (overrides the config file).
    #[arg(long)]
    page_size: Option<usize>,

    /// Page to show.
    #[arg(short, long, default_value_t = 1)]
    page: usize,

    /// Select rows by key. Exports cover only the selection when set.
    #[arg(long, value_delimiter = ',')]
    select: Vec<String>,

    /// Export instead of showing a page.
    #[arg(short, long, value_enum)]
    export: Option<Format>,

    /// Export destination (defaults to stdout).
    #[arg(short, long, requires = "export")]
    output: Option<PathBuf>,

    /// Log more detail (-v debug, -vv trace).
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(match cli.verbose {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    });

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

/// Log to a fresh latest.log in the cache directory.
///
/// Logging is best-effort: without a writable cache directory the run goes on
/// unlogged.
fn init_logging(level: LevelFilter) {
    paths::rotate_logs();
    let Some(path) = paths::log_file() else { return };
    if let Some(dir) = path.parent() {
        let _ = fs::create_dir_all(dir);
    }
    match File::create(&path) {
        Ok(file) => {
            let _ = WriteLogger::init(level, Config::default(), file);
        }
        Err(e) => eprintln!("Warning: no log file at {}: {}", path.display(), e),
    }
}

fn load_config(cli: &Cli) -> Result<TableConfig, CliError> {
    let mut config = match &cli.config {
        Some(path) => TableConfig::load(path)?,
        None => match paths::config_file() {
            Some(path) if path.exists() => {
                log::debug!("using config {}", path.display());
                TableConfig::load(&path)?
            }
            _ => TableConfig::default(),
        },
    };

    if let Some(page_size) = cli.page_size {
        config = config.with_page_size(page_size);
    }
    if cli.fuzzy {
        config = config.with_filter_mode(FilterMode::Fuzzy);
    }
    config.validate()?;
    Ok(config)
}

fn run(cli: Cli) -> Result<(), CliError> {
    let config = load_config(&cli)?;
    let rows = dataset::load(&cli.data)?;
    let columns = if cli.columns.is_empty() {
        dataset::infer_columns(&rows, &cli.key)
    } else {
        dataset::named_columns(&cli.columns)
    };
    log::info!(
        "loaded {} rows with {} columns from {}",
        rows.len(),
        columns.len(),
        cli.data.display()
    );
    if !rows.is_empty() && !rows.iter().any(|row| row.contains(&cli.key)) {
        log::warn!("key column {:?} not found; rows will share one key", cli.key);
    }

    let mut table = Table::with_config(columns, key_by_column(cli.key.as_str()), config)
        .with_data(rows);

    for column in cli.filter_columns.iter().chain(&cli.sort) {
        if !table.columns().iter().any(|c| c.key == *column) {
            return Err(CliError::UnknownColumn(column.clone()));
        }
    }

    if !cli.filter_columns.is_empty() {
        table.set_filter_columns(cli.filter_columns.iter().cloned());
    }
    if let Some(text) = &cli.filter {
        table.set_filter(text.as_str());
    }
    if let Some(column) = &cli.sort {
        let direction = if cli.desc {
            SortDirection::Descending
        } else {
            SortDirection::Ascending
        };
        table.set_sort(column.as_str(), direction);
    }
    if !cli.select.is_empty() {
        table.set_selection(cli.select.iter().cloned());
    }
    table.set_page(cli.page);

    match cli.export {
        Some(format) => export(&table, format.into(), cli.output.as_deref()),
        None => {
            let stdout = io::stdout();
            view::print_page(&table, &mut stdout.lock())?;
            Ok(())
        }
    }
}

fn export(table: &Table<String>, format: ExportFormat, output: Option<&Path>) -> Result<(), CliError> {
    match output {
        Some(path) => {
            let file = File::create(path).map_err(|e| CliError::create(path, e))?;
            table.export_to(format, BufWriter::new(file))?;
            log::info!("exported {} rows to {}", table.export_rows().len(), path.display());
        }
        None => {
            let mut stdout = io::stdout().lock();
            table.export_to(format, &mut stdout)?;
            // CSV and JSON end without a newline
            if format != ExportFormat::Print {
                writeln!(stdout)?;
            }
        }
    }
    Ok(())
}
