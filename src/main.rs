use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tabled::{settings::Style, Table, Tabled};
use tracing_subscriber::EnvFilter;

use invoice_viewer::config::{config_dir, init_config_dir, load_config};
use invoice_viewer::engine::data_bounds;
use invoice_viewer::{
    Config, FilterDraft, FilterStore, Invoice, InvoiceRepository, InvoiceStateEngine,
    InvoiceStatus, Result, UiState, ViewerError,
};

#[derive(Parser)]
#[command(name = "invoice-viewer")]
#[command(version, about = "Browse invoices with date, amount and status filters", long_about = None)]
struct Cli {
    /// Path to config directory (default: ~/.invoice-viewer or XDG config)
    #[arg(short = 'C', long, global = true)]
    config_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize config directory with a template config and sample data
    Init,

    /// List invoices, optionally filtered
    List {
        /// Only invoices issued on or after this date (dd/mm/yyyy)
        #[arg(long)]
        from: Option<String>,

        /// Only invoices issued on or before this date (dd/mm/yyyy)
        #[arg(long)]
        to: Option<String>,

        /// Minimum amount (inclusive)
        #[arg(long)]
        min: Option<i64>,

        /// Maximum amount (inclusive)
        #[arg(long)]
        max: Option<i64>,

        /// Accepted status (can be repeated)
        #[arg(short, long, value_enum)]
        status: Vec<StatusArg>,

        /// Start from a cleared filter spanning the whole dataset
        #[arg(long)]
        clear: bool,
    },

    /// Fetch invoices again and replace the local cache
    Refresh,

    /// Show configuration and cached dataset summary
    Status,
}

#[derive(Clone, Copy, ValueEnum)]
enum StatusArg {
    Paid,
    Voided,
    FixedInstallment,
    Pending,
    PaymentPlan,
}

impl From<StatusArg> for InvoiceStatus {
    fn from(arg: StatusArg) -> Self {
        match arg {
            StatusArg::Paid => InvoiceStatus::Paid,
            StatusArg::Voided => InvoiceStatus::Voided,
            StatusArg::FixedInstallment => InvoiceStatus::FixedInstallment,
            StatusArg::Pending => InvoiceStatus::Pending,
            StatusArg::PaymentPlan => InvoiceStatus::PaymentPlan,
        }
    }
}

/// Filter edits requested on the command line
struct ListArgs {
    from: Option<String>,
    to: Option<String>,
    min: Option<i64>,
    max: Option<i64>,
    statuses: Vec<InvoiceStatus>,
    clear: bool,
}

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    // Determine config directory
    let cfg_dir = match cli.config_dir {
        Some(p) => p,
        None => config_dir()?,
    };

    match cli.command {
        Commands::Init => cmd_init(&cfg_dir),
        Commands::List {
            from,
            to,
            min,
            max,
            status,
            clear,
        } => cmd_list(
            &cfg_dir,
            ListArgs {
                from,
                to,
                min,
                max,
                statuses: status.into_iter().map(InvoiceStatus::from).collect(),
                clear,
            },
        ),
        Commands::Refresh => cmd_refresh(&cfg_dir),
        Commands::Status => cmd_status(&cfg_dir),
    }
}

/// Install the stderr log subscriber. RUST_LOG wins over the config file.
fn init_logging(config: Option<&Config>) {
    let configured = config
        .and_then(|c| c.log.level.as_deref())
        .unwrap_or("warn");
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(configured))
        .unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn runtime() -> Result<tokio::runtime::Runtime> {
    Ok(tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?)
}

fn open_repository(cfg_dir: &Path, config: &Config) -> Result<InvoiceRepository> {
    InvoiceRepository::open(config.cache(cfg_dir), config.endpoint(cfg_dir)?)
}

/// Initialize config directory with template files
fn cmd_init(cfg_dir: &Path) -> Result<()> {
    init_logging(None);
    init_config_dir(cfg_dir)?;

    println!("Initialized invoice viewer config at: {}", cfg_dir.display());
    println!();
    println!("Next steps:");
    println!(
        "  1. Point the viewer at your API:  $EDITOR {}/config.toml",
        cfg_dir.display()
    );
    println!("     (mock mode serves {}/mock/facturas.json)", cfg_dir.display());
    println!("  2. List invoices:                invoice-viewer list");

    Ok(())
}

#[derive(Tabled)]
struct InvoiceRow {
    #[tabled(rename = "#")]
    index: usize,
    #[tabled(rename = "DATE")]
    date: String,
    #[tabled(rename = "STATUS")]
    status: String,
    #[tabled(rename = "AMOUNT")]
    amount: String,
}

/// List invoices through the state engine
fn cmd_list(cfg_dir: &Path, args: ListArgs) -> Result<()> {
    let config = load_config(cfg_dir)?;
    init_logging(Some(&config));
    let repository = Arc::new(open_repository(cfg_dir, &config)?);

    runtime()?.block_on(async {
        let store = Arc::new(FilterStore::new());
        let engine = InvoiceStateEngine::new(repository, Arc::clone(&store));

        if let UiState::Error(message) = engine.settled().await {
            return Err(ViewerError::RefreshFailed(message));
        }
        engine.resync();

        let mut draft = FilterDraft::new(Arc::clone(&store));
        if args.clear {
            draft.clear();
        }
        if let Some(from) = &args.from {
            draft.set_date_from(from);
        }
        if let Some(to) = &args.to {
            draft.set_date_to(to);
        }
        if let Some(min) = args.min {
            draft.set_amount_min(min);
        }
        if let Some(max) = args.max {
            draft.set_amount_max(max);
        }
        for status in &args.statuses {
            if !draft.statuses().is_selected(*status) {
                draft.toggle_status(*status);
            }
        }
        draft.apply();
        engine.resync();

        match engine.ui_state() {
            UiState::Success(invoices) => print_invoices(&invoices, store.filters_applied()),
            UiState::Empty(message) => println!("{message}"),
            UiState::Error(message) => return Err(ViewerError::RefreshFailed(message)),
            UiState::Loading => println!("Loading..."),
        }
        Ok(())
    })
}

fn print_invoices(invoices: &[Invoice], filters_applied: bool) {
    let rows: Vec<InvoiceRow> = invoices
        .iter()
        .enumerate()
        .map(|(idx, invoice)| InvoiceRow {
            index: idx + 1,
            date: invoice.issue_date.clone(),
            status: invoice.status_description.clone(),
            amount: format_amount(invoice.amount),
        })
        .collect();

    let total: f64 = invoices.iter().map(|invoice| invoice.amount).sum();
    let table = Table::new(rows).with(Style::rounded()).to_string();
    println!("{table}");
    println!();
    println!("Invoices: {}", invoices.len());
    println!("Total:    {}", format_amount(total));
    if filters_applied {
        println!("Filters applied. Use --clear to reset the amount range to the data.");
    }
}

/// Refresh invoices from the configured endpoint
fn cmd_refresh(cfg_dir: &Path) -> Result<()> {
    let config = load_config(cfg_dir)?;
    init_logging(Some(&config));
    let repository = Arc::new(open_repository(cfg_dir, &config)?);

    runtime()?.block_on(async {
        let store = Arc::new(FilterStore::new());
        let engine = InvoiceStateEngine::new(Arc::clone(&repository) as _, store);
        // Dropped if the engine already started a refresh for an empty cache
        engine.retry();

        match engine.settled().await {
            UiState::Error(message) => Err(ViewerError::RefreshFailed(message)),
            _ => {
                println!("Refreshed: {} invoices", repository.invoices().len());
                Ok(())
            }
        }
    })
}

/// Show configuration and cached dataset summary
fn cmd_status(cfg_dir: &Path) -> Result<()> {
    let config = load_config(cfg_dir)?;
    init_logging(Some(&config));
    let cache = config.cache(cfg_dir);
    let invoices = cache.load()?;

    println!("Invoice Viewer Status");
    println!("{}", "-".repeat(50));
    println!("Config directory: {}", cfg_dir.display());
    println!("API mode:         {}", config.api.mode);
    println!("Cache file:       {}", cache.path().display());
    println!("Cached invoices:  {}", invoices.len());

    match data_bounds(&invoices) {
        Some((min, max)) => println!("Amount range:     {min} - {max}"),
        None => println!("Amount range:     (no data, run 'invoice-viewer refresh')"),
    }

    let mut counts: Vec<(String, usize)> = Vec::new();
    for invoice in &invoices {
        let label = match invoice.status() {
            Some(status) => status.label().to_string(),
            None => format!("{} (unrecognized)", invoice.status_description),
        };
        match counts.iter_mut().find(|(l, _)| *l == label) {
            Some((_, n)) => *n += 1,
            None => counts.push((label, 1)),
        }
    }
    if !counts.is_empty() {
        println!();
        println!("By status:");
        for (label, n) in counts {
            println!("  {label}: {n}");
        }
    }

    Ok(())
}

/// Insert thousands separators into a run of ASCII digits
fn group_digits(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Format an amount with two decimal places and thousands separators
fn format_amount(value: f64) -> String {
    let rounded = format!("{:.2}", value.abs());
    let (whole, frac) = rounded.split_once('.').unwrap_or((rounded.as_str(), "00"));
    let grouped = group_digits(whole);
    let sign = if value < 0.0 && rounded != "0.00" { "-" } else { "" };
    format!("{sign}{grouped}.{frac} €")
}
