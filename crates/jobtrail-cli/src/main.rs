use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use jobtrail::config::{load_or_default, MAX_WINDOW_DAYS};
use jobtrail::{
    ApplicationEvent, Config, DirectoryMailStore, EventKind, MailStore, PipelineError,
    RunOptions, ScanMode, Tracker, XlsxLedgerStore,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "jobtrail")]
#[command(about = "Track job-application emails in a spreadsheet ledger", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// JSON config file (overrides JOBTRAIL_CONFIG)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Root of the local mail tree (overrides mail.root)
    #[arg(long, global = true)]
    mail_root: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Log output format on stderr
    #[arg(long, global = true, value_enum, default_value = "text")]
    log_format: LogFormat,
}

#[derive(Subcommand)]
enum Commands {
    /// Scan a folder and merge matching emails into the ledger
    Track(TrackArgs),
    /// Show matching emails without writing anything
    Preview(PreviewArgs),
    /// List stores and their folders
    Folders,
}

#[derive(Args)]
struct SelectionArgs {
    /// Store (account) name under the mail root
    #[arg(long)]
    store: Option<String>,

    /// Folder inside the store
    #[arg(long)]
    folder: Option<String>,

    /// How many days back to look
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..=i64::from(MAX_WINDOW_DAYS)))]
    days: Option<u32>,

    /// Which kind of email to extract
    #[arg(long, value_enum, default_value = "acknowledgment")]
    kind: KindArg,

    /// Inspect every message instead of stopping at the first one outside the window
    #[arg(long)]
    full_scan: bool,
}

#[derive(Args)]
struct TrackArgs {
    #[command(flatten)]
    selection: SelectionArgs,

    /// Ledger file to write (defaults to the configured file for the kind)
    #[arg(long)]
    output: Option<PathBuf>,
}

#[derive(Args)]
struct PreviewArgs {
    #[command(flatten)]
    selection: SelectionArgs,

    /// Print the records as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum KindArg {
    Acknowledgment,
    Rejection,
}

impl From<KindArg> for EventKind {
    fn from(value: KindArg) -> Self {
        match value {
            KindArg::Acknowledgment => EventKind::Acknowledgment,
            KindArg::Rejection => EventKind::Rejection,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = init_logging(cli.verbose, cli.log_format) {
        eprintln!("WARNING: logging disabled: {e:#}");
    }

    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("ERROR: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbose: bool, format: LogFormat) -> Result<()> {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);

    match format {
        LogFormat::Text => tracing::subscriber::set_global_default(builder.finish())?,
        LogFormat::Json => tracing::subscriber::set_global_default(builder.json().finish())?,
    }
    tracing_log::LogTracer::init()?;

    Ok(())
}

fn run(cli: Cli) -> Result<ExitCode> {
    let mut config = load_settings(&cli)?;
    let mail = DirectoryMailStore::new(config.mail_root());

    match cli.command {
        Commands::Track(args) => track(&mut config, &mail, args),
        Commands::Preview(args) => preview(&mut config, &mail, args),
        Commands::Folders => folders(&mail),
    }
}

fn load_settings(cli: &Cli) -> jobtrail::Result<Config> {
    let mut config = load_or_default(cli.config.as_deref())?;
    if let Some(root) = &cli.mail_root {
        config.mail.root = root.to_string_lossy().into_owned();
    }
    Ok(config)
}

/// Applies the selection flags to the config and returns the kind and run options.
fn select(config: &mut Config, args: &SelectionArgs) -> Result<(EventKind, RunOptions)> {
    if args.full_scan {
        config.scan_mode = ScanMode::FullScan;
    }

    let store = args
        .store
        .clone()
        .or_else(|| config.mail.store.clone())
        .context("No store given; pass --store or set mail.store in the config")?;

    let options = RunOptions {
        store,
        folder: args
            .folder
            .clone()
            .unwrap_or_else(|| config.mail.folder.clone()),
        window_days: args.days.unwrap_or(config.window_days),
    };
    Ok((args.kind.into(), options))
}

fn track(config: &mut Config, mail: &DirectoryMailStore, args: TrackArgs) -> Result<ExitCode> {
    let (kind, options) = select(config, &args.selection)?;
    let output = args
        .output
        .unwrap_or_else(|| config.output_path(kind));
    let ledger = XlsxLedgerStore::new(&output, config.ledger.sheet_name.clone());

    let tracker = Tracker::new(config, kind);
    match tracker.run(mail, &ledger, &options) {
        Ok(summary) => {
            println!(
                "Wrote {} rows to {} ({} new, {} already tracked)",
                summary.merge.total_rows,
                summary.output,
                summary.merge.new_rows,
                summary.merge.duplicates
            );
            Ok(ExitCode::SUCCESS)
        }
        Err(e) if e.is_empty_result() => {
            println!("{e}. Nothing written.");
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => Err(e.into()),
    }
}

fn preview(config: &mut Config, mail: &DirectoryMailStore, args: PreviewArgs) -> Result<ExitCode> {
    let (kind, options) = select(config, &args.selection)?;
    let tracker = Tracker::new(config, kind);
    let report = tracker.preview(mail, &options)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report.events)?);
    } else if report.events.is_empty() {
        println!("{}", PipelineError::NoMatches { kind, window_days: options.window_days });
    } else {
        for event in &report.events {
            print_event(event);
        }
        println!(
            "{} matching of {} inspected{}",
            report.events.len(),
            report.inspected,
            if report.stopped_early { " (stopped at window edge)" } else { "" }
        );
    }

    Ok(ExitCode::SUCCESS)
}

fn print_event(event: &ApplicationEvent) {
    let attachment = if event.has_attachments { " [attachment]" } else { "" };
    println!(
        "{}  {} <{}>  {}{}",
        event.date_received_str(),
        event.sender_name,
        event.sender_email,
        event.subject,
        attachment
    );
}

fn folders(mail: &DirectoryMailStore) -> Result<ExitCode> {
    let listings = mail
        .list_folders()
        .context("Failed to list mail folders")?;

    if listings.is_empty() {
        println!("No stores under {}", mail.root().display());
    }
    for listing in listings {
        println!("{}", listing.store);
        for folder in listing.folders {
            println!("  {folder}");
        }
    }

    Ok(ExitCode::SUCCESS)
}
