use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use profile_sync::config::KNOWN_REFERENCE_RULES;
use profile_sync::{ProfileSync, SnapshotTransport, SyncReport, SyncStatus};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Profile Sync - reconcile local profile metadata with a remote org
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Log debug output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Retrieve profiles from the org and merge them onto local files
    Reconcile(ReconcileArgs),
    /// Show which profiles are added, updated or deleted without writing
    Status(SyncArgs),
}

#[derive(Args, Debug)]
struct SyncArgs {
    /// Project root containing sfdx-project.json
    #[arg(long, env = "PROFILE_SYNC_PROJECT", default_value = ".")]
    project: PathBuf,

    /// Directory holding the org snapshot
    #[arg(long, env = "PROFILE_SYNC_REMOTE")]
    remote: PathBuf,

    /// Source folders to sync. Omit to scan every package directory and
    /// fetch profiles that only exist in the org.
    #[arg(short, long = "folder", value_delimiter = ',')]
    folders: Vec<String>,

    /// Profiles to sync. Defaults to every profile found locally.
    #[arg(short, long = "profile", value_delimiter = ',')]
    profiles: Vec<String>,

    /// Print the result as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Args, Debug)]
struct ReconcileArgs {
    #[command(flatten)]
    sync: SyncArgs,

    /// Delete local profiles that no longer exist in the org
    #[arg(short, long)]
    delete: bool,

    /// Also prune class, page and application references
    #[arg(long)]
    all_references: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize logging
    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Command::Reconcile(args) => reconcile(args).await?,
        Command::Status(args) => status(args).await?,
    }

    Ok(())
}

async fn open(args: &SyncArgs) -> Result<ProfileSync> {
    let transport = Arc::new(SnapshotTransport::new(&args.remote));
    ProfileSync::open(&args.project, transport)
        .await
        .with_context(|| format!("failed to open project at {}", args.project.display()))
}

async fn reconcile(args: ReconcileArgs) -> Result<()> {
    let mut sync = open(&args.sync).await?;
    if args.all_references {
        sync = sync.with_reference_rules(KNOWN_REFERENCE_RULES.to_vec());
    }

    let report = sync
        .sync_detailed(&args.sync.folders, &args.sync.profiles, args.delete)
        .await
        .context("profile reconcile failed")?;

    info!(
        written = report.written.len(),
        unchanged = report.unchanged.len(),
        removed = report.removed.len(),
        "Reconcile finished"
    );

    if args.sync.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }
    Ok(())
}

async fn status(args: SyncArgs) -> Result<()> {
    let sync = open(&args).await?;
    let status = sync
        .status(&args.folders, &args.profiles)
        .await
        .context("failed to compute profile status")?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&status)?);
    } else {
        print_status(&status);
    }
    Ok(())
}

fn print_status(status: &SyncStatus) {
    if status.is_empty() {
        println!("No profiles to sync");
        return;
    }
    for profile in &status.added {
        println!("  + {} ({})", profile.name, profile.path);
    }
    for profile in &status.updated {
        println!("  ~ {} ({})", profile.name, profile.path);
    }
    for profile in &status.deleted {
        println!("  - {} ({})", profile.name, profile.path);
    }
}

fn print_report(report: &SyncReport) {
    print_status(&report.status);
    println!(
        "{} written, {} unchanged, {} removed",
        report.written.len(),
        report.unchanged.len(),
        report.removed.len()
    );
}
