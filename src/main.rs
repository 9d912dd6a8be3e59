//! Binary entry point for mnemex.
//!
//! This binary provides the CLI interface for the mnemex expertise store.

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(missing_docs)]
// Allow print_stderr in main binary for CLI output
#![allow(clippy::print_stderr)]
#![allow(clippy::print_stdout)]
// Allow needless_pass_by_value for command functions
#![allow(clippy::needless_pass_by_value)]

use anyhow::Context;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use mnemex::cli::{RecordArgs, parse_domains};
use mnemex::config::MnemexConfig;
use mnemex::models::DomainName;
use mnemex::rendering::{render_domain, render_record};
use mnemex::services::{
    CaptureOutcome, CaptureRequest, CharCostEstimator, RecallRequest, capture, compact_domain,
    delete_record, edit_record, recall, resolve_selector,
};
use mnemex::storage::DomainRegistry;
use std::path::PathBuf;
use std::process::ExitCode;

/// Mnemex - a concurrency-safe, file-backed expertise store.
#[derive(Parser)]
#[command(name = "mnemex")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to configuration file.
    #[arg(short, long, global = true, env = "MNEMEX_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands.
#[derive(Subcommand)]
enum Commands {
    /// Manage domains.
    Domain {
        #[command(subcommand)]
        command: DomainCommands,
    },

    /// Capture a record into a domain.
    Record {
        /// Target domain.
        domain: String,

        #[command(flatten)]
        record: RecordArgs,

        /// Append an exact duplicate instead of skipping it.
        #[arg(long)]
        force: bool,
    },

    /// Print one record by identifier, prefix, or 1-based position.
    Show {
        /// Domain to search.
        domain: String,

        /// Identifier, prefix, or position.
        selector: String,
    },

    /// Replace a record in place.
    Edit {
        /// Domain containing the record.
        domain: String,

        /// Identifier, prefix, or position of the record to replace.
        selector: String,

        #[command(flatten)]
        record: RecordArgs,
    },

    /// Delete a record.
    Delete {
        /// Domain containing the record.
        domain: String,

        /// Identifier, prefix, or position.
        selector: String,
    },

    /// Merge two or more records into one consolidated record.
    Compact {
        /// Domain containing the records.
        domain: String,

        /// Identifiers, prefixes, or positions of the records to merge.
        #[arg(num_args = 2.., required = true)]
        selectors: Vec<String>,
    },

    /// Read records across domains, optionally within a token budget.
    Recall {
        /// Domains to read (default: all registered domains).
        domains: Vec<String>,

        /// Token budget for the assembled output.
        #[arg(short, long)]
        budget: Option<usize>,
    },

    /// Show per-domain record counts.
    Status,

    /// Generate shell completions.
    Completions {
        /// Target shell.
        shell: Shell,
    },
}

/// Domain management subcommands.
#[derive(Subcommand)]
enum DomainCommands {
    /// Register a new, empty domain.
    Add {
        /// Domain name.
        name: String,
    },
    /// List registered domains.
    List,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let config = match MnemexConfig::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            return ExitCode::FAILURE;
        },
    };

    match run_command(cli, &config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        },
    }
}

/// Initializes tracing output to stderr.
fn init_logging(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let default_filter = if verbose { "mnemex=debug" } else { "mnemex=warn" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Runs the selected command.
fn run_command(cli: Cli, config: &MnemexConfig) -> anyhow::Result<()> {
    let registry = DomainRegistry::new(&config.data_dir).with_lock_settings(config.lock);

    match cli.command {
        Commands::Domain { command } => match command {
            DomainCommands::Add { name } => {
                let name = DomainName::parse(&name)?;
                registry.add(&name)?;
                println!("Added domain '{name}'");
            },
            DomainCommands::List => {
                let names = registry.list()?;
                if names.is_empty() {
                    println!("No domains registered");
                }
                for name in names {
                    println!("{name}");
                }
            },
        },

        Commands::Record {
            domain,
            record,
            force,
        } => {
            let name = DomainName::parse(&domain)?;
            let store = registry.require(&name)?;
            let record = record.build()?;
            let outcome = capture(&store, CaptureRequest::new(record).with_force(force))
                .with_context(|| format!("capturing into '{name}'"))?;
            match outcome {
                CaptureOutcome::Appended { id } => println!("Recorded {id}"),
                CaptureOutcome::Updated { id, index } => {
                    println!("Updated {id} (position {})", index + 1);
                },
                CaptureOutcome::Skipped { id, index } => {
                    println!("Skipped duplicate of {id} (position {})", index + 1);
                },
            }
        },

        Commands::Show { domain, selector } => {
            let name = DomainName::parse(&domain)?;
            let records = registry.store(&name).read_all()?;
            let index = resolve_selector(&records, &selector)?;
            print!("{}", render_record(&records[index]));
        },

        Commands::Edit {
            domain,
            selector,
            record,
        } => {
            let name = DomainName::parse(&domain)?;
            let store = registry.require(&name)?;
            let id = edit_record(&store, &selector, record.build()?)?;
            println!("Edited {id}");
        },

        Commands::Delete { domain, selector } => {
            let name = DomainName::parse(&domain)?;
            let store = registry.require(&name)?;
            let removed = delete_record(&store, &selector)?;
            match removed.id {
                Some(id) => println!("Deleted {id}"),
                None => println!("Deleted record"),
            }
        },

        Commands::Compact { domain, selectors } => {
            let name = DomainName::parse(&domain)?;
            let store = registry.require(&name)?;
            let merged = compact_domain(&store, &selectors)?;
            let absorbed = merged.supersedes.as_ref().map_or(0, Vec::len);
            println!("Compacted {absorbed} records into {}", merged.identity());
        },

        Commands::Recall { domains, budget } => {
            let domains = if domains.is_empty() {
                registry.list()?
            } else {
                parse_domains(&domains)?
            };
            let request = RecallRequest {
                domains,
                budget: budget.or(config.default_budget),
            };
            let result = recall(&registry, &request, &CharCostEstimator)?;
            for domain in &result.domains {
                print!("{}", render_domain(&domain.domain, &domain.records));
            }
            if result.dropped_records > 0 {
                eprintln!(
                    "({} records and {} domains dropped to fit the budget)",
                    result.dropped_records, result.dropped_domains
                );
            }
        },

        Commands::Status => {
            let names = registry.list()?;
            if names.is_empty() {
                println!("No domains registered");
            }
            for name in names {
                let count = registry.store(&name).read_all()?.len();
                println!("{name}: {count} records");
            }
        },

        Commands::Completions { shell } => {
            let mut command = Cli::command();
            let bin_name = command.get_name().to_string();
            clap_complete::generate(shell, &mut command, bin_name, &mut std::io::stdout());
        },
    }

    Ok(())
}
