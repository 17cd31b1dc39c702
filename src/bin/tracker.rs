//! Command-line front end for the parcel tracker.

use std::path::PathBuf;

use anyhow::Context;
use clap::{ArgAction, Parser, Subcommand};
use parcel_tracker::{Parcel, ParcelService, ParcelStore, SqliteRepository, StoreConfig};
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "tracker")]
#[command(version, about, long_about = None)]
struct Opts {
    #[command(subcommand)]
    command: Command,

    /// Database file
    #[arg(long, default_value = "tracker.db")]
    db: PathBuf,

    /// JSON store configuration, takes precedence over --db
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// More log output (-v, -vv)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

#[derive(Subcommand, Debug)]
#[command(arg_required_else_help(true))]
enum Command {
    /// Register a new parcel
    Register {
        #[arg(long)]
        client: i64,

        #[arg(long)]
        address: String,
    },
    /// Show one parcel
    Show { number: i64 },
    /// List the parcels of a client
    Client { client: i64 },
    /// Advance a parcel to its next status
    Next { number: i64 },
    /// Change the address of a registered parcel
    Address { number: i64, address: String },
    /// Delete a registered parcel
    Delete { number: i64 },
}

fn configure_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn print_parcel(parcel: &Parcel) {
    println!(
        "{}\t{}\t{}\t{}\t{}",
        parcel.number, parcel.client, parcel.status, parcel.address, parcel.created_at
    );
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let opts = Opts::parse();
    configure_tracing(opts.verbose);
    debug!(?opts, "starting");

    let config = match &opts.config {
        Some(path) => StoreConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => StoreConfig::new(&opts.db),
    };
    let store = ParcelStore::open(&config).context("opening parcel store")?;
    let service = ParcelService::new(SqliteRepository::new(store));

    match opts.command {
        Command::Register { client, address } => {
            let parcel = service.register(client, &address).await?;
            print_parcel(&parcel);
        }
        Command::Show { number } => {
            print_parcel(&service.get(number).await?);
        }
        Command::Client { client } => {
            for parcel in service.client_parcels(client).await? {
                print_parcel(&parcel);
            }
        }
        Command::Next { number } => {
            let status = service.next_status(number).await?;
            println!("{number}\t{status}");
        }
        Command::Address { number, address } => {
            service.change_address(number, &address).await?;
            print_parcel(&service.get(number).await?);
        }
        Command::Delete { number } => {
            service.delete(number).await?;
        }
    }
    Ok(())
}
