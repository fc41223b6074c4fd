//! fdfs-tracker CLI
//!
//! Command-line interface for querying FastDFS trackers.

use std::process::ExitCode;
use std::time::Duration;

use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::{fmt, EnvFilter};

use fdfs_tracker::protocol::Charset;
use fdfs_tracker::{ClientConfig, TrackerClient, TrackerEndpoint, TrackerReply};

/// fdfs-tracker CLI
#[derive(Parser, Debug)]
#[command(name = "fdfs-tracker-cli")]
#[command(about = "Query FastDFS tracker servers")]
#[command(version)]
struct Args {
    /// TOML configuration file
    #[arg(short, long)]
    config: Option<String>,

    /// Tracker address (host:port), may be repeated; overrides the config file
    #[arg(short, long = "tracker")]
    trackers: Vec<String>,

    /// Connect timeout in seconds
    #[arg(long)]
    connect_timeout: Option<u64>,

    /// Network timeout in seconds
    #[arg(long)]
    network_timeout: Option<u64>,

    /// Wire charset (ISO8859-1 or UTF-8)
    #[arg(long)]
    charset: Option<String>,

    /// Print results as JSON
    #[arg(long)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Storage server(s) for a new upload
    Store {
        /// Restrict to this group
        #[arg(short, long)]
        group: Option<String>,

        /// List every candidate instead of one
        #[arg(long)]
        all: bool,
    },

    /// Storage server(s) to download a file from
    Fetch {
        /// File id (group/remote_filename)
        file_id: String,

        /// List every replica instead of one
        #[arg(long)]
        all: bool,
    },

    /// Storage server to update or delete a file on
    Update {
        /// File id (group/remote_filename)
        file_id: String,
    },

    /// Statistics of every group
    Groups,

    /// Statistics of one group
    Group {
        /// Group name
        name: String,
    },

    /// Storage servers of a group
    Storages {
        /// Group name
        group: String,

        /// Only this storage server
        #[arg(long)]
        ip: Option<String>,
    },

    /// Remove a storage server from every tracker
    DeleteStorage {
        /// Group name
        group: String,

        /// Storage server address
        ip: String,
    },

    /// Active test against every tracker
    Ping,
}

fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn,fdfs_tracker=info"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let config = match build_config(&args) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("{}", e);
            return ExitCode::FAILURE;
        }
    };
    tracing::debug!("Using {} tracker(s)", config.trackers.len());

    match run(&args, &config) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(2),
        Err(e) => {
            tracing::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

/// Config file first, then command-line overrides
fn build_config(args: &Args) -> fdfs_tracker::Result<ClientConfig> {
    let base = match &args.config {
        Some(path) => Some(ClientConfig::from_file(path)?),
        None => None,
    };

    let mut builder = ClientConfig::builder();
    let trackers: Vec<TrackerEndpoint> = if args.trackers.is_empty() {
        base.as_ref().map(|c| c.trackers.clone()).unwrap_or_default()
    } else {
        args.trackers
            .iter()
            .map(|t| t.parse())
            .collect::<fdfs_tracker::Result<_>>()?
    };
    builder = builder.trackers(trackers);

    if let Some(base) = &base {
        builder = builder
            .connect_timeout(base.connect_timeout)
            .network_timeout(base.network_timeout)
            .charset(base.charset);
    }
    if let Some(secs) = args.connect_timeout {
        builder = builder.connect_timeout(Duration::from_secs(secs));
    }
    if let Some(secs) = args.network_timeout {
        builder = builder.network_timeout(Duration::from_secs(secs));
    }
    if let Some(name) = &args.charset {
        builder = builder.charset(name.parse::<Charset>()?);
    }

    builder.build()
}

/// Returns false when a tracker answered with a non-zero status
fn run(args: &Args, config: &ClientConfig) -> fdfs_tracker::Result<bool> {
    let mut client = TrackerClient::from_config(config)?;

    match &args.command {
        Commands::Store { group, all: false } => {
            let reply = client.resolve_store_target(None, group.as_deref())?;
            Ok(report(args.json, reply))
        }
        Commands::Store { group, all: true } => {
            let reply = client.resolve_store_targets(None, group.as_deref())?;
            Ok(report(args.json, reply))
        }
        Commands::Fetch { file_id, all: false } => {
            let reply = client.resolve_fetch_target_by_id(None, file_id)?;
            Ok(report(args.json, reply))
        }
        Commands::Fetch { file_id, all: true } => {
            let reply = client.resolve_fetch_targets_by_id(None, file_id)?;
            Ok(report(args.json, reply))
        }
        Commands::Update { file_id } => {
            let reply = client.resolve_update_target_by_id(None, file_id)?;
            Ok(report(args.json, reply))
        }
        Commands::Groups => {
            let reply = client.list_groups(None)?;
            Ok(report(args.json, reply))
        }
        Commands::Group { name } => {
            let reply = client.list_group(None, name)?;
            Ok(report(args.json, reply))
        }
        Commands::Storages { group, ip } => {
            let reply = client.list_storages(None, group, ip.as_deref())?;
            Ok(report(args.json, reply))
        }
        Commands::DeleteStorage { group, ip } => {
            let reply = client.delete_storage(group, ip)?;
            if reply.is_ok() {
                println!("storage {}/{} deleted", group, ip);
            }
            Ok(report_status(reply))
        }
        Commands::Ping => ping(args.json, &client),
    }
}

fn ping(json: bool, client: &TrackerClient) -> fdfs_tracker::Result<bool> {
    #[derive(Serialize)]
    struct PingResult {
        tracker: String,
        alive: bool,
        error: Option<String>,
    }

    let group = client.group();
    let mut results = Vec::with_capacity(group.len());
    for (index, endpoint) in group.endpoints().iter().enumerate() {
        let mut probe = TrackerClient::new(group.clone());
        let outcome = group
            .connect(index)
            .and_then(|mut conn| probe.active_test(Some(&mut conn)));

        let (alive, error) = match outcome {
            Ok(TrackerReply::Ok(())) => (true, None),
            Ok(TrackerReply::Status(code)) => (false, Some(format!("status {}", code))),
            Err(e) => (false, Some(e.to_string())),
        };
        results.push(PingResult {
            tracker: endpoint.to_string(),
            alive,
            error,
        });
    }

    if json {
        print_json(&results);
    } else {
        for r in &results {
            match &r.error {
                None => println!("{}  alive", r.tracker),
                Some(e) => println!("{}  DOWN ({})", r.tracker, e),
            }
        }
    }
    Ok(results.iter().all(|r| r.alive))
}

fn report<T: Serialize + std::fmt::Debug>(json: bool, reply: TrackerReply<T>) -> bool {
    match reply {
        TrackerReply::Ok(value) => {
            if json {
                print_json(&value);
            } else {
                println!("{:#?}", value);
            }
            true
        }
        TrackerReply::Status(code) => {
            eprintln!("tracker returned status {}", code);
            false
        }
    }
}

fn report_status(reply: TrackerReply<()>) -> bool {
    match reply {
        TrackerReply::Ok(()) => true,
        TrackerReply::Status(code) => {
            eprintln!("tracker returned status {}", code);
            false
        }
    }
}

fn print_json<T: Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(text) => println!("{}", text),
        Err(e) => tracing::error!("Failed to serialize output: {}", e),
    }
}
