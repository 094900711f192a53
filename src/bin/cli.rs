use std::collections::BTreeSet;
use std::io::Write;
use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use permscan::config::Config;
use permscan::error::PermScanError;
use permscan::output::OutputFormat;
use permscan::{invite, table, InviteRequest, ScanOptions};

#[derive(Parser)]
#[command(
    name = "permscan",
    about = "Scan Discord bot source for required permissions and build invite URLs",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scan a bot source tree and report the permissions it references
    Scan {
        /// Path to the bot project directory
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Config file path
        #[arg(long, short = 'c')]
        config: Option<PathBuf>,

        /// Output format (console, json)
        #[arg(long, short = 'f', default_value = "console")]
        format: String,

        /// Only count explicitly declared permissions, skip heuristics
        #[arg(long)]
        no_inferred: bool,

        /// Additional directory names to exclude
        #[arg(long)]
        exclude: Vec<String>,

        /// Also print an invite URL for this client id
        #[arg(long)]
        client_id: Option<String>,

        /// Write output to file instead of stdout
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
    },

    /// Build an invite URL from a bitmask, permission names, or a scan
    Invite {
        /// The bot's application client id
        client_id: String,

        /// Explicit permission bitmask (highest priority)
        #[arg(long)]
        permissions: Option<u64>,

        /// Permission names to resolve through the catalogue
        #[arg(long = "name")]
        names: Vec<String>,

        /// Bot source tree to scan for the bitmask (lowest priority)
        #[arg(long)]
        path: Option<PathBuf>,

        /// OAuth2 scopes (default: bot applications.commands)
        #[arg(long = "scope")]
        scopes: Vec<String>,

        /// Append the URL to this file as well as printing it
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
    },

    /// List the permission catalogue
    ListPermissions {
        /// Output format (table, json)
        #[arg(long, short = 'f', default_value = "table")]
        format: String,
    },

    /// Generate a starter .permscan.toml config file
    Init {
        /// Overwrite existing config file
        #[arg(long)]
        force: bool,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Scan {
            path,
            config,
            format,
            no_inferred,
            exclude,
            client_id,
            output,
        } => cmd_scan(path, config, format, no_inferred, exclude, client_id, output),
        Commands::Invite {
            client_id,
            permissions,
            names,
            path,
            scopes,
            output,
        } => cmd_invite(client_id, permissions, names, path, scopes, output),
        Commands::ListPermissions { format } => cmd_list_permissions(format),
        Commands::Init { force } => cmd_init(force),
    };

    match result {
        Ok(exit_code) => process::exit(exit_code),
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(e.exit_code());
        }
    }
}

fn cmd_scan(
    path: PathBuf,
    config: Option<PathBuf>,
    format_str: String,
    no_inferred: bool,
    exclude: Vec<String>,
    client_id: Option<String>,
    output_path: Option<PathBuf>,
) -> Result<i32, PermScanError> {
    let format = OutputFormat::from_str_lenient(&format_str).unwrap_or_else(|| {
        eprintln!("Warning: unknown format '{}', using console", format_str);
        OutputFormat::Console
    });

    let options = ScanOptions {
        config_path: config,
        include_inferred_override: no_inferred.then_some(false),
        extra_excludes: exclude,
    };

    let report = permscan::scan_directory(&path, &options)?;
    let mut rendered = permscan::output::render(&report, format)?;

    if let Some(client_id) = client_id {
        let config_path = options
            .config_path
            .clone()
            .unwrap_or_else(|| path.join(".permscan.toml"));
        let config = Config::load(&config_path)?;
        let scopes = invite::effective_scopes(&[], &config.invite);
        let request = InviteRequest {
            client_id: &client_id,
            permissions: Some(report.aggregate.bitmask),
            scopes: Some(&scopes),
            ..InviteRequest::default()
        };
        let url = permscan::generate_invite_url(&request)?;
        if format == OutputFormat::Console {
            rendered.push_str(&format!("  Invite URL: {}\n\n", url));
        } else {
            eprintln!("Invite URL: {}", url);
        }
    }

    match output_path {
        Some(out) => std::fs::write(&out, &rendered)?,
        None => print!("{}", rendered),
    }

    Ok(0)
}

fn cmd_invite(
    client_id: String,
    permissions: Option<u64>,
    names: Vec<String>,
    path: Option<PathBuf>,
    scopes: Vec<String>,
    output: Option<PathBuf>,
) -> Result<i32, PermScanError> {
    let name_set: BTreeSet<String> = names.into_iter().collect();

    let config_root = path.clone().unwrap_or_else(|| PathBuf::from("."));
    let config = Config::load(&config_root.join(".permscan.toml"))?;
    let scopes = invite::effective_scopes(&scopes, &config.invite);

    let request = InviteRequest {
        client_id: &client_id,
        permissions,
        permission_names: (!name_set.is_empty()).then_some(&name_set),
        root_path: path.as_deref(),
        scopes: Some(&scopes),
        scan_options: ScanOptions::default(),
    };

    let url = permscan::generate_invite_url(&request)?;
    println!("{}", url);

    if let Some(out) = output {
        let mut file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&out)?;
        writeln!(file, "{}", url)?;
        eprintln!("Invite URL appended to {}", out.display());
    }

    Ok(0)
}

fn cmd_list_permissions(format_str: String) -> Result<i32, PermScanError> {
    match format_str.as_str() {
        "json" => {
            let entries: Vec<_> = table::all_entries()
                .iter()
                .map(|e| serde_json::json!({ "name": e.name, "bit": e.bit }))
                .collect();
            println!("{}", serde_json::to_string_pretty(&entries)?);
        }
        _ => {
            println!("{:<40} {:>20} HEX", "NAME", "BIT");
            println!("{}", "-".repeat(80));
            for entry in table::all_entries() {
                println!("{:<40} {:>20} 0x{:X}", entry.name, entry.bit, entry.bit);
            }
        }
    }

    Ok(0)
}

fn cmd_init(force: bool) -> Result<i32, PermScanError> {
    let path = PathBuf::from(".permscan.toml");

    if path.exists() && !force {
        eprintln!(".permscan.toml already exists. Use --force to overwrite.");
        return Ok(1);
    }

    std::fs::write(&path, Config::starter_toml())?;
    println!("Created .permscan.toml");

    Ok(0)
}
