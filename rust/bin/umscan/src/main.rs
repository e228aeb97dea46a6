//! `umscan`: the inventory CLI client.
//!
//! Manages contexts, authentication, record operations and the
//! technician's scan screen. Think of it as `kubectl` for umscand.

mod commands;
mod config;

use std::io::Write;
use std::path::PathBuf;

use clap::{Parser, Subcommand};

use commands::context::NewContext;
use commands::resource::ListOptions;
use commands::scan::ScanOptions;

/// Inventory CLI tool.
#[derive(Parser, Debug)]
#[command(name = "umscan", about = "UM inventory CLI client")]
struct Cli {
    /// Path to client config file (default: ~/.umscan/config.toml).
    #[arg(long = "config", global = true)]
    config: Option<String>,

    /// Output format: table or json.
    #[arg(long = "output", short = 'o', global = true, default_value = "table")]
    output: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Manage contexts (server connections).
    #[command(name = "context")]
    Context {
        #[command(subcommand)]
        action: ContextAction,
    },

    /// Switch the current context.
    #[command(name = "use")]
    Use {
        #[command(subcommand)]
        what: UseWhat,
    },

    /// Login to the current context's server.
    Login {
        /// E-mail.
        #[arg(long)]
        email: Option<String>,
        /// Password (not recommended; use the interactive prompt).
        #[arg(long)]
        password: Option<String>,
    },

    /// Logout: clear the token from the current context.
    Logout,

    /// Get resource(s): users, projects, units, notebooks, grouped, summary, me.
    Get {
        resource: String,
        /// Optional resource ID for single get.
        id: Option<String>,
        #[arg(long)]
        limit: Option<usize>,
        #[arg(long)]
        offset: Option<usize>,
        /// Case-insensitive name filter.
        #[arg(long = "query", short = 'q')]
        query: Option<String>,
        /// Only notebooks of this unit.
        #[arg(long)]
        unit: Option<String>,
    },

    /// Create a resource.
    Create {
        resource: String,
        /// JSON body.
        #[arg(long = "json")]
        json_body: Option<String>,
        /// Read JSON from file.
        #[arg(short = 'f', long = "file")]
        file: Option<String>,
    },

    /// Update a resource.
    Update {
        resource: String,
        id: String,
        /// JSON body.
        #[arg(long = "json")]
        json_body: String,
    },

    /// Delete a resource.
    Delete {
        resource: String,
        id: String,
        /// Skip confirmation.
        #[arg(long = "yes", short = 'y')]
        yes: bool,
    },

    /// Notebook batch operations.
    Notebooks {
        #[command(subcommand)]
        action: NotebookAction,
    },

    /// Count a mobile unit's notebooks with a barcode scanner.
    Scan {
        /// Unit id or name to start counting right away.
        #[arg(long)]
        unit: Option<String>,
        /// Read codes from a scanner device node instead of the keyboard.
        #[arg(long)]
        device: Option<PathBuf>,
        /// No tones.
        #[arg(long)]
        mute: bool,
    },

    /// Check server status.
    Status,

    /// Show version.
    Version,
}

#[derive(Subcommand, Debug)]
enum ContextAction {
    /// Create a new context: server config with the MASTER account.
    Create {
        /// Context name.
        name: String,
        /// Server config directory.
        #[arg(long, default_value = "/etc/umscan")]
        config_dir: String,
        /// Data directory (default: /var/lib/umscan/<name>).
        #[arg(long)]
        data_dir: Option<String>,
        /// Server URL clients use.
        #[arg(long, default_value = "http://localhost:8080")]
        server: String,
        /// MASTER display name.
        #[arg(long, default_value = "Master")]
        master_name: String,
        /// MASTER e-mail.
        #[arg(long)]
        master_email: String,
        /// MASTER password (non-interactive, for CI/automation).
        /// If not provided, will prompt interactively.
        #[arg(long)]
        password: Option<String>,
    },
    /// List all contexts.
    List,
    /// Set properties on a context.
    Set {
        name: String,
        #[arg(long)]
        server: Option<String>,
    },
    /// Delete a context.
    Delete { name: String },
}

#[derive(Subcommand, Debug)]
enum UseWhat {
    /// Switch to a context.
    Context { name: String },
}

#[derive(Subcommand, Debug)]
enum NotebookAction {
    /// Create notebooks PREFIX01..PREFIXnn for a unit.
    BatchCreate {
        #[arg(long)]
        unit: String,
        #[arg(long)]
        prefix: String,
        #[arg(long, default_value_t = 1)]
        start: u32,
        #[arg(long)]
        end: u32,
    },
    /// Delete every notebook of a unit.
    BatchDelete {
        #[arg(long)]
        unit: String,
        #[arg(long = "yes", short = 'y')]
        yes: bool,
    },
}

fn prompt(label: &str) -> anyhow::Result<String> {
    eprint!("{}", label);
    std::io::stderr().flush()?;
    let mut s = String::new();
    std::io::stdin().read_line(&mut s)?;
    Ok(s.trim().to_string())
}

fn confirm() -> anyhow::Result<bool> {
    Ok(prompt("Are you sure? [y/N]: ")?.eq_ignore_ascii_case("y"))
}

fn new_password() -> anyhow::Result<String> {
    let pw = rpassword::prompt_password("Enter master password: ")?;
    let again = rpassword::prompt_password("Confirm master password: ")?;
    if pw != again {
        anyhow::bail!("Passwords do not match.");
    }
    Ok(pw)
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .init();

    let cli = Cli::parse();

    let config_path = cli
        .config
        .map(PathBuf::from)
        .unwrap_or_else(config::Contexts::default_path);

    match cli.command {
        Commands::Context { action } => match action {
            ContextAction::Create {
                name,
                config_dir,
                data_dir,
                server,
                master_name,
                master_email,
                password,
            } => {
                let data_dir = data_dir.unwrap_or_else(|| format!("/var/lib/umscan/{}", name));
                let password = match password {
                    Some(p) => p,
                    None => new_password()?,
                };
                if password.len() < 6 {
                    anyhow::bail!("Password must have at least 6 characters.");
                }
                commands::context::create(
                    &NewContext {
                        name: &name,
                        config_dir: &config_dir,
                        data_dir: &data_dir,
                        server: &server,
                        master_name: &master_name,
                        master_email: &master_email,
                        password: &password,
                    },
                    &config_path,
                )?;
            }
            ContextAction::List => commands::context::list(&config_path)?,
            ContextAction::Set { name, server } => {
                commands::context::set(&name, server.as_deref(), &config_path)?;
            }
            ContextAction::Delete { name } => commands::context::delete(&name, &config_path)?,
        },

        Commands::Use { what } => match what {
            UseWhat::Context { name } => commands::context::use_context(&name, &config_path)?,
        },

        Commands::Login { email, password } => {
            let email = match email {
                Some(e) => e,
                None => prompt("E-mail: ")?,
            };
            let password = match password {
                Some(p) => p,
                None => rpassword::prompt_password("Password: ")?,
            };
            commands::login::login(&email, &password, &config_path)?;
        }

        Commands::Logout => commands::login::logout(&config_path)?,

        Commands::Get {
            resource,
            id,
            limit,
            offset,
            query,
            unit,
        } => {
            let opts = ListOptions {
                limit,
                offset,
                query,
                unit,
            };
            let json_output = cli.output == "json";
            commands::resource::get(&resource, id.as_deref(), json_output, &opts, &config_path)?;
        }

        Commands::Create {
            resource,
            json_body,
            file,
        } => {
            let body = if let Some(path) = file {
                std::fs::read_to_string(&path)?
            } else if let Some(json) = json_body {
                json
            } else {
                anyhow::bail!("Provide --json or -f <file>.");
            };
            commands::resource::create(&resource, &body, &config_path)?;
        }

        Commands::Update {
            resource,
            id,
            json_body,
        } => commands::resource::update(&resource, &id, &json_body, &config_path)?,

        Commands::Delete { resource, id, yes } => {
            if !yes && !confirm()? {
                println!("Cancelled.");
                return Ok(());
            }
            commands::resource::delete(&resource, &id, &config_path)?;
        }

        Commands::Notebooks { action } => match action {
            NotebookAction::BatchCreate {
                unit,
                prefix,
                start,
                end,
            } => commands::notebooks::batch_create(&unit, &prefix, start, end, &config_path)?,
            NotebookAction::BatchDelete { unit, yes } => {
                if !yes && !confirm()? {
                    println!("Cancelled.");
                    return Ok(());
                }
                commands::notebooks::batch_delete(&unit, &config_path)?;
            }
        },

        Commands::Scan { unit, device, mute } => {
            commands::scan::run(ScanOptions { unit, device, mute }, &config_path)?;
        }

        Commands::Status => commands::resource::status(&config_path)?,

        Commands::Version => println!("umscan cli v{}", env!("CARGO_PKG_VERSION")),
    }

    Ok(())
}
