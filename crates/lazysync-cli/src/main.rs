mod cmd;
mod config_path;
mod output;

use anyhow::Context as _;
use clap::{CommandFactory, Parser, Subcommand};
use lazysync_core::config::Config;
use lazysync_core::Context;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "notmuch-lazysync",
    about = "Record notmuch tag operations and replay them on every host sharing the database",
    version,
    propagate_version = true
)]
struct Cli {
    /// Enable verbose output
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    /// Use alternate config file location (default: ~/.notmuch-lazysync.yaml)
    #[arg(long, short = 'c', global = true, env = "LAZYSYNC_CONFIG")]
    config: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, short = 'j', global = true)]
    json: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Record a command (use `--` before commands containing flags)
    Record {
        /// Command to record
        #[arg(
            value_name = "CMD",
            required = true,
            num_args = 1..,
            trailing_var_arg = true,
            allow_hyphen_values = true
        )]
        cmd: Vec<String>,
    },

    /// Replay commands this host has not seen yet
    Replay {
        /// Don't remove commands seen by all hosts (mainly useful for debugging)
        #[arg(long)]
        no_gc: bool,
    },

    /// Show contents of the database
    Show,
}

fn main() {
    let cli = Cli::parse();

    let default_level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(default_level.into()),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let Some(command) = cli.command else {
        eprintln!("No mode given.");
        eprintln!("{}", Cli::command().render_help());
        std::process::exit(1);
    };

    let result = open_context(cli.config.as_deref()).and_then(|mut ctx| match command {
        Commands::Record { cmd } => cmd::record::run(&mut ctx, &cmd, cli.json),
        Commands::Replay { no_gc } => cmd::replay::run(&mut ctx, no_gc, cli.json),
        Commands::Show => cmd::show::run(&ctx, cli.json),
    });

    if let Err(e) = result {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}

fn open_context(explicit: Option<&std::path::Path>) -> anyhow::Result<Context> {
    let path = config_path::resolve_config_path(explicit)?;
    let config = Config::load_or_init(&path)
        .with_context(|| format!("failed to load config {}", path.display()))?;
    Context::from_config(&config)
        .with_context(|| format!("failed to open database {}", config.db_file.display()))
}
