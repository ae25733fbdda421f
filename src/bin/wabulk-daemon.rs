//! wabulk-daemon - holds the session (contact table + add form) in memory.
//!
//! CHANGELOG:
//! - 10/19/2026 - --dry-run and send timing flags
//! - 10/12/2026 - Initial implementation

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::Path;

use wabulk::commands::TimingArgs;
use wabulk::config;
use wabulk::daemon::server::DaemonServer;
use wabulk::daemon::service::DaemonService;
use wabulk::sender::{DryRunSender, MessageSender, WhatsAppWebSender};

#[derive(Parser)]
#[command(name = "wabulk-daemon")]
#[command(about = "Session daemon for the wabulk CLI")]
struct Cli {
    /// Socket path (default: $WABULK_SOCKET or ~/.wabulk/daemon.sock)
    #[arg(long, global = true)]
    socket: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the daemon
    Start {
        /// Run in foreground (don't daemonize)
        #[arg(long)]
        foreground: bool,

        /// Log messages instead of opening the browser
        #[arg(long)]
        dry_run: bool,

        #[command(flatten)]
        timing: TimingArgs,
    },

    /// Stop the daemon
    Stop,

    /// Check daemon status
    Status,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let socket_path = config::resolve_socket_path(cli.socket.as_deref());

    match cli.command {
        Commands::Start {
            foreground,
            dry_run,
            timing,
        } => cmd_start(&socket_path, foreground, dry_run, &timing),
        Commands::Stop => cmd_stop(&socket_path),
        Commands::Status => cmd_status(&socket_path),
    }
}

fn init_logging(foreground: bool) {
    let default = if foreground {
        tracing::Level::INFO
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(default.into()),
        )
        .init();
}

fn build_server(socket_path: &Path, dry_run: bool, timing: &TimingArgs) -> DaemonServer {
    let sender: Box<dyn MessageSender> = if dry_run {
        Box::new(DryRunSender::new())
    } else {
        Box::new(WhatsAppWebSender::new())
    };
    DaemonServer::new(
        socket_path,
        DaemonService::new(sender, timing.timing(), dry_run),
    )
}

fn cmd_start(socket_path: &Path, foreground: bool, dry_run: bool, timing: &TimingArgs) -> Result<()> {
    if let Some(parent) = socket_path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {:?}", parent))?;
    }

    if foreground {
        init_logging(true);
        tracing::info!(socket = %socket_path.display(), dry_run, "starting in foreground");
        build_server(socket_path, dry_run, timing).serve()?;
    } else {
        use daemonize::Daemonize;

        let pid_file = config::pid_file_for(socket_path);
        let log_file = std::fs::File::create(socket_path.with_extension("log"))
            .context("Failed to create daemon log file")?;

        let daemonize = Daemonize::new()
            .pid_file(&pid_file)
            .working_directory("/tmp")
            .stderr(log_file);

        match daemonize.start() {
            Ok(_) => {
                // Child process: run server
                init_logging(false);
                build_server(socket_path, dry_run, timing).serve()?;
            }
            Err(e) => {
                eprintln!("Failed to daemonize: {}", e);
                std::process::exit(1);
            }
        }
    }

    Ok(())
}

fn cmd_stop(socket_path: &Path) -> Result<()> {
    let pid_file = config::pid_file_for(socket_path);

    let pid_str = std::fs::read_to_string(&pid_file)
        .with_context(|| format!("No pid file at {:?}; is the daemon running?", pid_file))?;
    let pid: i32 = pid_str.trim().parse().context("Corrupt pid file")?;

    // Send SIGTERM
    let rc = unsafe { libc::kill(pid, libc::SIGTERM) };
    if rc != 0 {
        eprintln!("Process {} not running; cleaning up", pid);
    }

    let _ = std::fs::remove_file(&pid_file);
    let _ = std::fs::remove_file(socket_path);

    println!("Daemon stopped (pid {})", pid);

    Ok(())
}

fn cmd_status(socket_path: &Path) -> Result<()> {
    match std::os::unix::net::UnixStream::connect(socket_path) {
        Ok(_) => {
            println!("Daemon running at {}", socket_path.display());
            Ok(())
        }
        Err(_) => {
            println!("Daemon not running");
            std::process::exit(1);
        }
    }
}
