//! wabulk - bulk WhatsApp messaging from a contacts spreadsheet.
//!
//! Session commands talk to `wabulk-daemon`; `normalize`, `preview-file` and
//! `blast` work directly on a file.
//!
//! CHANGELOG:
//! - 10/19/2026 - Offline blast/preview commands
//! - 10/12/2026 - Initial CLI skeleton

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use wabulk::client::DaemonClient;
use wabulk::commands::{self, SelectionArgs, TemplateArgs, TimingArgs};
use wabulk::config;
use wabulk::output;

/// Default read timeout for quick session requests.
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Bulk WhatsApp messaging from a contacts spreadsheet.
#[derive(Parser, Debug)]
#[command(name = "wabulk")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Compact JSON output (no whitespace)
    #[arg(long, global = true)]
    compact: bool,

    /// Comma-separated field allowlist for JSON output
    #[arg(long, global = true)]
    fields: Option<String>,

    /// Truncate message text to this many characters
    #[arg(long, global = true)]
    max_text_chars: Option<u32>,

    /// Daemon socket path (default: $WABULK_SOCKET or ~/.wabulk/daemon.sock)
    #[arg(long, global = true)]
    socket: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    // =========================================================================
    // SESSION COMMANDS (via daemon)
    // =========================================================================
    /// Upload a spreadsheet (ID, Name, Phone columns); replaces the table
    Import {
        /// .xlsx, .xls or .ods file
        file: PathBuf,
    },

    /// Open the add-entry form
    OpenForm,

    /// Close the add-entry form without adding
    CancelForm,

    /// Add a new entry to the end of the table
    Add {
        /// Contact ID
        id: String,

        /// Contact name
        name: String,

        /// Phone number (e.g., 9876543210 or +91...)
        phone: String,
    },

    /// Show the current table
    List,

    /// Delete one row (0-based, as shown by `list`)
    DeleteRow {
        row: usize,
    },

    /// Show the personalized messages without sending
    Preview {
        #[command(flatten)]
        template: TemplateArgs,

        #[command(flatten)]
        selection: SelectionArgs,
    },

    /// Send the WhatsApp message to the selected rows
    Send {
        #[command(flatten)]
        template: TemplateArgs,

        #[command(flatten)]
        selection: SelectionArgs,
    },

    /// Delete all data in the session
    DeleteAll,

    /// Check the daemon
    Status,

    // =========================================================================
    // OFFLINE COMMANDS
    // =========================================================================
    /// Print the normalized form of phone numbers
    Normalize {
        phones: Vec<String>,
    },

    /// Preview messages for a spreadsheet without a daemon
    PreviewFile {
        file: PathBuf,

        #[command(flatten)]
        template: TemplateArgs,

        #[command(flatten)]
        selection: SelectionArgs,
    },

    /// Import a spreadsheet and send to the selected rows in one go
    Blast {
        file: PathBuf,

        #[command(flatten)]
        template: TemplateArgs,

        #[command(flatten)]
        selection: SelectionArgs,

        /// Log messages instead of opening the browser
        #[arg(long)]
        dry_run: bool,

        #[command(flatten)]
        timing: TimingArgs,
    },
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .init();

    let cli = Cli::parse();

    let output_controls = output::OutputControls {
        json: cli.json,
        compact: cli.compact,
        fields: cli.fields.clone(),
        max_text_chars: cli.max_text_chars,
    };

    let socket = config::resolve_socket_path(cli.socket.as_deref());
    let client = DaemonClient::new(&socket, Some(Duration::from_secs(REQUEST_TIMEOUT_SECS)));

    let result = match cli.command {
        // Session commands
        Command::Import { file } => commands::session::import(&client, &file, &output_controls),
        Command::OpenForm => commands::session::open_form(&client, &output_controls),
        Command::CancelForm => commands::session::cancel_form(&client, &output_controls),
        Command::Add { id, name, phone } => {
            commands::session::add(&client, &id, &name, &phone, &output_controls)
        }
        Command::List => commands::session::list(&client, &output_controls),
        Command::DeleteRow { row } => commands::session::delete_row(&client, row, &output_controls),
        Command::Preview { template, selection } => template.load().and_then(|text| {
            let selection = selection.to_selection()?;
            commands::session::preview(&client, &text, &selection, &output_controls)
        }),
        Command::Send { template, selection } => template.load().and_then(|text| {
            let selection = selection.to_selection()?;
            commands::session::send(&client, &text, &selection, &output_controls)
        }),
        Command::DeleteAll => commands::session::delete_all(&client, &output_controls),
        Command::Status => commands::session::status(&client, &output_controls),

        // Offline commands
        Command::Normalize { phones } => commands::offline::normalize(&phones, &output_controls),
        Command::PreviewFile { file, template, selection } => template.load().and_then(|text| {
            let selection = selection.to_selection()?;
            commands::offline::preview(&file, &text, &selection, &output_controls)
        }),
        Command::Blast { file, template, selection, dry_run, timing } => {
            template.load().and_then(|text| {
                let selection = selection.to_selection()?;
                commands::offline::blast(
                    &file,
                    &text,
                    &selection,
                    dry_run,
                    &timing.timing(),
                    &output_controls,
                )
            })
        }
    };

    match result {
        Ok(()) => ExitCode::from(0),
        Err(e) => {
            if cli.json {
                eprintln!("{}", output::format_error(&format!("{:#}", e)));
            } else {
                eprintln!("Error: {:#}", e);
            }
            ExitCode::from(1)
        }
    }
}
