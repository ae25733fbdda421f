//! Command implementations.
//!
//! `session` commands talk to the daemon; `offline` commands run the core
//! in-process.
//!
//! CHANGELOG:
//! - 10/12/2026 - Initial module structure

pub mod offline;
pub mod session;

use crate::contacts::selection::{parse_rows, split_list};
use crate::contacts::Selection;
use anyhow::{bail, Context, Result};
use clap::Args;
use std::path::PathBuf;

/// Which rows to send to. Without any flag nothing is selected.
#[derive(Args, Debug, Clone, Default)]
#[group(multiple = false)]
pub struct SelectionArgs {
    /// Select every row
    #[arg(long)]
    pub all: bool,

    /// Comma-separated 0-based row numbers (as shown by `list`)
    #[arg(long)]
    pub rows: Option<String>,

    /// Comma-separated contact IDs
    #[arg(long)]
    pub ids: Option<String>,

    /// Comma-separated contact names (fuzzy matched)
    #[arg(long)]
    pub names: Option<String>,
}

impl SelectionArgs {
    pub fn to_selection(&self) -> Result<Selection> {
        if self.all {
            return Ok(Selection::All);
        }
        if let Some(ref rows) = self.rows {
            let rows = parse_rows(rows).with_context(|| format!("Invalid --rows value '{}'", rows))?;
            return Ok(Selection::Rows(rows));
        }
        if let Some(ref ids) = self.ids {
            return Ok(Selection::Ids(split_list(ids).map(String::from).collect()));
        }
        if let Some(ref names) = self.names {
            return Ok(Selection::Names(split_list(names).map(String::from).collect()));
        }
        Ok(Selection::Rows(Vec::new()))
    }
}

/// Message template, inline or from a file.
#[derive(Args, Debug, Clone, Default)]
#[group(required = true, multiple = false)]
pub struct TemplateArgs {
    /// Message text; `{name}` and `{id}` are filled per contact
    #[arg(short, long)]
    pub template: Option<String>,

    /// Read the message text from a file
    #[arg(long)]
    pub template_file: Option<PathBuf>,
}

impl TemplateArgs {
    pub fn load(&self) -> Result<String> {
        match (&self.template, &self.template_file) {
            (Some(text), _) => Ok(text.clone()),
            (None, Some(path)) => std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read template file: {:?}", path)),
            (None, None) => bail!("A message template is required (--template or --template-file)"),
        }
    }
}

/// Send timing flags shared by `blast` and the daemon.
#[derive(Args, Debug, Clone)]
pub struct TimingArgs {
    /// Seconds to wait for WhatsApp Web to load before pressing send
    #[arg(long, default_value_t = crate::sender::DEFAULT_WAIT_SECS)]
    pub wait_time: u64,

    /// Seconds to wait after sending before closing the tab
    #[arg(long, default_value_t = crate::sender::DEFAULT_CLOSE_SECS)]
    pub close_time: u64,

    /// Leave the browser tab open after sending
    #[arg(long)]
    pub no_tab_close: bool,
}

impl TimingArgs {
    pub fn timing(&self) -> crate::sender::SendTiming {
        crate::config::send_timing(self.wait_time, self.close_time, self.no_tab_close)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selection_default_is_empty() {
        assert_eq!(
            SelectionArgs::default().to_selection().unwrap(),
            Selection::Rows(Vec::new())
        );
    }

    #[test]
    fn test_selection_flags() {
        let args = SelectionArgs {
            rows: Some("2, 0".into()),
            ..Default::default()
        };
        assert_eq!(args.to_selection().unwrap(), Selection::Rows(vec![2, 0]));

        let args = SelectionArgs {
            names: Some("Asha, Ravi Kumar".into()),
            ..Default::default()
        };
        assert_eq!(
            args.to_selection().unwrap(),
            Selection::Names(vec!["Asha".into(), "Ravi Kumar".into()])
        );

        let args = SelectionArgs {
            rows: Some("one".into()),
            ..Default::default()
        };
        assert!(args.to_selection().is_err());
    }

    #[test]
    fn test_template_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("msg.txt");
        std::fs::write(&path, "Hi {name}\nSee you at the gym").unwrap();

        let args = TemplateArgs {
            template: None,
            template_file: Some(path),
        };
        assert_eq!(args.load().unwrap(), "Hi {name}\nSee you at the gym");
    }
}
