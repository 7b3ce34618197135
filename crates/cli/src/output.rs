//! Event printing

use anyhow::Result;
use owo_colors::OwoColorize;
use std::io::Write;
use watcher::{EventKind, WatchEvent};

/// How events are written to the terminal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// `+ path` / `- path`, colored
    Human,
    /// One JSON object per line
    Json,
}

/// Writes one line per event
pub struct Printer<W: Write> {
    out: W,
    format: Format,
    color: bool,
}

impl<W: Write> Printer<W> {
    pub fn new(out: W, format: Format, color: bool) -> Self {
        Self { out, format, color }
    }

    pub fn print(&mut self, event: &WatchEvent) -> Result<()> {
        match self.format {
            Format::Json => {
                serde_json::to_writer(&mut self.out, event)?;
                writeln!(self.out)?;
            }
            Format::Human => {
                let path = event.path().display();
                match (event.kind(), self.color) {
                    (EventKind::Created, true) => writeln!(self.out, "{} {}", "+".green(), path)?,
                    (EventKind::Removed, true) => writeln!(self.out, "{} {}", "-".red(), path)?,
                    (EventKind::Created, false) => writeln!(self.out, "+ {}", path)?,
                    (EventKind::Removed, false) => writeln!(self.out, "- {}", path)?,
                }
            }
        }
        self.out.flush()?;
        Ok(())
    }
}
