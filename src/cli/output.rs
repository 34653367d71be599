//! Human-readable event rendering

use std::io::Write;

use colored::Colorize;

use crate::reporter::{EventSink, NormalizedEvent};

/// Prints events as an indented tree, one line per finished test
pub struct PrettySink<W: Write> {
    writer: W,
    depth: usize,
}

impl<W: Write> PrettySink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer, depth: 0 }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }

    fn render(&mut self, event: &str, payload: &NormalizedEvent) -> std::io::Result<()> {
        let indent = "  ".repeat(self.depth);
        match event {
            "suite:start" => {
                writeln!(self.writer, "{indent}{}", payload.title.bold())?;
                self.depth += 1;
            }
            "suite:end" => {
                self.depth = self.depth.saturating_sub(1);
            }
            "test:pass" => {
                writeln!(
                    self.writer,
                    "{indent}{} {} {}",
                    "✓".green(),
                    payload.title,
                    format!("({}ms)", payload.duration_ms).dimmed()
                )?;
            }
            "test:fail" => {
                writeln!(self.writer, "{indent}{} {}", "✗".red(), payload.title.red())?;
                for error in payload.errors.iter().flatten() {
                    writeln!(self.writer, "{indent}    {}", error.message.red())?;
                    if let Some(stack) = &error.stack {
                        for line in stack.lines().skip(1) {
                            writeln!(self.writer, "{indent}    {}", line.trim().dimmed())?;
                        }
                    }
                }
            }
            "test:start" | "test:end" => {}
            _ if event.starts_with("test:") => {
                let reason = payload.pending_reason.as_deref().unwrap_or_default();
                writeln!(
                    self.writer,
                    "{indent}{} {} {}",
                    "-".yellow(),
                    payload.title.yellow(),
                    reason.dimmed()
                )?;
            }
            _ => {}
        }
        Ok(())
    }
}

impl<W: Write> EventSink for PrettySink<W> {
    fn publish(&mut self, event: &str, payload: &NormalizedEvent) {
        if let Err(e) = self.render(event, payload) {
            tracing::warn!(event, error = %e, "Failed to render event");
        }
    }
}
