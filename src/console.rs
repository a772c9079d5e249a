//! Local console output.
//!
//! [`ConsoleFormatter`] renders records into colored text blocks and
//! [`Console`] writes each block to its sink in one locked write, so lines
//! produced concurrently by different loggers never interleave.

use crate::record::{LogLevel, LogMessage};
use chrono::{DateTime, Local};
use colored::{ColoredString, Colorize};
use serde_json::Value;
use std::io::{self, Write};
use std::sync::{Arc, Mutex};

/// `YY-MM-DD HH:MM:SS`
pub const TIMESTAMP_FORMAT: &str = "%y-%m-%d %H:%M:%S";

const SEPARATOR: &str =
    "***************************************************************************";

/// Pure rendering of log lines. Holds no state.
#[derive(Clone, Copy, Debug, Default)]
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    pub fn paint(level: LogLevel, text: &str) -> ColoredString {
        match level {
            LogLevel::Error => text.red(),
            LogLevel::Warn => text.yellow(),
            LogLevel::Info => text.green(),
            LogLevel::Verbose => text.cyan(),
            LogLevel::Debug => text.bright_black(),
        }
    }

    /// `[<level>] <timestamp> ` with the level color.
    pub fn prefix(level: LogLevel, timestamp: &DateTime<Local>) -> ColoredString {
        Self::paint(
            level,
            &format!("[{}] {} ", level, timestamp.format(TIMESTAMP_FORMAT)),
        )
    }

    /// `[<level>] <timestamp> [<context>] <message>`
    pub fn line(level: LogLevel, context: &str, timestamp: &DateTime<Local>, message: &str) -> String {
        format!(
            "{}{} {}",
            Self::prefix(level, timestamp),
            Self::paint(level, &format!("[{}]", context)),
            message
        )
    }

    /// Header line plus pretty-printed dump for non-text payloads. The
    /// header always carries the verbose tag; the context keeps the color
    /// of the level that was called.
    pub fn dump(level: LogLevel, context: &str, timestamp: &DateTime<Local>, value: &Value) -> String {
        let body = serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string());
        format!(
            "{}{}:\n{}",
            Self::prefix(LogLevel::Verbose, timestamp),
            Self::paint(level, &format!("[{}]", context)),
            body
        )
    }

    /// Render a full block for one call, trace included.
    pub fn render(
        level: LogLevel,
        context: &str,
        timestamp: &DateTime<Local>,
        message: &LogMessage,
        trace: Option<&str>,
    ) -> String {
        let mut out = match message {
            LogMessage::Text(text) => Self::line(level, context, timestamp, text),
            LogMessage::Structured(value) => Self::dump(level, context, timestamp, value),
        };
        if let Some(trace) = trace {
            out.push('\n');
            match message {
                LogMessage::Text(_) => {
                    out.push_str(&format!("{}{}", Self::prefix(level, timestamp), trace))
                }
                LogMessage::Structured(_) => out.push_str(trace),
            }
        }
        out
    }

    pub fn separator() -> String {
        Self::paint(LogLevel::Debug, SEPARATOR).to_string()
    }
}

/// Line-atomic writer shared by every logger of a pipeline.
#[derive(Clone)]
pub struct Console {
    out: Arc<Mutex<Box<dyn Write + Send>>>,
}

impl Console {
    pub fn stdout() -> Self {
        Self::with_writer(io::stdout())
    }

    pub fn with_writer<W: Write + Send + 'static>(writer: W) -> Self {
        Console {
            out: Arc::new(Mutex::new(Box::new(writer))),
        }
    }

    /// Write `block` followed by a newline as a single unit. I/O errors
    /// are dropped.
    pub fn write_block(&self, block: &str) {
        let mut buf = String::with_capacity(block.len() + 1);
        buf.push_str(block);
        buf.push('\n');

        let mut out = match self.out.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        let _ = out.write_all(buf.as_bytes());
        let _ = out.flush();
    }

    /// Format and write one record stamped with the current local time.
    pub fn emit(&self, level: LogLevel, context: &str, message: &LogMessage, trace: Option<&str>) {
        let now = Local::now();
        self.write_block(&ConsoleFormatter::render(level, context, &now, message, trace));
    }

    pub fn print_line(&self) {
        self.write_block(&ConsoleFormatter::separator());
    }
}

impl Default for Console {
    fn default() -> Self {
        Self::stdout()
    }
}

impl std::fmt::Debug for Console {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Console").finish_non_exhaustive()
    }
}

/// In-memory writer for tests. Creating one turns ANSI colors off for
/// the process so captured lines compare as plain text.
#[cfg(test)]
#[derive(Clone, Debug)]
pub(crate) struct MemoryWriter {
    buf: Arc<Mutex<Vec<u8>>>,
}

#[cfg(test)]
impl MemoryWriter {
    pub(crate) fn new() -> Self {
        colored::control::set_override(false);
        MemoryWriter {
            buf: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub(crate) fn plain(&self) -> String {
        String::from_utf8_lossy(&self.buf.lock().unwrap()).into_owned()
    }

    pub(crate) fn lines(&self) -> Vec<String> {
        self.plain().lines().map(str::to_string).collect()
    }
}

#[cfg(test)]
impl Write for MemoryWriter {
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        self.buf.lock().unwrap().extend_from_slice(data);
        Ok(data.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
