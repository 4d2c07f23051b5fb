use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::types::{Error, MessageKind};

/// Sink for the messages that make up `result_log.txt`.
///
/// Both parsers receive the sink explicitly. Diagnostics that are not part
/// of the result log go through `tracing` instead.
pub trait Logger {
    fn log(&mut self, kind: MessageKind, indent: usize, message: &str);

    fn message(&mut self, indent: usize, message: &str) {
        self.log(MessageKind::Message, indent, message);
    }

    fn success(&mut self, indent: usize, message: &str) {
        self.log(MessageKind::Success, indent, message);
    }

    fn error(&mut self, indent: usize, message: &str) {
        self.log(MessageKind::Error, indent, message);
    }
}

/// Renders a message the way it appears on the console and in the log file.
pub fn format_message(kind: MessageKind, indent: usize, message: &str) -> String {
    let mut line = String::with_capacity(indent + message.len() + 11);
    line.extend(std::iter::repeat(' ').take(indent));
    line.push_str(kind.prefix());
    line.push_str(message);
    line.push('\n');
    line
}

//--------------------------------------------------------------------------------------------------
/// Prints to stdout and, once opened, mirrors everything into a file.
pub struct ResultLog {
    file: Option<BufWriter<File>>,
}

impl ResultLog {
    /// A log that only prints. Used until the output directory is known.
    pub fn console() -> ResultLog {
        ResultLog { file: None }
    }

    pub fn create(path: &Path) -> Result<ResultLog, Error> {
        let file = File::create(path).map_err(|e| Error::open_write(path, e))?;
        Ok(ResultLog {
            file: Some(BufWriter::new(file)),
        })
    }
}

impl Logger for ResultLog {
    fn log(&mut self, kind: MessageKind, indent: usize, message: &str) {
        let line = format_message(kind, indent, message);
        print!("{}", line);

        if let Some(file) = self.file.as_mut() {
            // Stop mirroring after the first failed write.
            if let Err(e) = file.write_all(line.as_bytes()) {
                tracing::warn!("failed to append to result log: {}", e);
                self.file = None;
            }
        }
    }
}

impl Drop for ResultLog {
    fn drop(&mut self) {
        if let Some(mut file) = self.file.take() {
            if let Err(e) = file.flush() {
                tracing::warn!("failed to flush result log: {}", e);
            }
        }
    }
}

//--------------------------------------------------------------------------------------------------
/// Keeps every message in memory.
#[derive(Debug, Default, Clone)]
pub struct MemoryLog {
    pub entries: Vec<(MessageKind, usize, String)>,
}

impl MemoryLog {
    pub fn new() -> MemoryLog {
        MemoryLog::default()
    }

    /// The log as it would have been written to `result_log.txt`.
    pub fn text(&self) -> String {
        self.entries
            .iter()
            .map(|(kind, indent, message)| format_message(*kind, *indent, message))
            .collect()
    }

    pub fn contains(&self, needle: &str) -> bool {
        self.entries.iter().any(|(_, _, m)| m.contains(needle))
    }
}

impl Logger for MemoryLog {
    fn log(&mut self, kind: MessageKind, indent: usize, message: &str) {
        self.entries.push((kind, indent, String::from(message)));
    }
}
