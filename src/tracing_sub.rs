//! Tracing setup. Events land in the in-app debug log once it exists, and on
//! stderr before that (argument errors, startup failures).
use std::io::{self, Write};

use tracing::Level;

use crate::components::debug_log::{DebugLogWriter, global_debug_log};

pub enum LogSink {
    DebugLog(DebugLogWriter),
    Stderr(io::Stderr),
}

impl LogSink {
    fn current() -> Self {
        match global_debug_log() {
            Some(handle) => LogSink::DebugLog(handle.writer()),
            None => LogSink::Stderr(io::stderr()),
        }
    }
}

impl Write for LogSink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            LogSink::DebugLog(w) => w.write(buf),
            LogSink::Stderr(s) => s.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            LogSink::DebugLog(w) => w.flush(),
            LogSink::Stderr(s) => s.flush(),
        }
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct LogMakeWriter;

impl<'a> tracing_subscriber::fmt::MakeWriter<'a> for LogMakeWriter {
    type Writer = LogSink;

    fn make_writer(&'a self) -> Self::Writer {
        LogSink::current()
    }
}

/// Install the global subscriber at `level`. Later calls are no-ops.
pub fn init(level: Level) {
    let _ = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(LogMakeWriter)
        .with_target(false)
        .with_thread_names(true)
        .with_ansi(false)
        .try_init();
}
