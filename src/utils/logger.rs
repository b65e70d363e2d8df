// src/utils/logger.rs

use log::{Level, LevelFilter, Metadata, Record, SetLoggerError};
use std::io::Write;

static LOGGER: StderrLogger = StderrLogger;

struct StderrLogger;

/// Installs the process-wide logger. Fails if one is already set.
pub fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
  log::set_logger(&LOGGER).map(|()| log::set_max_level(level))
}

/// `Debug` when verbose output is requested, `Info` otherwise.
pub fn level_for(verbose: bool) -> LevelFilter {
  if verbose {
    LevelFilter::Debug
  } else {
    LevelFilter::Info
  }
}

fn tag(level: Level) -> &'static str {
  match level {
    Level::Error => "[ERROR]",
    Level::Warn => "[WARN ]",
    Level::Info => "[INFO ]",
    Level::Debug => "[DEBUG]",
    Level::Trace => "[TRACE]",
  }
}

/// Format: "[WARN ] hyspecppt::engine: Rejected lattice: ..."
fn format_line(record: &Record) -> String {
  format!("{} {}: {}\n", tag(record.level()), record.target(), record.args())
}

impl log::Log for StderrLogger {
  fn enabled(&self, metadata: &Metadata) -> bool {
    metadata.level() <= log::max_level()
  }

  fn log(&self, record: &Record) {
    if self.enabled(record.metadata()) {
      let line = format_line(record);
      // A closed stderr is not worth panicking over
      let _ = std::io::stderr().lock().write_all(line.as_bytes());
    }
  }

  fn flush(&self) {
    let _ = std::io::stderr().flush();
  }
}
