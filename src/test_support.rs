// EN: src/test_support.rs

// Test-only log capture. Records are kept per thread, so parallel tests only
// see what their own code logged.

use log::{Level, LevelFilter, Log, Metadata, Record};
use std::sync::{Mutex, Once};
use std::thread::{self, ThreadId};

struct CapturingLogger {
    records: Mutex<Vec<(ThreadId, Level, String)>>,
}

static LOGGER: CapturingLogger = CapturingLogger {
    records: Mutex::new(Vec::new()),
};
static INSTALL: Once = Once::new();

impl Log for CapturingLogger {
    fn enabled(&self, _metadata: &Metadata<'_>) -> bool {
        true
    }

    fn log(&self, record: &Record<'_>) {
        let mut records = self.records.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        records.push((thread::current().id(), record.level(), record.args().to_string()));
    }

    fn flush(&self) {}
}

/// Installs the capturing logger for the test binary. Safe to call from every test.
pub(crate) fn capture_logs() {
    INSTALL.call_once(|| {
        if log::set_logger(&LOGGER).is_ok() {
            log::set_max_level(LevelFilter::Trace);
        }
    });
}

/// Warnings logged so far by the calling thread.
pub(crate) fn warnings() -> Vec<String> {
    let current = thread::current().id();
    LOGGER
        .records
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
        .iter()
        .filter(|(thread, level, _)| *thread == current && *level == Level::Warn)
        .map(|(_, _, message)| message.clone())
        .collect()
}
