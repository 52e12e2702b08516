use crate::utils::atomic::{self, SimpleAtomic};
use std::{
    collections::VecDeque,
    sync::{Mutex, OnceLock},
};

const DEFAULT_CAPACITY: usize = 1000;

/// Echoes records to stderr and keeps the latest ones for
/// [`crate::gui::LogView`].
pub struct Logger {
    pub enabled: atomic::Bool,
    level: log::LevelFilter,
    capacity: usize,
    data: Mutex<VecDeque<(String, log::Level)>>,
}

impl Logger {
    pub fn new(level: log::LevelFilter) -> Self {
        Self::with_capacity(level, DEFAULT_CAPACITY)
    }
    pub fn with_capacity(level: log::LevelFilter, capacity: usize) -> Self {
        Self {
            enabled: atomic::Bool::new(true),
            level,
            capacity,
            data: Mutex::new(VecDeque::new()),
        }
    }
    /// Latest records, newest first.
    pub fn recent(&self) -> Vec<(String, log::Level)> {
        self.data
            .lock()
            .map(|d| d.iter().cloned().collect())
            .unwrap_or_default()
    }
}

impl log::Log for Logger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        self.enabled.load() && metadata.level() <= self.level
    }

    fn log(&self, record: &log::Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        if let Ok(mut txt) = self.data.try_lock() {
            let t = format!(
                "{}:{} -- {}",
                record.level(),
                record.target(),
                record.args()
            );
            eprintln!("{}", t);
            txt.push_front((t, record.level()));
            txt.truncate(self.capacity);
        }
    }

    fn flush(&self) {
        if let Ok(mut txt) = self.data.try_lock() {
            txt.clear();
        }
    }
}

static GLOBAL_LOGGER: OnceLock<Logger> = OnceLock::new();

/// Maps the command line verbosity (1:trace 2:debug 3:info 4:warn 5:error
/// 6:none) to a filter.
pub fn level_from_verbosity(v: u8) -> log::LevelFilter {
    match v {
        0 | 1 => log::LevelFilter::Trace,
        2 => log::LevelFilter::Debug,
        3 => log::LevelFilter::Info,
        4 => log::LevelFilter::Warn,
        5 => log::LevelFilter::Error,
        _ => log::LevelFilter::Off,
    }
}

/// Installs the global logger and returns it, e.g. to show it in a
/// [`crate::gui::LogView`]. Calling it again keeps the first logger.
pub fn init(level: log::LevelFilter) -> Result<&'static Logger, log::SetLoggerError> {
    let logger = GLOBAL_LOGGER.get_or_init(|| Logger::new(level));
    log::set_logger(logger)?;
    log::set_max_level(level);
    Ok(logger)
}
