//! Logging for moebius
//!
//! All `log` output goes to /tmp/moebius_debug.log on Unix/macOS, or
//! %TEMP%\moebius_debug.log on Windows, so stdout stays free for the bridge.
//! When RUST_LOG is set, records are mirrored to stderr as well.
//!
//! Level precedence: `--log-level`, then RUST_LOG, then Info.

use log::{LevelFilter, Log, Metadata, Record};
use parking_lot::Mutex;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::PathBuf;
use std::sync::OnceLock;

struct FileLogger {
    file: Mutex<Option<File>>,
    mirror_to_stderr: bool,
}

impl FileLogger {
    fn write_line(&self, line: &str) {
        if let Some(file) = self.file.lock().as_mut() {
            let _ = file.write_all(line.as_bytes());
            let _ = file.flush();
        }
        if self.mirror_to_stderr {
            eprint!("{}", line);
        }
    }
}

impl Log for FileLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        self.write_line(&format!(
            "[{}] [{:<5}] [{}] {}\n",
            timestamp(),
            record.level(),
            record.target(),
            record.args()
        ));
    }

    fn flush(&self) {
        if let Some(file) = self.file.lock().as_mut() {
            let _ = file.flush();
        }
    }
}

static LOGGER: OnceLock<FileLogger> = OnceLock::new();

fn timestamp() -> String {
    chrono::Local::now()
        .format("%Y-%m-%d %H:%M:%S%.6f")
        .to_string()
}

/// Location of the debug log.
pub fn log_path() -> PathBuf {
    #[cfg(unix)]
    let path = PathBuf::from("/tmp/moebius_debug.log");
    #[cfg(not(unix))]
    let path = std::env::temp_dir().join("moebius_debug.log");
    path
}

fn level_from_env() -> Option<LevelFilter> {
    let value = std::env::var("RUST_LOG").ok()?;
    // Accept plain levels and the first level of a directive list.
    value
        .split(',')
        .filter_map(|directive| directive.rsplit('=').next())
        .find_map(|level| level.trim().parse::<LevelFilter>().ok())
}

/// Route the `log` facade to the debug log file.
///
/// Safe to call more than once; only the first call installs the logger.
pub fn init_log_bridge(cli_level: Option<LevelFilter>) {
    let env_level = level_from_env();
    let level = cli_level.or(env_level).unwrap_or(LevelFilter::Info);

    let logger = LOGGER.get_or_init(|| {
        let file = OpenOptions::new()
            .write(true)
            .truncate(true)
            .create(true)
            .open(log_path())
            .ok();
        FileLogger {
            file: Mutex::new(file),
            mirror_to_stderr: std::env::var_os("RUST_LOG").is_some(),
        }
    });

    if log::set_logger(logger).is_ok() {
        log::set_max_level(level);
        logger.write_line(&format!(
            "\n{}\nmoebius {} debug session started at {} (level={})\n{}\n",
            "=".repeat(80),
            crate::VERSION,
            timestamp(),
            level,
            "=".repeat(80)
        ));
    }
}
