//! Logger setup shared by the binaries.
//!
use std::{
    fs::{self, OpenOptions},
    io::{self, Write},
    path::{Path, PathBuf},
};

use chrono::{Local, NaiveDate};
use env_logger::{Target, TimestampPrecision};
use log::LevelFilter;

/// Where and how much to log.
#[derive(Clone, Debug)]
pub struct LogConfig {
    pub level: LevelFilter,
    /// Directory for a daily log file, in addition to stderr.
    pub dir: Option<PathBuf>,
    /// File name prefix, the date and `.log` are appended.
    pub file_prefix: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: LevelFilter::Info,
            dir: None,
            file_prefix: "pose".into(),
        }
    }
}

/// Install the global logger. `RUST_LOG` takes precedence over `config.level`.
pub fn init(config: &LogConfig) -> io::Result<()> {
    let mut builder = env_logger::builder();
    builder
        .format_timestamp(Some(TimestampPrecision::Millis))
        .filter_level(config.level)
        .parse_default_env();

    if let Some(dir) = &config.dir {
        fs::create_dir_all(dir)?;
        let path = log_file_path(dir, &config.file_prefix, Local::now().date_naive());
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        builder.target(Target::Pipe(Box::new(Tee(io::stderr(), file))));
    }

    builder
        .try_init()
        .map_err(|err| io::Error::new(io::ErrorKind::Other, err))?;

    if let Some(dir) = &config.dir {
        log::info!("Logging to {}", dir.display());
    }

    Ok(())
}

/// `<dir>/<prefix>_<YYYYMMDD>.log`
pub fn log_file_path(dir: &Path, prefix: &str, date: NaiveDate) -> PathBuf {
    dir.join(format!("{}_{}.log", prefix, date.format("%Y%m%d")))
}

/// Writer duplicating everything into two sinks.
struct Tee<A, B>(A, B);

impl<A: Write, B: Write> Write for Tee<A, B> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.write_all(buf)?;
        self.1.write_all(buf)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.0.flush()?;
        self.1.flush()
    }
}
