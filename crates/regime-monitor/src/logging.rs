//! Logging setup.

use std::io;
use std::path::{Path, PathBuf};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, prelude::*, EnvFilter, Layer, Registry};

/// Where console log lines go.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogOutput {
    /// Write to stderr, keeping stdout free for command output
    Console,
    /// No console output, e.g. while the TUI owns the terminal
    FileOnly,
}

/// Setup logging with the given level.
///
/// When `file` is given, lines are also appended to it through a
/// non-blocking writer. The returned guard flushes that writer on drop and
/// must be held for the life of the program.
pub fn setup_logging(
    level: &str,
    json: bool,
    output: LogOutput,
    file: Option<&Path>,
) -> io::Result<Option<WorkerGuard>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let mut layers: Vec<Box<dyn Layer<Registry> + Send + Sync>> = Vec::new();

    if output == LogOutput::Console {
        let layer = fmt::layer().with_writer(io::stderr);
        layers.push(if json {
            layer.json().boxed()
        } else {
            layer.pretty().boxed()
        });
    }

    let guard = match file {
        Some(path) => {
            let (dir, name) = split_log_path(path)?;
            std::fs::create_dir_all(&dir)?;
            let appender = RollingFileAppender::builder()
                .rotation(Rotation::NEVER)
                .filename_prefix(name)
                .build(dir)
                .map_err(io::Error::other)?;
            let (writer, guard) = tracing_appender::non_blocking(appender);

            let layer = fmt::layer().with_writer(writer).with_ansi(false);
            layers.push(if json {
                layer.json().boxed()
            } else {
                layer.boxed()
            });
            Some(guard)
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(layers)
        .with(filter)
        .try_init()
        .map_err(io::Error::other)?;

    Ok(guard)
}

/// Split a log file path into its directory and file name.
fn split_log_path(path: &Path) -> io::Result<(PathBuf, String)> {
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("log file path '{}' has no file name", path.display()),
            )
        })?
        .to_string();

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };

    Ok((dir, name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_log_path() {
        let (dir, name) = split_log_path(Path::new("logs/regime.log")).unwrap();
        assert_eq!(dir, PathBuf::from("logs"));
        assert_eq!(name, "regime.log");

        let (dir, name) = split_log_path(Path::new("regime.log")).unwrap();
        assert_eq!(dir, PathBuf::from("."));
        assert_eq!(name, "regime.log");

        assert!(split_log_path(Path::new("/")).is_err());
    }

    #[test]
    fn test_file_logging() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("regime.log");

        let guard = setup_logging("debug", false, LogOutput::FileOnly, Some(&path)).unwrap();
        tracing::info!(score = 72, "Market regime assessed");
        drop(guard);

        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.contains("Market regime assessed"));
    }
}
