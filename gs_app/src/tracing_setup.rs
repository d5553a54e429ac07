use std::io;

use tracing::Level;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::prelude::*;

/// Initialise tracing with an hourly rolling log file
///
/// `RUST_LOG` overrides `default_level`. With `stdout` set, events are also
/// written to the terminal with ANSI colours. Keep the returned guard alive
/// until exit or buffered lines are lost.
pub fn init(app_name: &str, log_dir: &str, default_level: Level, stdout: bool) -> WorkerGuard {
    let dir_result = prepare_log_dir(log_dir);

    let file_appender = tracing_appender::rolling::hourly(log_dir, format!("{app_name}.log"));
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter = EnvFilter::builder().with_default_directive(default_level.into()).from_env_lossy();

    let file_layer = fmt::layer().with_writer(non_blocking).with_target(true).with_line_number(true).with_ansi(false).compact();

    let stdout_layer = stdout.then(|| fmt::layer().with_writer(io::stdout).with_target(true).with_ansi(true).compact());

    tracing_subscriber::registry().with(env_filter).with(file_layer).with(stdout_layer).init();

    if let Err(err) = dir_result {
        tracing::error!("Failed to create log directory {}: {}. File logging is disabled.", log_dir, err);
    }

    guard
}

/// Create the log directory if it doesn't exist
pub fn prepare_log_dir(log_dir: &str) -> io::Result<()> {
    std::fs::create_dir_all(log_dir)
}

/// Initialise tracing with both file and stdout output
pub fn init_with_stdout(app_name: &str, log_dir: &str, default_level: Level) -> WorkerGuard {
    init(app_name, log_dir, default_level, true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prepare_log_dir() {
        let base = std::env::temp_dir().join(format!("gs_app_logs_{}", std::process::id()));
        let nested = base.join("nested");
        assert!(prepare_log_dir(nested.to_str().unwrap()).is_ok());
        assert!(nested.is_dir());

        // A regular file in the way is reported, not ignored
        let blocker = base.join("blocker");
        std::fs::write(&blocker, b"").unwrap();
        assert!(prepare_log_dir(blocker.join("logs").to_str().unwrap()).is_err());

        let _ = std::fs::remove_dir_all(&base);
    }
}
