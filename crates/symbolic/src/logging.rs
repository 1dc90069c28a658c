//! Logging bootstrap for hosts embedding the suggester.

use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;

pub const LOG_FILE_NAME: &str = "symbolic.log";

/// Install a global fmt subscriber (filter from `RUST_LOG`) writing to
/// `dir/symbolic.log` through a non-blocking appender.
///
/// Returns the writer guard; keep it alive for the host's lifetime. Returns
/// `None` when a global subscriber is already installed.
pub fn init(dir: &Path) -> Option<WorkerGuard> {
    let file_appender = tracing_appender::rolling::never(dir, LOG_FILE_NAME);
    let (nb_writer, guard) = tracing_appender::non_blocking(file_appender);
    match tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_ansi(false)
        .with_writer(nb_writer)
        .try_init()
    {
        Ok(_) => {
            tracing::info!(target: "runtime", "logging_initialized");
            Some(guard)
        }
        // Global subscriber already installed; drop guard so writer shuts down.
        Err(_err) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_init_is_tolerated() {
        let dir = tempfile::tempdir().unwrap();
        let first = init(dir.path());
        assert!(first.is_some());
        assert!(init(dir.path()).is_none());
        tracing::info!(target: "runtime", "after_init");
        drop(first);
        assert!(dir.path().join(LOG_FILE_NAME).exists());
    }
}
