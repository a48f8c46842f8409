use std::ffi::OsStr;
use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::time::ChronoUtc;
use tracing_subscriber::fmt::{self};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::project::Project;

/// Installs the global subscriber: stderr always, plus the configured log
/// file. The returned guard must live until the program exits, or buffered
/// file output is lost.
pub fn init_tracing(project: &Project) -> Option<WorkerGuard> {
    let config = &project.config;
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_filter));

    let stderr = fmt::layer()
        .with_writer(std::io::stderr)
        .with_timer(ChronoUtc::rfc_3339())
        .with_target(false);

    let (file, guard) = match &config.log_file {
        Some(log_file) => {
            let path = project.path(log_file);
            let dir = path
                .parent()
                .filter(|dir| !dir.as_os_str().is_empty())
                .unwrap_or(Path::new("."));
            let name = path.file_name().unwrap_or(OsStr::new("plc.log"));

            let file_appender = tracing_appender::rolling::never(dir, name);
            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
            let layer = fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_timer(ChronoUtc::rfc_3339())
                .with_file(true)
                .with_line_number(true)
                .with_target(false);

            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(stderr)
        .with(file)
        .with(filter)
        .init();

    guard
}
