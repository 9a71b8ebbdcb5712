use log::{Level, Log, Metadata, Record};
use std::fmt;
use std::sync::Arc;

/// Append-only diagnostic sink handed to each component at construction.
///
/// The binary installs `env_logger` and uses [`DiagnosticLog::global`], which
/// forwards to whatever logger the process has. Tests swap in their own
/// [`Log`] implementation to inspect what was written.
#[derive(Clone)]
pub struct DiagnosticLog {
    inner: Arc<dyn Log>,
    target: &'static str,
}

/// Forwards every record to the process-wide logger.
struct GlobalLogger;

impl Log for GlobalLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level() && log::logger().enabled(metadata)
    }

    fn log(&self, record: &Record) {
        log::logger().log(record);
    }

    fn flush(&self) {
        log::logger().flush();
    }
}

impl DiagnosticLog {
    /// Sink backed by the global `log` facade.
    pub fn global() -> Self {
        Self::new(Arc::new(GlobalLogger))
    }

    /// Sink backed by a caller-owned logger.
    pub fn new(inner: Arc<dyn Log>) -> Self {
        Self {
            inner,
            target: "keyword_scout",
        }
    }

    pub fn error(&self, args: fmt::Arguments<'_>) {
        self.write(Level::Error, args);
    }

    pub fn warn(&self, args: fmt::Arguments<'_>) {
        self.write(Level::Warn, args);
    }

    pub fn info(&self, args: fmt::Arguments<'_>) {
        self.write(Level::Info, args);
    }

    pub fn debug(&self, args: fmt::Arguments<'_>) {
        self.write(Level::Debug, args);
    }

    pub fn flush(&self) {
        self.inner.flush();
    }

    fn write(&self, level: Level, args: fmt::Arguments<'_>) {
        let metadata = Metadata::builder().level(level).target(self.target).build();
        if !self.inner.enabled(&metadata) {
            return;
        }
        self.inner.log(
            &Record::builder()
                .metadata(metadata)
                .args(args)
                .module_path_static(Some(module_path!()))
                .build(),
        );
    }
}

impl Default for DiagnosticLog {
    fn default() -> Self {
        Self::global()
    }
}

impl fmt::Debug for DiagnosticLog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DiagnosticLog")
            .field("target", &self.target)
            .finish_non_exhaustive()
    }
}
