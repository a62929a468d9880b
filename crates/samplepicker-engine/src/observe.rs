/// Tag attached to pipeline log lines unless configured otherwise.
pub const DEFAULT_LOG_TAG: &str = "DebugPicker";

/// One-way log sink. Never consulted for control flow.
pub trait LogSink: Send + Sync {
    fn log(&self, tag: &str, message: &str);

    /// Items that were dropped or left nothing behind.
    fn warn(&self, tag: &str, message: &str) {
        self.log(tag, message);
    }
}

/// Forwards to the `log` facade using the tag as target: progress at debug
/// level, dropped items at warn.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogFacadeSink;

impl LogSink for LogFacadeSink {
    fn log(&self, tag: &str, message: &str) {
        log::debug!(target: tag, "{message}");
    }

    fn warn(&self, tag: &str, message: &str) {
        log::warn!(target: tag, "{message}");
    }
}
