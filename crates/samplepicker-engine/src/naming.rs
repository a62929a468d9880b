use crate::source::SourceKind;
use chrono::NaiveDateTime;

pub const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// File name for item `index` of a batch taken at `timestamp`.
///
/// Names only have second granularity: the same kind, index and second always
/// produce the same name, and a later write replaces the earlier file.
pub fn name_for(kind: SourceKind, index: usize, timestamp: NaiveDateTime) -> String {
    format!(
        "{}_{}_{}.{}",
        kind.label(),
        timestamp.format(TIMESTAMP_FORMAT),
        index,
        kind.extension()
    )
}

/// Source of wall-clock time for file names.
pub trait Clock: Send + Sync {
    fn now(&self) -> NaiveDateTime;
}

/// Local wall clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        chrono::Local::now().naive_local()
    }
}
