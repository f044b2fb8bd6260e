use std::sync::Arc;

use crate::model::ItemKind;

/// Events emitted while refreshing a series tree
#[derive(Debug, Clone)]
pub enum ProgressEvent {
    /// The series itself is being refreshed
    RefreshStarting { series_name: String },

    /// Descendants were listed; `total` items will be walked
    DescendantsListed {
        seasons: usize,
        others: usize,
        total: usize,
    },

    /// A descendant was refreshed or skipped
    ItemCompleted {
        kind: ItemKind,
        item_name: String,
        /// True when the staleness check skipped the refresh
        skipped: bool,
        completed: usize,
        total: usize,
        /// `completed / total * 100`
        percent: f64,
    },

    /// Final series pass after all descendants
    PostRecursiveRefresh { series_name: String },

    /// Whole tree done
    RefreshCompleted { refreshed: usize, skipped: usize },
}

impl ProgressEvent {
    /// Percentage carried by per-item events
    pub fn percent(&self) -> Option<f64> {
        match self {
            ProgressEvent::ItemCompleted { percent, .. } => Some(*percent),
            _ => None,
        }
    }
}

/// Trait for reporting progress events during a refresh.
///
/// Implementations can use this to display progress bars, log messages,
/// or collect statistics.
pub trait ProgressReporter: Send + Sync {
    /// Report a progress event
    fn report(&self, event: ProgressEvent);
}

/// A shared reference to a progress reporter
pub type SharedProgressReporter = Arc<dyn ProgressReporter>;

/// A no-op progress reporter that silently ignores all events.
/// Useful for tests or quiet mode.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopReporter;

impl ProgressReporter for NoopReporter {
    fn report(&self, _event: ProgressEvent) {}
}

impl NoopReporter {
    /// Create a new NoopReporter wrapped in an Arc
    pub fn shared() -> SharedProgressReporter {
        Arc::new(Self)
    }
}

/// Forwards only the 0-100 percentage of per-item events to a callback
pub struct PercentReporter<F> {
    sink: F,
}

impl<F> PercentReporter<F>
where
    F: Fn(f64) + Send + Sync + 'static,
{
    pub fn shared(sink: F) -> SharedProgressReporter {
        Arc::new(Self { sink })
    }
}

impl<F> ProgressReporter for PercentReporter<F>
where
    F: Fn(f64) + Send + Sync,
{
    fn report(&self, event: ProgressEvent) {
        if let Some(percent) = event.percent() {
            (self.sink)(percent);
        }
    }
}
