//! Progress reporting for long-running conversions.
//!
//! Large dictionary sources can hold hundreds of thousands of entries, and
//! the automatic reading lookups make each of them comparatively slow. This
//! module lets callers receive periodic updates and cancel a conversion.
//!
//! # Examples
//!
//! ```
//! use txt2mdx::utils::progress_report::ProgressState;
//!
//! fn my_reporter(state: &mut ProgressState) -> bool {
//!     println!("{}% at source line {}, {} issues", state.percent(), state.line_no, state.issues);
//!     state.issues > 10 // Return true to cancel the operation
//! }
//!
//! let mut progress = ProgressState::new("converting", 100, 10, Some(my_reporter));
//! for i in 0..100 {
//!     if progress.report_entry(i, i * 2 + 1, 0) {
//!         break;
//!     }
//! }
//! ```

/// Function type for progress reporting callbacks.
///
/// The function receives a mutable reference to the progress state and
/// returns `true` to cancel the operation, or `false` to continue.
pub type ProgressReportFn = fn(&mut ProgressState) -> bool;

/// State information for progress reporting.
pub struct ProgressState {
    /// Identifier for this progress state (e.g., "EntryConverter::convert")
    pub state_id: String,
    /// Total number of items to process
    pub total: u64,
    /// Current item being processed
    pub current: u64,
    /// Source line of the current entry, 0 when not reported per entry
    pub line_no: u64,
    /// Entries with problems so far (skipped, unread or with markup warnings)
    pub issues: u64,
    /// Last item at which progress was reported
    pub last: u64,
    /// Number of items between progress reports
    pub report_interval: u64,
    /// Optional reporter function to call
    pub reporter: Option<ProgressReportFn>,
}

impl ProgressState {
    /// Creates a new progress state.
    ///
    /// # Arguments
    ///
    /// * `state_id` - Identifier for this progress state
    /// * `total` - Total number of items to process
    /// * `report_interval_percent` - Percentage of items between reports (0-100)
    /// * `reporter` - Optional reporter function
    pub fn new(state_id: &str, total: u64, report_interval_percent: u64, reporter: Option<ProgressReportFn>) -> Self {
        Self {
            state_id: state_id.to_string(),
            total,
            current: 0,
            line_no: 0,
            issues: 0,
            last: 0,
            report_interval: total * report_interval_percent / 100,
            reporter,
        }
    }

    /// Completed share of `total` in percent, 100 for an empty total.
    pub fn percent(&self) -> u64 {
        if self.total == 0 {
            100
        } else {
            (self.current + 1).min(self.total) * 100 / self.total
        }
    }

    /// Reports progress for the entry at `line_no` of the source, with the
    /// number of problem entries met so far.
    pub fn report_entry(&mut self, current: u64, line_no: u64, issues: u64) -> bool {
        self.line_no = line_no;
        self.issues = issues;
        self.report(current)
    }

    /// Reports progress for the current item.
    ///
    /// Returns `true` if the operation should be cancelled, `false` otherwise.
    pub fn report(&mut self, current: u64) -> bool {
        let Some(reporter) = self.reporter else {
            return false;
        };
        if current.saturating_sub(self.last) > self.report_interval || current + 1 >= self.total {
            self.current = current;
            let cancelled = reporter(self);
            self.last = current;
            cancelled
        } else {
            false
        }
    }
}
