//! Date-ordered action timeline

use std::fmt;

use chrono::NaiveDate;

use crate::actions::Action;

/// One playable entry: an action scheduled at a date
pub struct TimelineAction {
    pub date: NaiveDate,
    pub action: Box<dyn Action>,
}

impl TimelineAction {
    /// Creates a timeline entry
    pub fn new(date: NaiveDate, action: Box<dyn Action>) -> Self {
        Self { date, action }
    }
}

impl fmt::Debug for TimelineAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TimelineAction")
            .field("date", &self.date)
            .field("kind", &self.action.kind())
            .field("pause", &self.action.pause_after())
            .finish()
    }
}

/// Value equality: two entries are equal when they would render the same
/// annotation at the same date. Rebuilding a timeline from identical
/// inputs yields element-wise equal timelines.
impl PartialEq for TimelineAction {
    fn eq(&self, other: &Self) -> bool {
        self.date == other.date
            && self.action.kind() == other.action.kind()
            && self.action.props() == other.action.props()
            && self.action.pause_after() == other.action.pause_after()
    }
}

/// A date-ordered sequence of timeline actions. Ownership belongs to
/// whichever controller is driving playback.
pub type Timeline = Vec<TimelineAction>;
