//! Drive windows.
//!
//! Some car legs can only be driven at certain times: a borrowed car that
//! is only available at the weekend, a tunnel closure overnight, a host who
//! cannot receive guests before noon. A `DriveWindow` is a period the whole
//! drive must fit inside.

use chrono::{Duration, NaiveDateTime};

use super::DataError;

/// A period inside which a drive must start and finish.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DriveWindow {
    start: NaiveDateTime,
    end: NaiveDateTime,
}

impl DriveWindow {
    /// Create a window, rejecting one that ends before it starts.
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> Result<Self, DataError> {
        if end < start {
            return Err(DataError::InvertedWindow {
                context: format!("window {start} to {end}"),
            });
        }
        Ok(Self { start, end })
    }

    /// Start of the window.
    pub fn start(&self) -> NaiveDateTime {
        self.start
    }

    /// End of the window.
    pub fn end(&self) -> NaiveDateTime {
        self.end
    }

    /// Returns true if a drive from `depart` to `arrive` fits inside.
    pub fn contains(&self, depart: NaiveDateTime, arrive: NaiveDateTime) -> bool {
        self.start <= depart && arrive <= self.end
    }

    /// Latest departure that arrives no later than `deadline`, if any.
    pub fn latest_departure(&self, deadline: NaiveDateTime, duration: Duration) -> Option<NaiveDateTime> {
        let arrive = deadline.min(self.end);
        let depart = arrive.checked_sub_signed(duration)?;
        (depart >= self.start).then_some(depart)
    }

    /// Earliest departure no sooner than `ready`, if any.
    pub fn earliest_departure(&self, ready: NaiveDateTime, duration: Duration) -> Option<NaiveDateTime> {
        let depart = ready.max(self.start);
        let arrive = depart.checked_add_signed(duration)?;
        (arrive <= self.end).then_some(depart)
    }
}
