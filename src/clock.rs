//! Event-day detection and the current JST minute.
//!
//! The schedule's times are wall-clock JST, a fixed +09:00 offset with no
//! daylight saving. A small `Clock` trait keeps the "is this happening
//! right now" logic testable without touching the system clock.

use chrono::{DateTime, FixedOffset, NaiveDate, Timelike, Utc};

const JST_OFFSET_SECS: i32 = 9 * 3600;

fn jst() -> FixedOffset {
    // +09:00 is always in range for FixedOffset
    FixedOffset::east_opt(JST_OFFSET_SECS).unwrap()
}

/// Source of the current time, in JST.
pub trait Clock {
    fn now_jst(&self) -> DateTime<FixedOffset>;
}

/// The real wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_jst(&self) -> DateTime<FixedOffset> {
        Utc::now().with_timezone(&jst())
    }
}

/// Whether the clock currently reads the event's calendar day in JST.
pub fn is_event_day(clock: &impl Clock, event_date: NaiveDate) -> bool {
    clock.now_jst().date_naive() == event_date
}

/// Current JST time as minutes from midnight.
pub fn now_minutes(clock: &impl Clock) -> u32 {
    let now = clock.now_jst();
    now.hour() * 60 + now.minute()
}

#[cfg(test)]
pub mod testing {
    use super::*;

    /// Fixed clock for tests.
    #[derive(Debug, Clone, Copy)]
    pub struct FixedClock(pub DateTime<FixedOffset>);

    impl FixedClock {
        pub fn at(date: NaiveDate, hour: u32, minute: u32) -> Self {
            let naive = date
                .and_hms_opt(hour, minute, 0)
                .expect("valid wall-clock time");
            Self(naive.and_local_timezone(jst()).unwrap())
        }
    }

    impl Clock for FixedClock {
        fn now_jst(&self) -> DateTime<FixedOffset> {
            self.0
        }
    }
}
