// Per-run clock that stamps records
use chrono::{Duration, Local, NaiveDate, NaiveDateTime};

/// Fixed past start so generated data lands in a dashboard's default range.
pub fn default_start_time() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 8, 25)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .unwrap_or_default()
}

/// Logical timeline advanced by a fixed step per record.
#[derive(Debug, Clone)]
pub struct SimulatedClock {
    start: NaiveDateTime,
    current: NaiveDateTime,
    step: Duration,
}

impl SimulatedClock {
    pub fn new(start: NaiveDateTime) -> Self {
        Self {
            start,
            current: start,
            step: Duration::minutes(1),
        }
    }

    /// Returns the current time and advances it by one step.
    pub fn tick(&mut self) -> NaiveDateTime {
        let time = self.current;
        self.current += self.step;
        time
    }

    pub fn reset(&mut self) {
        self.current = self.start;
    }
}

/// Where record base times come from.
#[derive(Debug, Clone)]
pub enum TimeSource {
    Simulated(SimulatedClock),
    /// Local wall-clock time at each record
    WallClock,
}

impl TimeSource {
    pub fn simulated(start: NaiveDateTime) -> Self {
        Self::Simulated(SimulatedClock::new(start))
    }

    pub fn next_base_time(&mut self) -> NaiveDateTime {
        match self {
            Self::Simulated(clock) => clock.tick(),
            Self::WallClock => Local::now().naive_local(),
        }
    }

    /// Start a new run from the beginning of the timeline
    pub fn reset(&mut self) {
        if let Self::Simulated(clock) = self {
            clock.reset();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clock_advances_one_minute() {
        let mut clock = SimulatedClock::new(default_start_time());

        assert_eq!(clock.tick().to_string(), "2024-08-25 00:00:00");
        assert_eq!(clock.tick().to_string(), "2024-08-25 00:01:00");
        assert_eq!(clock.tick().to_string(), "2024-08-25 00:02:00");
    }

    #[test]
    fn test_clock_crosses_midnight_and_resets() {
        let start = NaiveDate::from_ymd_opt(2024, 8, 25)
            .unwrap()
            .and_hms_opt(23, 59, 0)
            .unwrap();
        let mut source = TimeSource::simulated(start);

        assert_eq!(source.next_base_time(), start);
        assert_eq!(source.next_base_time().to_string(), "2024-08-26 00:00:00");

        source.reset();
        assert_eq!(source.next_base_time(), start);
    }
}
