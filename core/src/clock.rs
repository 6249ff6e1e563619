//! Local wall-clock access and the reporting-lag date correction.

use chrono::{Days, Local, NaiveDate, NaiveDateTime, Timelike};

/// Hour (local time) before which today's upstream figures are treated as
/// incomplete.
pub const LAG_CUTOFF_HOUR: u32 = 12;

/// Source of the current local date and time.
pub trait Clock: Send + Sync {
    fn now(&self) -> NaiveDateTime;
}

/// The machine's local clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// A clock stopped at a fixed instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDateTime);

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}

/// Replace `to_date` with yesterday when it is today and the local time is
/// before noon; otherwise return it unchanged.
///
/// Best effort only: the upstream gives no guarantee that yesterday's
/// figures are final either.
pub fn lag_corrected(to_date: NaiveDate, now: NaiveDateTime) -> NaiveDate {
    let today = now.date();
    if to_date == today && now.hour() < LAG_CUTOFF_HOUR {
        return today.checked_sub_days(Days::new(1)).unwrap_or(today);
    }
    to_date
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(y: i32, m: u32, d: u32, hour: u32, minute: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(hour, minute, 0)
            .unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn today_before_noon_becomes_yesterday() {
        assert_eq!(lag_corrected(date(2021, 3, 8), at(2021, 3, 8, 9, 30)), date(2021, 3, 7));
        assert_eq!(lag_corrected(date(2021, 3, 8), at(2021, 3, 8, 0, 0)), date(2021, 3, 7));
    }

    #[test]
    fn today_from_noon_is_unchanged() {
        assert_eq!(lag_corrected(date(2021, 3, 8), at(2021, 3, 8, 12, 0)), date(2021, 3, 8));
        assert_eq!(lag_corrected(date(2021, 3, 8), at(2021, 3, 8, 23, 59)), date(2021, 3, 8));
    }

    #[test]
    fn other_dates_are_unchanged() {
        assert_eq!(lag_corrected(date(2021, 3, 7), at(2021, 3, 8, 9, 0)), date(2021, 3, 7));
        assert_eq!(lag_corrected(date(2021, 3, 9), at(2021, 3, 8, 9, 0)), date(2021, 3, 9));
    }

    #[test]
    fn crosses_month_and_year_boundaries() {
        assert_eq!(lag_corrected(date(2021, 1, 1), at(2021, 1, 1, 8, 0)), date(2020, 12, 31));
        assert_eq!(lag_corrected(date(2020, 3, 1), at(2020, 3, 1, 8, 0)), date(2020, 2, 29));
    }

    #[test]
    fn fixed_clock_reports_its_instant() {
        let instant = at(2022, 5, 17, 10, 15);
        assert_eq!(FixedClock(instant).now(), instant);
    }
}
