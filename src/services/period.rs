//! Budget period calculation
//!
//! Pure functions mapping an instant and a start day to the period that
//! contains it, plus `PeriodService`, which binds them to user settings.

use chrono::{Datelike, NaiveDate, NaiveDateTime};

use crate::clock::Clock;
use crate::config::settings::Settings;
use crate::error::{RolloverError, RolloverResult};
use crate::models::{Period, PeriodId};

/// Largest allowed start day; every month has at least 28 days
pub const MAX_START_DAY: u32 = 28;

/// Clamp a configured start day into `1..=28`
pub fn clamp_start_day(start_day: u32) -> u32 {
    start_day.clamp(1, MAX_START_DAY)
}

/// Compute the period containing `now`
///
/// The boundary of each month is `start_day` at local midnight. If today's
/// day-of-month is at or past the start day the period runs to next month's
/// boundary, otherwise it began at last month's boundary.
pub fn compute_period(now: NaiveDateTime, start_day: u32) -> Period {
    period_for_date(now.date(), start_day)
}

/// Compute the period containing a calendar date
pub fn period_for_date(date: NaiveDate, start_day: u32) -> Period {
    let day = clamp_start_day(start_day);
    let this_month = PeriodId::new(date.year(), date.month());
    let id = if date.day() >= day {
        this_month
    } else {
        this_month.prev()
    };
    period_with_id(id, day)
}

/// Build the period identified by `id`
pub fn period_with_id(id: PeriodId, start_day: u32) -> Period {
    let day = clamp_start_day(start_day);
    Period {
        id,
        start: boundary(id, day),
        end: boundary(id.next(), day),
    }
}

/// The period after `period`
pub fn next_period(period: &Period) -> Period {
    period_with_id(period.id.next(), period.start.day())
}

/// The period before `period`
pub fn previous_period(period: &Period) -> Period {
    period_with_id(period.id.prev(), period.start.day())
}

/// All periods from `from` up to but excluding `to`
pub fn periods_between(from: PeriodId, to: PeriodId, start_day: u32) -> Vec<Period> {
    let mut periods = Vec::new();
    let mut id = from;
    while id < to {
        periods.push(period_with_id(id, start_day));
        id = id.next();
    }
    periods
}

/// Render a period as an inclusive, human-readable date range
pub fn format_period_range(period: &Period) -> String {
    format!(
        "{} - {}",
        period.start.format("%b %-d, %Y"),
        period.last_day().format("%b %-d, %Y")
    )
}

fn boundary(id: PeriodId, day: u32) -> NaiveDate {
    // Day <= 28 is valid in every month; only the edges of chrono's
    // representable range can fail.
    NaiveDate::from_ymd_opt(id.year(), id.month(), day).unwrap_or(if id.year() < 0 {
        NaiveDate::MIN
    } else {
        NaiveDate::MAX
    })
}

/// Service binding period calculation to user settings
pub struct PeriodService<'a> {
    settings: &'a Settings,
}

impl<'a> PeriodService<'a> {
    pub fn new(settings: &'a Settings) -> Self {
        Self { settings }
    }

    pub fn start_day(&self) -> u32 {
        clamp_start_day(self.settings.period_start_day)
    }

    /// Get the current period according to `clock`
    pub fn current_period(&self, clock: &dyn Clock) -> Period {
        compute_period(clock.now(), self.start_day())
    }

    pub fn period_for_date(&self, date: NaiveDate) -> Period {
        period_for_date(date, self.start_day())
    }

    pub fn period_with_id(&self, id: PeriodId) -> Period {
        period_with_id(id, self.start_day())
    }

    /// Parse a period reference
    ///
    /// Accepts "current"/"now"/"this", "last"/"previous"/"prev", "next",
    /// or a `YYYY-MM` id.
    pub fn parse(&self, s: &str, clock: &dyn Clock) -> RolloverResult<Period> {
        let current = self.current_period(clock);
        match s.trim().to_lowercase().as_str() {
            "current" | "now" | "this" => Ok(current),
            "last" | "previous" | "prev" => Ok(previous_period(&current)),
            "next" => Ok(next_period(&current)),
            other => {
                let id = PeriodId::parse(other).map_err(|_| {
                    RolloverError::Validation(format!("Invalid period format: {}", s))
                })?;
                Ok(self.period_with_id(id))
            }
        }
    }

    /// The last `count` periods, oldest first, ending with the current one
    pub fn recent_periods(&self, count: usize, clock: &dyn Clock) -> Vec<Period> {
        let mut periods = Vec::with_capacity(count);
        let mut current = self.current_period(clock);

        for _ in 0..count {
            let prev = previous_period(&current);
            periods.push(current);
            current = prev;
        }

        periods.reverse();
        periods
    }

    /// Friendly name: "June 2024" for calendar months, the date range otherwise
    pub fn format_period_friendly(&self, period: &Period) -> String {
        if period.start.day() == 1 {
            period.start.format("%B %Y").to_string()
        } else {
            format_period_range(period)
        }
    }
}
