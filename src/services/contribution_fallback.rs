use chrono::{DateTime, Datelike, Duration, Utc};

use crate::models::contribution_calendar::{
    ContributionCalendar, ContributionWeek, CALENDAR_WEEKS, DAYS_PER_WEEK,
};

/// Total advertised by the synthetic calendar, independent of its cells
pub const FALLBACK_TOTAL_CONTRIBUTIONS: u32 = 2954;

const LEVEL_THRESHOLDS: [f64; 4] = [0.3, 0.5, 0.7, 0.85];

/// Generates fallback data in case the GitHub API fails.
///
/// The grid covers 52 Sunday-first weeks, the last of which contains `now`.
/// Every day keeps the time-of-day of `now`; its count is a 0-4 level
/// derived from the instant's millisecond timestamp, and days after `now`
/// stay empty.
pub fn generate_fallback(now: DateTime<Utc>) -> ContributionCalendar {
    // One week later than "today - 364 days, back to Sunday", so the last week holds today
    let days_since_sunday = now.date_naive().weekday().num_days_from_sunday() as i64;
    let start = now - Duration::days(days_since_sunday + (CALENDAR_WEEKS as i64 - 1) * 7);

    let weeks = (0..CALENDAR_WEEKS)
        .map(|week| {
            let sunday = start + Duration::days((week * DAYS_PER_WEEK) as i64);
            let counts = std::array::from_fn(|day| {
                let instant = sunday + Duration::days(day as i64);
                if instant > now {
                    0
                } else {
                    synthetic_level(instant.timestamp_millis())
                }
            });
            ContributionWeek::starting(sunday.date_naive(), counts)
        })
        .collect();

    ContributionCalendar::fallback(weeks, FALLBACK_TOTAL_CONTRIBUTIONS)
}

/// Level 0-4 from `sin(ms) * 10000` with the integer part removed
fn synthetic_level(timestamp_millis: i64) -> u32 {
    let pseudo = (timestamp_millis as f64).sin() * 10000.0;
    let rand = pseudo - pseudo.floor();
    LEVEL_THRESHOLDS.iter().filter(|t| rand > **t).count() as u32
}
