use chrono::{Datelike, Duration, NaiveDate};
use serde::{Serialize, Serializer};
use thiserror::Error;

/// Days per calendar week (Sunday-first)
pub const DAYS_PER_WEEK: usize = 7;

/// Number of weeks a calendar always carries
pub const CALENDAR_WEEKS: usize = 52;

/// Where a calendar's counts came from
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CalendarOrigin {
    /// Fetched from the upstream platform and humanized
    Live,
    /// Generated locally because the upstream fetch failed
    Fallback,
}

/// A single day in the heatmap, date and count kept together
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ContributionDay {
    pub date: NaiveDate,
    pub count: u32,
}

impl ContributionDay {
    pub fn new(date: NaiveDate, count: u32) -> Self {
        Self { date, count }
    }

    pub fn iso_date(&self) -> String {
        self.date.format("%Y-%m-%d").to_string()
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CalendarShapeError {
    #[error("calendar has no days")]
    Empty,

    #[error("days are not contiguous: {previous} is followed by {next}")]
    Gap { previous: NaiveDate, next: NaiveDate },

    #[error("calendar has {found} weeks, expected at least {expected}")]
    TooFewWeeks { found: usize, expected: usize },

    #[error("contribution total does not fit in 32 bits")]
    TotalOverflow,
}

/// Seven contiguous days starting on a Sunday
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ContributionWeek {
    days: [ContributionDay; DAYS_PER_WEEK],
}

impl ContributionWeek {
    /// Build a week from a Sunday and a count per day
    pub fn starting(sunday: NaiveDate, counts: [u32; DAYS_PER_WEEK]) -> Self {
        let days = std::array::from_fn(|i| {
            ContributionDay::new(sunday + Duration::days(i as i64), counts[i])
        });
        Self { days }
    }

    pub fn days(&self) -> &[ContributionDay; DAYS_PER_WEEK] {
        &self.days
    }
}

/// The value object handed to presentation: 52 Sunday-first weeks plus a total
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ContributionCalendar {
    weeks: Vec<ContributionWeek>,
    total_contributions: u32,
    origin: CalendarOrigin,
}

impl ContributionCalendar {
    /// Build a live calendar; the total is always the sum of the cells
    pub fn from_weeks(weeks: Vec<ContributionWeek>) -> Result<Self, CalendarShapeError> {
        let calendar = Self {
            weeks,
            total_contributions: 0,
            origin: CalendarOrigin::Live,
        };
        let total_contributions = calendar
            .cell_sum()
            .ok_or(CalendarShapeError::TotalOverflow)?;
        Ok(Self {
            total_contributions,
            ..calendar
        })
    }

    /// Build a fallback calendar carrying a fixed advertised total
    pub fn fallback(weeks: Vec<ContributionWeek>, total_contributions: u32) -> Self {
        Self {
            weeks,
            total_contributions,
            origin: CalendarOrigin::Fallback,
        }
    }

    pub fn weeks(&self) -> &[ContributionWeek] {
        &self.weeks
    }

    pub fn total_contributions(&self) -> u32 {
        self.total_contributions
    }

    pub fn origin(&self) -> CalendarOrigin {
        self.origin
    }

    pub fn days(&self) -> impl Iterator<Item = &ContributionDay> {
        self.weeks.iter().flat_map(|w| w.days.iter())
    }

    /// Sum of every cell, independent of the advertised total.
    /// `None` if it overflows `u32`.
    pub fn cell_sum(&self) -> Option<u32> {
        self.days().try_fold(0u32, |sum, d| sum.checked_add(d.count))
    }

    pub fn counts(&self) -> Vec<[u32; DAYS_PER_WEEK]> {
        self.weeks
            .iter()
            .map(|w| w.days.map(|d| d.count))
            .collect()
    }

    pub fn dates(&self) -> Vec<[String; DAYS_PER_WEEK]> {
        self.weeks
            .iter()
            .map(|w| w.days.map(|d| d.iso_date()))
            .collect()
    }

    /// Colour band per cell, see [`contribution_level`]
    pub fn levels(&self) -> Vec<[u8; DAYS_PER_WEEK]> {
        self.weeks
            .iter()
            .map(|w| w.days.map(|d| contribution_level(d.count)))
            .collect()
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CalendarWire {
    contributions: Vec<[u32; DAYS_PER_WEEK]>,
    dates: Vec<[String; DAYS_PER_WEEK]>,
    total_contributions: u32,
}

// The page consumes parallel `contributions`/`dates` arrays
impl Serialize for ContributionCalendar {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        CalendarWire {
            contributions: self.counts(),
            dates: self.dates(),
            total_contributions: self.total_contributions,
        }
        .serialize(serializer)
    }
}

/// Maps a contribution count to a 0-4 level scale
/// 0 contributions = Level 0
/// 1-3 contributions = Level 1
/// 4-6 contributions = Level 2
/// 7-9 contributions = Level 3
/// 10+ contributions = Level 4
pub fn contribution_level(count: u32) -> u8 {
    match count {
        0 => 0,
        1..=3 => 1,
        4..=6 => 2,
        7..=9 => 3,
        _ => 4,
    }
}

/// Regroup a flat, ascending, gap-free run of days into Sunday-first weeks.
///
/// A partial first week is padded back to Sunday and a partial last week is
/// padded forward to Saturday; padding days carry a zero count.
pub fn group_into_weeks(
    days: Vec<ContributionDay>,
) -> Result<Vec<ContributionWeek>, CalendarShapeError> {
    let first = days.first().ok_or(CalendarShapeError::Empty)?.date;

    for pair in days.windows(2) {
        if pair[1].date != pair[0].date + Duration::days(1) {
            return Err(CalendarShapeError::Gap {
                previous: pair[0].date,
                next: pair[1].date,
            });
        }
    }

    let lead = first.weekday().num_days_from_sunday() as i64;
    let mut padded: Vec<ContributionDay> = (0..lead)
        .map(|i| ContributionDay::new(first - Duration::days(lead - i), 0))
        .collect();
    padded.extend(days);

    while padded.len() % DAYS_PER_WEEK != 0 {
        let next = padded[padded.len() - 1].date + Duration::days(1);
        padded.push(ContributionDay::new(next, 0));
    }

    Ok(padded
        .chunks_exact(DAYS_PER_WEEK)
        .map(|chunk| ContributionWeek {
            days: std::array::from_fn(|i| chunk[i]),
        })
        .collect())
}

/// Keep only the most recent `CALENDAR_WEEKS` weeks, dropping the oldest first
pub fn trailing_weeks(
    mut weeks: Vec<ContributionWeek>,
) -> Result<Vec<ContributionWeek>, CalendarShapeError> {
    if weeks.len() < CALENDAR_WEEKS {
        return Err(CalendarShapeError::TooFewWeeks {
            found: weeks.len(),
            expected: CALENDAR_WEEKS,
        });
    }
    Ok(weeks.split_off(weeks.len() - CALENDAR_WEEKS))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn run(start: &str, counts: &[u32]) -> Vec<ContributionDay> {
        let start = date(start);
        counts
            .iter()
            .enumerate()
            .map(|(i, c)| ContributionDay::new(start + Duration::days(i as i64), *c))
            .collect()
    }

    #[test]
    fn test_contribution_level_bands() {
        assert_eq!(contribution_level(0), 0);
        assert_eq!(contribution_level(1), 1);
        assert_eq!(contribution_level(3), 1);
        assert_eq!(contribution_level(4), 2);
        assert_eq!(contribution_level(6), 2);
        assert_eq!(contribution_level(7), 3);
        assert_eq!(contribution_level(9), 3);
        assert_eq!(contribution_level(10), 4);
        assert_eq!(contribution_level(250), 4);
    }

    #[test]
    fn test_group_full_weeks_unchanged() {
        // 2024-03-03 is a Sunday
        let weeks = group_into_weeks(run("2024-03-03", &[1; 14])).unwrap();
        assert_eq!(weeks.len(), 2);
        assert_eq!(weeks[0].days()[0].date, date("2024-03-03"));
        assert_eq!(weeks[1].days()[0].date, date("2024-03-10"));
        assert!(weeks[1].days().iter().all(|d| d.count == 1));
    }

    #[test]
    fn test_group_pads_partial_edges() {
        // Wednesday 2024-03-06 through Monday 2024-03-11
        let weeks = group_into_weeks(run("2024-03-06", &[2, 2, 2, 2, 2, 2])).unwrap();
        assert_eq!(weeks.len(), 2);

        let first = weeks[0].days();
        assert_eq!(first[0].date, date("2024-03-03"));
        assert_eq!(first[0].count, 0);
        assert_eq!(first[2].count, 0);
        assert_eq!(first[3].count, 2);

        let last = weeks[1].days();
        assert_eq!(last[1].date, date("2024-03-11"));
        assert_eq!(last[1].count, 2);
        assert_eq!(last[6].date, date("2024-03-16"));
        assert_eq!(last[6].count, 0);
    }

    #[test]
    fn test_group_rejects_gaps_and_empty() {
        assert_eq!(group_into_weeks(vec![]), Err(CalendarShapeError::Empty));

        let mut days = run("2024-03-03", &[1, 1, 1]);
        days.push(ContributionDay::new(date("2024-03-08"), 1));
        assert!(matches!(
            group_into_weeks(days),
            Err(CalendarShapeError::Gap { .. })
        ));
    }

    #[test]
    fn test_trailing_weeks_keeps_most_recent() {
        // 53 weeks starting Sunday 2023-03-05
        let weeks = group_into_weeks(run("2023-03-05", &[0; 53 * 7])).unwrap();
        assert_eq!(weeks.len(), 53);

        let kept = trailing_weeks(weeks.clone()).unwrap();
        assert_eq!(kept.len(), CALENDAR_WEEKS);
        assert_eq!(kept[0], weeks[1]);
        assert_eq!(kept.last(), weeks.last());

        assert_eq!(
            trailing_weeks(weeks[..10].to_vec()),
            Err(CalendarShapeError::TooFewWeeks {
                found: 10,
                expected: CALENDAR_WEEKS
            })
        );
    }

    #[test]
    fn test_live_total_is_cell_sum() {
        let weeks = group_into_weeks(run("2024-03-03", &[1, 2, 3, 0, 0, 4, 5])).unwrap();
        let calendar = ContributionCalendar::from_weeks(weeks).unwrap();
        assert_eq!(calendar.total_contributions(), 15);
        assert_eq!(calendar.cell_sum(), Some(15));
        assert_eq!(calendar.origin(), CalendarOrigin::Live);
    }

    #[test]
    fn test_live_total_overflow_is_rejected() {
        let weeks = group_into_weeks(run("2024-03-03", &[u32::MAX, 1, 0, 0, 0, 0, 0])).unwrap();
        assert_eq!(
            ContributionCalendar::from_weeks(weeks),
            Err(CalendarShapeError::TotalOverflow)
        );
    }

    #[test]
    fn test_serializes_parallel_arrays() {
        let weeks = group_into_weeks(run("2024-03-03", &[0, 1, 4, 7, 10, 0, 2])).unwrap();
        let calendar = ContributionCalendar::from_weeks(weeks).unwrap();
        let json = serde_json::to_value(&calendar).unwrap();

        assert_eq!(json["contributions"], serde_json::json!([[0, 1, 4, 7, 10, 0, 2]]));
        assert_eq!(json["dates"][0][0], "2024-03-03");
        assert_eq!(json["dates"][0][6], "2024-03-09");
        assert_eq!(json["totalContributions"], 24);
        assert_eq!(calendar.levels(), vec![[0, 1, 2, 3, 4, 0, 1]]);
    }
}
