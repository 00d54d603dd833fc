use chrono::{DateTime, NaiveDate, Utc};
use std::sync::Arc;

use crate::models::contribution_calendar::{
    group_into_weeks, trailing_weeks, ContributionCalendar, ContributionDay,
};
use crate::services::contribution_fallback::generate_fallback;
use crate::services::contribution_humanizer::humanize_days;
use crate::services::git_platforms::{CalendarSource, FetchError, RawCalendar};

/// Fetches the contribution calendar for one configured account.
///
/// Never fails: any acquisition error is logged and replaced by the
/// synthetic fallback calendar.
pub struct ContributionFetcher {
    source: Arc<dyn CalendarSource>,
    username: String,
}

impl ContributionFetcher {
    pub fn new(source: Arc<dyn CalendarSource>, username: impl Into<String>) -> Self {
        Self {
            source,
            username: username.into(),
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    /// Fetch using `now` as the current instant for the fallback path
    pub async fn fetch_at(&self, now: DateTime<Utc>) -> ContributionCalendar {
        match self.fetch_live().await {
            Ok(calendar) => {
                log::info!(
                    "✅ Built live contribution calendar for {} ({} contributions)",
                    self.username,
                    calendar.total_contributions()
                );
                calendar
            }
            Err(e) => {
                log::error!(
                    "Error fetching GitHub contributions for {}: {}",
                    self.username,
                    e
                );
                generate_fallback(now)
            }
        }
    }

    async fn fetch_live(&self) -> Result<ContributionCalendar, FetchError> {
        let raw = self.source.fetch_calendar(&self.username).await?;
        build_live_calendar(&self.username, raw)
    }
}

/// Humanize the raw calendar and reshape it into the trailing 52 weeks.
///
/// The upstream total is discarded; the result's total is the sum of its cells.
pub fn build_live_calendar(
    username: &str,
    raw: RawCalendar,
) -> Result<ContributionCalendar, FetchError> {
    log::debug!(
        "Upstream reported {} contributions for {}, recomputing from cells",
        raw.total_contributions,
        username
    );

    let days = raw
        .weeks
        .into_iter()
        .flatten()
        .map(|day| {
            NaiveDate::parse_from_str(&day.date, "%Y-%m-%d")
                .map(|date| ContributionDay::new(date, day.count))
                .map_err(|_| FetchError::InvalidDate(day.date))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let weeks = group_into_weeks(humanize_days(username, days))?;
    Ok(ContributionCalendar::from_weeks(trailing_weeks(weeks)?)?)
}
