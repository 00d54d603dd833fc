use chrono::{DateTime, Duration, Utc};
use tokio::sync::RwLock;

use crate::models::contribution_calendar::ContributionCalendar;
use crate::services::contribution_fetcher::ContributionFetcher;

struct CachedCalendar {
    fetched_at: DateTime<Utc>,
    calendar: ContributionCalendar,
}

/// Time-based revalidation in front of the fetcher.
///
/// A calendar younger than the window is served as is; anything older is
/// fetched again. Fallback calendars are cached like live ones.
pub struct CalendarCache {
    fetcher: ContributionFetcher,
    window: Duration,
    entry: RwLock<Option<CachedCalendar>>,
}

impl CalendarCache {
    pub fn new(fetcher: ContributionFetcher, window: Duration) -> Self {
        Self {
            fetcher,
            window,
            entry: RwLock::new(None),
        }
    }

    pub async fn calendar(&self) -> ContributionCalendar {
        self.calendar_at(Utc::now()).await
    }

    pub async fn calendar_at(&self, now: DateTime<Utc>) -> ContributionCalendar {
        if let Some(cached) = self.fresh(now).await {
            return cached;
        }

        let mut entry = self.entry.write().await;
        // Another request may have refreshed while we waited for the lock
        if let Some(cached) = entry.as_ref().filter(|c| now - c.fetched_at < self.window) {
            return cached.calendar.clone();
        }

        log::info!(
            "🔄 Revalidating contribution calendar for {}",
            self.fetcher.username()
        );
        let calendar = self.fetcher.fetch_at(now).await;
        log::debug!(
            "Cached {:?} calendar with {} weeks",
            calendar.origin(),
            calendar.weeks().len()
        );
        *entry = Some(CachedCalendar {
            fetched_at: now,
            calendar: calendar.clone(),
        });
        calendar
    }

    async fn fresh(&self, now: DateTime<Utc>) -> Option<ContributionCalendar> {
        let entry = self.entry.read().await;
        entry
            .as_ref()
            .filter(|c| now - c.fetched_at < self.window)
            .map(|c| c.calendar.clone())
    }
}
