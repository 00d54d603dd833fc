pub mod github;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::contribution_calendar::CalendarShapeError;

/// One day as reported upstream, before any date parsing
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RawContributionDay {
    pub date: String,
    pub count: u32,
}

/// Calendar exactly as the platform returned it, grouped into its own weeks
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RawCalendar {
    pub total_contributions: u32,
    pub weeks: Vec<Vec<RawContributionDay>>,
}

/// Everything that can go wrong while acquiring live contribution data
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("invalid access credential: {0}")]
    Credential(String),

    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("API request failed with status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("GraphQL errors: {0:?}")]
    GraphQl(Vec<String>),

    #[error("response is missing {0}")]
    MissingField(&'static str),

    #[error("invalid date {0:?} in response")]
    InvalidDate(String),

    #[error(transparent)]
    Shape(#[from] CalendarShapeError),
}

/// Anything able to produce a raw contribution calendar for an account
#[async_trait]
pub trait CalendarSource: Send + Sync {
    /// Fetch the contribution calendar for a user
    async fn fetch_calendar(&self, username: &str) -> Result<RawCalendar, FetchError>;
}
