use super::{CalendarSource, FetchError, RawCalendar, RawContributionDay};
use crate::utils::http_client::create_http_client;
use async_trait::async_trait;
use reqwest::header::{HeaderValue, AUTHORIZATION};
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;

const CONTRIBUTION_CALENDAR_QUERY: &str = r#"
    query($username: String!) {
        user(login: $username) {
            contributionsCollection {
                contributionCalendar {
                    totalContributions
                    weeks {
                        contributionDays {
                            contributionCount
                            date
                        }
                    }
                }
            }
        }
    }
"#;

pub struct GitHubClient {
    client: Client,
    api_base_url: String,
    token: String,
}

impl GitHubClient {
    pub fn new(api_base_url: &str, token: &str) -> reqwest::Result<Self> {
        Ok(Self {
            client: create_http_client()?,
            api_base_url: api_base_url.trim_end_matches('/').to_string(),
            token: token.to_string(),
        })
    }

    fn authorization(&self) -> Result<HeaderValue, FetchError> {
        HeaderValue::from_str(&format!("Bearer {}", self.token))
            .map_err(|e| FetchError::Credential(e.to_string()))
    }
}

#[async_trait]
impl CalendarSource for GitHubClient {
    async fn fetch_calendar(&self, username: &str) -> Result<RawCalendar, FetchError> {
        let authorization = self.authorization()?;

        let response = self
            .client
            .post(format!("{}/graphql", self.api_base_url))
            .header(AUTHORIZATION, authorization)
            .json(&json!({
                "query": CONTRIBUTION_CALENDAR_QUERY,
                "variables": { "username": username },
            }))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(FetchError::Status { status, body });
        }

        let response_data: GitHubCalendarResponse = response.json().await?;

        if let Some(errors) = response_data.errors {
            return Err(FetchError::GraphQl(
                errors.into_iter().map(|e| e.message).collect(),
            ));
        }

        let calendar = response_data
            .data
            .and_then(|d| d.user)
            .and_then(|u| u.contributions_collection)
            .and_then(|c| c.contribution_calendar)
            .ok_or(FetchError::MissingField(
                "data.user.contributionsCollection.contributionCalendar",
            ))?;

        log::info!(
            "📊 GitHub returned {} weeks ({} contributions) for {}",
            calendar.weeks.len(),
            calendar.total_contributions,
            username
        );

        Ok(RawCalendar {
            total_contributions: calendar.total_contributions,
            weeks: calendar
                .weeks
                .into_iter()
                .map(|week| {
                    week.contribution_days
                        .into_iter()
                        .map(|day| RawContributionDay {
                            date: day.date,
                            count: day.contribution_count,
                        })
                        .collect()
                })
                .collect(),
        })
    }
}

// GitHub GraphQL response types

#[derive(Debug, Deserialize)]
struct GitHubCalendarResponse {
    data: Option<GitHubCalendarData>,
    errors: Option<Vec<GitHubGraphQLError>>,
}

#[derive(Debug, Deserialize)]
struct GitHubGraphQLError {
    message: String,
}

#[derive(Debug, Deserialize)]
struct GitHubCalendarData {
    user: Option<GitHubCalendarUser>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GitHubCalendarUser {
    contributions_collection: Option<GitHubContributionsCollection>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GitHubContributionsCollection {
    contribution_calendar: Option<GitHubContributionCalendar>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GitHubContributionCalendar {
    total_contributions: u32,
    weeks: Vec<GitHubContributionWeek>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GitHubContributionWeek {
    contribution_days: Vec<GitHubContributionDay>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GitHubContributionDay {
    contribution_count: u32,
    date: String,
}
