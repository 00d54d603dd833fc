use actix_web::{web, HttpResponse, Responder};
use serde::Serialize;

use crate::models::contribution_calendar::DAYS_PER_WEEK;
use crate::services::calendar_cache::CalendarCache;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContributionLevelsResponse {
    pub levels: Vec<[u8; DAYS_PER_WEEK]>,
    pub dates: Vec<[String; DAYS_PER_WEEK]>,
    pub total_contributions: u32,
}

/// GET /api/contributions
/// Contribution calendar for the configured account, live or fallback
pub async fn get_contributions(cache: web::Data<CalendarCache>) -> impl Responder {
    let calendar = cache.calendar().await;
    HttpResponse::Ok().json(calendar)
}

/// GET /api/contributions/levels
/// Same calendar with each count reduced to its 0-4 colour level
pub async fn get_contribution_levels(cache: web::Data<CalendarCache>) -> impl Responder {
    let calendar = cache.calendar().await;
    HttpResponse::Ok().json(ContributionLevelsResponse {
        levels: calendar.levels(),
        dates: calendar.dates(),
        total_contributions: calendar.total_contributions(),
    })
}
