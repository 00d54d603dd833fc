mod handlers;
mod models;
mod services;
mod utils;

use actix_cors::Cors;
use actix_files::Files;
use actix_web::{middleware::Logger, web, App, HttpServer};
use anyhow::Context;
use std::sync::Arc;

use services::calendar_cache::CalendarCache;
use services::contribution_fetcher::ContributionFetcher;
use services::git_platforms::github::GitHubClient;
use utils::config::Config;

/// API routes shared by the server and its tests
fn api_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(handlers::health::health))
        .service(
            web::scope("/api/contributions")
                .route("", web::get().to(handlers::contributions::get_contributions))
                .route(
                    "/levels",
                    web::get().to(handlers::contributions::get_contribution_levels),
                ),
        );
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file FIRST before anything else
    dotenv::dotenv().ok();

    // Initialize logger with default level if RUST_LOG not set
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // Missing credentials stop the server here, before any request is made
    let config = Config::from_env().context("Failed to load configuration")?;
    let host = config.host.clone();
    let port = config.port;

    log::info!("📝 Configuration loaded:");
    log::info!("   - GitHub account: {}", config.github_username);
    log::info!("   - GitHub API: {}", config.github_api_base_url);
    log::info!(
        "   - Revalidate every: {}s",
        config.revalidate_window.num_seconds()
    );
    log::info!(
        "   - Static site: {}",
        config.static_dir.as_deref().unwrap_or("DISABLED")
    );

    let github = GitHubClient::new(&config.github_api_base_url, &config.github_token)
        .context("Failed to create HTTP client")?;
    let fetcher = ContributionFetcher::new(Arc::new(github), config.github_username.clone());
    let cache = web::Data::new(CalendarCache::new(fetcher, config.revalidate_window));

    log::info!("🌐 Starting HTTP server at http://{}:{}", host, port);
    log::info!("   - GET  http://{}:{}/api/contributions", host, port);
    log::info!("   - GET  http://{}:{}/api/contributions/levels", host, port);
    log::info!("   - GET  http://{}:{}/health", host, port);

    HttpServer::new(move || {
        let cors = Cors::default()
            .allowed_origin("http://localhost:5173")
            .allowed_origin("http://localhost:3000")
            .allowed_origin(&config.frontend_url)
            .allowed_methods(vec!["GET", "OPTIONS"])
            .allowed_headers(vec![actix_web::http::header::ACCEPT])
            .max_age(3600);

        let mut app = App::new()
            .app_data(cache.clone())
            .wrap(Logger::default())
            .wrap(cors)
            .configure(api_routes);

        // The built site is mounted last so API routes take precedence
        if let Some(dir) = &config.static_dir {
            app = app.service(Files::new("/", dir).index_file("index.html"));
        }

        app
    })
    .bind((host, port))
    .context("Failed to bind HTTP server")?
    .run()
    .await
    .context("HTTP server terminated")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test;
    use crate::services::git_platforms::github::tests::calendar_body;
    use httpmock::prelude::*;

    #[actix_web::test]
    async fn test_api_routes_serve_live_calendar() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/graphql")
                    .header("Authorization", "Bearer t0k");
                then.status(200).json_body(calendar_body("2023-03-05", 53, 2));
            })
            .await;

        let github = GitHubClient::new(&server.base_url(), "t0k").unwrap();
        let fetcher = ContributionFetcher::new(Arc::new(github), "alice");
        let cache = web::Data::new(CalendarCache::new(fetcher, chrono::Duration::hours(1)));

        let app = test::init_service(App::new().app_data(cache).configure(api_routes)).await;

        let req = test::TestRequest::get().uri("/api/contributions").to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["totalContributions"], 52 * 7 * 2);
        assert_eq!(body["dates"][0][0], "2023-03-12");

        let req = test::TestRequest::get().uri("/health").to_request();
        assert!(test::call_service(&app, req).await.status().is_success());
    }
}
