pub mod calendar_cache;
pub mod contribution_fallback;
pub mod contribution_fetcher;
pub mod contribution_humanizer;
pub mod git_platforms;
