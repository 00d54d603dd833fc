pub mod contribution_calendar;
