//! Voter-turnout dashboard.
//!
//! A read-only `GET /voters` listing over a SQLite store, and a polling view
//! engine that filters, pages and aggregates the fetched dataset and raises a
//! short-lived celebration each time another tenth of the voters has voted.
//!
//! ```text
//! poll_refresher ──fetch_all──▶ dashboard_loop (DashboardState::apply)
//!                                 ├─ apply_filters ─▶ slice ─▶ page window
//!                                 └─ compute_stats ─▶ MilestoneState::observe
//! ```

pub mod commands;
pub mod config;
pub mod dashboard;
pub mod db;
pub mod error;
pub mod fetcher;
pub mod handlers;
pub mod models;
pub mod tasks;

pub use tasks::dashboard_loop::{start_dashboard, DashboardHandle, DashboardSettings};
