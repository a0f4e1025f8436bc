pub mod dashboard_loop;
pub mod poll_refresher;
