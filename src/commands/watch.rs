use std::sync::Arc;

use chrono::Local;
use log::info;

use crate::config::Config;
use crate::dashboard::{DashboardView, FilterState};
use crate::fetcher::HttpVoterSource;
use crate::handlers::shutdown_signal;
use crate::tasks::dashboard_loop::{start_dashboard, DashboardSettings};

/// Runs the dashboard against the listing endpoint and prints every view
/// change until interrupted.
pub async fn run_watch(
    config: &Config,
    filters: FilterState,
    page: u32,
    json: bool,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let source = Arc::new(HttpVoterSource::new(config.api_url.clone()));
    info!("Watching {}/voters", source.base_url());

    let dashboard = start_dashboard(source, DashboardSettings::from(config), filters);
    if page > 1 {
        dashboard.go_to_page(page).await;
    }

    let mut views = dashboard.subscribe();
    let shutdown = shutdown_signal();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            _ = &mut shutdown => break,
            changed = views.changed() => {
                if changed.is_err() {
                    break;
                }
                let view = views.borrow_and_update().clone();
                if json {
                    println!("{}", serde_json::to_string(&view)?);
                } else {
                    println!("{}", render_view(&view));
                }
            }
        }
    }

    dashboard.shutdown().await;
    Ok(())
}

pub fn render_view(view: &DashboardView) -> String {
    let stamp = view
        .refreshed_at
        .map(|at| at.with_timezone(&Local).format("%H:%M:%S").to_string())
        .unwrap_or_else(|| "--:--:--".to_string());

    let mut out = format!(
        "[{}] {} voters | surveyed {} | voted {} ({}%) | page {}/{} ({} of {} shown)",
        stamp,
        view.stats.total_records,
        view.stats.surveyed_count,
        view.stats.voting_done_count,
        view.stats.voting_done_percentage,
        view.pagination.current_page,
        view.pagination.display_total_pages(),
        view.window.len(),
        view.pagination.total_records,
    );

    if let Some(booth) = view.filters.booth() {
        out.push_str(&format!(" | booth {}", booth));
    }
    if let Some(milestone) = view.milestone.celebrating_value() {
        out.push_str(&format!("\n  *** {}% of voters have voted! ***", milestone));
    }
    if let Some(notification) = &view.notification {
        out.push_str(&format!("\n  ! {}", notification));
    }
    out
}
