use crate::config::Config;
use crate::fetcher::{HttpVoterSource, VoterSource};
use crate::models::VoterPage;

/// Fetches a single server-side page, the only path that supports free-text search.
pub async fn run_page(
    config: &Config,
    page: u32,
    limit: u32,
    search: Option<&str>,
    json: bool,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let source = HttpVoterSource::new(config.api_url.clone());
    let result = source.fetch_page(page, limit, search).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print!("{}", render_page(&result));
    }
    Ok(())
}

pub fn render_page(page: &VoterPage) -> String {
    let mut out = String::new();
    for voter in &page.data {
        out.push_str(&format!(
            "{:>6}  {:<12} {:<28} booth {:<6} {:<11} {:<8} {}\n",
            voter.id,
            fallback(&voter.voter_card_no),
            fallback(&voter.name),
            fallback(&voter.booth_id),
            fallback(voter.voting_status.as_str()),
            if voter.is_surveyed() { "surveyed" } else { "-" },
            if voter.is_transferred() { "transferred" } else { "-" },
        ));
    }

    let meta = &page.pagination;
    out.push_str(&format!(
        "page {} of {} ({} record(s){}{})\n",
        meta.current_page,
        meta.display_total_pages(),
        meta.total_records,
        if meta.has_prev_page { ", prev" } else { "" },
        if meta.has_next_page { ", next" } else { "" },
    ));
    out
}

fn fallback(value: &str) -> &str {
    if value.is_empty() {
        "-"
    } else {
        value
    }
}
