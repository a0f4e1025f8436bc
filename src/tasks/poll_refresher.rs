use crate::dashboard::Event;
use crate::fetcher::VoterSource;
use chrono::Utc;
use log::{debug, info};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::{interval, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

/// Refetches the full dataset every `period` until `cancel` fires.
///
/// The first tick completes immediately so the dashboard loads on start. Each
/// tick spawns its own fetch, tagged with an increasing sequence number; fetches
/// may overlap and the dashboard discards whichever result is stale.
pub async fn poll_voters_task(
    source: Arc<dyn VoterSource>,
    events: mpsc::Sender<Event>,
    period: Duration,
    cancel: CancellationToken,
) {
    info!("Starting voter refresh every {}s", period.as_secs_f32());
    let mut interval = interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut seq: u64 = 0;

    loop {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            _ = interval.tick() => {}
        }

        seq += 1;
        let source = Arc::clone(&source);
        let events = events.clone();
        let fetch_cancel = cancel.child_token();

        tokio::spawn(async move {
            let result = tokio::select! {
                biased;
                _ = fetch_cancel.cancelled() => {
                    debug!("Abandoning in-flight fetch {}", seq);
                    return;
                }
                result = source.fetch_all() => result,
            };

            let event = match result {
                Ok(voters) => Event::FetchCompleted {
                    seq,
                    voters,
                    fetched_at: Utc::now(),
                },
                Err(e) => {
                    debug!("Voter fetch {} failed: {}", seq, e);
                    Event::FetchFailed {
                        seq,
                        error: e.to_string(),
                    }
                }
            };

            // The dashboard may already be gone.
            let _ = events.send(event).await;
        });
    }

    info!("Voter refresh stopped");
}
