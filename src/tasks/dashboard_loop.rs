use crate::config::Config;
use crate::dashboard::{DashboardState, DashboardView, Effect, Event, FilterState, StatsScope, PAGE_SIZE};
use crate::fetcher::VoterSource;
use crate::tasks::poll_refresher::poll_voters_task;
use log::{info, warn};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;

const EVENT_BUFFER: usize = 64;

#[derive(Debug, Clone)]
pub struct DashboardSettings {
    pub poll_interval: Duration,
    pub celebration_duration: Duration,
    pub stats_scope: StatsScope,
    pub page_size: u32,
}

impl Default for DashboardSettings {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(5),
            celebration_duration: Duration::from_secs(5),
            stats_scope: StatsScope::Booth,
            page_size: PAGE_SIZE,
        }
    }
}

impl From<&Config> for DashboardSettings {
    fn from(config: &Config) -> Self {
        Self {
            poll_interval: config.poll_interval,
            celebration_duration: config.celebration_duration,
            stats_scope: config.stats_scope,
            page_size: PAGE_SIZE,
        }
    }
}

/// A running dashboard. Dropping it stops polling and every pending timer.
pub struct DashboardHandle {
    events: mpsc::Sender<Event>,
    view: watch::Receiver<DashboardView>,
    cancel: CancellationToken,
    tasks: Vec<JoinHandle<()>>,
}

/// Spawns the state owner and the poll task.
pub fn start_dashboard(
    source: Arc<dyn VoterSource>,
    settings: DashboardSettings,
    filters: FilterState,
) -> DashboardHandle {
    let mut state = DashboardState::with_page_size(settings.stats_scope, settings.page_size);
    state.apply(Event::FiltersChanged(filters));

    let (events_tx, events_rx) = mpsc::channel(EVENT_BUFFER);
    let (view_tx, view_rx) = watch::channel(state.view());
    let cancel = CancellationToken::new();

    let owner = tokio::spawn(run_dashboard(
        state,
        events_rx,
        events_tx.clone(),
        view_tx,
        settings.celebration_duration,
        cancel.clone(),
    ));
    let poller = tokio::spawn(poll_voters_task(
        source,
        events_tx.clone(),
        settings.poll_interval,
        cancel.child_token(),
    ));

    info!("Dashboard started");
    DashboardHandle {
        events: events_tx,
        view: view_rx,
        cancel,
        tasks: vec![owner, poller],
    }
}

impl DashboardHandle {
    pub fn view(&self) -> DashboardView {
        self.view.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<DashboardView> {
        self.view.clone()
    }

    pub async fn set_filters(&self, filters: FilterState) -> bool {
        self.send(Event::FiltersChanged(filters)).await
    }

    pub async fn go_to_page(&self, page: u32) -> bool {
        self.send(Event::PageChanged(page)).await
    }

    pub async fn dismiss_celebration(&self) -> bool {
        self.send(Event::CelebrationDismissed).await
    }

    pub async fn dismiss_notification(&self) -> bool {
        self.send(Event::NotificationDismissed).await
    }

    /// Stops polling, abandons in-flight fetches and waits for the tasks to exit.
    pub async fn shutdown(mut self) {
        self.cancel.cancel();
        for task in std::mem::take(&mut self.tasks) {
            let _ = task.await;
        }
        info!("Dashboard stopped");
    }

    async fn send(&self, event: Event) -> bool {
        self.events.send(event).await.is_ok()
    }
}

impl Drop for DashboardHandle {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

async fn run_dashboard(
    mut state: DashboardState,
    mut events: mpsc::Receiver<Event>,
    timers: mpsc::Sender<Event>,
    view: watch::Sender<DashboardView>,
    celebration_duration: Duration,
    cancel: CancellationToken,
) {
    loop {
        let event = tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            event = events.recv() => match event {
                Some(event) => event,
                None => break,
            },
        };

        for effect in state.apply(event) {
            match effect {
                Effect::ScheduleCelebrationClear {
                    milestone,
                    generation,
                } => {
                    info!("Milestone reached: {}% of voters have voted", milestone);
                    schedule_celebration_clear(
                        timers.clone(),
                        generation,
                        celebration_duration,
                        cancel.child_token(),
                    );
                }
                Effect::Notify(message) => warn!("{}", message),
            }
        }

        let next = state.view();
        view.send_if_modified(|current| {
            if *current == next {
                return false;
            }
            *current = next;
            true
        });
    }
}

fn schedule_celebration_clear(
    events: mpsc::Sender<Event>,
    generation: u64,
    after: Duration,
    cancel: CancellationToken,
) {
    tokio::spawn(async move {
        tokio::select! {
            _ = cancel.cancelled() => {}
            _ = sleep(after) => {
                let _ = events.send(Event::CelebrationExpired { generation }).await;
            }
        }
    });
}
