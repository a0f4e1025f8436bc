use chrono::{DateTime, Utc};
use log::debug;
use serde::Serialize;

use crate::dashboard::filters::{apply_filters, FilterState};
use crate::dashboard::milestone::{MilestoneEvent, MilestoneState};
use crate::dashboard::pagination::{slice, PaginationMeta, PAGE_SIZE};
use crate::dashboard::summary::{compute_stats, stats_scope, StatsScope, SummaryStats};
use crate::models::VoterRecord;

/// Everything that can change the dashboard, in the order the runtime receives it.
#[derive(Debug, Clone)]
pub enum Event {
    FetchCompleted {
        seq: u64,
        voters: Vec<VoterRecord>,
        fetched_at: DateTime<Utc>,
    },
    FetchFailed {
        seq: u64,
        error: String,
    },
    FiltersChanged(FilterState),
    PageChanged(u32),
    CelebrationExpired {
        generation: u64,
    },
    CelebrationDismissed,
    NotificationDismissed,
}

/// Side effects the runtime carries out after a reduction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    ScheduleCelebrationClear { milestone: u8, generation: u64 },
    Notify(String),
}

/// Immutable snapshot handed to whatever renders the dashboard.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DashboardView {
    pub window: Vec<VoterRecord>,
    pub pagination: PaginationMeta,
    pub stats: SummaryStats,
    pub milestone: MilestoneState,
    pub filters: FilterState,
    pub notification: Option<String>,
    pub refreshed_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone)]
pub struct DashboardState {
    dataset: Vec<VoterRecord>,
    filters: FilterState,
    current_page: u32,
    page_size: u32,
    scope: StatsScope,
    stats: SummaryStats,
    milestone: MilestoneState,
    notification: Option<String>,
    latest_seq: u64,
    refreshed_at: Option<DateTime<Utc>>,
}

impl DashboardState {
    pub fn new(scope: StatsScope) -> Self {
        Self::with_page_size(scope, PAGE_SIZE)
    }

    pub fn with_page_size(scope: StatsScope, page_size: u32) -> Self {
        Self {
            dataset: Vec::new(),
            filters: FilterState::default(),
            current_page: 1,
            page_size: page_size.max(1),
            scope,
            stats: SummaryStats::default(),
            milestone: MilestoneState::default(),
            notification: None,
            latest_seq: 0,
            refreshed_at: None,
        }
    }

    pub fn dataset(&self) -> &[VoterRecord] {
        &self.dataset
    }

    pub fn current_page(&self) -> u32 {
        self.current_page
    }

    pub fn stats(&self) -> SummaryStats {
        self.stats
    }

    pub fn milestone(&self) -> MilestoneState {
        self.milestone
    }

    pub fn notification(&self) -> Option<&str> {
        self.notification.as_deref()
    }

    pub fn apply(&mut self, event: Event) -> Vec<Effect> {
        match event {
            Event::FetchCompleted {
                seq,
                voters,
                fetched_at,
            } => {
                if !self.accept_seq(seq) {
                    return Vec::new();
                }
                self.dataset = voters;
                self.notification = None;
                self.refreshed_at = Some(fetched_at);
                self.recompute()
            }
            Event::FetchFailed { seq, error } => {
                if !self.accept_seq(seq) {
                    return Vec::new();
                }
                let message = format!("Failed to load voters: {}", error);
                self.dataset.clear();
                self.notification = Some(message.clone());
                let mut effects = vec![Effect::Notify(message)];
                effects.extend(self.recompute());
                effects
            }
            Event::FiltersChanged(filters) => {
                if filters == self.filters {
                    return Vec::new();
                }
                self.filters = filters;
                self.current_page = 1;
                self.recompute()
            }
            Event::PageChanged(page) => {
                self.current_page = page.max(1);
                Vec::new()
            }
            Event::CelebrationExpired { generation } => {
                self.milestone = self.milestone.expire(generation);
                Vec::new()
            }
            Event::CelebrationDismissed => {
                self.milestone = self.milestone.dismiss();
                Vec::new()
            }
            Event::NotificationDismissed => {
                self.notification = None;
                Vec::new()
            }
        }
    }

    pub fn view(&self) -> DashboardView {
        let filtered = apply_filters(&self.dataset, &self.filters);
        let (window, pagination) = slice(&filtered, self.current_page, self.page_size);

        DashboardView {
            window: window.iter().map(|record| (*record).clone()).collect(),
            pagination,
            stats: self.stats,
            milestone: self.milestone,
            filters: self.filters.clone(),
            notification: self.notification.clone(),
            refreshed_at: self.refreshed_at,
        }
    }

    // Responses may arrive out of order; only the newest request is allowed to land.
    fn accept_seq(&mut self, seq: u64) -> bool {
        if seq <= self.latest_seq {
            debug!(
                "Discarding stale fetch result {} (latest applied {})",
                seq, self.latest_seq
            );
            return false;
        }
        self.latest_seq = seq;
        true
    }

    fn recompute(&mut self) -> Vec<Effect> {
        self.stats = compute_stats(stats_scope(&self.dataset, &self.filters, self.scope));

        // An empty scope is "nothing loaded", not a reading of 0%.
        if self.stats.total_records == 0 {
            return Vec::new();
        }

        let (milestone, event) = self.milestone.observe(self.stats.voting_done_percentage);
        self.milestone = milestone;

        match event {
            Some(MilestoneEvent::Reached {
                milestone,
                generation,
            }) => vec![Effect::ScheduleCelebrationClear {
                milestone,
                generation,
            }],
            None => Vec::new(),
        }
    }
}
