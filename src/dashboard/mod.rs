//! Client-side view engine: filtering, paging, aggregation and milestone
//! detection over the most recently fetched voter dataset.

pub mod filters;
pub mod milestone;
pub mod pagination;
pub mod state;
pub mod summary;

pub use filters::{apply_filters, FilterState, NotYetFilter, SurveyFilter, TransferFilter, VotingFilter};
pub use milestone::{MilestoneEvent, MilestoneState};
pub use pagination::{slice, PaginationMeta, PAGE_SIZE};
pub use state::{DashboardState, DashboardView, Effect, Event};
pub use summary::{compute_stats, percentage, stats_scope, StatsScope, SummaryStats};
