use std::sync::Arc;

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Json,
};
use log::{error, info};
use serde::Deserialize;

use crate::dashboard::{PaginationMeta, PAGE_SIZE};
use crate::db::Database;
use crate::error::AppError;
use crate::models::VoterPage;

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub search: Option<String>,
}

// GET /voters?page=&limit=&search=
pub async fn list_voters_handler(
    State(database): State<Arc<Database>>,
    query: Result<Query<ListQuery>, QueryRejection>,
) -> Result<Json<VoterPage>, AppError> {
    let Query(query) = query.map_err(|rejection| AppError::MalformedQuery(rejection.body_text()))?;

    let page = query.page.unwrap_or(1).max(1);
    let limit = query.limit.unwrap_or(PAGE_SIZE).max(1);
    let search = query.search.as_deref().map(str::trim).filter(|s| !s.is_empty());

    let (data, total_records) = database
        .list_voters(page, limit, search)
        .await
        .map_err(|e| {
            error!("Failed to list voters (page {}, limit {}): {}", page, limit, e);
            AppError::from(e)
        })?;

    info!(
        "Served {} of {} voter(s) for page {} (limit {}, search {:?})",
        data.len(),
        total_records,
        page,
        limit,
        search
    );

    Ok(Json(VoterPage {
        data,
        pagination: PaginationMeta::new(page, total_records, limit),
    }))
}
