//! Write endpoints.
//!
//! ## Endpoints
//!
//! - `POST /register-new-company` - register a company
//! - `POST /branches` - create or update a branch
//! - `POST /business-sections` - create or update a page section
//! - `POST /navigation` - create or update a navigation entry
//! - `POST /companies/:company_id/industrial-sectors` - apply add/remove items
//! - `POST /companies/:company_id/industrial-sectors/report` - same, per-item outcomes
//! - `POST /companies/:company_id/industrial-sectors/attach` - add a list of sector ids

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use serde::Deserialize;
use serde_json::Value;

use super::{error::ApiError, AppState};
use crate::executor::Row;
use crate::fields::Fields;
use crate::reconcile::ItemOutcome;
use crate::upsert::EntityKind;

type Created<T> = Result<(StatusCode, Json<T>), ApiError>;

#[derive(Debug, Deserialize)]
pub struct SectorBatch {
    /// Kept as raw JSON so shape errors are reported by the validator.
    #[serde(default)]
    pub items: Value,
}

#[derive(Debug, Deserialize)]
pub struct SectorList {
    pub industrial: Vec<String>,
}

async fn write(state: &AppState, kind: EntityKind, body: Value) -> Created<Vec<Row>> {
    let fields = Fields::from_value(body)?;
    let rows = state.engine.upsert(kind, &fields).await?;
    Ok((StatusCode::CREATED, Json(rows)))
}

pub async fn register_company(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Created<Vec<Row>> {
    write(&state, EntityKind::Company, body).await
}

pub async fn setup_branch(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Created<Vec<Row>> {
    write(&state, EntityKind::Branch, body).await
}

pub async fn setup_section(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Created<Vec<Row>> {
    write(&state, EntityKind::Section, body).await
}

pub async fn setup_navigation(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Created<Vec<Row>> {
    write(&state, EntityKind::Navigation, body).await
}

pub async fn reconcile_sectors(
    State(state): State<AppState>,
    Path(company_id): Path<String>,
    Json(batch): Json<SectorBatch>,
) -> Created<Vec<Option<Vec<Row>>>> {
    let results = state
        .engine
        .reconcile_sectors(&company_id, &batch.items)
        .await?;
    Ok((StatusCode::CREATED, Json(results)))
}

pub async fn reconcile_sectors_report(
    State(state): State<AppState>,
    Path(company_id): Path<String>,
    Json(batch): Json<SectorBatch>,
) -> Created<Vec<ItemOutcome>> {
    let outcomes = state
        .engine
        .reconcile_sectors_report(&company_id, &batch.items)
        .await?;
    Ok((StatusCode::CREATED, Json(outcomes)))
}

pub async fn attach_sectors(
    State(state): State<AppState>,
    Path(company_id): Path<String>,
    Json(list): Json<SectorList>,
) -> Created<Vec<Option<Vec<Row>>>> {
    let results = state
        .engine
        .attach_sectors(&company_id, &list.industrial)
        .await?;
    Ok((StatusCode::CREATED, Json(results)))
}

pub async fn health() -> Json<Value> {
    Json(serde_json::json!({ "status": "ok" }))
}
