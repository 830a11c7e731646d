//! Route table and handlers.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;

use crate::models::alert::{Alert, AlertUpdate, NewAlert};
use crate::models::log::AlertLog;
use crate::models::settings::AppSettings;
use crate::orchestrator::store::AlertStats;
use crate::orchestrator::AlertController;
use crate::scheduler::format_schedule;
use crate::Result;

type Ctl = State<Arc<AlertController>>;

/// Alert plus its display label.
#[derive(Debug, Serialize)]
pub struct AlertView {
    #[serde(flatten)]
    alert: Alert,
    schedule_label: String,
}

impl From<Alert> for AlertView {
    fn from(alert: Alert) -> Self {
        let schedule_label = format_schedule(&alert.schedule);
        Self {
            alert,
            schedule_label,
        }
    }
}

/// Build the API router.
#[must_use]
pub fn router(controller: Arc<AlertController>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/alerts", get(list_alerts).post(create_alert))
        .route(
            "/api/alerts/{id}",
            get(get_alert).patch(update_alert).delete(delete_alert),
        )
        .route("/api/alerts/{id}/toggle", post(toggle_alert))
        .route("/api/alerts/{id}/trigger", post(trigger_alert))
        .route("/api/logs", get(list_logs))
        .route("/api/settings", get(get_settings).put(put_settings))
        .route("/api/stats", get(stats))
        .with_state(controller)
}

async fn health() -> &'static str {
    "ok"
}

async fn list_alerts(State(ctl): Ctl) -> Json<Vec<AlertView>> {
    Json(ctl.list().into_iter().map(AlertView::from).collect())
}

async fn create_alert(
    State(ctl): Ctl,
    Json(input): Json<NewAlert>,
) -> Result<(StatusCode, Json<AlertView>)> {
    let alert = ctl.create(input)?;
    Ok((StatusCode::CREATED, Json(alert.into())))
}

async fn get_alert(State(ctl): Ctl, Path(id): Path<String>) -> Result<Json<AlertView>> {
    Ok(Json(ctl.get(&id)?.into()))
}

async fn update_alert(
    State(ctl): Ctl,
    Path(id): Path<String>,
    Json(update): Json<AlertUpdate>,
) -> Result<Json<AlertView>> {
    Ok(Json(ctl.update(&id, update)?.into()))
}

async fn delete_alert(State(ctl): Ctl, Path(id): Path<String>) -> Result<StatusCode> {
    ctl.delete(&id)?;
    Ok(StatusCode::NO_CONTENT)
}

async fn toggle_alert(State(ctl): Ctl, Path(id): Path<String>) -> Result<Json<AlertView>> {
    Ok(Json(ctl.toggle(&id)?.into()))
}

/// 202 when a pass started, 409 when the alert is already in flight.
async fn trigger_alert(State(ctl): Ctl, Path(id): Path<String>) -> Result<StatusCode> {
    if ctl.spawn_trigger(&id)? {
        Ok(StatusCode::ACCEPTED)
    } else {
        Ok(StatusCode::CONFLICT)
    }
}

async fn list_logs(State(ctl): Ctl) -> Json<Vec<AlertLog>> {
    Json(ctl.logs())
}

async fn get_settings(State(ctl): Ctl) -> Json<AppSettings> {
    Json(ctl.settings())
}

async fn put_settings(
    State(ctl): Ctl,
    Json(settings): Json<AppSettings>,
) -> Result<Json<AppSettings>> {
    Ok(Json(ctl.update_settings(settings)?))
}

async fn stats(State(ctl): Ctl) -> Json<AlertStats> {
    Json(ctl.stats())
}
