use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use axum::{extract::State, routing::get, routing::post, Json, Router};
use serde_json::{json, Value};

use crate::status::{ControlRequest, StatusSnapshot};

#[derive(Clone)]
struct ControlState {
    snapshot: Arc<RwLock<StatusSnapshot>>,
    control: Arc<RwLock<Option<ControlRequest>>>,
    tuning: Arc<RwLock<HashMap<String, f32>>>,
}

pub fn get_router(
    snapshot: Arc<RwLock<StatusSnapshot>>,
    control: Arc<RwLock<Option<ControlRequest>>>,
    tuning: Arc<RwLock<HashMap<String, f32>>>,
) -> Router {
    let state = ControlState {
        snapshot,
        control,
        tuning,
    };

    Router::new()
        .route("/status", get(status_handler))
        .route("/monitor/start", post(start_handler))
        .route("/monitor/stop", post(stop_handler))
        .route("/camera/cycle", post(cycle_camera_handler))
        .route("/camera/select", post(select_camera_handler))
        .route("/tuning", post(tuning_handler))
        .with_state(state)
}

async fn status_handler(State(state): State<ControlState>) -> Json<Value> {
    let snapshot = state.snapshot.read().unwrap().clone();
    Json(json!({
        "status": "ok",
        "monitor": snapshot
    }))
}

fn queue_request(state: &ControlState, request: ControlRequest) -> Json<Value> {
    // Last writer wins; the producer loop drains one request per tick.
    if let Ok(mut slot) = state.control.write() {
        *slot = Some(request);
    }
    Json(json!({
        "status": "requested",
        "action": format!("{:?}", request)
    }))
}

async fn start_handler(State(state): State<ControlState>) -> Json<Value> {
    queue_request(&state, ControlRequest::Start)
}

async fn stop_handler(State(state): State<ControlState>) -> Json<Value> {
    queue_request(&state, ControlRequest::Stop)
}

async fn cycle_camera_handler(State(state): State<ControlState>) -> Json<Value> {
    queue_request(&state, ControlRequest::CycleCamera)
}

#[derive(Debug, serde::Deserialize)]
struct SelectCameraPayload {
    index: u32,
}

async fn select_camera_handler(
    State(state): State<ControlState>,
    Json(payload): Json<SelectCameraPayload>,
) -> Json<Value> {
    queue_request(&state, ControlRequest::SelectCamera(payload.index))
}

async fn tuning_handler(
    State(state): State<ControlState>,
    Json(payload): Json<HashMap<String, f32>>,
) -> Json<Value> {
    let mut tuning = state.tuning.write().unwrap();
    for (k, v) in payload {
        tuning.insert(k, v);
    }
    log::info!("Updated tuning overrides: {:?}", *tuning);
    Json(json!({
        "status": "ok",
        "current_overrides": *tuning
    }))
}
