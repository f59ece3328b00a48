//! The two routes of the service surface.
//!
//! ```text
//! POST /submit/bid                {sessionId, price, role} -> {success, message, deadline}
//! GET  /trade/status/:session_id  -> phase-shaped session view + envelope
//! ```

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use sealbid_engine::OtcEngine;
use sealbid_types::{SessionId, SessionView, TradeStatus};

use crate::error::ApiError;

pub fn router(engine: Arc<OtcEngine>) -> Router {
    Router::new()
        .route("/submit/bid", post(submit_bid))
        .route("/trade/status/:session_id", get(trade_status))
        .with_state(engine)
}

// ---------------------------------------------------------------------------
// Submit bid
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SubmitBidRequest {
    session_id: String,
    #[serde(with = "rust_decimal::serde::float")]
    price: Decimal,
    role: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SubmitBidResponse {
    success: bool,
    message: String,
    deadline: i64,
}

async fn submit_bid(
    State(engine): State<Arc<OtcEngine>>,
    Json(req): Json<SubmitBidRequest>,
) -> Result<Json<SubmitBidResponse>, ApiError> {
    let session = SessionId::new(req.session_id);
    let receipt = engine.submit_bid(&session, &req.role, req.price).await?;
    Ok(Json(SubmitBidResponse {
        success: true,
        message: format!("{} bid submitted and encrypted.", capitalize(&req.role)),
        deadline: receipt.deadline,
    }))
}

// ---------------------------------------------------------------------------
// Trade status
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
struct StatusResponse {
    success: bool,
    message: String,
    #[serde(flatten)]
    view: SessionView,
}

async fn trade_status(
    State(engine): State<Arc<OtcEngine>>,
    Path(session_id): Path<String>,
) -> Result<Json<StatusResponse>, ApiError> {
    let session = SessionId::new(session_id);
    let view = engine.status(&session).await?;
    let message = match view.status {
        TradeStatus::Pending => "Deadline not reached yet.",
        TradeStatus::Matched | TradeStatus::Unmatched => "Trade already processed.",
    };
    Ok(Json(StatusResponse {
        success: true,
        message: message.into(),
        view,
    }))
}

/// "buyer" -> "Buyer", for the submit confirmation. Applied to whatever
/// role string the caller sent, recognized or not.
fn capitalize(role: &str) -> String {
    let mut chars = role.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}
