//! Print queue handlers.

use axum::{
    Json,
    extract::{Path, Query, State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tracing::info;

use crate::{
    order::{Order, QueueEntry},
    queue::{EnqueueOutcome, QueueError},
};

use super::super::state::AppState;

/// Query string for GET /api/print-queue.
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    #[serde(rename = "restaurantId")]
    pub restaurant_id: Option<String>,
}

/// Handle GET /api/print-queue - list queued orders.
pub async fn list(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListQuery>,
) -> Json<Vec<QueueEntry>> {
    Json(state.queue.list(query.restaurant_id.as_deref()).await)
}

/// Handle POST /api/print-queue - enqueue an order.
pub async fn enqueue(
    State(state): State<Arc<AppState>>,
    body: Result<Json<Order>, JsonRejection>,
) -> Result<Response, QueueError> {
    let Json(order) = body.map_err(|e| QueueError::Invalid(e.body_text()))?;
    let id = order.id.clone();
    let restaurant_id = order.restaurant_id.clone();

    match state.queue.enqueue(order).await? {
        EnqueueOutcome::Queued => {
            info!(order_id = %id, restaurant_id = %restaurant_id, "Order added to print queue");
            Ok(success_response(
                StatusCode::CREATED,
                &format!("Order {} added to print queue", id),
            ))
        }
        EnqueueOutcome::AlreadyQueued => Ok(success_response(
            StatusCode::OK,
            &format!("Order {} already queued", id),
        )),
    }
}

/// Handle DELETE /api/print-queue/:id - remove a printed order.
pub async fn remove(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Response, QueueError> {
    let entry = state.queue.remove(&id).await?;
    info!(
        order_id = %id,
        restaurant_id = %entry.order.restaurant_id,
        "Order removed from print queue"
    );
    Ok(success_response(
        StatusCode::OK,
        &format!("Order {} removed from print queue", id),
    ))
}

fn success_response(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "success": true, "message": message }))).into_response()
}
