//! Agent HTTP surface: health and manual printing.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::Deserialize;
use serde_json::json;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use super::pipeline::PrintPipeline;
use super::status::{AgentStatus, HealthReport};
use crate::order::Order;

pub struct AgentState {
    pub pipeline: Arc<PrintPipeline>,
    pub status: Arc<AgentStatus>,
}

/// Body of `POST /print-order`.
#[derive(Debug, Deserialize)]
pub struct PrintOrderRequest {
    pub order: Option<Order>,
}

pub fn router(pipeline: Arc<PrintPipeline>, status: Arc<AgentStatus>) -> Router {
    let state = Arc::new(AgentState { pipeline, status });

    Router::new()
        .route("/health", get(health))
        .route("/print-order", post(print_order))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health(State(state): State<Arc<AgentState>>) -> Json<HealthReport> {
    Json(state.status.report().await)
}

/// Print one order immediately. The queue is not touched.
async fn print_order(
    State(state): State<Arc<AgentState>>,
    body: Result<Json<PrintOrderRequest>, JsonRejection>,
) -> Response {
    let request = match body {
        Ok(Json(request)) => request,
        Err(e) => return error_response(StatusCode::BAD_REQUEST, &e.body_text()),
    };
    let Some(order) = request.order else {
        return error_response(StatusCode::BAD_REQUEST, "order is required");
    };

    match state.pipeline.print(&order).await {
        Ok(()) => {
            state.status.record_printed().await;
            info!(order_id = %order.id, "Order printed on request");
            (
                StatusCode::OK,
                Json(json!({
                    "success": true,
                    "message": format!("Order {} printed", order.id),
                })),
            )
                .into_response()
        }
        Err(e) => {
            state.status.record_failed().await;
            warn!(order_id = %order.id, error = %e, "Manual print failed");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, &e.to_string())
        }
    }
}

fn error_response(status: StatusCode, error: &str) -> Response {
    (status, Json(json!({ "success": false, "error": error }))).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PrintError;
    use crate::printer::PrinterConfig;
    use crate::receipt::ReceiptStyle;
    use crate::render::{FontSet, Rasterizer};
    use crate::transport::PrinterTransport;
    use async_trait::async_trait;
    use axum::body::{Body, to_bytes};
    use axum::http::Request;
    use tower::ServiceExt;

    struct Printer {
        online: bool,
    }

    #[async_trait]
    impl PrinterTransport for Printer {
        async fn send(&self, _data: &[u8]) -> Result<(), PrintError> {
            if self.online {
                Ok(())
            } else {
                Err(PrintError::Connection("192.168.1.100:9100: refused".into()))
            }
        }

        fn address(&self) -> String {
            "192.168.1.100:9100".into()
        }
    }

    fn app(online: bool) -> Router {
        let pipeline = Arc::new(PrintPipeline::new(
            ReceiptStyle::default(),
            Rasterizer::new(Arc::new(FontSet::builtin().unwrap()), 570),
            PrinterConfig::default(),
            Arc::new(Printer { online }),
        ));
        let status = Arc::new(AgentStatus::new("kaktus", pipeline.printer_address()));
        router(pipeline, status)
    }

    async fn call(app: Router, req: Request<Body>) -> (StatusCode, serde_json::Value) {
        let res = app.oneshot(req).await.unwrap();
        let status = res.status();
        let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    fn post(body: &str) -> Request<Body> {
        Request::post("/print-order")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let req = Request::get("/health").body(Body::empty()).unwrap();
        let (status, json) = call(app(true), req).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["status"], "ok");
        assert_eq!(json["printer"], "192.168.1.100:9100");
        assert_eq!(json["restaurantId"], "kaktus");
        assert_eq!(json["printed"], 0);
    }

    #[tokio::test]
    async fn test_print_order_ok() {
        let body = r#"{"order":{"id":"ORD-1","kitchenNumber":12,"restaurantId":"kaktus","items":[{"name":"کباب","qty":2}]}}"#;
        let (status, json) = call(app(true), post(body)).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["success"], true);
        assert_eq!(json["message"], "Order ORD-1 printed");
    }

    #[tokio::test]
    async fn test_print_order_printer_down() {
        let (status, json) = call(app(false), post(r#"{"order":{"id":"ORD-1"}}"#)).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json["success"], false);
        assert!(json["error"].as_str().unwrap().contains("refused"));
    }

    #[tokio::test]
    async fn test_print_order_missing_order() {
        let (status, json) = call(app(true), post("{}")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"], "order is required");
    }

    #[tokio::test]
    async fn test_print_order_malformed_json() {
        let (status, json) = call(app(true), post("{not json")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["success"], false);
    }
}
