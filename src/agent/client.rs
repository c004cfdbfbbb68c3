//! Print queue client: the agent's view of the order service.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response, Url};
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::PrintError;
use crate::order::Order;

/// Bound on a single request to the order service.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Reads and drains a restaurant's print queue.
#[async_trait]
pub trait QueueClient: Send + Sync {
    /// Orders queued for `restaurant_id`, in queue order. Entries that
    /// cannot be read as an order are skipped.
    async fn fetch(&self, restaurant_id: &str) -> Result<Vec<Order>, PrintError>;

    /// Remove a printed order. Unknown ids are errors.
    async fn remove(&self, order_id: &str) -> Result<(), PrintError>;
}

/// [`QueueClient`] over the order service's `/api/print-queue` endpoints.
#[derive(Debug, Clone)]
pub struct HttpQueueClient {
    client: Client,
    base: Url,
}

impl HttpQueueClient {
    pub fn new(base: Url) -> Result<Self, PrintError> {
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self { client, base })
    }

    /// `<base>/api/print-queue[/<segment>]`, keeping any base path prefix.
    fn queue_url(&self, segment: Option<&str>) -> Result<Url, PrintError> {
        let mut url = self.base.clone();
        {
            let mut path = url.path_segments_mut().map_err(|_| {
                PrintError::Config(format!("{} cannot be used as a base URL", self.base))
            })?;
            path.pop_if_empty().extend(["api", "print-queue"]);
            if let Some(segment) = segment {
                path.push(segment);
            }
        }
        Ok(url)
    }
}

#[async_trait]
impl QueueClient for HttpQueueClient {
    async fn fetch(&self, restaurant_id: &str) -> Result<Vec<Order>, PrintError> {
        let mut url = self.queue_url(None)?;
        url.query_pairs_mut().append_pair("restaurantId", restaurant_id);

        let response = check_status(self.client.get(url).send().await?).await?;
        let entries: Vec<Value> = response.json().await?;
        let orders = decode_entries(entries);
        debug!(restaurant_id, count = orders.len(), "Fetched print queue");
        Ok(orders)
    }

    async fn remove(&self, order_id: &str) -> Result<(), PrintError> {
        let url = self.queue_url(Some(order_id))?;
        check_status(self.client.delete(url).send().await?).await?;
        Ok(())
    }
}

/// Read each queue entry on its own so one bad entry cannot hold back the
/// orders behind it. Entries without an id are skipped too: they could
/// never be removed.
fn decode_entries(entries: Vec<Value>) -> Vec<Order> {
    entries
        .into_iter()
        .enumerate()
        .filter_map(|(index, entry)| match serde_json::from_value::<Order>(entry) {
            Ok(order) if !order.id.trim().is_empty() => Some(order),
            Ok(_) => {
                warn!(index, "Skipping queue entry without an order id");
                None
            }
            Err(e) => {
                warn!(index, error = %e, "Skipping unreadable queue entry");
                None
            }
        })
        .collect()
}

/// Turn any non-2xx answer into an error carrying the response body.
async fn check_status(response: Response) -> Result<Response, PrintError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let url = response.url().clone();
    let body = response.text().await.unwrap_or_default();
    Err(PrintError::QueueService(format!(
        "{} {} returned {}: {}",
        url.path(),
        url.query().unwrap_or_default(),
        status,
        body.trim()
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::routing::get;
    use axum::{Json, Router};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use crate::order::OrderItem;

    fn client(base: &str) -> HttpQueueClient {
        HttpQueueClient::new(Url::parse(base).unwrap()).unwrap()
    }

    #[test]
    fn test_queue_url() {
        let c = client("http://localhost:3000");
        assert_eq!(
            c.queue_url(None).unwrap().as_str(),
            "http://localhost:3000/api/print-queue"
        );
    }

    #[test]
    fn test_queue_url_keeps_prefix() {
        let c = client("http://example.com/orders/");
        assert_eq!(
            c.queue_url(Some("ORD-1")).unwrap().as_str(),
            "http://example.com/orders/api/print-queue/ORD-1"
        );
    }

    #[test]
    fn test_order_id_is_escaped() {
        let c = client("http://localhost:3000");
        assert_eq!(
            c.queue_url(Some("a/b c")).unwrap().as_str(),
            "http://localhost:3000/api/print-queue/a%2Fb%20c"
        );
    }

    #[tokio::test]
    async fn test_unreachable_service() {
        // Grab a free port and close it again so nothing is listening there.
        let port = {
            let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
            listener.local_addr().unwrap().port()
        };
        let c = client(&format!("http://127.0.0.1:{port}"));
        let err = c.fetch("kaktus").await.unwrap_err();
        assert!(matches!(err, PrintError::QueueService(_)), "got {err:?}");
    }

    #[test]
    fn test_decode_skips_bad_entries() {
        let orders = decode_entries(vec![
            json!("not an order"),
            json!({ "restaurantId": "kaktus" }),
            json!({ "id": "ORD-1", "restaurantId": "kaktus", "items": "none" }),
            json!(42),
            json!({ "id": "ORD-2", "restaurantId": "kaktus", "items": [{ "name": "دوغ" }] }),
        ]);

        let ids: Vec<&str> = orders.iter().map(|o| o.id.as_str()).collect();
        assert_eq!(ids, vec!["ORD-1", "ORD-2"]);
        assert!(orders[0].items.is_empty());
    }

    #[tokio::test]
    async fn test_malformed_entry_does_not_hide_later_orders() {
        let body = json!([
            { "id": "ORD-1", "restaurantId": "kaktus", "items": ["kebab", null] },
            "garbage",
            { "id": "ORD-2", "restaurantId": "kaktus", "items": [{ "name": "دوغ", "qty": 2 }] }
        ]);
        let app = Router::new().route(
            "/api/print-queue",
            get(move || {
                let body = body.clone();
                async move { Json(body) }
            }),
        );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        let orders = client(&format!("http://{addr}")).fetch("kaktus").await.unwrap();

        assert_eq!(orders.len(), 2);
        assert_eq!(orders[0].items, vec![OrderItem::new("kebab", 1)]);
        assert_eq!(orders[1].id, "ORD-2");
        assert_eq!(orders[1].items, vec![OrderItem::new("دوغ", 2)]);
    }
}
