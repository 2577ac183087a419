//! Per-table operations
//!
//! Thin typed wrappers over [`TableClient`]. List reads default to newest
//! first; updates stamp `updated_at` with the client clock.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::client::{TableClient, TableQuery};
use super::error::{GatewayError, GatewayResult};
use super::types::*;

/// Fallback conversion rate when today's metrics row is missing or zero
pub const DEFAULT_CONVERSION_RATE: f64 = 3.24;

/// Serialize a patch and add the client-side `updated_at` stamp
fn stamped<T: Serialize>(patch: &T) -> GatewayResult<Value> {
    let mut value = serde_json::to_value(patch)?;
    match &mut value {
        Value::Object(map) => {
            map.insert(
                "updated_at".to_string(),
                Value::String(Utc::now().to_rfc3339()),
            );
            Ok(value)
        }
        _ => Err(GatewayError::Decode(
            "update payload must be a JSON object".to_string(),
        )),
    }
}

fn not_found(table: &str, id: &str) -> GatewayError {
    GatewayError::NotFound(format!("{}/{}", table, id))
}

// ============================================
// Customers
// ============================================

pub struct CustomersTable<'a> {
    client: &'a TableClient,
}

impl<'a> CustomersTable<'a> {
    const TABLE: &'static str = "customers";

    pub(crate) fn new(client: &'a TableClient) -> Self {
        Self { client }
    }

    pub async fn list(&self) -> GatewayResult<Vec<Customer>> {
        self.client
            .select(&TableQuery::table(Self::TABLE).newest_first())
            .await
    }

    pub async fn get(&self, id: &str) -> GatewayResult<Customer> {
        self.client
            .select_one(&TableQuery::table(Self::TABLE).eq("id", id))
            .await?
            .ok_or_else(|| not_found(Self::TABLE, id))
    }

    /// Count customers by status (reads the status column only)
    pub async fn stats(&self) -> GatewayResult<CustomerStats> {
        #[derive(Deserialize)]
        struct StatusRow {
            status: CustomerStatus,
        }

        let rows: Vec<StatusRow> = self
            .client
            .select(&TableQuery::table(Self::TABLE).columns("status"))
            .await?;

        let count = |status: CustomerStatus| rows.iter().filter(|r| r.status == status).count();

        Ok(CustomerStats {
            total: rows.len(),
            active: count(CustomerStatus::Active),
            vip: count(CustomerStatus::Vip),
            inactive: count(CustomerStatus::Inactive),
            new: count(CustomerStatus::New),
        })
    }

    pub async fn create(&self, customer: &NewCustomer) -> GatewayResult<Customer> {
        self.client.insert(Self::TABLE, customer).await
    }

    pub async fn update(&self, id: &str, patch: &CustomerPatch) -> GatewayResult<Customer> {
        self.client
            .update(&TableQuery::table(Self::TABLE).eq("id", id), &stamped(patch)?)
            .await
    }

    pub async fn delete(&self, id: &str) -> GatewayResult<()> {
        self.client
            .delete(&TableQuery::table(Self::TABLE).eq("id", id))
            .await
    }
}

// ============================================
// Products
// ============================================

pub struct ProductsTable<'a> {
    client: &'a TableClient,
}

impl<'a> ProductsTable<'a> {
    const TABLE: &'static str = "products";

    pub(crate) fn new(client: &'a TableClient) -> Self {
        Self { client }
    }

    pub async fn list(&self) -> GatewayResult<Vec<Product>> {
        self.client
            .select(&TableQuery::table(Self::TABLE).newest_first())
            .await
    }

    pub async fn list_by_category(&self, category: &str) -> GatewayResult<Vec<Product>> {
        self.client
            .select(&TableQuery::table(Self::TABLE).eq("category", category))
            .await
    }

    pub async fn create(&self, product: &NewProduct) -> GatewayResult<Product> {
        self.client.insert(Self::TABLE, product).await
    }

    pub async fn update(&self, id: &str, patch: &ProductPatch) -> GatewayResult<Product> {
        self.client
            .update(&TableQuery::table(Self::TABLE).eq("id", id), &stamped(patch)?)
            .await
    }

    pub async fn delete(&self, id: &str) -> GatewayResult<()> {
        self.client
            .delete(&TableQuery::table(Self::TABLE).eq("id", id))
            .await
    }
}

// ============================================
// Orders
// ============================================

pub struct OrdersTable<'a> {
    client: &'a TableClient,
}

impl<'a> OrdersTable<'a> {
    const TABLE: &'static str = "orders";

    pub(crate) fn new(client: &'a TableClient) -> Self {
        Self { client }
    }

    pub async fn list(&self) -> GatewayResult<Vec<Order>> {
        self.client
            .select(&TableQuery::table(Self::TABLE).newest_first())
            .await
    }

    pub async fn get(&self, id: &str) -> GatewayResult<Order> {
        self.client
            .select_one(&TableQuery::table(Self::TABLE).eq("id", id))
            .await?
            .ok_or_else(|| not_found(Self::TABLE, id))
    }

    /// The `limit` most recent orders
    pub async fn recent(&self, limit: usize) -> GatewayResult<Vec<Order>> {
        self.client
            .select(&TableQuery::table(Self::TABLE).newest_first().limit(limit))
            .await
    }

    pub async fn list_by_status(&self, status: &OrderStatus) -> GatewayResult<Vec<Order>> {
        self.client
            .select(
                &TableQuery::table(Self::TABLE)
                    .eq("status", status.as_str())
                    .newest_first(),
            )
            .await
    }

    pub async fn create(&self, order: &NewOrder) -> GatewayResult<Order> {
        self.client.insert(Self::TABLE, order).await
    }

    pub async fn update(&self, id: &str, patch: &OrderPatch) -> GatewayResult<Order> {
        self.client
            .update(&TableQuery::table(Self::TABLE).eq("id", id), &stamped(patch)?)
            .await
    }

    pub async fn delete(&self, id: &str) -> GatewayResult<()> {
        self.client
            .delete(&TableQuery::table(Self::TABLE).eq("id", id))
            .await
    }
}

// ============================================
// Chat messages
// ============================================

pub struct ChatTable<'a> {
    client: &'a TableClient,
}

impl<'a> ChatTable<'a> {
    const TABLE: &'static str = "chat_messages";

    pub(crate) fn new(client: &'a TableClient) -> Self {
        Self { client }
    }

    /// Messages of one session, oldest first
    pub async fn messages(&self, session_id: &str) -> GatewayResult<Vec<ChatMessage>> {
        self.client
            .select(
                &TableQuery::table(Self::TABLE)
                    .eq("session_id", session_id)
                    .order_by("created_at", true),
            )
            .await
    }

    pub async fn save_message(&self, message: &NewChatMessage) -> GatewayResult<ChatMessage> {
        self.client.insert(Self::TABLE, message).await
    }
}

// ============================================
// Metrics
// ============================================

pub struct MetricsTable<'a> {
    client: &'a TableClient,
}

impl<'a> MetricsTable<'a> {
    const TABLE: &'static str = "daily_metrics";

    pub(crate) fn new(client: &'a TableClient) -> Self {
        Self { client }
    }

    /// Daily rows in ascending date order, at most `days` of them
    pub async fn daily(&self, days: usize) -> GatewayResult<Vec<DailyMetrics>> {
        self.client
            .select(
                &TableQuery::table(Self::TABLE)
                    .order_by("date", true)
                    .limit(days),
            )
            .await
    }

    /// Dashboard KPIs.
    ///
    /// Revenue and order count come from the orders table, customer count
    /// from the customers table. A missing row for today, or a zero rate,
    /// falls back to the default conversion rate.
    pub async fn kpis(&self) -> GatewayResult<Kpis> {
        #[derive(Deserialize)]
        struct AmountRow {
            total_amount: f64,
        }

        #[derive(Deserialize)]
        struct IdRow {
            #[allow(dead_code)]
            id: String,
        }

        let today = Utc::now().date_naive();
        let today_metrics: Option<DailyMetrics> = match self
            .client
            .select_one(&TableQuery::table(Self::TABLE).eq("date", today))
            .await
        {
            Ok(row) => row,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to load today's metrics, using default conversion rate");
                None
            }
        };

        let orders: Vec<AmountRow> = self
            .client
            .select(&TableQuery::table("orders").columns("total_amount"))
            .await?;

        let customers: Vec<IdRow> = self
            .client
            .select(&TableQuery::table("customers").columns("id"))
            .await?;

        Ok(Kpis {
            total_revenue: orders.iter().map(|o| o.total_amount).sum(),
            total_orders: orders.len(),
            total_customers: customers.len(),
            conversion_rate: today_metrics
                .map(|m| m.conversion_rate)
                .filter(|rate| *rate != 0.0)
                .unwrap_or(DEFAULT_CONVERSION_RATE),
        })
    }
}

// ============================================
// Settings
// ============================================

pub struct SettingsTable<'a> {
    client: &'a TableClient,
}

impl<'a> SettingsTable<'a> {
    const TABLE: &'static str = "user_settings";

    pub(crate) fn new(client: &'a TableClient) -> Self {
        Self { client }
    }

    /// Settings row for a user; `None` when the user has never saved any
    pub async fn get(&self, user_id: &str) -> GatewayResult<Option<UserSettings>> {
        self.client
            .select_one(&TableQuery::table(Self::TABLE).eq("user_id", user_id))
            .await
    }

    /// Insert or merge the user's settings row
    pub async fn upsert(&self, user_id: &str, patch: &SettingsPatch) -> GatewayResult<UserSettings> {
        let mut body = stamped(patch)?;
        if let Value::Object(map) = &mut body {
            map.insert("user_id".to_string(), Value::String(user_id.to_string()));
        }
        self.client.upsert(Self::TABLE, "user_id", &body).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{order_json, MockBackend};
    use serde_json::json;

    #[test]
    fn test_stamped_adds_updated_at() {
        let patch = OrderPatch {
            items_count: Some(3),
            ..Default::default()
        };
        let value = stamped(&patch).unwrap();
        assert_eq!(value["items_count"], 3);
        assert!(value["updated_at"].is_string());
    }

    #[tokio::test]
    async fn test_list_orders_newest_first() {
        let backend = MockBackend::start().await;
        backend.respond(
            "GET",
            "/rest/v1/orders",
            200,
            json!([order_json("1", "ORD-2024001", "pending")]),
        );

        let orders = backend.gateway().orders().list().await.unwrap();
        assert_eq!(orders.len(), 1);

        let request = backend.last_request().unwrap();
        assert_eq!(request.param("order"), Some("created_at.desc"));
        assert_eq!(request.header("apikey"), Some("anon-key"));
        assert_eq!(request.header("authorization"), Some("Bearer anon-key"));
    }

    #[tokio::test]
    async fn test_recent_orders_limit() {
        let backend = MockBackend::start().await;
        backend.respond("GET", "/rest/v1/orders", 200, json!([]));

        let orders = backend.gateway().orders().recent(5).await.unwrap();
        assert!(orders.is_empty());
        assert_eq!(backend.last_request().unwrap().param("limit"), Some("5"));
    }

    #[tokio::test]
    async fn test_get_missing_order_is_not_found() {
        let backend = MockBackend::start().await;
        backend.respond(
            "GET",
            "/rest/v1/orders",
            406,
            json!({ "code": "PGRST116", "message": "JSON object requested, multiple (or no) rows returned" }),
        );

        let result = backend.gateway().orders().get("missing").await;
        assert!(matches!(result, Err(GatewayError::NotFound(_))));

        let request = backend.last_request().unwrap();
        assert_eq!(request.param("id"), Some("eq.missing"));
        assert_eq!(
            request.header("accept"),
            Some("application/vnd.pgrst.object+json")
        );
    }

    #[tokio::test]
    async fn test_update_order_stamps_updated_at() {
        let backend = MockBackend::start().await;
        backend.respond(
            "PATCH",
            "/rest/v1/orders",
            200,
            order_json("7", "ORD-2024007", "shipped"),
        );

        let patch = OrderPatch {
            status: Some(OrderStatus::Shipped),
            ..Default::default()
        };
        let order = backend.gateway().orders().update("7", &patch).await.unwrap();
        assert_eq!(order.status, OrderStatus::Shipped);

        let request = backend.last_request().unwrap();
        let body = request.body.clone().unwrap();
        assert_eq!(body["status"], "shipped");
        assert!(body["updated_at"].is_string());
        assert_eq!(request.param("id"), Some("eq.7"));
    }

    #[tokio::test]
    async fn test_backend_error_is_surfaced() {
        let backend = MockBackend::start().await;
        backend.respond(
            "POST",
            "/rest/v1/orders",
            409,
            json!({ "code": "23505", "message": "duplicate key value" }),
        );

        let result = backend.gateway().orders().create(&NewOrder::default()).await;
        match result {
            Err(GatewayError::Api { status, code, message }) => {
                assert_eq!(status, 409);
                assert_eq!(code.as_deref(), Some("23505"));
                assert_eq!(message, "duplicate key value");
            }
            other => panic!("expected API error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_customer_stats() {
        let backend = MockBackend::start().await;
        backend.respond(
            "GET",
            "/rest/v1/customers",
            200,
            json!([
                { "status": "active" },
                { "status": "vip" },
                { "status": "vip" },
                { "status": "new" },
                { "status": "archived" }
            ]),
        );

        let stats = backend.gateway().customers().stats().await.unwrap();
        assert_eq!(stats.total, 5);
        assert_eq!(stats.active, 1);
        assert_eq!(stats.vip, 2);
        assert_eq!(stats.new, 1);
        assert_eq!(stats.inactive, 0);
        assert_eq!(backend.last_request().unwrap().param("select"), Some("status"));
    }

    #[tokio::test]
    async fn test_kpis_default_conversion_rate() {
        let backend = MockBackend::start().await;
        backend.respond(
            "GET",
            "/rest/v1/daily_metrics",
            406,
            json!({ "code": "PGRST116", "message": "no rows" }),
        );
        backend.respond(
            "GET",
            "/rest/v1/orders",
            200,
            json!([{ "total_amount": 100.5 }, { "total_amount": 49.5 }]),
        );
        backend.respond("GET", "/rest/v1/customers", 200, json!([{ "id": "a" }]));

        let kpis = backend.gateway().metrics().kpis().await.unwrap();
        assert_eq!(kpis.total_revenue, 150.0);
        assert_eq!(kpis.total_orders, 2);
        assert_eq!(kpis.total_customers, 1);
        assert_eq!(kpis.conversion_rate, DEFAULT_CONVERSION_RATE);
    }

    async fn kpis_with_today_rate(rate: f64) -> Kpis {
        let backend = MockBackend::start().await;
        backend.respond(
            "GET",
            "/rest/v1/daily_metrics",
            200,
            json!({
                "id": "m1",
                "date": Utc::now().date_naive().to_string(),
                "total_revenue": 0.0,
                "total_orders": 0,
                "active_customers": 0,
                "conversion_rate": rate,
                "created_at": "2024-05-01T00:00:00+00:00"
            }),
        );
        backend.respond("GET", "/rest/v1/orders", 200, json!([]));
        backend.respond("GET", "/rest/v1/customers", 200, json!([]));

        backend.gateway().metrics().kpis().await.unwrap()
    }

    #[tokio::test]
    async fn test_kpis_use_today_conversion_rate() {
        assert_eq!(kpis_with_today_rate(2.5).await.conversion_rate, 2.5);
    }

    #[tokio::test]
    async fn test_kpis_zero_conversion_rate_uses_default() {
        assert_eq!(kpis_with_today_rate(0.0).await.conversion_rate, DEFAULT_CONVERSION_RATE);
    }

    #[tokio::test]
    async fn test_settings_missing_row_is_none() {
        let backend = MockBackend::start().await;
        backend.respond(
            "GET",
            "/rest/v1/user_settings",
            406,
            json!({ "code": "PGRST116", "message": "no rows" }),
        );

        let settings = backend.gateway().settings().get("user-1").await.unwrap();
        assert!(settings.is_none());
    }

    #[tokio::test]
    async fn test_settings_upsert_body() {
        let backend = MockBackend::start().await;
        backend.respond(
            "POST",
            "/rest/v1/user_settings",
            201,
            json!({
                "id": "s1",
                "user_id": "user-1",
                "language": "en",
                "created_at": "2024-05-01T00:00:00+00:00",
                "updated_at": "2024-05-01T00:00:00+00:00"
            }),
        );

        let patch = SettingsPatch {
            language: Some("en".to_string()),
            ..Default::default()
        };
        let saved = backend
            .gateway()
            .settings()
            .upsert("user-1", &patch)
            .await
            .unwrap();
        assert_eq!(saved.language, "en");

        let request = backend.last_request().unwrap();
        assert_eq!(request.param("on_conflict"), Some("user_id"));
        let body = request.body.unwrap();
        assert_eq!(body["user_id"], "user-1");
        assert!(body["updated_at"].is_string());
    }

    #[tokio::test]
    async fn test_chat_messages_oldest_first() {
        let backend = MockBackend::start().await;
        backend.respond("GET", "/rest/v1/chat_messages", 200, json!([]));

        backend.gateway().chat().messages("session_1").await.unwrap();

        let request = backend.last_request().unwrap();
        assert_eq!(request.param("session_id"), Some("eq.session_1"));
        assert_eq!(request.param("order"), Some("created_at.asc"));
    }
}
