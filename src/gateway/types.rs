//! Table-store row types
//!
//! One struct per backend table plus the "new" (insert) and "patch" (update)
//! shapes used by the gateway. Status enums keep unknown values from the
//! backend instead of rejecting the whole row.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::locale::Locale;

// ============================================
// Customers
// ============================================

/// Customer lifecycle status
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CustomerStatus {
    Active,
    Inactive,
    Vip,
    New,
    #[serde(untagged)]
    Other(String),
}

impl CustomerStatus {
    pub const ALL: [CustomerStatus; 4] = [
        CustomerStatus::Active,
        CustomerStatus::Inactive,
        CustomerStatus::Vip,
        CustomerStatus::New,
    ];

    pub fn as_str(&self) -> &str {
        match self {
            CustomerStatus::Active => "active",
            CustomerStatus::Inactive => "inactive",
            CustomerStatus::Vip => "vip",
            CustomerStatus::New => "new",
            CustomerStatus::Other(s) => s,
        }
    }

    pub fn label(&self, locale: Locale) -> String {
        let label = match (self, locale) {
            (CustomerStatus::Active, Locale::ZhCn) => "活跃",
            (CustomerStatus::Inactive, Locale::ZhCn) => "不活跃",
            (CustomerStatus::Vip, Locale::ZhCn) => "VIP",
            (CustomerStatus::New, Locale::ZhCn) => "新客户",
            (CustomerStatus::Active, Locale::En) => "Active",
            (CustomerStatus::Inactive, Locale::En) => "Inactive",
            (CustomerStatus::Vip, Locale::En) => "VIP",
            (CustomerStatus::New, Locale::En) => "New",
            (CustomerStatus::Other(s), _) => s.as_str(),
        };
        label.to_string()
    }
}

impl Default for CustomerStatus {
    fn default() -> Self {
        CustomerStatus::New
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub location: String,
    pub status: CustomerStatus,
    #[serde(default)]
    pub avatar: String,
    #[serde(default)]
    pub total_orders: u32,
    #[serde(default)]
    pub total_spent: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Insert shape for customers; also the customer edit-form state
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewCustomer {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub location: String,
    pub status: CustomerStatus,
    pub avatar: String,
    pub total_orders: u32,
    pub total_spent: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CustomerPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<CustomerStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_orders: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_spent: Option<f64>,
}

impl From<&Customer> for NewCustomer {
    fn from(c: &Customer) -> Self {
        Self {
            name: c.name.clone(),
            email: c.email.clone(),
            phone: c.phone.clone(),
            location: c.location.clone(),
            status: c.status.clone(),
            avatar: c.avatar.clone(),
            total_orders: c.total_orders,
            total_spent: c.total_spent,
        }
    }
}

impl From<&NewCustomer> for CustomerPatch {
    fn from(c: &NewCustomer) -> Self {
        Self {
            name: Some(c.name.clone()),
            email: Some(c.email.clone()),
            phone: Some(c.phone.clone()),
            location: Some(c.location.clone()),
            status: Some(c.status.clone()),
            total_orders: Some(c.total_orders),
            total_spent: Some(c.total_spent),
        }
    }
}

/// Customer counts by status, as reported by the backend
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CustomerStats {
    pub total: usize,
    pub active: usize,
    pub vip: usize,
    pub inactive: usize,
    pub new: usize,
}

// ============================================
// Products
// ============================================

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProductStatus {
    Active,
    Inactive,
    OutOfStock,
    #[serde(untagged)]
    Other(String),
}

impl ProductStatus {
    pub fn as_str(&self) -> &str {
        match self {
            ProductStatus::Active => "active",
            ProductStatus::Inactive => "inactive",
            ProductStatus::OutOfStock => "out_of_stock",
            ProductStatus::Other(s) => s,
        }
    }

    pub fn label(&self, locale: Locale) -> String {
        let label = match (self, locale) {
            (ProductStatus::Active, Locale::ZhCn) => "在售",
            (ProductStatus::Inactive, Locale::ZhCn) => "下架",
            (ProductStatus::OutOfStock, Locale::ZhCn) => "缺货",
            (ProductStatus::Active, Locale::En) => "Active",
            (ProductStatus::Inactive, Locale::En) => "Inactive",
            (ProductStatus::OutOfStock, Locale::En) => "Out of stock",
            (ProductStatus::Other(s), _) => s.as_str(),
        };
        label.to_string()
    }
}

impl Default for ProductStatus {
    fn default() -> Self {
        ProductStatus::Active
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: f64,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub stock: i64,
    pub status: ProductStatus,
    #[serde(default)]
    pub image_url: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewProduct {
    pub name: String,
    pub description: String,
    pub price: f64,
    pub category: String,
    pub stock: i64,
    pub status: ProductStatus,
    pub image_url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ProductPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stock: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<ProductStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl From<&Product> for NewProduct {
    fn from(p: &Product) -> Self {
        Self {
            name: p.name.clone(),
            description: p.description.clone(),
            price: p.price,
            category: p.category.clone(),
            stock: p.stock,
            status: p.status.clone(),
            image_url: p.image_url.clone(),
        }
    }
}

impl From<&NewProduct> for ProductPatch {
    fn from(p: &NewProduct) -> Self {
        Self {
            name: Some(p.name.clone()),
            description: Some(p.description.clone()),
            price: Some(p.price),
            category: Some(p.category.clone()),
            stock: Some(p.stock),
            status: Some(p.status.clone()),
            image_url: Some(p.image_url.clone()),
        }
    }
}

// ============================================
// Orders
// ============================================

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Pending,
    Processing,
    Shipped,
    Completed,
    Cancelled,
    #[serde(untagged)]
    Other(String),
}

impl OrderStatus {
    /// Status tabs shown on the orders page, in display order
    pub const ALL: [OrderStatus; 5] = [
        OrderStatus::Pending,
        OrderStatus::Processing,
        OrderStatus::Shipped,
        OrderStatus::Completed,
        OrderStatus::Cancelled,
    ];

    pub fn as_str(&self) -> &str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Processing => "processing",
            OrderStatus::Shipped => "shipped",
            OrderStatus::Completed => "completed",
            OrderStatus::Cancelled => "cancelled",
            OrderStatus::Other(s) => s,
        }
    }

    pub fn parse(s: &str) -> Self {
        match s {
            "pending" => OrderStatus::Pending,
            "processing" => OrderStatus::Processing,
            "shipped" => OrderStatus::Shipped,
            "completed" => OrderStatus::Completed,
            "cancelled" => OrderStatus::Cancelled,
            other => OrderStatus::Other(other.to_string()),
        }
    }

    pub fn label(&self, locale: Locale) -> String {
        let label = match (self, locale) {
            (OrderStatus::Pending, Locale::ZhCn) => "待处理",
            (OrderStatus::Processing, Locale::ZhCn) => "处理中",
            (OrderStatus::Shipped, Locale::ZhCn) => "已发货",
            (OrderStatus::Completed, Locale::ZhCn) => "已完成",
            (OrderStatus::Cancelled, Locale::ZhCn) => "已取消",
            (OrderStatus::Pending, Locale::En) => "Pending",
            (OrderStatus::Processing, Locale::En) => "Processing",
            (OrderStatus::Shipped, Locale::En) => "Shipped",
            (OrderStatus::Completed, Locale::En) => "Completed",
            (OrderStatus::Cancelled, Locale::En) => "Cancelled",
            (OrderStatus::Other(s), _) => s.as_str(),
        };
        label.to_string()
    }
}

impl Default for OrderStatus {
    fn default() -> Self {
        OrderStatus::Pending
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Pending,
    Paid,
    Refunded,
    #[serde(untagged)]
    Other(String),
}

impl PaymentStatus {
    pub fn as_str(&self) -> &str {
        match self {
            PaymentStatus::Pending => "pending",
            PaymentStatus::Paid => "paid",
            PaymentStatus::Refunded => "refunded",
            PaymentStatus::Other(s) => s,
        }
    }

    pub fn label(&self, locale: Locale) -> String {
        let label = match (self, locale) {
            (PaymentStatus::Pending, Locale::ZhCn) => "待支付",
            (PaymentStatus::Paid, Locale::ZhCn) => "已支付",
            (PaymentStatus::Refunded, Locale::ZhCn) => "已退款",
            (PaymentStatus::Pending, Locale::En) => "Unpaid",
            (PaymentStatus::Paid, Locale::En) => "Paid",
            (PaymentStatus::Refunded, Locale::En) => "Refunded",
            (PaymentStatus::Other(s), _) => s.as_str(),
        };
        label.to_string()
    }
}

impl Default for PaymentStatus {
    fn default() -> Self {
        PaymentStatus::Pending
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: String,
    pub order_number: String,
    #[serde(default)]
    pub customer_id: Option<String>,
    #[serde(default)]
    pub customer_name: String,
    #[serde(default)]
    pub customer_email: String,
    pub total_amount: f64,
    #[serde(default)]
    pub items_count: u32,
    pub status: OrderStatus,
    pub payment_status: PaymentStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Insert shape for orders; also the order edit-form state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewOrder {
    pub order_number: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_id: Option<String>,
    pub customer_name: String,
    pub customer_email: String,
    pub total_amount: f64,
    pub items_count: u32,
    pub status: OrderStatus,
    pub payment_status: PaymentStatus,
}

impl Default for NewOrder {
    fn default() -> Self {
        Self {
            order_number: String::new(),
            customer_id: None,
            customer_name: String::new(),
            customer_email: String::new(),
            total_amount: 0.0,
            items_count: 1,
            status: OrderStatus::Pending,
            payment_status: PaymentStatus::Pending,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct OrderPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_amount: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items_count: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<OrderStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_status: Option<PaymentStatus>,
}

impl From<&Order> for NewOrder {
    fn from(o: &Order) -> Self {
        Self {
            order_number: o.order_number.clone(),
            customer_id: o.customer_id.clone(),
            customer_name: o.customer_name.clone(),
            customer_email: o.customer_email.clone(),
            total_amount: o.total_amount,
            items_count: o.items_count,
            status: o.status.clone(),
            payment_status: o.payment_status.clone(),
        }
    }
}

impl From<&NewOrder> for OrderPatch {
    fn from(o: &NewOrder) -> Self {
        Self {
            order_number: Some(o.order_number.clone()),
            customer_name: Some(o.customer_name.clone()),
            customer_email: Some(o.customer_email.clone()),
            total_amount: Some(o.total_amount),
            items_count: Some(o.items_count),
            status: Some(o.status.clone()),
            payment_status: Some(o.payment_status.clone()),
        }
    }
}

// ============================================
// Chat messages
// ============================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: String,
    pub session_id: String,
    pub role: ChatRole,
    pub content: String,
    #[serde(default)]
    pub model: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewChatMessage {
    pub session_id: String,
    pub role: ChatRole,
    pub content: String,
    pub model: String,
}

// ============================================
// Metrics
// ============================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyMetrics {
    pub id: String,
    pub date: NaiveDate,
    pub total_revenue: f64,
    pub total_orders: u32,
    pub active_customers: u32,
    pub conversion_rate: f64,
    pub created_at: DateTime<Utc>,
}

/// Headline numbers for the dashboard KPI cards
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Kpis {
    pub total_revenue: f64,
    pub total_orders: usize,
    pub total_customers: usize,
    pub conversion_rate: f64,
}

// ============================================
// Settings
// ============================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserSettings {
    pub id: String,
    pub user_id: String,
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub language: String,
    #[serde(default)]
    pub timezone: String,
    #[serde(default)]
    pub email_notifications: bool,
    #[serde(default)]
    pub push_notifications: bool,
    #[serde(default)]
    pub sms_notifications: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SettingsPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email_notifications: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub push_notifications: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sms_notifications: Option<bool>,
}

// ============================================
// Auth
// ============================================

/// Authenticated user as returned by the auth service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
}

/// Token grant returned by sign-in
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthTokens {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub expires_at: Option<i64>,
    pub user: AuthUser,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_status_is_preserved() {
        let status: OrderStatus = serde_json::from_str("\"on_hold\"").unwrap();
        assert_eq!(status, OrderStatus::Other("on_hold".to_string()));
        assert_eq!(serde_json::to_string(&status).unwrap(), "\"on_hold\"");
    }

    #[test]
    fn test_known_status_round_trip() {
        let status: ProductStatus = serde_json::from_str("\"out_of_stock\"").unwrap();
        assert_eq!(status, ProductStatus::OutOfStock);
        assert_eq!(status.label(Locale::ZhCn), "缺货");
    }

    #[test]
    fn test_order_row_deserializes() {
        let json = r#"{
            "id": "b3f1",
            "order_number": "ORD-2024001",
            "customer_id": null,
            "customer_name": "张三",
            "customer_email": "zhang@example.com",
            "total_amount": 1299.5,
            "items_count": 2,
            "status": "shipped",
            "payment_status": "paid",
            "created_at": "2024-05-01T08:30:00+00:00",
            "updated_at": "2024-05-02T09:00:00.123456+00:00"
        }"#;

        let order: Order = serde_json::from_str(json).unwrap();
        assert_eq!(order.status, OrderStatus::Shipped);
        assert_eq!(order.payment_status, PaymentStatus::Paid);
        assert_eq!(order.items_count, 2);
    }

    #[test]
    fn test_patch_skips_unset_fields() {
        let patch = OrderPatch {
            status: Some(OrderStatus::Completed),
            ..Default::default()
        };
        let value = serde_json::to_value(&patch).unwrap();
        assert_eq!(value, serde_json::json!({ "status": "completed" }));
    }
}
