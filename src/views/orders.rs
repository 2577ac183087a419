//! Orders page

use chrono::{Datelike, Utc};

use super::{contains_ignore_case, StatusTab, ViewState};
use crate::gateway::{Gateway, Order, OrderStatus};
use crate::locale::{Locale, Message};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrderFilter {
    pub search: String,
    pub tab: StatusTab<OrderStatus>,
}

impl OrderFilter {
    /// Search matches the order number or the customer name
    pub fn matches(&self, order: &Order) -> bool {
        let matches_search = contains_ignore_case(&order.order_number, &self.search)
            || contains_ignore_case(&order.customer_name, &self.search);
        matches_search && self.tab.matches(&order.status)
    }

    pub fn apply<'a>(&self, orders: &'a [Order]) -> Vec<&'a Order> {
        orders.iter().filter(|o| self.matches(o)).collect()
    }

    /// Set the tab from its id (`all` or a status value)
    pub fn set_tab(&mut self, id: &str) {
        self.tab = match id {
            "all" => StatusTab::All,
            status => StatusTab::Only(OrderStatus::parse(status)),
        };
    }
}

pub async fn load_orders(gateway: &Gateway, locale: Locale) -> ViewState<Order> {
    ViewState::from_result(gateway.orders().list().await, locale, Message::NoOrders)
}

/// `ORD-{year}{000..999}`. `entropy` picks the suffix.
pub fn generate_order_number(year: i32, entropy: u128) -> String {
    format!("ORD-{}{:03}", year, entropy % 1000)
}

/// Order number for a new order placed now
pub fn next_order_number() -> String {
    generate_order_number(Utc::now().year(), uuid::Uuid::new_v4().as_u128())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{order_json, MockBackend};
    use serde_json::json;

    fn orders() -> Vec<Order> {
        vec![
            serde_json::from_value(order_json("1", "ORD-2024001", "pending")).unwrap(),
            serde_json::from_value(order_json("2", "ORD-2024002", "shipped")).unwrap(),
            {
                let mut o: Order =
                    serde_json::from_value(order_json("3", "ORD-2024003", "shipped")).unwrap();
                o.customer_name = "Alice Wong".to_string();
                o
            },
        ]
    }

    #[test]
    fn test_search_by_number_or_customer() {
        let orders = orders();
        let mut filter = OrderFilter {
            search: "ord-2024002".to_string(),
            ..Default::default()
        };
        assert_eq!(filter.apply(&orders).len(), 1);

        filter.search = "alice".to_string();
        let found = filter.apply(&orders);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, "3");
    }

    #[test]
    fn test_status_tab() {
        let orders = orders();
        let mut filter = OrderFilter::default();
        assert_eq!(filter.apply(&orders).len(), 3);

        filter.set_tab("shipped");
        assert_eq!(filter.apply(&orders).len(), 2);

        filter.set_tab("all");
        assert_eq!(filter.tab, StatusTab::All);
    }

    #[test]
    fn test_order_number_format() {
        assert_eq!(generate_order_number(2024, 7), "ORD-2024007");
        assert_eq!(generate_order_number(2025, 123_999), "ORD-2025999");

        let generated = next_order_number();
        assert!(generated.starts_with("ORD-"));
        assert_eq!(generated.len(), "ORD-2024001".len());
    }

    #[tokio::test]
    async fn test_zero_orders_is_empty_state() {
        let backend = MockBackend::start().await;
        backend.respond("GET", "/rest/v1/orders", 200, json!([]));

        let state = load_orders(&backend.gateway(), Locale::ZhCn).await;
        assert_eq!(state, ViewState::Empty("暂无订单".to_string()));
    }

    #[tokio::test]
    async fn test_orders_ready() {
        let backend = MockBackend::start().await;
        backend.respond(
            "GET",
            "/rest/v1/orders",
            200,
            json!([order_json("1", "ORD-2024001", "pending")]),
        );

        let state = load_orders(&backend.gateway(), Locale::ZhCn).await;
        assert_eq!(state.rows().len(), 1);
    }
}
