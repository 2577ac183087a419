//! Dashboard page
//!
//! KPI cards, the most recent orders and the daily metrics series.

use crate::gateway::{DailyMetrics, Gateway, GatewayResult, Kpis, Order};
use crate::locale::Locale;

/// Number of orders in the "recent orders" table
pub const RECENT_ORDERS: usize = 5;

/// Days of metrics in the sales chart
pub const CHART_DAYS: usize = 7;

#[derive(Debug, Clone, PartialEq)]
pub struct DashboardData {
    pub kpis: Kpis,
    pub recent_orders: Vec<Order>,
    pub daily: Vec<DailyMetrics>,
}

/// Fetch KPIs, recent orders and the daily series concurrently
pub async fn load_dashboard(gateway: &Gateway) -> GatewayResult<DashboardData> {
    let metrics = gateway.metrics();
    let orders = gateway.orders();

    let (kpis, recent_orders, daily) = futures_util::try_join!(
        metrics.kpis(),
        orders.recent(RECENT_ORDERS),
        metrics.daily(CHART_DAYS)
    )?;

    Ok(DashboardData {
        kpis,
        recent_orders,
        daily,
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KpiFormat {
    Number,
    Currency,
    Percent,
    Compact,
}

#[derive(Debug, Clone, PartialEq)]
pub struct KpiCard {
    pub id: &'static str,
    pub title: &'static str,
    pub value: f64,
    pub format: KpiFormat,
}

impl KpiCard {
    pub fn formatted(&self) -> String {
        format_kpi(self.value, self.format)
    }
}

/// The four dashboard cards, in display order
pub fn kpi_cards(kpis: &Kpis, locale: Locale) -> Vec<KpiCard> {
    let titles = match locale {
        Locale::ZhCn => ["总销售额", "订单数量", "活跃客户", "转化率"],
        Locale::En => ["Revenue", "Orders", "Customers", "Conversion"],
    };

    vec![
        KpiCard {
            id: "revenue",
            title: titles[0],
            value: kpis.total_revenue,
            format: KpiFormat::Currency,
        },
        KpiCard {
            id: "orders",
            title: titles[1],
            value: kpis.total_orders as f64,
            format: KpiFormat::Number,
        },
        KpiCard {
            id: "customers",
            title: titles[2],
            value: kpis.total_customers as f64,
            format: KpiFormat::Compact,
        },
        KpiCard {
            id: "conversion",
            title: titles[3],
            value: kpis.conversion_rate,
            format: KpiFormat::Percent,
        },
    ]
}

pub fn format_kpi(value: f64, format: KpiFormat) -> String {
    match format {
        KpiFormat::Currency => format!("¥{}", group_thousands(value.round() as i64)),
        KpiFormat::Percent => format!("{:.1}%", value),
        KpiFormat::Compact => {
            if value >= 1_000_000.0 {
                format!("{:.1}M", value / 1_000_000.0)
            } else if value >= 1_000.0 {
                format!("{:.1}K", value / 1_000.0)
            } else {
                format!("{}", value.round() as i64)
            }
        }
        KpiFormat::Number => group_thousands(value.round() as i64),
    }
}

/// `1234567` -> `1,234,567`
pub fn group_thousands(n: i64) -> String {
    let digits = n.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if n < 0 {
        out.push('-');
    }
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{order_json, MockBackend};
    use serde_json::json;

    #[test]
    fn test_format_kpi() {
        assert_eq!(format_kpi(2_847_392.4, KpiFormat::Currency), "¥2,847,392");
        assert_eq!(format_kpi(1847.0, KpiFormat::Number), "1,847");
        assert_eq!(format_kpi(3.24, KpiFormat::Percent), "3.2%");
        assert_eq!(format_kpi(45_200.0, KpiFormat::Compact), "45.2K");
        assert_eq!(format_kpi(2_500_000.0, KpiFormat::Compact), "2.5M");
        assert_eq!(format_kpi(324.0, KpiFormat::Compact), "324");
    }

    #[test]
    fn test_group_thousands() {
        assert_eq!(group_thousands(0), "0");
        assert_eq!(group_thousands(999), "999");
        assert_eq!(group_thousands(1000), "1,000");
        assert_eq!(group_thousands(-1234567), "-1,234,567");
    }

    #[test]
    fn test_kpi_cards_order() {
        let kpis = Kpis {
            total_revenue: 100.0,
            total_orders: 2,
            total_customers: 1,
            conversion_rate: 3.24,
        };
        let cards = kpi_cards(&kpis, Locale::ZhCn);
        let ids: Vec<&str> = cards.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec!["revenue", "orders", "customers", "conversion"]);
        assert_eq!(cards[3].formatted(), "3.2%");
    }

    #[tokio::test]
    async fn test_load_dashboard() {
        let backend = MockBackend::start().await;
        backend.respond(
            "GET",
            "/rest/v1/daily_metrics",
            200,
            json!([{
                "id": "m1",
                "date": "2024-05-01",
                "total_revenue": 1000.0,
                "total_orders": 4,
                "active_customers": 3,
                "conversion_rate": 2.5,
                "created_at": "2024-05-01T00:00:00+00:00"
            }]),
        );
        backend.respond(
            "GET",
            "/rest/v1/orders",
            200,
            json!([order_json("1", "ORD-2024001", "pending")]),
        );
        backend.respond("GET", "/rest/v1/customers", 200, json!([]));

        let data = load_dashboard(&backend.gateway()).await.unwrap();
        assert_eq!(data.recent_orders.len(), 1);
        assert_eq!(data.daily.len(), 1);
        assert_eq!(data.kpis.total_customers, 0);
    }
}
