//! Page Views
//!
//! Client-side state for the dashboard pages: fetched rows wrapped in a
//! [`ViewState`], search/tab filters applied to them in memory, and the
//! formatting of headline numbers.

pub mod customers;
pub mod dashboard;
pub mod orders;
pub mod products;
pub mod settings;

pub use customers::{load_customers, CustomerFilter, CustomerSummary};
pub use dashboard::{kpi_cards, load_dashboard, DashboardData, KpiCard, KpiFormat, RECENT_ORDERS};
pub use orders::{generate_order_number, load_orders, next_order_number, OrderFilter};
pub use products::{categories, load_products, ProductFilter, ALL_CATEGORIES};
pub use settings::{load_settings, save_settings, SettingsForm};

use crate::gateway::GatewayResult;
use crate::locale::{Locale, Message};

/// Load state of a list page
#[derive(Debug, Clone, PartialEq)]
pub enum ViewState<T> {
    Loading,
    /// The fetch succeeded with zero rows
    Empty(String),
    Ready(Vec<T>),
    Failed(String),
}

impl<T> Default for ViewState<T> {
    fn default() -> Self {
        ViewState::Loading
    }
}

impl<T> ViewState<T> {
    /// Classify a fetch result. Zero rows is `Empty`, never `Failed`.
    pub fn from_result(result: GatewayResult<Vec<T>>, locale: Locale, empty: Message) -> Self {
        match result {
            Ok(rows) if rows.is_empty() => ViewState::Empty(locale.text(&empty)),
            Ok(rows) => ViewState::Ready(rows),
            Err(e) => {
                tracing::error!(error = %e, "failed to load view");
                ViewState::Failed(locale.text(&Message::LoadFailed))
            }
        }
    }

    pub fn rows(&self) -> &[T] {
        match self {
            ViewState::Ready(rows) => rows,
            _ => &[],
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, ViewState::Loading)
    }

    /// Message to show instead of rows, if any
    pub fn message(&self) -> Option<&str> {
        match self {
            ViewState::Empty(message) | ViewState::Failed(message) => Some(message),
            _ => None,
        }
    }

    /// Drop one row (after a successful delete); the last row turns the
    /// view into `Empty`
    pub fn remove_where<F>(&mut self, locale: Locale, empty: Message, predicate: F)
    where
        F: Fn(&T) -> bool,
    {
        if let ViewState::Ready(rows) = self {
            rows.retain(|row| !predicate(row));
            if rows.is_empty() {
                *self = ViewState::Empty(locale.text(&empty));
            }
        }
    }
}

/// Status tab of a list page: everything, or one status
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum StatusTab<S> {
    #[default]
    All,
    Only(S),
}

impl<S: PartialEq> StatusTab<S> {
    pub fn matches(&self, status: &S) -> bool {
        match self {
            StatusTab::All => true,
            StatusTab::Only(s) => s == status,
        }
    }
}

/// Case-insensitive substring match; an empty query matches everything
pub(crate) fn contains_ignore_case(haystack: &str, query: &str) -> bool {
    query.is_empty() || haystack.to_lowercase().contains(&query.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::GatewayError;

    #[test]
    fn test_zero_rows_is_empty_not_failed() {
        let state: ViewState<u32> = ViewState::from_result(Ok(vec![]), Locale::ZhCn, Message::NoOrders);
        assert_eq!(state, ViewState::Empty("暂无订单".to_string()));
    }

    #[test]
    fn test_error_is_failed() {
        let state: ViewState<u32> =
            ViewState::from_result(Err(GatewayError::Unavailable), Locale::En, Message::NoOrders);
        assert!(matches!(state, ViewState::Failed(_)));
        assert!(state.rows().is_empty());
    }

    #[test]
    fn test_remove_last_row_becomes_empty() {
        let mut state = ViewState::Ready(vec![1, 2]);
        state.remove_where(Locale::En, Message::NoOrders, |n| *n == 1);
        assert_eq!(state.rows(), &[2]);
        state.remove_where(Locale::En, Message::NoOrders, |n| *n == 2);
        assert_eq!(state.message(), Some("No orders yet"));
    }

    #[test]
    fn test_contains_ignore_case() {
        assert!(contains_ignore_case("ORD-2024001", "ord-2024"));
        assert!(contains_ignore_case("anything", ""));
        assert!(!contains_ignore_case("张三", "李"));
    }
}
