//! Customers page

use super::{contains_ignore_case, StatusTab, ViewState};
use crate::gateway::{Customer, CustomerStatus, Gateway};
use crate::locale::{Locale, Message};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CustomerFilter {
    pub search: String,
    pub tab: StatusTab<CustomerStatus>,
}

impl CustomerFilter {
    /// Search matches the name or the email
    pub fn matches(&self, customer: &Customer) -> bool {
        let matches_search = contains_ignore_case(&customer.name, &self.search)
            || contains_ignore_case(&customer.email, &self.search);
        matches_search && self.tab.matches(&customer.status)
    }

    pub fn apply<'a>(&self, customers: &'a [Customer]) -> Vec<&'a Customer> {
        customers.iter().filter(|c| self.matches(c)).collect()
    }
}

/// Header cards of the customers page
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CustomerSummary {
    pub total: usize,
    /// VIP customers count as active
    pub active: usize,
    pub vip: usize,
    pub total_spent: f64,
}

impl CustomerSummary {
    pub fn from_customers(customers: &[Customer]) -> Self {
        Self {
            total: customers.len(),
            active: customers
                .iter()
                .filter(|c| matches!(c.status, CustomerStatus::Active | CustomerStatus::Vip))
                .count(),
            vip: customers
                .iter()
                .filter(|c| c.status == CustomerStatus::Vip)
                .count(),
            total_spent: customers.iter().map(|c| c.total_spent).sum(),
        }
    }

    /// Total spend in units of ten thousand (e.g. `¥12.3万`)
    pub fn total_spent_label(&self, locale: Locale) -> String {
        match locale {
            Locale::ZhCn => format!("¥{:.1}万", self.total_spent / 10_000.0),
            Locale::En => format!("¥{:.1}K", self.total_spent / 1_000.0),
        }
    }
}

pub async fn load_customers(gateway: &Gateway, locale: Locale) -> ViewState<Customer> {
    ViewState::from_result(gateway.customers().list().await, locale, Message::NoCustomers)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::customer_json;

    fn customers() -> Vec<Customer> {
        [
            ("a", "张三", "active"),
            ("b", "李四", "vip"),
            ("c", "王五", "inactive"),
            ("d", "Zhao Liu", "new"),
        ]
        .iter()
        .map(|(id, name, status)| serde_json::from_value(customer_json(id, name, status)).unwrap())
        .collect()
    }

    #[test]
    fn test_summary_counts_vip_as_active() {
        let summary = CustomerSummary::from_customers(&customers());
        assert_eq!(summary.total, 4);
        assert_eq!(summary.active, 2);
        assert_eq!(summary.vip, 1);
        assert_eq!(summary.total_spent, 4800.0);
        assert_eq!(summary.total_spent_label(Locale::ZhCn), "¥0.5万");
    }

    #[test]
    fn test_filter_by_email_and_tab() {
        let customers = customers();
        let filter = CustomerFilter {
            search: "B@EXAMPLE".to_string(),
            ..Default::default()
        };
        assert_eq!(filter.apply(&customers).len(), 1);

        let filter = CustomerFilter {
            search: String::new(),
            tab: StatusTab::Only(CustomerStatus::Inactive),
        };
        let found = filter.apply(&customers);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "王五");
    }
}
