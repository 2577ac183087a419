//! CSV Export
//!
//! Builds the order/customer/product CSV files offered by the orders page
//! and the analytics page. Files start with a UTF-8 BOM so spreadsheet
//! applications pick the right encoding, rows end with `\n`, and cells are
//! quoted only when they contain a delimiter, quote or line break.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use thiserror::Error;

use crate::gateway::{Customer, Gateway, GatewayError, Order, Product};
use crate::locale::Locale;

pub const UTF8_BOM: &str = "\u{feff}";

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Encoding error: {0}")]
    Encoding(String),

    #[error("Failed to fetch data: {0}")]
    Gateway(#[from] GatewayError),
}

pub type ExportResult<T> = Result<T, ExportError>;

/// Header row plus string cells, ready to serialize
#[derive(Debug, Clone, PartialEq)]
pub struct CsvTable {
    pub name: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// A serialized CSV file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvFile {
    pub filename: String,
    pub contents: String,
}

impl CsvFile {
    pub const MIME_TYPE: &'static str = "text/csv;charset=utf-8;";

    pub fn write_to(&self, dir: impl AsRef<Path>) -> ExportResult<PathBuf> {
        let path = dir.as_ref().join(&self.filename);
        fs::write(&path, &self.contents)?;
        tracing::info!(path = %path.display(), bytes = self.contents.len(), "CSV written");
        Ok(path)
    }
}

/// `{name}_{YYYY-MM-DD}.csv`
pub fn export_filename(name: &str, date: NaiveDate) -> String {
    format!("{}_{}.csv", name, date.format("%Y-%m-%d"))
}

impl CsvTable {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Serialize with BOM, header row and `\n` line endings
    pub fn to_csv(&self) -> ExportResult<String> {
        let mut writer = csv::WriterBuilder::new()
            .terminator(csv::Terminator::Any(b'\n'))
            .quote_style(csv::QuoteStyle::Necessary)
            .from_writer(Vec::new());

        writer.write_record(&self.headers)?;
        for row in &self.rows {
            writer.write_record(row)?;
        }

        let bytes = writer
            .into_inner()
            .map_err(|e| ExportError::Encoding(e.to_string()))?;
        let body = String::from_utf8(bytes).map_err(|e| ExportError::Encoding(e.to_string()))?;

        // Rows are joined with `\n`, no trailing newline
        let body = body.strip_suffix('\n').unwrap_or(&body);
        Ok(format!("{}{}", UTF8_BOM, body))
    }

    pub fn to_file(&self, date: NaiveDate) -> ExportResult<CsvFile> {
        Ok(CsvFile {
            filename: export_filename(&self.name, date),
            contents: self.to_csv()?,
        })
    }
}

fn headers(names: &[&str]) -> Vec<String> {
    names.iter().map(|h| h.to_string()).collect()
}

// ============================================
// Tables
// ============================================

/// Orders page export: the filtered rows with localized status labels
pub fn orders_page_table(orders: &[Order], locale: Locale) -> CsvTable {
    let names = match locale {
        Locale::ZhCn => ["订单号", "客户", "邮箱", "金额", "商品数", "状态", "支付状态", "创建时间"],
        Locale::En => [
            "Order Number",
            "Customer",
            "Email",
            "Amount",
            "Items",
            "Status",
            "Payment Status",
            "Created At",
        ],
    };

    CsvTable {
        name: "orders".to_string(),
        headers: headers(&names),
        rows: orders
            .iter()
            .map(|o| {
                vec![
                    o.order_number.clone(),
                    o.customer_name.clone(),
                    o.customer_email.clone(),
                    o.total_amount.to_string(),
                    o.items_count.to_string(),
                    o.status.label(locale),
                    o.payment_status.label(locale),
                    o.created_at.to_rfc3339(),
                ]
            })
            .collect(),
    }
}

/// Analytics export of orders (raw status values)
pub fn orders_table(orders: &[Order], locale: Locale) -> CsvTable {
    let (name, names) = match locale {
        Locale::ZhCn => (
            "订单数据",
            ["订单号", "客户", "金额", "商品数", "状态", "支付状态", "创建时间"],
        ),
        Locale::En => (
            "orders_data",
            [
                "Order Number",
                "Customer",
                "Amount",
                "Items",
                "Status",
                "Payment Status",
                "Created At",
            ],
        ),
    };

    CsvTable {
        name: name.to_string(),
        headers: headers(&names),
        rows: orders
            .iter()
            .map(|o| {
                vec![
                    o.order_number.clone(),
                    o.customer_name.clone(),
                    o.total_amount.to_string(),
                    o.items_count.to_string(),
                    o.status.as_str().to_string(),
                    o.payment_status.as_str().to_string(),
                    o.created_at.to_rfc3339(),
                ]
            })
            .collect(),
    }
}

pub fn customers_table(customers: &[Customer], locale: Locale) -> CsvTable {
    let (name, names) = match locale {
        Locale::ZhCn => (
            "客户数据",
            ["姓名", "邮箱", "电话", "地区", "订单数", "消费总额", "状态", "注册时间"],
        ),
        Locale::En => (
            "customers_data",
            [
                "Name",
                "Email",
                "Phone",
                "Location",
                "Orders",
                "Total Spent",
                "Status",
                "Registered At",
            ],
        ),
    };

    CsvTable {
        name: name.to_string(),
        headers: headers(&names),
        rows: customers
            .iter()
            .map(|c| {
                vec![
                    c.name.clone(),
                    c.email.clone(),
                    c.phone.clone(),
                    c.location.clone(),
                    c.total_orders.to_string(),
                    c.total_spent.to_string(),
                    c.status.as_str().to_string(),
                    c.created_at.to_rfc3339(),
                ]
            })
            .collect(),
    }
}

pub fn products_table(products: &[Product], locale: Locale) -> CsvTable {
    let (name, names) = match locale {
        Locale::ZhCn => ("产品数据", ["产品名称", "分类", "价格", "库存", "状态", "创建时间"]),
        Locale::En => (
            "products_data",
            ["Name", "Category", "Price", "Stock", "Status", "Created At"],
        ),
    };

    CsvTable {
        name: name.to_string(),
        headers: headers(&names),
        rows: products
            .iter()
            .map(|p| {
                vec![
                    p.name.clone(),
                    p.category.clone(),
                    p.price.to_string(),
                    p.stock.to_string(),
                    p.status.as_str().to_string(),
                    p.created_at.to_rfc3339(),
                ]
            })
            .collect(),
    }
}

/// Analytics "export all": fetch orders, customers and products
/// concurrently and build one file per non-empty table
pub async fn export_all(gateway: &Gateway, locale: Locale, date: NaiveDate) -> ExportResult<Vec<CsvFile>> {
    let orders = gateway.orders();
    let customers = gateway.customers();
    let products = gateway.products();

    let (orders, customers, products) =
        futures_util::try_join!(orders.list(), customers.list(), products.list())?;

    let tables = [
        orders_table(&orders, locale),
        customers_table(&customers, locale),
        products_table(&products, locale),
    ];

    let mut files = Vec::new();
    for table in tables.iter().filter(|t| !t.is_empty()) {
        files.push(table.to_file(date)?);
    }

    tracing::info!(files = files.len(), "analytics export built");
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::{OrderStatus, PaymentStatus};
    use crate::testing::{customer_json, order_json, MockBackend};
    use chrono::{TimeZone, Utc};
    use serde_json::json;
    use tempfile::TempDir;

    fn order(number: &str, customer: &str) -> Order {
        let at = Utc.with_ymd_and_hms(2024, 5, 1, 8, 30, 0).unwrap();
        Order {
            id: number.to_string(),
            order_number: number.to_string(),
            customer_id: None,
            customer_name: customer.to_string(),
            customer_email: "c@example.com".to_string(),
            total_amount: 1299.5,
            items_count: 2,
            status: OrderStatus::Shipped,
            payment_status: PaymentStatus::Paid,
            created_at: at,
            updated_at: at,
        }
    }

    #[test]
    fn test_export_filename() {
        let date = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        assert_eq!(export_filename("orders", date), "orders_2024-05-01.csv");
    }

    #[test]
    fn test_orders_page_csv() {
        let table = orders_page_table(&[order("ORD-2024001", "张三")], Locale::ZhCn);
        let csv = table.to_csv().unwrap();

        assert!(csv.starts_with(UTF8_BOM));
        let lines: Vec<&str> = csv.trim_start_matches(UTF8_BOM).split('\n').collect();
        assert_eq!(lines[0], "订单号,客户,邮箱,金额,商品数,状态,支付状态,创建时间");
        assert_eq!(
            lines[1],
            "ORD-2024001,张三,c@example.com,1299.5,2,已发货,已支付,2024-05-01T08:30:00+00:00"
        );
        assert_eq!(lines.len(), 2);
    }

    #[test]
    fn test_cells_with_commas_round_trip() {
        let table = orders_page_table(&[order("ORD-1", "Smith, \"Jo\"")], Locale::En);
        let csv = table.to_csv().unwrap();
        assert!(csv.contains("\"Smith, \"\"Jo\"\"\""));

        let mut reader = csv::Reader::from_reader(csv.trim_start_matches(UTF8_BOM).as_bytes());
        let header = reader.headers().unwrap().clone();
        assert_eq!(&header[0], "Order Number");

        let records: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(records.len(), 1);
        assert_eq!(&records[0][1], "Smith, \"Jo\"");
        assert_eq!(&records[0][5], "Shipped");
    }

    #[test]
    fn test_write_csv_file() {
        let dir = TempDir::new().unwrap();
        let date = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        let file = orders_table(&[order("ORD-1", "A")], Locale::ZhCn)
            .to_file(date)
            .unwrap();
        assert_eq!(file.filename, "订单数据_2024-05-01.csv");

        let path = file.write_to(dir.path()).unwrap();
        let written = fs::read_to_string(path).unwrap();
        assert!(written.contains("shipped,paid"));
    }

    #[tokio::test]
    async fn test_export_all_skips_empty_tables() {
        let backend = MockBackend::start().await;
        backend.respond(
            "GET",
            "/rest/v1/orders",
            200,
            json!([order_json("1", "ORD-2024001", "pending")]),
        );
        backend.respond(
            "GET",
            "/rest/v1/customers",
            200,
            json!([customer_json("c1", "李四", "vip")]),
        );
        backend.respond("GET", "/rest/v1/products", 200, json!([]));

        let date = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        let files = export_all(&backend.gateway(), Locale::ZhCn, date).await.unwrap();

        let names: Vec<&str> = files.iter().map(|f| f.filename.as_str()).collect();
        assert_eq!(names, vec!["订单数据_2024-05-01.csv", "客户数据_2024-05-01.csv"]);
    }

    #[tokio::test]
    async fn test_export_all_fails_on_backend_error() {
        let backend = MockBackend::start().await;
        backend.respond("GET", "/rest/v1/orders", 200, json!([]));
        backend.respond("GET", "/rest/v1/customers", 500, json!({ "message": "boom" }));
        backend.respond("GET", "/rest/v1/products", 200, json!([]));

        let date = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        let result = export_all(&backend.gateway(), Locale::ZhCn, date).await;
        assert!(matches!(result, Err(ExportError::Gateway(_))));
    }
}
