//! # Shopdesk
//!
//! Core of an e-commerce admin dashboard: orders, products and customers
//! kept in a hosted table store, an analytics view with CSV export, and a
//! chat assistant that can write Markdown documents into a canvas editor.
//!
//! ## Features
//!
//! - **Gateway**: typed REST client for the table store, auth service and
//!   the `ai-chat` function
//! - **Views**: load states, filters and KPI formatting for every page
//! - **Drafts**: create/edit buffers with validation before any request
//! - **Canvas**: Markdown editor model with undo/redo and a preview renderer
//! - **Router**: path ↔ route mapping with an auth guard
//! - **Session**: explicit auth context with pluggable token storage
//!
//! ## Modules
//!
//! - [`gateway`]: table-store, auth and function calls
//! - [`views`]: per-page state
//! - [`canvas`]: document editing and Markdown rendering
//! - [`assistant`]: model catalog and conversation
//! - [`export`]: CSV export
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use shopdesk::{Config, Gateway, MemoryTokenStore, Session};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load_default();
//!     let gateway = Gateway::new(config.gateway_config()?)?;
//!
//!     let mut session = Session::new(gateway, MemoryTokenStore::new());
//!     session.sign_in("admin@example.com", "secret").await?;
//!
//!     let orders = session.gateway().orders().recent(5).await?;
//!     println!("{} recent orders", orders.len());
//!
//!     println!("{}", shopdesk::canvas::render("# Weekly report"));
//!     Ok(())
//! }
//! ```

pub mod assistant;
pub mod canvas;
pub mod config;
pub mod draft;
pub mod export;
pub mod gateway;
pub mod locale;
pub mod router;
pub mod session;
pub mod views;

#[cfg(test)]
mod testing;

// Re-export top-level types for convenience
pub use gateway::{
    Customer, CustomerStatus, Gateway, GatewayConfig, GatewayError, GatewayResult, Kpis,
    NewCustomer, NewOrder, NewProduct, Order, OrderStatus, PaymentStatus, Product,
};

pub use assistant::{Assistant, AssistantReply, Conversation, Model};

pub use canvas::{CanvasCommand, CanvasDocument, EditHistory, EditorMode};

pub use config::{generate_default_config, Config, ConfigError, LoggingConfig};

pub use draft::{Draft, DraftError, DraftStore, Validate, ValidationError};

pub use export::{export_all, CsvFile, CsvTable, ExportError, ExportResult};

pub use locale::{Locale, Message};

pub use router::{AuthContext, MemoryHistory, RouteId, Router};

pub use session::{
    AuthState, FileTokenStore, MemoryTokenStore, Session, SessionError, SessionResult, TokenStore,
};

pub use views::{DashboardData, KpiCard, SettingsForm, ViewState};
