//! Remote Data Gateway
//!
//! Typed functions over the hosted table-store, one per (entity, operation).
//!
//! ## Architecture
//!
//! - **TableClient**: REST client (apikey + bearer auth, PostgREST params)
//! - **Tables**: customers, products, orders, chat messages, daily metrics
//!   and user settings
//! - **Auth**: sign in/up/out and current-user lookup
//!
//! Each operation performs one network call and either returns the typed
//! result or a [`GatewayError`]. Updates stamp `updated_at` on the client.

mod auth;
mod client;
mod error;
mod tables;
pub mod types;

pub use auth::{AuthApi, SignUpOutcome};
pub use client::{GatewayConfig, TableClient, TableQuery, NO_ROWS_CODE};
pub use error::{GatewayError, GatewayResult};
pub use tables::{ChatTable, CustomersTable, MetricsTable, OrdersTable, ProductsTable, SettingsTable};
pub use types::*;

use serde::de::DeserializeOwned;
use serde::Serialize;

/// Entry point for all backend calls
#[derive(Debug, Clone)]
pub struct Gateway {
    client: TableClient,
}

impl Gateway {
    /// Create an anonymous gateway
    pub fn new(config: GatewayConfig) -> GatewayResult<Self> {
        Ok(Self {
            client: TableClient::new(config)?,
        })
    }

    /// Gateway that authorizes as a signed-in user
    pub fn authorized(&self, access_token: Option<String>) -> Self {
        Self {
            client: self.client.with_access_token(access_token),
        }
    }

    pub fn client(&self) -> &TableClient {
        &self.client
    }

    pub fn customers(&self) -> CustomersTable<'_> {
        CustomersTable::new(&self.client)
    }

    pub fn products(&self) -> ProductsTable<'_> {
        ProductsTable::new(&self.client)
    }

    pub fn orders(&self) -> OrdersTable<'_> {
        OrdersTable::new(&self.client)
    }

    pub fn chat(&self) -> ChatTable<'_> {
        ChatTable::new(&self.client)
    }

    pub fn metrics(&self) -> MetricsTable<'_> {
        MetricsTable::new(&self.client)
    }

    pub fn settings(&self) -> SettingsTable<'_> {
        SettingsTable::new(&self.client)
    }

    pub fn auth(&self) -> AuthApi<'_> {
        AuthApi::new(&self.client)
    }

    /// Invoke an edge function
    pub async fn invoke<B, T>(&self, function: &str, body: &B) -> GatewayResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.client.invoke(function, body).await
    }
}
