//! Table-store REST Client
//!
//! HTTP client for the hosted table-store: PostgREST-style table endpoints
//! under `/rest/v1`, the auth service under `/auth/v1` and edge functions
//! under `/functions/v1`.
//!
//! Every call issues exactly one request. There is no retry, caching or
//! batching at this layer.

use reqwest::{header, Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::error::{GatewayError, GatewayResult};

/// Media type asking PostgREST for a single JSON object instead of an array
const SINGLE_OBJECT: &str = "application/vnd.pgrst.object+json";

/// PostgREST code for "zero (or many) rows where one was expected"
pub const NO_ROWS_CODE: &str = "PGRST116";

/// Connection settings for the hosted backend
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Project base URL (e.g., "https://project.example.co")
    pub base_url: String,
    /// Public anonymous key, sent as `apikey` on every request
    pub anon_key: String,
    /// Request timeout in milliseconds (ignored on wasm32)
    pub request_timeout_ms: u64,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:54321".to_string(),
            anon_key: String::new(),
            request_timeout_ms: 30_000,
        }
    }
}

/// Query against one table: column selection, equality filters, ordering
/// and an optional row limit
#[derive(Debug, Clone, PartialEq)]
pub struct TableQuery {
    table: String,
    select: String,
    filters: Vec<(String, String)>,
    order: Option<(String, bool)>,
    limit: Option<usize>,
}

impl TableQuery {
    /// Select all columns of a table
    pub fn table(name: &str) -> Self {
        Self {
            table: name.to_string(),
            select: "*".to_string(),
            filters: Vec::new(),
            order: None,
            limit: None,
        }
    }

    /// Restrict the selected columns (PostgREST `select=` syntax)
    pub fn columns(mut self, columns: &str) -> Self {
        self.select = columns.to_string();
        self
    }

    /// Add an equality filter
    pub fn eq(mut self, column: &str, value: impl std::fmt::Display) -> Self {
        self.filters
            .push((column.to_string(), format!("eq.{}", value)));
        self
    }

    pub fn order_by(mut self, column: &str, ascending: bool) -> Self {
        self.order = Some((column.to_string(), ascending));
        self
    }

    /// Default list ordering: creation time, descending
    pub fn newest_first(self) -> Self {
        self.order_by("created_at", false)
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn table_name(&self) -> &str {
        &self.table
    }

    /// Query-string pairs for a read
    pub fn params(&self) -> Vec<(String, String)> {
        let mut params = vec![("select".to_string(), self.select.clone())];
        params.extend(self.filters.iter().cloned());

        if let Some((column, ascending)) = &self.order {
            let direction = if *ascending { "asc" } else { "desc" };
            params.push(("order".to_string(), format!("{}.{}", column, direction)));
        }
        if let Some(limit) = self.limit {
            params.push(("limit".to_string(), limit.to_string()));
        }

        params
    }

    /// Query-string pairs for a write: filters only, plus the selection of
    /// returned rows
    fn write_params(&self) -> Vec<(String, String)> {
        let mut params = vec![("select".to_string(), self.select.clone())];
        params.extend(self.filters.iter().cloned());
        params
    }
}

/// Low-level REST client shared by every gateway operation
#[derive(Debug, Clone)]
pub struct TableClient {
    http: Client,
    config: GatewayConfig,
    access_token: Option<String>,
}

impl TableClient {
    /// Create a new client with the given configuration
    pub fn new(mut config: GatewayConfig) -> GatewayResult<Self> {
        config.base_url = config.base_url.trim_end_matches('/').to_string();
        if config.base_url.is_empty() {
            return Err(GatewayError::Config("backend URL is empty".to_string()));
        }

        let builder = Client::builder();
        #[cfg(not(target_arch = "wasm32"))]
        let builder =
            builder.timeout(std::time::Duration::from_millis(config.request_timeout_ms));
        let http = builder
            .build()
            .map_err(|e| GatewayError::Config(e.to_string()))?;

        Ok(Self {
            http,
            config,
            access_token: None,
        })
    }

    /// Copy of this client that authorizes as the given user session.
    /// `None` falls back to the anonymous key.
    pub fn with_access_token(&self, token: Option<String>) -> Self {
        Self {
            http: self.http.clone(),
            config: self.config.clone(),
            access_token: token,
        }
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    pub fn access_token(&self) -> Option<&str> {
        self.access_token.as_deref()
    }

    fn bearer(&self) -> &str {
        self.access_token
            .as_deref()
            .unwrap_or(self.config.anon_key.as_str())
    }

    fn request(&self, method: Method, url: &str) -> RequestBuilder {
        self.http
            .request(method, url)
            .header("apikey", &self.config.anon_key)
            .bearer_auth(self.bearer())
    }

    fn rest_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.config.base_url, table)
    }

    // ============================================
    // Table operations
    // ============================================

    /// Read rows matching the query
    pub async fn select<T: DeserializeOwned>(&self, query: &TableQuery) -> GatewayResult<Vec<T>> {
        let response = self
            .request(Method::GET, &self.rest_url(query.table_name()))
            .query(&query.params())
            .send()
            .await
            .map_err(GatewayError::from_transport)?;

        tracing::debug!(table = %query.table_name(), status = %response.status(), "select");
        read_json(response).await
    }

    /// Read exactly one row; zero rows yields `Ok(None)`
    pub async fn select_one<T: DeserializeOwned>(
        &self,
        query: &TableQuery,
    ) -> GatewayResult<Option<T>> {
        let response = self
            .request(Method::GET, &self.rest_url(query.table_name()))
            .header(header::ACCEPT, SINGLE_OBJECT)
            .query(&query.params())
            .send()
            .await
            .map_err(GatewayError::from_transport)?;

        tracing::debug!(table = %query.table_name(), status = %response.status(), "select one");
        match read_json(response).await {
            Ok(row) => Ok(Some(row)),
            Err(err) if err.code() == Some(NO_ROWS_CODE) => Ok(None),
            Err(err) => Err(err),
        }
    }

    /// Insert one row and return it as stored
    pub async fn insert<B, T>(&self, table: &str, body: &B) -> GatewayResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self
            .request(Method::POST, &self.rest_url(table))
            .header(header::ACCEPT, SINGLE_OBJECT)
            .header("Prefer", "return=representation")
            .query(&[("select", "*")])
            .json(body)
            .send()
            .await
            .map_err(GatewayError::from_transport)?;

        tracing::debug!(table = %table, status = %response.status(), "insert");
        read_json(response).await
    }

    /// Update the single row matched by the query and return it
    pub async fn update<B, T>(&self, query: &TableQuery, body: &B) -> GatewayResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self
            .request(Method::PATCH, &self.rest_url(query.table_name()))
            .header(header::ACCEPT, SINGLE_OBJECT)
            .header("Prefer", "return=representation")
            .query(&query.write_params())
            .json(body)
            .send()
            .await
            .map_err(GatewayError::from_transport)?;

        tracing::debug!(table = %query.table_name(), status = %response.status(), "update");
        read_json(response).await
    }

    /// Insert or merge on the given conflict column and return the row
    pub async fn upsert<B, T>(&self, table: &str, on_conflict: &str, body: &B) -> GatewayResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self
            .request(Method::POST, &self.rest_url(table))
            .header(header::ACCEPT, SINGLE_OBJECT)
            .header("Prefer", "resolution=merge-duplicates,return=representation")
            .query(&[("on_conflict", on_conflict), ("select", "*")])
            .json(body)
            .send()
            .await
            .map_err(GatewayError::from_transport)?;

        tracing::debug!(table = %table, status = %response.status(), "upsert");
        read_json(response).await
    }

    /// Delete rows matched by the query
    pub async fn delete(&self, query: &TableQuery) -> GatewayResult<()> {
        let response = self
            .request(Method::DELETE, &self.rest_url(query.table_name()))
            .query(&query.filters)
            .send()
            .await
            .map_err(GatewayError::from_transport)?;

        tracing::debug!(table = %query.table_name(), status = %response.status(), "delete");
        if response.status().is_success() {
            Ok(())
        } else {
            Err(api_error(response).await)
        }
    }

    // ============================================
    // Functions and auth
    // ============================================

    /// Invoke an edge function with a JSON body
    pub async fn invoke<B, T>(&self, function: &str, body: &B) -> GatewayResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = format!("{}/functions/v1/{}", self.config.base_url, function);
        let response = self
            .request(Method::POST, &url)
            .json(body)
            .send()
            .await
            .map_err(GatewayError::from_transport)?;

        tracing::debug!(function = %function, status = %response.status(), "invoke");
        read_json(response).await
    }

    /// POST to the auth service
    pub async fn auth_post<B, T>(
        &self,
        path: &str,
        query: &[(&str, &str)],
        body: &B,
    ) -> GatewayResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = format!("{}/auth/v1/{}", self.config.base_url, path);
        let response = self
            .request(Method::POST, &url)
            .query(query)
            .json(body)
            .send()
            .await
            .map_err(GatewayError::from_transport)?;

        tracing::debug!(path = %path, status = %response.status(), "auth");
        read_json(response).await
    }

    /// POST to the auth service, ignoring any response body
    pub async fn auth_post_empty(&self, path: &str) -> GatewayResult<()> {
        let url = format!("{}/auth/v1/{}", self.config.base_url, path);
        let response = self
            .request(Method::POST, &url)
            .send()
            .await
            .map_err(GatewayError::from_transport)?;

        tracing::debug!(path = %path, status = %response.status(), "auth");
        if response.status().is_success() {
            Ok(())
        } else {
            Err(api_error(response).await)
        }
    }

    /// GET from the auth service
    pub async fn auth_get<T: DeserializeOwned>(&self, path: &str) -> GatewayResult<T> {
        let url = format!("{}/auth/v1/{}", self.config.base_url, path);
        let response = self
            .request(Method::GET, &url)
            .send()
            .await
            .map_err(GatewayError::from_transport)?;

        tracing::debug!(path = %path, status = %response.status(), "auth");
        read_json(response).await
    }
}

// ============================================
// Response handling
// ============================================

/// Error body shapes of PostgREST (`code`/`message`) and the auth
/// service (`error`/`error_description`/`msg`)
#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    code: Option<serde_json::Value>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    msg: Option<String>,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    error_description: Option<String>,
}

async fn read_json<T: DeserializeOwned>(response: Response) -> GatewayResult<T> {
    if !response.status().is_success() {
        return Err(api_error(response).await);
    }

    let bytes = response
        .bytes()
        .await
        .map_err(GatewayError::from_transport)?;
    Ok(serde_json::from_slice(&bytes)?)
}

async fn api_error(response: Response) -> GatewayError {
    let status = response.status().as_u16();
    let text = response.text().await.unwrap_or_default();

    if status == 401 {
        tracing::warn!(body = %text, "backend rejected credentials");
        return GatewayError::Unauthorized;
    }

    let body: ErrorBody = serde_json::from_str(&text).unwrap_or_default();
    let code = body.code.map(|value| match value {
        serde_json::Value::String(s) => s,
        other => other.to_string(),
    });
    let message = body
        .message
        .or(body.error_description)
        .or(body.msg)
        .or(body.error)
        .unwrap_or(text);

    GatewayError::Api {
        status,
        code,
        message,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = GatewayConfig::default();
        assert_eq!(config.base_url, "http://localhost:54321");
        assert_eq!(config.request_timeout_ms, 30_000);
    }

    #[test]
    fn test_trailing_slash_is_trimmed() {
        let client = TableClient::new(GatewayConfig {
            base_url: "https://demo.example.co/".to_string(),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(client.rest_url("orders"), "https://demo.example.co/rest/v1/orders");
    }

    #[test]
    fn test_empty_url_rejected() {
        let result = TableClient::new(GatewayConfig {
            base_url: "/".to_string(),
            ..Default::default()
        });
        assert!(matches!(result, Err(GatewayError::Config(_))));
    }

    #[test]
    fn test_query_params() {
        let query = TableQuery::table("orders")
            .eq("status", "pending")
            .newest_first()
            .limit(5);

        assert_eq!(
            query.params(),
            vec![
                ("select".to_string(), "*".to_string()),
                ("status".to_string(), "eq.pending".to_string()),
                ("order".to_string(), "created_at.desc".to_string()),
                ("limit".to_string(), "5".to_string()),
            ]
        );
    }

    #[test]
    fn test_write_params_skip_order_and_limit() {
        let query = TableQuery::table("orders").eq("id", "42").newest_first().limit(1);
        assert_eq!(
            query.write_params(),
            vec![
                ("select".to_string(), "*".to_string()),
                ("id".to_string(), "eq.42".to_string()),
            ]
        );
    }

    #[test]
    fn test_access_token_overrides_anon_key() {
        let client = TableClient::new(GatewayConfig {
            anon_key: "anon".to_string(),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(client.bearer(), "anon");

        let user = client.with_access_token(Some("user-jwt".to_string()));
        assert_eq!(user.bearer(), "user-jwt");
        assert_eq!(user.access_token(), Some("user-jwt"));
    }
}
