//! REST entity gateway.
//!
//! Talks to a PostgREST-convention endpoint: filters are query
//! parameters (`id=eq.{id}`, `user_id=eq.{owner}`), inserts and
//! updates return the affected rows when asked with
//! `Prefer: return=representation`.

use std::time::Duration;

use reqwest::{header, Client, Method, RequestBuilder};
use serde::Serialize;
use tracing::debug;

use crate::config::GatewayConfig;
use crate::error::{Error, Result};
use crate::gateway::EntityGateway;
use crate::models::{Category, CategoryWrite, Link, LinkWrite};

const LINKS_TABLE: &str = "user_links";
const CATEGORIES_TABLE: &str = "categories";

/// Gateway over a remote PostgREST-style endpoint.
#[derive(Clone)]
pub struct RestGateway {
    client: Client,
    base_url: String,
    api_key: String,
}

/// Insert/update body with the owner stamped in.
#[derive(Serialize)]
struct OwnedWrite<'a, W: Serialize> {
    user_id: &'a str,
    #[serde(flatten)]
    write: &'a W,
}

impl RestGateway {
    /// Create a gateway from explicit endpoint settings.
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent("LinkHub/0.1")
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        }
    }

    /// Create a gateway from the environment-derived configuration.
    pub fn from_config(config: &GatewayConfig) -> Self {
        Self::new(config.base_url.clone(), config.api_key.clone())
    }

    fn request(&self, method: Method, table: &str, query: &str) -> RequestBuilder {
        let url = format!("{}/{}?{}", self.base_url, table, query);
        self.client
            .request(method, &url)
            .header("apikey", &self.api_key)
            .header(
                header::AUTHORIZATION,
                format!("Bearer {}", self.api_key),
            )
    }

    /// Send, check status, and decode the row set.
    async fn rows<T: serde::de::DeserializeOwned>(request: RequestBuilder) -> Result<Vec<T>> {
        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(Error::Gateway(format!("{}: {}", status, text)));
        }
        Ok(response.json().await?)
    }

    /// Send a call whose body is irrelevant beyond the status.
    async fn execute(request: RequestBuilder) -> Result<()> {
        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(Error::Gateway(format!("{}: {}", status, text)));
        }
        Ok(())
    }

    fn single<T>(mut rows: Vec<T>, table: &str) -> Result<T> {
        if rows.is_empty() {
            return Err(Error::Gateway(format!(
                "{}: no row matched the id/owner filter",
                table
            )));
        }
        Ok(rows.remove(0))
    }

    fn owner_filter(owner: &str) -> String {
        format!("user_id=eq.{}", urlencoding::encode(owner))
    }

    fn row_filter(owner: &str, id: &str) -> String {
        format!(
            "id=eq.{}&user_id=eq.{}",
            urlencoding::encode(id),
            urlencoding::encode(owner)
        )
    }
}

#[async_trait::async_trait]
impl EntityGateway for RestGateway {
    async fn list_links(&self, owner: &str) -> Result<Vec<Link>> {
        debug!(table = LINKS_TABLE, "listing rows");
        let query = format!(
            "select=*&{}&order=created_at.desc",
            Self::owner_filter(owner)
        );
        Self::rows(self.request(Method::GET, LINKS_TABLE, &query)).await
    }

    async fn insert_link(&self, owner: &str, write: &LinkWrite) -> Result<Link> {
        let request = self
            .request(Method::POST, LINKS_TABLE, "select=*")
            .header("Prefer", "return=representation")
            .json(&OwnedWrite { user_id: owner, write });
        Self::single(Self::rows(request).await?, LINKS_TABLE)
    }

    async fn update_link(&self, owner: &str, id: &str, write: &LinkWrite) -> Result<Link> {
        let query = format!("select=*&{}", Self::row_filter(owner, id));
        let request = self
            .request(Method::PATCH, LINKS_TABLE, &query)
            .header("Prefer", "return=representation")
            .json(write);
        Self::single(Self::rows(request).await?, LINKS_TABLE)
    }

    async fn delete_link(&self, owner: &str, id: &str) -> Result<()> {
        let query = Self::row_filter(owner, id);
        Self::execute(self.request(Method::DELETE, LINKS_TABLE, &query)).await
    }

    async fn list_categories(&self, owner: &str) -> Result<Vec<Category>> {
        debug!(table = CATEGORIES_TABLE, "listing rows");
        let query = format!("select=*&{}&order=name.asc", Self::owner_filter(owner));
        Self::rows(self.request(Method::GET, CATEGORIES_TABLE, &query)).await
    }

    async fn insert_category(&self, owner: &str, write: &CategoryWrite) -> Result<Category> {
        let request = self
            .request(Method::POST, CATEGORIES_TABLE, "select=*")
            .header("Prefer", "return=representation")
            .json(&OwnedWrite { user_id: owner, write });
        Self::single(Self::rows(request).await?, CATEGORIES_TABLE)
    }

    async fn update_category(
        &self,
        owner: &str,
        id: &str,
        write: &CategoryWrite,
    ) -> Result<Category> {
        let query = format!("select=*&{}", Self::row_filter(owner, id));
        let request = self
            .request(Method::PATCH, CATEGORIES_TABLE, &query)
            .header("Prefer", "return=representation")
            .json(write);
        Self::single(Self::rows(request).await?, CATEGORIES_TABLE)
    }

    async fn delete_category(&self, owner: &str, id: &str) -> Result<()> {
        let query = Self::row_filter(owner, id);
        Self::execute(self.request(Method::DELETE, CATEGORIES_TABLE, &query)).await
    }
}
