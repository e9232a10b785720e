use crate::catalog::params::ProjectQuery;
use crate::catalog::CatalogSource;
use crate::config::Config;
use color_eyre::{eyre::eyre, Result};
use futures::future::{BoxFuture, FutureExt};
use serde_json::Value;
use std::time::Duration;
use tracing::debug;
use url::Url;

/// HTTP client for the catalog API
#[derive(Clone)]
pub struct CatalogClient {
  http: reqwest::Client,
  base_url: Url,
}

impl CatalogClient {
  pub fn new(config: &Config) -> Result<Self> {
    let base_url = parse_base_url(&config.api.url)?;

    let http = reqwest::Client::builder()
      .timeout(Duration::from_secs(config.api.timeout_secs))
      .user_agent(concat!("pcat/", env!("CARGO_PKG_VERSION")))
      .build()
      .map_err(|e| eyre!("Failed to create HTTP client: {}", e))?;

    Ok(Self { http, base_url })
  }

  /// Host name of the API, for the header
  pub fn host(&self) -> &str {
    self.base_url.host_str().unwrap_or("")
  }

  /// URL of the "list projects" endpoint for a composed query
  pub fn projects_url(&self, query: &ProjectQuery) -> Result<Url> {
    let mut url = self
      .base_url
      .join("projects")
      .map_err(|e| eyre!("Invalid projects URL: {}", e))?;
    let pairs = query.to_pairs();
    if !pairs.is_empty() {
      url.query_pairs_mut().extend_pairs(pairs);
    }
    Ok(url)
  }

  /// URL of the "list ecosystems" endpoint
  pub fn ecosystems_url(&self) -> Result<Url> {
    self
      .base_url
      .join("ecosystems")
      .map_err(|e| eyre!("Invalid ecosystems URL: {}", e))
  }

  /// Fetch a projects listing as untyped JSON
  pub async fn get_projects(&self, query: &ProjectQuery) -> Result<Value> {
    let url = self.projects_url(query)?;
    debug!(%url, query = %query.describe(), "listing projects");
    self.get_json(url).await
  }

  /// Fetch the ecosystems listing as untyped JSON
  pub async fn get_ecosystems(&self) -> Result<Value> {
    let url = self.ecosystems_url()?;
    debug!(%url, "listing ecosystems");
    self.get_json(url).await
  }

  async fn get_json(&self, url: Url) -> Result<Value> {
    let response = self
      .http
      .get(url.clone())
      .send()
      .await
      .map_err(|e| eyre!("Request to {} failed: {}", url, e))?
      .error_for_status()
      .map_err(|e| eyre!("Catalog API returned an error: {}", e))?;

    let body = response
      .bytes()
      .await
      .map_err(|e| eyre!("Failed to read response from {}: {}", url, e))?;

    serde_json::from_slice(&body).map_err(|e| eyre!("Malformed JSON from {}: {}", url, e))
  }
}

impl CatalogSource for CatalogClient {
  fn list_projects(&self, query: &ProjectQuery) -> BoxFuture<'static, Result<Value>> {
    let client = self.clone();
    let query = query.clone();
    async move { client.get_projects(&query).await }.boxed()
  }

  fn list_ecosystems(&self) -> BoxFuture<'static, Result<Value>> {
    let client = self.clone();
    async move { client.get_ecosystems().await }.boxed()
  }
}

/// Parse the configured API URL so relative joins append to its path
fn parse_base_url(raw: &str) -> Result<Url> {
  let mut url = Url::parse(raw.trim()).map_err(|e| eyre!("Invalid API URL '{}': {}", raw, e))?;
  if url.cannot_be_a_base() {
    return Err(eyre!("Invalid API URL '{}': not a base URL", raw));
  }
  if !url.path().ends_with('/') {
    let path = format!("{}/", url.path());
    url.set_path(&path);
  }
  Ok(url)
}
