//! Catalog backend access and payload normalization.

pub mod api_types;
pub mod client;
pub mod normalize;
pub mod params;
pub mod types;

use color_eyre::Result;
use futures::future::BoxFuture;
use serde_json::Value;

use params::ProjectQuery;

/// Source of raw catalog payloads.
///
/// Returned futures own everything they need so they can be spawned.
pub trait CatalogSource: Clone + Send + Sync + 'static {
  /// "List projects" filtered by the composed query
  fn list_projects(&self, query: &ProjectQuery) -> BoxFuture<'static, Result<Value>>;

  /// "List ecosystems", including inactive ones
  fn list_ecosystems(&self) -> BoxFuture<'static, Result<Value>>;
}
