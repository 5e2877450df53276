use std::sync::Arc;

use super::{
  flosports::FloSportsLiveSource,
  plugin::BoxedSource,
};
use crate::{
  common::errors::{ExtractError, ExtractResult},
  configs::Config,
  hls::ManifestResolver,
  protocol::LiveStreamInfo,
  session::CookieStore,
};

/// Source Manager
pub struct SourceManager {
  pub sources: Vec<BoxedSource>,
}

impl SourceManager {
  /// Create a new SourceManager with all enabled sources
  pub fn new(
    config: &Config,
    session: Arc<CookieStore>,
    manifests: Arc<dyn ManifestResolver>,
  ) -> Self {
    let mut sources: Vec<BoxedSource> = Vec::new();

    if config.sources.flosports {
      let flo_config = config.flosports.clone().unwrap_or_default();
      match FloSportsLiveSource::new(flo_config, session, manifests) {
        Ok(src) => {
          tracing::info!("Loaded source: FloSports");
          sources.push(Box::new(src));
        }
        Err(e) => {
          tracing::error!("FloSports source failed to initialize: {}", e);
        }
      }
    }

    Self { sources }
  }

  /// Resolve a URL using the first matching source
  pub async fn extract(&self, url: &str) -> ExtractResult<LiveStreamInfo> {
    for source in &self.sources {
      if source.can_handle(url) {
        tracing::trace!("Resolving '{}' with source: {}", url, source.name());
        return source.extract(url).await;
      }
    }

    tracing::debug!("No source could handle URL: {}", url);
    Err(ExtractError::UnsupportedUrl(url.to_string()))
  }

  /// Get names of all registered sources
  pub fn source_names(&self) -> Vec<String> {
    self.sources.iter().map(|s| s.name().to_string()).collect()
  }
}
