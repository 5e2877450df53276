use async_trait::async_trait;

use crate::{common::errors::ExtractResult, protocol::LiveStreamInfo};

/// Trait that all live source plugins must implement.
///
/// Each site (FloSports today, others later) implements this trait to turn
/// an event page URL into a resolved live stream description.
#[async_trait]
pub trait SourcePlugin: Send + Sync {
    /// Unique identifier for this source (e.g., "flosports")
    fn name(&self) -> &str;

    /// Check if this source can handle the given URL.
    ///
    /// Dispatch happens purely on the URL pattern; a source is never invoked
    /// for a URL it did not claim.
    fn can_handle(&self, url: &str) -> bool;

    /// Resolve the event URL into a live stream description.
    ///
    /// One call, one event; the result carries every playable format of the
    /// selected stream(s).
    async fn extract(&self, url: &str) -> ExtractResult<LiveStreamInfo>;
}

pub type BoxedSource = Box<dyn SourcePlugin>;
