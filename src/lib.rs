pub mod common;
pub mod configs;
pub mod hls;
pub mod protocol;
pub mod session;
pub mod sources;

pub use common::errors::{ExtractError, ExtractResult};
pub use sources::SourceManager;
