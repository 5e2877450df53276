/// Errors surfaced while resolving a live event.
///
/// Per-stream problems (a token endpoint rejecting one camera angle, one
/// manifest failing to parse) are not represented here — those are logged
/// as warnings and the remaining streams keep going. Only failures that end
/// the whole resolution become an `ExtractError`.
#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    /// No usable session cookies for the site.
    #[error(
        "Login with password is not supported for this website. \
         Export cookies from a logged-in browser session and pass the file \
         with --cookies (or session.cookies_file in config.toml)"
    )]
    LoginRequired,

    /// The URL did not match any registered source's pattern.
    #[error("unsupported URL: {0}")]
    UnsupportedUrl(String),

    /// Transport-level failure, propagated unchanged.
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// A remote endpoint answered with a body we could not use.
    #[error("invalid response: {0}")]
    BadResponse(String),

    /// Every registry discovery strategy came up empty.
    #[error("no live streams found for event {0}")]
    NoStreams(String),

    /// All selected streams were attempted and none produced a format.
    #[error("no playable formats for event {0}: every selected stream failed")]
    NoPlayableStreams(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

pub type ExtractResult<T> = std::result::Result<T, ExtractError>;
