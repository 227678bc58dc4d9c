use compact_str::CompactString;

/// Everything that can sink a single poll attempt. None of these are retried
/// internally; the caller logs and moves on to the next URL.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("no source label in {0:?}")]
    InvalidUrl(String),

    /// The source key resolved fine but no extraction rule is registered for
    /// it. Not retryable.
    #[error("no extraction rule registered for {0:?}")]
    UnsupportedSource(CompactString),

    #[error("fetching {url} failed")]
    Fetch {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The page was fetched but did not look like what the rule for this
    /// source expects.
    #[error("{key}: expected {what} not found in page")]
    Parse {
        key: CompactString,
        what: &'static str,
    },

    #[error("persistence failed for {key}")]
    Persistence {
        key: CompactString,
        #[source]
        source: tokio_postgres::Error,
    },
}

pub type Result<T> = core::result::Result<T, Error>;
