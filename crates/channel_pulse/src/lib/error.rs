use std::fmt;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Failed to fetch page: {0}")]
    Fetch(#[from] reqwest::Error),
    #[error("Fetched page is empty: {0}")]
    EmptyPage(String),
    #[error("Headless browser error: {0}")]
    Browser(String),
    #[error("Failed to parse page: {0}")]
    Parse(&'static str),
    #[error("No channels with a stream URL found on the page")]
    EmptyResult,
    #[error("Failed to write playlist: {0:#}")]
    Store(anyhow::Error),
}

/// Coarse classification of a failed run, one per pipeline stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    Fetch,
    Parse,
    EmptyResult,
    Emit,
}

impl Error {
    pub fn kind(&self) -> FailureKind {
        match self {
            Error::Fetch(_) | Error::EmptyPage(_) | Error::Browser(_) => FailureKind::Fetch,
            Error::Parse(_) => FailureKind::Parse,
            Error::EmptyResult => FailureKind::EmptyResult,
            Error::Store(_) => FailureKind::Emit,
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self {
            FailureKind::Fetch => "fetch",
            FailureKind::Parse => "parse",
            FailureKind::EmptyResult => "empty-result",
            FailureKind::Emit => "emit",
        };
        f.write_str(kind)
    }
}
