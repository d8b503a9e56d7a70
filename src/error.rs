use thiserror::Error;

/// Everything that can go wrong between a keystroke and a rendered view.
/// None of these are fatal: search failures surface an empty list, detail
/// failures drop the user back on the search screen.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    #[error("market value {0} cannot be displayed")]
    InvalidValue(f64),
    #[error("malformed profile link: {0:?}")]
    MalformedLink(String),
    #[error("search unavailable: {0}")]
    SearchUnavailable(String),
    #[error("player fetch failed: {0}")]
    DetailFetchError(String),
    #[error("malformed player payload: {0}")]
    MalformedDetailPayload(String),
}

pub type Result<T> = std::result::Result<T, Error>;
