//! Error taxonomy shared by every stage of the export pipeline.
//!
//! Missing audio features or genres are not errors: they are carried as
//! sentinel values inside the rows (see [`crate::types::AudioFeatures::missing`]).

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TuneError {
    #[error("authentication failed: {0}")]
    Authentication(String),
    #[error("cannot fetch {collection}: {reason}")]
    CollectionFetch { collection: String, reason: String },
    #[error("cannot parse release date {0:?}")]
    DateParse(String),
    #[error("config error: {0}")]
    Config(String),
    #[error("invalid selection: {0}")]
    InvalidSelection(String),
    #[error("invalid url: {0}")]
    InvalidUrl(String),
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl TuneError {
    pub fn collection_fetch(collection: impl Into<String>, reason: impl ToString) -> Self {
        TuneError::CollectionFetch {
            collection: collection.into(),
            reason: reason.to_string(),
        }
    }
}
