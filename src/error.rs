//! Error type
use crate::asdl::AsdlError;
use crate::data::{BatchError, CorpusError};
use crate::metrics::MetricError;
use crate::utils::save::SerdeSaveLoadError;
use thiserror::Error;

/// Error from the seq2tree crate.
#[derive(Error, Debug)]
pub enum Seq2TreeError {
    #[error("error parsing grammar")]
    Grammar(#[from] AsdlError),
    #[error("error reading corpus")]
    Corpus(#[from] CorpusError),
    #[error("error building batches")]
    Batch(#[from] BatchError),
    #[error("error computing metric")]
    Metric(#[from] MetricError),
    #[error("error loading configuration")]
    Config(#[from] SerdeSaveLoadError),
    #[error("error writing output")]
    Io(#[from] std::io::Error),
    #[error("error serializing output")]
    Json(#[from] serde_json::Error),
}
