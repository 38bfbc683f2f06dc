//! Products service errors.

use larder::analysis::AnalysisError;
use thiserror::Error;

use crate::domain::products::repository::RepositoryError;

#[derive(Debug, Error)]
pub enum ProductsServiceError {
    #[error("product not found")]
    NotFound,

    #[error("missing required data: {0}")]
    MissingRequiredData(&'static str),

    #[error("invalid data: {0}")]
    InvalidData(&'static str),

    #[error("storage error")]
    Repository(#[from] RepositoryError),

    #[error(transparent)]
    Analysis(#[from] AnalysisError),
}
