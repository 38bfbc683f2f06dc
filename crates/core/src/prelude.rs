//! Crate prelude re-exporting the engine's primary types and entry points.

pub use crate::{
    analysis::{AnalysisError, Report, analyze},
    cadence::{Frequency, calculate_cadence},
    search::{normalize, search_tokens, tokenize, tokenize_tags},
    status::{Status, resolve_status},
    tags::TagSet,
};
