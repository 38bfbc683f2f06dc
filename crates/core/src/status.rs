//! Product Lifecycle Status
//!
//! A product's status is always a pure function of its quantities and
//! expiration date; callers never set it directly.

use std::fmt;

use jiff::civil::Date;
use serde::{Deserialize, Serialize};

/// Lifecycle state of a tracked product.
///
/// All four states are reachable: when a product is both fully consumed and
/// past its expiration date, the combined state wins over either single flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Status {
    /// Neither finished nor expired; the neutral default.
    Available,

    /// Fully consumed.
    Finished,

    /// Past its expiration date with quantity remaining.
    Expired,

    /// Fully consumed and past its expiration date.
    ExpiredAndFinished,
}

impl Status {
    /// Collapse the two orthogonal conditions into a single state.
    ///
    /// This is the one place the combination rule lives; the resolver and the
    /// analytics suggestion both go through it.
    #[must_use]
    pub fn from_flags(finished: bool, expired: bool) -> Self {
        match (finished, expired) {
            (true, true) => Self::ExpiredAndFinished,
            (true, false) => Self::Finished,
            (false, true) => Self::Expired,
            (false, false) => Self::Available,
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Available => "AVAILABLE",
            Self::Finished => "FINISHED",
            Self::Expired => "EXPIRED",
            Self::ExpiredAndFinished => "EXPIRED_AND_FINISHED",
        };

        f.write_str(name)
    }
}

/// Resolve a product's lifecycle status.
///
/// A product is finished once `consumed` reaches `bought` (non-strict, to
/// tolerate floating rounding) and `bought` is positive. It is expired on the
/// expiration day itself, not only after it — alerting depends on this
/// boundary.
#[must_use]
pub fn resolve_status(
    bought: f64,
    consumed: f64,
    expiration: Option<Date>,
    today: Date,
) -> Status {
    let finished = bought > 0.0 && consumed >= bought;
    let expired = expiration.is_some_and(|expiration| today >= expiration);

    Status::from_flags(finished, expired)
}
