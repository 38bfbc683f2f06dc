//! Shared application domain for the larder product tracker.
//!
//! The computation engine lives in the `larder` crate; this crate assembles
//! its outputs onto persisted product records and talks to the persistence
//! collaborator through the repository seam in [`domain::products`].

pub mod domain;

#[cfg(test)]
mod test;

mod uuids;

pub use uuids::TypedUuid;
