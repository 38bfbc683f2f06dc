//! Larder
//!
//! Larder is the computation engine behind a perishable-product tracker: lifecycle
//! status resolution, consumption analytics, reminder cadence and search
//! tokenisation. Every function is pure and takes the reference date as a
//! parameter; nothing in this crate reads the clock or performs I/O.

pub mod analysis;
pub mod cadence;
pub mod prelude;
pub mod search;
pub mod status;
pub mod tags;

mod rounding;
