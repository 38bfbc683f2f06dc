//! Test support for service-level tests.


pub use context::{TestContext, product_request};
