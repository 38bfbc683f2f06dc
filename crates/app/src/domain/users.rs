//! Users
//!
//! User records belong to the identity collaborator; the domain only needs an
//! opaque owner id for ownership checks.

use crate::uuids::TypedUuid;

/// Marker for user-scoped ids.
#[derive(Debug)]
pub struct User;

/// Authenticated user id supplied by the identity collaborator.
pub type UserUuid = TypedUuid<User>;
