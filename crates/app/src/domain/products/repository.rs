//! Products Repository
//!
//! Seam to the persistence collaborator. The domain treats storage as a black
//! box keyed by product id, owner and search token; pagination and sort
//! mechanics belong to the implementation behind this trait.

use async_trait::async_trait;
use larder::{cadence::Frequency, status::Status};
use mockall::automock;
use thiserror::Error;

use crate::domain::{
    products::models::{Product, ProductUuid},
    users::UserUuid,
};

/// Opaque storage failure reported by the persistence collaborator.
#[derive(Debug, Error)]
#[error("storage error: {0}")]
pub struct RepositoryError(pub String);

/// Page window forwarded to the persistence collaborator.
#[derive(Debug, Clone, Copy)]
pub struct PageRequest {
    pub offset: usize,
    pub limit: usize,
}

/// One page of products plus the total number of matches.
#[derive(Debug, Clone, Default)]
pub struct ProductPage {
    pub items: Vec<Product>,
    pub total: usize,
}

/// Status / cadence filters for owner listings. Empty lists match everything.
#[derive(Debug, Clone, Default)]
pub struct ProductFilter {
    pub statuses: Vec<Status>,
    pub frequencies: Vec<Frequency>,
}

#[automock]
#[async_trait]
pub trait ProductsRepository: Send + Sync {
    /// Store a freshly assembled record, returning the stored copy with its
    /// timestamps assigned.
    async fn insert(&self, product: Product) -> Result<Product, RepositoryError>;

    /// Fetch a record by id.
    async fn find_by_uuid(&self, uuid: ProductUuid) -> Result<Option<Product>, RepositoryError>;

    /// Replace a record, bumping `updated_at`.
    async fn update(&self, product: Product) -> Result<Product, RepositoryError>;

    /// Hard-delete a record, returning how many records were removed.
    async fn delete(&self, uuid: ProductUuid) -> Result<u64, RepositoryError>;

    /// Paginated, filtered listing of an owner's records.
    async fn list_by_owner(
        &self,
        owner: UserUuid,
        filter: ProductFilter,
        page: PageRequest,
    ) -> Result<ProductPage, RepositoryError>;

    /// Every record for an owner, unpaginated; used for batch recomputation.
    async fn list_all_by_owner(&self, owner: UserUuid)
    -> Result<Vec<Product>, RepositoryError>;

    /// Indexed lookup by stored search token or normalized-name prefix.
    async fn search_by_token(
        &self,
        owner: UserUuid,
        token: String,
        page: PageRequest,
    ) -> Result<ProductPage, RepositoryError>;
}
