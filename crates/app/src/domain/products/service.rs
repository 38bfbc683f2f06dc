//! Products service.
//!
//! Assembles and maintains product records: validates caller input, derives
//! the computed fields, and keeps the persistence collaborator as a plain
//! store that never recomputes anything on its own.

use jiff::civil::Date;
use larder::{
    analysis::{Report, analyze},
    cadence::Frequency,
    search,
    tags::TagSet,
};

use crate::domain::{
    products::{
        derived,
        errors::ProductsServiceError,
        models::{NewProduct, Product, ProductUpdate, ProductUuid},
        repository::{PageRequest, ProductFilter, ProductPage, ProductsRepository},
    },
    users::UserUuid,
};

#[derive(Debug, Clone)]
pub struct ProductsService<R> {
    repository: R,
}

impl<R: ProductsRepository> ProductsService<R> {
    #[must_use]
    pub fn new(repository: R) -> Self {
        Self { repository }
    }

    /// Assemble and store a new record. Every derived field is computed here;
    /// nothing derived is accepted from the caller.
    #[tracing::instrument(skip(self, new_product), fields(owner = %new_product.owner))]
    pub async fn create_product(
        &self,
        new_product: NewProduct,
        today: Date,
    ) -> Result<Product, ProductsServiceError> {
        validate_name(&new_product.name)?;
        validate_quantities(new_product.quantity_bought, new_product.quantity_consumed)?;
        validate_dates(new_product.purchase_date, new_product.expiration_date)?;

        let mut product = Product {
            uuid: ProductUuid::new(),
            owner: new_product.owner,
            name: new_product.name.trim().to_string(),
            name_normalized: String::new(),
            tags: new_product.tags,
            search_tokens: Vec::new(),
            quantity_bought: new_product.quantity_bought,
            quantity_consumed: new_product.quantity_consumed,
            unit: new_product.unit,
            purchase_date: new_product.purchase_date,
            expiration_date: new_product.expiration_date,
            status: larder::status::Status::Available,
            notification_frequency: Frequency::Monthly,
            created_at: None,
            updated_at: None,
        };

        derived::refresh_all(&mut product, today);

        Ok(self.repository.insert(product).await?)
    }

    /// Retrieve a single record owned by `owner`.
    #[tracing::instrument(skip(self))]
    pub async fn get_product(
        &self,
        owner: UserUuid,
        product: ProductUuid,
    ) -> Result<Product, ProductsServiceError> {
        self.find_owned(owner, product).await
    }

    /// Paginated, filtered listing of an owner's records.
    #[tracing::instrument(skip(self, filter))]
    pub async fn list_products(
        &self,
        owner: UserUuid,
        filter: ProductFilter,
        page: PageRequest,
    ) -> Result<ProductPage, ProductsServiceError> {
        Ok(self.repository.list_by_owner(owner, filter, page).await?)
    }

    /// Full update of the mutable fields. Recomputes every derived field,
    /// including the reminder cadence, so a manual cadence override is reset
    /// here.
    #[tracing::instrument(skip(self, update))]
    pub async fn update_product(
        &self,
        owner: UserUuid,
        product: ProductUuid,
        update: ProductUpdate,
        today: Date,
    ) -> Result<Product, ProductsServiceError> {
        validate_name(&update.name)?;
        validate_quantities(update.quantity_bought, update.quantity_consumed)?;
        validate_dates(update.purchase_date, update.expiration_date)?;

        let mut existing = self.find_owned(owner, product).await?;

        existing.name = update.name.trim().to_string();
        existing.tags = update.tags;
        existing.quantity_bought = update.quantity_bought;
        existing.quantity_consumed = update.quantity_consumed;
        existing.unit = update.unit;
        existing.purchase_date = update.purchase_date;
        existing.expiration_date = update.expiration_date;

        derived::refresh_all(&mut existing, today);

        Ok(self.repository.update(existing).await?)
    }

    /// Record consumption. Refreshes the status but leaves the reminder
    /// cadence as stored, so a manual override survives.
    #[tracing::instrument(skip(self))]
    pub async fn update_quantity_consumed(
        &self,
        owner: UserUuid,
        product: ProductUuid,
        quantity_consumed: f64,
        today: Date,
    ) -> Result<Product, ProductsServiceError> {
        let mut existing = self.find_owned(owner, product).await?;

        validate_quantities(existing.quantity_bought, quantity_consumed)?;

        existing.quantity_consumed = quantity_consumed;
        derived::refresh_status(&mut existing, today);

        Ok(self.repository.update(existing).await?)
    }

    /// Manually override the reminder cadence.
    #[tracing::instrument(skip(self))]
    pub async fn update_notification_frequency(
        &self,
        owner: UserUuid,
        product: ProductUuid,
        frequency: Frequency,
    ) -> Result<Product, ProductsServiceError> {
        let mut existing = self.find_owned(owner, product).await?;

        existing.notification_frequency = frequency;

        Ok(self.repository.update(existing).await?)
    }

    /// Replace the whole tag set and rebuild the search tokens.
    #[tracing::instrument(skip(self, tags))]
    pub async fn replace_tags(
        &self,
        owner: UserUuid,
        product: ProductUuid,
        tags: TagSet,
    ) -> Result<Product, ProductsServiceError> {
        let mut existing = self.find_owned(owner, product).await?;

        existing.tags = tags;
        derived::refresh_search_fields(&mut existing);

        Ok(self.repository.update(existing).await?)
    }

    /// Append tags, keeping existing ones, and rebuild the search tokens.
    #[tracing::instrument(skip(self, tags))]
    pub async fn add_tags(
        &self,
        owner: UserUuid,
        product: ProductUuid,
        tags: TagSet,
    ) -> Result<Product, ProductsServiceError> {
        let mut existing = self.find_owned(owner, product).await?;

        for tag in tags.iter() {
            existing.tags.add(tag);
        }

        derived::refresh_search_fields(&mut existing);

        Ok(self.repository.update(existing).await?)
    }

    /// Remove tags and rebuild the search tokens. Tags not present are
    /// ignored.
    #[tracing::instrument(skip(self, tags))]
    pub async fn remove_tags(
        &self,
        owner: UserUuid,
        product: ProductUuid,
        tags: TagSet,
    ) -> Result<Product, ProductsServiceError> {
        let mut existing = self.find_owned(owner, product).await?;

        for tag in tags.iter() {
            existing.tags.remove(tag);
        }

        derived::refresh_search_fields(&mut existing);

        Ok(self.repository.update(existing).await?)
    }

    /// Prefix search over an owner's records. The query is normalized the
    /// same way names are at assembly time; a blank query returns an empty
    /// page rather than everything.
    #[tracing::instrument(skip(self, query))]
    pub async fn search_products(
        &self,
        owner: UserUuid,
        query: &str,
        page: PageRequest,
    ) -> Result<ProductPage, ProductsServiceError> {
        let token = search::normalize(query);

        if token.is_empty() {
            return Ok(ProductPage::default());
        }

        Ok(self.repository.search_by_token(owner, token, page).await?)
    }

    /// Re-resolve the status of every record the owner holds, persisting only
    /// the ones whose status actually moved. Returns how many were updated.
    #[tracing::instrument(skip(self))]
    pub async fn recompute_statuses(
        &self,
        owner: UserUuid,
        today: Date,
    ) -> Result<usize, ProductsServiceError> {
        let products = self.repository.list_all_by_owner(owner).await?;
        let mut updated = 0;

        for mut product in products {
            let previous = product.status;
            derived::refresh_status(&mut product, today);

            if product.status != previous {
                self.repository.update(product).await?;
                updated += 1;
            }
        }

        Ok(updated)
    }

    /// Run the consumption analytics over a stored record.
    #[tracing::instrument(skip(self))]
    pub async fn analyze_product(
        &self,
        owner: UserUuid,
        product: ProductUuid,
        today: Date,
    ) -> Result<Report, ProductsServiceError> {
        let existing = self.find_owned(owner, product).await?;

        let report = analyze(
            existing.quantity_bought,
            Some(existing.quantity_consumed),
            Some(existing.purchase_date),
            Some(existing.expiration_date),
            today,
        )?;

        Ok(report)
    }

    /// Hard-delete a record.
    #[tracing::instrument(skip(self))]
    pub async fn delete_product(
        &self,
        owner: UserUuid,
        product: ProductUuid,
    ) -> Result<(), ProductsServiceError> {
        // Ownership check first so a foreign uuid deletes nothing.
        self.find_owned(owner, product).await?;

        let removed = self.repository.delete(product).await?;

        if removed == 0 {
            return Err(ProductsServiceError::NotFound);
        }

        Ok(())
    }

    /// Fetch a record and check ownership. A record owned by someone else is
    /// indistinguishable from a missing one.
    async fn find_owned(
        &self,
        owner: UserUuid,
        product: ProductUuid,
    ) -> Result<Product, ProductsServiceError> {
        self.repository
            .find_by_uuid(product)
            .await?
            .filter(|found| found.owner == owner)
            .ok_or(ProductsServiceError::NotFound)
    }
}

fn validate_name(name: &str) -> Result<(), ProductsServiceError> {
    if name.trim().is_empty() {
        return Err(ProductsServiceError::MissingRequiredData("name"));
    }

    Ok(())
}

fn validate_quantities(bought: f64, consumed: f64) -> Result<(), ProductsServiceError> {
    if !bought.is_finite() || bought <= 0.0 {
        return Err(ProductsServiceError::InvalidData(
            "quantity bought must be positive",
        ));
    }

    if !consumed.is_finite() || consumed < 0.0 {
        return Err(ProductsServiceError::InvalidData(
            "quantity consumed must not be negative",
        ));
    }

    // The engine tolerates overshoot, but stored records never carry it.
    if consumed > bought {
        return Err(ProductsServiceError::InvalidData(
            "quantity consumed must not exceed quantity bought",
        ));
    }

    Ok(())
}

fn validate_dates(purchase: Date, expiration: Date) -> Result<(), ProductsServiceError> {
    if expiration < purchase {
        return Err(ProductsServiceError::InvalidData(
            "expiration date must not precede purchase date",
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use jiff::civil::date;
    use larder::{cadence::Frequency, status::Status, tags::TagSet};
    use testresult::TestResult;

    use crate::{
        domain::products::repository::{
            MockProductsRepository, PageRequest, ProductFilter, RepositoryError,
        },
        test::{TestContext, product_request},
    };

    use super::*;

    const PAGE: PageRequest = PageRequest {
        offset: 0,
        limit: 20,
    };

    #[tokio::test]
    async fn create_product_derives_search_status_and_cadence() -> TestResult {
        let ctx = TestContext::new();

        let product = ctx
            .products
            .create_product(product_request(ctx.owner, "  Whole Milk "), ctx.today)
            .await?;

        assert_eq!(product.name, "Whole Milk");
        assert_eq!(product.name_normalized, "whole milk");
        assert!(product.search_tokens.contains(&"wh".to_string()));
        assert!(product.search_tokens.contains(&"whole".to_string()));
        assert!(product.search_tokens.contains(&"milk".to_string()));
        assert_eq!(product.status, Status::Available);
        assert_eq!(product.notification_frequency, Frequency::Weekly);
        assert!(product.created_at.is_some());
        assert!(product.updated_at.is_some());

        Ok(())
    }

    #[tokio::test]
    async fn create_product_rejects_blank_name() {
        let ctx = TestContext::new();

        let mut request = product_request(ctx.owner, "Milk");
        request.name = "   ".to_string();

        let result = ctx.products.create_product(request, ctx.today).await;

        assert!(
            matches!(
                result,
                Err(ProductsServiceError::MissingRequiredData("name"))
            ),
            "expected MissingRequiredData, got {result:?}"
        );
    }

    #[tokio::test]
    async fn create_product_rejects_non_positive_bought() {
        let ctx = TestContext::new();

        let mut request = product_request(ctx.owner, "Milk");
        request.quantity_bought = 0.0;

        let result = ctx.products.create_product(request, ctx.today).await;

        assert!(
            matches!(result, Err(ProductsServiceError::InvalidData(_))),
            "expected InvalidData, got {result:?}"
        );
    }

    #[tokio::test]
    async fn create_product_rejects_expiration_before_purchase() {
        let ctx = TestContext::new();

        let mut request = product_request(ctx.owner, "Milk");
        request.expiration_date = date(2024, 5, 31);
        request.purchase_date = date(2024, 6, 1);

        let result = ctx.products.create_product(request, ctx.today).await;

        assert!(
            matches!(result, Err(ProductsServiceError::InvalidData(_))),
            "expected InvalidData, got {result:?}"
        );
    }

    #[tokio::test]
    async fn get_product_returns_created_product() -> TestResult {
        let ctx = TestContext::new();

        let created = ctx
            .products
            .create_product(product_request(ctx.owner, "Milk"), ctx.today)
            .await?;

        let fetched = ctx.products.get_product(ctx.owner, created.uuid).await?;

        assert_eq!(fetched.uuid, created.uuid);
        assert_eq!(fetched.name, "Milk");

        Ok(())
    }

    #[tokio::test]
    async fn get_product_unknown_uuid_returns_not_found() {
        let ctx = TestContext::new();

        let result = ctx.products.get_product(ctx.owner, ProductUuid::new()).await;

        assert!(
            matches!(result, Err(ProductsServiceError::NotFound)),
            "expected NotFound, got {result:?}"
        );
    }

    #[tokio::test]
    async fn product_not_visible_to_other_owner() -> TestResult {
        let ctx = TestContext::new();

        let created = ctx
            .products
            .create_product(product_request(ctx.owner, "Milk"), ctx.today)
            .await?;

        let stranger = UserUuid::new();
        let result = ctx.products.get_product(stranger, created.uuid).await;

        assert!(
            matches!(result, Err(ProductsServiceError::NotFound)),
            "expected NotFound for foreign owner, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn update_product_recomputes_cadence_override() -> TestResult {
        let ctx = TestContext::new();

        let created = ctx
            .products
            .create_product(product_request(ctx.owner, "Milk"), ctx.today)
            .await?;

        // Manual override survives a consumption update...
        ctx.products
            .update_notification_frequency(ctx.owner, created.uuid, Frequency::Quarterly)
            .await?;

        let after_consume = ctx
            .products
            .update_quantity_consumed(ctx.owner, created.uuid, 2.0, ctx.today)
            .await?;

        assert_eq!(after_consume.notification_frequency, Frequency::Quarterly);

        // ...but a full update resets it to the computed cadence.
        let update = ProductUpdate {
            name: created.name.clone(),
            tags: created.tags.clone(),
            quantity_bought: created.quantity_bought,
            quantity_consumed: 2.0,
            unit: created.unit,
            purchase_date: created.purchase_date,
            expiration_date: created.expiration_date,
        };

        let after_full = ctx
            .products
            .update_product(ctx.owner, created.uuid, update, ctx.today)
            .await?;

        assert_eq!(after_full.notification_frequency, Frequency::Weekly);

        Ok(())
    }

    #[tokio::test]
    async fn update_quantity_consumed_refreshes_status() -> TestResult {
        let ctx = TestContext::new();

        let created = ctx
            .products
            .create_product(product_request(ctx.owner, "Milk"), ctx.today)
            .await?;

        let finished = ctx
            .products
            .update_quantity_consumed(ctx.owner, created.uuid, created.quantity_bought, ctx.today)
            .await?;

        assert_eq!(finished.status, Status::Finished);

        Ok(())
    }

    #[tokio::test]
    async fn update_quantity_consumed_rejects_negative() -> TestResult {
        let ctx = TestContext::new();

        let created = ctx
            .products
            .create_product(product_request(ctx.owner, "Milk"), ctx.today)
            .await?;

        let result = ctx
            .products
            .update_quantity_consumed(ctx.owner, created.uuid, -1.0, ctx.today)
            .await;

        assert!(
            matches!(result, Err(ProductsServiceError::InvalidData(_))),
            "expected InvalidData, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn update_quantity_consumed_rejects_overshoot() -> TestResult {
        let ctx = TestContext::new();

        let created = ctx
            .products
            .create_product(product_request(ctx.owner, "Milk"), ctx.today)
            .await?;

        let result = ctx
            .products
            .update_quantity_consumed(ctx.owner, created.uuid, created.quantity_bought + 1.0, ctx.today)
            .await;

        assert!(
            matches!(result, Err(ProductsServiceError::InvalidData(_))),
            "expected InvalidData, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn tag_operations_rebuild_search_tokens() -> TestResult {
        let ctx = TestContext::new();

        let created = ctx
            .products
            .create_product(product_request(ctx.owner, "Milk"), ctx.today)
            .await?;

        let with_tag = ctx
            .products
            .add_tags(ctx.owner, created.uuid, TagSet::from_strs(&["Breakfast"]))
            .await?;

        assert!(with_tag.tags.contains("Breakfast"));
        assert!(with_tag.search_tokens.contains(&"brea".to_string()));
        assert!(with_tag.search_tokens.contains(&"breakfast".to_string()));

        let without_tag = ctx
            .products
            .remove_tags(ctx.owner, created.uuid, TagSet::from_strs(&["Breakfast"]))
            .await?;

        assert!(!without_tag.tags.contains("Breakfast"));
        assert!(!without_tag.search_tokens.contains(&"breakfast".to_string()));

        let replaced = ctx
            .products
            .replace_tags(ctx.owner, created.uuid, TagSet::from_strs(&["Dairy"]))
            .await?;

        assert!(replaced.tags.contains("Dairy"));
        assert!(replaced.search_tokens.contains(&"dairy".to_string()));

        Ok(())
    }

    #[tokio::test]
    async fn search_products_blank_query_returns_empty_page() -> TestResult {
        let ctx = TestContext::new();

        ctx.products
            .create_product(product_request(ctx.owner, "Milk"), ctx.today)
            .await?;

        let page = ctx.products.search_products(ctx.owner, "   ", PAGE).await?;

        assert!(page.items.is_empty());
        assert_eq!(page.total, 0);

        Ok(())
    }

    #[tokio::test]
    async fn search_products_matches_name_prefix_and_tag_fragment() -> TestResult {
        let ctx = TestContext::new();

        let mut request = product_request(ctx.owner, "Whole Milk");
        request.tags = TagSet::from_strs(&["Breakfast"]);

        let created = ctx.products.create_product(request, ctx.today).await?;

        ctx.products
            .create_product(product_request(ctx.owner, "Bread"), ctx.today)
            .await?;

        let by_prefix = ctx.products.search_products(ctx.owner, "Who", PAGE).await?;
        assert_eq!(by_prefix.total, 1);
        assert_eq!(
            by_prefix.items.first().map(|product| product.uuid),
            Some(created.uuid)
        );

        let by_tag = ctx.products.search_products(ctx.owner, "brea", PAGE).await?;
        assert!(
            by_tag.items.iter().any(|product| product.uuid == created.uuid),
            "tag fragment should match"
        );

        Ok(())
    }

    #[tokio::test]
    async fn list_products_filters_by_status() -> TestResult {
        let ctx = TestContext::new();

        let kept = ctx
            .products
            .create_product(product_request(ctx.owner, "Milk"), ctx.today)
            .await?;

        let finished = ctx
            .products
            .create_product(product_request(ctx.owner, "Bread"), ctx.today)
            .await?;

        ctx.products
            .update_quantity_consumed(ctx.owner, finished.uuid, finished.quantity_bought, ctx.today)
            .await?;

        let filter = ProductFilter {
            statuses: vec![Status::Available],
            frequencies: Vec::new(),
        };

        let page = ctx.products.list_products(ctx.owner, filter, PAGE).await?;

        assert_eq!(page.total, 1);
        assert_eq!(page.items.first().map(|product| product.uuid), Some(kept.uuid));

        Ok(())
    }

    #[tokio::test]
    async fn recompute_statuses_counts_only_changed_records() -> TestResult {
        let ctx = TestContext::new();

        let created = ctx
            .products
            .create_product(product_request(ctx.owner, "Milk"), ctx.today)
            .await?;

        // Nothing has moved yet.
        assert_eq!(ctx.products.recompute_statuses(ctx.owner, ctx.today).await?, 0);

        // A week past expiration, the record flips to Expired.
        let later = created.expiration_date + jiff::Span::new().days(7);

        assert_eq!(ctx.products.recompute_statuses(ctx.owner, later).await?, 1);

        let refreshed = ctx.products.get_product(ctx.owner, created.uuid).await?;
        assert_eq!(refreshed.status, Status::Expired);

        Ok(())
    }

    #[tokio::test]
    async fn analyze_product_reports_on_stored_record() -> TestResult {
        let ctx = TestContext::new();

        let created = ctx
            .products
            .create_product(product_request(ctx.owner, "Milk"), ctx.today)
            .await?;

        ctx.products
            .update_quantity_consumed(ctx.owner, created.uuid, 4.0, ctx.today)
            .await?;

        let report = ctx
            .products
            .analyze_product(ctx.owner, created.uuid, ctx.today)
            .await?;

        assert!((report.remaining_quantity - 6.0).abs() < 1e-9);
        assert_eq!(report.status_suggestion, Status::Available);

        Ok(())
    }

    #[tokio::test]
    async fn delete_product_makes_it_not_found() -> TestResult {
        let ctx = TestContext::new();

        let created = ctx
            .products
            .create_product(product_request(ctx.owner, "Milk"), ctx.today)
            .await?;

        ctx.products.delete_product(ctx.owner, created.uuid).await?;

        let result = ctx.products.get_product(ctx.owner, created.uuid).await;

        assert!(
            matches!(result, Err(ProductsServiceError::NotFound)),
            "expected NotFound after deletion, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn repository_errors_surface_as_service_errors() {
        let mut repository = MockProductsRepository::new();

        repository
            .expect_find_by_uuid()
            .returning(|_| Err(RepositoryError("connection reset".to_string())));

        let service = ProductsService::new(repository);

        let result = service.get_product(UserUuid::new(), ProductUuid::new()).await;

        assert!(
            matches!(result, Err(ProductsServiceError::Repository(_))),
            "expected Repository error, got {result:?}"
        );
    }
}
